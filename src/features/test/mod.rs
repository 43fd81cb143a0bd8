//! Test-taking feature: question fetch, answer widgets, timers and the
//! controller that drives a single test run.


use crate::{
    errors::AppError,
    session::{nav::Redirect, notify::NotificationKind, Session},
};
use controller::TestSession;
use std::time::Instant;
use timers::Scheduler;
use tracing::{error, info};

pub const LOAD_FAILED: &str = "Failed to load test questions";
pub const SUBMIT_FAILED: &str = "Failed to submit test";

/// Fetches the questions for `test_id` and starts the controller.
///
/// # Errors
/// `NoQuestions` for an empty set, `Load` when the fetch fails. Both have
/// already been shown as error notifications and leave the controller halted.
pub async fn load_test<S: Scheduler>(
    session: &mut Session,
    controller: &mut TestSession<S>,
    test_id: u64,
) -> Result<(), AppError> {
    let questions = match client::fetch_questions(session.api(), test_id).await {
        Ok(questions) => questions,
        Err(err) => {
            error!("Error loading questions: {err}");
            session.notify(err.user_message(LOAD_FAILED), NotificationKind::Error);
            return Err(controller.fail_load(&err));
        }
    };

    match controller.start(questions, Instant::now()) {
        Ok(()) => Ok(()),
        Err(err) => {
            session.notify(err.user_message(LOAD_FAILED), NotificationKind::Error);
            Err(err)
        }
    }
}

/// Confirms the open submit dialog and posts every answer.
///
/// # Errors
/// `Validation` when there is nothing to confirm, otherwise the submission
/// error. The controller is back on the last question with controls enabled
/// and the error has been shown as a notification.
pub async fn submit_test<S: Scheduler>(
    session: &mut Session,
    controller: &mut TestSession<S>,
) -> Result<Redirect, AppError> {
    let payload = controller.confirm_submit(Instant::now())?;

    let result = client::submit(session.api(), &payload)
        .await
        .and_then(|response| {
            if response.success {
                Ok(())
            } else {
                Err(AppError::Request {
                    status: 200,
                    message: response
                        .message
                        .filter(|message| !message.is_empty())
                        .unwrap_or_else(|| SUBMIT_FAILED.to_string()),
                })
            }
        });

    match controller.finish_submit(result) {
        Ok(redirect) => {
            info!("submitted test {} with {} answers", payload.test_id, payload.answers.len());
            session.notify("Test submitted successfully!", NotificationKind::Success);
            Ok(redirect)
        }
        Err(err) => {
            error!("Error submitting test: {err}");
            session.notify(err.user_message(SUBMIT_FAILED), NotificationKind::Error);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        controller::{TestSession, TestState},
        load_test, submit_test,
        timers::manual::ManualScheduler,
    };
    use crate::{
        errors::AppError,
        session::{
            api::ApiClient,
            nav::Page,
            notify::NotificationKind,
            token::TokenStore,
            Session,
        },
    };
    use anyhow::Result;
    use secrecy::SecretString;
    use serde_json::json;
    use std::{net::TcpListener, path::Path, time::Duration};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn signed_in(base_url: &str, dir: &Path) -> Result<Session> {
        let tokens = TokenStore::open(dir);
        tokens.set_token(&SecretString::from("test-token"))?;
        let api = ApiClient::new(base_url, Duration::from_secs(2), tokens)?;
        Ok(Session::new(api, Page::Test))
    }

    fn three_questions() -> serde_json::Value {
        json!({"data": [
            {
                "id": 101,
                "category": "analytical_reasoning",
                "question_text": "Pick one",
                "question_type": "multiple_choice",
                "options": "[\"Paris\", \"London\"]",
                "time_limit": 0
            },
            {
                "id": 102,
                "category": "working_memory",
                "question_text": "Recall the word",
                "question_type": "text_input",
                "time_limit": 0
            },
            {
                "id": 103,
                "category": "processing_speed",
                "question_text": "6 x 7",
                "question_type": "number_input",
                "time_limit": 0
            }
        ]})
    }

    #[tokio::test]
    async fn answers_are_submitted_in_question_order() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/questions"))
            .and(query_param("test_id", "1"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(three_questions()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Test submitted successfully"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir()?;
        let mut session = signed_in(&server.uri(), dir.path())?;
        let mut controller = TestSession::new(ManualScheduler::default(), 1);

        load_test(&mut session, &mut controller, 1).await?;
        assert_eq!(controller.state(), TestState::Active(0));

        let now = std::time::Instant::now();
        controller.select_option(0)?;
        controller.next(now);
        controller.next(now);
        controller.input_text("42")?;
        controller.request_submit()?;

        let redirect = submit_test(&mut session, &mut controller).await?;
        assert_eq!(redirect.to, Page::Results);
        assert_eq!(redirect.after, Duration::from_secs(2));
        assert_eq!(controller.state(), TestState::Done);

        let requests = server.received_requests().await.unwrap_or_default();
        let submitted = requests
            .iter()
            .find(|request| request.url.path() == "/api/submit")
            .map(|request| serde_json::from_slice::<serde_json::Value>(&request.body))
            .transpose()?
            .unwrap_or_default();
        let answers: Vec<_> = submitted["answers"]
            .as_array()
            .map(|answers| {
                answers
                    .iter()
                    .map(|answer| (answer["question_id"].clone(), answer["user_answer"].clone()))
                    .collect()
            })
            .unwrap_or_default();
        assert_eq!(
            answers,
            vec![
                (json!(101), json!("a")),
                (json!(102), json!("")),
                (json!(103), json!("42")),
            ]
        );
        assert_eq!(submitted["test_id"], json!(1));

        let last = session.notifications_mut().active().last().cloned();
        assert_eq!(last.map(|n| n.message), Some("Test submitted successfully!".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn empty_question_set_halts_with_notification() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/questions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir()?;
        let mut session = signed_in(&server.uri(), dir.path())?;
        let mut controller = TestSession::new(ManualScheduler::default(), 1);

        let err = load_test(&mut session, &mut controller, 1).await.unwrap_err();
        assert_eq!(err, AppError::NoQuestions);
        assert_eq!(controller.state(), TestState::Halted);
        let notification = &session.notifications_mut().active()[0];
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.message, "No questions available");
        Ok(())
    }

    #[tokio::test]
    async fn failed_fetch_halts_with_load_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut session = signed_in("http://127.0.0.1:1", dir.path())?;
        let mut controller = TestSession::new(ManualScheduler::default(), 1);

        let err = load_test(&mut session, &mut controller, 1).await.unwrap_err();
        assert!(matches!(err, AppError::Load(_)));
        assert_eq!(controller.state(), TestState::Halted);
        assert_eq!(
            session.notifications_mut().active()[0].message,
            "Failed to load test questions"
        );
        Ok(())
    }

    #[tokio::test]
    async fn rejected_submission_keeps_user_on_last_question() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/questions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{
                "id": 7,
                "question_text": "Only question",
                "question_type": "text_input"
            }]})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "Failed to save results"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir()?;
        let mut session = signed_in(&server.uri(), dir.path())?;
        let mut controller = TestSession::new(ManualScheduler::default(), 3);
        load_test(&mut session, &mut controller, 3).await?;
        controller.request_submit()?;

        let err = submit_test(&mut session, &mut controller).await.unwrap_err();
        assert_eq!(err.user_message("x"), "Failed to save results");
        assert_eq!(controller.state(), TestState::Active(0));
        assert!(controller.view().is_some_and(|view| view.submit_enabled));
        Ok(())
    }
}
