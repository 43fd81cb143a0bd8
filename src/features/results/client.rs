use crate::{
    errors::AppError,
    features::results::types::{ResultSummary, ResultsResponse},
    session::api::ApiClient,
};
use tracing::{debug, instrument};

/// # Errors
/// Returns the API or transport error unchanged.
#[instrument(skip(api))]
pub async fn fetch_results(api: &ApiClient) -> Result<Vec<ResultSummary>, AppError> {
    let response: ResultsResponse = api.get_json("/api/results").await?;
    let results = response.data.unwrap_or_default();
    debug!("fetched {} results", results.len());
    Ok(results)
}
