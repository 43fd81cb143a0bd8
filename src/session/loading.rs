/// A submit control that can be switched into a busy state while a request is
/// in flight. While busy it shows a spinner instead of its label and ignores
/// activation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitControl {
    label: String,
    busy: bool,
    disabled: bool,
}

impl SubmitControl {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            busy: false,
            disabled: false,
        }
    }

    pub fn show_loading(&mut self) {
        self.busy = true;
        self.disabled = true;
    }

    pub fn hide_loading(&mut self) {
        self.busy = false;
        self.disabled = false;
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Text to render: the label, or an ellipsis spinner while busy.
    #[must_use]
    pub fn caption(&self) -> &str {
        if self.busy {
            "..."
        } else {
            &self.label
        }
    }
}
