#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A user-facing notification. `offer_login` marks the 401 case where the
/// notice carries an inline re-authenticate action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub detail: String,
    pub severity: Severity,
    pub offer_login: bool,
}

impl Notice {
    pub fn info(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            severity: Severity::Info,
            offer_login: false,
        }
    }

    pub fn error(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
            severity: Severity::Error,
            offer_login: false,
        }
    }

    pub fn with_login_action(mut self) -> Self {
        self.offer_login = true;
        self
    }
}

/// Side effects requested by `update`; the shell executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the live bid stream for the item. Idempotent at the shell:
    /// a no-op if a stream is already open.
    OpenStream { item_id: String },
    /// Close the live bid stream if one is open.
    CloseStream,
    /// Submit a bid to the backend.
    SubmitBid { item_id: String, amount: u32 },
    /// Surface a notification to the user.
    Notify(Notice),
}
