use serde::{Deserialize, Serialize};

use crate::effect::Notice;

/// Fixed name of the login popup window. Re-invoking a login while a popup
/// exists renavigates that window instead of opening a duplicate.
pub const AUTH_WINDOW_NAME: &str = "authWindow";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginStatus {
    #[serde(rename = "loginSuccess")]
    Success,
    #[serde(rename = "loginFailed")]
    Failed,
}

/// The cross-window message contract: posted exactly once by the popup to
/// its opener after the identity-provider redirect resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginMessage {
    pub status: LoginStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginMessage {
    pub fn success() -> Self {
        Self {
            status: LoginStatus::Success,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: LoginStatus::Failed,
            error: Some(error.into()),
        }
    }
}

/// A cross-context message with the origin it was posted from. Origin
/// filtering is a mandatory security check, not a formality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEnvelope {
    pub origin: String,
    pub data: serde_json::Value,
}

impl MessageEnvelope {
    pub fn new(origin: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

/// What the opener must do in response to a popup message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    Notify(Notice),
    /// Only emitted for a success message; a failed login leaves the popup
    /// open so the user can retry or read the provider's error page.
    ClosePopup,
    /// Invoke the caller's completion callback (refresh auth state, close
    /// an associated panel).
    Refresh,
}

/// Opener-side listener for the popup handshake, with one-shot semantics:
/// the first same-origin `LoginMessage` settles it and every later message
/// is ignored. Settled listeners are meant to be dropped, not kept
/// registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginListener {
    origin: String,
    settled: bool,
}

impl LoginListener {
    /// `origin` is the opener's own origin; nothing else gets through.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            settled: false,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Handles one cross-context message, returning the actions to run.
    ///
    /// Foreign origins, payloads without a `status` field and anything after
    /// settlement yield no actions and leave the listener unchanged.
    pub fn on_message(&mut self, envelope: &MessageEnvelope) -> Vec<LoginAction> {
        if self.settled || envelope.origin != self.origin {
            return Vec::new();
        }
        if envelope.data.get("status").is_none() {
            return Vec::new();
        }
        let message: LoginMessage = match serde_json::from_value(envelope.data.clone()) {
            Ok(message) => message,
            Err(_) => return Vec::new(),
        };

        self.settled = true;
        match message.status {
            LoginStatus::Success => vec![
                LoginAction::Notify(Notice::info("Logged in", "Login successful")),
                LoginAction::ClosePopup,
                LoginAction::Refresh,
            ],
            LoginStatus::Failed => vec![
                LoginAction::Notify(Notice::error(
                    "Login failed",
                    message
                        .error
                        .unwrap_or_else(|| "Please try again later".to_string()),
                )),
                LoginAction::Refresh,
            ],
        }
    }
}

/// Popup side: pulls the authorization code and state token out of the
/// callback query. A missing parameter short-circuits into the failure
/// message the popup must post before stopping.
pub fn callback_params<'a, I>(query: I) -> Result<(String, String), LoginMessage>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut code = None;
    let mut state = None;
    for (key, value) in query {
        match key {
            "code" if !value.is_empty() => code = Some(value.to_string()),
            "state" if !value.is_empty() => state = Some(value.to_string()),
            _ => {}
        }
    }
    match (code, state) {
        (Some(code), Some(state)) => Ok((code, state)),
        _ => Err(LoginMessage::failed("missing required parameters")),
    }
}

/// Popup side: message for a completed login exchange.
pub fn callback_result_message(http_status: u16) -> LoginMessage {
    if http_status == 200 {
        LoginMessage::success()
    } else {
        LoginMessage::failed("login failed")
    }
}

/// Popup side: message for a completed account-link exchange, with the
/// human-readable reason selected by status.
pub fn link_failure_message(http_status: u16) -> LoginMessage {
    match http_status {
        200 => LoginMessage::success(),
        400 => LoginMessage::failed("cannot link account, please log in again"),
        401 => LoginMessage::failed("please log in first"),
        _ => LoginMessage::failed("link failed, please try again later"),
    }
}
