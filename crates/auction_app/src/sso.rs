//! Popup login handshake.
//!
//! The opener requests an authorization URL, opens (or renavigates) the
//! named auth popup and listens for exactly one same-origin message. The
//! popup side completes the code/state exchange and posts the verdict back
//! before going quiet.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use auction_client::{ApiClient, LoginUrlError, SsoProvider};
use auction_core::{
    callback_params, callback_result_message, link_failure_message, LoginAction, LoginListener,
    LoginMessage, MessageEnvelope, Notice, AUTH_WINDOW_NAME,
};
use client_logging::{client_info, client_warn};
use tokio::sync::mpsc;

/// A named auxiliary window. Navigation and closing are modelled so the
/// handshake around them is testable; rendering is out of scope.
#[derive(Debug)]
pub struct Popup {
    name: String,
    url: Mutex<String>,
    closed: AtomicBool,
}

impl Popup {
    fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: Mutex::new(url.to_string()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_url(&self) -> String {
        self.url.lock().map(|url| url.clone()).unwrap_or_default()
    }

    fn navigate(&self, url: &str) {
        if let Ok(mut current) = self.url.lock() {
            *current = url.to_string();
        }
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Host for named popups. Re-opening a name that is still alive renavigates
/// the existing window instead of stacking a second one.
#[derive(Debug, Default)]
pub struct PopupHost {
    windows: Mutex<HashMap<String, Arc<Popup>>>,
}

impl PopupHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, name: &str, url: &str) -> Arc<Popup> {
        let mut windows = match self.windows.lock() {
            Ok(windows) => windows,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(existing) = windows.get(name) {
            if !existing.is_closed() {
                existing.navigate(url);
                return Arc::clone(existing);
            }
        }
        let popup = Arc::new(Popup::new(name, url));
        windows.insert(name.to_string(), Arc::clone(&popup));
        popup
    }

    pub fn find(&self, name: &str) -> Option<Arc<Popup>> {
        let windows = match self.windows.lock() {
            Ok(windows) => windows,
            Err(poisoned) => poisoned.into_inner(),
        };
        windows.get(name).cloned()
    }
}

/// How a popup login attempt resolved on the opener side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginFlow {
    /// The popup posted its verdict; `success` mirrors it.
    Completed { success: bool },
    /// The message channel closed before any verdict arrived, typically
    /// because the user closed the popup by hand.
    Abandoned,
    /// The backend does not support this provider.
    NotSupported,
}

/// Opener side of the handshake.
pub struct SsoLogin {
    client: ApiClient,
    host: Arc<PopupHost>,
    origin: String,
}

impl SsoLogin {
    /// `origin` is the opener's own origin; popup messages from anywhere
    /// else are discarded unread.
    pub fn new(client: ApiClient, host: Arc<PopupHost>, origin: impl Into<String>) -> Self {
        Self {
            client,
            host,
            origin: origin.into(),
        }
    }

    /// Runs one login attempt: obtains the provider's authorization URL,
    /// opens the auth popup and waits for the first same-origin verdict.
    ///
    /// `notify` receives user-facing notices; `refresh` fires once when the
    /// attempt settles, success or not, so the caller re-reads auth state.
    pub async fn login(
        &self,
        provider: SsoProvider,
        redirect_url: &str,
        mut messages: mpsc::UnboundedReceiver<MessageEnvelope>,
        notify: impl Fn(&Notice),
        refresh: impl Fn(),
    ) -> Result<LoginFlow, LoginUrlError> {
        let auth_url = match self.client.sso_login_url(provider, redirect_url).await {
            Ok(url) => url,
            Err(LoginUrlError::UnsupportedProvider) => {
                client_warn!("login provider {provider} is not supported");
                return Ok(LoginFlow::NotSupported);
            }
            Err(err) => return Err(err),
        };

        let popup = self.host.open(AUTH_WINDOW_NAME, &auth_url);
        client_info!("auth popup open for {provider}");

        let mut listener = LoginListener::new(self.origin.clone());
        let mut success = false;
        while let Some(envelope) = messages.recv().await {
            for action in listener.on_message(&envelope) {
                match action {
                    LoginAction::Notify(notice) => notify(&notice),
                    LoginAction::ClosePopup => {
                        success = true;
                        popup.close();
                    }
                    LoginAction::Refresh => refresh(),
                }
            }
            if listener.is_settled() {
                return Ok(LoginFlow::Completed { success });
            }
        }
        client_info!("auth popup abandoned before any verdict");
        Ok(LoginFlow::Abandoned)
    }
}

/// Popup side of the handshake: runs the callback route the provider
/// redirected to, exchanges the code and posts the verdict to the opener.
///
/// `link_account` selects the link route for attaching another provider to
/// the logged-in account; otherwise this is a plain login. The posted
/// message is also returned for the popup's own result page.
pub async fn run_popup_callback<'a, I>(
    client: &ApiClient,
    provider: SsoProvider,
    link_account: bool,
    query: I,
    origin: &str,
    opener: &mpsc::UnboundedSender<MessageEnvelope>,
) -> LoginMessage
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let message = match callback_params(query) {
        Ok((code, state)) => {
            let exchanged = if link_account {
                client.sso_link(provider, &code, &state).await
            } else {
                client.sso_callback(provider, &code, &state).await
            };
            match exchanged {
                Ok(status) if link_account => link_failure_message(status),
                Ok(status) => callback_result_message(status),
                Err(err) => {
                    client_warn!("callback exchange for {provider} failed in transit: {err}");
                    LoginMessage::failed("login failed")
                }
            }
        }
        Err(message) => message,
    };

    post_message(opener, origin, &message);
    message
}

fn post_message(
    opener: &mpsc::UnboundedSender<MessageEnvelope>,
    origin: &str,
    message: &LoginMessage,
) {
    match serde_json::to_value(message) {
        Ok(data) => {
            let _ = opener.send(MessageEnvelope::new(origin, data));
        }
        Err(err) => client_warn!("could not serialize login message: {err}"),
    }
}
