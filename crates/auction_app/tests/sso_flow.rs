use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use auction_app::sso::{run_popup_callback, LoginFlow, PopupHost, SsoLogin};
use auction_client::{ApiClient, SsoProvider};
use auction_core::{LoginStatus, MessageEnvelope, Notice, Severity, AUTH_WINDOW_NAME};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORIGIN: &str = "https://front.test";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

struct Recorder {
    notices: Mutex<Vec<Notice>>,
    refreshes: AtomicUsize,
}

impl Recorder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            notices: Mutex::new(Vec::new()),
            refreshes: AtomicUsize::new(0),
        })
    }
}

async fn mount_auth(server: &MockServer, provider: &str, exchange_status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/auth/sso/{provider}/login")))
        .and(query_param("redirectUrl", ORIGIN))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "https://idp.test/authorize?state=xyz"),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/auth/sso/{provider}/callback")))
        .and(body_json(serde_json::json!({ "code": "c1", "state": "s1" })))
        .respond_with(ResponseTemplate::new(exchange_status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn a_successful_login_closes_the_popup_and_refreshes_once() {
    init_logging();
    let server = MockServer::start().await;
    mount_auth(&server, "Google", 200).await;

    let client = ApiClient::new(&server.uri()).expect("client");
    let host = Arc::new(PopupHost::new());
    let login = SsoLogin::new(client.clone(), Arc::clone(&host), ORIGIN);
    let recorder = Recorder::new();

    let (tx, rx) = mpsc::unbounded_channel();
    // Noise from another window must be discarded unread.
    tx.send(MessageEnvelope::new(
        "https://evil.test",
        serde_json::json!({ "status": "loginSuccess" }),
    ))
    .expect("send");

    let opener = {
        let notices = Arc::clone(&recorder);
        let refreshes = Arc::clone(&recorder);
        login.login(
            SsoProvider::Google,
            ORIGIN,
            rx,
            move |notice| notices.notices.lock().unwrap().push(notice.clone()),
            move || {
                refreshes.refreshes.fetch_add(1, Ordering::SeqCst);
            },
        )
    };
    let popup_side = async {
        // Give the opener a head start so the popup exists when the
        // verdict is posted.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        run_popup_callback(
            &client,
            SsoProvider::Google,
            false,
            [("code", "c1"), ("state", "s1")],
            ORIGIN,
            &tx,
        )
        .await
    };

    let (flow, posted) = tokio::join!(opener, popup_side);
    assert_eq!(flow.expect("login"), LoginFlow::Completed { success: true });
    assert_eq!(posted.status, LoginStatus::Success);

    let popup = host.find(AUTH_WINDOW_NAME).expect("popup was opened");
    assert!(popup.is_closed());
    assert_eq!(popup.current_url(), "https://idp.test/authorize?state=xyz");

    assert_eq!(recorder.refreshes.load(Ordering::SeqCst), 1);
    let notices = recorder.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Info);
}

#[tokio::test]
async fn a_failed_exchange_leaves_the_popup_open_and_reports_the_error() {
    init_logging();
    let server = MockServer::start().await;
    mount_auth(&server, "GitHub", 401).await;

    let client = ApiClient::new(&server.uri()).expect("client");
    let host = Arc::new(PopupHost::new());
    let login = SsoLogin::new(client.clone(), Arc::clone(&host), ORIGIN);
    let recorder = Recorder::new();

    let (tx, rx) = mpsc::unbounded_channel();
    let opener = {
        let notices = Arc::clone(&recorder);
        let refreshes = Arc::clone(&recorder);
        login.login(
            SsoProvider::GitHub,
            ORIGIN,
            rx,
            move |notice| notices.notices.lock().unwrap().push(notice.clone()),
            move || {
                refreshes.refreshes.fetch_add(1, Ordering::SeqCst);
            },
        )
    };
    let popup_side = async {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        run_popup_callback(
            &client,
            SsoProvider::GitHub,
            false,
            [("code", "c1"), ("state", "s1")],
            ORIGIN,
            &tx,
        )
        .await
    };

    let (flow, posted) = tokio::join!(opener, popup_side);
    assert_eq!(flow.expect("login"), LoginFlow::Completed { success: false });
    assert_eq!(posted.status, LoginStatus::Failed);
    assert_eq!(posted.error.as_deref(), Some("login failed"));

    let popup = host.find(AUTH_WINDOW_NAME).expect("popup was opened");
    assert!(!popup.is_closed());

    assert_eq!(recorder.refreshes.load(Ordering::SeqCst), 1);
    let notices = recorder.notices.lock().unwrap();
    assert_eq!(notices[0].severity, Severity::Error);
}

#[tokio::test]
async fn an_unsupported_provider_never_opens_a_popup() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/sso/Microsoft/login"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).expect("client");
    let host = Arc::new(PopupHost::new());
    let login = SsoLogin::new(client, Arc::clone(&host), ORIGIN);

    let (_tx, rx) = mpsc::unbounded_channel();
    let flow = login
        .login(SsoProvider::Microsoft, ORIGIN, rx, |_| {}, || {})
        .await
        .expect("login");
    assert_eq!(flow, LoginFlow::NotSupported);
    assert!(host.find(AUTH_WINDOW_NAME).is_none());
}

#[tokio::test]
async fn closing_the_channel_without_a_verdict_abandons_the_attempt() {
    init_logging();
    let server = MockServer::start().await;
    mount_auth(&server, "Google", 200).await;

    let client = ApiClient::new(&server.uri()).expect("client");
    let host = Arc::new(PopupHost::new());
    let login = SsoLogin::new(client, host, ORIGIN);

    let (tx, rx) = mpsc::unbounded_channel();
    drop(tx);
    let flow = login
        .login(SsoProvider::Google, ORIGIN, rx, |_| {}, || {})
        .await
        .expect("login");
    assert_eq!(flow, LoginFlow::Abandoned);
}

#[tokio::test]
async fn a_missing_callback_parameter_posts_a_failure_without_an_exchange() {
    init_logging();
    let server = MockServer::start().await;
    // No callback mock mounted: the exchange must never be attempted.

    let client = ApiClient::new(&server.uri()).expect("client");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let posted = run_popup_callback(
        &client,
        SsoProvider::Google,
        false,
        [("code", "c1")],
        ORIGIN,
        &tx,
    )
    .await;

    assert_eq!(posted.status, LoginStatus::Failed);
    assert_eq!(posted.error.as_deref(), Some("missing required parameters"));
    let envelope = rx.try_recv().expect("verdict posted");
    assert_eq!(envelope.origin, ORIGIN);
}

#[tokio::test]
async fn linking_maps_the_verdict_to_its_own_failure_reasons() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/sso/Google/link"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri()).expect("client");
    let (tx, _rx) = mpsc::unbounded_channel();
    let posted = run_popup_callback(
        &client,
        SsoProvider::Google,
        true,
        [("code", "c1"), ("state", "s1")],
        ORIGIN,
        &tx,
    )
    .await;

    assert_eq!(posted.status, LoginStatus::Failed);
    assert_eq!(posted.error.as_deref(), Some("please log in first"));
}
