#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use donation_admin::api::ApiClient;
use donation_admin::navigation::{Navigation, Navigator, Notice, Notifier};
use donation_admin::session::{MemoryTokenStore, SessionRoutes, SessionStore};

pub const PASSWORD: &str = "secret";

/// How `/modules` answers
#[derive(Debug, Clone)]
pub enum ModulesReply {
    List(Value),
    Status(u16),
}

#[derive(Debug)]
pub struct MockState {
    /// email -> user payload served by `/auth/me`
    pub accounts: HashMap<String, Value>,
    /// token -> email
    pub sessions: HashMap<String, String>,
    /// Wrap successful bodies in `{ success, data }`
    pub envelope: bool,
    pub modules: ModulesReply,
    /// Answer `/auth/me` with 401 even for tokens `/auth/login` just issued
    pub reject_me: bool,
    /// Authorization header of every request, in arrival order
    pub seen_auth: Vec<(String, Option<String>)>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            accounts: HashMap::new(),
            sessions: HashMap::new(),
            envelope: true,
            modules: ModulesReply::List(json!([])),
            reject_me: false,
            seen_auth: Vec::new(),
        }
    }
}

type Shared = Arc<Mutex<MockState>>;

/// In-process stand-in for the admin REST API
pub struct MockBackend {
    pub base_url: String,
    pub state: Shared,
}

impl MockBackend {
    pub async fn start(state: MockState) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let state: Shared = Arc::new(Mutex::new(state));

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/me", get(me))
            .route("/api/auth/logout", post(logout))
            .route("/api/modules", get(modules))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}/api", port),
            state,
        })
    }

    pub fn set_modules(&self, reply: ModulesReply) {
        self.state.lock().unwrap().modules = reply;
    }

    pub fn auth_headers(&self, path: &str) -> Vec<Option<String>> {
        self.state
            .lock()
            .unwrap()
            .seen_auth
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, h)| h.clone())
            .collect()
    }

    pub fn active_sessions(&self) -> usize {
        self.state.lock().unwrap().sessions.len()
    }
}

pub fn editor_account() -> (String, Value) {
    (
        "editor@example.org".to_string(),
        json!({
            "id": 7,
            "email": "editor@example.org",
            "displayName": "Editor",
            "role": { "id": 2, "name": "editor" },
            "permissions": [
                { "moduleKey": "dashboard", "read": true },
                { "moduleKey": "news", "read": true, "create": true },
                { "moduleKey": "campaigns", "read": true },
                { "moduleKey": "users", "read": false, "update": true }
            ]
        }),
    )
}

pub fn root_account() -> (String, Value) {
    (
        "root@example.org".to_string(),
        json!({
            "id": 1,
            "email": "root@example.org",
            "role": { "id": 1, "name": "SuperAdmin" },
            "permissions": []
        }),
    )
}

pub fn state_with(accounts: &[(String, Value)]) -> MockState {
    MockState {
        accounts: accounts.iter().cloned().collect(),
        ..MockState::default()
    }
}

pub fn module_rows() -> Value {
    json!([
        { "id": 1, "name": "Haberler", "moduleKey": "news", "displayOrder": 2 },
        { "id": 2, "name": "Projeler", "moduleKey": "projects", "displayOrder": 1 },
        { "id": 3, "name": "Kampanyalar", "moduleKey": "campaigns", "displayOrder": 1 },
        { "id": 4, "name": "Kampanya Ayarları", "moduleKey": "campaign-settings", "parentId": 3 },
        { "id": 5, "name": "Kullanıcılar", "moduleKey": "users", "displayOrder": 1 }
    ])
}

fn record(state: &Shared, path: &str, headers: &HeaderMap) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.lock().unwrap().seen_auth.push((path.to_string(), auth));
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn ok(state: &MockState, data: Value) -> (StatusCode, Json<Value>) {
    let body = if state.envelope {
        json!({ "success": true, "data": data })
    } else {
        data
    };
    (StatusCode::OK, Json(body))
}

fn fail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "success": false, "message": message })))
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    record(&state, "/auth/login", &headers);
    let mut guard = state.lock().unwrap();

    let email = body["email"].as_str().unwrap_or_default().to_string();
    let user = match guard.accounts.get(&email) {
        Some(user) if body["password"] == PASSWORD => user.clone(),
        _ => return fail(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    };

    let token = format!("token-{}-{}", user["id"], guard.sessions.len() + 1);
    guard.sessions.insert(token.clone(), email);
    ok(&guard, json!({ "token": token, "user": user }))
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    record(&state, "/auth/me", &headers);
    let guard = state.lock().unwrap();

    if guard.reject_me {
        return fail(StatusCode::UNAUTHORIZED, "Token not active yet");
    }

    let user = bearer(&headers)
        .and_then(|token| guard.sessions.get(&token).cloned())
        .and_then(|email| guard.accounts.get(&email).cloned());

    match user {
        Some(user) => ok(&guard, user),
        None => fail(StatusCode::UNAUTHORIZED, "Token expired"),
    }
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    record(&state, "/auth/logout", &headers);
    let mut guard = state.lock().unwrap();

    if let Some(token) = bearer(&headers) {
        guard.sessions.remove(&token);
    }
    (StatusCode::OK, Json(json!({ "success": true })))
}

async fn modules(State(state): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    record(&state, "/modules", &headers);
    let guard = state.lock().unwrap();

    if bearer(&headers).map_or(true, |token| !guard.sessions.contains_key(&token)) {
        return fail(StatusCode::UNAUTHORIZED, "Token expired");
    }

    match &guard.modules {
        ModulesReply::List(rows) => ok(&guard, rows.clone()),
        ModulesReply::Status(code) => {
            let status = StatusCode::from_u16(*code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            fail(status, "Module listing failed")
        }
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    pub fn history(&self) -> Vec<Navigation> {
        self.history.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: Navigation) {
        self.history.lock().unwrap().push(target);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// The real client and session store wired against the mock
pub struct Harness {
    pub client: Arc<ApiClient>,
    pub tokens: Arc<MemoryTokenStore>,
    pub session: Arc<SessionStore>,
    pub navigator: Arc<RecordingNavigator>,
}

pub fn harness(backend: &MockBackend, tokens: MemoryTokenStore) -> Result<Harness> {
    let tokens = Arc::new(tokens);
    let client = Arc::new(ApiClient::new(&backend.base_url, Duration::from_secs(5), tokens.clone())?);
    let navigator = Arc::new(RecordingNavigator::default());

    let session = Arc::new(SessionStore::new(
        client.clone(),
        tokens.clone(),
        navigator.clone(),
        SessionRoutes::default(),
    ));
    session.register_unauthorized_handler(&client);

    Ok(Harness {
        client,
        tokens,
        session,
        navigator,
    })
}
