#![allow(dead_code)]

/// In-process stand-in for the remote store
///
/// Serves the same flat HTTP surface the client talks to, backed by a shared
/// map the tests can inspect or seed directly.

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use flatkv_client::{codec::encode_component, Client};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

pub type StoreData = Arc<Mutex<BTreeMap<String, String>>>;

/// Forced responses keyed by method and key; the listing uses the empty key
type Faults = Arc<Mutex<HashMap<(Method, String), StatusCode>>>;

#[derive(Clone, Default)]
struct StoreState {
    data: StoreData,
    faults: Faults,
}

impl StoreState {
    fn fault(&self, method: &Method, key: &str) -> Option<StatusCode> {
        self.faults.lock().unwrap().get(&(method.clone(), key.to_string())).copied()
    }
}

pub struct FakeStore {
    pub url: String,
    pub data: StoreData,
    faults: Faults,
    _handle: JoinHandle<()>,
}

impl FakeStore {
    pub fn client(&self) -> Client {
        Client::connect(self.url.clone()).unwrap()
    }

    /// Store text exactly as given, bypassing JSON encoding
    pub fn insert_raw(&self, key: &str, text: &str) {
        self.data.lock().unwrap().insert(key.to_string(), text.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.data.lock().unwrap().get(key).cloned()
    }

    /// Answer every `method` request for `key` with `status` from now on
    ///
    /// `POST` matches on the form key being written; `GET` with an empty key
    /// matches the key listing.
    pub fn fail(&self, method: Method, key: &str, status: StatusCode) {
        self.faults.lock().unwrap().insert((method, key.to_string()), status);
    }

    pub fn len(&self) -> usize {
        self.data.lock().unwrap().len()
    }
}

/// Start a fake store on an OS-assigned port
pub async fn start_fake_store() -> FakeStore {
    let state = StoreState::default();

    let app = Router::new()
        .route("/", get(list_keys).post(set_key))
        .route("/:key", get(get_key).delete(delete_key))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeStore {
        url: format!("http://{}", addr),
        data: state.data,
        faults: state.faults,
        _handle: handle,
    }
}

async fn list_keys(
    State(state): State<StoreState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(status) = state.fault(&Method::GET, "") {
        return status.into_response();
    }

    let prefix = params.get("prefix").cloned().unwrap_or_default();
    let encode = params.get("encode").map(|v| v == "true").unwrap_or(false);

    let data = state.data.lock().unwrap();
    data.keys()
        .filter(|key| key.starts_with(&prefix))
        .map(|key| if encode { encode_component(key) } else { key.clone() })
        .collect::<Vec<_>>()
        .join("\n")
        .into_response()
}

async fn set_key(State(state): State<StoreState>, Form(form): Form<HashMap<String, String>>) -> StatusCode {
    if let Some(status) = form.keys().find_map(|key| state.fault(&Method::POST, key)) {
        return status;
    }

    let mut data = state.data.lock().unwrap();
    for (key, value) in form {
        data.insert(key, value);
    }
    StatusCode::OK
}

async fn get_key(State(state): State<StoreState>, Path(key): Path<String>) -> Response {
    if let Some(status) = state.fault(&Method::GET, &key) {
        return status.into_response();
    }

    match state.data.lock().unwrap().get(&key) {
        Some(value) => value.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Missing keys answer `404`, as some store deployments do
async fn delete_key(State(state): State<StoreState>, Path(key): Path<String>) -> StatusCode {
    if let Some(status) = state.fault(&Method::DELETE, &key) {
        return status;
    }

    match state.data.lock().unwrap().remove(&key) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}
