//! In-process fake of the Story Spoiler API.
//!
//! Implements the documented contract over an in-memory map so the
//! scenario can run without the remote service.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, missing_docs)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::json;
use spoiler_domain::story::messages;
use spoiler_domain::{ApiMessage, Credentials, StoryDraft};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

pub const USERNAME: &str = "reader";
pub const PASSWORD: &str = "correct horse";
pub const TOKEN: &str = "fake-jwt-token";

/// Knobs for misbehaving variants of the service.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeOptions {
    /// Answer a valid login with a body that has no `accessToken`.
    pub omit_token: bool,
    /// Answer every valid create with 500 and no id.
    pub break_create: bool,
}

#[derive(Default)]
struct FakeState {
    options: FakeOptions,
    stories: HashMap<String, StoryDraft>,
    calls: Vec<String>,
}

#[derive(Clone)]
struct Shared(Arc<Mutex<FakeState>>);

impl Shared {
    fn record(&self, call: String) {
        self.0.lock().unwrap().calls.push(call);
    }
}

/// A running fake server; shut down on drop.
pub struct FakeServer {
    pub base_url: Url,
    state: Shared,
    handle: JoinHandle<()>,
}

impl FakeServer {
    pub async fn start() -> Self {
        Self::start_with(FakeOptions::default()).await
    }

    pub async fn start_with(options: FakeOptions) -> Self {
        let state = Shared(Arc::new(Mutex::new(FakeState {
            options,
            ..FakeState::default()
        })));

        let app = Router::new()
            .route("/api/User/Authentication", post(authenticate))
            .route("/api/Story/Create", post(create))
            .route("/api/Story/Edit/{id}", put(edit))
            .route("/api/Story/All", get(list))
            .route("/api/Story/Delete/{id}", delete(remove))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/api")).unwrap(),
            state,
            handle,
        }
    }

    pub fn credentials() -> Credentials {
        Credentials::new(USERNAME, PASSWORD)
    }

    /// Calls received so far, as `METHOD /path`.
    pub fn calls(&self) -> Vec<String> {
        self.state.0.lock().unwrap().calls.clone()
    }

    pub fn stories(&self) -> HashMap<String, StoryDraft> {
        self.state.0.lock().unwrap().stories.clone()
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"msg": "Unauthorized"}))).into_response()
}

async fn authenticate(State(state): State<Shared>, Json(creds): Json<Credentials>) -> Response {
    state.record("POST /User/Authentication".to_string());
    if creds.username != USERNAME || creds.password != PASSWORD {
        return unauthorized();
    }
    if state.0.lock().unwrap().options.omit_token {
        return (StatusCode::OK, Json(json!({"username": USERNAME}))).into_response();
    }
    (StatusCode::OK, Json(json!({"accessToken": TOKEN}))).into_response()
}

async fn create(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(draft): Json<StoryDraft>,
) -> Response {
    state.record("POST /Story/Create".to_string());
    if !authorized(&headers) {
        return unauthorized();
    }
    if !draft.is_complete() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"errors": {"Title": ["required"], "Description": ["required"]}})),
        )
            .into_response();
    }

    let mut guard = state.0.lock().unwrap();
    if guard.options.break_create {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"msg": "boom"}))).into_response();
    }
    let id = uuid::Uuid::new_v4().to_string();
    guard.stories.insert(id.clone(), draft);
    (StatusCode::CREATED, Json(ApiMessage::created(id))).into_response()
}

async fn edit(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(draft): Json<StoryDraft>,
) -> Response {
    state.record(format!("PUT /Story/Edit/{id}"));
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut guard = state.0.lock().unwrap();
    match guard.stories.get_mut(&id) {
        Some(story) => {
            *story = draft;
            (StatusCode::OK, Json(ApiMessage::message(messages::EDITED))).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiMessage::message(messages::NOT_FOUND)),
        )
            .into_response(),
    }
}

async fn list(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.record("GET /Story/All".to_string());
    if !authorized(&headers) {
        return unauthorized();
    }

    let guard = state.0.lock().unwrap();
    let stories: Vec<_> = guard
        .stories
        .iter()
        .map(|(id, s)| json!({"id": id, "title": s.title, "description": s.description}))
        .collect();
    (StatusCode::OK, Json(stories)).into_response()
}

async fn remove(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.record(format!("DELETE /Story/Delete/{id}"));
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut guard = state.0.lock().unwrap();
    if guard.stories.remove(&id).is_some() {
        (StatusCode::OK, Json(ApiMessage::message(messages::DELETED))).into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiMessage::message(messages::DELETE_FAILED)),
        )
            .into_response()
    }
}
