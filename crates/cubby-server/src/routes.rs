//! HTTP surface.
//!
//! Every handler is a thin shim: authenticate via [`Session`], call one
//! vault or auth operation, shape the result as JSON. Status codes come
//! from [`ApiError`]'s `From` impls; handlers never match on error variants.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{delete, get, post, put};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use cubby_auth::Authority;
use cubby_kernel::Vault;
use cubby_types::DirEntry;

use crate::error::ApiError;
use crate::extract::Session;
use crate::voice::{VoiceControl, VoiceStatus};

/// Shared handles every handler reaches through `State`.
#[derive(Clone)]
pub struct AppState {
    pub vault: Arc<Vault>,
    pub auth: Arc<dyn Authority>,
    pub voice: Arc<VoiceControl>,
}

impl AppState {
    pub fn new(vault: Vault, auth: impl Authority + 'static, voice: VoiceControl) -> Self {
        Self {
            vault: Arc::new(vault),
            auth: Arc::new(auth),
            voice: Arc::new(voice),
        }
    }
}

/// The full route table. CORS is permissive; the desktop client is
/// served from a different origin.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/ls", get(ls))
        .route("/pwd", get(pwd))
        .route("/mkdir/{name}", post(mkdir))
        .route("/rmdir/{name}", delete(rmdir))
        .route("/create-file/{name}", post(create_file))
        .route("/read-file/{name}", get(read_file))
        .route("/edit-file/{name}", put(edit_file))
        .route("/append-file/{name}", put(append_file))
        .route("/delete-file/{name}", delete(delete_file))
        .route("/rename/{old}/{new}", post(rename))
        .route("/cd/{name}", post(cd))
        .route("/cd-up", post(cd_up))
        .route("/cd-home", post(cd_home))
        .route("/voice/start", post(voice_start))
        .route("/voice/stop", post(voice_stop))
        .route("/voice/status", get(voice_status))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ════════════════════════════════════════════════════════════════════
// Request bodies
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Debug, Default, Deserialize)]
struct ContentBody {
    #[serde(default)]
    content: String,
}

// ════════════════════════════════════════════════════════════════════
// Accounts
// ════════════════════════════════════════════════════════════════════

async fn signup(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .auth
        .register(&creds.username, &creds.password)
        .await?;
    // Provision the private root up front so the first login lands in it.
    state.vault.go_home(&creds.username).await?;
    Ok((StatusCode::CREATED, Json(json!({ "status": "created" }))))
}

async fn login(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<Json<Value>, ApiError> {
    let token = state.auth.login(&creds.username, &creds.password).await?;
    // Each login starts back at the private root.
    state.vault.go_home(&creds.username).await?;
    Ok(Json(json!({ "token": token })))
}

async fn logout(State(state): State<AppState>, session: Session) -> Json<Value> {
    state.auth.revoke(&session.token).await;
    Json(json!({ "status": "ok" }))
}

// ════════════════════════════════════════════════════════════════════
// Directory operations
// ════════════════════════════════════════════════════════════════════

async fn ls(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<DirEntry>>, ApiError> {
    Ok(Json(state.vault.list(&session.identity).await?))
}

async fn pwd(State(state): State<AppState>, session: Session) -> Result<Json<Value>, ApiError> {
    let path = state.vault.current_directory(&session.identity).await?;
    Ok(Json(json!({ "path": path })))
}

async fn mkdir(
    State(state): State<AppState>,
    session: Session,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.vault.make_directory(&session.identity, &name).await?;
    Ok((StatusCode::CREATED, Json(json!({ "status": "created" }))))
}

async fn rmdir(
    State(state): State<AppState>,
    session: Session,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .vault
        .remove_directory(&session.identity, &name)
        .await?;
    Ok(Json(json!({ "status": "ok" })))
}

// ════════════════════════════════════════════════════════════════════
// File operations
// ════════════════════════════════════════════════════════════════════

async fn create_file(
    State(state): State<AppState>,
    session: Session,
    Path(name): Path<String>,
    body: Option<Json<ContentBody>>,
) -> Result<impl IntoResponse, ApiError> {
    let content = body.map(|Json(b)| b.content).unwrap_or_default();
    state
        .vault
        .create_file(&session.identity, &name, content.as_bytes())
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "status": "created" }))))
}

async fn read_file(
    State(state): State<AppState>,
    session: Session,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let bytes = state.vault.read_file(&session.identity, &name).await?;
    let content = String::from_utf8_lossy(&bytes).into_owned();
    Ok(Json(json!({ "content": content })))
}

async fn edit_file(
    State(state): State<AppState>,
    session: Session,
    Path(name): Path<String>,
    Json(body): Json<ContentBody>,
) -> Result<Json<Value>, ApiError> {
    state
        .vault
        .write_file(&session.identity, &name, body.content.as_bytes())
        .await?;
    Ok(Json(json!({ "status": "ok" })))
}

async fn append_file(
    State(state): State<AppState>,
    session: Session,
    Path(name): Path<String>,
    Json(body): Json<ContentBody>,
) -> Result<Json<Value>, ApiError> {
    state
        .vault
        .append_file(&session.identity, &name, body.content.as_bytes())
        .await?;
    Ok(Json(json!({ "status": "ok" })))
}

async fn delete_file(
    State(state): State<AppState>,
    session: Session,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.vault.delete_file(&session.identity, &name).await?;
    Ok(Json(json!({ "status": "ok" })))
}

async fn rename(
    State(state): State<AppState>,
    session: Session,
    Path((old, new)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    state.vault.rename(&session.identity, &old, &new).await?;
    Ok(Json(json!({ "status": "ok" })))
}

// ════════════════════════════════════════════════════════════════════
// Navigation
// ════════════════════════════════════════════════════════════════════

async fn cd(
    State(state): State<AppState>,
    session: Session,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let path = state
        .vault
        .change_directory(&session.identity, &name)
        .await?;
    Ok(Json(json!({ "path": path })))
}

async fn cd_up(State(state): State<AppState>, session: Session) -> Result<Json<Value>, ApiError> {
    let path = state.vault.move_up(&session.identity).await?;
    Ok(Json(json!({ "path": path })))
}

async fn cd_home(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Value>, ApiError> {
    let path = state.vault.go_home(&session.identity).await?;
    Ok(Json(json!({ "path": path })))
}

// ════════════════════════════════════════════════════════════════════
// Voice helper
// ════════════════════════════════════════════════════════════════════

async fn voice_start(
    State(state): State<AppState>,
    _session: Session,
) -> Result<Json<Value>, ApiError> {
    state.voice.start().await?;
    Ok(Json(json!({ "status": "started" })))
}

async fn voice_stop(State(state): State<AppState>, _session: Session) -> Json<Value> {
    state.voice.stop().await;
    Json(json!({ "status": "stopped" }))
}

async fn voice_status(State(state): State<AppState>, _session: Session) -> Json<VoiceStatus> {
    Json(state.voice.status().await)
}
