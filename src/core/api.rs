//! HTTP + WebSocket API for GOSP
//!
//! Endpoints:
//! - GET /health - Health check
//! - GET /catalog - Residues, bonds, voids, templates, orphan data
//! - POST /session/new - Create new session
//! - GET /session/{id} - Snapshot, revision, fingerprint, derived values
//! - DELETE /session/{id} - Drop a session (open sockets are closed)
//! - GET /session/{id}/transitions - Legal DSM targets
//! - POST /session/{id}/dispatch - Apply a JSON intent
//! - POST /session/{id}/click - Snap a picked point and place
//! - POST /lock/new - Create lock verification
//! - GET /lock/{id} - Lock state and context
//! - DELETE /lock/{id} - Drop a lock verification
//! - POST /lock/{id}/event - Send IDENTIFY_VOID / VERIFY_MA
//! - WS /ws/{id} - Live snapshots, intents as text frames

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State, WebSocketUpgrade, ws::{Message, WebSocket}},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::core::catalog::Catalog;
use crate::core::dsm::valid_transitions;
use crate::core::lock_machine::LockMachine;
use crate::core::placement::snap_placement;
use crate::core::reducer::TimestampIds;
use crate::core::store::{SessionStore, SessionView};
use crate::types::geometry::Point3;
use crate::types::{
    orphan_protein, DsmState, HydrogenBond, LockEvent, LockOutput, OrphanProtein, ReasonCode,
    Residue, SessionState, StabilizerTemplate, Void,
};
use crate::{GospError, Result};

/// One GOSP session
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub store: SessionStore,
    pub update_tx: broadcast::Sender<SessionView>,
}

/// App state
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub sessions: RwLock<HashMap<String, Session>>,
    pub locks: RwLock<HashMap<String, LockMachine>>,
    next_id: AtomicU64,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            sessions: RwLock::new(HashMap::new()),
            locks: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn generate_id(&self, prefix: &str) -> String {
        let seq = self.next_id.fetch_add(1, Ordering::Relaxed);
        let millis = chrono::Utc::now().timestamp_millis();
        format!("{}_{:x}_{}", prefix, millis, seq)
    }
}

/// Create new session response
#[derive(Debug, Serialize, Deserialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub view: SessionView,
}

#[derive(Debug, Serialize)]
pub struct TransitionsResponse {
    pub session_id: String,
    pub from: DsmState,
    pub transitions: Vec<DsmState>,
}

/// Outcome of one intent
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResponse {
    pub applied: bool,
    pub reason: ReasonCode,
    pub message: &'static str,
    pub revision: u64,
    pub state: Arc<SessionState>,
}

#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub point: Point3,
}

#[derive(Debug, Serialize)]
pub struct ClickResponse {
    /// Did the point snap to a dehydron?
    pub snapped: bool,
    pub target: Option<String>,
    pub result: Option<DispatchResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewLockResponse {
    pub lock_id: String,
}

/// Bond with its dehydron flag spelled out
#[derive(Debug, Serialize)]
pub struct BondEntry {
    #[serde(flatten)]
    pub bond: HydrogenBond,
    pub is_dehydron: bool,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub residues: Vec<Residue>,
    pub bonds: Vec<BondEntry>,
    pub dehydron_ids: Vec<String>,
    pub voids: Vec<Void>,
    pub templates: Vec<StabilizerTemplate>,
    pub orphan: &'static OrphanProtein,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
    pub locks_active: usize,
}

/// Frames pushed over the WebSocket
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WsMessage {
    Snapshot(SessionView),
    Outcome(DispatchResponse),
    Error { message: String },
}

/// Create the API router
pub fn create_router(catalog: Arc<Catalog>) -> Router {
    let state = Arc::new(AppState::new(catalog));

    Router::new()
        .route("/health", get(health))
        .route("/catalog", get(get_catalog))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session).delete(delete_session))
        .route("/session/:id/transitions", get(get_transitions))
        .route("/session/:id/dispatch", post(dispatch))
        .route("/session/:id/click", post(click))
        .route("/lock/new", post(create_lock))
        .route("/lock/:id", get(get_lock).delete(delete_lock))
        .route("/lock/:id/event", post(lock_event))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await.len();
    let locks = state.locks.read().await.len();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions,
        locks_active: locks,
    })
}

async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    let catalog = &state.catalog;
    Json(CatalogResponse {
        residues: catalog.residues().to_vec(),
        bonds: catalog
            .bonds()
            .iter()
            .map(|b| BondEntry { bond: b.clone(), is_dehydron: b.is_dehydron() })
            .collect(),
        dehydron_ids: catalog.dehydron_ids().into_iter().map(str::to_string).collect(),
        voids: catalog.voids().to_vec(),
        templates: catalog.templates(),
        orphan: orphan_protein(),
    })
}

/// Create new session
async fn create_session(State(state): State<Arc<AppState>>) -> Json<NewSessionResponse> {
    let session_id = state.generate_id("session");
    let (tx, _) = broadcast::channel(100);

    let session = Session {
        id: session_id.clone(),
        store: SessionStore::with_ids(Arc::clone(&state.catalog), TimestampIds::default()),
        update_tx: tx,
    };

    state.sessions.write().await.insert(session_id.clone(), session);
    info!(session = %session_id, "session created");

    Json(NewSessionResponse {
        websocket_url: format!("/ws/{}", session_id),
        session_id,
    })
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> std::result::Result<Json<SessionStatusResponse>, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let view = session.store.view().map_err(internal)?;
    Ok(Json(SessionStatusResponse { session_id: id, view }))
}

/// Remove a session; dropping its sender ends every socket subscribed to it
async fn delete_session(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> StatusCode {
    match state.sessions.write().await.remove(&id) {
        Some(_) => {
            info!(session = %id, "session deleted");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn get_transitions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> std::result::Result<Json<TransitionsResponse>, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let from = session.store.state().dsm_state;
    Ok(Json(TransitionsResponse {
        session_id: id,
        from,
        transitions: valid_transitions(from).to_vec(),
    }))
}

/// Apply one JSON intent. Unknown intent types are answered with
/// `applied: false`; bodies that are not JSON at all are rejected.
async fn dispatch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: String,
) -> std::result::Result<Json<DispatchResponse>, StatusCode> {
    let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
        debug!(session = %id, error = %e, "malformed intent body");
        StatusCode::BAD_REQUEST
    })?;
    let response = apply_intent(&state, &id, value)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(response))
}

async fn click(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: String,
) -> std::result::Result<Json<ClickResponse>, StatusCode> {
    let req: ClickRequest = serde_json::from_str(&body).map_err(|_| StatusCode::BAD_REQUEST)?;

    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;

    let Some(intent) = snap_placement(session.store.state(), &state.catalog, req.point) else {
        return Ok(Json(ClickResponse { snapped: false, target: None, result: None }));
    };
    let target = match &intent {
        crate::types::Intent::PlaceStabilizer(req) => Some(req.target_dehydron_id.clone()),
        _ => None,
    };
    let output = session.store.dispatch(&intent);
    publish(session, output.applied);
    Ok(Json(ClickResponse {
        snapped: true,
        target,
        result: Some(dispatch_response(&session.store, output.reason)),
    }))
}

async fn create_lock(State(state): State<Arc<AppState>>) -> Json<NewLockResponse> {
    let lock_id = state.generate_id("lock");
    state.locks.write().await.insert(lock_id.clone(), LockMachine::new());
    info!(lock = %lock_id, "lock verification created");
    Json(NewLockResponse { lock_id })
}

async fn get_lock(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> std::result::Result<Json<LockOutput>, StatusCode> {
    let locks = state.locks.read().await;
    let machine = locks.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(machine.current_output()))
}

async fn delete_lock(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> StatusCode {
    match state.locks.write().await.remove(&id) {
        Some(_) => {
            info!(lock = %id, "lock verification deleted");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn lock_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: String,
) -> std::result::Result<Json<LockOutput>, StatusCode> {
    let event: LockEvent = serde_json::from_str(&body).map_err(|_| StatusCode::BAD_REQUEST)?;
    let mut locks = state.locks.write().await;
    let machine = locks.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(machine.send(event)))
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> std::result::Result<impl IntoResponse, StatusCode> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let rx = session.update_tx.subscribe();
    let initial = session.store.view().map_err(internal)?;
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, state, id, initial, rx).await;
    }))
}

/// Push snapshots out, feed text frames in as intents
async fn handle_websocket(
    socket: WebSocket,
    state: Arc<AppState>,
    id: String,
    initial: SessionView,
    mut rx: broadcast::Receiver<SessionView>,
) {
    let (mut sender, mut receiver) = socket.split();

    if send_frame(&mut sender, &WsMessage::Snapshot(initial)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            update = rx.recv() => match update {
                Ok(view) => {
                    if send_frame(&mut sender, &WsMessage::Snapshot(view)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(session = %id, skipped, "websocket client lagging");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let reply = match serde_json::from_str::<serde_json::Value>(&text) {
                        Ok(value) => match apply_intent(&state, &id, value).await {
                            Some(outcome) => WsMessage::Outcome(outcome),
                            None => break,
                        },
                        Err(e) => WsMessage::Error { message: format!("malformed intent: {}", e) },
                    };
                    if send_frame(&mut sender, &reply).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(session = %id, error = %e, "websocket receive failed");
                    break;
                }
            },
        }
    }
    debug!(session = %id, "websocket closed");
}

async fn send_frame<S>(sender: &mut S, message: &WsMessage) -> std::result::Result<(), ()>
where
    S: futures_util::Sink<Message> + Unpin,
{
    let json = serde_json::to_string(message).map_err(|_| ())?;
    sender.send(Message::Text(json)).await.map_err(|_| ())
}

/// Dispatch into session `id`; `None` when the session does not exist
async fn apply_intent(state: &AppState, id: &str, value: serde_json::Value) -> Option<DispatchResponse> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(id)?;
    let output = session.store.dispatch_json(value);
    publish(session, output.applied);
    Some(dispatch_response(&session.store, output.reason))
}

fn publish(session: &Session, applied: bool) {
    if !applied {
        return;
    }
    match session.store.view() {
        // No subscribers is fine
        Ok(view) => {
            let _ = session.update_tx.send(view);
        }
        Err(e) => warn!(session = %session.id, error = %e, "snapshot not published"),
    }
}

fn dispatch_response(store: &SessionStore, reason: ReasonCode) -> DispatchResponse {
    DispatchResponse {
        applied: reason.is_applied(),
        reason,
        message: reason.description(),
        revision: store.revision(),
        state: store.snapshot(),
    }
}

fn internal(e: GospError) -> StatusCode {
    warn!(error = %e, "request failed");
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Run the API server
pub async fn run_server(addr: SocketAddr, catalog: Arc<Catalog>) -> Result<()> {
    let router = create_router(catalog);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| GospError::Server(format!("cannot bind {}: {}", addr, e)))?;
    info!(%addr, "GOSP API listening");
    axum::serve(listener, router)
        .await
        .map_err(|e| GospError::Server(e.to_string()))
}
