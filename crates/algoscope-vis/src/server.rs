//! Axum web server with WebSocket streaming of visualizer views.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::cors::CorsLayer;

use algoscope_array::OperationInput;
use algoscope_store::{
    AnyVisualizer, ArrayCommand, ArrayVisualizerState, CatalogEntry, FileStore, KeyValueStore,
    SearchVisualizerState, SortVisualizerState, StoreConfig, TraceCommand, Visualizer,
    VisualizerKind, CATALOG,
};
use algoscope_trace::{Algorithm, AnyTrace, UnknownAlgorithm};

use crate::config::VisConfig;
use crate::session::{spawn_session, SessionHandle};

/// A running session of any visualizer kind.
#[derive(Clone)]
pub enum AnySession {
    Array(SessionHandle<ArrayVisualizerState>),
    Sort(SessionHandle<SortVisualizerState>),
    Search(SessionHandle<SearchVisualizerState>),
}

impl AnySession {
    /// Spawn a session for a visualizer built from the catalog.
    pub fn spawn(visualizer: AnyVisualizer, store: Option<Arc<dyn KeyValueStore>>) -> Self {
        match visualizer {
            AnyVisualizer::Array(state) => AnySession::Array(spawn_session(state, store)),
            AnyVisualizer::Sort(state) => AnySession::Sort(spawn_session(state, store)),
            AnyVisualizer::Search(state) => AnySession::Search(spawn_session(state, store)),
        }
    }

    pub fn kind(&self) -> VisualizerKind {
        match self {
            AnySession::Array(_) => VisualizerKind::BasicArrayOperations,
            AnySession::Sort(_) => VisualizerKind::BubbleSort,
            AnySession::Search(_) => VisualizerKind::LinearSearch,
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            AnySession::Array(session) => session.is_closed(),
            AnySession::Sort(session) => session.is_closed(),
            AnySession::Search(session) => session.is_closed(),
        }
    }

    fn view_response(&self) -> Response {
        match self {
            AnySession::Array(session) => Json(session.view()).into_response(),
            AnySession::Sort(session) => Json(session.view()).into_response(),
            AnySession::Search(session) => Json(session.view()).into_response(),
        }
    }

    /// Run the path action `action` with `body` and return the new view.
    async fn action(&self, action: &str, body: &[u8]) -> Result<Response, ApiError> {
        let with_target = accepts_target(self.kind());
        let response = match self {
            AnySession::Array(session) => {
                Json(session.request(array_command(action, body)?).await?).into_response()
            }
            AnySession::Sort(session) => {
                let command = trace_command(action, ActionBody::parse(body)?, with_target)?;
                Json(session.request(command).await?).into_response()
            }
            AnySession::Search(session) => {
                let command = trace_command(action, ActionBody::parse(body)?, with_target)?;
                Json(session.request(command).await?).into_response()
            }
        };
        Ok(response)
    }

    fn upgrade(&self, ws: WebSocketUpgrade) -> Response {
        match self.clone() {
            AnySession::Array(session) => ws.on_upgrade(move |socket| handle_ws(socket, session)),
            AnySession::Sort(session) => ws.on_upgrade(move |socket| handle_ws(socket, session)),
            AnySession::Search(session) => ws.on_upgrade(move |socket| handle_ws(socket, session)),
        }
    }
}

/// Whether the visualizer's algorithm takes a search target.
fn accepts_target(kind: VisualizerKind) -> bool {
    kind.entry()
        .algorithm
        .is_some_and(|algorithm| algorithm.needs_target())
}

/// Shared application state: one session per catalog entry.
pub struct AppState {
    config: StoreConfig,
    sessions: Vec<AnySession>,
}

impl AppState {
    /// Build and spawn every visualizer in [`CATALOG`]. Must be called inside
    /// a tokio runtime.
    pub fn new(config: &StoreConfig, store: Option<Arc<dyn KeyValueStore>>) -> Self {
        let sessions = CATALOG
            .iter()
            .map(|entry| AnySession::spawn((entry.factory)(config), store.clone()))
            .collect();
        Self {
            config: config.clone(),
            sessions,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn sessions(&self) -> &[AnySession] {
        &self.sessions
    }

    pub fn session(&self, kind: VisualizerKind) -> Option<&AnySession> {
        self.sessions.iter().find(|session| session.kind() == kind)
    }

    /// The session behind the route segment `name`.
    pub fn route(&self, name: &str) -> Result<&AnySession, ApiError> {
        VisualizerKind::from_route(name)
            .and_then(|kind| self.session(kind))
            .ok_or_else(|| ApiError::UnknownVisualizer(name.to_string()))
    }

    pub fn sort(&self) -> Option<&SessionHandle<SortVisualizerState>> {
        match self.session(VisualizerKind::BubbleSort)? {
            AnySession::Sort(session) => Some(session),
            _ => None,
        }
    }

    pub fn search(&self) -> Option<&SessionHandle<SearchVisualizerState>> {
        match self.session(VisualizerKind::LinearSearch)? {
            AnySession::Search(session) => Some(session),
            _ => None,
        }
    }

    pub fn array(&self) -> Option<&SessionHandle<ArrayVisualizerState>> {
        match self.session(VisualizerKind::BasicArrayOperations)? {
            AnySession::Array(session) => Some(session),
            _ => None,
        }
    }
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a server with sessions persisted under `config.data_dir`.
    pub fn new(config: &VisConfig) -> crate::Result<Self> {
        let store: Option<Arc<dyn KeyValueStore>> = match &config.data_dir {
            Some(dir) => {
                let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir)?);
                Some(store)
            }
            None => None,
        };
        Ok(Self::with_store(&config.store_config(), store))
    }

    pub fn with_store(config: &StoreConfig, store: Option<Arc<dyn KeyValueStore>>) -> Self {
        Self {
            state: Arc::new(AppState::new(config, store)),
        }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/api/visualizers", get(catalog_handler))
            .route("/api/visualizers/{label}", get(visualizer_handler))
            .route("/api/trace", post(trace_handler))
            // One view and action route per catalog entry
            .route("/api/{name}", get(view_handler))
            .route("/api/{name}/{action}", post(action_handler))
            // WebSocket for live views
            .route("/ws/{name}", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on `addr`.
    pub async fn serve(self, addr: SocketAddr) -> crate::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("AlgoScope server running on http://{}", addr);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unknown visualizer: {0}")]
    UnknownVisualizer(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error(transparent)]
    UnknownAlgorithm(#[from] UnknownAlgorithm),

    #[error("Array of {len} elements exceeds the maximum of {max}")]
    TooLarge { len: usize, max: usize },

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {0}")]
    InvalidField(&'static str),

    #[error("Invalid body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error(transparent)]
    Session(#[from] crate::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::UnknownVisualizer(_) | ApiError::UnknownAction(_) => StatusCode::NOT_FOUND,
            ApiError::UnknownAlgorithm(_)
            | ApiError::MissingField(_)
            | ApiError::InvalidField(_)
            | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Session(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn catalog_handler() -> Json<&'static [CatalogEntry]> {
    Json(&CATALOG[..])
}

/// Resolve a menu label; unknown labels get the basic array operations entry.
async fn visualizer_handler(Path(label): Path<String>) -> Json<&'static CatalogEntry> {
    Json(VisualizerKind::from_label(&label).entry())
}

/// Body of `POST /api/trace`.
#[derive(Debug, Deserialize)]
pub struct TraceRequest {
    /// Algorithm name, parsed loosely (`"Bubble Sort"`, `"bubble_sort"`).
    pub algorithm: String,
    pub array: Vec<i64>,
    pub target: Option<i64>,
}

/// Generate a full trace without touching any session.
async fn trace_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TraceRequest>,
) -> Result<Json<AnyTrace>, ApiError> {
    let algorithm: Algorithm = request.algorithm.parse()?;
    let limits = match algorithm {
        Algorithm::BubbleSort => &state.config().sort,
        Algorithm::LinearSearch => &state.config().search,
    };
    if request.array.len() > limits.size.max {
        return Err(ApiError::TooLarge {
            len: request.array.len(),
            max: limits.size.max,
        });
    }
    let target = match (algorithm.needs_target(), request.target) {
        (true, None) => return Err(ApiError::MissingField("target")),
        (_, target) => target.unwrap_or_default(),
    };
    Ok(Json(algorithm.generate(&request.array, target)))
}

/// Optional parameters of a trace action. Every field is optional so that
/// an empty body works for the actions that take none.
#[derive(Debug, Default, Deserialize)]
pub struct ActionBody {
    /// `"forward"` (default) or `"backward"`.
    pub direction: Option<String>,
    pub position: Option<usize>,
    pub speed: Option<f64>,
    pub array: Option<Vec<i64>>,
    pub size: Option<usize>,
    pub target: Option<i64>,
}

impl ActionBody {
    fn parse(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(body)?)
    }
}

/// Map a path action plus body onto a command. `target` is only accepted
/// when `with_target` is set.
pub fn trace_command(action: &str, body: ActionBody, with_target: bool) -> Result<TraceCommand, ApiError> {
    let command = match action {
        "start" => TraceCommand::Start,
        "pause" => TraceCommand::Pause,
        "resume" => TraceCommand::Resume,
        "reset" => TraceCommand::Reset,
        "step" => match body.direction.as_deref() {
            Some("backward") | Some("back") => TraceCommand::StepBackward,
            Some("forward") | None => TraceCommand::StepForward,
            Some(_) => return Err(ApiError::InvalidField("direction")),
        },
        "seek" => TraceCommand::Seek {
            position: body.position.ok_or(ApiError::MissingField("position"))?,
        },
        "speed" => TraceCommand::SetSpeed {
            speed: body.speed.ok_or(ApiError::MissingField("speed"))?,
        },
        "array" => TraceCommand::SetArray {
            array: body.array.ok_or(ApiError::MissingField("array"))?,
        },
        "generate" => TraceCommand::GenerateArray { size: body.size },
        "size" => TraceCommand::SetArraySize {
            size: body.size.ok_or(ApiError::MissingField("size"))?,
        },
        "target" if with_target => TraceCommand::SetTarget {
            target: body.target.ok_or(ApiError::MissingField("target"))?,
        },
        other => return Err(ApiError::UnknownAction(other.to_string())),
    };
    Ok(command)
}

/// Map an array action onto a command. `operation` takes an
/// [`OperationInput`] body.
fn array_command(action: &str, body: &[u8]) -> Result<ArrayCommand, ApiError> {
    match action {
        "operation" => Ok(ArrayCommand::Run(serde_json::from_slice::<OperationInput>(body)?)),
        "dismiss" => Ok(ArrayCommand::DismissAlert),
        other => Err(ApiError::UnknownAction(other.to_string())),
    }
}

async fn view_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    Ok(state.route(&name)?.view_response())
}

async fn action_handler(
    State(state): State<Arc<AppState>>,
    Path((name, action)): Path<(String, String)>,
    body: Bytes,
) -> Result<Response, ApiError> {
    state.route(&name)?.action(&action, &body).await
}

/// WebSocket upgrade for `/ws/{name}`, one per catalog route.
async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.route(&name) {
        Ok(session) => session.upgrade(ws),
        Err(e) => e.into_response(),
    }
}

/// Push every view change to the client and forward its commands.
async fn handle_ws<V: Visualizer>(mut socket: WebSocket, session: SessionHandle<V>) {
    let mut views = session.subscribe();
    let view = views.borrow_and_update().clone();
    if send_json(&mut socket, &view).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                if send_json(&mut socket, &view).await.is_err() {
                    break;
                }
            }
            msg = socket.recv() => match msg {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<V::Command>(text.as_str()) {
                        // The resulting view arrives through `views`.
                        Ok(command) => {
                            if session.request(command).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            let error = ErrorResponse { error: format!("Invalid command: {e}") };
                            if send_json(&mut socket, &error).await.is_err() {
                                break;
                            }
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
    }
    tracing::debug!("websocket closed");
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> Result<(), axum::Error> {
    match serde_json::to_string(value) {
        Ok(json) => socket.send(Message::Text(json.into())).await,
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode websocket message");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algoscope_playback::PlaybackState;
    use algoscope_store::MemoryStore;

    fn server() -> VisServer {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        VisServer::with_store(&StoreConfig::default(), Some(store))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn server_creation() {
        let server = server();
        assert_eq!(server.state().sessions().len(), CATALOG.len());
        assert!(!server.state().sort().unwrap().is_closed());
    }

    #[tokio::test]
    async fn router_builds() {
        let _router = server().router();
    }

    #[tokio::test]
    async fn every_catalog_entry_gets_a_route() {
        let server = server();
        for entry in &CATALOG {
            let session = server.state().route(entry.route).unwrap();
            assert_eq!(session.kind(), entry.kind);
            assert!(!session.is_closed());
        }
        assert!(matches!(
            server.state().route("quicksort"),
            Err(ApiError::UnknownVisualizer(_))
        ));
    }

    #[tokio::test]
    async fn server_from_config_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = VisConfig::default().with_data_dir(Some(dir.path().join("data")));
        let server = tokio_test::assert_ok!(VisServer::new(&config));
        let sort = server.state().sort().unwrap().clone();
        sort.request(TraceCommand::SetArray { array: vec![2, 1] })
            .await
            .unwrap();

        drop(server);
        sort.shutdown().await;
        assert!(dir.path().join("data").join("bubbleSort.json").exists());
    }

    #[test]
    fn actions_map_to_commands() {
        let body = |json: &str| ActionBody::parse(json.as_bytes()).unwrap();

        assert_eq!(trace_command("start", body(""), false).unwrap(), TraceCommand::Start);
        assert_eq!(
            trace_command("step", body(r#"{"direction":"backward"}"#), false).unwrap(),
            TraceCommand::StepBackward
        );
        assert_eq!(trace_command("step", body("{}"), false).unwrap(), TraceCommand::StepForward);
        assert_eq!(
            trace_command("seek", body(r#"{"position":4}"#), false).unwrap(),
            TraceCommand::Seek { position: 4 }
        );
        assert_eq!(
            trace_command("generate", body(""), false).unwrap(),
            TraceCommand::GenerateArray { size: None }
        );
        assert_eq!(
            trace_command("target", body(r#"{"target":7}"#), true).unwrap(),
            TraceCommand::SetTarget { target: 7 }
        );
        assert_eq!(
            array_command("dismiss", b"").unwrap(),
            ArrayCommand::DismissAlert
        );
    }

    #[test]
    fn bad_actions_are_rejected() {
        assert!(matches!(
            trace_command("target", ActionBody::default(), false),
            Err(ApiError::UnknownAction(_))
        ));
        assert!(matches!(
            trace_command("seek", ActionBody::default(), true),
            Err(ApiError::MissingField("position"))
        ));
        assert!(matches!(
            ActionBody::parse(b"{not json"),
            Err(ApiError::InvalidBody(_))
        ));
        assert!(matches!(
            array_command("operation", b"{}"),
            Err(ApiError::InvalidBody(_))
        ));
        assert!(matches!(array_command("start", b""), Err(ApiError::UnknownAction(_))));
    }

    #[test]
    fn only_search_takes_a_target() {
        assert!(accepts_target(VisualizerKind::LinearSearch));
        assert!(!accepts_target(VisualizerKind::BubbleSort));
        assert!(!accepts_target(VisualizerKind::BasicArrayOperations));
    }

    #[tokio::test]
    async fn handlers_drive_sessions() {
        let server = server();
        let state = server.state().clone();
        let act = |name: &str, action: &str, body: &'static [u8]| {
            action_handler(
                State(state.clone()),
                Path((name.to_string(), action.to_string())),
                Bytes::from_static(body),
            )
        };

        act("sort", "array", br#"{"array":[3,2,1]}"#).await.unwrap();
        act("sort", "step", b"").await.unwrap();
        let view = state.sort().unwrap().view();
        assert_eq!(view.playback.position, 1);
        assert_eq!(view.playback.state, PlaybackState::Idle);

        act("search", "target", br#"{"target":5}"#).await.unwrap();
        assert_eq!(state.search().unwrap().view().target, 5);
        assert!(matches!(
            act("sort", "target", br#"{"target":5}"#).await,
            Err(ApiError::UnknownAction(_))
        ));

        act("array", "operation", br#"{"kind":"clear"}"#).await.unwrap();
        let alert = state.array().unwrap().view().alert.unwrap();
        assert!(alert.is_error);

        let response = view_handler(State(state.clone()), Path("array".to_string()))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["alert"]["is_error"], true);

        assert!(matches!(
            act("heap", "start", b"").await,
            Err(ApiError::UnknownVisualizer(_))
        ));
    }

    #[tokio::test]
    async fn labels_resolve_to_catalog_entries() {
        let Json(entry) = visualizer_handler(Path("Linear Search".to_string())).await;
        assert_eq!(entry.kind, VisualizerKind::LinearSearch);

        let Json(entry) = visualizer_handler(Path("Merge Sort".to_string())).await;
        assert_eq!(entry.kind, VisualizerKind::BasicArrayOperations);
    }

    #[tokio::test]
    async fn trace_endpoint_generates_traces() {
        let server = server();
        let request = |algorithm: &str, array: Vec<i64>, target: Option<i64>| {
            trace_handler(
                State(server.state().clone()),
                Json(TraceRequest {
                    algorithm: algorithm.to_string(),
                    array,
                    target,
                }),
            )
        };

        let Json(trace) = request("Bubble Sort", vec![2, 1], None).await.unwrap();
        assert_eq!(trace.algorithm(), Algorithm::BubbleSort);
        assert_eq!(trace.len(), 3);

        let Json(trace) = request("linear_search", vec![4, 5], Some(5)).await.unwrap();
        assert!(matches!(trace, AnyTrace::Search(ref steps) if steps.len() == 2));

        assert!(matches!(
            request("linear search", vec![4], None).await,
            Err(ApiError::MissingField("target"))
        ));
        assert!(matches!(
            request("heap sort", vec![1], None).await,
            Err(ApiError::UnknownAlgorithm(_))
        ));
        assert!(matches!(
            request("bubble sort", vec![0; 201], None).await,
            Err(ApiError::TooLarge { len: 201, max: 200 })
        ));
    }
}
