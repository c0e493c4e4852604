use std::{collections::HashMap, sync::Arc, sync::Mutex};

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{
        sse::{Event as SseEvent, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::auth::{IdentityProvider, Principal};
use crate::bus::EventBus;
use crate::error::Error;
use crate::language::Language;
use crate::message::Message;
use crate::session::{ChatSession, SessionState};
use crate::store::MessageStore;
use crate::translate::Translator;

// -----------------------------------------------------------------------------
// Request / response types
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub preferred_language: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Defaults to the other supported language when omitted.
    pub partner_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub session_id: String,
    pub user: Principal,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub user: Principal,
    pub user_language: Language,
    pub partner_language: Language,
    pub state: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_reply(e: Error) -> (StatusCode, Json<ErrorBody>) {
    let status = match &e {
        Error::EmptyMessage | Error::UnsupportedLanguage(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Authentication(_) => StatusCode::UNAUTHORIZED,
        Error::Translation(_) => StatusCode::BAD_GATEWAY,
        Error::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            error: e.to_string(),
        }),
    )
}

fn state_label(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "idle",
        SessionState::Translating => "translating",
    }
}

// -----------------------------------------------------------------------------
// Server state
// -----------------------------------------------------------------------------

pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn MessageStore>,
    pub translator: Arc<dyn Translator>,
    pub bus: Arc<EventBus>,
    pub sessions: Mutex<HashMap<String, Arc<ChatSession>>>,
}

// -----------------------------------------------------------------------------
// Implementation
// -----------------------------------------------------------------------------

pub struct HttpInterface {
    state: Arc<AppState>,
}

impl HttpInterface {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn MessageStore>,
        translator: Arc<dyn Translator>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                identity,
                store,
                translator,
                bus,
                sessions: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/auth/register", post(register_handler))
            .route("/auth/login", post(login_handler))
            .route(
                "/sessions/:id",
                get(session_handler).delete(close_session_handler),
            )
            .route(
                "/sessions/:id/messages",
                get(list_messages_handler).post(send_message_handler),
            )
            .route("/sessions/:id/events", get(events_handler))
            .with_state(self.state.clone())
            .layer(CorsLayer::permissive())
    }
}

fn find_session(
    state: &AppState,
    id: &str,
) -> Result<Arc<ChatSession>, (StatusCode, Json<ErrorBody>)> {
    let sessions = state.sessions.lock().unwrap();
    sessions.get(id).cloned().ok_or((
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: format!("No such session: {}", id),
        }),
    ))
}

// -----------------------------------------------------------------------------
// Handlers
// -----------------------------------------------------------------------------

async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Principal>, (StatusCode, Json<ErrorBody>)> {
    let language = Language::parse(&req.preferred_language).map_err(error_reply)?;
    let principal = state
        .identity
        .sign_up(&req.email, &req.password, language)
        .await
        .map_err(error_reply)?;

    info!("Registered {} ({})", principal.email, language);
    Ok(Json(principal))
}

async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ErrorBody>)> {
    let user = state
        .identity
        .sign_in(&req.email, &req.password)
        .await
        .map_err(error_reply)?;

    let partner_language = match &req.partner_language {
        Some(tag) => Language::parse(tag).map_err(error_reply)?,
        None => user.preferred_language.counterpart(),
    };

    let session = Arc::new(ChatSession::new(
        user.clone(),
        partner_language,
        state.store.clone(),
        state.translator.clone(),
        state.bus.clone(),
    ));
    let session_id = session.id().to_string();

    let mut sessions = state.sessions.lock().unwrap();
    sessions.insert(session_id.clone(), session);

    Ok(Json(LoginResponse { session_id, user }))
}

async fn session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionSummary>, (StatusCode, Json<ErrorBody>)> {
    let session = find_session(&state, &id)?;
    Ok(Json(SessionSummary {
        session_id: session.id().to_string(),
        user: session.user().clone(),
        user_language: session.user_language(),
        partner_language: session.partner_language(),
        state: state_label(session.state()),
    }))
}

async fn list_messages_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Message>>, (StatusCode, Json<ErrorBody>)> {
    let session = find_session(&state, &id)?;
    let messages = session.messages().await.map_err(error_reply)?;
    Ok(Json(messages))
}

async fn send_message_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SendRequest>,
) -> Result<Json<Message>, (StatusCode, Json<ErrorBody>)> {
    let session = find_session(&state, &id)?;
    let stored = session.send(&req.text).await.map_err(error_reply)?;
    Ok(Json(stored))
}

async fn close_session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let removed = {
        let mut sessions = state.sessions.lock().unwrap();
        sessions.remove(&id)
    };

    match removed {
        Some(session) => {
            info!("Session {} closed", session.id());
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn events_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, axum::BoxError>>>, (StatusCode, Json<ErrorBody>)>
{
    // 404 for unknown sessions; the stream itself carries all bus events.
    find_session(&state, &id)?;
    info!("New event stream for session {}", id);

    let mut rx = state.bus.subscribe();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    match serde_json::to_string(&event) {
                        Ok(data) => yield Ok(SseEvent::default().data(data)),
                        Err(e) => yield Err(axum::BoxError::from(e)),
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    // Slow consumer missed events; newer ones still flow.
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(axum::response::sse::KeepAlive::default()))
}
