use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

pub const DEFAULT_API_KEY: &str = "test-api-key";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocumentData {
    pub document_type: String,
    pub document_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionBody {
    pub api_key: Option<String>,
    pub session_data: Option<SessionData>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionReply {
    pub session_id: Uuid,
    pub token: String,
    pub url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDataBody {
    pub api_key: Option<String>,
    pub token: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDataReply {
    pub session_data: SessionData,
    pub parsed_document_data: ParsedDocumentData,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetStatusBody {
    pub api_key: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetStatusReply {
    pub status: String,
    pub token: String,
}

/// A session started through `/kyc/start-session`, keyed by token.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: Uuid,
    /// Position in start order; get-status reports the most recent session.
    pub seq: usize,
    pub data: SessionData,
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl AppState {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: Arc::from(api_key),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

type Rejection = (StatusCode, Json<Value>);

pub fn app() -> Router {
    app_with_key(DEFAULT_API_KEY)
}

pub fn app_with_key(api_key: &str) -> Router {
    Router::new()
        .route("/kyc/start-session", post(start_session))
        .route("/kyc/get-data", post(get_data))
        .route("/kyc/get-status", post(get_status))
        .with_state(AppState::new(api_key))
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_key(api_key)).await
}

fn invalid_field(field: &str, message: &str) -> Rejection {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"field": field, "message": message})),
    )
}

fn authorize(state: &AppState, api_key: Option<&str>) -> Result<(), Rejection> {
    if api_key == Some(&*state.api_key) {
        return Ok(());
    }
    warn!("rejected request with invalid api key");
    Err((
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "invalid api key"})),
    ))
}

async fn start_session(
    State(state): State<AppState>,
    Json(body): Json<StartSessionBody>,
) -> Result<Json<StartSessionReply>, Rejection> {
    authorize(&state, body.api_key.as_deref())?;
    let data = body
        .session_data
        .ok_or_else(|| invalid_field("sessionData", "required"))?;
    if data.email.is_none() {
        return Err(invalid_field("sessionData.email", "required"));
    }

    let mut sessions = state.sessions.write().await;
    let session = Session {
        id: Uuid::new_v4(),
        seq: sessions.len(),
        data,
    };
    let token = Uuid::new_v4().simple().to_string();
    let reply = StartSessionReply {
        session_id: session.id,
        url: format!("https://verify.example.com/{token}"),
        token: token.clone(),
    };
    info!(session_id = %session.id, "session started");
    sessions.insert(token, session);
    Ok(Json(reply))
}

async fn get_data(
    State(state): State<AppState>,
    Json(body): Json<GetDataBody>,
) -> Result<Json<GetDataReply>, Rejection> {
    authorize(&state, body.api_key.as_deref())?;
    let token = body.token.unwrap_or_default();
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&token)
        .ok_or_else(|| invalid_field("token", "invalid"))?;

    let data = session.data.clone();
    let document = ParsedDocumentData {
        document_type: "Passport".to_string(),
        document_number: format!("P{}", &session.id.simple().to_string()[..8]),
        first_name: data.first_name.clone(),
        last_name: data.last_name.clone(),
        personal_code: data.personal_code.clone(),
        date_of_birth: data.date_of_birth.clone(),
        nationality: data.country.clone(),
    };
    Ok(Json(GetDataReply {
        session_data: data,
        parsed_document_data: document,
    }))
}

async fn get_status(
    State(state): State<AppState>,
    Json(body): Json<GetStatusBody>,
) -> Result<Json<GetStatusReply>, Rejection> {
    authorize(&state, body.api_key.as_deref())?;
    let email = body.email.unwrap_or_default();
    let sessions = state.sessions.read().await;
    let token = sessions
        .iter()
        .filter(|(_, session)| session.data.email.as_deref() == Some(email.as_str()))
        .max_by_key(|(_, session)| session.seq)
        .map(|(token, _)| token.clone())
        .ok_or_else(|| invalid_field("email", "invalid"))?;

    Ok(Json(GetStatusReply {
        status: "Pending".to_string(),
        token,
    }))
}
