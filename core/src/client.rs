//! KYC API client.
//!
//! # Design
//! `KycApiClient` holds a transport and the API key. Neither changes after
//! construction. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`, so hosts that do their own I/O can drive the client
//! without a `Transport`. The convenience methods (`start_session`,
//! `get_data`, `get_status`) run build, send and parse in one call.
//!
//! Both paths share one error translation: HTTP 400 becomes
//! `KycError::InvalidFields` carrying the decoded body (`null` when the body
//! is not JSON), and everything else is returned as the original
//! `TransportError`.

use std::fmt;

use tracing::debug;

use crate::error::KycError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use crate::mapper::{
    GetDataMapper, GetStatusMapper, ParsedDocumentDataMapper, SessionDataMapper,
    StartSessionMapper, WireMap, WireMapper,
};
use serde_json::Value;

use crate::types::{
    GetDataRequest, GetDataResponse, GetStatusRequest, GetStatusResponse, StartSessionRequest,
    StartSessionResponse,
};

pub const START_SESSION_PATH: &str = "/kyc/start-session";
pub const GET_DATA_PATH: &str = "/kyc/get-data";
pub const GET_STATUS_PATH: &str = "/kyc/get-status";

/// Synchronous client for the KYC API.
///
/// Safe to share across threads whenever `T` is; the client itself adds no
/// locking.
pub struct KycApiClient<T> {
    transport: T,
    api_key: String,
}

impl<T> KycApiClient<T> {
    pub fn new(transport: T, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the start-session request.
    ///
    /// Fails with `KycError::MissingSessionData` when the request carries no
    /// session data. The caller's request is left as is; the body is built
    /// from a copy with the client's API key set.
    pub fn build_start_session(&self, request: &StartSessionRequest) -> Result<HttpRequest, KycError> {
        if request.session_data.is_none() {
            return Err(KycError::MissingSessionData);
        }
        let request = request.clone().with_api_key(self.api_key.as_str());
        Ok(post(START_SESSION_PATH, start_session_mapper().map_from_entity(&request)))
    }

    pub fn parse_start_session(&self, response: HttpResponse) -> Result<StartSessionResponse, KycError> {
        let response = TransportError::check(response).map_err(translate)?;
        decode(&start_session_mapper(), &response)
    }

    pub fn build_get_data(&self, token: &str) -> HttpRequest {
        let request = GetDataRequest::default()
            .with_api_key(self.api_key.as_str())
            .with_token(token);
        post(GET_DATA_PATH, get_data_mapper().map_from_entity(&request))
    }

    pub fn parse_get_data(&self, response: HttpResponse) -> Result<GetDataResponse, KycError> {
        let response = TransportError::check(response).map_err(translate)?;
        decode(&get_data_mapper(), &response)
    }

    pub fn build_get_status(&self, email: &str) -> HttpRequest {
        let request = GetStatusRequest::default()
            .with_api_key(self.api_key.as_str())
            .with_email(email);
        post(GET_STATUS_PATH, GetStatusMapper.map_from_entity(&request))
    }

    pub fn parse_get_status(&self, response: HttpResponse) -> Result<GetStatusResponse, KycError> {
        let response = TransportError::check(response).map_err(translate)?;
        decode(&GetStatusMapper, &response)
    }
}

impl<T: Transport> KycApiClient<T> {
    /// Start a verification session. No request is sent if
    /// `request.session_data` is unset.
    pub fn start_session(&self, request: &StartSessionRequest) -> Result<StartSessionResponse, KycError> {
        let http_request = self.build_start_session(request)?;
        let response = self.execute(http_request)?;
        decode(&start_session_mapper(), &response)
    }

    /// Fetch the session data and the parsed document data for `token`.
    pub fn get_data(&self, token: &str) -> Result<GetDataResponse, KycError> {
        let http_request = self.build_get_data(token);
        let response = self.execute(http_request)?;
        decode(&get_data_mapper(), &response)
    }

    /// Query the verification status of the person registered under `email`.
    pub fn get_status(&self, email: &str) -> Result<GetStatusResponse, KycError> {
        let http_request = self.build_get_status(email);
        let response = self.execute(http_request)?;
        decode(&GetStatusMapper, &response)
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, KycError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending KYC request");
        self.transport
            .send(request)
            .and_then(TransportError::check)
            .map_err(translate)
    }
}

impl<T> fmt::Debug for KycApiClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KycApiClient")
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

fn start_session_mapper() -> StartSessionMapper<SessionDataMapper> {
    StartSessionMapper::new(SessionDataMapper)
}

fn get_data_mapper() -> GetDataMapper<SessionDataMapper, ParsedDocumentDataMapper> {
    GetDataMapper::new(SessionDataMapper, ParsedDocumentDataMapper)
}

fn post(path: &str, wire: WireMap) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Post,
        path: path.to_string(),
        headers: vec![
            ("content-type".to_string(), "application/json".to_string()),
            ("accept".to_string(), "application/json".to_string()),
        ],
        body: Some(Value::Object(wire).to_string()),
    }
}

fn decode<M: WireMapper>(mapper: &M, response: &HttpResponse) -> Result<M::Incoming, KycError> {
    let wire: WireMap =
        serde_json::from_str(&response.body).map_err(|e| KycError::Deserialization(e.to_string()))?;
    Ok(mapper.map_to_entity(&wire))
}

/// Turn HTTP 400 into `InvalidFields`; pass everything else on.
fn translate(err: TransportError) -> KycError {
    if let TransportError::Client { status: 400, response } = &err {
        debug!(status = 400, "KYC service rejected request fields");
        let payload = serde_json::from_str(&response.body).unwrap_or(Value::Null);
        return KycError::InvalidFields(payload);
    }
    debug!(status = ?err.status(), error = %err, "KYC request failed");
    KycError::Transport(err)
}
