//! Entities for the KYC API.
//!
//! # Design
//! Entities are plain data with public fields; the wire layout lives in
//! `mapper`, not here. Request types offer consuming `with_*` builders so a
//! request can be assembled inline without a shared mutable instance.
//! Every response field is optional because the service omits fields it has
//! no value for.

/// Configuration of a verification session. Sent when a session is started
/// and echoed back by get-data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub external_reference: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub personal_code: Option<String>,
    pub date_of_birth: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub return_url: Option<String>,
}

/// Fields the service extracted from the identity document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocumentData {
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub personal_code: Option<String>,
    pub date_of_birth: Option<String>,
    pub sex: Option<String>,
    pub nationality: Option<String>,
    pub issuing_country: Option<String>,
    pub date_of_issue: Option<String>,
    pub date_of_expiration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartSessionRequest {
    pub api_key: String,
    pub session_data: Option<SessionData>,
}

impl StartSessionRequest {
    pub fn new(session_data: SessionData) -> Self {
        Self::default().with_session_data(session_data)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_session_data(mut self, session_data: SessionData) -> Self {
        self.session_data = Some(session_data);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartSessionResponse {
    pub session_id: Option<String>,
    /// Token identifying the session in later get-data calls.
    pub token: Option<String>,
    /// Where the end user is sent to complete verification.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetDataRequest {
    pub api_key: String,
    pub token: String,
}

impl GetDataRequest {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetDataResponse {
    pub session_data: Option<SessionData>,
    pub parsed_document_data: Option<ParsedDocumentData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetStatusRequest {
    pub api_key: String,
    pub email: String,
}

impl GetStatusRequest {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetStatusResponse {
    /// Verification status as reported by the service, e.g. `"Approved"`.
    pub status: Option<String>,
    pub token: Option<String>,
    pub reason: Option<String>,
}

impl GetStatusResponse {
    pub fn is_approved(&self) -> bool {
        self.status.as_deref() == Some("Approved")
    }
}
