//! Bidirectional mapping between entities and the JSON wire format.
//!
//! # Design
//! Each mapper is stateless and implements `WireMapper`. `map_from_entity`
//! writes exactly the documented keys for the outgoing entity, and unset
//! optional fields are left out. `map_to_entity` never fails: missing keys,
//! `null` and values of the wrong JSON type all become `None`. Rejecting bad
//! input is the job of the client, not the mapper.
//!
//! Operation mappers receive their field-level sub-mappers through their
//! constructors, so the `SessionData` layout is defined once and shared by
//! the start-session and get-data flows.

use serde_json::{Map, Value};

use crate::types::{
    GetDataRequest, GetDataResponse, GetStatusRequest, GetStatusResponse, ParsedDocumentData,
    SessionData, StartSessionRequest, StartSessionResponse,
};

/// A JSON object: string keys to JSON values.
pub type WireMap = Map<String, Value>;

pub trait WireMapper {
    /// Entity written to the wire.
    type Outgoing;
    /// Entity read back from the wire.
    type Incoming;

    fn map_from_entity(&self, entity: &Self::Outgoing) -> WireMap;

    fn map_to_entity(&self, wire: &WireMap) -> Self::Incoming;
}

fn put(wire: &mut WireMap, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        wire.insert(key.to_string(), Value::String(value.clone()));
    }
}

fn string(wire: &WireMap, key: &str) -> Option<String> {
    wire.get(key).and_then(Value::as_str).map(str::to_string)
}

fn object<'a>(wire: &'a WireMap, key: &str) -> Option<&'a WireMap> {
    wire.get(key).and_then(Value::as_object)
}

// ---------------------------------------------------------------------------
// Field-level mappers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionDataMapper;

impl WireMapper for SessionDataMapper {
    type Outgoing = SessionData;
    type Incoming = SessionData;

    fn map_from_entity(&self, data: &SessionData) -> WireMap {
        let mut wire = WireMap::new();
        put(&mut wire, "externalReference", &data.external_reference);
        put(&mut wire, "firstName", &data.first_name);
        put(&mut wire, "middleName", &data.middle_name);
        put(&mut wire, "lastName", &data.last_name);
        put(&mut wire, "email", &data.email);
        put(&mut wire, "phoneNumber", &data.phone_number);
        put(&mut wire, "personalCode", &data.personal_code);
        put(&mut wire, "dateOfBirth", &data.date_of_birth);
        put(&mut wire, "country", &data.country);
        put(&mut wire, "language", &data.language);
        put(&mut wire, "returnUrl", &data.return_url);
        wire
    }

    fn map_to_entity(&self, wire: &WireMap) -> SessionData {
        SessionData {
            external_reference: string(wire, "externalReference"),
            first_name: string(wire, "firstName"),
            middle_name: string(wire, "middleName"),
            last_name: string(wire, "lastName"),
            email: string(wire, "email"),
            phone_number: string(wire, "phoneNumber"),
            personal_code: string(wire, "personalCode"),
            date_of_birth: string(wire, "dateOfBirth"),
            country: string(wire, "country"),
            language: string(wire, "language"),
            return_url: string(wire, "returnUrl"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParsedDocumentDataMapper;

impl WireMapper for ParsedDocumentDataMapper {
    type Outgoing = ParsedDocumentData;
    type Incoming = ParsedDocumentData;

    fn map_from_entity(&self, data: &ParsedDocumentData) -> WireMap {
        let mut wire = WireMap::new();
        put(&mut wire, "documentType", &data.document_type);
        put(&mut wire, "documentNumber", &data.document_number);
        put(&mut wire, "firstName", &data.first_name);
        put(&mut wire, "lastName", &data.last_name);
        put(&mut wire, "personalCode", &data.personal_code);
        put(&mut wire, "dateOfBirth", &data.date_of_birth);
        put(&mut wire, "sex", &data.sex);
        put(&mut wire, "nationality", &data.nationality);
        put(&mut wire, "issuingCountry", &data.issuing_country);
        put(&mut wire, "dateOfIssue", &data.date_of_issue);
        put(&mut wire, "dateOfExpiration", &data.date_of_expiration);
        wire
    }

    fn map_to_entity(&self, wire: &WireMap) -> ParsedDocumentData {
        ParsedDocumentData {
            document_type: string(wire, "documentType"),
            document_number: string(wire, "documentNumber"),
            first_name: string(wire, "firstName"),
            last_name: string(wire, "lastName"),
            personal_code: string(wire, "personalCode"),
            date_of_birth: string(wire, "dateOfBirth"),
            sex: string(wire, "sex"),
            nationality: string(wire, "nationality"),
            issuing_country: string(wire, "issuingCountry"),
            date_of_issue: string(wire, "dateOfIssue"),
            date_of_expiration: string(wire, "dateOfExpiration"),
        }
    }
}

// ---------------------------------------------------------------------------
// Operation mappers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct StartSessionMapper<S = SessionDataMapper> {
    session_data: S,
}

impl<S> StartSessionMapper<S> {
    pub fn new(session_data: S) -> Self {
        Self { session_data }
    }
}

impl<S> WireMapper for StartSessionMapper<S>
where
    S: WireMapper<Outgoing = SessionData>,
{
    type Outgoing = StartSessionRequest;
    type Incoming = StartSessionResponse;

    fn map_from_entity(&self, request: &StartSessionRequest) -> WireMap {
        let mut wire = WireMap::new();
        wire.insert("apiKey".to_string(), Value::String(request.api_key.clone()));
        if let Some(data) = &request.session_data {
            wire.insert(
                "sessionData".to_string(),
                Value::Object(self.session_data.map_from_entity(data)),
            );
        }
        wire
    }

    fn map_to_entity(&self, wire: &WireMap) -> StartSessionResponse {
        StartSessionResponse {
            session_id: string(wire, "sessionId"),
            token: string(wire, "token"),
            url: string(wire, "url"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetDataMapper<S = SessionDataMapper, P = ParsedDocumentDataMapper> {
    session_data: S,
    parsed_document_data: P,
}

impl<S, P> GetDataMapper<S, P> {
    pub fn new(session_data: S, parsed_document_data: P) -> Self {
        Self {
            session_data,
            parsed_document_data,
        }
    }
}

impl<S, P> WireMapper for GetDataMapper<S, P>
where
    S: WireMapper<Incoming = SessionData>,
    P: WireMapper<Incoming = ParsedDocumentData>,
{
    type Outgoing = GetDataRequest;
    type Incoming = GetDataResponse;

    fn map_from_entity(&self, request: &GetDataRequest) -> WireMap {
        let mut wire = WireMap::new();
        wire.insert("apiKey".to_string(), Value::String(request.api_key.clone()));
        wire.insert("token".to_string(), Value::String(request.token.clone()));
        wire
    }

    fn map_to_entity(&self, wire: &WireMap) -> GetDataResponse {
        GetDataResponse {
            session_data: object(wire, "sessionData").map(|data| self.session_data.map_to_entity(data)),
            parsed_document_data: object(wire, "parsedDocumentData")
                .map(|data| self.parsed_document_data.map_to_entity(data)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetStatusMapper;

impl WireMapper for GetStatusMapper {
    type Outgoing = GetStatusRequest;
    type Incoming = GetStatusResponse;

    fn map_from_entity(&self, request: &GetStatusRequest) -> WireMap {
        let mut wire = WireMap::new();
        wire.insert("apiKey".to_string(), Value::String(request.api_key.clone()));
        wire.insert("email".to_string(), Value::String(request.email.clone()));
        wire
    }

    fn map_to_entity(&self, wire: &WireMap) -> GetStatusResponse {
        GetStatusResponse {
            status: string(wire, "status"),
            token: string(wire, "token"),
            reason: string(wire, "reason"),
        }
    }
}
