//! Synchronous client for a KYC (identity verification) service.
//!
//! # Overview
//! Three remote operations: start a verification session, fetch the data
//! extracted from the user's document, and query the verification status.
//! Typed request entities are mapped to JSON, POSTed through an injected
//! `Transport`, and the JSON responses are mapped back into typed entities.
//!
//! # Design
//! - `KycApiClient` holds only the transport and the API key.
//! - Every operation also exists as a `build_*` / `parse_*` pair for hosts
//!   that execute HTTP themselves.
//! - Mappers in `mapper` own the wire layout; entities in `types` are plain
//!   data.
//! - HTTP 400 is surfaced as `KycError::InvalidFields` with the decoded body.
//!   Every other transport failure is passed through unchanged.

pub mod client;
pub mod error;
pub mod http;
pub mod mapper;
pub mod types;

pub use client::{KycApiClient, GET_DATA_PATH, GET_STATUS_PATH, START_SESSION_PATH};
pub use error::KycError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use mapper::{
    GetDataMapper, GetStatusMapper, ParsedDocumentDataMapper, SessionDataMapper,
    StartSessionMapper, WireMap, WireMapper,
};
pub use types::{
    GetDataRequest, GetDataResponse, GetStatusRequest, GetStatusResponse, ParsedDocumentData,
    SessionData, StartSessionRequest, StartSessionResponse,
};
