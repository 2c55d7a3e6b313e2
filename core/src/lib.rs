//! Client core for the Twilio REST API (2010-04-01).
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A `Transport` or
//! `AsyncTransport` performs the round trip; `BlockingClient` and
//! `AsyncClient` wire the two together for callers that just want records.
//!
//! # Design
//! - `TwilioClient` is stateless; it holds only the `Session` (account sid,
//!   optional auth token, base URL, response format).
//! - Each operation is split into `build_*` (validates and produces the
//!   request) and `parse_*` (consumes the response), so the I/O boundary is
//!   explicit and the blocking and async paths send identical requests.
//! - Options distinguish "leave unchanged" from "clear" with `Param`.
//! - JSON and XML responses decode into the same record types.

pub mod asynchronous;
pub mod blocking;
pub mod client;
pub mod config;
mod de;
pub mod error;
pub mod http;
pub mod options;
pub mod transport;
pub mod types;
pub mod xml;

pub use asynchronous::AsyncClient;
pub use blocking::BlockingClient;
pub use client::TwilioClient;
pub use config::{ResponseFormat, Session};
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::{CallbackMethod, PageFilter, Param, PhoneNumberListFilter, PhoneNumberOptions};
pub use transport::{AsyncTransport, ReqwestTransport, Transport, UreqTransport};
pub use types::{
    Capabilities, DeleteStatus, IncomingPhoneNumber, IncomingPhoneNumberResult, PageInfo,
    RestException, Transcription, TranscriptionResult,
};
