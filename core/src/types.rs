//! Resource records returned by the API.
//!
//! # Design
//! Records are only ever produced by decoding a server response; they are
//! not used for outgoing requests (see `options`). Field names follow the
//! JSON representation. XML element names are mapped onto the same names
//! before decoding, and the list attributes XML spells without separators
//! (`numpages`, `pagesize`, ...) are accepted as aliases.
//!
//! Status-like fields stay plain strings, as the server sends them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::de;

/// Which kinds of traffic a number can handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Capabilities {
    #[serde(default, deserialize_with = "de::boolean")]
    pub voice: bool,
    #[serde(default, deserialize_with = "de::boolean")]
    pub sms: bool,
    #[serde(default, deserialize_with = "de::boolean")]
    pub mms: bool,
}

/// A phone number owned by the account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncomingPhoneNumber {
    /// 34 character identifier, `PN` prefixed.
    pub sid: String,
    pub account_sid: String,
    #[serde(default, deserialize_with = "de::text")]
    pub friendly_name: Option<String>,
    /// E.164 formatted number.
    pub phone_number: String,
    #[serde(deserialize_with = "de::timestamp")]
    pub date_created: DateTime<Utc>,
    #[serde(deserialize_with = "de::timestamp")]
    pub date_updated: DateTime<Utc>,
    #[serde(default, deserialize_with = "de::text")]
    pub voice_application_sid: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub voice_url: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub voice_method: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub voice_fallback_url: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub voice_fallback_method: Option<String>,
    #[serde(default, deserialize_with = "de::boolean")]
    pub voice_caller_id_lookup: bool,
    #[serde(default, deserialize_with = "de::text")]
    pub status_callback: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub status_callback_method: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub sms_application_sid: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub sms_url: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub sms_method: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub sms_fallback_url: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub sms_fallback_method: Option<String>,
    #[serde(default)]
    pub capabilities: Capabilities,
    #[serde(default, deserialize_with = "de::text")]
    pub api_version: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub uri: Option<String>,
}

/// A transcription of a recording.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Transcription {
    /// 34 character identifier, `TR` prefixed.
    pub sid: String,
    #[serde(deserialize_with = "de::timestamp")]
    pub date_created: DateTime<Utc>,
    #[serde(deserialize_with = "de::timestamp")]
    pub date_updated: DateTime<Utc>,
    pub account_sid: String,
    /// `in-progress`, `completed` or `failed`.
    pub status: String,
    pub recording_sid: String,
    /// Length of the transcribed audio, in seconds.
    #[serde(default, deserialize_with = "de::unsigned")]
    pub duration: u32,
    #[serde(default, deserialize_with = "de::text")]
    pub transcription_text: Option<String>,
    /// Charge in `price_unit`. Not known until the transcription completes.
    #[serde(default, deserialize_with = "de::amount")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "de::text")]
    pub price_unit: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub api_version: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub uri: Option<String>,
}

impl Transcription {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

/// Paging metadata shared by every list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageInfo {
    #[serde(default, deserialize_with = "de::unsigned")]
    pub page: u32,
    #[serde(default, alias = "numpages", deserialize_with = "de::unsigned")]
    pub num_pages: u32,
    #[serde(default, alias = "pagesize", deserialize_with = "de::unsigned")]
    pub page_size: u32,
    #[serde(default, deserialize_with = "de::unsigned")]
    pub total: u32,
    #[serde(default, deserialize_with = "de::unsigned")]
    pub start: u32,
    #[serde(default, deserialize_with = "de::unsigned")]
    pub end: u32,
    #[serde(default, deserialize_with = "de::text")]
    pub uri: Option<String>,
    #[serde(default, alias = "firstpageuri", deserialize_with = "de::text")]
    pub first_page_uri: Option<String>,
    #[serde(default, alias = "previouspageuri", deserialize_with = "de::text")]
    pub previous_page_uri: Option<String>,
    #[serde(default, alias = "nextpageuri", deserialize_with = "de::text")]
    pub next_page_uri: Option<String>,
    #[serde(default, alias = "lastpageuri", deserialize_with = "de::text")]
    pub last_page_uri: Option<String>,
}

impl PageInfo {
    pub fn has_next_page(&self) -> bool {
        self.next_page_uri.is_some()
    }
}

/// One page of incoming phone numbers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncomingPhoneNumberResult {
    #[serde(flatten)]
    pub page_info: PageInfo,
    #[serde(
        default,
        alias = "incoming_phone_number",
        deserialize_with = "de::one_or_many"
    )]
    pub incoming_phone_numbers: Vec<IncomingPhoneNumber>,
}

/// One page of transcriptions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TranscriptionResult {
    #[serde(flatten)]
    pub page_info: PageInfo,
    #[serde(default, alias = "transcription", deserialize_with = "de::one_or_many")]
    pub transcriptions: Vec<Transcription>,
}

/// Error body the API sends with non-success statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RestException {
    #[serde(default, deserialize_with = "de::unsigned")]
    pub status: u32,
    #[serde(default, deserialize_with = "de::unsigned")]
    pub code: u32,
    #[serde(default, deserialize_with = "de::text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub more_info: Option<String>,
}

/// Outcome of a delete. The server answers 204 on success; anything else is
/// reported as `Failed` rather than as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    Success,
    Failed,
}

impl DeleteStatus {
    pub fn from_status(status: u16) -> Self {
        if status == 204 {
            DeleteStatus::Success
        } else {
            DeleteStatus::Failed
        }
    }

    pub fn is_success(self) -> bool {
        self == DeleteStatus::Success
    }
}
