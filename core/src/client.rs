//! Stateless HTTP request builder and response parser for the Twilio REST API.
//!
//! # Design
//! `TwilioClient` holds only a `Session` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Argument validation happens in `build_*`, so a bad call fails before any
//! I/O. The blocking and async front ends (`BlockingClient`, `AsyncClient`)
//! share these methods, which keeps their requests identical.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;

use crate::config::{ResponseFormat, Session};
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::{require, PageFilter, PhoneNumberListFilter, PhoneNumberOptions};
use crate::types::{
    DeleteStatus, IncomingPhoneNumber, IncomingPhoneNumberResult, RestException, Transcription,
    TranscriptionResult,
};
use crate::xml;

const INCOMING_PHONE_NUMBERS: &str = "Accounts/{AccountSid}/IncomingPhoneNumbers";
const INCOMING_PHONE_NUMBER: &str =
    "Accounts/{AccountSid}/IncomingPhoneNumbers/{IncomingPhoneNumberSid}";
const TRANSCRIPTIONS: &str = "Accounts/{AccountSid}/Transcriptions";
const TRANSCRIPTION: &str = "Accounts/{AccountSid}/Transcriptions/{TranscriptionSid}";
const RECORDING_TRANSCRIPTIONS: &str =
    "Accounts/{AccountSid}/Recordings/{RecordingSid}/Transcriptions";

const ROOT_INCOMING_PHONE_NUMBER: &str = "IncomingPhoneNumber";
const ROOT_INCOMING_PHONE_NUMBERS: &str = "IncomingPhoneNumbers";
const ROOT_TRANSCRIPTION: &str = "Transcription";
const ROOT_TRANSCRIPTIONS: &str = "Transcriptions";
const ROOT_REST_EXCEPTION: &str = "RestException";

/// Characters left as-is in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Synchronous, stateless request builder and response parser.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    session: Session,
}

impl TwilioClient {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // -----------------------------------------------------------------------
    // Incoming phone numbers
    // -----------------------------------------------------------------------

    pub fn build_get_incoming_phone_number(&self, sid: &str) -> Result<HttpRequest> {
        require("IncomingPhoneNumberSid", sid)?;
        let path = self.resource_url(INCOMING_PHONE_NUMBER, &[("IncomingPhoneNumberSid", sid)])?;
        Ok(self.request(HttpMethod::Get, path, Vec::new(), Some(ROOT_INCOMING_PHONE_NUMBER)))
    }

    pub fn build_list_incoming_phone_numbers(
        &self,
        filter: &PhoneNumberListFilter,
    ) -> Result<HttpRequest> {
        let path = self.resource_url(INCOMING_PHONE_NUMBERS, &[])?;
        Ok(self.request(
            HttpMethod::Get,
            path,
            filter.to_params(),
            Some(ROOT_INCOMING_PHONE_NUMBERS),
        ))
    }

    /// Purchase a number: `options.phone_number` for a specific number, or
    /// `options.area_code` for any number in that area.
    pub fn build_add_incoming_phone_number(
        &self,
        options: &PhoneNumberOptions,
    ) -> Result<HttpRequest> {
        let mut params = Vec::new();
        options.append_number_selection(&mut params);
        options.append_voice(&mut params)?;
        options.append_sms(&mut params);

        let path = self.resource_url(INCOMING_PHONE_NUMBERS, &[])?;
        Ok(self.request(HttpMethod::Post, path, params, Some(ROOT_INCOMING_PHONE_NUMBER)))
    }

    /// Change the settings of a number. Only populated options are sent.
    pub fn build_update_incoming_phone_number(
        &self,
        sid: &str,
        options: &PhoneNumberOptions,
    ) -> Result<HttpRequest> {
        require("IncomingPhoneNumberSid", sid)?;
        let mut params = Vec::new();
        options.append_voice(&mut params)?;
        options.append_sms(&mut params);

        let path = self.resource_url(INCOMING_PHONE_NUMBER, &[("IncomingPhoneNumberSid", sid)])?;
        Ok(self.request(HttpMethod::Post, path, params, Some(ROOT_INCOMING_PHONE_NUMBER)))
    }

    /// Release a number from the account.
    pub fn build_delete_incoming_phone_number(&self, sid: &str) -> Result<HttpRequest> {
        require("IncomingPhoneNumberSid", sid)?;
        let path = self.resource_url(INCOMING_PHONE_NUMBER, &[("IncomingPhoneNumberSid", sid)])?;
        Ok(self.request(HttpMethod::Delete, path, Vec::new(), None))
    }

    /// Decode the response of get, add, or update.
    pub fn parse_incoming_phone_number(&self, response: HttpResponse) -> Result<IncomingPhoneNumber> {
        self.decode(response, ROOT_INCOMING_PHONE_NUMBER)
    }

    pub fn parse_incoming_phone_number_list(
        &self,
        response: HttpResponse,
    ) -> Result<IncomingPhoneNumberResult> {
        self.decode(response, ROOT_INCOMING_PHONE_NUMBERS)
    }

    // -----------------------------------------------------------------------
    // Transcriptions
    // -----------------------------------------------------------------------

    pub fn build_get_transcription(&self, sid: &str) -> Result<HttpRequest> {
        require("TranscriptionSid", sid)?;
        let path = self.resource_url(TRANSCRIPTION, &[("TranscriptionSid", sid)])?;
        Ok(self.request(HttpMethod::Get, path, Vec::new(), Some(ROOT_TRANSCRIPTION)))
    }

    /// All transcriptions on the account.
    pub fn build_list_transcriptions(&self, paging: &PageFilter) -> Result<HttpRequest> {
        let path = self.resource_url(TRANSCRIPTIONS, &[])?;
        let mut params = Vec::new();
        paging.append(&mut params);
        Ok(self.request(HttpMethod::Get, path, params, Some(ROOT_TRANSCRIPTIONS)))
    }

    /// Transcriptions made from one recording.
    pub fn build_list_recording_transcriptions(
        &self,
        recording_sid: &str,
        paging: &PageFilter,
    ) -> Result<HttpRequest> {
        require("RecordingSid", recording_sid)?;
        let path = self.resource_url(RECORDING_TRANSCRIPTIONS, &[("RecordingSid", recording_sid)])?;
        let mut params = Vec::new();
        paging.append(&mut params);
        Ok(self.request(HttpMethod::Get, path, params, Some(ROOT_TRANSCRIPTIONS)))
    }

    pub fn build_delete_transcription(&self, sid: &str) -> Result<HttpRequest> {
        require("TranscriptionSid", sid)?;
        let path = self.resource_url(TRANSCRIPTION, &[("TranscriptionSid", sid)])?;
        Ok(self.request(HttpMethod::Delete, path, Vec::new(), None))
    }

    pub fn parse_transcription(&self, response: HttpResponse) -> Result<Transcription> {
        self.decode(response, ROOT_TRANSCRIPTION)
    }

    pub fn parse_transcription_list(&self, response: HttpResponse) -> Result<TranscriptionResult> {
        self.decode(response, ROOT_TRANSCRIPTIONS)
    }

    // -----------------------------------------------------------------------
    // Shared
    // -----------------------------------------------------------------------

    /// Success only on 204 No Content. Never an error: the caller gets a
    /// two-valued outcome.
    pub fn parse_delete(&self, response: &HttpResponse) -> DeleteStatus {
        let status = DeleteStatus::from_status(response.status);
        if !status.is_success() {
            tracing::warn!(status = response.status, "delete was not acknowledged with 204");
        }
        status
    }

    /// Expand a resource template into an absolute URL. `{AccountSid}` comes
    /// from the session; the other placeholders from `segments`.
    fn resource_url(&self, template: &str, segments: &[(&str, &str)]) -> Result<String> {
        require("AccountSid", self.session.account_sid())?;

        let mut resource = template.replace(
            "{AccountSid}",
            &encode_segment(self.session.account_sid()),
        );
        for (name, value) in segments {
            resource = resource.replace(&format!("{{{name}}}"), &encode_segment(value));
        }

        Ok(format!(
            "{}/{}/{}{}",
            self.session.base_url(),
            self.session.api_version(),
            resource,
            self.session.format().extension()
        ))
    }

    fn request(
        &self,
        method: HttpMethod,
        path: String,
        params: Vec<(String, String)>,
        root_element: Option<&str>,
    ) -> HttpRequest {
        let mut headers = vec![(
            "accept".to_string(),
            self.session.format().media_type().to_string(),
        )];
        if let Some(authorization) = self.session.authorization() {
            headers.push(("authorization".to_string(), authorization));
        }
        if method == HttpMethod::Post {
            headers.push((
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            ));
        }

        tracing::debug!(
            method = method.as_str(),
            path = %path,
            params = params.len(),
            "built request"
        );

        HttpRequest {
            method,
            path,
            headers,
            params,
            root_element: root_element.map(str::to_string),
        }
    }

    fn decode<T: DeserializeOwned>(&self, response: HttpResponse, root_element: &str) -> Result<T> {
        check_status(&response, self.session.format())?;
        match self.session.format() {
            ResponseFormat::Json => serde_json::from_str(&response.body)
                .map_err(|e| ApiError::DeserializationError(e.to_string())),
            ResponseFormat::Xml => {
                let value = xml::extract(&response.body, root_element)?;
                serde_json::from_value(value)
                    .map_err(|e| ApiError::DeserializationError(e.to_string()))
            }
        }
    }
}

fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, format: ResponseFormat) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    tracing::warn!(status = response.status, "request failed");
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    let exception = rest_exception(&response.body, format);
    Err(ApiError::HttpError {
        status: response.status,
        code: exception.as_ref().map(|e| e.code).filter(|code| *code != 0),
        message: exception.and_then(|e| e.message),
        body: response.body.clone(),
    })
}

/// Best-effort decode of an error body; `None` when it is not one.
fn rest_exception(body: &str, format: ResponseFormat) -> Option<RestException> {
    match format {
        ResponseFormat::Json => serde_json::from_str(body).ok(),
        ResponseFormat::Xml => xml::extract(body, ROOT_REST_EXCEPTION)
            .ok()
            .and_then(|value| serde_json::from_value(value).ok()),
    }
}
