//! Outgoing request options: what to create, what to change, what to filter.
//!
//! # Design
//! Plain `Option` fields follow "send only if it has a value": `None` and
//! `Some("")` are both left out. Fields that the API lets you blank out
//! (callback URLs, application sids) use [`Param`] instead, which keeps
//! "leave it alone" and "clear it" apart. Both forms deserialize from JSON so
//! test vectors can describe inputs directly.

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::error::{ApiError, Result};

/// Maximum length of a friendly name, in characters.
pub const FRIENDLY_NAME_MAX_LEN: usize = 64;

/// A request field that can be left untouched, cleared, or set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Param<T> {
    /// Not sent; the server keeps its current value.
    #[default]
    Unset,
    /// Sent with an empty value; the server removes its current value.
    Clear,
    /// Sent with this value.
    Set(T),
}

impl<T> Param<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Param::Unset)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Param::Set(value) => Some(value),
            Param::Unset | Param::Clear => None,
        }
    }
}

impl<T: fmt::Display> Param<T> {
    /// The value as it goes on the wire, or `None` when it must be omitted.
    pub fn to_wire(&self) -> Option<String> {
        match self {
            Param::Unset => None,
            Param::Clear => Some(String::new()),
            Param::Set(value) => Some(value.to_string()),
        }
    }
}

impl From<&str> for Param<String> {
    fn from(value: &str) -> Self {
        Param::Set(value.to_string())
    }
}

impl From<String> for Param<String> {
    fn from(value: String) -> Self {
        Param::Set(value)
    }
}

/// Absent or `null` is `Unset`, `""` is `Clear`, anything else is `Set`.
impl<'de> Deserialize<'de> for Param<String> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            None => Param::Unset,
            Some(value) if value.is_empty() => Param::Clear,
            Some(value) => Param::Set(value),
        })
    }
}

/// HTTP method Twilio uses when calling back into your application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallbackMethod {
    Get,
    Post,
}

impl fmt::Display for CallbackMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackMethod::Get => f.write_str("GET"),
            CallbackMethod::Post => f.write_str("POST"),
        }
    }
}

/// Settings used when purchasing or updating an incoming phone number.
///
/// Only populated fields are sent; see the module docs for the difference
/// between `Option` and [`Param`] fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PhoneNumberOptions {
    /// Exact number to purchase. Takes precedence over `area_code`.
    pub phone_number: Option<String>,
    /// Purchase any available number in this area code.
    pub area_code: Option<String>,
    pub friendly_name: Option<String>,
    pub voice_application_sid: Param<String>,
    pub voice_url: Param<String>,
    pub voice_method: Option<CallbackMethod>,
    pub voice_fallback_url: Param<String>,
    pub voice_fallback_method: Option<CallbackMethod>,
    pub voice_caller_id_lookup: Option<bool>,
    /// Sent as `StatusCallbackUrl`.
    pub status_callback: Option<String>,
    pub status_callback_method: Option<CallbackMethod>,
    pub sms_application_sid: Param<String>,
    pub sms_url: Param<String>,
    pub sms_method: Option<CallbackMethod>,
    pub sms_fallback_url: Param<String>,
    pub sms_fallback_method: Option<CallbackMethod>,
}

impl PhoneNumberOptions {
    /// Number selection for a purchase: `PhoneNumber` if given, otherwise
    /// `AreaCode`. Never both.
    pub(crate) fn append_number_selection(&self, params: &mut Vec<(String, String)>) {
        if let Some(number) = has_value(&self.phone_number) {
            push(params, "PhoneNumber", number);
        } else if let Some(area_code) = has_value(&self.area_code) {
            push(params, "AreaCode", area_code);
        }
    }

    pub(crate) fn append_voice(&self, params: &mut Vec<(String, String)>) -> Result<()> {
        if let Some(name) = has_value(&self.friendly_name) {
            validate_length("FriendlyName", name, FRIENDLY_NAME_MAX_LEN)?;
            push(params, "FriendlyName", name);
        }
        push_param(params, "VoiceApplicationSid", &self.voice_application_sid);
        push_param(params, "VoiceUrl", &self.voice_url);
        push_method(params, "VoiceMethod", self.voice_method);
        push_param(params, "VoiceFallbackUrl", &self.voice_fallback_url);
        push_method(params, "VoiceFallbackMethod", self.voice_fallback_method);
        if let Some(lookup) = self.voice_caller_id_lookup {
            push(params, "VoiceCallerIdLookup", if lookup { "true" } else { "false" });
        }
        if let Some(url) = has_value(&self.status_callback) {
            push(params, "StatusCallbackUrl", url);
        }
        push_method(params, "StatusCallbackMethod", self.status_callback_method);
        Ok(())
    }

    pub(crate) fn append_sms(&self, params: &mut Vec<(String, String)>) {
        push_param(params, "SmsApplicationSid", &self.sms_application_sid);
        push_param(params, "SmsUrl", &self.sms_url);
        push_method(params, "SmsMethod", self.sms_method);
        push_param(params, "SmsFallbackUrl", &self.sms_fallback_url);
        push_method(params, "SmsFallbackMethod", self.sms_fallback_method);
    }
}

/// Filters for listing incoming phone numbers. All optional; an empty filter
/// lists everything with server-default paging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PhoneNumberListFilter {
    /// Exact-match phone number.
    pub phone_number: Option<String>,
    pub friendly_name: Option<String>,
    /// Zero-based page to start from.
    pub page: Option<u32>,
    /// How many records per page.
    pub page_size: Option<u32>,
}

impl PhoneNumberListFilter {
    pub(crate) fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(number) = has_value(&self.phone_number) {
            push(&mut params, "PhoneNumber", number);
        }
        if let Some(name) = has_value(&self.friendly_name) {
            push(&mut params, "FriendlyName", name);
        }
        PageFilter {
            page: self.page,
            page_size: self.page_size,
        }
        .append(&mut params);
        params
    }
}

/// Paging for list operations that have no other filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageFilter {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageFilter {
    pub(crate) fn append(&self, params: &mut Vec<(String, String)>) {
        if let Some(page) = self.page {
            push(params, "Page", &page.to_string());
        }
        if let Some(size) = self.page_size {
            push(params, "PageSize", &size.to_string());
        }
    }
}

/// Fail with `MissingArgument` when a required identifier is blank.
pub(crate) fn require(name: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ApiError::MissingArgument { name });
    }
    Ok(())
}

pub(crate) fn validate_length(name: &'static str, value: &str, max: usize) -> Result<()> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ApiError::InvalidLength { name, max, actual });
    }
    Ok(())
}

fn has_value(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn push(params: &mut Vec<(String, String)>, name: &str, value: &str) {
    params.push((name.to_string(), value.to_string()));
}

fn push_param(params: &mut Vec<(String, String)>, name: &str, param: &Param<String>) {
    if let Some(value) = param.to_wire() {
        params.push((name.to_string(), value));
    }
}

fn push_method(params: &mut Vec<(String, String)>, name: &str, method: Option<CallbackMethod>) {
    if let Some(method) = method {
        params.push((name.to_string(), method.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(params: &[(String, String)]) -> Vec<&str> {
        params.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn default_options_produce_no_parameters() {
        let options = PhoneNumberOptions::default();
        let mut params = Vec::new();
        options.append_number_selection(&mut params);
        options.append_voice(&mut params).unwrap();
        options.append_sms(&mut params);
        assert!(params.is_empty());
    }

    #[test]
    fn clear_sends_empty_value_and_unset_sends_nothing() {
        let options = PhoneNumberOptions {
            voice_url: Param::Clear,
            sms_application_sid: Param::Clear,
            sms_url: Param::Set("http://example.com/sms".into()),
            ..Default::default()
        };
        let mut params = Vec::new();
        options.append_voice(&mut params).unwrap();
        options.append_sms(&mut params);
        assert_eq!(
            params,
            vec![
                ("VoiceUrl".to_string(), String::new()),
                ("SmsApplicationSid".to_string(), String::new()),
                ("SmsUrl".to_string(), "http://example.com/sms".to_string()),
            ]
        );
    }

    #[test]
    fn empty_plain_options_are_not_sent() {
        let options = PhoneNumberOptions {
            friendly_name: Some(String::new()),
            status_callback: Some(String::new()),
            ..Default::default()
        };
        let mut params = Vec::new();
        options.append_voice(&mut params).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn phone_number_wins_over_area_code() {
        let options = PhoneNumberOptions {
            phone_number: Some("+15105551234".into()),
            area_code: Some("510".into()),
            ..Default::default()
        };
        let mut params = Vec::new();
        options.append_number_selection(&mut params);
        assert_eq!(names(&params), vec!["PhoneNumber"]);

        let options = PhoneNumberOptions {
            area_code: Some("510".into()),
            ..Default::default()
        };
        let mut params = Vec::new();
        options.append_number_selection(&mut params);
        assert_eq!(params, vec![("AreaCode".to_string(), "510".to_string())]);
    }

    #[test]
    fn friendly_name_at_limit_is_accepted() {
        let options = PhoneNumberOptions {
            friendly_name: Some("x".repeat(64)),
            ..Default::default()
        };
        let mut params = Vec::new();
        assert!(options.append_voice(&mut params).is_ok());
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn friendly_name_over_limit_is_rejected() {
        let options = PhoneNumberOptions {
            friendly_name: Some("x".repeat(65)),
            ..Default::default()
        };
        let mut params = Vec::new();
        let err = options.append_voice(&mut params).unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidLength { name: "FriendlyName", max: 64, actual: 65 }
        ));
    }

    #[test]
    fn friendly_name_length_counts_characters() {
        // 64 multi-byte characters is still within the limit.
        let options = PhoneNumberOptions {
            friendly_name: Some("é".repeat(64)),
            ..Default::default()
        };
        assert!(options.append_voice(&mut Vec::new()).is_ok());
    }

    #[test]
    fn voice_parameters_in_order() {
        let options = PhoneNumberOptions {
            friendly_name: Some("Main".into()),
            voice_url: "http://example.com/voice".into(),
            voice_method: Some(CallbackMethod::Get),
            voice_caller_id_lookup: Some(true),
            status_callback: Some("http://example.com/status".into()),
            status_callback_method: Some(CallbackMethod::Post),
            ..Default::default()
        };
        let mut params = Vec::new();
        options.append_voice(&mut params).unwrap();
        assert_eq!(
            names(&params),
            vec![
                "FriendlyName",
                "VoiceUrl",
                "VoiceMethod",
                "VoiceCallerIdLookup",
                "StatusCallbackUrl",
                "StatusCallbackMethod"
            ]
        );
        assert_eq!(params[2].1, "GET");
        assert_eq!(params[3].1, "true");
    }

    #[test]
    fn param_deserializes_three_states() {
        let options: PhoneNumberOptions =
            serde_json::from_str(r#"{"voice_url":"","sms_url":"http://x","voice_method":"POST"}"#)
                .unwrap();
        assert_eq!(options.voice_url, Param::Clear);
        assert_eq!(options.sms_url, Param::Set("http://x".into()));
        assert_eq!(options.voice_fallback_url, Param::Unset);
        assert_eq!(options.voice_method, Some(CallbackMethod::Post));
    }

    #[test]
    fn list_filter_parameters() {
        let filter = PhoneNumberListFilter {
            page: Some(2),
            page_size: Some(50),
            ..Default::default()
        };
        assert_eq!(
            filter.to_params(),
            vec![
                ("Page".to_string(), "2".to_string()),
                ("PageSize".to_string(), "50".to_string()),
            ]
        );
        assert!(PhoneNumberListFilter::default().to_params().is_empty());
    }

    #[test]
    fn require_rejects_blank() {
        assert!(require("Sid", "PN1").is_ok());
        assert!(matches!(
            require("Sid", ""),
            Err(ApiError::MissingArgument { name: "Sid" })
        ));
        assert!(require("Sid", "   ").is_err());
    }
}
