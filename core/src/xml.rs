//! Locating a record inside an XML response and turning it into a JSON value.
//!
//! XML responses wrap the payload in a `<TwilioResponse>` envelope; the
//! request's root element names the child that holds it. The element is
//! converted into a `serde_json::Value` using the JSON representation's
//! naming (`AccountSid` becomes `account_sid`) so that one set of `serde`
//! definitions decodes both formats:
//!
//! - attributes and child elements become object keys,
//! - repeated child elements become arrays,
//! - text-only elements become strings,
//! - empty elements become `null`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

/// Find the first element called `root_element` and convert it.
pub fn extract(xml: &str, root_element: &str) -> Result<Value> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                if element_name(&e)? == root_element {
                    return read_element(&mut reader, &e);
                }
                // Descend: the payload sits inside the envelope.
            }
            Event::Empty(e) => {
                if element_name(&e)? == root_element {
                    return Ok(attributes_only(&e)?);
                }
            }
            Event::Eof => {
                return Err(ApiError::DeserializationError(format!(
                    "missing root element <{root_element}>"
                )));
            }
            _ => {}
        }
    }
}

/// Convert an element whose start tag has just been read, consuming through
/// its end tag.
fn read_element(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Value> {
    let mut fields = attribute_map(start)?;
    let mut text = String::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(child) => {
                let key = snake_case(&element_name(&child)?);
                let value = read_element(reader, &child)?;
                insert_child(&mut fields, key, value);
            }
            Event::Empty(child) => {
                let key = snake_case(&element_name(&child)?);
                let value = attributes_only(&child)?;
                insert_child(&mut fields, key, value);
            }
            // Entity references arrive as separate events, so text is
            // collected raw and trimmed once at the end tag.
            Event::Text(e) => {
                text.push_str(&e.decode().map_err(xml_error)?);
            }
            Event::CData(e) => {
                text.push_str(std::str::from_utf8(&e).map_err(xml_error)?);
            }
            Event::GeneralRef(e) => {
                if let Some(ch) = e.resolve_char_ref().map_err(xml_error)? {
                    text.push(ch);
                } else {
                    let name = e.decode().map_err(xml_error)?;
                    let resolved = quick_xml::escape::resolve_predefined_entity(&name)
                        .ok_or_else(|| {
                            ApiError::DeserializationError(format!("unknown entity &{name};"))
                        })?;
                    text.push_str(resolved);
                }
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(ApiError::DeserializationError(
                    "unexpected EOF inside element".to_string(),
                ));
            }
            _ => {}
        }
    }

    // Mixed content is not used by the API; text between children is
    // indentation.
    if !fields.is_empty() {
        return Ok(Value::Object(fields));
    }
    let text = text.trim();
    if text.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::String(text.to_string()))
    }
}

fn attributes_only(start: &BytesStart<'_>) -> Result<Value> {
    let fields = attribute_map(start)?;
    if fields.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(fields))
    }
}

fn attribute_map(start: &BytesStart<'_>) -> Result<Map<String, Value>> {
    let mut fields = Map::new();
    for attr in start.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = std::str::from_utf8(attr.key.as_ref()).map_err(xml_error)?;
        let raw = std::str::from_utf8(&attr.value).map_err(xml_error)?;
        let value = quick_xml::escape::unescape(raw).map_err(xml_error)?;
        fields.insert(snake_case(key), Value::String(value.into_owned()));
    }
    Ok(fields)
}

/// Second occurrence of a key turns the entry into an array.
fn insert_child(fields: &mut Map<String, Value>, key: String, value: Value) {
    match fields.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(key, value);
        }
    }
}

fn element_name(start: &BytesStart<'_>) -> Result<String> {
    let name = start.name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_string)
        .map_err(xml_error)
}

/// `VoiceCallerIdLookup` -> `voice_caller_id_lookup`, `SMS` -> `sms`,
/// `SMSUrl` -> `sms_url`.
pub(crate) fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

fn xml_error(err: impl std::fmt::Display) -> ApiError {
    ApiError::DeserializationError(format!("malformed XML: {err}"))
}
