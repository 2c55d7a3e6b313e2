use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_VERSION: &str = "2010-04-01";
const DEFAULT_PAGE_SIZE: usize = 50;
const FRIENDLY_NAME_MAX_LEN: usize = 64;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub voice: bool,
    pub sms: bool,
    pub mms: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IncomingPhoneNumber {
    pub sid: String,
    pub account_sid: String,
    pub friendly_name: String,
    pub phone_number: String,
    pub date_created: String,
    pub date_updated: String,
    pub voice_application_sid: Option<String>,
    pub voice_url: Option<String>,
    pub voice_method: String,
    pub voice_fallback_url: Option<String>,
    pub voice_fallback_method: String,
    pub voice_caller_id_lookup: bool,
    pub status_callback: Option<String>,
    pub status_callback_method: Option<String>,
    pub sms_application_sid: Option<String>,
    pub sms_url: Option<String>,
    pub sms_method: String,
    pub sms_fallback_url: Option<String>,
    pub sms_fallback_method: String,
    pub capabilities: Capabilities,
    pub api_version: String,
    pub uri: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transcription {
    pub sid: String,
    pub date_created: String,
    pub date_updated: String,
    pub account_sid: String,
    pub status: String,
    pub recording_sid: String,
    /// Sent as a string, as the real API does.
    pub duration: String,
    pub transcription_text: Option<String>,
    pub price: Option<String>,
    pub price_unit: String,
    pub api_version: String,
    pub uri: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: usize,
    pub num_pages: usize,
    pub page_size: usize,
    pub total: usize,
    pub start: usize,
    pub end: usize,
    pub uri: String,
    pub first_page_uri: String,
    pub previous_page_uri: Option<String>,
    pub next_page_uri: Option<String>,
    pub last_page_uri: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IncomingPhoneNumberPage {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub incoming_phone_numbers: Vec<IncomingPhoneNumber>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TranscriptionPage {
    #[serde(flatten)]
    pub meta: PageMeta,
    pub transcriptions: Vec<Transcription>,
}

/// Error body, shaped like the real API's.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestException {
    pub code: u32,
    pub message: String,
    pub more_info: String,
    pub status: u16,
}

#[derive(Default)]
pub struct Store {
    numbers: Vec<IncomingPhoneNumber>,
    transcriptions: Vec<Transcription>,
}

impl Store {
    /// Insert a completed transcription; transcriptions cannot be created
    /// through the API.
    pub fn seed_transcription(
        &mut self,
        account_sid: &str,
        recording_sid: &str,
        text: &str,
    ) -> Transcription {
        let sid = new_sid("TR");
        let now = Utc::now().to_rfc2822();
        let transcription = Transcription {
            uri: format!("/{API_VERSION}/Accounts/{account_sid}/Transcriptions/{sid}.json"),
            sid,
            date_created: now.clone(),
            date_updated: now,
            account_sid: account_sid.to_string(),
            status: "completed".to_string(),
            recording_sid: recording_sid.to_string(),
            duration: text.split_whitespace().count().to_string(),
            transcription_text: Some(text.to_string()),
            price: Some("-0.05000".to_string()),
            price_unit: "USD".to_string(),
            api_version: API_VERSION.to_string(),
        };
        self.transcriptions.push(transcription.clone());
        transcription
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Store::default())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route(
            "/2010-04-01/Accounts/{account_sid}/IncomingPhoneNumbers.json",
            get(list_numbers).post(create_number),
        )
        .route(
            "/2010-04-01/Accounts/{account_sid}/IncomingPhoneNumbers/{sid}",
            get(get_number).post(update_number).delete(delete_number),
        )
        .route(
            "/2010-04-01/Accounts/{account_sid}/Transcriptions.json",
            get(list_transcriptions),
        )
        .route(
            "/2010-04-01/Accounts/{account_sid}/Transcriptions/{sid}",
            get(get_transcription).delete(delete_transcription),
        )
        .route(
            "/2010-04-01/Accounts/{account_sid}/Recordings/{recording_sid}/Transcriptions.json",
            get(list_recording_transcriptions),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, store: Store) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(store)).await
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(rename = "PhoneNumber")]
    pub phone_number: Option<String>,
    #[serde(rename = "FriendlyName")]
    pub friendly_name: Option<String>,
    #[serde(rename = "Page")]
    pub page: Option<usize>,
    #[serde(rename = "PageSize")]
    pub page_size: Option<usize>,
}

async fn list_numbers(
    State(db): State<Db>,
    Path(account_sid): Path<String>,
    Query(params): Query<ListParams>,
) -> Json<IncomingPhoneNumberPage> {
    let store = db.read().await;
    let matching: Vec<IncomingPhoneNumber> = store
        .numbers
        .iter()
        .filter(|n| n.account_sid == account_sid)
        .filter(|n| params.phone_number.as_ref().map_or(true, |p| &n.phone_number == p))
        .filter(|n| params.friendly_name.as_ref().map_or(true, |f| &n.friendly_name == f))
        .cloned()
        .collect();
    let uri = format!("/{API_VERSION}/Accounts/{account_sid}/IncomingPhoneNumbers.json");
    let (meta, items) = paginate(matching, &uri, &params);
    Json(IncomingPhoneNumberPage {
        meta,
        incoming_phone_numbers: items,
    })
}

async fn create_number(
    State(db): State<Db>,
    Path(account_sid): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let phone_number = match (non_empty(&form, "PhoneNumber"), non_empty(&form, "AreaCode")) {
        (Some(number), _) => number.to_string(),
        (None, Some(area_code)) => {
            let count = db.read().await.numbers.len();
            format!("+1{area_code}555{:04}", 100 + count)
        }
        (None, None) => {
            return error(
                StatusCode::BAD_REQUEST,
                21450,
                "Either PhoneNumber or AreaCode is required",
            )
        }
    };
    if let Err(resp) = check_friendly_name(&form) {
        return resp;
    }

    let sid = new_sid("PN");
    let now = Utc::now().to_rfc2822();
    let mut number = IncomingPhoneNumber {
        uri: format!("/{API_VERSION}/Accounts/{account_sid}/IncomingPhoneNumbers/{sid}.json"),
        sid,
        account_sid,
        friendly_name: phone_number.clone(),
        phone_number,
        date_created: now.clone(),
        date_updated: now,
        voice_application_sid: None,
        voice_url: None,
        voice_method: "POST".to_string(),
        voice_fallback_url: None,
        voice_fallback_method: "POST".to_string(),
        voice_caller_id_lookup: false,
        status_callback: None,
        status_callback_method: None,
        sms_application_sid: None,
        sms_url: None,
        sms_method: "POST".to_string(),
        sms_fallback_url: None,
        sms_fallback_method: "POST".to_string(),
        capabilities: Capabilities {
            voice: true,
            sms: true,
            mms: false,
        },
        api_version: API_VERSION.to_string(),
    };
    apply_options(&mut number, &form);

    tracing::debug!(sid = %number.sid, "provisioned number");
    db.write().await.numbers.push(number.clone());
    (StatusCode::CREATED, Json(number)).into_response()
}

async fn get_number(
    State(db): State<Db>,
    Path((account_sid, sid)): Path<(String, String)>,
) -> Response {
    let sid = strip_json(&sid);
    let store = db.read().await;
    match store
        .numbers
        .iter()
        .find(|n| n.sid == sid && n.account_sid == account_sid)
    {
        Some(number) => Json(number.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_number(
    State(db): State<Db>,
    Path((account_sid, sid)): Path<(String, String)>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let sid = strip_json(&sid);
    if let Err(resp) = check_friendly_name(&form) {
        return resp;
    }
    let mut store = db.write().await;
    match store
        .numbers
        .iter_mut()
        .find(|n| n.sid == sid && n.account_sid == account_sid)
    {
        Some(number) => {
            apply_options(number, &form);
            number.date_updated = Utc::now().to_rfc2822();
            Json(number.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn delete_number(
    State(db): State<Db>,
    Path((account_sid, sid)): Path<(String, String)>,
) -> Response {
    let sid = strip_json(&sid);
    let mut store = db.write().await;
    let before = store.numbers.len();
    store
        .numbers
        .retain(|n| !(n.sid == sid && n.account_sid == account_sid));
    if store.numbers.len() < before {
        tracing::debug!(sid, "released number");
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found()
    }
}

async fn list_transcriptions(
    State(db): State<Db>,
    Path(account_sid): Path<String>,
    Query(params): Query<ListParams>,
) -> Json<TranscriptionPage> {
    let store = db.read().await;
    let matching: Vec<Transcription> = store
        .transcriptions
        .iter()
        .filter(|t| t.account_sid == account_sid)
        .cloned()
        .collect();
    let uri = format!("/{API_VERSION}/Accounts/{account_sid}/Transcriptions.json");
    let (meta, items) = paginate(matching, &uri, &params);
    Json(TranscriptionPage {
        meta,
        transcriptions: items,
    })
}

async fn list_recording_transcriptions(
    State(db): State<Db>,
    Path((account_sid, recording_sid)): Path<(String, String)>,
    Query(params): Query<ListParams>,
) -> Json<TranscriptionPage> {
    let store = db.read().await;
    let matching: Vec<Transcription> = store
        .transcriptions
        .iter()
        .filter(|t| t.account_sid == account_sid && t.recording_sid == recording_sid)
        .cloned()
        .collect();
    let uri = format!(
        "/{API_VERSION}/Accounts/{account_sid}/Recordings/{recording_sid}/Transcriptions.json"
    );
    let (meta, items) = paginate(matching, &uri, &params);
    Json(TranscriptionPage {
        meta,
        transcriptions: items,
    })
}

async fn get_transcription(
    State(db): State<Db>,
    Path((account_sid, sid)): Path<(String, String)>,
) -> Response {
    let sid = strip_json(&sid);
    let store = db.read().await;
    match store
        .transcriptions
        .iter()
        .find(|t| t.sid == sid && t.account_sid == account_sid)
    {
        Some(transcription) => Json(transcription.clone()).into_response(),
        None => not_found(),
    }
}

async fn delete_transcription(
    State(db): State<Db>,
    Path((account_sid, sid)): Path<(String, String)>,
) -> Response {
    let sid = strip_json(&sid);
    let mut store = db.write().await;
    let before = store.transcriptions.len();
    store
        .transcriptions
        .retain(|t| !(t.sid == sid && t.account_sid == account_sid));
    if store.transcriptions.len() < before {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found()
    }
}

/// Apply form fields to a number. A field sent with an empty value clears the
/// clearable settings; fields that are absent are left alone.
fn apply_options(number: &mut IncomingPhoneNumber, form: &HashMap<String, String>) {
    let clearable = |key: &str, slot: &mut Option<String>| {
        if let Some(value) = form.get(key) {
            *slot = (!value.is_empty()).then(|| value.clone());
        }
    };
    clearable("VoiceApplicationSid", &mut number.voice_application_sid);
    clearable("VoiceUrl", &mut number.voice_url);
    clearable("VoiceFallbackUrl", &mut number.voice_fallback_url);
    clearable("SmsApplicationSid", &mut number.sms_application_sid);
    clearable("SmsUrl", &mut number.sms_url);
    clearable("SmsFallbackUrl", &mut number.sms_fallback_url);

    if let Some(name) = non_empty(form, "FriendlyName") {
        number.friendly_name = name.to_string();
    }
    if let Some(method) = non_empty(form, "VoiceMethod") {
        number.voice_method = method.to_string();
    }
    if let Some(method) = non_empty(form, "VoiceFallbackMethod") {
        number.voice_fallback_method = method.to_string();
    }
    if let Some(lookup) = non_empty(form, "VoiceCallerIdLookup") {
        number.voice_caller_id_lookup = lookup == "true";
    }
    if let Some(url) = non_empty(form, "StatusCallbackUrl") {
        number.status_callback = Some(url.to_string());
    }
    if let Some(method) = non_empty(form, "StatusCallbackMethod") {
        number.status_callback_method = Some(method.to_string());
    }
    if let Some(method) = non_empty(form, "SmsMethod") {
        number.sms_method = method.to_string();
    }
    if let Some(method) = non_empty(form, "SmsFallbackMethod") {
        number.sms_fallback_method = method.to_string();
    }
}

fn check_friendly_name(form: &HashMap<String, String>) -> Result<(), Response> {
    match form.get("FriendlyName") {
        Some(name) if name.chars().count() > FRIENDLY_NAME_MAX_LEN => Err(error(
            StatusCode::BAD_REQUEST,
            21201,
            "FriendlyName must be 64 characters or fewer",
        )),
        _ => Ok(()),
    }
}

fn paginate<T>(items: Vec<T>, uri: &str, params: &ListParams) -> (PageMeta, Vec<T>) {
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let page = params.page.unwrap_or(0);
    let total = items.len();
    let num_pages = total.div_ceil(page_size);
    let start = page.saturating_mul(page_size);
    let slice: Vec<T> = items.into_iter().skip(start).take(page_size).collect();
    let end = (start + slice.len()).saturating_sub(1);
    let page_uri = |p: usize| format!("{uri}?Page={p}&PageSize={page_size}");

    let meta = PageMeta {
        page,
        num_pages,
        page_size,
        total,
        start,
        end,
        uri: uri.to_string(),
        first_page_uri: page_uri(0),
        previous_page_uri: (page > 0).then(|| page_uri(page - 1)),
        next_page_uri: (page.saturating_add(1) < num_pages).then(|| page_uri(page + 1)),
        last_page_uri: page_uri(num_pages.saturating_sub(1)),
    };
    (meta, slice)
}

fn non_empty<'a>(form: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    form.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

fn strip_json(segment: &str) -> &str {
    segment.strip_suffix(".json").unwrap_or(segment)
}

fn new_sid(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4().simple())
}

fn not_found() -> Response {
    error(
        StatusCode::NOT_FOUND,
        20404,
        "The requested resource was not found",
    )
}

fn error(status: StatusCode, code: u32, message: &str) -> Response {
    let body = RestException {
        code,
        message: message.to_string(),
        more_info: format!("https://www.twilio.com/docs/errors/{code}"),
        status: status.as_u16(),
    };
    (status, Json(body)).into_response()
}
