//! Full lifecycle test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP through `BlockingClient` and the stock
//! `UreqTransport`. The build/parse path is the same one the async client
//! uses, so this covers request construction and response decoding
//! end-to-end.

use mock_server::Store;
use twilio_core::{
    ApiError, BlockingClient, CallbackMethod, DeleteStatus, PageFilter, Param,
    PhoneNumberListFilter, PhoneNumberOptions, Session,
};

/// Spawn the mock server on its own runtime thread and return its base URL.
fn start_server(store: Store) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with(listener, store).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn session(base_url: &str) -> Session {
    Session::new("AC123")
        .with_auth_token("secret")
        .with_base_url(base_url)
}

#[test]
fn incoming_phone_number_lifecycle() {
    let base_url = start_server(Store::default());
    let client = BlockingClient::connect(session(&base_url));

    // Step 1: list, should be empty.
    let page = client.list_incoming_phone_numbers().unwrap();
    assert!(page.incoming_phone_numbers.is_empty(), "expected empty list");
    assert!(!page.page_info.has_next_page());

    // Step 2: purchase a specific number with a voice URL.
    let options = PhoneNumberOptions {
        phone_number: Some("+15105551234".to_string()),
        area_code: Some("415".to_string()),
        friendly_name: Some("Main line".to_string()),
        voice_url: Param::from("http://example.com/voice"),
        voice_method: Some(CallbackMethod::Get),
        ..Default::default()
    };
    let created = client.add_incoming_phone_number(&options).unwrap();
    assert!(created.sid.starts_with("PN"));
    assert_eq!(created.account_sid, "AC123");
    assert_eq!(created.phone_number, "+15105551234");
    assert_eq!(created.friendly_name.as_deref(), Some("Main line"));
    assert_eq!(created.voice_url.as_deref(), Some("http://example.com/voice"));
    assert_eq!(created.voice_method.as_deref(), Some("GET"));
    let sid = created.sid.clone();

    // Step 3: get it back.
    let fetched = client.get_incoming_phone_number(&sid).unwrap();
    assert_eq!(fetched, created);

    // Step 4: clear the voice URL and set an SMS URL.
    let update = PhoneNumberOptions {
        voice_url: Param::Clear,
        sms_url: Param::from("http://example.com/sms"),
        voice_caller_id_lookup: Some(true),
        ..Default::default()
    };
    let updated = client.update_incoming_phone_number(&sid, &update).unwrap();
    assert!(updated.voice_url.is_none());
    assert_eq!(updated.sms_url.as_deref(), Some("http://example.com/sms"));
    assert!(updated.voice_caller_id_lookup);
    assert_eq!(updated.friendly_name.as_deref(), Some("Main line"));

    // Step 5: purchase by area code.
    let by_area = PhoneNumberOptions {
        area_code: Some("510".to_string()),
        ..Default::default()
    };
    let second = client.add_incoming_phone_number(&by_area).unwrap();
    assert!(second.phone_number.starts_with("+1510"));

    // Step 6: list with and without a filter.
    let page = client.list_incoming_phone_numbers().unwrap();
    assert_eq!(page.incoming_phone_numbers.len(), 2);
    let filter = PhoneNumberListFilter {
        friendly_name: Some("Main line".to_string()),
        ..Default::default()
    };
    let page = client.list_incoming_phone_numbers_with(&filter).unwrap();
    assert_eq!(page.incoming_phone_numbers.len(), 1);
    assert_eq!(page.incoming_phone_numbers[0].sid, sid);

    // Step 7: paging.
    let filter = PhoneNumberListFilter {
        page_size: Some(1),
        ..Default::default()
    };
    let page = client.list_incoming_phone_numbers_with(&filter).unwrap();
    assert_eq!(page.incoming_phone_numbers.len(), 1);
    assert_eq!(page.page_info.num_pages, 2);
    assert!(page.page_info.has_next_page());

    // Step 8: release the number.
    let status = client.delete_incoming_phone_number(&sid).unwrap();
    assert_eq!(status, DeleteStatus::Success);

    // Step 9: get after delete is NotFound.
    let err = client.get_incoming_phone_number(&sid).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 10: delete again reports failure, not an error.
    let status = client.delete_incoming_phone_number(&sid).unwrap();
    assert_eq!(status, DeleteStatus::Failed);
}

#[test]
fn add_without_number_selection_surfaces_rest_exception() {
    let base_url = start_server(Store::default());
    let client = BlockingClient::connect(session(&base_url));

    let options = PhoneNumberOptions {
        friendly_name: Some("Nothing".to_string()),
        ..Default::default()
    };
    let err = client.add_incoming_phone_number(&options).unwrap_err();
    match err {
        ApiError::HttpError { status, code, .. } => {
            assert_eq!(status, 400);
            assert_eq!(code, Some(21450));
        }
        other => panic!("expected HttpError, got {other:?}"),
    }
}

#[test]
fn validation_failure_never_reaches_the_server() {
    // Nothing listens on this address; a request would fail with Transport.
    let client = BlockingClient::connect(session("http://127.0.0.1:9"));

    let options = PhoneNumberOptions {
        phone_number: Some("+15105551234".to_string()),
        friendly_name: Some("x".repeat(65)),
        ..Default::default()
    };
    let err = client.add_incoming_phone_number(&options).unwrap_err();
    assert!(matches!(err, ApiError::InvalidLength { max: 64, actual: 65, .. }));

    let err = client.get_incoming_phone_number("").unwrap_err();
    assert!(matches!(err, ApiError::MissingArgument { name: "IncomingPhoneNumberSid" }));
}

#[test]
fn unreachable_server_is_transport_error() {
    let client = BlockingClient::connect(session("http://127.0.0.1:9"));
    let err = client.get_incoming_phone_number("PN123").unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn transcription_lifecycle() {
    let mut store = Store::default();
    let first = store.seed_transcription("AC123", "RE001", "hello there");
    store.seed_transcription("AC123", "RE002", "call me back soon");
    let base_url = start_server(store);
    let client = BlockingClient::connect(session(&base_url));

    let page = client.list_transcriptions(&PageFilter::default()).unwrap();
    assert_eq!(page.transcriptions.len(), 2);

    let page = client
        .list_recording_transcriptions("RE002", &PageFilter::default())
        .unwrap();
    assert_eq!(page.transcriptions.len(), 1);
    let transcription = &page.transcriptions[0];
    assert_eq!(transcription.recording_sid, "RE002");
    assert_eq!(transcription.duration, 4);
    assert_eq!(
        transcription.price.map(|p| p.to_string()).as_deref(),
        Some("-0.05000")
    );
    assert!(transcription.is_completed());

    let fetched = client.get_transcription(&first.sid).unwrap();
    assert_eq!(fetched.transcription_text.as_deref(), Some("hello there"));

    let status = client.delete_transcription(&first.sid).unwrap();
    assert!(status.is_success());

    let err = client.get_transcription(&first.sid).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}
