//! Blocking front end: build, execute, parse in one call.

use crate::client::TwilioClient;
use crate::config::Session;
use crate::error::Result;
use crate::options::{PageFilter, PhoneNumberListFilter, PhoneNumberOptions};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    DeleteStatus, IncomingPhoneNumber, IncomingPhoneNumberResult, Transcription,
    TranscriptionResult,
};

/// Runs each operation to completion on the calling thread.
#[derive(Debug, Clone)]
pub struct BlockingClient<T = UreqTransport> {
    client: TwilioClient,
    transport: T,
}

impl BlockingClient<UreqTransport> {
    /// Client using the stock `ureq` transport.
    pub fn connect(session: Session) -> Self {
        Self::new(session, UreqTransport::new())
    }
}

impl<T: Transport> BlockingClient<T> {
    pub fn new(session: Session, transport: T) -> Self {
        Self {
            client: TwilioClient::new(session),
            transport,
        }
    }

    pub fn client(&self) -> &TwilioClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get_incoming_phone_number(&self, sid: &str) -> Result<IncomingPhoneNumber> {
        let request = self.client.build_get_incoming_phone_number(sid)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_incoming_phone_number(response)
    }

    /// Every number on the account, server-default paging.
    pub fn list_incoming_phone_numbers(&self) -> Result<IncomingPhoneNumberResult> {
        self.list_incoming_phone_numbers_with(&PhoneNumberListFilter::default())
    }

    pub fn list_incoming_phone_numbers_with(
        &self,
        filter: &PhoneNumberListFilter,
    ) -> Result<IncomingPhoneNumberResult> {
        let request = self.client.build_list_incoming_phone_numbers(filter)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_incoming_phone_number_list(response)
    }

    pub fn add_incoming_phone_number(
        &self,
        options: &PhoneNumberOptions,
    ) -> Result<IncomingPhoneNumber> {
        let request = self.client.build_add_incoming_phone_number(options)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_incoming_phone_number(response)
    }

    pub fn update_incoming_phone_number(
        &self,
        sid: &str,
        options: &PhoneNumberOptions,
    ) -> Result<IncomingPhoneNumber> {
        let request = self.client.build_update_incoming_phone_number(sid, options)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_incoming_phone_number(response)
    }

    pub fn delete_incoming_phone_number(&self, sid: &str) -> Result<DeleteStatus> {
        let request = self.client.build_delete_incoming_phone_number(sid)?;
        let response = self.transport.execute(&request)?;
        Ok(self.client.parse_delete(&response))
    }

    pub fn get_transcription(&self, sid: &str) -> Result<Transcription> {
        let request = self.client.build_get_transcription(sid)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_transcription(response)
    }

    pub fn list_transcriptions(&self, paging: &PageFilter) -> Result<TranscriptionResult> {
        let request = self.client.build_list_transcriptions(paging)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_transcription_list(response)
    }

    pub fn list_recording_transcriptions(
        &self,
        recording_sid: &str,
        paging: &PageFilter,
    ) -> Result<TranscriptionResult> {
        let request = self
            .client
            .build_list_recording_transcriptions(recording_sid, paging)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_transcription_list(response)
    }

    pub fn delete_transcription(&self, sid: &str) -> Result<DeleteStatus> {
        let request = self.client.build_delete_transcription(sid)?;
        let response = self.transport.execute(&request)?;
        Ok(self.client.parse_delete(&response))
    }
}
