//! Async front end. Each operation is a future that resolves exactly once
//! with the record or the error; dropping it abandons the call.

use crate::client::TwilioClient;
use crate::config::Session;
use crate::error::Result;
use crate::options::{PageFilter, PhoneNumberListFilter, PhoneNumberOptions};
use crate::transport::{AsyncTransport, ReqwestTransport};
use crate::types::{
    DeleteStatus, IncomingPhoneNumber, IncomingPhoneNumberResult, Transcription,
    TranscriptionResult,
};

/// Same operations as `BlockingClient`, built by the same `TwilioClient`.
#[derive(Debug, Clone)]
pub struct AsyncClient<T = ReqwestTransport> {
    client: TwilioClient,
    transport: T,
}

impl AsyncClient<ReqwestTransport> {
    /// Client using the stock `reqwest` transport.
    pub fn connect(session: Session) -> Self {
        Self::new(session, ReqwestTransport::new())
    }
}

impl<T: AsyncTransport> AsyncClient<T> {
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

    pub async fn get_incoming_phone_number(&self, sid: &str) -> Result<IncomingPhoneNumber> {
        let request = self.client.build_get_incoming_phone_number(sid)?;
        let response = self.transport.execute(&request).await?;
        self.client.parse_incoming_phone_number(response)
    }

    pub async fn list_incoming_phone_numbers(&self) -> Result<IncomingPhoneNumberResult> {
        self.list_incoming_phone_numbers_with(&PhoneNumberListFilter::default())
            .await
    }

    pub async fn list_incoming_phone_numbers_with(
        &self,
        filter: &PhoneNumberListFilter,
    ) -> Result<IncomingPhoneNumberResult> {
        let request = self.client.build_list_incoming_phone_numbers(filter)?;
        let response = self.transport.execute(&request).await?;
        self.client.parse_incoming_phone_number_list(response)
    }

    pub async fn add_incoming_phone_number(
        &self,
        options: &PhoneNumberOptions,
    ) -> Result<IncomingPhoneNumber> {
        let request = self.client.build_add_incoming_phone_number(options)?;
        let response = self.transport.execute(&request).await?;
        self.client.parse_incoming_phone_number(response)
    }

    pub async fn update_incoming_phone_number(
        &self,
        sid: &str,
        options: &PhoneNumberOptions,
    ) -> Result<IncomingPhoneNumber> {
        let request = self.client.build_update_incoming_phone_number(sid, options)?;
        let response = self.transport.execute(&request).await?;
        self.client.parse_incoming_phone_number(response)
    }

    pub async fn delete_incoming_phone_number(&self, sid: &str) -> Result<DeleteStatus> {
        let request = self.client.build_delete_incoming_phone_number(sid)?;
        let response = self.transport.execute(&request).await?;
        Ok(self.client.parse_delete(&response))
    }

    pub async fn get_transcription(&self, sid: &str) -> Result<Transcription> {
        let request = self.client.build_get_transcription(sid)?;
        let response = self.transport.execute(&request).await?;
        self.client.parse_transcription(response)
    }

    pub async fn list_transcriptions(&self, paging: &PageFilter) -> Result<TranscriptionResult> {
        let request = self.client.build_list_transcriptions(paging)?;
        let response = self.transport.execute(&request).await?;
        self.client.parse_transcription_list(response)
    }

    pub async fn list_recording_transcriptions(
        &self,
        recording_sid: &str,
        paging: &PageFilter,
    ) -> Result<TranscriptionResult> {
        let request = self
            .client
            .build_list_recording_transcriptions(recording_sid, paging)?;
        let response = self.transport.execute(&request).await?;
        self.client.parse_transcription_list(response)
    }

    pub async fn delete_transcription(&self, sid: &str) -> Result<DeleteStatus> {
        let request = self.client.build_delete_transcription(sid)?;
        let response = self.transport.execute(&request).await?;
        Ok(self.client.parse_delete(&response))
    }
}
