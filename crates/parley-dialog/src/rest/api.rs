//! DialogBackend trait implementation for RestClient.

use async_trait::async_trait;
use tracing::debug;

use crate::{BackendTurnResponse, DialogBackend, DialogError};

use super::client::{RestClient, ERROR_BODY_LIMIT};

#[async_trait]
impl DialogBackend for RestClient {
    async fn send(
        &self,
        message: &str,
        sender_id: &str,
    ) -> Result<BackendTurnResponse, DialogError> {
        let body = self.build_request(message, sender_id);

        debug!(endpoint = %self.config.endpoint, sender_id, message, "Backend request");

        let response = self
            .http
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(RestClient::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text = text.chars().take(ERROR_BODY_LIMIT).collect::<String>();
            return Err(DialogError::BackendStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        let text = response
            .text()
            .await
            .map_err(RestClient::map_transport_error)?;

        let fragments = RestClient::parse_response(&text)?;
        debug!(fragments = fragments.len(), "Backend response");
        Ok(fragments)
    }
}
