//! REST client struct, request building, and response parsing.

use serde::Serialize;

use crate::{BackendTurnResponse, DialogError};

use super::config::RestConfig;

/// Longest slice of an error body kept in `BackendStatus`.
pub(crate) const ERROR_BODY_LIMIT: usize = 200;

/// Wire shape of one webhook request.
#[derive(Debug, Serialize)]
pub(crate) struct WebhookRequest<'a> {
    pub message: &'a str,
    pub sender_id: &'a str,
}

/// REST dialog backend client. Reuses one connection pool for the
/// lifetime of the process.
pub struct RestClient {
    pub(crate) config: RestConfig,
    pub(crate) http: reqwest::Client,
}

impl RestClient {
    pub fn new(config: RestConfig) -> Result<Self, DialogError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(|e| DialogError::BackendUnreachable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub(crate) fn build_request<'a>(&self, message: &'a str, sender_id: &'a str) -> WebhookRequest<'a> {
        WebhookRequest { message, sender_id }
    }

    /// Decode a webhook response body into reply fragments.
    pub(crate) fn parse_response(body: &str) -> Result<BackendTurnResponse, DialogError> {
        serde_json::from_str(body).map_err(|e| {
            let preview: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            DialogError::BackendMalformedResponse(format!("{e} in {preview:?}"))
        })
    }

    /// Map a transport error onto the dialog error taxonomy.
    pub(crate) fn map_transport_error(err: reqwest::Error) -> DialogError {
        if err.is_timeout() {
            DialogError::Timeout
        } else if err.is_decode() {
            DialogError::BackendMalformedResponse(err.to_string())
        } else {
            DialogError::BackendUnreachable(err.to_string())
        }
    }
}
