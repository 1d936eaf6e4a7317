use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ChatError;

pub const CHAT_PATH: &str = "/api/chat";

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    reply: String,
}

/// Thin wrapper around the backend's single chat endpoint.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, CHAT_PATH)
    }

    /// Posts one message and returns the backend's reply text.
    ///
    /// One attempt, no timeout. The message is sent exactly as typed.
    pub async fn send(&self, message: &str) -> Result<String, ChatError> {
        let url = self.endpoint();
        debug!(%url, chars = message.chars().count(), "sending chat message");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|err| {
                warn!(%url, error = %err, "chat request could not be sent");
                err
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = status_error(status.as_u16(), &body);
            warn!(status = status.as_u16(), error = %err, "chat backend returned an error");
            return Err(err);
        }

        let reply: ChatReply = serde_json::from_str(&body).map_err(|err| {
            warn!(error = %err, "chat reply body is not valid");
            ChatError::MalformedResponse(err)
        })?;

        info!(chars = reply.reply.chars().count(), "received chat reply");
        Ok(reply.reply)
    }
}

/// Builds the failure for a non-success response from its raw body.
///
/// A usable `detail` wins; a JSON body without one gets the status-coded
/// message; a body that is not JSON at all gets the "Unknown error" text,
/// still carrying the status code.
pub fn status_error(status: u16, body: &str) -> ChatError {
    let message = match serde_json::from_str::<Value>(body) {
        Ok(parsed) => match parsed.get("detail") {
            Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
            Some(Value::Null) | Some(Value::String(_)) | None => {
                format!("HTTP error! status: {status}")
            }
            Some(other) => other.to_string(),
        },
        Err(_) => format!("Unknown error (HTTP status {status})"),
    };

    ChatError::Status { status, message }
}
