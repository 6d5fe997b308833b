use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{Transport, Variables};
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::util::text::truncate;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PERSONAL_KEY_PREFIX: &str = "lin_api_";

pub struct LinearClient {
    endpoint: String,
    authorization: String,
    client: reqwest::Client,
}

impl LinearClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("linear-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            endpoint: config.api_url.clone(),
            authorization: authorization_value(&config.api_key),
            client,
        })
    }
}

/// Personal API keys go in verbatim; OAuth tokens need the bearer scheme.
fn authorization_value(credential: &str) -> String {
    if credential.starts_with(PERSONAL_KEY_PREFIX) || credential.starts_with("Bearer ") {
        credential.to_string()
    } else {
        format!("Bearer {credential}")
    }
}

#[derive(Deserialize)]
struct Envelope {
    data: Option<Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: Option<String>,
}

#[async_trait]
impl Transport for LinearClient {
    async fn execute(&self, query: &str, variables: Variables) -> Result<Value> {
        let mut body = serde_json::json!({ "query": query });
        if !variables.is_empty() {
            debug!(variables = ?variables.keys().collect::<Vec<_>>(), "attaching variables");
            body["variables"] = Value::Object(variables);
        }

        debug!(endpoint = %self.endpoint, "sending GraphQL request");
        let resp = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, &self.authorization)
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let text = resp.text().await?;
        debug!(status, bytes = text.len(), "received GraphQL response");
        decode_envelope(status, &text)
    }
}

/// Turn a raw HTTP status and body into the `data` object or a typed error.
///
/// An envelope with a non-empty `errors` list is always an error, even when
/// `data` is populated alongside it.
fn decode_envelope(status: u16, body: &str) -> Result<Value> {
    match status {
        401 => return Err(ClientError::Unauthorized),
        429 => return Err(ClientError::RateLimited),
        _ => {}
    }
    let success = (200..300).contains(&status);
    let http_error = || ClientError::Http {
        status,
        body: truncate(&body.split_whitespace().collect::<Vec<_>>().join(" "), 200),
    };

    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !success => return Err(http_error()),
        Err(e) => {
            return Err(ClientError::MalformedResponse(format!(
                "response body is not valid JSON: {e}"
            )))
        }
    };

    if let Some(first) = envelope.errors.as_ref().and_then(|errors| errors.first()) {
        let message = first
            .message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(ClientError::GraphQl(message));
    }
    if !success {
        return Err(http_error());
    }

    match envelope.data {
        Some(data @ Value::Object(_)) => Ok(data),
        _ => Err(ClientError::MalformedResponse(
            "response has no data object".to_string(),
        )),
    }
}
