//! HTTP client wrapper for SmartAPI.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_types::ApiEnvelope;
use super::config::SmartApiConfig;
use super::error::SmartApiError;

/// HTTP client for the SmartAPI REST interface.
#[derive(Debug, Clone)]
pub struct SmartApiHttpClient {
    client: Client,
    base_url: String,
}

impl SmartApiHttpClient {
    /// Create a new HTTP client from config.
    ///
    /// Credentials are not checked here; an empty API key fails at login.
    pub fn new(config: &SmartApiConfig) -> Result<Self, SmartApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers(config)?)
            .build()
            .map_err(|e| SmartApiError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// POST to a SmartAPI path and unwrap the response envelope.
    ///
    /// Returns the payload together with the broker message.
    #[allow(clippy::future_not_send)]
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        jwt: Option<&str>,
    ) -> Result<(T, String), SmartApiError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.client.post(&url).json(body);
        if let Some(jwt) = jwt {
            request = request.header(AUTHORIZATION, format!("Bearer {jwt}"));
        }

        let text = Self::send(request).await?;
        let envelope: ApiEnvelope =
            serde_json::from_str(&text).map_err(|e| SmartApiError::JsonParse(e.to_string()))?;
        let message = envelope.message.clone();
        Ok((envelope.into_result()?, message))
    }

    /// GET an absolute URL returning plain JSON (no envelope).
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SmartApiError> {
        let text = Self::send(self.client.get(url)).await?;
        serde_json::from_str(&text).map_err(|e| SmartApiError::JsonParse(e.to_string()))
    }

    /// Send once and return the body of a successful response.
    async fn send(request: RequestBuilder) -> Result<String, SmartApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| SmartApiError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SmartApiError::Http(e.to_string()))?;

        if status.is_success() {
            return Ok(text);
        }

        // Error bodies usually still carry an envelope with a broker code
        let envelope = serde_json::from_str::<ApiEnvelope>(&text).ok();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SmartApiError::Unauthorized {
                status: status.as_u16(),
                message: envelope.map_or(text, |e| e.message),
            }),
            _ => Err(match envelope {
                Some(e) if !e.errorcode.is_empty() || !e.message.is_empty() => SmartApiError::Api {
                    code: e.errorcode,
                    message: e.message,
                },
                _ => SmartApiError::Api {
                    code: status.as_u16().to_string(),
                    message: text,
                },
            }),
        }
    }
}

fn default_headers(config: &SmartApiConfig) -> Result<HeaderMap, SmartApiError> {
    let value = |v: &str| {
        HeaderValue::from_str(v).map_err(|e| SmartApiError::Http(format!("invalid header value: {e}")))
    };

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert("X-UserType", HeaderValue::from_static("USER"));
    headers.insert("X-SourceID", HeaderValue::from_static("WEB"));
    headers.insert("X-ClientLocalIP", value(&config.client_local_ip)?);
    headers.insert("X-ClientPublicIP", value(&config.client_public_ip)?);
    headers.insert("X-MACAddress", value(&config.mac_address)?);
    headers.insert("X-PrivateKey", value(&config.api_key)?);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_headers_are_set() {
        let config = SmartApiConfig::new("key-1").with_client_identity(
            "10.0.0.2",
            "203.0.113.7",
            "aa:bb:cc:dd:ee:ff",
        );
        let headers = default_headers(&config).unwrap();

        assert_eq!(headers["X-PrivateKey"], "key-1");
        assert_eq!(headers["X-UserType"], "USER");
        assert_eq!(headers["X-SourceID"], "WEB");
        assert_eq!(headers["X-ClientPublicIP"], "203.0.113.7");
        assert_eq!(headers["X-MACAddress"], "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn invalid_header_value_is_an_error() {
        let config = SmartApiConfig::new("bad\nkey");
        assert!(default_headers(&config).is_err());
    }
}
