//! HTTP client wrapper - builds JSON requests and decodes responses

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::models::HttpMethod;
use crate::storage::ClientConfig;

/// A call the server answered with a non-2xx status
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Status { status, .. } => *status,
        }
    }
}

/// HTTP status carried by an error chain, if any
pub fn status_of(err: &anyhow::Error) -> Option<u16> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ApiError>())
        .map(ApiError::status)
}

/// Message shown to the user for a failed call
pub fn user_message(err: &anyhow::Error) -> String {
    if let Some(api) = err.chain().find_map(|c| c.downcast_ref::<ApiError>()) {
        return match api {
            ApiError::Status { message, .. } => message.clone(),
        };
    }
    match err.chain().find_map(|c| c.downcast_ref::<reqwest::Error>()) {
        Some(e) if e.is_timeout() => "Request timed out".to_string(),
        Some(e) if e.is_connect() => "Connection failed".to_string(),
        _ => format!("{:#}", err),
    }
}

/// Create an HTTP client from the configuration
pub fn create_client(config: &ClientConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()
        .context("building HTTP client")
}

/// Send one JSON request and decode the JSON answer
///
/// An empty body decodes as `null`. A non-2xx status becomes an
/// [`ApiError`] using the server's `message` field when it has one.
pub async fn send<B, T>(
    client: &reqwest::Client,
    method: HttpMethod,
    url: &str,
    token: Option<&str>,
    body: Option<&B>,
) -> Result<T>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let mut req_builder = match method {
        HttpMethod::GET => client.get(url),
        HttpMethod::POST => client.post(url),
    };

    req_builder = req_builder.header("Accept", "application/json");
    if let Some(token) = token {
        req_builder = req_builder.bearer_auth(token);
    }
    if let Some(body) = body {
        req_builder = req_builder.json(body);
    }

    let resp = req_builder
        .send()
        .await
        .with_context(|| format!("{} {}", method.as_str(), url))?;
    let status = resp.status();
    let text = resp
        .text()
        .await
        .with_context(|| format!("reading response from {}", url))?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        }
        .into());
    }

    let text = if text.trim().is_empty() { "null" } else { text.as_str() };
    serde_json::from_str(text).with_context(|| format!("decoding response from {}", url))
}

#[cfg(test)]
pub(crate) mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answers one HTTP request with `status` and `body`, then returns the raw request
    pub async fn respond_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }
}

#[cfg(test)]
mod tests {
    use super::test_server::respond_once;
    use super::*;

    fn client() -> reqwest::Client {
        create_client(&ClientConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_send_decodes_json_and_sets_bearer() {
        let (base, server) = respond_once(200, r#"{"ok":true}"#).await;
        let value: Value = send::<(), _>(
            &client(),
            HttpMethod::GET,
            &format!("{}/api/ping", base),
            Some("tok"),
            None,
        )
        .await
        .unwrap();
        assert_eq!(value["ok"], Value::Bool(true));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/ping HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer tok"));
    }

    #[tokio::test]
    async fn test_empty_body_decodes_as_null() {
        let (base, _server) = respond_once(200, "").await;
        let value: Value = send::<(), _>(&client(), HttpMethod::POST, &base, None, None)
            .await
            .unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_error_status_carries_server_message() {
        let (base, _server) = respond_once(401, r#"{"message":"Token expired"}"#).await;
        let err = send::<(), Value>(&client(), HttpMethod::GET, &base, None, None)
            .await
            .unwrap_err();
        assert_eq!(status_of(&err), Some(401));
        assert_eq!(user_message(&err), "Token expired");
    }

    #[tokio::test]
    async fn test_error_without_message_uses_reason() {
        let (base, _server) = respond_once(500, "oops").await;
        let err = send::<(), Value>(&client(), HttpMethod::GET, &base, None, None)
            .await
            .unwrap_err();
        assert_eq!(status_of(&err), Some(500));
        assert_eq!(user_message(&err), "Internal Server Error");
    }
}
