//! Service wrappers - one async function per remote operation
//!
//! Each wrapper is a pass-through to [`send`] with a fixed method
//! and path. Failures are logged and handed back to the caller unchanged.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::constants::SAVE_LATENCY_MS;
use crate::models::{
    ForgotPassword, HttpMethod, ProfileRecord, ResetPassword, SessionUser, SignInCredential,
    SignInResponse, SignUpCredential,
};
use crate::network::client::send;
use crate::storage::ClientConfig;

/// Log a failed call and pass the error on
fn logged<T>(operation: &str, result: Result<T>) -> Result<T> {
    result
        .with_context(|| format!("{} failed", operation))
        .inspect_err(|e| tracing::error!(operation, error = %format!("{:#}", e), "Remote call failed"))
}

pub async fn api_sign_in(
    client: &reqwest::Client,
    config: &ClientConfig,
    credential: &SignInCredential,
) -> Result<SignInResponse> {
    let url = config.url(&config.endpoints.sign_in);
    tracing::info!(url = %url, email = %credential.email, "Signing in");
    logged("sign in", send(client, HttpMethod::POST, &url, None, Some(credential)).await)
}

pub async fn api_sign_out(
    client: &reqwest::Client,
    config: &ClientConfig,
    token: Option<&str>,
) -> Result<()> {
    let url = config.url(&config.endpoints.sign_out);
    tracing::info!(url = %url, "Signing out");
    let _: Value = logged("sign out", send::<(), _>(client, HttpMethod::POST, &url, token, None).await)?;
    Ok(())
}

pub async fn api_forgot_password(
    client: &reqwest::Client,
    config: &ClientConfig,
    payload: &ForgotPassword,
) -> Result<()> {
    let url = config.url(&config.endpoints.forgot_password);
    tracing::info!(url = %url, "Requesting password reset");
    let _: Value = logged(
        "forgot password",
        send(client, HttpMethod::POST, &url, None, Some(payload)).await,
    )?;
    Ok(())
}

pub async fn api_reset_password(
    client: &reqwest::Client,
    config: &ClientConfig,
    payload: &ResetPassword,
) -> Result<()> {
    let url = config.url(&config.endpoints.reset_password);
    tracing::info!(url = %url, "Resetting password");
    let _: Value = logged(
        "reset password",
        send(client, HttpMethod::POST, &url, None, Some(payload)).await,
    )?;
    Ok(())
}

pub async fn api_sign_up(
    client: &reqwest::Client,
    config: &ClientConfig,
    credential: &SignUpCredential,
) -> Result<()> {
    let url = config.url(&config.endpoints.sign_up);
    tracing::info!(url = %url, user = %credential.user_name, "Registering account");
    let _: Value = logged(
        "sign up",
        send(client, HttpMethod::POST, &url, None, Some(credential)).await,
    )?;
    Ok(())
}

/// The `currentUser` call
pub async fn fetch_user_info(
    client: &reqwest::Client,
    config: &ClientConfig,
    token: Option<&str>,
) -> Result<SessionUser> {
    let url = config.url(&config.endpoints.user_info);
    tracing::info!(url = %url, "Fetching user info");
    logged("user info", send::<(), _>(client, HttpMethod::GET, &url, token, None).await)
}

pub async fn get_settings_profile(
    client: &reqwest::Client,
    config: &ClientConfig,
    token: Option<&str>,
) -> Result<ProfileRecord> {
    let url = config.url(&config.endpoints.settings_profile);
    tracing::info!(url = %url, "Fetching settings profile");
    logged(
        "fetch profile",
        send::<(), _>(client, HttpMethod::GET, &url, token, None).await,
    )
}

/// Persist the merged profile
///
/// There is no backend write yet: the record is accepted after a fixed
/// delay, as the web client does.
pub async fn save_profile(record: ProfileRecord) -> Result<ProfileRecord> {
    tokio::time::sleep(Duration::from_millis(SAVE_LATENCY_MS)).await;
    tracing::info!(email = %record.email, "Profile saved");
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::client::test_server::respond_once;
    use crate::network::client::{create_client, status_of};

    fn config(base: &str) -> ClientConfig {
        ClientConfig {
            base_url: base.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_sign_in_posts_credentials() {
        let (base, server) =
            respond_once(200, r#"{"token":"tok","user":{"userName":"ana","authority":["USER"]}}"#).await;
        let config = config(&base);
        let client = create_client(&config).unwrap();
        let credential = SignInCredential {
            email: "ana@example.com".into(),
            password: "pw".into(),
        };

        let response = api_sign_in(&client, &config, &credential).await.unwrap();
        assert_eq!(response.token, "tok");
        assert_eq!(response.user.user_name.as_deref(), Some("ana"));
        assert_eq!(response.user.authority, vec!["USER".to_string()]);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/sign-in HTTP/1.1"));
        assert!(request.contains(r#""email":"ana@example.com""#));
    }

    #[tokio::test]
    async fn test_sign_up_uses_register_path() {
        let (base, server) = respond_once(200, "{}").await;
        let config = config(&base);
        let client = create_client(&config).unwrap();
        let credential = SignUpCredential {
            user_name: "ana".into(),
            email: "ana@example.com".into(),
            password: "pw".into(),
        };

        api_sign_up(&client, &config, &credential).await.unwrap();
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/main/register HTTP/1.1"));
        assert!(request.contains(r#""userName":"ana""#));
    }

    #[tokio::test]
    async fn test_settings_profile_is_get_with_bearer() {
        let (base, server) = respond_once(
            200,
            r#"{"firstName":"Ana","dialCode":"1","country":"US","id":"42"}"#,
        )
        .await;
        let config = config(&base);
        let client = create_client(&config).unwrap();

        let record = get_settings_profile(&client, &config, Some("tok")).await.unwrap();
        assert_eq!(record.first_name, "Ana");
        assert_eq!(record.dial_code, "1");
        assert_eq!(record.extra.get("id"), Some(&Value::String("42".into())));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/settings/profile/ HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer tok"));
    }

    #[tokio::test]
    async fn test_user_info_unauthorized_is_rethrown() {
        let (base, _server) = respond_once(401, r#"{"message":"Unauthorized"}"#).await;
        let config = config(&base);
        let client = create_client(&config).unwrap();

        let err = fetch_user_info(&client, &config, None).await.unwrap_err();
        assert_eq!(status_of(&err), Some(401));
    }

    #[tokio::test]
    async fn test_sign_out_accepts_empty_body() {
        let (base, server) = respond_once(200, "").await;
        let config = config(&base);
        let client = create_client(&config).unwrap();

        api_sign_out(&client, &config, Some("tok")).await.unwrap();
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/sign-out HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_save_profile_echoes_record() {
        let record = ProfileRecord {
            city: "Boston".into(),
            ..Default::default()
        };
        let saved = save_profile(record.clone()).await.unwrap();
        assert_eq!(saved, record);
    }
}
