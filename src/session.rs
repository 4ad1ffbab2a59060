//! Session context - the signed-in identity and its bearer token
//!
//! Owned by the app state and handed to every authenticated network
//! command. Populated on sign-in, cleared on sign-out or on a 401.

use chrono::{DateTime, Utc};

use crate::models::{SessionUser, SignInResponse};

#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
    pub signed_in_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default)]
pub struct SessionContext {
    current: Option<Session>,
}

impl SessionContext {
    pub fn new() -> Self {
        SessionContext { current: None }
    }

    pub fn sign_in(&mut self, response: SignInResponse) {
        tracing::info!(user = ?response.user.user_name, "Session started");
        self.current = Some(Session {
            token: response.token,
            user: response.user,
            signed_in_at: Utc::now(),
        });
    }

    /// Merge a fresh `/userauth/userinfo` payload into the session user
    pub fn refresh_user(&mut self, user: SessionUser) {
        if let Some(session) = self.current.as_mut() {
            session.user.refresh_from(user);
        }
    }

    pub fn sign_out(&mut self) {
        if self.current.take().is_some() {
            tracing::info!("Session cleared");
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.current.as_ref().map(|s| &s.user)
    }

    /// Bearer token for authenticated calls; empty tokens count as none
    pub fn token(&self) -> Option<String> {
        self.current
            .as_ref()
            .map(|s| s.token.clone())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response() -> SignInResponse {
        SignInResponse {
            token: "tok-123".into(),
            user: SessionUser {
                user_name: Some("ana".into()),
                email: Some("ana@example.com".into()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut ctx = SessionContext::new();
        assert!(!ctx.is_signed_in());
        assert_eq!(ctx.token(), None);

        ctx.sign_in(response());
        assert!(ctx.is_signed_in());
        assert_eq!(ctx.token().as_deref(), Some("tok-123"));

        ctx.refresh_user(SessionUser {
            avatar: Some("/img/avatars/ana.png".into()),
            ..Default::default()
        });
        let user = ctx.user().unwrap();
        assert_eq!(user.user_name.as_deref(), Some("ana"));
        assert_eq!(user.avatar.as_deref(), Some("/img/avatars/ana.png"));

        ctx.sign_out();
        assert!(!ctx.is_signed_in());
        assert!(ctx.user().is_none());
    }

    #[test]
    fn test_refresh_without_session_is_ignored() {
        let mut ctx = SessionContext::new();
        ctx.refresh_user(SessionUser::default());
        assert!(!ctx.is_signed_in());
    }

    #[test]
    fn test_empty_token_is_not_sent() {
        let mut ctx = SessionContext::new();
        ctx.sign_in(SignInResponse::default());
        assert!(ctx.is_signed_in());
        assert_eq!(ctx.token(), None);
    }
}
