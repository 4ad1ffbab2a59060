//! # Account Desk
//!
//! A terminal client for an account service.
//!
//! ## Features
//! - Sign in, sign up, forgot-password and reset-password screens
//! - Profile dropdown with the signed-in user and a sign-out action
//! - Settings form for the user profile with inline validation
//! - Country and dial-code pickers backed by a fixed country list
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod auth;
pub mod constants;
pub mod countries;
pub mod form;
pub mod models;
pub mod session;
pub mod storage;
pub mod ui;
pub mod validation;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use models::{HttpMethod, ProfileField, ProfileRecord, SessionUser};
pub use form::{ProfileForm, SubmitOutcome};
pub use session::SessionContext;
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::NetworkActor;
