//! App state - pure data structure with no I/O logic

use std::time::{Duration, Instant};

use crate::auth::{AuthForm, AuthScreen};
use crate::constants::ALERT_TIMEOUT_MS;
use crate::countries::SelectVariant;
use crate::form::ProfileForm;
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::RenderState;
use crate::models::ProfileField;
use crate::session::SessionContext;
use crate::storage::Storage;
use crate::ui;

/// A timed message shown above the current screen
#[derive(Clone, Debug)]
pub struct Alert {
    pub text: String,
    pub is_error: bool,
    pub expires_at: Instant,
}

impl Alert {
    pub fn new(text: impl Into<String>, is_error: bool) -> Self {
        Alert {
            text: text.into(),
            is_error,
            expires_at: Instant::now() + Duration::from_millis(ALERT_TIMEOUT_MS),
        }
    }

    pub fn is_visible(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Open list popup for a select field
#[derive(Clone, Debug)]
pub struct SelectorState {
    pub field: ProfileField,
    pub variant: SelectVariant,
    pub selected: usize,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Request tracking
    pub next_request_id: u64,
    pub pending_auth_id: Option<u64>,
    pub pending_sign_out_id: Option<u64>,
    pub pending_user_info_id: Option<u64>,
    pub pending_profile_id: Option<u64>,
    pub pending_save_id: Option<u64>,

    // Session context
    pub session: SessionContext,

    // Forms
    pub auth: AuthForm,
    pub profile: ProfileForm,
    pub selector: Option<SelectorState>,
    pub avatar_input: Option<String>,

    // Profile dropdown
    pub dropdown_open: bool,
    pub dropdown_selected: usize,

    // Popups
    pub alert: Option<Alert>,
    pub show_help: bool,

    // Configuration
    pub storage: Storage,
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        let auth = AuthForm::sign_in(storage.config.remembered_email.as_deref());
        AppState {
            screen: Screen::Auth(AuthScreen::SignIn),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            next_request_id: 1,
            pending_auth_id: None,
            pending_sign_out_id: None,
            pending_user_info_id: None,
            pending_profile_id: None,
            pending_save_id: None,
            session: SessionContext::new(),
            auth,
            profile: ProfileForm::new(),
            selector: None,
            avatar_input: None,
            dropdown_open: false,
            dropdown_selected: 0,
            alert: None,
            show_help: false,
            storage,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Get the current input field content
    pub fn current_input(&self) -> &str {
        match self.screen {
            Screen::Auth(_) => self.auth.focused_value(),
            Screen::Profile => match &self.avatar_input {
                Some(path) => path,
                None => self.profile.value(self.profile.focused),
            },
            Screen::Home => "",
        }
    }

    pub fn dropdown_items(&self) -> Vec<ui::DropdownItem> {
        ui::dropdown_items(self.session.user())
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            screen: self.screen,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            auth: self.auth.clone(),
            user: self.session.user().cloned(),
            api_url: self.storage.config.url(""),
            dropdown: if self.dropdown_open {
                Some((self.dropdown_items(), self.dropdown_selected))
            } else {
                None
            },
            profile: self.profile.clone(),
            profile_loading: self.pending_profile_id.is_some(),
            selector: self.selector.clone(),
            avatar_input: self.avatar_input.clone(),
            alert: self.alert.clone().filter(|a| a.is_visible()),
            show_help: self.show_help,
        }
    }
}
