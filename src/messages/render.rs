//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::{Alert, SelectorState};
use crate::auth::AuthForm;
use crate::form::ProfileForm;
use crate::messages::ui_events::{InputMode, KeyContext, Screen};
use crate::models::SessionUser;
use crate::ui::DropdownItem;

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // Auth screens
    pub auth: AuthForm,

    // Session
    pub user: Option<SessionUser>,
    pub api_url: String,

    // Profile dropdown
    pub dropdown: Option<(Vec<DropdownItem>, usize)>,

    // Settings form
    pub profile: ProfileForm,
    pub profile_loading: bool,
    pub selector: Option<SelectorState>,
    /// Path typed for a new avatar, while editing the avatar field
    pub avatar_input: Option<String>,

    // Popups
    pub alert: Option<Alert>,
    pub show_help: bool,
}

impl RenderState {
    pub fn key_context(&self) -> KeyContext {
        KeyContext {
            screen: self.screen,
            input_mode: self.input_mode,
            show_help: self.show_help,
            dropdown_open: self.dropdown.is_some(),
            selector_open: self.selector.is_some(),
            focused_select: self.profile.focused.is_select(),
        }
    }
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            screen: Screen::default(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            auth: AuthForm::sign_in(None),
            user: None,
            api_url: String::new(),
            dropdown: None,
            profile: ProfileForm::new(),
            profile_loading: false,
            selector: None,
            avatar_input: None,
            alert: None,
            show_help: false,
        }
    }
}
