//! Command handlers - business logic for processing UI events

use crate::app::state::{Alert, SelectorState};
use crate::app::AppState;
use crate::auth::{AuthFieldKind, AuthForm, AuthScreen};
use crate::countries::SelectVariant;
use crate::form::{ProfileForm, SubmitOutcome};
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::{NetworkCommand, NetworkResponse, Operation};
use crate::models::ProfileField;
use crate::ui::{self, DropdownAction, DropdownItem};

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn go_to_auth(&mut self, screen: AuthScreen) {
        if self.session.is_signed_in() {
            return;
        }
        self.auth = match screen {
            AuthScreen::SignIn => AuthForm::sign_in(self.storage.config.remembered_email.as_deref()),
            other => AuthForm::new(other),
        };
        self.pending_auth_id = None;
        self.screen = Screen::Auth(screen);
        self.input_mode = InputMode::Normal;
    }

    /// Show the settings form, fetching the profile the first time
    pub fn open_profile(&mut self) -> Option<NetworkCommand> {
        if !self.session.is_signed_in() {
            return None;
        }
        self.dropdown_open = false;
        self.screen = Screen::Profile;
        self.input_mode = InputMode::Normal;

        if self.profile.is_loaded() || self.pending_profile_id.is_some() {
            return None;
        }
        let id = self.next_id();
        self.pending_profile_id = Some(id);
        Some(NetworkCommand::FetchProfile {
            id,
            token: self.session.token(),
        })
    }

    pub fn go_home(&mut self) {
        if self.session.is_signed_in() {
            self.stop_editing();
            self.screen = Screen::Home;
        }
    }

    pub fn next_field(&mut self) {
        self.apply_avatar_input();
        match self.screen {
            Screen::Auth(_) => self.auth.next_field(),
            Screen::Profile => self.profile.focused = self.profile.focused.next(),
            Screen::Home => return,
        }
        self.follow_focus();
    }

    pub fn prev_field(&mut self) {
        self.apply_avatar_input();
        match self.screen {
            Screen::Auth(_) => self.auth.prev_field(),
            Screen::Profile => self.profile.focused = self.profile.focused.prev(),
            Screen::Home => return,
        }
        self.follow_focus();
    }

    /// Keep editing across a focus change when the new field is typed into
    fn follow_focus(&mut self) {
        if self.input_mode != InputMode::Editing {
            return;
        }
        if self.screen == Screen::Profile && self.profile.focused.is_select() {
            self.input_mode = InputMode::Normal;
            return;
        }
        self.start_editing();
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        match self.screen {
            Screen::Home => return,
            Screen::Profile => {
                let field = self.profile.focused;
                if field.is_select() || self.profile_locked() {
                    return;
                }
                if field == ProfileField::Img {
                    self.avatar_input = Some(String::new());
                }
            }
            Screen::Auth(_) => {
                if self.auth.is_busy() {
                    return;
                }
            }
        }
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.current_input().len();
    }

    /// Profile form accepts no edits until its record arrives or while saving
    fn profile_locked(&self) -> bool {
        !self.profile.is_loaded() || self.profile.is_busy()
    }

    /// Cursor clamped to the input and moved back onto a char boundary
    fn clamped_cursor(&self) -> usize {
        let input = self.current_input();
        let mut pos = self.cursor_position.min(input.len());
        while !input.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }

    pub fn stop_editing(&mut self) {
        self.apply_avatar_input();
        self.input_mode = InputMode::Normal;
    }

    fn apply_avatar_input(&mut self) {
        let Some(path) = self.avatar_input.take() else {
            return;
        };
        let path = path.trim();
        if path.is_empty() {
            return;
        }
        match self.profile.set_avatar(path) {
            Ok(()) => tracing::info!(path, "Avatar picked"),
            Err(message) => {
                tracing::warn!(path, "Rejected avatar file");
                self.alert = Some(Alert::new(message, true));
            }
        }
    }

    /// Apply an edit to whatever input has focus
    fn edit_current<F>(&mut self, f: F)
    where
        F: FnOnce(&mut String),
    {
        match self.screen {
            Screen::Auth(_) => {
                if let Some(value) = self.auth.focused_value_mut() {
                    f(value);
                }
            }
            Screen::Profile => match self.avatar_input.as_mut() {
                Some(path) => f(path),
                None => {
                    let field = self.profile.focused;
                    self.profile.edit(field, f);
                }
            },
            Screen::Home => {}
        }
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if self.input_mode != InputMode::Editing {
            return;
        }
        if self.screen == Screen::Profile
            && self.avatar_input.is_none()
            && !ProfileForm::accepts(self.profile.focused, c)
        {
            tracing::debug!(field = ?self.profile.focused, "Ignored character");
            return;
        }
        let cursor_pos = self.clamped_cursor();
        self.edit_current(|input| input.insert(cursor_pos, c));
        self.cursor_position = cursor_pos + c.len_utf8();
    }

    pub fn delete_char(&mut self) {
        if self.input_mode != InputMode::Editing || self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.clamped_cursor();
        let prev_pos = self.current_input()[..cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.edit_current(|input| {
            input.remove(prev_pos);
        });
        self.cursor_position = prev_pos;
    }

    // ========================
    // Submitting
    // ========================

    pub fn submit(&mut self) -> Option<NetworkCommand> {
        match self.screen {
            Screen::Auth(_) => self.submit_auth(),
            Screen::Profile => self.submit_profile(),
            Screen::Home => None,
        }
    }

    fn submit_auth(&mut self) -> Option<NetworkCommand> {
        self.input_mode = InputMode::Normal;
        let id = self.next_request_id;
        let cmd = self.auth.submit(id)?;
        self.next_id();
        tracing::info!(id, screen = ?self.auth.screen, "Submitting credentials");
        self.pending_auth_id = Some(id);
        Some(cmd)
    }

    fn submit_profile(&mut self) -> Option<NetworkCommand> {
        self.stop_editing();
        if !self.profile.is_loaded() {
            tracing::debug!("Profile not loaded yet");
            return None;
        }
        match self.profile.submit() {
            SubmitOutcome::Busy => {
                tracing::debug!("Save already in flight");
                None
            }
            SubmitOutcome::Invalid(field) => {
                tracing::warn!(field = field.key(), "Profile form has invalid fields");
                None
            }
            SubmitOutcome::Ready(record) => {
                let id = self.next_id();
                tracing::info!(id, "Saving profile");
                self.pending_save_id = Some(id);
                Some(NetworkCommand::SaveProfile { id, record })
            }
        }
    }

    pub fn reset_form(&mut self) {
        if self.screen == Screen::Profile && !self.profile_locked() {
            self.stop_editing();
            self.profile.reset_to_saved();
        }
    }

    pub fn remove_avatar(&mut self) {
        if self.screen == Screen::Profile && !self.profile_locked() {
            self.profile.remove_avatar();
        }
    }

    // ========================
    // Profile dropdown
    // ========================

    pub fn toggle_dropdown(&mut self) {
        if !self.session.is_signed_in() {
            return;
        }
        self.dropdown_open = !self.dropdown_open;
        if self.dropdown_open {
            self.dropdown_selected = ui::first_selectable(&self.dropdown_items());
        }
    }

    pub fn close_dropdown(&mut self) {
        self.dropdown_open = false;
    }

    pub fn dropdown_up(&mut self) {
        self.dropdown_selected = ui::step_selectable(&self.dropdown_items(), self.dropdown_selected, false);
    }

    pub fn dropdown_down(&mut self) {
        self.dropdown_selected = ui::step_selectable(&self.dropdown_items(), self.dropdown_selected, true);
    }

    pub fn dropdown_select(&mut self) -> Option<NetworkCommand> {
        let items = self.dropdown_items();
        let action = match items.get(self.dropdown_selected) {
            Some(DropdownItem::Action { action, .. }) => *action,
            _ => return None,
        };
        self.dropdown_open = false;
        match action {
            DropdownAction::Profile => {
                tracing::info!("Navigating to profile");
                self.open_profile()
            }
            DropdownAction::SignOut => self.sign_out(),
        }
    }

    /// Clear the session locally and tell the server
    pub fn sign_out(&mut self) -> Option<NetworkCommand> {
        if !self.session.is_signed_in() {
            return None;
        }
        let token = self.session.token();
        self.clear_session();

        let id = self.next_id();
        self.pending_sign_out_id = Some(id);
        Some(NetworkCommand::SignOut { id, token })
    }

    /// Drop the session and everything cached for it
    fn clear_session(&mut self) {
        self.session.sign_out();
        self.profile = ProfileForm::new();
        self.selector = None;
        self.avatar_input = None;
        self.dropdown_open = false;
        self.pending_user_info_id = None;
        self.pending_profile_id = None;
        self.pending_save_id = None;
        self.go_to_auth(AuthScreen::SignIn);
    }

    // ========================
    // Country / dial-code selector
    // ========================

    pub fn open_selector(&mut self) {
        let field = self.profile.focused;
        let variant = match field {
            ProfileField::DialCode => SelectVariant::Phone,
            ProfileField::Country => SelectVariant::Country,
            _ => return,
        };
        if self.profile_locked() {
            return;
        }
        let selected = variant.position_of(self.profile.value(field)).unwrap_or(0);
        self.selector = Some(SelectorState {
            field,
            variant,
            selected,
        });
    }

    pub fn selector_up(&mut self) {
        if let Some(sel) = self.selector.as_mut() {
            let len = sel.variant.options().len();
            if len > 0 {
                sel.selected = sel.selected.checked_sub(1).unwrap_or(len - 1);
            }
        }
    }

    pub fn selector_down(&mut self) {
        if let Some(sel) = self.selector.as_mut() {
            let len = sel.variant.options().len();
            if len > 0 {
                sel.selected = (sel.selected + 1) % len;
            }
        }
    }

    pub fn selector_choose(&mut self) {
        if let Some(sel) = self.selector.take() {
            if let Some(option) = sel.variant.options().get(sel.selected) {
                self.profile.set_value(sel.field, sel.variant.stored_value(option));
            }
        }
    }

    pub fn selector_cancel(&mut self) {
        self.selector = None;
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Response handling
    // ========================

    /// Apply a network response; may ask for a follow-up call
    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        let id = response.id();

        if response.is_unauthorized() && self.is_authenticated_call(id) {
            tracing::warn!(id, "Session rejected by server");
            self.clear_session();
            self.alert = Some(Alert::new("Your session has expired. Please sign in again.", true));
            return None;
        }

        match response {
            NetworkResponse::SignedIn { id, response } => {
                if self.pending_auth_id != Some(id) {
                    return None;
                }
                self.pending_auth_id = None;
                self.auth.finish();
                let email = self.auth.value(AuthFieldKind::Email).to_string();
                if let Err(e) = self.storage.remember_email(&email) {
                    tracing::warn!(error = %e, "Could not remember email");
                }
                self.session.sign_in(response);
                self.screen = Screen::Home;
                self.input_mode = InputMode::Normal;
                self.alert = Some(Alert::new("Signed in", false));

                let follow_up = self.next_id();
                self.pending_user_info_id = Some(follow_up);
                Some(NetworkCommand::FetchUserInfo {
                    id: follow_up,
                    token: self.session.token(),
                })
            }
            NetworkResponse::Completed { id, operation } => {
                if self.pending_sign_out_id == Some(id) {
                    self.pending_sign_out_id = None;
                    return None;
                }
                if self.pending_auth_id != Some(id) {
                    return None;
                }
                self.pending_auth_id = None;
                self.auth.finish();
                match operation {
                    Operation::SignUp => {
                        self.go_to_auth(AuthScreen::SignIn);
                        self.alert = Some(Alert::new("Account created. Please sign in.", false));
                    }
                    Operation::ForgotPassword => {
                        self.alert = Some(Alert::new(
                            "Please check your email to reset your password.",
                            false,
                        ));
                    }
                    Operation::ResetPassword => {
                        self.go_to_auth(AuthScreen::SignIn);
                        self.alert = Some(Alert::new("Password updated. Please sign in.", false));
                    }
                    _ => {}
                }
                None
            }
            NetworkResponse::UserInfo { id, user } => {
                if self.pending_user_info_id == Some(id) {
                    self.pending_user_info_id = None;
                    self.session.refresh_user(user);
                }
                None
            }
            NetworkResponse::Profile { id, record } => {
                if self.pending_profile_id == Some(id) {
                    self.pending_profile_id = None;
                    self.avatar_input = None;
                    self.stop_editing();
                    self.selector = None;
                    self.profile.reset(record);
                    self.cursor_position = self.clamped_cursor();
                }
                None
            }
            NetworkResponse::ProfileSaved { id, record } => {
                if self.pending_save_id == Some(id) {
                    self.pending_save_id = None;
                    self.profile.finish_submit(record);
                    self.alert = Some(Alert::new("Profile updated", false));
                }
                None
            }
            NetworkResponse::Error { id, operation, message, .. } => {
                self.handle_error(id, operation, message);
                None
            }
        }
    }

    fn is_authenticated_call(&self, id: u64) -> bool {
        self.session.is_signed_in()
            && (self.pending_user_info_id == Some(id)
                || self.pending_profile_id == Some(id)
                || self.pending_save_id == Some(id))
    }

    fn handle_error(&mut self, id: u64, operation: Operation, message: String) {
        if self.pending_auth_id == Some(id) {
            self.pending_auth_id = None;
            self.auth.finish();
        } else if self.pending_save_id == Some(id) {
            self.pending_save_id = None;
            self.profile.fail_submit();
        } else if self.pending_profile_id == Some(id) {
            self.pending_profile_id = None;
        } else if self.pending_user_info_id == Some(id) {
            self.pending_user_info_id = None;
            // The sign-in payload already carries a usable user
            return;
        } else if self.pending_sign_out_id == Some(id) {
            self.pending_sign_out_id = None;
            return;
        } else {
            return;
        }
        self.alert = Some(Alert::new(
            format!("Could not {}: {}", operation.as_str(), message),
            true,
        ));
    }
}
