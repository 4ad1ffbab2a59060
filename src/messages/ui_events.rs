//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::auth::AuthScreen;

/// Top-level screens
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Screen {
    Auth(AuthScreen),
    Home,
    Profile,
}

impl Default for Screen {
    fn default() -> Self {
        Screen::Auth(AuthScreen::SignIn)
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Navigation
    GoToAuth(AuthScreen),
    OpenProfile,
    GoHome,

    // Field focus
    NextField,
    PrevField,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Forms
    Submit,
    ResetForm,
    RemoveAvatar,

    // Profile dropdown
    ToggleDropdown,
    DropdownUp,
    DropdownDown,
    DropdownSelect,
    CloseDropdown,

    // Country / dial-code selector
    OpenSelector,
    SelectorUp,
    SelectorDown,
    SelectorChoose,
    SelectorCancel,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// The parts of the render state that decide how a key is read
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyContext {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub show_help: bool,
    pub dropdown_open: bool,
    pub selector_open: bool,
    /// The focused profile field is picked from a list
    pub focused_select: bool,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, ctx: KeyContext) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('s') => return Some(UiEvent::Submit),
            _ => {}
        }
    }

    if ctx.show_help {
        return Some(UiEvent::CloseHelp);
    }

    if ctx.selector_open {
        return match key.code {
            KeyCode::Esc => Some(UiEvent::SelectorCancel),
            KeyCode::Up => Some(UiEvent::SelectorUp),
            KeyCode::Down => Some(UiEvent::SelectorDown),
            KeyCode::Enter => Some(UiEvent::SelectorChoose),
            _ => None,
        };
    }

    if ctx.dropdown_open {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('u') => Some(UiEvent::CloseDropdown),
            KeyCode::Up => Some(UiEvent::DropdownUp),
            KeyCode::Down => Some(UiEvent::DropdownDown),
            KeyCode::Enter => Some(UiEvent::DropdownSelect),
            _ => None,
        };
    }

    if ctx.input_mode == InputMode::Editing {
        return handle_editing_keys(key, ctx.screen);
    }

    match ctx.screen {
        Screen::Auth(auth) => handle_auth_keys(key, auth),
        Screen::Home => handle_home_keys(key),
        Screen::Profile => handle_profile_keys(key, ctx.focused_select),
    }
}

fn handle_editing_keys(key: KeyEvent, screen: Screen) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::StopEditing),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Tab => Some(UiEvent::NextField),
        KeyCode::BackTab => Some(UiEvent::PrevField),
        KeyCode::Enter => match screen {
            // Enter submits credentials
            Screen::Auth(_) => Some(UiEvent::Submit),
            _ => Some(UiEvent::StopEditing),
        },
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}

fn handle_auth_keys(key: KeyEvent, screen: AuthScreen) -> Option<UiEvent> {
    if let KeyCode::Char(c) = key.code {
        if let Some((_, _, target)) = screen.links().iter().find(|(k, _, _)| *k == c) {
            return Some(UiEvent::GoToAuth(*target));
        }
    }
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
        KeyCode::Char('s') => Some(UiEvent::Submit),
        _ => None,
    }
}

fn handle_home_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('u') => Some(UiEvent::ToggleDropdown),
        KeyCode::Char('p') => Some(UiEvent::OpenProfile),
        _ => None,
    }
}

fn handle_profile_keys(key: KeyEvent, focused_select: bool) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('u') => Some(UiEvent::ToggleDropdown),
        KeyCode::Char('h') | KeyCode::Esc => Some(UiEvent::GoHome),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::NextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::PrevField),
        KeyCode::Char('e') | KeyCode::Enter => {
            if focused_select {
                Some(UiEvent::OpenSelector)
            } else {
                Some(UiEvent::StartEditing)
            }
        }
        KeyCode::Char('s') => Some(UiEvent::Submit),
        KeyCode::Char('r') => Some(UiEvent::ResetForm),
        KeyCode::Char('x') => Some(UiEvent::RemoveAvatar),
        _ => None,
    }
}
