//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use crate::storage::Storage;

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        storage: Storage,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(storage),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Send initial render state
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    let follow_up = self.state.handle_response(response);
                    self.send(follow_up);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: Option<NetworkCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.network_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Navigation
            UiEvent::GoToAuth(screen) => self.state.go_to_auth(screen),
            UiEvent::OpenProfile => {
                let cmd = self.state.open_profile();
                self.send(cmd);
            }
            UiEvent::GoHome => self.state.go_home(),

            // Field focus
            UiEvent::NextField => self.state.next_field(),
            UiEvent::PrevField => self.state.prev_field(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),

            // Forms
            UiEvent::Submit => {
                let cmd = self.state.submit();
                self.send(cmd);
            }
            UiEvent::ResetForm => self.state.reset_form(),
            UiEvent::RemoveAvatar => self.state.remove_avatar(),

            // Profile dropdown
            UiEvent::ToggleDropdown => self.state.toggle_dropdown(),
            UiEvent::DropdownUp => self.state.dropdown_up(),
            UiEvent::DropdownDown => self.state.dropdown_down(),
            UiEvent::DropdownSelect => {
                let cmd = self.state.dropdown_select();
                self.send(cmd);
            }
            UiEvent::CloseDropdown => self.state.close_dropdown(),

            // Selector
            UiEvent::OpenSelector => self.state.open_selector(),
            UiEvent::SelectorUp => self.state.selector_up(),
            UiEvent::SelectorDown => self.state.selector_down(),
            UiEvent::SelectorChoose => self.state.selector_choose(),
            UiEvent::SelectorCancel => self.state.selector_cancel(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
