//! Account Desk - Actor-based terminal client for the account service
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async service calls

use std::io;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use accountdesk::auth::AuthScreen;
use accountdesk::constants::{APP_NAME, LOG_FILE};
use accountdesk::countries::{SelectControl, SelectVariant};
use accountdesk::messages::ui_events::{key_to_ui_event, InputMode, Screen};
use accountdesk::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use accountdesk::models::ProfileField;
use accountdesk::storage::Storage;
use accountdesk::ui::{self, DropdownItem};
use accountdesk::{AppActor, NetworkActor};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let storage = Storage::new();
    tracing::info!(base_url = %storage.config.base_url, "Starting {}", APP_NAME);

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(storage.config.clone(), net_resp_tx)?;
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(storage, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, current_state.key_context()) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Header bar
            Constraint::Length(1),  // Alert
            Constraint::Min(0),     // Content
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_header_bar(f, state, main_chunks[0]);
    draw_alert(f, state, main_chunks[1]);

    match state.screen {
        Screen::Auth(screen) => draw_auth_screen(f, state, screen, main_chunks[2]),
        Screen::Home => draw_home(f, state, main_chunks[2]),
        Screen::Profile => draw_profile(f, state, main_chunks[2]),
    }

    draw_status_bar(f, state, main_chunks[3]);

    // Popups
    if let Some((items, selected)) = &state.dropdown {
        draw_dropdown(f, items, *selected, area);
    }

    if state.selector.is_some() {
        draw_selector(f, state, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_header_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", APP_NAME),
            Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
        ),
        Span::styled(format!(" {} ", state.api_url), Style::default().fg(Color::DarkGray)),
    ];

    if let Some(user) = &state.user {
        let has_avatar = user.avatar.as_deref().is_some_and(|a| !a.is_empty());
        let name = user.user_name.as_deref().unwrap_or("Anonymous");
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("{} {} (u) ", ui::avatar_marker(has_avatar), name),
            Style::default().fg(Color::Yellow),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_alert(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(alert) = state.alert.as_ref().filter(|a| a.is_visible()) else {
        return;
    };
    let line = Line::from(Span::styled(
        format!(" {} ", alert.text),
        Style::default().fg(ui::alert_color(alert.is_error)).bold(),
    ));
    f.render_widget(Paragraph::new(line), area);
}

fn draw_auth_screen(f: &mut Frame, state: &RenderState, screen: AuthScreen, area: Rect) {
    let form = &state.auth;
    let width = area.width.min(60);
    let height = (form.fields.len() as u16 * 3 + 4 + screen.links().len() as u16 + 2).min(area.height);
    let form_area = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", screen.title()));
    let inner = block.inner(form_area);
    f.render_widget(block, form_area);

    let mut constraints = vec![Constraint::Length(2)]; // Subtitle
    constraints.extend(form.fields.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Length(1)); // Submit
    constraints.push(Constraint::Min(0)); // Links
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let subtitle = Paragraph::new(screen.subtitle())
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true });
    f.render_widget(subtitle, chunks[0]);

    let editing = state.input_mode == InputMode::Editing;
    for (i, field) in form.fields.iter().enumerate() {
        let field_area = chunks[i + 1];
        let is_focused = i == form.focused;
        let error = form.error.filter(|(idx, _)| *idx == i).map(|(_, m)| m);
        let content = field.display();
        let input = ui::render_input(
            &content,
            field.label(),
            ui::field_border_style(is_focused, editing, error.is_some()),
            error,
        );
        f.render_widget(input, field_area);

        if is_focused && editing {
            let max_x = field_area.x + field_area.width.saturating_sub(2);
            let cursor_x = (field_area.x + state.cursor_position as u16 + 1).min(max_x);
            f.set_cursor_position(Position::new(cursor_x, field_area.y + 1));
        }
    }

    let submit_idx = form.fields.len() + 1;
    let label = if form.is_busy() {
        format!("[ {}... ]", screen.submit_label())
    } else {
        format!("[ {} ] (s)", screen.submit_label())
    };
    f.render_widget(
        Paragraph::new(label).style(Style::default().fg(Color::Green).bold()),
        chunks[submit_idx],
    );

    let links: Vec<Line> = screen
        .links()
        .iter()
        .map(|(key, label, _)| {
            Line::from(vec![
                Span::styled(format!(" {} ", key), Style::default().fg(Color::Yellow)),
                Span::raw(*label),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(links), chunks[submit_idx + 1]);
}

fn draw_home(f: &mut Frame, state: &RenderState, area: Rect) {
    let name = state
        .user
        .as_ref()
        .and_then(|u| u.user_name.as_deref())
        .unwrap_or("Anonymous");

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!(" Welcome, {}!", name), Style::default().bold())),
        Line::from(""),
        Line::from(Span::styled(
            " Press 'u' to open the user menu or 'p' to edit your profile.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default().borders(Borders::ALL).title(" Home ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_profile(f: &mut Frame, state: &RenderState, area: Rect) {
    let busy = if state.profile.is_busy() { " [saving...]" } else { "" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Profile{} ", busy));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if !state.profile.is_loaded() {
        let text = if state.profile_loading {
            "Loading profile..."
        } else {
            "Profile not available. Press 'h' to go back."
        };
        f.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Avatar
            Constraint::Length(3),  // First + last name
            Constraint::Length(3),  // Email
            Constraint::Length(3),  // Dial code + phone
            Constraint::Length(3),  // Country
            Constraint::Length(3),  // Address
            Constraint::Length(3),  // City + postcode
            Constraint::Min(0),
        ])
        .split(inner);

    let halves = |r: Rect, left: u16| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(left), Constraint::Percentage(100 - left)])
            .split(r)
    };

    draw_profile_field(f, state, ProfileField::Img, rows[0]);
    let names = halves(rows[1], 50);
    draw_profile_field(f, state, ProfileField::FirstName, names[0]);
    draw_profile_field(f, state, ProfileField::LastName, names[1]);
    draw_profile_field(f, state, ProfileField::Email, rows[2]);
    let phone = halves(rows[3], 30);
    draw_profile_field(f, state, ProfileField::DialCode, phone[0]);
    draw_profile_field(f, state, ProfileField::PhoneNumber, phone[1]);
    draw_profile_field(f, state, ProfileField::Country, rows[4]);
    draw_profile_field(f, state, ProfileField::Address, rows[5]);
    let city = halves(rows[6], 50);
    draw_profile_field(f, state, ProfileField::City, city[0]);
    draw_profile_field(f, state, ProfileField::Postcode, city[1]);
}

fn draw_profile_field(f: &mut Frame, state: &RenderState, field: ProfileField, area: Rect) {
    let value = state.profile.value(field);
    let is_focused = state.profile.focused == field;
    let editing = state.input_mode == InputMode::Editing;
    let error = state.profile.visible_message(field);

    let content = match field {
        ProfileField::DialCode => select_content(SelectVariant::Phone, value),
        ProfileField::Country => select_content(SelectVariant::Country, value),
        ProfileField::Img => match (&state.avatar_input, is_focused) {
            (Some(path), true) => path.clone(),
            _ if value.is_empty() => format!("{} no avatar (e: pick file)", ui::avatar_marker(false)),
            _ => format!("{} {} (x: remove)", ui::avatar_marker(true), value),
        },
        _ => value.to_string(),
    };

    let input = ui::render_input(
        &content,
        field.label(),
        ui::field_border_style(is_focused, editing, error.is_some()),
        error,
    );
    f.render_widget(input, area);

    if is_focused && editing {
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + state.cursor_position as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn select_content(variant: SelectVariant, value: &str) -> String {
    let control = SelectControl::for_value(variant, value);
    match control.flag {
        Some(flag) => format!("{}  [{}]", control.display, flag),
        None => control.display,
    }
}

fn draw_dropdown(f: &mut Frame, items: &[DropdownItem], selected: usize, area: Rect) {
    let width = 36u16.min(area.width);
    let popup_area = Rect::new(area.x + area.width - width, area.y + 1, width, 8u16.min(area.height));

    let lines: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            DropdownItem::Header { user_name, email, avatar } => ListItem::new(vec![
                Line::from(Span::styled(
                    format!("{} {}", ui::avatar_marker(avatar.is_some()), user_name),
                    Style::default().bold(),
                )),
                Line::from(Span::styled(email.clone(), Style::default().fg(Color::DarkGray))),
            ]),
            DropdownItem::Divider => ListItem::new("─".repeat(width.saturating_sub(2) as usize))
                .style(Style::default().fg(Color::DarkGray)),
            DropdownItem::Action { label, .. } => {
                let style = if i == selected {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default()
                };
                ListItem::new(*label).style(style)
            }
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" User ")
        .style(Style::default().bg(Color::Black));

    f.render_widget(Clear, popup_area);
    f.render_widget(List::new(lines).block(block), popup_area);
}

fn draw_selector(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(selector) = &state.selector else {
        return;
    };
    let popup_area = centered_rect(50, 60, area);

    let items: Vec<ListItem> = selector
        .variant
        .options()
        .iter()
        .map(|option| {
            let text = match selector.variant {
                SelectVariant::Country => format!("{}  {}", option.value, option.label),
                SelectVariant::Phone => format!("+{}", option.dial_code),
            };
            ListItem::new(text)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} (Enter to pick, Esc to cancel) ", selector.field.label()))
        .style(Style::default().bg(Color::Black));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    let mut list_state = ListState::default().with_selected(Some(selector.selected));

    f.render_widget(Clear, popup_area);
    f.render_stateful_widget(list, popup_area, &mut list_state);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = if state.auth.is_busy() || state.profile_loading {
        " Loading... "
    } else if state.input_mode == InputMode::Editing {
        " ESC:stop editing | arrows:move | Tab:next field "
    } else {
        match state.screen {
            Screen::Auth(_) => " Tab:field | e:edit | s:submit | ?:help | q:quit ",
            Screen::Home => " u:user menu | p:profile | ?:help | q:quit ",
            Screen::Profile => " Tab:field | e:edit | s:save | r:reset | h:home | ?:help | q:quit ",
        }
    };

    let bar = Paragraph::new(status)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 ACCOUNT DESK - Keyboard Shortcuts

 FORMS
   Tab / Shift+Tab    Next / previous field
   e / Enter          Edit field (or open the list)
   Esc                Stop editing
   s / Ctrl+S         Submit

 SIGN IN
   f                  Forgot password
   u                  Sign up
   r                  Reset password
   b                  Back to sign in

 PROFILE
   r                  Reset form to saved values
   x                  Remove avatar
   h / Esc            Back to home

 USER MENU
   u                  Open / close
   ↑ / ↓, Enter       Pick an item

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
