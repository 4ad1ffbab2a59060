use ratatui::{prelude::*, widgets::*};

use crate::models::SessionUser;

/// What a dropdown action does when chosen
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DropdownAction {
    Profile,
    SignOut,
}

/// Entries of the user profile dropdown
#[derive(Clone, Debug, PartialEq)]
pub enum DropdownItem {
    Header {
        user_name: String,
        email: String,
        avatar: Option<String>,
    },
    Divider,
    Action {
        label: &'static str,
        action: DropdownAction,
    },
}

impl DropdownItem {
    pub fn is_selectable(&self) -> bool {
        matches!(self, DropdownItem::Action { .. })
    }
}

/// Items for the signed-in user, header first
pub fn dropdown_items(user: Option<&SessionUser>) -> Vec<DropdownItem> {
    let user_name = user
        .and_then(|u| u.user_name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| String::from("Anonymous"));
    let email = user
        .and_then(|u| u.email.clone())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| String::from("No email available"));
    let avatar = user
        .and_then(|u| u.avatar.clone())
        .filter(|a| !a.is_empty());

    vec![
        DropdownItem::Header {
            user_name,
            email,
            avatar,
        },
        DropdownItem::Divider,
        DropdownItem::Action {
            label: "Profile",
            action: DropdownAction::Profile,
        },
        DropdownItem::Divider,
        DropdownItem::Action {
            label: "Sign out",
            action: DropdownAction::SignOut,
        },
    ]
}

/// Index of the next selectable item after `from`, wrapping around
pub fn step_selectable(items: &[DropdownItem], from: usize, forward: bool) -> usize {
    let len = items.len();
    if len == 0 {
        return 0;
    }
    let mut idx = from;
    for _ in 0..len {
        idx = if forward {
            (idx + 1) % len
        } else {
            idx.checked_sub(1).unwrap_or(len - 1)
        };
        if items[idx].is_selectable() {
            return idx;
        }
    }
    from
}

pub fn first_selectable(items: &[DropdownItem]) -> usize {
    items.iter().position(|i| i.is_selectable()).unwrap_or(0)
}

/// Avatar marker drawn where the web client shows an image
pub fn avatar_marker(has_avatar: bool) -> &'static str {
    if has_avatar {
        "(◉)"
    } else {
        "(👤)"
    }
}

/// Border style for a form input
pub fn field_border_style(is_focused: bool, is_editing: bool, is_invalid: bool) -> Style {
    if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_invalid {
        Style::default().fg(Color::Red)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Renders a text input field with an optional inline error
pub fn render_input<'a>(
    content: &'a str,
    title: &'a str,
    border_style: Style,
    error: Option<&'a str>,
) -> Paragraph<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", title));

    if let Some(message) = error {
        block = block.title_bottom(
            Line::from(Span::styled(
                format!(" {} ", message),
                Style::default().fg(Color::Red),
            ))
            .right_aligned(),
        );
    }

    Paragraph::new(content).block(block)
}

/// Alert colour by severity
pub fn alert_color(is_error: bool) -> Color {
    if is_error {
        Color::Red
    } else {
        Color::Green
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropdown_fallbacks() {
        let items = dropdown_items(None);
        assert_eq!(
            items[0],
            DropdownItem::Header {
                user_name: "Anonymous".into(),
                email: "No email available".into(),
                avatar: None,
            }
        );
        assert_eq!(items[1], DropdownItem::Divider);
    }

    #[test]
    fn test_dropdown_uses_session_user() {
        let user = SessionUser {
            user_name: Some("ana".into()),
            email: Some("ana@example.com".into()),
            avatar: Some("/img/avatars/ana.png".into()),
            ..Default::default()
        };
        match &dropdown_items(Some(&user))[0] {
            DropdownItem::Header { user_name, email, avatar } => {
                assert_eq!(user_name, "ana");
                assert_eq!(email, "ana@example.com");
                assert!(avatar.is_some());
            }
            other => panic!("unexpected item {:?}", other),
        }
    }

    #[test]
    fn test_selection_skips_header_and_divider() {
        let items = dropdown_items(None);
        let first = first_selectable(&items);
        assert_eq!(first, 2);
        assert_eq!(items[3], DropdownItem::Divider);
        assert_eq!(step_selectable(&items, first, true), 4);
        assert_eq!(step_selectable(&items, 4, true), 2);
        assert_eq!(step_selectable(&items, 2, false), 4);
    }
}
