use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum KeyCommand {
    Quit,
    Rebuild,
    ToggleAutoscroll,
}

pub(super) fn command_char(key: KeyEvent) -> Option<char> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    {
        return None;
    }
    if let KeyCode::Char(ch) = key.code {
        Some(ch.to_ascii_lowercase())
    } else {
        None
    }
}

pub(super) fn command_for(key: KeyEvent) -> Option<KeyCommand> {
    if key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        return Some(KeyCommand::Quit);
    }
    match command_char(key)? {
        'q' => Some(KeyCommand::Quit),
        'r' => Some(KeyCommand::Rebuild),
        'a' => Some(KeyCommand::ToggleAutoscroll),
        _ => None,
    }
}
