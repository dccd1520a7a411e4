//! Key bindings: arrows or vim keys move the cursor, letters pick tools and power-ups.

use crate::app::Tool;
use crate::powerup::PowerUpKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    /// Apply the selected tool at the cursor.
    UseTool,
    SelectTool(Tool),
    /// Index into `PlantKind::ALL`.
    SelectPlant(usize),
    NextPlant,
    HarvestAll,
    PowerUp(PowerUpKind),
    NewRound,
    Quit,
    None,
}

/// Map key event to game action.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Up | KeyCode::Char('k') => Action::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => Action::CursorDown,
        KeyCode::Left | KeyCode::Char('h') => Action::CursorLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::CursorRight,
        KeyCode::Enter | KeyCode::Char(' ') => Action::UseTool,
        KeyCode::Char('p') => Action::SelectTool(Tool::Plant),
        KeyCode::Char('w') => Action::SelectTool(Tool::Water),
        KeyCode::Char('x') => Action::SelectTool(Tool::Harvest),
        KeyCode::Char(c @ '1'..='9') => Action::SelectPlant(c as usize - '1' as usize),
        KeyCode::Tab => Action::NextPlant,
        KeyCode::Char('a') => Action::HarvestAll,
        KeyCode::Char('s') => Action::PowerUp(PowerUpKind::Sunlight),
        KeyCode::Char('f') => Action::PowerUp(PowerUpKind::Frozen),
        KeyCode::Char('r') => Action::NewRound,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn movement_keys() {
        assert_eq!(key_to_action(key(KeyCode::Left)), Action::CursorLeft);
        assert_eq!(key_to_action(key(KeyCode::Char('l'))), Action::CursorRight);
        assert_eq!(key_to_action(key(KeyCode::Char('k'))), Action::CursorUp);
        assert_eq!(key_to_action(key(KeyCode::Down)), Action::CursorDown);
    }

    #[test]
    fn plant_digits_are_zero_based() {
        assert_eq!(key_to_action(key(KeyCode::Char('1'))), Action::SelectPlant(0));
        assert_eq!(key_to_action(key(KeyCode::Char('6'))), Action::SelectPlant(5));
    }

    #[test]
    fn tools_and_power_ups() {
        assert_eq!(key_to_action(key(KeyCode::Char('w'))), Action::SelectTool(Tool::Water));
        assert_eq!(key_to_action(key(KeyCode::Char(' '))), Action::UseTool);
        assert_eq!(
            key_to_action(key(KeyCode::Char('f'))),
            Action::PowerUp(PowerUpKind::Frozen)
        );
    }

    #[test]
    fn modifiers() {
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::ALT)),
            Action::None
        );
    }
}
