//! Translation of terminal key events into host and palette input.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rolodex_core::navigation::NavKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Global palette hotkey; a no-op while the palette is already open
    OpenPalette,
    Nav(NavKey),
    Char(char),
    Backspace,
    ClearQuery,
    Quit,
    Ignore,
}

/// Ctrl+K everywhere, plus Cmd/Super+K where the terminal reports it.
#[must_use]
pub fn is_palette_hotkey(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('k' | 'K'))
        && key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META)
}

pub fn map_key(key: &KeyEvent, palette_open: bool) -> Input {
    if is_palette_hotkey(key) {
        return Input::OpenPalette;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c')) {
        return Input::Quit;
    }

    if !palette_open {
        return match key.code {
            KeyCode::Char('q') => Input::Quit,
            KeyCode::Char('/') => Input::OpenPalette,
            _ => Input::Ignore,
        };
    }

    match key.code {
        KeyCode::Up => Input::Nav(NavKey::Up),
        KeyCode::Down => Input::Nav(NavKey::Down),
        KeyCode::Char('p') if ctrl => Input::Nav(NavKey::Up),
        KeyCode::Char('n') if ctrl => Input::Nav(NavKey::Down),
        KeyCode::Home => Input::Nav(NavKey::Home),
        KeyCode::End => Input::Nav(NavKey::End),
        KeyCode::Enter => Input::Nav(NavKey::Confirm),
        KeyCode::Esc => Input::Nav(NavKey::Escape),
        KeyCode::Backspace => Input::Backspace,
        KeyCode::Char('u') if ctrl => Input::ClearQuery,
        KeyCode::Char(c) if !ctrl => Input::Char(c),
        _ => Input::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_hotkey_variants() {
        for modifiers in [KeyModifiers::CONTROL, KeyModifiers::SUPER, KeyModifiers::META] {
            let event = key(KeyCode::Char('k'), modifiers);
            assert_eq!(map_key(&event, false), Input::OpenPalette);
            assert_eq!(map_key(&event, true), Input::OpenPalette);
        }
        assert!(!is_palette_hotkey(&key(KeyCode::Char('k'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_plain_k_is_text_while_open() {
        assert_eq!(
            map_key(&key(KeyCode::Char('k'), KeyModifiers::NONE), true),
            Input::Char('k')
        );
    }

    #[test]
    fn test_navigation_keys() {
        let cases = [
            (KeyCode::Up, NavKey::Up),
            (KeyCode::Down, NavKey::Down),
            (KeyCode::Home, NavKey::Home),
            (KeyCode::End, NavKey::End),
            (KeyCode::Enter, NavKey::Confirm),
            (KeyCode::Esc, NavKey::Escape),
        ];
        for (code, nav) in cases {
            assert_eq!(map_key(&key(code, KeyModifiers::NONE), true), Input::Nav(nav));
        }
    }

    #[test]
    fn test_closed_palette_keys() {
        assert_eq!(
            map_key(&key(KeyCode::Char('q'), KeyModifiers::NONE), false),
            Input::Quit
        );
        assert_eq!(
            map_key(&key(KeyCode::Char('/'), KeyModifiers::NONE), false),
            Input::OpenPalette
        );
        assert_eq!(
            map_key(&key(KeyCode::Enter, KeyModifiers::NONE), false),
            Input::Ignore
        );
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let event = key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&event, true), Input::Quit);
        assert_eq!(map_key(&event, false), Input::Quit);
    }

    #[test]
    fn test_shifted_chars_are_text() {
        assert_eq!(
            map_key(&key(KeyCode::Char('A'), KeyModifiers::SHIFT), true),
            Input::Char('A')
        );
    }
}
