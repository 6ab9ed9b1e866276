//! Key bindings and the quit token polled at tick boundaries.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Pause,
    Quit,
    None,
}

/// Map key event to an action. `q`, `Esc`, and `Ctrl-C` quit; `p` or space
/// pauses.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    match code {
        KeyCode::Char('c') if modifiers == KeyModifiers::CONTROL => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc if no_mod => Action::Quit,
        KeyCode::Char('p') | KeyCode::Char(' ') if no_mod => Action::Pause,
        _ => Action::None,
    }
}

/// Shared exit flag. Set when the user asks to quit; the run loop polls it
/// once per tick boundary, so an in-flight grid mutation is never cut short.
#[derive(Debug, Clone, Default)]
pub struct QuitToken(Arc<AtomicBool>);

impl QuitToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn test_quit_keys() {
        assert_eq!(key_to_action(KeyEvent::from(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(key_to_action(KeyEvent::from(KeyCode::Esc)), Action::Quit);
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_pause_and_unmapped_keys() {
        assert_eq!(key_to_action(KeyEvent::from(KeyCode::Char('p'))), Action::Pause);
        assert_eq!(key_to_action(KeyEvent::from(KeyCode::Char(' '))), Action::Pause);
        assert_eq!(key_to_action(KeyEvent::from(KeyCode::Char('x'))), Action::None);
    }

    #[test]
    fn test_quit_token_latches() {
        let token = QuitToken::new();
        assert!(!token.is_requested());
        let observer = token.clone();
        token.request();
        assert!(observer.is_requested());
    }
}
