//! Input event types, converted from crossterm at the boundary.
//!
//! The rest of the crate sees only [`InputEvent`], [`KeyEvent`] and
//! [`PointerEvent`]. A secondary-button press arrives as a long press, which is
//! how terminals without touch input express it.

use bitflags::bitflags;

use crate::geometry::Pos;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    /// A key the crate has no name for.
    Unknown,
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::empty())
    }
}

// ---------------------------------------------------------------------------
// Pointer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Press,
    LongPress,
    Release,
    Move,
}

/// A pointer event in root coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pos: Pos,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, pos: Pos) -> Self {
        Self { kind, pos, modifiers: Modifiers::empty() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(KeyEvent),
    Pointer(PointerEvent),
    Resize { width: u16, height: u16 },
}

// ---------------------------------------------------------------------------
// crossterm conversions
// ---------------------------------------------------------------------------

impl From<crossterm::event::KeyModifiers> for Modifiers {
    fn from(m: crossterm::event::KeyModifiers) -> Self {
        use crossterm::event::KeyModifiers as Ct;
        let mut out = Modifiers::empty();
        out.set(Modifiers::SHIFT, m.contains(Ct::SHIFT));
        out.set(Modifiers::CTRL, m.contains(Ct::CONTROL));
        out.set(Modifiers::ALT, m.contains(Ct::ALT));
        out.set(Modifiers::META, m.intersects(Ct::META | Ct::SUPER));
        out
    }
}

impl From<crossterm::event::KeyCode> for Key {
    fn from(code: crossterm::event::KeyCode) -> Self {
        use crossterm::event::KeyCode;
        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::F(n),
            _ => Key::Unknown,
        }
    }
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        KeyEvent::new(ct.code.into(), ct.modifiers.into())
    }
}

impl InputEvent {
    /// Convert a crossterm event. Key releases, scrolling, focus and paste
    /// events have no counterpart and yield `None`.
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<InputEvent> {
        use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};
        match event {
            Event::Key(ke) if ke.kind == KeyEventKind::Release => None,
            Event::Key(ke) => Some(InputEvent::Key(ke.into())),
            Event::Mouse(me) => {
                let kind = match me.kind {
                    MouseEventKind::Down(MouseButton::Right) => PointerKind::LongPress,
                    MouseEventKind::Down(_) => PointerKind::Press,
                    MouseEventKind::Up(_) => PointerKind::Release,
                    MouseEventKind::Drag(_) | MouseEventKind::Moved => PointerKind::Move,
                    _ => return None,
                };
                Some(InputEvent::Pointer(PointerEvent {
                    kind,
                    pos: Pos::new(me.column as f64, me.row as f64),
                    modifiers: me.modifiers.into(),
                }))
            }
            Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
            _ => None,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{
        Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent { kind, column: 4, row: 7, modifiers: KeyModifiers::NONE })
    }

    #[test]
    fn modifiers_from_crossterm() {
        let m = Modifiers::from(KeyModifiers::SHIFT | KeyModifiers::CONTROL);
        assert_eq!(m, Modifiers::SHIFT | Modifiers::CTRL);
        assert!(Modifiers::from(KeyModifiers::NONE).is_empty());
    }

    #[test]
    fn key_codes() {
        assert_eq!(Key::from(KeyCode::Char('x')), Key::Char('x'));
        assert_eq!(Key::from(KeyCode::Esc), Key::Escape);
        assert_eq!(Key::from(KeyCode::F(5)), Key::F(5));
        assert_eq!(Key::from(KeyCode::CapsLock), Key::Unknown);
    }

    #[test]
    fn key_event_conversion() {
        let ct = crossterm::event::KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(KeyEvent::from(ct), KeyEvent::new(Key::BackTab, Modifiers::SHIFT));
    }

    #[test]
    fn key_release_is_dropped() {
        let ct = crossterm::event::KeyEvent::new_with_kind(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(InputEvent::from_crossterm(Event::Key(ct)), None);
    }

    #[test]
    fn pointer_kinds() {
        let kind = |ev| match InputEvent::from_crossterm(ev) {
            Some(InputEvent::Pointer(p)) => Some(p.kind),
            _ => None,
        };
        assert_eq!(kind(mouse(MouseEventKind::Down(MouseButton::Left))), Some(PointerKind::Press));
        assert_eq!(kind(mouse(MouseEventKind::Down(MouseButton::Right))), Some(PointerKind::LongPress));
        assert_eq!(kind(mouse(MouseEventKind::Up(MouseButton::Left))), Some(PointerKind::Release));
        assert_eq!(kind(mouse(MouseEventKind::Moved)), Some(PointerKind::Move));
        assert_eq!(kind(mouse(MouseEventKind::ScrollUp)), None);
    }

    #[test]
    fn pointer_position() {
        let Some(InputEvent::Pointer(p)) = InputEvent::from_crossterm(mouse(MouseEventKind::Moved)) else {
            panic!("expected pointer event");
        };
        assert_eq!(p.pos, Pos::new(4.0, 7.0));
    }

    #[test]
    fn resize_and_ignored_events() {
        assert_eq!(
            InputEvent::from_crossterm(Event::Resize(80, 24)),
            Some(InputEvent::Resize { width: 80, height: 24 })
        );
        assert_eq!(InputEvent::from_crossterm(Event::FocusGained), None);
    }
}
