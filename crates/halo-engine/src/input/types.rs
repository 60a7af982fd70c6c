use std::fmt;

/// Keyboard key identifier.
///
/// Letters and digits carry their character so the runtime mapping stays
/// compact; anything without a variant lands in `Unknown` with the platform
/// key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Shift,
    Control,
    Alt,
    Meta,
    /// `A`..=`Z`, stored upper-case.
    Letter(char),
    /// `0`..=`9`.
    Digit(u8),
    /// `F1`..=`F12`.
    Function(u8),
    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Letter(c) => write!(f, "{c}"),
            Key::Digit(d) => write!(f, "{d}"),
            Key::Function(n) => write!(f, "F{n}"),
            Key::Unknown(code) => write!(f, "Unknown({code})"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        pressed: bool,
        repeat: bool,
    },
    /// Committed character input.
    Char(char),
    /// Pointer position in client-area pixels.
    PointerMoved { x: f32, y: f32 },
    PointerLeft,
    Button { button: MouseButton, pressed: bool },
    /// Wheel movement in notches; positive is away from the user.
    Wheel(f32),
    Focused(bool),
}
