use std::collections::{HashSet, VecDeque};

use crate::coords::{Vec2, Viewport};

use super::types::{InputEvent, Key, MouseButton};

/// Maximum number of queued characters; older ones are dropped first.
pub const CHAR_QUEUE_LEN: usize = 16;

/// Current input state for a single window.
///
/// Held state (keys, buttons, pointer) persists across frames. Transition
/// sets, the pointer delta and the character queue are per-frame and reset by
/// [`InputState::end_frame`]. Wheel notches accumulate until taken.
#[derive(Debug, Default)]
pub struct InputState {
    focused: bool,

    keys_down: HashSet<Key>,
    keys_pressed: HashSet<Key>,
    keys_released: HashSet<Key>,

    chars: VecDeque<char>,

    pointer: Vec2,
    pointer_delta: Vec2,
    pointer_inside: bool,
    wheel: f32,

    left: bool,
    right: bool,

    /// Client area the pointer is clamped to while captured.
    capture: Option<Viewport>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one translated platform event.
    pub fn apply_event(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    self.flush();
                }
            }

            InputEvent::Key { key, pressed, .. } => {
                if pressed {
                    if self.keys_down.insert(key) {
                        self.keys_pressed.insert(key);
                    }
                } else if self.keys_down.remove(&key) {
                    self.keys_released.insert(key);
                }
            }

            InputEvent::Char(c) => {
                if c.is_control() {
                    return;
                }
                if self.chars.len() == CHAR_QUEUE_LEN {
                    self.chars.pop_front();
                }
                self.chars.push_back(c);
            }

            InputEvent::PointerMoved { x, y } => {
                let mut next = Vec2::new(x, y);
                if let Some(area) = self.capture {
                    next = clamp_to(area, next);
                }
                if self.pointer_inside {
                    self.pointer_delta = self.pointer_delta + (next - self.pointer);
                }
                self.pointer = next;
                self.pointer_inside = true;
            }

            InputEvent::PointerLeft => {
                self.pointer_inside = false;
            }

            InputEvent::Button { button, pressed } => match button {
                MouseButton::Left => self.left = pressed,
                MouseButton::Right => self.right = pressed,
                MouseButton::Middle | MouseButton::Other(_) => {}
            },

            InputEvent::Wheel(notches) => {
                if notches.is_finite() {
                    self.wheel += notches;
                }
            }
        }
    }

    /// Clears the per-frame transitions, pointer delta and character queue.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.pointer_delta = Vec2::zero();
        self.chars.clear();
    }

    /// Drops every held and queued input. Runs automatically on focus loss so
    /// no key or button stays stuck down.
    pub fn flush(&mut self) {
        self.keys_down.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.chars.clear();
        self.pointer_delta = Vec2::zero();
        self.wheel = 0.0;
        self.left = false;
        self.right = false;
    }

    #[inline]
    pub fn focused(&self) -> bool {
        self.focused
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    /// Pops the oldest queued character.
    pub fn pop_char(&mut self) -> Option<char> {
        self.chars.pop_front()
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    #[inline]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    #[inline]
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_delta
    }

    /// Accumulated wheel notches since the last call to [`take_wheel`](Self::take_wheel).
    #[inline]
    pub fn wheel(&self) -> f32 {
        self.wheel
    }

    pub fn take_wheel(&mut self) -> f32 {
        std::mem::take(&mut self.wheel)
    }

    #[inline]
    pub fn left_down(&self) -> bool {
        self.left
    }

    #[inline]
    pub fn right_down(&self) -> bool {
        self.right
    }

    /// Clamps future pointer positions to `area`, or releases the capture.
    pub fn set_capture(&mut self, area: Option<Viewport>) {
        self.capture = area;
        if let Some(area) = area {
            self.pointer = clamp_to(area, self.pointer);
        }
    }

    #[inline]
    pub fn is_captured(&self) -> bool {
        self.capture.is_some()
    }
}

fn clamp_to(area: Viewport, p: Vec2) -> Vec2 {
    Vec2::new(
        p.x.clamp(0.0, (area.width - 1.0).max(0.0)),
        p.y.clamp(0.0, (area.height - 1.0).max(0.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, pressed: bool) -> InputEvent {
        InputEvent::Key {
            key,
            pressed,
            repeat: false,
        }
    }

    #[test]
    fn press_and_release_are_per_frame_transitions() {
        let mut input = InputState::new();
        input.apply_event(key(Key::Letter('A'), true));
        assert!(input.key_down(Key::Letter('A')));
        assert!(input.key_pressed(Key::Letter('A')));

        input.end_frame();
        assert!(input.key_down(Key::Letter('A')));
        assert!(!input.key_pressed(Key::Letter('A')));

        input.apply_event(key(Key::Letter('A'), false));
        assert!(!input.key_down(Key::Letter('A')));
        assert!(input.key_released(Key::Letter('A')));
    }

    #[test]
    fn repeated_press_is_not_a_new_transition() {
        let mut input = InputState::new();
        input.apply_event(key(Key::Space, true));
        input.end_frame();
        input.apply_event(InputEvent::Key {
            key: Key::Space,
            pressed: true,
            repeat: true,
        });
        assert!(!input.key_pressed(Key::Space));
        assert!(input.key_down(Key::Space));
    }

    #[test]
    fn char_queue_drops_oldest() {
        let mut input = InputState::new();
        for c in ('a'..='z').take(CHAR_QUEUE_LEN + 2) {
            input.apply_event(InputEvent::Char(c));
        }
        input.apply_event(InputEvent::Char('\u{8}'));

        assert_eq!(input.chars().count(), CHAR_QUEUE_LEN);
        assert_eq!(input.pop_char(), Some('c'));
    }

    #[test]
    fn pointer_delta_accumulates_within_a_frame() {
        let mut input = InputState::new();
        input.apply_event(InputEvent::PointerMoved { x: 10.0, y: 10.0 });
        assert_eq!(input.pointer_delta(), Vec2::zero());

        input.apply_event(InputEvent::PointerMoved { x: 15.0, y: 12.0 });
        input.apply_event(InputEvent::PointerMoved { x: 20.0, y: 8.0 });
        assert_eq!(input.pointer(), Vec2::new(20.0, 8.0));
        assert_eq!(input.pointer_delta(), Vec2::new(10.0, -2.0));

        input.end_frame();
        assert_eq!(input.pointer_delta(), Vec2::zero());
    }

    #[test]
    fn capture_clamps_pointer_to_client_area() {
        let mut input = InputState::new();
        input.set_capture(Some(Viewport::from_size(800, 600)));
        input.apply_event(InputEvent::PointerMoved { x: -5.0, y: 900.0 });
        assert_eq!(input.pointer(), Vec2::new(0.0, 599.0));

        input.set_capture(None);
        input.apply_event(InputEvent::PointerMoved { x: -5.0, y: 900.0 });
        assert_eq!(input.pointer(), Vec2::new(-5.0, 900.0));
    }

    #[test]
    fn wheel_accumulates_until_taken() {
        let mut input = InputState::new();
        input.apply_event(InputEvent::Wheel(1.0));
        input.apply_event(InputEvent::Wheel(2.0));
        input.end_frame();
        assert_eq!(input.wheel(), 3.0);
        assert_eq!(input.take_wheel(), 3.0);
        assert_eq!(input.wheel(), 0.0);
    }

    #[test]
    fn focus_loss_flushes_held_state() {
        let mut input = InputState::new();
        input.apply_event(InputEvent::Focused(true));
        input.apply_event(key(Key::Shift, true));
        input.apply_event(InputEvent::Button {
            button: MouseButton::Left,
            pressed: true,
        });
        input.apply_event(InputEvent::Char('x'));
        input.apply_event(InputEvent::Wheel(1.0));

        input.apply_event(InputEvent::Focused(false));

        assert!(!input.focused());
        assert!(!input.key_down(Key::Shift));
        assert!(!input.left_down());
        assert_eq!(input.chars().count(), 0);
        assert_eq!(input.wheel(), 0.0);
    }
}
