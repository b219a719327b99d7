use std::collections::VecDeque;

use glam::Vec2;
use rustc_hash::FxHashSet;

/// Keyboard key, independent of the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Digits
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,

    // Controls
    Space,
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    // Modifiers
    Shift,
    Control,
    Alt,
    Super,

    // Arrows
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    /// Platform scan code for anything not listed above.
    Other(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Platform-neutral input event, translated from whatever windowing layer
/// the host uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Resized { width: u32, height: u32 },
    CursorMoved { x: f64, y: f64 },
    Key { key: Key, pressed: bool },
    MouseButton { button: MouseButton, pressed: bool },
    /// Scroll amount in lines.
    MouseWheel { x: f32, y: f32 },
    /// Ends the frame loop before the next update.
    Quit,
}

/// Non-blocking source of input events.
pub trait EventSource {
    /// Next pending event, or `None` when the queue is drained for this frame.
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// Event source that never produces anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl EventSource for NoEvents {
    fn poll_event(&mut self) -> Option<InputEvent> {
        None
    }
}

impl EventSource for VecDeque<InputEvent> {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.pop_front()
    }
}

/// Input state accumulated over one frame.
#[derive(Default, Debug, Clone)]
pub struct Input {
    /// Cursor position in window pixels
    pub cursor_position: Vec2,
    /// Cursor movement since the last frame
    pub cursor_delta: Vec2,
    /// Scroll amount this frame
    pub scroll_delta: Vec2,
    pub screen_size: Vec2,
    pub mouse_buttons: FxHashSet<MouseButton>,
    pressed_keys: FxHashSet<Key>,
    just_pressed_keys: FxHashSet<Key>,
    just_released_keys: FxHashSet<Key>,
    has_cursor: bool,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears per-frame deltas and the just-pressed/just-released key sets.
    pub fn end_frame(&mut self) {
        self.cursor_delta = Vec2::ZERO;
        self.scroll_delta = Vec2::ZERO;
        self.just_pressed_keys.clear();
        self.just_released_keys.clear();
    }

    /// Folds one event into the state. `Quit` is ignored here.
    pub fn handle_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Resized { width, height } => self.handle_resize(width, height),
            InputEvent::CursorMoved { x, y } => self.handle_cursor_move(x, y),
            InputEvent::Key { key, pressed } => self.handle_key(key, pressed),
            InputEvent::MouseButton { button, pressed } => self.handle_mouse_input(button, pressed),
            InputEvent::MouseWheel { x, y } => self.handle_mouse_wheel(x, y),
            InputEvent::Quit => {}
        }
    }

    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    pub fn handle_cursor_move(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        // no delta for the first reported position
        if self.has_cursor {
            self.cursor_delta += new_pos - self.cursor_position;
        }
        self.cursor_position = new_pos;
        self.has_cursor = true;
    }

    /// Key repeat (a press while already held) does not count as a new press.
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        if pressed {
            if self.pressed_keys.insert(key) {
                self.just_pressed_keys.insert(key);
            }
        } else if self.pressed_keys.remove(&key) {
            self.just_released_keys.insert(key);
        }
    }

    pub fn handle_mouse_input(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.mouse_buttons.insert(button);
        } else {
            self.mouse_buttons.remove(&button);
        }
    }

    pub fn handle_mouse_wheel(&mut self, x: f32, y: f32) {
        self.scroll_delta += Vec2::new(x, y);
    }

    /// Whether `key` is currently held.
    #[must_use]
    pub fn get_key(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Whether `key` went down during this frame.
    #[must_use]
    pub fn get_key_down(&self, key: Key) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    /// Whether `key` was released during this frame.
    #[must_use]
    pub fn get_key_up(&self, key: Key) -> bool {
        self.just_released_keys.contains(&key)
    }

    #[must_use]
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }
}
