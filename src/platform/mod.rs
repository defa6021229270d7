//! Platform abstraction layer
//!
//! Turns raw host input into the normalized [`InputState`] the simulation
//! consumes once per step:
//! - Keyboard (WASD / arrows, Space to fire, Escape to pause)
//! - Touch drag (direct world-space movement, tap to fire)
//! - Pointer button (click to fire)
//! - Visibility (page hidden / window backgrounded)

use std::collections::HashSet;

use glam::Vec2;

/// Per-step input, already normalized
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    /// Movement intent, each axis in [-1, 1] (clamped by the simulation)
    pub movement: Vec2,
    /// Direct world-space displacement from a pointer drag
    pub drag: Vec2,
    /// Fire pressed since the last step
    pub fire: bool,
    /// Pause toggle pressed since the last step
    pub pause_toggle: bool,
    /// Host currently hidden/backgrounded
    pub hidden: bool,
}

/// Held keys plus one-shot edges
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<String>,
    fire: bool,
    pause_toggle: bool,
}

impl KeyboardState {
    pub fn key_down(&mut self, key: &str) {
        // Auto-repeat arrives as repeated key_down; only the first is an edge
        let fresh = self.held.insert(key.to_string());
        match key {
            " " | "Space" => self.fire |= fresh,
            "Escape" => self.pause_toggle |= fresh,
            _ => {}
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(key);
    }

    fn is_held(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.held.contains(*k))
    }

    /// Movement from held direction keys, each axis in {-1, 0, 1}
    pub fn movement(&self) -> Vec2 {
        let mut movement = Vec2::ZERO;
        if self.is_held(&["ArrowUp", "w"]) {
            movement.y += 1.0;
        }
        if self.is_held(&["ArrowDown", "s"]) {
            movement.y -= 1.0;
        }
        if self.is_held(&["ArrowLeft", "a"]) {
            movement.x -= 1.0;
        }
        if self.is_held(&["ArrowRight", "d"]) {
            movement.x += 1.0;
        }
        movement
    }

    fn take_edges(&mut self) -> (bool, bool) {
        (std::mem::take(&mut self.fire), std::mem::take(&mut self.pause_toggle))
    }
}

/// Reference screen width for touch sensitivity
const TOUCH_BASE_WIDTH: f32 = 800.0;
/// World units per pixel of drag at the reference width
const TOUCH_MOVE_SENSITIVITY: f32 = 0.05;

/// Converts touch drags into world-space movement
#[derive(Debug, Clone)]
pub struct TouchTracker {
    last: Option<Vec2>,
    pending: Vec2,
    fire: bool,
    /// Screen-size dependent multiplier
    multiplier: f32,
    /// User preference scale
    user_scale: f32,
}

impl Default for TouchTracker {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl TouchTracker {
    pub fn new(user_scale: f32) -> Self {
        Self {
            last: None,
            pending: Vec2::ZERO,
            fire: false,
            multiplier: 1.0,
            user_scale,
        }
    }

    /// Smaller screens get more world movement per pixel
    pub fn update_sensitivity(&mut self, screen_width: f32) {
        self.multiplier = (screen_width.max(0.0) / TOUCH_BASE_WIDTH).sqrt().clamp(0.5, 2.0);
    }

    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// A touch began; a single finger also fires
    pub fn touch_start(&mut self, x: f32, y: f32, touches: usize) {
        self.last = Some(Vec2::new(x, y));
        if touches == 1 {
            self.fire = true;
        }
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        let Some(last) = self.last else {
            return;
        };
        let scale = TOUCH_MOVE_SENSITIVITY * self.multiplier * self.user_scale;
        // Screen y grows downward
        self.pending += Vec2::new(x - last.x, -(y - last.y)) * scale;
        self.last = Some(Vec2::new(x, y));
    }

    pub fn touch_end(&mut self) {
        self.last = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }

    fn take(&mut self) -> (Vec2, bool) {
        (std::mem::take(&mut self.pending), std::mem::take(&mut self.fire))
    }
}

/// Combines every input source into one [`InputState`] per step
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    pub keyboard: KeyboardState,
    pub touch: TouchTracker,
    pointer_fire: bool,
    hidden: bool,
}

impl InputMapper {
    pub fn new(touch_sensitivity: f32) -> Self {
        Self {
            keyboard: KeyboardState::default(),
            touch: TouchTracker::new(touch_sensitivity),
            pointer_fire: false,
            hidden: false,
        }
    }

    /// Primary pointer button pressed
    pub fn pointer_down(&mut self) {
        self.pointer_fire = true;
    }

    /// Host visibility changed
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Snapshot for the next step, consuming one-shot edges
    pub fn frame_input(&mut self) -> InputState {
        let (key_fire, pause_toggle) = self.keyboard.take_edges();
        let (drag, touch_fire) = self.touch.take();
        let pointer_fire = std::mem::take(&mut self.pointer_fire);
        InputState {
            movement: self.keyboard.movement(),
            drag,
            fire: key_fire || touch_fire || pointer_fire,
            pause_toggle,
            hidden: self.hidden,
        }
    }
}

/// Whether the host page is hidden (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn host_hidden() -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .map(|d| d.visibility_state() == web_sys::VisibilityState::Hidden)
        .unwrap_or(false)
}

/// Native hosts report visibility through [`InputMapper::set_hidden`]
#[cfg(not(target_arch = "wasm32"))]
pub fn host_hidden() -> bool {
    false
}
