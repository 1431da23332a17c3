use crate::Pt;

/// Buttons the driver tracks. Back/forward and vendor buttons collapse into
/// [`MouseButton::Other`] and never count as held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

impl MouseButton {
    fn mask(self) -> Option<u8> {
        match self {
            MouseButton::Left => Some(0b001),
            MouseButton::Right => Some(0b010),
            MouseButton::Middle => Some(0b100),
            MouseButton::Other => None,
        }
    }

    pub(crate) fn from_winit(button: winit::event::MouseButton) -> Self {
        use winit::event::MouseButton as W;
        match button {
            W::Left => MouseButton::Left,
            W::Right => MouseButton::Right,
            W::Middle => MouseButton::Middle,
            W::Back | W::Forward | W::Other(_) => MouseButton::Other,
        }
    }
}

/// Pointer and keyboard state as seen by scene callbacks.
///
/// The window driver feeds raw events in through the `handle_*` methods;
/// scenes read it back through [`crate::cursor_position`],
/// [`crate::mouse_button_down`] and [`crate::current_key`].
#[derive(Debug, Clone, Default)]
pub struct InputManager {
    mouse_down: u8,
    mouse_pressed: u8,
    mouse_released: u8,

    cursor_position: Option<(Pt, Pt)>,
    focused: bool,

    current_key: Option<char>,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn cursor_position(&self) -> Option<(Pt, Pt)> {
        self.cursor_position
    }

    /// The key being dispatched right now. Only set for the duration of a
    /// key-press callback.
    pub fn current_key(&self) -> Option<char> {
        self.current_key
    }

    pub fn mouse_down(&self, button: MouseButton) -> bool {
        button.mask().is_some_and(|m| (self.mouse_down & m) != 0)
    }

    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        button.mask().is_some_and(|m| (self.mouse_pressed & m) != 0)
    }

    pub fn mouse_released(&self, button: MouseButton) -> bool {
        button.mask().is_some_and(|m| (self.mouse_released & m) != 0)
    }

    pub fn end_frame(&mut self) {
        self.mouse_pressed = 0;
        self.mouse_released = 0;
    }

    pub fn handle_focus(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.mouse_down = 0;
            self.mouse_pressed = 0;
            self.mouse_released = 0;
            self.current_key = None;
        }
    }

    pub fn handle_cursor_moved(&mut self, x: Pt, y: Pt) {
        self.cursor_position = Some((x, y));
    }

    /// Records a button transition. Returns `true` when the event changed the
    /// held state, so repeated presses of an already-held button report `false`.
    pub fn handle_mouse_input(&mut self, pressed: bool, button: MouseButton) -> bool {
        let Some(mask) = button.mask() else {
            return false;
        };
        let was_down = (self.mouse_down & mask) != 0;
        if pressed {
            self.mouse_down |= mask;
            if !was_down {
                self.mouse_pressed |= mask;
            }
        } else {
            self.mouse_down &= !mask;
            if was_down {
                self.mouse_released |= mask;
            }
        }
        was_down != pressed
    }

    pub fn set_current_key(&mut self, key: Option<char>) {
        self.current_key = key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_press_release_edges() {
        let mut input = InputManager::new();
        assert!(input.handle_mouse_input(true, MouseButton::Left));
        assert!(input.mouse_down(MouseButton::Left));
        assert!(input.mouse_pressed(MouseButton::Left));
        assert!(!input.mouse_down(MouseButton::Right));

        // already held
        assert!(!input.handle_mouse_input(true, MouseButton::Left));

        input.end_frame();
        assert!(input.mouse_down(MouseButton::Left));
        assert!(!input.mouse_pressed(MouseButton::Left));

        assert!(input.handle_mouse_input(false, MouseButton::Left));
        assert!(!input.mouse_down(MouseButton::Left));
        assert!(input.mouse_released(MouseButton::Left));
    }

    #[test]
    fn test_other_buttons_are_ignored() {
        let mut input = InputManager::new();
        assert!(!input.handle_mouse_input(true, MouseButton::Other));
        assert!(!input.mouse_down(MouseButton::Other));
    }

    #[test]
    fn test_focus_loss_clears_held_state() {
        let mut input = InputManager::new();
        input.handle_focus(true);
        input.handle_mouse_input(true, MouseButton::Left);
        input.set_current_key(Some('t'));
        input.handle_cursor_moved(Pt::from(3.0f32), Pt::from(4.0f32));

        input.handle_focus(false);
        assert!(!input.is_focused());
        assert!(!input.mouse_down(MouseButton::Left));
        assert_eq!(input.current_key(), None);
        assert_eq!(
            input.cursor_position(),
            Some((Pt::from(3.0f32), Pt::from(4.0f32)))
        );
    }
}
