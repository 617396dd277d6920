use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns true when turning from `current` to `self` is a 180° turn.
    #[must_use]
    pub fn is_reversal_of(self, current: Self) -> bool {
        self == current.opposite()
    }

    /// Cell delta for one step; `y` grows downwards.
    #[must_use]
    pub fn unit_vector(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Pause,
    Reset,
    /// Connects the wallet, or disconnects it when already connected.
    ToggleWallet,
    Quit,
    Confirm,
}

/// Single-slot holder for the most recent directional intent.
///
/// Intents arriving between two steps overwrite each other; nothing is queued
/// and nothing is validated here. The simulation rejects reversals when it
/// applies the direction.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct InputController {
    pending: Option<Direction>,
}

impl InputController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `direction` as the pending intent, replacing any earlier one.
    pub fn request(&mut self, direction: Direction) {
        self.pending = Some(direction);
    }

    /// Returns the pending intent without consuming it.
    #[must_use]
    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    /// Reads and clears the pending intent.
    pub fn take(&mut self) -> Option<Direction> {
        self.pending.take()
    }

    /// Drops any pending intent.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// Maps one key press to a game input.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<GameInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    let input = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k' | 'K') => {
            GameInput::Direction(Direction::Up)
        }
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j' | 'J') => {
            GameInput::Direction(Direction::Down)
        }
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h' | 'H') => {
            GameInput::Direction(Direction::Left)
        }
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l' | 'L') => {
            GameInput::Direction(Direction::Right)
        }
        KeyCode::Char(' ' | 'p' | 'P') => GameInput::Pause,
        KeyCode::Char('r' | 'R') => GameInput::Reset,
        KeyCode::Char('c' | 'C') => GameInput::ToggleWallet,
        KeyCode::Enter => GameInput::Confirm,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => GameInput::Quit,
        _ => return None,
    };

    Some(input)
}

/// Reads terminal events and translates them into game inputs.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Waits up to `timeout` for one event; returns `None` on timeout or for
    /// events that carry no game meaning.
    pub fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => Ok(map_key(key)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::{map_key, Direction, GameInput, InputController};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn reversal_detection_only_flags_opposites() {
        for current in Direction::ALL {
            for next in Direction::ALL {
                assert_eq!(next.is_reversal_of(current), next == current.opposite());
            }
        }
    }

    #[test]
    fn last_request_wins() {
        let mut controller = InputController::new();

        controller.request(Direction::Up);
        controller.request(Direction::Left);

        assert_eq!(controller.take(), Some(Direction::Left));
        assert_eq!(controller.take(), None);
    }

    #[test]
    fn controller_forwards_reversals_unchanged() {
        let mut controller = InputController::new();

        controller.request(Direction::Down);
        controller.request(Direction::Up);

        assert_eq!(controller.pending(), Some(Direction::Up));
    }

    #[test]
    fn arrow_and_letter_keys_map_to_directions() {
        assert_eq!(
            map_key(press(KeyCode::Up)),
            Some(GameInput::Direction(Direction::Up))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('a'))),
            Some(GameInput::Direction(Direction::Left))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('j'))),
            Some(GameInput::Direction(Direction::Down))
        );
        assert_eq!(map_key(press(KeyCode::Char(' '))), Some(GameInput::Pause));
        assert_eq!(map_key(press(KeyCode::Char('r'))), Some(GameInput::Reset));
        assert_eq!(
            map_key(press(KeyCode::Char('c'))),
            Some(GameInput::ToggleWallet)
        );
        assert_eq!(map_key(press(KeyCode::Esc)), Some(GameInput::Quit));
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(GameInput::Quit));
    }

    #[test]
    fn key_release_is_ignored() {
        let key = KeyEvent::new_with_kind_and_state(
            KeyCode::Up,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(map_key(key), None);
    }
}
