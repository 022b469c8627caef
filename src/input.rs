use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

use crate::entities::KeyState;
use crate::stage::{Phase, STAGE_COUNT};

/// How long a press counts as held when the terminal never reports releases.
/// Long enough to bridge the gap before key auto-repeat kicks in.
pub const HOLD_WINDOW: Duration = Duration::from_millis(250);

/// Represents one-shot menu actions triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    SelectStage(usize),
    MenuUp,
    MenuDown,
    Confirm,
    ReturnToMenu,
    Quit,
}

/// A physical key that can be held down. Letter keys ignore case so a
/// press and its release match even if shift changed in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeldKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    W,
    A,
    S,
    D,
    Space,
}

const HELD_KEY_COUNT: usize = 9;

impl HeldKey {
    fn from_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up => Some(Self::ArrowUp),
            KeyCode::Down => Some(Self::ArrowDown),
            KeyCode::Left => Some(Self::ArrowLeft),
            KeyCode::Right => Some(Self::ArrowRight),
            KeyCode::Char(' ') => Some(Self::Space),
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => Some(Self::W),
                'a' => Some(Self::A),
                's' => Some(Self::S),
                'd' => Some(Self::D),
                _ => None,
            },
            _ => None,
        }
    }

    /// Keys steering the other way along the same axis
    fn opposites(self) -> &'static [Self] {
        match self {
            Self::ArrowUp | Self::W => &[Self::ArrowDown, Self::S],
            Self::ArrowDown | Self::S => &[Self::ArrowUp, Self::W],
            Self::ArrowLeft | Self::A => &[Self::ArrowRight, Self::D],
            Self::ArrowRight | Self::D => &[Self::ArrowLeft, Self::A],
            Self::Space => &[],
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Manages input polling and translates raw key events into held keys and
/// menu actions
pub struct InputManager {
    /// Last press time per physical key, cleared on release
    pressed_at: [Option<Instant>; HELD_KEY_COUNT],
    /// Whether the terminal reports key releases
    release_events: bool,
    oneshot_actions: Vec<InputAction>,
}

impl InputManager {
    pub fn new(release_events: bool) -> Self {
        Self {
            pressed_at: [None; HELD_KEY_COUNT],
            release_events,
            oneshot_actions: Vec::new(),
        }
    }

    /// Drains every pending terminal event without blocking. Call once per
    /// frame before reading actions.
    pub fn poll_events(&mut self, phase: Phase) -> color_eyre::Result<()> {
        self.oneshot_actions.clear();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = event::read()? {
                self.handle_key_event(key_event, phase, Instant::now());
            }
        }

        Ok(())
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent, phase: Phase, now: Instant) {
        match key_event.kind {
            KeyEventKind::Press => {
                self.handle_menu_key(key_event, phase);
                self.press(key_event.code, now);
            }
            // Auto-repeat only keeps a key held
            KeyEventKind::Repeat => self.press(key_event.code, now),
            KeyEventKind::Release => self.release(key_event.code),
        }
    }

    fn handle_menu_key(&mut self, key_event: KeyEvent, phase: Phase) {
        let code = key_event.code;

        // Quit keys work everywhere
        if matches!(code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
            || (matches!(code, KeyCode::Char('c') | KeyCode::Char('C'))
                && key_event.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.oneshot_actions.push(InputAction::Quit);
            return;
        }

        let action = match phase {
            Phase::StageSelect => match code {
                KeyCode::Char(c) if c.is_ascii_digit() => c
                    .to_digit(10)
                    .map(|d| d as usize)
                    .filter(|d| (1..=STAGE_COUNT).contains(d))
                    .map(|d| InputAction::SelectStage(d - 1)),
                KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(InputAction::MenuUp),
                KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                    Some(InputAction::MenuDown)
                }
                KeyCode::Enter | KeyCode::Char(' ') => Some(InputAction::Confirm),
                _ => None,
            },
            _ if phase.is_finished() => match code {
                KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => {
                    Some(InputAction::ReturnToMenu)
                }
                _ => None,
            },
            _ => None,
        };

        self.oneshot_actions.extend(action);
    }

    fn press(&mut self, code: KeyCode, now: Instant) {
        let Some(key) = HeldKey::from_code(code) else {
            return;
        };
        self.pressed_at[key.slot()] = Some(now);
        // Without releases, a stale hold window would fight the new direction
        if !self.release_events {
            for opposite in key.opposites() {
                self.pressed_at[opposite.slot()] = None;
            }
        }
    }

    fn release(&mut self, code: KeyCode) {
        if let Some(key) = HeldKey::from_code(code) {
            self.pressed_at[key.slot()] = None;
        }
    }

    fn is_held(&self, key: HeldKey, now: Instant) -> bool {
        match self.pressed_at[key.slot()] {
            Some(_) if self.release_events => true,
            Some(at) => now.saturating_duration_since(at) < HOLD_WINDOW,
            None => false,
        }
    }

    /// Keys held as of `now`
    pub fn key_state(&self, now: Instant) -> KeyState {
        let held = |a, b| self.is_held(a, now) || self.is_held(b, now);
        KeyState {
            up: held(HeldKey::ArrowUp, HeldKey::W),
            down: held(HeldKey::ArrowDown, HeldKey::S),
            left: held(HeldKey::ArrowLeft, HeldKey::A),
            right: held(HeldKey::ArrowRight, HeldKey::D),
            fire: self.is_held(HeldKey::Space, now),
        }
    }

    /// One-shot actions gathered by the last `poll_events`, emptying the queue
    pub fn take_actions(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.oneshot_actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Banner;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_held_until_release() {
        let mut input = InputManager::new(true);
        let t0 = Instant::now();
        input.handle_key_event(press(KeyCode::Left), Phase::Playing, t0);
        input.handle_key_event(press(KeyCode::Char(' ')), Phase::Playing, t0);

        let later = t0 + Duration::from_secs(5);
        let keys = input.key_state(later);
        assert!(keys.left && keys.fire);
        assert!(!keys.right);

        input.handle_key_event(release(KeyCode::Left), Phase::Playing, later);
        assert!(!input.key_state(later).left);
        assert!(input.key_state(later).fire);
    }

    #[test]
    fn test_alias_keeps_direction_held() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Left), Phase::Playing, now);
        input.handle_key_event(press(KeyCode::Char('a')), Phase::Playing, now);
        input.handle_key_event(release(KeyCode::Left), Phase::Playing, now);
        assert!(input.key_state(now).left);

        input.handle_key_event(release(KeyCode::Char('A')), Phase::Playing, now);
        assert!(!input.key_state(now).left);
    }

    #[test]
    fn test_tapping_opposite_resumes_held_direction() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Char('a')), Phase::Playing, now);
        input.handle_key_event(press(KeyCode::Char('d')), Phase::Playing, now);
        let keys = input.key_state(now);
        assert!(keys.left && keys.right);

        input.handle_key_event(release(KeyCode::Char('d')), Phase::Playing, now);
        let keys = input.key_state(now);
        assert!(keys.left);
        assert!(!keys.right);
    }

    #[test]
    fn test_opposite_cleared_without_release_events() {
        let mut input = InputManager::new(false);
        let t0 = Instant::now();
        input.handle_key_event(press(KeyCode::Char('a')), Phase::Playing, t0);
        input.handle_key_event(press(KeyCode::Right), Phase::Playing, t0);
        let keys = input.key_state(t0 + Duration::from_millis(50));
        assert!(keys.right);
        assert!(!keys.left);
    }

    #[test]
    fn test_hold_window_without_release_events() {
        let mut input = InputManager::new(false);
        let t0 = Instant::now();
        input.handle_key_event(press(KeyCode::Up), Phase::Playing, t0);
        assert!(input.key_state(t0 + Duration::from_millis(100)).up);
        assert!(!input.key_state(t0 + HOLD_WINDOW).up);

        // auto-repeat refreshes the window
        let repeat = KeyEvent::new_with_kind(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Repeat);
        input.handle_key_event(repeat, Phase::Playing, t0 + Duration::from_millis(200));
        assert!(input.key_state(t0 + Duration::from_millis(400)).up);
    }

    #[test]
    fn test_stage_select_digits() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        for c in ['1', '3', '4', '0'] {
            input.handle_key_event(press(KeyCode::Char(c)), Phase::StageSelect, now);
        }
        assert_eq!(
            input.take_actions(),
            vec![InputAction::SelectStage(0), InputAction::SelectStage(2)]
        );
    }

    #[test]
    fn test_digits_ignored_while_playing() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Char('2')), Phase::Playing, now);
        input.handle_key_event(
            press(KeyCode::Enter),
            Phase::Transition(Banner::StageClear),
            now,
        );
        assert!(input.take_actions().is_empty());
    }

    #[test]
    fn test_return_to_menu_from_end_screens() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Char('r')), Phase::GameOver, now);
        input.handle_key_event(press(KeyCode::Enter), Phase::Won, now);
        assert_eq!(
            input.take_actions(),
            vec![InputAction::ReturnToMenu, InputAction::ReturnToMenu]
        );
        assert!(input.take_actions().is_empty());
    }

    #[test]
    fn test_quit_keys() {
        let mut input = InputManager::new(true);
        let now = Instant::now();
        input.handle_key_event(press(KeyCode::Esc), Phase::Playing, now);
        input.handle_key_event(
            KeyEvent::new_with_kind(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                KeyEventKind::Press,
            ),
            Phase::StageSelect,
            now,
        );
        assert_eq!(input.take_actions(), vec![InputAction::Quit, InputAction::Quit]);
    }
}
