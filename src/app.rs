use color_eyre::Result;
use ratatui::{Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tracing::info;

use crate::audio::AudioManager;
use crate::constants::TICK_DURATION;
use crate::input::{InputAction, InputManager};
use crate::renderer::{GameRenderer, RenderView};
use crate::session::Session;
use crate::stage::STAGE_COUNT;

/// Most simulation ticks run for a single rendered frame
pub const MAX_SUBSTEPS: u32 = 5;

/// Converts wall-clock time into a whole number of fixed ticks
#[derive(Debug, Default)]
pub struct FrameClock {
    accumulator: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks to run for `elapsed` wall time. Backlog beyond
    /// [`MAX_SUBSTEPS`] is dropped so a stall never snowballs.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;

        let mut substeps = 0;
        while self.accumulator >= TICK_DURATION && substeps < MAX_SUBSTEPS {
            self.accumulator -= TICK_DURATION;
            substeps += 1;
        }
        if self.accumulator >= TICK_DURATION {
            self.accumulator = Duration::ZERO;
        }
        substeps
    }
}

/// The main application: wires terminal input, the session, rendering and
/// sound together.
pub struct App {
    running: bool,
    session: Session,
    /// Highlighted stage on the stage select screen
    selected_stage: usize,
    clock: FrameClock,
    last_frame_time: Instant,
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
}

impl App {
    pub fn new(session: Session, input_manager: InputManager, audio_manager: AudioManager) -> Self {
        Self {
            running: true,
            session,
            selected_stage: 0,
            clock: FrameClock::new(),
            last_frame_time: Instant::now(),
            input_manager,
            renderer: GameRenderer::new(),
            audio_manager,
        }
    }

    /// Starts straight into `stage`, bypassing the stage select
    pub fn with_start_stage(mut self, stage: Option<usize>) -> Self {
        if let Some(stage) = stage {
            self.selected_stage = stage;
            self.session.start_game(stage);
        }
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn selected_stage(&self) -> usize {
        self.selected_stage
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.last_frame_time = Instant::now();

        while self.running {
            terminal.draw(|frame| {
                let view = RenderView {
                    phase: self.session.phase(),
                    world: self.session.world(),
                    score: self.session.score(),
                    stage_number: self.session.stage_number(),
                    high_scores: self.session.high_scores().all(),
                    selected_stage: self.selected_stage,
                };
                self.renderer.render(frame, &view);
            })?;

            self.input_manager.poll_events(self.session.phase())?;
            let actions = self.input_manager.take_actions();
            self.process_actions(&actions);

            let now = Instant::now();
            let elapsed = now.duration_since(self.last_frame_time);
            self.last_frame_time = now;

            self.session.set_keys(self.input_manager.key_state(now));
            for _ in 0..self.clock.advance(elapsed) {
                self.session.tick();
            }
            self.audio_manager.play_all(self.session.drain_cues());

            // Yield the CPU between frames
            std::thread::sleep(Duration::from_millis(4));
        }

        info!(score = self.session.score(), "Exiting");
        Ok(())
    }

    /// Process menu actions gathered this frame
    pub fn process_actions(&mut self, actions: &[InputAction]) {
        for action in actions {
            match *action {
                InputAction::Quit => {
                    self.running = false;
                }
                InputAction::SelectStage(stage) => {
                    self.selected_stage = stage;
                    self.session.start_game(stage);
                }
                InputAction::MenuUp => {
                    self.selected_stage = (self.selected_stage + STAGE_COUNT - 1) % STAGE_COUNT;
                }
                InputAction::MenuDown => {
                    self.selected_stage = (self.selected_stage + 1) % STAGE_COUNT;
                }
                InputAction::Confirm => {
                    self.session.start_game(self.selected_stage);
                }
                InputAction::ReturnToMenu => {
                    self.session.return_to_stage_select();
                }
            }
        }
    }
}
