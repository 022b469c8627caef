use rodio::source::SineWave;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::time::Duration;
use tracing::{debug, warn};

use crate::session::SoundCue;

/// One beep: frequency in Hz and length in milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub millis: u64,
}

const fn tone(frequency: f32, millis: u64) -> Tone {
    Tone { frequency, millis }
}

const SHOT: &[Tone] = &[tone(880.0, 30)];
const HIT: &[Tone] = &[tone(440.0, 40)];
const ENEMY_DOWN: &[Tone] = &[tone(330.0, 60), tone(220.0, 90)];
const PLAYER_DOWN: &[Tone] = &[tone(220.0, 150), tone(165.0, 150), tone(110.0, 300)];
const FANFARE: &[Tone] = &[tone(523.0, 120), tone(659.0, 120), tone(784.0, 240)];

/// Tones played back to back for a cue, and the volume to play them at
pub fn cue_tones(cue: SoundCue) -> (&'static [Tone], f32) {
    match cue {
        SoundCue::PlayerShot => (SHOT, 0.02),
        SoundCue::EnemyHit => (HIT, 0.03),
        SoundCue::EnemyDestroyed => (ENEMY_DOWN, 0.05),
        SoundCue::PlayerDestroyed => (PLAYER_DOWN, 0.08),
        SoundCue::StageClear => (FANFARE, 0.05),
    }
}

/// Synthesized sound effects. Without an output device, or when muted, every
/// call is a no-op.
pub struct AudioManager {
    output: Option<(OutputStream, OutputStreamHandle)>,
}

impl AudioManager {
    pub fn new() -> Self {
        match OutputStream::try_default() {
            Ok(output) => {
                debug!("Audio output opened");
                Self {
                    output: Some(output),
                }
            }
            Err(err) => {
                warn!(error = %err, "No audio output, continuing without sound");
                Self::muted()
            }
        }
    }

    pub fn muted() -> Self {
        Self { output: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    pub fn play(&self, cue: SoundCue) {
        let Some((_, handle)) = &self.output else {
            return;
        };
        // Playback errors are not worth interrupting the game for
        let sink = match Sink::try_new(handle) {
            Ok(sink) => sink,
            Err(err) => {
                debug!(error = %err, ?cue, "Dropping sound");
                return;
            }
        };

        let (tones, volume) = cue_tones(cue);
        sink.set_volume(volume);
        for t in tones {
            sink.append(
                SineWave::new(t.frequency).take_duration(Duration::from_millis(t.millis)),
            );
        }
        sink.detach();
    }

    pub fn play_all(&self, cues: impl IntoIterator<Item = SoundCue>) {
        for cue in cues {
            self.play(cue);
        }
    }
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}
