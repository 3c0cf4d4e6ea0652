use bevy::audio::{AddAudioSource, Decodable, Source};
use bevy::prelude::*;
use bevy::utils::Duration;
use std::f32::consts::TAU;

/// UI feedback tone request. Playback is best-effort: with no audio device
/// the spawned source simply never produces sound.
#[derive(Event, Clone, Copy)]
pub struct UiChirp {
    pub frequency: f32,
}

impl UiChirp {
    pub const PRESS: Self = Self { frequency: 600.0 };
    pub const TOGGLE: Self = Self { frequency: 800.0 };
    pub const CONFIRM: Self = Self { frequency: 1000.0 };
}

pub struct AudioFeedbackPlugin;
impl Plugin for AudioFeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.add_audio_source::<Chirp>()
            .add_event::<UiChirp>()
            .add_systems(Update, play_chirps);
    }
}

const SAMPLE_RATE: u32 = 44_100;
const CHIRP_SECS: f32 = 0.1;
const CHIRP_GAIN: f32 = 0.05;

/// A short sine blip, generated rather than loaded from an asset file.
#[derive(Asset, TypePath)]
struct Chirp {
    frequency: f32,
}

struct ChirpDecoder {
    frequency: f32,
    sample: usize,
    total: usize,
}

impl Iterator for ChirpDecoder {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.sample >= self.total {
            return None;
        }
        let t = self.sample as f32 / SAMPLE_RATE as f32;
        // Exponential fade-out over the blip's lifetime
        let gain = CHIRP_GAIN * (-4.0 * t / CHIRP_SECS).exp();
        self.sample += 1;
        Some((t * self.frequency * TAU).sin() * gain)
    }
}

impl Source for ChirpDecoder {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total - self.sample)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(CHIRP_SECS))
    }
}

impl Decodable for Chirp {
    type DecoderItem = f32;
    type Decoder = ChirpDecoder;

    fn decoder(&self) -> Self::Decoder {
        ChirpDecoder {
            frequency: self.frequency,
            sample: 0,
            total: (SAMPLE_RATE as f32 * CHIRP_SECS) as usize,
        }
    }
}

fn play_chirps(
    mut commands: Commands,
    mut chirps: ResMut<Assets<Chirp>>,
    mut requests: EventReader<UiChirp>,
) {
    for request in requests.read() {
        commands.spawn(AudioSourceBundle {
            source: chirps.add(Chirp {
                frequency: request.frequency,
            }),
            settings: PlaybackSettings::DESPAWN,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chirp_is_bounded_decaying_and_finite() {
        let mut decoder = Chirp { frequency: 600.0 }.decoder();
        let samples: Vec<f32> = decoder.by_ref().collect();

        assert_eq!(samples.len(), (SAMPLE_RATE as f32 * CHIRP_SECS) as usize);
        assert!(decoder.next().is_none());

        let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak > 0.0 && peak <= CHIRP_GAIN);

        // The envelope decays: the loudest late sample sits well below the
        // loudest early one.
        let early: f32 = samples[..500].iter().fold(0.0, |m, s| m.max(s.abs()));
        let late: f32 = samples[samples.len() - 500..]
            .iter()
            .fold(0.0, |m, s| m.max(s.abs()));
        assert!(late < early * 0.5);
    }
}
