//! Web Audio cue player
//!
//! Every cue is a handful of oscillator blips scheduled on the audio clock,
//! no sample files.

use crate::host::{AudioSink, Cue};
use web_sys::{AudioContext, AudioContextState, OscillatorType};

/// One oscillator blip
#[derive(Debug, Copy, Clone)]
struct Tone {
    frequency: f32,
    /// seconds
    duration: f64,
    wave: OscillatorType,
    volume: f32,
    /// seconds after the cue starts
    delay: f64,
}

const fn tone(frequency: f32, duration: f64, wave: OscillatorType, volume: f32, delay: f64) -> Tone {
    Tone {
        frequency,
        duration,
        wave,
        volume,
        delay,
    }
}

use OscillatorType::{Sawtooth, Sine, Square, Triangle};

const JUMP: &[Tone] = &[
    tone(150.0, 0.2, Sawtooth, 0.18, 0.0),
    tone(250.0, 0.15, Sine, 0.12, 0.03),
    tone(350.0, 0.1, Triangle, 0.08, 0.08),
];
const LANDING: &[Tone] = &[
    tone(60.0, 0.25, Square, 0.15, 0.0),
    tone(80.0, 0.2, Sine, 0.12, 0.0),
    tone(70.0, 0.15, Sine, 0.08, 0.1),
];
const COLLECT: &[Tone] = &[
    tone(1000.0, 0.3, Sine, 0.18, 0.0),
    tone(1400.0, 0.25, Triangle, 0.15, 0.05),
    tone(1800.0, 0.2, Sine, 0.12, 0.1),
    tone(2400.0, 0.15, Square, 0.08, 0.15),
];
const OBSTACLE_HIT: &[Tone] = &[
    tone(100.0, 0.4, Square, 0.25, 0.0),
    tone(150.0, 0.35, Sawtooth, 0.2, 0.0),
    tone(80.0, 0.25, Sine, 0.12, 0.1),
];
const LIFE_LOST: &[Tone] = &[
    tone(400.0, 0.4, Sine, 0.15, 0.0),
    tone(320.0, 0.4, Triangle, 0.12, 0.2),
    tone(240.0, 0.5, Sine, 0.1, 0.4),
    tone(180.0, 0.6, Sine, 0.08, 0.6),
];
const LEVEL_COMPLETE: &[Tone] = &[
    tone(523.0, 0.4, Sine, 0.18, 0.0),
    tone(659.0, 0.4, Sine, 0.18, 0.12),
    tone(784.0, 0.4, Sine, 0.18, 0.24),
    tone(1047.0, 0.4, Sine, 0.18, 0.36),
    tone(1319.0, 0.4, Sine, 0.18, 0.48),
];
const LEVEL_UP: &[Tone] = &[
    tone(440.0, 0.3, Sine, 0.15, 0.0),
    tone(554.0, 0.3, Sine, 0.15, 0.1),
    tone(659.0, 0.3, Sine, 0.15, 0.2),
    tone(880.0, 0.3, Sine, 0.15, 0.3),
];
const STAR_COLLECT: &[Tone] = &[
    tone(1600.0, 0.15, Sine, 0.12, 0.0),
    tone(2000.0, 0.15, Triangle, 0.1, 0.04),
    tone(2400.0, 0.2, Sine, 0.12, 0.08),
    tone(3200.0, 0.15, Square, 0.08, 0.14),
];
const GAME_START: &[Tone] = &[
    tone(330.0, 0.2, Sine, 0.12, 0.0),
    tone(440.0, 0.2, Triangle, 0.14, 0.15),
    tone(554.0, 0.25, Sine, 0.16, 0.3),
    tone(659.0, 0.3, Triangle, 0.18, 0.45),
];
const GAME_OVER: &[Tone] = &[
    tone(523.0, 0.6, Sine, 0.15, 0.0),
    tone(440.0, 0.6, Triangle, 0.12, 0.3),
    tone(349.0, 0.8, Sine, 0.1, 0.6),
    tone(262.0, 1.0, Sine, 0.08, 0.9),
];
const FACT_SHOWN: &[Tone] = &[
    tone(800.0, 0.2, Sine, 0.1, 0.0),
    tone(1200.0, 0.25, Triangle, 0.12, 0.12),
    tone(1000.0, 0.3, Sine, 0.08, 0.25),
];

/// Pitch and loudness climb with the streak
fn combo(count: u32) -> Vec<Tone> {
    let base = 1000.0 + count as f32 * 200.0;
    let volume = (0.12 + count as f32 * 0.03).min(0.25);
    let mut tones = vec![
        tone(base, 0.2, Sine, volume, 0.0),
        tone(base * 1.5, 0.15, Triangle, volume * 0.7, 0.0),
    ];
    if count >= 3 {
        tones.push(tone(base * 2.0, 0.12, Square, volume * 0.5, 0.04));
    }
    if count >= 5 {
        tones.push(tone(base * 3.0, 0.1, Sine, volume * 0.4, 0.08));
    }
    tones
}

pub struct CuePlayer {
    ctx: Option<AudioContext>,
    master_volume: f32,
}

impl Default for CuePlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl CuePlayer {
    pub fn new() -> Self {
        // may fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        CuePlayer {
            ctx,
            master_volume: 0.4,
        }
    }

    fn schedule(&self, ctx: &AudioContext, tones: &[Tone]) {
        let now = ctx.current_time();
        for blip in tones {
            if self.blip(ctx, now, blip).is_none() {
                log::debug!("dropped a {} Hz tone", blip.frequency);
            }
        }
    }

    fn blip(&self, ctx: &AudioContext, now: f64, blip: &Tone) -> Option<()> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;
        osc.set_type(blip.wave);
        osc.frequency().set_value(blip.frequency);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        let start = now + blip.delay;
        let end = start + blip.duration;
        let peak = blip.volume * self.master_volume;
        gain.gain().set_value_at_time(0.0, start).ok()?;
        gain.gain()
            .linear_ramp_to_value_at_time(peak, start + 0.01)
            .ok()?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, end)
            .ok()?;

        osc.start_with_when(start).ok()?;
        osc.stop_with_when(end).ok()
    }
}

impl AudioSink for CuePlayer {
    fn play(&mut self, cue: Cue) {
        let Some(ctx) = &self.ctx else { return };

        // browsers keep the context suspended until a user gesture
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::Jump => self.schedule(ctx, JUMP),
            Cue::Landing => self.schedule(ctx, LANDING),
            Cue::Collect => self.schedule(ctx, COLLECT),
            Cue::Combo(count) => self.schedule(ctx, &combo(count)),
            Cue::ObstacleHit => self.schedule(ctx, OBSTACLE_HIT),
            Cue::LifeLost => self.schedule(ctx, LIFE_LOST),
            Cue::LevelUp => self.schedule(ctx, LEVEL_UP),
            Cue::LevelComplete => self.schedule(ctx, LEVEL_COMPLETE),
            Cue::GameOver => self.schedule(ctx, GAME_OVER),
            Cue::FactShown => self.schedule(ctx, FACT_SHOWN),
            Cue::GameStart => self.schedule(ctx, GAME_START),
            Cue::StarCollect => self.schedule(ctx, STAR_COLLECT),
        }
    }
}
