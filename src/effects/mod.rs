//! Effect library
//!
//! Every effect maps one line of text and a frame number to a colorized
//! string. All effects except [`EffectKind::Glitch`] are pure functions of
//! their inputs; glitch draws from the random source it is handed.

mod glitch;
mod karaoke;
mod neon;
mod pulse;
mod radar;
mod rainbow;

pub use glitch::{BlackoutRule, GLITCH_CHARS};
pub use rainbow::rainbow_hue;

use crate::color::{ColorParseError, ColorSpec};
use crate::ChalklineError;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// The fixed catalog of effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Rainbow,
    Pulse,
    Glitch,
    Radar,
    Neon,
    Karaoke,
}

impl EffectKind {
    pub const ALL: [EffectKind; 6] = [
        EffectKind::Rainbow,
        EffectKind::Pulse,
        EffectKind::Glitch,
        EffectKind::Radar,
        EffectKind::Neon,
        EffectKind::Karaoke,
    ];

    /// Delay between frames at speed 1, in milliseconds.
    pub const fn base_delay_ms(self) -> u64 {
        match self {
            EffectKind::Rainbow => 15,
            EffectKind::Pulse => 16,
            EffectKind::Glitch => 55,
            EffectKind::Radar => 50,
            EffectKind::Neon => 500,
            EffectKind::Karaoke => 50,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            EffectKind::Rainbow => "rainbow",
            EffectKind::Pulse => "pulse",
            EffectKind::Glitch => "glitch",
            EffectKind::Radar => "radar",
            EffectKind::Neon => "neon",
            EffectKind::Karaoke => "karaoke",
        }
    }

    /// Render one line for `frame`.
    ///
    /// Colors missing from `options` fall back to the effect's defaults;
    /// malformed colors surface as [`ColorParseError`].
    pub fn render<R: Rng + ?Sized>(
        self,
        line: &str,
        frame: u64,
        options: &EffectOptions,
        rng: &mut R,
    ) -> Result<String, ColorParseError> {
        match self {
            EffectKind::Rainbow => Ok(rainbow::render(line, frame)),
            EffectKind::Pulse => pulse::render(line, frame, options),
            EffectKind::Glitch => glitch::render(line, frame, options, rng),
            EffectKind::Radar => radar::render(line, frame, options),
            EffectKind::Neon => neon::render(line, frame, options),
            EffectKind::Karaoke => karaoke::render(line, frame, options),
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = ChalklineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|kind| kind.name()).collect();
                ChalklineError::InvalidArgument(format!(
                    "unknown effect {s:?}, expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}

/// Color and shape parameters handed to an effect on every frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectOptions {
    /// Primary color (hex or name); each effect has its own default
    pub primary: Option<String>,

    /// Secondary color (hex or name); each effect has its own default
    pub secondary: Option<String>,

    /// Fraction of the line lit behind the radar beam
    pub visible_fraction: Option<f64>,

    /// When glitch blanks the whole line
    pub blackout: BlackoutRule,
}

impl EffectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_primary(mut self, color: impl Into<String>) -> Self {
        self.primary = Some(color.into());
        self
    }

    pub fn with_secondary(mut self, color: impl Into<String>) -> Self {
        self.secondary = Some(color.into());
        self
    }

    pub fn with_visible_fraction(mut self, fraction: f64) -> Self {
        self.visible_fraction = Some(fraction);
        self
    }

    pub fn with_blackout(mut self, blackout: BlackoutRule) -> Self {
        self.blackout = blackout;
        self
    }

    /// Parse every explicitly supplied color.
    pub fn validate(&self) -> Result<(), ColorParseError> {
        for color in self.primary.iter().chain(self.secondary.iter()) {
            ColorSpec::parse(color)?;
        }
        Ok(())
    }

    fn primary_or(&self, default: &str) -> Result<ColorSpec, ColorParseError> {
        ColorSpec::parse(self.primary.as_deref().unwrap_or(default))
    }

    fn secondary_or(&self, default: &str) -> Result<ColorSpec, ColorParseError> {
        ColorSpec::parse(self.secondary.as_deref().unwrap_or(default))
    }
}
