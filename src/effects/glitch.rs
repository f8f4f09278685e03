//! Signal-noise effect: dropped chunks, stray glyphs and periodic blackouts.

use super::EffectOptions;
use crate::color::{paint, ColorParseError, Emphasis};
use rand::Rng;
use serde::Deserialize;

pub(super) const DEFAULT_PRIMARY: &str = "#ffffff";
pub(super) const DEFAULT_SECONDARY: &str = "#ffffff";

/// Noise palette a kept character may be swapped for
pub const GLITCH_CHARS: &str =
    "x*0987654321[]0-~@#(____!!!!\\|?????....0000\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t";

/// Probability threshold above which a character turns into noise
const NOISE_THRESHOLD: f64 = 0.995;
/// Probability threshold below which a character is dropped
const DROP_THRESHOLD: f64 = 0.005;
/// Offset that makes most gap draws land at or below zero
const GAP_BIAS: f64 = 0.8;

/// Composite modulo check deciding when the whole line drops out.
///
/// The line blacks out when `Σ frame mod p` over `periods` exceeds
/// `threshold`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlackoutRule {
    pub periods: Vec<u64>,
    pub threshold: u64,
}

impl Default for BlackoutRule {
    fn default() -> Self {
        Self {
            periods: vec![2, 3, 11, 29, 37],
            threshold: 52,
        }
    }
}

impl BlackoutRule {
    pub fn is_blackout(&self, frame: u64) -> bool {
        let total = self
            .periods
            .iter()
            .filter(|&&period| period > 0)
            .fold(0u64, |acc, &period| acc.saturating_add(frame % period));
        total > self.threshold
    }
}

enum Piece {
    Gap(String),
    Text(String),
}

enum CaseShift {
    Keep,
    Upper,
    Lower,
}

pub(super) fn render<R: Rng + ?Sized>(
    line: &str,
    frame: u64,
    options: &EffectOptions,
    rng: &mut R,
) -> Result<String, ColorParseError> {
    // Primary is parsed so bad input is reported, but it never tints the output
    options.primary_or(DEFAULT_PRIMARY)?;
    let gap_color = options.secondary_or(DEFAULT_SECONDARY)?;

    if options.blackout.is_blackout(frame) {
        return Ok(blank_out(line));
    }

    let chars: Vec<char> = line.chars().collect();
    let chunk_size = ((chars.len() as f64 * 0.02).round() as usize).max(3) as f64;

    let mut pieces = Vec::new();
    let mut text = String::new();
    let mut i = 0;
    while i < chars.len() {
        let skip = ((rng.gen::<f64>() - GAP_BIAS) * chunk_size).max(0.0).round() as usize;
        let end = i.saturating_add(skip).min(chars.len());
        if end > i {
            if !text.is_empty() {
                pieces.push(Piece::Text(std::mem::take(&mut text)));
            }
            let gap: String = chars[i..end].iter().collect();
            pieces.push(Piece::Gap(blank_out(&gap)));
        }
        i = i.saturating_add(skip);

        if let Some(&ch) = chars.get(i) {
            if ch != '\n' && ch != '\r' && rng.gen::<f64>() > NOISE_THRESHOLD {
                let glyphs = GLITCH_CHARS.as_bytes();
                text.push(char::from(glyphs[rng.gen_range(0..glyphs.len())]));
            } else if rng.gen::<f64>() > DROP_THRESHOLD {
                text.push(ch);
            }
        }
        i = i.saturating_add(1);
    }
    if !text.is_empty() {
        pieces.push(Piece::Text(text));
    }

    let shift = if rng.gen::<f64>() > 0.99 {
        CaseShift::Upper
    } else if rng.gen::<f64>() < 0.01 {
        CaseShift::Lower
    } else {
        CaseShift::Keep
    };

    let mut out = String::with_capacity(line.len());
    for piece in pieces {
        match piece {
            Piece::Gap(gap) => out.push_str(&paint(gap_color, &gap, Emphasis::PLAIN)),
            Piece::Text(text) => match shift {
                CaseShift::Keep => out.push_str(&text),
                CaseShift::Upper => out.push_str(&text.to_uppercase()),
                CaseShift::Lower => out.push_str(&text.to_lowercase()),
            },
        }
    }
    Ok(out)
}

/// Replace every character except line breaks with a space.
fn blank_out(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\r' || c == '\n' { c } else { ' ' })
        .collect()
}
