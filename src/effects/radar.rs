//! A beam sweeping across the line, leaving a fading trail.

use super::EffectOptions;
use crate::color::{paint, ColorParseError, ColorSpec, Emphasis};

pub(super) const DEFAULT_PRIMARY: &str = "#ffffff";
pub(super) const DEFAULT_VISIBLE_FRACTION: f64 = 0.2;

pub(super) fn render(
    line: &str,
    frame: u64,
    options: &EffectOptions,
) -> Result<String, ColorParseError> {
    let color = options.primary_or(DEFAULT_PRIMARY)?.to_rgb();
    let visible = options
        .visible_fraction
        .unwrap_or(DEFAULT_VISIBLE_FRACTION);

    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    if len == 0 {
        return Ok(String::new());
    }

    // NaN and negative fractions saturate to zero
    let depth = (len as f64 * visible).min(len as f64).floor() as usize;
    if depth == 0 {
        return Ok(" ".repeat(len));
    }

    let step = 255 / depth;
    let beam = (frame % (len + depth) as u64) as i64;
    let depth = depth as i64;

    let mut out = String::with_capacity(len * 20);
    let mut buf = [0u8; 4];
    for (i, ch) in chars.iter().enumerate() {
        let distance = beam - i as i64;
        if distance > 0 && distance < depth {
            let shade = round2(((depth - distance) as f64 * step as f64) / 255.0);
            out.push_str(&paint(
                ColorSpec::Rgb(color.scale(shade)),
                ch.encode_utf8(&mut buf),
                Emphasis::PLAIN,
            ));
        } else {
            out.push(' ');
        }
    }
    Ok(out)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
