//! Brightness pulse between an "off" and an "on" color.
//!
//! A 120-frame cycle: the "on" color spreads out from the middle of the
//! line over the transition window, holds, then contracts again. The rest
//! of the cycle is flat "off".

use super::EffectOptions;
use crate::color::{paint, ColorParseError, ColorSpec, ColorStop, Emphasis, Gradient};

pub(super) const DEFAULT_PRIMARY: &str = "#ff1010";
pub(super) const DEFAULT_SECONDARY: &str = "#e6e6e6";

const CYCLE: u64 = 120;
const TRANSITION: u64 = 6;
const HOLD: u64 = 10;

pub(super) fn render(
    line: &str,
    frame: u64,
    options: &EffectOptions,
) -> Result<String, ColorParseError> {
    let off = options.primary_or(DEFAULT_PRIMARY)?;
    let on = options.secondary_or(DEFAULT_SECONDARY)?;

    let phase = frame % CYCLE;
    if phase >= 2 * TRANSITION + HOLD {
        return Ok(paint(off, line, Emphasis::PLAIN));
    }
    if (TRANSITION..=TRANSITION + HOLD).contains(&phase) {
        return Ok(paint(on, line, Emphasis::PLAIN));
    }

    // Mirror the ramp on the way back down
    let ramp = if phase > TRANSITION + HOLD {
        2 * TRANSITION + HOLD - phase
    } else {
        phase
    };
    if ramp == 0 {
        return Ok(paint(off, line, Emphasis::PLAIN));
    }

    Ok(ramp_gradient(off, on, ramp).render(line))
}

fn ramp_gradient(off: ColorSpec, on: ColorSpec, ramp: u64) -> Gradient {
    let (off, on) = (off.to_rgb(), on.to_rgb());
    let x = ramp as f64 / TRANSITION as f64;

    let stops = if ramp <= TRANSITION / 2 {
        vec![
            ColorStop::new(off, 0.5 - x),
            ColorStop::new(on, 0.5),
            ColorStop::new(off, 0.5 + x),
        ]
    } else {
        vec![
            ColorStop::new(off, 0.0),
            ColorStop::new(on, 1.0 - x),
            ColorStop::new(on, x),
            ColorStop::new(off, 1.0),
        ]
    };
    Gradient::with_stops(stops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LINE: &str = "pulse me please";

    fn flat(color: &str) -> String {
        paint(ColorSpec::parse(color).unwrap(), LINE, Emphasis::PLAIN)
    }

    #[test]
    fn test_hold_window_is_flat_secondary() {
        let options = EffectOptions::new();
        for phase in 6..=16 {
            for cycle in [0, 1, 50] {
                let out = render(LINE, cycle * CYCLE + phase, &options).unwrap();
                assert_eq!(out, flat(DEFAULT_SECONDARY), "phase {phase}");
            }
        }
    }

    #[test]
    fn test_rest_of_cycle_is_flat_primary() {
        let options = EffectOptions::new();
        for phase in 22..CYCLE {
            let out = render(LINE, phase, &options).unwrap();
            assert_eq!(out, flat(DEFAULT_PRIMARY), "phase {phase}");
        }
        assert_eq!(render(LINE, 120, &options).unwrap(), flat(DEFAULT_PRIMARY));
    }

    #[test]
    fn test_transition_frames_are_gradients() {
        let options = EffectOptions::new();
        for phase in (1..6).chain(17..22) {
            let out = render(LINE, phase, &options).unwrap();
            assert_ne!(out, flat(DEFAULT_PRIMARY), "phase {phase}");
            assert_ne!(out, flat(DEFAULT_SECONDARY), "phase {phase}");
        }
    }

    #[test]
    fn test_short_ramp_is_three_stops_around_center() {
        let off = ColorSpec::parse(DEFAULT_PRIMARY).unwrap();
        let on = ColorSpec::parse(DEFAULT_SECONDARY).unwrap();
        // ramp 2: off@1/6, on@1/2, off@5/6
        let gradient = ramp_gradient(off, on, 2);

        assert_eq!(gradient.color_at(0.5), on.to_rgb());
        for t in [0.0, 0.1, 0.9, 1.0] {
            assert_eq!(gradient.color_at(t), off.to_rgb(), "t = {t}");
        }
        let blend = gradient.color_at(0.3);
        assert_ne!(blend, off.to_rgb());
        assert_ne!(blend, on.to_rgb());
    }

    #[test]
    fn test_long_ramp_is_four_stops_with_plateau() {
        let off = ColorSpec::parse(DEFAULT_PRIMARY).unwrap();
        let on = ColorSpec::parse(DEFAULT_SECONDARY).unwrap();
        // ramp 5: off@0, on@1/6, on@5/6, off@1
        let gradient = ramp_gradient(off, on, 5);

        assert_eq!(gradient.color_at(0.0), off.to_rgb());
        assert_eq!(gradient.color_at(1.0), off.to_rgb());
        for t in [0.2, 0.5, 0.8] {
            assert_eq!(gradient.color_at(t), on.to_rgb(), "t = {t}");
        }
        let edge = gradient.color_at(0.05);
        assert_ne!(edge, off.to_rgb());
        assert_ne!(edge, on.to_rgb());
    }

    #[test]
    fn test_ramp_is_symmetric() {
        let options = EffectOptions::new();
        for ramp in 1..6 {
            let up = render(LINE, ramp, &options).unwrap();
            let down = render(LINE, 22 - ramp, &options).unwrap();
            assert_eq!(up, down, "ramp {ramp}");
        }
    }

    #[test]
    fn test_custom_colors() {
        let options = EffectOptions::new()
            .with_primary("#000000")
            .with_secondary("white");
        assert_eq!(
            render(LINE, 10, &options).unwrap(),
            paint(ColorSpec::NEUTRAL, LINE, Emphasis::PLAIN)
        );
    }
}
