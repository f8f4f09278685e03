//! Hue cycling across the whole line.

use crate::color::{Gradient, HueSpin, Hsv, Interpolation};

/// Degrees the hue advances per frame
const HUE_STEP: u64 = 5;

/// Frames per full trip around the hue circle
const HUE_PERIOD: u64 = 360 / HUE_STEP;

/// Starting hue, in degrees, for `frame`: `(5 * frame) mod 360`.
pub fn rainbow_hue(frame: u64) -> u16 {
    ((frame % HUE_PERIOD) * HUE_STEP) as u16
}

pub(super) fn render(line: &str, frame: u64) -> String {
    let hue = f64::from(rainbow_hue(frame));
    let left = Hsv::new(hue, 1.0, 1.0).to_rgb();
    let right = Hsv::new((hue + 1.0) % 360.0, 1.0, 1.0).to_rgb();

    Gradient::new([left, right])
        .interpolation(Interpolation::Hsv(HueSpin::Long))
        .render(line)
}
