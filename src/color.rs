//! Color primitives
//!
//! Hex and named color parsing, HSV conversion, positioned gradients and
//! ANSI painting. Everything here is pure; painting goes through crossterm's
//! styled content so the escape sequences match what the terminal layer
//! emits elsewhere.

use crossterm::style::{style, Color, Stylize};
use std::str::FromStr;

/// Errors raised while parsing a color string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),

    #[error("unknown color name: {0:?}")]
    UnknownName(String),
}

/// An 8-bit sRGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB` (the `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        let bytes = digits.as_bytes();

        let parsed = match bytes.len() {
            // #RGB
            3 => parse_short_hex(bytes),
            // #RRGGBB
            6 => parse_long_hex(bytes),
            _ => None,
        };

        parsed.ok_or_else(|| ColorParseError::InvalidHex(s.to_string()))
    }

    /// Multiply every channel by `factor`, flooring the result.
    pub fn scale(self, factor: f64) -> Self {
        let channel = |c: u8| (f64::from(c) * factor).floor().clamp(0.0, 255.0) as u8;
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }

    /// Linear interpolation in RGB space, `t` in `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let channel = |a: u8, b: u8| {
            let a = f64::from(a);
            (a + (f64::from(b) - a) * t).round().clamp(0.0, 255.0) as u8
        };
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    pub fn to_hsv(self) -> Hsv {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * ((g - b) / delta).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };
        let s = if max == 0.0 { 0.0 } else { delta / max };

        Hsv::new(h, s, max)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
        }
    }
}

/// Hue in degrees, saturation and value in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(360.0) / 60.0;
        let c = self.v * self.s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = self.v - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Rgb::new(unit_to_u8(r + m), unit_to_u8(g + m), unit_to_u8(b + m))
    }
}

/// A color that can be painted: either a true-color value or one of the
/// named 16-color palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpec {
    Rgb(Rgb),
    Named { ansi: Color, approx: Rgb },
}

impl ColorSpec {
    /// Plain terminal white, used for un-highlighted text.
    pub const NEUTRAL: Self = Self::Named {
        ansi: Color::Grey,
        approx: Rgb::new(229, 229, 229),
    };

    /// Parse a named color (`white`, `redBright`, ...) or a hex string.
    pub fn parse(s: &str) -> Result<Self, ColorParseError> {
        if let Some(named) = named_color(s) {
            return Ok(named);
        }
        if s.starts_with('#') || s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Rgb::from_hex(s).map(Self::Rgb);
        }
        Err(ColorParseError::UnknownName(s.to_string()))
    }

    /// RGB value of this color; named colors map to the xterm palette.
    pub fn to_rgb(self) -> Rgb {
        match self {
            Self::Rgb(rgb) => rgb,
            Self::Named { approx, .. } => approx,
        }
    }
}

impl FromStr for ColorSpec {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Rgb> for ColorSpec {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

impl From<ColorSpec> for Color {
    fn from(spec: ColorSpec) -> Self {
        match spec {
            ColorSpec::Rgb(rgb) => rgb.into(),
            ColorSpec::Named { ansi, .. } => ansi,
        }
    }
}

fn named_color(name: &str) -> Option<ColorSpec> {
    let (ansi, r, g, b) = match name.to_ascii_lowercase().as_str() {
        "black" => (Color::Black, 0, 0, 0),
        "red" => (Color::DarkRed, 205, 0, 0),
        "green" => (Color::DarkGreen, 0, 205, 0),
        "yellow" => (Color::DarkYellow, 205, 205, 0),
        "blue" => (Color::DarkBlue, 0, 0, 238),
        "magenta" => (Color::DarkMagenta, 205, 0, 205),
        "cyan" => (Color::DarkCyan, 0, 205, 205),
        "white" => (Color::Grey, 229, 229, 229),
        "gray" | "grey" | "blackbright" => (Color::DarkGrey, 127, 127, 127),
        "redbright" => (Color::Red, 255, 0, 0),
        "greenbright" => (Color::Green, 0, 255, 0),
        "yellowbright" => (Color::Yellow, 255, 255, 0),
        "bluebright" => (Color::Blue, 92, 92, 255),
        "magentabright" => (Color::Magenta, 255, 0, 255),
        "cyanbright" => (Color::Cyan, 0, 255, 255),
        "whitebright" => (Color::White, 255, 255, 255),
        _ => return None,
    };
    Some(ColorSpec::Named {
        ansi,
        approx: Rgb::new(r, g, b),
    })
}

/// Text attributes applied alongside a color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Emphasis {
    pub bold: bool,
    pub dim: bool,
}

impl Emphasis {
    pub const PLAIN: Self = Self {
        bold: false,
        dim: false,
    };
    pub const BOLD: Self = Self {
        bold: true,
        dim: false,
    };
    pub const DIM: Self = Self {
        bold: false,
        dim: true,
    };
}

/// Wrap `text` in the escape sequences for `color` and `emphasis`.
///
/// Empty text stays empty, so effects rendering an empty line produce an
/// empty string.
pub fn paint(color: ColorSpec, text: &str, emphasis: Emphasis) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut styled = style(text).with(Color::from(color));
    if emphasis.bold {
        styled = styled.bold();
    }
    if emphasis.dim {
        styled = styled.dim();
    }
    styled.to_string()
}

/// Direction taken around the hue circle when interpolating in HSV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HueSpin {
    Short,
    Long,
}

/// Color space used between gradient stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Rgb,
    Hsv(HueSpin),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub color: Rgb,
    pub position: f64,
}

impl ColorStop {
    pub fn new(color: impl Into<Rgb>, position: f64) -> Self {
        Self {
            color: color.into(),
            position,
        }
    }
}

/// A multi-stop gradient spread across the characters of a string.
///
/// Positions are expected in non-decreasing order within `[0, 1]`; anything
/// before the first stop takes its color, anything after the last stop
/// takes the last color.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<ColorStop>,
    interpolation: Interpolation,
}

impl Gradient {
    /// Evenly spaced stops interpolated in RGB.
    pub fn new(colors: impl IntoIterator<Item = Rgb>) -> Self {
        let colors: Vec<Rgb> = colors.into_iter().collect();
        let last = colors.len().saturating_sub(1).max(1) as f64;
        let stops = colors
            .into_iter()
            .enumerate()
            .map(|(i, color)| ColorStop::new(color, i as f64 / last))
            .collect();
        Self::with_stops(stops)
    }

    pub fn with_stops(stops: Vec<ColorStop>) -> Self {
        Self {
            stops,
            interpolation: Interpolation::Rgb,
        }
    }

    pub fn interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn color_at(&self, t: f64) -> Rgb {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgb::WHITE;
        };
        if t <= first.position {
            return first.color;
        }
        if t >= last.position {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t >= a.position && t <= b.position {
                let span = b.position - a.position;
                let local = if span <= 0.0 {
                    1.0
                } else {
                    (t - a.position) / span
                };
                return self.mix(a.color, b.color, local);
            }
        }
        last.color
    }

    fn mix(&self, a: Rgb, b: Rgb, t: f64) -> Rgb {
        match self.interpolation {
            Interpolation::Rgb => a.lerp(b, t),
            Interpolation::Hsv(spin) => {
                let (from, to) = (a.to_hsv(), b.to_hsv());
                Hsv::new(
                    lerp_hue(from.h, to.h, t, spin),
                    from.s + (to.s - from.s) * t,
                    from.v + (to.v - from.v) * t,
                )
                .to_rgb()
            }
        }
    }

    /// Paint each character of `text` with its position along the gradient.
    pub fn render(&self, text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let last = chars.len().saturating_sub(1);

        let mut out = String::with_capacity(chars.len() * 20);
        let mut buf = [0u8; 4];
        for (i, ch) in chars.iter().enumerate() {
            let t = if last == 0 { 0.0 } else { i as f64 / last as f64 };
            let color = self.color_at(t);
            out.push_str(&paint(
                ColorSpec::Rgb(color),
                ch.encode_utf8(&mut buf),
                Emphasis::PLAIN,
            ));
        }
        out
    }
}

/// Interpolate between two hues, going the short or long way round.
pub fn lerp_hue(from: f64, to: f64, t: f64, spin: HueSpin) -> f64 {
    let mut delta = (to - from).rem_euclid(360.0);
    match spin {
        HueSpin::Short if delta > 180.0 => delta -= 360.0,
        HueSpin::Long if delta > 0.0 && delta < 180.0 => delta -= 360.0,
        _ => {}
    }
    (from + delta * t).rem_euclid(360.0)
}

fn parse_short_hex(bytes: &[u8]) -> Option<Rgb> {
    let r = hex_digit(bytes[0])?;
    let g = hex_digit(bytes[1])?;
    let b = hex_digit(bytes[2])?;
    Some(Rgb::new(r << 4 | r, g << 4 | g, b << 4 | b))
}

fn parse_long_hex(bytes: &[u8]) -> Option<Rgb> {
    let r = hex_byte(&bytes[0..2])?;
    let g = hex_byte(&bytes[2..4])?;
    let b = hex_byte(&bytes[4..6])?;
    Some(Rgb::new(r, g, b))
}

const fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = hex_digit(bytes[0])?;
    let lo = hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

fn unit_to_u8(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("#ff1010").unwrap(), Rgb::new(255, 16, 16));
        assert_eq!(Rgb::from_hex("D546F2").unwrap(), Rgb::new(0xd5, 0x46, 0xf2));
        assert_eq!(Rgb::from_hex("#fff").unwrap(), Rgb::WHITE);
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(matches!(
            Rgb::from_hex("#ff10"),
            Err(ColorParseError::InvalidHex(_))
        ));
        assert!(Rgb::from_hex("#gggggg").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn test_parse_named_and_unknown() {
        assert_eq!(ColorSpec::parse("white").unwrap(), ColorSpec::NEUTRAL);
        assert_eq!(
            ColorSpec::parse("redBright").unwrap().to_rgb(),
            Rgb::new(255, 0, 0)
        );
        assert!(matches!(
            ColorSpec::parse("chartreuse-ish"),
            Err(ColorParseError::UnknownName(_))
        ));
    }

    #[test]
    fn test_hsv_round_trip_primaries() {
        assert_eq!(Hsv::new(0.0, 1.0, 1.0).to_rgb(), Rgb::new(255, 0, 0));
        assert_eq!(Hsv::new(120.0, 1.0, 1.0).to_rgb(), Rgb::new(0, 255, 0));
        assert_eq!(Hsv::new(240.0, 1.0, 1.0).to_rgb(), Rgb::new(0, 0, 255));
        assert_eq!(Hsv::new(360.0, 1.0, 1.0).to_rgb(), Rgb::new(255, 0, 0));

        let hsv = Rgb::new(0, 0, 255).to_hsv();
        assert!((hsv.h - 240.0).abs() < 1e-9);
        assert!((hsv.s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_lerp_hue_long_way() {
        // From 10 to 11 the long way passes through 190 at the midpoint
        let mid = lerp_hue(10.0, 11.0, 0.5, HueSpin::Long);
        assert!((mid - 190.5).abs() < 1e-9);

        let short = lerp_hue(350.0, 10.0, 0.5, HueSpin::Short);
        assert!(short.abs() < 1e-9 || (short - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_gradient_clamps_outside_stops() {
        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        let gradient = Gradient::with_stops(vec![
            ColorStop::new(red, 0.25),
            ColorStop::new(blue, 0.75),
        ]);

        assert_eq!(gradient.color_at(0.0), red);
        assert_eq!(gradient.color_at(1.0), blue);
        assert_eq!(gradient.color_at(0.5), Rgb::new(128, 0, 128));
    }

    #[test]
    fn test_gradient_render_paints_each_char() {
        let gradient = Gradient::new([Rgb::BLACK, Rgb::WHITE]);
        let out = gradient.render("ab");
        let expected = paint(ColorSpec::Rgb(Rgb::BLACK), "a", Emphasis::PLAIN)
            + &paint(ColorSpec::Rgb(Rgb::WHITE), "b", Emphasis::PLAIN);
        assert_eq!(out, expected);
        assert_eq!(gradient.render(""), "");
    }

    #[test]
    fn test_paint_empty_is_empty() {
        assert_eq!(paint(ColorSpec::NEUTRAL, "", Emphasis::BOLD), "");
        assert!(paint(ColorSpec::NEUTRAL, "x", Emphasis::BOLD).contains('x'));
    }

    #[test]
    fn test_scale_floors() {
        assert_eq!(Rgb::new(255, 100, 1).scale(0.5), Rgb::new(127, 50, 0));
    }
}
