//! Progressive highlight sweeping left to right.

use super::EffectOptions;
use crate::color::{paint, ColorParseError, ColorSpec, Emphasis};

pub(super) const DEFAULT_PRIMARY: &str = "#ffffff";
pub(super) const DEFAULT_SECONDARY: &str = "#FFBB00";

/// Frames spent before the highlight enters the line
const LEAD_IN: u64 = 10;

pub(super) fn render(
    line: &str,
    frame: u64,
    options: &EffectOptions,
) -> Result<String, ColorParseError> {
    let waiting = options.primary_or(DEFAULT_PRIMARY)?;
    let highlight = options.secondary_or(DEFAULT_SECONDARY)?;

    let chars: Vec<char> = line.chars().collect();
    let cycle = chars.len() as u64 + 2 * LEAD_IN;
    let position = frame % cycle;
    if position < LEAD_IN {
        return Ok(paint(waiting, line, Emphasis::PLAIN));
    }

    let lit = ((position - LEAD_IN) as usize).min(chars.len());
    let head: String = chars[..lit].iter().collect();
    let tail: String = chars[lit..].iter().collect();

    Ok(paint(highlight, &head, Emphasis::BOLD) + &paint(ColorSpec::NEUTRAL, &tail, Emphasis::PLAIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LINE: &str = "sing along";

    #[test]
    fn test_lead_in_is_primary() {
        let options = EffectOptions::new();
        let waiting = paint(ColorSpec::parse(DEFAULT_PRIMARY).unwrap(), LINE, Emphasis::PLAIN);
        for frame in 0..10 {
            assert_eq!(render(LINE, frame, &options).unwrap(), waiting);
        }
        // Next cycle starts at len + 20
        assert_eq!(render(LINE, 30, &options).unwrap(), waiting);
    }

    #[test]
    fn test_highlight_grows() {
        let options = EffectOptions::new();
        let highlight = ColorSpec::parse(DEFAULT_SECONDARY).unwrap();

        let out = render(LINE, 13, &options).unwrap();
        let expected = paint(highlight, "sin", Emphasis::BOLD)
            + &paint(ColorSpec::NEUTRAL, "g along", Emphasis::PLAIN);
        assert_eq!(out, expected);

        let mut previous = 0;
        for frame in 10..30 {
            let out = render(LINE, frame, &options).unwrap();
            let lit = (0..=LINE.len())
                .find(|&n| {
                    out.starts_with(&paint(highlight, &LINE[..n], Emphasis::BOLD))
                        && out.ends_with(&paint(ColorSpec::NEUTRAL, &LINE[n..], Emphasis::PLAIN))
                })
                .unwrap();
            assert!(lit >= previous, "frame {frame}");
            previous = lit;
        }
        assert_eq!(previous, LINE.len());
    }

    #[test]
    fn test_multibyte_text() {
        let options = EffectOptions::new();
        let out = render("héllo", 12, &options).unwrap();
        assert!(out.contains("hé"));
        assert!(out.contains("llo"));
    }
}
