//! Two-state flicker between a dim and a bold color.

use super::EffectOptions;
use crate::color::{paint, ColorParseError, Emphasis};

pub(super) const DEFAULT_PRIMARY: &str = "#585055";
pub(super) const DEFAULT_SECONDARY: &str = "#D546F2";

pub(super) fn render(
    line: &str,
    frame: u64,
    options: &EffectOptions,
) -> Result<String, ColorParseError> {
    let dim = options.primary_or(DEFAULT_PRIMARY)?;
    let lit = options.secondary_or(DEFAULT_SECONDARY)?;

    Ok(if frame % 2 == 0 {
        paint(dim, line, Emphasis::DIM)
    } else {
        paint(lit, line, Emphasis::BOLD)
    })
}
