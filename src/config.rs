//! Configuration file support
//!
//! `~/.config/chalkline/config.toml` (or the platform equivalent) can set
//! default speed and colors, per-effect overrides and the glitch blackout
//! rule:
//!
//! ```toml
//! speed = 1.5
//!
//! [effects.pulse]
//! primary = "#00ff88"
//!
//! [glitch]
//! periods = [2, 3, 11, 29, 37]
//! threshold = 52
//! ```

use crate::effects::{BlackoutRule, EffectKind, EffectOptions};
use crate::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings that apply to one effect, or to all effects at the top level
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EffectOverrides {
    pub speed: Option<f64>,
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub visible_fraction: Option<f64>,
}

impl EffectOverrides {
    /// Layer `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: &EffectOverrides) -> Self {
        Self {
            speed: other.speed.or(self.speed),
            primary: other.primary.clone().or(self.primary),
            secondary: other.secondary.clone().or(self.secondary),
            visible_fraction: other.visible_fraction.or(self.visible_fraction),
        }
    }
}

/// Configuration for Chalkline
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChalklineConfig {
    /// Defaults shared by every effect
    #[serde(flatten)]
    pub defaults: EffectOverrides,

    /// Per-effect settings keyed by effect name, taking precedence over
    /// the defaults
    pub effects: HashMap<String, EffectOverrides>,

    /// Blackout rule used by the glitch effect
    pub glitch: BlackoutRule,
}

impl ChalklineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/chalkline/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chalkline").join("config.toml"))
    }

    /// Parse a config document, rejecting unknown effect names.
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(text)?;
        config.effects = config
            .effects
            .into_iter()
            .map(|(name, overrides)| Ok((name.parse::<EffectKind>()?.name().to_string(), overrides)))
            .collect::<Result<_>>()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        debug!("Loaded config from {:?}", path);
        Self::from_toml(&text)
    }

    /// Load the default config file; a missing file yields the defaults.
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.defaults.speed = Some(speed);
        self
    }

    pub fn with_primary(mut self, color: impl Into<String>) -> Self {
        self.defaults.primary = Some(color.into());
        self
    }

    pub fn with_secondary(mut self, color: impl Into<String>) -> Self {
        self.defaults.secondary = Some(color.into());
        self
    }

    pub fn with_visible_fraction(mut self, fraction: f64) -> Self {
        self.defaults.visible_fraction = Some(fraction);
        self
    }

    /// Merge `overrides` into the settings for `effect`, on top of whatever
    /// the file already said.
    pub fn with_effect_overrides(mut self, effect: EffectKind, overrides: EffectOverrides) -> Self {
        let merged = self
            .effects
            .remove(effect.name())
            .unwrap_or_default()
            .merge(&overrides);
        self.effects.insert(effect.name().to_string(), merged);
        self
    }

    fn resolved(&self, effect: EffectKind) -> EffectOverrides {
        match self.effects.get(effect.name()) {
            Some(specific) => self.defaults.clone().merge(specific),
            None => self.defaults.clone(),
        }
    }

    pub fn speed_for(&self, effect: EffectKind) -> Option<f64> {
        self.resolved(effect).speed
    }

    pub fn options_for(&self, effect: EffectKind) -> EffectOptions {
        let resolved = self.resolved(effect);
        EffectOptions {
            primary: resolved.primary,
            secondary: resolved.secondary,
            visible_fraction: resolved.visible_fraction,
            blackout: self.glitch.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChalklineError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_config() {
        let config = ChalklineConfig::from_toml(
            r##"
speed = 1.5
primary = "#111111"

[effects.pulse]
primary = "#00ff88"
secondary = "white"

[effects.radar]
visible_fraction = 0.4
speed = 3.0

[glitch]
periods = [5, 7]
threshold = 9
"##,
        )
        .unwrap();

        assert_eq!(config.speed_for(EffectKind::Pulse), Some(1.5));
        assert_eq!(config.speed_for(EffectKind::Radar), Some(3.0));

        let pulse = config.options_for(EffectKind::Pulse);
        assert_eq!(pulse.primary.as_deref(), Some("#00ff88"));
        assert_eq!(pulse.secondary.as_deref(), Some("white"));

        let neon = config.options_for(EffectKind::Neon);
        assert_eq!(neon.primary.as_deref(), Some("#111111"));
        assert_eq!(neon.secondary, None);

        assert_eq!(config.options_for(EffectKind::Radar).visible_fraction, Some(0.4));
        assert_eq!(
            config.options_for(EffectKind::Glitch).blackout,
            BlackoutRule {
                periods: vec![5, 7],
                threshold: 9
            }
        );
    }

    #[test]
    fn test_empty_config_uses_effect_defaults() {
        let config = ChalklineConfig::from_toml("").unwrap();
        assert_eq!(config, ChalklineConfig::default());
        assert_eq!(config.options_for(EffectKind::Glitch), EffectOptions::default());
        assert_eq!(config.speed_for(EffectKind::Rainbow), None);
    }

    #[test]
    fn test_partial_glitch_table_keeps_defaults() {
        let config = ChalklineConfig::from_toml("[glitch]\nthreshold = 60\n").unwrap();
        assert_eq!(config.glitch.periods, vec![2, 3, 11, 29, 37]);
        assert_eq!(config.glitch.threshold, 60);
    }

    #[test]
    fn test_unknown_effect_is_rejected() {
        let err = ChalklineConfig::from_toml("[effects.sparkle]\nspeed = 2.0\n").unwrap_err();
        assert!(matches!(err, ChalklineError::InvalidArgument(_)));

        let err = ChalklineConfig::from_toml("speed = \"fast\"\n").unwrap_err();
        assert!(matches!(err, ChalklineError::Config(_)));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let config = ChalklineConfig::from_toml("[effects.neon]\nspeed = 2.0\nprimary = \"red\"\n")
            .unwrap()
            .with_effect_overrides(
                EffectKind::Neon,
                EffectOverrides {
                    speed: Some(4.0),
                    ..Default::default()
                },
            );
        assert_eq!(config.speed_for(EffectKind::Neon), Some(4.0));
        assert_eq!(config.options_for(EffectKind::Neon).primary.as_deref(), Some("red"));
    }

    #[test]
    fn test_builders_set_defaults() {
        let config = ChalklineConfig::new()
            .with_speed(2.0)
            .with_primary("cyan")
            .with_secondary("#000")
            .with_visible_fraction(0.3);
        let options = config.options_for(EffectKind::Karaoke);
        assert_eq!(config.speed_for(EffectKind::Karaoke), Some(2.0));
        assert_eq!(options.primary.as_deref(), Some("cyan"));
        assert_eq!(options.secondary.as_deref(), Some("#000"));
        assert_eq!(options.visible_fraction, Some(0.3));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "speed = 0.5\n").unwrap();

        let config = ChalklineConfig::load(&path).unwrap();
        assert_eq!(config.speed_for(EffectKind::Neon), Some(0.5));

        let missing = ChalklineConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ChalklineError::Io(_)));
    }
}
