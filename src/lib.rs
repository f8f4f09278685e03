//! Chalkline - colorful in-place text animations for the terminal
//!
//! Hand a block of text and an effect to the controller and it repaints the
//! block in place, frame after frame:
//! - Six effects: rainbow, pulse, glitch, radar, neon and karaoke
//! - One live animation at a time; starting another stops the previous
//! - An output guard that stops the animation before anything else prints

pub mod animation;
pub mod color;
pub mod config;
pub mod effects;
pub mod output;

pub use animation::{split_lines, AnimationController, AnimationHandle};
pub use color::{ColorParseError, ColorSpec, Emphasis, Gradient, Hsv, Rgb};
pub use config::ChalklineConfig;
pub use effects::{BlackoutRule, EffectKind, EffectOptions};
pub use output::{CaptureBuffer, OutputGuard};

/// Result type for Chalkline operations
pub type Result<T> = std::result::Result<T, ChalklineError>;

/// Errors that can occur in Chalkline
#[derive(Debug, thiserror::Error)]
pub enum ChalklineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    ColorParse(#[from] ColorParseError),

    #[error("Animations must be started from within a tokio runtime")]
    NoRuntime,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Output sink lock poisoned")]
    Poisoned,
}

/// Start a rainbow animation on the process-wide controller.
pub fn rainbow(text: &str, speed: Option<f64>) -> Result<AnimationHandle> {
    AnimationController::global().start_rainbow(text, speed)
}

/// Start a pulse animation on the process-wide controller.
pub fn pulse(
    text: &str,
    speed: Option<f64>,
    primary: Option<&str>,
    secondary: Option<&str>,
) -> Result<AnimationHandle> {
    AnimationController::global().start_pulse(text, speed, primary, secondary)
}

/// Start a glitch animation on the process-wide controller.
pub fn glitch(
    text: &str,
    speed: Option<f64>,
    primary: Option<&str>,
    secondary: Option<&str>,
) -> Result<AnimationHandle> {
    AnimationController::global().start_glitch(text, speed, primary, secondary)
}

/// Start a radar animation on the process-wide controller.
pub fn radar(
    text: &str,
    speed: Option<f64>,
    primary: Option<&str>,
    visible_fraction: Option<f64>,
) -> Result<AnimationHandle> {
    AnimationController::global().start_radar(text, speed, primary, visible_fraction)
}

/// Start a neon animation on the process-wide controller.
pub fn neon(
    text: &str,
    speed: Option<f64>,
    primary: Option<&str>,
    secondary: Option<&str>,
) -> Result<AnimationHandle> {
    AnimationController::global().start_neon(text, speed, primary, secondary)
}

/// Start a karaoke animation on the process-wide controller.
pub fn karaoke(
    text: &str,
    speed: Option<f64>,
    primary: Option<&str>,
    secondary: Option<&str>,
) -> Result<AnimationHandle> {
    AnimationController::global().start_karaoke(text, speed, primary, secondary)
}

/// Stop whatever the process-wide controller is running, if anything.
pub fn stop_last_animation() {
    AnimationController::global().stop_current();
}
