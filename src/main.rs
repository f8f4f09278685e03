//! Chalkline CLI
//!
//! Animates text in the terminal until interrupted.

use anyhow::Context;
use chalkline::config::EffectOverrides;
use chalkline::{AnimationController, ChalklineConfig, EffectKind, OutputGuard};
use clap::Parser;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Chalkline - colorful text animations in the terminal
#[derive(Parser, Debug)]
#[command(name = "chalkline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Effect to play: rainbow, pulse, glitch, radar, neon or karaoke
    effect: EffectKind,

    /// Speed multiplier (greater than 0)
    #[arg(short, long)]
    speed: Option<f64>,

    /// Primary color, hex (#ff1010) or name (red, cyanBright, ...)
    #[arg(long)]
    primary: Option<String>,

    /// Secondary color, hex or name
    #[arg(long)]
    secondary: Option<String>,

    /// Fraction of the line lit behind the radar beam
    #[arg(long)]
    visible: Option<f64>,

    /// Stop after this many milliseconds instead of waiting for Ctrl-C
    #[arg(short, long)]
    duration: Option<u64>,

    /// Path to a config file (defaults to <config dir>/chalkline/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Text to animate; read from stdin when omitted
    #[arg(trailing_var_arg = true)]
    text: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let controller = AnimationController::global().clone();
    let guard = OutputGuard::new(controller.clone());
    init_logging(cli.verbose, guard.clone());

    let config = load_config(&cli)?;
    let text = resolve_text(&cli.text)?;

    let options = config.options_for(cli.effect);
    let speed = config.speed_for(cli.effect);
    debug!(effect = %cli.effect, ?speed, "Resolved options: {:?}", options);

    let animation = controller
        .start(&text, cli.effect, speed, options)
        .with_context(|| format!("Failed to start {} animation", cli.effect))?;

    match cli.duration {
        Some(ms) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(ms)) => {}
                _ = tokio::signal::ctrl_c() => {}
            }
        }
        None => tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl-C")?,
    }

    animation.stop();
    Ok(())
}

fn init_logging(verbose: u8, guard: OutputGuard) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(guard)
        .init();
}

/// Config file first, then command-line flags on top for the chosen effect
fn load_config(cli: &Cli) -> anyhow::Result<ChalklineConfig> {
    let config = match &cli.config {
        Some(path) => ChalklineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ChalklineConfig::load_default().context("Failed to load default config")?,
    };

    Ok(config.with_effect_overrides(
        cli.effect,
        EffectOverrides {
            speed: cli.speed,
            primary: cli.primary.clone(),
            secondary: cli.secondary.clone(),
            visible_fraction: cli.visible,
        },
    ))
}

fn resolve_text(args: &[String]) -> anyhow::Result<String> {
    if !args.is_empty() {
        return Ok(args.join(" "));
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        anyhow::bail!("No text given: pass it as arguments or pipe it on stdin");
    }
    let mut text = String::new();
    stdin
        .lock()
        .read_to_string(&mut text)
        .context("Failed to read text from stdin")?;
    Ok(trim_trailing_newline(&text).to_string())
}

fn trim_trailing_newline(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_effect_and_text() {
        let cli = Cli::try_parse_from([
            "chalkline",
            "--speed",
            "2",
            "pulse",
            "hello",
            "world",
        ])
        .unwrap();
        assert_eq!(cli.effect, EffectKind::Pulse);
        assert_eq!(cli.speed, Some(2.0));
        assert_eq!(resolve_text(&cli.text).unwrap(), "hello world");
    }

    #[test]
    fn test_cli_rejects_unknown_effect() {
        assert!(Cli::try_parse_from(["chalkline", "sparkle", "hi"]).is_err());
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::try_parse_from([
            "chalkline",
            "--primary",
            "#00ff00",
            "--config",
            "/nonexistent/chalkline.toml",
            "neon",
            "x",
        ])
        .unwrap();
        assert!(load_config(&cli).is_err());

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[effects.neon]\nprimary = \"red\"\nspeed = 3.0\n").unwrap();
        let cli = Cli::try_parse_from([
            "chalkline",
            "--primary",
            "#00ff00",
            "--config",
            path.to_str().unwrap(),
            "neon",
            "x",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        let options = config.options_for(EffectKind::Neon);
        assert_eq!(options.primary.as_deref(), Some("#00ff00"));
        assert_eq!(config.speed_for(EffectKind::Neon), Some(3.0));
    }

    #[test]
    fn test_trim_trailing_newline() {
        assert_eq!(trim_trailing_newline("a\nb\n"), "a\nb");
        assert_eq!(trim_trailing_newline("a\r\n"), "a");
        assert_eq!(trim_trailing_newline("a"), "a");
    }
}
