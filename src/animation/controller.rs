//! The animation controller: owner of the single live animation.

use super::{scheduler, AnimationHandle};
use crate::effects::{EffectKind, EffectOptions};
use crate::output::{shared_writer, SharedWriter};
use crate::{ChalklineError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::debug;

/// Shared state behind every clone of a controller
pub(super) struct Registry {
    current: Mutex<Option<AnimationHandle>>,
    sink: SharedWriter,
    next_id: AtomicU64,
    seed: Option<u64>,
}

impl Registry {
    fn lock_current(&self) -> MutexGuard<'_, Option<AnimationHandle>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install `animation` as the live one, stopping whatever was live before.
    pub(super) fn make_current(&self, animation: &AnimationHandle) {
        let mut current = self.lock_current();
        if let Some(previous) = current.as_ref() {
            if previous.id() != animation.id() {
                previous.stop();
            }
        }
        *current = Some(animation.clone());
    }
}

/// Owns "the current animation" and starts new ones.
///
/// Cloning a controller yields another handle to the same registry. Use
/// [`AnimationController::global`] for the process-wide instance, or build
/// a private one (tests, embedding) with [`AnimationController::new`].
#[derive(Clone)]
pub struct AnimationController {
    registry: Arc<Registry>,
}

impl AnimationController {
    /// Controller writing frames to `sink`
    pub fn new(sink: SharedWriter) -> Self {
        Self::build(sink, None)
    }

    /// Controller whose glitch noise is reproducible
    pub fn seeded(sink: SharedWriter, seed: u64) -> Self {
        Self::build(sink, Some(seed))
    }

    fn build(sink: SharedWriter, seed: Option<u64>) -> Self {
        Self {
            registry: Arc::new(Registry {
                current: Mutex::new(None),
                sink,
                next_id: AtomicU64::new(0),
                seed,
            }),
        }
    }

    /// Process-wide controller writing to stdout
    pub fn global() -> &'static AnimationController {
        static GLOBAL: OnceLock<AnimationController> = OnceLock::new();
        GLOBAL.get_or_init(|| Self::new(shared_writer(io::stdout())))
    }

    pub fn sink(&self) -> SharedWriter {
        self.registry.sink.clone()
    }

    /// The most recently started animation, live or not
    pub fn current(&self) -> Option<AnimationHandle> {
        self.registry.lock_current().clone()
    }

    /// Stop whatever is currently running, if anything.
    pub fn stop_current(&self) {
        if let Some(current) = self.registry.lock_current().as_ref() {
            current.stop();
        }
    }

    /// Stop and forget the current animation.
    pub fn reset(&self) {
        if let Some(previous) = self.registry.lock_current().take() {
            previous.stop();
        }
    }

    /// Start animating `text` with `effect`.
    ///
    /// `speed` defaults to 1 and must be finite and positive. Colors in
    /// `options` are parsed up front. On any error nothing changes and the
    /// previous animation keeps running. Must be called from within a tokio
    /// runtime.
    pub fn start(
        &self,
        text: &str,
        effect: EffectKind,
        speed: Option<f64>,
        options: EffectOptions,
    ) -> Result<AnimationHandle> {
        let speed = validate_speed(speed)?;
        options.validate()?;
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| ChalklineError::NoRuntime)?;

        self.stop_current();

        let id = self.registry.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let rng = match self.registry.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id)),
            None => StdRng::from_entropy(),
        };
        let animation = AnimationHandle::new(
            id,
            text,
            effect,
            speed,
            options,
            rng,
            self.registry.sink.clone(),
            Arc::downgrade(&self.registry),
        );

        // Logged before the new animation is registered: a guarded log
        // writer stops whatever is current.
        debug!(
            id,
            effect = %effect,
            speed,
            lines = animation.line_count(),
            "Starting animation"
        );

        self.registry.make_current(&animation);
        let generation = animation.arm();
        scheduler::spawn_chain(&runtime, animation.clone(), generation, animation.tick_interval());
        Ok(animation)
    }

    pub fn start_rainbow(&self, text: &str, speed: Option<f64>) -> Result<AnimationHandle> {
        self.start(text, EffectKind::Rainbow, speed, EffectOptions::new())
    }

    pub fn start_pulse(
        &self,
        text: &str,
        speed: Option<f64>,
        primary: Option<&str>,
        secondary: Option<&str>,
    ) -> Result<AnimationHandle> {
        self.start(text, EffectKind::Pulse, speed, colors(primary, secondary))
    }

    pub fn start_glitch(
        &self,
        text: &str,
        speed: Option<f64>,
        primary: Option<&str>,
        secondary: Option<&str>,
    ) -> Result<AnimationHandle> {
        self.start(text, EffectKind::Glitch, speed, colors(primary, secondary))
    }

    pub fn start_radar(
        &self,
        text: &str,
        speed: Option<f64>,
        primary: Option<&str>,
        visible_fraction: Option<f64>,
    ) -> Result<AnimationHandle> {
        let mut options = colors(primary, None);
        options.visible_fraction = visible_fraction;
        self.start(text, EffectKind::Radar, speed, options)
    }

    pub fn start_neon(
        &self,
        text: &str,
        speed: Option<f64>,
        primary: Option<&str>,
        secondary: Option<&str>,
    ) -> Result<AnimationHandle> {
        self.start(text, EffectKind::Neon, speed, colors(primary, secondary))
    }

    pub fn start_karaoke(
        &self,
        text: &str,
        speed: Option<f64>,
        primary: Option<&str>,
        secondary: Option<&str>,
    ) -> Result<AnimationHandle> {
        self.start(text, EffectKind::Karaoke, speed, colors(primary, secondary))
    }
}

fn colors(primary: Option<&str>, secondary: Option<&str>) -> EffectOptions {
    EffectOptions {
        primary: primary.map(str::to_string),
        secondary: secondary.map(str::to_string),
        ..EffectOptions::default()
    }
}

fn validate_speed(speed: Option<f64>) -> Result<f64> {
    match speed {
        None => Ok(1.0),
        Some(speed) if speed.is_finite() && speed > 0.0 => Ok(speed),
        Some(speed) => Err(ChalklineError::InvalidArgument(format!(
            "expected `speed` to be a number greater than 0, got {speed}"
        ))),
    }
}

impl std::fmt::Debug for AnimationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationController")
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}
