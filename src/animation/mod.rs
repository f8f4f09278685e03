//! Animation lifecycle
//!
//! An [`AnimationHandle`] owns the per-animation state (text, frame counter,
//! flags) and knows how to paint one frame. The [`AnimationController`]
//! decides which animation is live, and the scheduler drives the render
//! chain on the tokio timer.

mod controller;
mod scheduler;

pub use controller::AnimationController;

use crate::effects::{EffectKind, EffectOptions};
use crate::output::SharedWriter;
use crate::{ChalklineError, Result};
use controller::Registry;
use crossterm::cursor::{MoveToColumn, MoveToPreviousLine};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use rand::rngs::StdRng;
use regex::Regex;
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use std::time::Duration;

/// Shortest delay between two renders of one animation
pub const MIN_TICK: Duration = Duration::from_millis(1);

/// Split text on `\r\n`, `\r` or `\n`. Always yields at least one line.
pub fn split_lines(text: &str) -> Vec<String> {
    static LINE_BREAK: OnceLock<Regex> = OnceLock::new();
    if text.is_empty() {
        return vec![String::new()];
    }
    let pattern = LINE_BREAK.get_or_init(|| Regex::new(r"\r\n|\r|\n").unwrap());
    pattern.split(text).map(str::to_string).collect()
}

/// Mutable per-animation state, touched once per tick and by `replace`
#[derive(Debug)]
struct FrameState {
    lines: Vec<String>,
    frame: u64,
    initialized: bool,
    rng: StdRng,
}

struct AnimationInner {
    id: u64,
    effect: EffectKind,
    options: EffectOptions,
    speed: f64,
    state: Mutex<FrameState>,
    stopped: AtomicBool,
    /// Bumped every time a new render chain is armed; older chains retire
    generation: AtomicU64,
    sink: SharedWriter,
    registry: Weak<Registry>,
}

/// Caller-facing handle to one animation.
///
/// Handles are cheap to clone; every clone controls the same animation.
#[derive(Clone)]
pub struct AnimationHandle {
    inner: Arc<AnimationInner>,
}

impl AnimationHandle {
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: u64,
        text: &str,
        effect: EffectKind,
        speed: f64,
        options: EffectOptions,
        rng: StdRng,
        sink: SharedWriter,
        registry: Weak<Registry>,
    ) -> Self {
        Self {
            inner: Arc::new(AnimationInner {
                id,
                effect,
                options,
                speed,
                state: Mutex::new(FrameState {
                    lines: split_lines(text),
                    frame: 0,
                    initialized: false,
                    rng,
                }),
                stopped: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                sink,
                registry,
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn effect(&self) -> EffectKind {
        self.inner.effect
    }

    pub fn speed(&self) -> f64 {
        self.inner.speed
    }

    pub fn options(&self) -> &EffectOptions {
        &self.inner.options
    }

    /// Number of frames rendered so far
    pub fn frame(&self) -> u64 {
        self.lock_state().frame
    }

    pub fn lines(&self) -> Vec<String> {
        self.lock_state().lines.clone()
    }

    pub fn line_count(&self) -> usize {
        self.lock_state().lines.len()
    }

    pub fn is_initialized(&self) -> bool {
        self.lock_state().initialized
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    /// Delay between two ticks: the effect's base delay divided by speed,
    /// never shorter than [`MIN_TICK`]. Delays too long to represent
    /// saturate at `Duration::MAX`.
    pub fn tick_interval(&self) -> Duration {
        let millis = self.inner.effect.base_delay_ms() as f64 / self.inner.speed;
        Duration::try_from_secs_f64(millis / 1000.0)
            .unwrap_or(Duration::MAX)
            .max(MIN_TICK)
    }

    /// Stop rendering. The pending tick wakes once and exits quietly.
    pub fn stop(&self) -> &Self {
        self.inner.stopped.store(true, Ordering::SeqCst);
        self
    }

    /// Swap the text; frame, flags and colors are kept.
    pub fn replace(&self, text: &str) -> &Self {
        self.lock_state().lines = split_lines(text);
        self
    }

    /// Resume (or restart) this animation: it becomes the live one, renders
    /// right away and keeps ticking until stopped.
    pub fn start(&self) -> Result<&Self> {
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| ChalklineError::NoRuntime)?;

        if let Some(registry) = self.inner.registry.upgrade() {
            registry.make_current(self);
        }
        self.inner.stopped.store(false, Ordering::SeqCst);
        let generation = self.arm();
        scheduler::spawn_chain(&runtime, self.clone(), generation, Duration::ZERO);
        Ok(self)
    }

    /// Retire any running chain and return the generation for a new one.
    fn arm(&self) -> u64 {
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_live(&self, generation: u64) -> bool {
        !self.is_stopped() && self.inner.generation.load(Ordering::SeqCst) == generation
    }

    fn lock_state(&self) -> MutexGuard<'_, FrameState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Paint one frame to the sink.
    ///
    /// The sink stays locked for the whole frame, and a stop that landed
    /// before the lock was taken cancels the frame. Output guards set the
    /// stop flag before they touch the sink, so a frame never lands on top
    /// of their message.
    pub(crate) fn render(&self) -> Result<()> {
        let mut sink = self
            .inner
            .sink
            .lock()
            .map_err(|_| ChalklineError::Poisoned)?;
        if self.is_stopped() {
            return Ok(());
        }

        let mut out = Vec::new();
        {
            let mut state = self.lock_state();
            let line_count = state.lines.len();

            if !state.initialized {
                // Reserve the rows the block will occupy
                out.resize(line_count, b'\n');
                state.initialized = true;
            }

            state.frame = state.frame.wrapping_add(1);
            let frame = state.frame;

            let rows = u16::try_from(line_count).unwrap_or(u16::MAX);
            queue!(
                out,
                MoveToPreviousLine(rows),
                MoveToColumn(0),
                Clear(ClearType::CurrentLine)
            )?;

            let FrameState { lines, rng, .. } = &mut *state;
            let mut painted = Vec::with_capacity(lines.len());
            for line in lines.iter() {
                painted.push(self.inner.effect.render(line, frame, &self.inner.options, rng)?);
            }
            out.extend_from_slice(painted.join("\n").as_bytes());
            out.push(b'\n');
        }

        sink.write_all(&out)?;
        sink.flush()?;
        Ok(())
    }
}

impl fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("id", &self.inner.id)
            .field("effect", &self.inner.effect)
            .field("speed", &self.inner.speed)
            .field("stopped", &self.is_stopped())
            .finish_non_exhaustive()
    }
}
