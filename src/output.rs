//! Output plumbing
//!
//! Animations write to a [`SharedWriter`]. Everything else that prints to
//! the terminal goes through [`OutputGuard`], which stops the live animation
//! first so the next repaint cannot overwrite the message.

use crate::animation::AnimationController;
use crate::{ChalklineError, Result};
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer shared between the render loop and the output guard
pub type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

pub fn shared_writer<W: Write + Send + 'static>(writer: W) -> SharedWriter {
    Arc::new(Mutex::new(Box::new(writer)))
}

/// In-memory sink; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A [`SharedWriter`] appending into this buffer
    pub fn writer(&self) -> SharedWriter {
        shared_writer(self.clone())
    }

    pub fn contents(&self) -> String {
        match self.bytes.lock() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut bytes) = self.bytes.lock() {
            bytes.clear();
        }
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .bytes
            .lock()
            .map_err(|_| io::Error::other("capture buffer lock poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Facade for ordinary output that must not be overwritten by a repaint
#[derive(Clone)]
pub struct OutputGuard {
    controller: AnimationController,
    stdout: SharedWriter,
    stderr: SharedWriter,
}

impl OutputGuard {
    /// `log`/`info` share the controller's sink, `warn`/`error` go to stderr.
    pub fn new(controller: AnimationController) -> Self {
        let stdout = controller.sink();
        Self {
            controller,
            stdout,
            stderr: shared_writer(io::stderr()),
        }
    }

    pub fn with_stderr(mut self, stderr: SharedWriter) -> Self {
        self.stderr = stderr;
        self
    }

    pub fn log(&self, message: impl fmt::Display) -> Result<()> {
        self.emit(&self.stdout, message)
    }

    pub fn info(&self, message: impl fmt::Display) -> Result<()> {
        self.emit(&self.stdout, message)
    }

    pub fn warn(&self, message: impl fmt::Display) -> Result<()> {
        self.emit(&self.stderr, message)
    }

    pub fn error(&self, message: impl fmt::Display) -> Result<()> {
        self.emit(&self.stderr, message)
    }

    fn emit(&self, sink: &SharedWriter, message: impl fmt::Display) -> Result<()> {
        self.controller.stop_current();
        // Taking the frame sink waits out a frame that is already being written
        let mut frames = self.stdout.lock().map_err(|_| ChalklineError::Poisoned)?;
        if Arc::ptr_eq(sink, &self.stdout) {
            return write_line(&mut **frames, message);
        }
        let mut sink = sink.lock().map_err(|_| ChalklineError::Poisoned)?;
        write_line(&mut **sink, message)
    }
}

fn write_line(sink: &mut dyn Write, message: impl fmt::Display) -> Result<()> {
    writeln!(sink, "{message}")?;
    sink.flush()?;
    Ok(())
}

impl fmt::Debug for OutputGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputGuard").finish_non_exhaustive()
    }
}

/// Writer handed to the tracing subscriber for one event
pub struct GuardedWriter {
    sink: SharedWriter,
}

impl Write for GuardedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink
            .lock()
            .map_err(|_| io::Error::other("output sink lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink
            .lock()
            .map_err(|_| io::Error::other("output sink lock poisoned"))?
            .flush()
    }
}

impl<'a> MakeWriter<'a> for OutputGuard {
    type Writer = GuardedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.controller.stop_current();
        drop(self.stdout.lock());
        GuardedWriter {
            sink: self.stderr.clone(),
        }
    }
}
