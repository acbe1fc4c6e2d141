//! Segment dispatch with an operator checkpoint between segments.
//!
//! Each segment goes to a [`SegmentSink`] exactly once, in chunker order.
//! Between deliveries (never after the last one) the loop waits on an
//! [`Acknowledge`] implementation, which for interactive runs is a prompt
//! on stderr.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::chunk::Segment;

/// Receives finished segments. `index` is zero-based.
pub trait SegmentSink {
    fn deliver(&mut self, index: usize, total: usize, text: &str) -> Result<()>;
}

/// Blocks until the operator is ready for the next segment.
pub trait Acknowledge {
    fn wait(&mut self, delivered: usize, total: usize) -> Result<()>;
}

pub fn dispatch(
    segments: &[Segment],
    sink: &mut dyn SegmentSink,
    ack: &mut dyn Acknowledge,
) -> Result<()> {
    let total = segments.len();
    for (index, segment) in segments.iter().enumerate() {
        sink.deliver(index, total, &segment.text)?;
        tracing::debug!(part = index + 1, total, chars = segment.len, "delivered segment");
        if index + 1 < total {
            ack.wait(index + 1, total)?;
        }
    }
    Ok(())
}

/// Prints each segment to stdout, separated by a rule when there are several.
pub struct StdoutSink;

impl SegmentSink for StdoutSink {
    fn deliver(&mut self, index: usize, total: usize, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        if total > 1 {
            writeln!(out, "----- part {} of {} -----", index + 1, total)?;
        }
        out.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Writes `part-01.txt`, `part-02.txt`, ... into a directory.
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl SegmentSink for DirectorySink {
    fn deliver(&mut self, index: usize, _total: usize, text: &str) -> Result<()> {
        let path = self.dir.join(format!("part-{:02}.txt", index + 1));
        std::fs::write(&path, text)
            .with_context(|| format!("Failed to write segment to {}", path.display()))?;
        self.written.push(path);
        Ok(())
    }
}

/// Prompts on stderr and waits for a line on stdin. End of input counts
/// as acknowledgment so piped runs do not hang.
pub struct StdinAck;

impl Acknowledge for StdinAck {
    fn wait(&mut self, delivered: usize, total: usize) -> Result<()> {
        eprint!(
            "Delivered part {} of {}. Press enter or return to continue.",
            delivered, total
        );
        std::io::stderr().flush()?;
        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            eprintln!();
            tracing::debug!("stdin closed; continuing without acknowledgment");
        }
        Ok(())
    }
}

/// Never waits.
pub struct NoPause;

impl Acknowledge for NoPause {
    fn wait(&mut self, _delivered: usize, _total: usize) -> Result<()> {
        Ok(())
    }
}
