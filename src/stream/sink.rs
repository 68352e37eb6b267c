//! Output sinks for the generated byte stream

use crate::protocol::IFG_FILLER;
use crate::{FronthaulError, Result};
use std::io::Write;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";
const BYTES_PER_HEX_LINE: usize = 4;
const IDLE_CHUNK: usize = 4096;

/// Destination for emitted frames and idle filler.
///
/// Frames arrive in grid order. The idle gap block, when present, is written once after
/// the last frame.
pub trait ByteSink {
    /// Append one complete Ethernet frame, padding included.
    fn write_frame(&mut self, frame: &[u8]) -> Result<()>;

    /// Append `count` idle filler bytes.
    fn write_idle_gap(&mut self, count: u64) -> Result<()>;

    /// Called before the first frame of each radio frame.
    fn begin_radio_frame(&mut self, _frame: u32) -> Result<()> {
        Ok(())
    }

    /// Flush any buffered output. Called once at the end of a run.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ByteSink for Vec<u8> {
    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.extend_from_slice(frame);
        Ok(())
    }

    fn write_idle_gap(&mut self, count: u64) -> Result<()> {
        let count = usize::try_from(count).map_err(|_| {
            FronthaulError::Output { source: std::io::Error::other("idle gap too large for memory") }
        })?;
        self.resize(self.len() + count, IFG_FILLER);
        Ok(())
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        (**self).write_frame(frame)
    }

    fn write_idle_gap(&mut self, count: u64) -> Result<()> {
        (**self).write_idle_gap(count)
    }

    fn begin_radio_frame(&mut self, frame: u32) -> Result<()> {
        (**self).begin_radio_frame(frame)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Binary sink: bytes are written unchanged.
#[derive(Debug)]
pub struct RawWriter<W: Write> {
    inner: W,
}

impl<W: Write> RawWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ByteSink for RawWriter<W> {
    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.inner.write_all(frame)?;
        Ok(())
    }

    fn write_idle_gap(&mut self, count: u64) -> Result<()> {
        let chunk = [IFG_FILLER; IDLE_CHUNK];
        let mut remaining = count;
        while remaining > 0 {
            let take = remaining.min(IDLE_CHUNK as u64) as usize;
            self.inner.write_all(&chunk[..take])?;
            remaining -= take as u64;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Text sink: lowercase two-digit hex, bytes separated by a space, four bytes per line.
///
/// The line position carries across frame boundaries, so the text is a hex dump of the
/// concatenated stream. With [`HexWriter::annotated`] a `Frame : N` line precedes every
/// radio frame and a marker line precedes the idle block.
#[derive(Debug)]
pub struct HexWriter<W: Write> {
    inner: W,
    column: usize,
    annotate: bool,
    scratch: Vec<u8>,
}

impl<W: Write> HexWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, column: 0, annotate: false, scratch: Vec::new() }
    }

    /// A writer that also emits radio frame and idle block marker lines.
    pub fn annotated(inner: W) -> Self {
        Self { annotate: true, ..Self::new(inner) }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn push_byte(&mut self, byte: u8) {
        if self.column > 0 {
            self.scratch.push(b' ');
        }
        self.scratch.push(HEX_DIGITS[(byte >> 4) as usize]);
        self.scratch.push(HEX_DIGITS[(byte & 0x0F) as usize]);
        self.column += 1;
        if self.column == BYTES_PER_HEX_LINE {
            self.scratch.push(b'\n');
            self.column = 0;
        }
    }

    fn end_line(&mut self) {
        if self.column > 0 {
            self.scratch.push(b'\n');
            self.column = 0;
        }
    }

    fn flush_scratch(&mut self) -> Result<()> {
        self.inner.write_all(&self.scratch)?;
        self.scratch.clear();
        Ok(())
    }
}

impl<W: Write> ByteSink for HexWriter<W> {
    fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        for &byte in frame {
            self.push_byte(byte);
        }
        self.flush_scratch()
    }

    fn write_idle_gap(&mut self, count: u64) -> Result<()> {
        if self.annotate {
            self.end_line();
            self.scratch.extend_from_slice(format!("Idle gap : {count} bytes\n").as_bytes());
        }
        let mut remaining = count;
        while remaining > 0 {
            let take = remaining.min(IDLE_CHUNK as u64);
            for _ in 0..take {
                self.push_byte(IFG_FILLER);
            }
            self.flush_scratch()?;
            remaining -= take;
        }
        self.flush_scratch()
    }

    fn begin_radio_frame(&mut self, frame: u32) -> Result<()> {
        if self.annotate {
            self.end_line();
            self.scratch.extend_from_slice(format!("Frame : {frame}\n").as_bytes());
            self.flush_scratch()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.end_line();
        self.flush_scratch()?;
        self.inner.flush()?;
        Ok(())
    }
}
