//! Newline line framing.
//!
//! Wire format:
//! ```text
//! ┌──────────────────────────────┬──────┬──────┐
//! │ ASCII decimal angle (≤ 64 B) │ [\r] │  \n  │
//! └──────────────────────────────┴──────┴──────┘
//! ```
//!
//! The decoder accumulates bytes and yields complete lines. A single
//! `Transport::read` call may return part of a line or several lines
//! concatenated; [`LineReader`] keeps the leftover bytes for the next poll.

use heapless::{String, Vec};
use log::warn;

use super::transport::Transport;

/// Longest accepted command line, terminator excluded.
pub const MAX_LINE_LEN: usize = 64;

/// Room for the payload plus a trailing `\r`.
const BUF_LEN: usize = MAX_LINE_LEN + 1;

/// Size of the raw receive chunk pulled from the transport per poll.
const RX_CHUNK: usize = 32;

pub type Line = String<MAX_LINE_LEN>;

/// Decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    /// Collecting line bytes.
    Collecting,
    /// Line exceeded the limit; dropping bytes until the next `\n`.
    Discarding,
}

/// Streaming line decoder.
pub struct LineDecoder {
    state: DecoderState,
    buf: Vec<u8, BUF_LEN>,
    overflowed: u32,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    pub const fn new() -> Self {
        Self {
            state: DecoderState::Collecting,
            buf: Vec::new(),
            overflowed: 0,
        }
    }

    /// Feed one byte.
    ///
    /// Returns `Some(line)` when `byte` completes a line. The terminator
    /// and one trailing `\r` are not part of the line.
    pub fn push(&mut self, byte: u8) -> Option<Line> {
        match self.state {
            DecoderState::Discarding => {
                if byte == b'\n' {
                    self.state = DecoderState::Collecting;
                }
                None
            }
            DecoderState::Collecting => {
                if byte == b'\n' {
                    return self.finish();
                }
                if self.buf.push(byte).is_err() {
                    self.overflow();
                }
                None
            }
        }
    }

    /// Overlong lines dropped since construction.
    pub fn overflowed(&self) -> u32 {
        self.overflowed
    }

    /// Drop any partial line (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.state = DecoderState::Collecting;
    }

    fn finish(&mut self) -> Option<Line> {
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        if self.buf.len() > MAX_LINE_LEN {
            // Terminator already seen, so stay in Collecting.
            self.overflow();
            self.state = DecoderState::Collecting;
            return None;
        }

        let text = match core::str::from_utf8(&self.buf) {
            Ok(s) => s,
            Err(e) => {
                core::str::from_utf8(&self.buf[..e.valid_up_to()]).unwrap_or_default()
            }
        };
        let mut line = Line::new();
        // Cannot fail: `text` is at most MAX_LINE_LEN bytes.
        let _ = line.push_str(text);
        self.buf.clear();
        Some(line)
    }

    fn overflow(&mut self) {
        self.buf.clear();
        self.state = DecoderState::Discarding;
        self.overflowed = self.overflowed.saturating_add(1);
        warn!(
            "Serial line longer than {} bytes dropped ({} total)",
            MAX_LINE_LEN, self.overflowed
        );
    }
}

/// Non-blocking line reader over any [`Transport`].
pub struct LineReader<T: Transport> {
    transport: T,
    decoder: LineDecoder,
    rx: [u8; RX_CHUNK],
    rx_len: usize,
    rx_pos: usize,
}

impl<T: Transport> LineReader<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: LineDecoder::new(),
            rx: [0; RX_CHUNK],
            rx_len: 0,
            rx_pos: 0,
        }
    }

    /// Return the next complete line, if one is available.
    ///
    /// Bytes left over from the previous poll are decoded first; at most
    /// one transport read is issued per call, and none while the
    /// transport reports nothing available, so this never waits.
    pub fn poll_line(&mut self) -> Result<Option<Line>, T::Error> {
        if let Some(line) = self.drain() {
            return Ok(Some(line));
        }
        if !self.transport.available() {
            return Ok(None);
        }

        let n = self.transport.read(&mut self.rx)?;
        self.rx_len = n.min(RX_CHUNK);
        self.rx_pos = 0;
        Ok(self.drain())
    }

    pub fn overflowed(&self) -> u32 {
        self.decoder.overflowed()
    }

    fn drain(&mut self) -> Option<Line> {
        while self.rx_pos < self.rx_len {
            let byte = self.rx[self.rx_pos];
            self.rx_pos += 1;
            if let Some(line) = self.decoder.push(byte) {
                return Some(line);
            }
        }
        None
    }
}
