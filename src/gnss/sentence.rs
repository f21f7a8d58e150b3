use core::str;

use heapless::Vec;

/// Protocol limit is 82 characters, leave headroom for non-conforming receivers
pub const MAX_NMEA_SENTENCE_SIZE: usize = 128;

pub type SentenceFramer = LineFramer<MAX_NMEA_SENTENCE_SIZE>;

/// One complete line, terminators stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<const N: usize>(Vec<u8, N>);

impl<const N: usize> Line<N> {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The line as text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        str::from_utf8(&self.0).ok()
    }
}

/// Splits a byte stream into lines on `\r` / `\n`
///
/// Bytes after the last terminator of a chunk are kept until the next
/// [`push`](Self::push). A pending line longer than `N` bytes is dropped and
/// everything up to the next terminator is skipped.
#[derive(Debug)]
pub struct LineFramer<const N: usize> {
    buffer: Vec<u8, N>,

    state: FramerState,

    overflows: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FramerState {
    /// Accumulating bytes of the current line
    Collecting,

    /// Line overflowed, dropping bytes until the next terminator
    Discarding,
}

impl<const N: usize> LineFramer<N> {
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            state: FramerState::Collecting,
            overflows: 0,
        }
    }

    /// Feed a chunk, yielding every line it completes
    ///
    /// The returned iterator is lazy. Dropping it early still consumes the
    /// rest of the chunk so the pending line stays consistent, but lines not
    /// pulled from it are lost.
    pub fn push<'a>(&'a mut self, chunk: &'a [u8]) -> Lines<'a, N> {
        Lines {
            framer: self,
            chunk,
        }
    }

    /// Drop the pending partial line
    pub fn reset(&mut self, reason: &str) {
        self.buffer.clear();
        self.state = FramerState::Collecting;

        crate::log_debug!("Resetting sentence buffer -- {}", reason);
    }

    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Number of lines dropped for exceeding `N` bytes
    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    fn feed(&mut self, byte: u8) -> Option<Line<N>> {
        match (self.state, byte) {
            (FramerState::Discarding, b'\r' | b'\n') => {
                self.state = FramerState::Collecting;
                None
            }

            (FramerState::Discarding, _) => None,

            (FramerState::Collecting, b'\r' | b'\n') => {
                if self.buffer.is_empty() {
                    None
                } else {
                    Some(Line(core::mem::take(&mut self.buffer)))
                }
            }

            (FramerState::Collecting, _) => {
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.state = FramerState::Discarding;
                    self.overflows = self.overflows.wrapping_add(1);

                    crate::log_warn!("Sentence buffer overflow, discarding line");
                }
                None
            }
        }
    }
}

impl<const N: usize> Default for LineFramer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lines completed by one chunk, see [`LineFramer::push`]
pub struct Lines<'a, const N: usize> {
    framer: &'a mut LineFramer<N>,
    chunk: &'a [u8],
}

impl<const N: usize> Iterator for Lines<'_, N> {
    type Item = Line<N>;

    fn next(&mut self) -> Option<Line<N>> {
        while let Some((&byte, rest)) = self.chunk.split_first() {
            self.chunk = rest;

            if let Some(line) = self.framer.feed(byte) {
                return Some(line);
            }
        }
        None
    }
}

impl<const N: usize> Drop for Lines<'_, N> {
    fn drop(&mut self) {
        self.by_ref().for_each(drop);
    }
}
