//! Streaming BOM removal.
//!
//! [`BomReader`] wraps any [`Read`] and hides a leading byte order mark from
//! its consumer. The first read buffers a few bytes to classify them; whatever
//! follows the BOM is handed out before reads are forwarded to the inner
//! reader.

use std::fmt;
use std::io::{self, ErrorKind, Read};
use std::mem;

use tracing::{debug, trace, warn};

use crate::classify::{NAIVE_MIN_LEN, Strategy, detect};
use crate::signature::BomKind;

/// Room for the largest lookahead any strategy asks for.
const LOOKAHEAD_CAP: usize = NAIVE_MIN_LEN;

enum State {
    /// Nothing read yet
    NotStarted,
    /// Collecting the lookahead; survives `WouldBlock` between calls
    Detecting { lookahead: [u8; LOOKAHEAD_CAP], filled: usize },
    /// Handing out lookahead bytes that follow the BOM
    Draining {
        residual: [u8; LOOKAHEAD_CAP],
        pos: usize,
        end: usize,
        fault: Option<io::Error>,
    },
    /// Residual is gone; the fault hit during detection is reported next
    Faulted(io::Error),
    /// Plain pass-through
    Delegating,
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::NotStarted => "NotStarted",
            State::Detecting { .. } => "Detecting",
            State::Draining { .. } => "Draining",
            State::Faulted(_) => "Faulted",
            State::Delegating => "Delegating",
        }
    }
}

/// A reader that strips a leading byte order mark.
///
/// A non-transient error raised by the inner reader while the BOM is being
/// detected is held back until the bytes read before it have been returned,
/// then reported exactly once. Later errors pass straight through.
pub struct BomReader<R> {
    inner: R,
    strategy: Strategy,
    kind: Option<BomKind>,
    state: State,
}

impl<R: Read> BomReader<R> {
    /// Wrap `inner` using the default strategy.
    pub fn new(inner: R) -> Self {
        Self::with_strategy(inner, Strategy::default())
    }

    pub fn with_strategy(inner: R, strategy: Strategy) -> Self {
        BomReader {
            inner,
            strategy,
            kind: None,
            state: State::NotStarted,
        }
    }

    /// The BOM found at the start of the stream, `None` until the first read
    /// has finished detection.
    pub fn kind(&self) -> Option<BomKind> {
        self.kind
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap the inner reader. Buffered residual bytes are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Fill the lookahead and move on to `Draining`.
    ///
    /// Only `WouldBlock` leaves the reader in `Detecting`; the error is
    /// returned so the caller can retry.
    fn fill_lookahead(&mut self) -> io::Result<()> {
        let want = self.strategy.lookahead().min(LOOKAHEAD_CAP);
        let State::Detecting { lookahead, filled } = &mut self.state else {
            return Ok(());
        };

        let mut fault = None;
        while *filled < want {
            match self.inner.read(&mut lookahead[*filled..want]) {
                Ok(0) => break,
                Ok(n) => *filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Err(e),
                Err(e) => {
                    warn!(error = %e, buffered = *filled, "read failed during BOM detection");
                    fault = Some(e);
                    break;
                }
            }
        }

        let (residual, filled) = (*lookahead, *filled);
        let detection = detect(&residual[..filled], self.strategy);
        debug!(kind = %detection.kind, skip = detection.skip, buffered = filled, "BOM detection finished");

        self.kind = Some(detection.kind);
        self.state = State::Draining {
            residual,
            pos: detection.skip.min(filled),
            end: filled,
            fault,
        };
        Ok(())
    }
}

impl<R: Read> Read for BomReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            match &mut self.state {
                State::NotStarted => {
                    self.state = State::Detecting {
                        lookahead: [0; LOOKAHEAD_CAP],
                        filled: 0,
                    };
                }
                State::Detecting { .. } => self.fill_lookahead()?,
                State::Draining {
                    residual,
                    pos,
                    end,
                    fault,
                } => {
                    if *pos < *end {
                        let n = (*end - *pos).min(buf.len());
                        buf[..n].copy_from_slice(&residual[*pos..*pos + n]);
                        *pos += n;
                        trace!(n, "drained residual");
                        return Ok(n);
                    }
                    self.state = match fault.take() {
                        Some(e) => State::Faulted(e),
                        None => State::Delegating,
                    };
                }
                State::Faulted(_) => {
                    if let State::Faulted(e) = mem::replace(&mut self.state, State::Delegating) {
                        debug!(error = %e, "reporting deferred read error");
                        return Err(e);
                    }
                }
                State::Delegating => return self.inner.read(buf),
            }
        }
    }
}

impl<R> fmt::Debug for BomReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BomReader")
            .field("strategy", &self.strategy)
            .field("kind", &self.kind)
            .field("state", &self.state.name())
            .finish_non_exhaustive()
    }
}
