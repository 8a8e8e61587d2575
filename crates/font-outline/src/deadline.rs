//! Per-glyph processing time limit.
//!
//! Transforms check the deadline between stages and between contours. A glyph
//! that runs past it fails with [`Error::Timeout`] and is written back
//! unmodified by the caller, so one pathological outline cannot stall a run.

use std::time::{Duration, Instant};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    /// Start the clock. `None` never expires.
    pub fn start(limit: Option<Duration>) -> Self {
        Self { started: Instant::now(), limit }
    }

    pub fn unlimited() -> Self {
        Self::start(None)
    }

    pub fn expired(&self) -> bool {
        self.limit.is_some_and(|limit| self.started.elapsed() >= limit)
    }

    pub fn check(&self) -> Result<()> {
        match self.limit {
            Some(limit) if self.expired() => Err(Error::Timeout(limit)),
            _ => Ok(()),
        }
    }
}
