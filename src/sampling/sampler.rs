//! Frame pair sampler
//!
//! `FrameSampler` is a cheap value describing a range; every call to
//! [`FrameSampler::pairs`] starts a fresh iterator, so the sequence is
//! restartable and identical on each pass.

use crate::errors::{CheckError, Result};
use crate::types::FrameIndex;

/// Two frames compared against each other, `curr = prev + step`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramePair {
    pub prev: FrameIndex,
    pub curr: FrameIndex,
}

/// Validated sampling parameters for one timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSampler {
    start: FrameIndex,
    end: FrameIndex,
    step: i64,
}

impl FrameSampler {
    /// Create a sampler, rejecting empty or negative ranges and non-positive strides
    pub fn new(start: FrameIndex, end: FrameIndex, step: i64) -> Result<Self> {
        let span = end.checked_sub(start);
        if start < 0 || step < 1 || !matches!(span, Some(span) if span > 0) {
            return Err(CheckError::InvalidRange { start, end, step });
        }
        Ok(Self { start, end, step })
    }

    pub fn start(&self) -> FrameIndex {
        self.start
    }

    pub fn end(&self) -> FrameIndex {
        self.end
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Number of pairs produced: `floor((end - start) / step)`
    pub fn pair_count(&self) -> usize {
        ((self.end - self.start) / self.step) as usize
    }

    /// Pair at a zero-based position, used to resume from a job cursor
    pub fn pair_at(&self, index: usize) -> Option<FramePair> {
        if index >= self.pair_count() {
            return None;
        }
        let prev = self.start + index as i64 * self.step;
        Some(FramePair {
            prev,
            curr: prev + self.step,
        })
    }

    /// Fresh lazy iterator over all pairs
    pub fn pairs(&self) -> FramePairs {
        FramePairs {
            sampler: *self,
            next_index: 0,
        }
    }
}

/// Lazy, finite iterator over sampled frame pairs
#[derive(Debug, Clone)]
pub struct FramePairs {
    sampler: FrameSampler,
    next_index: usize,
}

impl Iterator for FramePairs {
    type Item = FramePair;

    fn next(&mut self) -> Option<FramePair> {
        let pair = self.sampler.pair_at(self.next_index)?;
        self.next_index += 1;
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sampler.pair_count().saturating_sub(self.next_index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FramePairs {}
