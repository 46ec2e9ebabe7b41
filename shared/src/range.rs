use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while constructing a Range
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// The end of a range lies before its start
    #[error("Range end {end} is before its start {start}")]
    InvalidBounds { start: usize, end: usize },
}

/// A half-open interval `[start, end)` of row indices
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    start: usize,
    end: usize,
}

impl Range {
    /// Creates a range starting at `start` covering `length` rows
    pub fn with_length(start: usize, length: usize) -> Self {
        Self {
            start,
            end: start.saturating_add(length),
        }
    }

    /// Creates a range between two indices
    ///
    /// # Panics
    ///
    /// Panics if `end < start`.
    /// Consider using `try_between` for non-panicking error handling.
    pub fn between(start: usize, end: usize) -> Self {
        Self::try_between(start, end).expect("Range end must not be before its start")
    }

    /// Creates a range between two indices, or fails if `end < start`
    pub fn try_between(start: usize, end: usize) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::InvalidBounds { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn length(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The smallest range covering both ranges, including any gap between
    /// them. An empty range contributes nothing.
    pub fn combine_with(&self, other: &Range) -> Range {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The part of this range that lies inside `bounds`. When the two do not
    /// overlap the result is empty.
    pub fn restrict_to(&self, bounds: &Range) -> Range {
        let start = self.start.clamp(bounds.start, bounds.end);
        let end = self.end.clamp(start, bounds.end.max(start));
        Range { start, end }
    }

    pub fn iter(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}
