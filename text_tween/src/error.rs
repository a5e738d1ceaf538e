// Copyright 2026 the TextTween Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// Error type for buffer, registry and configuration operations.
///
/// Carries a non-exhaustive [`ErrorKind`] plus the range or value that was
/// being processed when the failure occurred.
///
/// A source whose glyph arrays are not populated yet is *not* an error; see
/// [`CopyStatus::NotReady`](crate::CopyStatus::NotReady).
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// The start of the offending range, in buffer units.
    start: usize,

    /// The length of the offending range, in buffer units.
    length: usize,

    /// The logical buffer length at the time of failure.
    limit: usize,

    /// The rejected configuration value, for [`ErrorKind::InvalidConfig`].
    value: Option<(&'static str, f32)>,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The start of the range being processed, in buffer units.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The length of the range being processed, in buffer units.
    pub fn length(&self) -> usize {
        self.length
    }

    /// The logical buffer length (or the requested capacity, for allocation
    /// failures) at the time of the error.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The name and value of the rejected configuration field, if any.
    pub fn config_value(&self) -> Option<(&'static str, f32)> {
        self.value
    }

    pub(crate) fn allocation_failed(current: usize, requested: usize) -> Self {
        Self {
            kind: ErrorKind::AllocationFailed,
            start: current,
            length: requested.saturating_sub(current),
            limit: requested,
            value: None,
        }
    }

    pub(crate) fn out_of_bounds(start: usize, length: usize, limit: usize) -> Self {
        Self {
            kind: ErrorKind::OutOfBounds,
            start,
            length,
            limit,
            value: None,
        }
    }

    pub(crate) fn invalid_vertex_count(offset: usize, vertex_count: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidVertexCount,
            start: offset,
            length: vertex_count,
            limit: 0,
            value: None,
        }
    }

    pub(crate) fn invalid_config(field: &'static str, value: f32) -> Self {
        Self {
            kind: ErrorKind::InvalidConfig,
            start: 0,
            length: 0,
            limit: 0,
            value: Some((field, value)),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::AllocationFailed => write!(
                f,
                "failed to grow buffers from {} to {} units",
                self.start, self.limit
            ),
            ErrorKind::OutOfBounds => write!(
                f,
                "range {}..{} out of bounds for buffer length {}",
                self.start,
                self.start.saturating_add(self.length),
                self.limit
            ),
            ErrorKind::InvalidVertexCount => write!(
                f,
                "source at offset {} has {} vertices, which is not a whole number of character quads",
                self.start, self.length
            ),
            ErrorKind::InvalidConfig => match self.value {
                Some((field, value)) => {
                    write!(f, "invalid configuration: `{field}` = {value}")
                }
                None => write!(f, "invalid configuration"),
            },
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Growing the packed buffers could not reserve memory.
    AllocationFailed,

    /// A range addressed units beyond the logical buffer length.
    OutOfBounds,

    /// A source's vertex count is not a multiple of
    /// [`VERTICES_PER_CHAR`](crate::VERTICES_PER_CHAR).
    InvalidVertexCount,

    /// A configuration value was NaN or outside its permitted range.
    InvalidConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            Error::out_of_bounds(10, 8, 12).to_string(),
            "range 10..18 out of bounds for buffer length 12"
        );
        assert_eq!(
            Error::invalid_config("overlap", 1.5).to_string(),
            "invalid configuration: `overlap` = 1.5"
        );
        assert_eq!(
            Error::allocation_failed(4, 1 << 20).to_string(),
            "failed to grow buffers from 4 to 1048576 units"
        );
    }

    #[test]
    fn display_saturates_unrepresentable_ranges() {
        assert_eq!(
            Error::out_of_bounds(usize::MAX, 1, 8).to_string(),
            format!("range {0}..{0} out of bounds for buffer length 8", usize::MAX)
        );
    }

    #[test]
    fn accessors() {
        let err = Error::invalid_vertex_count(40, 6);
        assert_eq!(err.kind(), ErrorKind::InvalidVertexCount);
        assert_eq!(err.start(), 40);
        assert_eq!(err.length(), 6);
        assert_eq!(err.config_value(), None);
    }
}
