// Error taxonomy shared by the chunk decoder and encoder.
//
// Decode failures carry the position up to which the input was validated,
// so callers can tell where a stream was truncated.

use thiserror::Error;

/// Flat codec status, mirroring the five outcomes of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    OutOfBounds,
    Unreachable,
    NoMemory,
    InvalidSize,
}

/// Which argument of an encode call was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeField {
    /// Chunk count (raw length, repeat count, pattern or referenced length).
    Count,
    /// Pattern repetitions of a repeated-array chunk.
    Reps,
    /// Signed old-data offset.
    Offset,
}

impl std::fmt::Display for SizeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count => f.write_str("count"),
            Self::Reps => f.write_str("reps"),
            Self::Offset => f.write_str("offset"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Not enough source bytes to finish the chunk.
    #[error("out of bounds at byte {at}")]
    OutOfBounds { at: usize },

    /// Kind bits that no chunk type maps to.
    #[error("unreachable chunk tag {tag:#04x} at byte {at}")]
    Unreachable { tag: u8, at: usize },

    /// Destination buffer cannot hold the whole chunk.
    #[error("no memory: chunk needs {needed} bytes, {available} available")]
    NoMemory { needed: usize, available: usize },

    /// Zero or out-of-range count, reps or offset.
    #[error("invalid {field}: {value}")]
    InvalidSize { field: SizeField, value: i64 },
}

impl Error {
    pub fn status(&self) -> Status {
        match self {
            Self::OutOfBounds { .. } => Status::OutOfBounds,
            Self::Unreachable { .. } => Status::Unreachable,
            Self::NoMemory { .. } => Status::NoMemory,
            Self::InvalidSize { .. } => Status::InvalidSize,
        }
    }

    /// Position reached by the decoder before it failed.
    ///
    /// Encode errors have no position and return `None`.
    pub fn position(&self) -> Option<usize> {
        match *self {
            Self::OutOfBounds { at } | Self::Unreachable { at, .. } => Some(at),
            Self::NoMemory { .. } | Self::InvalidSize { .. } => None,
        }
    }

    pub(crate) fn invalid_count(value: usize) -> Self {
        Self::InvalidSize {
            field: SizeField::Count,
            value: i64::try_from(value).unwrap_or(i64::MAX),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(Error::OutOfBounds { at: 3 }.status(), Status::OutOfBounds);
        assert_eq!(
            Error::Unreachable { tag: 4, at: 0 }.status(),
            Status::Unreachable
        );
        assert_eq!(
            Error::NoMemory {
                needed: 5,
                available: 1
            }
            .status(),
            Status::NoMemory
        );
        assert_eq!(Error::invalid_count(0).status(), Status::InvalidSize);
    }

    #[test]
    fn position_only_for_decode_errors() {
        assert_eq!(Error::OutOfBounds { at: 7 }.position(), Some(7));
        assert_eq!(Error::Unreachable { tag: 4, at: 2 }.position(), Some(2));
        assert_eq!(Error::invalid_count(0).position(), None);
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::OutOfBounds { at: 12 }.to_string(),
            "out of bounds at byte 12"
        );
        assert_eq!(
            Error::InvalidSize {
                field: SizeField::Reps,
                value: 257
            }
            .to_string(),
            "invalid reps: 257"
        );
    }
}
