/// Errors that can occur while sizing, writing or reading a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The buffer ends before the bytes the codec needs.
    #[error("buffer too short at offset {pos} (need {needed} bytes, buffer is {len})")]
    BufferTooShort { pos: usize, needed: usize, len: usize },

    /// A leading byte does not select any known encoding.
    #[error("invalid {what} tag 0x{tag:02x} at offset {pos}")]
    InvalidTag {
        pos: usize,
        tag: u8,
        what: &'static str,
    },

    /// A decoded or supplied value does not fit the target representation.
    #[error("{what} out of range at offset {pos}")]
    Overflow { pos: usize, what: &'static str },

    /// A string payload is not valid UTF-8.
    #[error("invalid UTF-8 in string at offset {pos}")]
    InvalidUtf8 { pos: usize },

    /// A container produced or consumed a different number of elements than
    /// its length prefix declares.
    #[error("element count mismatch (declared {declared}, got {actual})")]
    ElementCountMismatch { declared: usize, actual: usize },

    /// A set or map payload repeats a key.
    #[error("duplicate {what} in encoded container")]
    Duplicate { what: &'static str },
}

pub type Result<T> = std::result::Result<T, CodecError>;
