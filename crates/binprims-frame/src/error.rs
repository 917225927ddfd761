use binprims_codec::CodecError;

/// Errors that can occur while framing or unframing a value.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// `write` produced a different byte count than `size_of` predicted.
    #[error("size mismatch: size_of predicted {predicted} bytes, write produced {written}")]
    SizeMismatch { predicted: usize, written: usize },

    /// The decoded value did not consume exactly the declared payload.
    #[error("header declares {declared} payload bytes, value consumed {consumed}")]
    HeaderPayloadMismatch { declared: usize, consumed: usize },

    /// The declared payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    SizeLimitExceeded { size: usize, max: usize },

    /// The size header does not hold a representable non-negative length.
    #[error("malformed size header (length {value})")]
    MalformedHeader { value: i128 },

    /// The byte source or sink failed. Pull failures pass through unchanged.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The codec rejected the bytes.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

impl FrameError {
    /// True when the source ran dry before a whole frame arrived.
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, FrameError::Io(err) if err.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
