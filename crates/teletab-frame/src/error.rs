/// Errors that can occur while reading frames from a byte source.
///
/// Sync loss and malformed frames are not errors: garbage bytes are
/// silently discarded during resynchronization, observable only at trace
/// level.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// An I/O error occurred while reading from the byte source.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte source reached end of stream.
    #[error("byte source disconnected")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, FrameError>;
