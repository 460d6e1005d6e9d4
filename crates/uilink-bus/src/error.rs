use std::path::PathBuf;

/// Errors raised while preparing a bus stand-in.
///
/// Live sampling never fails; these only come from trace handling.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// A trace line could not be parsed.
    #[error("trace line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The trace file could not be read.
    #[error("failed to read trace {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The trace contained no bus states.
    #[error("trace contains no bus states")]
    EmptyTrace,
}

pub type Result<T> = std::result::Result<T, BusError>;
