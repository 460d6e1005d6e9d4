/// Errors that can occur while setting up or tearing down dispatch.
///
/// Nothing in the running polling loop is fatal; these only come from
/// lifecycle calls.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Queue capacity must be at least one command.
    #[error("queue capacity must be greater than zero")]
    InvalidCapacity,

    /// The polling thread could not be spawned.
    #[error("failed to spawn polling thread: {0}")]
    Spawn(std::io::Error),

    /// The polling thread panicked.
    #[error("polling thread panicked")]
    Panicked,
}

pub type Result<T> = std::result::Result<T, DispatchError>;
