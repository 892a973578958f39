use thiserror::Error;

/// Failures inside the library. None of these reach the chat transcript;
/// front ends log them.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to bind to address {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("upload '{name}' is not valid base64: {source}")]
    Decode {
        name: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("upload '{name}' could not be read by the client")]
    Unreadable { name: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ChatError> = std::result::Result<T, E>;
