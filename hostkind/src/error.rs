use thiserror::Error;

/// Unified library error type.
#[derive(Debug, Error)]
pub enum HostkindError {
    /// OS family or Linux distribution could not be determined.
    /// Raised only in strict mode; otherwise the unknown sentinel is kept.
    #[error("cannot determine {what}")]
    Detection { what: String },

    /// No installer hook exists for the detected distribution. Always fatal:
    /// it means the hook table itself has a gap, not that the host is odd.
    #[error("cannot determine installer for distribution {distribution:?}")]
    UnknownInstaller { distribution: String },

    /// A host probe file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A consumer-supplied hook failed.
    #[error(transparent)]
    Hook(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, HostkindError>;
