//! Error types for the shim and the reset utility

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for shim operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// `dlsym(RTLD_NEXT, ...)` found nothing behind the shim.
    #[error("cannot resolve `{symbol}` via RTLD_NEXT: {reason}")]
    SymbolNotFound { symbol: String, reason: String },

    #[error("Error opening device {}: {source}", path.display())]
    OpenDevice {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error in ioctl: {0}")]
    ResetRequest(#[from] nix::errno::Errno),
}
