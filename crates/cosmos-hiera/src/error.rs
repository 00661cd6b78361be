//! Hiera loading errors.

use std::path::PathBuf;

use cosmos_tree::ConversionError;

/// Error returned by [`HieraLoader`](crate::HieraLoader).
#[derive(Debug, thiserror::Error)]
pub enum HieraError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ConversionError,
    },

    /// The document parsed, but its top level is a list or a scalar.
    #[error("{} does not contain a top-level mapping", path.display())]
    NotAMapping { path: PathBuf },
}
