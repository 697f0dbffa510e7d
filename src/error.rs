use thiserror::Error;

/// Errors surfaced by the discovery engine.
///
/// All other failure conditions (unreadable files, syntax errors, permission
/// errors on a single directory) are swallowed during discovery and simply
/// contribute zero candidates; see `walk` and `extractor`.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("no candidate matched signature {0}")]
    NotFound(String),

    #[error("failed to load '{symbol}' from '{module}'")]
    LoadError {
        symbol: String,
        module: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid signature: {0}")]
    BadSignature(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
