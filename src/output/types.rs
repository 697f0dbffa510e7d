//! Composite wire shapes for CLI rendering. `DiscoveryResult` and
//! `LoadedSymbol` already derive `Serialize` in `candidate`; the types here
//! just compose them for each CLI command.

use serde::Serialize;

use crate::candidate::{DiscoveryResult, LoadedSymbol};

/// Rendered by `pysig discover` when `--load` is not given.
#[derive(Debug, Serialize)]
pub struct DiscoverOutput {
    #[serde(flatten)]
    pub result: DiscoveryResult,
}

/// Rendered by `pysig discover --load`.
#[derive(Debug, Serialize)]
pub struct LoadedOutput {
    #[serde(flatten)]
    pub result: DiscoveryResult,
    pub loaded: LoadedSymbol,
}

/// Rendered by `pysig discover-all`.
#[derive(Debug, Serialize)]
pub struct DiscoverAllOutput {
    pub matches: Vec<DiscoveryResult>,
}
