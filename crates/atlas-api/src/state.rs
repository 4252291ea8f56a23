//! Shared state and configuration for registry API handlers.

use std::sync::Arc;

use atlas_core::storage::RegistryStore;
use atlas_registry::{RegistryReader, RegistryWriter};

/// Server-side configuration for the registry API.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Optional concurrency limit for handlers.
    pub concurrency_limit: Option<usize>,
}

/// Shared state for registry API handlers.
#[derive(Clone)]
pub struct RegistryState {
    /// Read-side engine.
    pub reader: RegistryReader,
    /// Write-side engine.
    pub writer: RegistryWriter,
    /// Server-side configuration.
    pub config: RegistryConfig,
}

impl RegistryState {
    /// Creates registry state over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self {
            reader: RegistryReader::new(Arc::clone(&store)),
            writer: RegistryWriter::new(store),
            config: RegistryConfig::default(),
        }
    }

    /// Creates registry state with explicit configuration.
    #[must_use]
    pub fn with_config(store: Arc<dyn RegistryStore>, config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::new(store)
        }
    }
}
