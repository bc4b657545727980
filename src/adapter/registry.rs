use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::Adapter;
use crate::error::{Error, Result};

static ADAPTER: OnceLock<Arc<Adapter>> = OnceLock::new();

/// Process-wide configuration.
#[derive(Debug, Clone, Default)]
pub struct SnapdmOptions {
    pub adapter: Adapter,
}

/// Registers the process-wide adapter.
///
/// Call once during start-up, before any code reads [`adapter`]. A second
/// call fails with [`Error::AlreadyInitialized`] and leaves the first
/// adapter in place.
pub fn initialize(options: SnapdmOptions) -> Result<()> {
    ADAPTER
        .set(Arc::new(options.adapter))
        .map_err(|_| Error::AlreadyInitialized)?;
    debug!("snapdm adapter initialized");
    Ok(())
}

/// The adapter registered with [`initialize`].
pub fn adapter() -> Result<Arc<Adapter>> {
    ADAPTER.get().cloned().ok_or(Error::AdapterNotInitialized)
}
