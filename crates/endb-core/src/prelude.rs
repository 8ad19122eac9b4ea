//! Prelude module - commonly used types for convenient import.
//!
//! Use `use endb_core::prelude::*;` to import all essential types.

// Errors
pub use crate::{StoreError, StoreResult};

// Values and encoding
pub use crate::{Codec, JsonCodec, Path, Value};

// Keys
pub use crate::{Namespace, SEPARATOR};

// Adapter contract
pub use crate::{Adapter, Element, MemoryAdapter, MemoryBackend};

// Faults
pub use crate::{FaultBus, FaultReceiver, StoreFault};
