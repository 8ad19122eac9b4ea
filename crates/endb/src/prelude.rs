//! Prelude module - commonly used types for convenient import.
//!
//! Use `use endb::prelude::*;` to import all essential types.

pub use crate::{Endb, EndbBuilder, EndbOptions};
pub use crate::{Element, StoreError, StoreResult, Value};
pub use crate::{Adapter, Codec, JsonCodec, MemoryAdapter, MemoryBackend, Namespace};
pub use crate::{FaultReceiver, StoreFault};
