//! Endb Core - shared building blocks for the Endb storage facade.
//!
//! This crate provides:
//! - The [`Value`] model stored by the facade, including binary payloads
//! - The [`Codec`] trait and the default [`JsonCodec`] wire format
//! - [`Namespace`], the key encoder that maps logical keys to physical keys
//! - [`Path`], nested-path addressing inside a stored value
//! - The [`Adapter`] contract every backend implements
//! - [`MemoryAdapter`], the fallback backend with no persistence
//! - [`FaultBus`], the asynchronous error channel adapters report on
//!
//! # Layering
//!
//! The facade composes these pieces in a fixed order:
//!
//! ```text
//! logical key ──► Namespace::encode ──► physical key ─┐
//! Value ────────► Codec::encode ──────► String ───────┴─► Adapter
//! ```
//!
//! Adapters never see logical keys or structured values. They store opaque
//! strings under physical keys and scope `clear`/`all` to their namespace.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod adapter;
pub mod codec;
pub mod error;
pub mod events;
pub mod key;
pub mod memory;
pub mod path;
pub mod value;

pub use adapter::{Adapter, Element};
pub use codec::{Codec, JsonCodec};
pub use error::{StoreError, StoreResult};
pub use events::{DEFAULT_FAULT_CAPACITY, FaultBus, FaultReceiver, StoreFault};
pub use key::{DEFAULT_NAMESPACE, Namespace, SEPARATOR, validate_key};
pub use memory::{MemoryAdapter, MemoryBackend};
pub use path::Path;
pub use value::Value;
