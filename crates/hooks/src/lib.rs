//! gantry-hooks: hook signatures, registry, and the invocation adapter.
//!
//! Binds declared hook signatures to codec calls: payload text is
//! decoded per parameter against the signature, the handler runs, and
//! the result is encoded back to interchange text. Codec failures,
//! routing failures, and hook faults stay distinct so the transport
//! layer can map them to different outward errors.

pub mod adapter;
pub mod error;
pub mod registry;
pub mod signature;

pub use adapter::invoke;
pub use error::{FaultCategory, HookFault, InvokeError};
pub use registry::{HookHandler, HookRegistry, RegisteredHook};
pub use signature::HookSignature;

/// Crate version, reported by the host's index route.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
