//! Internal crate for `vni-rs`.
//!
//! This module is separated into its own crate to keep the public facade
//! crate thin, and should not be used directly.
//!
//! # Examples
//!
//! ```rust
//! use vni_internal::prelude::*;
//!
//! // All commonly used types are available
//! let pal = PalFile::from_bytes(&[1, 0, 0]).unwrap();
//! let ctx = Context::new(pal, None);
//! ```

/// `use vni_internal::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export vni_types for convenience
pub use vni_types;
