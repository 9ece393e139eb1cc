//! Prelude module for `vni_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use vni_internal::prelude::*;
//!
//! let pal = PalFile::from_bytes(&[1, 0, 0]).unwrap();
//! let mut ctx = Context::new(pal, None);
//! assert!(!ctx.colorize(&vec![0u8; 128 * 32], 128, 32, 2));
//! ```

// Re-export everything from vni_types::prelude
#[doc(inline)]
pub use vni_types::prelude::*;

// Re-export the entire vni_types module for advanced usage
#[doc(inline)]
pub use vni_types;
