//! This crate provides core data types and file format support for the `vni-rs` project.
//!
//! # File Formats
//!
//! - **PAL**: Palettes, checksum-to-action mappings and detection masks
//! - **VNI**: Authored animation sequences with per-frame compressed bit planes
//!
//! # Colorizer
//!
//! The [`colorize::Context`] ties both files together: it recognizes incoming
//! DMD frames by plane checksum and answers with a palette switch or an
//! animation overlay.
//!
//! # Examples
//!
//! ```rust
//! use vni_types::file::PalFile;
//! use vni_types::colorize::Context;
//!
//! // A minimal PAL stream: version 1, no palettes
//! let pal = PalFile::from_bytes(&[1, 0, 0]).unwrap();
//! let mut ctx = Context::new(pal, None);
//!
//! // Without a palette there is nothing to colorize with
//! assert!(!ctx.colorize(&vec![0u8; 128 * 32], 128, 32, 2));
//! ```

pub mod colorize;
pub mod dimensions;
pub mod file;
pub mod plane;
pub mod prelude;
pub mod scaler;

// Re-export commonly used types at crate root for convenience
pub use colorize::{Context, OutputFrame};
pub use dimensions::Dimensions;
pub use file::{FileType, PalFile, VniFile, VniFileError};
pub use scaler::ScalerMode;
