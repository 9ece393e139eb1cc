//! Prelude module for `vni_types`.
//!
//! This module provides a convenient way to import commonly used types and constants.
//!
//! # Examples
//!
//! ```no_run
//! use vni_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pal = PalFile::open("game.pal")?;
//! let vni = VniFile::open("game.vni")?;
//! let mut ctx = Context::new(pal, Some(vni));
//! ctx.set_scaler_mode(ScalerMode::Scale2x);
//! # Ok(())
//! # }
//! ```

// Colorizer types
#[doc(inline)]
pub use crate::colorize::{Context, OutputFrame};

// File module types
#[doc(inline)]
pub use crate::file::{FileType, PalFile, VniFile, VniFileError};

// PAL building blocks
#[doc(inline)]
pub use crate::file::pal::{Mapping, Palette, SwitchMode};

// VNI building blocks
#[doc(inline)]
pub use crate::file::vni::{AnimationFrame, AnimationPlane, FrameSeq};

// Geometry and scaling
#[doc(inline)]
pub use crate::dimensions::Dimensions;
#[doc(inline)]
pub use crate::scaler::ScalerMode;

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
