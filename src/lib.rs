//! `vni-rs` colorizes monochrome DMD frames using PAL/VNI colorization bundles.
//!
//! Frames are recognized by plane checksum against the PAL file's mapping
//! table; a hit swaps the active palette or plays an authored animation from
//! the VNI bundle over the incoming frames.
//!
//! ```no_run
//! use vni_rs::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pal = PalFile::open("game.pal")?;
//! let vni = VniFile::open("game.vni")?;
//! let mut ctx = Context::new(pal, Some(vni));
//!
//! let dmd_frame = vec![0u8; 128 * 32];
//! if ctx.colorize(&dmd_frame, 128, 32, 2) {
//! 	let out = ctx.frame();
//! 	println!("{} pixels, {} palette bytes", out.pixels().len(), out.palette().len());
//! }
//! # Ok(())
//! # }
//! ```

pub use vni_internal::*;
