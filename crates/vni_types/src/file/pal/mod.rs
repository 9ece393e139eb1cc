//! `.pal` file format support for `vni-rs`.
//!
//! A PAL file carries the color side of a colorization bundle: the palettes
//! themselves, a table mapping plane checksums to palette switches or
//! animation starts, and an optional trailing block of detection masks.
//!
//! # File Structure
//!
//! All integers are big-endian:
//!
//! ```text
//! u8  version
//! u16 num_palettes
//!   repeat num_palettes:
//!     u16 palette_index
//!     u16 num_colors
//!     u8  type                      (0 normal, 1 persistent default, 2 transient default)
//!     3*num_colors bytes of RGB
//! [only if more bytes remain:]
//!   u16 num_mappings
//!   repeat num_mappings:
//!     u32 checksum
//!     u8  mode
//!     u16 palette_index
//!     u32 duration_or_offset        (duration if mode = palette, VNI offset otherwise)
//! [only if more bytes remain:]
//!   u8 num_masks
//!   remaining/num_masks bytes each  (must come out to 256, 512 or 1536)
//! ```
//!
//! The mask block is best-effort: when the per-mask byte count is not one of
//! the three supported plane sizes the block is dropped and parsing still
//! succeeds, matching how consumers treat files written by older editors.
//!
//! # Usage Examples
//!
//! ```no_run
//! use vni_types::file::pal::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pal = File::open("game.pal")?;
//! println!("{} palettes, {} mappings", pal.palettes().len(), pal.mappings().len());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use log::{debug, warn};

use crate::file::reader::ByteReader;
use crate::file::{FileType, VniFileError};

pub mod mapping;
pub mod palette;

pub use mapping::{Mapping, SwitchMode};
pub use palette::Palette;

/// Plane byte lengths a detection mask may have (128x16, 128x32, 256x64).
pub const VALID_MASK_LENGTHS: [usize; 3] = [256, 512, 1536];

/// A parsed PAL file.
///
/// Immutable after parsing; the colorizer looks palettes up by position and
/// mappings up by checksum.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
	version: u8,
	palettes: Vec<Palette>,
	mappings: HashMap<u32, Mapping>,
	masks: Vec<Vec<u8>>,
	default_palette_index: Option<usize>,
}

impl File {
	/// Opens a PAL file from the specified path.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or the stream is truncated
	/// inside a declared section.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, VniFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Parses a PAL file from a byte slice.
	///
	/// The mapping and mask sections are optional; the parser stops cleanly at
	/// end of stream after each section boundary.
	pub fn from_bytes(data: &[u8]) -> Result<Self, VniFileError> {
		let mut reader = ByteReader::new(data, FileType::Pal);

		let version = reader.read_u8()?;
		let num_palettes = reader.read_u16_be()?;

		let mut palettes = Vec::with_capacity(num_palettes as usize);
		let mut default_palette_index = None;
		for _ in 0..num_palettes {
			let index = reader.read_u16_be()?;
			let num_colors = reader.read_u16_be()?;
			let kind = reader.read_u8()?;
			let colors = reader.bytes(num_colors as usize * 3)?.to_vec();

			let palette = Palette {
				index,
				kind,
				colors,
			};
			if default_palette_index.is_none() && palette.is_default() {
				default_palette_index = Some(palettes.len());
			}
			palettes.push(palette);
		}
		if default_palette_index.is_none() && !palettes.is_empty() {
			default_palette_index = Some(0);
		}

		let mut mappings = HashMap::new();
		if !reader.is_empty() {
			let num_mappings = reader.read_u16_be()?;
			mappings.reserve(num_mappings as usize);
			for _ in 0..num_mappings {
				let checksum = reader.read_u32_be()?;
				let mode = SwitchMode::from_u8(reader.read_u8()?)?;
				let palette_index = reader.read_u16_be()?;
				let value = reader.read_u32_be()?;

				let (duration, offset) = if mode == SwitchMode::Palette {
					(value, 0)
				} else {
					(0, value)
				};
				// First occurrence wins for duplicate checksums.
				mappings.entry(checksum).or_insert(Mapping {
					checksum,
					mode,
					palette_index,
					duration,
					offset,
				});
			}
		}

		let mut masks = Vec::new();
		if !reader.is_empty() {
			let num_masks = reader.read_u8()?;
			if num_masks > 0 {
				let mask_len = reader.remaining() / num_masks as usize;
				if VALID_MASK_LENGTHS.contains(&mask_len) {
					masks.reserve(num_masks as usize);
					for _ in 0..num_masks {
						masks.push(reader.bytes(mask_len)?.to_vec());
					}
				} else {
					warn!(
						"PAL: dropping mask block ({} masks of {} bytes, not a supported plane size)",
						num_masks, mask_len
					);
				}
			}
		}

		debug!(
			"PAL v{}: {} palettes, {} mappings, {} masks",
			version,
			palettes.len(),
			mappings.len(),
			masks.len()
		);

		Ok(Self {
			version,
			palettes,
			mappings,
			masks,
			default_palette_index,
		})
	}

	/// Parses a PAL file from a reader.
	pub fn from_reader<R: std::io::Read>(reader: &mut R) -> Result<Self, VniFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// File format version byte.
	#[inline]
	pub fn version(&self) -> u8 {
		self.version
	}

	/// All palettes, in file order.
	#[inline]
	pub fn palettes(&self) -> &[Palette] {
		&self.palettes
	}

	/// Checksum-to-action table.
	#[inline]
	pub fn mappings(&self) -> &HashMap<u32, Mapping> {
		&self.mappings
	}

	/// Detection masks, in file order.
	#[inline]
	pub fn masks(&self) -> &[Vec<u8>] {
		&self.masks
	}

	/// Position of the default palette: the first palette with a default type,
	/// otherwise the first palette, otherwise none.
	#[inline]
	pub fn default_palette_index(&self) -> Option<usize> {
		self.default_palette_index
	}

	/// Looks up the mapping for a plane checksum.
	#[inline]
	pub fn mapping(&self, checksum: u32) -> Option<&Mapping> {
		self.mappings.get(&checksum)
	}

	/// Finds a palette's position by its file index.
	pub fn find_palette(&self, palette_index: u16) -> Option<usize> {
		self.palettes.iter().position(|p| p.index == palette_index)
	}

	/// True iff the file carries masks and the first one covers a 128×32
	/// plane. Some consumers use this to probe for full-size animations.
	pub fn has_128x32_masks(&self) -> bool {
		self.masks.first().is_some_and(|mask| mask.len() == 512)
	}
}

impl std::fmt::Display for File {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"PAL File v{} ({} palettes, {} mappings, {} masks)",
			self.version,
			self.palettes.len(),
			self.mappings.len(),
			self.masks.len()
		)
	}
}
