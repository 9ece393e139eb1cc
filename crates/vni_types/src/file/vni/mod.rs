//! `.vni` file format support for `vni-rs`.
//!
//! A VNI file is the animation side of a colorization bundle: a set of
//! authored frame sequences, each made of timed frames whose bit planes are
//! stored either raw or heatshrink-compressed. Mappings in the companion PAL
//! file identify a sequence by its byte offset inside this stream.
//!
//! # File Structure
//!
//! All integers are big-endian:
//!
//! ```text
//! "VPIN"
//! u16 file_version
//! u16 num_animations
//! if version >= 2: u32[num_animations]   (offset table, ignored; offsets are recomputed)
//!
//! repeat num_animations:
//!   u16 name_len; name bytes
//!   editor fields (cycles, clock geometry, refresh delay, type, fsk)
//!   u16 num_frames                       (signed; negative wraps via +65536)
//!   if version >= 2: per-animation palette (ignored)
//!   if version >= 3: u8 edit_mode        (ignored)
//!   if version >= 4: u16 width; u16 height          (else 128×32)
//!   if version >= 5: masks               (bit-reversed at load)
//!   if version >= 6: compiled animation block       (ignored)
//!   repeat num_frames:
//!     u16 plane_size; u16 delay_ms
//!     if version >= 4: u32 hash
//!     u8 bit_length
//!     if version >= 3: u8 compressed
//!     plane group, raw or heatshrink-compressed (window 10, lookahead 5);
//!     marker 0x6D tags the frame mask, any other marker a plane
//! ```
//!
//! Plane and mask bytes are stored MSB-first in the file and converted to the
//! runtime LSB-first order exactly once, here at load.
//!
//! # Usage Examples
//!
//! ```no_run
//! use vni_types::file::vni::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let vni = File::open("game.vni")?;
//! for seq in vni.animations() {
//!     println!("{seq}");
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use log::debug;

use crate::dimensions::Dimensions;
use crate::file::reader::ByteReader;
use crate::file::{FileType, VniFileError};

pub mod frame;
pub mod heatshrink;
pub mod sequence;

pub use frame::{AnimationFrame, AnimationPlane, MASK_MARKER};
pub use heatshrink::BitReader;
pub use sequence::FrameSeq;

/// Magic bytes opening every VNI stream.
pub const MAGIC: [u8; 4] = *b"VPIN";

/// A parsed VNI file.
///
/// Immutable after parsing except for the per-sequence playback state, which
/// the colorizer drives through [`File::animation_mut`].
#[derive(Debug, Clone, PartialEq)]
pub struct File {
	version: u16,
	animations: Vec<FrameSeq>,
	dimensions: Dimensions,
	offset_index: HashMap<u32, usize>,
}

impl File {
	/// Opens a VNI file from the specified path.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read, the magic is wrong, the
	/// stream is truncated, or a compressed plane group fails to decode.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, VniFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Parses a VNI file from a byte slice.
	pub fn from_bytes(data: &[u8]) -> Result<Self, VniFileError> {
		let mut reader = ByteReader::new(data, FileType::Vni);

		let magic = reader.bytes(4)?;
		if magic != MAGIC {
			return Err(VniFileError::invalid_magic(FileType::Vni, &MAGIC, magic));
		}

		let version = reader.read_u16_be()?;
		let num_animations = reader.read_u16_be()?;
		if version >= 2 {
			// Stored offset table; positions are recomputed while parsing.
			reader.skip(num_animations as usize * 4)?;
		}

		let mut animations = Vec::with_capacity(num_animations as usize);
		let mut offset_index = HashMap::with_capacity(num_animations as usize);
		let mut max_width = 0u32;
		let mut max_height = 0u32;
		for _ in 0..num_animations {
			let offset = reader.position() as u32;
			let seq = FrameSeq::parse(&mut reader, version, offset)?;
			debug!("VNI: loaded {seq}");

			max_width = max_width.max(seq.size.width);
			max_height = max_height.max(seq.size.height);
			offset_index.insert(offset, animations.len());
			animations.push(seq);
		}

		Ok(Self {
			version,
			animations,
			dimensions: Dimensions::new(max_width, max_height),
			offset_index,
		})
	}

	/// Parses a VNI file from a reader.
	pub fn from_reader<R: std::io::Read>(reader: &mut R) -> Result<Self, VniFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// File format version.
	#[inline]
	pub fn version(&self) -> u16 {
		self.version
	}

	/// All animation sequences, in file order.
	#[inline]
	pub fn animations(&self) -> &[FrameSeq] {
		&self.animations
	}

	/// Largest sequence dimensions in the file.
	#[inline]
	pub fn dimensions(&self) -> Dimensions {
		self.dimensions
	}

	/// Resolves a mapping's byte offset to a sequence position.
	#[inline]
	pub fn find_animation(&self, offset: u32) -> Option<usize> {
		self.offset_index.get(&offset).copied()
	}

	/// Returns a sequence by position.
	#[inline]
	pub fn animation(&self, index: usize) -> Option<&FrameSeq> {
		self.animations.get(index)
	}

	/// Returns a sequence by position for playback-state updates.
	#[inline]
	pub fn animation_mut(&mut self, index: usize) -> Option<&mut FrameSeq> {
		self.animations.get_mut(index)
	}
}

impl std::fmt::Display for File {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"VNI File v{} ({} animations, {})",
			self.version,
			self.animations.len(),
			self.dimensions
		)
	}
}
