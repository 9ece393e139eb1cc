//! Animation frames and their bit planes.

use std::fmt;

/// Marker byte that tags a plane group entry as the frame's mask.
pub const MASK_MARKER: u8 = 0x6D;

/// One bit plane of an animation frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationPlane {
	/// Marker byte the plane was stored under
	pub marker: u8,
	/// Plane bytes, already converted to runtime (LSB-first) bit order
	pub data: Vec<u8>,
}

/// One authored frame of an animation sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationFrame {
	/// Start of this frame relative to the sequence start, in milliseconds
	pub time_offset_ms: u32,
	/// How long the frame stays up, in milliseconds
	pub delay_ms: u32,
	/// Number of bit planes
	pub bit_length: u8,
	/// Plane data in file order
	pub planes: Vec<AnimationPlane>,
	/// Optional replace mask (plane group entry with marker 0x6D)
	pub mask: Option<Vec<u8>>,
	/// Content hash of the input plane this frame answers to (file version 4+)
	pub hash: u32,
}

impl fmt::Display for AnimationFrame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"frame +{}ms ({}ms, {} planes{})",
			self.time_offset_ms,
			self.delay_ms,
			self.planes.len(),
			if self.mask.is_some() { ", masked" } else { "" }
		)
	}
}
