//! Frame dimensions.

use std::fmt;

/// Width and height of an indexed frame, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
	/// Width in pixels
	pub width: u32,
	/// Height in pixels
	pub height: u32,
}

impl Dimensions {
	/// Creates a new dimensions pair.
	pub const fn new(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
		}
	}

	/// Total number of pixels.
	#[inline]
	pub const fn surface(&self) -> usize {
		self.width as usize * self.height as usize
	}

	/// Byte length of a single bit plane covering the surface.
	#[inline]
	pub const fn plane_len(&self) -> usize {
		self.surface() / 8
	}

	/// The same frame upscaled by two in both directions.
	#[inline]
	pub const fn doubled(&self) -> Self {
		Self::new(self.width * 2, self.height * 2)
	}
}

impl Default for Dimensions {
	fn default() -> Self {
		Self::new(128, 32)
	}
}

impl fmt::Display for Dimensions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}×{}", self.width, self.height)
	}
}
