//! Checksum-to-action mappings of a PAL file.

use std::fmt;

use crate::file::{FileType, VniFileError};

/// Action selected when an input plane's checksum matches a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SwitchMode {
	/// Swap the active palette, optionally for a limited duration
	Palette = 0,
	/// Replace frames with the animation's frames, time-driven
	Replace = 1,
	/// Overlay the animation's upper planes, time-driven
	ColorMask = 2,
	/// Recognized but triggers nothing
	Event = 3,
	/// Overlay the animation's upper planes, hash-driven frame selection
	Follow = 4,
	/// Accumulate animation frames into persistent OR buffers
	LayeredColorMask = 5,
	/// Replace frames, hash-driven frame selection
	FollowReplace = 6,
	/// Layered color mask whose frames carry a replace mask
	MaskedReplace = 7,
}

impl SwitchMode {
	/// Decodes the wire byte. The set is closed; anything else is a parse
	/// error.
	pub fn from_u8(value: u8) -> Result<Self, VniFileError> {
		match value {
			0 => Ok(SwitchMode::Palette),
			1 => Ok(SwitchMode::Replace),
			2 => Ok(SwitchMode::ColorMask),
			3 => Ok(SwitchMode::Event),
			4 => Ok(SwitchMode::Follow),
			5 => Ok(SwitchMode::LayeredColorMask),
			6 => Ok(SwitchMode::FollowReplace),
			7 => Ok(SwitchMode::MaskedReplace),
			_ => Err(VniFileError::InvalidSwitchMode {
				file_type: FileType::Pal,
				value,
			}),
		}
	}

	/// True for every mode that plays an animation sequence.
	#[inline]
	pub fn is_animation(&self) -> bool {
		!matches!(self, SwitchMode::Palette | SwitchMode::Event)
	}
}

impl fmt::Display for SwitchMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			SwitchMode::Palette => "palette",
			SwitchMode::Replace => "replace",
			SwitchMode::ColorMask => "color mask",
			SwitchMode::Event => "event",
			SwitchMode::Follow => "follow",
			SwitchMode::LayeredColorMask => "layered color mask",
			SwitchMode::FollowReplace => "follow replace",
			SwitchMode::MaskedReplace => "masked replace",
		};
		write!(f, "{name}")
	}
}

/// One checksum-to-action rule.
///
/// For [`SwitchMode::Palette`] the trailing u32 of the record is a duration in
/// milliseconds (0 = switch indefinitely) and `offset` stays 0; for every
/// other mode it is the byte offset of a sequence inside the companion VNI
/// file and `duration` stays 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
	/// Plane checksum that triggers this rule
	pub checksum: u32,
	/// Action to take
	pub mode: SwitchMode,
	/// Index of the palette to activate
	pub palette_index: u16,
	/// Palette-switch duration in milliseconds (Palette mode only)
	pub duration: u32,
	/// Sequence offset into the VNI file (animation modes only)
	pub offset: u32,
}

impl Mapping {
	/// True when this mapping starts an animation sequence.
	#[inline]
	pub fn is_animation(&self) -> bool {
		self.mode.is_animation()
	}
}

impl fmt::Display for Mapping {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:08X} -> {} (palette {})", self.checksum, self.mode, self.palette_index)
	}
}
