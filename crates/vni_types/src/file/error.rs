//! Error types for file format parsing.
//!
//! This module provides a unified error handling system using [`VniFileError`]
//! for both file formats supported by vni-rs.

use thiserror::Error;

/// Unified error type for all file format operations
#[derive(Debug, Error)]
pub enum VniFileError {
	/// Not enough data to parse
	#[error("{file_type} error: Insufficient data (expected {expected} bytes, got {actual} bytes)")]
	InsufficientData {
		/// File type that encountered the error
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Invalid magic number
	#[error(
		"{file_type} error: Invalid magic number (expected {expected:02X?}, got {actual:02X?})"
	)]
	InvalidMagic {
		/// File type that encountered the error
		file_type: FileType,
		/// Expected magic bytes
		expected: Vec<u8>,
		/// Actual magic bytes
		actual: Vec<u8>,
	},

	/// Switch mode byte outside the known set (PAL files)
	#[error("{file_type} error: Invalid switch mode value {value}")]
	InvalidSwitchMode {
		/// File type that encountered the error
		file_type: FileType,
		/// Invalid value
		value: u8,
	},

	/// Back-reference past the start of the output buffer (compressed VNI frames)
	#[error(
		"{file_type} error: Back-reference offset {offset} exceeds decoded length {available}"
	)]
	BadBackReference {
		/// File type that encountered the error
		file_type: FileType,
		/// Offset requested by the back-reference
		offset: usize,
		/// Bytes decoded so far
		available: usize,
	},

	/// Bit stream ended inside a literal or back-reference code (compressed VNI frames)
	#[error("{file_type} error: Bit stream exhausted inside a code")]
	TruncatedBitStream {
		/// File type that encountered the error
		file_type: FileType,
	},

	/// No palette file was provided or it could not be opened
	#[error("A palette (.pal) file is required to colorize")]
	MissingPaletteFile,

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl VniFileError {
	/// Returns the file type associated with this error
	pub fn file_type(&self) -> Option<FileType> {
		match self {
			Self::InsufficientData {
				file_type,
				..
			}
			| Self::InvalidMagic {
				file_type,
				..
			}
			| Self::InvalidSwitchMode {
				file_type,
				..
			}
			| Self::BadBackReference {
				file_type,
				..
			}
			| Self::TruncatedBitStream {
				file_type,
			} => Some(*file_type),
			_ => None,
		}
	}

	/// Returns true if this is an I/O error
	pub fn is_io_error(&self) -> bool {
		matches!(self, Self::IOError(_))
	}

	/// Returns true if this is an insufficient data error
	pub fn is_insufficient_data(&self) -> bool {
		matches!(self, Self::InsufficientData { .. })
	}

	/// Returns true if this is an invalid magic error
	pub fn is_invalid_magic(&self) -> bool {
		matches!(self, Self::InvalidMagic { .. })
	}

	/// Returns true if this is a decompression-related error
	pub fn is_decompression_error(&self) -> bool {
		matches!(self, Self::BadBackReference { .. } | Self::TruncatedBitStream { .. })
	}

	/// Create an insufficient data error
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Create an invalid magic error
	pub fn invalid_magic(file_type: FileType, expected: &[u8], actual: &[u8]) -> Self {
		Self::InvalidMagic {
			file_type,
			expected: expected.to_vec(),
			actual: actual.to_vec(),
		}
	}
}

/// File type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// Palette and mapping file
	Pal,
	/// Animation bundle file
	Vni,
}

impl FileType {
	/// Returns the typical file extension for this file type
	pub fn extension(&self) -> &'static str {
		match self {
			FileType::Pal => "pal",
			FileType::Vni => "vni",
		}
	}

	/// Returns a human-readable description of this file type
	pub fn description(&self) -> &'static str {
		match self {
			FileType::Pal => "Palette and mapping file",
			FileType::Vni => "Animation bundle file",
		}
	}
}

impl std::fmt::Display for FileType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			FileType::Pal => write!(f, "PAL"),
			FileType::Vni => write!(f, "VNI"),
		}
	}
}
