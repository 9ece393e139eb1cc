//! Heatshrink bit-stream decompression for VNI frame data.
//!
//! Compressed plane groups inside a VNI file use an LZSS-style code: one flag
//! bit selects between an 8-bit literal and a back-reference made of a
//! `window_sz`-bit offset and a `lookahead_sz`-bit count (both stored minus
//! one). Back-references may overlap the write position; copying byte by byte
//! from left to right gives the run-length behaviour the encoder relies on.
//!
//! The stream is byte-aligned at the start but not at the end: running out of
//! bits *before* a flag bit is a normal end of stream, running out inside a
//! code is an error.

use crate::file::{FileType, VniFileError};

/// LSB-first bit reader over a byte slice.
///
/// Bit 0 of each byte is the first bit read.
#[derive(Debug)]
pub struct BitReader<'a> {
	data: &'a [u8],
	pos: usize,
	bit_buf: u32,
	bits_in_buf: u32,
}

impl<'a> BitReader<'a> {
	/// Creates a reader over the given bytes.
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			pos: 0,
			bit_buf: 0,
			bits_in_buf: 0,
		}
	}

	/// Reads `count` bits, least significant first.
	///
	/// Returns `None` when the stream runs out before `count` bits are read.
	pub fn read_bits(&mut self, count: u32) -> Option<u32> {
		let mut value = 0u32;
		for i in 0..count {
			if self.bits_in_buf == 0 {
				if self.pos >= self.data.len() {
					return None;
				}
				self.bit_buf = u32::from(self.data[self.pos]);
				self.pos += 1;
				self.bits_in_buf = 8;
			}
			value |= (self.bit_buf & 1) << i;
			self.bit_buf >>= 1;
			self.bits_in_buf -= 1;
		}
		Some(value)
	}
}

/// Decompresses a heatshrink stream.
///
/// # Arguments
///
/// * `data` - Compressed bytes
/// * `window_sz` - Bit width of back-reference offsets
/// * `lookahead_sz` - Bit width of back-reference counts
///
/// # Errors
///
/// Returns [`VniFileError::BadBackReference`] when an offset points past the
/// start of the decoded output, and [`VniFileError::TruncatedBitStream`] when
/// the stream ends inside a literal or back-reference code.
pub fn decompress(data: &[u8], window_sz: u32, lookahead_sz: u32) -> Result<Vec<u8>, VniFileError> {
	let mut reader = BitReader::new(data);
	let mut out = Vec::new();

	loop {
		let Some(flag) = reader.read_bits(1) else {
			// Trailing bits exhausted before a flag: normal end of stream.
			return Ok(out);
		};

		if flag == 1 {
			let literal = reader.read_bits(8).ok_or(VniFileError::TruncatedBitStream {
				file_type: FileType::Vni,
			})?;
			out.push(literal as u8);
			continue;
		}

		let offset = reader.read_bits(window_sz).ok_or(VniFileError::TruncatedBitStream {
			file_type: FileType::Vni,
		})?;
		let count = reader.read_bits(lookahead_sz).ok_or(VniFileError::TruncatedBitStream {
			file_type: FileType::Vni,
		})?;

		let offset = offset as usize + 1;
		let count = count as usize + 1;
		if offset > out.len() {
			return Err(VniFileError::BadBackReference {
				file_type: FileType::Vni,
				offset,
				available: out.len(),
			});
		}

		let start = out.len() - offset;
		for i in 0..count {
			let byte = out[start + i];
			out.push(byte);
		}
	}
}
