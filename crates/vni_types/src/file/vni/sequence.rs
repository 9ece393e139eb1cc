//! Animation sequences: parsed frame data plus playback state.

use std::fmt;

use crate::dimensions::Dimensions;
use crate::file::reader::ByteReader;
use crate::file::vni::frame::{AnimationFrame, AnimationPlane, MASK_MARKER};
use crate::file::vni::heatshrink;
use crate::file::{FileType, VniFileError};
use crate::file::pal::SwitchMode;
use crate::plane;

/// One authored animation sequence inside a VNI bundle.
///
/// The parsed fields are immutable after load. The runtime fields at the
/// bottom are owned by the playback engine and cover all six switch modes;
/// `lcm_buffer_planes` and `replace_mask` stay empty unless the sequence is
/// running in a layered or masked-replace mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSeq {
	/// Sequence name, `"<undefined>"` when the file stores none
	pub name: String,
	/// Byte offset of this sequence in the VNI stream; the identity mappings
	/// refer to
	pub offset: u32,
	/// Frames in playback order
	pub frames: Vec<AnimationFrame>,
	/// Sum of all frame delays, in milliseconds
	pub duration_ms: u32,
	/// Frame dimensions
	pub size: Dimensions,
	/// Per-sequence detection masks, bit-reversed at load
	pub masks: Vec<Vec<u8>>,

	/// Mode the active mapping started this sequence in
	pub switch_mode: SwitchMode,
	/// True while the sequence is scheduled
	pub is_running: bool,
	/// Next frame to render (or the driver-selected frame)
	pub frame_index: usize,
	/// Timestamp of the previous timing step, in milliseconds
	pub last_tick_ms: i64,
	/// Remaining display time of the current frame, in milliseconds
	pub timer_ms: i64,
	/// Accumulation buffers for layered color mask / masked replace
	pub lcm_buffer_planes: Vec<Vec<u8>>,
	/// Accumulated replace mask (masked replace only)
	pub replace_mask: Vec<u8>,
}

impl FrameSeq {
	/// Parses one sequence from the stream.
	///
	/// `offset` must be the stream position before the sequence's name-length
	/// field; it is the token mappings use to identify the sequence.
	pub(crate) fn parse(
		reader: &mut ByteReader<'_>,
		file_version: u16,
		offset: u32,
	) -> Result<Self, VniFileError> {
		let name_len = reader.read_u16_be()?;
		let name = if name_len > 0 {
			String::from_utf8_lossy(reader.bytes(name_len as usize)?).into_owned()
		} else {
			"<undefined>".to_string()
		};

		// Editor-only header fields: cycles, hold cycles, clock geometry,
		// refresh delay, type, fsk.
		reader.skip(2 + 2 + 2 + 1 + 1 + 2 + 2 + 2 + 1 + 1)?;

		let mut num_frames = i32::from(reader.read_u16_be()? as i16);
		if num_frames < 0 {
			num_frames += 65536;
		}

		if file_version >= 2 {
			reader.skip(2)?;
			let num_colors = reader.read_u16_be()?;
			reader.skip(num_colors as usize * 3)?;
		}
		if file_version >= 3 {
			reader.skip(1)?; // edit mode
		}

		let size = if file_version >= 4 {
			let width = u32::from(reader.read_u16_be()?);
			let height = u32::from(reader.read_u16_be()?);
			Dimensions::new(width, height)
		} else {
			Dimensions::default()
		};

		let mut masks = Vec::new();
		if file_version >= 5 {
			let num_masks = reader.read_u16_be()?;
			masks.reserve(num_masks as usize);
			for _ in 0..num_masks {
				reader.skip(1)?; // locked
				let mask_len = reader.read_u16_be()?;
				let mut mask = reader.bytes(mask_len as usize)?.to_vec();
				plane::reverse_bytes(&mut mask);
				masks.push(mask);
			}
		}
		if file_version >= 6 {
			reader.skip(1)?; // compiled animation
			let compiled_len = reader.read_u16_be()?;
			reader.skip(compiled_len as usize)?;
			reader.skip(4)?; // start frame
		}

		let mut frames = Vec::with_capacity(num_frames as usize);
		let mut duration_ms = 0u32;
		for _ in 0..num_frames {
			let plane_len = reader.read_u16_be()? as usize;
			let delay_ms = u32::from(reader.read_u16_be()?);
			let hash = if file_version >= 4 { reader.read_u32_be()? } else { 0 };
			let bit_length = reader.read_u8()?;
			let compressed = file_version >= 3 && reader.read_u8()? != 0;

			let mut frame = AnimationFrame {
				time_offset_ms: duration_ms,
				delay_ms,
				bit_length,
				planes: Vec::with_capacity(bit_length as usize),
				mask: None,
				hash,
			};

			if compressed {
				let compressed_len = reader.read_u32_be()? as usize;
				let compressed_bytes = reader.bytes(compressed_len)?;
				let decompressed = heatshrink::decompress(compressed_bytes, 10, 5)?;
				let mut group = ByteReader::new(&decompressed, FileType::Vni);
				read_plane_group(&mut group, &mut frame, plane_len)?;
			} else {
				read_plane_group(reader, &mut frame, plane_len)?;
			}

			duration_ms += frame.delay_ms;
			frames.push(frame);
		}

		Ok(Self {
			name,
			offset,
			frames,
			duration_ms,
			size,
			masks,
			switch_mode: SwitchMode::Palette,
			is_running: false,
			frame_index: 0,
			last_tick_ms: 0,
			timer_ms: 0,
			lcm_buffer_planes: Vec::new(),
			replace_mask: Vec::new(),
		})
	}
}

/// Reads `bit_length` plane group entries, sorting the 0x6D entry into the
/// frame mask. All bytes are bit-reversed into runtime order.
fn read_plane_group(
	reader: &mut ByteReader<'_>,
	frame: &mut AnimationFrame,
	plane_len: usize,
) -> Result<(), VniFileError> {
	for _ in 0..frame.bit_length {
		let marker = reader.read_u8()?;
		let mut data = reader.bytes(plane_len)?.to_vec();
		plane::reverse_bytes(&mut data);
		if marker == MASK_MARKER {
			frame.mask = Some(data);
		} else {
			frame.planes.push(AnimationPlane {
				marker,
				data,
			});
		}
	}
	Ok(())
}

impl fmt::Display for FrameSeq {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} @{} ({} frames, {}, {}ms)",
			self.name,
			self.offset,
			self.frames.len(),
			self.size,
			self.duration_ms
		)
	}
}
