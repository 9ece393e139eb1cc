//! The trigger engine: recognizing input planes and starting animations.
//!
//! Every input frame is split into planes and each plane is checksummed,
//! first bare and then under every PAL mask, against the mapping table. A hit
//! either swaps the palette or starts a sequence; while a hash-driven
//! sequence is active, the remaining planes feed its frame detection instead.

use log::debug;

use crate::colorize::{playback, Context};
use crate::dimensions::Dimensions;
use crate::file::pal::{Mapping, SwitchMode};
use crate::file::vni::FrameSeq;
use crate::plane;

impl Context {
	/// Runs the trigger pass for one input frame.
	///
	/// Iterates the planes in index order. A non-event hit starts its
	/// animation; unless the new sequence accumulates (layered color mask /
	/// masked replace), the switch is single-shot and the pass ends. While an
	/// accumulating or hash-driven sequence is active, each plane is routed
	/// into its detection step. The `clear` flag threads across planes of the
	/// same input frame so the first LCM hit resets the accumulation buffers.
	pub(crate) fn trigger_animation(&mut self, dim: Dimensions, planes: &[Vec<u8>], now_ms: i64) {
		let mut clear = true;
		for input in planes {
			let no_mask_crc = plane::checksum(input, false);
			if let Some(mapping) = self.find_mapping(input, no_mask_crc) {
				self.start_animation(mapping, dim, planes, now_ms);
				if let Some(seq) = self.active_sequence() {
					if !matches!(
						seq.switch_mode,
						SwitchMode::LayeredColorMask | SwitchMode::MaskedReplace
					) {
						return;
					}
				}
			}

			if let Some(index) = self.active_seq {
				let Some(vni) = self.vni.as_mut() else {
					continue;
				};
				let Some(seq) = vni.animation_mut(index) else {
					continue;
				};
				match seq.switch_mode {
					SwitchMode::LayeredColorMask | SwitchMode::MaskedReplace => {
						clear = detect_lcm(seq, input, no_mask_crc, clear);
					}
					SwitchMode::Follow | SwitchMode::FollowReplace => {
						detect_follow(seq, input, no_mask_crc, self.pal.masks());
					}
					_ => {}
				}
			}
		}
	}

	/// Looks the plane up in the mapping table: bare checksum first, then one
	/// masked checksum per PAL mask, in file order.
	fn find_mapping(&self, input: &[u8], no_mask_crc: u32) -> Option<Mapping> {
		if let Some(mapping) = self.pal.mapping(no_mask_crc) {
			return Some(*mapping);
		}
		for mask in self.pal.masks() {
			let crc = plane::checksum_with_mask(input, mask, false);
			if let Some(mapping) = self.pal.mapping(crc) {
				return Some(*mapping);
			}
		}
		None
	}

	/// Applies a matched mapping: palette switch, reset deadline, and for
	/// animation modes the per-mode sequence start plus one immediate render.
	pub(crate) fn start_animation(
		&mut self,
		mapping: Mapping,
		dim: Dimensions,
		planes: &[Vec<u8>],
		now_ms: i64,
	) {
		if mapping.mode == SwitchMode::Event {
			return;
		}

		// Re-triggering the running accumulation sequence is a no-op.
		if let Some(seq) = self.active_sequence() {
			if matches!(
				seq.switch_mode,
				SwitchMode::LayeredColorMask | SwitchMode::MaskedReplace
			) && mapping.mode == seq.switch_mode
				&& mapping.offset == seq.offset
			{
				return;
			}
		}

		if let Some(index) = self.active_seq.take() {
			if let Some(vni) = self.vni.as_mut() {
				if let Some(seq) = vni.animation_mut(index) {
					seq.is_running = false;
				}
			}
		}

		let Some(palette_index) = self.pal.find_palette(mapping.palette_index) else {
			return;
		};
		self.palette = Some(palette_index);
		self.palette_reset_at = None;

		if !mapping.is_animation() {
			if mapping.duration > 0 {
				self.palette_reset_at = Some(now_ms + i64::from(mapping.duration));
			}
			return;
		}

		let Some(vni) = self.vni.as_mut() else {
			return;
		};
		let Some(index) = vni.find_animation(mapping.offset) else {
			return;
		};
		let Some(seq) = vni.animation_mut(index) else {
			return;
		};
		debug!("trigger: starting {} in {} mode", seq.name, mapping.mode);

		seq.switch_mode = mapping.mode;
		seq.frame_index = 0;
		seq.is_running = true;
		match mapping.mode {
			SwitchMode::ColorMask
			| SwitchMode::Follow
			| SwitchMode::Replace
			| SwitchMode::FollowReplace => {
				seq.last_tick_ms = now_ms;
				seq.timer_ms = 0;
			}
			SwitchMode::LayeredColorMask | SwitchMode::MaskedReplace => start_lcm(seq),
			_ => {}
		}
		self.active_seq = Some(index);

		playback::render_animation(seq, &mut self.output, self.scaler_mode, dim, planes, now_ms);
	}
}

/// Allocates zeroed accumulation buffers: one per plane of the first frame,
/// each covering the sequence surface, plus the replace mask for masked
/// replace.
fn start_lcm(seq: &mut FrameSeq) {
	seq.lcm_buffer_planes.clear();
	seq.replace_mask.clear();
	let Some(first) = seq.frames.first() else {
		return;
	};
	let plane_len = seq.size.plane_len();
	seq.lcm_buffer_planes = vec![vec![0u8; plane_len]; first.planes.len()];
	if seq.switch_mode == SwitchMode::MaskedReplace {
		seq.replace_mask = vec![0u8; plane_len];
	}
}

/// Hash-driven frame selection for follow modes: the first frame whose stored
/// hash matches the plane's bare checksum or any PAL-masked checksum becomes
/// the current frame.
fn detect_follow(seq: &mut FrameSeq, input: &[u8], no_mask_crc: u32, pal_masks: &[Vec<u8>]) {
	let hit = seq.frames.iter().position(|frame| {
		frame.hash == no_mask_crc
			|| pal_masks
				.iter()
				.any(|mask| plane::checksum_with_mask(input, mask, false) == frame.hash)
	});
	if let Some(index) = hit {
		seq.frame_index = index;
	}
}

/// Accumulation step for layered color mask / masked replace.
///
/// Checks the plane's bare checksum and one checksum per sequence mask
/// against every frame hash. The first hit of the input frame zeroes the
/// buffers (`clear` flag, threaded across planes); every hit ORs the matched
/// frame's planes into the buffers and, for masked replace, its mask into the
/// replace mask.
fn detect_lcm(seq: &mut FrameSeq, input: &[u8], no_mask_crc: u32, clear: bool) -> bool {
	let mut clear = clear;
	for k in 0..=seq.masks.len() {
		let checksum = if k == 0 {
			no_mask_crc
		} else {
			plane::checksum_with_mask(input, &seq.masks[k - 1], false)
		};

		for frame_index in 0..seq.frames.len() {
			if seq.frames[frame_index].hash != checksum {
				continue;
			}
			if clear {
				for buffer in &mut seq.lcm_buffer_planes {
					plane::clear(buffer);
				}
				if seq.switch_mode == SwitchMode::MaskedReplace {
					plane::clear(&mut seq.replace_mask);
				}
				clear = false;
			}
			for (i, animation_plane) in seq.frames[frame_index].planes.iter().enumerate() {
				if let Some(buffer) = seq.lcm_buffer_planes.get_mut(i) {
					plane::or_into(&animation_plane.data, buffer);
				}
			}
			if seq.switch_mode == SwitchMode::MaskedReplace {
				if let Some(mask) = &seq.frames[frame_index].mask {
					plane::or_into(mask, &mut seq.replace_mask);
				}
			}
		}
	}
	clear
}
