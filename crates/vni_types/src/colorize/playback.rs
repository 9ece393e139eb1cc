//! The playback engine: per-mode frame advancement and compositing.
//!
//! Color mask and replace sequences advance on a millisecond timer; follow,
//! follow-replace and the two accumulation modes are driven entirely by the
//! trigger engine and render whatever frame (or buffer state) is current.

use crate::colorize::OutputFrame;
use crate::dimensions::Dimensions;
use crate::file::pal::SwitchMode;
use crate::file::vni::{self, FrameSeq};
use crate::plane;
use crate::scaler::{self, ScalerMode};

/// Renders the active sequence for one input frame, advancing its state.
pub(crate) fn render_animation(
	seq: &mut FrameSeq,
	output: &mut OutputFrame,
	scaler_mode: ScalerMode,
	dim: Dimensions,
	planes: &[Vec<u8>],
	now_ms: i64,
) {
	if matches!(seq.switch_mode, SwitchMode::ColorMask | SwitchMode::Replace) {
		let elapsed = now_ms - seq.last_tick_ms;
		seq.last_tick_ms = now_ms;
		seq.timer_ms -= elapsed;
		if seq.timer_ms > 0 {
			// Previous frame is still on its delay: re-render it without
			// advancing.
			let current = seq.frame_index;
			seq.frame_index = current.saturating_sub(1);
			output_frame(seq, output, scaler_mode, dim, planes);
			seq.frame_index = current;
			return;
		}
	}

	if seq.frame_index < seq.frames.len() {
		if matches!(
			seq.switch_mode,
			SwitchMode::LayeredColorMask
				| SwitchMode::MaskedReplace
				| SwitchMode::Follow
				| SwitchMode::FollowReplace
		) {
			// Trigger-driven modes never advance on their own.
			output_frame(seq, output, scaler_mode, dim, planes);
			return;
		}

		seq.timer_ms += i64::from(seq.frames[seq.frame_index].delay_ms);
		output_frame(seq, output, scaler_mode, dim, planes);
		seq.frame_index += 1;
		return;
	}

	// Sequence exhausted: fall back to a plain palette render and stop.
	seq.switch_mode = SwitchMode::Palette;
	output_frame(seq, output, scaler_mode, dim, planes);
	seq.is_running = false;
	seq.frame_index = 0;
}

/// Composes the output planes for the sequence's current mode and writes the
/// joined frame into the output buffer.
pub(crate) fn output_frame(
	seq: &FrameSeq,
	output: &mut OutputFrame,
	scaler_mode: ScalerMode,
	dim: Dimensions,
	planes: &[Vec<u8>],
) {
	let outplanes = match seq.switch_mode {
		SwitchMode::ColorMask | SwitchMode::Follow => render_color_mask(seq, planes),
		SwitchMode::Replace | SwitchMode::FollowReplace => seq
			.frames
			.get(seq.frame_index)
			.map(|frame| frame.planes.iter().map(|p| p.data.clone()).collect())
			.unwrap_or_default(),
		SwitchMode::LayeredColorMask | SwitchMode::MaskedReplace => {
			render_lcm(seq, dim, planes.to_vec(), scaler_mode)
		}
		_ => planes.to_vec(),
	};

	// A plane of surface/2 bytes is pre-upscaled content: report doubled
	// dimensions.
	let out_dim = if outplanes.first().is_some_and(|p| p.len() == dim.surface() / 2) {
		dim.doubled()
	} else {
		dim
	};

	output.data = plane::join(&outplanes, out_dim.width, out_dim.height);
	output.dimensions = out_dim;
	output.bit_length = outplanes.len() as u8;
	output.has_frame = true;
}

/// Color-mask composition: the input keeps its lower planes, the sequence
/// frame supplies the upper ones.
fn render_color_mask(seq: &FrameSeq, vpm: &[Vec<u8>]) -> Vec<Vec<u8>> {
	let Some(frame) = seq.frames.get(seq.frame_index) else {
		return vpm.to_vec();
	};
	let frame_count = frame.planes.len();
	if frame_count < 4 {
		return vpm.to_vec();
	}

	if vpm.len() == frame_count {
		// Same depth: input planes except the top two, which the sequence
		// overrides.
		let split = frame_count.saturating_sub(2);
		let mut out: Vec<Vec<u8>> = vpm[..split].to_vec();
		for animation_plane in &frame.planes[split..] {
			out.push(animation_plane.data.clone());
		}
		out
	} else {
		// Depths differ: keep all input planes, extend with the sequence's
		// remaining upper planes.
		let mut out = vpm.to_vec();
		for animation_plane in frame.planes.iter().skip(vpm.len()) {
			out.push(animation_plane.data.clone());
		}
		out
	}
}

/// Layered-color-mask / masked-replace composition against the accumulation
/// buffers.
fn render_lcm(
	seq: &FrameSeq,
	dim: Dimensions,
	mut planes: Vec<Vec<u8>>,
	scaler_mode: ScalerMode,
) -> Vec<Vec<u8>> {
	let num_planes = seq.lcm_buffer_planes.len();

	match seq.switch_mode {
		SwitchMode::LayeredColorMask => {
			let mut out = Vec::with_capacity(num_planes);
			for i in 0..num_planes {
				if let Some(input) = planes.get(i) {
					out.push(input.clone());
				} else {
					out.push(seq.lcm_buffer_planes[i].clone());
				}
			}
			out
		}
		SwitchMode::MaskedReplace => {
			let needs_upscale = match (planes.first(), seq.lcm_buffer_planes.first()) {
				(Some(input), Some(buffer)) => buffer.len() == input.len() * 4,
				_ => false,
			};
			if needs_upscale {
				let indexed = plane::join(&planes, dim.width, dim.height);
				let scaled = if scaler_mode == ScalerMode::Scale2x {
					scaler::scale2x(&indexed, dim.width, dim.height)
				} else {
					scaler::scale_double(&indexed, dim.width, dim.height)
				};
				let scaled_dim = dim.doubled();
				planes = plane::split(
					&scaled,
					scaled_dim.width,
					scaled_dim.height,
					planes.len() as u8,
				);
			}

			let mut out = Vec::with_capacity(num_planes);
			for i in 0..num_planes {
				if let Some(input) = planes.get(i) {
					out.push(plane::combine_with_mask(
						&seq.lcm_buffer_planes[i],
						input,
						&seq.replace_mask,
					));
				} else {
					out.push(seq.lcm_buffer_planes[i].clone());
				}
			}
			out
		}
		_ => planes,
	}
}

/// Renders an unrecognized frame: current palette only, upscaled when the
/// input is exactly half the bundle's declared size and a scaler is selected.
pub(crate) fn render_plain(
	output: &mut OutputFrame,
	vni: Option<&vni::File>,
	scaler_mode: ScalerMode,
	dim: Dimensions,
	mut planes: Vec<Vec<u8>>,
) {
	let mut out_dim = dim;
	if let Some(vni) = vni {
		let target = vni.dimensions();
		let half_size = dim.width * 2 == target.width && dim.height * 2 == target.height;
		if half_size && scaler_mode != ScalerMode::None {
			let indexed = plane::join(&planes, dim.width, dim.height);
			let scaled = if scaler_mode == ScalerMode::Scale2x {
				scaler::scale2x(&indexed, dim.width, dim.height)
			} else {
				scaler::scale_double(&indexed, dim.width, dim.height)
			};
			out_dim = dim.doubled();
			planes = plane::split(&scaled, out_dim.width, out_dim.height, planes.len() as u8);
		}
	}

	output.data = plane::join(&planes, out_dim.width, out_dim.height);
	output.dimensions = out_dim;
	output.bit_length = planes.len() as u8;
	output.has_frame = true;
}
