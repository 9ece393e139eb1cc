//! The colorizer runtime.
//!
//! A [`Context`] owns one parsed PAL file and optionally one VNI file and
//! colorizes a stream of indexed frames against them. Each call to
//! [`Context::colorize`] splits the input into bit planes, runs the trigger
//! pass, renders either the active animation or a plain palette frame, and
//! leaves the result in the reusable [`OutputFrame`].
//!
//! The engine is single-threaded and time only advances when `colorize` is
//! called: it samples a monotonic millisecond clock, and every deadline in
//! the engine (frame delays, palette reset) is an absolute millisecond value
//! on that clock. [`Context::colorize_at`] takes the timestamp as a parameter
//! so playback timing can be driven deterministically.
//!
//! # Usage Examples
//!
//! ```no_run
//! use std::path::Path;
//! use vni_types::colorize::Context;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ctx = Context::load_from_paths(
//! 	Some(Path::new("game.pal")),
//! 	Some(Path::new("game.vni")),
//! 	None,
//! 	None,
//! )?;
//!
//! let frame = vec![0u8; 128 * 32];
//! if ctx.colorize(&frame, 128, 32, 2) {
//! 	let out = ctx.frame();
//! 	println!("{}x{} @ {} bpp", out.width(), out.height(), out.bit_length());
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::Instant;

use log::{error, warn};

use crate::dimensions::Dimensions;
use crate::file::{pal, vni, VniFileError};
use crate::plane;
use crate::scaler::ScalerMode;

mod output;
mod playback;
mod trigger;

pub use output::OutputFrame;

/// Sentinel pixels announcing an embedded palette switch in 4-bit frames.
const EMBEDDED_SENTINEL: [u8; 4] = [0x08, 0x09, 0x0A, 0x0B];

/// One colorizer instance.
///
/// Owns the parsed files; the active sequence and palettes are positions into
/// the owning containers. Multiple contexts may coexist without interaction.
#[derive(Debug)]
pub struct Context {
	pal: pal::File,
	vni: Option<vni::File>,
	output: OutputFrame,
	scaler_mode: ScalerMode,

	active_seq: Option<usize>,
	palette: Option<usize>,
	default_palette: Option<usize>,
	last_embedded_palette: Option<usize>,
	reset_embedded: bool,
	palette_reset_at: Option<i64>,

	epoch: Instant,
}

impl Context {
	/// Creates a context from parsed files.
	///
	/// The active palette starts as the PAL file's default palette; without
	/// any palette the context produces no frames.
	pub fn new(pal: pal::File, vni: Option<vni::File>) -> Self {
		let default_palette = pal.default_palette_index();
		Self {
			pal,
			vni,
			output: OutputFrame::default(),
			scaler_mode: ScalerMode::None,
			active_seq: None,
			palette: default_palette,
			default_palette,
			last_embedded_palette: None,
			reset_embedded: false,
			palette_reset_at: None,
			epoch: Instant::now(),
		}
	}

	/// Loads a context from file paths.
	///
	/// A PAL path is required; the VNI path is optional. `pac_path` and
	/// `vni_key` are accepted for API compatibility only: encrypted PAC
	/// bundles are not supported, so a provided PAC path is logged and
	/// ignored.
	///
	/// # Errors
	///
	/// Returns [`VniFileError::MissingPaletteFile`] when no PAL path is given
	/// and any parse or I/O error from the files themselves.
	pub fn load_from_paths(
		pal_path: Option<&Path>,
		vni_path: Option<&Path>,
		pac_path: Option<&Path>,
		vni_key: Option<&str>,
	) -> Result<Self, VniFileError> {
		if let Some(pac) = pac_path {
			error!("encrypted PAC files are not supported; ignoring {}", pac.display());
		}
		let _ = vni_key;

		let Some(pal_path) = pal_path else {
			return Err(VniFileError::MissingPaletteFile);
		};
		let pal = pal::File::open(pal_path)?;
		let vni = match vni_path {
			Some(path) => Some(vni::File::open(path)?),
			None => None,
		};

		Ok(Self::new(pal, vni))
	}

	/// The parsed PAL file.
	#[inline]
	pub fn pal(&self) -> &pal::File {
		&self.pal
	}

	/// The parsed VNI file, when one was loaded.
	#[inline]
	pub fn vni(&self) -> Option<&vni::File> {
		self.vni.as_ref()
	}

	/// The last output frame. Valid until the next `colorize` call.
	#[inline]
	pub fn frame(&self) -> &OutputFrame {
		&self.output
	}

	/// Selects the upscaler. May be changed at any time.
	#[inline]
	pub fn set_scaler_mode(&mut self, mode: ScalerMode) {
		self.scaler_mode = mode;
	}

	/// The currently selected upscaler.
	#[inline]
	pub fn scaler_mode(&self) -> ScalerMode {
		self.scaler_mode
	}

	/// True iff the PAL file carries masks and the first one covers a 128×32
	/// plane.
	#[inline]
	pub fn has_128x32_animation(&self) -> bool {
		self.pal.has_128x32_masks()
	}

	/// Position of the palette selected by the most recent embedded switch.
	#[inline]
	pub fn last_embedded_palette(&self) -> Option<usize> {
		self.last_embedded_palette
	}

	/// Colorizes one input frame against the monotonic clock.
	///
	/// Returns true when an output frame is available through
	/// [`Context::frame`].
	pub fn colorize(&mut self, frame: &[u8], width: u32, height: u32, bit_length: u8) -> bool {
		let now_ms = self.epoch.elapsed().as_millis() as i64;
		self.colorize_at(frame, width, height, bit_length, now_ms)
	}

	/// Colorizes one input frame at an explicit timestamp.
	///
	/// `now_ms` must be monotonic across calls; it drives frame delays and
	/// the palette-reset deadline.
	///
	/// # Arguments
	///
	/// * `frame` - Indexed pixels in `0..(1 << bit_length)`, `width * height`
	///   bytes
	/// * `width` - Frame width in pixels
	/// * `height` - Frame height in pixels
	/// * `bit_length` - Input bit depth (1..=8)
	/// * `now_ms` - Timestamp in milliseconds on a steady clock
	pub fn colorize_at(
		&mut self,
		frame: &[u8],
		width: u32,
		height: u32,
		bit_length: u8,
		now_ms: i64,
	) -> bool {
		if self.palette.is_none() {
			return false;
		}

		let dim = Dimensions::new(width, height);
		if !(1..=8).contains(&bit_length) || frame.len() != dim.surface() {
			warn!(
				"colorize: rejecting frame of {} bytes at {} with bit length {}",
				frame.len(),
				dim,
				bit_length
			);
			return false;
		}

		self.output.has_frame = false;

		self.apply_embedded_switch(frame, bit_length);

		let planes = plane::split(frame, width, height, bit_length);

		if !self.pal.mappings().is_empty() {
			self.trigger_animation(dim, &planes, now_ms);
		}

		let mut rendered = false;
		if let (Some(index), Some(vni)) = (self.active_seq, self.vni.as_mut()) {
			if let Some(seq) = vni.animation_mut(index) {
				if seq.is_running {
					playback::render_animation(
						seq,
						&mut self.output,
						self.scaler_mode,
						dim,
						&planes,
						now_ms,
					);
					rendered = true;
				}
			}
		}
		if !rendered {
			playback::render_plain(
				&mut self.output,
				self.vni.as_ref(),
				self.scaler_mode,
				dim,
				planes,
			);
		}

		self.maybe_reset_palette(now_ms);

		if self.output.has_frame {
			if let Some(palette) = self.palette.and_then(|i| self.pal.palettes().get(i)) {
				let colors = 1usize << self.output.bit_length.min(8);
				self.output.palette = palette.expand(colors);
			}
		}

		self.output.has_frame
	}

	/// The active sequence, when one is scheduled.
	fn active_sequence(&self) -> Option<&vni::FrameSeq> {
		self.vni.as_ref()?.animation(self.active_seq?)
	}

	/// Embedded palette switching for 4-bit frames.
	///
	/// Only applies when more than one palette is defined and no animation
	/// bundle is loaded. A frame opening with the sentinel pixels selects
	/// palette `frame[5] * 8 + frame[4]`; when the sentinel disappears again
	/// the default palette is restored unless the selected palette was
	/// persistent.
	fn apply_embedded_switch(&mut self, frame: &[u8], bit_length: u8) {
		if bit_length != 4 || self.pal.palettes().len() <= 1 || self.vni.is_some() {
			return;
		}
		if frame.len() < 6 {
			return;
		}

		if frame[..4] == EMBEDDED_SENTINEL {
			let new_palette = frame[5] as usize * 8 + frame[4] as usize;
			if new_palette < self.pal.palettes().len() {
				self.palette = Some(new_palette);
				if !self.pal.palettes()[new_palette].is_persistent() {
					self.reset_embedded = true;
				}
				self.last_embedded_palette = Some(new_palette);
			}
		} else if self.reset_embedded {
			if self.default_palette.is_some() {
				self.palette = self.default_palette;
			}
			self.reset_embedded = false;
		}
	}

	/// Restores the default palette once a timed palette switch expires.
	fn maybe_reset_palette(&mut self, now_ms: i64) {
		if let Some(deadline) = self.palette_reset_at {
			if now_ms >= deadline {
				if self.default_palette.is_some() {
					self.palette = self.default_palette;
				}
				self.palette_reset_at = None;
			}
		}
	}
}
