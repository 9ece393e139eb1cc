//! VNI inspection utility.
//!
//! Provides two subcommands:
//! - `info`: list the animation sequences of a `.vni` file.
//! - `export`: render one sequence's frames to grayscale PNGs.

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use vni_rs::prelude::*;
use vni_rs::vni_types::plane;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Info(opts) => run_info(opts),
		Command::Export(opts) => run_export(opts),
	}
}

#[derive(Parser)]
#[command(name = "vni_utils")]
#[command(author = "vni-rs project")]
#[command(version)]
#[command(about = "Inspect animation (.vni) files", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// List every animation sequence in the file
	Info(InfoArgs),
	/// Export one sequence's frames as PNG images
	Export(ExportArgs),
}

#[derive(Args)]
struct InfoArgs {
	/// Path to a .vni file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Print per-frame details
	#[arg(short, long, default_value_t = false)]
	verbose: bool,
}

#[derive(Args)]
struct ExportArgs {
	/// Path to a .vni file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Sequence position to export (see `info`)
	#[arg(short, long, value_name = "INDEX", default_value_t = 0)]
	sequence: usize,

	/// Output directory
	#[arg(short, long, value_name = "DIR", default_value = "frames")]
	out: PathBuf,
}

fn run_info(args: InfoArgs) -> Result<()> {
	let vni = VniFile::open(&args.file)
		.with_context(|| format!("cannot load {}", args.file.display()))?;

	println!("{vni}");
	for (i, seq) in vni.animations().iter().enumerate() {
		println!("  [{i:3}] {seq}");
		if args.verbose {
			for frame in &seq.frames {
				println!("        {frame} hash {:08X}", frame.hash);
			}
		}
	}
	Ok(())
}

fn run_export(args: ExportArgs) -> Result<()> {
	let vni = VniFile::open(&args.file)
		.with_context(|| format!("cannot load {}", args.file.display()))?;

	let Some(seq) = vni.animation(args.sequence) else {
		bail!("sequence {} out of range ({} available)", args.sequence, vni.animations().len());
	};

	std::fs::create_dir_all(&args.out)?;
	let (width, height) = (seq.size.width, seq.size.height);

	for (i, frame) in seq.frames.iter().enumerate() {
		let planes: Vec<Vec<u8>> = frame.planes.iter().map(|p| p.data.clone()).collect();
		let indexed = plane::join(&planes, width, height);

		// Spread the index range over the 8-bit grayscale range
		let depth = (planes.len() as u32).min(8);
		let scale = if depth > 0 { 255 / ((1u32 << depth) - 1).max(1) } else { 0 };
		let pixels: Vec<u8> = indexed.iter().map(|&v| (u32::from(v) * scale) as u8).collect();

		let image = image::GrayImage::from_raw(width, height, pixels)
			.context("frame dimensions do not match plane data")?;
		let path = args.out.join(format!("frame_{i:04}.png"));
		image.save(&path).with_context(|| format!("cannot write {}", path.display()))?;
		info!("wrote {}", path.display());
	}

	println!("exported {} frames to {}", seq.frames.len(), args.out.display());
	Ok(())
}
