//! PAL inspection utility.
//!
//! Prints the palettes, checksum mappings and detection masks of a `.pal`
//! file.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use vni_rs::prelude::*;

#[derive(Parser)]
#[command(name = "pal_utils")]
#[command(author = "vni-rs project")]
#[command(version)]
#[command(about = "Inspect palette (.pal) files", long_about = None)]
struct Cli {
	/// Path to a .pal file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Print every palette color
	#[arg(short, long, default_value_t = false)]
	colors: bool,

	/// Print every mapping entry
	#[arg(short, long, default_value_t = false)]
	mappings: bool,
}

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let pal = PalFile::open(&cli.file)
		.with_context(|| format!("cannot load {}", cli.file.display()))?;

	println!("{pal}");
	println!(
		"default palette: {}",
		pal.default_palette_index().map_or("none".to_string(), |i| i.to_string())
	);
	println!("128x32 animation masks: {}", pal.has_128x32_masks());

	println!("\npalettes:");
	for palette in pal.palettes() {
		println!("  {palette}");
		if cli.colors {
			for i in 0..palette.color_count() {
				let rgb = &palette.colors[i * 3..i * 3 + 3];
				println!("    [{i:3}] #{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2]);
			}
		}
	}

	if cli.mappings {
		let mut entries: Vec<&Mapping> = pal.mappings().values().collect();
		entries.sort_by_key(|mapping| mapping.checksum);
		println!("\nmappings:");
		for mapping in entries {
			let target = if mapping.is_animation() {
				format!("offset {}", mapping.offset)
			} else if mapping.duration > 0 {
				format!("{} ms", mapping.duration)
			} else {
				"indefinite".to_string()
			};
			println!("  {mapping} {target}");
		}
	} else {
		println!("\nmappings: {}", pal.mappings().len());
	}

	println!("masks:");
	for (i, mask) in pal.masks().iter().enumerate() {
		let set_bits: u32 = mask.iter().map(|b| b.count_ones()).sum();
		println!("  [{i}] {} bytes, {set_bits} bits set", mask.len());
	}

	Ok(())
}
