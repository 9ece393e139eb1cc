//! End-to-end colorizer tests over the public API.
//!
//! All timing-sensitive tests drive `Context::colorize_at` with explicit
//! millisecond timestamps instead of the wall clock.


use support::{
	build_pal, build_vni, one_bit_frame, test_plane, two_bit_frame, FrameSpec, MappingSpec,
	PaletteSpec, SeqSpec,
};
use vni_rs::prelude::*;
use vni_rs::vni_types::plane;

fn init_logger() {
	let _ = env_logger::Builder::from_env(
		env_logger::Env::default().default_filter_or("info"),
	)
	.is_test(true)
	.try_init();
}

fn default_palette() -> PaletteSpec {
	PaletteSpec {
		index: 0,
		kind: 1,
		colors: vec![[0, 0, 0], [255, 255, 255]],
	}
}

#[test]
fn empty_pal_loads_but_produces_no_frames() {
	init_logger();
	let pal = PalFile::from_bytes(&build_pal(&[], &[], &[])).unwrap();
	assert_eq!(pal.default_palette_index(), None);

	let mut ctx = Context::new(pal, None);
	assert!(!ctx.colorize_at(&vec![0u8; 128 * 32], 128, 32, 2, 0));
	assert!(!ctx.frame().has_frame());
}

#[test]
fn palette_swap_by_checksum_reverts_after_duration() {
	init_logger();
	let plane_a = test_plane(1);
	let crc = plane::checksum(&plane_a, false);

	let pal_bytes = build_pal(
		&[
			default_palette(),
			PaletteSpec {
				index: 1,
				kind: 0,
				colors: vec![[99, 0, 0], [0, 99, 0]],
			},
		],
		&[MappingSpec {
			checksum: crc,
			mode: 0,
			palette_index: 1,
			value: 500,
		}],
		&[],
	);
	let pal = PalFile::from_bytes(&pal_bytes).unwrap();
	let mut ctx = Context::new(pal, None);

	// Recognized frame switches to palette 1 for 500 ms
	let hit = one_bit_frame(&plane_a);
	assert!(ctx.colorize_at(&hit, 128, 32, 1, 0));
	assert_eq!(ctx.frame().palette(), &[99, 0, 0, 0, 99, 0]);

	// Still switched just before the deadline
	let miss = vec![0u8; 128 * 32];
	assert!(ctx.colorize_at(&miss, 128, 32, 1, 499));
	assert_eq!(ctx.frame().palette(), &[99, 0, 0, 0, 99, 0]);

	// Reverted once the deadline passes
	assert!(ctx.colorize_at(&miss, 128, 32, 1, 520));
	assert_eq!(ctx.frame().palette(), &[0, 0, 0, 255, 255, 255]);
}

#[test]
fn masked_lookup_finds_mapping() {
	init_logger();
	// The mapping is keyed on the checksum of the plane under a mask that
	// blanks its second half.
	let mut mask = vec![0xFFu8; 512];
	for byte in mask.iter_mut().skip(256) {
		*byte = 0;
	}
	let plane_a = test_plane(9);
	let masked_crc = plane::checksum_with_mask(&plane_a, &mask, false);

	let pal_bytes = build_pal(
		&[
			default_palette(),
			PaletteSpec {
				index: 1,
				kind: 0,
				colors: vec![[1, 2, 3], [4, 5, 6]],
			},
		],
		&[MappingSpec {
			checksum: masked_crc,
			mode: 0,
			palette_index: 1,
			value: 0,
		}],
		&[mask],
	);
	let pal = PalFile::from_bytes(&pal_bytes).unwrap();
	assert!(pal.has_128x32_masks());

	let mut ctx = Context::new(pal, None);
	assert!(ctx.has_128x32_animation());

	// The bare checksum misses; the masked fallback hits and switches
	// indefinitely (duration 0).
	let frame = one_bit_frame(&plane_a);
	assert!(ctx.colorize_at(&frame, 128, 32, 1, 0));
	assert_eq!(ctx.frame().palette(), &[1, 2, 3, 4, 5, 6]);

	let miss = vec![0u8; 128 * 32];
	assert!(ctx.colorize_at(&miss, 128, 32, 1, 10_000));
	assert_eq!(ctx.frame().palette(), &[1, 2, 3, 4, 5, 6]);
}

#[test]
fn embedded_palette_switch_selects_nibble_pair() {
	init_logger();
	let palettes: Vec<PaletteSpec> = (0..4)
		.map(|i| PaletteSpec {
			index: i,
			kind: u8::from(i == 0),
			colors: vec![[i as u8 * 10; 3]; 2],
		})
		.collect();
	let pal = PalFile::from_bytes(&build_pal(&palettes, &[], &[])).unwrap();
	let mut ctx = Context::new(pal, None);

	let mut frame = vec![0u8; 128 * 32];
	frame[..6].copy_from_slice(&[0x08, 0x09, 0x0A, 0x0B, 0x03, 0x00]);
	assert!(ctx.colorize_at(&frame, 128, 32, 4, 0));
	// Palette 0*8 + 3 = 3 is active
	assert_eq!(&ctx.frame().palette()[..3], &[30, 30, 30]);

	// Sentinel gone: the transient switch reverts to the default
	let plain = vec![0u8; 128 * 32];
	assert!(ctx.colorize_at(&plain, 128, 32, 4, 16));
	assert_eq!(&ctx.frame().palette()[..3], &[0, 0, 0]);
}

#[test]
fn color_mask_overlays_upper_planes() {
	init_logger();
	let in0 = test_plane(10);
	let in1 = test_plane(20);
	let crc = plane::checksum(&in0, false);

	let seq_planes: Vec<Vec<u8>> = (0..4).map(|i| test_plane(40 + i)).collect();
	let (vni_bytes, offsets) =
		build_vni(1, &[SeqSpec::new("overlay", vec![FrameSpec::new(25, 0, seq_planes.clone())])]);
	let vni = VniFile::from_bytes(&vni_bytes).unwrap();

	let pal_bytes = build_pal(
		&[default_palette()],
		&[MappingSpec {
			checksum: crc,
			mode: 2,
			palette_index: 0,
			value: offsets[0],
		}],
		&[],
	);
	let pal = PalFile::from_bytes(&pal_bytes).unwrap();
	let mut ctx = Context::new(pal, Some(vni));

	let input = two_bit_frame(&in0, &in1);
	assert!(ctx.colorize_at(&input, 128, 32, 2, 0));

	let out = ctx.frame();
	assert_eq!(out.bit_length(), 4);
	assert_eq!(out.width(), 128);

	let out_planes = plane::split(out.pixels(), 128, 32, 4);
	assert_eq!(out_planes[0], in0);
	assert_eq!(out_planes[1], in1);
	assert_eq!(out_planes[2], seq_planes[2]);
	assert_eq!(out_planes[3], seq_planes[3]);
}

#[test]
fn color_mask_same_depth_replaces_top_two_planes() {
	init_logger();
	let inputs: Vec<Vec<u8>> = (0..4).map(|i| test_plane(i)).collect();
	let crc = plane::checksum(&inputs[0], false);

	let seq_planes: Vec<Vec<u8>> = (0..4).map(|i| test_plane(80 + i)).collect();
	let (vni_bytes, offsets) =
		build_vni(1, &[SeqSpec::new("enhance", vec![FrameSpec::new(25, 0, seq_planes.clone())])]);
	let vni = VniFile::from_bytes(&vni_bytes).unwrap();

	let pal_bytes = build_pal(
		&[default_palette()],
		&[MappingSpec {
			checksum: crc,
			mode: 2,
			palette_index: 0,
			value: offsets[0],
		}],
		&[],
	);
	let mut ctx = Context::new(PalFile::from_bytes(&pal_bytes).unwrap(), Some(vni));

	let input = plane::join(&inputs, 128, 32);
	assert!(ctx.colorize_at(&input, 128, 32, 4, 0));

	let out_planes = plane::split(ctx.frame().pixels(), 128, 32, 4);
	assert_eq!(out_planes[0], inputs[0]);
	assert_eq!(out_planes[1], inputs[1]);
	assert_eq!(out_planes[2], seq_planes[2]);
	assert_eq!(out_planes[3], seq_planes[3]);
}

#[test]
fn replace_sequence_plays_and_completes() {
	init_logger();
	let in0 = test_plane(5);
	let in1 = test_plane(6);
	let crc = plane::checksum(&in0, false);

	let rep: Vec<Vec<u8>> = vec![test_plane(70), test_plane(71)];
	let (vni_bytes, offsets) =
		build_vni(1, &[SeqSpec::new("cutscene", vec![FrameSpec::new(20, 0, rep.clone())])]);
	let vni = VniFile::from_bytes(&vni_bytes).unwrap();

	let pal_bytes = build_pal(
		&[default_palette()],
		&[MappingSpec {
			checksum: crc,
			mode: 1,
			palette_index: 0,
			value: offsets[0],
		}],
		&[],
	);
	let mut ctx = Context::new(PalFile::from_bytes(&pal_bytes).unwrap(), Some(vni));

	// Trigger: the output is the authored frame, not the input
	let input = two_bit_frame(&in0, &in1);
	assert!(ctx.colorize_at(&input, 128, 32, 2, 0));
	let out_planes = plane::split(ctx.frame().pixels(), 128, 32, 2);
	assert_eq!(out_planes[0], rep[0]);
	assert_eq!(out_planes[1], rep[1]);

	// Within the frame delay the authored frame stays up
	let miss = vec![0u8; 128 * 32];
	assert!(ctx.colorize_at(&miss, 128, 32, 2, 10));
	let out_planes = plane::split(ctx.frame().pixels(), 128, 32, 2);
	assert_eq!(out_planes[0], rep[0]);

	// Past the delay the sequence is exhausted: the engine reverts to a
	// plain palette render within this call
	assert!(ctx.colorize_at(&miss, 128, 32, 2, 50));
	assert_eq!(ctx.frame().pixels(), &miss[..]);

	// And stays plain afterwards
	assert!(ctx.colorize_at(&input, 128, 32, 2, 2_000));
	// (the hit frame retriggers the sequence, so use its planes)
	let out_planes = plane::split(ctx.frame().pixels(), 128, 32, 2);
	assert_eq!(out_planes[0], rep[0]);
}

#[test]
fn follow_sequence_tracks_frame_hashes() {
	init_logger();
	let a0 = test_plane(3);
	let b0 = test_plane(4);
	let hash_a = plane::checksum(&a0, false);
	let hash_b = plane::checksum(&b0, false);

	let f0: Vec<Vec<u8>> = (0..4).map(|i| test_plane(100 + i)).collect();
	let f1: Vec<Vec<u8>> = (0..4).map(|i| test_plane(110 + i)).collect();
	let (vni_bytes, offsets) = build_vni(
		4,
		&[SeqSpec::new(
			"follow",
			vec![FrameSpec::new(0, hash_a, f0.clone()), FrameSpec::new(0, hash_b, f1.clone())],
		)],
	);
	let vni = VniFile::from_bytes(&vni_bytes).unwrap();

	let pal_bytes = build_pal(
		&[default_palette()],
		&[MappingSpec {
			checksum: hash_a,
			mode: 4,
			palette_index: 0,
			value: offsets[0],
		}],
		&[],
	);
	let mut ctx = Context::new(PalFile::from_bytes(&pal_bytes).unwrap(), Some(vni));

	// First input selects frame 0
	let input_a = two_bit_frame(&a0, &vec![0u8; 512]);
	assert!(ctx.colorize_at(&input_a, 128, 32, 2, 0));
	let out_planes = plane::split(ctx.frame().pixels(), 128, 32, 4);
	assert_eq!(out_planes[2], f0[2]);
	assert_eq!(out_planes[3], f0[3]);

	// A new input whose hash matches frame 1 jumps there
	let input_b = two_bit_frame(&b0, &vec![0u8; 512]);
	assert!(ctx.colorize_at(&input_b, 128, 32, 2, 40));
	let out_planes = plane::split(ctx.frame().pixels(), 128, 32, 4);
	assert_eq!(out_planes[0], b0);
	assert_eq!(out_planes[2], f1[2]);
	assert_eq!(out_planes[3], f1[3]);
}

#[test]
fn lcm_accumulates_hits_across_planes() {
	init_logger();
	let a = test_plane(1);
	let b = test_plane(2);
	let hash_a = plane::checksum(&a, false);
	let hash_b = plane::checksum(&b, false);

	let f0: Vec<Vec<u8>> = (0..4).map(|i| test_plane(50 + i)).collect();
	let f1: Vec<Vec<u8>> = (0..4).map(|i| test_plane(60 + i)).collect();
	let (vni_bytes, offsets) = build_vni(
		4,
		&[SeqSpec::new(
			"lcm",
			vec![FrameSpec::new(25, hash_a, f0.clone()), FrameSpec::new(25, hash_b, f1.clone())],
		)],
	);
	let vni = VniFile::from_bytes(&vni_bytes).unwrap();

	let pal_bytes = build_pal(
		&[default_palette()],
		&[MappingSpec {
			checksum: hash_a,
			mode: 5,
			palette_index: 0,
			value: offsets[0],
		}],
		&[],
	);
	let mut ctx = Context::new(PalFile::from_bytes(&pal_bytes).unwrap(), Some(vni));

	// First input hits frame 0 only: the buffers hold frame 0's planes
	let zeros = vec![0u8; 512];
	let input_1 = two_bit_frame(&a, &zeros);
	assert!(ctx.colorize_at(&input_1, 128, 32, 2, 0));
	let out_planes = plane::split(ctx.frame().pixels(), 128, 32, 4);
	assert_eq!(out_planes[0], a);
	assert_eq!(out_planes[2], f0[2]);
	assert_eq!(out_planes[3], f0[3]);

	// Second input hits frame 0 through plane 0 and frame 1 through
	// plane 1: the buffers accumulate the OR of both frames
	let input_2 = two_bit_frame(&a, &b);
	assert!(ctx.colorize_at(&input_2, 128, 32, 2, 20));
	let out_planes = plane::split(ctx.frame().pixels(), 128, 32, 4);
	let expected_2: Vec<u8> = f0[2].iter().zip(&f1[2]).map(|(&x, &y)| x | y).collect();
	let expected_3: Vec<u8> = f0[3].iter().zip(&f1[3]).map(|(&x, &y)| x | y).collect();
	assert_eq!(out_planes[2], expected_2);
	assert_eq!(out_planes[3], expected_3);
}

#[test]
fn lcm_retrigger_is_idempotent() {
	init_logger();
	let a = test_plane(1);
	let hash_a = plane::checksum(&a, false);

	let f0: Vec<Vec<u8>> = (0..4).map(|i| test_plane(50 + i)).collect();
	let (vni_bytes, offsets) =
		build_vni(4, &[SeqSpec::new("lcm", vec![FrameSpec::new(25, hash_a, f0)])]);
	let vni = VniFile::from_bytes(&vni_bytes).unwrap();

	let pal_bytes = build_pal(
		&[default_palette()],
		&[MappingSpec {
			checksum: hash_a,
			mode: 5,
			palette_index: 0,
			value: offsets[0],
		}],
		&[],
	);
	let mut ctx = Context::new(PalFile::from_bytes(&pal_bytes).unwrap(), Some(vni));

	let input = two_bit_frame(&a, &vec![0u8; 512]);
	assert!(ctx.colorize_at(&input, 128, 32, 2, 0));
	let first = ctx.frame().pixels().to_vec();

	// The same mapping hitting again while the sequence runs changes nothing
	assert!(ctx.colorize_at(&input, 128, 32, 2, 16));
	assert_eq!(ctx.frame().pixels(), &first[..]);
}

#[test]
fn lcm_detects_through_sequence_masks() {
	init_logger();
	let a = test_plane(1);
	let hash_a = plane::checksum(&a, false);

	// The second authored frame answers to the input under a sequence mask
	// that blanks the first half of the plane.
	let mut seq_mask = vec![0u8; 512];
	for byte in seq_mask.iter_mut().skip(256) {
		*byte = 0xFF;
	}
	let c = test_plane(8);
	let hash_masked = plane::checksum_with_mask(&c, &seq_mask, false);

	let f0: Vec<Vec<u8>> = (0..4).map(|i| test_plane(50 + i)).collect();
	let f1: Vec<Vec<u8>> = (0..4).map(|i| test_plane(60 + i)).collect();
	let mut seq = SeqSpec::new(
		"masked",
		vec![FrameSpec::new(25, hash_a, f0.clone()), FrameSpec::new(25, hash_masked, f1.clone())],
	);
	seq.masks = vec![seq_mask];
	let (vni_bytes, offsets) = build_vni(5, &[seq]);
	let vni = VniFile::from_bytes(&vni_bytes).unwrap();

	let pal_bytes = build_pal(
		&[default_palette()],
		&[MappingSpec {
			checksum: hash_a,
			mode: 5,
			palette_index: 0,
			value: offsets[0],
		}],
		&[],
	);
	let mut ctx = Context::new(PalFile::from_bytes(&pal_bytes).unwrap(), Some(vni));

	// One input frame matching frame 0 bare and frame 1 through the mask
	let input = two_bit_frame(&a, &c);
	assert!(ctx.colorize_at(&input, 128, 32, 2, 0));

	let out_planes = plane::split(ctx.frame().pixels(), 128, 32, 4);
	let expected_2: Vec<u8> = f0[2].iter().zip(&f1[2]).map(|(&x, &y)| x | y).collect();
	assert_eq!(out_planes[2], expected_2);
}

#[test]
fn masked_replace_composites_under_accumulated_mask() {
	init_logger();
	let in0 = test_plane(30);
	let in1 = test_plane(31);
	let hash = plane::checksum(&in0, false);

	let p0 = test_plane(90);
	let p1 = test_plane(91);
	// Replace mask keeps the input in the low half, the authored planes in
	// the high half.
	let mut mask = vec![0xFFu8; 256];
	mask.extend_from_slice(&[0u8; 256]);

	let mut frame = FrameSpec::new(25, hash, vec![p0.clone(), p1.clone()]);
	frame.mask = Some(mask.clone());
	let (vni_bytes, offsets) = build_vni(4, &[SeqSpec::new("mr", vec![frame])]);
	let vni = VniFile::from_bytes(&vni_bytes).unwrap();

	let pal_bytes = build_pal(
		&[default_palette()],
		&[MappingSpec {
			checksum: hash,
			mode: 7,
			palette_index: 0,
			value: offsets[0],
		}],
		&[],
	);
	let mut ctx = Context::new(PalFile::from_bytes(&pal_bytes).unwrap(), Some(vni));

	let input = two_bit_frame(&in0, &in1);
	assert!(ctx.colorize_at(&input, 128, 32, 2, 0));

	let out_planes = plane::split(ctx.frame().pixels(), 128, 32, 2);
	for (out_plane, (input_plane, authored)) in
		out_planes.iter().zip([(&in0, &p0), (&in1, &p1)])
	{
		let expected: Vec<u8> = input_plane
			.iter()
			.zip(authored)
			.zip(&mask)
			.map(|((&i, &p), &m)| (i & m) | (p & !m))
			.collect();
		assert_eq!(out_plane, &expected);
	}
}

#[test]
fn compressed_frames_decode_to_original_planes() {
	init_logger();
	// One frame with a noisy plane (literal-heavy) and one with a flat
	// plane (back-reference-heavy).
	let noisy = test_plane(7);
	let flat = vec![0xABu8; 512];

	let mut f0 = FrameSpec::new(25, 0, vec![noisy.clone()]);
	f0.compressed = true;
	let mut f1 = FrameSpec::new(25, 0, vec![flat.clone()]);
	f1.compressed = true;

	let (vni_bytes, _) = build_vni(3, &[SeqSpec::new("zip", vec![f0, f1])]);
	let vni = VniFile::from_bytes(&vni_bytes).unwrap();

	let seq = &vni.animations()[0];
	assert_eq!(seq.frames[0].planes[0].data, noisy);
	assert_eq!(seq.frames[1].planes[0].data, flat);
	assert_eq!(seq.duration_ms, 50);
	assert_eq!(seq.frames[1].time_offset_ms, 25);
}

#[test]
fn plain_render_upscales_half_size_input() {
	init_logger();
	// Bundle declares 256x64 sequences; 128x32 input is upscaled on render
	let mut seq = SeqSpec::new("big", vec![]);
	seq.size = (256, 64);
	let (vni_bytes, _) = build_vni(4, &[seq]);
	let vni = VniFile::from_bytes(&vni_bytes).unwrap();
	assert_eq!(vni.dimensions(), Dimensions::new(256, 64));

	let pal_bytes = build_pal(&[default_palette()], &[], &[]);
	let mut ctx = Context::new(PalFile::from_bytes(&pal_bytes).unwrap(), Some(vni));

	let mut input = vec![0u8; 128 * 32];
	input[0] = 1;

	// Without a scaler the frame passes through at native size
	assert!(ctx.colorize_at(&input, 128, 32, 1, 0));
	assert_eq!(ctx.frame().dimensions(), Dimensions::new(128, 32));

	ctx.set_scaler_mode(ScalerMode::ScaleDouble);
	assert!(ctx.colorize_at(&input, 128, 32, 1, 20));
	let out = ctx.frame();
	assert_eq!(out.dimensions(), Dimensions::new(256, 64));
	assert_eq!(out.pixels().len(), 256 * 64);
	// The set pixel became a 2x2 block
	assert_eq!(out.pixels()[0], 1);
	assert_eq!(out.pixels()[1], 1);
	assert_eq!(out.pixels()[256], 1);
	assert_eq!(out.pixels()[257], 1);
	assert_eq!(out.pixels()[2], 0);
}
