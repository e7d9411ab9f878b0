use std::cell::RefCell;

use emu_core::Rect;
use konami_k053246::{
    ColorWiring, DecodedTiles, K053246, LinearWiring, SpriteError, SpriteRecord, SpriteSnapshot,
    TilePixels, TileSource, Variant, ZOOM_UNITY,
};

const WIDTH: usize = 384;
const HEIGHT: usize = 256;

/// Sprite centred on screen position (`x`, `y`), 1x1 tile, unity zoom.
/// Hardware Y runs upwards, so the screen row is stored negated.
fn sprite(priority: u8, x: u16, y: u16, color: u8) -> SpriteRecord {
    SpriteRecord::from_words([
        0x8000 | u16::from(priority),
        0,
        1024u16.wrapping_sub(y) & 0x3ff,
        x,
        ZOOM_UNITY,
        ZOOM_UNITY,
        u16::from(color),
        0,
    ])
}

fn chip() -> K053246 {
    let mut chip = K053246::new(Variant::K055673);
    chip.set_plane_size(WIDTH, HEIGHT);
    chip
}

fn snapshot(records: &[(usize, SpriteRecord)]) -> SpriteSnapshot {
    let mut snap = SpriteSnapshot::empty();
    for &(i, r) in records {
        snap.set_record(i, r);
    }
    snap
}

fn full() -> Rect {
    Rect::from_size(WIDTH, HEIGHT)
}

fn color_at(chip: &K053246, x: usize, y: usize) -> u16 {
    chip.color_plane().pix(x, y)
}

#[test]
fn unity_sprite_covers_sixteen_pixels_around_its_centre() {
    let mut chip = chip();
    let snap = snapshot(&[(0, sprite(0x10, 100, 100, 3))]);
    let stats = chip
        .render(&snap, &DecodedTiles::solid(1, 5), &LinearWiring, full())
        .expect("render");

    assert_eq!(stats.sprites_drawn, 1);
    assert_eq!(color_at(&chip, 100, 100), 0x35);
    assert_eq!(color_at(&chip, 92, 92), 0x35);
    assert_eq!(color_at(&chip, 107, 107), 0x35);
    assert_eq!(color_at(&chip, 91, 100), 0);
    assert_eq!(color_at(&chip, 108, 100), 0);
    assert_eq!(color_at(&chip, 100, 108), 0);
}

#[test]
fn shared_bucket_keeps_only_the_last_sprite_in_memory_order() {
    let mut chip = chip();
    let snap = snapshot(&[
        (3, sprite(0x40, 50, 50, 1)),
        (7, sprite(0x40, 150, 50, 2)),
        (9, sprite(0x40, 250, 50, 4)),
    ]);
    let stats = chip
        .render(&snap, &DecodedTiles::solid(1, 1), &LinearWiring, full())
        .expect("render");

    assert_eq!(stats.bucket_collisions, 2);
    assert_eq!(stats.sprites_drawn, 1);
    assert_eq!(color_at(&chip, 50, 50), 0);
    assert_eq!(color_at(&chip, 150, 50), 0);
    assert_eq!(color_at(&chip, 250, 50), 0x41);
}

#[test]
fn bucket_order_follows_priority_order_bit() {
    let overlap = snapshot(&[(0, sprite(0x10, 100, 100, 1)), (1, sprite(0x20, 100, 100, 2))]);
    let tiles = DecodedTiles::solid(1, 1);

    // Default: levels are inverted, so the lower value is drawn last.
    let mut chip = chip();
    chip.render(&overlap, &tiles, &LinearWiring, full()).expect("render");
    assert_eq!(color_at(&chip, 100, 100), 0x11);

    chip.regs.write_opset(0x10);
    chip.render(&overlap, &tiles, &LinearWiring, full()).expect("render");
    assert_eq!(color_at(&chip, 100, 100), 0x21);
}

#[test]
fn write_protected_attribute_block_is_skipped() {
    let mut chip = chip();
    chip.regs.set_attribute_block(0, 0x800);
    let snap = snapshot(&[(0, sprite(0x10, 100, 100, 1))]);
    let tiles = DecodedTiles::solid(1, 1);

    let stats = chip.render(&snap, &tiles, &LinearWiring, full()).expect("render");
    assert_eq!(stats.write_protected, 1);
    assert_eq!(color_at(&chip, 100, 100), 0);

    chip.regs.write_opset(0x08);
    let stats = chip.render(&snap, &tiles, &LinearWiring, full()).expect("render");
    assert_eq!(stats.sprites_drawn, 1);
    assert_eq!(color_at(&chip, 100, 100), 0x11);
}

#[test]
fn transparency_shift_hides_low_colour_indices() {
    let mut chip = chip();
    chip.regs.set_attribute_block(0, 0x200); // ignore the two low bits
    let snap = snapshot(&[(0, sprite(0x10, 100, 100, 1))]);

    chip.render(&snap, &DecodedTiles::solid(1, 3), &LinearWiring, full())
        .expect("render");
    assert_eq!(color_at(&chip, 100, 100), 0);

    chip.render(&snap, &DecodedTiles::solid(1, 4), &LinearWiring, full())
        .expect("render");
    assert_eq!(color_at(&chip, 100, 100), 0x14);
}

#[test]
fn shadow_detect_writes_base_colour_and_shadow_attribute() {
    let mut chip = chip();
    let mut r = sprite(0x10, 100, 100, 2);
    r.words[6] |= 0x0400;
    let snap = snapshot(&[(0, r)]);

    chip.render(&snap, &DecodedTiles::solid(1, 0x0f), &LinearWiring, full())
        .expect("render");
    assert_eq!(color_at(&chip, 100, 100), 0x20);
    assert_eq!(chip.attr_plane().pix(100, 100), 0x0100);
}

/// Tile 0 is all top code (shadow when detected), everything else opaque.
struct ShadowFirst {
    shadow: TilePixels,
    opaque: TilePixels,
}

impl TileSource for ShadowFirst {
    fn tile(&self, id: u32) -> &TilePixels {
        if id == 0 { &self.shadow } else { &self.opaque }
    }
}

/// A shadow sprite drawn first, then an opaque sprite on top of it.
fn shadow_then_opaque(opaque_x: u16) -> SpriteSnapshot {
    let mut shadow = sprite(0x20, 100, 100, 2);
    shadow.words[6] |= 0x0400;
    let mut front = sprite(0x10, opaque_x, 100, 3);
    front.words[1] = 0x40;
    snapshot(&[(0, shadow), (1, front)])
}

const SHADOW_FIRST: ShadowFirst = ShadowFirst {
    shadow: [0x0f; 256],
    opaque: [0x05; 256],
};

#[test]
fn keep_mode_preserves_shadow_from_earlier_sprite() {
    let mut chip = chip();
    chip.regs.write_oms(0x20);

    chip.render(&shadow_then_opaque(104), &SHADOW_FIRST, &LinearWiring, full())
        .expect("render");
    // Overlap: the later sprite's colour, the earlier sprite's shadow bits.
    assert_eq!(color_at(&chip, 100, 100), 0x35);
    assert_eq!(chip.attr_plane().pix(100, 100), 0x0100);
    assert_eq!(chip.attr_plane().pix(110, 100), 0x0000);
}

#[test]
fn force_mode_replaces_shadow_from_earlier_sprite() {
    let mut chip = chip();
    chip.render(&shadow_then_opaque(100), &SHADOW_FIRST, &LinearWiring, full())
        .expect("render");
    assert_eq!(color_at(&chip, 100, 100), 0x35);
    assert_eq!(chip.attr_plane().pix(100, 100), 0x0000);
}

#[test]
fn priority_select_forces_writes_even_with_shadow_keep() {
    let mut chip = chip();
    chip.regs.write_oms(0x20);
    chip.regs.write_opset(0x20);
    // Priority order bit is clear, so the 0x10 sprite is still drawn last.
    chip.render(&shadow_then_opaque(100), &SHADOW_FIRST, &LinearWiring, full())
        .expect("render");
    assert_eq!(chip.attr_plane().pix(100, 100), 0x0000);
}

#[test]
fn planes_are_cleared_between_passes() {
    let mut chip = chip();
    let tiles = DecodedTiles::solid(1, 1);
    chip.render(&snapshot(&[(0, sprite(0x10, 100, 100, 1))]), &tiles, &LinearWiring, full())
        .expect("render");
    chip.render(&SpriteSnapshot::empty(), &tiles, &LinearWiring, full())
        .expect("render");
    assert_eq!(color_at(&chip, 100, 100), 0);
}

#[test]
fn clip_larger_than_planes_is_rejected() {
    let mut chip = chip();
    let err = chip
        .render(
            &SpriteSnapshot::empty(),
            &DecodedTiles::default(),
            &LinearWiring,
            Rect::new(0, WIDTH as i32, 0, 10),
        )
        .expect_err("clip overhangs");
    assert!(matches!(err, SpriteError::ClipOutOfBounds { width: WIDTH, .. }));
}

#[test]
fn half_zoom_doubles_sprite_size() {
    let mut chip = chip();
    let mut r = sprite(0x10, 100, 100, 1);
    r.words[4] = ZOOM_UNITY / 2;
    r.words[5] = ZOOM_UNITY / 2;
    chip.render(&snapshot(&[(0, r)]), &DecodedTiles::solid(1, 1), &LinearWiring, full())
        .expect("render");
    assert_eq!(color_at(&chip, 84, 84), 0x11);
    assert_eq!(color_at(&chip, 115, 115), 0x11);
    assert_eq!(color_at(&chip, 116, 100), 0);
}

#[test]
fn display_offset_shifts_sprites_in_the_planes() {
    let mut chip = chip();
    chip.set_display_offset(10, -4);
    chip.render(
        &snapshot(&[(0, sprite(0x10, 100, 100, 1))]),
        &DecodedTiles::solid(1, 1),
        &LinearWiring,
        full(),
    )
    .expect("render");
    assert_eq!(color_at(&chip, 102, 88), 0x11);
    assert_eq!(color_at(&chip, 117, 103), 0x11);
    assert_eq!(color_at(&chip, 101, 95), 0);
}

#[test]
fn wide_sprite_walks_sub_tiles_left_to_right_or_flipped() {
    let mut tiles = DecodedTiles::solid(2, 1);
    if let Some(t) = tiles.tile_mut(1) {
        *t = [2; 256];
    }
    let mut r = sprite(0x10, 100, 100, 0);
    r.words[0] |= 0x0100; // two tiles wide

    let mut chip = chip();
    chip.render(&snapshot(&[(0, r)]), &tiles, &LinearWiring, full())
        .expect("render");
    assert_eq!(color_at(&chip, 84, 100), 1);
    assert_eq!(color_at(&chip, 100, 100), 2);

    r.words[0] |= 0x1000; // flip X
    chip.render(&snapshot(&[(0, r)]), &tiles, &LinearWiring, full())
        .expect("render");
    assert_eq!(color_at(&chip, 84, 100), 2);
    assert_eq!(color_at(&chip, 100, 100), 1);
}

/// Tiles distinguished only by the top two tile id bits.
struct BankTiles([TilePixels; 4]);

impl TileSource for BankTiles {
    fn tile(&self, id: u32) -> &TilePixels {
        &self.0[((id >> 14) & 3) as usize]
    }
}

#[test]
fn tile_banks_apply_to_055673_only() {
    let tiles = BankTiles([[1; 256], [2; 256], [3; 256], [4; 256]]);
    let mut r = sprite(0x10, 100, 100, 0);
    r.words[1] = 0x4000;
    let snap = snapshot(&[(0, r)]);

    let mut banked = chip();
    banked.regs.set_tile_bank(1, 2);
    banked.render(&snap, &tiles, &LinearWiring, full()).expect("render");
    assert_eq!(color_at(&banked, 100, 100), 3);

    let mut plain = K053246::new(Variant::K053247);
    plain.set_plane_size(WIDTH, HEIGHT);
    plain.regs.set_tile_bank(1, 2);
    plain.render(&snap, &tiles, &LinearWiring, full()).expect("render");
    assert_eq!(color_at(&plain, 100, 100), 2);
}

#[test]
fn render_leaves_pixels_outside_clip_alone() {
    let mut chip = chip();
    let clip = Rect::new(0, 99, 0, 255);
    chip.render(
        &snapshot(&[(0, sprite(0x10, 100, 100, 1))]),
        &DecodedTiles::solid(1, 1),
        &LinearWiring,
        clip,
    )
    .expect("render");
    assert_eq!(color_at(&chip, 99, 100), 0x11);
    assert_eq!(color_at(&chip, 100, 100), 0);
}

/// Colour info codes handed to the wiring for a single sprite, in call
/// order: plain info first, shadow info second.
fn wired_infos(chip: &mut K053246, record: SpriteRecord) -> Vec<u32> {
    let seen = RefCell::new(Vec::new());
    let wiring = |info: u32| {
        seen.borrow_mut().push(info);
        LinearWiring.wire(info)
    };
    chip.render(&snapshot(&[(0, record)]), &DecodedTiles::solid(1, 1), &wiring, full())
        .expect("render");
    seen.into_inner()
}

fn with_attributes(attributes: u16) -> SpriteRecord {
    let mut r = sprite(0x10, 100, 100, 0);
    r.words[6] = attributes;
    r
}

#[test]
fn k053247_colour_info_uses_twelve_attribute_bits() {
    let mut chip = K053246::new(Variant::K053247);
    chip.set_plane_size(WIDTH, HEIGHT);
    assert_eq!(wired_infos(&mut chip, with_attributes(0x0abc)), [0x2bc0, 0xabc0]);

    assert_eq!(wired_infos(&mut chip, with_attributes(0x0ebc)), [0x6bc0, 0xebc0]);
    chip.regs.write_oms(0x20);
    assert_eq!(wired_infos(&mut chip, with_attributes(0x0ebc)), [0x2bc0, 0xebc0]);
}

#[test]
fn k055673_colour_offset_follows_bit_depth() {
    let mut chip = chip();
    chip.regs.set_color_offset(0x0f);
    for (opset, info) in [(0x00, 0xf120), (0x01, 0xe240), (0x02, 0xc480), (0x04, 0x1200)] {
        chip.regs.write_opset(opset);
        assert_eq!(
            wired_infos(&mut chip, with_attributes(0x0012)),
            [info, info],
            "opset {opset:#04x}"
        );
    }
}

#[test]
fn k055673_shadow_keep_narrows_plain_info() {
    let mut chip = chip();
    assert_eq!(wired_infos(&mut chip, with_attributes(0x0c12)), [0x40120, 0xc0120]);
    chip.regs.write_oms(0x20);
    assert_eq!(wired_infos(&mut chip, with_attributes(0x0c12)), [0x00120, 0xc0120]);
}

#[test]
fn shadow_pixels_take_palette_from_shadow_info() {
    let mut chip = K053246::new(Variant::K053247);
    chip.set_plane_size(WIDTH, HEIGHT);
    chip.regs.write_oms(0x20);
    let snap = snapshot(&[(0, with_attributes(0x0ebc))]);

    chip.render(&snap, &DecodedTiles::solid(1, 0x0f), &LinearWiring, full())
        .expect("render");
    assert_eq!(color_at(&chip, 100, 100), 0xebc0);

    chip.render(&snap, &DecodedTiles::solid(1, 0x01), &LinearWiring, full())
        .expect("render");
    assert_eq!(color_at(&chip, 100, 100), 0x2bc1);
}
