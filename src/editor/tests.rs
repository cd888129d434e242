// SPDX-License-Identifier: MPL-2.0

use super::*;
use crate::domain::editing::{Adjustments, CropRect, ViewRect};
use crate::store::{NewPhoto, PhotoStore};
use crate::test_utils::{assert_abs_diff_eq, FRACTION_EPSILON, VIEW_EPSILON};
use image_rs::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use std::io::Cursor;

fn png_bytes(width: u32, height: u32) -> Arc<[u8]> {
    let img = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(
        width,
        height,
        Rgba([120, 80, 40, 255]),
    ));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).expect("encode png");
    Arc::from(out.into_inner())
}

fn store_with_photo(registry: &PreviewRegistry) -> (PhotoStore, PhotoId) {
    let mut store = PhotoStore::new(9, registry.clone());
    let id = store.add([NewPhoto {
        file_name: "test.png".into(),
        format: PhotoFormat::Png,
        bytes: png_bytes(8, 6),
        dimensions: Some((8, 6)),
    }])[0];
    (store, id)
}

fn open_session(viewport: Size) -> (PhotoStore, PreviewRegistry, EditorSession) {
    let registry = PreviewRegistry::new();
    let (store, id) = store_with_photo(&registry);
    let entry = store.get(id).expect("entry");
    let session = EditorSession::open(entry, viewport, &registry, EditorOptions::default());
    (store, registry, session)
}

fn assert_inside(rect: ViewRect, viewport: Size) {
    assert!(rect.x >= 0.0 && rect.y >= 0.0, "{rect:?} starts outside");
    assert!(rect.right() <= viewport.width + VIEW_EPSILON, "{rect:?} overflows width");
    assert!(rect.bottom() <= viewport.height + VIEW_EPSILON, "{rect:?} overflows height");
    assert!(rect.width >= MIN_CROP_SIZE - VIEW_EPSILON, "{rect:?} too narrow");
    assert!(rect.height >= MIN_CROP_SIZE - VIEW_EPSILON, "{rect:?} too short");
}

// =============================================================================
// History
// =============================================================================

#[test]
fn new_session_has_single_history_entry() {
    let (_store, _registry, session) = open_session(Size::new(200.0, 200.0));

    assert_eq!(session.history().len(), 1);
    assert!(!session.can_undo());
    assert!(!session.can_redo());
    assert!(!session.has_unsaved_changes());
    assert_eq!(session.render_filter(), "none");
}

#[test]
fn slider_undo_returns_to_open_state() {
    let (_store, _registry, mut session) = open_session(Size::new(200.0, 200.0));

    session.set_adjustment(AdjustmentKind::Brightness, 1.2);
    assert!(session.release_adjustment());
    session.set_adjustment(AdjustmentKind::Contrast, 0.8);
    assert!(session.release_adjustment());
    assert_eq!(session.history().len(), 3);

    assert!(session.undo());
    assert!(session.undo());
    let adjustments = session.state().adjustments;
    assert_eq!(adjustments.brightness(), 1.0);
    assert_eq!(adjustments.contrast(), 1.0);
}

#[test]
fn slider_drag_records_one_entry_per_gesture() {
    let (_store, _registry, mut session) = open_session(Size::new(200.0, 200.0));

    for step in 1..=10 {
        session.set_adjustment(AdjustmentKind::Saturation, 1.0 + step as f32 * 0.05);
    }
    assert_eq!(session.history().len(), 1, "no entry before release");
    assert!(session.release_adjustment());
    assert_eq!(session.history().len(), 2);
    assert!(!session.release_adjustment(), "second release records nothing");
}

#[test]
fn pending_slider_is_committed_before_discrete_action() {
    let (_store, _registry, mut session) = open_session(Size::new(200.0, 200.0));

    session.set_adjustment(AdjustmentKind::Warmth, 1.5);
    session.rotate_clockwise();
    assert_eq!(session.history().len(), 3);

    session.undo();
    assert_eq!(session.state().rotation.degrees(), 0);
    assert_eq!(session.state().adjustments.warmth(), 1.5);
}

#[test]
fn pending_slider_is_committed_before_undo() {
    let (_store, _registry, mut session) = open_session(Size::new(200.0, 200.0));

    session.set_adjustment(AdjustmentKind::Exposure, 1.4);
    assert!(session.can_undo());
    assert!(session.undo());
    assert_eq!(session.state().adjustments, Adjustments::default());
    assert!(session.redo());
    assert_eq!(session.state().adjustments.exposure(), 1.4);
}

#[test]
fn undo_then_redo_restores_exact_snapshot() {
    let (_store, _registry, mut session) = open_session(Size::new(300.0, 200.0));

    session.apply_preset("vivid");
    session.flip_vertical();
    session.rotate_counterclockwise();
    let before = session.state().clone();

    assert!(session.undo());
    assert!(session.redo());
    assert_eq!(session.state(), &before);
}

#[test]
fn noop_discrete_action_records_nothing() {
    let (_store, _registry, mut session) = open_session(Size::new(200.0, 200.0));

    assert!(!session.apply_preset(""));
    assert!(!session.clear_crop());
    assert!(!session.reset());
    assert_eq!(session.history().len(), 1);
}

// =============================================================================
// Presets and filters
// =============================================================================

#[test]
fn preset_is_appended_after_live_brightness() {
    let (_store, _registry, mut session) = open_session(Size::new(200.0, 200.0));

    session.set_adjustment(AdjustmentKind::Brightness, 1.3);
    session.release_adjustment();
    assert!(session.apply_preset("Noir"));

    assert_eq!(session.state().filter_preset_id, "noir");
    assert_eq!(
        session.render_filter(),
        "brightness(1.3) grayscale(1) contrast(1.2) brightness(0.95)"
    );
}

#[test]
fn unknown_preset_is_ignored() {
    let (_store, _registry, mut session) = open_session(Size::new(200.0, 200.0));

    assert!(!session.apply_preset("lomo"));
    assert!(session.state().filter_preset_id.is_empty());
}

// =============================================================================
// Rotation and flips
// =============================================================================

#[test]
fn three_clockwise_turns_normalize_to_270() {
    let (_store, _registry, mut session) = open_session(Size::new(400.0, 300.0));

    session.rotate_clockwise();
    session.rotate_clockwise();
    session.rotate_clockwise();

    assert_eq!(session.state().rotation.degrees(), 270);
    assert_eq!(session.state().rotation.normalized(), 270);
    assert_eq!(session.viewport(), Size::new(300.0, 400.0));
}

#[test]
fn counterclockwise_from_zero_wraps_when_normalized() {
    let (_store, _registry, mut session) = open_session(Size::new(400.0, 300.0));

    session.rotate_counterclockwise();
    assert_eq!(session.state().rotation.degrees(), -90);
    assert_eq!(session.state().rotation.normalized(), 270);
}

#[test]
fn rotation_carries_crop_with_the_image() {
    let (_store, _registry, mut session) = open_session(Size::new(400.0, 400.0));

    session.begin_drag(CropHandle::SouthEast, Point::new(400.0, 400.0));
    session.pointer_move(Point::new(200.0, 100.0));
    session.pointer_up();
    let crop = session.state().crop.expect("cropped");
    assert_abs_diff_eq!(crop.width(), 0.5, epsilon = FRACTION_EPSILON);
    assert_abs_diff_eq!(crop.height(), 0.25, epsilon = FRACTION_EPSILON);

    session.rotate_clockwise();
    let rotated = session.state().crop.expect("still cropped");
    // top-left strip becomes a top-right column
    assert_abs_diff_eq!(rotated.x(), 0.75, epsilon = FRACTION_EPSILON);
    assert_abs_diff_eq!(rotated.y(), 0.0, epsilon = FRACTION_EPSILON);
    assert_abs_diff_eq!(rotated.width(), 0.25, epsilon = FRACTION_EPSILON);
    assert_abs_diff_eq!(rotated.height(), 0.5, epsilon = FRACTION_EPSILON);
}

#[test]
fn flip_on_quarter_turn_mirrors_crop_vertically() {
    let (_store, _registry, mut session) = open_session(Size::new(400.0, 400.0));

    session.rotate_clockwise();
    session.begin_drag(CropHandle::SouthEast, Point::new(400.0, 400.0));
    session.pointer_move(Point::new(200.0, 100.0));
    session.pointer_up();

    session.flip_horizontal();
    let crop = session.state().crop.expect("cropped");
    assert!(session.state().flip_horizontal);
    assert_abs_diff_eq!(crop.x(), 0.0, epsilon = FRACTION_EPSILON);
    assert_abs_diff_eq!(crop.y(), 0.75, epsilon = FRACTION_EPSILON);
}

#[test]
fn flips_toggle_independently() {
    let (_store, _registry, mut session) = open_session(Size::new(200.0, 200.0));

    session.flip_horizontal();
    session.flip_vertical();
    session.flip_horizontal();
    assert!(!session.state().flip_horizontal);
    assert!(session.state().flip_vertical);
    assert_eq!(session.history().len(), 4);
}

// =============================================================================
// Crop
// =============================================================================

#[test]
fn crop_handle_detection_with_extended_hit_area() {
    let mut crop = CropState::from_crop(
        Size::new(200.0, 200.0),
        Some(CropRect::new(0.25, 0.25, 0.5, 0.5)),
        MIN_CROP_SIZE,
    );

    assert_eq!(crop.hit_test(Point::new(50.0, 50.0)), Some(CropHandle::NorthWest));
    // 15 units away on both axes, still within the hit radius
    assert_eq!(crop.hit_test(Point::new(65.0, 65.0)), Some(CropHandle::NorthWest));
    assert_eq!(crop.hit_test(Point::new(150.0, 150.0)), Some(CropHandle::SouthEast));
    assert_eq!(crop.hit_test(Point::new(135.0, 135.0)), Some(CropHandle::SouthEast));
    assert_eq!(crop.hit_test(Point::new(100.0, 50.0)), Some(CropHandle::North));
    assert_eq!(crop.hit_test(Point::new(150.0, 100.0)), Some(CropHandle::East));
    assert_eq!(crop.hit_test(Point::new(100.0, 100.0)), Some(CropHandle::Move));
    assert_eq!(crop.hit_test(Point::new(10.0, 10.0)), None);

    assert_eq!(crop.pointer_down(Point::new(10.0, 10.0)), None);
    assert!(!crop.is_dragging(), "outside click must not start a drag");
}

#[test]
fn crop_handle_detection_at_viewport_edges() {
    let crop = CropState::new(Size::new(100.0, 100.0), MIN_CROP_SIZE);

    assert_eq!(crop.hit_test(Point::new(0.0, 0.0)), Some(CropHandle::NorthWest));
    assert_eq!(crop.hit_test(Point::new(15.0, 15.0)), Some(CropHandle::NorthWest));
    assert_eq!(
        crop.hit_test(Point::new(100.0, 100.0)),
        Some(CropHandle::SouthEast)
    );
}

#[test]
fn crop_drag_commits_once_on_pointer_up() {
    let (_store, _registry, mut session) = open_session(Size::new(400.0, 300.0));

    assert_eq!(
        session.pointer_down(Point::new(400.0, 300.0)),
        Some(CropHandle::SouthEast)
    );
    for step in 1..=5 {
        session.pointer_move(Point::new(400.0 - step as f32 * 20.0, 300.0 - step as f32 * 10.0));
    }
    assert_eq!(session.history().len(), 1, "no entry mid-drag");
    assert!(session.pointer_up());
    assert_eq!(session.history().len(), 2);

    let rect = session.crop().rect();
    assert_eq!(rect, ViewRect::new(0.0, 0.0, 300.0, 250.0));
}

#[test]
fn unchanged_drag_records_nothing() {
    let (_store, _registry, mut session) = open_session(Size::new(400.0, 300.0));

    session.pointer_down(Point::new(200.0, 150.0));
    session.pointer_move(Point::new(260.0, 190.0));
    assert!(!session.pointer_up(), "full-size rect cannot move");
    assert_eq!(session.history().len(), 1);
}

#[test]
fn crop_clamps_for_any_drag_delta() {
    let viewport = Size::new(320.0, 240.0);
    let handles = [
        CropHandle::Move,
        CropHandle::NorthWest,
        CropHandle::North,
        CropHandle::NorthEast,
        CropHandle::East,
        CropHandle::SouthEast,
        CropHandle::South,
        CropHandle::SouthWest,
        CropHandle::West,
    ];
    let deltas = [-1000.0, -250.0, -33.0, 0.0, 17.5, 90.0, 1000.0];

    for ratio in AspectRatio::ALL {
        for handle in handles {
            for dx in deltas {
                for dy in deltas {
                    let mut crop = CropState::from_crop(
                        viewport,
                        Some(CropRect::new(0.2, 0.2, 0.5, 0.5)),
                        MIN_CROP_SIZE,
                    );
                    crop.set_ratio(ratio);
                    let start = crop.rect().center();
                    crop.begin_drag(handle, start);
                    crop.pointer_move(Point::new(start.x + dx, start.y + dy));
                    crop.pointer_up();
                    assert_inside(crop.rect(), viewport);
                }
            }
        }
    }
}

#[test]
fn aspect_lock_holds_after_resize() {
    let viewport = Size::new(640.0, 480.0);
    for ratio in [
        AspectRatio::Square,
        AspectRatio::Classic,
        AspectRatio::Photo,
        AspectRatio::Widescreen,
    ] {
        let value = ratio.value().expect("locked");
        for handle in [
            CropHandle::NorthWest,
            CropHandle::SouthEast,
            CropHandle::East,
            CropHandle::North,
            CropHandle::SouthWest,
        ] {
            for (dx, dy) in [(-60.0, 25.0), (40.0, -70.0), (500.0, 500.0), (-500.0, -500.0)] {
                let mut crop = CropState::new(viewport, MIN_CROP_SIZE);
                crop.set_ratio(ratio);
                let rect = crop.rect();
                assert!((rect.width / rect.height - value).abs() < VIEW_EPSILON);

                let start = crop.rect().center();
                crop.begin_drag(handle, start);
                crop.pointer_move(Point::new(start.x + dx, start.y + dy));
                let rect = crop.rect();
                assert!(
                    (rect.width / rect.height - value).abs() < VIEW_EPSILON,
                    "{ratio:?} {handle:?} ({dx}, {dy}) gave {rect:?}"
                );
                assert_inside(rect, viewport);
            }
        }
    }
}

#[test]
fn locked_edge_resize_keeps_anchor_edges() {
    let mut crop = CropState::from_crop(
        Size::new(400.0, 400.0),
        Some(CropRect::new(0.25, 0.25, 0.25, 0.25)),
        MIN_CROP_SIZE,
    );
    crop.set_ratio(AspectRatio::Square);

    crop.begin_drag(CropHandle::East, Point::new(200.0, 150.0));
    crop.pointer_move(Point::new(240.0, 150.0));
    assert_eq!(crop.rect(), ViewRect::new(100.0, 100.0, 140.0, 140.0));
    crop.pointer_up();

    crop.begin_drag(CropHandle::North, Point::new(170.0, 100.0));
    crop.pointer_move(Point::new(170.0, 80.0));
    assert_eq!(crop.rect(), ViewRect::new(100.0, 80.0, 160.0, 160.0));
}

#[test]
fn infeasible_locked_resize_keeps_start_rect() {
    // A 16:9 rectangle at least 40 tall needs 71 units of width.
    let viewport = Size::new(100.0, 300.0);
    let mut crop = CropState::from_crop(
        viewport,
        Some(CropRect::new(0.5, 0.0, 0.5, 0.2)),
        MIN_CROP_SIZE,
    );
    crop.lock_ratio(AspectRatio::Widescreen);
    let before = crop.rect();

    crop.begin_drag(CropHandle::SouthEast, Point::new(100.0, 60.0));
    crop.pointer_move(Point::new(140.0, 90.0));
    assert_eq!(crop.rect(), before);
    assert!(!crop.pointer_up());
}

#[test]
fn aspect_switch_reshapes_from_top_left() {
    let (_store, _registry, mut session) = open_session(Size::new(400.0, 300.0));

    assert!(session.set_aspect_ratio(AspectRatio::Square));
    assert_eq!(session.crop().rect(), ViewRect::new(0.0, 0.0, 300.0, 300.0));
    assert_eq!(session.history().len(), 2);

    assert!(session.set_aspect_ratio(AspectRatio::Widescreen));
    let rect = session.crop().rect();
    assert_eq!((rect.x, rect.y), (0.0, 0.0));
    assert_abs_diff_eq!(rect.width / rect.height, 16.0 / 9.0, epsilon = FRACTION_EPSILON);

    assert!(!session.set_aspect_ratio(AspectRatio::Free), "free keeps the rect");
}

#[test]
fn aspect_switch_shifts_only_when_minimum_does_not_fit() {
    let mut crop = CropState::from_crop(
        Size::new(400.0, 300.0),
        Some(CropRect::new(0.9, 0.9, 0.1, 0.1)),
        MIN_CROP_SIZE,
    );
    crop.set_ratio(AspectRatio::Classic);
    let rect = crop.rect();
    assert_inside(rect, crop.viewport());
    assert_abs_diff_eq!(rect.width / rect.height, 4.0 / 3.0, epsilon = FRACTION_EPSILON);
    assert!(rect.x < 360.0 && rect.y < 270.0, "rect shifted to fit");
}

#[test]
fn undoing_an_aspect_switch_drops_the_lock() {
    let (_store, _registry, mut session) = open_session(Size::new(400.0, 300.0));

    assert!(session.set_aspect_ratio(AspectRatio::Square));
    assert!(session.undo());
    assert_eq!(session.crop().ratio(), AspectRatio::Free);
    assert_eq!(session.crop().rect(), ViewRect::new(0.0, 0.0, 400.0, 300.0));

    // a free drag of the restored frame is not pulled back to 1:1
    session.begin_drag(CropHandle::SouthEast, Point::new(400.0, 300.0));
    session.pointer_move(Point::new(300.0, 280.0));
    assert!(session.pointer_up());
    let rect = session.crop().rect();
    assert_eq!((rect.width, rect.height), (300.0, 280.0));
}

#[test]
fn undoing_a_locked_drag_keeps_the_lock() {
    let (_store, _registry, mut session) = open_session(Size::new(400.0, 300.0));

    session.set_aspect_ratio(AspectRatio::Square);
    session.begin_drag(CropHandle::SouthEast, Point::new(300.0, 300.0));
    session.pointer_move(Point::new(200.0, 200.0));
    assert!(session.pointer_up());

    assert!(session.undo());
    assert_eq!(session.crop().ratio(), AspectRatio::Square);
    assert_eq!(session.crop().rect(), ViewRect::new(0.0, 0.0, 300.0, 300.0));
}

#[test]
fn clear_crop_restores_full_frame() {
    let (_store, _registry, mut session) = open_session(Size::new(400.0, 300.0));

    session.set_aspect_ratio(AspectRatio::Square);
    assert!(session.clear_crop());
    assert!(session.state().crop.is_none());
    assert_eq!(session.crop().ratio(), AspectRatio::Free);
    assert_eq!(session.crop().rect(), ViewRect::new(0.0, 0.0, 400.0, 300.0));
}

// =============================================================================
// Save / cancel / previews
// =============================================================================

#[test]
fn save_produces_patch_for_store() {
    let registry = PreviewRegistry::new();
    let (mut store, id) = store_with_photo(&registry);
    let entry = store.get(id).expect("entry");
    let mut session =
        EditorSession::open(entry, Size::new(80.0, 60.0), &registry, EditorOptions::default());

    session.set_adjustment(AdjustmentKind::Brightness, 1.2);
    session.rotate_clockwise();
    let (photo_id, patch) = session.save();

    assert!(store.update(photo_id, patch));
    let state = store.get(id).expect("entry").state();
    assert_eq!(state.adjustments.brightness(), 1.2);
    assert_eq!(state.rotation.degrees(), 90);
}

#[test]
fn cancel_leaves_store_untouched() {
    let registry = PreviewRegistry::new();
    let (store, id) = store_with_photo(&registry);
    let entry = store.get(id).expect("entry");
    let mut session =
        EditorSession::open(entry, Size::new(80.0, 60.0), &registry, EditorOptions::default());

    session.apply_preset("drama");
    session.flip_horizontal();
    assert!(session.has_unsaved_changes());
    session.cancel();

    assert!(store.get(id).expect("entry").state().is_pristine());
}

#[test]
fn replaced_and_closed_previews_are_released() {
    let (_store, registry, mut session) = open_session(Size::new(80.0, 60.0));
    assert_eq!(registry.outstanding(), 1, "store entry preview");

    let first = session.render_preview().expect("preview");
    session.rotate_clockwise();
    let second = session.render_preview().expect("preview");
    assert_ne!(first, second);
    assert_eq!(registry.outstanding(), 2, "old editor preview released");

    session.cancel();
    assert_eq!(registry.outstanding(), 1);
}

#[test]
fn saved_session_releases_preview() {
    let (_store, registry, mut session) = open_session(Size::new(80.0, 60.0));
    session.render_preview().expect("preview");
    let _ = session.save();
    assert_eq!(registry.outstanding(), 1);
}

#[test]
fn reopening_restores_saved_crop() {
    let registry = PreviewRegistry::new();
    let (mut store, id) = store_with_photo(&registry);
    let viewport = Size::new(400.0, 300.0);

    let mut session = EditorSession::open(
        store.get(id).expect("entry"),
        viewport,
        &registry,
        EditorOptions::default(),
    );
    session.begin_drag(CropHandle::NorthWest, Point::new(0.0, 0.0));
    session.pointer_move(Point::new(100.0, 60.0));
    session.pointer_up();
    let (photo_id, patch) = session.save();
    store.update(photo_id, patch);

    let session = EditorSession::open(
        store.get(id).expect("entry"),
        viewport,
        &registry,
        EditorOptions::default(),
    );
    let rect = session.crop().rect();
    assert_abs_diff_eq!(rect.x, 100.0, epsilon = VIEW_EPSILON);
    assert_abs_diff_eq!(rect.y, 60.0, epsilon = VIEW_EPSILON);
    assert_abs_diff_eq!(rect.width, 300.0, epsilon = VIEW_EPSILON);
}
