use egui::Color32;
use image::Rgba;
use raster_paint::command::{HISTORY_CAPACITY, SnapshotHistory};
use raster_paint::state::CanvasConfig;
use raster_paint::surface::Surface;

// Helper to create a small surface with the default background
fn create_test_surface() -> Surface {
    Surface::new(&CanvasConfig::new(16, 8, Color32::from_rgb(0x22, 0x22, 0x22)).unwrap())
}

// Marks the surface so every committed state is distinguishable
fn mark(surface: &mut Surface, i: u32) {
    let x = i % surface.width();
    let y = (i / surface.width()) % surface.height();
    surface.pixels_mut().put_pixel(x, y, Rgba([255, (i % 256) as u8, 0, 255]));
}

fn history_with_baseline(surface: &Surface) -> SnapshotHistory {
    let mut history = SnapshotHistory::default();
    history.commit(surface);
    history
}

#[test]
fn test_n_commits_then_n_undos_restores_original() {
    let mut surface = create_test_surface();
    let mut history = history_with_baseline(&surface);
    let original = surface.snapshot();

    for i in 0..7 {
        mark(&mut surface, i);
        history.commit(&surface);
    }
    assert_ne!(surface.image(), &original);

    for _ in 0..7 {
        assert!(history.undo(&mut surface));
    }
    assert_eq!(surface.image(), &original);
    assert!(!history.can_undo());
}

#[test]
fn test_undo_then_redo_is_noop() {
    let mut surface = create_test_surface();
    let mut history = history_with_baseline(&surface);
    for i in 0..3 {
        mark(&mut surface, i);
        history.commit(&surface);
    }
    let before = surface.snapshot();
    let step = history.step();

    assert!(history.undo(&mut surface));
    assert!(history.redo(&mut surface));

    assert_eq!(surface.image(), &before);
    assert_eq!(history.step(), step);
    assert!(!history.can_redo());
}

#[test]
fn test_commit_after_undo_prunes_redo() {
    let mut surface = create_test_surface();
    let mut history = history_with_baseline(&surface);
    for i in 0..4 {
        mark(&mut surface, i);
        history.commit(&surface);
    }
    history.undo(&mut surface);
    history.undo(&mut surface);
    assert_eq!(history.redo_count(), 2);

    mark(&mut surface, 40);
    history.commit(&surface);

    assert!(!history.can_redo());
    assert_eq!(history.len(), 4);
    assert_eq!(history.step(), Some(3));
}

#[test]
fn test_temporary_commits_never_add_undo_steps() {
    let mut surface = create_test_surface();
    let mut history = history_with_baseline(&surface);

    for i in 0..5 {
        mark(&mut surface, i);
        history.commit_temporary(&surface);
    }
    assert_eq!(history.len(), 1);
    assert_eq!(history.undo_count(), 0);
    assert!(!history.can_undo());
    assert!(!history.can_redo());

    // The slot holds the latest temporary write only.
    let latest = surface.snapshot();
    let mut other = create_test_surface();
    assert!(history.restore_temporary(&mut other));
    assert_eq!(other.image(), &latest);
}

#[test]
fn test_durable_commit_discards_temporary() {
    let mut surface = create_test_surface();
    let mut history = history_with_baseline(&surface);
    history.commit_temporary(&surface);
    assert!(history.has_temporary());

    mark(&mut surface, 1);
    history.commit(&surface);
    assert!(!history.has_temporary());
    assert!(!history.restore_temporary(&mut surface));
}

#[test]
fn test_capacity_evicts_oldest() {
    let mut surface = create_test_surface();
    let mut history = SnapshotHistory::default();
    let mut states = Vec::new();

    for i in 0..31 {
        mark(&mut surface, i);
        history.commit(&surface);
        states.push(surface.snapshot());
    }

    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert_eq!(history.step(), Some(29));

    let mut undos = 0;
    while history.undo(&mut surface) {
        undos += 1;
    }
    assert_eq!(undos, 29);
    // The very first commit was evicted; the oldest reachable state is the second.
    assert_eq!(surface.image(), &states[1]);
}

#[test]
fn test_empty_history_is_noop() {
    let mut surface = create_test_surface();
    let before = surface.snapshot();
    let mut history = SnapshotHistory::default();

    assert!(!history.undo(&mut surface));
    assert!(!history.redo(&mut surface));
    assert!(!history.restore_current(&mut surface));
    assert!(history.current().is_none());
    assert_eq!(surface.image(), &before);
}

#[test]
fn test_restore_out_of_range_is_noop() {
    let mut surface = create_test_surface();
    let history = history_with_baseline(&surface);
    mark(&mut surface, 3);
    let before = surface.snapshot();

    assert!(!history.restore(5, &mut surface));
    assert_eq!(surface.image(), &before);
}

#[test]
fn test_restore_adopts_snapshot_size() {
    let small = create_test_surface();
    let history = history_with_baseline(&small);

    let mut large = Surface::new(&CanvasConfig::default());
    assert!(history.restore(0, &mut large));
    assert_eq!((large.width(), large.height()), (16, 8));
}
