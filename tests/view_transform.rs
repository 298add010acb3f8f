use egui::{Rect, pos2, vec2};
use raster_paint::input::InputEvent;
use raster_paint::state::{CanvasConfig, EditorContext};
use raster_paint::view::{MAX_ZOOM, MIN_ZOOM};
use raster_paint::{CoordinateMapper, ViewTransform};

fn assert_close(a: egui::Pos2, b: egui::Pos2) {
    assert!((a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3, "{a:?} != {b:?}");
}

#[test]
fn test_zoom_keeps_anchor_fixed() {
    let anchors = [pos2(0.0, 0.0), pos2(400.0, 300.0), pos2(13.5, 777.0)];
    let factors = [1.1, 0.9, 2.0, 0.5];

    for anchor in anchors {
        for factor in factors {
            let mut view = ViewTransform::new(1.5, vec2(-40.0, 25.0));
            let before = view.to_content(anchor);
            view.zoom_at(anchor, factor);
            assert_close(view.to_screen(before), anchor);
        }
    }
}

#[test]
fn test_zoom_about_viewport_centre() {
    let mut view = ViewTransform::new(1.0, vec2(200.0, 150.0));
    assert_close(view.to_screen(pos2(200.0, 150.0)), pos2(400.0, 300.0));

    view.zoom_at(pos2(400.0, 300.0), 2.0);

    assert_eq!(view.zoom(), 2.0);
    assert_close(view.to_screen(pos2(200.0, 150.0)), pos2(400.0, 300.0));
}

#[test]
fn test_zoom_is_clamped() {
    let mut view = ViewTransform::default();
    view.zoom_at(pos2(100.0, 100.0), 1000.0);
    assert_eq!(view.zoom(), MAX_ZOOM);

    let anchor = pos2(50.0, 60.0);
    let pinned = view.to_content(anchor);
    view.zoom_at(anchor, 1e-6);
    assert_eq!(view.zoom(), MIN_ZOOM);
    assert_close(view.to_screen(pinned), anchor);

    assert_eq!(ViewTransform::new(0.0, vec2(0.0, 0.0)).zoom(), MIN_ZOOM);
}

#[test]
fn test_invalid_zoom_factor_is_ignored() {
    let mut view = ViewTransform::new(2.0, vec2(5.0, 5.0));
    let before = view;
    view.zoom_at(pos2(1.0, 1.0), 0.0);
    view.zoom_at(pos2(1.0, 1.0), f32::NAN);
    assert_eq!(view, before);
}

#[test]
fn test_reset_restores_identity() {
    let mut view = ViewTransform::new(3.0, vec2(-10.0, 20.0));
    view.reset();
    assert_eq!(view, ViewTransform::default());
    assert_close(view.to_screen(pos2(12.0, 34.0)), pos2(12.0, 34.0));
}

#[test]
fn test_mapper_round_trip() {
    // Canvas displayed at half size, offset inside the window.
    let mapper = CoordinateMapper::for_display(Rect::from_min_size(pos2(10.0, 20.0), vec2(400.0, 300.0)), vec2(800.0, 600.0));
    assert_eq!(mapper.scale(), vec2(2.0, 2.0));

    let view = ViewTransform::new(1.7, vec2(-33.0, 12.0));
    for screen in [pos2(10.0, 20.0), pos2(210.0, 170.0), pos2(409.0, 319.0)] {
        let content = mapper.to_content(screen, &view);
        assert_close(mapper.to_screen(content, &view), screen);
    }
    assert_close(mapper.to_content(pos2(210.0, 170.0), &ViewTransform::default()), pos2(400.0, 300.0));
}

#[test]
fn test_visible_content_range() {
    let view = ViewTransform::new(2.0, vec2(-100.0, -50.0));
    let (min, max) = view.visible_content(vec2(800.0, 600.0));
    assert_close(min, pos2(50.0, 25.0));
    assert_close(max, pos2(450.0, 325.0));
}

#[test]
fn test_wheel_zooms_around_pointer() {
    let mut editor = EditorContext::new(CanvasConfig::default());
    let pointer = pos2(100.0, 100.0);

    editor.handle_event(&InputEvent::Wheel { position: pointer, delta: vec2(0.0, 1.0) });
    assert!((editor.view().zoom() - 1.1).abs() < 1e-5);
    assert_close(editor.view().to_screen(pointer), pointer);

    editor.handle_event(&InputEvent::Wheel { position: pointer, delta: vec2(0.0, -1.0) });
    assert!(editor.view().zoom() < 1.0);
    assert_close(editor.view().to_screen(pointer), pointer);
}

#[test]
fn test_zoom_does_not_touch_surface() {
    let mut editor = EditorContext::new(CanvasConfig::default());
    let before = editor.surface().snapshot();
    for _ in 0..30 {
        editor.handle_event(&InputEvent::Wheel { position: pos2(300.0, 200.0), delta: vec2(0.0, 3.0) });
    }
    assert_eq!(editor.view().zoom(), MAX_ZOOM);
    assert_eq!(editor.surface().image(), &before);
    assert_eq!(editor.history().len(), 1);
}
