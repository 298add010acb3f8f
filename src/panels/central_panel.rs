use crate::PaintApp;
use crate::input::{CoordinateMapper, InputEvent};

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let available = ui.available_rect_before_wrap();

        // One buffer pixel per physical pixel, shrunk to fit the panel.
        let buffer = app.editor().surface().size();
        let natural = buffer / ctx.pixels_per_point();
        let fit = (available.width() / natural.x).min(available.height() / natural.y).min(1.0);
        let rect = egui::Rect::from_center_size(available.center(), natural * fit);

        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let mapper = CoordinateMapper::for_display(rect, buffer);
        app.editor_mut().set_mapper(mapper);

        // Handle input
        app.input_handler_mut().set_canvas_rect(rect);
        app.input_handler_mut().set_canvas_hovered(response.hovered() || response.is_pointer_button_down_on());
        let typing = ctx.wants_keyboard_input();
        let events = app.input_handler_mut().process_input(ctx);
        for event in &events {
            if typing && matches!(event, InputEvent::KeyDown { .. }) {
                continue;
            }
            app.editor_mut().handle_event(event);
        }

        // Render the canvas
        let painter = ui.painter_at(rect);
        app.editor_mut().render(ctx, &painter, rect);

        if response.hovered() {
            ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
        }
    });
}
