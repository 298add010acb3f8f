mod canvas_dialog;
mod central_panel;
mod menu_bar;
mod tools_panel;

pub use canvas_dialog::canvas_dialog;
pub use central_panel::central_panel;
pub use menu_bar::menu_bar;
pub use tools_panel::tools_panel;

use crate::PaintApp;

pub fn status_bar(app: &mut PaintApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let editor = app.editor();
            let surface = editor.surface();
            ui.label(format!("{}×{}", surface.width(), surface.height()));
            ui.separator();
            ui.label(format!("{:.0}%", editor.view().zoom() * 100.0));
            ui.separator();
            ui.label(editor.tool().name());
            ui.separator();
            ui.label(editor.state().name());
            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }
        });
    });
}
