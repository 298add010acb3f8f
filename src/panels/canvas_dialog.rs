use crate::PaintApp;

/// The "New canvas" window: width, height and background, validated on apply.
pub fn canvas_dialog(app: &mut PaintApp, ctx: &egui::Context) {
    if !app.canvas_form_mut().open {
        return;
    }

    let mut open = true;
    let mut apply = false;
    let mut reset = false;
    egui::Window::new("New canvas")
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            let form = app.canvas_form_mut();
            egui::Grid::new("canvas_form").num_columns(2).show(ui, |ui| {
                ui.label("Width");
                ui.text_edit_singleline(&mut form.width);
                ui.end_row();
                ui.label("Height");
                ui.text_edit_singleline(&mut form.height);
                ui.end_row();
                ui.label("Background");
                ui.text_edit_singleline(&mut form.background);
                ui.end_row();
            });
            ui.horizontal(|ui| {
                apply = ui.button("Apply").clicked();
                reset = ui.button("Defaults").clicked();
            });
            if let Some(status) = app.status() {
                ui.colored_label(ui.visuals().warn_fg_color, status);
            }
        });

    if reset {
        app.reset_canvas_form();
    }
    if apply {
        app.apply_canvas_form();
    }
    if !open {
        app.canvas_form_mut().open = false;
    }
}
