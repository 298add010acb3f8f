use crate::PaintApp;
use crate::command::Command;
use crate::symmetry::SymmetryMode;

/// Draws the menu bar. Returns true while one of its menus is open.
pub fn menu_bar(app: &mut PaintApp, ctx: &egui::Context) -> bool {
    let mut any_open = false;
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            any_open |= ui
                .menu_button("File", |ui| {
                    if ui.button("New canvas…").clicked() {
                        app.canvas_form_mut().open = true;
                        ui.close_menu();
                    }
                    if ui.button("Reset canvas").clicked() {
                        app.reset_canvas_form();
                        app.run(Command::ResetCanvas);
                        ui.close_menu();
                    }
                    if ui.button("Clear").clicked() {
                        app.run(Command::ClearCanvas);
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Export PNG").clicked() {
                        app.run(Command::Export);
                        ui.close_menu();
                    }
                    ui.label("Drop an image on the window to open it");
                    ui.separator();
                    if ui.button("Save settings").clicked() {
                        app.save_settings();
                        ui.close_menu();
                    }
                    if ui.button("Load settings").clicked() {
                        app.load_settings();
                        ui.close_menu();
                    }
                })
                .inner
                .is_some();

            any_open |= ui
                .menu_button("Edit", |ui| {
                    let history = app.editor().history();
                    let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
                    if ui.add_enabled(can_undo, egui::Button::new("Undo").shortcut_text("Ctrl+Z")).clicked() {
                        app.run(Command::Undo);
                        ui.close_menu();
                    }
                    if ui.add_enabled(can_redo, egui::Button::new("Redo").shortcut_text("Ctrl+Y")).clicked() {
                        app.run(Command::Redo);
                        ui.close_menu();
                    }
                })
                .inner
                .is_some();

            any_open |= ui
                .menu_button("View", |ui| {
                    if ui.button("Zoom in").clicked() {
                        app.run(Command::ZoomIn);
                    }
                    if ui.button("Zoom out").clicked() {
                        app.run(Command::ZoomOut);
                    }
                    if ui.button("Reset zoom").clicked() {
                        app.run(Command::ResetZoom);
                        ui.close_menu();
                    }
                    ui.separator();
                    let mut grid = app.editor().show_grid();
                    if ui.checkbox(&mut grid, "Grid").changed() {
                        app.run(Command::ToggleGrid);
                    }
                    ui.separator();
                    ui.label("Symmetry");
                    let current = app.editor().symmetry();
                    for mode in SymmetryMode::ALL {
                        if ui.radio(current == mode, mode.label()).clicked() {
                            app.run(Command::SetSymmetry(mode));
                        }
                    }
                })
                .inner
                .is_some();
        });
    });
    any_open
}
