use crate::PaintApp;
use crate::command::Command;
use crate::state::config::{BRUSH_SIZE_RANGE, GradientKind, HARDNESS_RANGE, PaintKind, STROKE_WIDTH_RANGE};
use crate::tools::ToolKind;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Tools");

                let active = app.editor().tool();
                egui::Grid::new("tool_grid").num_columns(2).show(ui, |ui| {
                    for (i, tool) in ToolKind::ALL.into_iter().enumerate() {
                        if ui.selectable_label(active == tool, tool.label()).clicked() {
                            log::info!("Tool selected from UI: {}", tool.name());
                            app.run(Command::SetTool(tool));
                        }
                        if i % 2 == 1 {
                            ui.end_row();
                        }
                    }
                });
                ui.separator();

                tool_settings(app, ui);
                ui.separator();

                // Undo/Redo section
                ui.horizontal(|ui| {
                    let can_undo = app.editor().history().can_undo();
                    let can_redo = app.editor().history().can_redo();

                    if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                        app.run(Command::Undo);
                    }
                    if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                        app.run(Command::Redo);
                    }
                });

                let history = app.editor().history();
                ui.label(format!(
                    "History: {} of {} ({} to redo)",
                    history.step().map_or(0, |step| step + 1),
                    history.capacity(),
                    history.redo_count()
                ));
            });
        });
}

fn tool_settings(app: &mut PaintApp, ui: &mut egui::Ui) {
    let tool = app.editor().tool();
    let config = app.editor_mut().tool_config_mut();

    ui.horizontal(|ui| {
        ui.label("Colours:");
        egui::color_picker::color_edit_button_srgba(ui, &mut config.primary, egui::color_picker::Alpha::Opaque);
        egui::color_picker::color_edit_button_srgba(ui, &mut config.secondary, egui::color_picker::Alpha::Opaque);
        if ui.small_button("⇄").on_hover_text("Swap colours").clicked() {
            config.swap_colors();
        }
    });

    let mut size = config.brush_size;
    if ui.add(egui::Slider::new(&mut size, BRUSH_SIZE_RANGE).text("Size")).changed() {
        config.set_brush_size(size);
    }
    let mut opacity = config.opacity;
    if ui.add(egui::Slider::new(&mut opacity, 0.0..=1.0).text("Opacity")).changed() {
        config.set_opacity(opacity);
    }

    match tool {
        ToolKind::Pencil => {
            let mut hardness = config.hardness;
            if ui.add(egui::Slider::new(&mut hardness, HARDNESS_RANGE).text("Hardness")).changed() {
                config.set_hardness(hardness);
            }
        }
        ToolKind::PaintBrush => {
            ui.horizontal(|ui| {
                for kind in PaintKind::ALL {
                    ui.selectable_value(&mut config.paint, kind, kind.label());
                }
            });
        }
        ToolKind::Line | ToolKind::Rectangle | ToolKind::Ellipse => {
            let mut width = config.shape_stroke_width;
            if ui.add(egui::Slider::new(&mut width, STROKE_WIDTH_RANGE).text("Stroke")).changed() {
                config.set_shape_stroke_width(width);
            }
            if tool != ToolKind::Line {
                ui.checkbox(&mut config.fill_shapes, "Fill shape");
            }
        }
        ToolKind::Gradient => {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut config.gradient, GradientKind::Linear, "Linear");
                ui.selectable_value(&mut config.gradient, GradientKind::Radial, "Radial");
            });
        }
        ToolKind::Text => {
            ui.label("Text (size sets the font size):");
            ui.text_edit_singleline(&mut config.text);
        }
        _ => {}
    }
}
