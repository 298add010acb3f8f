use crate::command::{Command, CommandOutcome};
use crate::file_handler::FileHandler;
use crate::input::InputHandler;
use crate::state::persistence::{self, Settings};
use crate::state::{CanvasConfig, EditorContext};
use crate::panels;

/// File used by the "Save settings" / "Load settings" menu entries.
pub const SETTINGS_FILE_NAME: &str = "raster_paint_settings.json";

/// Form fields of the "New canvas" dialog.
#[derive(Debug, Clone)]
pub struct CanvasForm {
    pub width: String,
    pub height: String,
    pub background: String,
    pub open: bool,
}

impl CanvasForm {
    fn from_config(config: &CanvasConfig) -> Self {
        Self {
            width: config.width.to_string(),
            height: config.height.to_string(),
            background: config.background.to_hex(),
            open: false,
        }
    }
}

pub struct PaintApp {
    editor: EditorContext,
    input_handler: InputHandler,
    file_handler: FileHandler,
    canvas_form: CanvasForm,
    menu_was_open: bool,
    /// Last user-facing message, e.g. a rejected config or a failed import
    status: Option<String>,
}

impl Default for PaintApp {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load previous settings (if any).
        let settings = cc
            .storage
            .and_then(|storage| eframe::get_value::<Settings>(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: Settings) -> Self {
        let canvas_form = CanvasForm::from_config(&settings.canvas);
        Self {
            editor: EditorContext::from_settings(settings),
            input_handler: InputHandler::new(),
            file_handler: FileHandler::new(),
            canvas_form,
            menu_was_open: false,
            status: None,
        }
    }

    pub fn editor(&self) -> &EditorContext {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorContext {
        &mut self.editor
    }

    pub fn input_handler_mut(&mut self) -> &mut InputHandler {
        &mut self.input_handler
    }

    pub fn canvas_form_mut(&mut self) -> &mut CanvasForm {
        &mut self.canvas_form
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Runs a command and reports failures in the status line instead of propagating them.
    pub fn run(&mut self, command: Command) {
        match self.editor.execute(command) {
            Ok(CommandOutcome::Exported(bytes)) => self.save_export(&bytes),
            Ok(_) => {}
            Err(err) => {
                log::error!("{err}");
                self.set_status(err.to_string());
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_export(&mut self, bytes: &[u8]) {
        match crate::file_handler::save_export(bytes, crate::file_handler::EXPORT_FILE_NAME) {
            Ok(()) => self.set_status(format!("Saved {}", crate::file_handler::EXPORT_FILE_NAME)),
            Err(err) => {
                log::error!("{err}");
                self.set_status(err.to_string());
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn save_export(&mut self, bytes: &[u8]) {
        log::warn!("export of {} bytes is not available in the browser build", bytes.len());
        self.set_status("Export is only available in the desktop build");
    }

    /// Validates the "New canvas" form and rebuilds the canvas if it is valid.
    pub fn apply_canvas_form(&mut self) {
        let form = &self.canvas_form;
        match CanvasConfig::parse(&form.width, &form.height, &form.background) {
            Ok(config) => {
                self.run(Command::NewCanvas(config));
                self.canvas_form.open = false;
                self.status = None;
            }
            Err(err) => {
                log::warn!("rejected canvas config: {err}");
                self.set_status(err.to_string());
            }
        }
    }

    pub fn reset_canvas_form(&mut self) {
        self.canvas_form = CanvasForm { open: self.canvas_form.open, ..CanvasForm::from_config(&CanvasConfig::default()) };
    }

    pub fn save_settings(&mut self) {
        let result = persistence::save_settings(&self.editor.settings(), SETTINGS_FILE_NAME);
        match result {
            Ok(()) => self.set_status(format!("Settings saved to {SETTINGS_FILE_NAME}")),
            Err(err) => {
                log::error!("{err}");
                self.set_status(err.to_string());
            }
        }
    }

    pub fn load_settings(&mut self) {
        match persistence::load_settings(SETTINGS_FILE_NAME) {
            Ok(settings) => {
                self.canvas_form = CanvasForm::from_config(&settings.canvas);
                self.editor.apply_settings(settings);
                self.set_status(format!("Settings loaded from {SETTINGS_FILE_NAME}"));
            }
            Err(err) => {
                log::error!("{err}");
                self.set_status(err.to_string());
            }
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.editor.settings());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.file_handler.check_for_dropped_files(ctx) {
            for command in self.file_handler.process_dropped_files() {
                self.run(command);
            }
        }

        // Stays set for the frame in which a menu closes.
        let menu_open = panels::menu_bar(self, ctx);
        self.editor.set_menu_open(menu_open || self.menu_was_open);
        self.menu_was_open = menu_open;

        panels::tools_panel(self, ctx);
        panels::status_bar(self, ctx);
        panels::central_panel(self, ctx);
        panels::canvas_dialog(self, ctx);

        self.file_handler.preview_files_being_dropped(ctx);
    }
}
