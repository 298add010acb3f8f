/// The main context for the paint editor: owns the surface, history, view and
/// viewport, and drives them from input events.
///
/// `EditorContext` is the only writer of the drawing surface. Input arrives as
/// [`InputEvent`]s in screen coordinates; the context maps them into content
/// space, runs the active tool through the symmetry engine and records undo
/// steps. Everything is single-threaded and takes `&mut self`, so events are
/// handled strictly in order.
///
/// # Gestures
///
/// - `begin_gesture`: start drawing, previewing or run a point tool
/// - `begin_pan`: start moving the view
/// - `end_gesture`: commit, finish the shape or stop panning
/// - `abort_gesture`: the pointer left; drawing is kept, previews are dropped
///
/// # Example
///
/// ```rust,no_run
/// use raster_paint::state::{CanvasConfig, EditorContext};
/// use raster_paint::InputEvent;
/// use egui::{Modifiers, PointerButton, pos2};
///
/// let mut editor = EditorContext::new(CanvasConfig::default());
/// editor.handle_event(&InputEvent::PointerDown {
///     position: pos2(10.0, 10.0),
///     button: PointerButton::Primary,
///     modifiers: Modifiers::NONE,
/// });
/// editor.handle_event(&InputEvent::PointerMove { position: pos2(50.0, 50.0) });
/// editor.handle_event(&InputEvent::PointerUp { position: pos2(50.0, 50.0), button: PointerButton::Primary });
/// assert_eq!(editor.history().len(), 2);
/// ```
use egui::{Color32, Key, Modifiers, PointerButton, Pos2, Rect, Vec2};
use image::RgbaImage;
use thiserror::Error;

use super::config::{CanvasConfig, ToolConfig};
use super::editor_state::{EditorState, PanSession, ToolSession};
use super::persistence::Settings;
use crate::command::{Command, CommandOutcome, SnapshotHistory};
use crate::error::{CommandResult, ConfigError, FileError};
use crate::file_handler;
use crate::input::{CoordinateMapper, InputEvent};
use crate::raster::RasterContext;
use crate::renderer::Renderer;
use crate::surface::Surface;
use crate::symmetry::SymmetryMode;
use crate::tools::{self, ShapeStyle, Stroke, TextStamper, ToolBehavior, ToolKind, shapes};
use crate::view::{ViewTransform, ZOOM_SENSITIVITY};

/// Errors that can occur during state transitions.
#[derive(Debug, Error, PartialEq)]
pub enum StateTransitionError {
    #[error("cannot go from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },
}

/// The main context for the paint editor.
#[derive(Debug)]
pub struct EditorContext {
    state: EditorState,
    surface: Surface,
    history: SnapshotHistory,
    view: ViewTransform,
    renderer: Renderer,
    mapper: CoordinateMapper,
    canvas: CanvasConfig,
    tools: ToolConfig,
    tool: ToolKind,
    symmetry: SymmetryMode,
    menu_open: bool,
    text: Option<TextStamper>,
    stroke_seed: u64,
    needs_repaint: bool,
}

impl EditorContext {
    /// Creates an editor with a blank canvas and a single snapshot in the history.
    pub fn new(canvas: CanvasConfig) -> Self {
        let surface = Surface::new(&canvas);
        let mut history = SnapshotHistory::default();
        history.commit(&surface);
        Self {
            state: EditorState::Idle,
            renderer: Renderer::new(canvas.width, canvas.height),
            surface,
            history,
            view: ViewTransform::default(),
            mapper: CoordinateMapper::default(),
            canvas,
            tools: ToolConfig::default(),
            tool: ToolKind::default(),
            symmetry: SymmetryMode::None,
            menu_open: false,
            text: None,
            stroke_seed: 0,
            needs_repaint: true,
        }
    }

    /// Restores an editor from saved settings.
    pub fn from_settings(settings: Settings) -> Self {
        let mut editor = Self::new(CanvasConfig::default());
        editor.apply_settings(settings);
        editor
    }

    // --- accessors -------------------------------------------------------------

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Updates where the viewport is shown on screen.
    pub fn set_mapper(&mut self, mapper: CoordinateMapper) {
        self.mapper = mapper;
    }

    pub fn canvas_config(&self) -> &CanvasConfig {
        &self.canvas
    }

    pub fn tool_config(&self) -> &ToolConfig {
        &self.tools
    }

    pub fn tool_config_mut(&mut self) -> &mut ToolConfig {
        &mut self.tools
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switches tools. A gesture in progress is finished first.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool != self.tool {
            self.abort_gesture();
            log::debug!("tool: {} -> {}", self.tool.name(), tool.name());
            self.tool = tool;
        }
    }

    /// Switches tools by name. Unknown names are ignored and return false.
    pub fn set_tool_by_name(&mut self, name: &str) -> bool {
        match ToolKind::from_name(name) {
            Some(tool) => {
                self.set_tool(tool);
                true
            }
            None => {
                log::warn!("ignoring unknown tool `{name}`");
                false
            }
        }
    }

    pub fn symmetry(&self) -> SymmetryMode {
        self.symmetry
    }

    pub fn set_symmetry(&mut self, symmetry: SymmetryMode) {
        self.symmetry = symmetry;
        self.needs_repaint = true;
    }

    pub fn show_grid(&self) -> bool {
        self.renderer.show_grid()
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.renderer.set_show_grid(show);
        self.needs_repaint = true;
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn set_menu_open(&mut self, open: bool) {
        self.menu_open = open;
    }

    pub fn settings(&self) -> Settings {
        Settings {
            canvas: CanvasConfig { width: self.surface.width(), height: self.surface.height(), ..self.canvas },
            tools: self.tools.clone(),
            tool: self.tool,
            symmetry: self.symmetry,
            show_grid: self.show_grid(),
        }
    }

    /// Applies saved settings; the canvas is rebuilt only if its config differs.
    /// A saved canvas that fails validation is ignored.
    pub fn apply_settings(&mut self, settings: Settings) {
        let canvas = settings.canvas;
        match CanvasConfig::new(canvas.width, canvas.height, canvas.background) {
            Ok(canvas) if canvas != self.canvas => self.reconfigure(canvas),
            Ok(_) => {}
            Err(err) => log::warn!("ignoring saved canvas: {err}"),
        }
        self.tools = settings.tools.sanitized();
        self.set_tool(settings.tool);
        self.set_symmetry(settings.symmetry);
        self.set_show_grid(settings.show_grid);
    }

    /// The viewport buffer, repainted first if anything changed.
    pub fn viewport(&mut self) -> &RgbaImage {
        self.refresh();
        self.renderer.viewport()
    }

    /// Repaints the viewport if the surface, view or overlays changed since the last repaint.
    pub fn refresh(&mut self) {
        if self.needs_repaint {
            self.renderer.repaint(&self.surface, &self.view, self.symmetry);
            self.needs_repaint = false;
        }
    }

    /// Paints the viewport into `rect` on screen.
    pub fn render(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: Rect) {
        self.refresh();
        self.renderer.render(ctx, painter, rect);
    }

    // --- state machine ---------------------------------------------------------

    /// Attempts to transition to a new state, validating the transition first.
    ///
    /// # Errors
    ///
    /// Returns `StateTransitionError::InvalidTransition` if the requested transition
    /// is not allowed from the current state.
    pub fn transition_to(&mut self, new_state: EditorState) -> Result<(), StateTransitionError> {
        if !self.state.can_transition_to(&new_state) {
            return Err(StateTransitionError::InvalidTransition {
                from: self.state.name(),
                to: new_state.name(),
            });
        }
        if self.state.name() != new_state.name() {
            log::debug!("state: {} -> {}", self.state.name(), new_state.name());
        }
        self.state = new_state;
        Ok(())
    }

    fn return_to_idle(&mut self) {
        // Every state may go back to idle.
        self.state = EditorState::Idle;
    }

    /// Routes one input event through the state machine.
    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown { position, button, modifiers } => {
                self.pointer_down(*position, *button, *modifiers);
            }
            InputEvent::PointerMove { position } => self.pointer_move(*position),
            InputEvent::PointerUp { position, .. } => {
                let content = self.mapper.to_content(*position, &self.view);
                self.end_gesture(Some(content));
            }
            InputEvent::PointerLeave => self.abort_gesture(),
            InputEvent::TouchStart { touches } => self.touch_start(touches),
            InputEvent::TouchMove { touches } => self.touch_move(touches),
            InputEvent::TouchEnd { touches } => self.touch_end(touches),
            InputEvent::Wheel { position, delta } => self.wheel(*position, *delta),
            InputEvent::KeyDown { key, modifiers } => {
                self.shortcut(*key, *modifiers);
            }
        }
    }

    fn pointer_down(&mut self, screen: Pos2, button: PointerButton, modifiers: Modifiers) {
        if !self.state.is_idle() {
            return;
        }
        let pans = matches!(button, PointerButton::Middle | PointerButton::Secondary)
            || (button == PointerButton::Primary && modifiers.alt);
        if pans {
            self.begin_pan(screen, None);
        } else if button == PointerButton::Primary {
            let content = self.mapper.to_content(screen, &self.view);
            self.begin_gesture(content);
        }
    }

    fn pointer_move(&mut self, screen: Pos2) {
        match self.state {
            EditorState::Idle => {}
            EditorState::Panning { pan } => {
                let delta = self.mapper.delta_to_buffer(screen - pan.last);
                self.view.pan_by(delta);
                self.update_pan(PanSession { last: screen, ..pan });
                self.needs_repaint = true;
            }
            EditorState::Drawing { .. } | EditorState::Previewing { .. } => {
                let content = self.mapper.to_content(screen, &self.view);
                self.continue_gesture(content);
            }
        }
    }

    /// Starts a gesture at a content point with the active tool.
    ///
    /// Point tools act immediately; shape tools take a temporary baseline and
    /// start previewing; everything else starts drawing.
    pub fn begin_gesture(&mut self, content: Pos2) {
        if !self.state.is_idle() {
            return;
        }
        if self.menu_open {
            log::debug!("gesture swallowed by open menu");
            self.menu_open = false;
            return;
        }
        let session = ToolSession::new(self.tool, content);
        let result = match self.tool.behavior() {
            ToolBehavior::Point => {
                self.apply_point_tool(content);
                Ok(())
            }
            ToolBehavior::Shape => {
                self.history.commit_temporary(&self.surface);
                self.transition_to(EditorState::Previewing { session })
            }
            ToolBehavior::Continuous => self.transition_to(EditorState::Drawing { session }),
        };
        if let Err(err) = result {
            log::warn!("could not start gesture: {err}");
        }
    }

    /// Starts panning from a screen point; `pinch_distance` is set for two-finger gestures.
    pub fn begin_pan(&mut self, screen: Pos2, pinch_distance: Option<f32>) {
        if self.menu_open {
            self.menu_open = false;
            return;
        }
        let pan = PanSession { last: screen, pinch_distance };
        if let Err(err) = self.transition_to(EditorState::Panning { pan }) {
            log::warn!("could not start panning: {err}");
        }
    }

    fn update_pan(&mut self, pan: PanSession) {
        if let Some(current) = self.state.pan_session_mut() {
            *current = pan;
        }
    }

    /// Feeds the next content point to the active drawing or previewing gesture.
    pub fn continue_gesture(&mut self, content: Pos2) {
        match self.state {
            EditorState::Drawing { session } => {
                self.draw_continuous(session.tool, session.last, content);
            }
            EditorState::Previewing { session } => {
                self.history.restore_temporary(&mut self.surface);
                self.draw_shape(session.tool, session.start, content, false);
            }
            _ => return,
        }
        if let Some(session) = self.state.session_mut() {
            session.last = content;
        }
        self.needs_repaint = true;
    }

    /// Ends the gesture in progress. `end` is the final content point, if known.
    pub fn end_gesture(&mut self, end: Option<Pos2>) {
        match self.state {
            EditorState::Idle => return,
            EditorState::Drawing { .. } => self.commit_if_changed(),
            EditorState::Previewing { session } => {
                let end = end.unwrap_or(session.last);
                self.history.restore_current(&mut self.surface);
                self.draw_shape(session.tool, session.start, end, true);
                self.commit_if_changed();
            }
            EditorState::Panning { .. } => {}
        }
        self.return_to_idle();
        self.needs_repaint = true;
    }

    /// The pointer left the canvas or input was lost mid-gesture.
    ///
    /// Panning stops, strokes already painted are committed, and a shape preview
    /// is rolled back to its baseline.
    pub fn abort_gesture(&mut self) {
        match self.state {
            EditorState::Idle => return,
            EditorState::Drawing { .. } => self.commit_if_changed(),
            EditorState::Previewing { .. } => {
                self.history.restore_temporary(&mut self.surface);
                self.history.discard_temporary();
            }
            EditorState::Panning { .. } => {}
        }
        self.return_to_idle();
        self.needs_repaint = true;
    }

    /// Records an undo step unless the gesture left the surface as it was.
    fn commit_if_changed(&mut self) {
        if self.history.current() == Some(self.surface.image()) {
            log::debug!("gesture changed nothing, no undo step");
            self.history.discard_temporary();
        } else {
            self.history.commit(&self.surface);
        }
    }

    fn touch_start(&mut self, touches: &[Pos2]) {
        match touches {
            [] => {}
            [first] => {
                if self.state.is_idle() {
                    let content = self.mapper.to_content(*first, &self.view);
                    self.begin_gesture(content);
                }
            }
            [first, second, ..] => {
                if self.state.is_panning() {
                    return;
                }
                self.abort_gesture();
                self.begin_pan(*first, Some(first.distance(*second)));
            }
        }
    }

    fn touch_move(&mut self, touches: &[Pos2]) {
        match (self.state, touches) {
            (EditorState::Panning { pan }, [first, second, ..]) => {
                let delta = self.mapper.delta_to_buffer(*first - pan.last);
                self.view.pan_by(delta);

                let distance = first.distance(*second);
                if let Some(previous) = pan.pinch_distance.filter(|d| *d > 0.0) {
                    let midpoint = first.lerp(*second, 0.5);
                    self.view.zoom_at(self.mapper.to_buffer(midpoint), distance / previous);
                }
                self.update_pan(PanSession { last: *first, pinch_distance: Some(distance) });
                self.needs_repaint = true;
            }
            (EditorState::Drawing { .. } | EditorState::Previewing { .. }, [only]) => {
                let content = self.mapper.to_content(*only, &self.view);
                self.continue_gesture(content);
            }
            _ => {}
        }
    }

    fn touch_end(&mut self, remaining: &[Pos2]) {
        match self.state {
            EditorState::Panning { .. } if remaining.len() < 2 => self.end_gesture(None),
            EditorState::Drawing { .. } | EditorState::Previewing { .. } if remaining.is_empty() => {
                self.end_gesture(None);
            }
            _ => {}
        }
    }

    fn wheel(&mut self, screen: Pos2, delta: Vec2) {
        if delta.y == 0.0 {
            return;
        }
        // Positive y scrolls up, which zooms in.
        let factor = if delta.y > 0.0 { 1.0 + ZOOM_SENSITIVITY } else { 1.0 - ZOOM_SENSITIVITY };
        self.view.zoom_at(self.mapper.to_buffer(screen), factor);
        self.needs_repaint = true;
    }

    /// Handles undo/redo shortcuts. Returns true if the key was used.
    pub fn shortcut(&mut self, key: Key, modifiers: Modifiers) -> bool {
        if !modifiers.command {
            return false;
        }
        let command = match key {
            Key::Z if modifiers.shift => Command::Redo,
            Key::Z => Command::Undo,
            Key::Y => Command::Redo,
            _ => return false,
        };
        // Undo and redo never fail.
        self.execute(command).is_ok()
    }

    // --- drawing ---------------------------------------------------------------

    fn draw_continuous(&mut self, tool: ToolKind, previous: Pos2, point: Pos2) {
        let Some(render) = tool.stroke_renderer() else {
            return;
        };
        let base = Stroke::new(previous, point, &self.tools, self.view.zoom());
        let symmetry = self.symmetry;
        let size = self.surface.size();
        let seed = &mut self.stroke_seed;
        let mut raster = self.surface.raster();

        symmetry.apply(point, size, |p, reflection| {
            *seed = seed.wrapping_add(1);
            let stroke = base.between(reflection.reflect(previous), p).with_seed(*seed);
            render(&mut raster, &stroke);
        });
    }

    /// Draws a two-point primitive. `final_draw` is false for live previews, which
    /// show a gradient as its guide and skip mirrored copies. Mirrored copies are
    /// only drawn for lines and outlined shapes.
    fn draw_shape(&mut self, tool: ToolKind, start: Pos2, end: Pos2, final_draw: bool) {
        let zoom = self.view.zoom();
        let style = ShapeStyle::from_config(&self.tools, zoom);
        let symmetry = self.symmetry;
        let size = self.surface.size();
        let config = &self.tools;
        let mut raster = self.surface.raster();

        let draw = |raster: &mut RasterContext<'_>, start: Pos2, end: Pos2| match tool {
            ToolKind::Line => shapes::line(raster, start, end, &style),
            ToolKind::Rectangle => shapes::rectangle(raster, start, end, &style),
            ToolKind::Ellipse => shapes::ellipse(raster, start, Vec2::splat(start.distance(end)), &style),
            ToolKind::Gradient if final_draw => {
                shapes::gradient(raster, start, end, config.gradient, (config.primary, config.secondary), config.opacity);
            }
            ToolKind::Gradient => shapes::gradient_guide(raster, start, end, zoom),
            _ => {}
        };

        let mirrors = match tool {
            ToolKind::Line => true,
            ToolKind::Rectangle | ToolKind::Ellipse => !style.filled,
            _ => false,
        };
        if final_draw && mirrors {
            symmetry.apply(end, size, |p, reflection| draw(&mut raster, reflection.reflect(start), p));
        } else {
            draw(&mut raster, start, end);
        }
    }

    fn apply_point_tool(&mut self, content: Pos2) {
        match self.tool {
            ToolKind::Eyedropper => self.sample_color(content),
            ToolKind::Fill => self.fill(content),
            ToolKind::Text => self.stamp_text(content),
            other => log::debug!("{} is not a point tool", other.name()),
        }
    }

    fn sample_color(&mut self, content: Pos2) {
        if let Some(pixel) = tools::sample_color(self.surface.image(), content) {
            let [r, g, b, a] = pixel.0;
            self.tools.primary = Color32::from_rgb(r, g, b);
            self.tools.set_opacity(a as f32 / 255.0);
            log::debug!("sampled #{r:02x}{g:02x}{b:02x} alpha {a}");
        }
    }

    fn fill(&mut self, content: Pos2) {
        let color = tools::fill::fill_color(self.tools.primary, self.tools.opacity);
        let changed = tools::flood_fill(self.surface.pixels_mut(), content, color);
        if changed > 0 {
            log::debug!("filled {changed} pixels");
            self.history.commit(&self.surface);
            self.needs_repaint = true;
        }
    }

    fn stamp_text(&mut self, content: Pos2) {
        if self.text.is_none() {
            self.text = TextStamper::with_default_font();
        }
        let Some(stamper) = &self.text else {
            log::warn!("text tool has no font");
            return;
        };
        let size = self.surface.size();
        let text = self.tools.text.as_str();
        let (px, color, alpha) = (self.tools.brush_size, self.tools.primary, self.tools.opacity);
        let mut raster = self.surface.raster();

        let mut stamped = false;
        self.symmetry.apply(content, size, |p, _| {
            stamped |= stamper.stamp(&mut raster, text, p, px, color, alpha);
        });
        if stamped {
            self.history.commit(&self.surface);
            self.needs_repaint = true;
        }
    }

    // --- commands --------------------------------------------------------------

    /// Runs an editor command. Gestures in progress are finished first.
    pub fn execute(&mut self, command: Command) -> CommandResult<CommandOutcome> {
        log::debug!("command: {}", command.name());
        let outcome = match command {
            Command::Undo => {
                self.abort_gesture();
                self.outcome(|editor| editor.history.undo(&mut editor.surface))
            }
            Command::Redo => {
                self.abort_gesture();
                self.outcome(|editor| editor.history.redo(&mut editor.surface))
            }
            Command::ZoomIn => self.zoom_centered(1.0 + ZOOM_SENSITIVITY),
            Command::ZoomOut => self.zoom_centered(1.0 - ZOOM_SENSITIVITY),
            Command::ResetZoom => {
                self.view.reset();
                self.needs_repaint = true;
                CommandOutcome::Done
            }
            Command::ToggleGrid => {
                self.set_show_grid(!self.show_grid());
                CommandOutcome::Done
            }
            Command::SetSymmetry(mode) => {
                self.set_symmetry(mode);
                CommandOutcome::Done
            }
            Command::SetTool(tool) => {
                self.set_tool(tool);
                CommandOutcome::Done
            }
            Command::NewCanvas(config) => {
                let config = CanvasConfig::new(config.width, config.height, config.background)?;
                self.reconfigure(config);
                CommandOutcome::Done
            }
            Command::ResetCanvas => {
                self.reconfigure(CanvasConfig::default());
                CommandOutcome::Done
            }
            Command::ClearCanvas => {
                self.abort_gesture();
                self.surface.clear();
                self.history.commit(&self.surface);
                self.needs_repaint = true;
                CommandOutcome::Done
            }
            Command::Import(bytes) => {
                let image = file_handler::decode_image(&bytes)?;
                self.import_image(&image)?;
                CommandOutcome::Done
            }
            Command::Export => CommandOutcome::Exported(file_handler::encode_png(&self.export_image()?)?),
        };
        Ok(outcome)
    }

    fn outcome(&mut self, action: impl FnOnce(&mut Self) -> bool) -> CommandOutcome {
        if action(self) {
            // Undo may cross an import, which changed the canvas size.
            self.canvas.width = self.surface.width();
            self.canvas.height = self.surface.height();
            self.needs_repaint = true;
            CommandOutcome::Done
        } else {
            CommandOutcome::Ignored
        }
    }

    fn zoom_centered(&mut self, factor: f32) -> CommandOutcome {
        let center = (self.renderer.viewport_size() * 0.5).to_pos2();
        self.view.zoom_at(center, factor);
        self.needs_repaint = true;
        CommandOutcome::Done
    }

    /// Replaces the canvas with a fresh one: history cleared, view reset.
    fn reconfigure(&mut self, config: CanvasConfig) {
        self.abort_gesture();
        log::info!("new canvas {}x{}", config.width, config.height);
        self.canvas = config;
        self.surface.configure(&config);
        self.history.clear();
        self.history.commit(&self.surface);
        self.view.reset();
        self.needs_repaint = true;
    }

    /// Sizes the canvas to `image`, draws it over the background and records an undo step.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TooLarge` for images past the canvas limits; nothing changes then.
    pub fn import_image(&mut self, image: &RgbaImage) -> Result<(), ConfigError> {
        let canvas = CanvasConfig::new(image.width(), image.height(), self.canvas.background)?;
        self.abort_gesture();
        log::info!("importing {}x{} image", image.width(), image.height());
        self.view.reset();
        self.canvas = canvas;
        self.surface.configure(&self.canvas);

        let mut raster = self.surface.raster();
        for (x, y, pixel) in image.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            raster.blend_pixel(x as i64, y as i64, [r, g, b], a as f32 / 255.0);
        }
        self.history.commit(&self.surface);
        self.needs_repaint = true;
        Ok(())
    }

    /// The drawing at the history cursor over its background, at content size.
    pub fn export_image(&self) -> Result<RgbaImage, FileError> {
        let snapshot = self.history.current().ok_or(FileError::EmptyCanvas)?;
        Ok(file_handler::flatten(snapshot, self.surface.background()))
    }
}
