use std::collections::BTreeMap;

use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect, Vec2};

pub mod mapper;

pub use mapper::CoordinateMapper;

/// Input the editor reacts to, in screen coordinates (egui points).
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A mouse button was pressed over the canvas
    PointerDown {
        position: Pos2,
        button: PointerButton,
        modifiers: Modifiers,
    },
    /// The pointer moved (with or without buttons pressed)
    PointerMove { position: Pos2 },
    /// A mouse button was released
    PointerUp { position: Pos2, button: PointerButton },
    /// The pointer left the canvas or the window
    PointerLeave,
    /// A finger landed; `touches` holds every active touch, oldest first
    TouchStart { touches: Vec<Pos2> },
    TouchMove { touches: Vec<Pos2> },
    /// A finger lifted; `touches` holds the ones still down
    TouchEnd { touches: Vec<Pos2> },
    /// Mouse wheel over the canvas
    Wheel { position: Pos2, delta: Vec2 },
    KeyDown { key: Key, modifiers: Modifiers },
}

/// Handles converting raw egui input into our domain-specific InputEvents
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Option<Rect>,
    /// The canvas is the top layer under the pointer (no window or popup over it)
    canvas_hovered: bool,
    touches: BTreeMap<u64, Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the on-screen canvas rectangle
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = Some(rect);
    }

    /// Whether the canvas widget owns the pointer this frame, as egui reports it.
    pub fn set_canvas_hovered(&mut self, hovered: bool) {
        self.canvas_hovered = hovered;
    }

    fn in_canvas(&self, pos: Pos2) -> bool {
        self.canvas_rect.is_some_and(|rect| rect.contains(pos))
    }

    /// Presses and scrolls only reach the canvas when nothing is drawn on top of it.
    fn accepts_press(&self, pos: Pos2) -> bool {
        self.canvas_hovered && self.in_canvas(pos)
    }

    /// Process raw egui input and generate our InputEvents
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let touch_frame = self.collect_touches(&input.events, &mut events);

            // egui also emulates the pointer from the first touch; ignore it while fingers are down.
            if !touch_frame {
                self.collect_pointer(input, &mut events);
            }

            for event in &input.events {
                if let egui::Event::Key { key, pressed: true, modifiers, .. } = event {
                    events.push(InputEvent::KeyDown { key: *key, modifiers: *modifiers });
                }
            }
        });

        events
    }

    fn collect_pointer(&mut self, input: &egui::InputState, events: &mut Vec<InputEvent>) {
        match input.pointer.hover_pos() {
            Some(pos) => {
                if Some(pos) != self.last_pointer_pos {
                    if self.last_pointer_pos.is_some_and(|last| self.in_canvas(last)) && !self.in_canvas(pos) {
                        events.push(InputEvent::PointerLeave);
                    } else {
                        events.push(InputEvent::PointerMove { position: pos });
                    }
                }
                self.last_pointer_pos = Some(pos);

                let scroll = input.raw_scroll_delta;
                if scroll != Vec2::ZERO && self.accepts_press(pos) {
                    events.push(InputEvent::Wheel { position: pos, delta: scroll });
                }
            }
            None => {
                if self.last_pointer_pos.take().is_some() {
                    // Pointer left the window
                    events.push(InputEvent::PointerLeave);
                }
            }
        }

        for button in [PointerButton::Primary, PointerButton::Secondary, PointerButton::Middle] {
            let Some(pos) = input.pointer.interact_pos() else {
                continue;
            };
            if input.pointer.button_pressed(button) && self.accepts_press(pos) {
                events.push(InputEvent::PointerDown { position: pos, button, modifiers: input.modifiers });
            }
            if input.pointer.button_released(button) {
                events.push(InputEvent::PointerUp { position: pos, button });
            }
        }
    }

    /// Returns true if touches were active this frame.
    fn collect_touches(&mut self, raw: &[egui::Event], events: &mut Vec<InputEvent>) -> bool {
        let mut any = !self.touches.is_empty();
        for event in raw {
            let egui::Event::Touch { id, phase, pos, .. } = event else {
                continue;
            };
            any = true;
            match phase {
                egui::TouchPhase::Start => {
                    if self.touches.is_empty() && !self.accepts_press(*pos) {
                        continue;
                    }
                    self.touches.insert(id.0, *pos);
                    events.push(InputEvent::TouchStart { touches: self.active_touches() });
                }
                egui::TouchPhase::Move => {
                    if let Some(slot) = self.touches.get_mut(&id.0) {
                        *slot = *pos;
                        events.push(InputEvent::TouchMove { touches: self.active_touches() });
                    }
                }
                egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                    if self.touches.remove(&id.0).is_some() {
                        events.push(InputEvent::TouchEnd { touches: self.active_touches() });
                    }
                }
            }
        }
        any
    }

    fn active_touches(&self) -> Vec<Pos2> {
        self.touches.values().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Event, RawInput, pos2, vec2};

    fn press_at(hovered: bool, pos: Pos2) -> Vec<InputEvent> {
        let ctx = Context::default();
        let mut handler = InputHandler::new();
        handler.set_canvas_rect(Rect::from_min_size(pos2(0.0, 0.0), vec2(200.0, 200.0)));
        handler.set_canvas_hovered(hovered);

        let raw = RawInput {
            events: vec![
                Event::PointerMoved(pos),
                Event::PointerButton { pos, button: PointerButton::Primary, pressed: true, modifiers: Modifiers::NONE },
            ],
            ..Default::default()
        };
        let mut events = Vec::new();
        let _ = ctx.run(raw, |ctx| events = handler.process_input(ctx));
        events
    }

    fn has_press(events: &[InputEvent]) -> bool {
        events.iter().any(|event| matches!(event, InputEvent::PointerDown { .. }))
    }

    #[test]
    fn test_press_on_canvas_starts_gesture() {
        let events = press_at(true, pos2(50.0, 50.0));
        assert!(events.contains(&InputEvent::PointerDown {
            position: pos2(50.0, 50.0),
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }));
    }

    #[test]
    fn test_press_on_covering_window_is_not_a_gesture() {
        // Inside the canvas rect, but a window or popup is on top.
        assert!(!has_press(&press_at(false, pos2(50.0, 50.0))));
    }

    #[test]
    fn test_press_outside_canvas_is_not_a_gesture() {
        assert!(!has_press(&press_at(true, pos2(250.0, 50.0))));
    }
}
