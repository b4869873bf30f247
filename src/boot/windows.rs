//=========================================================================
// Boot Windows
//=========================================================================
//
// Overlay windows drawn on top of the boot menus.
//
// - MenuWindow: background panel behind the options hierarchy
// - MessageWindow: modal prompt shown while a rebind capture is pending
// - HelpWindow: first-start controls overview
//
// Windows only hold visibility and text; the boot mode decides when they
// appear and routes input around them.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::{InputService, KeyAction};
use crate::core::system::SystemService;
use crate::core::video::{Color, DrawFlags, VideoService};

//=== MenuWindow ==========================================================

/// Plain background panel.
#[derive(Debug, Clone)]
pub struct MenuWindow {
    position: (f32, f32),
    size: (f32, f32),
    visible: bool,
}

impl MenuWindow {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { position: (x, y), size: (width, height), visible: false }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn draw(&self, video: &mut dyn VideoService) {
        if !self.visible {
            return;
        }
        video.push_state();
        video.set_draw_flags(DrawFlags::TOP_LEFT);
        video.move_to(self.position.0, self.position.1);
        video.draw_panel(self.size.0, self.size.1);
        video.pop_state();
    }
}

//=== MessageWindow =======================================================

/// Single-message modal prompt.
#[derive(Debug, Clone)]
pub struct MessageWindow {
    text: String,
    position: (f32, f32),
    visible: bool,
}

impl MessageWindow {
    pub fn new(x: f32, y: f32) -> Self {
        Self { text: String::new(), position: (x, y), visible: false }
    }

    /// Replaces the text and makes the window visible.
    pub fn show_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn draw(&self, video: &mut dyn VideoService) {
        if !self.visible {
            return;
        }
        video.push_state();
        video.set_draw_flags(DrawFlags::CENTERED);
        video.move_to(self.position.0, self.position.1);
        video.draw_panel(420.0, 60.0);
        video.draw_text(&self.text, Color::WHITE);
        video.pop_state();
    }
}

//=== HelpWindow ==========================================================

/// Controls overview shown on first start.
#[derive(Debug, Clone, Default)]
pub struct HelpWindow {
    active: bool,
}

impl HelpWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self) {
        self.active = true;
    }

    pub fn hide(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Lines listing the current key bindings.
    pub fn lines(input: &dyn InputService, system: &dyn SystemService) -> Vec<String> {
        let mut lines = vec![system.translate("Controls")];
        lines.extend(KeyAction::ALL.iter().map(|action| {
            format!("{}: {}", system.translate(action.label()), input.key_name(*action))
        }));
        lines.push(system.translate("Press any key to continue."));
        lines
    }

    pub fn draw(&self, video: &mut dyn VideoService, input: &dyn InputService, system: &dyn SystemService) {
        if !self.active {
            return;
        }
        video.push_state();
        video.set_draw_flags(DrawFlags::CENTERED);
        video.move_to(512.0, 384.0);
        video.draw_panel(600.0, 400.0);

        for (i, line) in Self::lines(input, system).iter().enumerate() {
            video.move_to(512.0, 220.0 + i as f32 * 32.0);
            video.draw_text(line, Color::WHITE);
        }
        video.pop_state();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::InputSystem;
    use crate::core::system::SystemManager;
    use crate::core::video::{DrawCommand, VideoManager};

    #[test]
    fn hidden_windows_draw_nothing() {
        let mut video = VideoManager::new();
        MenuWindow::new(0.0, 0.0, 10.0, 10.0).draw(&mut video);
        MessageWindow::new(0.0, 0.0).draw(&mut video);
        HelpWindow::new().draw(&mut video, &InputSystem::new(), &SystemManager::new());

        assert!(video.take_draw_commands().is_empty());
    }

    #[test]
    fn message_window_draws_text_over_panel() {
        let mut video = VideoManager::new();
        let mut window = MessageWindow::new(210.0, 733.0);
        window.show_text("Please press a new key.");

        window.draw(&mut video);

        let commands = video.take_draw_commands();
        assert!(matches!(commands[0], DrawCommand::Panel { x, y, .. } if x == 210.0 && y == 733.0));
        assert!(matches!(&commands[1], DrawCommand::Text { text, .. } if text == "Please press a new key."));
    }

    #[test]
    fn help_lines_show_current_bindings() {
        let system = SystemManager::new()
            .with_catalog("en", [("Move Up", "Up")]);
        let input = InputSystem::new();

        let lines = HelpWindow::lines(&input, &system);

        assert_eq!(lines.len(), KeyAction::ALL.len() + 2);
        assert_eq!(lines[1], "Up: up");
        assert_eq!(lines[5], "Confirm: f");
    }
}
