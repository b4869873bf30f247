//=========================================================================
// Option Menu
//=========================================================================
//
// A list of selectable options with per-option actions.
//
// Architecture:
//   OptionMenu<A>
//     ├─ options: Vec<MenuOption<A>>   (label, enabled, confirm/left/right)
//     ├─ selection: Option<usize>
//     └─ orientation                   (which keys move the cursor)
//
// The menu never performs actions itself. Input methods return the
// action bound to the selected option and the owner dispatches it, so a
// menu can be built and driven without any services.
//
// Cursor movement wraps around and skips disabled options. On a
// horizontal menu left/right move the cursor; on a vertical menu they
// are forwarded to the selected option as adjust actions.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::video::{Color, DrawFlags, VideoService};

//=== MenuOption ==========================================================

/// One entry of an [`OptionMenu`].
#[derive(Debug, Clone, PartialEq)]
pub struct MenuOption<A> {
    pub text: String,
    pub enabled: bool,
    pub confirm: Option<A>,
    pub left: Option<A>,
    pub right: Option<A>,
}

//=== Orientation =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

//=== OptionMenu ==========================================================

/// Selectable option list. `A` is the action type returned on input.
#[derive(Debug, Clone)]
pub struct OptionMenu<A> {
    options: Vec<MenuOption<A>>,
    selection: Option<usize>,
    orientation: Orientation,
    position: (f32, f32),
    spacing: f32,
}

impl<A: Copy> OptionMenu<A> {
    //--- Construction -----------------------------------------------------

    pub fn new(orientation: Orientation) -> Self {
        Self {
            options: Vec::new(),
            selection: None,
            orientation,
            position: (512.0, 384.0),
            spacing: 40.0,
        }
    }

    /// Sets the screen position of the first option and the distance
    /// between options.
    pub fn with_layout(mut self, x: f32, y: f32, spacing: f32) -> Self {
        self.position = (x, y);
        self.spacing = spacing;
        self
    }

    /// Adds an option with only a confirm action.
    pub fn add_option(&mut self, text: impl Into<String>, confirm: Option<A>) {
        self.add_adjustable_option(text, confirm, None, None);
    }

    /// Adds an option with confirm and left/right actions.
    pub fn add_adjustable_option(
        &mut self,
        text: impl Into<String>,
        confirm: Option<A>,
        left: Option<A>,
        right: Option<A>,
    ) {
        self.options.push(MenuOption { text: text.into(), enabled: true, confirm, left, right });
        if self.selection.is_none() {
            self.selection = Some(0);
        }
    }

    pub fn clear_options(&mut self) {
        self.options.clear();
        self.selection = None;
    }

    //--- Option State -----------------------------------------------------

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn option(&self, index: usize) -> Option<&MenuOption<A>> {
        self.options.get(index)
    }

    pub fn options(&self) -> &[MenuOption<A>] {
        &self.options
    }

    pub fn option_text(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(|o| o.text.as_str())
    }

    pub fn set_option_text(&mut self, index: usize, text: impl Into<String>) {
        if let Some(option) = self.options.get_mut(index) {
            option.text = text.into();
        }
    }

    pub fn is_option_enabled(&self, index: usize) -> bool {
        self.options.get(index).map_or(false, |o| o.enabled)
    }

    pub fn enable_option(&mut self, index: usize, enabled: bool) {
        if let Some(option) = self.options.get_mut(index) {
            option.enabled = enabled;
        }
    }

    /// Indices of enabled options.
    pub fn enabled_options(&self) -> impl Iterator<Item = usize> + '_ {
        self.options
            .iter()
            .enumerate()
            .filter(|(_, o)| o.enabled)
            .map(|(i, _)| i)
    }

    //--- Selection --------------------------------------------------------

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Selects `index` if it exists; otherwise leaves the selection alone.
    pub fn set_selection(&mut self, index: usize) {
        if index < self.options.len() {
            self.selection = Some(index);
        }
    }

    /// Returns `true` if the selected option exists and is enabled.
    pub fn is_selection_enabled(&self) -> bool {
        self.selection.map_or(false, |i| self.is_option_enabled(i))
    }

    //--- Input ------------------------------------------------------------

    /// Confirm action of the selected option, if it is enabled.
    pub fn input_confirm(&self) -> Option<A> {
        self.selected_enabled().and_then(|o| o.confirm)
    }

    pub fn input_up(&mut self) -> Option<A> {
        if self.orientation == Orientation::Vertical {
            self.move_selection(-1);
        }
        None
    }

    pub fn input_down(&mut self) -> Option<A> {
        if self.orientation == Orientation::Vertical {
            self.move_selection(1);
        }
        None
    }

    /// Moves left on a horizontal menu, otherwise returns the selected
    /// option's left action.
    pub fn input_left(&mut self) -> Option<A> {
        match self.orientation {
            Orientation::Horizontal => {
                self.move_selection(-1);
                None
            }
            Orientation::Vertical => self.selected_enabled().and_then(|o| o.left),
        }
    }

    /// Moves right on a horizontal menu, otherwise returns the selected
    /// option's right action.
    pub fn input_right(&mut self) -> Option<A> {
        match self.orientation {
            Orientation::Horizontal => {
                self.move_selection(1);
                None
            }
            Orientation::Vertical => self.selected_enabled().and_then(|o| o.right),
        }
    }

    //--- Drawing ----------------------------------------------------------

    pub fn draw(&self, video: &mut dyn VideoService) {
        video.push_state();
        video.set_draw_flags(DrawFlags::CENTERED);

        for (i, option) in self.options.iter().enumerate() {
            let offset = i as f32 * self.spacing;
            let (x, y) = match self.orientation {
                Orientation::Horizontal => (self.position.0 + offset, self.position.1),
                Orientation::Vertical => (self.position.0, self.position.1 + offset),
            };
            let color = if option.enabled { Color::WHITE } else { Color::GRAY };

            video.move_to(x, y);
            if self.selection == Some(i) {
                video.draw_text(&format!("> {}", option.text), color);
            } else {
                video.draw_text(&option.text, color);
            }
        }

        video.pop_state();
    }

    //--- Internal Helpers -------------------------------------------------

    fn selected_enabled(&self) -> Option<&MenuOption<A>> {
        self.selection
            .and_then(|i| self.options.get(i))
            .filter(|o| o.enabled)
    }

    fn move_selection(&mut self, step: isize) {
        let len = self.options.len() as isize;
        let Some(start) = self.selection else { return };
        if len == 0 {
            return;
        }

        let mut index = start as isize;
        for _ in 0..len {
            index = (index + step).rem_euclid(len);
            if self.options[index as usize].enabled {
                self.selection = Some(index as usize);
                return;
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
