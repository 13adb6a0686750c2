//! Application state and input handling for the TUI.

use crate::keys::Input;
use crate::router::Router;
use ratatui::layout::{Position, Rect};
use rolodex_core::dispatch::{Applied, DispatchUpdate};
use rolodex_core::gateway::Backend;
use rolodex_core::palette::{CommandPalette, PaletteAction};
use rolodex_core::recency::FileStorage;
use tracing::debug;

pub type Palette = CommandPalette<Backend, FileStorage>;

/// What a clickable line inside the palette refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Result(usize),
    Recent(usize),
    ViewAll(usize),
}

/// Screen regions recorded during the last draw, for mouse hit-testing.
#[derive(Debug, Default)]
pub struct HitMap {
    pub palette: Option<Rect>,
    pub targets: Vec<(Rect, HitTarget)>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.palette = None;
        self.targets.clear();
    }

    pub fn target_at(&self, column: u16, row: u16) -> Option<HitTarget> {
        let position = Position::new(column, row);
        self.targets
            .iter()
            .find(|(area, _)| area.contains(position))
            .map(|(_, target)| *target)
    }

    pub fn in_palette(&self, column: u16, row: u16) -> bool {
        self.palette
            .is_some_and(|area| area.contains(Position::new(column, row)))
    }
}

pub struct App {
    pub palette: Palette,
    pub router: Router,
    /// Where records come from, shown in the status bar
    pub backend_label: String,
    pub status_message: Option<String>,
    pub should_quit: bool,
    pub hits: HitMap,
}

impl App {
    pub fn new(palette: Palette, router: Router, backend_label: String) -> Self {
        Self {
            palette,
            router,
            backend_label,
            status_message: None,
            should_quit: false,
            hits: HitMap::default(),
        }
    }

    pub fn handle_input(&mut self, input: Input) {
        match input {
            Input::Quit => self.should_quit = true,
            Input::OpenPalette => {
                let action = self.palette.open();
                self.handle_action(action);
            }
            Input::Nav(key) => {
                let action = self.palette.handle_key(key);
                self.handle_action(action);
            }
            Input::Char(c) => {
                let mut query = self.palette.query().to_string();
                query.push(c);
                self.palette.set_query(&query);
            }
            Input::Backspace => {
                let mut query = self.palette.query().to_string();
                if query.pop().is_some() {
                    self.palette.set_query(&query);
                }
            }
            Input::ClearQuery => self.palette.set_query(""),
            Input::Ignore => {}
        }
    }

    /// Left click at a terminal cell.
    pub fn handle_click(&mut self, column: u16, row: u16) {
        if !self.palette.is_open() {
            return;
        }

        match self.hits.target_at(column, row) {
            Some(HitTarget::Result(index)) => {
                let action = self.palette.click(index);
                self.handle_action(action);
            }
            Some(HitTarget::Recent(index)) => {
                self.palette.use_recent(index);
            }
            Some(HitTarget::ViewAll(index)) => {
                let Some(link) = self.palette.view_all_links().into_iter().nth(index) else {
                    return;
                };
                self.palette.close();
                let url = self.router.navigate(&link.target);
                self.status_message = Some(format!("{} → {url}", link.label));
            }
            None if !self.hits.in_palette(column, row) => {
                let action = self.palette.close();
                self.handle_action(action);
            }
            None => {}
        }
    }

    pub fn handle_update(&mut self, update: DispatchUpdate) -> Applied {
        let applied = self.palette.apply(update);
        debug!("Dispatch update applied: {applied:?}");
        applied
    }

    fn handle_action(&mut self, action: PaletteAction) {
        match action {
            PaletteAction::Navigate(navigation) => {
                let url = self.router.navigate(&navigation.target);
                self.status_message = Some(format!("Opened {} → {url}", navigation.title));
            }
            PaletteAction::Opened => self.status_message = None,
            PaletteAction::Closed | PaletteAction::None => {}
        }
        if !self.palette.is_open() {
            self.hits.clear();
        }
    }
}
