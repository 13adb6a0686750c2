//! Rendering functions for the TUI.
//!
//! The host view is always drawn; the palette is layered on top while open.

mod home;
mod palette;

use crate::app::App;
use ratatui::Frame;

pub use home::render_home;
pub use palette::render_palette;

pub fn ui(f: &mut Frame, app: &mut App) {
    render_home(f, app);
    if app.palette.is_open() {
        render_palette(f, app);
    } else {
        app.hits.clear();
    }
}
