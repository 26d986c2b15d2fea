pub mod graph_canvas;
pub mod reset_confirm;
pub mod sidebar;
pub mod viewport;

use crate::input::Overlay;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use sidebar::SidebarInfo;
use unlocktree::achievements::KeyValueStore;
use unlocktree::app::App;
use unlocktree::constants::SIDEBAR_WIDTH;
use viewport::Viewport;

/// Main UI drawing function. Records the graph area in the viewport so
/// mouse positions can be mapped back to the world.
pub fn draw_ui<K: KeyValueStore>(
    frame: &mut Frame,
    app: &App<K>,
    viewport: &mut Viewport,
    overlay: &Overlay,
) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),                // Graph
            Constraint::Length(SIDEBAR_WIDTH), // Sidebar
        ])
        .split(size);

    graph_canvas::draw_graph(frame, chunks[0], app.scene(), viewport);
    sidebar::draw_sidebar(
        frame,
        chunks[1],
        &SidebarInfo {
            level: app.level(),
            unlocked: app.store().unlocked_count(),
            total: app.store().len(),
            hold: app.hold_state(),
            details: app.details(),
        },
    );

    if matches!(overlay, Overlay::ResetConfirm) {
        reset_confirm::draw_reset_confirm(frame, app.level(), app.store().unlocked_count());
    }
}
