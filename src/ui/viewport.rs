//! Pan and zoom over the graph, and the mapping between terminal cells and
//! world coordinates.
//!
//! World y grows downward like the data feed; the canvas y axis grows
//! upward, so canvas bounds use `-y`.

use ratatui::layout::Rect;
use unlocktree::achievements::Position;
use unlocktree::constants::{
    CELL_HEIGHT_PX, CELL_WIDTH_PX, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Position,
    /// Screen pixels per world unit.
    pub zoom: f64,
    /// Inner area of the graph panel from the last draw.
    pub area: Rect,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: Position::default(),
            zoom: DEFAULT_ZOOM,
            area: Rect::default(),
        }
    }
}

impl Viewport {
    /// World units covered by one cell, horizontally and vertically.
    pub fn cell_size(&self) -> (f64, f64) {
        (CELL_WIDTH_PX / self.zoom, CELL_HEIGHT_PX / self.zoom)
    }

    fn half_extent(&self) -> (f64, f64) {
        let (cw, ch) = self.cell_size();
        (
            self.area.width as f64 * cw / 2.0,
            self.area.height as f64 * ch / 2.0,
        )
    }

    /// Canvas `x_bounds` and `y_bounds` for the current area.
    pub fn canvas_bounds(&self) -> ([f64; 2], [f64; 2]) {
        let (hw, hh) = self.half_extent();
        (
            [self.center.x - hw, self.center.x + hw],
            [-self.center.y - hh, -self.center.y + hh],
        )
    }

    /// World point at the middle of a terminal cell, if the cell lies in the
    /// graph area.
    pub fn screen_to_world(&self, column: u16, row: u16) -> Option<Position> {
        let area = self.area;
        if column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let (cw, ch) = self.cell_size();
        let (hw, hh) = self.half_extent();
        Some(Position::new(
            self.center.x - hw + (f64::from(column - area.x) + 0.5) * cw,
            self.center.y - hh + (f64::from(row - area.y) + 0.5) * ch,
        ))
    }

    /// Moves the view by a number of cells.
    pub fn pan(&mut self, columns: f64, rows: f64) {
        let (cw, ch) = self.cell_size();
        self.center.x += columns * cw;
        self.center.y += rows * ch;
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Centers on a bounding box and resets the zoom.
    pub fn recenter(&mut self, bounds: Option<(Position, Position)>) {
        self.center = match bounds {
            Some((min, max)) => Position::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0),
            None => Position::default(),
        };
        self.zoom = DEFAULT_ZOOM;
    }
}
