//! Keyboard and mouse dispatch for the graph screen.
//!
//! Mouse presses are hit-tested against node radii in world space. The
//! pointer tracker turns motion into the leave events the hold logic needs.

use crate::ui::viewport::Viewport;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use unlocktree::achievements::{AchievementId, KeyValueStore};
use unlocktree::app::App;
use unlocktree::constants::PAN_STEP_CELLS;

/// Dialog drawn over the graph. At most one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    ResetConfirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
}

/// Which node the mouse pressed and which node it is over.
#[derive(Debug, Default)]
pub struct PointerTracker {
    pressed: Option<AchievementId>,
    hovered: Option<AchievementId>,
}

pub fn handle_key<K: KeyValueStore>(
    key: KeyEvent,
    app: &mut App<K>,
    viewport: &mut Viewport,
    overlay: &mut Overlay,
) -> InputResult {
    // Reset confirmation (blocks all other input)
    if *overlay == Overlay::ResetConfirm {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.reset();
                *overlay = Overlay::None;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                *overlay = Overlay::None;
            }
            _ => {}
        }
        return InputResult::Continue;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return InputResult::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => *overlay = Overlay::ResetConfirm,
        KeyCode::Left | KeyCode::Char('h') => viewport.pan(-PAN_STEP_CELLS, 0.0),
        KeyCode::Right | KeyCode::Char('l') => viewport.pan(PAN_STEP_CELLS, 0.0),
        KeyCode::Up | KeyCode::Char('k') => viewport.pan(0.0, -PAN_STEP_CELLS / 2.0),
        KeyCode::Down | KeyCode::Char('j') => viewport.pan(0.0, PAN_STEP_CELLS / 2.0),
        KeyCode::Char('+') | KeyCode::Char('=') => viewport.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => viewport.zoom_out(),
        KeyCode::Char('0') => viewport.recenter(app.view().bounds()),
        _ => {}
    }
    InputResult::Continue
}

pub fn handle_mouse<K: KeyValueStore>(
    mouse: MouseEvent,
    app: &mut App<K>,
    viewport: &mut Viewport,
    pointer: &mut PointerTracker,
    overlay: Overlay,
) {
    if overlay != Overlay::None {
        // The dialog covers the graph, but a release still ends the hold
        if mouse.kind == MouseEventKind::Up(MouseButton::Left) {
            if let Some(id) = pointer.pressed.take() {
                app.pointer_leave(id);
            }
            pointer.hovered = None;
        }
        return;
    }
    let under = viewport
        .screen_to_world(mouse.column, mouse.row)
        .and_then(|p| app.node_at(p.x, p.y));

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            pointer.hovered = under;
            pointer.pressed = under;
            if let Some(id) = under {
                app.pointer_down(id);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(id) = pointer.pressed.take() {
                if under == Some(id) {
                    app.pointer_up(id);
                } else {
                    app.pointer_leave(id);
                }
            }
            pointer.hovered = under;
        }
        MouseEventKind::Drag(_) | MouseEventKind::Moved => {
            if pointer.hovered != under {
                if let Some(left) = pointer.hovered {
                    app.pointer_leave(left);
                }
                pointer.hovered = under;
            }
        }
        MouseEventKind::ScrollUp => viewport.zoom_in(),
        MouseEventKind::ScrollDown => viewport.zoom_out(),
        _ => {}
    }
}
