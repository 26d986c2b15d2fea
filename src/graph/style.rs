//! Maps statuses to colors.

use super::eligibility::{EdgeStatus, Status};
use crate::constants::{
    COLOR_LINK, COLOR_NODE_LOCKED, COLOR_NODE_START, COLOR_NODE_UNLOCKABLE, COLOR_NODE_UNLOCKED,
};
use crate::scene::Rgb;

/// Resting fill of a node.
pub fn node_fill(status: Status) -> Rgb {
    match status {
        Status::StartLocked | Status::StartUnlocked => COLOR_NODE_START,
        Status::Unlocked => COLOR_NODE_UNLOCKED,
        Status::Unlockable => COLOR_NODE_UNLOCKABLE,
        Status::Locked => COLOR_NODE_LOCKED,
    }
}

/// Fill a node ends on once its unlock completes.
pub fn unlocked_fill(is_root: bool) -> Rgb {
    if is_root {
        COLOR_NODE_START
    } else {
        COLOR_NODE_UNLOCKED
    }
}

/// Fill a node had before a hold started, restored when the hold is
/// cancelled. Also the color of the shrinking cover disc.
pub fn pre_hold_fill(is_root: bool) -> Rgb {
    if is_root {
        COLOR_NODE_START
    } else {
        COLOR_NODE_UNLOCKABLE
    }
}

pub fn edge_stroke(status: EdgeStatus) -> Rgb {
    match status {
        EdgeStatus::BothUnlocked => COLOR_NODE_UNLOCKED,
        EdgeStatus::Feeding => COLOR_NODE_UNLOCKABLE,
        EdgeStatus::Default => COLOR_LINK,
    }
}
