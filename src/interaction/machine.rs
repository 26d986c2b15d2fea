//! Hold state machine as pure transitions.
//!
//! `Idle -> Holding -> Animating -> Idle`, with `Holding -> Idle` when the
//! pointer is released or leaves before the hold completes. Only one node can
//! be outside `Idle` at a time; presses on other nodes meanwhile only move the
//! selection.

use crate::achievements::AchievementId;
use crate::constants::HOLD_DURATION;
use crate::graph::Status;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldState {
    #[default]
    Idle,
    Holding {
        target: AchievementId,
        started_at: Duration,
    },
    /// Hold completed; the unlock sequence owns the node.
    Animating { target: AchievementId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldEvent {
    PointerDown {
        target: AchievementId,
        status: Status,
        now: Duration,
    },
    PointerUp { target: AchievementId },
    PointerLeave { target: AchievementId },
    /// Clock check for the hold timer. `status` is the held node's current
    /// status, if it still exists.
    Timer { now: Duration, status: Option<Status> },
    UnlockFinished { target: AchievementId },
    Reset,
}

/// Side effect the session must carry out after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldCommand {
    None,
    StartHold { target: AchievementId },
    CancelHold { target: AchievementId },
    Commit { target: AchievementId },
    /// Timer fired but the node can no longer be unlocked.
    Abort { target: AchievementId },
}

impl HoldState {
    /// Node currently owned by a hold or an unlock sequence.
    pub fn target(self) -> Option<AchievementId> {
        match self {
            HoldState::Idle => None,
            HoldState::Holding { target, .. } | HoldState::Animating { target } => Some(target),
        }
    }

    /// Whether the hold mutex is taken.
    pub fn is_busy(self) -> bool {
        self != HoldState::Idle
    }

    pub fn step(self, event: HoldEvent) -> (HoldState, HoldCommand) {
        match (self, event) {
            (
                HoldState::Idle,
                HoldEvent::PointerDown {
                    target,
                    status,
                    now,
                },
            ) if status.can_start_hold() => (
                HoldState::Holding {
                    target,
                    started_at: now,
                },
                HoldCommand::StartHold { target },
            ),

            (
                HoldState::Holding { target: held, .. },
                HoldEvent::PointerUp { target } | HoldEvent::PointerLeave { target },
            ) if held == target => (HoldState::Idle, HoldCommand::CancelHold { target }),

            (HoldState::Holding { target, started_at }, HoldEvent::Timer { now, status }) => {
                if now.saturating_sub(started_at) < HOLD_DURATION {
                    return (self, HoldCommand::None);
                }
                match status {
                    Some(status) if status.can_start_hold() => (
                        HoldState::Animating { target },
                        HoldCommand::Commit { target },
                    ),
                    _ => (HoldState::Idle, HoldCommand::Abort { target }),
                }
            }

            (HoldState::Animating { target: held }, HoldEvent::UnlockFinished { target })
                if held == target =>
            {
                (HoldState::Idle, HoldCommand::None)
            }

            (_, HoldEvent::Reset) => (HoldState::Idle, HoldCommand::None),

            _ => (self, HoldCommand::None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: AchievementId = AchievementId(1);
    const B: AchievementId = AchievementId(2);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn down(target: AchievementId, status: Status, at: u64) -> HoldEvent {
        HoldEvent::PointerDown {
            target,
            status,
            now: ms(at),
        }
    }

    fn holding(target: AchievementId, at: u64) -> HoldState {
        HoldState::Holding {
            target,
            started_at: ms(at),
        }
    }

    #[test]
    fn test_press_on_unlockable_starts_hold() {
        let (state, cmd) = HoldState::Idle.step(down(A, Status::StartLocked, 5));
        assert_eq!(state, holding(A, 5));
        assert_eq!(cmd, HoldCommand::StartHold { target: A });
    }

    #[test]
    fn test_press_on_locked_or_unlocked_does_nothing() {
        for status in [Status::Locked, Status::Unlocked, Status::StartUnlocked] {
            let (state, cmd) = HoldState::Idle.step(down(A, status, 0));
            assert_eq!(state, HoldState::Idle);
            assert_eq!(cmd, HoldCommand::None);
        }
    }

    #[test]
    fn test_second_press_never_competes() {
        let (state, cmd) = holding(A, 0).step(down(B, Status::Unlockable, 10));
        assert_eq!(state, holding(A, 0));
        assert_eq!(cmd, HoldCommand::None);

        let animating = HoldState::Animating { target: A };
        let (state, cmd) = animating.step(down(B, Status::Unlockable, 10));
        assert_eq!(state, animating);
        assert_eq!(cmd, HoldCommand::None);
    }

    #[test]
    fn test_release_before_timer_cancels() {
        let (state, cmd) = holding(A, 0).step(HoldEvent::PointerUp { target: A });
        assert_eq!(state, HoldState::Idle);
        assert_eq!(cmd, HoldCommand::CancelHold { target: A });

        let (state, cmd) = holding(A, 0).step(HoldEvent::PointerLeave { target: A });
        assert_eq!(state, HoldState::Idle);
        assert_eq!(cmd, HoldCommand::CancelHold { target: A });
    }

    #[test]
    fn test_release_on_other_node_is_ignored() {
        let (state, cmd) = holding(A, 0).step(HoldEvent::PointerUp { target: B });
        assert_eq!(state, holding(A, 0));
        assert_eq!(cmd, HoldCommand::None);
    }

    #[test]
    fn test_timer_commits_after_hold_duration() {
        let state = holding(A, 100);
        let early = HoldEvent::Timer {
            now: ms(1099),
            status: Some(Status::Unlockable),
        };
        assert_eq!(state.step(early), (state, HoldCommand::None));

        let due = HoldEvent::Timer {
            now: ms(1100),
            status: Some(Status::Unlockable),
        };
        assert_eq!(
            state.step(due),
            (
                HoldState::Animating { target: A },
                HoldCommand::Commit { target: A }
            )
        );
    }

    #[test]
    fn test_timer_aborts_when_node_no_longer_eligible() {
        let due = HoldEvent::Timer {
            now: ms(2000),
            status: Some(Status::Locked),
        };
        assert_eq!(
            holding(A, 0).step(due),
            (HoldState::Idle, HoldCommand::Abort { target: A })
        );

        let gone = HoldEvent::Timer {
            now: ms(2000),
            status: None,
        };
        assert_eq!(
            holding(A, 0).step(gone),
            (HoldState::Idle, HoldCommand::Abort { target: A })
        );
    }

    #[test]
    fn test_pointer_up_while_animating_is_ignored() {
        let animating = HoldState::Animating { target: A };
        assert_eq!(
            animating.step(HoldEvent::PointerUp { target: A }),
            (animating, HoldCommand::None)
        );
    }

    #[test]
    fn test_unlock_finished_releases_mutex() {
        let animating = HoldState::Animating { target: A };
        assert!(animating.is_busy());
        let (state, _) = animating.step(HoldEvent::UnlockFinished { target: A });
        assert_eq!(state, HoldState::Idle);
        assert!(!state.is_busy());
    }

    #[test]
    fn test_reset_from_any_state() {
        for state in [holding(A, 0), HoldState::Animating { target: B }, HoldState::Idle] {
            assert_eq!(state.step(HoldEvent::Reset).0, HoldState::Idle);
        }
    }

    #[test]
    fn test_target() {
        assert_eq!(HoldState::Idle.target(), None);
        assert_eq!(holding(A, 0).target(), Some(A));
        assert_eq!(HoldState::Animating { target: B }.target(), Some(B));
    }
}
