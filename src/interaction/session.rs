//! Applies hold transitions to the scene: the cover disc, the hold fill and
//! the revert on cancel.

use super::machine::{HoldCommand, HoldEvent, HoldState};
use crate::achievements::{AchievementId, AchievementStore};
use crate::constants::{COLOR_HOLD_FILL, HOLD_CANCEL_REVERT, HOLD_DURATION};
use crate::graph::{self, style};
use crate::scene::{
    Attr, AttrValue, CircleShape, Easing, Layer, PrimitiveId, Scene, Track, TransitionEvent,
    TransitionSpec,
};
use crate::view::GraphView;
use tracing::debug;

/// Owns the hold state and the cover disc drawn over a held node.
#[derive(Debug, Default)]
pub struct InteractionSession {
    state: HoldState,
    cover: Option<PrimitiveId>,
}

impl InteractionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HoldState {
        self.state
    }

    /// Node owned by the current hold or unlock, if any.
    pub fn owner(&self) -> Option<AchievementId> {
        self.state.target()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn cover(&self) -> Option<PrimitiveId> {
        self.cover
    }

    /// Starts a hold if the node is eligible and nothing else is held.
    /// Returns whether a hold started.
    pub fn pointer_down(
        &mut self,
        target: AchievementId,
        store: &AchievementStore,
        scene: &mut Scene,
        view: &GraphView,
    ) -> bool {
        let Some(status) = graph::status_of(target, store) else {
            return false;
        };
        if view.live_node(target, scene).is_none() {
            return false;
        }
        let event = HoldEvent::PointerDown {
            target,
            status,
            now: scene.now(),
        };
        let command = self.step(event);
        self.apply(command, store, scene, view);
        matches!(command, HoldCommand::StartHold { .. })
    }

    pub fn pointer_up(
        &mut self,
        target: AchievementId,
        store: &AchievementStore,
        scene: &mut Scene,
        view: &GraphView,
    ) {
        let command = self.step(HoldEvent::PointerUp { target });
        self.apply(command, store, scene, view);
    }

    pub fn pointer_leave(
        &mut self,
        target: AchievementId,
        store: &AchievementStore,
        scene: &mut Scene,
        view: &GraphView,
    ) {
        let command = self.step(HoldEvent::PointerLeave { target });
        self.apply(command, store, scene, view);
    }

    /// Checks the hold timer against the scene clock. Returns the node to
    /// unlock when the hold completes on an eligible node.
    pub fn poll_timer(
        &mut self,
        store: &AchievementStore,
        scene: &mut Scene,
        view: &GraphView,
    ) -> Option<AchievementId> {
        let HoldState::Holding { target, .. } = self.state else {
            return None;
        };
        let status = view
            .live_node(target, scene)
            .and_then(|_| graph::status_of(target, store));
        let command = self.step(HoldEvent::Timer {
            now: scene.now(),
            status,
        });
        self.apply(command, store, scene, view);
        match command {
            HoldCommand::Commit { target } => Some(target),
            _ => None,
        }
    }

    /// Releases the mutex once the unlock sequence for `target` is done.
    pub fn finish(&mut self, target: AchievementId) {
        self.step(HoldEvent::UnlockFinished { target });
    }

    /// Removes the cover once its shrink ends or is cut short.
    pub fn on_transition(&mut self, event: &TransitionEvent, scene: &mut Scene) {
        if event.track == Track::CoverShrink && self.cover == Some(event.primitive) {
            scene.remove(event.primitive);
            self.cover = None;
        }
    }

    /// Drops any hold without animating. The caller recolors afterwards.
    pub fn reset(&mut self, scene: &mut Scene) {
        self.step(HoldEvent::Reset);
        self.remove_cover(scene);
    }

    fn step(&mut self, event: HoldEvent) -> HoldCommand {
        let (next, command) = self.state.step(event);
        if next != self.state {
            debug!(from = ?self.state, to = ?next, "hold state changed");
        }
        self.state = next;
        command
    }

    fn apply(
        &mut self,
        command: HoldCommand,
        store: &AchievementStore,
        scene: &mut Scene,
        view: &GraphView,
    ) {
        match command {
            HoldCommand::None | HoldCommand::Commit { .. } => {}
            HoldCommand::StartHold { target } => self.start_hold(target, store, scene, view),
            HoldCommand::CancelHold { target } => {
                if let Some(cover) = self.cover {
                    scene.interrupt(cover, Track::CoverShrink);
                }
                if let Some(node) = view.live_node(target, scene) {
                    let fill = style::pre_hold_fill(store.is_root(target));
                    scene.animate(
                        node.primitive,
                        Attr::Fill,
                        AttrValue::Color(fill),
                        TransitionSpec::new(
                            Track::HoldRevert,
                            HOLD_CANCEL_REVERT,
                            Easing::CubicInOut,
                        ),
                    );
                }
            }
            HoldCommand::Abort { target } => {
                self.remove_cover(scene);
                if let (Some(node), Some(status)) =
                    (view.live_node(target, scene), graph::status_of(target, store))
                {
                    scene.animate(
                        node.primitive,
                        Attr::Fill,
                        AttrValue::Color(style::node_fill(status)),
                        TransitionSpec::new(
                            Track::HoldRevert,
                            HOLD_CANCEL_REVERT,
                            Easing::CubicInOut,
                        ),
                    );
                }
            }
        }
    }

    fn start_hold(
        &mut self,
        target: AchievementId,
        store: &AchievementStore,
        scene: &mut Scene,
        view: &GraphView,
    ) {
        let Some(node) = view.live_node(target, scene).copied() else {
            return;
        };
        scene.set(node.primitive, Attr::Fill, AttrValue::Color(COLOR_HOLD_FILL));

        self.remove_cover(scene);
        let fill = style::pre_hold_fill(store.is_root(target));
        let cover = scene.add_circle(
            Layer::Effects,
            CircleShape::disc(node.center.x, node.center.y, node.radius, fill),
        );
        scene.animate(
            cover,
            Attr::Radius,
            AttrValue::Number(0.0),
            TransitionSpec::new(Track::CoverShrink, HOLD_DURATION, Easing::Linear),
        );
        self.cover = Some(cover);
    }

    fn remove_cover(&mut self, scene: &mut Scene) {
        if let Some(cover) = self.cover.take() {
            scene.remove(cover);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::{AchievementDef, Position};
    use crate::constants::{COLOR_NODE_START, COLOR_NODE_UNLOCKABLE};
    use std::time::Duration;

    fn def(id: u32, parents: &[u32]) -> AchievementDef {
        AchievementDef {
            id: AchievementId(id),
            name: String::new(),
            description: String::new(),
            level_up: 1,
            parents: parents.iter().copied().map(AchievementId).collect(),
            position: Position::new(id as f64 * 100.0, 0.0),
        }
    }

    struct Fixture {
        store: AchievementStore,
        scene: Scene,
        view: GraphView,
        session: InteractionSession,
    }

    impl Fixture {
        fn new() -> Self {
            let mut store =
                AchievementStore::new(vec![def(1, &[]), def(2, &[1]), def(3, &[2]), def(4, &[1])])
                    .unwrap();
            store.unlock(AchievementId(1)).unwrap();
            let mut scene = Scene::new();
            let view = GraphView::build(&store, &mut scene);
            Self {
                store,
                scene,
                view,
                session: InteractionSession::new(),
            }
        }

        fn down(&mut self, id: u32) -> bool {
            self.session
                .pointer_down(AchievementId(id), &self.store, &mut self.scene, &self.view)
        }

        fn up(&mut self, id: u32) {
            self.session
                .pointer_up(AchievementId(id), &self.store, &mut self.scene, &self.view);
        }

        fn advance(&mut self, ms: u64) -> Option<AchievementId> {
            for event in self.scene.tick(Duration::from_millis(ms)) {
                self.session.on_transition(&event, &mut self.scene);
            }
            self.session
                .poll_timer(&self.store, &mut self.scene, &self.view)
        }

        fn fill(&self, id: u32) -> Option<crate::scene::Rgb> {
            self.scene
                .fill(self.view.node(AchievementId(id)).unwrap().primitive)
        }
    }

    #[test]
    fn test_hold_sets_fill_and_cover() {
        let mut f = Fixture::new();
        assert!(f.down(2));
        assert_eq!(f.fill(2), Some(COLOR_HOLD_FILL));
        let cover = f.session.cover().unwrap();
        assert_eq!(f.scene.layer_of(cover), Some(Layer::Effects));
        assert_eq!(f.scene.radius(cover), Some(20.0));
        assert_eq!(f.scene.fill(cover), Some(COLOR_NODE_UNLOCKABLE));

        f.advance(500);
        let r = f.scene.radius(cover).unwrap();
        assert!((r - 10.0).abs() < 1e-6, "cover radius {}", r);
    }

    #[test]
    fn test_locked_node_does_not_hold() {
        let mut f = Fixture::new();
        assert!(!f.down(3));
        assert!(!f.session.is_busy());
        assert!(f.session.cover().is_none());
    }

    #[test]
    fn test_release_reverts_and_removes_cover() {
        let mut f = Fixture::new();
        f.down(2);
        f.advance(300);
        f.up(2);
        assert_eq!(f.session.state(), HoldState::Idle);

        // interrupted cover is removed on the next tick
        f.advance(1);
        assert!(f.session.cover().is_none());
        f.advance(HOLD_CANCEL_REVERT.as_millis() as u64);
        assert_eq!(f.fill(2), Some(COLOR_NODE_UNLOCKABLE));
        assert_eq!(f.scene.len(), 7);
    }

    #[test]
    fn test_full_hold_commits() {
        let mut f = Fixture::new();
        f.down(2);
        assert_eq!(f.advance(999), None);
        assert_eq!(f.advance(1), Some(AchievementId(2)));
        assert_eq!(
            f.session.state(),
            HoldState::Animating {
                target: AchievementId(2)
            }
        );
        assert!(f.session.cover().is_none());

        f.up(2);
        assert!(f.session.is_busy());
        f.session.finish(AchievementId(2));
        assert!(!f.session.is_busy());
    }

    #[test]
    fn test_second_node_cannot_hold_while_busy() {
        let mut f = Fixture::new();
        assert!(f.down(2));
        assert!(!f.down(4));
        assert_eq!(f.session.owner(), Some(AchievementId(2)));
        assert_eq!(f.fill(4), Some(COLOR_NODE_UNLOCKABLE));
    }

    #[test]
    fn test_root_hold_uses_start_color() {
        let store = AchievementStore::new(vec![def(1, &[])]).unwrap();
        let mut scene = Scene::new();
        let view = GraphView::build(&store, &mut scene);
        let mut session = InteractionSession::new();
        assert!(session.pointer_down(AchievementId(1), &store, &mut scene, &view));
        let cover = session.cover().unwrap();
        assert_eq!(scene.fill(cover), Some(COLOR_NODE_START));
        assert_eq!(scene.radius(cover), Some(30.0));
    }

    #[test]
    fn test_reset_drops_cover() {
        let mut f = Fixture::new();
        f.down(2);
        f.session.reset(&mut f.scene);
        assert!(!f.session.is_busy());
        assert!(f.session.cover().is_none());
        assert_eq!(f.scene.len(), 7);
    }
}
