//! Unlock sequence for a held node: explosion grow, explosion fade, commit,
//! then the final fill.
//!
//! The achievement is committed to the store (and saved) when the explosion
//! has faded out, before the final fill starts. The sequence reports
//! `Finished` once the fill has settled so the caller can release the hold
//! and start the cascade.

use crate::achievements::{AchievementId, AchievementStore, KeyValueStore, ProgressAdapter};
use crate::constants::{
    EXPLOSION_FADE, EXPLOSION_GROW, EXPLOSION_OPACITY, EXPLOSION_SCALE, FINAL_FILL,
};
use crate::graph::style;
use crate::scene::{
    Attr, AttrValue, CircleShape, Easing, Layer, PrimitiveId, Scene, Track, TransitionEvent,
    TransitionOutcome, TransitionSpec,
};
use crate::view::GraphView;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockPhase {
    Exploding,
    Fading,
    Filling,
}

/// What an unlock sequence reported back to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockProgress {
    /// The store accepted the unlock.
    Committed { target: AchievementId, gained: u32 },
    /// The sequence is over. `unlocked` is false when the store refused the
    /// unlock.
    Finished {
        target: AchievementId,
        unlocked: bool,
    },
}

#[derive(Debug, Clone, Copy)]
struct Sequence {
    target: AchievementId,
    node: PrimitiveId,
    effect: Option<PrimitiveId>,
    phase: UnlockPhase,
}

/// Everything a sequence touches while it runs.
pub struct UnlockContext<'a, K> {
    pub store: &'a mut AchievementStore,
    pub progress: &'a mut ProgressAdapter<K>,
    pub scene: &'a mut Scene,
    pub view: &'a GraphView,
}

/// Runs at most one unlock sequence at a time.
#[derive(Debug, Default)]
pub struct UnlockOrchestrator {
    active: Option<Sequence>,
}

impl UnlockOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<AchievementId> {
        self.active.map(|s| s.target)
    }

    pub fn phase(&self) -> Option<UnlockPhase> {
        self.active.map(|s| s.phase)
    }

    /// Starts the explosion over `target`. Returns false when a sequence is
    /// already running or the node is not in the scene.
    pub fn begin(
        &mut self,
        target: AchievementId,
        store: &AchievementStore,
        scene: &mut Scene,
        view: &GraphView,
    ) -> bool {
        if self.active.is_some() {
            return false;
        }
        let Some(node) = view.live_node(target, scene).copied() else {
            warn!(achievement = %target, "no node to unlock");
            return false;
        };

        let fill = style::unlocked_fill(store.is_root(target));
        let mut shape = CircleShape::disc(node.center.x, node.center.y, 0.0, fill);
        shape.opacity = EXPLOSION_OPACITY;
        let effect = scene.add_circle(Layer::Effects, shape);
        scene.animate(
            effect,
            Attr::Radius,
            AttrValue::Number(node.radius * EXPLOSION_SCALE),
            TransitionSpec::new(Track::ExplodeGrow, EXPLOSION_GROW, Easing::BounceOut),
        );

        debug!(achievement = %target, "unlock sequence started");
        self.active = Some(Sequence {
            target,
            node: node.primitive,
            effect: Some(effect),
            phase: UnlockPhase::Exploding,
        });
        true
    }

    /// Advances the sequence on its own transition events; anything else is
    /// ignored.
    pub fn on_transition<K: KeyValueStore>(
        &mut self,
        event: &TransitionEvent,
        ctx: UnlockContext<'_, K>,
    ) -> Vec<UnlockProgress> {
        let Some(mut seq) = self.active else {
            return Vec::new();
        };

        match (seq.phase, event.track, event.outcome) {
            (UnlockPhase::Exploding, Track::ExplodeGrow, TransitionOutcome::Ended)
                if seq.effect == Some(event.primitive) =>
            {
                ctx.scene.animate(
                    event.primitive,
                    Attr::Opacity,
                    AttrValue::Number(0.0),
                    TransitionSpec::new(Track::ExplodeFade, EXPLOSION_FADE, Easing::CubicInOut),
                );
                seq.phase = UnlockPhase::Fading;
                self.active = Some(seq);
                Vec::new()
            }
            (UnlockPhase::Fading, Track::ExplodeFade, TransitionOutcome::Ended)
                if seq.effect == Some(event.primitive) =>
            {
                ctx.scene.remove(event.primitive);
                seq.effect = None;
                self.commit(seq, ctx)
            }
            (UnlockPhase::Filling, Track::FinalFill, _) if seq.node == event.primitive => {
                self.active = None;
                debug!(achievement = %seq.target, "unlock sequence finished");
                vec![UnlockProgress::Finished {
                    target: seq.target,
                    unlocked: true,
                }]
            }
            _ => Vec::new(),
        }
    }

    fn commit<K: KeyValueStore>(
        &mut self,
        mut seq: Sequence,
        ctx: UnlockContext<'_, K>,
    ) -> Vec<UnlockProgress> {
        let target = seq.target;
        let gained = match ctx.store.unlock(target) {
            Ok(gained) => gained,
            Err(e) => {
                warn!(error = %e, "unlock refused");
                self.active = None;
                return vec![UnlockProgress::Finished {
                    target,
                    unlocked: false,
                }];
            }
        };
        info!(achievement = %target, gained, level = ctx.store.level(), "achievement unlocked");
        if let Err(e) = ctx.progress.save(&ctx.store.progress()) {
            warn!(error = %e, "failed to save progress");
        }

        let committed = UnlockProgress::Committed { target, gained };
        let fill = style::unlocked_fill(ctx.store.is_root(target));
        let started = ctx.view.live_node(target, ctx.scene).is_some()
            && ctx.scene.animate(
                seq.node,
                Attr::Fill,
                AttrValue::Color(fill),
                TransitionSpec::new(Track::FinalFill, FINAL_FILL, Easing::CubicInOut),
            );
        if !started {
            self.active = None;
            return vec![
                committed,
                UnlockProgress::Finished {
                    target,
                    unlocked: true,
                },
            ];
        }

        seq.phase = UnlockPhase::Filling;
        self.active = Some(seq);
        vec![committed]
    }

    /// Drops the running sequence and its explosion without committing
    /// anything further.
    pub fn abort(&mut self, scene: &mut Scene) {
        if let Some(seq) = self.active.take() {
            if let Some(effect) = seq.effect {
                scene.remove(effect);
            }
            debug!(achievement = %seq.target, phase = ?seq.phase, "unlock sequence aborted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::{AchievementDef, MemoryStore, Position};
    use crate::constants::{COLOR_NODE_START, COLOR_NODE_UNLOCKED};
    use std::time::Duration;

    fn def(id: u32, level_up: u32, parents: &[u32]) -> AchievementDef {
        AchievementDef {
            id: AchievementId(id),
            name: String::new(),
            description: String::new(),
            level_up,
            parents: parents.iter().copied().map(AchievementId).collect(),
            position: Position::new(0.0, id as f64 * 100.0),
        }
    }

    struct Fixture {
        store: AchievementStore,
        progress: ProgressAdapter<MemoryStore>,
        scene: Scene,
        view: GraphView,
        unlocks: UnlockOrchestrator,
    }

    impl Fixture {
        fn new() -> Self {
            let store = AchievementStore::new(vec![def(1, 1, &[]), def(2, 3, &[1])]).unwrap();
            let mut scene = Scene::new();
            let view = GraphView::build(&store, &mut scene);
            Self {
                store,
                progress: ProgressAdapter::new(MemoryStore::new()),
                scene,
                view,
                unlocks: UnlockOrchestrator::new(),
            }
        }

        fn advance(&mut self, ms: u64) -> Vec<UnlockProgress> {
            let mut out = Vec::new();
            for event in self.scene.tick(Duration::from_millis(ms)) {
                out.extend(self.unlocks.on_transition(
                    &event,
                    UnlockContext {
                        store: &mut self.store,
                        progress: &mut self.progress,
                        scene: &mut self.scene,
                        view: &self.view,
                    },
                ));
            }
            out
        }
    }

    #[test]
    fn test_full_sequence_commits_after_fade() {
        let mut f = Fixture::new();
        assert!(f.unlocks.begin(AchievementId(1), &f.store, &mut f.scene, &f.view));
        assert_eq!(f.unlocks.phase(), Some(UnlockPhase::Exploding));

        assert!(f.advance(400).is_empty());
        assert_eq!(f.unlocks.phase(), Some(UnlockPhase::Fading));
        assert!(!f.store.is_unlocked(AchievementId(1)));

        let out = f.advance(300);
        assert_eq!(
            out,
            vec![UnlockProgress::Committed {
                target: AchievementId(1),
                gained: 1
            }]
        );
        assert!(f.store.is_unlocked(AchievementId(1)));
        assert_eq!(f.progress.backend().writes(), 1);
        assert_eq!(f.progress.load().level, 1);

        let out = f.advance(500);
        assert_eq!(
            out,
            vec![UnlockProgress::Finished {
                target: AchievementId(1),
                unlocked: true
            }]
        );
        assert_eq!(f.unlocks.active(), None);
        let node = f.view.node(AchievementId(1)).unwrap().primitive;
        assert_eq!(f.scene.fill(node), Some(COLOR_NODE_START));
    }

    #[test]
    fn test_explosion_grows_and_fades() {
        let mut f = Fixture::new();
        let before = f.scene.len();
        f.unlocks.begin(AchievementId(1), &f.store, &mut f.scene, &f.view);
        assert_eq!(f.scene.len(), before + 1);
        let effect = f
            .scene
            .draw_order()
            .last()
            .map(|(id, _)| *id)
            .unwrap();
        assert_eq!(f.scene.opacity(effect), Some(EXPLOSION_OPACITY));
        f.advance(400);
        assert!((f.scene.radius(effect).unwrap() - 39.0).abs() < 1e-9);
        f.advance(300);
        assert_eq!(f.scene.len(), before);
    }

    #[test]
    fn test_one_sequence_at_a_time() {
        let mut f = Fixture::new();
        assert!(f.unlocks.begin(AchievementId(1), &f.store, &mut f.scene, &f.view));
        assert!(!f.unlocks.begin(AchievementId(2), &f.store, &mut f.scene, &f.view));
        assert_eq!(f.unlocks.active(), Some(AchievementId(1)));
    }

    #[test]
    fn test_refused_unlock_finishes_without_commit() {
        let mut f = Fixture::new();
        // 2 is still locked
        f.unlocks.begin(AchievementId(2), &f.store, &mut f.scene, &f.view);
        f.advance(400);
        let out = f.advance(300);
        assert_eq!(
            out,
            vec![UnlockProgress::Finished {
                target: AchievementId(2),
                unlocked: false
            }]
        );
        assert_eq!(f.store.level(), 0);
        assert_eq!(f.progress.backend().writes(), 0);
    }

    #[test]
    fn test_save_failure_keeps_unlock() {
        let mut f = Fixture::new();
        f.progress.backend_mut().set_fail_writes(true);
        f.unlocks.begin(AchievementId(1), &f.store, &mut f.scene, &f.view);
        f.advance(400);
        f.advance(300);
        assert!(f.store.is_unlocked(AchievementId(1)));
        assert_eq!(f.unlocks.phase(), Some(UnlockPhase::Filling));
    }

    #[test]
    fn test_regular_node_fills_white() {
        let mut f = Fixture::new();
        f.store.unlock(AchievementId(1)).unwrap();
        f.unlocks.begin(AchievementId(2), &f.store, &mut f.scene, &f.view);
        f.advance(400);
        f.advance(300);
        f.advance(500);
        let node = f.view.node(AchievementId(2)).unwrap().primitive;
        assert_eq!(f.scene.fill(node), Some(COLOR_NODE_UNLOCKED));
        assert_eq!(f.store.level(), 4);
    }

    #[test]
    fn test_abort_removes_explosion() {
        let mut f = Fixture::new();
        let before = f.scene.len();
        f.unlocks.begin(AchievementId(1), &f.store, &mut f.scene, &f.view);
        f.unlocks.abort(&mut f.scene);
        assert_eq!(f.scene.len(), before);
        assert_eq!(f.unlocks.active(), None);
        assert!(f.advance(1000).is_empty());
        assert!(!f.store.is_unlocked(AchievementId(1)));
    }
}
