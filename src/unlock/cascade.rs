//! Flow animations from a freshly unlocked parent to the children it made
//! unlockable, gated by a completion barrier.
//!
//! Each child waits for every flow line aimed at it before recoloring. The
//! cascade settles once every child has finished (or skipped) its recolor,
//! and the caller then runs the global refresh.

use crate::achievements::{AchievementId, AchievementStore};
use crate::constants::{CHILD_RECOLOR, COLOR_NODE_UNLOCKABLE, FLOW_REVEAL, FLOW_STROKE_WIDTH};
use crate::graph;
use crate::scene::{
    Attr, AttrValue, Easing, Layer, LineShape, PrimitiveId, Scene, Track, TransitionEvent,
    TransitionSpec,
};
use crate::view::GraphView;
use tracing::debug;

/// Counts arrivals until an expected total is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionBarrier {
    expected: usize,
    arrived: usize,
}

impl CompletionBarrier {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            arrived: 0,
        }
    }

    /// Records one arrival. Returns true exactly once: on the arrival that
    /// completes the barrier.
    pub fn arrive(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.arrived += 1;
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.arrived >= self.expected
    }

    pub fn remaining(&self) -> usize {
        self.expected.saturating_sub(self.arrived)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildStage {
    Flowing,
    Recoloring,
    Done,
}

#[derive(Debug, Clone)]
struct ChildFlow {
    child: AchievementId,
    pending: usize,
    lines: Vec<PrimitiveId>,
    stage: ChildStage,
}

/// One running cascade, started from a single parent.
#[derive(Debug, Clone)]
pub struct Cascade {
    id: u32,
    parent: AchievementId,
    children: Vec<ChildFlow>,
    barrier: CompletionBarrier,
}

impl Cascade {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn parent(&self) -> AchievementId {
        self.parent
    }

    pub fn children(&self) -> Vec<AchievementId> {
        self.children.iter().map(|c| c.child).collect()
    }

    pub fn is_settled(&self) -> bool {
        self.barrier.is_complete()
    }

    /// Temporary flow lines still in the scene.
    pub fn lines(&self) -> impl Iterator<Item = PrimitiveId> + '_ {
        self.children.iter().flat_map(|c| c.lines.iter().copied())
    }

    fn start(
        id: u32,
        parent: AchievementId,
        store: &AchievementStore,
        scene: &mut Scene,
        view: &GraphView,
    ) -> Self {
        let children = graph::newly_unlockable_children(parent, store);
        let mut cascade = Cascade {
            id,
            parent,
            children: Vec::with_capacity(children.len()),
            barrier: CompletionBarrier::new(children.len()),
        };

        let mut missing = 0;
        for child in children {
            let Some(node) = view.live_node(child, scene).copied() else {
                debug!(child = %child, "flow target has no node, counting as arrived");
                missing += 1;
                continue;
            };
            let Some(achievement) = store.get(child) else {
                missing += 1;
                continue;
            };
            let mut flow = ChildFlow {
                child,
                pending: 0,
                lines: Vec::new(),
                stage: ChildStage::Flowing,
            };

            for &source in achievement.parents() {
                let Some(from) = store.get(source).map(|a| a.position()) else {
                    continue;
                };
                let mut shape = LineShape::solid(
                    from.x,
                    from.y,
                    node.center.x,
                    node.center.y,
                    COLOR_NODE_UNLOCKABLE,
                    FLOW_STROKE_WIDTH,
                );
                let length = shape.length();
                shape.dash_array = Some(length);
                shape.dash_offset = length;

                let line = scene.add_line(Layer::Links, shape);
                scene.animate(
                    line,
                    Attr::DashOffset,
                    AttrValue::Number(0.0),
                    TransitionSpec::new(
                        Track::FlowReveal {
                            cascade: id,
                            parent: source,
                            child,
                        },
                        FLOW_REVEAL,
                        Easing::Linear,
                    ),
                );
                flow.lines.push(line);
                flow.pending += 1;
            }
            if flow.pending == 0 {
                missing += 1;
                continue;
            }
            cascade.children.push(flow);
        }

        for _ in 0..missing {
            cascade.barrier.arrive();
        }
        cascade
    }

    /// Feeds a transition event. Returns true when this event settles the
    /// cascade. `owner` is the node held or unlocking right now.
    fn on_transition(
        &mut self,
        event: &TransitionEvent,
        store: &AchievementStore,
        scene: &mut Scene,
        view: &GraphView,
        owner: Option<AchievementId>,
    ) -> bool {
        match event.track {
            Track::FlowReveal { cascade, child, .. } if cascade == self.id => {
                let Some(flow) = self.children.iter_mut().find(|c| c.child == child) else {
                    return false;
                };
                if flow.stage != ChildStage::Flowing || !flow.lines.contains(&event.primitive) {
                    return false;
                }
                flow.pending = flow.pending.saturating_sub(1);
                if flow.pending > 0 {
                    return false;
                }

                for line in flow.lines.drain(..) {
                    scene.remove(line);
                }

                let skip = owner == Some(child) || store.is_unlocked(child);
                match view.live_node(child, scene) {
                    Some(node) if !skip => {
                        scene.animate(
                            node.primitive,
                            Attr::Fill,
                            AttrValue::Color(COLOR_NODE_UNLOCKABLE),
                            TransitionSpec::new(
                                Track::ChildReveal {
                                    cascade: self.id,
                                    child,
                                },
                                CHILD_RECOLOR,
                                Easing::CubicInOut,
                            ),
                        );
                        flow.stage = ChildStage::Recoloring;
                        false
                    }
                    _ => {
                        flow.stage = ChildStage::Done;
                        self.barrier.arrive()
                    }
                }
            }
            Track::ChildReveal { cascade, child } if cascade == self.id => {
                let Some(flow) = self.children.iter_mut().find(|c| c.child == child) else {
                    return false;
                };
                if flow.stage != ChildStage::Recoloring {
                    return false;
                }
                flow.stage = ChildStage::Done;
                self.barrier.arrive()
            }
            _ => false,
        }
    }

    fn abort(&mut self, scene: &mut Scene) {
        for flow in &mut self.children {
            for line in flow.lines.drain(..) {
                scene.remove(line);
            }
        }
    }
}

/// Every running cascade. Several may overlap when unlocks follow each other
/// quickly.
#[derive(Debug, Default)]
pub struct CascadeRunner {
    next_id: u32,
    running: Vec<Cascade>,
}

impl CascadeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts flows from `parent` to each child it just made unlockable.
    /// Returns true when there was nothing to animate, so the cascade is
    /// already settled.
    pub fn start(
        &mut self,
        parent: AchievementId,
        store: &AchievementStore,
        scene: &mut Scene,
        view: &GraphView,
    ) -> bool {
        self.next_id = self.next_id.wrapping_add(1);
        let cascade = Cascade::start(self.next_id, parent, store, scene, view);
        debug!(
            cascade = cascade.id,
            parent = %parent,
            children = cascade.children.len(),
            "cascade started"
        );
        if cascade.is_settled() {
            return true;
        }
        self.running.push(cascade);
        false
    }

    /// Routes a flow or child-recolor event to its cascade. Returns the
    /// number of cascades settled by it.
    pub fn on_transition(
        &mut self,
        event: &TransitionEvent,
        store: &AchievementStore,
        scene: &mut Scene,
        view: &GraphView,
        owner: Option<AchievementId>,
    ) -> usize {
        let mut settled = 0;
        for cascade in &mut self.running {
            if cascade.on_transition(event, store, scene, view, owner) {
                debug!(cascade = cascade.id, parent = %cascade.parent, "cascade settled");
                settled += 1;
            }
        }
        self.running.retain(|c| !c.is_settled());
        settled
    }

    pub fn running(&self) -> &[Cascade] {
        &self.running
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Drops every cascade and its temporary lines.
    pub fn abort_all(&mut self, scene: &mut Scene) {
        for cascade in &mut self.running {
            cascade.abort(scene);
        }
        self.running.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::{AchievementDef, Position};
    use crate::constants::COLOR_NODE_LOCKED;
    use std::time::Duration;

    fn def(id: u32, parents: &[u32], x: f64, y: f64) -> AchievementDef {
        AchievementDef {
            id: AchievementId(id),
            name: String::new(),
            description: String::new(),
            level_up: 1,
            parents: parents.iter().copied().map(AchievementId).collect(),
            position: Position::new(x, y),
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    struct Fixture {
        store: AchievementStore,
        scene: Scene,
        view: GraphView,
        runner: CascadeRunner,
    }

    impl Fixture {
        /// 1 -> {2, 3}, 4 needs {2, 3}
        fn new() -> Self {
            let store = AchievementStore::new(vec![
                def(1, &[], 0.0, 0.0),
                def(2, &[1], -100.0, 100.0),
                def(3, &[1], 100.0, 100.0),
                def(4, &[2, 3], 0.0, 200.0),
            ])
            .unwrap();
            let mut scene = Scene::new();
            let view = GraphView::build(&store, &mut scene);
            Self {
                store,
                scene,
                view,
                runner: CascadeRunner::new(),
            }
        }

        fn start(&mut self, parent: u32) -> bool {
            self.runner
                .start(AchievementId(parent), &self.store, &mut self.scene, &self.view)
        }

        fn advance(&mut self, n: u64) -> usize {
            let mut settled = 0;
            for event in self.scene.tick(ms(n)) {
                settled += self.runner.on_transition(
                    &event,
                    &self.store,
                    &mut self.scene,
                    &self.view,
                    None,
                );
            }
            settled
        }

        fn fill(&self, id: u32) -> Option<crate::scene::Rgb> {
            self.scene
                .fill(self.view.node(AchievementId(id)).unwrap().primitive)
        }
    }

    #[test]
    fn test_barrier_completes_once() {
        let mut barrier = CompletionBarrier::new(2);
        assert!(!barrier.arrive());
        assert_eq!(barrier.remaining(), 1);
        assert!(barrier.arrive());
        assert!(!barrier.arrive());
        assert!(barrier.is_complete());
    }

    #[test]
    fn test_empty_barrier_is_complete() {
        assert!(CompletionBarrier::new(0).is_complete());
    }

    #[test]
    fn test_no_children_settles_immediately() {
        let mut f = Fixture::new();
        f.store.unlock(AchievementId(1)).unwrap();
        f.store.unlock(AchievementId(2)).unwrap();
        // 4 still needs 3
        assert!(f.start(2));
        assert!(f.runner.is_idle());
    }

    #[test]
    fn test_flows_then_recolor_then_settle() {
        let mut f = Fixture::new();
        f.store.unlock(AchievementId(1)).unwrap();
        let before = f.scene.len();
        assert!(!f.start(1));
        assert_eq!(f.scene.len(), before + 2);
        assert_eq!(f.runner.running()[0].children(), vec![AchievementId(2), AchievementId(3)]);

        assert_eq!(f.advance(1499), 0);
        assert_eq!(f.fill(2), Some(COLOR_NODE_LOCKED));

        // flows end, lines go away, recolor starts
        assert_eq!(f.advance(1), 0);
        assert_eq!(f.scene.len(), before);
        assert_eq!(f.advance(299), 0);
        assert_eq!(f.advance(1), 1);
        assert_eq!(f.fill(2), Some(COLOR_NODE_UNLOCKABLE));
        assert_eq!(f.fill(3), Some(COLOR_NODE_UNLOCKABLE));
        assert!(f.runner.is_idle());
    }

    #[test]
    fn test_child_waits_for_every_flow() {
        let mut f = Fixture::new();
        for id in [1, 2, 3] {
            f.store.unlock(AchievementId(id)).unwrap();
        }
        assert!(!f.start(3));
        // one flow per prerequisite of 4
        assert_eq!(f.runner.running()[0].lines().count(), 2);
        f.advance(1500);
        assert_eq!(f.runner.running()[0].lines().count(), 0);
        assert_eq!(f.advance(300), 1);
    }

    #[test]
    fn test_flow_dash_reveals_from_parent() {
        let mut f = Fixture::new();
        f.store.unlock(AchievementId(1)).unwrap();
        f.start(1);
        let line = f.runner.running()[0].lines().next().unwrap();
        let Some(crate::scene::Primitive::Line(shape)) = f.scene.primitive(line).cloned() else {
            panic!("flow is not a line");
        };
        assert!(shape.visible_segments().is_empty());
        f.advance(750);
        let Some(crate::scene::Primitive::Line(shape)) = f.scene.primitive(line).cloned() else {
            panic!("flow is not a line");
        };
        let segments = shape.visible_segments();
        assert_eq!(segments.len(), 1);
        assert!((segments[0].1 - shape.length() / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_owned_child_skips_recolor() {
        let mut f = Fixture::new();
        f.store.unlock(AchievementId(1)).unwrap();
        f.start(1);
        let mut settled = 0;
        for event in f.scene.tick(ms(1500)) {
            settled += f.runner.on_transition(
                &event,
                &f.store,
                &mut f.scene,
                &f.view,
                Some(AchievementId(2)),
            );
        }
        assert_eq!(settled, 0);
        assert_eq!(f.advance(300), 1);
        assert_eq!(f.fill(2), Some(COLOR_NODE_LOCKED));
    }

    #[test]
    fn test_interrupted_recolor_still_arrives() {
        let mut f = Fixture::new();
        f.store.unlock(AchievementId(1)).unwrap();
        f.start(1);
        f.advance(1500);
        let node2 = f.view.node(AchievementId(2)).unwrap().primitive;
        f.scene
            .set(node2, Attr::Fill, AttrValue::Color(COLOR_NODE_LOCKED));
        assert_eq!(f.advance(300), 1);
        assert!(f.runner.is_idle());
    }

    #[test]
    fn test_missing_child_node_counts_as_arrived() {
        let mut f = Fixture::new();
        f.store.unlock(AchievementId(1)).unwrap();
        let node3 = f.view.node(AchievementId(3)).unwrap().primitive;
        f.scene.remove(node3);
        assert!(!f.start(1));
        assert_eq!(f.runner.running()[0].lines().count(), 1);
        f.advance(1500);
        assert_eq!(f.advance(300), 1);
    }

    #[test]
    fn test_abort_removes_lines() {
        let mut f = Fixture::new();
        f.store.unlock(AchievementId(1)).unwrap();
        let before = f.scene.len();
        f.start(1);
        f.runner.abort_all(&mut f.scene);
        assert_eq!(f.scene.len(), before);
        assert!(f.runner.is_idle());
        assert_eq!(f.advance(2000), 0);
    }
}
