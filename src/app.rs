//! Top-level application state: the store, its saved progress, the scene
//! and every controller animating it.
//!
//! Pointer events and clock ticks come in from the shell; transition events
//! coming out of the scene are routed back to whichever controller started
//! them.

use crate::achievements::{
    AchievementDef, AchievementId, AchievementStore, DataError, JsonFileStore, KeyValueStore,
    ProgressAdapter,
};
use crate::graph::{self, Status};
use crate::interaction::{HoldState, InteractionSession};
use crate::scene::{PrimitiveId, Scene, Track, TransitionEvent};
use crate::selection::SelectionIndicator;
use crate::unlock::{Cascade, CascadeRunner, UnlockContext, UnlockOrchestrator, UnlockProgress};
use crate::view::GraphView;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What the sidebar shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Details {
    #[default]
    Nothing,
    Achievement {
        name: String,
        description: String,
        level_up: u32,
    },
}

impl Details {
    pub fn title(&self) -> &str {
        match self {
            Details::Nothing => "No achievement selected",
            Details::Achievement { name, .. } => name,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Details::Nothing => "Click an achievement to see its details here.",
            Details::Achievement { description, .. } => description,
        }
    }

    pub fn level_line(&self) -> Option<String> {
        match self {
            Details::Nothing => None,
            Details::Achievement { level_up, .. } => Some(format!("Level gain: +{}", level_up)),
        }
    }
}

pub struct App<K: KeyValueStore = JsonFileStore> {
    store: AchievementStore,
    progress: ProgressAdapter<K>,
    scene: Scene,
    view: GraphView,
    session: InteractionSession,
    unlocks: UnlockOrchestrator,
    cascades: CascadeRunner,
    selection: SelectionIndicator,
    selected: Option<AchievementId>,
    details: Details,
}

impl<K: KeyValueStore> App<K> {
    /// Builds the store from `defs`, applies saved progress from `backend`
    /// and creates the scene already colored for it.
    pub fn new(defs: Vec<AchievementDef>, backend: K) -> Result<Self, DataError> {
        let mut store = AchievementStore::new(defs)?;
        let progress = ProgressAdapter::new(backend);
        store.restore(&progress.load());
        info!(
            achievements = store.len(),
            unlocked = store.unlocked_count(),
            level = store.level(),
            "progress loaded"
        );

        let mut scene = Scene::new();
        let view = GraphView::build(&store, &mut scene);
        Ok(Self {
            store,
            progress,
            scene,
            view,
            session: InteractionSession::new(),
            unlocks: UnlockOrchestrator::new(),
            cascades: CascadeRunner::new(),
            selection: SelectionIndicator::new(),
            selected: None,
            details: Details::Nothing,
        })
    }

    pub fn store(&self) -> &AchievementStore {
        &self.store
    }

    pub fn progress(&self) -> &ProgressAdapter<K> {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressAdapter<K> {
        &mut self.progress
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn view(&self) -> &GraphView {
        &self.view
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn selected(&self) -> Option<AchievementId> {
        self.selected
    }

    pub fn selection_ring(&self) -> Option<PrimitiveId> {
        self.selection.ring()
    }

    pub fn level(&self) -> u32 {
        self.store.level()
    }

    pub fn status(&self, id: AchievementId) -> Option<Status> {
        graph::status_of(id, &self.store)
    }

    pub fn hold_state(&self) -> HoldState {
        self.session.state()
    }

    /// Whether a hold or unlock sequence is in flight.
    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    /// Cascades still animating.
    pub fn cascades(&self) -> &[Cascade] {
        self.cascades.running()
    }

    pub fn cascades_running(&self) -> usize {
        self.cascades.running().len()
    }

    /// Node under a world-space point.
    pub fn node_at(&self, x: f64, y: f64) -> Option<AchievementId> {
        self.view.node_at(x, y)
    }

    /// Selects the node and, if it is unlockable and nothing else is held,
    /// starts a hold on it.
    pub fn pointer_down(&mut self, id: AchievementId) {
        let Some(achievement) = self.store.get(id) else {
            return;
        };
        self.details = Details::Achievement {
            name: achievement.name().to_string(),
            description: achievement.description().to_string(),
            level_up: achievement.level_up(),
        };
        self.selected = Some(id);
        if let Some(node) = self.view.live_node(id, &self.scene).copied() {
            self.selection.select(&node, &mut self.scene);
        }

        if self
            .session
            .pointer_down(id, &self.store, &mut self.scene, &self.view)
        {
            debug!(achievement = %id, "hold started");
        }
    }

    pub fn pointer_up(&mut self, id: AchievementId) {
        self.session
            .pointer_up(id, &self.store, &mut self.scene, &self.view);
    }

    pub fn pointer_leave(&mut self, id: AchievementId) {
        self.session
            .pointer_leave(id, &self.store, &mut self.scene, &self.view);
    }

    /// Advances the clock by `dt`, dispatching every transition event and
    /// checking the hold timer.
    pub fn tick(&mut self, dt: Duration) {
        let events = self.scene.tick(dt);
        for event in events {
            self.dispatch(event);
        }

        if let Some(target) = self
            .session
            .poll_timer(&self.store, &mut self.scene, &self.view)
        {
            debug!(achievement = %target, "hold completed");
            if !self
                .unlocks
                .begin(target, &self.store, &mut self.scene, &self.view)
            {
                self.session.finish(target);
                self.refresh();
            }
        }
    }

    /// Clears all progress, in memory and on disk, and recolors everything.
    /// In-flight holds, unlock sequences and cascades are dropped first;
    /// an unlock that has not committed yet is discarded.
    pub fn reset(&mut self) {
        self.session.reset(&mut self.scene);
        self.unlocks.abort(&mut self.scene);
        self.cascades.abort_all(&mut self.scene);

        self.store.reset();
        if let Err(e) = self.progress.clear() {
            warn!(error = %e, "failed to clear saved progress");
        }

        self.selection.clear(&mut self.scene);
        self.selected = None;
        self.details = Details::Nothing;
        self.refresh();
        info!("progress reset");
    }

    /// Recolors every node and edge for the current store state.
    fn refresh(&mut self) -> usize {
        self.view
            .refresh(&mut self.scene, &self.store, self.session.owner())
    }

    fn dispatch(&mut self, event: TransitionEvent) {
        match event.track {
            Track::CoverShrink => self.session.on_transition(&event, &mut self.scene),
            Track::PulseGrow | Track::PulseShrink => {
                self.selection.on_transition(&event, &mut self.scene)
            }
            Track::ExplodeGrow | Track::ExplodeFade | Track::FinalFill => {
                let reports = self.unlocks.on_transition(
                    &event,
                    UnlockContext {
                        store: &mut self.store,
                        progress: &mut self.progress,
                        scene: &mut self.scene,
                        view: &self.view,
                    },
                );
                for report in reports {
                    self.on_unlock_progress(report);
                }
            }
            Track::FlowReveal { .. } | Track::ChildReveal { .. } => {
                let settled = self.cascades.on_transition(
                    &event,
                    &self.store,
                    &mut self.scene,
                    &self.view,
                    self.session.owner(),
                );
                if settled > 0 {
                    self.refresh();
                }
            }
            Track::HoldRevert | Track::NodeRefresh | Track::LinkRefresh => {}
        }
    }

    fn on_unlock_progress(&mut self, report: UnlockProgress) {
        match report {
            UnlockProgress::Committed { .. } => {}
            UnlockProgress::Finished { target, unlocked } => {
                self.session.finish(target);
                if !unlocked {
                    self.refresh();
                    return;
                }
                if self
                    .cascades
                    .start(target, &self.store, &mut self.scene, &self.view)
                {
                    self.refresh();
                }
            }
        }
    }
}
