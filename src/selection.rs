//! Pulsing ring around the selected node.

use crate::constants::{
    COLOR_SELECTION, SELECTION_MARGIN, SELECTION_PULSE, SELECTION_PULSE_HALF,
    SELECTION_STROKE_WIDTH,
};
use crate::scene::{
    Attr, AttrValue, CircleShape, Easing, Layer, PrimitiveId, Scene, Track, TransitionEvent,
    TransitionOutcome, TransitionSpec,
};
use crate::view::NodeView;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Ring {
    primitive: PrimitiveId,
    base_radius: f64,
}

/// At most one ring exists. Selecting again replaces it.
#[derive(Debug, Default)]
pub struct SelectionIndicator {
    ring: Option<Ring>,
}

impl SelectionIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ring(&self) -> Option<PrimitiveId> {
        self.ring.map(|r| r.primitive)
    }

    pub fn select(&mut self, node: &NodeView, scene: &mut Scene) {
        self.clear(scene);
        let base_radius = node.radius + SELECTION_MARGIN;
        let primitive = scene.add_circle(
            Layer::Effects,
            CircleShape::ring(
                node.center.x,
                node.center.y,
                base_radius,
                COLOR_SELECTION,
                SELECTION_STROKE_WIDTH,
            ),
        );
        self.ring = Some(Ring {
            primitive,
            base_radius,
        });
        pulse(scene, primitive, base_radius + SELECTION_PULSE, Track::PulseGrow);
    }

    /// Keeps the pulse going: each half ends by starting the other.
    pub fn on_transition(&mut self, event: &TransitionEvent, scene: &mut Scene) {
        let Some(ring) = self.ring else {
            return;
        };
        if event.primitive != ring.primitive || event.outcome != TransitionOutcome::Ended {
            return;
        }
        match event.track {
            Track::PulseGrow => pulse(scene, ring.primitive, ring.base_radius, Track::PulseShrink),
            Track::PulseShrink => pulse(
                scene,
                ring.primitive,
                ring.base_radius + SELECTION_PULSE,
                Track::PulseGrow,
            ),
            _ => {}
        }
    }

    pub fn clear(&mut self, scene: &mut Scene) {
        if let Some(ring) = self.ring.take() {
            scene.remove(ring.primitive);
        }
    }
}

fn pulse(scene: &mut Scene, ring: PrimitiveId, radius: f64, track: Track) {
    scene.animate(
        ring,
        Attr::Radius,
        AttrValue::Number(radius),
        TransitionSpec::new(track, SELECTION_PULSE_HALF, Easing::SinInOut),
    );
}
