//! Retained-mode scene: primitives plus the transitions animating them.

use super::color::Rgb;
use super::types::{
    Attr, AttrValue, CircleShape, Layer, LineShape, Primitive, PrimitiveId, Track, Transition,
    TransitionEvent, TransitionOutcome, TransitionSpec,
};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Placed {
    layer: Layer,
    primitive: Primitive,
}

/// Owns every drawable primitive and advances their transitions on a
/// logical clock.
#[derive(Debug, Default)]
pub struct Scene {
    next_id: u64,
    primitives: BTreeMap<PrimitiveId, Placed>,
    transitions: Vec<Transition>,
    pending: Vec<TransitionEvent>,
    clock: Duration,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the scene clock.
    pub fn now(&self) -> Duration {
        self.clock
    }

    pub fn add_circle(&mut self, layer: Layer, shape: CircleShape) -> PrimitiveId {
        self.insert(layer, Primitive::Circle(shape))
    }

    pub fn add_line(&mut self, layer: Layer, shape: LineShape) -> PrimitiveId {
        self.insert(layer, Primitive::Line(shape))
    }

    fn insert(&mut self, layer: Layer, primitive: Primitive) -> PrimitiveId {
        self.next_id += 1;
        let id = PrimitiveId(self.next_id);
        self.primitives.insert(id, Placed { layer, primitive });
        id
    }

    /// Removes a primitive and silently drops its transitions.
    pub fn remove(&mut self, id: PrimitiveId) -> bool {
        self.transitions.retain(|t| t.primitive != id);
        self.primitives.remove(&id).is_some()
    }

    pub fn contains(&self, id: PrimitiveId) -> bool {
        self.primitives.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(&id).map(|p| &p.primitive)
    }

    pub fn layer_of(&self, id: PrimitiveId) -> Option<Layer> {
        self.primitives.get(&id).map(|p| p.layer)
    }

    /// Primitives in draw order: by layer, then by creation.
    pub fn draw_order(&self) -> Vec<(PrimitiveId, &Primitive)> {
        let mut ordered: Vec<_> = self
            .primitives
            .iter()
            .map(|(id, placed)| (placed.layer, *id, &placed.primitive))
            .collect();
        ordered.sort_by_key(|(layer, id, _)| (*layer, *id));
        ordered
            .into_iter()
            .map(|(_, id, primitive)| (id, primitive))
            .collect()
    }

    pub fn get(&self, id: PrimitiveId, attr: Attr) -> Option<AttrValue> {
        self.primitive(id).and_then(|p| p.get(attr))
    }

    pub fn fill(&self, id: PrimitiveId) -> Option<Rgb> {
        self.get(id, Attr::Fill).and_then(AttrValue::as_color)
    }

    pub fn stroke(&self, id: PrimitiveId) -> Option<Rgb> {
        self.get(id, Attr::Stroke).and_then(AttrValue::as_color)
    }

    pub fn radius(&self, id: PrimitiveId) -> Option<f64> {
        self.get(id, Attr::Radius).and_then(AttrValue::as_number)
    }

    pub fn opacity(&self, id: PrimitiveId) -> Option<f64> {
        self.get(id, Attr::Opacity).and_then(AttrValue::as_number)
    }

    /// Sets an attribute immediately, interrupting any transition on it.
    pub fn set(&mut self, id: PrimitiveId, attr: Attr, value: AttrValue) -> bool {
        if !self.supports(id, attr) {
            return false;
        }
        self.interrupt_attr(id, attr);
        self.primitives
            .get_mut(&id)
            .is_some_and(|p| p.primitive.set(attr, value))
    }

    /// Starts a transition from the current value to `to`. Any transition
    /// already animating `attr` on this primitive is interrupted first.
    pub fn animate(
        &mut self,
        id: PrimitiveId,
        attr: Attr,
        to: AttrValue,
        spec: TransitionSpec,
    ) -> bool {
        if !self.supports(id, attr) {
            return false;
        }
        let from = self.get(id, attr).unwrap_or(to);
        self.interrupt_attr(id, attr);
        self.transitions.push(Transition {
            primitive: id,
            attr,
            track: spec.track,
            from,
            to,
            duration: spec.duration,
            elapsed: Duration::ZERO,
            easing: spec.easing,
        });
        true
    }

    /// Stops the named transition on a primitive, leaving the attribute at
    /// its current value.
    pub fn interrupt(&mut self, id: PrimitiveId, track: Track) -> bool {
        self.interrupt_where(|t| t.primitive == id && t.track == track)
    }

    /// Stops every transition on a primitive.
    pub fn interrupt_all(&mut self, id: PrimitiveId) -> bool {
        self.interrupt_where(|t| t.primitive == id)
    }

    fn interrupt_attr(&mut self, id: PrimitiveId, attr: Attr) -> bool {
        self.interrupt_where(|t| t.primitive == id && t.attr == attr)
    }

    fn interrupt_where(&mut self, mut hit: impl FnMut(&Transition) -> bool) -> bool {
        let pending = &mut self.pending;
        let before = self.transitions.len();
        self.transitions.retain(|t| {
            if hit(t) {
                pending.push(TransitionEvent {
                    primitive: t.primitive,
                    track: t.track,
                    outcome: TransitionOutcome::Interrupted,
                });
                false
            } else {
                true
            }
        });
        self.transitions.len() != before
    }

    pub fn is_animating(&self, id: PrimitiveId, track: Track) -> bool {
        self.transitions
            .iter()
            .any(|t| t.primitive == id && t.track == track)
    }

    /// Target value of the transition currently animating `attr`, if any.
    pub fn pending_target(&self, id: PrimitiveId, attr: Attr) -> Option<AttrValue> {
        self.transitions
            .iter()
            .find(|t| t.primitive == id && t.attr == attr)
            .map(|t| t.to)
    }

    pub fn active_transitions(&self) -> usize {
        self.transitions.len()
    }

    /// Advances the clock, applies every running transition and reports the
    /// ones that ended or were interrupted since the last tick, in that order.
    pub fn tick(&mut self, dt: Duration) -> Vec<TransitionEvent> {
        self.clock += dt;
        let mut events = std::mem::take(&mut self.pending);

        let primitives = &mut self.primitives;
        self.transitions.retain_mut(|t| {
            t.elapsed += dt;
            let value = t.value();
            if let Some(placed) = primitives.get_mut(&t.primitive) {
                placed.primitive.set(t.attr, value);
            }
            if t.progress() >= 1.0 {
                events.push(TransitionEvent {
                    primitive: t.primitive,
                    track: t.track,
                    outcome: TransitionOutcome::Ended,
                });
                false
            } else {
                true
            }
        });

        events
    }

    fn supports(&self, id: PrimitiveId, attr: Attr) -> bool {
        self.primitive(id).is_some_and(|p| p.supports(attr))
    }
}
