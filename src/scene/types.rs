//! Scene primitives, animatable attributes and transition bookkeeping.

use super::color::Rgb;
use super::easing::Easing;
use crate::achievements::AchievementId;
use std::time::Duration;

/// Handle to a primitive living in a [`super::Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub(crate) u64);

/// Draw order groups. Lower layers are drawn first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Links,
    Nodes,
    Effects,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl CircleShape {
    /// A filled disc without outline.
    pub fn disc(cx: f64, cy: f64, r: f64, fill: Rgb) -> Self {
        Self {
            cx,
            cy,
            r,
            fill: Some(fill),
            stroke: None,
            stroke_width: 0.0,
            opacity: 1.0,
        }
    }

    /// An outline-only ring.
    pub fn ring(cx: f64, cy: f64, r: f64, stroke: Rgb, stroke_width: f64) -> Self {
        Self {
            cx,
            cy,
            r,
            fill: None,
            stroke: Some(stroke),
            stroke_width,
            opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: Rgb,
    pub stroke_width: f64,
    pub opacity: f64,
    /// Dash and gap length of a `d d` dash pattern. `None` draws a solid line.
    pub dash_array: Option<f64>,
    pub dash_offset: f64,
}

impl LineShape {
    pub fn solid(x1: f64, y1: f64, x2: f64, y2: f64, stroke: Rgb, stroke_width: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
            opacity: 1.0,
            dash_array: None,
            dash_offset: 0.0,
        }
    }

    pub fn length(&self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }

    /// Point at distance `s` from the start, along the line.
    pub fn point_at(&self, s: f64) -> (f64, f64) {
        let len = self.length();
        if len <= f64::EPSILON {
            return (self.x1, self.y1);
        }
        let t = (s / len).clamp(0.0, 1.0);
        (
            self.x1 + (self.x2 - self.x1) * t,
            self.y1 + (self.y2 - self.y1) * t,
        )
    }

    /// Drawn intervals `(from, to)` as distances along the line, after
    /// applying the dash pattern and offset.
    pub fn visible_segments(&self) -> Vec<(f64, f64)> {
        let len = self.length();
        let dash = match self.dash_array {
            Some(d) if d > 0.0 => d,
            _ => return vec![(0.0, len)],
        };
        let period = dash * 2.0;
        let mut start = -self.dash_offset.rem_euclid(period);
        let mut segments = Vec::new();
        while start < len {
            let from = start.max(0.0);
            let to = (start + dash).min(len);
            if to - from > 1e-9 {
                segments.push((from, to));
            }
            start += period;
        }
        segments
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Circle(CircleShape),
    Line(LineShape),
}

/// Animatable attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Radius,
    Fill,
    Stroke,
    Opacity,
    DashOffset,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrValue {
    Number(f64),
    Color(Rgb),
}

impl AttrValue {
    pub fn interpolate(self, to: AttrValue, t: f64) -> AttrValue {
        match (self, to) {
            (AttrValue::Number(a), AttrValue::Number(b)) => AttrValue::Number(a + (b - a) * t),
            (AttrValue::Color(a), AttrValue::Color(b)) => AttrValue::Color(a.lerp(b, t)),
            (_, to) => to,
        }
    }

    pub fn as_number(self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(n),
            AttrValue::Color(_) => None,
        }
    }

    pub fn as_color(self) -> Option<Rgb> {
        match self {
            AttrValue::Color(c) => Some(c),
            AttrValue::Number(_) => None,
        }
    }
}

impl Primitive {
    pub fn supports(&self, attr: Attr) -> bool {
        matches!(
            (self, attr),
            (Primitive::Circle(_), Attr::Radius | Attr::Fill | Attr::Stroke | Attr::Opacity)
                | (Primitive::Line(_), Attr::Stroke | Attr::Opacity | Attr::DashOffset)
        )
    }

    pub fn get(&self, attr: Attr) -> Option<AttrValue> {
        match (self, attr) {
            (Primitive::Circle(c), Attr::Radius) => Some(AttrValue::Number(c.r)),
            (Primitive::Circle(c), Attr::Fill) => c.fill.map(AttrValue::Color),
            (Primitive::Circle(c), Attr::Stroke) => c.stroke.map(AttrValue::Color),
            (Primitive::Circle(c), Attr::Opacity) => Some(AttrValue::Number(c.opacity)),
            (Primitive::Line(l), Attr::Stroke) => Some(AttrValue::Color(l.stroke)),
            (Primitive::Line(l), Attr::Opacity) => Some(AttrValue::Number(l.opacity)),
            (Primitive::Line(l), Attr::DashOffset) => Some(AttrValue::Number(l.dash_offset)),
            _ => None,
        }
    }

    /// Writes an attribute. Returns false when the primitive has no such
    /// attribute or the value has the wrong kind.
    pub fn set(&mut self, attr: Attr, value: AttrValue) -> bool {
        match (self, attr, value) {
            (Primitive::Circle(c), Attr::Radius, AttrValue::Number(n)) => c.r = n.max(0.0),
            (Primitive::Circle(c), Attr::Fill, AttrValue::Color(rgb)) => c.fill = Some(rgb),
            (Primitive::Circle(c), Attr::Stroke, AttrValue::Color(rgb)) => c.stroke = Some(rgb),
            (Primitive::Circle(c), Attr::Opacity, AttrValue::Number(n)) => {
                c.opacity = n.clamp(0.0, 1.0)
            }
            (Primitive::Line(l), Attr::Stroke, AttrValue::Color(rgb)) => l.stroke = rgb,
            (Primitive::Line(l), Attr::Opacity, AttrValue::Number(n)) => {
                l.opacity = n.clamp(0.0, 1.0)
            }
            (Primitive::Line(l), Attr::DashOffset, AttrValue::Number(n)) => l.dash_offset = n,
            _ => return false,
        }
        true
    }
}

/// Name of a transition. Starting a transition interrupts whatever else was
/// animating the same attribute of the same primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    /// Cover disc shrinking while a node is held.
    CoverShrink,
    /// Node fill going back after a cancelled hold.
    HoldRevert,
    ExplodeGrow,
    ExplodeFade,
    /// Node fill settling on its unlocked color.
    FinalFill,
    FlowReveal {
        cascade: u32,
        parent: AchievementId,
        child: AchievementId,
    },
    /// Child fill turning unlockable once all its flows have arrived.
    ChildReveal {
        cascade: u32,
        child: AchievementId,
    },
    PulseGrow,
    PulseShrink,
    NodeRefresh,
    LinkRefresh,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSpec {
    pub track: Track,
    pub duration: Duration,
    pub easing: Easing,
}

impl TransitionSpec {
    pub fn new(track: Track, duration: Duration, easing: Easing) -> Self {
        Self {
            track,
            duration,
            easing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Ended,
    Interrupted,
}

/// Reported by [`super::Scene::tick`] for every transition that finished or
/// was cut short since the previous tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionEvent {
    pub primitive: PrimitiveId,
    pub track: Track,
    pub outcome: TransitionOutcome,
}

#[derive(Debug, Clone)]
pub(crate) struct Transition {
    pub primitive: PrimitiveId,
    pub attr: Attr,
    pub track: Track,
    pub from: AttrValue,
    pub to: AttrValue,
    pub duration: Duration,
    pub elapsed: Duration,
    pub easing: Easing,
}

impl Transition {
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn value(&self) -> AttrValue {
        self.from
            .interpolate(self.to, self.easing.apply(self.progress()))
    }
}
