//! Scene primitives backing the graph: one circle per achievement, one line
//! per edge, plus the global recolor.

use crate::achievements::{AchievementId, AchievementStore, Position};
use crate::constants::{
    COLOR_NODE_STROKE, EDGE_STROKE_WIDTH, GLOBAL_REFRESH, NODE_RADIUS,
    NODE_STROKE_WIDTH, ROOT_RADIUS,
};
use crate::graph::{self, style, Edge};
use crate::scene::{
    Attr, AttrValue, CircleShape, Easing, Layer, LineShape, PrimitiveId, Rgb, Scene, Track,
    TransitionSpec,
};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeView {
    pub id: AchievementId,
    pub primitive: PrimitiveId,
    pub center: Position,
    pub radius: f64,
}

impl NodeView {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.center.distance_to(Position::new(x, y)) <= self.radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeView {
    pub edge: Edge,
    pub primitive: PrimitiveId,
}

#[derive(Debug, Clone, Default)]
pub struct GraphView {
    nodes: Vec<NodeView>,
    index: HashMap<AchievementId, usize>,
    edges: Vec<EdgeView>,
}

impl GraphView {
    /// Creates the static primitives, already colored for the current store
    /// state.
    pub fn build(store: &AchievementStore, scene: &mut Scene) -> Self {
        let mut view = GraphView::default();

        for edge in graph::edges(store) {
            let (Some(source), Some(target)) = (store.get(edge.source), store.get(edge.target))
            else {
                continue;
            };
            let (from, to) = (source.position(), target.position());
            let stroke = style::edge_stroke(graph::edge_status(edge, store));
            let primitive = scene.add_line(
                Layer::Links,
                LineShape::solid(from.x, from.y, to.x, to.y, stroke, EDGE_STROKE_WIDTH),
            );
            view.edges.push(EdgeView { edge, primitive });
        }

        for achievement in store.iter() {
            let radius = if store.is_root(achievement.id()) {
                ROOT_RADIUS
            } else {
                NODE_RADIUS
            };
            let center = achievement.position();
            let fill = style::node_fill(graph::status(achievement, store));
            let primitive = scene.add_circle(
                Layer::Nodes,
                CircleShape {
                    cx: center.x,
                    cy: center.y,
                    r: radius,
                    fill: Some(fill),
                    stroke: Some(COLOR_NODE_STROKE),
                    stroke_width: NODE_STROKE_WIDTH,
                    opacity: 1.0,
                },
            );
            view.index.insert(achievement.id(), view.nodes.len());
            view.nodes.push(NodeView {
                id: achievement.id(),
                primitive,
                center,
                radius,
            });
        }

        view
    }

    pub fn node(&self, id: AchievementId) -> Option<&NodeView> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// The node only if its primitive is still present in the scene.
    pub fn live_node(&self, id: AchievementId, scene: &Scene) -> Option<&NodeView> {
        self.node(id).filter(|n| scene.contains(n.primitive))
    }

    pub fn nodes(&self) -> &[NodeView] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeView] {
        &self.edges
    }

    /// Topmost node under a world-space point.
    pub fn node_at(&self, x: f64, y: f64) -> Option<AchievementId> {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.contains(x, y))
            .map(|n| n.id)
    }

    /// World-space bounding box of every node, including radii.
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let first = self.nodes.first()?;
        let mut min = Position::new(first.center.x - first.radius, first.center.y - first.radius);
        let mut max = Position::new(first.center.x + first.radius, first.center.y + first.radius);
        for n in &self.nodes {
            min.x = min.x.min(n.center.x - n.radius);
            min.y = min.y.min(n.center.y - n.radius);
            max.x = max.x.max(n.center.x + n.radius);
            max.y = max.y.max(n.center.y + n.radius);
        }
        Some((min, max))
    }

    /// Recolors every node and edge toward the color its current status
    /// calls for. `skip` names a node owned by an in-flight hold or unlock.
    /// Attributes already at (or already heading to) their color are left
    /// alone. Returns the number of transitions started.
    pub fn refresh(
        &self,
        scene: &mut Scene,
        store: &AchievementStore,
        skip: Option<AchievementId>,
    ) -> usize {
        let mut started = 0;
        for node in &self.nodes {
            if Some(node.id) == skip {
                continue;
            }
            let Some(status) = graph::status_of(node.id, store) else {
                continue;
            };
            if retarget(
                scene,
                node.primitive,
                Attr::Fill,
                style::node_fill(status),
                Track::NodeRefresh,
            ) {
                started += 1;
            }
        }
        for edge in &self.edges {
            let stroke = style::edge_stroke(graph::edge_status(edge.edge, store));
            if retarget(scene, edge.primitive, Attr::Stroke, stroke, Track::LinkRefresh) {
                started += 1;
            }
        }
        started
    }
}

fn retarget(scene: &mut Scene, id: PrimitiveId, attr: Attr, color: Rgb, track: Track) -> bool {
    let target = AttrValue::Color(color);
    let settled = match scene.pending_target(id, attr) {
        Some(pending) => pending == target,
        None => scene.get(id, attr) == Some(target),
    };
    if settled || !scene.contains(id) {
        return false;
    }
    scene.animate(
        id,
        attr,
        target,
        TransitionSpec::new(track, GLOBAL_REFRESH, Easing::CubicInOut),
    )
}
