//! Prerequisite graph: derived edges, eligibility and the color mapping.

pub mod edges;
pub mod eligibility;
pub mod style;

pub use edges::{edges, Edge};
pub use eligibility::{
    edge_status, newly_unlockable_children, parents_satisfied, status, status_of, EdgeStatus,
    Status,
};
