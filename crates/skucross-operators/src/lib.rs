#![forbid(unsafe_code)]
//! skucross-operators: the Cross-Join Projector.
//!
//! - `project`: resolves the allow-list against the two input schemas.
//! - `join::cross`: builds the product in memory, then stable-sorts by key.
//! - `join::store`: loads both inputs into a transient SQLite database and lets
//!   it compute the same product in the same order.
//! - `projector`: picks a strategy and runs it; the entry point for callers.

pub mod join;
pub mod plan;
pub mod project;
pub mod projector;
pub mod traits;

pub use plan::{Footprint, OpPlan};
pub use project::{ProjectedColumn, ProjectionPlan, Side};
pub use projector::{project_cross_join, CrossJoinProjector, Projection};
pub use traits::{OpError, Operator};
