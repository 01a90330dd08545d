//! Sticky header layout.
//!
//! - [`compute_sticky_layout`] - pure per-section header placement and stuck amount
//! - [`stack_sections`] - cumulative section offsets inside one scrollable

mod engine;
mod section_stack;

pub use engine::*;
pub use section_stack::*;
