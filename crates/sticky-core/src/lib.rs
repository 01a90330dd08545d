//! Core primitives shared by the sticky header crates.
//!
//! Everything here is single threaded and frame driven:
//! - [`geometry`] - sizes, points, rects and measurement constraints
//! - [`frame`] - the post-frame task queue used to defer rebuilds
//! - [`saveable`] - per-section durable state keyed by [`SectionKey`]

pub mod error;
pub mod frame;
pub mod geometry;
pub mod saveable;

pub use error::*;
pub use frame::*;
pub use geometry::*;
pub use saveable::*;

/// Identifier of a child layout node owned by the host tree.
pub type NodeId = usize;

/// Role of a child inside a sticky section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChildRole {
    Header,
    Content,
}

impl ChildRole {
    /// Slot index in a two-child arena.
    pub const fn index(self) -> usize {
        match self {
            ChildRole::Header => 0,
            ChildRole::Content => 1,
        }
    }
}

impl std::fmt::Display for ChildRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChildRole::Header => f.write_str("header"),
            ChildRole::Content => f.write_str("content"),
        }
    }
}
