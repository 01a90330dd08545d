//! Foundation layer for sticky section headers.
//!
//! - [`scroll`] - the scroll offset source contract and [`ScrollState`]
//! - [`sticky`] - the pure layout engine and section stacking math

pub mod scroll;
pub mod sticky;

pub use scroll::{ScrollOffsetSource, ScrollState, ScrollSubscriptionId};
pub use sticky::*;

pub use sticky_core::{Constraints, Point, Rect, Size};
