//! Sticky section headers.
//!
//! [`StickyHeaderNode`] pins a header to the top of the viewport while its
//! section scrolls by, and lets the next section push it out.
//! [`ExpandableStickyHeader`] adds a tappable header that folds the section
//! content away, and [`StickySectionColumn`] stacks sections on one scroll
//! source.

pub mod expandable_content;
pub mod expandable_sticky_header;
pub mod expander;
pub mod layout_child;
pub mod pointer;
pub mod section_column;
pub mod sticky_header_node;

pub use expandable_content::ExpandableContent;
pub use expandable_sticky_header::{
    ExpandableStickyHeader, ExpandableStickyHeaderSpec, HeaderBuilder, HeaderChrome,
    HeaderContent, SectionEnvironment,
};
pub use expander::{
    ExpanderController, ExpanderDirection, ExpanderPhase, ExpanderSpec, ExpanderState,
    ExpanderTarget,
};
pub use layout_child::{HitTarget, LayoutChild, LeafChild, PaintScope};
pub use pointer::{PointerEvent, PointerEventKind};
pub use section_column::{SectionHit, StickySection, StickySectionColumn};
pub use sticky_header_node::{StickyHeaderNode, StickyHeaderSpec, StuckAmountCallback};

pub use sticky_animation::{AnimationSpec, CurveEvaluator, Easing, StandardCurves};
pub use sticky_core::{
    ChildRole, Constraints, FrameCallbackQueue, MemorySaveableRegistry, NodeId, Point, Rect,
    SaveableStateRegistry, SectionKey, Size, StickyError, StickyResult,
};
pub use sticky_foundation::{
    compute_sticky_layout, HeaderChildLayout, ScrollOffsetSource, ScrollState, StickyLayoutInput,
};
