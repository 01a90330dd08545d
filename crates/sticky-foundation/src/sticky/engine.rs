//! Core placement algorithm for sticky headers.
//!
//! Given the measured header and content of one section, where the section
//! sits in the scrollable, and the current scroll offset, decide where the
//! header is painted and how "stuck" it is.
//!
//! The stuck amount has three zones:
//! 1. `(0, 1]` - approaching: the header is below the viewport top, and the
//!    value is the remaining distance in header heights (clamped to 1)
//! 2. `0` - stuck: the header is pinned to the viewport top
//! 3. `[-1, 0)` - displaced: the section is running out of content and the
//!    next header pushes this one upward
//!
//! The function is continuous at both zone boundaries as long as the content
//! is at least as tall as the header.

use sticky_core::{Point, Size};

/// Inputs of one sticky layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StickyLayoutInput {
    pub header_size: Size,
    pub content_size: Size,
    /// Where the section's top edge sits in the scrollable absent scrolling.
    pub section_top: f32,
    pub scroll_offset: f32,
    /// Content starts at the header's top edge instead of below it.
    pub overlap_headers: bool,
}

/// Result of a sticky layout pass for one section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeaderChildLayout {
    pub header_size: Size,
    pub content_size: Size,
    pub section_top: f32,
    /// Header position relative to the viewport's top edge.
    pub header_paint_offset: Point,
    /// Header position relative to the section origin.
    pub header_offset: Point,
    /// Content position relative to the section origin.
    pub content_offset: Point,
    /// Extent the section reports to its parent.
    pub section_size: Size,
    pub stuck_amount: f32,
}

impl HeaderChildLayout {
    /// True while the header is pinned (stuck or being pushed off).
    pub fn is_stuck(&self) -> bool {
        self.stuck_amount <= 0.0
    }
}

/// Stuck amount and header viewport position for a section whose natural top
/// edge is `local_top` below the viewport top.
///
/// Returns `(stuck_amount, header_viewport_y)`.
pub fn stuck_amount(header_height: f32, content_height: f32, local_top: f32) -> (f32, f32) {
    if local_top >= 0.0 {
        let amount = if header_height > 0.0 {
            (local_top / header_height).clamp(0.0, 1.0)
        } else if local_top > 0.0 {
            1.0
        } else {
            0.0
        };
        return (amount, local_top);
    }

    let consumed = -local_top;
    let threshold = content_height - header_height;
    if consumed < threshold {
        return (0.0, 0.0);
    }

    let displacement = consumed - threshold;
    if displacement <= 0.0 || header_height <= 0.0 {
        return (0.0, -displacement.max(0.0));
    }
    let amount = (-displacement / header_height).clamp(-1.0, 0.0);
    (amount, -displacement)
}

/// Computes header and content placement for one section.
pub fn compute_sticky_layout(input: &StickyLayoutInput) -> HeaderChildLayout {
    let header = input.header_size;
    let content = input.content_size;
    let local_top = input.section_top - input.scroll_offset;

    let (stuck, header_viewport_y) = stuck_amount(header.height, content.height, local_top);

    let content_top = if input.overlap_headers {
        0.0
    } else {
        header.height
    };
    let section_height = if input.overlap_headers {
        content.height
    } else {
        content.height + header.height
    };

    HeaderChildLayout {
        header_size: header,
        content_size: content,
        section_top: input.section_top,
        header_paint_offset: Point::new(0.0, header_viewport_y),
        header_offset: Point::new(0.0, header_viewport_y - local_top),
        content_offset: Point::new(0.0, content_top),
        section_size: Size::new(header.width.max(content.width), section_height),
        stuck_amount: stuck,
    }
}
