//! Section stacking for a scrollable column of sticky sections.
//!
//! Sticky sections do not know where they sit in the scrollable; the parent
//! stacks them and hands each its top offset. This module holds that math so
//! hosts and the built-in section column share one implementation.

use std::ops::Range;

/// Placement of one section along the scroll axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionPlacement {
    pub index: usize,
    pub top: f32,
    pub extent: f32,
}

impl SectionPlacement {
    pub fn bottom(&self) -> f32 {
        self.top + self.extent
    }
}

/// Result of stacking sections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectionStack {
    pub placements: Vec<SectionPlacement>,
    /// Total content extent including padding.
    pub total_extent: f32,
}

/// Stacks sections top to bottom.
///
/// # Arguments
/// * `extents` - Measured main-axis extent of each section, in order
/// * `spacing` - Gap between consecutive sections
/// * `before_padding` - Content padding before the first section
pub fn stack_sections<I>(extents: I, spacing: f32, before_padding: f32) -> SectionStack
where
    I: IntoIterator<Item = f32>,
{
    let mut placements = Vec::new();
    let mut cursor = before_padding;
    for (index, extent) in extents.into_iter().enumerate() {
        if index > 0 {
            cursor += spacing;
        }
        placements.push(SectionPlacement {
            index,
            top: cursor,
            extent,
        });
        cursor += extent;
    }
    SectionStack {
        placements,
        total_extent: cursor,
    }
}

impl SectionStack {
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Largest valid scroll offset for a viewport of `viewport_size`.
    pub fn max_scroll(&self, viewport_size: f32) -> f32 {
        (self.total_extent - viewport_size).max(0.0)
    }

    /// Indices of sections intersecting `[scroll_offset, scroll_offset + viewport_size)`.
    pub fn visible_range(&self, scroll_offset: f32, viewport_size: f32) -> Range<usize> {
        let viewport_end = scroll_offset + viewport_size;
        let start = self
            .placements
            .iter()
            .position(|p| p.bottom() > scroll_offset)
            .unwrap_or(self.placements.len());
        let end = self.placements[start..]
            .iter()
            .position(|p| p.top >= viewport_end)
            .map(|offset| start + offset)
            .unwrap_or(self.placements.len());
        start..end
    }
}
