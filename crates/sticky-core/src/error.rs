use crate::{ChildRole, Size};

/// Errors raised by sticky sections.
///
/// Configuration errors surface at construction. Size errors surface from
/// `measure` and indicate a broken child measurement contract in the host.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StickyError {
    /// No enclosing scrollable was found and no explicit source was supplied.
    #[error("sticky header has no scroll offset source: attach it inside a scrollable or pass one explicitly")]
    MissingScrollSource,

    /// Exactly one of the header builder and the fixed header must be supplied.
    #[error("expandable header needs exactly one of a header builder or fixed header content (builder: {builder}, fixed: {fixed})")]
    InvalidHeaderConfiguration { builder: bool, fixed: bool },

    /// A child reported a negative or NaN size from measurement.
    #[error("{role} child reported an invalid size {size:?}")]
    InvalidChildSize { role: ChildRole, size: Size },
}

pub type StickyResult<T> = Result<T, StickyError>;
