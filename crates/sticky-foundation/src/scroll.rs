//! Scroll offset sources.
//!
//! A [`ScrollOffsetSource`] is owned by the enclosing scrollable and shared
//! read-only by every sticky section inside it. [`ScrollState`] is the
//! concrete source used by section columns and by tests.

use indexmap::IndexMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

/// Listener invoked with the new scroll offset.
pub type ScrollListener = Rc<dyn Fn(f32)>;

/// Handle returned by [`ScrollOffsetSource::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScrollSubscriptionId(u64);

/// Read-only view of a viewport's scroll position along its main axis.
///
/// The offset grows as content moves toward negative visual positions.
pub trait ScrollOffsetSource {
    fn current_offset(&self) -> f32;

    fn subscribe(&self, listener: ScrollListener) -> ScrollSubscriptionId;

    fn unsubscribe(&self, id: ScrollSubscriptionId);
}

/// Internal state for ScrollState.
struct ScrollStateData {
    /// Current scroll position.
    value: f32,
    /// Maximum scroll value (content extent - viewport extent).
    max_value: f32,
    /// Size of the viewport along the main axis.
    viewport_size: f32,
    listeners: IndexMap<ScrollSubscriptionId, ScrollListener>,
    next_subscription: u64,
}

/// Scroll position of one viewport.
///
/// Cloning yields another handle to the same position.
#[derive(Clone)]
pub struct ScrollState {
    data: Rc<RefCell<ScrollStateData>>,
}

impl ScrollState {
    /// Creates a state at `initial` with no upper bound yet.
    pub fn new(initial: f32) -> Self {
        Self {
            data: Rc::new(RefCell::new(ScrollStateData {
                value: initial.max(0.0),
                max_value: f32::INFINITY,
                viewport_size: 0.0,
                listeners: IndexMap::new(),
                next_subscription: 1,
            })),
        }
    }

    pub fn value(&self) -> f32 {
        self.data.borrow().value
    }

    pub fn max_value(&self) -> f32 {
        self.data.borrow().max_value
    }

    pub fn viewport_size(&self) -> f32 {
        self.data.borrow().viewport_size
    }

    pub fn listener_count(&self) -> usize {
        self.data.borrow().listeners.len()
    }

    /// Sets the maximum scroll value (called by the scrollable during measurement).
    pub fn set_max_value(&self, max: f32) {
        let coerced = {
            let mut data = self.data.borrow_mut();
            data.max_value = max.max(0.0);
            if data.value > data.max_value {
                data.value = data.max_value;
                Some(data.value)
            } else {
                None
            }
        };
        if let Some(value) = coerced {
            self.notify(value);
        }
    }

    pub fn set_viewport_size(&self, size: f32) {
        self.data.borrow_mut().viewport_size = size;
    }

    /// Programmatically scrolls to `target`, clamped to `[0, max_value]`.
    pub fn scroll_to(&self, target: f32) {
        let changed = {
            let mut data = self.data.borrow_mut();
            let clamped = target.clamp(0.0, data.max_value);
            if clamped == data.value {
                None
            } else {
                data.value = clamped;
                Some(clamped)
            }
        };
        if let Some(value) = changed {
            self.notify(value);
        }
    }

    /// Consumes a drag delta and returns the part that moved the position.
    ///
    /// Positive deltas scroll forward.
    pub fn consume_scroll_delta(&self, delta: f32) -> f32 {
        let before = self.value();
        self.scroll_to(before + delta);
        self.value() - before
    }

    fn notify(&self, value: f32) {
        // Snapshot first: listeners may subscribe or unsubscribe while running.
        let listeners: SmallVec<[ScrollListener; 4]> =
            self.data.borrow().listeners.values().cloned().collect();
        log::trace!(
            "ScrollState: offset {} -> {} listener(s)",
            value,
            listeners.len()
        );
        for listener in listeners {
            listener(value);
        }
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ScrollOffsetSource for ScrollState {
    fn current_offset(&self) -> f32 {
        self.value()
    }

    fn subscribe(&self, listener: ScrollListener) -> ScrollSubscriptionId {
        let mut data = self.data.borrow_mut();
        let id = ScrollSubscriptionId(data.next_subscription);
        data.next_subscription += 1;
        data.listeners.insert(id, listener);
        id
    }

    fn unsubscribe(&self, id: ScrollSubscriptionId) {
        self.data.borrow_mut().listeners.shift_remove(&id);
    }
}

impl std::fmt::Debug for ScrollState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("ScrollState")
            .field("value", &data.value)
            .field("max_value", &data.max_value)
            .field("viewport_size", &data.viewport_size)
            .field("listeners", &data.listeners.len())
            .finish()
    }
}
