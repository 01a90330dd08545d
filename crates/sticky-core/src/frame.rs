//! Post-frame task queue.
//!
//! Work that must not run inside the current layout or paint pass (for
//! example a header rebuild triggered by a new stuck amount) is posted here.
//! The host drains the queue once after the pass finishes and before the next
//! one starts.

use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

type FrameTask = Box<dyn FnOnce()>;

/// Handle to a posted task, usable for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameCallbackId(u64);

#[derive(Default)]
struct FrameQueueInner {
    tasks: SmallVec<[(FrameCallbackId, FrameTask); 4]>,
    next_id: u64,
    draining: bool,
}

/// Single-shot post-frame task queue shared by everything in one window.
#[derive(Clone, Default)]
pub struct FrameCallbackQueue {
    inner: Rc<RefCell<FrameQueueInner>>,
}

impl FrameCallbackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` to run once at the next frame boundary.
    pub fn post(&self, task: impl FnOnce() + 'static) -> FrameCallbackId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = FrameCallbackId(inner.next_id);
        inner.tasks.push((id, Box::new(task)));
        id
    }

    /// Drops a pending task. Returns false if it already ran or was never posted.
    pub fn cancel(&self, id: FrameCallbackId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.tasks.len();
        inner.tasks.retain(|(task_id, _)| *task_id != id);
        inner.tasks.len() != before
    }

    pub fn pending_len(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().tasks.is_empty()
    }

    /// Runs every task that was pending when the drain started.
    ///
    /// Tasks posted while draining stay queued for the following frame, so a
    /// task can never re-enter the pass that is currently finishing.
    pub fn run_post_frame(&self) -> usize {
        let batch = {
            let mut inner = self.inner.borrow_mut();
            if inner.draining {
                log::warn!("FrameCallbackQueue: nested drain ignored");
                return 0;
            }
            inner.draining = true;
            std::mem::take(&mut inner.tasks)
        };
        let count = batch.len();
        for (_, task) in batch {
            task();
        }
        self.inner.borrow_mut().draining = false;
        if count > 0 {
            log::trace!("FrameCallbackQueue: ran {} post-frame task(s)", count);
        }
        count
    }
}

impl std::fmt::Debug for FrameCallbackQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCallbackQueue")
            .field("pending", &self.pending_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn tasks_run_once() {
        let queue = FrameCallbackQueue::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        queue.post(move || counter.set(counter.get() + 1));

        assert_eq!(queue.run_post_frame(), 1);
        assert_eq!(queue.run_post_frame(), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn tasks_posted_while_draining_wait_for_next_frame() {
        let queue = FrameCallbackQueue::new();
        let hits = Rc::new(Cell::new(0));
        let nested_queue = queue.clone();
        let counter = hits.clone();
        queue.post(move || {
            let counter = counter.clone();
            nested_queue.post(move || counter.set(counter.get() + 1));
        });

        queue.run_post_frame();
        assert_eq!(hits.get(), 0);
        assert_eq!(queue.pending_len(), 1);

        queue.run_post_frame();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn cancelled_task_never_runs() {
        let queue = FrameCallbackQueue::new();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let id = queue.post(move || counter.set(1));

        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        queue.run_post_frame();
        assert_eq!(hits.get(), 0);
    }
}
