//! Browser-backed [`Scheduler`]: animation frames and timers through gloo.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo_render::{AnimationFrame, request_animation_frame};
use gloo_timers::callback::{Interval, Timeout};
use web_sys::Performance;

use crate::scheduler::{Scheduler, TaskId};

/// Live handles; dropping one cancels the underlying browser callback.
enum Handle {
    Frame(AnimationFrame),
    Timeout(Timeout),
    Interval(Interval),
}

#[derive(Default)]
struct Inner {
    next_id: TaskId,
    handles: HashMap<TaskId, Handle>,
}

/// [`Scheduler`] over `requestAnimationFrame`, `setTimeout` and `setInterval`.
#[derive(Clone)]
pub struct BrowserScheduler {
    inner: Rc<RefCell<Inner>>,
    performance: Option<Performance>,
}

impl BrowserScheduler {
    pub fn new(window: &web_sys::Window) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner::default())),
            performance: window.performance(),
        }
    }

    fn issue(&self) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        inner.next_id
    }

    fn keep(&self, id: TaskId, handle: Handle) {
        self.inner.borrow_mut().handles.insert(id, handle);
    }
}

/// Forget a one-shot handle once it has fired.
fn retire(inner: &Weak<RefCell<Inner>>, id: TaskId) -> Option<Handle> {
    inner.upgrade().and_then(|inner| inner.borrow_mut().handles.remove(&id))
}

impl Scheduler for BrowserScheduler {
    fn now_ms(&self) -> f64 {
        match &self.performance {
            Some(performance) => performance.now(),
            None => js_sys::Date::now(),
        }
    }

    fn request_frame(&self, task: Box<dyn FnOnce()>) -> TaskId {
        let id = self.issue();
        let weak = Rc::downgrade(&self.inner);
        let frame = request_animation_frame(move |_timestamp| {
            let fired = retire(&weak, id);
            task();
            drop(fired);
        });
        self.keep(id, Handle::Frame(frame));
        id
    }

    fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskId {
        let id = self.issue();
        let weak = Rc::downgrade(&self.inner);
        let timeout = Timeout::new(delay_ms, move || {
            let fired = retire(&weak, id);
            task();
            drop(fired);
        });
        self.keep(id, Handle::Timeout(timeout));
        id
    }

    fn set_interval(&self, period_ms: u32, mut task: Box<dyn FnMut()>) -> TaskId {
        let id = self.issue();
        let interval = Interval::new(period_ms, move || task());
        self.keep(id, Handle::Interval(interval));
        id
    }

    fn cancel(&self, id: TaskId) {
        let handle = self.inner.borrow_mut().handles.remove(&id);
        if let Some(handle) = handle {
            match handle {
                Handle::Frame(frame) => drop(frame),
                Handle::Timeout(timeout) => drop(timeout.cancel()),
                Handle::Interval(interval) => drop(interval.cancel()),
            }
        }
    }
}
