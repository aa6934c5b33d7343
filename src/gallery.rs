//! Image rotator on the project detail page.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::scheduler::{Scheduler, TaskId};

/// Circular image index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GalleryState {
    index: usize,
    len: usize,
}

impl GalleryState {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Move by `step` images, wrapping in both directions.
    pub fn step(&mut self, step: isize) -> usize {
        if self.len > 0 {
            let len = self.len as isize;
            self.index = (self.index as isize + step).rem_euclid(len) as usize;
        }
        self.index
    }

    /// Jump to `index`; out-of-range wraps to the first image.
    pub fn select(&mut self, index: usize) -> usize {
        self.index = if index < self.len { index } else { 0 };
        self.index
    }
}

/// DOM side of the gallery: mark exactly one image and one dot active.
pub trait GalleryView {
    fn show_image(&self, index: usize);
}

struct GalleryInner {
    scheduler: Rc<dyn Scheduler>,
    interval_ms: u32,
    state: Cell<GalleryState>,
    view: RefCell<Option<Rc<dyn GalleryView>>>,
    timer: Cell<Option<TaskId>>,
}

/// Auto-advancing gallery. One repeating timer at most; manual navigation
/// restarts it so the next automatic step is a full interval away.
#[derive(Clone)]
pub struct Gallery {
    inner: Rc<GalleryInner>,
}

impl Gallery {
    pub fn new(scheduler: Rc<dyn Scheduler>, interval_ms: u32) -> Self {
        Self {
            inner: Rc::new(GalleryInner {
                scheduler,
                interval_ms,
                state: Cell::new(GalleryState::default()),
                view: RefCell::new(None),
                timer: Cell::new(None),
            }),
        }
    }

    /// Begin rotating `len` images. Any previous rotation is stopped first.
    pub fn start(&self, len: usize, view: Rc<dyn GalleryView>) {
        self.stop();
        self.inner.state.set(GalleryState::new(len));
        *self.inner.view.borrow_mut() = Some(view);
        if len > 1 {
            start_auto(&self.inner);
        }
        log::debug!("gallery started with {len} images");
    }

    pub fn stop(&self) {
        if let Some(id) = self.inner.timer.take() {
            self.inner.scheduler.cancel(id);
            log::debug!("gallery auto-advance stopped");
        }
        self.inner.view.borrow_mut().take();
    }

    pub fn next(&self) {
        self.navigate(|s| s.step(1));
    }

    pub fn prev(&self) {
        self.navigate(|s| s.step(-1));
    }

    pub fn select(&self, index: usize) {
        self.navigate(|s| s.select(index));
    }

    pub fn current(&self) -> usize {
        self.inner.state.get().index()
    }

    pub fn is_running(&self) -> bool {
        self.inner.timer.get().is_some()
    }

    fn navigate(&self, mv: impl FnOnce(&mut GalleryState) -> usize) {
        if self.inner.view.borrow().is_none() {
            return;
        }
        advance(&self.inner, mv);
        if let Some(id) = self.inner.timer.take() {
            self.inner.scheduler.cancel(id);
        }
        if self.inner.state.get().len() > 1 {
            start_auto(&self.inner);
        }
    }
}

fn advance(inner: &GalleryInner, mv: impl FnOnce(&mut GalleryState) -> usize) {
    let mut state = inner.state.get();
    let index = mv(&mut state);
    inner.state.set(state);
    let view = inner.view.borrow().clone();
    if let Some(view) = view {
        view.show_image(index);
    }
}

fn start_auto(inner: &Rc<GalleryInner>) {
    let weak: Weak<GalleryInner> = Rc::downgrade(inner);
    let id = inner.scheduler.set_interval(
        inner.interval_ms,
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                advance(&inner, |s| s.step(1));
            }
        }),
    );
    inner.timer.set(Some(id));
}
