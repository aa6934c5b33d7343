//! Loading screen: a linear progress ramp over a fixed duration, then a short
//! pause before the content is revealed.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::LoadingConfig;
use crate::scheduler::Scheduler;

/// Percentage complete after `elapsed_ms`.
pub fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 100.0;
    }
    (elapsed_ms / duration_ms * 100.0).clamp(0.0, 100.0)
}

pub fn label(percent: f64) -> String {
    format!("{}%", percent.floor() as u32)
}

pub trait LoadingView {
    /// Update the percentage text and bar width.
    fn show_progress(&self, percent: f64);
    /// Hide the loading screen and mark the body loaded.
    fn reveal(&self);
}

struct LoadingInner {
    scheduler: Rc<dyn Scheduler>,
    config: LoadingConfig,
    view: Rc<dyn LoadingView>,
    started_at: Cell<f64>,
    revealed: Cell<bool>,
}

pub struct LoadingSequencer {
    inner: Rc<LoadingInner>,
}

impl LoadingSequencer {
    pub fn new(scheduler: Rc<dyn Scheduler>, config: LoadingConfig, view: Rc<dyn LoadingView>) -> Self {
        Self {
            inner: Rc::new(LoadingInner {
                scheduler,
                config,
                view,
                started_at: Cell::new(0.0),
                revealed: Cell::new(false),
            }),
        }
    }

    pub fn start(&self) {
        self.inner.started_at.set(self.inner.scheduler.now_ms());
        request_tick(&self.inner);
    }

    pub fn is_revealed(&self) -> bool {
        self.inner.revealed.get()
    }
}

fn request_tick(inner: &Rc<LoadingInner>) {
    let weak = Rc::downgrade(inner);
    inner.scheduler.request_frame(Box::new(move || {
        if let Some(inner) = weak.upgrade() {
            tick(&inner);
        }
    }));
}

fn tick(inner: &Rc<LoadingInner>) {
    let elapsed = inner.scheduler.now_ms() - inner.started_at.get();
    let percent = progress(elapsed, inner.config.duration_ms);
    inner.view.show_progress(percent);
    if percent < 100.0 {
        request_tick(inner);
        return;
    }
    let weak = Rc::downgrade(inner);
    inner.scheduler.set_timeout(
        inner.config.reveal_delay_ms,
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.view.reveal();
                inner.revealed.set(true);
                log::info!("content revealed");
            }
        }),
    );
}
