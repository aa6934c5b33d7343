//! Caption crossfade for the icon links on the about page.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::HoverConfig;
use crate::scheduler::{Scheduler, TaskId};

pub trait CaptionView {
    fn fade_out(&self);
    /// Replace the caption text and fade it in.
    fn show_text(&self, text: &str);
}

struct HoverInner {
    scheduler: Rc<dyn Scheduler>,
    config: HoverConfig,
    view: Rc<dyn CaptionView>,
    pending: Cell<Option<TaskId>>,
}

#[derive(Clone)]
pub struct HoverText {
    inner: Rc<HoverInner>,
}

impl HoverText {
    pub fn new(scheduler: Rc<dyn Scheduler>, config: HoverConfig, view: Rc<dyn CaptionView>) -> Self {
        Self {
            inner: Rc::new(HoverInner {
                scheduler,
                config,
                view,
                pending: Cell::new(None),
            }),
        }
    }

    pub fn enter(&self, text: &str) {
        self.cancel_pending();
        self.inner.view.fade_out();

        let weak = Rc::downgrade(&self.inner);
        let text = text.to_string();
        let id = self.inner.scheduler.set_timeout(
            self.inner.config.swap_delay_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.pending.set(None);
                    inner.view.show_text(&text);
                }
            }),
        );
        self.inner.pending.set(Some(id));
    }

    pub fn leave(&self) {
        self.cancel_pending();
        self.inner.view.fade_out();
    }

    fn cancel_pending(&self) {
        if let Some(id) = self.inner.pending.take() {
            self.inner.scheduler.cancel(id);
        }
    }
}

/// Whether clicks on the icon named `icon` must be swallowed.
pub fn is_disabled(disabled: &[String], icon: &str) -> bool {
    disabled.iter().any(|d| d == icon)
}
