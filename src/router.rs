//! Page switching with a staggered fade.
//!
//! A transition marks every page `page-transitioning`, deactivates the
//! visible page at once, activates the destination a moment later (so the
//! fade-out has started before the fade-in), and finally clears the
//! transitioning flag once the CSS animation is done.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::RouterConfig;
use crate::scheduler::{Scheduler, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Projects,
    About,
    Contact,
    ProjectDetail,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Projects, Page::About, Page::Contact, Page::ProjectDetail];

    /// Value of the nav link's `data-page` attribute.
    pub fn key(self) -> &'static str {
        match self {
            Page::Projects => "projects",
            Page::About => "about",
            Page::Contact => "contact",
            Page::ProjectDetail => "project-detail",
        }
    }

    pub fn from_key(key: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.key() == key)
    }

    pub fn element_id(self) -> String {
        format!("{}-page", self.key())
    }

    /// The nav section a page belongs to; project detail lives under projects.
    pub fn section(self) -> Page {
        match self {
            Page::ProjectDetail => Page::Projects,
            page => page,
        }
    }
}

/// Class toggling on the page elements and nav links.
pub trait PageView {
    fn set_active(&self, page: Page, active: bool);
    /// Add or remove `page-transitioning` on every page.
    fn set_transitioning(&self, on: bool);
    /// Mark the nav link for `section` active and clear the others.
    fn highlight_nav(&self, section: Page);
}

struct RouterInner {
    scheduler: Rc<dyn Scheduler>,
    config: RouterConfig,
    view: Rc<dyn PageView>,
    /// Logical destination; updated as soon as a transition starts.
    active: Cell<Page>,
    /// Page currently carrying the `active` class, if any.
    shown: Cell<Option<Page>>,
    fade_in: Cell<Option<TaskId>>,
    settle: Cell<Option<TaskId>>,
}

#[derive(Clone)]
pub struct Router {
    inner: Rc<RouterInner>,
}

impl Router {
    /// `initial` is the page the document starts with marked active.
    pub fn new(scheduler: Rc<dyn Scheduler>, config: RouterConfig, view: Rc<dyn PageView>, initial: Page) -> Self {
        Self {
            inner: Rc::new(RouterInner {
                scheduler,
                config,
                view,
                active: Cell::new(initial),
                shown: Cell::new(Some(initial)),
                fade_in: Cell::new(None),
                settle: Cell::new(None),
            }),
        }
    }

    pub fn active(&self) -> Page {
        self.inner.active.get()
    }

    pub fn is_transitioning(&self) -> bool {
        self.inner.fade_in.get().is_some() || self.inner.settle.get().is_some()
    }

    /// Start a transition to `to`. Returns `false`, touching nothing, when
    /// `to` is already the active page.
    pub fn navigate(&self, to: Page) -> bool {
        let inner = &self.inner;
        let from = inner.active.get();
        if from == to {
            return false;
        }
        log::debug!("page {} -> {}", from.key(), to.key());

        // A transition still in flight is superseded, never stacked.
        for slot in [&inner.fade_in, &inner.settle] {
            if let Some(id) = slot.take() {
                inner.scheduler.cancel(id);
            }
        }

        inner.view.highlight_nav(to.section());
        inner.view.set_transitioning(true);
        if let Some(shown) = inner.shown.take() {
            inner.view.set_active(shown, false);
        }
        inner.active.set(to);

        let weak = Rc::downgrade(inner);
        let id = inner.scheduler.set_timeout(
            inner.config.fade_in_delay_ms,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else { return };
                inner.fade_in.set(None);
                inner.view.set_active(to, true);
                inner.shown.set(Some(to));

                let weak = Rc::downgrade(&inner);
                let id = inner.scheduler.set_timeout(
                    inner.config.transition_ms,
                    Box::new(move || {
                        if let Some(inner) = weak.upgrade() {
                            inner.settle.set(None);
                            inner.view.set_transitioning(false);
                        }
                    }),
                );
                inner.settle.set(Some(id));
            }),
        );
        inner.fade_in.set(Some(id));
        true
    }
}
