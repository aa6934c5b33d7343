//! Top-level coordinator: the catalog plus every controller that reacts to
//! it. The web layer owns one `Site` and forwards clicks, history events and
//! the loaded catalog to it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::carousel::{CarouselController, TrackView};
use crate::config::SiteConfig;
use crate::detail::DetailView;
use crate::gallery::{Gallery, GalleryView};
use crate::project::Catalog;
use crate::router::{Page, PageView, Router};
use crate::scheduler::Scheduler;

/// Where the detail page is drawn.
pub trait DetailSurface {
    /// Replace the detail page content and return a view over its gallery.
    fn render_detail(&self, view: &DetailView) -> Rc<dyn GalleryView>;
    /// Toggle `project-detail-active` on the body.
    fn set_detail_mode(&self, active: bool);
}

/// Browser history, as far as the detail pseudo-route needs it.
pub trait HistoryPort {
    /// Push `{projectId}` with the URL fragment `#id`.
    fn push_project(&self, id: &str);
    /// Push an empty state at the bare pathname.
    fn push_root(&self);
}

pub struct SiteViews {
    pub track: Rc<dyn TrackView>,
    pub pages: Rc<dyn PageView>,
    pub detail: Rc<dyn DetailSurface>,
    pub history: Rc<dyn HistoryPort>,
}

pub struct Site {
    catalog: RefCell<Catalog>,
    carousel: CarouselController,
    router: Router,
    gallery: Gallery,
    detail: Rc<dyn DetailSurface>,
    history: Rc<dyn HistoryPort>,
}

impl Site {
    pub fn new(scheduler: Rc<dyn Scheduler>, config: &SiteConfig, views: SiteViews) -> Self {
        Self {
            catalog: RefCell::new(Catalog::default()),
            carousel: CarouselController::new(Rc::clone(&scheduler), config.carousel, views.track),
            router: Router::new(Rc::clone(&scheduler), config.router, views.pages, Page::Projects),
            gallery: Gallery::new(scheduler, config.gallery.interval_ms),
            detail: views.detail,
            history: views.history,
        }
    }

    pub fn load_catalog(&self, catalog: Catalog) {
        let count = catalog.len();
        *self.catalog.borrow_mut() = catalog;
        self.carousel.load(count);
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog.borrow().len()
    }

    /// Project id at carousel position `index`.
    pub fn project_id_at(&self, index: usize) -> Option<String> {
        self.catalog.borrow().projects().get(index).map(|p| p.id.clone())
    }

    /// Open a project and record it in history.
    pub fn open_project(&self, id: &str) -> bool {
        self.show_project(id, true)
    }

    /// Back button: leave the detail page and record it in history.
    pub fn back(&self) {
        if self.router.active() == Page::ProjectDetail {
            self.leave_detail(true);
        }
    }

    /// Browser back/forward. Never pushes history of its own.
    pub fn pop_state(&self, project_id: Option<&str>) {
        match project_id {
            Some(id) => {
                self.show_project(id, false);
            }
            None if self.router.active() == Page::ProjectDetail => self.leave_detail(false),
            None => {}
        }
    }

    /// Nav link click.
    pub fn navigate(&self, page: Page) -> bool {
        if page == self.router.active() {
            return false;
        }
        if self.router.active() == Page::ProjectDetail {
            self.exit_detail_mode();
        }
        self.router.navigate(page)
    }

    pub fn carousel(&self) -> &CarouselController {
        &self.carousel
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    fn show_project(&self, id: &str, push: bool) -> bool {
        let view = {
            let catalog = self.catalog.borrow();
            let Some(project) = catalog.find(id) else {
                log::warn!("unknown project id: {id}");
                return false;
            };
            DetailView::from_project(project)
        };

        let gallery_view = self.detail.render_detail(&view);
        self.gallery.start(view.images.len(), gallery_view);
        self.router.navigate(Page::ProjectDetail);
        self.detail.set_detail_mode(true);
        self.carousel.set_detail_mode(true);
        if push {
            self.history.push_project(id);
        }
        log::info!("opened project {id}");
        true
    }

    fn leave_detail(&self, push: bool) {
        self.exit_detail_mode();
        self.router.navigate(Page::Projects);
        if push {
            self.history.push_root();
        }
    }

    /// The gallery timer goes first, before any transition starts.
    fn exit_detail_mode(&self) {
        self.gallery.stop();
        self.detail.set_detail_mode(false);
        self.carousel.set_detail_mode(false);
    }
}
