//! DOM implementations of the controller view traits.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Window};

use crate::carousel::{self, TrackView};
use crate::detail::DetailView;
use crate::error::{Result, SiteError};
use crate::gallery::{Gallery, GalleryView};
use crate::hover::CaptionView;
use crate::loading::{self, LoadingView};
use crate::odometer;
use crate::router::{Page, PageView};
use crate::site::{DetailSurface, HistoryPort};

pub const ACTIVE: &str = "active";
pub const TRANSITIONING: &str = "page-transitioning";
pub const DETAIL_ACTIVE: &str = "project-detail-active";

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| SiteError::Dom("window".into()))
}

pub fn document(window: &Window) -> Result<Document> {
    window.document().ok_or_else(|| SiteError::Dom("document".into()))
}

pub fn body(document: &Document) -> Result<HtmlElement> {
    document.body().ok_or_else(|| SiteError::Dom("body".into()))
}

pub fn by_id(document: &Document, id: &str) -> Result<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| SiteError::Dom(id.to_string()))
}

/// Like [`by_id`], but a missing element is only worth a warning.
pub fn optional_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    let found = by_id(document, id).ok();
    if found.is_none() {
        log::warn!("optional element #{id} not found");
    }
    found
}

pub fn query_all(root: &Element, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = root.query_selector_all(selector) else {
        log::warn!("bad selector: {selector}");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn query_document(document: &Document, selector: &str) -> Vec<HtmlElement> {
    match document.document_element() {
        Some(root) => query_all(&root, selector),
        None => Vec::new(),
    }
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    if let Err(e) = el.class_list().toggle_with_force(class, on) {
        log::warn!("class toggle {class} failed: {}", js_err_text(&e));
    }
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = el.style().set_property(property, value) {
        log::warn!("style {property} failed: {}", js_err_text(&e));
    }
}

pub fn js_err_text(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

// --------------------------- carousel track ---------------------------

pub struct DomTrack {
    window: Window,
    track: HtmlElement,
    current_number: HtmlElement,
    total_number: HtmlElement,
}

impl DomTrack {
    pub fn find(window: &Window, document: &Document) -> Result<Self> {
        Ok(Self {
            window: window.clone(),
            track: by_id(document, "image-track")?,
            current_number: by_id(document, "current-number")?,
            total_number: by_id(document, "total-number")?,
        })
    }

    pub fn element(&self) -> &HtmlElement {
        &self.track
    }

    fn images(&self) -> Vec<HtmlElement> {
        query_all(&self.track, ".image")
    }
}

impl TrackView for DomTrack {
    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }

    fn image_centers(&self) -> Vec<f64> {
        self.images()
            .iter()
            .map(|img| {
                let rect = img.get_bounding_client_rect();
                rect.left() + rect.width() / 2.0
            })
            .collect()
    }

    fn apply_position(&self, percentage: f64) {
        set_style(&self.track, "transform", &carousel::track_transform(percentage));
        let position = carousel::image_object_position(percentage);
        for image in self.images() {
            set_style(&image, "object-position", &position);
        }
    }

    fn reset_counter(&self, total: usize, number: usize) {
        self.current_number
            .set_inner_html(&odometer::current_markup(total, number).into_string());
        self.total_number
            .set_inner_html(&odometer::total_markup(total).into_string());
    }

    fn roll_counter(&self, number: usize) {
        let wrapper = self
            .current_number
            .query_selector(".digit-wrapper")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(wrapper) = wrapper {
            set_style(&wrapper, "transition", odometer::TRANSITION);
            set_style(&wrapper, "transform", &odometer::transform(number));
        }
    }
}

// ------------------------------- pages --------------------------------

pub struct DomPages {
    pages: Vec<(Page, HtmlElement)>,
    nav_links: Vec<HtmlElement>,
}

impl DomPages {
    pub fn find(document: &Document) -> Result<Self> {
        let pages = Page::ALL
            .into_iter()
            .map(|page| Ok((page, by_id(document, &page.element_id())?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            pages,
            nav_links: query_document(document, ".nav-link"),
        })
    }
}

impl PageView for DomPages {
    fn set_active(&self, page: Page, active: bool) {
        for (p, el) in &self.pages {
            if *p == page {
                set_class(el, ACTIVE, active);
            }
        }
    }

    fn set_transitioning(&self, on: bool) {
        for (_, el) in &self.pages {
            set_class(el, TRANSITIONING, on);
        }
    }

    fn highlight_nav(&self, section: Page) {
        for link in &self.nav_links {
            let matches = link.get_attribute("data-page").as_deref() == Some(section.key());
            set_class(link, ACTIVE, matches);
        }
    }
}

// --------------------------- project detail ---------------------------

struct DomGallery {
    images: Vec<HtmlElement>,
    dots: Vec<HtmlElement>,
}

impl GalleryView for DomGallery {
    fn show_image(&self, index: usize) {
        for (i, img) in self.images.iter().enumerate() {
            set_class(img, ACTIVE, i == index);
        }
        for (i, dot) in self.dots.iter().enumerate() {
            set_class(dot, ACTIVE, i == index);
        }
    }
}

pub struct DomDetail {
    body: HtmlElement,
    container: HtmlElement,
    gallery: RefCell<Option<Gallery>>,
    /// Listeners on the current detail's controls; replaced on every render.
    controls: RefCell<Vec<EventListener>>,
}

impl DomDetail {
    pub fn find(document: &Document) -> Result<Self> {
        Ok(Self {
            body: body(document)?,
            container: by_id(document, "project-container")?,
            gallery: RefCell::new(None),
            controls: RefCell::new(Vec::new()),
        })
    }

    /// The gallery the prev/next/dot controls drive.
    pub fn bind_gallery(&self, gallery: Gallery) {
        *self.gallery.borrow_mut() = Some(gallery);
    }

    fn wire_controls(&self, dots: &[HtmlElement]) -> Vec<EventListener> {
        let Some(gallery) = self.gallery.borrow().clone() else {
            log::warn!("detail rendered before a gallery was bound");
            return Vec::new();
        };
        let mut listeners = Vec::new();
        for btn in query_all(&self.container, ".carousel-prev") {
            let gallery = gallery.clone();
            listeners.push(EventListener::new(&btn, "click", move |_| gallery.prev()));
        }
        for btn in query_all(&self.container, ".carousel-next") {
            let gallery = gallery.clone();
            listeners.push(EventListener::new(&btn, "click", move |_| gallery.next()));
        }
        for (index, dot) in dots.iter().enumerate() {
            let gallery = gallery.clone();
            listeners.push(EventListener::new(dot, "click", move |_| gallery.select(index)));
        }
        listeners
    }
}

impl DetailSurface for DomDetail {
    fn render_detail(&self, view: &DetailView) -> Rc<dyn GalleryView> {
        self.controls.borrow_mut().clear();
        self.container.set_inner_html(&view.render().into_string());

        let images = query_all(&self.container, ".project-image");
        let dots = query_all(&self.container, ".carousel-dot");
        let listeners = self.wire_controls(&dots);
        *self.controls.borrow_mut() = listeners;
        Rc::new(DomGallery { images, dots })
    }

    fn set_detail_mode(&self, active: bool) {
        set_class(&self.body, DETAIL_ACTIVE, active);
    }
}

// ------------------------------ history -------------------------------

pub struct DomHistory {
    window: Window,
}

impl DomHistory {
    pub fn new(window: &Window) -> Self {
        Self {
            window: window.clone(),
        }
    }

    fn push(&self, state: &JsValue, url: &str) {
        let pushed = self
            .window
            .history()
            .and_then(|history| history.push_state_with_url(state, "", Some(url)));
        if let Err(e) = pushed {
            log::warn!("history push failed: {}", js_err_text(&e));
        }
    }
}

impl HistoryPort for DomHistory {
    fn push_project(&self, id: &str) {
        let state = js_sys::Object::new();
        if js_sys::Reflect::set(&state, &"projectId".into(), &id.into()).is_err() {
            log::warn!("could not build history state for {id}");
            return;
        }
        self.push(&state, &format!("#{id}"));
    }

    fn push_root(&self) {
        let path = self.window.location().pathname().unwrap_or_else(|_| "/".into());
        self.push(&JsValue::NULL, &path);
    }
}

/// `state.projectId` of a popstate event, if any.
pub fn project_id_from_state(state: &JsValue) -> Option<String> {
    if state.is_null() || state.is_undefined() {
        return None;
    }
    js_sys::Reflect::get(state, &"projectId".into())
        .ok()
        .and_then(|v| v.as_string())
        .filter(|id| !id.is_empty())
}

// ------------------------------ loading -------------------------------

pub struct DomLoading {
    body: HtmlElement,
    screen: HtmlElement,
    percentage: HtmlElement,
    bar: HtmlElement,
}

impl DomLoading {
    pub fn find(document: &Document) -> Result<Self> {
        Ok(Self {
            body: body(document)?,
            screen: by_id(document, "loading-screen")?,
            percentage: by_id(document, "loading-percentage")?,
            bar: by_id(document, "loading-bar")?,
        })
    }
}

impl LoadingView for DomLoading {
    fn show_progress(&self, percent: f64) {
        self.percentage.set_text_content(Some(&loading::label(percent)));
        set_style(&self.bar, "width", &format!("{percent}%"));
    }

    fn reveal(&self) {
        set_class(&self.screen, "hidden", true);
        set_class(&self.body, "loaded", true);
    }
}

// ------------------------------ caption -------------------------------

pub struct DomCaption {
    el: HtmlElement,
}

impl DomCaption {
    pub fn find(document: &Document) -> Option<Self> {
        optional_by_id(document, "hover-text").map(|el| Self { el })
    }
}

impl CaptionView for DomCaption {
    fn fade_out(&self) {
        set_class(&self.el, ACTIVE, false);
    }

    fn show_text(&self, text: &str) {
        self.el.set_text_content(Some(text));
        set_class(&self.el, ACTIVE, true);
    }
}
