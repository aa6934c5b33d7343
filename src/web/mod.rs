//! Browser bootstrap: finds the DOM, builds the controllers and wires events.

pub mod dom;
pub mod events;
pub mod fetch;
pub mod scheduler;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use gloo_events::EventListener;
use web_sys::{Document, Window};

use crate::carousel;
use crate::config::SiteConfig;
use crate::hover::HoverText;
use crate::loading::LoadingSequencer;
use crate::scheduler::Scheduler;
use crate::site::{Site, SiteViews};

use dom::{DomCaption, DomDetail, DomHistory, DomLoading, DomPages, DomTrack};
use events::WindowInput;
use scheduler::BrowserScheduler;

/// Everything that must outlive `boot`.
struct App {
    _site: Rc<Site>,
    _loading: LoadingSequencer,
    _input: WindowInput,
    _listeners: Vec<EventListener>,
    track_listeners: RefCell<Vec<EventListener>>,
}

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

/// Parse the optional `#site-config` JSON block. No block means defaults.
pub fn read_config(document: &Document) -> crate::Result<SiteConfig> {
    match document
        .get_element_by_id("site-config")
        .and_then(|el| el.text_content())
    {
        Some(text) => SiteConfig::from_json(&text),
        None => Ok(SiteConfig::default()),
    }
}

/// Start the site once the document is parsed.
pub fn boot(window: Window, document: Document, config: SiteConfig) -> anyhow::Result<()> {
    if document.ready_state() == "loading" {
        let target = document.clone();
        EventListener::once(&target, "DOMContentLoaded", move |_| {
            if let Err(e) = mount(&window, &document, config) {
                log::error!("boot failed: {e:#}");
            }
        })
        .forget();
        return Ok(());
    }
    mount(&window, &document, config)
}

fn mount(window: &Window, document: &Document, config: SiteConfig) -> anyhow::Result<()> {
    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler::new(window));

    let loading_view = DomLoading::find(document).context("loading screen")?;
    let loading = LoadingSequencer::new(Rc::clone(&scheduler), config.loading, Rc::new(loading_view));
    loading.start();

    let track = Rc::new(DomTrack::find(window, document).context("carousel track")?);
    let pages = Rc::new(DomPages::find(document).context("pages")?);
    let detail = Rc::new(DomDetail::find(document).context("project detail")?);
    let views = SiteViews {
        track: track.clone(),
        pages,
        detail: detail.clone(),
        history: Rc::new(DomHistory::new(window)),
    };
    let site = Rc::new(Site::new(Rc::clone(&scheduler), &config, views));
    detail.bind_gallery(site.gallery().clone());

    let input = WindowInput::install(window);
    site.carousel().attach(&input);

    let mut listeners = events::wire_nav_links(document, &site);
    listeners.extend(events::wire_back_button(document, &site));
    listeners.push(events::wire_popstate(window, &site));
    if let Some(caption) = DomCaption::find(document) {
        let hover = HoverText::new(Rc::clone(&scheduler), config.hover, Rc::new(caption));
        listeners.extend(events::wire_icon_links(document, &hover, &config.disabled_icons));
    }

    let app = Rc::new(App {
        _site: Rc::clone(&site),
        _loading: loading,
        _input: input,
        _listeners: listeners,
        track_listeners: RefCell::new(Vec::new()),
    });
    APP.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&app)));
    log::info!("site mounted, fetching {}", config.data_url);

    let url = config.data_url.clone();
    let carousel_config = config.carousel;
    wasm_bindgen_futures::spawn_local(async move {
        match fetch::fetch_catalog(&url).await {
            Ok(catalog) => {
                track
                    .element()
                    .set_inner_html(&carousel::track_markup(catalog.projects()).into_string());
                let wired = events::wire_track_images(track.element(), &site, scheduler, carousel_config);
                *app.track_listeners.borrow_mut() = wired;
                site.load_catalog(catalog);
            }
            Err(e) => log::error!("could not load projects from {url}: {e}"),
        }
    });
    Ok(())
}
