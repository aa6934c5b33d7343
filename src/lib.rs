//! # Folio UI
//!
//! Client-side runtime for a single-page portfolio site, compiled to
//! WebAssembly. The page ships static HTML and CSS; this crate drives the
//! loading screen, the draggable project carousel with its rolling counter,
//! fading page navigation and the project detail gallery.
//!
//! # Layout
//!
//! Every controller is browser-agnostic. It talks to a small view trait and
//! schedules work through [`scheduler::Scheduler`], so the same code runs
//! against the DOM in the browser and against recorders and a fake clock in
//! tests. Only [`web`] touches `web-sys`.
//!
//! | Module | Role |
//! |--------|------|
//! | [`project`] | Project records and the validated [`project::Catalog`] |
//! | [`carousel`] | Track arithmetic, drag/wheel/momentum controller, click guard |
//! | [`odometer`] | Rolling digit markup for the project counter |
//! | [`markdown`] | Markdown-lite renderer for project descriptions |
//! | [`detail`] | Project detail view model and markup |
//! | [`gallery`] | Auto-advancing image gallery on the detail page |
//! | [`router`] | Page switching with fade transitions |
//! | [`loading`] | Loading screen progress and reveal |
//! | [`hover`] | Caption crossfade for the icon links |
//! | [`site`] | Ties the controllers together around one catalog |
//! | [`input`] | Pointer/wheel/resize events independent of the browser |
//! | [`scheduler`] | Frame/timeout/interval abstraction and the manual test clock |
//! | [`config`] | Tuning constants, overridable from a JSON block in the page |
//! | [`error`] | [`SiteError`] |

pub mod carousel;
pub mod config;
pub mod detail;
pub mod error;
pub mod gallery;
pub mod hover;
pub mod input;
pub mod loading;
pub mod markdown;
pub mod odometer;
pub mod project;
pub mod router;
pub mod scheduler;
pub mod site;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{Result, SiteError};

// ── Web entry‑point ──
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
    let window = web::dom::window().map_err(to_js_err)?;
    let document = web::dom::document(&window).map_err(to_js_err)?;
    let config = web::read_config(&document);

    // The log level itself may come from the config block.
    let level = config
        .as_ref()
        .ok()
        .and_then(|c| c.level_filter().ok())
        .unwrap_or(log::LevelFilter::Info);
    if let Some(level) = level.to_level() {
        console_log::init_with_level(level).ok();
    }
    console_error_panic_hook::set_once();

    let config = config.unwrap_or_else(|e| {
        log::error!("ignoring #site-config: {e}");
        config::SiteConfig::default()
    });
    web::boot(window, document, config).map_err(|e| to_js_err(format!("{e:#}")))
}

#[cfg(target_arch = "wasm32")]
fn to_js_err<E: core::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}
