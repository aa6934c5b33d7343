//! Browser event plumbing.
//!
//! [`WindowInput`] turns window-level mouse, touch, wheel and resize events
//! into [`InputEvent`]s. The `wire_*` helpers attach the click handlers that
//! talk to the [`Site`] directly. Every helper returns its listeners; dropping
//! them detaches the handlers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions, EventListenerPhase};
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, MouseEvent, PopStateEvent, TouchEvent, WheelEvent, Window};

use crate::carousel::ClickGuard;
use crate::config::CarouselConfig;
use crate::hover::{self, HoverText};
use crate::input::{InputEvent, InputHandler, InputSource, Propagation};
use crate::router::Page;
use crate::scheduler::Scheduler;
use crate::site::Site;

use super::dom;

const ACTIVE_LISTENER: EventListenerOptions = EventListenerOptions {
    phase: EventListenerPhase::Bubble,
    passive: false,
};

/// Window-wide pointer and wheel input.
pub struct WindowInput {
    handlers: Rc<RefCell<Vec<InputHandler>>>,
    _listeners: Vec<EventListener>,
}

impl WindowInput {
    pub fn install(window: &Window) -> Self {
        let handlers: Rc<RefCell<Vec<InputHandler>>> = Rc::default();
        let dispatch = {
            let handlers = Rc::clone(&handlers);
            move |input: InputEvent, event: &Event| {
                let subscribers = handlers.borrow().clone();
                let answer = subscribers
                    .iter()
                    .fold(Propagation::Continue, |acc, handler| acc.and(handler(&input)));
                if answer == Propagation::PreventDefault {
                    event.prevent_default();
                }
            }
        };
        let dispatch = Rc::new(dispatch);

        let mut listeners = Vec::new();
        let mut on = |name: &'static str, options: EventListenerOptions, map: fn(&Event) -> Option<InputEvent>| {
            let dispatch = Rc::clone(&dispatch);
            listeners.push(EventListener::new_with_options(window, name, options, move |event| {
                if let Some(input) = map(event) {
                    dispatch(input, event);
                }
            }));
        };

        on("mousedown", EventListenerOptions::default(), |e| {
            let e = e.dyn_ref::<MouseEvent>()?;
            Some(InputEvent::PointerDown {
                x: f64::from(e.client_x()),
                y: f64::from(e.client_y()),
            })
        });
        on("mousemove", EventListenerOptions::default(), |e| {
            let e = e.dyn_ref::<MouseEvent>()?;
            Some(InputEvent::PointerMove {
                x: f64::from(e.client_x()),
                y: f64::from(e.client_y()),
            })
        });
        on("mouseup", EventListenerOptions::default(), |_| Some(InputEvent::PointerUp));
        on("touchstart", EventListenerOptions::default(), |e| {
            first_touch(e).map(|(x, y)| InputEvent::PointerDown { x, y })
        });
        on("touchmove", EventListenerOptions::default(), |e| {
            first_touch(e).map(|(x, y)| InputEvent::PointerMove { x, y })
        });
        on("touchend", EventListenerOptions::default(), |_| Some(InputEvent::PointerUp));
        on("wheel", ACTIVE_LISTENER, |e| {
            let e = e.dyn_ref::<WheelEvent>()?;
            Some(InputEvent::Wheel {
                dx: e.delta_x(),
                dy: e.delta_y(),
            })
        });
        on("resize", EventListenerOptions::default(), |_| Some(InputEvent::Resize));

        Self {
            handlers,
            _listeners: listeners,
        }
    }
}

impl InputSource for WindowInput {
    fn subscribe(&self, handler: InputHandler) {
        self.handlers.borrow_mut().push(handler);
    }
}

fn first_touch(event: &Event) -> Option<(f64, f64)> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some((f64::from(touch.client_x()), f64::from(touch.client_y())))
}

fn mouse_position(event: &Event) -> Option<(f64, f64)> {
    let e = event.dyn_ref::<MouseEvent>()?;
    Some((f64::from(e.client_x()), f64::from(e.client_y())))
}

/// Click-vs-drag detection on the carousel images. A short, still click
/// opens the project named by the image's `data-project-id`.
pub fn wire_track_images(
    track: &HtmlElement,
    site: &Rc<Site>,
    scheduler: Rc<dyn Scheduler>,
    config: CarouselConfig,
) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    for image in dom::query_all(track, ".image") {
        let Some(id) = image.get_attribute("data-project-id") else {
            continue;
        };
        let guard: Rc<Cell<Option<ClickGuard>>> = Rc::default();

        {
            let guard = Rc::clone(&guard);
            let scheduler = Rc::clone(&scheduler);
            listeners.push(EventListener::new(&image, "mousedown", move |event| {
                if let Some((x, y)) = mouse_position(event) {
                    guard.set(Some(ClickGuard::down(scheduler.now_ms(), x, y)));
                }
            }));
        }

        let site = Rc::clone(site);
        let scheduler = Rc::clone(&scheduler);
        listeners.push(EventListener::new(&image, "click", move |event| {
            let Some(down) = guard.take() else {
                return;
            };
            let Some((x, y)) = mouse_position(event) else {
                return;
            };
            if down.is_click(scheduler.now_ms(), x, y, &config) {
                event.stop_propagation();
                site.open_project(&id);
            }
        }));
    }
    listeners
}

pub fn wire_nav_links(document: &Document, site: &Rc<Site>) -> Vec<EventListener> {
    dom::query_document(document, ".nav-link")
        .into_iter()
        .filter_map(|link| {
            let key = link.get_attribute("data-page")?;
            let Some(page) = Page::from_key(&key) else {
                log::warn!("nav link points at unknown page {key:?}");
                return None;
            };
            let site = Rc::clone(site);
            Some(EventListener::new_with_options(&link, "click", ACTIVE_LISTENER, move |event| {
                event.prevent_default();
                site.navigate(page);
            }))
        })
        .collect()
}

pub fn wire_back_button(document: &Document, site: &Rc<Site>) -> Option<EventListener> {
    let button = dom::optional_by_id(document, "back-button")?;
    let site = Rc::clone(site);
    Some(EventListener::new(&button, "click", move |_| site.back()))
}

pub fn wire_popstate(window: &Window, site: &Rc<Site>) -> EventListener {
    let site = Rc::clone(site);
    EventListener::new(window, "popstate", move |event| {
        let id = event
            .dyn_ref::<PopStateEvent>()
            .and_then(|e| dom::project_id_from_state(&e.state()));
        site.pop_state(id.as_deref());
    })
}

/// Caption crossfade on `.icon-link[data-icon]`, and click suppression for
/// the disabled icons.
pub fn wire_icon_links(document: &Document, hover: &HoverText, disabled: &[String]) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    for link in dom::query_document(document, ".icon-link") {
        let Some(icon) = link.get_attribute("data-icon") else {
            continue;
        };
        {
            let hover = hover.clone();
            let icon = icon.clone();
            listeners.push(EventListener::new(&link, "mouseenter", move |_| hover.enter(&icon)));
        }
        {
            let hover = hover.clone();
            listeners.push(EventListener::new(&link, "mouseleave", move |_| hover.leave()));
        }
        if hover::is_disabled(disabled, &icon) {
            listeners.push(EventListener::new_with_options(&link, "click", ACTIVE_LISTENER, |event| {
                event.prevent_default();
            }));
        }
    }
    listeners
}
