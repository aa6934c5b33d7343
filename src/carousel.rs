//! The main image track.
//!
//! The track position is a percentage in `[-100, 0]`: 0 shows the first image
//! at the viewport center, -100 the last. Dragging moves it 1:1, the wheel
//! moves a *target* the position eases toward, and a burst of wheel events
//! leaves momentum behind that decays by a constant friction per frame.
//!
//! [`TrackState`] is the pure arithmetic; [`CarouselController`] wires it to
//! a [`Scheduler`] and a [`TrackView`].

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use maud::{Markup, html};

use crate::config::CarouselConfig;
use crate::input::{InputEvent, InputSource, Propagation};
use crate::project::Project;
use crate::scheduler::{Scheduler, TaskId};

pub const MIN_PERCENTAGE: f64 = -100.0;
pub const MAX_PERCENTAGE: f64 = 0.0;

/// Wheel events further apart than this do not update velocity.
const VELOCITY_WINDOW_MS: f64 = 100.0;
/// Velocity is expressed per 60fps frame.
const VELOCITY_FRAME_MS: f64 = 16.0;

pub fn clamp_percentage(p: f64) -> f64 {
    if p.is_nan() {
        return MAX_PERCENTAGE;
    }
    p.clamp(MIN_PERCENTAGE, MAX_PERCENTAGE)
}

/// Track position that puts image `index` of `count` at the center.
pub fn percentage_for(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return MAX_PERCENTAGE;
    }
    clamp_percentage(-(index as f64 / (count - 1) as f64) * 100.0)
}

/// The image whose center is nearest `center`; ties go to the lowest index.
pub fn nearest_index(centers: &[f64], center: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, c) in centers.iter().enumerate() {
        let distance = (center - c).abs();
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// CSS transform for the track at `percentage`.
pub fn track_transform(percentage: f64) -> String {
    format!("translate3d({percentage}%, -50%, 0)")
}

/// `object-position` for every image; slides the picture inside its frame.
pub fn image_object_position(percentage: f64) -> String {
    format!("{}% center", 100.0 + percentage)
}

/// One `.image` per project, in catalog order.
pub fn track_markup(projects: &[Project]) -> Markup {
    html! {
        @for (index, project) in projects.iter().enumerate() {
            img.image src=(project.carousel_image) draggable="false"
                data-project-id=(project.id) data-project-index=(index)
                style="cursor: pointer;";
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    down_x: f64,
    start: f64,
}

/// Scroll position, easing target and momentum.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackState {
    current: f64,
    target: f64,
    velocity: f64,
    is_animating: bool,
    current_project_index: usize,
    last_wheel_ms: Option<f64>,
    drag: Option<DragAnchor>,
    /// Set for one image or none: there is nowhere to scroll to.
    pinned: bool,
}

impl TrackState {
    pub fn at(percentage: f64) -> Self {
        let p = clamp_percentage(percentage);
        Self {
            current: p,
            target: p,
            ..Self::default()
        }
    }

    /// Track for `count` images centered on `index`. With fewer than two
    /// images the track never leaves 0.
    pub fn for_count(count: usize, index: usize) -> Self {
        let mut state = Self::at(percentage_for(index, count));
        state.pinned = count <= 1;
        state.current_project_index = index;
        state
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn current_project_index(&self) -> usize {
        self.current_project_index
    }

    /// Start direct manipulation. Any easing or momentum stops here.
    pub fn pointer_down(&mut self, x: f64) {
        self.drag = Some(DragAnchor {
            down_x: x,
            start: self.current,
        });
        self.target = self.current;
        self.velocity = 0.0;
        self.is_animating = false;
    }

    /// Returns whether the position changed.
    pub fn pointer_move(&mut self, x: f64, viewport_width: f64) -> bool {
        let Some(anchor) = self.drag else {
            return false;
        };
        if viewport_width <= 0.0 {
            return false;
        }
        let delta = (anchor.down_x - x) / (viewport_width / 2.0) * -100.0;
        self.current = self.bound(anchor.start + delta);
        self.target = self.current;
        true
    }

    /// Returns whether a drag was in progress.
    pub fn pointer_up(&mut self) -> bool {
        if self.drag.take().is_none() {
            return false;
        }
        self.target = self.current;
        true
    }

    /// Move the target by one wheel event and refresh the velocity estimate.
    pub fn wheel(&mut self, dx: f64, dy: f64, now_ms: f64, viewport_width: f64, cfg: &CarouselConfig) {
        let delta = if dx != 0.0 { dx } else { dy };
        let delta_pct = if viewport_width > 0.0 {
            delta / viewport_width * 100.0 * cfg.wheel_sensitivity
        } else {
            0.0
        };

        if let Some(last) = self.last_wheel_ms {
            let elapsed = now_ms - last;
            if elapsed > 0.0 && elapsed < VELOCITY_WINDOW_MS {
                let v = -delta_pct / (elapsed / VELOCITY_FRAME_MS);
                self.velocity = v.clamp(-cfg.max_velocity, cfg.max_velocity);
            }
        }
        self.last_wheel_ms = Some(now_ms);
        self.target = self.bound(self.target - delta_pct);
        if self.pinned {
            self.velocity = 0.0;
        }
    }

    /// One easing frame. Returns `false` once settled on the target.
    pub fn ease_step(&mut self, ease: f64, epsilon: f64) -> bool {
        let diff = self.target - self.current;
        if diff.abs() < epsilon {
            self.current = self.target;
            self.is_animating = false;
            return false;
        }
        self.current = self.bound(self.current + diff * ease);
        self.is_animating = true;
        true
    }

    /// One momentum frame. Returns whether another frame is needed.
    pub fn momentum_step(&mut self, friction: f64, min_velocity: f64) -> bool {
        if self.pinned || self.velocity.abs() < min_velocity {
            self.velocity = 0.0;
            return false;
        }
        self.target = self.bound(self.target + self.velocity);
        self.velocity *= friction;
        if self.velocity.abs() < min_velocity {
            self.velocity = 0.0;
            return false;
        }
        true
    }

    fn bound(&self, p: f64) -> f64 {
        if self.pinned {
            MAX_PERCENTAGE
        } else {
            clamp_percentage(p)
        }
    }

    fn needs_easing(&self) -> bool {
        self.target != self.current
    }
}

/// Tells clicks on an image apart from drags that started on it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClickGuard {
    down_ms: f64,
    x: f64,
    y: f64,
}

impl ClickGuard {
    pub fn down(now_ms: f64, x: f64, y: f64) -> Self {
        Self { down_ms: now_ms, x, y }
    }

    pub fn is_click(&self, now_ms: f64, x: f64, y: f64, cfg: &CarouselConfig) -> bool {
        now_ms - self.down_ms < cfg.click_max_ms
            && (x - self.x).abs() < cfg.click_max_px
            && (y - self.y).abs() < cfg.click_max_px
    }
}

/// DOM side of the track.
pub trait TrackView {
    fn viewport_width(&self) -> f64;
    /// Horizontal centers of the images, in client coordinates, track order.
    fn image_centers(&self) -> Vec<f64>;
    /// Write the track transform and the per-image parallax position.
    fn apply_position(&self, percentage: f64);
    /// Rebuild the counter for `total` projects showing `number`.
    fn reset_counter(&self, total: usize, number: usize);
    /// Roll the counter to `number`.
    fn roll_counter(&self, number: usize);
}

struct CarouselInner {
    scheduler: Rc<dyn Scheduler>,
    config: CarouselConfig,
    view: Rc<dyn TrackView>,
    state: RefCell<TrackState>,
    count: Cell<usize>,
    detail_mode: Cell<bool>,
    ease_frame: Cell<Option<TaskId>>,
    momentum_frame: Cell<Option<TaskId>>,
    momentum_timer: Cell<Option<TaskId>>,
    counter_frame: Cell<Option<TaskId>>,
}

#[derive(Clone)]
pub struct CarouselController {
    inner: Rc<CarouselInner>,
}

impl CarouselController {
    pub fn new(scheduler: Rc<dyn Scheduler>, config: CarouselConfig, view: Rc<dyn TrackView>) -> Self {
        Self {
            inner: Rc::new(CarouselInner {
                scheduler,
                config,
                view,
                state: RefCell::new(TrackState::default()),
                count: Cell::new(0),
                detail_mode: Cell::new(false),
                ease_frame: Cell::new(None),
                momentum_frame: Cell::new(None),
                momentum_timer: Cell::new(None),
                counter_frame: Cell::new(None),
            }),
        }
    }

    /// Route input from `source` into this controller.
    pub fn attach(&self, source: &dyn InputSource) {
        let weak = Rc::downgrade(&self.inner);
        source.subscribe(Rc::new(move |event: &InputEvent| match weak.upgrade() {
            Some(inner) => handle(&inner, event),
            None => Propagation::Continue,
        }));
    }

    /// Position the track on the middle of `count` freshly loaded images.
    pub fn load(&self, count: usize) {
        let inner = &self.inner;
        cancel_motion(inner);
        inner.count.set(count);
        let middle = count / 2;
        *inner.state.borrow_mut() = TrackState::for_count(count, middle);
        inner.view.reset_counter(count, middle + 1);
        update_position(inner);

        let weak = Rc::downgrade(inner);
        inner.scheduler.set_timeout(
            100,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    request_counter_sync(&inner);
                }
            }),
        );
        log::info!("carousel loaded with {count} projects, starting at {}", middle + 1);
    }

    pub fn handle(&self, event: &InputEvent) -> Propagation {
        handle(&self.inner, event)
    }

    /// While set, wheel events scroll the page instead of the track.
    pub fn set_detail_mode(&self, active: bool) {
        self.inner.detail_mode.set(active);
    }

    pub fn state(&self) -> TrackState {
        self.inner.state.borrow().clone()
    }

    pub fn current_index(&self) -> usize {
        self.inner.state.borrow().current_project_index
    }
}

fn handle(inner: &Rc<CarouselInner>, event: &InputEvent) -> Propagation {
    match *event {
        InputEvent::PointerDown { x, .. } => {
            cancel_motion(inner);
            inner.state.borrow_mut().pointer_down(x);
            Propagation::Continue
        }
        InputEvent::PointerMove { x, .. } => {
            let width = inner.view.viewport_width();
            let moved = inner.state.borrow_mut().pointer_move(x, width);
            if moved {
                update_position(inner);
            }
            Propagation::Continue
        }
        InputEvent::PointerUp => {
            if inner.state.borrow_mut().pointer_up() {
                request_counter_sync(inner);
            }
            Propagation::Continue
        }
        InputEvent::Wheel { dx, dy } => {
            if inner.detail_mode.get() {
                return Propagation::Continue;
            }
            let now = inner.scheduler.now_ms();
            let width = inner.view.viewport_width();
            inner.state.borrow_mut().wheel(dx, dy, now, width, &inner.config);
            ensure_easing(inner);
            arm_momentum(inner);
            Propagation::PreventDefault
        }
        InputEvent::Resize => {
            request_counter_sync(inner);
            Propagation::Continue
        }
    }
}

fn cancel_motion(inner: &CarouselInner) {
    for slot in [&inner.ease_frame, &inner.momentum_frame, &inner.momentum_timer] {
        if let Some(id) = slot.take() {
            inner.scheduler.cancel(id);
        }
    }
    inner.state.borrow_mut().is_animating = false;
}

fn update_position(inner: &Rc<CarouselInner>) {
    let current = inner.state.borrow().current;
    inner.view.apply_position(current);
    request_counter_sync(inner);
}

/// Start the easing loop unless it is already running or there is nowhere to go.
fn ensure_easing(inner: &Rc<CarouselInner>) {
    {
        let state = inner.state.borrow();
        if state.is_animating || !state.needs_easing() {
            return;
        }
    }
    ease_tick(inner);
}

fn ease_tick(inner: &Rc<CarouselInner>) {
    inner.ease_frame.set(None);
    let moving = {
        let cfg = &inner.config;
        inner.state.borrow_mut().ease_step(cfg.ease, cfg.epsilon)
    };
    update_position(inner);
    if moving {
        let weak = Rc::downgrade(inner);
        let id = inner.scheduler.request_frame(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                ease_tick(&inner);
            }
        }));
        inner.ease_frame.set(Some(id));
    }
}

fn arm_momentum(inner: &Rc<CarouselInner>) {
    if let Some(id) = inner.momentum_timer.take() {
        inner.scheduler.cancel(id);
    }
    if let Some(id) = inner.momentum_frame.take() {
        inner.scheduler.cancel(id);
    }
    let weak = Rc::downgrade(inner);
    let id = inner.scheduler.set_timeout(
        inner.config.momentum_delay_ms,
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.momentum_timer.set(None);
                momentum_tick(&inner);
            }
        }),
    );
    inner.momentum_timer.set(Some(id));
}

fn momentum_tick(inner: &Rc<CarouselInner>) {
    inner.momentum_frame.set(None);
    let more = {
        let cfg = &inner.config;
        inner.state.borrow_mut().momentum_step(cfg.friction, cfg.min_velocity)
    };
    ensure_easing(inner);
    if more {
        let weak: Weak<CarouselInner> = Rc::downgrade(inner);
        let id = inner.scheduler.request_frame(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                momentum_tick(&inner);
            }
        }));
        inner.momentum_frame.set(Some(id));
    }
}

/// At most one pending counter sync per frame.
fn request_counter_sync(inner: &Rc<CarouselInner>) {
    if inner.counter_frame.get().is_some() || inner.count.get() == 0 {
        return;
    }
    let weak = Rc::downgrade(inner);
    let id = inner.scheduler.request_frame(Box::new(move || {
        if let Some(inner) = weak.upgrade() {
            inner.counter_frame.set(None);
            sync_counter(&inner);
        }
    }));
    inner.counter_frame.set(Some(id));
}

fn sync_counter(inner: &CarouselInner) {
    let centers = inner.view.image_centers();
    let center = inner.view.viewport_width() / 2.0;
    let Some(index) = nearest_index(&centers, center) else {
        return;
    };
    let changed = {
        let mut state = inner.state.borrow_mut();
        let changed = state.current_project_index != index;
        state.current_project_index = index;
        changed
    };
    if changed {
        log::debug!("carousel counter -> {}", index + 1);
        inner.view.roll_counter(index + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> CarouselConfig {
        CarouselConfig::default()
    }

    #[test]
    fn clamp_bounds_and_nan() {
        assert_eq!(clamp_percentage(12.0), 0.0);
        assert_eq!(clamp_percentage(-140.0), -100.0);
        assert_eq!(clamp_percentage(-40.0), -40.0);
        assert_eq!(clamp_percentage(f64::NAN), 0.0);
    }

    #[test]
    fn start_percentage_centers_middle_project() {
        assert_eq!(percentage_for(2, 5), -50.0);
        assert_eq!(percentage_for(0, 1), 0.0);
        assert_eq!(percentage_for(0, 0), 0.0);
        assert_eq!(percentage_for(4, 5), -100.0);
    }

    #[test]
    fn nearest_prefers_first_on_tie() {
        assert_eq!(nearest_index(&[100.0, 300.0], 200.0), Some(0));
        assert_eq!(nearest_index(&[100.0, 210.0, 500.0], 200.0), Some(1));
        assert_eq!(nearest_index(&[], 200.0), None);
    }

    #[test]
    fn drag_follows_pointer_one_to_one() {
        let mut state = TrackState::at(-50.0);
        state.pointer_down(500.0);
        // 100px on a 1000px viewport is a fifth of the half-width.
        assert!(state.pointer_move(400.0, 1000.0));
        assert_eq!(state.current(), -70.0);
        assert_eq!(state.target(), -70.0);
        state.pointer_move(600.0, 1000.0);
        assert_eq!(state.current(), -30.0);
    }

    #[test]
    fn move_without_down_is_ignored() {
        let mut state = TrackState::at(-50.0);
        assert!(!state.pointer_move(0.0, 1000.0));
        assert_eq!(state.current(), -50.0);
    }

    #[test]
    fn drag_stays_in_range() {
        let mut state = TrackState::at(-50.0);
        state.pointer_down(500.0);
        for x in [-5000.0, -10.0, 0.0, 250.0, 999.0, 4000.0, 12000.0, -800.0] {
            state.pointer_move(x, 1000.0);
            assert!((MIN_PERCENTAGE..=MAX_PERCENTAGE).contains(&state.current()));
            assert!((MIN_PERCENTAGE..=MAX_PERCENTAGE).contains(&state.target()));
        }
        state.pointer_up();
        // The next drag anchors where the last one ended.
        state.pointer_down(0.0);
        state.pointer_move(0.0, 1000.0);
        assert_eq!(state.current(), -100.0);
    }

    #[test]
    fn single_image_track_stays_at_zero() {
        for count in [0, 1] {
            let mut state = TrackState::for_count(count, 0);
            state.pointer_down(500.0);
            assert!(state.pointer_move(100.0, 1000.0));
            assert_eq!(state.current(), 0.0);
            state.pointer_up();

            state.wheel(0.0, 400.0, 0.0, 1000.0, &cfg());
            state.wheel(0.0, 400.0, 16.0, 1000.0, &cfg());
            assert_eq!(state.target(), 0.0);
            assert_eq!(state.velocity(), 0.0);
            assert!(!state.momentum_step(0.92, 0.1));
            assert!(!state.ease_step(0.12, 0.005));
            assert_eq!(state.current(), 0.0);
        }
    }

    #[test]
    fn several_images_use_the_full_range() {
        let mut state = TrackState::for_count(5, 2);
        assert_eq!(state.current(), -50.0);
        assert_eq!(state.current_project_index(), 2);
        state.pointer_down(500.0);
        state.pointer_move(100.0, 1000.0);
        assert_eq!(state.current(), MIN_PERCENTAGE);
    }

    #[test]
    fn pointer_down_halts_motion() {
        let mut state = TrackState::at(-50.0);
        state.wheel(0.0, 200.0, 0.0, 1000.0, &cfg());
        state.ease_step(0.12, 0.005);
        state.pointer_down(10.0);
        assert_eq!(state.target(), state.current());
        assert_eq!(state.velocity(), 0.0);
        assert!(!state.is_animating());
    }

    #[test]
    fn wheel_moves_target_by_scaled_delta() {
        let mut state = TrackState::at(-50.0);
        state.wheel(0.0, 100.0, 1000.0, 1000.0, &cfg());
        // 100/1000 * 100 * 0.45
        assert!((state.target() - -54.5).abs() < 1e-9);
        assert_eq!(state.current(), -50.0);
    }

    #[test]
    fn horizontal_delta_wins_when_present() {
        let mut state = TrackState::at(-50.0);
        state.wheel(-100.0, 300.0, 0.0, 1000.0, &cfg());
        assert!((state.target() - -45.5).abs() < 1e-9);
    }

    #[test]
    fn wheel_velocity_is_clamped() {
        let mut state = TrackState::at(-50.0);
        state.wheel(0.0, 10.0, 0.0, 1000.0, &cfg());
        state.wheel(0.0, 5000.0, 1.0, 1000.0, &cfg());
        assert_eq!(state.velocity(), -2.0);
        state.wheel(0.0, -5000.0, 2.0, 1000.0, &cfg());
        assert_eq!(state.velocity(), 2.0);
    }

    #[test]
    fn slow_wheel_leaves_velocity_alone() {
        let mut state = TrackState::at(-50.0);
        state.wheel(0.0, 10.0, 0.0, 1000.0, &cfg());
        state.wheel(0.0, 10.0, 500.0, 1000.0, &cfg());
        assert_eq!(state.velocity(), 0.0);
    }

    #[test]
    fn wheel_sequences_stay_in_range() {
        let mut state = TrackState::at(0.0);
        let mut now = 0.0;
        for (i, dy) in [400.0, -30.0, 9000.0, 12.0, -12000.0, 5.0, 800.0].iter().enumerate() {
            now += 8.0 + i as f64;
            state.wheel(0.0, *dy, now, 1280.0, &cfg());
            assert!((MIN_PERCENTAGE..=MAX_PERCENTAGE).contains(&state.target()));
            assert!(state.velocity().abs() <= 2.0);
            while state.momentum_step(0.92, 0.1) {
                assert!((MIN_PERCENTAGE..=MAX_PERCENTAGE).contains(&state.target()));
            }
        }
    }

    #[test]
    fn easing_converges_for_any_pair() {
        let stops = [0.0, -0.01, -3.0, -50.0, -99.99, -100.0];
        for &from in &stops {
            for &to in &stops {
                let mut state = TrackState::at(from);
                state.target = to;
                let mut frames = 0;
                while state.ease_step(0.12, 0.005) {
                    frames += 1;
                    assert!(frames < 200, "no convergence {from} -> {to}");
                }
                assert_eq!(state.current(), to);
                assert!(!state.is_animating());
            }
        }
    }

    #[test]
    fn momentum_decays_to_zero() {
        let mut state = TrackState::at(-50.0);
        state.velocity = 2.0;
        let mut frames = 0;
        while state.momentum_step(0.92, 0.1) {
            frames += 1;
        }
        // 2 * 0.92^n < 0.1 needs n = 36
        assert_eq!(frames, 35);
        assert_eq!(state.velocity(), 0.0);
        assert!(state.target() <= MAX_PERCENTAGE);
    }

    #[test]
    fn position_strings() {
        assert_eq!(track_transform(-25.5), "translate3d(-25.5%, -50%, 0)");
        assert_eq!(image_object_position(-40.0), "60% center");
        assert_eq!(image_object_position(0.0), "100% center");
    }

    #[test]
    fn track_has_one_image_per_project() {
        let projects = vec![
            crate::project::fixtures::project("a", 1),
            crate::project::fixtures::project("b", 2),
        ];
        let html = track_markup(&projects).into_string();
        assert_eq!(html.matches("<img").count(), 2);
        assert!(html.contains(r#"data-project-id="b" data-project-index="1""#));
        assert!(html.contains(r#"src="img/a/cover.jpg""#));
    }

    #[test]
    fn click_guard_thresholds() {
        let c = cfg();
        let guard = ClickGuard::down(1000.0, 100.0, 100.0);
        assert!(guard.is_click(1150.0, 102.0, 101.0, &c));
        assert!(!guard.is_click(1300.0, 100.0, 100.0, &c));
        assert!(!guard.is_click(1100.0, 110.0, 100.0, &c));
        assert!(!guard.is_click(1100.0, 100.0, 95.0, &c));
    }
}
