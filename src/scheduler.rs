//! Time abstraction shared by every controller.
//!
//! Controllers never touch `requestAnimationFrame` or `setTimeout` directly;
//! they go through [`Scheduler`]. The browser build plugs in
//! `web::BrowserScheduler`, tests plug in [`ManualScheduler`], whose virtual
//! clock only moves when told to.

use std::cell::RefCell;
use std::rc::Rc;

/// Handle returned by every scheduling call. Cancelling an id that already
/// fired, or was never issued, does nothing.
pub type TaskId = u64;

pub trait Scheduler {
    /// Monotonic milliseconds.
    fn now_ms(&self) -> f64;
    fn request_frame(&self, task: Box<dyn FnOnce()>) -> TaskId;
    fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskId;
    fn set_interval(&self, period_ms: u32, task: Box<dyn FnMut()>) -> TaskId;
    fn cancel(&self, id: TaskId);
}

/// Virtual frame spacing used by [`ManualScheduler`] (~60 fps).
pub const FRAME_MS: f64 = 16.0;

enum TimerKind {
    Once(Box<dyn FnOnce()>),
    Every { period: f64, task: Box<dyn FnMut()> },
}

struct Timer {
    id: TaskId,
    due: f64,
    seq: u64,
    kind: TimerKind,
}

#[derive(Default)]
struct ManualInner {
    now: f64,
    next_id: TaskId,
    seq: u64,
    timers: Vec<Timer>,
    frames: Vec<(TaskId, Box<dyn FnOnce()>)>,
    running: Option<TaskId>,
    running_cancelled: bool,
}

impl ManualInner {
    fn issue(&mut self) -> (TaskId, u64) {
        self.next_id += 1;
        self.seq += 1;
        (self.next_id, self.seq)
    }
}

/// Deterministic scheduler driven by explicit calls to [`advance`].
///
/// Time moves in [`FRAME_MS`] steps. At each step the due timers fire in
/// due-time order (FIFO within one instant), then the frames queued before the
/// step run once. Tasks scheduled while running are honoured at later steps.
///
/// [`advance`]: ManualScheduler::advance
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualInner>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the virtual clock forward by `ms`, firing timers and frames.
    pub fn advance(&self, ms: f64) {
        let target = self.now_ms() + ms;
        loop {
            let now = self.now_ms();
            if now >= target {
                break;
            }
            let step = (now + FRAME_MS).min(target);
            self.fire_timers(step);
            self.inner.borrow_mut().now = step;
            self.run_frame_batch();
        }
    }

    pub fn run_frames(&self, count: usize) {
        self.advance(FRAME_MS * count as f64);
    }

    pub fn pending_frames(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// True when nothing at all is scheduled.
    pub fn is_idle(&self) -> bool {
        self.pending_frames() == 0 && self.pending_timers() == 0
    }

    fn fire_timers(&self, until: f64) {
        loop {
            let timer = {
                let mut inner = self.inner.borrow_mut();
                let next = inner
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= until)
                    .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
                    .map(|(i, _)| i);
                let Some(index) = next else { break };
                let timer = inner.timers.remove(index);
                inner.now = inner.now.max(timer.due);
                inner.running = Some(timer.id);
                inner.running_cancelled = false;
                timer
            };

            match timer.kind {
                TimerKind::Once(task) => task(),
                TimerKind::Every { period, mut task } => {
                    task();
                    let mut inner = self.inner.borrow_mut();
                    if !inner.running_cancelled {
                        inner.seq += 1;
                        let seq = inner.seq;
                        inner.timers.push(Timer {
                            id: timer.id,
                            due: timer.due + period,
                            seq,
                            kind: TimerKind::Every { period, task },
                        });
                    }
                }
            }
            self.inner.borrow_mut().running = None;
        }
    }

    fn run_frame_batch(&self) {
        let batch: Vec<TaskId> = self.inner.borrow().frames.iter().map(|(id, _)| *id).collect();
        for id in batch {
            let task = {
                let mut inner = self.inner.borrow_mut();
                inner
                    .frames
                    .iter()
                    .position(|(fid, _)| *fid == id)
                    .map(|pos| inner.frames.remove(pos).1)
            };
            if let Some(task) = task {
                task();
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.inner.borrow().now
    }

    fn request_frame(&self, task: Box<dyn FnOnce()>) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        let (id, _) = inner.issue();
        inner.frames.push((id, task));
        id
    }

    fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        let (id, seq) = inner.issue();
        let due = inner.now + f64::from(delay_ms);
        inner.timers.push(Timer {
            id,
            due,
            seq,
            kind: TimerKind::Once(task),
        });
        id
    }

    fn set_interval(&self, period_ms: u32, task: Box<dyn FnMut()>) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        let (id, seq) = inner.issue();
        let period = f64::from(period_ms.max(1));
        let due = inner.now + period;
        inner.timers.push(Timer {
            id,
            due,
            seq,
            kind: TimerKind::Every { period, task },
        });
        id
    }

    fn cancel(&self, id: TaskId) {
        let mut inner = self.inner.borrow_mut();
        inner.timers.retain(|t| t.id != id);
        inner.frames.retain(|(fid, _)| *fid != id);
        if inner.running == Some(id) {
            inner.running_cancelled = true;
        }
    }
}
