use derive_more::Display;
use std::time::{Duration, Instant};

/// Generation counter identifying one spin. Callbacks carry the run they were
/// scheduled for and are dropped when it no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Display)]
#[display("run#{_0}")]
pub struct RunId(pub u64);

impl RunId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WakeKind {
    /// Next display frame.
    Frame,
    /// Safety net for a starved frame loop.
    Fallback,
    /// Delay between completion and the outcome callback.
    Settle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wake {
    pub run: RunId,
    pub kind: WakeKind,
}

impl Wake {
    pub fn new(run: RunId, kind: WakeKind) -> Self {
        Self { run, kind }
    }
}

/// Scheduling seam between the spin controller and its host.
///
/// Every request is eventually answered (or not, if cancelled) by the host
/// handing the same `Wake` back to the controller.
pub trait SpinScheduler {
    fn request_frame(&mut self, run: RunId);
    fn arm_timer(&mut self, wake: Wake, delay: Duration);
    fn cancel(&mut self, wake: Wake);
}

impl<S: SpinScheduler + ?Sized> SpinScheduler for Box<S> {
    fn request_frame(&mut self, run: RunId) {
        (**self).request_frame(run)
    }

    fn arm_timer(&mut self, wake: Wake, delay: Duration) {
        (**self).arm_timer(wake, delay)
    }

    fn cancel(&mut self, wake: Wake) {
        (**self).cancel(wake)
    }
}

/// Host-clocked scheduler for headless use.
///
/// Frames are delivered on every `advance_to`, timers once their deadline has
/// passed. Nothing fires on its own: a host that stops calling `advance_to`
/// starves the controller exactly like a backgrounded display would.
#[derive(Debug)]
pub struct ManualScheduler {
    now: Instant,
    frames: Vec<RunId>,
    timers: Vec<(Wake, Instant)>,
}

impl ManualScheduler {
    pub fn new(now: Instant) -> Self {
        Self {
            now,
            frames: Vec::new(),
            timers: Vec::new(),
        }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn is_armed(&self, wake: Wake) -> bool {
        self.timers.iter().any(|(w, _)| *w == wake)
    }

    pub fn deadline(&self, wake: Wake) -> Option<Instant> {
        self.timers
            .iter()
            .find(|(w, _)| *w == wake)
            .map(|(_, at)| *at)
    }

    /// Moves the clock forward and drains every wake due at `now`: pending
    /// frames first, then timers in deadline order.
    pub fn advance_to(&mut self, now: Instant) -> Vec<Wake> {
        self.now = self.now.max(now);

        let mut due: Vec<Wake> = self
            .frames
            .drain(..)
            .map(|run| Wake::new(run, WakeKind::Frame))
            .collect();

        let mut ready: Vec<(Wake, Instant)> = Vec::new();
        let current = self.now;
        self.timers.retain(|(wake, at)| {
            if *at <= current {
                ready.push((*wake, *at));
                false
            } else {
                true
            }
        });
        ready.sort_by_key(|(_, at)| *at);
        due.extend(ready.into_iter().map(|(wake, _)| wake));
        due
    }

    /// Same as `advance_to` but drops frame requests, as a stalled display
    /// would.
    pub fn advance_starved(&mut self, now: Instant) -> Vec<Wake> {
        self.frames.clear();
        self.advance_to(now)
    }
}

impl SpinScheduler for ManualScheduler {
    fn request_frame(&mut self, run: RunId) {
        if !self.frames.contains(&run) {
            self.frames.push(run);
        }
    }

    fn arm_timer(&mut self, wake: Wake, delay: Duration) {
        self.timers.retain(|(w, _)| *w != wake);
        self.timers.push((wake, self.now + delay));
    }

    fn cancel(&mut self, wake: Wake) {
        match wake.kind {
            WakeKind::Frame => self.frames.retain(|run| *run != wake.run),
            _ => self.timers.retain(|(w, _)| *w != wake),
        }
    }
}
