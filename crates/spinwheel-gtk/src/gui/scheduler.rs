use gtk::prelude::*;
use gtk4 as gtk;
use spinwheel::{RunId, SpinScheduler, Wake, WakeKind};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// GLib handle plus a flag set once the callback ran. Removing a source or
/// tick callback that already fired is an error in GLib.
struct Pending<T> {
    handle: T,
    fired: Rc<Cell<bool>>,
}

impl<T> Pending<T> {
    fn is_live(&self) -> bool {
        !self.fired.get()
    }
}

/// Runs controller callbacks on the GTK main loop: frames through the
/// widget's frame clock, timers through GLib timeouts.
///
/// Callbacks only hand the `Wake` to `deliver`, which must not re-enter the
/// engine synchronously.
pub struct GtkScheduler {
    widget: gtk::Widget,
    deliver: Rc<dyn Fn(Wake)>,
    frames: HashMap<RunId, Pending<gtk::TickCallbackId>>,
    timers: HashMap<Wake, Pending<glib::SourceId>>,
}

impl GtkScheduler {
    pub fn new(widget: impl IsA<gtk::Widget>, deliver: impl Fn(Wake) + 'static) -> Self {
        Self {
            widget: widget.upcast(),
            deliver: Rc::new(deliver),
            frames: HashMap::new(),
            timers: HashMap::new(),
        }
    }

    fn prune(&mut self) {
        self.frames.retain(|_, p| p.is_live());
        self.timers.retain(|_, p| p.is_live());
    }

    fn remove_frame(&mut self, run: RunId) {
        if let Some(pending) = self.frames.remove(&run)
            && pending.is_live()
        {
            pending.handle.remove();
        }
    }

    fn remove_timer(&mut self, wake: Wake) {
        if let Some(pending) = self.timers.remove(&wake)
            && pending.is_live()
        {
            pending.handle.remove();
        }
    }
}

impl SpinScheduler for GtkScheduler {
    fn request_frame(&mut self, run: RunId) {
        self.prune();
        if self.frames.contains_key(&run) {
            return;
        }

        let fired = Rc::new(Cell::new(false));
        let deliver = self.deliver.clone();
        let flag = fired.clone();
        let handle = self.widget.add_tick_callback(move |_, _| {
            flag.set(true);
            deliver(Wake::new(run, WakeKind::Frame));
            glib::ControlFlow::Break
        });
        self.frames.insert(run, Pending { handle, fired });
    }

    fn arm_timer(&mut self, wake: Wake, delay: Duration) {
        self.prune();
        self.remove_timer(wake);

        let fired = Rc::new(Cell::new(false));
        let deliver = self.deliver.clone();
        let flag = fired.clone();
        let handle = glib::timeout_add_local_once(delay, move || {
            flag.set(true);
            deliver(wake);
        });
        self.timers.insert(wake, Pending { handle, fired });
    }

    fn cancel(&mut self, wake: Wake) {
        match wake.kind {
            WakeKind::Frame => self.remove_frame(wake.run),
            WakeKind::Fallback | WakeKind::Settle => self.remove_timer(wake),
        }
    }
}

impl Drop for GtkScheduler {
    fn drop(&mut self) {
        let runs: Vec<RunId> = self.frames.keys().copied().collect();
        for run in runs {
            self.remove_frame(run);
        }
        let wakes: Vec<Wake> = self.timers.keys().copied().collect();
        for wake in wakes {
            self.remove_timer(wake);
        }
    }
}
