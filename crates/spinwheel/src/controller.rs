use crate::config::SpinMode;
use crate::outcome::Outcome;
use crate::scheduler::{RunId, SpinScheduler, Wake, WakeKind};
use crate::select;
use rand::Rng;
use std::time::{Duration, Instant};

pub const FULL_TURN: f64 = 360.0;
pub const MIN_FULL_TURNS: f64 = 3.0;
/// Pointer position in wheel degrees, clockwise from 12 o'clock.
pub const POINTER_ANGLE_DEG: f64 = 0.0;
/// Keeps the landing point off the exact sector center so ties never occur.
pub const LANDING_BIAS_DEG: f64 = 0.01;
pub const SNAP_TOLERANCE_DEG: f64 = 0.05;
pub const FALLBACK_GRACE: Duration = Duration::from_millis(1000);
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

pub fn segment_angle(count: usize) -> f64 {
    FULL_TURN / count.max(1) as f64
}

/// Center of sector `index` in wheel degrees.
pub fn sector_center(index: usize, count: usize) -> f64 {
    let segment = segment_angle(count);
    index as f64 * segment + segment / 2.0
}

/// Rotation at which the pointer rests on sector `index`, at least three full
/// turns past `start`.
pub fn target_rotation(start: f64, index: usize, count: usize) -> f64 {
    let stop = (POINTER_ANGLE_DEG - sector_center(index, count) + LANDING_BIAS_DEG)
        .rem_euclid(FULL_TURN);
    let delta = (stop - start.rem_euclid(FULL_TURN)).rem_euclid(FULL_TURN);
    start + MIN_FULL_TURNS * FULL_TURN + delta
}

/// Index of the sector currently under the pointer.
pub fn sector_under_pointer(rotation: f64, count: usize) -> usize {
    let count = count.max(1);
    let local = (POINTER_ANGLE_DEG - rotation).rem_euclid(FULL_TURN);
    ((local / segment_angle(count)).floor() as usize).min(count - 1)
}

pub fn ease_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Published spin state. Written only by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpinState {
    pub is_spinning: bool,
    /// Degrees, unwrapped.
    pub rotation: f64,
    pub target_rotation: f64,
    pub chosen: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct ActiveSpin {
    run: RunId,
    start_rotation: f64,
    target_rotation: f64,
    chosen: usize,
    started_at: Instant,
    duration: Duration,
}

impl ActiveSpin {
    fn wake(&self, kind: WakeKind) -> Wake {
        Wake::new(self.run, kind)
    }
}

/// `Idle -> Spinning -> Idle` state machine driving the wheel rotation.
pub struct SpinController<S: SpinScheduler> {
    scheduler: S,
    state: SpinState,
    run: RunId,
    active: Option<ActiveSpin>,
    pending_settles: Vec<(RunId, usize)>,
    disposed: bool,
}

impl<S: SpinScheduler> SpinController<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            state: SpinState::default(),
            run: RunId::default(),
            active: None,
            pending_settles: Vec::new(),
            disposed: false,
        }
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn current_run(&self) -> RunId {
        self.run
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Picks an outcome and starts animating towards it.
    ///
    /// Returns `None` without touching any state when a spin is already
    /// running, the wheel is empty or the controller was disposed.
    pub fn spin<R: Rng>(
        &mut self,
        outcomes: &[Outcome],
        mode: SpinMode,
        win_rate: f64,
        duration: Duration,
        rng: &mut R,
        now: Instant,
    ) -> Option<RunId> {
        if self.disposed {
            return None;
        }
        if self.state.is_spinning {
            log::debug!("spin requested while {} is running, ignoring", self.run);
            return None;
        }
        let chosen = select::choose_outcome(outcomes, mode, win_rate, rng)?;
        Some(self.begin(chosen, outcomes.len(), duration, now))
    }

    /// Starts a spin towards a known outcome. Callers must have checked that
    /// no spin is running.
    fn begin(&mut self, chosen: usize, count: usize, duration: Duration, now: Instant) -> RunId {
        self.run = self.run.next();
        let start_rotation = self.state.rotation;
        let target = target_rotation(start_rotation, chosen, count);

        let spin = ActiveSpin {
            run: self.run,
            start_rotation,
            target_rotation: target,
            chosen,
            started_at: now,
            duration,
        };
        self.active = Some(spin);
        self.state = SpinState {
            is_spinning: true,
            rotation: start_rotation,
            target_rotation: target,
            chosen: None,
        };

        self.scheduler
            .arm_timer(spin.wake(WakeKind::Fallback), duration + FALLBACK_GRACE);
        self.scheduler.request_frame(spin.run);

        log::debug!(
            "{} started: {:.2} -> {:.2} over {:?}",
            spin.run,
            start_rotation,
            target,
            duration
        );
        spin.run
    }

    /// Delivers a scheduler callback. Returns the outcome index when a settle
    /// delay elapses and the host should announce the result.
    pub fn handle(&mut self, wake: Wake, now: Instant) -> Option<usize> {
        if self.disposed {
            return None;
        }
        match wake.kind {
            WakeKind::Frame => {
                self.on_frame(wake.run, now);
                None
            }
            WakeKind::Fallback => {
                if self.is_current(wake.run) {
                    log::debug!("{} finished by fallback timer", wake.run);
                    self.complete();
                } else {
                    log::trace!("dropping stale fallback for {}", wake.run);
                }
                None
            }
            WakeKind::Settle => self.take_settle(wake.run),
        }
    }

    fn is_current(&self, run: RunId) -> bool {
        self.active.is_some_and(|a| a.run == run)
    }

    fn on_frame(&mut self, run: RunId, now: Instant) {
        let Some(spin) = self.active.filter(|a| a.run == run) else {
            log::trace!("dropping stale frame for {}", run);
            return;
        };

        let elapsed = now.saturating_duration_since(spin.started_at);
        let progress = if spin.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / spin.duration.as_secs_f64()).min(1.0)
        };
        let eased = spin.start_rotation
            + (spin.target_rotation - spin.start_rotation) * ease_out_cubic(progress);
        self.state.rotation = self.state.rotation.max(eased);

        let close_enough = (spin.target_rotation - self.state.rotation).abs()
            <= SNAP_TOLERANCE_DEG
            && elapsed >= spin.duration;

        if progress >= 1.0 || close_enough {
            self.complete();
        } else {
            self.scheduler.request_frame(run);
        }
    }

    fn complete(&mut self) {
        let Some(spin) = self.active.take() else {
            return;
        };

        self.scheduler.cancel(spin.wake(WakeKind::Frame));
        self.scheduler.cancel(spin.wake(WakeKind::Fallback));

        self.state = SpinState {
            is_spinning: false,
            rotation: spin.target_rotation,
            target_rotation: spin.target_rotation,
            chosen: Some(spin.chosen),
        };

        self.pending_settles.push((spin.run, spin.chosen));
        self.scheduler
            .arm_timer(spin.wake(WakeKind::Settle), SETTLE_DELAY);
        log::debug!("{} landed on outcome {}", spin.run, spin.chosen);
    }

    fn take_settle(&mut self, run: RunId) -> Option<usize> {
        let pos = self.pending_settles.iter().position(|(r, _)| *r == run)?;
        Some(self.pending_settles.remove(pos).1)
    }

    /// Cancels every outstanding callback. The outcome callback never fires
    /// after this.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(spin) = self.active.take() {
            self.scheduler.cancel(spin.wake(WakeKind::Frame));
            self.scheduler.cancel(spin.wake(WakeKind::Fallback));
        }
        for (run, _) in self.pending_settles.drain(..) {
            self.scheduler.cancel(Wake::new(run, WakeKind::Settle));
        }
        self.state.is_spinning = false;
        self.disposed = true;
        log::debug!("spin controller disposed at {}", self.run);
    }
}

impl<S: SpinScheduler> Drop for SpinController<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DURATION: Duration = Duration::from_millis(1000);

    fn outcomes(n: usize) -> Vec<Outcome> {
        (0..n)
            .map(|i| Outcome::new(format!("o{}", i), format!("Prize {}", i)))
            .collect()
    }

    fn ms(t0: Instant, millis: u64) -> Instant {
        t0 + Duration::from_millis(millis)
    }

    /// Pumps wakes until `until`, stepping the clock by `step` ms.
    fn drive(
        ctl: &mut SpinController<ManualScheduler>,
        t0: Instant,
        until: u64,
        step: u64,
    ) -> Vec<usize> {
        let mut announced = Vec::new();
        let mut t = 0;
        while t <= until {
            let now = ms(t0, t);
            for wake in ctl.scheduler_mut().advance_to(now) {
                if let Some(idx) = ctl.handle(wake, now) {
                    announced.push(idx);
                }
            }
            t += step;
        }
        announced
    }

    #[test]
    fn test_target_aligns_with_sector_center() {
        for count in 1..=24 {
            for index in 0..count {
                for start in [0.0, 17.5, 359.9, 1234.56, -90.0] {
                    let target = target_rotation(start, index, count);
                    let local = (POINTER_ANGLE_DEG - target).rem_euclid(FULL_TURN);
                    let offset = (local - sector_center(index, count)).abs();
                    assert!(
                        offset <= LANDING_BIAS_DEG + 1e-6,
                        "count {} index {} start {} offset {}",
                        count,
                        index,
                        start,
                        offset
                    );
                    assert_eq!(sector_under_pointer(target, count), index);
                    assert!(target >= start + MIN_FULL_TURNS * FULL_TURN);
                    assert!(target < start + (MIN_FULL_TURNS + 1.0) * FULL_TURN);
                }
            }
        }
    }

    #[test]
    fn test_ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_spin_completes_and_settles_once() {
        let t0 = Instant::now();
        let mut ctl = SpinController::new(ManualScheduler::new(t0));
        let mut rng = StdRng::seed_from_u64(1);
        let wheel = outcomes(6);

        let run = ctl
            .spin(&wheel, SpinMode::Random, 0.1, DURATION, &mut rng, t0)
            .unwrap();
        assert!(ctl.state().is_spinning);
        assert!(ctl.scheduler().is_armed(Wake::new(run, WakeKind::Fallback)));

        let announced = drive(&mut ctl, t0, 3000, 16);
        let state = *ctl.state();
        assert!(!state.is_spinning);
        assert_eq!(state.rotation, state.target_rotation);
        assert_eq!(announced, vec![state.chosen.unwrap()]);
        assert_eq!(sector_under_pointer(state.rotation, 6), state.chosen.unwrap());
        assert!(!ctl.scheduler().is_armed(Wake::new(run, WakeKind::Fallback)));
    }

    #[test]
    fn test_rotation_is_monotonic() {
        let t0 = Instant::now();
        let mut ctl = SpinController::new(ManualScheduler::new(t0));
        let mut rng = StdRng::seed_from_u64(2);
        ctl.spin(&outcomes(4), SpinMode::Random, 0.1, DURATION, &mut rng, t0);

        let mut last = ctl.state().rotation;
        for t in (0..1200).step_by(7) {
            let now = ms(t0, t);
            for wake in ctl.scheduler_mut().advance_to(now) {
                ctl.handle(wake, now);
            }
            assert!(ctl.state().rotation >= last);
            last = ctl.state().rotation;
        }
    }

    #[test]
    fn test_second_spin_is_rejected_while_spinning() {
        let t0 = Instant::now();
        let mut ctl = SpinController::new(ManualScheduler::new(t0));
        let mut rng = StdRng::seed_from_u64(3);
        let wheel = outcomes(5);

        ctl.spin(&wheel, SpinMode::Random, 0.1, DURATION, &mut rng, t0)
            .unwrap();
        let before = *ctl.state();
        let run = ctl.current_run();
        assert!(
            ctl.spin(&wheel, SpinMode::Random, 0.1, DURATION, &mut rng, ms(t0, 10))
                .is_none()
        );
        assert_eq!(*ctl.state(), before);
        assert_eq!(ctl.current_run(), run);

        let announced = drive(&mut ctl, t0, 3000, 20);
        assert_eq!(announced.len(), 1);
    }

    #[test]
    fn test_frame_and_fallback_finalize_once() {
        let t0 = Instant::now();
        let mut ctl = SpinController::new(ManualScheduler::new(t0));
        let mut rng = StdRng::seed_from_u64(4);
        let run = ctl
            .spin(&outcomes(3), SpinMode::Random, 0.1, DURATION, &mut rng, t0)
            .unwrap();

        // the display stalls, then frame and fallback arrive together
        let late = ms(t0, 2500);
        assert!(ctl.handle(Wake::new(run, WakeKind::Frame), late).is_none());
        assert!(ctl.handle(Wake::new(run, WakeKind::Fallback), late).is_none());
        assert!(ctl.handle(Wake::new(run, WakeKind::Frame), late).is_none());

        let chosen = ctl.state().chosen.unwrap();
        let settle = Wake::new(run, WakeKind::Settle);
        assert_eq!(ctl.handle(settle, ms(t0, 3000)), Some(chosen));
        assert_eq!(ctl.handle(settle, ms(t0, 3001)), None);
    }

    #[test]
    fn test_fallback_completes_starved_spin() {
        let t0 = Instant::now();
        let mut ctl = SpinController::new(ManualScheduler::new(t0));
        let mut rng = StdRng::seed_from_u64(5);
        ctl.spin(&outcomes(8), SpinMode::Random, 0.1, DURATION, &mut rng, t0)
            .unwrap();

        let mut announced = Vec::new();
        for t in [100, 1500, 1999, 2000, 2600] {
            let now = ms(t0, t);
            for wake in ctl.scheduler_mut().advance_starved(now) {
                announced.extend(ctl.handle(wake, now));
            }
        }
        let state = *ctl.state();
        assert!(!state.is_spinning);
        assert_eq!(state.rotation, state.target_rotation);
        assert_eq!(announced, vec![state.chosen.unwrap()]);
    }

    #[test]
    fn test_stale_wakes_do_not_touch_new_spin() {
        let t0 = Instant::now();
        let mut ctl = SpinController::new(ManualScheduler::new(t0));
        let mut rng = StdRng::seed_from_u64(6);
        let wheel = outcomes(4);

        let first = ctl
            .spin(&wheel, SpinMode::Random, 0.1, DURATION, &mut rng, t0)
            .unwrap();
        drive(&mut ctl, t0, 1100, 50);
        assert!(!ctl.state().is_spinning);

        let t1 = ms(t0, 1200);
        let second = ctl
            .spin(&wheel, SpinMode::Random, 0.1, DURATION, &mut rng, t1)
            .unwrap();
        assert_ne!(first, second);
        let snapshot = *ctl.state();

        ctl.handle(Wake::new(first, WakeKind::Frame), ms(t0, 5000));
        ctl.handle(Wake::new(first, WakeKind::Fallback), ms(t0, 5000));
        assert_eq!(*ctl.state(), snapshot);
    }

    #[test]
    fn test_settle_of_previous_spin_survives_new_spin() {
        let t0 = Instant::now();
        let mut ctl = SpinController::new(ManualScheduler::new(t0));
        let mut rng = StdRng::seed_from_u64(7);
        let wheel = outcomes(4);

        let first = ctl
            .spin(&wheel, SpinMode::Random, 0.1, DURATION, &mut rng, t0)
            .unwrap();
        ctl.handle(Wake::new(first, WakeKind::Frame), ms(t0, 1000));
        let first_choice = ctl.state().chosen.unwrap();

        ctl.spin(&wheel, SpinMode::Random, 0.1, DURATION, &mut rng, ms(t0, 1100))
            .unwrap();
        assert_eq!(
            ctl.handle(Wake::new(first, WakeKind::Settle), ms(t0, 1500)),
            Some(first_choice)
        );
    }

    #[test]
    fn test_dispose_suppresses_outcome() {
        let t0 = Instant::now();
        let mut ctl = SpinController::new(ManualScheduler::new(t0));
        let mut rng = StdRng::seed_from_u64(8);
        let wheel = outcomes(4);
        let run = ctl
            .spin(&wheel, SpinMode::Random, 0.1, DURATION, &mut rng, t0)
            .unwrap();
        ctl.handle(Wake::new(run, WakeKind::Frame), ms(t0, 1000));
        assert!(ctl.scheduler().is_armed(Wake::new(run, WakeKind::Settle)));

        ctl.dispose();
        assert!(!ctl.scheduler().is_armed(Wake::new(run, WakeKind::Settle)));
        assert_eq!(ctl.handle(Wake::new(run, WakeKind::Settle), ms(t0, 2000)), None);
        assert!(
            ctl.spin(&wheel, SpinMode::Random, 0.1, DURATION, &mut rng, ms(t0, 2000))
                .is_none()
        );
    }

    #[test]
    fn test_dispose_mid_spin_clears_timers() {
        let t0 = Instant::now();
        let mut ctl = SpinController::new(ManualScheduler::new(t0));
        let mut rng = StdRng::seed_from_u64(9);
        let run = ctl
            .spin(&outcomes(2), SpinMode::Random, 0.1, DURATION, &mut rng, t0)
            .unwrap();
        ctl.dispose();
        assert!(!ctl.scheduler().is_armed(Wake::new(run, WakeKind::Fallback)));
        assert_eq!(ctl.scheduler().pending_frames(), 0);
        assert!(!ctl.state().is_spinning);
    }

    #[test]
    fn test_empty_wheel_is_noop() {
        let t0 = Instant::now();
        let mut ctl = SpinController::new(ManualScheduler::new(t0));
        let mut rng = StdRng::seed_from_u64(10);
        assert!(
            ctl.spin(&[], SpinMode::Probability, 0.1, DURATION, &mut rng, t0)
                .is_none()
        );
        assert_eq!(*ctl.state(), SpinState::default());
        assert_eq!(ctl.scheduler().pending_frames(), 0);
    }
}
