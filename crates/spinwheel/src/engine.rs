use crate::config::WheelConfig;
use crate::controller::{SpinController, SpinState};
use crate::error::AssetError;
use crate::outcome::{AssetUrl, Outcome};
use crate::render::Renderer;
use crate::render::assets::{AssetFetcher, NoFetch};
use crate::scheduler::{ManualScheduler, RunId, SpinScheduler, Wake};
use cairo::Context;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::rc::Rc;
use std::time::Instant;

pub type OutcomeCallback = Box<dyn FnMut(&Outcome)>;

/// A wheel: controller, renderer and the outcome list they share.
///
/// Single threaded. The host delivers scheduler callbacks through `wake`
/// and paints whenever it likes; painting never changes spin state.
pub struct WheelEngine<S: SpinScheduler> {
    config: WheelConfig,
    outcomes: Rc<[Outcome]>,
    controller: SpinController<S>,
    renderer: Renderer,
    rng: StdRng,
    /// Outcome lists of spins whose result has not been announced yet.
    in_flight: Vec<(RunId, Rc<[Outcome]>)>,
    on_outcome: OutcomeCallback,
}

impl<S: SpinScheduler> WheelEngine<S> {
    pub fn new(config: WheelConfig, scheduler: S, on_outcome: impl FnMut(&Outcome) + 'static) -> Self {
        let renderer = Renderer::new(&config, Box::new(NoFetch), Instant::now());
        Self {
            outcomes: config.outcomes.clone().into(),
            config,
            controller: SpinController::new(scheduler),
            renderer,
            rng: StdRng::from_os_rng(),
            in_flight: Vec::new(),
            on_outcome: Box::new(on_outcome),
        }
    }

    /// Routes asset requests to `fetcher`. Results come back via `asset_loaded`.
    pub fn with_fetcher(mut self, fetcher: Box<dyn AssetFetcher>) -> Self {
        self.renderer = Renderer::new(&self.config, fetcher, Instant::now());
        self
    }

    /// Makes outcome selection reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn state(&self) -> &SpinState {
        self.controller.state()
    }

    pub fn is_spinning(&self) -> bool {
        self.controller.state().is_spinning
    }

    /// Outcome the wheel rests on after the last completed spin.
    pub fn chosen_outcome(&self) -> Option<&Outcome> {
        let state = self.controller.state();
        if state.is_spinning {
            return None;
        }
        state.chosen.and_then(|i| self.outcomes.get(i))
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn scheduler(&self) -> &S {
        self.controller.scheduler()
    }

    /// Starts a spin. A no-op while spinning, on an empty wheel or after
    /// `dispose`.
    pub fn spin(&mut self, now: Instant) -> Option<RunId> {
        let run = self.controller.spin(
            &self.outcomes,
            self.config.spin_mode,
            self.config.win_rate(),
            self.config.effective_duration(),
            &mut self.rng,
            now,
        )?;
        self.in_flight.push((run, Rc::clone(&self.outcomes)));
        log::info!(
            "spinning {} outcomes ({} mode, {} speed)",
            self.outcomes.len(),
            self.config.spin_mode,
            self.config.speed
        );
        Some(run)
    }

    /// Delivers a scheduler callback. Returns true when it announced an
    /// outcome.
    pub fn wake(&mut self, wake: Wake, now: Instant) -> bool {
        let Some(index) = self.controller.handle(wake, now) else {
            return false;
        };
        let Some(pos) = self.in_flight.iter().position(|(run, _)| *run == wake.run) else {
            return false;
        };
        let (_, outcomes) = self.in_flight.remove(pos);
        match outcomes.get(index) {
            Some(outcome) => {
                log::info!("outcome: '{}' ({})", outcome.label, outcome.id);
                (self.on_outcome)(outcome);
                true
            }
            None => {
                log::warn!("{} settled on out of range index {}", wake.run, index);
                false
            }
        }
    }

    pub fn paint(&mut self, cr: &Context, width: f64, height: f64, now: Instant) -> Result<(), cairo::Error> {
        let state = *self.controller.state();
        self.renderer
            .paint(cr, width, height, &state, &self.outcomes, now)
    }

    /// Returns true when the image became ready and a repaint is worthwhile.
    pub fn asset_loaded(&mut self, url: &AssetUrl, result: Result<Vec<u8>, AssetError>) -> bool {
        self.renderer.asset_loaded(url, result)
    }

    /// Replaces the configuration. Refused while a spin is running.
    pub fn reconfigure(&mut self, config: WheelConfig) -> bool {
        if self.is_spinning() {
            log::warn!("ignoring configuration change during a spin");
            return false;
        }
        self.renderer.reconfigure(&config);
        self.outcomes = config.outcomes.clone().into();
        self.config = config;
        log::info!("wheel reconfigured with {} outcomes", self.outcomes.len());
        true
    }

    /// Stops the wheel and drops pending announcements.
    pub fn dispose(&mut self) {
        self.controller.dispose();
        self.in_flight.clear();
    }

    pub fn is_disposed(&self) -> bool {
        self.controller.is_disposed()
    }
}

impl WheelEngine<ManualScheduler> {
    /// Fires every callback due at `now`. Returns the number of outcomes
    /// announced.
    pub fn pump(&mut self, now: Instant) -> usize {
        let wakes = self.controller.scheduler_mut().advance_to(now);
        wakes.into_iter().filter(|w| self.wake(*w, now)).count()
    }

    /// Like `pump` but drops frame callbacks, as a throttled host would.
    pub fn pump_starved(&mut self, now: Instant) -> usize {
        let wakes = self.controller.scheduler_mut().advance_starved(now);
        wakes.into_iter().filter(|w| self.wake(*w, now)).count()
    }
}
