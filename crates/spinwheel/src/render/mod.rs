use crate::config::{AssetRefs, WheelConfig};
use crate::controller::SpinState;
use crate::error::AssetError;
use crate::outcome::{AssetUrl, Outcome};
use crate::registry::{BorderStyleDefinition, Theme, border, theme};
use cairo::Context;
use palette::{Srgb, Srgba};
use std::time::Instant;

pub mod assets;
pub mod decor;
pub mod pointer;
pub mod ring;
pub mod sectors;

use assets::{AssetCache, AssetFetcher};
use pointer::PointerPhysics;

/// Fraction of the surface reserved above the rim for the pointer.
pub const POINTER_MARGIN: f64 = 0.09;

pub(crate) fn set_color(cr: &Context, color: Srgb<f64>) {
    let (r, g, b) = color.into_components();
    cr.set_source_rgb(r, g, b);
}

pub(crate) fn set_rgba(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// Wheel degrees (clockwise from 12 o'clock) plus rotation, in cairo radians.
pub fn screen_angle(wheel_degrees: f64, rotation: f64) -> f64 {
    (wheel_degrees + rotation - 90.0).to_radians()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    pub cx: f64,
    pub cy: f64,
    /// Radius of the sector disc.
    pub radius: f64,
    /// Thickness of the border ring outside `radius`.
    pub rim: f64,
}

impl WheelGeometry {
    /// Largest wheel that fits a `width` x `height` surface with room for the
    /// pointer on top.
    pub fn fit(width: f64, height: f64, rim: f64) -> Self {
        let size = width.min(height).max(1.0);
        let margin = size * POINTER_MARGIN;
        Self {
            cx: width / 2.0,
            cy: height / 2.0 + margin * 0.25,
            radius: (size / 2.0 - margin - rim).max(1.0),
            rim,
        }
    }

    pub fn point_at(&self, angle: f64, distance: f64) -> (f64, f64) {
        (
            self.cx + distance * angle.cos(),
            self.cy + distance * angle.sin(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub show_bulbs: bool,
    pub bulb_count: usize,
    pub disable_pointer_physics: bool,
    pub freeze_pointer_during_spin: bool,
    pub pattern_min_thickness: f64,
}

impl From<&WheelConfig> for RenderOptions {
    fn from(config: &WheelConfig) -> Self {
        Self {
            show_bulbs: config.show_decorative_bulbs,
            bulb_count: config.bulb_count,
            disable_pointer_physics: config.disable_pointer_physics,
            freeze_pointer_during_spin: config.freeze_pointer_during_spin,
            pattern_min_thickness: config.pattern_min_thickness,
        }
    }
}

/// Paints the wheel from a read-only `SpinState`. Owns the asset cache and the
/// pointer simulation; neither is visible to the controller.
pub struct Renderer {
    theme: &'static Theme,
    border: &'static BorderStyleDefinition,
    options: RenderOptions,
    refs: AssetRefs,
    assets: AssetCache,
    pointer: PointerPhysics,
    epoch: Instant,
    last_paint: Option<Instant>,
    was_spinning: bool,
}

impl Renderer {
    pub fn new(config: &WheelConfig, fetcher: Box<dyn AssetFetcher>, now: Instant) -> Self {
        Self {
            theme: theme::lookup(&config.theme),
            border: border::lookup(&config.border_style),
            options: RenderOptions::from(config),
            refs: config.assets.clone(),
            assets: AssetCache::new(fetcher),
            pointer: PointerPhysics::neutral(),
            epoch: now,
            last_paint: None,
            was_spinning: false,
        }
    }

    /// Swaps styling. The asset cache is kept so already loaded images are
    /// reused.
    pub fn reconfigure(&mut self, config: &WheelConfig) {
        self.theme = theme::lookup(&config.theme);
        self.border = border::lookup(&config.border_style);
        self.options = RenderOptions::from(config);
        self.refs = config.assets.clone();
        self.pointer.reset();
    }

    pub fn theme(&self) -> &'static Theme {
        self.theme
    }

    pub fn border(&self) -> &'static BorderStyleDefinition {
        self.border
    }

    pub fn pointer(&self) -> &PointerPhysics {
        &self.pointer
    }

    pub fn asset_loaded(&mut self, url: &AssetUrl, result: Result<Vec<u8>, AssetError>) -> bool {
        self.assets.complete(url, result)
    }

    pub fn geometry(&self, width: f64, height: f64) -> WheelGeometry {
        WheelGeometry::fit(width, height, self.rim())
    }

    fn rim(&self) -> f64 {
        if self.border.is_image_pattern() {
            self.border
                .stroke_width
                .max(self.options.pattern_min_thickness)
        } else {
            self.border.stroke_width
        }
    }

    fn update_pointer(&mut self, state: &SpinState, notches: usize, now: Instant) {
        let dt = self
            .last_paint
            .map(|t| now.saturating_duration_since(t).as_secs_f64())
            .unwrap_or(0.0);
        self.last_paint = Some(now);

        let started = state.is_spinning && !self.was_spinning;
        self.was_spinning = state.is_spinning;

        let frozen = self.options.disable_pointer_physics
            || (self.options.freeze_pointer_during_spin && state.is_spinning);
        if started || frozen {
            self.pointer.reset();
        }
        if !frozen {
            self.pointer.step(state.rotation, notches, dt);
        }
    }

    /// Paints one frame onto `cr`, a `width` x `height` surface.
    pub fn paint(
        &mut self,
        cr: &Context,
        width: f64,
        height: f64,
        state: &SpinState,
        outcomes: &[Outcome],
        now: Instant,
    ) -> Result<(), cairo::Error> {
        let geometry = self.geometry(width, height);
        let elapsed = now.saturating_duration_since(self.epoch).as_secs_f64();
        let rotation = state.rotation;

        self.update_pointer(state, outcomes.len(), now);

        decor::clear(cr)?;
        decor::draw_background(cr, &geometry, self.theme)?;

        if !outcomes.is_empty() {
            let fills = sectors::resolve_fills(outcomes, self.theme);
            sectors::draw_sectors(cr, &geometry, &fills, rotation, self.border, self.theme)?;
            if !state.is_spinning
                && let Some(chosen) = state.chosen
            {
                sectors::draw_highlight(cr, &geometry, chosen, outcomes.len(), rotation)?;
            }
            sectors::draw_images(cr, &geometry, outcomes, &fills, rotation, &mut self.assets)?;
            sectors::draw_labels(cr, &geometry, outcomes, &fills, rotation, self.theme)?;
        }

        let pattern = self.assets.get_opt(self.refs.border_pattern.as_ref()).cloned();
        ring::draw_border(
            cr,
            &geometry,
            self.border,
            pattern.as_ref(),
            elapsed,
        )?;

        decor::draw_inner_shadow(cr, &geometry, self.theme)?;
        if self.options.show_bulbs {
            decor::draw_bulbs(
                cr,
                &geometry,
                self.options.bulb_count,
                rotation,
                elapsed,
                self.theme,
            )?;
        }

        let center = self.assets.get_opt(self.refs.center.as_ref()).cloned();
        decor::draw_center(cr, &geometry, center.as_ref(), self.theme)?;

        let pointer_image = self.assets.get_opt(self.refs.pointer.as_ref()).cloned();
        pointer::draw_pointer(
            cr,
            &geometry,
            self.pointer.angle,
            pointer_image.as_ref(),
            self.theme,
        )
    }
}
