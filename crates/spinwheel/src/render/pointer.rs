use super::{WheelGeometry, set_color, set_rgba};
use crate::registry::Theme;
use crate::registry::color::{darken, lighten};
use cairo::{Context, LinearGradient};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::WithAlpha;

/// Rest position of the pointer tip, slightly leaning against the wheel.
pub const REST_ANGLE: f64 = -0.08;
/// Spring constant pulling the tip back to rest (1/s^2).
pub const STIFFNESS: f64 = 220.0;
/// Velocity damping (1/s).
pub const DAMPING: f64 = 16.0;
/// Impulse per notch, scaled by sqrt(wheel speed in deg/s).
pub const IMPULSE_GAIN: f64 = 0.55;
pub const MAX_IMPULSE: f64 = 12.0;
pub const MAX_DEFLECTION: f64 = 0.6;
/// Longest frame gap fed into the integrator.
pub const MAX_FRAME_STEP: f64 = 1.0 / 30.0;
const SUBSTEP: f64 = 1.0 / 240.0;

/// Spring-damper model of the pointer tip ticking over sector notches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPhysics {
    pub angle: f64,
    pub angular_velocity: f64,
    pub last_notch: Option<i64>,
    last_rotation: Option<f64>,
}

impl Default for PointerPhysics {
    fn default() -> Self {
        Self::neutral()
    }
}

impl PointerPhysics {
    pub fn neutral() -> Self {
        Self {
            angle: REST_ANGLE,
            angular_velocity: 0.0,
            last_notch: None,
            last_rotation: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::neutral();
    }

    pub fn is_at_rest(&self) -> bool {
        (self.angle - REST_ANGLE).abs() < 1e-4 && self.angular_velocity.abs() < 1e-3
    }

    /// Advances the simulation by `dt` seconds with the wheel at `rotation`
    /// degrees and `notches` evenly spaced notches.
    pub fn step(&mut self, rotation: f64, notches: usize, dt: f64) {
        let dt = dt.clamp(0.0, MAX_FRAME_STEP);
        let spacing = 360.0 / notches.max(1) as f64;
        let notch = (rotation / spacing).floor() as i64;

        if let (Some(prev_notch), Some(prev_rotation)) = (self.last_notch, self.last_rotation)
            && notch != prev_notch
            && dt > 0.0
        {
            let speed = (rotation - prev_rotation).abs() / dt;
            let crossed = (notch - prev_notch).unsigned_abs() as f64;
            let impulse = (IMPULSE_GAIN * speed.sqrt()).min(MAX_IMPULSE);
            // the tip is dragged along with the wheel, against the spring
            self.angular_velocity -= impulse * crossed.min(2.0);
        }
        self.last_notch = Some(notch);
        self.last_rotation = Some(rotation);

        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(SUBSTEP);
            let accel =
                -STIFFNESS * (self.angle - REST_ANGLE) - DAMPING * self.angular_velocity;
            self.angular_velocity += accel * h;
            self.angle += self.angular_velocity * h;
            remaining -= h;
        }

        let lo = REST_ANGLE - MAX_DEFLECTION;
        let hi = REST_ANGLE + MAX_DEFLECTION;
        if self.angle < lo || self.angle > hi {
            self.angle = self.angle.clamp(lo, hi);
            self.angular_velocity = 0.0;
        }
    }
}

/// Pointer box size relative to the wheel radius.
fn pointer_size(geometry: &WheelGeometry) -> (f64, f64) {
    (geometry.radius * 0.16, geometry.radius * 0.22)
}

/// Draws the pointer at 12 o'clock, rotated about its pivot by `angle`.
pub fn draw_pointer(
    cr: &Context,
    geometry: &WheelGeometry,
    angle: f64,
    image: Option<&Pixbuf>,
    theme: &Theme,
) -> Result<(), cairo::Error> {
    let (width, height) = pointer_size(geometry);
    let pivot_y = geometry.cy - geometry.radius - geometry.rim * 0.5 - height * 0.35;

    cr.save()?;
    cr.translate(geometry.cx, pivot_y);
    cr.rotate(angle);
    let result = match image {
        Some(image) => draw_image_pointer(cr, image, width, height),
        None => draw_procedural_pointer(cr, width, height, theme),
    };
    cr.restore()?;
    result
}

fn draw_image_pointer(
    cr: &Context,
    image: &Pixbuf,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let (iw, ih) = (image.width() as f64, image.height() as f64);
    if iw <= 0.0 || ih <= 0.0 {
        return Ok(());
    }
    let scale = (width / iw).min(height / ih);
    let (dw, dh) = (iw * scale, ih * scale);

    cr.save()?;
    cr.translate(-dw / 2.0, -dh * 0.35);
    cr.scale(scale, scale);
    cr.set_source_pixbuf(image, 0.0, 0.0);
    cr.paint()?;
    cr.restore()
}

fn triangle(cr: &Context, width: f64, height: f64) {
    let top = -height * 0.35;
    cr.move_to(-width / 2.0, top);
    cr.line_to(width / 2.0, top);
    cr.line_to(0.0, top + height);
    cr.close_path();
}

fn draw_procedural_pointer(
    cr: &Context,
    width: f64,
    height: f64,
    theme: &Theme,
) -> Result<(), cairo::Error> {
    // drop shadow
    cr.save()?;
    cr.translate(1.5, 2.5);
    triangle(cr, width, height);
    set_rgba(cr, palette::Srgb::new(0.0, 0.0, 0.0).with_alpha(0.35));
    cr.fill()?;
    cr.restore()?;

    // body
    let body = LinearGradient::new(-width / 2.0, 0.0, width / 2.0, 0.0);
    let (lr, lg, lb) = theme.pointer_light.into_components();
    let (dr, dg, db) = theme.pointer_dark.into_components();
    body.add_color_stop_rgb(0.0, lr, lg, lb);
    body.add_color_stop_rgb(0.55, dr, dg, db);
    let (er, eg, eb) = darken(theme.pointer_dark, 0.25).into_components();
    body.add_color_stop_rgb(1.0, er, eg, eb);
    triangle(cr, width, height);
    cr.set_source(&body)?;
    cr.fill_preserve()?;
    set_color(cr, darken(theme.pointer_dark, 0.4));
    cr.set_line_width(1.5);
    cr.stroke()?;

    // highlight down the left flank
    let top = -height * 0.35;
    cr.move_to(-width * 0.38, top + height * 0.06);
    cr.line_to(-width * 0.05, top + height * 0.06);
    cr.line_to(-width * 0.02, top + height * 0.8);
    cr.close_path();
    set_rgba(cr, lighten(theme.pointer_light, 0.3).with_alpha(0.45));
    cr.fill()?;

    // sheen across the base
    let sheen = LinearGradient::new(0.0, top, 0.0, top + height * 0.3);
    sheen.add_color_stop_rgba(0.0, 1.0, 1.0, 1.0, 0.55);
    sheen.add_color_stop_rgba(1.0, 1.0, 1.0, 1.0, 0.0);
    cr.rectangle(-width / 2.0 + 2.0, top + 1.0, width - 4.0, height * 0.3);
    cr.set_source(&sheen)?;
    cr.fill()?;

    // rivet
    cr.arc(0.0, top + height * 0.18, width * 0.09, 0.0, std::f64::consts::TAU);
    set_color(cr, lighten(theme.pointer_light, 0.2));
    cr.fill()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_state_is_at_rest() {
        let p = PointerPhysics::neutral();
        assert_eq!(p.angle, REST_ANGLE);
        assert!(p.is_at_rest());
        assert_eq!(p.last_notch, None);
    }

    #[test]
    fn test_stationary_wheel_stays_at_rest() {
        let mut p = PointerPhysics::neutral();
        for _ in 0..120 {
            p.step(45.0, 8, 1.0 / 60.0);
        }
        assert!(p.is_at_rest());
    }

    #[test]
    fn test_notch_crossing_kicks_pointer() {
        let mut p = PointerPhysics::neutral();
        p.step(40.0, 8, 1.0 / 60.0);
        // 45 deg spacing: 40 -> 50 crosses a notch
        p.step(50.0, 8, 1.0 / 60.0);
        assert!(p.angular_velocity < 0.0);
        assert!(p.angle < REST_ANGLE);
    }

    #[test]
    fn test_impulse_grows_with_wheel_speed() {
        let kick = |delta: f64| {
            let mut p = PointerPhysics::neutral();
            p.step(44.0, 8, 1.0 / 60.0);
            p.step(44.0 + delta, 8, 1.0 / 60.0);
            p.angle
        };
        // faster crossing deflects further, but sub-linearly
        let slow = REST_ANGLE - kick(2.0);
        let fast = REST_ANGLE - kick(8.0);
        assert!(fast > slow);
        assert!(fast < slow * 4.0);
    }

    #[test]
    fn test_spring_returns_to_rest() {
        let mut p = PointerPhysics::neutral();
        p.step(0.0, 12, 1.0 / 60.0);
        p.step(40.0, 12, 1.0 / 60.0);
        assert!(!p.is_at_rest());
        for _ in 0..600 {
            p.step(40.0, 12, 1.0 / 60.0);
        }
        assert!(p.is_at_rest());
    }

    #[test]
    fn test_deflection_is_bounded() {
        let mut p = PointerPhysics::neutral();
        let mut rotation = 0.0;
        for _ in 0..200 {
            rotation += 50.0;
            p.step(rotation, 36, 1.0 / 60.0);
            assert!(p.angle >= REST_ANGLE - MAX_DEFLECTION - 1e-12);
            assert!(p.angle <= REST_ANGLE + MAX_DEFLECTION + 1e-12);
        }
    }

    #[test]
    fn test_reset_restores_neutral() {
        let mut p = PointerPhysics::neutral();
        p.step(0.0, 4, 1.0 / 60.0);
        p.step(100.0, 4, 1.0 / 60.0);
        p.reset();
        assert_eq!(p, PointerPhysics::neutral());
    }
}
