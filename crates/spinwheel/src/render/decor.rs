use super::{WheelGeometry, screen_angle, set_color, set_rgba};
use crate::registry::color::darken;
use crate::registry::{Background, Theme};
use cairo::{Context, Operator, RadialGradient};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::WithAlpha;
use std::f64::consts::TAU;

/// Bulb chase steps per second.
pub const CHASE_RATE: f64 = 4.0;
/// Inner edge of the depth shadow, relative to the radius.
const SHADOW_START: f64 = 0.72;
/// Center cap radius relative to the wheel radius.
pub const CAP_RATIO: f64 = 0.12;

pub fn clear(cr: &Context) -> Result<(), cairo::Error> {
    cr.save()?;
    cr.set_operator(Operator::Clear);
    cr.paint()?;
    cr.restore()
}

pub fn draw_background(cr: &Context, g: &WheelGeometry, theme: &Theme) -> Result<(), cairo::Error> {
    let outer = g.radius + g.rim;
    cr.new_path();
    cr.arc(g.cx, g.cy, outer, 0.0, TAU);
    match theme.background {
        Background::Flat(color) => {
            set_color(cr, color);
            cr.fill()
        }
        Background::Radial { inner, outer: edge } => {
            let gradient = RadialGradient::new(g.cx, g.cy, 0.0, g.cx, g.cy, outer);
            let (r, gr, b) = inner.into_components();
            gradient.add_color_stop_rgb(0.0, r, gr, b);
            let (r, gr, b) = edge.into_components();
            gradient.add_color_stop_rgb(1.0, r, gr, b);
            cr.set_source(&gradient)?;
            cr.fill()
        }
    }
}

pub fn draw_inner_shadow(cr: &Context, g: &WheelGeometry, theme: &Theme) -> Result<(), cairo::Error> {
    let gradient = RadialGradient::new(g.cx, g.cy, g.radius * SHADOW_START, g.cx, g.cy, g.radius);
    let (r, gr, b, a) = theme.inner_shadow.into_components();
    gradient.add_color_stop_rgba(0.0, r, gr, b, 0.0);
    gradient.add_color_stop_rgba(1.0, r, gr, b, a);
    cr.new_path();
    cr.arc(g.cx, g.cy, g.radius, 0.0, TAU);
    cr.set_source(&gradient)?;
    cr.fill()
}

/// Alternate bulbs light up, swapping `CHASE_RATE` times per second.
pub fn bulb_lit(index: usize, elapsed: f64) -> bool {
    let phase = (elapsed.max(0.0) * CHASE_RATE).floor() as usize;
    (index + phase) % 2 == 0
}

pub fn draw_bulbs(
    cr: &Context,
    g: &WheelGeometry,
    count: usize,
    rotation: f64,
    elapsed: f64,
    theme: &Theme,
) -> Result<(), cairo::Error> {
    if count == 0 {
        return Ok(());
    }
    let track = g.radius + g.rim / 2.0;
    let size = (g.rim * 0.35).min(g.radius * 0.03).max(1.5);

    for i in 0..count {
        let angle = screen_angle(i as f64 * 360.0 / count as f64, rotation);
        let (x, y) = g.point_at(angle, track);
        let lit = bulb_lit(i, elapsed);

        if lit {
            cr.new_path();
            cr.arc(x, y, size * 2.2, 0.0, TAU);
            set_rgba(cr, theme.bulb_on.with_alpha(0.3));
            cr.fill()?;
        }
        cr.new_path();
        cr.arc(x, y, size, 0.0, TAU);
        set_color(cr, if lit { theme.bulb_on } else { theme.bulb_off });
        cr.fill()?;

        // specular dot
        cr.arc(x - size * 0.3, y - size * 0.3, size * 0.35, 0.0, TAU);
        cr.set_source_rgba(1.0, 1.0, 1.0, if lit { 0.8 } else { 0.35 });
        cr.fill()?;
    }
    Ok(())
}

pub fn draw_center(
    cr: &Context,
    g: &WheelGeometry,
    image: Option<&Pixbuf>,
    theme: &Theme,
) -> Result<(), cairo::Error> {
    let cap = g.radius * CAP_RATIO;
    match image {
        Some(image) if image.width() > 0 && image.height() > 0 => {
            let (iw, ih) = (image.width() as f64, image.height() as f64);
            cr.save()?;
            cr.new_path();
            cr.arc(g.cx, g.cy, cap, 0.0, TAU);
            cr.clip();
            let scale = (2.0 * cap / iw).max(2.0 * cap / ih);
            cr.translate(g.cx, g.cy);
            cr.scale(scale, scale);
            cr.set_source_pixbuf(image, -iw / 2.0, -ih / 2.0);
            cr.paint()?;
            cr.restore()
        }
        _ => {
            let gradient = RadialGradient::new(
                g.cx - cap * 0.35,
                g.cy - cap * 0.35,
                cap * 0.1,
                g.cx,
                g.cy,
                cap,
            );
            let (r, gr, b) = theme.center_highlight.into_components();
            gradient.add_color_stop_rgb(0.0, r, gr, b);
            let (r, gr, b) = theme.center_base.into_components();
            gradient.add_color_stop_rgb(1.0, r, gr, b);

            cr.new_path();
            cr.arc(g.cx, g.cy, cap, 0.0, TAU);
            cr.set_source(&gradient)?;
            cr.fill_preserve()?;
            set_color(cr, darken(theme.center_base, 0.3));
            cr.set_line_width((cap * 0.08).max(1.0));
            cr.stroke()
        }
    }
}
