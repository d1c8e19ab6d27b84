use super::{WheelGeometry, set_color, set_rgba};
use crate::registry::color::{darken, hue, lighten};
use crate::registry::{BorderEffects, BorderKind, BorderStyleDefinition};
use cairo::{Context, Extend, FillRule, LinearGradient};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::{Srgb, WithAlpha};
use std::f64::consts::TAU;

/// Arc segments used to approximate the rainbow sweep.
const RAINBOW_SEGMENTS: usize = 72;
/// Hue advance of the animated ring (deg/s).
const RAINBOW_SPEED: f64 = 90.0;
const NEON_LAYERS: usize = 4;

/// Inner and outer radius of the border ring.
pub fn ring_bounds(g: &WheelGeometry) -> (f64, f64) {
    (g.radius, g.radius + g.rim)
}

/// Hue of rainbow segment `index` at `elapsed` seconds.
pub fn rainbow_hue(index: usize, segments: usize, elapsed: f64) -> f64 {
    let base = index as f64 * 360.0 / segments.max(1) as f64;
    (base + elapsed * RAINBOW_SPEED).rem_euclid(360.0)
}

fn ring_path(cr: &Context, g: &WheelGeometry) {
    cr.new_path();
    cr.arc(g.cx, g.cy, g.radius + g.rim / 2.0, 0.0, TAU);
}

fn stroke_ring(cr: &Context, g: &WheelGeometry, width: f64) -> Result<(), cairo::Error> {
    ring_path(cr, g);
    cr.set_line_width(width);
    cr.stroke()
}

fn linear_across(g: &WheelGeometry, stops: &[(f64, Srgb<f64>)], diagonal: bool) -> LinearGradient {
    let outer = g.radius + g.rim;
    let gradient = if diagonal {
        LinearGradient::new(g.cx - outer, g.cy - outer, g.cx + outer, g.cy + outer)
    } else {
        LinearGradient::new(g.cx, g.cy - outer, g.cx, g.cy + outer)
    };
    for (offset, color) in stops {
        let (r, gr, b) = color.into_components();
        gradient.add_color_stop_rgb(*offset, r, gr, b);
    }
    gradient
}

pub fn draw_border(
    cr: &Context,
    g: &WheelGeometry,
    style: &BorderStyleDefinition,
    pattern: Option<&Pixbuf>,
    elapsed: f64,
) -> Result<(), cairo::Error> {
    if g.rim <= 0.0 {
        return Ok(());
    }
    cr.save()?;
    if style.effects.contains(BorderEffects::SHADOW) {
        draw_shadow(cr, g)?;
    }
    if style.effects.contains(BorderEffects::GLOW) && style.kind != BorderKind::Neon {
        let color = match style.kind {
            BorderKind::Animated => hue(rainbow_hue(0, 1, elapsed)),
            _ => style.primary(),
        };
        draw_glow(cr, g, color, 2)?;
    }

    let result = match style.kind {
        BorderKind::Solid => {
            set_color(cr, style.primary());
            stroke_ring(cr, g, g.rim)
        }
        BorderKind::Gradient => {
            cr.set_source(&linear_across(g, &style.gradient_stops(), true))?;
            stroke_ring(cr, g, g.rim)
        }
        BorderKind::Metallic => draw_metallic(cr, g, style),
        BorderKind::Luxury => draw_luxury(cr, g, style),
        BorderKind::Neon => draw_neon(cr, g, style.primary()),
        BorderKind::Animated => draw_rainbow(cr, g, elapsed),
        BorderKind::ImagePattern => match pattern {
            Some(image) => draw_pattern(cr, g, image),
            None => {
                set_color(cr, style.primary());
                stroke_ring(cr, g, g.rim)
            }
        },
    };
    cr.restore()?;
    result
}

fn draw_shadow(cr: &Context, g: &WheelGeometry) -> Result<(), cairo::Error> {
    cr.save()?;
    cr.translate(0.0, g.rim * 0.25 + 1.0);
    cr.set_source_rgba(0.0, 0.0, 0.0, 0.25);
    stroke_ring(cr, g, g.rim + 2.0)?;
    cr.restore()
}

fn draw_glow(cr: &Context, g: &WheelGeometry, color: Srgb<f64>, layers: usize) -> Result<(), cairo::Error> {
    for k in (1..=layers).rev() {
        let spread = k as f64 * g.rim * 0.8;
        set_rgba(cr, color.with_alpha(0.3 / (k as f64 + 1.0)));
        stroke_ring(cr, g, g.rim + spread)?;
    }
    Ok(())
}

fn draw_overlay(cr: &Context, g: &WheelGeometry) -> Result<(), cairo::Error> {
    // bright band along the outer third of the ring
    cr.new_path();
    cr.arc(g.cx, g.cy, g.radius + g.rim * 0.78, 0.0, TAU);
    cr.set_source_rgba(1.0, 1.0, 1.0, 0.45);
    cr.set_line_width((g.rim * 0.2).max(1.0));
    cr.stroke()
}

fn draw_metallic(cr: &Context, g: &WheelGeometry, style: &BorderStyleDefinition) -> Result<(), cairo::Error> {
    cr.set_source(&linear_across(g, &style.gradient_stops(), false))?;
    stroke_ring(cr, g, g.rim)?;
    if style.effects.contains(BorderEffects::METALLIC) {
        draw_overlay(cr, g)?;
    }
    Ok(())
}

fn draw_luxury(cr: &Context, g: &WheelGeometry, style: &BorderStyleDefinition) -> Result<(), cairo::Error> {
    draw_metallic(cr, g, style)?;

    // fine dark edges on both sides of the band
    let edge = darken(style.primary(), 0.2);
    set_color(cr, edge);
    cr.set_line_width((g.rim * 0.08).max(1.0));
    for r in [g.radius + 0.5, g.radius + g.rim - 0.5] {
        cr.new_path();
        cr.arc(g.cx, g.cy, r, 0.0, TAU);
        cr.stroke()?;
    }

    // jewel studs
    let studs = 24;
    let mid = g.radius + g.rim / 2.0;
    let stud = lighten(style.colors.get(2).copied().unwrap_or_else(|| style.primary()), 0.1);
    set_color(cr, stud);
    for i in 0..studs {
        let angle = i as f64 * TAU / studs as f64;
        let (x, y) = g.point_at(angle, mid);
        cr.new_path();
        cr.arc(x, y, g.rim * 0.14, 0.0, TAU);
        cr.fill()?;
    }
    Ok(())
}

fn draw_neon(cr: &Context, g: &WheelGeometry, color: Srgb<f64>) -> Result<(), cairo::Error> {
    draw_glow(cr, g, color, NEON_LAYERS)?;
    set_color(cr, color);
    stroke_ring(cr, g, g.rim)?;
    // hot core
    set_rgba(cr, lighten(color, 0.4).with_alpha(0.9));
    stroke_ring(cr, g, g.rim * 0.35)
}

fn draw_rainbow(cr: &Context, g: &WheelGeometry, elapsed: f64) -> Result<(), cairo::Error> {
    let mid = g.radius + g.rim / 2.0;
    let step = TAU / RAINBOW_SEGMENTS as f64;
    cr.set_line_width(g.rim);
    for i in 0..RAINBOW_SEGMENTS {
        let start = i as f64 * step;
        cr.new_path();
        // overlap slightly so no seams show between segments
        cr.arc(g.cx, g.cy, mid, start, start + step * 1.05);
        set_color(cr, hue(rainbow_hue(i, RAINBOW_SEGMENTS, elapsed)));
        cr.stroke()?;
    }
    Ok(())
}

fn draw_pattern(cr: &Context, g: &WheelGeometry, image: &Pixbuf) -> Result<(), cairo::Error> {
    let (inner, outer) = ring_bounds(g);
    let ih = image.height() as f64;
    if ih <= 0.0 {
        return Ok(());
    }

    cr.save()?;
    cr.new_path();
    cr.arc(g.cx, g.cy, outer, 0.0, TAU);
    cr.new_sub_path();
    cr.arc_negative(g.cx, g.cy, inner, TAU, 0.0);
    cr.set_fill_rule(FillRule::EvenOdd);
    cr.clip();

    // one tile spans the ring thickness
    let scale = g.rim / ih;
    cr.translate(g.cx - outer, g.cy - outer);
    cr.scale(scale, scale);
    cr.set_source_pixbuf(image, 0.0, 0.0);
    cr.source().set_extend(Extend::Repeat);
    cr.paint()?;
    cr.restore()
}
