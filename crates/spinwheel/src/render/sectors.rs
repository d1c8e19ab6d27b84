use super::assets::AssetCache;
use super::{WheelGeometry, screen_angle, set_color, set_rgba};
use crate::controller::segment_angle;
use crate::outcome::{ContentType, Outcome};
use crate::registry::color::contrast_text;
use crate::registry::{BorderStyleDefinition, Theme};
use cairo::Context;
use gdk4::prelude::*;
use palette::Srgb;
use std::f64::consts::TAU;

/// Distance of an image circle's center from the hub, relative to the radius.
pub const IMAGE_CENTER_RATIO: f64 = 0.65;
/// Overscan applied to sector images so the clip edge never shows background.
pub const IMAGE_OVERSCAN: f64 = 1.02;
const ELLIPSIS: char = '\u{2026}';

/// Fill per outcome: its own color, else the theme color for its parity.
pub fn resolve_fills(outcomes: &[Outcome], theme: &Theme) -> Vec<Srgb<f64>> {
    outcomes
        .iter()
        .enumerate()
        .map(|(i, o)| match o.color {
            Some(color) => color.to_f64(),
            None => theme.segment_color(i),
        })
        .collect()
}

/// Label color: explicit override, else black or white against a custom fill,
/// else the theme text color.
pub fn label_color(outcome: &Outcome, fill: Srgb<f64>, theme: &Theme) -> Srgb<f64> {
    if let Some(color) = outcome.text_color {
        return color.to_f64();
    }
    if outcome.color.is_some() {
        return contrast_text(fill);
    }
    theme.text
}

fn wedge(cr: &Context, g: &WheelGeometry, start: f64, end: f64) {
    cr.move_to(g.cx, g.cy);
    cr.arc(g.cx, g.cy, g.radius, start, end);
    cr.close_path();
}

fn span(index: usize, count: usize, rotation: f64) -> (f64, f64) {
    let seg = segment_angle(count);
    let start = index as f64 * seg;
    (
        screen_angle(start, rotation),
        screen_angle(start + seg, rotation),
    )
}

pub fn draw_sectors(
    cr: &Context,
    g: &WheelGeometry,
    fills: &[Srgb<f64>],
    rotation: f64,
    border: &BorderStyleDefinition,
    theme: &Theme,
) -> Result<(), cairo::Error> {
    let count = fills.len();
    let line_width = (g.radius * 0.008).max(1.0);

    for (i, fill) in fills.iter().enumerate() {
        let (start, end) = span(i, count, rotation);
        wedge(cr, g, start, end);
        set_color(cr, *fill);
        cr.fill_preserve()?;
        if border.is_image_pattern() {
            // the pattern ring covers the rim, an arc stroke would double it
            cr.new_path();
        } else {
            set_rgba(cr, theme.separator);
            cr.set_line_width(line_width);
            cr.stroke()?;
        }
    }

    if border.is_image_pattern() && count > 1 {
        set_rgba(cr, theme.separator);
        cr.set_line_width(line_width);
        for i in 0..count {
            let (start, _) = span(i, count, rotation);
            let (x, y) = g.point_at(start, g.radius);
            cr.move_to(g.cx, g.cy);
            cr.line_to(x, y);
        }
        cr.stroke()?;
    }
    Ok(())
}

/// Brightens the winning sector once the wheel has stopped.
pub fn draw_highlight(
    cr: &Context,
    g: &WheelGeometry,
    chosen: usize,
    count: usize,
    rotation: f64,
) -> Result<(), cairo::Error> {
    if chosen >= count {
        return Ok(());
    }
    let (start, end) = span(chosen, count, rotation);
    wedge(cr, g, start, end);
    cr.set_source_rgba(1.0, 1.0, 1.0, 0.18);
    cr.fill_preserve()?;
    cr.set_source_rgba(1.0, 1.0, 1.0, 0.7);
    cr.set_line_width((g.radius * 0.012).max(1.5));
    cr.stroke()
}

/// Radius of the image circle that fits inside one sector.
pub fn image_circle_radius(g: &WheelGeometry, count: usize) -> f64 {
    let outer_room = g.radius * (1.0 - IMAGE_CENTER_RATIO) * 0.8;
    let half_span = segment_angle(count).to_radians() / 2.0;
    if half_span >= std::f64::consts::FRAC_PI_2 {
        return outer_room;
    }
    let side_room = g.radius * IMAGE_CENTER_RATIO * half_span.sin() * 0.85;
    side_room.min(outer_room)
}

pub fn draw_images(
    cr: &Context,
    g: &WheelGeometry,
    outcomes: &[Outcome],
    fills: &[Srgb<f64>],
    rotation: f64,
    assets: &mut AssetCache,
) -> Result<(), cairo::Error> {
    let count = outcomes.len();
    let circle = image_circle_radius(g, count);
    let seg = segment_angle(count);

    for (i, outcome) in outcomes.iter().enumerate() {
        if outcome.content_type() != ContentType::Image {
            continue;
        }
        let Some(image) = assets.get_opt(outcome.image_url.as_ref()) else {
            continue;
        };
        let (iw, ih) = (image.width() as f64, image.height() as f64);
        if iw <= 0.0 || ih <= 0.0 {
            continue;
        }

        let mid = screen_angle(i as f64 * seg + seg / 2.0, rotation);
        let (x, y) = g.point_at(mid, g.radius * IMAGE_CENTER_RATIO);

        cr.save()?;
        cr.arc(x, y, circle, 0.0, TAU);
        cr.clip();
        set_color(cr, fills[i]);
        cr.paint()?;

        // keep the image upright relative to its sector
        cr.translate(x, y);
        cr.rotate(mid + std::f64::consts::FRAC_PI_2);
        let scale = (2.0 * circle / iw).max(2.0 * circle / ih) * IMAGE_OVERSCAN;
        cr.scale(scale, scale);
        cr.set_source_pixbuf(image, -iw / 2.0, -ih / 2.0);
        cr.paint()?;
        cr.restore()?;
    }
    Ok(())
}

/// Longest prefix of `text` (plus an ellipsis) whose measured width fits.
pub fn truncate_to_width<F>(text: &str, max_width: f64, mut measure: F) -> Result<String, cairo::Error>
where
    F: FnMut(&str) -> Result<f64, cairo::Error>,
{
    if measure(text)? <= max_width {
        return Ok(text.to_string());
    }
    let chars: Vec<char> = text.chars().collect();
    for keep in (1..chars.len()).rev() {
        let mut candidate: String = chars[..keep].iter().collect::<String>().trim_end().to_string();
        candidate.push(ELLIPSIS);
        if measure(&candidate)? <= max_width {
            return Ok(candidate);
        }
    }
    Ok(ELLIPSIS.to_string())
}

pub fn draw_labels(
    cr: &Context,
    g: &WheelGeometry,
    outcomes: &[Outcome],
    fills: &[Srgb<f64>],
    rotation: f64,
    theme: &Theme,
) -> Result<(), cairo::Error> {
    let count = outcomes.len();
    let seg = segment_angle(count);
    let arc_room = seg.to_radians() * g.radius * 0.7;
    let font_size = (g.radius * 0.09).min(arc_room * 0.55).max(6.0);
    // text runs from just outside the hub to just inside the rim
    let outer = g.radius * 0.9;
    let max_width = g.radius * 0.62;

    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(font_size);

    for (i, outcome) in outcomes.iter().enumerate() {
        if outcome.content_type() != ContentType::Text || outcome.label.trim().is_empty() {
            continue;
        }
        let label = truncate_to_width(outcome.label.trim(), max_width, |s| {
            cr.text_extents(s).map(|e| e.x_advance())
        })?;
        let ext = cr.text_extents(&label)?;
        let mid = screen_angle(i as f64 * seg + seg / 2.0, rotation);

        cr.save()?;
        cr.translate(g.cx, g.cy);
        cr.rotate(mid);
        set_color(cr, label_color(outcome, fills[i], theme));
        cr.move_to(outer - ext.x_advance(), -(ext.y_bearing() + ext.height() / 2.0));
        cr.show_text(&label)?;
        cr.restore()?;
    }
    Ok(())
}
