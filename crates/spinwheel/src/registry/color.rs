use palette::{Darken, FromColor, Hsl, Hsv, Lighten, Srgb, Srgba, WithAlpha};

type Hsl64 = Hsl<palette::encoding::Srgb, f64>;
type Hsv64 = Hsv<palette::encoding::Srgb, f64>;

/// `0xRRGGBB` to a floating point sRGB color.
pub fn rgb(hex: u32) -> Srgb<f64> {
    Srgb::new(
        ((hex >> 16) & 0xff) as u8,
        ((hex >> 8) & 0xff) as u8,
        (hex & 0xff) as u8,
    )
    .into_format()
}

pub fn rgba(hex: u32, alpha: f64) -> Srgba<f64> {
    rgb(hex).with_alpha(alpha)
}

/// WCAG relative luminance.
pub fn relative_luminance(color: Srgb<f64>) -> f64 {
    let linear = color.into_linear();
    0.2126 * linear.red + 0.7152 * linear.green + 0.0722 * linear.blue
}

/// Black or white, whichever reads better on `fill`.
pub fn contrast_text(fill: Srgb<f64>) -> Srgb<f64> {
    if relative_luminance(fill) > 0.179 {
        Srgb::new(0.0, 0.0, 0.0)
    } else {
        Srgb::new(1.0, 1.0, 1.0)
    }
}

pub fn lighten(color: Srgb<f64>, amount: f64) -> Srgb<f64> {
    Srgb::from_color(Hsl64::from_color(color).lighten(amount))
}

pub fn darken(color: Srgb<f64>, amount: f64) -> Srgb<f64> {
    Srgb::from_color(Hsl64::from_color(color).darken(amount))
}

/// Fully saturated color at `hue` degrees.
pub fn hue(degrees: f64) -> Srgb<f64> {
    Srgb::from_color(Hsv64::new(degrees.rem_euclid(360.0), 1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_unpacks_channels() {
        let c = rgb(0xff8000);
        assert_eq!(c.red, 1.0);
        assert!((c.green - 128.0 / 255.0).abs() < 1e-9);
        assert_eq!(c.blue, 0.0);
    }

    #[test]
    fn test_contrast_text() {
        assert_eq!(contrast_text(rgb(0xffffff)), Srgb::new(0.0, 0.0, 0.0));
        assert_eq!(contrast_text(rgb(0xffeb3b)), Srgb::new(0.0, 0.0, 0.0));
        assert_eq!(contrast_text(rgb(0x1a237e)), Srgb::new(1.0, 1.0, 1.0));
        assert_eq!(contrast_text(rgb(0x000000)), Srgb::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_lighten_and_darken_move_luminance() {
        let base = rgb(0x3366cc);
        assert!(relative_luminance(lighten(base, 0.3)) > relative_luminance(base));
        assert!(relative_luminance(darken(base, 0.3)) < relative_luminance(base));
    }

    #[test]
    fn test_hue_wraps() {
        let red = hue(0.0);
        let wrapped = hue(360.0);
        assert!((red.red - wrapped.red).abs() < 1e-9);
        assert!((red.green - wrapped.green).abs() < 1e-9);
    }
}
