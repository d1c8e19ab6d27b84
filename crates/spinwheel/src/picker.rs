use rand::Rng;

/// Weights at or below this are treated as zero.
pub const WEIGHT_EPSILON: f64 = 1e-9;

fn is_valid(weight: f64) -> bool {
    weight.is_finite() && weight > WEIGHT_EPSILON
}

/// Zeroes invalid weights and brings the rest into `[0, 1]`. Raw magnitudes
/// are scaled by the largest weight so their ratios survive; already
/// normalized inputs pass through untouched.
fn sanitize(weights: &[f64]) -> Vec<f64> {
    let max = weights
        .iter()
        .copied()
        .filter(|w| is_valid(*w))
        .fold(0.0_f64, f64::max);
    let scale = if max > 1.0 { max } else { 1.0 };

    weights
        .iter()
        .map(|&w| if is_valid(w) { (w / scale).min(1.0) } else { 0.0 })
        .collect()
}

/// Picks an index from `weights` using a uniform draw in `[0, 1)`.
///
/// Invalid or non-positive weights count as zero. If nothing is positive the
/// draw selects uniformly over every index, so a malformed wheel still spins.
/// A single positive weight is returned without consuming the draw.
pub fn pick_with(weights: &[f64], draw: impl FnOnce() -> f64) -> usize {
    if weights.is_empty() {
        return 0;
    }

    let clean = sanitize(weights);
    let mut positive = clean
        .iter()
        .enumerate()
        .filter(|(_, w)| **w > 0.0)
        .map(|(i, _)| i);

    let Some(first) = positive.next() else {
        let idx = (draw() * weights.len() as f64).floor() as usize;
        log::trace!("pick: no positive weight, uniform fallback -> {}", idx);
        return idx.min(weights.len() - 1);
    };
    let Some(last) = positive.last() else {
        return first;
    };

    let total: f64 = clean.iter().sum();
    let r = draw() * total;

    let mut cumulative = 0.0;
    for (i, w) in clean.iter().enumerate() {
        if *w <= 0.0 {
            continue;
        }
        cumulative += w;
        if cumulative + WEIGHT_EPSILON >= r {
            return i;
        }
    }

    log::trace!("pick: cumulative walk overran (r = {}), using {}", r, last);
    last
}

pub fn pick<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    pick_with(weights, || rng.random::<f64>())
}
