use crate::config::SpinMode;
use crate::outcome::Outcome;
use crate::picker;
use rand::Rng;

/// Chooses the index of the outcome a spin will land on.
///
/// Returns `None` for an empty wheel.
pub fn choose_outcome<R: Rng>(
    outcomes: &[Outcome],
    mode: SpinMode,
    win_rate: f64,
    rng: &mut R,
) -> Option<usize> {
    if outcomes.is_empty() {
        return None;
    }

    let idx = match mode {
        SpinMode::Random => picker::pick(&vec![1.0; outcomes.len()], rng),
        SpinMode::Probability => {
            let weights: Vec<f64> = outcomes
                .iter()
                .map(|o| o.probability.unwrap_or(0.0))
                .collect();
            picker::pick(&weights, rng)
        }
        SpinMode::InstantWinner => choose_instant_winner(outcomes, win_rate, rng),
    };

    log::debug!(
        "selected outcome {} ('{}') in {} mode",
        idx,
        outcomes[idx].id,
        mode
    );
    Some(idx)
}

fn choose_instant_winner<R: Rng>(outcomes: &[Outcome], win_rate: f64, rng: &mut R) -> usize {
    let (winners, losers): (Vec<usize>, Vec<usize>) =
        (0..outcomes.len()).partition(|&i| outcomes[i].is_winning());

    let wants_win = rng.random::<f64>() < win_rate;
    let (preferred, other) = if wants_win {
        (&winners, &losers)
    } else {
        (&losers, &winners)
    };

    let subset = if !preferred.is_empty() {
        preferred
    } else if !other.is_empty() {
        log::debug!(
            "instant winner: no {} outcome, using the opposite subset",
            if wants_win { "winning" } else { "losing" }
        );
        other
    } else {
        return picker::pick(&vec![1.0; outcomes.len()], rng);
    };

    let weights: Vec<f64> = subset
        .iter()
        .map(|&i| outcomes[i].probability.unwrap_or(1.0))
        .collect();
    subset[picker::pick(&weights, rng)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn wheel(labels: &[&str]) -> Vec<Outcome> {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| Outcome::new(format!("o{}", i), *l))
            .collect()
    }

    #[test]
    fn test_empty_wheel_has_no_choice() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(choose_outcome(&[], SpinMode::Random, 0.5, &mut rng), None);
    }

    #[test]
    fn test_instant_winner_always_wins_at_full_rate() {
        let outcomes = wheel(&["Perdu", "iPhone"]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            assert_eq!(
                choose_outcome(&outcomes, SpinMode::InstantWinner, 1.0, &mut rng),
                Some(1)
            );
        }
    }

    #[test]
    fn test_instant_winner_always_loses_at_zero_rate() {
        let outcomes = wheel(&["Perdu", "iPhone", "Dommage"]);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let idx = choose_outcome(&outcomes, SpinMode::InstantWinner, 0.0, &mut rng).unwrap();
            assert!(outcomes[idx].is_losing());
        }
    }

    #[test]
    fn test_instant_winner_falls_back_to_opposite_subset() {
        let outcomes = wheel(&["Gift", "Voucher"]);
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = [false; 2];
        for _ in 0..200 {
            let idx = choose_outcome(&outcomes, SpinMode::InstantWinner, 0.0, &mut rng).unwrap();
            seen[idx] = true;
        }
        assert_eq!(seen, [true, true]);
    }

    #[test]
    fn test_instant_winner_weights_within_subset() {
        let mut outcomes = wheel(&["Perdu", "Mug", "Car"]);
        outcomes[1].probability = Some(0.9);
        outcomes[2].probability = Some(0.0);
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            assert_eq!(
                choose_outcome(&outcomes, SpinMode::InstantWinner, 1.0, &mut rng),
                Some(1)
            );
        }
    }

    #[test]
    fn test_probability_mode_missing_weight_is_zero() {
        let mut outcomes = wheel(&["A", "B", "C"]);
        outcomes[2].probability = Some(0.4);
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..100 {
            assert_eq!(
                choose_outcome(&outcomes, SpinMode::Probability, 0.0, &mut rng),
                Some(2)
            );
        }
    }

    #[test]
    fn test_random_mode_covers_every_outcome() {
        let outcomes = wheel(&["A", "B", "C", "D", "E"]);
        let mut rng = StdRng::seed_from_u64(21);
        let mut counts = [0usize; 5];
        for _ in 0..5000 {
            counts[choose_outcome(&outcomes, SpinMode::Random, 0.0, &mut rng).unwrap()] += 1;
        }
        assert!(counts.iter().all(|&c| (850..1150).contains(&c)), "{:?}", counts);
    }
}
