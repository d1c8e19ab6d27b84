use rand::SeedableRng;
use rand::rngs::StdRng;
use spinwheel::controller::{POINTER_ANGLE_DEG, sector_under_pointer};
use spinwheel::{ManualScheduler, Outcome, SpinMode, WheelConfig, WheelEngine, select};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

type Log = Rc<RefCell<Vec<String>>>;

fn wheel(config: WheelConfig, seed: u64) -> (WheelEngine<ManualScheduler>, Log) {
    let log: Log = Rc::default();
    let sink = Rc::clone(&log);
    let t0 = Instant::now();
    let engine = WheelEngine::new(config, ManualScheduler::new(t0), move |o: &Outcome| {
        sink.borrow_mut().push(o.id.to_string())
    })
    .with_seed(seed);
    (engine, log)
}

/// Spins once and drives frames at 60 Hz until the outcome is announced.
fn spin_to_completion(engine: &mut WheelEngine<ManualScheduler>) -> Instant {
    let start = engine.scheduler().now();
    engine.spin(start);
    let mut now = start;
    for _ in 0..2000 {
        now += Duration::from_millis(16);
        if engine.pump(now) > 0 {
            break;
        }
    }
    now
}

#[test]
fn instant_winner_always_picks_the_winner() {
    let config = WheelConfig {
        spin_mode: SpinMode::InstantWinner,
        win_probability: Some(1.0),
        base_duration_ms: 500,
        ..WheelConfig::with_outcomes(vec![
            Outcome::new("a", "Perdu"),
            Outcome::new("b", "iPhone"),
        ])
    };
    let (mut engine, log) = wheel(config, 2024);
    for _ in 0..25 {
        spin_to_completion(&mut engine);
    }
    assert_eq!(log.borrow().len(), 25);
    assert!(log.borrow().iter().all(|id| id == "b"));
}

#[test]
fn probability_mode_follows_weights() {
    let outcomes = vec![
        Outcome::new("rare", "Rare").with_probability(0.1),
        Outcome::new("common", "Common").with_probability(0.9),
    ];
    let mut rng = StdRng::seed_from_u64(99);
    let mut counts = [0usize; 2];
    for _ in 0..10_000 {
        let idx = select::choose_outcome(&outcomes, SpinMode::Probability, 0.1, &mut rng);
        counts[idx.unwrap()] += 1;
    }
    let ratio = counts[1] as f64 / counts[0] as f64;
    assert!((7.2..=10.8).contains(&ratio), "ratio was {}", ratio);
}

#[test]
fn single_outcome_wheel() {
    let config = WheelConfig {
        base_duration_ms: 500,
        ..WheelConfig::with_outcomes(vec![Outcome::new("only", "Only")])
    };
    let (mut engine, log) = wheel(config, 1);
    spin_to_completion(&mut engine);
    assert_eq!(*log.borrow(), vec!["only".to_string()]);
    assert_eq!(engine.chosen_outcome().map(|o| o.id.as_str()), Some("only"));
}

#[test]
fn wheel_rests_on_announced_sector() {
    let outcomes: Vec<_> = (0..7)
        .map(|i| Outcome::new(format!("s{}", i), format!("Sector {}", i)))
        .collect();
    let config = WheelConfig {
        base_duration_ms: 600,
        ..WheelConfig::with_outcomes(outcomes)
    };
    let (mut engine, log) = wheel(config, 42);

    for round in 0..5 {
        spin_to_completion(&mut engine);
        let state = *engine.state();
        let under = sector_under_pointer(state.rotation, 7);
        assert_eq!(Some(under), state.chosen);
        assert_eq!(log.borrow()[round], format!("s{}", under));
    }
    assert_eq!(POINTER_ANGLE_DEG, 0.0);
}

#[test]
fn respin_while_spinning_is_ignored() {
    let config = WheelConfig {
        base_duration_ms: 1000,
        ..WheelConfig::with_outcomes(vec![Outcome::new("a", "A"), Outcome::new("b", "B")])
    };
    let (mut engine, log) = wheel(config, 5);
    let t0 = engine.scheduler().now();

    let first = engine.spin(t0);
    assert!(first.is_some());
    engine.pump(t0 + Duration::from_millis(200));
    let during = *engine.state();

    assert!(engine.spin(t0 + Duration::from_millis(210)).is_none());
    assert_eq!(*engine.state(), during);

    for step in 1..200u64 {
        engine.pump(t0 + Duration::from_millis(200 + step * 16));
    }
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn starved_frames_still_complete_once() {
    let config = WheelConfig {
        base_duration_ms: 1000,
        ..WheelConfig::with_outcomes(vec![Outcome::new("a", "A"), Outcome::new("b", "B")])
    };
    let (mut engine, log) = wheel(config, 11);
    let t0 = engine.scheduler().now();
    engine.spin(t0);

    // no frames are ever delivered; the fallback timer has to finish the spin
    let mut now = t0;
    for _ in 0..40 {
        now += Duration::from_millis(100);
        engine.pump_starved(now);
    }
    assert!(!engine.is_spinning());
    assert_eq!(log.borrow().len(), 1);
    let state = *engine.state();
    assert_eq!(state.rotation, state.target_rotation);
}

#[test]
fn dispose_mid_spin_never_announces() {
    let config = WheelConfig {
        base_duration_ms: 1000,
        ..WheelConfig::with_outcomes(vec![Outcome::new("a", "A"), Outcome::new("b", "B")])
    };
    let (mut engine, log) = wheel(config, 3);
    let t0 = engine.scheduler().now();
    engine.spin(t0);
    engine.pump(t0 + Duration::from_millis(300));
    engine.dispose();

    for step in 1..300u64 {
        engine.pump(t0 + Duration::from_millis(300 + step * 16));
    }
    assert!(log.borrow().is_empty());
    assert!(engine.is_disposed());
}

#[test]
fn rotation_never_runs_backwards() {
    let config = WheelConfig {
        base_duration_ms: 800,
        ..WheelConfig::with_outcomes(vec![
            Outcome::new("a", "A"),
            Outcome::new("b", "B"),
            Outcome::new("c", "C"),
        ])
    };
    let (mut engine, _) = wheel(config, 8);
    let t0 = engine.scheduler().now();
    engine.spin(t0);
    let start = engine.state().rotation;
    let target = engine.state().target_rotation;
    assert!(target >= start + 1080.0);

    let mut last = start;
    for step in 1..120u64 {
        engine.pump(t0 + Duration::from_millis(step * 10));
        let rotation = engine.state().rotation;
        assert!(rotation >= last);
        assert!(rotation <= target);
        last = rotation;
    }
}
