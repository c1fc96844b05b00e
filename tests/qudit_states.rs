use rand::{rngs::StdRng, SeedableRng};
use singularis_prime::core::quantum::math::{normalize_state, sum_of_squares};
use singularis_prime::core::quantum::qudit::{generate_initial_state, Qudit, QuditTransform};

const EPS: f64 = 1e-9;

#[test]
fn initial_state_is_uniform() {
    for n in [1usize, 2, 3, 7, 64] {
        let state = generate_initial_state(n);
        assert_eq!(state.len(), n);
        let expected = 1.0 / (n as f64).sqrt();
        assert!(state.iter().all(|&a| (a - expected).abs() < EPS));
        assert!((sum_of_squares(&state) - 1.0).abs() < EPS);
    }
    assert!(generate_initial_state(0).is_empty());
}

#[test]
fn transforms_stay_normalized_when_repeated() {
    let transforms = [
        QuditTransform::Fourier,
        QuditTransform::Clock,
        QuditTransform::Shift { k: 2 },
        QuditTransform::Phase { level: 1, angle: 0.7 },
        QuditTransform::Rotation { a: 0, b: 3, angle: 1.1 },
        QuditTransform::Depolarize { p: 0.25 },
    ];
    let start = Qudit::basis(5, 1).unwrap();
    for t in &transforms {
        let once = start.apply(t).unwrap();
        let twice = start.apply(t).unwrap();
        assert!((once.norm_squared() - 1.0).abs() < EPS, "{:?}", t);
        assert!((twice.norm_squared() - 1.0).abs() < EPS, "{:?}", t);
        assert_eq!(once, twice, "{:?} should be deterministic", t);
        let chained = once.apply(t).unwrap();
        assert!((chained.norm_squared() - 1.0).abs() < EPS, "{:?}", t);
    }
}

#[test]
fn cli_transform_syntax() {
    assert_eq!("fourier".parse::<QuditTransform>().unwrap(), QuditTransform::Fourier);
    assert_eq!("shift:2".parse::<QuditTransform>().unwrap(), QuditTransform::Shift { k: 2 });
    assert_eq!(
        "rotate:0:1:0.3".parse::<QuditTransform>().unwrap(),
        QuditTransform::Rotation { a: 0, b: 1, angle: 0.3 }
    );
    assert!("noise:high".parse::<QuditTransform>().is_err());
    assert!(Qudit::new(3).unwrap().apply(&"noise:2".parse().unwrap()).is_err());
    assert!("teleport".parse::<QuditTransform>().is_err());
}

#[test]
fn shift_moves_population() {
    let q = Qudit::basis(4, 0).unwrap().apply(&QuditTransform::Shift { k: 3 }).unwrap();
    let p = q.probabilities();
    assert!((p[3] - 1.0).abs() < EPS);
}

#[test]
fn seeded_measurement_is_reproducible() {
    let q = Qudit::new(6).unwrap();
    let a = q.measure(&mut StdRng::seed_from_u64(11)).unwrap();
    let b = q.measure(&mut StdRng::seed_from_u64(11)).unwrap();
    assert_eq!(a.0, b.0);
    assert!((a.1.probabilities()[a.0] - 1.0).abs() < EPS);
}

#[test]
fn zero_vector_cannot_be_normalized() {
    assert!(normalize_state(&[0.0; 4]).is_err());
    assert!(Qudit::from_amplitudes(&[0.0, 0.0], None).is_err());
}
