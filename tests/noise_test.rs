use bastion::noise::{Fractal, NoiseEngine};

#[test]
fn same_seed_gives_same_field() {
    let a = NoiseEngine::from_seed(42);
    let b = NoiseEngine::from_seed(42);
    for i in 0..200 {
        let (x, y) = (i as f64 * 0.37, i as f64 * 0.91 - 13.0);
        assert_eq!(a.noise(x, y), b.noise(x, y));
    }
}

#[test]
fn different_seeds_give_different_fields() {
    let a = NoiseEngine::from_seed(1);
    let b = NoiseEngine::from_seed(2);
    let differs = (0..100).any(|i| {
        let (x, y) = (i as f64 * 0.53 + 0.25, i as f64 * 0.29 + 0.75);
        a.noise(x, y) != b.noise(x, y)
    });
    assert!(differs);
}

#[test]
fn lattice_points_are_zero() {
    let engine = NoiseEngine::from_seed(3);
    for x in -5..5 {
        for y in -5..5 {
            assert_eq!(engine.noise(x as f64, y as f64), 0.0);
        }
    }
}

#[test]
fn values_stay_in_range() {
    let engine = NoiseEngine::from_seed(9);
    let params = Fractal::new(6, 0.01);
    for i in 0..2000 {
        let x = (i % 50) as f64 * 1.7 + 0.3;
        let y = (i / 50) as f64 * 2.3 + 0.1;
        let n = engine.noise(x, y);
        assert!((-1.0..=1.0).contains(&n), "noise {n} at ({x}, {y})");
        let f = engine.fractal(x, y, &params);
        assert!((-1.0..=1.0).contains(&f), "fractal {f}");
        let u = engine.fractal01(x, y, &params);
        assert!((0.0..=1.0).contains(&u), "fractal01 {u}");
    }
}

#[test]
fn field_is_continuous() {
    let engine = NoiseEngine::from_seed(5);
    let mut previous = engine.noise(0.1, 0.4);
    for i in 1..500 {
        let x = 0.1 + i as f64 * 0.001;
        let current = engine.noise(x, 0.4);
        assert!((current - previous).abs() < 0.05);
        previous = current;
    }
}

#[test]
fn non_finite_input_is_flat() {
    let engine = NoiseEngine::from_seed(5);
    assert_eq!(engine.noise(f64::NAN, 1.5), 0.0);
    assert_eq!(engine.noise(0.5, f64::INFINITY), 0.0);
}

#[test]
fn zero_octaves_still_sample_once() {
    let engine = NoiseEngine::from_seed(11);
    let single = Fractal::new(1, 0.5);
    let none = Fractal::new(0, 0.5);
    assert_eq!(
        engine.fractal(3.3, 4.4, &single),
        engine.fractal(3.3, 4.4, &none)
    );
}
