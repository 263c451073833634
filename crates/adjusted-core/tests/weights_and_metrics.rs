use adjusted_core::synthetic::{pair_from_affine, uniform_times};
use adjusted_core::{residual_metrics, AffineMatrix, Element, Mat3, Real, TimeWeighting, Vec3};

#[test]
fn decay_is_symmetric_without_causality() {
    let times = uniform_times(11, 60.0);
    let tw = TimeWeighting::new(300.0).unwrap();
    let w = tw.weights(&times, Some(300.0)).unwrap();
    assert_eq!(w[5], 1.0);
    for k in 1..=5 {
        assert!((w[5 - k] - w[5 + k]).abs() < 1e-15);
        assert!(w[5 - k] < w[5 - k + 1]);
    }

    let causal = tw.with_causal(true).weights(&times, Some(300.0)).unwrap();
    assert_eq!(&causal[..=5], &w[..=5]);
    assert!(causal[6..].iter().all(|&v| v == 0.0));
}

#[test]
fn true_matrix_has_noise_sized_metrics() -> anyhow::Result<()> {
    let truth = AffineMatrix::from_parts(
        &Mat3::from_diagonal(&Vec3::new(1.01, 0.99, 1.0)),
        &Vec3::new(5.0, -5.0, 100.0),
    );
    let noise: Real = 1.0;
    let pair = pair_from_affine(&truth, 500, Vec3::new(20000.0, 0.0, 45000.0), 500.0, noise, 42)?;

    let metrics = residual_metrics(&truth, &pair.ordinates, &pair.absolutes)?;
    let elements: Vec<Element> = metrics.iter().map(|m| m.element).collect();
    assert_eq!(elements, vec![Element::X, Element::Y, Element::Z, Element::DF]);
    for m in &metrics[..3] {
        // uniform on [-1, 1]: mean |e| = 0.5, std = 1/sqrt(3)
        assert!((m.absmean - 0.5).abs() < 0.1, "{}: {}", m.element, m.absmean);
        assert!((m.stddev - (1.0 / 3.0_f64).sqrt()).abs() < 0.1, "{}: {}", m.element, m.stddev);
    }

    let identity = residual_metrics(&AffineMatrix::identity(), &pair.ordinates, &pair.absolutes)?;
    assert!(identity[2].absmean > 90.0);
    Ok(())
}
