use adjusted::core::synthetic::pair_from_affine;
use adjusted::linear::DAY;
use adjusted::prelude::*;

fn truth() -> AffineMatrix {
    let (s, c) = (0.01_f64).sin_cos();
    AffineMatrix::from_rows([
        [c, -s, 0.0, -120.0],
        [s, c, 0.0, 35.0],
        [0.0, 0.0, 1.0, 410.0],
    ])
}

#[test]
fn json_chain_fits_a_rotated_baseline() -> anyhow::Result<()> {
    let json = serde_json::json!({
        "steps": [
            { "type": "rotation_translation_xy", "memory": 100.0 * DAY },
            { "type": "translate_origins", "memory": 10.0 * DAY }
        ]
    })
    .to_string();
    let chain = ChainConfig::from_json(&json)?.build()?;
    assert_eq!(chain, ChainConfig::default().build()?);

    let center = Vec3::new(20500.0, -300.0, 44000.0);
    let mut pair = pair_from_affine(&truth(), 40, center, 400.0, 0.0, 9)?;
    pair.times.iter_mut().for_each(|t| *t *= DAY);

    let result = chain.calculate(&pair.ordinates, &pair.absolutes, &pair.times, None)?;
    let m = result.solved().copied().ok_or_else(|| anyhow::anyhow!("chain degenerate"))?;
    assert!((m.matrix() - truth().matrix()).abs().max() < 1e-6);

    for metric in residual_metrics(&m, &pair.ordinates, &pair.absolutes)? {
        assert!(metric.absmean < 1e-6, "{}: {}", metric.element, metric.absmean);
    }
    Ok(())
}

#[test]
fn every_kind_is_reachable_from_json() -> anyhow::Result<()> {
    let pair = pair_from_affine(&truth(), 30, Vec3::new(20000.0, 0.0, 45000.0), 600.0, 0.1, 4)?;
    for kind in TransformKind::ALL {
        let cfg: TransformConfig =
            serde_json::from_value(serde_json::json!({ "type": serde_json::to_value(kind)? }))?;
        let transform = cfg.build()?;
        assert_eq!(transform.kind, kind);
        let result = transform.calculate(&pair.ordinates, &pair.absolutes, None)?;
        assert!(!result.is_degenerate(), "{}", kind.name());
    }
    Ok(())
}

#[test]
fn degenerate_chain_reports_the_failing_step() -> anyhow::Result<()> {
    let ords = Triple::from_points(&[Vec3::new(20000.0, 0.0, 45000.0); 4]);
    let chain = ChainConfig::default().build()?;
    let result = chain.calculate(&ords, &ords, &[0.0, 1.0, 2.0, 3.0], None)?;
    match result {
        AffineResult::Degenerate(Degeneracy::WeakCovariance { strategy, .. }) => {
            assert_eq!(strategy, TransformKind::RotationTranslationXY.name());
        }
        other => panic!("expected weak covariance, got {other:?}"),
    }
    assert!(result.matrix().iter().all(|v| v.is_nan()));
    Ok(())
}

#[test]
fn input_errors_propagate_through_the_chain() {
    let ords = Triple::from_points(&[Vec3::new(1.0, 2.0, 3.0)]);
    let chain = ChainConfig::default().build().unwrap();
    let err = chain.calculate(&ords, &ords, &[], None).unwrap_err();
    assert!(matches!(
        err,
        TransformError::Input(InputError::EmptyInput("times"))
    ));
}
