use rand::SeedableRng;

use super::*;
use crate::scene::model::{BBox, Shape};

fn scene(n: usize) -> Scene {
    let mut scene = Scene::from_json_str(r#"{ "archetype": "process" }"#).unwrap();
    for i in 0..n {
        scene.shapes.push(Shape::new(
            format!("s{i}"),
            BBox::new(100.0 + 250.0 * i as f64, 400.0, 200.0, 100.0),
        ));
    }
    scene
}

fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn family_of(reg: &OperatorRegistry, name: &str) -> OperatorFamily {
    reg.get(name).unwrap().family()
}

#[test]
fn strategy_names_parse() {
    assert_eq!(SamplingStrategy::parse(" Diverse "), Some(SamplingStrategy::Diverse));
    assert_eq!(SamplingStrategy::parse("bogus"), None);
    assert_eq!(SamplingStrategy::parse_lossy("bogus"), SamplingStrategy::Random);
}

#[test]
fn config_validation() {
    SamplerConfig::default().validate().unwrap();
    let bad = SamplerConfig {
        intensity_range: [0.8, 0.2],
        ..SamplerConfig::default()
    };
    assert!(VariationSampler::new(bad).is_err());
    let bad = SamplerConfig {
        grid_steps: 0,
        ..SamplerConfig::default()
    };
    assert!(bad.validate().is_err());
    let bad = SamplerConfig {
        weights: [("depth".to_string(), -1.0)].into_iter().collect(),
        ..SamplerConfig::default()
    };
    assert!(bad.validate().is_err());
}

fn names<'a>(ops: &[&'a dyn VariationOperator]) -> Vec<&'a str> {
    ops.iter().map(|op| op.name()).collect()
}

#[test]
fn structural_validation_gates_applicability() {
    let reg = OperatorRegistry::with_builtins();
    let sampler = VariationSampler::default();
    // taper is the only operator with both an allow-list and a structural check
    let row = sampler.applicable(&reg, &scene(3));
    assert_eq!(row.len(), 9);
    assert!(!names(&row).contains(&"taper"));
    let single = sampler.applicable(&reg, &scene(1));
    assert_eq!(single.len(), 9);
    assert!(!names(&single).contains(&"taper"));

    let mut column = scene(3);
    for (i, shape) in column.shapes.iter_mut().enumerate() {
        shape.bbox = BBox::new(500.0, 100.0 + 150.0 * i as f64, 300.0 - 50.0 * i as f64, 100.0);
    }
    assert_eq!(sampler.applicable(&reg, &column).len(), 10);
}

#[test]
fn cycle_scene_never_offers_taper() {
    let cycle = Scene::from_json_str(include_str!("../../data/scenes/cycle.json")).unwrap();
    let reg = OperatorRegistry::with_builtins();
    let sampler = VariationSampler::default();
    assert!(!names(&sampler.applicable(&reg, &cycle)).contains(&"taper"));
    let picks = sampler.random(&reg, &cycle, 200, &mut rng(11));
    assert!(picks.iter().all(|s| s.operator != "taper"));
}

#[test]
fn weights_must_sum_to_a_finite_total() {
    let bad = SamplerConfig {
        weights: [("palette".to_string(), f64::MAX), ("depth".to_string(), f64::MAX)]
            .into_iter()
            .collect(),
        ..SamplerConfig::default()
    };
    assert!(matches!(bad.validate(), Err(VaryError::Validation(_))));
    assert!(VariationSampler::new(bad).is_err());
}

#[test]
fn bucket_pick_falls_through_to_last_weighted() {
    let weights = [1.0, 2.0, 0.0];
    assert_eq!(bucket(&weights, 0.5), Some(0));
    assert_eq!(bucket(&weights, 1.0), Some(0));
    assert_eq!(bucket(&weights, 2.5), Some(1));
    // past every bucket, the trailing zero weight is never chosen
    assert_eq!(bucket(&weights, 10.0), Some(1));
    assert_eq!(bucket(&[0.0, 3.0], 0.0), Some(1));
    assert_eq!(bucket(&[0.0, 0.0], 0.5), None);
}

#[test]
fn random_respects_count_range_and_seeds() {
    let reg = OperatorRegistry::with_builtins();
    let sampler = VariationSampler::default();
    let samples = sampler.random(&reg, &scene(3), 25, &mut rng(1));
    assert_eq!(samples.len(), 25);
    for s in &samples {
        assert!((0.2..=0.9).contains(&s.params.intensity()));
        assert!(s.params.seed().is_some());
        assert!(reg.contains(&s.operator));
    }
}

#[test]
fn every_strategy_is_reproducible() {
    let reg = OperatorRegistry::with_builtins();
    let sampler = VariationSampler::default();
    let sc = scene(3);
    assert_eq!(
        sampler.random(&reg, &sc, 8, &mut rng(9)),
        sampler.random(&reg, &sc, 8, &mut rng(9))
    );
    assert_eq!(
        sampler.diverse(&reg, &sc, 8, &mut rng(9)),
        sampler.diverse(&reg, &sc, 8, &mut rng(9))
    );
    assert_eq!(
        sampler.grid(&reg, &sc, None, 8, &mut rng(9)),
        sampler.grid(&reg, &sc, None, 8, &mut rng(9))
    );
    assert_eq!(
        sampler.combinations(&reg, &sc, 4, None, &mut rng(9)),
        sampler.combinations(&reg, &sc, 4, None, &mut rng(9))
    );
}

#[test]
fn zero_weight_disables_an_operator() {
    let reg = OperatorRegistry::with_builtins();
    let weights = reg
        .names()
        .into_iter()
        .map(|n| (n.to_string(), if n == "depth" { 2.0 } else { 0.0 }))
        .collect();
    let sampler = VariationSampler::new(SamplerConfig {
        weights,
        ..SamplerConfig::default()
    })
    .unwrap();
    let samples = sampler.random(&reg, &scene(3), 10, &mut rng(3));
    assert_eq!(samples.len(), 10);
    assert!(samples.iter().all(|s| s.operator == "depth"));
}

#[test]
fn grid_is_operators_times_steps() {
    let reg = OperatorRegistry::with_builtins();
    let sampler = VariationSampler::default();
    let all = sampler.grid(&reg, &scene(3), None, usize::MAX, &mut rng(0));
    assert_eq!(all.len(), 9 * 5);
    let first = all[..5].iter().map(|s| s.params.intensity()).collect::<Vec<_>>();
    let expected = [0.2, 0.375, 0.55, 0.725, 0.9];
    for (a, b) in first.iter().zip(expected) {
        assert!((a - b).abs() < 1e-9, "{a} vs {b}");
    }

    let only = sampler.grid(&reg, &scene(3), Some(&["depth", "scale"]), 100, &mut rng(0));
    assert_eq!(only.len(), 10);
    let truncated = sampler.grid(&reg, &scene(3), None, 3, &mut rng(0));
    assert_eq!(truncated.len(), 3);
}

#[test]
fn diverse_covers_all_families_before_repeating() {
    let reg = OperatorRegistry::with_builtins();
    let sampler = VariationSampler::default();
    let samples = sampler.diverse(&reg, &scene(3), 8, &mut rng(42));
    for window in [&samples[..4], &samples[4..]] {
        let families = window
            .iter()
            .map(|s| family_of(&reg, &s.operator))
            .collect::<BTreeSet<_>>();
        assert_eq!(families.len(), 4);
    }
    for s in &samples {
        let i = s.params.intensity();
        assert!((0.2..=0.4).contains(&i) || (0.7..=0.9).contains(&i), "{i}");
    }
}

#[test]
fn low_diversity_stays_central() {
    let reg = OperatorRegistry::with_builtins();
    let sampler = VariationSampler::new(SamplerConfig {
        diversity: 0.3,
        ..SamplerConfig::default()
    })
    .unwrap();
    for s in sampler.diverse(&reg, &scene(3), 12, &mut rng(5)) {
        assert!((0.4..=0.6).contains(&s.params.intensity()));
    }
}

#[test]
fn combinations_use_distinct_damped_operators() {
    let reg = OperatorRegistry::with_builtins();
    let sampler = VariationSampler::default();
    let chains = sampler.combinations(&reg, &scene(3), 6, Some(3), &mut rng(8));
    assert_eq!(chains.len(), 6);
    for chain in &chains {
        assert_eq!(chain.len(), 3);
        let names = chain.iter().map(|s| s.operator.as_str()).collect::<BTreeSet<_>>();
        assert_eq!(names.len(), 3);
        for s in chain {
            let i = s.params.intensity();
            assert!(i >= 0.7 * 0.2 - 1e-12 && i <= 0.7 * 0.9 + 1e-12);
        }
    }
}
