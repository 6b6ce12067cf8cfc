use super::*;
use crate::operators::registry::OperatorRegistry;

#[test]
fn every_named_preset_resolves() {
    for name in PRESET_NAMES {
        let steps = preset_steps(name).unwrap();
        assert!(!steps.is_empty(), "{name}");
    }
    assert!(preset_steps(DEFAULT_PRESET).is_some());
    assert!(preset_steps("Vibrant").is_some());
    assert!(preset_steps("brutalist").is_none());
}

#[test]
fn preset_extras_are_accepted_by_their_operators() {
    let reg = OperatorRegistry::with_builtins();
    let scene = crate::scene::model::Scene::from_json_str("{}").unwrap();
    for name in PRESET_NAMES {
        for step in preset_steps(name).unwrap() {
            let op = reg.get(step.kind.name()).unwrap();
            op.apply(&scene, &step.params(Some(1)))
                .unwrap_or_else(|e| panic!("{name}/{}: {e}", step.kind));
        }
    }
}

#[test]
fn step_params_carry_seed_and_extras() {
    let step = preset_steps("playful").unwrap()[0];
    let p = step.params(Some(9));
    assert_eq!(p.seed(), Some(9));
    assert_eq!(p.extra().get("preset").and_then(|v| v.as_str()), Some("pastel"));
}
