use super::*;
use rand::RngCore;
use serde_json::json;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Flavor {
    Sweet,
    SourCherry,
}

impl OptionName for Flavor {
    const ALL: &'static [Self] = &[Self::Sweet, Self::SourCherry];

    fn as_str(self) -> &'static str {
        match self {
            Self::Sweet => "sweet",
            Self::SourCherry => "sour_cherry",
        }
    }
}

#[test]
fn intensity_outside_unit_range_is_rejected() {
    assert!(VariationParams::new(0.0).is_ok());
    assert!(VariationParams::new(1.0).is_ok());
    assert!(matches!(
        VariationParams::new(1.01),
        Err(VaryError::Validation(_))
    ));
    assert!(VariationParams::new(-0.1).is_err());
    assert!(VariationParams::new(f64::NAN).is_err());
}

#[test]
fn deserialization_validates_intensity() {
    let ok: VariationParams =
        serde_json::from_value(json!({ "intensity": 0.3, "seed": 7, "extra": { "mode": "x" } }))
            .unwrap();
    assert_eq!(ok.intensity(), 0.3);
    assert_eq!(ok.seed(), Some(7));
    assert_eq!(ok.get_str("mode").unwrap(), Some("x"));

    let bad = serde_json::from_value::<VariationParams>(json!({ "intensity": 2.0 }));
    assert!(bad.is_err());
}

#[test]
fn seeded_rngs_repeat() {
    let p = VariationParams::new(0.5).unwrap().with_seed(42);
    let a = p.rng().next_u64();
    let b = p.rng().next_u64();
    assert_eq!(a, b);
}

#[test]
fn typed_option_accessors() {
    let p = VariationParams::new(0.5)
        .unwrap()
        .with_extra("flavor", "Sour-Cherry")
        .with_extra("amount", 3)
        .with_extra("label", 5);

    assert_eq!(p.get_option::<Flavor>("flavor").unwrap(), Some(Flavor::SourCherry));
    assert_eq!(p.get_f64("amount").unwrap(), Some(3.0));
    assert!(p.get_str("label").is_err());
    assert_eq!(p.get_f64("missing").unwrap(), None);

    let bad = p.clone().with_extra("flavor", "salty");
    let err = bad.get_option::<Flavor>("flavor").unwrap_err();
    assert!(err.to_string().contains("sweet, sour_cherry"));
}
