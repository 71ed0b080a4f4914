// Property tests for ranged profile fields
// A value is accepted exactly when it lies inside the field's [min, max]

use fitdesk_core::model::{
    ClientProfile, FunctionalField, GeneralField, MorphologicalField, ProfileField, RomField, Value,
};
use proptest::prelude::*;
use proptest::sample::Index;
use proptest::test_runner::TestCaseError;

fn ranged<F: ProfileField>() -> Vec<(F, f64, f64)> {
    F::all()
        .iter()
        .filter_map(|f| f.range().map(|(min, max)| (*f, min, max)))
        .collect()
}

/// `offset` in [0, 1) spans the range widened by 50 on each side
fn accepts_exactly_range<F: ProfileField>(pick: Index, offset: f64) -> Result<(), TestCaseError> {
    let fields = ranged::<F>();
    prop_assert!(!fields.is_empty());
    let (field, min, max) = fields[pick.index(fields.len())];
    let value = (min - 50.0) + offset * (max - min + 100.0);

    let accepted = field.check(&Value::Real(value)).is_ok();
    prop_assert_eq!(accepted, (min..=max).contains(&value), "{:?} = {}", field, value);

    let mut profile = ClientProfile::new(1);
    profile.set(field, min).map_err(|e| TestCaseError::fail(e.to_string()))?;
    let result = profile.set(field, value);
    prop_assert_eq!(result.is_ok(), accepted);
    let expected = if accepted { Value::Real(value) } else { Value::Real(min) };
    prop_assert_eq!(profile.get(field), Some(&expected));
    Ok(())
}

proptest! {
    #[test]
    fn general_ranges(pick in any::<Index>(), offset in 0.0f64..1.0) {
        accepts_exactly_range::<GeneralField>(pick, offset)?;
    }

    #[test]
    fn functional_ranges(pick in any::<Index>(), offset in 0.0f64..1.0) {
        accepts_exactly_range::<FunctionalField>(pick, offset)?;
    }

    #[test]
    fn morphological_ranges(pick in any::<Index>(), offset in 0.0f64..1.0) {
        accepts_exactly_range::<MorphologicalField>(pick, offset)?;
    }

    #[test]
    fn rom_ranges(pick in any::<Index>(), offset in 0.0f64..1.0) {
        accepts_exactly_range::<RomField>(pick, offset)?;
    }

    #[test]
    fn non_numeric_text_rejected(pick in any::<Index>(), word in "[a-z]{1,8}") {
        let fields = ranged::<RomField>();
        let (field, _, _) = fields[pick.index(fields.len())];
        prop_assert!(field.check(&Value::Text(word)).is_err());
    }
}
