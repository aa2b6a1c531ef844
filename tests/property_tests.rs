//! Property tests for the matcher's counting and pairing invariants.

use json_reconcile::{compare, ComparisonConfig, ComparisonResult};
use proptest::prelude::*;

fn record() -> impl Strategy<Value = serde_json::Value> {
    (0u8..5, prop::sample::select(vec!["a", "A", "b"]), any::<bool>()).prop_map(
        |(id, name, with_extra)| {
            let mut record = serde_json::json!({"id": id, "name": name});
            if with_extra {
                record["extra"] = serde_json::json!([id, name]);
            }
            record
        },
    )
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(record(), 0..12)
        .prop_map(|records| serde_json::Value::Array(records).to_string())
}

fn config() -> impl Strategy<Value = ComparisonConfig> {
    (
        prop::sample::select(vec![vec![], vec!["id"], vec!["id", "name"], vec!["extra"]]),
        any::<bool>(),
    )
        .prop_map(|(fields, case_sensitive)| {
            ComparisonConfig::new()
                .with_fields(fields)
                .with_case_sensitive(case_sensitive)
        })
}

fn without_timestamp(result: &ComparisonResult) -> serde_json::Value {
    let mut json = serde_json::to_value(result).unwrap();
    json.as_object_mut().unwrap().remove("comparison_timestamp");
    json
}

proptest! {
    #[test]
    fn prop_every_record_lands_in_one_bucket(
        first in document(),
        second in document(),
        config in config(),
    ) {
        let result = compare(&first, &second, &config).unwrap();
        let s = &result.summary;

        prop_assert_eq!(
            s.total_objects_in_first,
            s.matching_objects + s.objects_with_differences + s.only_in_first_count
        );
        prop_assert_eq!(
            s.total_objects_in_second,
            s.matching_objects + s.objects_with_differences + s.only_in_second_count
        );
        prop_assert_eq!(s.only_in_first_count, result.only_in_first.len());
        prop_assert_eq!(s.only_in_second_count, result.only_in_second.len());
        prop_assert_eq!(s.objects_with_differences, result.differences.len());
    }

    #[test]
    fn prop_comparison_is_deterministic(
        first in document(),
        second in document(),
        config in config(),
    ) {
        let a = compare(&first, &second, &config).unwrap();
        let b = compare(&first, &second, &config).unwrap();
        prop_assert_eq!(without_timestamp(&a), without_timestamp(&b));
    }

    #[test]
    fn prop_field_subset_pairs_never_differ(
        first in document(),
        second in document(),
        case_sensitive in any::<bool>(),
    ) {
        let config = ComparisonConfig::new()
            .with_fields(["id", "name"])
            .with_case_sensitive(case_sensitive);
        let result = compare(&first, &second, &config).unwrap();

        // Any difference on a compared field blocks the pair
        prop_assert!(result.differences.is_empty());
    }

    #[test]
    fn prop_full_tree_pairs_greedily(first in document(), second in document()) {
        let result = compare(&first, &second, &ComparisonConfig::default()).unwrap();
        let s = &result.summary;
        let paired = s.total_objects_in_first.min(s.total_objects_in_second);

        prop_assert_eq!(s.matching_objects + s.objects_with_differences, paired);
        for detail in &result.differences {
            prop_assert!(!detail.field_differences.is_empty());
        }
    }

    #[test]
    fn prop_document_reconciles_with_itself(first in document(), config in config()) {
        let result = compare(&first, &first, &config).unwrap();
        prop_assert!(result.only_in_first.is_empty());
        prop_assert!(result.only_in_second.is_empty());
    }
}
