//! Property-based tests for test case generation
//!
//! Uses proptest to generate random parameter sets and verify invariants

use chtoolbox::{create_test_cases, generate_test_results, NamedFn, ParameterSet, Value};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn test_case_count_is_product(set in any_parameter_set()) {
        let cases = create_test_cases(&set).unwrap();
        let product: usize = set.iter().map(|(_, values)| values.len()).product();
        prop_assert_eq!(cases.len(), product);
    }

    #[test]
    fn test_every_case_has_every_parameter(set in any_parameter_set()) {
        let cases = create_test_cases(&set).unwrap();
        let names: Vec<&str> = set.names().collect();
        for (_, case) in cases.iter() {
            // Same keys, in parameter order
            prop_assert_eq!(case.keys().map(String::as_str).collect::<Vec<_>>(), names.clone());
            for (name, value) in case.iter() {
                prop_assert!(set.values(name).unwrap().contains(value));
            }
        }
    }

    #[test]
    fn test_cases_are_distinct(set in any_parameter_set()) {
        let cases = create_test_cases(&set).unwrap();
        let distinct: HashSet<String> = cases
            .iter()
            .map(|(_, case)| format!("{:?}", case))
            .collect();
        prop_assert_eq!(distinct.len(), cases.len());
    }

    #[test]
    fn test_generation_is_deterministic(set in any_parameter_set()) {
        let first = create_test_cases(&set).unwrap();
        let second = create_test_cases(&set).unwrap();
        prop_assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_outputs_match_function(set in any_parameter_set()) {
        let cases = create_test_cases(&set).unwrap();
        let names: Vec<String> = set.names().map(String::from).collect();
        let sum = NamedFn::new(names, |args: &[Value]| -> chtoolbox::Result<i64> {
            Ok(args.iter().filter_map(Value::as_i64).sum())
        });

        let results = generate_test_results(&sum, &cases, false).unwrap();
        prop_assert_eq!(results.len(), cases.len());
        for (label, record) in results.iter() {
            prop_assert_eq!(record.input(), cases.get(label).unwrap());
            let expected: i64 = record.input().values().filter_map(Value::as_i64).sum();
            prop_assert_eq!(*record.output(), expected);
        }
    }
}

fn any_parameter_set() -> impl Strategy<Value = ParameterSet> {
    let values = prop::collection::hash_set(-50i64..50, 1..=4)
        .prop_map(|set| set.into_iter().map(Value::Int).collect::<Vec<_>>());

    prop::collection::vec(values, 1..=4).prop_map(|columns| {
        let mut set = ParameterSet::new();
        for (i, values) in columns.into_iter().enumerate() {
            set.insert(format!("p{}", i), values);
        }
        set
    })
}
