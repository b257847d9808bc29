//! End-to-end extraction scenarios and properties.

use std::collections::HashMap;

use proptest::prelude::*;
use valextract::convert::{as_string, as_u64};
use valextract::{ErrorKind, ExtractionError, Extractor, MapSource};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("valextract=trace")
        .with_test_writer()
        .try_init();
}

#[test]
fn scenario_all_values_present() {
    init_tracing();
    let source = MapSource::new().with("id", "123").with("name", "John");
    let mut id = 0;
    let mut name = String::new();

    let mut ex = Extractor::using(&source);
    ex.with("id", as_u64(&mut id));
    ex.with("name", as_string(&mut name));

    assert_eq!(id, 123);
    assert_eq!(name, "John");
    assert!(ex.errors().is_empty());
}

#[test]
fn scenario_optional_key_absent() {
    init_tracing();
    let source = MapSource::new().with("name", "John");
    let mut name = String::new();
    let mut age = 0;

    let mut ex = Extractor::with_optional_keys(&source, ["age"]);
    ex.with("name", as_string(&mut name));
    ex.with("age", as_u64(&mut age));

    assert_eq!(name, "John");
    assert_eq!(age, 0);
    assert!(ex.errors().is_empty());
}

#[test]
fn scenario_malformed_value() {
    init_tracing();
    let source = MapSource::new().with("age", "abc");
    let mut age = 0;

    let mut ex = Extractor::using(&source);
    ex.with("age", as_u64(&mut age));

    assert_eq!(age, 0);
    let errors = ex.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].key(), "age");
    assert_eq!(errors[0].kind(), ErrorKind::Conversion);
    let ExtractionError::Convert { source, .. } = &errors[0] else {
        panic!("expected conversion failure");
    };
    assert!(source.cause().is::<std::num::ParseIntError>());
}

#[test]
fn scenario_required_key_absent() {
    init_tracing();
    let source = MapSource::new();
    let mut age = 0;

    let mut ex = Extractor::using(&source);
    ex.with("age", as_u64(&mut age));

    let errors = ex.finish().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.as_slice()[0].key(), "age");
    assert_eq!(errors.as_slice()[0].kind(), ErrorKind::NotFound);
    assert_eq!(errors.to_string(), "age: key not found");
}

#[test]
fn plain_hash_map_is_a_source() {
    let map: HashMap<String, String> = [("n".to_string(), "5".to_string())].into_iter().collect();
    let mut n = 0;

    let mut ex = Extractor::using(&map);
    ex.with("n", as_u64(&mut n));

    assert_eq!(n, 5);
    assert!(ex.errors().is_empty());
}

#[derive(Debug, Clone)]
enum Entry {
    Valid(u64),
    Malformed,
    Absent,
}

fn entry() -> impl Strategy<Value = (Entry, bool)> {
    let kind = prop_oneof![
        any::<u64>().prop_map(Entry::Valid),
        Just(Entry::Malformed),
        Just(Entry::Absent),
    ];
    (kind, any::<bool>())
}

proptest! {
    #[test]
    fn errors_follow_call_order_and_policy(entries in prop::collection::vec(entry(), 0..16)) {
        let mut source = MapSource::new();
        let mut optional = Vec::new();
        for (i, (kind, is_optional)) in entries.iter().enumerate() {
            let key = format!("k{i}");
            match kind {
                Entry::Valid(v) => source.insert(key.clone(), v.to_string()),
                Entry::Malformed => source.insert(key.clone(), "x1"),
                Entry::Absent => {}
            }
            if *is_optional {
                optional.push(key);
            }
        }

        let mut values = vec![0_u64; entries.len()];
        let mut ex = Extractor::with_optional_keys(&source, optional);
        for (i, value) in values.iter_mut().enumerate() {
            ex.with(&format!("k{i}"), as_u64(value));
        }

        let mut expected = Vec::new();
        for (i, (kind, is_optional)) in entries.iter().enumerate() {
            match kind {
                Entry::Valid(v) => {
                    prop_assert_eq!(values[i], *v);
                }
                Entry::Malformed => {
                    prop_assert_eq!(values[i], 0);
                    expected.push((format!("k{i}"), ErrorKind::Conversion));
                }
                Entry::Absent => {
                    prop_assert_eq!(values[i], 0);
                    if !is_optional {
                        expected.push((format!("k{i}"), ErrorKind::NotFound));
                    }
                }
            }
        }

        let actual: Vec<_> = ex
            .errors()
            .iter()
            .map(|e| (e.key().to_string(), e.kind()))
            .collect();
        prop_assert_eq!(actual, expected);

        let first = ex.joined_errors().map(|e| e.to_string());
        let second = ex.joined_errors().map(|e| e.to_string());
        prop_assert_eq!(first, second);
    }
}
