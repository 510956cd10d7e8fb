use crate::model::{Item, Key};

/// Two keys are the same when they name the same attributes with equal values.
pub fn same_key(a: &Key, b: &Key) -> bool {
    a.len() == b.len() && key_matches_item(a, b)
}

/// Whether every attribute of `key` is present in `item` with the same value.
pub fn key_matches_item(key: &Key, item: &Item) -> bool {
    key.iter()
        .all(|(name, value)| item.get(name).is_some_and(|v| v == value))
}

/// Drop repeated keys, keeping the first occurrence of each in input order.
///
/// Attribute values are not hashable, so this compares pairwise. Inputs are
/// bounded by what a caller asks for in one `get_list`.
pub fn dedupe_keys<I>(keys: I) -> Vec<Key>
where
    I: IntoIterator<Item = Key>,
{
    let mut unique: Vec<Key> = Vec::new();
    for key in keys {
        if !unique.iter().any(|seen| same_key(seen, &key)) {
            unique.push(key);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::AttributeValue;
    use std::collections::HashMap;

    fn key(pairs: &[(&str, &str)]) -> Key {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), AttributeValue::S(v.to_string())))
            .collect()
    }

    #[test]
    fn test_same_key_ignores_attribute_order() {
        let a = key(&[("pk", "1"), ("sk", "x")]);
        let b = key(&[("sk", "x"), ("pk", "1")]);
        assert!(same_key(&a, &b));
    }

    #[test]
    fn test_same_key_requires_same_attribute_names() {
        let a = key(&[("pk", "1")]);
        let b = key(&[("pk", "1"), ("sk", "x")]);
        assert!(!same_key(&a, &b));
        assert!(!same_key(&b, &a));
    }

    #[test]
    fn test_same_key_compares_value_types() {
        let s = key(&[("pk", "1")]);
        let n: Key = HashMap::from([("pk".to_string(), AttributeValue::N("1".to_string()))]);
        assert!(!same_key(&s, &n));
    }

    #[test]
    fn test_key_matches_item_with_extra_attributes() {
        let k = key(&[("pk", "1")]);
        let item = key(&[("pk", "1"), ("name", "alice")]);
        assert!(key_matches_item(&k, &item));
        assert!(!key_matches_item(&item, &k));
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence_order() {
        let keys = vec![
            key(&[("pk", "b")]),
            key(&[("pk", "a")]),
            key(&[("pk", "b")]),
            key(&[("pk", "c")]),
            key(&[("pk", "a")]),
        ];

        let unique = dedupe_keys(keys);

        assert_eq!(
            unique,
            vec![key(&[("pk", "b")]), key(&[("pk", "a")]), key(&[("pk", "c")])]
        );
    }

    #[test]
    fn test_dedupe_leaves_no_structural_duplicates() {
        let keys: Vec<Key> = (0..50)
            .map(|i| key(&[("pk", &(i % 7).to_string()), ("sk", "s")]))
            .collect();

        let unique = dedupe_keys(keys);

        assert_eq!(unique.len(), 7);
        for (i, a) in unique.iter().enumerate() {
            for b in unique.iter().skip(i + 1) {
                assert!(!same_key(a, b));
            }
        }
    }

    #[test]
    fn test_dedupe_empty() {
        assert!(dedupe_keys(Vec::new()).is_empty());
    }
}
