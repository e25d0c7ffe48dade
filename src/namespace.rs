//! Namespace Key Codec
//!
//! Derives the composite key the store sees from a (namespace, key) pair.
//! The namespace is escaped so that the first unescaped separator always ends
//! it; the key is appended as-is. No two distinct pairs share a composite key.

/// Separator between namespace and key.
pub const SEPARATOR: char = ':';

const ESCAPE: char = '\\';

// == Encode ==
/// Builds the composite key for `key` in `namespace`.
pub fn encode(namespace: &str, key: &str) -> String {
    let mut composite = prefix(namespace);
    composite.push_str(key);
    composite
}

// == Prefix ==
/// Returns the prefix shared by every composite key of `namespace`.
pub fn prefix(namespace: &str) -> String {
    let mut out = String::with_capacity(namespace.len() + 1);
    for ch in namespace.chars() {
        if ch == ESCAPE || ch == SEPARATOR {
            out.push(ESCAPE);
        }
        out.push(ch);
    }
    out.push(SEPARATOR);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_namespace() {
        assert_eq!(encode("users", "42"), "users:42");
        assert_eq!(prefix("users"), "users:");
    }

    #[test]
    fn test_separator_in_key_and_namespace_do_not_collide() {
        let a = encode("a", "b:c");
        let b = encode("a:b", "c");
        assert_ne!(a, b);
        assert_eq!(a, "a:b:c");
        assert_eq!(b, "a\\:b:c");
    }

    #[test]
    fn test_prefix_isolates_namespaces() {
        assert!(encode("users", "42").starts_with(&prefix("users")));
        assert!(!encode("users2", "42").starts_with(&prefix("users")));
        assert!(!encode("a:b", "c").starts_with(&prefix("a")));
        assert!(encode("a", "b:c").starts_with(&prefix("a")));
    }

    #[test]
    fn test_empty_parts() {
        assert_eq!(encode("", "k"), ":k");
        assert_eq!(encode("ns", ""), "ns:");
        assert!(!encode("ns", "").starts_with(&prefix("")));
    }

    fn part() -> impl Strategy<Value = String> {
        "[a-c:\\\\]{0,6}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_distinct_pairs_never_collide(
            ns1 in part(), k1 in part(), ns2 in part(), k2 in part()
        ) {
            prop_assume!((&ns1, &k1) != (&ns2, &k2));
            prop_assert_ne!(encode(&ns1, &k1), encode(&ns2, &k2));
        }

        #[test]
        fn prop_membership_matches_namespace(ns in part(), other in part(), key in part()) {
            let composite = encode(&ns, &key);
            prop_assert_eq!(composite.starts_with(&prefix(&other)), ns == other);
        }
    }
}
