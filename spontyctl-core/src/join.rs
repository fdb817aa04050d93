//! Client-side join helpers.
//!
//! The backend exposes flat tables, so every "friendship with profile"
//! style read is two fetches stitched together locally. These helpers
//! cover the two shapes that come up: unique joins (one profile per
//! friendship) and grouping (many invitations per event).

use std::collections::HashMap;
use std::hash::Hash;

/// Index rows by a unique key. Later duplicates win, matching the
/// last-write behavior of building a map from a keyed fetch.
pub fn index_by<T, K, F>(rows: Vec<T>, key: F) -> HashMap<K, T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut map = HashMap::with_capacity(rows.len());
    for row in rows {
        map.insert(key(&row), row);
    }
    map
}

/// Group rows by a non-unique key, preserving per-key insertion order.
pub fn bucket_by<T, K, F>(rows: Vec<T>, key: F) -> HashMap<K, Vec<T>>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut map: HashMap<K, Vec<T>> = HashMap::new();
    for row in rows {
        map.entry(key(&row)).or_default().push(row);
    }
    map
}

/// Join left rows to right rows keyed uniquely on the right side, and
/// combine each pair. Left keys may repeat; each occurrence pairs with
/// the same right row.
///
/// Left rows with no match are dropped silently: a friend whose profile
/// row is missing simply does not appear in the combined list. Output
/// order follows the left side.
pub fn join_unique<L, R, K, T>(
    left: Vec<L>,
    right: Vec<R>,
    left_key: impl Fn(&L) -> K,
    right_key: impl Fn(&R) -> K,
    combine: impl Fn(L, R) -> T,
) -> Vec<T>
where
    K: Eq + Hash,
    R: Clone,
{
    let lookup = index_by(right, right_key);
    left.into_iter()
        .filter_map(|l| {
            let r = lookup.get(&left_key(&l))?.clone();
            Some(combine(l, r))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        key: u32,
        label: &'static str,
    }

    fn row(key: u32, label: &'static str) -> Row {
        Row { key, label }
    }

    #[test]
    fn test_index_by_unique_keys() {
        let map = index_by(vec![row(1, "a"), row(2, "b")], |r| r.key);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&1].label, "a");
    }

    #[test]
    fn test_bucket_by_groups_and_keeps_order() {
        let rows = vec![row(1, "a"), row(2, "b"), row(1, "c")];
        let map = bucket_by(rows, |r| r.key);
        assert_eq!(map[&1].len(), 2);
        assert_eq!(map[&1][0].label, "a");
        assert_eq!(map[&1][1].label, "c");
        assert_eq!(map[&2].len(), 1);
    }

    #[test]
    fn test_join_unique_preserves_left_order() {
        let left = vec![row(3, "l3"), row(1, "l1"), row(2, "l2")];
        let right = vec![row(1, "r1"), row(2, "r2"), row(3, "r3")];
        let joined = join_unique(
            left,
            right,
            |l| l.key,
            |r| r.key,
            |l, r| (l.label, r.label),
        );
        assert_eq!(joined, vec![("l3", "r3"), ("l1", "r1"), ("l2", "r2")]);
    }

    #[test]
    fn test_join_unique_drops_unmatched_left_rows() {
        let left = vec![row(1, "l1"), row(9, "l9")];
        let right = vec![row(1, "r1")];
        let joined = join_unique(left, right, |l| l.key, |r| r.key, |l, r| (l.key, r.key));
        assert_eq!(joined, vec![(1, 1)]);
    }

    #[test]
    fn test_join_unique_repeated_left_keys_share_right_row() {
        // Two memberships of the same friend both resolve to one profile.
        let left = vec![row(1, "m1"), row(1, "m2")];
        let right = vec![row(1, "p1")];
        let joined = join_unique(
            left,
            right,
            |l| l.key,
            |r| r.key,
            |l, r| (l.label, r.label),
        );
        assert_eq!(joined, vec![("m1", "p1"), ("m2", "p1")]);
    }

    #[test]
    fn test_join_unique_empty_sides() {
        let joined: Vec<(u32, u32)> = join_unique(
            Vec::<Row>::new(),
            vec![row(1, "r1")],
            |l| l.key,
            |r| r.key,
            |l, r| (l.key, r.key),
        );
        assert!(joined.is_empty());
    }
}
