use std::collections::HashSet;
use std::rc::Rc;

use crate::index::{Association, Index};
use crate::model::casefold;

/// Distinct entries having a token that starts with `query`, in the order
/// their first matching token appears in the index.
///
/// The query is casefolded before matching. An empty query matches nothing.
pub fn search<T>(index: &Index<T>, query: &str) -> Vec<Rc<T>> {
    if query.is_empty() || index.is_empty() {
        return Vec::new();
    }

    let key = casefold(query);
    let run = prefix_run(index, &key);

    let mut seen: HashSet<*const T> = HashSet::with_capacity(run.len());
    let mut results = Vec::new();
    for association in run {
        let entry = association.entry();
        if seen.insert(Rc::as_ptr(entry)) {
            results.push(Rc::clone(entry));
        }
    }

    tracing::trace!(
        query = %key,
        run = run.len(),
        results = results.len(),
        "prefix search"
    );
    results
}

/// The contiguous associations starting at the collation lower bound of an
/// already casefolded `key` whose tokens have `key` as a prefix.
pub fn prefix_run<'a, T>(index: &'a Index<T>, key: &str) -> &'a [Association<T>] {
    let start = index.lower_bound(key);
    let tail = &index.associations()[start..];
    let len = tail
        .iter()
        .take_while(|association| association.token().starts_with(key))
        .count();
    &tail[..len]
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::{prefix_run, search};
    use crate::collation::Collation;
    use crate::index::{build_index, Index};
    use crate::model::casefold;

    /// Upper-bound search followed by a walk back over byte-equal tokens and a
    /// forward scan with linear dedup.
    fn search_with_backward_scan(index: &Index<usize>, query: &str) -> Vec<Rc<usize>> {
        if query.is_empty() {
            return Vec::new();
        }
        let key = casefold(query);
        let associations = index.associations();
        let mut position = associations.partition_point(|association| {
            index.collation().compare(association.token(), &key) != Ordering::Greater
        });
        while position > 0 && associations[position - 1].token() == key {
            position -= 1;
        }

        let mut results: Vec<Rc<usize>> = Vec::new();
        for association in &associations[position..] {
            if !association.token().starts_with(&key) {
                break;
            }
            if !results.iter().any(|seen| Rc::ptr_eq(seen, association.entry())) {
                results.push(Rc::clone(association.entry()));
            }
        }
        results
    }

    fn index_of(names: &[String]) -> Index<usize> {
        let collation = Rc::new(Collation::for_locale("en").unwrap());
        build_index(
            collation,
            names
                .iter()
                .enumerate()
                .map(|(value, name)| (name.clone(), Rc::new(value))),
        )
    }

    fn values(entries: &[Rc<usize>]) -> Vec<usize> {
        entries.iter().map(|entry| **entry).collect()
    }

    #[test]
    fn run_excludes_tokens_past_the_prefix() {
        let index = index_of(&["alice".into(), "alicia".into(), "alina".into(), "bob".into()]);
        let tokens: Vec<&str> = prefix_run(&index, "alic")
            .iter()
            .map(|association| association.token())
            .collect();
        assert_eq!(tokens, vec!["alice", "alicia"]);
    }

    #[test]
    fn search_on_empty_index_is_empty() {
        let index = index_of(&[]);
        assert!(search(&index, "a").is_empty());
    }

    proptest! {
        #[test]
        fn repeated_search_is_identical(
            names in prop::collection::vec("[a-z]{1,5}( [a-z]{1,5}){0,2}", 0..24),
            query in "[a-z]{0,3}",
        ) {
            let index = index_of(&names);
            let first = search(&index, &query);
            let second = search(&index, &query);
            prop_assert_eq!(first.len(), second.len());
            for (left, right) in first.iter().zip(&second) {
                prop_assert!(Rc::ptr_eq(left, right));
            }
        }

        #[test]
        fn forward_scan_matches_backward_scan(
            names in prop::collection::vec("[a-z]{1,5}( [a-z]{1,5}){0,2}", 0..24),
            query in "[a-zA-Z]{0,3}",
        ) {
            let index = index_of(&names);
            prop_assert_eq!(
                values(&search(&index, &query)),
                values(&search_with_backward_scan(&index, &query))
            );
        }

        #[test]
        fn results_are_distinct_and_all_match(
            names in prop::collection::vec("[a-z]{1,4}( [a-z]{1,4}){0,3}", 0..24),
            query in "[a-z]{1,2}",
        ) {
            let index = index_of(&names);
            let found = values(&search(&index, &query));

            let mut deduped = found.clone();
            deduped.sort_unstable();
            deduped.dedup();
            prop_assert_eq!(deduped.len(), found.len());

            let mut expected: Vec<usize> = names
                .iter()
                .enumerate()
                .filter(|(_, name)| name.split(' ').any(|token| token.starts_with(&query)))
                .map(|(value, _)| value)
                .collect();
            expected.sort_unstable();
            prop_assert_eq!(deduped, expected);
        }
    }
}
