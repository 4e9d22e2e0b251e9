//! Composable filter stages applied left to right over a candidate set

use std::collections::HashSet;
use std::hash::Hash;
use tracing::trace;

type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + Send + Sync + 'a>;

struct Stage<'a, T> {
    name: &'static str,
    predicate: Predicate<'a, T>,
}

/// An ordered list of named predicates.
///
/// Stages run in insertion order; a candidate survives only if every stage
/// accepts it. Relative order of survivors is preserved.
pub struct FilterChain<'a, T> {
    stages: Vec<Stage<'a, T>>,
}

impl<'a, T> Default for FilterChain<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> FilterChain<'a, T> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn then<F>(mut self, name: &'static str, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'a,
    {
        self.stages.push(Stage {
            name,
            predicate: Box::new(predicate),
        });
        self
    }

    /// Add the stage only when `enabled` holds.
    pub fn then_if<F>(self, enabled: bool, name: &'static str, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'a,
    {
        if enabled {
            self.then(name, predicate)
        } else {
            self
        }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name).collect()
    }

    pub fn apply<I>(&self, candidates: I) -> Vec<T>
    where
        I: IntoIterator<Item = T>,
    {
        let mut survivors: Vec<T> = candidates.into_iter().collect();
        for stage in &self.stages {
            let before = survivors.len();
            survivors.retain(|candidate| (stage.predicate)(candidate));
            trace!(
                stage = stage.name,
                before,
                after = survivors.len(),
                "filter stage applied"
            );
        }
        survivors
    }
}

/// Drop later duplicates by key, keeping first occurrences in order.
pub fn unique_by<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chain_keeps_everything() {
        let chain: FilterChain<'_, i32> = FilterChain::new();
        assert_eq!(chain.apply(vec![3, 1, 2]), vec![3, 1, 2]);
    }

    #[test]
    fn test_stages_are_conjunctive_and_order_preserving() {
        let chain = FilterChain::new()
            .then("even", |n: &i32| n % 2 == 0)
            .then("small", |n: &i32| *n < 10);

        assert_eq!(chain.apply(vec![12, 4, 7, 8, 2, 20]), vec![4, 8, 2]);
        assert_eq!(chain.stage_names(), vec!["even", "small"]);
    }

    #[test]
    fn test_conditional_stage() {
        let threshold = 5;
        let chain = FilterChain::new()
            .then_if(false, "skipped", |_: &i32| false)
            .then_if(true, "above", move |n: &i32| *n > threshold);

        assert_eq!(chain.stage_names(), vec!["above"]);
        assert_eq!(chain.apply(vec![1, 6, 9]), vec![6, 9]);
    }

    #[test]
    fn test_unique_by_keeps_first_occurrence() {
        let items = vec![(1, "a"), (2, "b"), (1, "c"), (3, "d"), (2, "e")];
        let unique = unique_by(items, |(id, _)| *id);
        assert_eq!(unique, vec![(1, "a"), (2, "b"), (3, "d")]);
    }
}
