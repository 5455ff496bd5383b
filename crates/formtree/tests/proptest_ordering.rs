//! Property-based tests of the dependency ordering of children.
//!
//! For any acyclic dependency graph, added in any order:
//!
//! 1. Every child is submitted after all of its dependencies.
//! 2. Every dependency sits on a strictly deeper level than its dependant.
//! 3. Display order is the exact mirror of submission order.
//! 4. A duplicated collection keeps the same order.

use formtree::{Child, ContainerId, DependencyTree, StringElement};
use proptest::prelude::*;

/// Dependencies of node `i` point to nodes with a lower index, so the graph
/// is acyclic. The second vector is the insertion order.
fn graph_strategy() -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<usize>)> {
    (1usize..14).prop_flat_map(|n| {
        let dependencies: Vec<_> = (0..n)
            .map(|i| proptest::collection::vec(0..i.max(1), 0..=i.min(3)))
            .collect();
        let order = Just((0..n).collect::<Vec<_>>()).prop_shuffle();
        (dependencies, order)
    })
}

fn name(i: usize) -> String {
    format!("f{i}")
}

fn build(dependencies: &[Vec<usize>], order: &[usize]) -> DependencyTree {
    let mut tree = DependencyTree::new();
    for &i in order {
        let child = Child::new(name(i), Box::new(StringElement::new()))
            .with_dependencies(dependencies[i].iter().map(|&d| name(d)));
        tree.add(child);
    }
    tree
}

proptest! {
    #[test]
    fn dependencies_are_submitted_first((dependencies, order) in graph_strategy()) {
        let tree = build(&dependencies, &order);
        let submission: Vec<&str> = tree.reverse_names().collect();
        prop_assert_eq!(submission.len(), dependencies.len());

        let position = |n: &str| submission.iter().position(|s| *s == n);
        for (i, deps) in dependencies.iter().enumerate() {
            for &d in deps {
                prop_assert!(
                    position(&name(d)) < position(&name(i)),
                    "{} submitted before its dependency {}: {:?}",
                    name(i), name(d), submission
                );
            }
        }
    }
}

proptest! {
    #[test]
    fn dependencies_sit_deeper((dependencies, order) in graph_strategy()) {
        let tree = build(&dependencies, &order);
        for (i, deps) in dependencies.iter().enumerate() {
            let depth = tree.depth_of(&name(i));
            prop_assert!(depth.is_some());
            for &d in deps {
                prop_assert!(tree.depth_of(&name(d)) > depth);
            }
        }
    }
}

proptest! {
    #[test]
    fn display_order_mirrors_submission_order((dependencies, order) in graph_strategy()) {
        let tree = build(&dependencies, &order);
        let submission: Vec<&str> = tree.reverse_names().collect();
        let mut display: Vec<&str> = tree.forward_names().collect();
        display.reverse();
        prop_assert_eq!(display, submission);
    }
}

proptest! {
    #[test]
    fn duplicate_keeps_order((dependencies, order) in graph_strategy()) {
        let tree = build(&dependencies, &order);
        let parent = ContainerId::new();
        let copy = tree.duplicate(parent);

        let original: Vec<&str> = tree.reverse_names().collect();
        let duplicated: Vec<&str> = copy.reverse_names().collect();
        prop_assert_eq!(original, duplicated);
        prop_assert!(copy.forward_iter().all(|child| child.parent() == Some(parent)));
    }
}
