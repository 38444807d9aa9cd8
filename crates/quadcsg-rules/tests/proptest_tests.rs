//! Property-based tests for rule-tree invariants using the `proptest` crate.

use proptest::prelude::*;

use quadcsg_rules::{Resolver, Rule, RuleTree};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Surfaces the generated rules draw from.
const VARS: [i32; 4] = [1, 2, 3, 4];

/// Arbitrary signed leaf over `VARS`.
fn arb_leaf() -> impl Strategy<Value = Rule> {
    (0..VARS.len(), any::<bool>()).prop_map(|(i, neg)| {
        let id = VARS[i];
        Rule::surface(if neg { -id } else { id })
    })
}

/// Arbitrary rule tree with intersections, unions and complement groups.
fn arb_rule() -> impl Strategy<Value = Rule> {
    arb_leaf().prop_recursive(5, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Rule::and(a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Rule::or(a, b)),
            inner.prop_map(Rule::complement),
        ]
    })
}

/// One row of the truth table over `VARS`, with `0` meaning on the surface.
struct Row([i8; 4]);

impl Resolver for Row {
    fn side(&self, id: i32) -> i8 {
        self.0[VARS.iter().position(|&v| v == id).unwrap()]
    }

    fn object(&self, _id: i32) -> bool {
        false
    }
}

/// Every row with each surface strictly inside or outside.
fn rows() -> impl Iterator<Item = Row> {
    (0..16usize).map(|bits| {
        let mut sides = [0i8; 4];
        for (i, s) in sides.iter_mut().enumerate() {
            *s = if bits >> i & 1 == 1 { 1 } else { -1 };
        }
        Row(sides)
    })
}

fn same_function(a: &RuleTree, b: &RuleTree) -> bool {
    rows().all(|row| a.is_valid_with(&row) == b.is_valid_with(&row))
}

// ---------------------------------------------------------------------------
// 1. Display round-trip preserves the truth table
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn display_round_trip(rule in arb_rule()) {
        let tree = RuleTree::new(rule);
        let text = tree.display();
        let again = RuleTree::parse(&text).unwrap();
        prop_assert!(same_function(&tree, &again), "round trip changed `{}`", text);
        prop_assert_eq!(again.display(), text);
    }
}

// ---------------------------------------------------------------------------
// 2. Complementary-pair removal preserves the truth table
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn remove_complementary_preserves_function(rule in arb_rule()) {
        let tree = RuleTree::new(rule);
        let mut simplified = tree.clone();
        simplified.remove_complementary();
        prop_assert!(same_function(&tree, &simplified),
            "`{}` became `{}`", tree, simplified);
        prop_assert!(simplified.leaf_count() <= tree.leaf_count());
    }
}

// ---------------------------------------------------------------------------
// 3. DNF and CNF are equivalent to the input and free of complements
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn two_level_forms_preserve_function(rule in arb_rule()) {
        let tree = RuleTree::new(rule);
        let dnf = tree.make_dnf(8).unwrap();
        let cnf = tree.make_cnf(8).unwrap();
        prop_assert!(same_function(&tree, &dnf), "dnf of `{}` is `{}`", tree, dnf);
        prop_assert!(same_function(&tree, &cnf), "cnf of `{}` is `{}`", tree, cnf);
        prop_assert!(!dnf.has_complement());
        prop_assert!(!cnf.has_complement());
    }
}

// ---------------------------------------------------------------------------
// 4. Substituting a surface back and forth is the identity
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn substitute_round_trip(rule in arb_rule(), target in 1i32..=4) {
        let tree = RuleTree::new(rule);
        let mut t = tree.clone();
        let n = t.substitute_surf(target, -99);
        prop_assert_eq!(n, tree.leaves_of(target));
        prop_assert_eq!(t.substitute_surf(99, -target), n);
        prop_assert_eq!(t, tree);
    }
}

trait LeavesOf {
    fn leaves_of(&self, id: i32) -> usize;
}

impl LeavesOf for RuleTree {
    fn leaves_of(&self, id: i32) -> usize {
        self.root()
            .map_or(0, |r| r.leaves().iter().filter(|p| p.id() == id).count())
    }
}
