//! The owning rule tree and its structural rewrites.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Result, RuleError};
use crate::parse::parse_rule;
use crate::rule::{Resolver, Rule, SurfPoint};

/// A rule tree. An emptied tree has no root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTree {
    root: Option<Rule>,
}

impl RuleTree {
    /// Tree with the given root.
    pub fn new(root: Rule) -> Self {
        Self { root: Some(root) }
    }

    /// Parse rule text such as `"10 -11 : 12"`.
    pub fn parse(text: &str) -> Result<Self> {
        let root = parse_rule(text)?;
        debug!(rule = %root, "parsed rule");
        Ok(Self::new(root))
    }

    /// The root node, if any.
    pub fn root(&self) -> Option<&Rule> {
        self.root.as_ref()
    }

    /// Replace the root.
    pub fn set_root(&mut self, root: Option<Rule>) {
        self.root = root;
    }

    /// True if every node has been removed.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Canonical infix text; empty for an empty tree.
    pub fn display(&self) -> String {
        self.root.as_ref().map(Rule::to_string).unwrap_or_default()
    }

    /// `1` if the root group is all intersections, `-1` if all unions,
    /// `0` for a leaf, a mixed group or an empty tree.
    pub fn common_type(&self) -> i8 {
        self.root.as_ref().map_or(0, Rule::common_type)
    }

    /// Evaluate against a resolver. An empty tree accepts nothing.
    pub fn is_valid_with<R: Resolver + ?Sized>(&self, resolver: &R) -> bool {
        self.root
            .as_ref()
            .is_some_and(|r| r.is_valid_with(resolver))
    }

    /// Distinct surface numbers referenced.
    pub fn surface_ids(&self) -> BTreeSet<i32> {
        self.root.as_ref().map(Rule::surface_ids).unwrap_or_default()
    }

    /// Distinct cells referenced through `#N`.
    pub fn object_ids(&self) -> BTreeSet<i32> {
        self.root.as_ref().map(Rule::object_ids).unwrap_or_default()
    }

    /// Number of surface leaves.
    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, Rule::leaf_count)
    }

    /// True if any complement node is present.
    pub fn has_complement(&self) -> bool {
        self.root.as_ref().is_some_and(Rule::has_complement)
    }

    /// Rewrite every leaf of surface `|old|` to surface `|new|`.
    ///
    /// A negative `new` flips the sense of each rewritten leaf. Returns the
    /// number of leaves rewritten.
    pub fn substitute_surf(&mut self, old: i32, new: i32) -> usize {
        let (old, new_id) = (old.abs(), new.abs());
        let mut count = 0;
        if let Some(root) = &mut self.root {
            root.for_each_leaf_mut(&mut |p| {
                if p.id() == old {
                    let mut q = SurfPoint::new(new_id);
                    if (p.sign() < 0) != (new < 0) {
                        q = q.negated();
                    }
                    *p = q;
                    count += 1;
                }
            });
        }
        count
    }

    /// Remove every leaf of surface `id`, collapsing the parents.
    ///
    /// A binary node losing one child becomes the survivor; a node losing
    /// both is removed from its own parent in turn. Returns the number of
    /// leaves removed.
    pub fn remove_item(&mut self, id: i32) -> usize {
        let id = id.abs();
        let mut count = 0;
        self.root = self
            .root
            .take()
            .and_then(|r| remove_leaves(r, id, &mut count));
        count
    }

    /// Drop duplicate operands and resolve complementary pairs.
    ///
    /// Within every maximal group of one connective, each repeated operand
    /// is one elimination. A literal together with its negation (or a group
    /// with its complement) collapses a union to `T` and an intersection to
    /// `F`, also one elimination. Constants fold without being counted.
    pub fn remove_complementary(&mut self) -> usize {
        let mut count = 0;
        if let Some(root) = self.root.take() {
            self.root = Some(simplify(root, &mut count));
        }
        count
    }
}

impl FromStr for RuleTree {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RuleTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(r) => write!(f, "{r}"),
            None => Ok(()),
        }
    }
}

fn remove_leaves(rule: Rule, id: i32, count: &mut usize) -> Option<Rule> {
    match rule {
        Rule::Surface(p) if p.id() == id => {
            *count += 1;
            None
        }
        Rule::Intersection(a, b) => match (remove_leaves(*a, id, count), remove_leaves(*b, id, count)) {
            (Some(a), Some(b)) => Some(Rule::and(a, b)),
            (survivor, None) | (None, survivor) => survivor,
        },
        Rule::Union(a, b) => match (remove_leaves(*a, id, count), remove_leaves(*b, id, count)) {
            (Some(a), Some(b)) => Some(Rule::or(a, b)),
            (survivor, None) | (None, survivor) => survivor,
        },
        Rule::CompGrp(a) => remove_leaves(*a, id, count).map(Rule::complement),
        other => Some(other),
    }
}

/// Flatten the maximal group of connective `kind` rooted at `rule`.
fn flatten(rule: Rule, kind: i8, out: &mut Vec<Rule>) {
    match rule {
        Rule::Intersection(a, b) if kind == 1 => {
            flatten(*a, kind, out);
            flatten(*b, kind, out);
        }
        Rule::Union(a, b) if kind == -1 => {
            flatten(*a, kind, out);
            flatten(*b, kind, out);
        }
        other => out.push(other),
    }
}

fn simplify(rule: Rule, count: &mut usize) -> Rule {
    let kind = rule.connective();
    if kind == 0 {
        return match rule {
            Rule::CompGrp(inner) => match simplify(*inner, count) {
                Rule::Bool(v) => Rule::Bool(!v),
                inner => Rule::complement(inner),
            },
            other => other,
        };
    }

    let is_union = kind == -1;
    let mut operands = Vec::new();
    flatten(rule, kind, &mut operands);

    let mut kept: Vec<Rule> = Vec::with_capacity(operands.len());
    for op in operands {
        let op = simplify(op, count);
        match op {
            // absorbing constant: T in a union, F in an intersection
            Rule::Bool(v) if v == is_union => return Rule::Bool(v),
            // identity constant
            Rule::Bool(_) => continue,
            _ => {}
        }
        if kept.contains(&op) {
            *count += 1;
            continue;
        }
        if kept.iter().any(|k| k.is_complement_of(&op)) {
            *count += 1;
            return Rule::Bool(is_union);
        }
        kept.push(op);
    }

    let mut iter = kept.into_iter();
    let Some(first) = iter.next() else {
        return Rule::Bool(!is_union);
    };
    iter.fold(first, |acc, r| {
        if is_union {
            Rule::or(acc, r)
        } else {
            Rule::and(acc, r)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(text: &str) -> RuleTree {
        RuleTree::parse(text).unwrap()
    }

    #[test]
    fn test_remove_complementary_duplicate() {
        let mut t = tree("10 : 10 : 12 : 11");
        assert_eq!(t.remove_complementary(), 1);
        assert_eq!(t.display(), "10 : 12 : 11");
        assert_eq!(t.remove_complementary(), 0);
    }

    #[test]
    fn test_remove_complementary_pairs() {
        let mut t = tree("10 : -10 : 12");
        assert_eq!(t.remove_complementary(), 1);
        assert_eq!(t.display(), "T");

        let mut t = tree("3 (10 -10)");
        assert_eq!(t.remove_complementary(), 1);
        assert_eq!(t.display(), "F");

        // the F folds away inside the outer union
        let mut t = tree("4 : 10 -10");
        assert_eq!(t.remove_complementary(), 1);
        assert_eq!(t.display(), "4");

        let mut t = tree("(1 2) : #(1 2)");
        assert_eq!(t.remove_complementary(), 1);
        assert_eq!(t.display(), "T");
    }

    #[test]
    fn test_remove_complementary_nested_groups() {
        // duplicates inside the intersection and inside the union both count
        let mut t = tree("1 1 (2 : 3 : 2)");
        assert_eq!(t.remove_complementary(), 2);
        assert_eq!(t.display(), "1 (2 : 3)");
    }

    #[test]
    fn test_remove_complementary_constants() {
        let mut t = tree("1 T : F");
        assert_eq!(t.remove_complementary(), 0);
        assert_eq!(t.display(), "1");

        let mut t = tree("#(T) : 2");
        assert_eq!(t.remove_complementary(), 0);
        assert_eq!(t.display(), "2");
    }

    #[test]
    fn test_substitute_surf() {
        let mut t = tree("10 : 10 : 12 : 11");
        assert_eq!(t.substitute_surf(11, 13), 1);
        assert_eq!(t.display(), "10 : 10 : 12 : 13");
        assert_eq!(t.substitute_surf(10, 14), 2);
        assert_eq!(t.display(), "14 : 14 : 12 : 13");
        assert_eq!(t.substitute_surf(99, 1), 0);
    }

    #[test]
    fn test_substitute_surf_signs() {
        let mut t = tree("-5 6 #(5)");
        assert_eq!(t.substitute_surf(-5, -7), 2);
        assert_eq!(t.display(), "7 6 #( -7 )");
    }

    #[test]
    fn test_remove_item() {
        let mut t = tree("10 : 10 : 12 : 11");
        assert_eq!(t.remove_item(10), 2);
        assert_eq!(t.display(), "12 : 11");

        let mut t = tree("(1 2) : (3 1)");
        assert_eq!(t.remove_item(1), 2);
        assert_eq!(t.display(), "2 : 3");

        let mut t = tree("(1 -1) : 4");
        assert_eq!(t.remove_item(1), 2);
        assert_eq!(t.display(), "4");

        let mut t = tree("#(5) 6");
        assert_eq!(t.remove_item(5), 1);
        assert_eq!(t.display(), "6");
    }

    #[test]
    fn test_remove_item_empties_tree() {
        let mut t = tree("3 : -3");
        assert_eq!(t.remove_item(3), 2);
        assert!(t.is_empty());
        assert_eq!(t.display(), "");
        assert_eq!(t.common_type(), 0);
        assert_eq!(t.leaf_count(), 0);
    }

    #[test]
    fn test_common_type() {
        assert_eq!(tree("1 : 2 : 3").common_type(), -1);
        assert_eq!(tree("1 2 -3").common_type(), 1);
        assert_eq!(tree("1 2 : 3").common_type(), 0);
        assert_eq!(tree("1 (2 : 3)").common_type(), 0);
        assert_eq!(tree("7").common_type(), 0);
    }

    #[test]
    fn test_queries() {
        let t = tree("1 -2 : #3 (4 : -1)");
        assert_eq!(t.surface_ids().into_iter().collect::<Vec<_>>(), vec![1, 2, 4]);
        assert_eq!(t.object_ids().into_iter().collect::<Vec<_>>(), vec![3]);
        assert_eq!(t.leaf_count(), 4);
        assert!(t.has_complement());
    }

    #[test]
    fn test_from_str_and_display_round_trip() {
        let text = "-4 (5 : 6) #3 #( 7 -8 )";
        let t: RuleTree = text.parse().unwrap();
        assert_eq!(t.to_string(), text);
        assert_eq!(tree(&t.display()), t);
    }
}
