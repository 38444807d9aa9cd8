//! Rule nodes and their evaluation.

use std::collections::BTreeSet;
use std::fmt;

/// A signed reference to a surface: the inside (`sign > 0`) or outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfPoint {
    id: i32,
    sign: i8,
}

impl SurfPoint {
    /// Leaf from a signed surface number: `10` is inside surface 10, `-10` outside.
    pub fn new(signed_id: i32) -> Self {
        Self {
            id: signed_id.abs(),
            sign: if signed_id < 0 { -1 } else { 1 },
        }
    }

    /// The surface number (always positive).
    pub fn id(&self) -> i32 {
        self.id
    }

    /// `+1` for the inside, `-1` for the outside.
    pub fn sign(&self) -> i8 {
        self.sign
    }

    /// The signed surface number.
    pub fn signed_id(&self) -> i32 {
        self.id * i32::from(self.sign)
    }

    /// The same surface with the other sense.
    pub fn negated(&self) -> Self {
        Self {
            id: self.id,
            sign: -self.sign,
        }
    }

    /// Leaf truth for a point on the given side of the surface.
    ///
    /// Points on the surface (`side == 0`) satisfy both senses.
    pub fn accepts(&self, side: i8) -> bool {
        side * self.sign >= 0
    }
}

impl fmt::Display for SurfPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signed_id())
    }
}

/// Answers leaf and cell-complement queries while a rule is evaluated.
pub trait Resolver {
    /// Side of surface `id`: `+1` inside, `-1` outside, `0` on it.
    fn side(&self, id: i32) -> i8;

    /// Whether the evaluation point is inside cell `id`.
    fn object(&self, id: i32) -> bool;
}

/// A node of a rule tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Signed surface reference.
    Surface(SurfPoint),
    /// Both children hold.
    Intersection(Box<Rule>, Box<Rule>),
    /// Either child holds.
    Union(Box<Rule>, Box<Rule>),
    /// Complement of a group, written `#( … )`.
    CompGrp(Box<Rule>),
    /// Complement of another cell, written `#N`.
    CompObj(i32),
    /// Constant.
    Bool(bool),
}

impl Rule {
    /// Leaf from a signed surface number.
    pub fn surface(signed_id: i32) -> Self {
        Rule::Surface(SurfPoint::new(signed_id))
    }

    /// `a b`.
    pub fn and(a: Rule, b: Rule) -> Self {
        Rule::Intersection(Box::new(a), Box::new(b))
    }

    /// `a : b`.
    pub fn or(a: Rule, b: Rule) -> Self {
        Rule::Union(Box::new(a), Box::new(b))
    }

    /// `#( a )`.
    pub fn complement(a: Rule) -> Self {
        Rule::CompGrp(Box::new(a))
    }

    /// `1` for an intersection, `-1` for a union, `0` otherwise.
    pub fn connective(&self) -> i8 {
        match self {
            Rule::Intersection(..) => 1,
            Rule::Union(..) => -1,
            _ => 0,
        }
    }

    /// Evaluate against a resolver.
    pub fn is_valid_with<R: Resolver + ?Sized>(&self, resolver: &R) -> bool {
        match self {
            Rule::Surface(p) => p.accepts(resolver.side(p.id())),
            Rule::Intersection(a, b) => a.is_valid_with(resolver) && b.is_valid_with(resolver),
            Rule::Union(a, b) => a.is_valid_with(resolver) || b.is_valid_with(resolver),
            Rule::CompGrp(a) => !a.is_valid_with(resolver),
            Rule::CompObj(id) => !resolver.object(*id),
            Rule::Bool(v) => *v,
        }
    }

    /// Classify the maximal same-connective group rooted here.
    ///
    /// Descends through nodes of the root's connective only; leaves and
    /// complements end the descent.
    pub fn common_type(&self) -> i8 {
        let rtype = self.connective();
        if rtype == 0 {
            return 0;
        }
        let mut stack: Vec<&Rule> = self.children().collect();
        while let Some(node) = stack.pop() {
            let t = node.connective();
            if t == -rtype {
                return 0;
            }
            if t == rtype {
                stack.extend(node.children());
            }
        }
        rtype
    }

    /// Direct children.
    pub fn children(&self) -> impl Iterator<Item = &Rule> {
        let (a, b): (Option<&Rule>, Option<&Rule>) = match self {
            Rule::Intersection(a, b) | Rule::Union(a, b) => (Some(&**a), Some(&**b)),
            Rule::CompGrp(a) => (Some(&**a), None),
            _ => (None, None),
        };
        a.into_iter().chain(b)
    }

    /// All leaves, left to right.
    pub fn leaves(&self) -> Vec<SurfPoint> {
        let mut out = Vec::new();
        self.visit(&mut |r| {
            if let Rule::Surface(p) = r {
                out.push(*p);
            }
        });
        out
    }

    /// Number of surface leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Distinct surface numbers referenced.
    pub fn surface_ids(&self) -> BTreeSet<i32> {
        self.leaves().iter().map(SurfPoint::id).collect()
    }

    /// Distinct cells referenced through `#N`.
    pub fn object_ids(&self) -> BTreeSet<i32> {
        let mut out = BTreeSet::new();
        self.visit(&mut |r| {
            if let Rule::CompObj(id) = r {
                out.insert(*id);
            }
        });
        out
    }

    /// True if any complement node is present.
    pub fn has_complement(&self) -> bool {
        let mut found = false;
        self.visit(&mut |r| found |= matches!(r, Rule::CompGrp(_) | Rule::CompObj(_)));
        found
    }

    /// Pre-order traversal.
    pub fn visit(&self, f: &mut impl FnMut(&Rule)) {
        f(self);
        for child in self.children() {
            child.visit(f);
        }
    }

    /// Visit every surface leaf mutably, left to right.
    pub(crate) fn for_each_leaf_mut(&mut self, f: &mut impl FnMut(&mut SurfPoint)) {
        match self {
            Rule::Surface(p) => f(p),
            Rule::Intersection(a, b) | Rule::Union(a, b) => {
                a.for_each_leaf_mut(f);
                b.for_each_leaf_mut(f);
            }
            Rule::CompGrp(a) => a.for_each_leaf_mut(f),
            Rule::CompObj(_) | Rule::Bool(_) => {}
        }
    }

    /// Structural complement: `a` and `b` are a literal and its negation, or
    /// one is the group complement of the other.
    pub fn is_complement_of(&self, other: &Rule) -> bool {
        match (self, other) {
            (Rule::Surface(a), Rule::Surface(b)) => *a == b.negated(),
            (Rule::CompGrp(a), b) | (b, Rule::CompGrp(a)) => a.as_ref() == b,
            _ => false,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Surface(p) => write!(f, "{p}"),
            Rule::Intersection(a, b) => {
                for (i, child) in [a, b].into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    if matches!(child.as_ref(), Rule::Union(..)) {
                        write!(f, "({child})")?;
                    } else {
                        write!(f, "{child}")?;
                    }
                }
                Ok(())
            }
            Rule::Union(a, b) => write!(f, "{a} : {b}"),
            Rule::CompGrp(a) => write!(f, "#( {a} )"),
            Rule::CompObj(id) => write!(f, "#{id}"),
            Rule::Bool(true) => f.write_str("T"),
            Rule::Bool(false) => f.write_str("F"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sides(Vec<(i32, i8)>);

    impl Resolver for Sides {
        fn side(&self, id: i32) -> i8 {
            self.0.iter().find(|(s, _)| *s == id).map_or(-1, |(_, v)| *v)
        }

        fn object(&self, id: i32) -> bool {
            id == 7
        }
    }

    #[test]
    fn test_surf_point() {
        let p = SurfPoint::new(-12);
        assert_eq!(p.id(), 12);
        assert_eq!(p.sign(), -1);
        assert_eq!(p.signed_id(), -12);
        assert_eq!(p.negated(), SurfPoint::new(12));
        assert!(p.accepts(-1));
        assert!(p.accepts(0));
        assert!(!p.accepts(1));
    }

    #[test]
    fn test_evaluate() {
        // inside 10 and outside 11
        let r = Rule::and(Rule::surface(10), Rule::surface(-11));
        assert!(r.is_valid_with(&Sides(vec![(10, 1), (11, -1)])));
        assert!(!r.is_valid_with(&Sides(vec![(10, 1), (11, 1)])));
        // on surface 11 counts for both senses
        assert!(r.is_valid_with(&Sides(vec![(10, 1), (11, 0)])));

        let c = Rule::complement(r.clone());
        assert!(!c.is_valid_with(&Sides(vec![(10, 1), (11, -1)])));

        assert!(!Rule::CompObj(7).is_valid_with(&Sides(vec![])));
        assert!(Rule::CompObj(8).is_valid_with(&Sides(vec![])));
    }

    #[test]
    fn test_common_type() {
        let all_and = Rule::and(Rule::and(Rule::surface(1), Rule::surface(2)), Rule::surface(3));
        let all_or = Rule::or(Rule::surface(1), Rule::or(Rule::surface(2), Rule::surface(3)));
        let mixed = Rule::or(Rule::and(Rule::surface(1), Rule::surface(2)), Rule::surface(3));
        assert_eq!(all_and.common_type(), 1);
        assert_eq!(all_or.common_type(), -1);
        assert_eq!(mixed.common_type(), 0);
        assert_eq!(Rule::surface(4).common_type(), 0);

        // a complement group is opaque
        let opaque = Rule::and(Rule::surface(1), Rule::complement(all_or));
        assert_eq!(opaque.common_type(), 1);
    }

    #[test]
    fn test_queries() {
        let r = Rule::and(
            Rule::or(Rule::surface(3), Rule::surface(-1)),
            Rule::and(Rule::CompObj(4), Rule::surface(3)),
        );
        assert_eq!(r.leaf_count(), 3);
        assert_eq!(r.surface_ids().into_iter().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(r.object_ids().into_iter().collect::<Vec<_>>(), vec![4]);
        assert!(r.has_complement());
        assert!(!Rule::surface(1).has_complement());
    }

    #[test]
    fn test_complement_pairs() {
        assert!(Rule::surface(5).is_complement_of(&Rule::surface(-5)));
        assert!(!Rule::surface(5).is_complement_of(&Rule::surface(5)));
        let g = Rule::and(Rule::surface(1), Rule::surface(2));
        assert!(Rule::complement(g.clone()).is_complement_of(&g));
        assert!(g.is_complement_of(&Rule::complement(g.clone())));
    }

    #[test]
    fn test_display() {
        let r = Rule::and(
            Rule::or(Rule::surface(3), Rule::surface(-1)),
            Rule::and(Rule::CompObj(4), Rule::complement(Rule::surface(2))),
        );
        assert_eq!(r.to_string(), "(3 : -1) #4 #( 2 )");
        assert_eq!(Rule::or(Rule::Bool(true), Rule::Bool(false)).to_string(), "T : F");
    }
}
