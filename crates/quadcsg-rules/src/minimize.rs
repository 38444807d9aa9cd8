//! Truth-table rewriting of rule trees into minimal two-level forms.

use tracing::{debug, instrument};

use quadcsg_logic::{minimize, BnId, TRUE};

use crate::error::{Result, RuleError};
use crate::rule::{Resolver, Rule};
use crate::tree::RuleTree;

/// A row of the truth table: surface `vars[i]` is inside when bit `i` is set.
struct Assignment<'a> {
    vars: &'a [i32],
    bits: usize,
}

impl Resolver for Assignment<'_> {
    fn side(&self, id: i32) -> i8 {
        match self.vars.iter().position(|&v| v == id) {
            Some(i) if self.bits >> i & 1 == 1 => 1,
            Some(_) => -1,
            None => panic!("surface {id} missing from the truth table"),
        }
    }

    fn object(&self, id: i32) -> bool {
        panic!("cell complement #{id} reached truth-table evaluation")
    }
}

impl RuleTree {
    /// The variables and true rows of this tree's truth table.
    fn truth_table(&self, limit: usize) -> Result<(Vec<i32>, Vec<usize>, Vec<usize>)> {
        if let Some(&id) = self.object_ids().iter().next() {
            return Err(RuleError::CellComplement(id));
        }
        let vars: Vec<i32> = self.surface_ids().into_iter().collect();
        if vars.len() > limit {
            return Err(RuleError::TooManySurfaces {
                count: vars.len(),
                limit,
            });
        }
        if vars.len() > quadcsg_logic::MAX_VARIABLES {
            return Err(quadcsg_logic::LogicError::TooManyVariables(vars.len()).into());
        }
        let (on, off): (Vec<usize>, Vec<usize>) = (0..1usize << vars.len())
            .partition(|&bits| self.is_valid_with(&Assignment { vars: &vars, bits }));
        Ok((vars, on, off))
    }

    /// Minimal sum-of-products form over at most `limit` surfaces.
    #[instrument(skip(self), fields(rule = %self))]
    pub fn make_dnf(&self, limit: usize) -> Result<RuleTree> {
        let (vars, on, _) = self.truth_table(limit)?;
        let cover = minimize(vars.len(), &on)?;
        debug!(terms = cover.len(), "sum of products");
        let root = join(cover.iter().map(|p| product(p, &vars)), Rule::or)
            .unwrap_or(Rule::Bool(false));
        Ok(RuleTree::new(root))
    }

    /// Minimal product-of-sums form over at most `limit` surfaces.
    ///
    /// Built from the sum-of-products cover of the complement: each of its
    /// implicants, reversed, is one clause.
    #[instrument(skip(self), fields(rule = %self))]
    pub fn make_cnf(&self, limit: usize) -> Result<RuleTree> {
        let (vars, _, off) = self.truth_table(limit)?;
        let cover = minimize(vars.len(), &off)?;
        debug!(clauses = cover.len(), "product of sums");
        let root = join(
            cover.into_iter().map(|mut p| {
                p.reverse();
                sum(&p, &vars)
            }),
            Rule::and,
        )
        .unwrap_or(Rule::Bool(true));
        Ok(RuleTree::new(root))
    }

    /// Replace the tree by the smaller of its DNF and CNF when that has
    /// fewer leaves. Returns true if the tree changed.
    pub fn minimize(&mut self, limit: usize) -> Result<bool> {
        if self.is_empty() {
            return Ok(false);
        }
        let dnf = self.make_dnf(limit)?;
        let cnf = self.make_cnf(limit)?;
        let best = if cnf.leaf_count() < dnf.leaf_count() {
            cnf
        } else {
            dnf
        };
        if best.leaf_count() < self.leaf_count() {
            *self = best;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Left-leaning chain of `items` joined by `op`.
fn join(items: impl Iterator<Item = Rule>, op: fn(Rule, Rule) -> Rule) -> Option<Rule> {
    items.reduce(op)
}

/// Intersection of the definite positions of `p`.
fn product(p: &BnId, vars: &[i32]) -> Rule {
    join(literals(p, vars), Rule::and).unwrap_or(Rule::Bool(true))
}

/// Union of the definite positions of `p`.
fn sum(p: &BnId, vars: &[i32]) -> Rule {
    join(literals(p, vars), Rule::or).unwrap_or(Rule::Bool(false))
}

fn literals<'a>(p: &'a BnId, vars: &'a [i32]) -> impl Iterator<Item = Rule> + 'a {
    p.states()
        .iter()
        .zip(vars)
        .filter(|(&s, _)| s != 0)
        .map(|(&s, &id)| Rule::surface(if s == TRUE { id } else { -id }))
}
