//! Tri-state truth vectors.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{LogicError, Result};

/// Position is true.
pub const TRUE: i8 = 1;
/// Position is false.
pub const FALSE: i8 = -1;
/// Position may take either value.
pub const DONT_CARE: i8 = 0;

/// A row or group of rows of a truth table over `size` variables.
///
/// Each position holds `1` (true), `-1` (false) or `0` (don't-care).
/// Position `i` corresponds to bit `i` of a minterm index.
#[derive(Debug, Clone)]
pub struct BnId {
    size: usize,
    tval: Vec<i8>,
    tnum: usize,
    znum: usize,
    pi: bool,
    minterms: BTreeSet<usize>,
}

impl BnId {
    /// The fully specified row for minterm `index`.
    pub fn new(size: usize, index: usize) -> Self {
        let tval = (0..size)
            .map(|i| if index >> i & 1 == 1 { TRUE } else { FALSE })
            .collect();
        let mut id = Self::with_states(tval);
        id.minterms.insert(index);
        id
    }

    /// A vector with explicit states. Values other than -1/0/1 are clamped by sign.
    pub fn from_states(states: Vec<i8>) -> Self {
        let tval = states.into_iter().map(i8::signum).collect();
        let mut id = Self::with_states(tval);
        id.minterms = id.expand().into_iter().collect();
        id
    }

    fn with_states(tval: Vec<i8>) -> Self {
        let mut id = Self {
            size: tval.len(),
            tval,
            tnum: 0,
            znum: 0,
            pi: true,
            minterms: BTreeSet::new(),
        };
        id.set_counters();
        id
    }

    fn set_counters(&mut self) {
        self.tnum = self.tval.iter().filter(|&&v| v == TRUE).count();
        self.znum = self.tval.iter().filter(|&&v| v == DONT_CARE).count();
    }

    /// Number of variables.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The states, position 0 first.
    pub fn states(&self) -> &[i8] {
        &self.tval
    }

    /// State at position `i`.
    pub fn state(&self, i: usize) -> i8 {
        self.tval[i]
    }

    /// Number of true positions.
    pub fn true_count(&self) -> usize {
        self.tnum
    }

    /// Number of don't-care positions.
    pub fn dont_care_count(&self) -> usize {
        self.znum
    }

    /// Minterm indices this vector was built from.
    pub fn minterms(&self) -> &BTreeSet<usize> {
        &self.minterms
    }

    /// True while the vector has not been absorbed into a larger group.
    pub fn is_prime(&self) -> bool {
        self.pi
    }

    /// Set the prime-implicant flag.
    pub fn set_prime(&mut self, pi: bool) {
        self.pi = pi;
    }

    /// The single position where `self` and `other` hold opposite definite
    /// values, provided they agree everywhere else (don't-cares included).
    pub fn is_adjacent(&self, other: &BnId) -> Option<usize> {
        if self.size != other.size {
            return None;
        }
        let mut found = None;
        for (i, (&a, &b)) in self.tval.iter().zip(&other.tval).enumerate() {
            if a == b {
                continue;
            }
            if a == DONT_CARE || b == DONT_CARE || found.is_some() {
                return None;
            }
            found = Some(i);
        }
        found
    }

    /// Merge two adjacent vectors into one with a don't-care at the
    /// differing position. Both inputs lose their prime-implicant flag.
    ///
    /// Returns the differing position and the merged vector.
    pub fn make_combination(&mut self, other: &mut BnId) -> Result<(usize, BnId)> {
        if self.size != other.size {
            return Err(LogicError::SizeMismatch(self.size, other.size));
        }
        let Some(pos) = self.is_adjacent(other) else {
            let diff = self
                .tval
                .iter()
                .zip(&other.tval)
                .filter(|(a, b)| a != b)
                .count();
            return Err(LogicError::NotAdjacent(diff));
        };

        let mut tval = self.tval.clone();
        tval[pos] = DONT_CARE;
        let mut merged = Self::with_states(tval);
        merged.minterms = self.minterms.union(&other.minterms).copied().collect();

        self.pi = false;
        other.pi = false;
        Ok((pos, merged))
    }

    /// True if no position is true in one vector and false in the other.
    pub fn equivalent(&self, other: &BnId) -> bool {
        self.size == other.size && self.tval.iter().zip(&other.tval).all(|(a, b)| a * b >= 0)
    }

    /// Negate every definite position; don't-cares stay.
    pub fn reverse(&mut self) {
        for v in &mut self.tval {
            *v = -*v;
        }
        self.set_counters();
        self.minterms = self.expand().into_iter().collect();
    }

    /// Integer encoding with don't-cares read as false.
    pub fn int_value(&self) -> usize {
        self.tval
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == TRUE)
            .fold(0, |acc, (i, _)| acc | 1 << i)
    }

    /// True if minterm `index` matches every definite position.
    pub fn covers(&self, index: usize) -> bool {
        self.tval.iter().enumerate().all(|(i, &v)| match v {
            TRUE => index >> i & 1 == 1,
            FALSE => index >> i & 1 == 0,
            _ => true,
        })
    }

    /// Every minterm matched by this vector, ascending.
    pub fn expand(&self) -> Vec<usize> {
        let free: Vec<usize> = (0..self.size)
            .filter(|&i| self.tval[i] == DONT_CARE)
            .collect();
        let base = self.int_value();
        let mut out: Vec<usize> = (0..1usize << free.len())
            .map(|combo| {
                free.iter()
                    .enumerate()
                    .filter(|(k, _)| combo >> k & 1 == 1)
                    .fold(base, |acc, (_, &bit)| acc | 1 << bit)
            })
            .collect();
        out.sort_unstable();
        out
    }
}

impl PartialEq for BnId {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.tval == other.tval
    }
}

impl Eq for BnId {}

impl Ord for BnId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.size
            .cmp(&other.size)
            .then(self.tnum.cmp(&other.tnum))
            .then(self.znum.cmp(&other.znum))
            .then_with(|| self.tval.iter().rev().cmp(other.tval.iter().rev()))
    }
}

impl PartialOrd for BnId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in self.tval.iter().rev() {
            let c = match *v {
                TRUE => '1',
                FALSE => '0',
                _ => '-',
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
