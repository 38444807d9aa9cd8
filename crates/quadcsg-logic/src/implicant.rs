//! Quine–McCluskey prime implicants and cover selection.

use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::error::{LogicError, Result};
use crate::{BnId, MAX_VARIABLES};

/// All prime implicants of the function whose true rows are `terms`.
///
/// Terms are grouped by true count; neighbours in adjacent groups are
/// combined repeatedly until nothing merges. Terms never absorbed into a
/// larger group are the primes.
pub fn prime_implicants(terms: Vec<BnId>) -> Result<Vec<BnId>> {
    let mut current = terms;
    if let Some(first) = current.first() {
        let size = first.size();
        if let Some(bad) = current.iter().find(|t| t.size() != size) {
            return Err(LogicError::SizeMismatch(size, bad.size()));
        }
    }
    for t in &mut current {
        t.set_prime(true);
    }
    current.sort();
    current.dedup();

    let mut primes = Vec::new();
    while !current.is_empty() {
        let mut next = Vec::new();
        for i in 0..current.len() {
            let (head, tail) = current.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                if b.true_count() > a.true_count() + 1 {
                    break;
                }
                if b.true_count() == a.true_count() + 1 && a.is_adjacent(b).is_some() {
                    let (_, merged) = a.make_combination(b)?;
                    next.push(merged);
                }
            }
        }
        primes.extend(current.into_iter().filter(BnId::is_prime));
        next.sort();
        next.dedup();
        current = next;
    }
    primes.sort();
    Ok(primes)
}

/// Pick primes covering every minterm.
///
/// Essential primes (the only cover of some minterm) are taken first. The
/// remainder is covered greedily by the prime covering the most uncovered
/// minterms, preferring fewer don't-cares on a tie, then the earlier prime.
pub fn minimal_cover(primes: &[BnId], minterms: &BTreeSet<usize>) -> Vec<BnId> {
    let mut chosen = vec![false; primes.len()];

    for &m in minterms {
        let mut covering = primes.iter().enumerate().filter(|(_, p)| p.covers(m));
        if let (Some((i, _)), None) = (covering.next(), covering.next()) {
            chosen[i] = true;
        }
    }

    let mut uncovered: BTreeSet<usize> = minterms
        .iter()
        .copied()
        .filter(|&m| !primes.iter().zip(&chosen).any(|(p, &c)| c && p.covers(m)))
        .collect();

    while !uncovered.is_empty() {
        let best = primes
            .iter()
            .enumerate()
            .filter(|(i, _)| !chosen[*i])
            .map(|(i, p)| (i, uncovered.iter().filter(|&&m| p.covers(m)).count(), p.dont_care_count()))
            .filter(|&(_, gain, _)| gain > 0)
            .min_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)).then(a.0.cmp(&b.0)));
        let Some((i, _, _)) = best else {
            break;
        };
        chosen[i] = true;
        uncovered.retain(|&m| !primes[i].covers(m));
    }

    primes
        .iter()
        .zip(&chosen)
        .filter(|(_, &c)| c)
        .map(|(p, _)| p.clone())
        .collect()
}

/// Minimal sum-of-products cover of the function true on `minterms`.
#[instrument(skip(minterms), fields(count = minterms.len()))]
pub fn minimize(size: usize, minterms: &[usize]) -> Result<Vec<BnId>> {
    if size > MAX_VARIABLES {
        return Err(LogicError::TooManyVariables(size));
    }
    if let Some(&minterm) = minterms.iter().find(|&&m| m >> size != 0) {
        return Err(LogicError::MintermOutOfRange { minterm, size });
    }

    let set: BTreeSet<usize> = minterms.iter().copied().collect();
    let terms = set.iter().map(|&m| BnId::new(size, m)).collect();
    let primes = prime_implicants(terms)?;
    let cover = minimal_cover(&primes, &set);
    debug!(primes = primes.len(), cover = cover.len(), "minimized");
    Ok(cover)
}
