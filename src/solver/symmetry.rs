//! Particle-exchange permutations for symmetrizing matrix elements.

use crate::system::{Particle, ParticleType};

/// A permutation of particle indices with its exchange sign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation {
    pub indices: Vec<usize>,
    pub sign: i32,
}

/// Particles sharing an identicality tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExchangeGroup {
    pub indices: Vec<usize>,
    pub kind: ParticleType,
}

/// Partition particles by identicality tag, groups ordered by first appearance.
pub fn exchange_groups(particles: &[Particle]) -> Vec<ExchangeGroup> {
    let mut groups: Vec<ExchangeGroup> = Vec::new();
    let mut tags: Vec<&str> = Vec::new();

    for (k, p) in particles.iter().enumerate() {
        match tags.iter().position(|t| *t == p.identicality) {
            Some(g) => groups[g].indices.push(k),
            None => {
                tags.push(&p.identicality);
                groups.push(ExchangeGroup {
                    indices: vec![k],
                    kind: p.kind,
                });
            }
        }
    }
    groups
}

/// Identity plus every non-trivial permutation inside each group, other
/// particles held fixed. Fermion groups carry the permutation parity.
pub fn permutations(particles: &[Particle]) -> Vec<Permutation> {
    let n = particles.len();
    let identity: Vec<usize> = (0..n).collect();
    let mut out = vec![Permutation {
        indices: identity.clone(),
        sign: 1,
    }];

    for group in exchange_groups(particles) {
        let mut order = group.indices.clone();
        while next_permutation(&mut order) {
            let mut indices = identity.clone();
            for (slot, &target) in group.indices.iter().zip(order.iter()) {
                indices[*slot] = target;
            }
            let sign = match group.kind {
                ParticleType::Fermion if inversions(&order) % 2 == 1 => -1,
                _ => 1,
            };
            out.push(Permutation { indices, sign });
        }
    }
    out
}

/// Lexicographic successor in place; false once the last ordering is reached.
fn next_permutation(v: &mut [usize]) -> bool {
    if v.len() < 2 {
        return false;
    }
    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = v.len() - 1;
    while v[j] <= v[i - 1] {
        j -= 1;
    }
    v.swap(i - 1, j);
    v[i..].reverse();
    true
}

/// Number of adjacent transpositions needed to sort `v`.
fn inversions(v: &[usize]) -> usize {
    let mut count = 0;
    for i in 0..v.len() {
        for j in i + 1..v.len() {
            if v[i] > v[j] {
                count += 1;
            }
        }
    }
    count
}
