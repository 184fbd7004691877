//! Axis permutations.

/// All permutations of `0..n` in lexicographic order.
///
/// Returns `n!` permutations; `n = 0` yields the single empty permutation.
pub fn permutations(n: usize) -> Vec<Vec<usize>> {
    let mut perm: Vec<usize> = (0..n).collect();
    let mut out = vec![perm.clone()];

    // Next lexicographic permutation until the sequence is descending
    loop {
        let Some(i) = (1..n).rev().find(|&i| perm[i - 1] < perm[i]) else {
            return out;
        };
        let pivot = i - 1;
        let Some(j) = (i..n).rev().find(|&j| perm[j] > perm[pivot]) else {
            return out;
        };
        perm.swap(pivot, j);
        perm[i..].reverse();
        out.push(perm.clone());
    }
}

/// Whether `perm` is a permutation of `0..n`.
pub fn is_permutation(perm: &[usize], n: usize) -> bool {
    if perm.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &p in perm {
        if p >= n || seen[p] {
            return false;
        }
        seen[p] = true;
    }
    true
}
