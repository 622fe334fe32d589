//! Bit-parallel cluster kernel.
//!
//! Computes the next generation of all 62 cells in a cluster at once.
//! The eight-neighbor count of every bit position is built as four
//! parallel digit planes (1s, 2s, 4s, 8s) by a half/full-adder chain over
//! the three input clusters and their one-bit shifts, then the rule masks
//! pick out the counts that birth or survive.

use crate::rule::CountMask;

#[inline(always)]
fn half_add(a: u64, b: u64) -> (u64, u64) {
    (a ^ b, a & b)
}

#[inline(always)]
fn full_add(a: u64, b: u64, c: u64) -> (u64, u64) {
    let sum = a ^ b ^ c;
    let carry = (a & b) | (b & c) | (a & c);
    (sum, carry)
}

/// Bit positions whose neighbor count equals `count`, given the four
/// digit planes of the per-cell counts.
#[inline(always)]
fn count_plane(count: u32, ones: u64, twos: u64, fours: u64, eights: u64) -> u64 {
    let p0 = if count & 1 != 0 { ones } else { !ones };
    let p1 = if count & 2 != 0 { twos } else { !twos };
    let p2 = if count & 4 != 0 { fours } else { !fours };
    let p3 = if count & 8 != 0 { eights } else { !eights };
    p0 & p1 & p2 & p3
}

/// Advance all 62 cells of a cluster by one generation.
///
/// The three inputs must be halo-valid. The neighbor count excludes the
/// center cell: the vertical pair uses only `above` and `below`, and the
/// center column reaches a cell only through the left/right shifts of the
/// three-row sum. The two halo bits of the result are detritus and must
/// be respliced before the result is read as halo-valid.
///
/// When `birth` and `survival` are compile-time constants the whole count
/// selection folds to a handful of bitwise ops.
#[inline(always)]
pub(crate) fn advance_cluster(
    above: u64,
    center: u64,
    below: u64,
    birth: CountMask,
    survival: CountMask,
) -> u64 {
    let (mid_sum, mid_rem) = half_add(above, below);
    let (base_sum, base_rem) = full_add(above, center, below);
    let (ones, c1) = full_add(base_sum << 1, mid_sum, base_sum >> 1);
    let (c2, c3) = full_add(base_rem << 1, mid_rem, base_rem >> 1);
    let (twos, c4) = half_add(c1, c2);
    let (fours, eights) = half_add(c3, c4);

    let mut survive = 0u64;
    let mut born = 0u64;
    for count in 1..=8u32 {
        let bit = 1 << count;
        if survival & bit != 0 {
            survive |= count_plane(count, ones, twos, fours, eights);
        }
        if birth & bit != 0 {
            born |= count_plane(count, ones, twos, fours, eights);
        }
    }

    (center & survive) | (!center & born)
}

#[cfg(test)]
mod tests {
    use super::advance_cluster;
    use crate::cluster::{CELLS_PER_CLUSTER, INTERIOR_MASK};
    use crate::rule::{CountMask, Rule};

    use rand::RngCore;
    use rand::SeedableRng;

    fn naive_advance(
        above: u64,
        center: u64,
        below: u64,
        birth: CountMask,
        survival: CountMask,
    ) -> u64 {
        let mut out = 0u64;
        for i in 1..=CELLS_PER_CLUSTER as u32 {
            let mut count = 0u32;
            for d in [-1i32, 0, 1] {
                let j = (i as i32 + d) as u32;
                count += ((above >> j) & 1) as u32;
                count += ((below >> j) & 1) as u32;
                if d != 0 {
                    count += ((center >> j) & 1) as u32;
                }
            }
            let alive = (center >> i) & 1 != 0;
            let mask = if alive { survival } else { birth };
            if (mask >> count) & 1 != 0 {
                out |= 1 << i;
            }
        }
        out
    }

    fn assert_matches_naive(rule: Rule, rng: &mut rand::rngs::StdRng, rounds: usize) {
        let birth = rule.birth_mask();
        let survival = rule.survival_mask();
        for _ in 0..rounds {
            let above = rng.next_u64();
            let center = rng.next_u64();
            let below = rng.next_u64();
            let got = advance_cluster(above, center, below, birth, survival) & INTERIOR_MASK;
            let want = naive_advance(above, center, below, birth, survival);
            assert_eq!(
                got, want,
                "rule {rule} diverged for above={above:016x} center={center:016x} below={below:016x}"
            );
        }
    }

    #[test]
    fn matches_naive_count_for_named_rules() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EED_C0DE_0001);
        for rule in [Rule::CONWAY, Rule::HIGHLIFE, Rule::SEEDS, Rule::SERVIETTES] {
            assert_matches_naive(rule, &mut rng, 1024);
        }
    }

    #[test]
    fn matches_naive_count_for_random_rules() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EED_C0DE_0002);
        for _ in 0..64 {
            let birth = (rng.next_u64() as CountMask) & 0b1_1111_1110;
            let survival = (rng.next_u64() as CountMask) & 0b1_1111_1110;
            for _ in 0..64 {
                let above = rng.next_u64();
                let center = rng.next_u64();
                let below = rng.next_u64();
                let got = advance_cluster(above, center, below, birth, survival) & INTERIOR_MASK;
                let want = naive_advance(above, center, below, birth, survival);
                assert_eq!(got, want);
            }
        }
    }

    #[test]
    fn empty_rule_kills_everything() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EED_C0DE_0003);
        for _ in 0..256 {
            let out = advance_cluster(rng.next_u64(), rng.next_u64(), rng.next_u64(), 0, 0);
            assert_eq!(out & INTERIOR_MASK, 0);
        }
    }

    #[test]
    fn dead_neighborhood_stays_dead() {
        let all: CountMask = 0b1_1111_1110;
        assert_eq!(advance_cluster(0, 0, 0, all, all), 0);
    }
}
