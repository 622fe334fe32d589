//! Column sweep: advance a grid one generation.
//!
//! The sweep walks cluster columns left to right with two rotating
//! scratch columns. `A` always holds a halo-valid copy of the column the
//! kernel is about to overwrite; `B` is the halo-valid copy of the next
//! column being prepared from grid storage the kernel has not touched.
//! No cluster read by a sub-step is written by the same sub-step, so rows
//! split into fixed-size chunks are independent units of work for both
//! the serial loop and the rayon fan-out.

use std::sync::OnceLock;

use rayon::prelude::*;

use crate::cluster::{CELLS_PER_CLUSTER, splice_halo, tail_mask};
use crate::grid::Grid;
use crate::kernel::advance_cluster;
use crate::rule::{CountMask, Rule};

pub(crate) const DEFAULT_CHUNK_LEN: usize = 64;
pub(crate) const PARALLEL_ROWS_THRESHOLD: usize = 1024;

static PHYSICAL_CORES: OnceLock<usize> = OnceLock::new();

#[inline]
fn physical_core_count() -> usize {
    *PHYSICAL_CORES.get_or_init(|| num_cpus::get_physical().max(1))
}

/// Per-step tuning knobs.
///
/// Use `StepOptions::default()` for auto-tuned behavior, or customise
/// individual knobs via the builder methods.
#[derive(Clone, Debug)]
pub struct StepOptions {
    /// Rows per schedulable unit of work. Default 64, sized so one
    /// chunk of scratch column stays L1-resident.
    pub chunk_len: usize,
    /// Force the parallel path on or off. `None` auto-selects: parallel
    /// when the grid is taller than 1024 rows and more than one physical
    /// core is available.
    pub parallel: Option<bool>,
}

impl Default for StepOptions {
    fn default() -> Self {
        Self {
            chunk_len: DEFAULT_CHUNK_LEN,
            parallel: None,
        }
    }
}

impl StepOptions {
    /// Set the number of rows per unit of schedulable work.
    pub fn chunk_len(mut self, n: usize) -> Self {
        self.chunk_len = n.max(1);
        self
    }

    /// Force the parallel path on or off.
    pub fn parallel(mut self, on: bool) -> Self {
        self.parallel = Some(on);
        self
    }
}

const CONWAY_B: CountMask = Rule::CONWAY.birth_mask();
const CONWAY_S: CountMask = Rule::CONWAY.survival_mask();
const HIGHLIFE_B: CountMask = Rule::HIGHLIFE.birth_mask();
const HIGHLIFE_S: CountMask = Rule::HIGHLIFE.survival_mask();
const SEEDS_B: CountMask = Rule::SEEDS.birth_mask();
const SEEDS_S: CountMask = Rule::SEEDS.survival_mask();
const SERVIETTES_B: CountMask = Rule::SERVIETTES.birth_mask();
const SERVIETTES_S: CountMask = Rule::SERVIETTES.survival_mask();

/// Advance `grid` one generation, dispatching popular rules to
/// monomorphized sweeps so the kernel's count selection constant-folds.
/// Every other rule runs the identical code with runtime masks.
pub(crate) fn run(grid: &mut Grid, options: &StepOptions) {
    match (grid.rule.birth_mask(), grid.rule.survival_mask()) {
        (CONWAY_B, CONWAY_S) => run_rule::<CONWAY_B, CONWAY_S>(grid, options),
        (HIGHLIFE_B, HIGHLIFE_S) => run_rule::<HIGHLIFE_B, HIGHLIFE_S>(grid, options),
        (SEEDS_B, SEEDS_S) => run_rule::<SEEDS_B, SEEDS_S>(grid, options),
        (SERVIETTES_B, SERVIETTES_S) => run_rule::<SERVIETTES_B, SERVIETTES_S>(grid, options),
        (birth, survival) => run_impl(grid, options, birth, survival),
    }
}

fn run_rule<const B: CountMask, const S: CountMask>(grid: &mut Grid, options: &StepOptions) {
    run_impl(grid, options, B, S);
}

#[inline(always)]
fn run_impl(grid: &mut Grid, options: &StepOptions, birth: CountMask, survival: CountMask) {
    let rows = grid.rows;
    let stride = grid.col_stride();
    let p = grid.cluster_cols;
    debug_assert_eq!(grid.scratch_a.len(), stride);
    debug_assert_eq!(grid.scratch_b.len(), stride);
    debug_assert_eq!(grid.words.len(), (p + 2) * stride);

    let chunk_len = options.chunk_len.max(1);
    let parallel = options
        .parallel
        .unwrap_or_else(|| rows > PARALLEL_ROWS_THRESHOLD && physical_core_count() > 1);
    let tail_cells = grid.cols - (p - 1) * CELLS_PER_CLUSTER;
    let tail = tail_mask(tail_cells);

    let mut a = std::mem::take(&mut grid.scratch_a);
    let mut b = std::mem::take(&mut grid.scratch_b);
    let words: &mut [u64] = &mut grid.words;

    // Phase 0: prime A as a halo-valid copy of cluster column 1; its left
    // neighbor is the zero border column.
    splice_column(
        &mut a,
        &words[..stride],
        &words[stride..2 * stride],
        &words[2 * stride..3 * stride],
        rows,
        chunk_len,
        parallel,
    );

    // Phase 1: interior sweep. Writing column j-1 from A and preparing B
    // from columns j and j+1 touch disjoint storage; the two fan-outs per
    // iteration put a barrier between the kernel and halo sub-steps.
    for j in 2..=p {
        let (lo, hi) = words.split_at_mut(j * stride);
        let dst = &mut lo[(j - 1) * stride..];
        advance_column(dst, &a, birth, survival, u64::MAX, rows, chunk_len, parallel);
        splice_column(
            &mut b,
            &a,
            &hi[..stride],
            &hi[stride..2 * stride],
            rows,
            chunk_len,
            parallel,
        );
        std::mem::swap(&mut a, &mut b);
    }

    // Phase 2: finalize the rightmost active column. The tail mask kills
    // any cells the kernel produced past the logical width.
    let dst = &mut words[p * stride..(p + 1) * stride];
    advance_column(dst, &a, birth, survival, tail, rows, chunk_len, parallel);

    grid.scratch_a = a;
    grid.scratch_b = b;
}

/// Kernel sub-step: write the next generation of the column copied in
/// `src` into `dst`, masking each result with `keep`.
#[inline(always)]
fn advance_column(
    dst: &mut [u64],
    src: &[u64],
    birth: CountMask,
    survival: CountMask,
    keep: u64,
    rows: usize,
    chunk_len: usize,
    parallel: bool,
) {
    if parallel {
        dst[1..rows + 1]
            .par_chunks_mut(chunk_len)
            .enumerate()
            .for_each(|(chunk_idx, chunk)| {
                let base = 1 + chunk_idx * chunk_len;
                for (k, slot) in chunk.iter_mut().enumerate() {
                    let r = base + k;
                    *slot = advance_cluster(src[r - 1], src[r], src[r + 1], birth, survival) & keep;
                }
            });
    } else {
        for r in 1..=rows {
            dst[r] = advance_cluster(src[r - 1], src[r], src[r + 1], birth, survival) & keep;
        }
    }
}

/// Halo sub-step: copy `center` into `dst` with its halo bits respliced
/// from `left` and `right`.
#[inline(always)]
fn splice_column(
    dst: &mut [u64],
    left: &[u64],
    center: &[u64],
    right: &[u64],
    rows: usize,
    chunk_len: usize,
    parallel: bool,
) {
    if parallel {
        dst[1..rows + 1]
            .par_chunks_mut(chunk_len)
            .enumerate()
            .for_each(|(chunk_idx, chunk)| {
                let base = 1 + chunk_idx * chunk_len;
                for (k, slot) in chunk.iter_mut().enumerate() {
                    let r = base + k;
                    *slot = splice_halo(left[r], center[r], right[r]);
                }
            });
    } else {
        for r in 1..=rows {
            dst[r] = splice_halo(left[r], center[r], right[r]);
        }
    }
}
