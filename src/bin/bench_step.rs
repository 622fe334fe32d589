#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use rand::RngCore;
use rand::SeedableRng;
use std::env;
use std::time::Instant;
use sweep_life::{Grid, Rule, StepOptions};

#[derive(Clone, Debug)]
struct BenchConfig {
    rows: usize,
    cols: usize,
    density: f64,
    warmup: u64,
    iters: u64,
    seed: u64,
    chunk: usize,
    serial: bool,
    rule: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            rows: 4096,
            cols: 4096,
            density: 0.42,
            warmup: 3,
            iters: 50,
            seed: 0x5EED_1234_ABCD_EF01,
            chunk: 64,
            serial: false,
            rule: "B3/S23".to_string(),
        }
    }
}

fn parse_args() -> BenchConfig {
    let mut cfg = BenchConfig::default();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--rows" => {
                if let Some(v) = args.next() {
                    cfg.rows = v.parse().expect("--rows requires a positive integer");
                }
            }
            "--cols" => {
                if let Some(v) = args.next() {
                    cfg.cols = v.parse().expect("--cols requires a positive integer");
                }
            }
            "--density" => {
                if let Some(v) = args.next() {
                    cfg.density = v.parse().expect("--density requires a float in 0..1");
                }
            }
            "--warmup" => {
                if let Some(v) = args.next() {
                    cfg.warmup = v.parse().expect("--warmup requires an integer");
                }
            }
            "--iters" => {
                if let Some(v) = args.next() {
                    cfg.iters = v.parse().expect("--iters requires a positive integer");
                }
            }
            "--seed" => {
                if let Some(v) = args.next() {
                    cfg.seed = v.parse().expect("--seed requires an integer");
                }
            }
            "--chunk" => {
                if let Some(v) = args.next() {
                    cfg.chunk = v.parse().expect("--chunk requires a positive integer");
                }
            }
            "--serial" => cfg.serial = true,
            "--rule" => {
                if let Some(v) = args.next() {
                    cfg.rule = v;
                }
            }
            other => panic!(
                "unknown argument: {other}\nusage: bench_step [--rows N] [--cols N] [--density F] \
                 [--warmup N] [--iters N] [--seed N] [--chunk N] [--serial] [--rule B../S..]"
            ),
        }
    }
    cfg
}

fn main() {
    let cfg = parse_args();
    let rule: Rule = cfg.rule.parse().expect("--rule must be B<digits>/S<digits>");

    let mut grid = Grid::new(cfg.rows, cfg.cols, rule).expect("bench dimensions are positive");
    let mut rng = rand::rngs::StdRng::seed_from_u64(cfg.seed);
    let threshold = (u64::MAX as f64 * cfg.density) as u64;
    for r in 0..cfg.rows {
        for c in 0..cfg.cols {
            if rng.next_u64() <= threshold {
                grid.set(r, c, true).expect("seed coordinates in bounds");
            }
        }
    }

    let opts = StepOptions::default()
        .chunk_len(cfg.chunk)
        .parallel(!cfg.serial);

    for _ in 0..cfg.warmup {
        grid.step_with(&opts);
    }

    let start = Instant::now();
    for _ in 0..cfg.iters {
        grid.step_with(&opts);
    }
    let elapsed = start.elapsed();

    let cells = cfg.rows as f64 * cfg.cols as f64 * cfg.iters as f64;
    println!(
        "{}x{} {} soup, chunk {}, {}: {} generations in {:.3?} ({:.2} Gcells/s, population {})",
        cfg.rows,
        cfg.cols,
        rule,
        cfg.chunk,
        if cfg.serial { "serial" } else { "parallel" },
        cfg.iters,
        elapsed,
        cells / elapsed.as_secs_f64() / 1e9,
        grid.population()
    );
}
