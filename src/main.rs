use rand::RngCore;
use rand::SeedableRng;
use std::time::Instant;
use sweep_life::{Grid, Rule, StepOptions};

struct DemoConfig {
    rows: usize,
    cols: usize,
    iterations: u64,
    density: f64,
    seed: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            rows: 4096,
            cols: 4096,
            iterations: 100,
            density: 0.42,
            seed: 0x5EED_1234_ABCD_EF01,
        }
    }
}

fn parse_args() -> DemoConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = DemoConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rows" => {
                i += 1;
                config.rows = args[i].parse().expect("--rows requires a positive integer");
            }
            "--cols" => {
                i += 1;
                config.cols = args[i].parse().expect("--cols requires a positive integer");
            }
            "--iters" => {
                i += 1;
                config.iterations = args[i].parse().expect("--iters requires a positive integer");
            }
            "--density" => {
                i += 1;
                config.density = args[i].parse().expect("--density requires a float in 0..1");
            }
            "--seed" => {
                i += 1;
                config.seed = args[i].parse().expect("--seed requires an integer");
            }
            other => panic!(
                "unknown argument: {other}\nusage: sweep-life [--rows N] [--cols N] [--iters N] [--density F] [--seed N]"
            ),
        }
        i += 1;
    }
    config
}

fn seeded_grid(config: &DemoConfig) -> Grid {
    let mut grid =
        Grid::new(config.rows, config.cols, Rule::CONWAY).expect("demo dimensions are positive");
    let mut rng = rand::rngs::StdRng::seed_from_u64(config.seed);
    let threshold = (u64::MAX as f64 * config.density) as u64;
    for r in 0..config.rows {
        for c in 0..config.cols {
            if rng.next_u64() <= threshold {
                grid.set(r, c, true).expect("seed coordinates in bounds");
            }
        }
    }
    grid
}

fn main() {
    let config = parse_args();
    let cells = config.rows as u64 * config.cols as u64;

    let mut serial = seeded_grid(&config);
    let mut parallel = seeded_grid(&config);

    let serial_opts = StepOptions::default().parallel(false);
    let start = Instant::now();
    for _ in 0..config.iterations {
        serial.step_with(&serial_opts);
    }
    let serial_duration = start.elapsed();

    let parallel_opts = StepOptions::default().parallel(true);
    let start = Instant::now();
    for _ in 0..config.iterations {
        parallel.step_with(&parallel_opts);
    }
    let parallel_duration = start.elapsed();

    assert_eq!(serial.population(), parallel.population());

    let rate = |duration: std::time::Duration| {
        cells as f64 * config.iterations as f64 / duration.as_secs_f64() / 1e9
    };
    println!(
        "{}x{} soup, {} generations, final population {}",
        config.rows,
        config.cols,
        config.iterations,
        serial.population()
    );
    println!(
        "serial:   {:>8.2?} ({:.2} Gcells/s)",
        serial_duration,
        rate(serial_duration)
    );
    println!(
        "parallel: {:>8.2?} ({:.2} Gcells/s)",
        parallel_duration,
        rate(parallel_duration)
    );
}
