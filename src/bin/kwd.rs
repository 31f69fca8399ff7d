use spatial_kwd::metrics;
use spatial_kwd::utils::random::random_pair;
use spatial_kwd::utils::{Args, Parser};
use spatial_kwd::Solver;

use std::fs;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let setup_time = Instant::now();
    let instance = random_pair(args.n, args.samples(), args.seed);

    let mut solver = Solver::with_config(args.config());
    solver.set_instrumentation(args.instrument.is_some());
    if let Some(dir) = &args.instrument {
        fs::create_dir_all(dir)?;
    }

    println!("------");
    println!(
        "Instance: n = {}, {} samples per histogram, seed {}",
        args.n,
        args.samples(),
        args.seed
    );
    println!("Method: {} / {}", args.method, args.algorithm);
    println!("Setup: {:?}", setup_time.elapsed());

    let size = instance.x.len();
    for &radius in &args.radius {
        let mut runtimes = Vec::with_capacity(args.runs as usize);
        let mut distance = 0.0;

        for run in 0..args.runs {
            distance = solver.compare(
                size,
                &instance.x,
                &instance.y,
                &instance.a,
                &instance.b,
                radius,
            )?;
            runtimes.push(solver.runtime());

            if let Some(solution) = solver.last_solutions().first() {
                println!("L = {} run {}: {}", radius, run, solution);
            }

            if let Some(dir) = &args.instrument {
                metrics::serialize_to_parquet(
                    solver.iteration_records(),
                    dir.join(format!("colgen_n{}_L{}_{:03}.parquet", args.n, radius, run)),
                )?;
            }
        }

        let average = runtimes.iter().sum::<f64>() / runtimes.len().max(1) as f64;
        println!(
            "{} => {}: L = {} distance {:.6}, {:.3} ms average",
            args.algorithm,
            args.n,
            radius,
            distance,
            average * 1000.0
        );
    }

    Ok(())
}
