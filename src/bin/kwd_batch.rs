use spatial_kwd::metrics;
use spatial_kwd::utils::random::random_batch;
use spatial_kwd::utils::{Args, Parser};
use spatial_kwd::Solver;

use std::fs;

const MIN_COORD: i32 = 1;
const MAX_COORD: i32 = 100;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let points = args.samples.unwrap_or(1024);
    let instance = random_batch(points, args.columns, MIN_COORD, MAX_COORD, args.seed);

    let mut solver = Solver::with_config(args.config());
    solver.set_instrumentation(args.instrument.is_some());
    if let Some(dir) = &args.instrument {
        fs::create_dir_all(dir)?;
    }

    println!("------");
    println!(
        "Batch: {} points in [{}, {}], {} columns, seed {}",
        points, MIN_COORD, MAX_COORD, args.columns, args.seed
    );
    println!("Method: {} / {}", args.method, args.algorithm);

    for &radius in &args.radius {
        for run in 0..args.runs {
            let distances = solver.compare_batch(
                points,
                instance.columns,
                &instance.x,
                &instance.y,
                &instance.a,
                &instance.w,
                radius,
            )?;

            println!(
                "L = {} run {}: {:?} in {:.3} ms",
                radius,
                run,
                distances,
                solver.runtime() * 1000.0
            );
            for (j, solution) in solver.last_solutions().iter().enumerate() {
                println!("  column {}: {}", j, solution);
            }

            if let Some(dir) = &args.instrument {
                metrics::serialize_to_parquet(
                    solver.iteration_records(),
                    dir.join(format!("colgen_batch_L{}_{:03}.parquet", radius, run)),
                )?;
            }
        }
    }

    Ok(())
}
