use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::info;
use rayon::prelude::*;

use crate::config::Config;
use crate::error::KwdError;
use crate::flow::solve::solve_column;
use crate::graph::TransportGraph;
use crate::metrics::IterationRecord;
use crate::problem::Distribution;
use crate::solution::Solution;
use crate::types::Mass;
use crate::utils::WeightMatrix;

/// Compares one base distribution against every column of a weight matrix
/// over a single shared graph.
pub struct BatchDriver<'g, 's> {
    graph: &'g TransportGraph<'s>,
    config: &'g Config,
}

/// Balance vector of one distinct column and the first column index that has it.
struct Job {
    column: usize,
    balance: Vec<Mass>,
}

impl<'g, 's> BatchDriver<'g, 's> {
    pub fn new(graph: &'g TransportGraph<'s>, config: &'g Config) -> Self {
        BatchDriver { graph, config }
    }

    /// One solution per column, in column order. Bit-identical columns are solved once.
    pub fn run(
        &self,
        base: &Distribution<'s>,
        weights: &WeightMatrix,
        iteration_data: Option<&mut Vec<IterationRecord>>,
    ) -> Result<Vec<Solution>, KwdError> {
        let support = self.graph.support();

        let mut first_column: HashMap<Vec<u8>, usize> = HashMap::new();
        let mut slot_of_column = Vec::with_capacity(weights.cols);
        let mut jobs = Vec::new();
        for j in 0..weights.cols {
            match first_column.entry(weights.column_bytes(j)) {
                Entry::Occupied(e) => slot_of_column.push(*e.get()),
                Entry::Vacant(e) => {
                    let column: Vec<Mass> = weights.column(j).copied().collect();
                    let target = Distribution::named("W", support, &column)?;
                    jobs.push(Job {
                        column: j,
                        balance: base.balance(&target, self.config.normalize)?,
                    });
                    slot_of_column.push(*e.insert(jobs.len() - 1));
                }
            }
        }

        if self.config.logs_info() {
            info!(
                "batch: {} columns, {} distinct, {} threads requested",
                weights.cols,
                jobs.len(),
                self.config.threads
            );
        }

        let instrument = iteration_data.is_some();
        let solve = |job: Job| -> Result<(Solution, Vec<IterationRecord>), KwdError> {
            let mut records = Vec::new();
            let solution = solve_column(
                self.graph,
                job.balance,
                self.config,
                job.column,
                instrument.then_some(&mut records),
            )?;
            Ok((solution, records))
        };

        let solved: Vec<(Solution, Vec<IterationRecord>)> = match self.config.threads {
            1 => jobs.into_iter().map(solve).collect::<Result<_, _>>()?,
            0 => jobs.into_par_iter().map(solve).collect::<Result<_, _>>()?,
            threads => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                pool.install(|| jobs.into_par_iter().map(solve).collect::<Result<_, _>>())?
            }
        };

        let mut distinct = Vec::with_capacity(solved.len());
        let mut all_records = Vec::new();
        for (solution, records) in solved {
            distinct.push(solution);
            all_records.extend(records);
        }
        if let Some(data) = iteration_data {
            data.extend(all_records);
        }

        Ok(slot_of_column
            .into_iter()
            .map(|slot| distinct[slot].clone())
            .collect())
    }
}
