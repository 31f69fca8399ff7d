use arrow::array::{Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_writer::ArrowWriter;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use crate::error::ExportError;
use crate::types::Cost;

/// One column generation round.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    /// Batch column the round belongs to, 0 for single comparisons.
    pub column: usize,
    pub round: usize,
    /// Real arcs in the restricted network when the round was priced.
    pub arcs: usize,
    pub admitted: usize,
    pub reused: usize,
    /// Cost of the restricted optimum.
    pub objective: Cost,
    pub min_reduced_cost: Cost,
    /// Simplex pivots so far.
    pub pivots: u64,
    /// Seconds since the solve started.
    pub time: f64,
}

pub fn serialize_to_parquet(
    iteration_data: &[IterationRecord],
    filename: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let columns: Int64Array = iteration_data.iter().map(|d| d.column as i64).collect();
    let rounds: Int64Array = iteration_data.iter().map(|d| d.round as i64).collect();
    let arcs: Int64Array = iteration_data.iter().map(|d| d.arcs as i64).collect();
    let admitted: Int64Array = iteration_data.iter().map(|d| d.admitted as i64).collect();
    let reused: Int64Array = iteration_data.iter().map(|d| d.reused as i64).collect();
    let objectives: Float64Array = iteration_data.iter().map(|d| d.objective).collect();
    let reduced_costs: Float64Array = iteration_data
        .iter()
        .map(|d| d.min_reduced_cost)
        .collect();
    let pivots: Int64Array = iteration_data.iter().map(|d| d.pivots as i64).collect();
    let times: Float64Array = iteration_data.iter().map(|d| d.time).collect();

    // Arrow schema
    let schema = Schema::new(vec![
        Field::new("column", DataType::Int64, false),
        Field::new("round", DataType::Int64, false),
        Field::new("arcs", DataType::Int64, false),
        Field::new("admitted", DataType::Int64, false),
        Field::new("reused", DataType::Int64, false),
        Field::new("objective", DataType::Float64, false),
        Field::new("min_reduced_cost", DataType::Float64, false),
        Field::new("pivots", DataType::Int64, false),
        Field::new("time", DataType::Float64, false),
    ]);

    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(columns),
            Arc::new(rounds),
            Arc::new(arcs),
            Arc::new(admitted),
            Arc::new(reused),
            Arc::new(objectives),
            Arc::new(reduced_costs),
            Arc::new(pivots),
            Arc::new(times),
        ],
    )?;

    let file = File::create(filename)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parquet::file::reader::{FileReader, SerializedFileReader};

    #[test]
    fn test_parquet_export() {
        let records = vec![
            IterationRecord {
                column: 0,
                round: 1,
                arcs: 10,
                admitted: 4,
                reused: 0,
                objective: 2.5,
                min_reduced_cost: -0.75,
                pivots: 12,
                time: 0.001,
            },
            IterationRecord {
                column: 0,
                round: 2,
                arcs: 14,
                admitted: 0,
                reused: 0,
                objective: 2.25,
                min_reduced_cost: 0.0,
                pivots: 15,
                time: 0.002,
            },
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colgen.parquet");
        serialize_to_parquet(&records, &path).unwrap();

        let reader = SerializedFileReader::new(File::open(&path).unwrap()).unwrap();
        let meta = reader.metadata();
        assert_eq!(meta.file_metadata().num_rows(), 2);
        assert_eq!(meta.file_metadata().schema_descr().num_columns(), 9);
    }
}
