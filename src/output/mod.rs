//! Output module
//!
//! Writes Arrow RecordBatches to Parquet files on local disk.

mod writer;

pub use writer::{write_batch_to_parquet, ParquetWriter, ParquetWriterConfig};
