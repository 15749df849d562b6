// Report assembly: rate rows per metric, breach routing, outlier records.
// Writing them to disk lives in `io::report_writer`.

pub mod assembler;
pub mod tables;

pub use assembler::{OutlierRecord, RateRow, ReportAssembler, SeriesRows};
pub use tables::{GroupReport, RateTable};
