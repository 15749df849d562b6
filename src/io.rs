// File collaborators: station lists and sample tables in, rate tables out.

pub mod error;
pub mod report_writer;
pub mod sample_reader;
pub mod station_list;

pub use error::IoError;
pub use report_writer::ReportWriter;
pub use sample_reader::{read_samples, site_file_path};
pub use station_list::{read_station_list, KNOWN_GROUPS};
