//! Export pipeline: issue parsing and CSV rendering

pub mod parser;
pub mod value;
pub mod writer;

pub use parser::{IssueParser, csv_columns, csv_row};
pub use writer::write_csv;
