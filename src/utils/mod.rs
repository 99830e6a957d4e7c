//! Small shared helpers

pub mod date;
