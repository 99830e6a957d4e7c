//! Display utilities for formatted output

/// Announce a pipeline stage
pub fn show_stage(message: &str) {
    println!("\n{message}");
}

/// Close the announced stage
pub fn show_done() {
    println!(" ... done.");
}

/// Tell the user that logging was switched off on request
pub fn show_logging_disabled() {
    println!("Logging is disabled as per user request.");
}

/// Ask for the missing connection details before prompting starts
pub fn show_connection_prompt_header() {
    println!("\nPlease enter the following connection details manually.");
}
