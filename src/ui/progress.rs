//! Progress indicators

use indicatif::{ProgressBar, ProgressStyle};

/// Bar style for the issue parse loop
pub fn parse_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(" [{bar:10}] {pos}/{len} ({percent}%) {msg}")
        .expect("Failed to create parse bar style")
        .progress_chars("## ")
}

/// Create the progress bar shown while issues are parsed
pub fn parse_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(parse_bar_style());
    bar
}
