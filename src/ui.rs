use crate::errors::{AppError, AppResult};
use indicatif::{ProgressBar, ProgressStyle};

/// Creates a progress bar for a stage that processes `total` files.
///
/// `label` is shown as the bar's prefix. Drawing goes to stderr and is suppressed
/// automatically when stderr is not a terminal, so logs stay clean in pipelines.
///
/// # Example
///
/// ```no_run
/// use sms_merge::ui;
///
/// # fn main() -> Result<(), sms_merge::errors::AppError> {
/// let pb = ui::create_progress_bar(12, "parsing")?;
/// pb.inc(1);
/// pb.finish_with_message("Done");
/// # Ok(())
/// # }
/// ```
pub fn create_progress_bar(total: u64, label: &str) -> AppResult<ProgressBar> {
    let style = ProgressStyle::default_bar()
        .template("{prefix:>8} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} files {msg}")
        .map_err(|e| AppError::IoError(format!("Failed to create progress bar template: {e}")))?
        .progress_chars("#>-");

    let pb = ProgressBar::new(total).with_style(style);
    pb.set_prefix(label.to_string());
    Ok(pb)
}
