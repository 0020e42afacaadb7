// Report rendering: paginated layout → PDF bytes.
// CPU-bound; handlers call it inside tokio::task::spawn_blocking.

pub mod pdf;

pub use pdf::{render_report, RenderError, REPORT_FILENAME};
