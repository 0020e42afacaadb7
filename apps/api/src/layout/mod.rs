// Report layout: static font metrics, greedy word wrap and pagination.
// Pure geometry; `render` turns the placed lines into PDF bytes.

pub mod font_metrics;
pub mod paginate;
pub mod wrap;

pub use font_metrics::{default_page_config, PageConfig};
