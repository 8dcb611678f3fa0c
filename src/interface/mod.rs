pub mod render;

pub use render::{display_model_summary, display_report};
