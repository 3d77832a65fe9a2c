// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{STARTER_CONFIG, load_config};

// Re-export check functionality from layerwatch-core
pub use layerwatch_core::check::{
    CheckOptions, CheckProgressCallback, MapCheckReport, RunSummary, execute_check,
};
pub use layerwatch_core::report::{ReportFormat, generate_json_report, generate_text_report};
