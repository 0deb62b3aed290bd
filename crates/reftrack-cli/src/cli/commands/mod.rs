//! CLI command handlers, one per file.

mod check;
mod classify;
mod enrich;

pub use check::run_check;
pub use classify::run_classify;
pub use enrich::run_enrich;
