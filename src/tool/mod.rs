pub mod types;
mod trait_def;

pub use trait_def::{Tool, ToolOutcome};

// Re-export specific tool implementations
pub use types::eraser::{DEFAULT_ERASER_PADDING, EraserTool};
pub use types::pen::PenTool;
