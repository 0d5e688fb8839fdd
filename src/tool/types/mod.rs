pub mod eraser;
pub mod pen;

pub use eraser::EraserTool;
pub use pen::PenTool;
