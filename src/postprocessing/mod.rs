//! Final polish of the assistant response before it reaches the user.

pub mod formatter;
pub mod steps;
pub mod traits;

pub use formatter::ResponseFormatter;
pub use steps::clean;
pub use traits::TextTransform;
