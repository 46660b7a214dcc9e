//! Screen-space types.

mod viewport;

pub use viewport::Viewport;
