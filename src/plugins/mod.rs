pub mod back2d;
pub mod base;
pub mod geoportal;
pub mod print;

pub use geoportal::GeoportalPlugin;
