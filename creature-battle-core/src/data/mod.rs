pub mod moves;
pub mod registry;
pub mod types;

pub use registry::Registry;
