pub mod kill;
pub mod process;
pub mod registry;
pub mod sampler;
pub mod snapshot;
pub mod window;
