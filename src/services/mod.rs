pub mod distribution;
pub mod filters;
pub mod ingestion;
pub mod providers;
pub mod sampler;
pub mod selection;

pub use selection::MovieNightService;
