pub mod classifier;
pub mod metrics;
pub mod taxonomy;
