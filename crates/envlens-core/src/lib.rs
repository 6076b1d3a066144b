pub mod aggregate;
pub mod config;
pub mod correlation;
pub mod counts;
pub mod enrich;
pub mod error;
pub mod outputs;
pub mod partition;
pub mod pipeline;
pub mod profiles;
pub mod report;
pub mod source;
pub mod stats;
pub mod trend;
