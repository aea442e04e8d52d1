pub mod detection;

pub use detection::Orchestrator;
