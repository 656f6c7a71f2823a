//! Traffic engine: the worker pool and the run lifecycle.
mod coordinator;
mod settings;
mod worker;


pub use coordinator::{RunTermination, TrafficGenerator};
pub use settings::RunSettings;
pub use worker::{LineFormat, Worker, padding_width};
