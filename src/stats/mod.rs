//! Run statistics: the shared aggregator and the rendered report.
mod aggregator;
mod duration;
mod histogram;
mod report;


pub use aggregator::StatsAggregator;
pub use report::format_bytes_compact;
