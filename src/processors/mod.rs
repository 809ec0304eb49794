pub mod cache;
pub mod normalizer;
pub mod pipeline;
pub mod series_joiner;
pub mod trip_aggregator;

pub use cache::{LoadCache, SourceKey};
pub use normalizer::TripNormalizer;
pub use pipeline::DashboardPipeline;
pub use series_joiner::SeriesJoiner;
pub use trip_aggregator::TripAggregator;
