pub mod aggregates;
pub mod map;
pub mod report;
pub mod table;
pub mod trip;
pub mod weather;

pub use aggregates::{DailyAggregate, SeasonAggregate, StationAggregate, TripSummary};
pub use map::MapDocument;
pub use report::{Condition, DashboardReport};
pub use table::{normalize_header, NormalizationStats, RawTable, TripTable};
pub use trip::{Season, TripRecord};
pub use weather::{DailyWeather, JoinedDay, JoinedSeries};
