pub mod precomputed_reader;
pub mod trip_reader;
pub mod weather_reader;

pub use precomputed_reader::PrecomputedReader;
pub use trip_reader::TripReader;
pub use weather_reader::WeatherReader;
