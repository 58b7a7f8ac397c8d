pub mod celestial;
pub mod constants;
pub mod conversion;
pub mod ecef;
pub mod ellipsoid;
pub mod geocoord_errors;
pub mod geodesic;
pub mod geodetic;
pub mod grid;
pub mod load_policy;
pub mod parser;
pub mod position;
pub mod time;

pub use geocoord_errors::GeoCoordError;
pub use position::Position;
