pub mod ai;
pub mod api;
pub mod assessment;
pub mod entities;
pub mod error;
pub mod migrator;
pub mod progression;
pub mod report;
pub mod seed;
pub mod telemetry;

pub use sea_orm;
