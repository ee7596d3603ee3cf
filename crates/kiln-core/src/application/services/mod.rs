//! Application services - use case orchestration.

pub mod class_service;
pub mod materialize;
pub mod project_service;

pub use class_service::ClassService;
pub use materialize::{
    MaterializeError, MaterializeOutcome, MaterializePlan, Materializer, Phase,
};
pub use project_service::ProjectService;
