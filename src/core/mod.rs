pub mod hierarchy;
pub mod resolver;
pub mod scoring;

pub use crate::domain::model::{
    BoundingBox, Geometry, PostcodeFragment, ResolutionResult, ScoredCandidate, SearchCandidate,
};
pub use crate::domain::ports::{BoundaryRenderer, ConfigProvider, SearchClient, Storage};
pub use crate::utils::error::Result;
