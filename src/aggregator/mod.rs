//! Aggregator: builder and merge engine.

mod builder;
mod engine;
mod view;

pub use builder::{Vitrine, VitrineBuilder};
pub use engine::Aggregator;
pub use view::{AggregatedProfileView, CombinedSkills};
