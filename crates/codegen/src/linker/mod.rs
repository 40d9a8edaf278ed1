//! Unit linking - resolves spawned task units and stores compiled ones

pub mod resolver;
pub mod store;

pub use resolver::{FsUnitResolver, InMemoryResolver, ResolvedUnit, SearchPath, UnitResolver};
pub use store::ArtifactStore;
