//! Domain layer: entities of the inference study model.
//!
//! Nothing here performs I/O. Persistence lives behind
//! [`crate::store::StudyStore`] and remote calls behind [`crate::remote`].

pub mod model;

pub use model::*;
