//! # Gennifer: gene regulatory network inference job engine
//!
//! `gennifer` submits inference jobs to remote algorithm services, reuses
//! earlier successful studies for identical requests, polls running tasks to
//! completion and reconciles their result tables into normalized genes and
//! weighted edges.
//!
//! - **Resolvers**: idempotent get-or-create of algorithm instances, datasets
//!   and genes, safe under concurrent attempts.
//! - **Deduplication**: a successful study for the same algorithm instance and
//!   dataset is cloned for the new user instead of recomputed.
//! - **Polling**: a configurable interval with optional attempt/duration
//!   bounds and cooperative cancellation.
//! - **Reconciliation**: edge-weight statistics, one batched node
//!   normalization call per study, and a local fallback for unresolved genes.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gennifer::{EngineConfig, Hyperparameters, InMemoryStore, JobRequest, JobRunner};
//! use gennifer::domain::NewAlgorithm;
//! use gennifer::store::StudyStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(InMemoryStore::new());
//!     store
//!         .insert_algorithm(NewAlgorithm::new("GENIE3", "http://genie3:5000"))
//!         .await
//!         .unwrap();
//!
//!     let runner = JobRunner::builder(store)
//!         .config(EngineConfig::from_env().unwrap())
//!         .build()
//!         .unwrap();
//!     let handle = runner.submit(JobRequest::new(
//!         "GENIE3",
//!         "7988181",
//!         Hyperparameters::Absent,
//!         "alice",
//!     ));
//!     println!("completed: {}", handle.wait().await);
//! }
//! ```

pub mod api;
pub mod application;
pub mod core;
pub mod domain;
pub mod error;
pub mod remote;
pub mod store;

pub use crate::api::{JobHandle, JobRunner, JobRunnerBuilder, JobState};
pub use crate::application::{JobOrchestrator, JobOutcome, JobRequest, JobServices};
pub use crate::core::{CancelSignal, EngineConfig, PollPolicy, RuntimeContext};
pub use crate::domain::{Hyperparameters, InferenceStudy, StudyStatus, UserId};
pub use crate::error::{JobError, JobResult};
pub use crate::remote::{AlgorithmService, NodeNormalizer, RemoteError};
pub use crate::store::{InMemoryStore, StoreError, StudyStore};
