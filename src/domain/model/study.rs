use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{AlgorithmInstanceId, DatasetId, GeneId, ResultId, StudyId, UserId};

/// Status of an inference study.
///
/// The vocabulary is defined by the remote algorithm service; only `SUCCESS`
/// and `FAILURE` are terminal there. `TIMED_OUT` is assigned locally when a
/// bounded poll gives up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StudyStatus {
    Success,
    Failure,
    TimedOut,
    Other(String),
}

impl StudyStatus {
    pub const SUCCESS: &'static str = "SUCCESS";
    pub const FAILURE: &'static str = "FAILURE";
    pub const TIMED_OUT: &'static str = "TIMED_OUT";

    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => Self::SUCCESS,
            Self::Failure => Self::FAILURE,
            Self::TimedOut => Self::TIMED_OUT,
            Self::Other(s) => s,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for StudyStatus {
    fn from(value: &str) -> Self {
        match value {
            Self::SUCCESS => Self::Success,
            Self::FAILURE => Self::Failure,
            Self::TIMED_OUT => Self::TimedOut,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for StudyStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<StudyStatus> for String {
    fn from(value: StudyStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for StudyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary statistics over a study's edge weights.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeWeightStats {
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub mean: Option<f64>,
    /// Sample standard deviation (divisor `n - 1`).
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceStudy {
    pub id: StudyId,
    pub algorithm_instance_id: AlgorithmInstanceId,
    pub dataset_id: DatasetId,
    pub user: UserId,
    pub status: StudyStatus,
    pub message: Option<String>,
    pub stats: EdgeWeightStats,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStudy {
    pub algorithm_instance_id: AlgorithmInstanceId,
    pub dataset_id: DatasetId,
    pub user: UserId,
    pub status: StudyStatus,
    pub message: Option<String>,
    pub stats: EdgeWeightStats,
}

/// One edge of an inferred network: `tf` regulates `target` with `edge_weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub id: ResultId,
    pub tf: GeneId,
    pub target: GeneId,
    pub edge_weight: f64,
    pub study_id: StudyId,
    pub user: UserId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInferenceResult {
    pub tf: GeneId,
    pub target: GeneId,
    pub edge_weight: f64,
    pub study_id: StudyId,
    pub user: UserId,
}

/// Filter for [`crate::store::StudyStore::find_studies`]. Unset fields match
/// everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudyQuery {
    pub algorithm_instance_id: Option<AlgorithmInstanceId>,
    pub dataset_id: Option<DatasetId>,
    pub user: Option<UserId>,
    pub status: Option<StudyStatus>,
}

impl StudyQuery {
    pub fn matches(&self, study: &InferenceStudy) -> bool {
        self.algorithm_instance_id
            .as_ref()
            .is_none_or(|id| *id == study.algorithm_instance_id)
            && self.dataset_id.as_ref().is_none_or(|id| *id == study.dataset_id)
            && self.user.as_ref().is_none_or(|u| *u == study.user)
            && self.status.as_ref().is_none_or(|s| *s == study.status)
    }
}
