//! Wire types of the algorithm service and the node normalizer.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Hyperparameters, StudyStatus};

/// Body of `POST {base_url}/run`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSubmission {
    pub zenodo_id: String,
    pub hyperparameters: Hyperparameters,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubmitResponse {
    pub task_id: TaskId,
}

/// Task identifier assigned by the algorithm service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TaskIdRepr")]
pub struct TaskId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum TaskIdRepr {
    Text(String),
    Number(i64),
}

impl From<TaskIdRepr> for TaskId {
    fn from(value: TaskIdRepr) -> Self {
        match value {
            TaskIdRepr::Text(s) => TaskId(s),
            TaskIdRepr::Number(n) => TaskId(n.to_string()),
        }
    }
}

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `GET {base_url}/status/{task_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatusReport {
    pub task_status: String,
    #[serde(default)]
    pub task_result: TaskResult,
}

impl TaskStatusReport {
    pub fn new(task_status: impl Into<String>, task_result: TaskResult) -> Self {
        Self {
            task_status: task_status.into(),
            task_result,
        }
    }

    pub fn pending(task_status: impl Into<String>) -> Self {
        Self::new(task_status, TaskResult::Empty)
    }

    pub fn status(&self) -> StudyStatus {
        StudyStatus::from(self.task_status.as_str())
    }

    /// Text recorded on a study whose task failed.
    pub fn failure_message(&self) -> String {
        match &self.task_result {
            TaskResult::Message(message) => message.clone(),
            TaskResult::Empty => String::new(),
            other => serde_json::to_value(other)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Payload of a status report: result rows on success, a message on failure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskResult {
    Rows(Vec<ResultRow>),
    Message(String),
    #[default]
    Empty,
    Other(Value),
}

/// One edge of the result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "Gene1")]
    pub gene1: String,
    #[serde(rename = "Gene2")]
    pub gene2: String,
    #[serde(rename = "EdgeWeight")]
    pub edge_weight: EdgeWeightField,
}

impl ResultRow {
    pub fn new(gene1: impl Into<String>, gene2: impl Into<String>, edge_weight: &str) -> Self {
        Self {
            gene1: gene1.into(),
            gene2: gene2.into(),
            edge_weight: EdgeWeightField::Text(edge_weight.to_string()),
        }
    }
}

/// Edge weights arrive string-encoded; plain JSON numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeWeightField {
    Number(f64),
    Text(String),
}

impl EdgeWeightField {
    pub fn parse(&self) -> Option<f64> {
        match self {
            EdgeWeightField::Number(n) => Some(*n),
            EdgeWeightField::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for EdgeWeightField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeWeightField::Number(n) => write!(f, "{}", n),
            EdgeWeightField::Text(s) => f.write_str(s),
        }
    }
}

/// Body of `POST {base_url}/get_normalized_nodes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationRequest<'a> {
    pub curies: &'a [String],
}

/// Response of the node normalizer, keyed by input curie.
///
/// Entries are kept raw and decoded on lookup, so one malformed entry does
/// not poison the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizationResponse(HashMap<String, Value>);

impl NormalizationResponse {
    pub fn new(entries: HashMap<String, Value>) -> Self {
        Self(entries)
    }

    pub fn lookup(&self, curie: &str) -> Option<NormalizedNode> {
        match self.0.get(curie)? {
            Value::Null => None,
            value => serde_json::from_value(value.clone()).ok(),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedNode {
    pub id: NodeIdentity,
    #[serde(default)]
    pub equivalent_identifiers: Vec<EquivalentIdentifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeIdentity {
    #[serde(default)]
    pub identifier: Option<String>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalentIdentifier {
    pub identifier: String,
    #[serde(default)]
    pub label: Option<String>,
}
