//! Turns a successful task's result table into genes, inference results and
//! study statistics.

mod normalize;
mod stats;

use std::collections::{BTreeSet, HashMap};

pub use normalize::{normalized_gene, preferred_curie, NormalizedGene, NOT_FOUND_LABEL};
pub use stats::edge_weight_stats;

use crate::application::resolve::resolve_gene;
use crate::domain::{
    parse_gene_token, GeneId, GeneKey, GeneToken, InferenceStudy, NewInferenceResult,
};
use crate::error::JobError;
use crate::remote::{NodeNormalizer, NormalizationResponse, ResultRow, TaskResult, TaskStatusReport};
use crate::store::StudyStore;

struct ParsedRow {
    tf: GeneToken,
    target: GeneToken,
    edge_weight: f64,
}

fn parse_rows(rows: &[ResultRow]) -> Result<Vec<ParsedRow>, JobError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let edge_weight =
                row.edge_weight
                    .parse()
                    .ok_or_else(|| JobError::MalformedEdgeWeight {
                        row: i,
                        value: row.edge_weight.to_string(),
                    })?;
            Ok(ParsedRow {
                tf: parse_gene_token(&row.gene1)?,
                target: parse_gene_token(&row.gene2)?,
                edge_weight,
            })
        })
        .collect()
}

pub struct ResultReconciler<'a> {
    store: &'a dyn StudyStore,
    normalizer: &'a dyn NodeNormalizer,
}

impl<'a> ResultReconciler<'a> {
    pub fn new(store: &'a dyn StudyStore, normalizer: &'a dyn NodeNormalizer) -> Self {
        Self { store, normalizer }
    }

    /// Populates `study` from a `SUCCESS` report and persists it.
    ///
    /// Every row is parsed before anything is written, so a malformed token
    /// or weight leaves the store unchanged.
    pub async fn reconcile(
        &self,
        study: &mut InferenceStudy,
        report: &TaskStatusReport,
    ) -> Result<(), JobError> {
        let rows = match &report.task_result {
            TaskResult::Rows(rows) => rows,
            other => {
                return Err(JobError::UnexpectedResult(format!(
                    "expected result rows for study {}, got {:?}",
                    study.id, other
                )))
            }
        };

        let parsed = parse_rows(rows)?;
        let weights: Vec<f64> = parsed.iter().map(|row| row.edge_weight).collect();
        study.stats = edge_weight_stats(&weights);

        let curies: Vec<String> = parsed
            .iter()
            .flat_map(|row| [row.tf.base.clone(), row.target.base.clone()])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let normalized = if curies.is_empty() {
            NormalizationResponse::default()
        } else {
            self.normalizer.normalize(&curies).await?
        };
        tracing::debug!(
            study = %study.id,
            requested = curies.len(),
            returned = normalized.len(),
            "normalized result genes"
        );

        let mut genes: HashMap<GeneKey, GeneId> = HashMap::new();
        for row in &parsed {
            let tf = self.gene_id(&mut genes, &normalized, &row.tf).await?;
            let target = self.gene_id(&mut genes, &normalized, &row.target).await?;
            self.store
                .create_result(NewInferenceResult {
                    tf,
                    target,
                    edge_weight: row.edge_weight,
                    study_id: study.id.clone(),
                    user: study.user.clone(),
                })
                .await?;
        }

        study.status = report.status();
        study.message = None;
        self.store.save_study(study).await?;
        tracing::info!(
            study = %study.id,
            results = parsed.len(),
            genes = genes.len(),
            "reconciled study results"
        );
        Ok(())
    }

    async fn gene_id(
        &self,
        cache: &mut HashMap<GeneKey, GeneId>,
        normalized: &NormalizationResponse,
        token: &GeneToken,
    ) -> Result<GeneId, JobError> {
        let NormalizedGene {
            name,
            preferred_curie,
        } = normalized_gene(normalized, &token.base);
        let key = GeneKey {
            name,
            curie: token.base.clone(),
            variant: token.variant.clone(),
            preferred_curie,
        };
        if let Some(id) = cache.get(&key) {
            return Ok(id.clone());
        }
        let gene = resolve_gene(self.store, &key).await?;
        cache.insert(key, gene.record.id.clone());
        Ok(gene.record.id)
    }
}
