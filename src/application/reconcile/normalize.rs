use crate::remote::{NormalizationResponse, NormalizedNode};

/// Display name given to genes the normalizer could not resolve.
pub const NOT_FOUND_LABEL: &str = "Not found in SRI Node Normalizer.";

const PREFERRED_NAMESPACE: &str = "ENSEMBL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedGene {
    pub name: String,
    pub preferred_curie: Option<String>,
}

impl NormalizedGene {
    fn not_found() -> Self {
        Self {
            name: NOT_FOUND_LABEL.to_string(),
            preferred_curie: None,
        }
    }
}

/// First equivalent identifier in the ENSEMBL namespace.
pub fn preferred_curie(node: &NormalizedNode) -> Option<String> {
    node.equivalent_identifiers
        .iter()
        .find(|eq| eq.identifier.contains(PREFERRED_NAMESPACE))
        .map(|eq| eq.identifier.clone())
}

pub fn normalized_gene(response: &NormalizationResponse, curie: &str) -> NormalizedGene {
    match response.lookup(curie) {
        Some(node) => NormalizedGene {
            preferred_curie: preferred_curie(&node),
            name: node.id.label,
        },
        None => {
            tracing::debug!(curie, "normalizer returned no usable entry");
            NormalizedGene::not_found()
        }
    }
}
