use serde::{Deserialize, Serialize};

use super::ids::GeneId;

/// A normalized gene record. All four descriptive fields take part in its
/// identity, so two variants of one base gene are separate records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub id: GeneId,
    pub name: String,
    pub curie: String,
    pub variant: Option<String>,
    pub preferred_curie: Option<String>,
}

impl Gene {
    pub fn key(&self) -> GeneKey {
        GeneKey {
            name: self.name.clone(),
            curie: self.curie.clone(),
            variant: self.variant.clone(),
            preferred_curie: self.preferred_curie.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneKey {
    pub name: String,
    pub curie: String,
    pub variant: Option<String>,
    pub preferred_curie: Option<String>,
}

/// A gene token from a result table, e.g. `BRCA1` or `BRCA1(c.123A>G)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneToken {
    pub base: String,
    pub variant: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GeneTokenError {
    #[error("variant annotation is missing its closing parenthesis: {0}")]
    UnclosedVariant(String),
    #[error("gene token has an empty base identifier: {0:?}")]
    EmptyBase(String),
}

/// Splits a gene token on its first `(` into a base identifier and an
/// optional variant annotation. The token is taken verbatim; surrounding
/// whitespace is part of the base.
pub fn parse_gene_token(token: &str) -> Result<GeneToken, GeneTokenError> {
    let (base, variant) = match token.split_once('(') {
        None => (token, None),
        Some((base, rest)) => {
            let variant = rest
                .strip_suffix(')')
                .ok_or_else(|| GeneTokenError::UnclosedVariant(token.to_string()))?;
            (base, Some(variant.to_string()))
        }
    };

    if base.is_empty() {
        return Err(GeneTokenError::EmptyBase(token.to_string()));
    }

    Ok(GeneToken {
        base: base.to_string(),
        variant,
    })
}
