//! Dataset Input
//!
//! Loads gene sets from a CSV file with `ID` and `Genes` header columns.
//! Rows are normalized into `GeneSet` values in file order; a blank gene
//! cell becomes an empty gene set rather than an error.

use std::path::Path;

use serde::Deserialize;

use gene_agent_core::GeneSet;

use crate::utils::error::AppResult;

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Genes", default)]
    genes: String,
}

/// Load an ordered list of gene sets from a CSV dataset.
pub fn load_gene_sets(path: &Path) -> AppResult<Vec<GeneSet>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut sets = Vec::new();
    for row in reader.deserialize::<Row>() {
        let row = row?;
        sets.push(GeneSet::new(row.id, &row.genes));
    }
    tracing::info!(count = sets.len(), path = %path.display(), "loaded gene sets");
    Ok(sets)
}
