//! Gene Set Model
//!
//! An identifier plus an ordered, deduplicated collection of gene symbols.
//! Raw input strings arrive with mixed separators (`/`, spaces, commas); they
//! are normalized once at construction and the set is immutable afterwards.

use serde::{Deserialize, Serialize};

/// A named, normalized collection of gene symbols.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneSet {
    id: String,
    genes: Vec<String>,
}

impl GeneSet {
    /// Build a gene set from an identifier and a raw gene string.
    ///
    /// Separators `/`, space, and comma are all treated as delimiters,
    /// empty fragments are dropped, and duplicate symbols keep their
    /// first position.
    pub fn new(id: impl Into<String>, raw_genes: &str) -> Self {
        let mut genes: Vec<String> = Vec::new();
        for fragment in raw_genes.split(|c| c == '/' || c == ' ' || c == ',') {
            let symbol = fragment.trim();
            if symbol.is_empty() {
                continue;
            }
            if !genes.iter().any(|g| g == symbol) {
                genes.push(symbol.to_string());
            }
        }
        Self {
            id: id.into(),
            genes,
        }
    }

    /// The gene set identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The normalized gene symbols in input order.
    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    /// Comma-joined form used in prompts and tool parameters.
    pub fn joined(&self) -> String {
        self.genes.join(",")
    }

    /// Number of distinct genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the set contains no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_and_space_separators() {
        let set = GeneSet::new("GS1", "TP53/BRCA1 EGFR");
        assert_eq!(set.genes(), &["TP53", "BRCA1", "EGFR"]);
        assert_eq!(set.joined(), "TP53,BRCA1,EGFR");
    }

    #[test]
    fn test_consecutive_separators_collapse() {
        let set = GeneSet::new("GS2", "TP53/ BRCA1,,EGFR");
        assert_eq!(set.genes(), &["TP53", "BRCA1", "EGFR"]);
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let set = GeneSet::new("GS3", "TP53,BRCA1,TP53,EGFR,BRCA1");
        assert_eq!(set.genes(), &["TP53", "BRCA1", "EGFR"]);
    }

    #[test]
    fn test_empty_input() {
        let set = GeneSet::new("GS4", "");
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.joined(), "");
    }

    #[test]
    fn test_identifier_preserved() {
        let set = GeneSet::new("HALLMARK_APOPTOSIS", "CASP3 CASP8");
        assert_eq!(set.id(), "HALLMARK_APOPTOSIS");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_serialization_round_trip() {
        let set = GeneSet::new("GS5", "TP53 MDM2");
        let json = serde_json::to_string(&set).unwrap();
        let parsed: GeneSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, set);
    }
}
