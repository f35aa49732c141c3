//! Distilled views over UniProtKB JSON entries.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A compact summary of one UniProtKB entry
///
/// Extracted from the full JSON entry returned by the REST API; used by the
/// search tool to keep conversational answers short.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProteinSummary {
    /// Primary accession (e.g., "P01308")
    pub accession: String,

    /// Recommended protein name
    pub protein_name: String,

    /// Gene names, comma-joined
    pub gene_names: String,

    /// Organism scientific name
    pub organism: String,
}

impl ProteinSummary {
    /// Extract a summary from a full UniProtKB JSON entry
    ///
    /// Missing fields become "N/A" rather than failing; entries vary widely
    /// in which sections they carry.
    pub fn from_entry(entry: &Value) -> Self {
        let accession = entry
            .get("primaryAccession")
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_string();

        let protein_name = entry
            .pointer("/proteinDescription/recommendedName/fullName/value")
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_string();

        let gene_names = entry
            .get("genes")
            .and_then(Value::as_array)
            .map(|genes| {
                genes
                    .iter()
                    .filter_map(|gene| gene.pointer("/geneName/value").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        let organism = entry
            .pointer("/organism/scientificName")
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_string();

        Self {
            accession,
            protein_name,
            gene_names,
            organism,
        }
    }
}

impl std::fmt::Display for ProteinSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Protein: {}, Gene(s): {}, Organism: {} [{}]",
            self.protein_name, self.gene_names, self.organism, self.accession
        )
    }
}
