//! Reaction data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of the reaction equation a metabolite appears on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionRole {
    Reactant,
    Product,
}

impl ReactionRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ReactionRole::Reactant => "reactant",
            ReactionRole::Product => "product",
        }
    }
}

impl fmt::Display for ReactionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes carried by every reaction edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionAttributes {
    /// Reaction status as printed on the page (e.g., "Predicted")
    pub status: String,
    /// Numeric id of the reaction page
    pub reaction_id: u32,
}

/// A metabolite taking part in an enzyme-catalysed reaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEdge {
    pub metabolite_id: String,
    pub enzyme_id: String,
    pub role: ReactionRole,
    pub attributes: ReactionAttributes,
}

/// Fields read from the reaction panel of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionPage {
    /// Metabolite ids in link order
    pub metabolite_ids: Vec<String>,
    pub status: String,
    pub enzyme_id: String,
    /// Equation text, e.g. "Histamine + S-Adenosylmethionine = ..."
    pub equation: String,
}
