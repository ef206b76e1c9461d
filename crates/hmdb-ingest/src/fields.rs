//! Node and edge types, and the attribute fields each one exposes
//!
//! Field selections in [`AdapterConfig`](crate::config::AdapterConfig) are
//! expressed with these enums; `None` in the configuration means "all".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Header label of the metabolite primary id column
pub const METABOLITE_ID_COLUMN: &str = "metaboliteHmdbId:ID(Metabolite-ID)";

/// Header label of the protein primary id column
pub const PROTEIN_ID_COLUMN: &str = "proteinHmdbId:ID(Hmdb-ID)";

/// Header label of the edge source column
pub const EDGE_SOURCE_COLUMN: &str = "metaboliteHmdbId:START_ID(Metabolite-ID)";

/// Header label of the edge target column
pub const EDGE_TARGET_COLUMN: &str = "proteinHmdbId:END_ID(Protein-ID)";

macro_rules! field_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $key:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in output order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($key => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }
    };
}

field_enum! {
    /// Node types produced by the adapter
    NodeType {
        Metabolite => "metabolite",
        Protein => "protein",
    }
}

field_enum! {
    /// Attributes available on metabolite nodes
    MetaboliteField {
        Name => "name",
        KeggId => "kegg_id",
        ChebiId => "chebi_id",
        PubchemCompoundId => "pubchem_compound_id",
        Inchi => "inchi",
        ProteinAccession => "protein_accession",
        Pathways => "pathways",
    }
}

field_enum! {
    /// Attributes available on protein nodes
    ProteinField {
        Metabolites => "metabolites",
        Pathways => "pathways",
    }
}

field_enum! {
    /// Edge types produced by the adapter
    EdgeType {
        MetaboliteToProtein => "metabolite_to_protein",
    }
}

field_enum! {
    /// Attributes available on reaction edges
    EdgeField {
        Status => "status",
        ReactionId => "reaction_id",
    }
}

/// Whether `item` is part of an optional selection (`None` selects all)
pub fn is_selected<T: PartialEq>(selection: Option<&[T]>, item: &T) -> bool {
    selection.is_none_or(|items| items.contains(item))
}
