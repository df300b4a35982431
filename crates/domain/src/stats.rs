use serde::{Deserialize, Serialize};

use crate::field::FieldDescription;

/// Read-only statistics over the leaves of a field tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormStats {
    /// Number of input controls.
    pub total: usize,
    /// Controls declaring `required`.
    pub required: usize,
    /// Controls not declaring `required`.
    pub optional: usize,
    /// Distinct control types in first-seen order.
    pub types: Vec<String>,
}

impl FormStats {
    /// Computes statistics over every leaf of `fields`.
    #[must_use]
    pub fn from_fields(fields: &[FieldDescription]) -> Self {
        let leaves = leaf_fields(fields);
        let required = leaves.iter().filter(|field| field.is_required()).count();

        let mut types: Vec<String> = Vec::new();
        for field_type in leaves.iter().filter_map(|field| field.field_type.as_deref()) {
            if !types.iter().any(|known| known == field_type) {
                types.push(field_type.to_owned());
            }
        }

        Self {
            total: leaves.len(),
            required,
            optional: leaves.len() - required,
            types,
        }
    }
}

/// Returns every leaf of the tree in depth-first order.
///
/// Nodes with children are descended into even when they carry a key; only
/// childless keyed nodes are leaves.
#[must_use]
pub fn leaf_fields(fields: &[FieldDescription]) -> Vec<&FieldDescription> {
    let mut leaves = Vec::new();
    collect_leaves(fields, &mut leaves);
    leaves
}

/// Returns the number of leaves in the tree.
#[must_use]
pub fn count_leaf_fields(fields: &[FieldDescription]) -> usize {
    fields
        .iter()
        .map(|field| {
            if field.is_group() {
                count_leaf_fields(&field.field_group)
            } else {
                usize::from(field.key().is_some())
            }
        })
        .sum()
}

fn collect_leaves<'a>(fields: &'a [FieldDescription], leaves: &mut Vec<&'a FieldDescription>) {
    for field in fields {
        if field.is_group() {
            collect_leaves(&field.field_group, leaves);
        } else if field.key().is_some() {
            leaves.push(field);
        }
    }
}
