//! Name and type normalization.
//!
//! Turns raw schema identifiers into the public Go names the generated module
//! exposes, keeping the original spelling around as the runtime lookup key so
//! that renaming never changes what is read from the environment.
//! Pure and order-preserving; never fails. Degenerate inputs (empty names,
//! separator-only names) pass through as empty identifiers.

use crate::model::Variable;

/// Normalize every variable, preserving input order: capture `raw_name`,
/// PascalCase the public identifier, hoist a trailing `[]` marker to the
/// front of the type expression.
pub fn normalize_variables(variables: Vec<Variable>) -> Vec<Variable> {
    variables
        .into_iter()
        .map(|mut variable| {
            variable.raw_name = variable.name.clone();
            variable.name = public_identifier(&variable.name);
            variable.ty = hoist_array_marker(&variable.ty);
            variable
        })
        .collect()
}

/// `max_retry_count` → `MaxRetryCount`: split on `_`, title-case each segment,
/// concatenate with no separator. ASCII-only, locale-independent.
pub fn public_identifier(name: &str) -> String {
    name.split('_').map(title_case_segment).collect()
}

fn title_case_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            let mut out = String::with_capacity(segment.len());
            out.push(first.to_ascii_uppercase());
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
            out
        }
    }
}

/// `string[]` → `[]string`. Go has no trailing array marker, so a `[]` suffix
/// moves to the front of the base type; the FIRST occurrence is the one
/// relocated (`int[][]` → `[]int[]`). Marker-free types pass through.
pub fn hoist_array_marker(ty: &str) -> String {
    if !ty.ends_with("[]") {
        return ty.to_string();
    }
    match ty.split_once("[]") {
        Some((before, after)) => format!("[]{before}{after}"),
        None => ty.to_string(),
    }
}

// ------------------------------- Tests ------------------------------------ //
