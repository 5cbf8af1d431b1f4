//! Stock enemy templates.
//!
//! Campaign content normally supplies its own templates; these cover
//! missions (and the headless runner) that ship without a template file.

use cyberops_core::mission::{EnemyTemplate, EnemyTemplates};

/// Names of the stock templates, in a stable order.
pub const BUILTIN_KINDS: [&str; 4] = ["guard", "soldier", "heavy", "sniper"];

/// Look up a stock template by type name.
pub fn builtin(kind: &str) -> Option<EnemyTemplate> {
    let (health, speed, damage, vision_range, accuracy, color) = match kind {
        "guard" => (50, 2.0, 10, 5.0, 0.6, "#c0392b"),
        "soldier" => (80, 3.0, 15, 7.0, 0.7, "#e67e22"),
        "heavy" => (150, 1.5, 25, 6.0, 0.6, "#8e44ad"),
        // Long sight line, shots still capped by the fire range.
        "sniper" => (60, 2.0, 40, 12.0, 0.9, "#16a085"),
        _ => return None,
    };
    Some(EnemyTemplate {
        kind: kind.to_string(),
        health,
        speed,
        damage,
        vision_range,
        color: color.to_string(),
        accuracy,
    })
}

/// Every stock template keyed by type name.
pub fn builtin_templates() -> EnemyTemplates {
    BUILTIN_KINDS
        .iter()
        .copied()
        .filter_map(builtin)
        .map(|t| (t.kind.clone(), t))
        .collect()
}
