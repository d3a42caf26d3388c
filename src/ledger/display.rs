//! Rendering helpers for totals and per-field working rows.

use crate::currency::{PENCE_PER_POUND, PENCE_PER_SHILLING};
use crate::ledger::item::{Denomination, LsdStrings};
use crate::numeral;

/// Renders a non-negative pence total as three early modern components, with
/// `"0"` standing in for an empty denomination. Totals are non-negative by
/// construction, so decomposition here cannot fail.
pub fn format_lsd(total_pence: i64) -> LsdStrings {
    let l = total_pence / PENCE_PER_POUND;
    let remainder = total_pence % PENCE_PER_POUND;
    LsdStrings {
        l: numeral::format_component(l),
        s: numeral::format_component(remainder / PENCE_PER_SHILLING),
        d: numeral::format_component(remainder % PENCE_PER_SHILLING),
    }
}

/// One step of the "show working" row under a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWorking {
    /// Multiplication prefix, e.g. `"5 × 12 = "`; empty for the pence field.
    pub prefix: String,
    pub pence: i64,
}

/// Explains how one literal contributes to a line's pence total. Returns
/// `None` for empty or invalid input, which has no working to show.
pub fn field_working(literal: &str, denomination: Denomination) -> Option<FieldWorking> {
    if literal.is_empty() {
        return None;
    }
    let normalized = numeral::normalize_input(literal);
    if !numeral::is_valid(&normalized) {
        return None;
    }
    let value = numeral::to_integer(&normalized);
    let multiplier = denomination.multiplier();
    let prefix = if multiplier == 1 {
        String::new()
    } else {
        format!("{value} × {multiplier} = ")
    };
    Some(FieldWorking {
        prefix,
        pence: value * multiplier,
    })
}
