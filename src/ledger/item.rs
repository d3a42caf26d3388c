//! The three ledger item variants and their recomputation rules.
//!
//! Invalid numeral input is a first-class state, not an error channel: a bad
//! literal flags the item and makes it contribute zero to every total above
//! it, and is corrected by re-editing the same field.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::{PENCE_PER_POUND, PENCE_PER_SHILLING};
use crate::ledger::display::format_lsd;
use crate::numeral;

/// One string per denomination, used both for user-authored literals and for
/// rendered total displays.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LsdStrings {
    pub l: String,
    pub s: String,
    pub d: String,
}

impl LsdStrings {
    pub fn new(l: impl Into<String>, s: impl Into<String>, d: impl Into<String>) -> Self {
        Self {
            l: l.into(),
            s: s.into(),
            d: d.into(),
        }
    }
}

/// Per-denomination validity flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LsdFlags {
    pub l: bool,
    pub s: bool,
    pub d: bool,
}

impl LsdFlags {
    pub fn any(&self) -> bool {
        self.l || self.s || self.d
    }
}

/// The three denominations of an l/s/d sum, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denomination {
    Pounds,
    Shillings,
    Pence,
}

impl Denomination {
    pub const ALL: [Denomination; 3] = [
        Denomination::Pounds,
        Denomination::Shillings,
        Denomination::Pence,
    ];

    /// Pence per unit of this denomination.
    pub fn multiplier(self) -> i64 {
        match self {
            Denomination::Pounds => PENCE_PER_POUND,
            Denomination::Shillings => PENCE_PER_SHILLING,
            Denomination::Pence => 1,
        }
    }

    pub fn of<'a>(self, strings: &'a LsdStrings) -> &'a str {
        match self {
            Denomination::Pounds => &strings.l,
            Denomination::Shillings => &strings.s,
            Denomination::Pence => &strings.d,
        }
    }

    fn of_mut(self, strings: &mut LsdStrings) -> &mut String {
        match self {
            Denomination::Pounds => &mut strings.l,
            Denomination::Shillings => &mut strings.s,
            Denomination::Pence => &mut strings.d,
        }
    }

    fn flag_mut(self, flags: &mut LsdFlags) -> &mut bool {
        match self {
            Denomination::Pounds => &mut flags.l,
            Denomination::Shillings => &mut flags.s,
            Denomination::Pence => &mut flags.d,
        }
    }
}

/// A plain line: three numeral literals summed into pence.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub id: Uuid,
    pub title: String,
    pub literals: LsdStrings,
    pub error: bool,
    pub field_errors: LsdFlags,
    pub total_pence: i64,
}

/// A quantity-multiplied line: a unit cost in numeral literals times a
/// numeral quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedItem {
    pub id: Uuid,
    pub title: String,
    pub literals: LsdStrings,
    pub quantity: String,
    pub error: bool,
    pub field_errors: LsdFlags,
    pub quantity_error: bool,
    pub base_pence: i64,
    pub total_pence: i64,
}

/// A nested sub-calculation with its own child list and running total.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtotalItem {
    pub id: Uuid,
    pub title: String,
    pub lines: Vec<LedgerItem>,
    pub error: bool,
    pub total_pence: i64,
    pub total_display: LsdStrings,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerItem {
    Line(LineItem),
    Extended(ExtendedItem),
    Subtotal(SubtotalItem),
}

impl LedgerItem {
    pub fn id(&self) -> Uuid {
        match self {
            LedgerItem::Line(item) => item.id,
            LedgerItem::Extended(item) => item.id,
            LedgerItem::Subtotal(item) => item.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            LedgerItem::Line(item) => &item.title,
            LedgerItem::Extended(item) => &item.title,
            LedgerItem::Subtotal(item) => &item.title,
        }
    }

    pub fn error(&self) -> bool {
        match self {
            LedgerItem::Line(item) => item.error,
            LedgerItem::Extended(item) => item.error,
            LedgerItem::Subtotal(item) => item.error,
        }
    }

    pub fn total_pence(&self) -> i64 {
        match self {
            LedgerItem::Line(item) => item.total_pence,
            LedgerItem::Extended(item) => item.total_pence,
            LedgerItem::Subtotal(item) => item.total_pence,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        match &mut self {
            LedgerItem::Line(item) => item.title = title,
            LedgerItem::Extended(item) => item.title = title,
            LedgerItem::Subtotal(item) => item.title = title,
        }
        self
    }
}

/// Result of summing the three literal fields of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTotal {
    pub total_pence: i64,
    pub error: bool,
    pub field_errors: LsdFlags,
}

/// Sums the three literals in denomination order. An empty literal
/// contributes zero without error; an invalid one flags its field. When any
/// field is flagged the total is zero, never a partial sum.
pub fn compute_field_total(literals: &LsdStrings) -> FieldTotal {
    let mut field_errors = LsdFlags::default();
    let mut sum = 0;
    for denomination in Denomination::ALL {
        let literal = denomination.of(literals);
        if literal.is_empty() {
            continue;
        }
        let normalized = numeral::normalize_input(literal);
        if numeral::is_valid(&normalized) {
            sum += numeral::to_integer(&normalized) * denomination.multiplier();
        } else {
            *denomination.flag_mut(&mut field_errors) = true;
        }
    }
    let error = field_errors.any();
    FieldTotal {
        total_pence: if error { 0 } else { sum },
        error,
        field_errors,
    }
}

/// Result of combining a unit cost with a quantity literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedTotal {
    pub base_pence: i64,
    pub total_pence: i64,
    pub error: bool,
    pub field_errors: LsdFlags,
    pub quantity_error: bool,
}

/// Computes unit cost × quantity. The quantity is invalid when empty or not
/// a well-formed numeral. An errored unit cost reports `base_pence` of zero
/// so a partially-entered item never shows a misleading cost.
pub fn compute_extended_total(literals: &LsdStrings, quantity: &str) -> ExtendedTotal {
    let base = compute_field_total(literals);
    let normalized = numeral::normalize_input(quantity);
    let quantity_error = quantity.is_empty() || !numeral::is_valid(&normalized);
    let error = base.error || quantity_error;
    let total_pence = if error {
        0
    } else {
        base.total_pence * numeral::to_integer(&normalized)
    };
    ExtendedTotal {
        base_pence: base.total_pence,
        total_pence,
        error,
        field_errors: base.field_errors,
        quantity_error,
    }
}

/// Sums the contributions of a child list: total over non-error children,
/// plus whether any child is in error.
pub(crate) fn sum_lines(lines: &[LedgerItem]) -> (i64, bool) {
    let total = lines
        .iter()
        .filter(|item| !item.error())
        .map(LedgerItem::total_pence)
        .sum();
    let has_error = lines.iter().any(LedgerItem::error);
    (total, has_error)
}

/// Recomputes a subtotal's derived fields from its children. Idempotent;
/// invoked bottom-up after any change beneath the item. An errored child is
/// excluded from the sum but still forces the subtotal's own error flag.
pub fn recompute_subtotal(mut item: SubtotalItem) -> SubtotalItem {
    let (total_pence, has_error) = sum_lines(&item.lines);
    item.total_pence = total_pence;
    item.error = has_error;
    item.total_display = format_lsd(total_pence);
    item
}

impl LineItem {
    /// Builds a line from user-authored fields, recomputing all derived state.
    pub fn from_parts(id: Uuid, title: impl Into<String>, literals: LsdStrings) -> Self {
        let computed = compute_field_total(&literals);
        Self {
            id,
            title: title.into(),
            literals,
            error: computed.error,
            field_errors: computed.field_errors,
            total_pence: computed.total_pence,
        }
    }

    pub fn empty() -> Self {
        Self::from_parts(Uuid::new_v4(), "", LsdStrings::default())
    }

    pub fn with_field(self, denomination: Denomination, value: impl Into<String>) -> Self {
        let mut literals = self.literals;
        *denomination.of_mut(&mut literals) = value.into();
        Self::from_parts(self.id, self.title, literals)
    }
}

impl ExtendedItem {
    pub fn from_parts(
        id: Uuid,
        title: impl Into<String>,
        literals: LsdStrings,
        quantity: impl Into<String>,
    ) -> Self {
        let quantity = quantity.into();
        let computed = compute_extended_total(&literals, &quantity);
        Self {
            id,
            title: title.into(),
            literals,
            quantity,
            error: computed.error,
            field_errors: computed.field_errors,
            quantity_error: computed.quantity_error,
            base_pence: computed.base_pence,
            total_pence: computed.total_pence,
        }
    }

    /// A fresh item defaults its quantity to the early modern one (`j`) so it
    /// starts error-free.
    pub fn empty() -> Self {
        Self::from_parts(Uuid::new_v4(), "", LsdStrings::default(), "j")
    }

    pub fn with_field(self, denomination: Denomination, value: impl Into<String>) -> Self {
        let mut literals = self.literals;
        *denomination.of_mut(&mut literals) = value.into();
        Self::from_parts(self.id, self.title, literals, self.quantity)
    }

    pub fn with_quantity(self, quantity: impl Into<String>) -> Self {
        Self::from_parts(self.id, self.title, self.literals, quantity)
    }
}

impl SubtotalItem {
    pub fn from_parts(id: Uuid, title: impl Into<String>, lines: Vec<LedgerItem>) -> Self {
        recompute_subtotal(Self {
            id,
            title: title.into(),
            lines,
            error: false,
            total_pence: 0,
            total_display: format_lsd(0),
        })
    }

    /// A fresh subtotal starts with exactly two empty lines and a zero total.
    pub fn empty() -> Self {
        Self::from_parts(
            Uuid::new_v4(),
            "",
            vec![
                LedgerItem::Line(LineItem::empty()),
                LedgerItem::Line(LineItem::empty()),
            ],
        )
    }
}
