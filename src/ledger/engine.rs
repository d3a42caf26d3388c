//! Path-addressed navigation and mutation over the ledger forest.
//!
//! Every mutation rebuilds the spine from the root to the target list and
//! recomputes derived totals on the way back up, so no ancestor subtotal ever
//! diverges from its children. Functions take the line list by value and
//! return a new one; nothing aliases the caller's tree.

use uuid::Uuid;

use crate::ledger::display::format_lsd;
use crate::ledger::item::{
    recompute_subtotal, sum_lines, Denomination, ExtendedItem, LedgerItem, LineItem, LsdStrings,
    SubtotalItem,
};

/// A list never shrinks below this many lines; removals that would are no-ops.
pub const MIN_LINES: usize = 2;

pub const ROOT_CRUMB_TITLE: &str = "Summa totalis";
pub const UNTITLED_CRUMB: &str = "Untitled";

/// Sequence of subtotal ids from the root to a nested list; empty means the
/// root list itself.
pub type IdPath = Vec<Uuid>;

/// Forest-wide total over the top-level lines.
#[derive(Debug, Clone, PartialEq)]
pub struct GrandTotal {
    pub total_pence: i64,
    pub total_display: LsdStrings,
    pub has_error: bool,
}

pub fn compute_grand_total(lines: &[LedgerItem]) -> GrandTotal {
    let (total_pence, has_error) = sum_lines(lines);
    GrandTotal {
        total_pence,
        total_display: format_lsd(total_pence),
        has_error,
    }
}

/// The whole forest plus its derived grand total.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub lines: Vec<LedgerItem>,
    pub total_pence: i64,
    pub total_display: LsdStrings,
    pub has_error: bool,
}

impl Calculation {
    /// A fresh calculation: two empty lines and a zero total.
    pub fn new() -> Self {
        Self::from_lines(vec![
            LedgerItem::Line(LineItem::empty()),
            LedgerItem::Line(LineItem::empty()),
        ])
    }

    pub fn from_lines(lines: Vec<LedgerItem>) -> Self {
        let totals = compute_grand_total(&lines);
        Self {
            lines,
            total_pence: totals.total_pence,
            total_display: totals.total_display,
            has_error: totals.has_error,
        }
    }
}

impl Default for Calculation {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks a path to its nested line list. Traversal stops at the first
/// segment that does not name a subtotal in the current list, returning the
/// deepest list reached; stale paths degrade gracefully instead of failing.
pub fn lines_at_path<'a>(lines: &'a [LedgerItem], path: &[Uuid]) -> &'a [LedgerItem] {
    let mut current = lines;
    for id in path {
        match current.iter().find(|item| item.id() == *id) {
            Some(LedgerItem::Subtotal(sub)) => current = &sub.lines,
            _ => break,
        }
    }
    current
}

/// Applies `apply` to the list addressed by `path`, rebuilding and
/// recomputing every subtotal along the spine. When the path head does not
/// name a subtotal the forest is returned unchanged.
pub fn update_lines_at_path<F>(lines: Vec<LedgerItem>, path: &[Uuid], apply: F) -> Vec<LedgerItem>
where
    F: FnOnce(Vec<LedgerItem>) -> Vec<LedgerItem>,
{
    let Some((head, rest)) = path.split_first() else {
        return apply(lines);
    };
    let mut apply = Some(apply);
    let mut out = Vec::with_capacity(lines.len());
    for item in lines {
        match item {
            LedgerItem::Subtotal(mut sub) if sub.id == *head => {
                // Ids are unique, so the closure fires at most once.
                if let Some(f) = apply.take() {
                    sub.lines = update_lines_at_path(std::mem::take(&mut sub.lines), rest, f);
                    out.push(LedgerItem::Subtotal(recompute_subtotal(sub)));
                } else {
                    out.push(LedgerItem::Subtotal(sub));
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// One entry of the navigation trail from the root to the current list.
#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    /// `None` for the synthetic root crumb.
    pub id: Option<Uuid>,
    pub title: String,
    pub path: IdPath,
}

/// Derives the crumb trail for a path. Always starts with the root crumb and
/// stops early the first time a segment fails to resolve to a subtotal.
pub fn breadcrumbs(lines: &[LedgerItem], path: &[Uuid]) -> Vec<Breadcrumb> {
    let mut crumbs = vec![Breadcrumb {
        id: None,
        title: ROOT_CRUMB_TITLE.into(),
        path: Vec::new(),
    }];
    let mut current = lines;
    let mut prefix = Vec::new();
    for id in path {
        let Some(LedgerItem::Subtotal(sub)) = current.iter().find(|item| item.id() == *id)
        else {
            break;
        };
        prefix.push(*id);
        crumbs.push(Breadcrumb {
            id: Some(*id),
            title: if sub.title.is_empty() {
                UNTITLED_CRUMB.into()
            } else {
                sub.title.clone()
            },
            path: prefix.clone(),
        });
        current = &sub.lines;
    }
    crumbs
}

/// Replaces one field literal on the matching line or extended item and
/// recomputes it. Subtotal items are never field-edited and pass through
/// untouched even when the id matches.
pub fn process_field_update(
    lines: Vec<LedgerItem>,
    id: Uuid,
    denomination: Denomination,
    value: &str,
) -> Vec<LedgerItem> {
    lines
        .into_iter()
        .map(|item| match item {
            LedgerItem::Line(line) if line.id == id => {
                LedgerItem::Line(line.with_field(denomination, value))
            }
            LedgerItem::Extended(ext) if ext.id == id => {
                LedgerItem::Extended(ext.with_field(denomination, value))
            }
            other => other,
        })
        .collect()
}

/// Replaces the quantity literal on the matching extended item.
pub fn process_quantity_update(lines: Vec<LedgerItem>, id: Uuid, value: &str) -> Vec<LedgerItem> {
    lines
        .into_iter()
        .map(|item| match item {
            LedgerItem::Extended(ext) if ext.id == id => {
                LedgerItem::Extended(ext.with_quantity(value))
            }
            other => other,
        })
        .collect()
}

/// Replaces the title of the matching item, whatever its variant.
pub fn update_title(lines: Vec<LedgerItem>, id: Uuid, title: &str) -> Vec<LedgerItem> {
    lines
        .into_iter()
        .map(|item| {
            if item.id() == id {
                item.with_title(title)
            } else {
                item
            }
        })
        .collect()
}

/// Removes the matching line, unless the list would drop below [`MIN_LINES`].
pub fn remove_line(lines: Vec<LedgerItem>, id: Uuid) -> Vec<LedgerItem> {
    if lines.len() <= MIN_LINES {
        return lines;
    }
    lines.into_iter().filter(|item| item.id() != id).collect()
}

/// Moves the matching line to `new_index`, clamped to the list bounds. A
/// missing id leaves the list unchanged.
pub fn move_line(mut lines: Vec<LedgerItem>, id: Uuid, new_index: usize) -> Vec<LedgerItem> {
    let Some(from) = lines.iter().position(|item| item.id() == id) else {
        return lines;
    };
    let item = lines.remove(from);
    let to = new_index.min(lines.len());
    lines.insert(to, item);
    lines
}

/// Two fresh empty lines, the reset state for any list.
pub fn fresh_lines() -> Vec<LedgerItem> {
    vec![
        LedgerItem::Line(LineItem::empty()),
        LedgerItem::Line(LineItem::empty()),
    ]
}

pub fn new_line() -> LedgerItem {
    LedgerItem::Line(LineItem::empty())
}

pub fn new_extended_item() -> LedgerItem {
    LedgerItem::Extended(ExtendedItem::empty())
}

pub fn new_subtotal_item() -> LedgerItem {
    LedgerItem::Subtotal(SubtotalItem::empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pence_line(value: &str) -> LedgerItem {
        LedgerItem::Line(LineItem::empty().with_field(Denomination::Pence, value))
    }

    #[test]
    fn fresh_calculation_has_two_lines_and_zero_total() {
        let calc = Calculation::new();
        assert_eq!(calc.lines.len(), 2);
        assert_eq!(calc.total_pence, 0);
        assert_eq!(calc.total_display, LsdStrings::new("0", "0", "0"));
        assert!(!calc.has_error);
    }

    #[test]
    fn grand_total_excludes_errored_lines() {
        let lines = vec![pence_line("iii"), pence_line("zz")];
        let totals = compute_grand_total(&lines);
        assert_eq!(totals.total_pence, 3);
        assert!(totals.has_error);
    }

    #[test]
    fn lines_at_path_resolves_nested_lists() {
        let inner = SubtotalItem::empty();
        let inner_id = inner.id;
        let inner_first = inner.lines[0].id();
        let outer = SubtotalItem::from_parts(
            Uuid::new_v4(),
            "Outer",
            vec![LedgerItem::Subtotal(inner), new_line()],
        );
        let outer_id = outer.id;
        let root = vec![LedgerItem::Subtotal(outer), new_line()];

        let resolved = lines_at_path(&root, &[outer_id, inner_id]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].id(), inner_first);
    }

    #[test]
    fn lines_at_path_degrades_on_stale_segment() {
        let root = fresh_lines();
        let resolved = lines_at_path(&root, &[Uuid::new_v4()]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].id(), root[0].id());
    }

    #[test]
    fn update_at_root_applies_directly() {
        let root = fresh_lines();
        let updated = update_lines_at_path(root, &[], |mut lines| {
            lines.push(new_line());
            lines
        });
        assert_eq!(updated.len(), 3);
    }

    #[test]
    fn update_recomputes_every_ancestor() {
        let sub = SubtotalItem::empty();
        let sub_id = sub.id;
        let target = sub.lines[0].id();
        let root = vec![LedgerItem::Subtotal(sub), new_line()];

        let updated = update_lines_at_path(root, &[sub_id], |lines| {
            process_field_update(lines, target, Denomination::Pence, "v")
        });
        let LedgerItem::Subtotal(updated_sub) = &updated[0] else {
            panic!("expected subtotal at index 0");
        };
        assert_eq!(updated_sub.total_pence, 5);
        assert_eq!(compute_grand_total(&updated).total_pence, 5);
    }

    #[test]
    fn update_with_stale_path_is_a_no_op() {
        let root = fresh_lines();
        let updated = update_lines_at_path(root, &[Uuid::new_v4()], |mut lines| {
            lines.push(new_line());
            lines
        });
        assert_eq!(updated.len(), 2);
    }

    #[test]
    fn breadcrumbs_start_with_the_root_crumb() {
        let root = fresh_lines();
        let crumbs = breadcrumbs(&root, &[]);
        assert_eq!(crumbs.len(), 1);
        assert_eq!(crumbs[0].title, ROOT_CRUMB_TITLE);
        assert_eq!(crumbs[0].id, None);
        assert!(crumbs[0].path.is_empty());
    }

    #[test]
    fn breadcrumbs_follow_nested_subtotals() {
        let inner = SubtotalItem::from_parts(Uuid::new_v4(), "Inner", fresh_lines());
        let inner_id = inner.id;
        let outer = SubtotalItem::from_parts(
            Uuid::new_v4(),
            "Outer",
            vec![LedgerItem::Subtotal(inner), new_line()],
        );
        let outer_id = outer.id;
        let root = vec![LedgerItem::Subtotal(outer), new_line()];

        let crumbs = breadcrumbs(&root, &[outer_id, inner_id]);
        assert_eq!(crumbs.len(), 3);
        assert_eq!(crumbs[1].title, "Outer");
        assert_eq!(crumbs[1].path, vec![outer_id]);
        assert_eq!(crumbs[2].title, "Inner");
        assert_eq!(crumbs[2].path, vec![outer_id, inner_id]);
    }

    #[test]
    fn breadcrumbs_use_placeholder_for_untitled_subtotals() {
        let sub = SubtotalItem::empty();
        let sub_id = sub.id;
        let root = vec![LedgerItem::Subtotal(sub)];
        let crumbs = breadcrumbs(&root, &[sub_id]);
        assert_eq!(crumbs[1].title, UNTITLED_CRUMB);
    }

    #[test]
    fn breadcrumbs_stop_at_non_subtotal_segments() {
        let root = fresh_lines();
        let line_id = root[0].id();
        let crumbs = breadcrumbs(&root, &[line_id, Uuid::new_v4()]);
        assert_eq!(crumbs.len(), 1);
    }

    #[test]
    fn field_update_skips_subtotal_items() {
        let sub = SubtotalItem::empty();
        let sub_id = sub.id;
        let root = vec![LedgerItem::Subtotal(sub.clone()), new_line()];
        let updated = process_field_update(root, sub_id, Denomination::Pence, "v");
        assert_eq!(updated[0], LedgerItem::Subtotal(sub));
    }

    #[test]
    fn title_update_reaches_every_variant() {
        let root = vec![new_line(), new_extended_item(), new_subtotal_item()];
        let mut lines = root;
        for index in 0..3 {
            let id = lines[index].id();
            lines = update_title(lines, id, "Named");
        }
        assert!(lines.iter().all(|item| item.title() == "Named"));
    }

    #[test]
    fn removal_is_refused_at_the_floor() {
        let root = fresh_lines();
        let id = root[0].id();
        let kept = remove_line(root, id);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn removal_above_the_floor_recomputes_totals() {
        let lines = vec![pence_line("iii"), pence_line("v"), new_line()];
        let id = lines[0].id();
        let remaining = remove_line(lines, id);
        assert_eq!(remaining.len(), 2);
        assert_eq!(compute_grand_total(&remaining).total_pence, 5);
    }

    #[test]
    fn move_reorders_within_the_list() {
        let lines = vec![pence_line("i"), pence_line("ij"), pence_line("iij")];
        let first = lines[0].id();
        let moved = move_line(lines, first, 2);
        assert_eq!(moved[2].id(), first);
        // Totals are order-independent.
        assert_eq!(compute_grand_total(&moved).total_pence, 6);
    }

    #[test]
    fn move_clamps_out_of_range_indexes() {
        let lines = vec![pence_line("i"), pence_line("ij")];
        let first = lines[0].id();
        let moved = move_line(lines, first, 99);
        assert_eq!(moved[1].id(), first);
    }
}
