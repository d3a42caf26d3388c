//! Ledger item model, tree engine, and the stateful calculation facade.

pub mod display;
pub mod engine;
pub mod item;
pub mod manager;

pub use display::{field_working, format_lsd, FieldWorking};
pub use engine::{
    breadcrumbs, compute_grand_total, lines_at_path, move_line, process_field_update,
    process_quantity_update, remove_line, update_lines_at_path, update_title, Breadcrumb,
    Calculation, GrandTotal, IdPath, MIN_LINES, ROOT_CRUMB_TITLE, UNTITLED_CRUMB,
};
pub use item::{
    compute_extended_total, compute_field_total, recompute_subtotal, Denomination, ExtendedItem,
    ExtendedTotal, FieldTotal, LedgerItem, LineItem, LsdFlags, LsdStrings, SubtotalItem,
};
pub use manager::CalculationManager;
