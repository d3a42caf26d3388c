//! Facade that coordinates a calculation and the caller's current position
//! within it. Every edit is routed through the current path, so derived
//! totals stay consistent at all ancestor levels after each operation.

use tracing::debug;
use uuid::Uuid;

use crate::ledger::engine::{
    self, breadcrumbs, fresh_lines, lines_at_path, update_lines_at_path, Breadcrumb, Calculation,
    IdPath,
};
use crate::ledger::item::{Denomination, LedgerItem};

#[derive(Debug, Clone, Default)]
pub struct CalculationManager {
    calculation: Calculation,
    path: IdPath,
}

impl CalculationManager {
    pub fn new() -> Self {
        Self {
            calculation: Calculation::new(),
            path: Vec::new(),
        }
    }

    pub fn calculation(&self) -> &Calculation {
        &self.calculation
    }

    pub fn path(&self) -> &[Uuid] {
        &self.path
    }

    /// The line list at the current position, degrading on stale paths.
    pub fn current_lines(&self) -> &[LedgerItem] {
        lines_at_path(&self.calculation.lines, &self.path)
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        breadcrumbs(&self.calculation.lines, &self.path)
    }

    /// Descends into a subtotal of the current list. Returns false without
    /// moving when the id does not name a subtotal here.
    pub fn enter(&mut self, id: Uuid) -> bool {
        let is_subtotal = self
            .current_lines()
            .iter()
            .any(|item| matches!(item, LedgerItem::Subtotal(sub) if sub.id == id));
        if is_subtotal {
            self.path.push(id);
        }
        is_subtotal
    }

    /// Jumps to an arbitrary path, typically taken from a breadcrumb.
    pub fn navigate(&mut self, path: IdPath) {
        self.path = path;
    }

    /// Ascends one level; a no-op at the root.
    pub fn ascend(&mut self) {
        self.path.pop();
    }

    fn apply<F>(&mut self, apply: F)
    where
        F: FnOnce(Vec<LedgerItem>) -> Vec<LedgerItem>,
    {
        let lines = std::mem::take(&mut self.calculation.lines);
        let lines = update_lines_at_path(lines, &self.path, apply);
        self.calculation = Calculation::from_lines(lines);
    }

    pub fn add_line(&mut self) {
        self.apply(|mut lines| {
            lines.push(engine::new_line());
            lines
        });
    }

    pub fn add_extended_item(&mut self) {
        self.apply(|mut lines| {
            lines.push(engine::new_extended_item());
            lines
        });
    }

    pub fn add_subtotal_item(&mut self) {
        self.apply(|mut lines| {
            lines.push(engine::new_subtotal_item());
            lines
        });
    }

    pub fn remove_line(&mut self, id: Uuid) {
        self.apply(|lines| engine::remove_line(lines, id));
    }

    pub fn move_line(&mut self, id: Uuid, new_index: usize) {
        self.apply(|lines| engine::move_line(lines, id, new_index));
    }

    pub fn update_field(&mut self, id: Uuid, denomination: Denomination, value: &str) {
        self.apply(|lines| engine::process_field_update(lines, id, denomination, value));
    }

    pub fn update_quantity(&mut self, id: Uuid, value: &str) {
        self.apply(|lines| engine::process_quantity_update(lines, id, value));
    }

    pub fn update_title(&mut self, id: Uuid, title: &str) {
        self.apply(|lines| engine::update_title(lines, id, title));
    }

    /// At the root, resets the whole calculation to two empty lines. Inside a
    /// subtotal, resets only that subtotal's children and leaves the rest of
    /// the forest untouched.
    pub fn clear(&mut self) {
        if self.path.is_empty() {
            debug!("clearing calculation at root");
            self.calculation = Calculation::new();
        } else {
            debug!(depth = self.path.len(), "clearing nested subtotal");
            self.apply(|_| fresh_lines());
        }
    }

    /// Replaces the calculation wholesale, e.g. after a successful load, and
    /// returns the view to the root.
    pub fn replace(&mut self, calculation: Calculation) {
        self.calculation = calculation;
        self.path.clear();
    }
}
