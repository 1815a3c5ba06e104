//! Per-item profit report. Computed on demand, never persisted.

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemStatistics {
    pub jan: String,
    pub name: String,
    /// Positive shelf price.
    pub selling_price: i64,
    /// Sum of `cost * quantity` over every restock receipt.
    pub total_acquisition_cost: i64,
    /// Sum of `divide * quantity` over every restock receipt.
    pub total_units_acquired: i64,
    /// `total_acquisition_cost / total_units_acquired`, or 0 without receipts.
    pub weighted_unit_cost: f64,
    /// Amount taken from accounts by active entries (positive).
    pub total_revenue: i64,
    pub total_units_sold: i64,
    pub profit: i64,
}

#[derive(Debug, Default)]
pub(crate) struct ItemTally {
    acquisition_cost: i64,
    units_acquired: i64,
    revenue: i64,
    units_sold: i64,
}

fn overflow(what: &str) -> EngineError {
    EngineError::InvalidData(format!("{what} is out of range"))
}

impl ItemTally {
    /// Adds one restock receipt.
    pub(crate) fn acquire(&mut self, cost: i64, units: i64) -> ResultEngine<()> {
        self.acquisition_cost = self
            .acquisition_cost
            .checked_add(cost)
            .ok_or_else(|| overflow("acquisition cost"))?;
        self.units_acquired = self
            .units_acquired
            .checked_add(units)
            .ok_or_else(|| overflow("acquired units"))?;
        Ok(())
    }

    /// Adds one active ledger entry; `amount` is the signed entry amount.
    pub(crate) fn sell(&mut self, amount: i64) -> ResultEngine<()> {
        self.revenue = self
            .revenue
            .checked_sub(amount)
            .ok_or_else(|| overflow("revenue"))?;
        self.units_sold += 1;
        Ok(())
    }

    /// `stored_price` is the catalog price as stored (negated shelf price).
    pub(crate) fn into_statistics(
        self,
        jan: String,
        name: String,
        stored_price: i64,
    ) -> ResultEngine<ItemStatistics> {
        let selling_price = stored_price
            .checked_neg()
            .ok_or_else(|| overflow("selling price"))?;
        let profit = self
            .revenue
            .checked_sub(self.acquisition_cost)
            .ok_or_else(|| overflow("profit"))?;
        let weighted_unit_cost = if self.units_acquired > 0 {
            self.acquisition_cost as f64 / self.units_acquired as f64
        } else {
            0.0
        };
        Ok(ItemStatistics {
            jan,
            name,
            selling_price,
            total_acquisition_cost: self.acquisition_cost,
            total_units_acquired: self.units_acquired,
            weighted_unit_cost,
            total_revenue: self.revenue,
            total_units_sold: self.units_sold,
            profit,
        })
    }
}
