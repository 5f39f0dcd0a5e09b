//! Inventory partition
//!
//! Splits an aggregation into what the user already has and what they
//! still need to buy.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::aggregate::Aggregation;
use crate::units::commensurable;

/// How much of an ingredient a user has on hand, in base unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLevel {
    pub quantity: f64,
    pub unit: String,
}

/// One row of a shopping plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanLine {
    pub ingredient_id: i64,
    pub name: String,
    pub aisle: String,
    pub unit: String,
    pub needed: f64,
    pub on_hand: f64,
    pub to_buy: f64,
    pub unit_conflict: bool,
}

/// Aggregated ingredients split by availability
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoppingPlan {
    pub in_inventory: Vec<PlanLine>,
    pub missing: Vec<PlanLine>,
}

impl ShoppingPlan {
    pub fn is_fully_stocked(&self) -> bool {
        self.missing.is_empty()
    }

    /// All lines, in-stock first
    pub fn lines(&self) -> impl Iterator<Item = &PlanLine> {
        self.in_inventory.iter().chain(self.missing.iter())
    }
}

/// Partition aggregated ingredients against a user's stock
///
/// Stock only counts when it is recorded in the same unit as the need, where
/// `oz`/`ounce`/`ounces` and `tsp`/`teaspoon`/`teaspoons` are one unit each.
/// Stock in any other unit is treated as absent.
pub fn plan_shopping(aggregation: &Aggregation, inventory: &HashMap<i64, StockLevel>) -> ShoppingPlan {
    let mut plan = ShoppingPlan::default();

    for (&ingredient_id, needed) in aggregation {
        let on_hand = inventory
            .get(&ingredient_id)
            .filter(|stock| commensurable(&stock.unit, &needed.unit))
            .map(|stock| stock.quantity.max(0.0))
            .unwrap_or(0.0);

        let to_buy = (needed.quantity - on_hand).max(0.0);

        let line = PlanLine {
            ingredient_id,
            name: needed.name.clone(),
            aisle: needed.aisle.clone(),
            unit: needed.unit.clone(),
            needed: needed.quantity,
            on_hand,
            to_buy,
            unit_conflict: needed.unit_conflict,
        };

        if to_buy > 0.0 {
            plan.missing.push(line);
        } else {
            plan.in_inventory.push(line);
        }
    }

    let by_aisle = |a: &PlanLine, b: &PlanLine| a.aisle.cmp(&b.aisle).then_with(|| a.name.cmp(&b.name));
    plan.in_inventory.sort_by(by_aisle);
    plan.missing.sort_by(by_aisle);

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopping::aggregate::AggregatedIngredient;

    fn need(quantity: f64, unit: &str, name: &str, aisle: &str) -> AggregatedIngredient {
        AggregatedIngredient {
            quantity,
            unit: unit.to_string(),
            name: name.to_string(),
            aisle: aisle.to_string(),
            unit_conflict: false,
        }
    }

    fn stock(quantity: f64, unit: &str) -> StockLevel {
        StockLevel {
            quantity,
            unit: unit.to_string(),
        }
    }

    #[test]
    fn test_full_stock_is_in_inventory() {
        let mut agg = Aggregation::new();
        agg.insert(1, need(16.0, "ounces", "apple", "Produce"));
        let inventory = HashMap::from([(1, stock(20.0, "ounces"))]);

        let plan = plan_shopping(&agg, &inventory);
        assert!(plan.is_fully_stocked());
        assert_eq!(plan.in_inventory.len(), 1);
        assert_eq!(plan.in_inventory[0].on_hand, 20.0);
        assert_eq!(plan.in_inventory[0].to_buy, 0.0);
    }

    #[test]
    fn test_partial_stock_is_missing_shortfall() {
        let mut agg = Aggregation::new();
        agg.insert(1, need(16.0, "ounces", "apple", "Produce"));
        let inventory = HashMap::from([(1, stock(6.0, "Ounces"))]);

        let plan = plan_shopping(&agg, &inventory);
        assert_eq!(plan.missing.len(), 1);
        assert_eq!(plan.missing[0].on_hand, 6.0);
        assert_eq!(plan.missing[0].to_buy, 10.0);
    }

    #[test]
    fn test_incommensurable_stock_counts_as_absent() {
        let mut agg = Aggregation::new();
        agg.insert(1, need(6.0, "teaspoons", "salt", "Spices"));
        let inventory = HashMap::from([(1, stock(100.0, "grams"))]);

        let plan = plan_shopping(&agg, &inventory);
        assert_eq!(plan.missing[0].on_hand, 0.0);
        assert_eq!(plan.missing[0].to_buy, 6.0);
    }

    #[test]
    fn test_stock_in_other_spelling_counts() {
        let mut agg = Aggregation::new();
        agg.insert(1, need(3.0, "ounces", "banana", "Produce"));
        agg.insert(2, need(1.0, "ounce", "walnuts", "Nuts"));
        agg.insert(3, need(4.0, "teaspoons", "salt", "Spices"));
        let inventory = HashMap::from([
            (1, stock(10.0, "oz")),
            (2, stock(5.0, "ounces")),
            (3, stock(2.0, "tsp")),
        ]);

        let plan = plan_shopping(&agg, &inventory);
        let ids: Vec<i64> = plan.in_inventory.iter().map(|l| l.ingredient_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(plan.in_inventory[1].on_hand, 10.0);

        assert_eq!(plan.missing.len(), 1);
        assert_eq!(plan.missing[0].on_hand, 2.0);
        assert_eq!(plan.missing[0].to_buy, 2.0);
    }

    #[test]
    fn test_no_stock_and_sorting() {
        let mut agg = Aggregation::new();
        agg.insert(1, need(1.0, "", "zucchini", "Produce"));
        agg.insert(2, need(1.0, "", "apple", "Produce"));
        agg.insert(3, need(1.0, "", "milk", "Dairy"));

        let plan = plan_shopping(&agg, &HashMap::new());
        let names: Vec<&str> = plan.missing.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["milk", "apple", "zucchini"]);
        assert!(plan.in_inventory.is_empty());
        assert_eq!(plan.lines().count(), 3);
    }
}
