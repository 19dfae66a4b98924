//! Budget allocation: pick as many dishes as a budget allows, cheapest first.
//!
//! The scan stops at the first dish that does not fit. On a price-sorted
//! catalog every later dish costs at least as much, so nothing after it could
//! fit either. This is an affordability heuristic that maximizes dish count,
//! not total value.

use crate::domain::model::MenuItem;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

/// A strictly positive amount. Invalid input never reaches the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Budget(Decimal);

impl Budget {
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount > Decimal::ZERO).then_some(Self(amount))
    }

    /// Parse user input such as `"15000"`, `" 15000.50 "` or `"1.5e4"`.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .ok()?;
        Self::new(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BudgetQuery<'a> {
    pub budget: Budget,
    pub catalog: &'a [MenuItem],
}

impl<'a> BudgetQuery<'a> {
    pub fn new(budget: Budget, catalog: &'a [MenuItem]) -> Self {
        Self { budget, catalog }
    }

    pub fn allocate(&self) -> AllocationResult {
        allocate(self.budget, self.catalog)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    /// Accepted dishes in ascending price order.
    pub selected: Vec<MenuItem>,
    pub total_cost: Decimal,
    pub remaining: Decimal,
}

impl AllocationResult {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

pub fn allocate(budget: Budget, catalog: &[MenuItem]) -> AllocationResult {
    let limit = budget.amount();

    let mut sorted: Vec<&MenuItem> = catalog.iter().collect();
    // stable: equal prices keep catalog order
    sorted.sort_by(|a, b| a.price.cmp(&b.price));

    let mut selected = Vec::new();
    let mut total_cost = Decimal::ZERO;

    for item in sorted {
        // a sum past Decimal::MAX cannot fit any budget either
        match total_cost.checked_add(item.price) {
            Some(next) if next <= limit => total_cost = next,
            _ => break,
        }
        selected.push(item.clone());
    }

    AllocationResult {
        selected,
        total_cost,
        remaining: limit - total_cost,
    }
}

/// What a budget request resolved to, as data for the caller to present.
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetOutcome {
    /// Missing, non-numeric or non-positive budget; nothing was computed.
    InvalidBudget,
    /// The restaurant has no menu configured.
    EmptyCatalog,
    /// Not even the cheapest dish fits.
    Unaffordable { budget: Budget },
    Affordable(AllocationResult),
}

pub fn evaluate(raw_budget: &str, catalog: &[MenuItem]) -> BudgetOutcome {
    let Some(budget) = Budget::parse(raw_budget) else {
        tracing::debug!("Rejected budget input {:?}", raw_budget);
        return BudgetOutcome::InvalidBudget;
    };
    if catalog.is_empty() {
        return BudgetOutcome::EmptyCatalog;
    }

    let result = allocate(budget, catalog);
    if result.is_empty() {
        BudgetOutcome::Unaffordable { budget }
    } else {
        tracing::debug!(
            "Budget {} covers {} of {} dishes",
            budget.amount(),
            result.selected.len(),
            catalog.len()
        );
        BudgetOutcome::Affordable(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::EntityId;
    use rust_decimal_macros::dec;

    fn catalog(prices: &[Decimal]) -> Vec<MenuItem> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| MenuItem::new(i as i64 + 1, format!("Plato {}", i + 1), *p))
            .collect()
    }

    fn prices(result: &AllocationResult) -> Vec<Decimal> {
        result.selected.iter().map(|i| i.price).collect()
    }

    fn budget(amount: Decimal) -> Budget {
        Budget::new(amount).unwrap()
    }

    #[test]
    fn test_scenario_a_stops_at_first_unaffordable() {
        let items = catalog(&[dec!(5000), dec!(10000), dec!(8000)]);
        let result = allocate(budget(dec!(15000)), &items);

        assert_eq!(prices(&result), vec![dec!(5000), dec!(8000)]);
        assert_eq!(result.total_cost, dec!(13000));
        assert_eq!(result.remaining, dec!(2000));
    }

    #[test]
    fn test_scenario_b_single_item_over_budget() {
        let items = catalog(&[dec!(20000)]);
        let result = allocate(budget(dec!(15000)), &items);

        assert!(result.selected.is_empty());
        assert_eq!(result.total_cost, Decimal::ZERO);
        assert_eq!(result.remaining, dec!(15000));
        assert_eq!(
            evaluate("15000", &items),
            BudgetOutcome::Unaffordable {
                budget: budget(dec!(15000))
            }
        );
    }

    #[test]
    fn test_scenario_c_empty_catalog() {
        assert_eq!(evaluate("15000", &[]), BudgetOutcome::EmptyCatalog);
        assert!(allocate(budget(dec!(15000)), &[]).is_empty());
    }

    #[test]
    fn test_scenario_d_unparseable_budget() {
        let items = catalog(&[dec!(5000)]);
        assert_eq!(evaluate("abc", &items), BudgetOutcome::InvalidBudget);
        // invalid budget wins over an empty catalog
        assert_eq!(evaluate("abc", &[]), BudgetOutcome::InvalidBudget);
    }

    #[test]
    fn test_budget_parse() {
        assert_eq!(Budget::parse("15000").map(|b| b.amount()), Some(dec!(15000)));
        assert_eq!(Budget::parse(" 12500.50 ").map(|b| b.amount()), Some(dec!(12500.50)));
        assert_eq!(Budget::parse("1.5e4").map(|b| b.amount()), Some(dec!(15000)));
        assert!(Budget::parse("").is_none());
        assert!(Budget::parse("0").is_none());
        assert!(Budget::parse("-10").is_none());
        assert!(Budget::parse("NaN").is_none());
        assert!(Budget::parse("inf").is_none());
        assert!(Budget::parse("12abc").is_none());
    }

    #[test]
    fn test_exact_boundary_includes_n_cheapest() {
        let items = catalog(&[dec!(3000), dec!(1000), dec!(2000), dec!(4000)]);
        let result = allocate(budget(dec!(6000)), &items);

        assert_eq!(prices(&result), vec![dec!(1000), dec!(2000), dec!(3000)]);
        assert_eq!(result.remaining, Decimal::ZERO);
    }

    #[test]
    fn test_no_skip_after_break() {
        // 4000 does not fit after 1000+3000; scanning stops there
        let items = catalog(&[dec!(1000), dec!(3000), dec!(4000), dec!(4000)]);
        let result = allocate(budget(dec!(7000)), &items);
        assert_eq!(prices(&result), vec![dec!(1000), dec!(3000)]);
        assert_eq!(result.remaining, dec!(3000));
    }

    #[test]
    fn test_equal_prices_keep_catalog_order() {
        let items = vec![
            MenuItem::new("b", "Empanada", dec!(2000)),
            MenuItem::new("a", "Arepa", dec!(2000)),
            MenuItem::new("c", "Tinto", dec!(1000)),
        ];
        let result = allocate(budget(dec!(5000)), &items);
        let ids: Vec<EntityId> = result.selected.iter().map(|i| i.id.clone()).collect();
        assert_eq!(
            ids,
            vec![EntityId::from("c"), EntityId::from("b"), EntityId::from("a")]
        );
    }

    #[test]
    fn test_invariants_hold_across_budgets() {
        let items = catalog(&[
            dec!(12000),
            dec!(4500),
            dec!(0),
            dec!(9900),
            dec!(4500),
            dec!(30000),
        ]);
        let cheapest = dec!(0);

        for amount in [dec!(1), dec!(4500), dec!(9000), dec!(18999), dec!(31000), dec!(100000)] {
            let result = allocate(budget(amount), &items);
            let sum: Decimal = result.selected.iter().map(|i| i.price).sum();

            assert_eq!(result.total_cost, sum);
            assert!(result.total_cost <= amount);
            assert_eq!(result.remaining, amount - result.total_cost);
            assert!(result.selected.windows(2).all(|w| w[0].price <= w[1].price));
            if amount >= cheapest {
                assert!(!result.selected.is_empty());
            }
        }
    }

    #[test]
    fn test_cheapest_dish_always_fits_its_own_price() {
        let items = catalog(&[dec!(12000), dec!(4500), dec!(9900), dec!(4500)]);
        let cheapest = dec!(4500);

        assert!(allocate(budget(cheapest - dec!(0.01)), &items).is_empty());
        for amount in [cheapest, dec!(8999), dec!(9000), dec!(50000)] {
            assert!(!allocate(budget(amount), &items).is_empty());
        }
    }

    #[test]
    fn test_sum_past_decimal_max_stops_instead_of_panicking() {
        let huge = Decimal::from_str("50000000000000000000000000000").unwrap();
        let items = catalog(&[huge, huge]);
        let result = allocate(budget(Decimal::MAX), &items);

        assert_eq!(result.selected.len(), 1);
        assert_eq!(result.total_cost, huge);
        assert_eq!(result.remaining, Decimal::MAX - huge);

        let outcome = evaluate("79228162514264337593543950335", &items);
        assert!(matches!(outcome, BudgetOutcome::Affordable(ref r) if r.selected.len() == 1));
    }

    #[test]
    fn test_allocation_is_idempotent() {
        let items = catalog(&[dec!(7000), dec!(2500), dec!(6000)]);
        let query = BudgetQuery::new(budget(dec!(10000)), &items);
        assert_eq!(query.allocate(), query.allocate());
        assert_eq!(items[0].price, dec!(7000));
    }
}
