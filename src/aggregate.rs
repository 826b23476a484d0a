//! Derived financial figures over one snapshot.
//!
//! Every function here is pure: no I/O, no mutation of inputs. Transactions
//! whose category reference did not resolve during the join degrade to
//! "no kind" and are excluded from kind-based totals rather than failing.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::*;
use crate::models::{Category, CategoryKind};
use crate::snapshot::JoinedTransaction;
use crate::types::*;

pub fn total_by_kind(joined: &[JoinedTransaction], kind: CategoryKind) -> Money {
    joined
        .iter()
        .filter(|record| record.kind() == Some(kind))
        .fold(Money::zero(), |sum, record| sum + record.amount())
}

pub fn count_by_kind(joined: &[JoinedTransaction], kind: CategoryKind) -> usize {
    joined
        .iter()
        .filter(|record| record.kind() == Some(kind))
        .count()
}

/// Income minus expenses; negative when spending exceeds income.
pub fn balance(joined: &[JoinedTransaction]) -> Money {
    total_by_kind(joined, CategoryKind::Income) - total_by_kind(joined, CategoryKind::Expense)
}

/// Total spent against one budget's category within its month. Matches on
/// the raw category id, so it also covers records whose category no longer
/// resolves.
pub fn spent_for_budget(
    joined: &[JoinedTransaction],
    category_id: CategoryId,
    period: MonthPeriod,
) -> Money {
    joined
        .iter()
        .filter(|record| {
            record.transaction.category == Some(category_id) && period.contains(record.date)
        })
        .fold(Money::zero(), |sum, record| sum + record.amount())
}

#[derive(Debug)]
pub struct CategorySpend<'a> {
    pub category: &'a Category,
    pub total: Money,
}

/// Expense categories with their all-time spend, largest first. Zero-spend
/// categories are dropped; equal totals keep the category list's order (the
/// sort is stable).
pub fn category_breakdown<'a>(
    joined: &[JoinedTransaction],
    categories: &'a [Category],
) -> Vec<CategorySpend<'a>> {
    let mut breakdown: Vec<CategorySpend<'a>> = categories
        .iter()
        .filter(|category| category.kind == CategoryKind::Expense)
        .map(|category| CategorySpend {
            category,
            total: joined
                .iter()
                .filter(|record| record.transaction.category == Some(category.id))
                .fold(Money::zero(), |sum, record| sum + record.amount()),
        })
        .filter(|entry| !entry.total.is_zero())
        .collect();
    breakdown.sort_by(|a, b| b.total.cmp(&a.total));
    breakdown
}

#[derive(Debug, Eq, PartialEq)]
pub struct MonthlyTotals {
    pub period: MonthPeriod,
    pub income: Money,
    pub expense: Money,
}

/// Income and expense totals for exactly `months_back` calendar months
/// ending at `today`'s month, oldest first. `today` is an explicit argument
/// so results are deterministic for a given snapshot.
pub fn monthly_trend(
    joined: &[JoinedTransaction],
    months_back: u32,
    today: NaiveDate,
) -> Vec<MonthlyTotals> {
    let mut periods = Vec::with_capacity(months_back as usize);
    let mut period = MonthPeriod::from_date(today);
    for _ in 0..months_back {
        periods.push(period);
        period = period.previous();
    }
    periods.reverse();
    periods
        .into_iter()
        .map(|period| {
            let mut income = Money::zero();
            let mut expense = Money::zero();
            for record in joined.iter().filter(|record| period.contains(record.date)) {
                match record.kind() {
                    Some(CategoryKind::Income) => income += record.amount(),
                    Some(CategoryKind::Expense) => expense += record.amount(),
                    None => {}
                }
            }
            MonthlyTotals {
                period,
                income,
                expense,
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BudgetStatus {
    Healthy,
    NearLimit,
    Over,
}

#[derive(Debug)]
pub struct BudgetProgress {
    pub spent: Money,
    pub limit: Money,
}

impl BudgetProgress {
    pub fn new(spent: Money, limit: Money) -> BudgetProgress {
        BudgetProgress { spent, limit }
    }

    /// True spent-to-limit percentage, unclamped. A zero limit never
    /// divides: it reports 0 when nothing was spent and 100 otherwise, so
    /// NaN/infinity can't leak into display.
    pub fn percentage(&self) -> Decimal {
        if self.limit.is_zero() {
            if self.spent.is_zero() {
                Decimal::zero()
            } else {
                Decimal::new(100, 0)
            }
        } else {
            self.spent.to_decimal() / self.limit.to_decimal() * Decimal::new(100, 0)
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.limit
    }

    pub fn status(&self) -> BudgetStatus {
        if self.is_over_budget() {
            BudgetStatus::Over
        } else if self.percentage() > Decimal::new(BUDGET_WARN_PERCENT, 0) {
            BudgetStatus::NearLimit
        } else {
            BudgetStatus::Healthy
        }
    }

    /// Bar fill clamped to [0, 100]; the text next to the bar still reports
    /// the true percentage.
    pub fn bar_fill_percent(&self) -> u32 {
        let percentage = self.percentage();
        if percentage >= Decimal::new(100, 0) {
            100
        } else if percentage <= Decimal::zero() {
            0
        } else {
            percentage
                .round_dp_with_strategy(0, RoundingStrategy::RoundHalfUp)
                .to_u32()
                .expect("clamped percentage should convert to u32")
        }
    }

    pub fn remaining(&self) -> Money {
        self.limit - self.spent
    }

    pub fn overage(&self) -> Money {
        self.spent - self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentMethod, Transaction};
    use crate::snapshot::join;

    fn category(id: i64, name: &str, kind: CategoryKind) -> Category {
        Category {
            id: CategoryId(id),
            name: name.to_string(),
            kind,
            icon: None,
            color: "#336699".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn transaction(id: i64, category: Option<i64>, cents: i64, date: &str) -> Transaction {
        Transaction {
            id: TransactionId(id),
            category: category.map(CategoryId),
            amount: Money::from_scaled_i64(cents),
            description: String::new(),
            date: date.to_string(),
            payment_method: PaymentMethod::Cash,
            receipt: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn sample_categories() -> Vec<Category> {
        vec![
            category(1, "Groceries", CategoryKind::Expense),
            category(2, "Salary", CategoryKind::Income),
            category(3, "Rent", CategoryKind::Expense),
        ]
    }

    #[test]
    fn test_total_by_kind_excludes_unresolved_categories() {
        let categories = sample_categories();
        let transactions = vec![
            transaction(1, Some(2), 500_000, "2024-03-01"),
            transaction(2, Some(1), 8_000, "2024-03-05"),
            // References a category id absent from the list; must count
            // toward neither kind.
            transaction(3, Some(99), 123_400, "2024-03-07"),
            transaction(4, None, 5_000, "2024-03-08"),
        ];
        let joined = join(&transactions, &categories).unwrap();
        assert_eq!(
            total_by_kind(&joined, CategoryKind::Income),
            Money::from_scaled_i64(500_000)
        );
        assert_eq!(
            total_by_kind(&joined, CategoryKind::Expense),
            Money::from_scaled_i64(8_000)
        );
        assert_eq!(balance(&joined), Money::from_scaled_i64(492_000));
        assert_eq!(count_by_kind(&joined, CategoryKind::Income), 1);
        assert_eq!(count_by_kind(&joined, CategoryKind::Expense), 1);
    }

    #[test]
    fn test_balance_matches_kind_totals_and_may_go_negative() {
        let categories = sample_categories();
        let transactions = vec![
            transaction(1, Some(2), 10_000, "2024-03-01"),
            transaction(2, Some(1), 15_000, "2024-03-02"),
        ];
        let joined = join(&transactions, &categories).unwrap();
        assert_eq!(
            balance(&joined),
            total_by_kind(&joined, CategoryKind::Income)
                - total_by_kind(&joined, CategoryKind::Expense)
        );
        assert_eq!(balance(&joined), Money::from_scaled_i64(-5_000));
    }

    #[test]
    fn test_totals_are_zero_on_empty_input() {
        let categories = sample_categories();
        let joined = join(&[], &categories).unwrap();
        assert!(total_by_kind(&joined, CategoryKind::Income).is_zero());
        assert!(total_by_kind(&joined, CategoryKind::Expense).is_zero());
        assert!(balance(&joined).is_zero());
    }

    #[test]
    fn test_spent_for_budget_scopes_to_month() {
        let categories = sample_categories();
        let transactions = vec![
            transaction(1, Some(1), 5_000, "2024-03-05"),
            transaction(2, Some(1), 3_000, "2024-03-20"),
            transaction(3, Some(1), 9_900, "2024-02-29"),
            transaction(4, Some(3), 150_000, "2024-03-01"),
        ];
        let joined = join(&transactions, &categories).unwrap();
        let march = MonthPeriod::new(3, 2024).unwrap();
        assert_eq!(
            spent_for_budget(&joined, CategoryId(1), march),
            Money::from_scaled_i64(8_000)
        );
        assert_eq!(
            spent_for_budget(&joined, CategoryId(1), MonthPeriod::new(2, 2024).unwrap()),
            Money::from_scaled_i64(9_900)
        );
        assert!(spent_for_budget(&joined, CategoryId(2), march).is_zero());
    }

    #[test]
    fn test_category_breakdown_sorted_without_zero_entries() {
        let mut categories = sample_categories();
        categories.push(category(4, "Travel", CategoryKind::Expense));
        let transactions = vec![
            transaction(1, Some(1), 8_000, "2024-03-05"),
            transaction(2, Some(3), 150_000, "2024-03-01"),
            transaction(3, Some(2), 500_000, "2024-03-01"),
        ];
        let joined = join(&transactions, &categories).unwrap();
        let breakdown = category_breakdown(&joined, &categories);
        let names: Vec<&str> = breakdown
            .iter()
            .map(|entry| entry.category.name.as_str())
            .collect();
        // Travel has no spend and Salary is income; neither appears.
        assert_eq!(names, vec!["Rent", "Groceries"]);
        assert!(breakdown
            .windows(2)
            .all(|pair| pair[0].total >= pair[1].total));
    }

    #[test]
    fn test_category_breakdown_ties_keep_category_order() {
        let categories = vec![
            category(1, "Groceries", CategoryKind::Expense),
            category(2, "Rent", CategoryKind::Expense),
            category(3, "Travel", CategoryKind::Expense),
        ];
        let transactions = vec![
            transaction(1, Some(3), 5_000, "2024-03-05"),
            transaction(2, Some(2), 5_000, "2024-03-05"),
            transaction(3, Some(1), 5_000, "2024-03-05"),
        ];
        let joined = join(&transactions, &categories).unwrap();
        let names: Vec<&str> = category_breakdown(&joined, &categories)
            .iter()
            .map(|entry| entry.category.name.as_str())
            .collect();
        assert_eq!(names, vec!["Groceries", "Rent", "Travel"]);
    }

    #[test]
    fn test_monthly_trend_always_yields_requested_months() {
        let categories = sample_categories();
        let joined = join(&[], &categories).unwrap();
        let today = NaiveDate::from_ymd(2024, 3, 15);
        let trend = monthly_trend(&joined, 6, today);
        assert_eq!(trend.len(), 6);
        assert_eq!(trend[0].period, MonthPeriod::new(10, 2023).unwrap());
        assert_eq!(trend[5].period, MonthPeriod::new(3, 2024).unwrap());
        assert!(trend
            .iter()
            .all(|month| month.income.is_zero() && month.expense.is_zero()));
        assert!(monthly_trend(&joined, 0, today).is_empty());
    }

    #[test]
    fn test_monthly_trend_buckets_by_month_and_kind() {
        let categories = sample_categories();
        let transactions = vec![
            transaction(1, Some(2), 500_000, "2024-02-01"),
            transaction(2, Some(1), 8_000, "2024-02-10"),
            transaction(3, Some(1), 3_000, "2024-03-05"),
            transaction(4, Some(99), 700_000, "2024-03-05"),
            transaction(5, Some(1), 1_000, "2023-12-31"),
        ];
        let joined = join(&transactions, &categories).unwrap();
        let trend = monthly_trend(&joined, 3, NaiveDate::from_ymd(2024, 3, 15));
        assert_eq!(
            trend,
            vec![
                MonthlyTotals {
                    period: MonthPeriod::new(1, 2024).unwrap(),
                    income: Money::zero(),
                    expense: Money::zero(),
                },
                MonthlyTotals {
                    period: MonthPeriod::new(2, 2024).unwrap(),
                    income: Money::from_scaled_i64(500_000),
                    expense: Money::from_scaled_i64(8_000),
                },
                MonthlyTotals {
                    period: MonthPeriod::new(3, 2024).unwrap(),
                    income: Money::zero(),
                    expense: Money::from_scaled_i64(3_000),
                },
            ]
        );
    }

    #[test]
    fn test_budget_progress_under_limit() {
        let progress = BudgetProgress::new(
            Money::from_scaled_i64(8_000),
            Money::from_scaled_i64(10_000),
        );
        assert_eq!(progress.percentage(), Decimal::new(80, 0));
        assert!(!progress.is_over_budget());
        assert_eq!(progress.remaining(), Money::from_scaled_i64(2_000));
        assert_eq!(progress.bar_fill_percent(), 80);
        assert_eq!(progress.status(), BudgetStatus::Healthy);
    }

    #[test]
    fn test_budget_progress_over_limit() {
        let progress = BudgetProgress::new(
            Money::from_scaled_i64(12_000),
            Money::from_scaled_i64(10_000),
        );
        assert!(progress.is_over_budget());
        assert_eq!(progress.percentage(), Decimal::new(120, 0));
        assert_eq!(progress.overage(), Money::from_scaled_i64(2_000));
        assert_eq!(progress.bar_fill_percent(), 100);
        assert_eq!(progress.status(), BudgetStatus::Over);
    }

    #[test]
    fn test_budget_progress_near_limit() {
        let progress = BudgetProgress::new(
            Money::from_scaled_i64(9_000),
            Money::from_scaled_i64(10_000),
        );
        assert!(!progress.is_over_budget());
        assert_eq!(progress.status(), BudgetStatus::NearLimit);
    }

    #[test]
    fn test_budget_progress_zero_limit_never_divides() {
        let empty = BudgetProgress::new(Money::zero(), Money::zero());
        assert_eq!(empty.percentage(), Decimal::zero());
        assert!(!empty.is_over_budget());
        assert_eq!(empty.bar_fill_percent(), 0);

        let spent = BudgetProgress::new(Money::from_scaled_i64(2_000), Money::zero());
        assert_eq!(spent.percentage(), Decimal::new(100, 0));
        assert!(spent.is_over_budget());
        assert_eq!(spent.bar_fill_percent(), 100);
    }
}
