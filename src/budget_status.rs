use rust_decimal::RoundingStrategy;

use crate::aggregate::*;
use crate::amount_formatter::AmountFormatter;
use crate::constants::*;
use crate::errors::*;
use crate::finance_client::FinanceApiClient;
use crate::snapshot::Snapshot;
use crate::types::*;

pub struct BudgetStatusReport;

impl BudgetStatusReport {
    pub fn run(client: &FinanceApiClient) -> Result<()> {
        let snapshot = Snapshot::load(client)?;
        let joined = snapshot.joined()?;
        let formatter = AmountFormatter::new(snapshot.user.currency);
        println!();
        if snapshot.budgets.is_empty() {
            println!("No budgets yet; create one with the `add-budget` subcommand.");
            return Ok(());
        }
        for budget in &snapshot.budgets {
            let period = MonthPeriod::new(budget.month, budget.year)
                .chain_err(|| format!("Budget {} has an invalid month", budget.id))?;
            let category_name = snapshot
                .categories
                .iter()
                .find(|category| category.id == budget.category)
                .map(|category| category.name.as_str())
                .unwrap_or("(unknown category)");
            let spent = spent_for_budget(&joined, budget.category, period);
            let progress = BudgetProgress::new(spent, budget.amount);
            print_budget_card(category_name, period, &progress, &formatter);
        }
        Ok(())
    }
}

fn print_budget_card(
    category_name: &str,
    period: MonthPeriod,
    progress: &BudgetProgress,
    formatter: &AmountFormatter,
) {
    println!("{} ({} {})", category_name, period.name(), period.year());
    println!(
        "  Spent {} of {}  [{}]  {}% used",
        formatter.format(progress.spent),
        formatter.format(progress.limit),
        render_bar(progress),
        progress
            .percentage()
            .round_dp_with_strategy(0, RoundingStrategy::RoundHalfUp)
    );
    match progress.status() {
        BudgetStatus::Over => println!(
            "  Over budget by {}",
            formatter.format(progress.overage())
        ),
        BudgetStatus::NearLimit => println!(
            "  {} remaining (nearing the limit)",
            formatter.format(progress.remaining())
        ),
        BudgetStatus::Healthy => println!(
            "  {} remaining",
            formatter.format(progress.remaining())
        ),
    }
    println!();
}

// Fill is clamped to the bar width; the printed percentage is not.
fn render_bar(progress: &BudgetProgress) -> String {
    let filled = (progress.bar_fill_percent() * PROGRESS_BAR_WIDTH / 100) as usize;
    let mut bar = "#".repeat(filled);
    bar.push_str(&"-".repeat(PROGRESS_BAR_WIDTH as usize - filled));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bar_clamps_fill() {
        let over = BudgetProgress::new(Money::from_scaled_i64(12_000), Money::from_scaled_i64(10_000));
        assert_eq!(render_bar(&over), "#".repeat(20));
        let empty = BudgetProgress::new(Money::zero(), Money::from_scaled_i64(10_000));
        assert_eq!(render_bar(&empty), "-".repeat(20));
        let partial = BudgetProgress::new(Money::from_scaled_i64(8_000), Money::from_scaled_i64(10_000));
        assert_eq!(render_bar(&partial), format!("{}{}", "#".repeat(16), "-".repeat(4)));
    }
}
