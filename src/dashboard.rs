use chrono::NaiveDate;

use crate::aggregate::*;
use crate::amount_formatter::AmountFormatter;
use crate::errors::*;
use crate::finance_client::FinanceApiClient;
use crate::models::CategoryKind;
use crate::snapshot::{JoinedTransaction, Snapshot};
use crate::utilities::*;

pub struct DashboardReport<'a> {
    snapshot: &'a Snapshot,
    joined: Vec<JoinedTransaction<'a>>,
    formatter: AmountFormatter,
    today: NaiveDate,
}

impl<'a> DashboardReport<'a> {
    pub fn run(client: &FinanceApiClient, trend_months: u32, recent_limit: usize) -> Result<()> {
        let snapshot = Snapshot::load(client)?;
        let report = DashboardReport {
            snapshot: &snapshot,
            joined: snapshot.joined()?,
            formatter: AmountFormatter::new(snapshot.user.currency),
            today: chrono::Local::today().naive_local(),
        };
        report.print_summary();
        report.print_category_breakdown();
        report.print_monthly_trend(trend_months);
        report.print_recent_transactions(recent_limit);
        Ok(())
    }

    fn print_summary(&self) {
        println!();
        println!("Welcome back, {}!", self.snapshot.user.username);
        println!();
        println!(
            "  Total income:   {} ({} transactions)",
            self.formatter
                .format(total_by_kind(&self.joined, CategoryKind::Income)),
            count_by_kind(&self.joined, CategoryKind::Income)
        );
        println!(
            "  Total expenses: {} ({} transactions)",
            self.formatter
                .format(total_by_kind(&self.joined, CategoryKind::Expense)),
            count_by_kind(&self.joined, CategoryKind::Expense)
        );
        println!(
            "  Balance:        {}",
            self.formatter.format(balance(&self.joined))
        );
    }

    fn print_category_breakdown(&self) {
        println!();
        println!("Spending by category:");
        let breakdown = category_breakdown(&self.joined, &self.snapshot.categories);
        if breakdown.is_empty() {
            println!("  No expense data to display");
            return;
        }
        for entry in breakdown {
            println!(
                "  {:<20} {}",
                entry.category.name,
                self.formatter.format(entry.total)
            );
        }
    }

    fn print_monthly_trend(&self, trend_months: u32) {
        println!();
        println!(
            "Monthly trend, {} months to {}:",
            trend_months,
            format_iso_date(self.today)
        );
        for month in monthly_trend(&self.joined, trend_months, self.today) {
            println!(
                "  {}  income {:>15}  expenses {:>15}",
                month.period,
                self.formatter.format(month.income),
                self.formatter.format(month.expense)
            );
        }
    }

    fn print_recent_transactions(&self, recent_limit: usize) {
        println!();
        println!("Recent transactions:");
        if self.joined.is_empty() {
            println!("  No transactions yet");
            return;
        }
        let mut recent: Vec<&JoinedTransaction> = self.joined.iter().collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        print_transaction_lines(recent.into_iter().take(recent_limit), &self.formatter);
    }
}

pub fn print_transaction_lines<'a, I>(records: I, formatter: &AmountFormatter)
where
    I: IntoIterator<Item = &'a JoinedTransaction<'a>>,
{
    for record in records {
        let category_name = record
            .category
            .map(|category| category.name.as_str())
            .unwrap_or("(uncategorized)");
        let sign = if record.kind() == Some(CategoryKind::Income) {
            "+"
        } else {
            "-"
        };
        println!(
            "  {}  {:<20} {}{:>15}  {:<13} {}",
            record.transaction.date,
            category_name,
            sign,
            formatter.format(record.amount()),
            record.transaction.payment_method,
            record.transaction.description
        );
    }
}
