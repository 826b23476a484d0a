//! Fetch/assemble: one point-in-time working set of everything the backend
//! holds for the signed-in user, plus the category join performed once so
//! aggregations never repeat per-transaction lookups.

use chrono::NaiveDate;
use log::debug;
use std::collections::HashMap;
use std::thread;

use crate::errors::*;
use crate::finance_client::FinanceApiClient;
use crate::models::*;
use crate::types::*;
use crate::utilities::*;

#[derive(Debug)]
pub struct Snapshot {
    pub user: User,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
}

/// A transaction paired with its resolved category and parsed date. The
/// category stays `None` when the referenced id is missing from the fetched
/// category list; such records count toward neither income nor expense.
#[derive(Clone, Debug)]
pub struct JoinedTransaction<'a> {
    pub transaction: &'a Transaction,
    pub category: Option<&'a Category>,
    pub date: NaiveDate,
}

impl Snapshot {
    /// Issues the four independent reads in parallel and assembles the
    /// snapshot once all of them have completed. Any single failure fails
    /// the whole load; no partial snapshot is ever returned.
    pub fn load(client: &FinanceApiClient) -> Result<Snapshot> {
        println!("Loading data from the finance API...");
        let (user, categories, transactions, budgets) = thread::scope(|scope| {
            let user = scope.spawn(|| client.get_profile());
            let categories = scope.spawn(|| client.list_categories());
            let transactions = scope.spawn(|| client.list_transactions());
            let budgets = scope.spawn(|| client.list_budgets());
            (
                user.join().expect("profile fetch should not panic"),
                categories.join().expect("categories fetch should not panic"),
                transactions
                    .join()
                    .expect("transactions fetch should not panic"),
                budgets.join().expect("budgets fetch should not panic"),
            )
        });
        let snapshot = Snapshot {
            user: user?,
            categories: categories?,
            transactions: transactions?,
            budgets: budgets?,
        };
        debug!(
            "Snapshot loaded: {} categories, {} transactions, {} budgets",
            snapshot.categories.len(),
            snapshot.transactions.len(),
            snapshot.budgets.len()
        );
        Ok(snapshot)
    }

    pub fn joined(&self) -> Result<Vec<JoinedTransaction>> {
        join(&self.transactions, &self.categories)
    }
}

pub fn join<'a>(
    transactions: &'a [Transaction],
    categories: &'a [Category],
) -> Result<Vec<JoinedTransaction<'a>>> {
    let categories_by_id: HashMap<CategoryId, &Category> = categories
        .iter()
        .map(|category| (category.id, category))
        .collect();
    transactions
        .iter()
        .map(|transaction| {
            Ok(JoinedTransaction {
                transaction,
                category: transaction
                    .category
                    .and_then(|id| categories_by_id.get(&id).copied()),
                date: parse_iso_date(&transaction.date)?,
            })
        })
        .collect()
}

impl<'a> JoinedTransaction<'a> {
    pub fn kind(&self) -> Option<CategoryKind> {
        self.category.map(|category| category.kind)
    }

    pub fn amount(&self) -> Money {
        self.transaction.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn transaction(id: i64, category: Option<i64>, amount: i64, date: &str) -> Transaction {
        Transaction {
            id: TransactionId(id),
            category: category.map(CategoryId),
            amount: Money::from_scaled_i64(amount),
            description: String::new(),
            date: date.to_string(),
            payment_method: PaymentMethod::Cash,
            receipt: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_join_resolves_categories() {
        let categories = vec![category(1, "Groceries", CategoryKind::Expense)];
        let transactions = vec![
            transaction(1, Some(1), 5_000, "2024-03-05"),
            transaction(2, Some(99), 3_000, "2024-03-06"),
            transaction(3, None, 1_000, "2024-03-07"),
        ];
        let joined = join(&transactions, &categories).unwrap();
        assert_eq!(joined[0].category.map(|c| c.name.as_str()), Some("Groceries"));
        assert_eq!(joined[0].kind(), Some(CategoryKind::Expense));
        assert!(joined[1].category.is_none());
        assert_eq!(joined[1].kind(), None);
        assert!(joined[2].category.is_none());
        assert_eq!(joined[0].date, NaiveDate::from_ymd(2024, 3, 5));
    }

    #[test]
    fn test_join_rejects_malformed_dates() {
        let categories = vec![category(1, "Groceries", CategoryKind::Expense)];
        let transactions = vec![transaction(1, Some(1), 5_000, "05/03/2024")];
        assert!(join(&transactions, &categories).is_err());
    }
}
