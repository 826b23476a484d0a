//! Wire models for the finance backend's REST API.
//!
//! Decimal fields travel as strings, dates as `YYYY-MM-DD` strings, and the
//! category references on transactions and budgets are bare ids that must be
//! resolved against the fetched category list.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::*;
use crate::types::*;

#[derive(Clone, Debug, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub currency: CurrencyCode,
    pub created_at: String,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    #[serde(default)]
    pub icon: Option<String>,
    pub color: String,
    pub created_at: String,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Upi,
    Other,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub category: Option<CategoryId>,
    pub amount: Money,
    #[serde(default)]
    pub description: String,
    pub date: String,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub receipt: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub category: CategoryId,
    pub amount: Money,
    pub month: u32,
    pub year: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AuthTokens {
    pub access: String,
    pub refresh: String,
}

/// List endpoints answer either with a page envelope or a bare array,
/// depending on backend pagination settings. Both shapes decode here, once,
/// so the rest of the crate only ever sees a plain `Vec`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Paginated(Page<T>),
    Bare(Vec<T>),
}

#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListResponse::Paginated(page) => page.results,
            ListResponse::Bare(items) => items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewTransaction {
    pub category: CategoryId,
    pub amount: Money,
    pub description: String,
    pub date: String,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Serialize)]
pub struct NewBudget {
    pub category: CategoryId,
    pub amount: Money,
    pub month: u32,
    pub year: i32,
}

impl CategoryKind {
    pub fn from_str(kind: &str) -> Result<CategoryKind> {
        match kind {
            "income" => Ok(CategoryKind::Income),
            "expense" => Ok(CategoryKind::Expense),
            _ => bail!("Invalid category kind: {}", kind),
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl PaymentMethod {
    pub fn from_str(method: &str) -> Result<PaymentMethod> {
        match method {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "upi" => Ok(PaymentMethod::Upi),
            "other" => Ok(PaymentMethod::Other),
            _ => bail!("Invalid payment method: {}", method),
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::POSSIBLE_PAYMENT_METHODS;

    #[test]
    fn test_list_response_paginated_shape() {
        let body = r##"{
            "count": 2,
            "next": null,
            "previous": null,
            "results": [
                {"id": 1, "name": "Groceries", "type": "expense", "color": "#EF4444",
                 "created_at": "2024-01-01T00:00:00Z"},
                {"id": 2, "name": "Salary", "type": "income", "color": "#10B981",
                 "created_at": "2024-01-01T00:00:00Z"}
            ]
        }"##;
        let categories = serde_json::from_str::<ListResponse<Category>>(body)
            .unwrap()
            .into_items();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].kind, CategoryKind::Expense);
        assert_eq!(categories[1].name, "Salary");
    }

    #[test]
    fn test_list_response_bare_shape() {
        let body = r##"[
            {"id": 3, "name": "Rent", "type": "expense", "icon": "house", "color": "#3B82F6",
             "created_at": "2024-01-01T00:00:00Z"}
        ]"##;
        let categories = serde_json::from_str::<ListResponse<Category>>(body)
            .unwrap()
            .into_items();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].icon.as_deref(), Some("house"));
    }

    #[test]
    fn test_transaction_with_null_category() {
        let body = r#"{
            "id": 7, "category": null, "amount": "12.50", "description": "",
            "date": "2024-03-05", "payment_method": "upi",
            "created_at": "2024-03-05T10:00:00Z", "updated_at": "2024-03-05T10:00:00Z"
        }"#;
        let transaction: Transaction = serde_json::from_str(body).unwrap();
        assert_eq!(transaction.category, None);
        assert_eq!(transaction.amount, Money::from_scaled_i64(1_250));
        assert_eq!(transaction.payment_method, PaymentMethod::Upi);
    }

    #[test]
    fn test_new_transaction_serializes_wire_names() {
        let new_transaction = NewTransaction {
            category: CategoryId(1),
            amount: Money::from_scaled_i64(5_000),
            description: "weekly shop".to_string(),
            date: "2024-03-05".to_string(),
            payment_method: PaymentMethod::BankTransfer,
        };
        let body = serde_json::to_value(&new_transaction).unwrap();
        assert_eq!(body["category"], 1);
        assert_eq!(body["amount"], "50.00");
        assert_eq!(body["payment_method"], "bank_transfer");
    }

    #[test]
    fn test_payment_method_from_str() {
        for method in &POSSIBLE_PAYMENT_METHODS {
            assert_eq!(PaymentMethod::from_str(method).unwrap().to_str(), *method);
        }
        assert!(PaymentMethod::from_str("cheque").is_err());
    }
}
