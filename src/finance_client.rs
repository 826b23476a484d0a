use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

use crate::errors::*;
use crate::models::*;
use crate::session::Session;
use crate::types::*;

pub struct FinanceApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl FinanceApiClient {
    pub fn new(base_url: &str, session: &Session) -> Result<FinanceApiClient> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", session.access_token))
            .chain_err(|| "Session access token contains invalid header characters")?;
        headers.insert(AUTHORIZATION, bearer);
        Self::build(base_url, headers)
    }

    pub fn anonymous(base_url: &str) -> Result<FinanceApiClient> {
        Self::build(base_url, HeaderMap::new())
    }

    fn build(base_url: &str, headers: HeaderMap) -> Result<FinanceApiClient> {
        Ok(FinanceApiClient {
            client: reqwest::Client::builder()
                .default_headers(headers)
                .build()
                .chain_err(|| "Failed to build HTTP client")?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn login(&self, username: &str, password: &str) -> Result<AuthTokens> {
        let url = self.url("auth/login/");
        debug!("POST {}", url);
        let mut response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .chain_err(|| "Failed to send login request")?;
        if response.status().is_client_error() {
            bail!(ErrorKind::Validation(error_detail(&mut response)
                .unwrap_or_else(|| "Invalid username or password".to_string())));
        }
        let mut response = response
            .error_for_status()
            .chain_err(|| "Login request failed")?;
        response
            .json()
            .chain_err(|| "Failed to parse login response")
    }

    pub fn get_profile(&self) -> Result<User> {
        self.get_json("auth/profile/")
            .chain_err(|| "Failed to load user profile")
    }

    pub fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self
            .get_json::<ListResponse<Category>>("categories/")
            .chain_err(|| "Failed to load categories")?
            .into_items())
    }

    pub fn list_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self
            .get_json::<ListResponse<Transaction>>("transactions/")
            .chain_err(|| "Failed to load transactions")?
            .into_items())
    }

    pub fn list_budgets(&self) -> Result<Vec<Budget>> {
        Ok(self
            .get_json::<ListResponse<Budget>>("budgets/")
            .chain_err(|| "Failed to load budgets")?
            .into_items())
    }

    pub fn create_category(&self, new_category: &NewCategory) -> Result<Category> {
        self.post_json("categories/", new_category)
    }

    pub fn create_transaction(&self, new_transaction: &NewTransaction) -> Result<Transaction> {
        self.post_json("transactions/", new_transaction)
    }

    pub fn create_budget(&self, new_budget: &NewBudget) -> Result<Budget> {
        self.post_json("budgets/", new_budget)
    }

    pub fn delete_category(&self, id: CategoryId) -> Result<()> {
        self.delete(
            &format!("categories/{}/", id),
            "Failed to delete category (it may have associated transactions)",
        )
    }

    pub fn delete_budget(&self, id: BudgetId) -> Result<()> {
        self.delete(
            &format!("budgets/{}/", id),
            "Failed to delete budget (it may have associated records)",
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("GET {}", url);
        let mut response = self
            .client
            .get(&url)
            .send()
            .chain_err(|| format!("Failed to send request: GET {}", path))?;
        check_read_status(&mut response)?;
        response
            .json()
            .chain_err(|| format!("Failed to parse response body: GET {}", path))
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        debug!("POST {}", url);
        let mut response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .chain_err(|| format!("Failed to send request: POST {}", path))?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            bail!(ErrorKind::AuthenticationRequired);
        }
        if status == StatusCode::BAD_REQUEST {
            bail!(ErrorKind::Validation(error_detail(&mut response)
                .unwrap_or_else(|| "The server rejected the submitted values".to_string())));
        }
        let mut response = response
            .error_for_status()
            .chain_err(|| format!("Request failed: POST {}", path))?;
        response
            .json()
            .chain_err(|| format!("Failed to parse response body: POST {}", path))
    }

    // Failed deletes are the backend refusing to orphan referenced records,
    // which callers must surface distinctly from transport errors.
    fn delete(&self, path: &str, integrity_message: &str) -> Result<()> {
        let url = self.url(path);
        debug!("DELETE {}", url);
        let mut response = self
            .client
            .delete(&url)
            .send()
            .chain_err(|| format!("Failed to send request: DELETE {}", path))?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            bail!(ErrorKind::AuthenticationRequired);
        }
        if status.is_client_error() || status.is_server_error() {
            bail!(ErrorKind::Integrity(
                error_detail(&mut response).unwrap_or_else(|| integrity_message.to_string())
            ));
        }
        Ok(())
    }
}

fn check_read_status(response: &mut reqwest::Response) -> Result<()> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        bail!(ErrorKind::AuthenticationRequired);
    }
    if status.is_client_error() || status.is_server_error() {
        match error_detail(response) {
            Some(detail) => bail!("Request failed ({}): {}", status, detail),
            None => bail!("Request failed with status {}", status),
        }
    }
    Ok(())
}

fn error_detail(response: &mut reqwest::Response) -> Option<String> {
    let body: HashMap<String, serde_json::Value> = response.json().ok()?;
    match body.get("detail")? {
        serde_json::Value::String(detail) => Some(detail.clone()),
        other => Some(other.to_string()),
    }
}
