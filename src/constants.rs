use lazy_static::lazy_static;
use regex::Regex;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_SESSION_FILENAME: &str = "session.json";
pub const DEFAULT_CATEGORY_COLOR: &str = "#000000";

pub const API_URL_ARG: &str = "api-url";
pub const API_URL_ENV: &str = "FINSIGHT_API_URL";
pub const SESSION_FILE_ARG: &str = "session-file";
pub const SESSION_FILE_ENV: &str = "FINSIGHT_SESSION_FILE";

pub const LOGIN_COMMAND: &str = "login";
pub const LOGOUT_COMMAND: &str = "logout";
pub const DASHBOARD_COMMAND: &str = "dashboard";
pub const BUDGETS_COMMAND: &str = "budgets";
pub const ADD_BUDGET_COMMAND: &str = "add-budget";
pub const DELETE_BUDGET_COMMAND: &str = "delete-budget";
pub const CATEGORIES_COMMAND: &str = "categories";
pub const ADD_CATEGORY_COMMAND: &str = "add-category";
pub const DELETE_CATEGORY_COMMAND: &str = "delete-category";
pub const TRANSACTIONS_COMMAND: &str = "transactions";
pub const ADD_TRANSACTION_COMMAND: &str = "add-transaction";

pub const USERNAME_ARG: &str = "username";
pub const USERNAME_ENV: &str = "FINSIGHT_USERNAME";
pub const PASSWORD_ARG: &str = "password";
pub const PASSWORD_ENV: &str = "FINSIGHT_PASSWORD";
pub const TREND_MONTHS_ARG: &str = "trend-months";
pub const DEFAULT_TREND_MONTHS: &str = "6";
pub const RECENT_ARG: &str = "recent";
pub const DEFAULT_RECENT_LIMIT: &str = "5";
pub const LIMIT_ARG: &str = "limit";
pub const ID_ARG: &str = "id";
pub const NAME_ARG: &str = "name";
pub const KIND_ARG: &str = "kind";
pub const COLOR_ARG: &str = "color";
pub const ICON_ARG: &str = "icon";
pub const CATEGORY_ARG: &str = "category";
pub const AMOUNT_ARG: &str = "amount";
pub const DATE_ARG: &str = "date";
pub const DESCRIPTION_ARG: &str = "description";
pub const PAYMENT_METHOD_ARG: &str = "payment-method";
pub const MONTH_ARG: &str = "month";
pub const YEAR_ARG: &str = "year";

pub const POSSIBLE_CATEGORY_KINDS: [&str; 2] = ["income", "expense"];
pub const POSSIBLE_PAYMENT_METHODS: [&str; 5] = ["cash", "card", "bank_transfer", "upi", "other"];

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// Progress bars turn from healthy to warning above this percentage.
pub const BUDGET_WARN_PERCENT: i64 = 80;
pub const PROGRESS_BAR_WIDTH: u32 = 20;

lazy_static! {
    pub static ref CATEGORY_COLOR_REGEX: Regex =
        Regex::new(r"^#[0-9a-fA-F]{6}$").expect("CATEGORY_COLOR_REGEX should be valid");
}
