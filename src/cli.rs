use rust_decimal::Decimal;
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::amount_formatter::AmountFormatter;
use crate::budget_status::BudgetStatusReport;
use crate::constants::*;
use crate::dashboard::{print_transaction_lines, DashboardReport};
use crate::errors::*;
use crate::finance_client::FinanceApiClient;
use crate::models::*;
use crate::session::Session;
use crate::snapshot::{JoinedTransaction, Snapshot};
use crate::types::*;
use crate::utilities::*;

pub fn run() -> Result<()> {
    initialize()?;
    run_clap_matches(get_clap_matches())
}

fn initialize() -> Result<()> {
    openssl_probe::init_ssl_cert_env_vars();
    dotenv::dotenv().ok();
    env_logger::init();

    let proj_dirs = directories::ProjectDirs::from("dev", "finsight", clap::crate_name!())
        .chain_err(|| "Failed to determine user data directory")?;
    let mut default_session_file = proj_dirs.data_dir().to_path_buf();
    default_session_file.push(DEFAULT_SESSION_FILENAME);

    default_env(SESSION_FILE_ENV, default_session_file);
    default_env(API_URL_ENV, DEFAULT_API_BASE_URL);

    Ok(())
}

fn get_clap_matches() -> clap::ArgMatches<'static> {
    clap::App::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .setting(clap::AppSettings::SubcommandRequiredElseHelp)
        .arg(
            clap::Arg::with_name(API_URL_ARG)
                .env(API_URL_ENV)
                .long(API_URL_ARG)
                .value_name("URL")
                .help("Base URL of the finance API")
                .takes_value(true)
                .required(true),
        )
        .arg(
            clap::Arg::with_name(SESSION_FILE_ARG)
                .env(SESSION_FILE_ENV)
                .long(SESSION_FILE_ARG)
                .value_name("PATH")
                .help("Set the file where the login session is stored")
                .takes_value(true)
                .required(true),
        )
        .subcommand(
            clap::SubCommand::with_name(LOGIN_COMMAND)
                .about("Log in and store the session credential")
                .arg(
                    clap::Arg::with_name(USERNAME_ARG)
                        .env(USERNAME_ENV)
                        .long(USERNAME_ARG)
                        .value_name("USERNAME")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    clap::Arg::with_name(PASSWORD_ARG)
                        .env(PASSWORD_ENV)
                        .long(PASSWORD_ARG)
                        .value_name("PASSWORD")
                        .takes_value(true)
                        .required(true),
                ),
        )
        .subcommand(
            clap::SubCommand::with_name(LOGOUT_COMMAND)
                .about("Discard the stored session credential"),
        )
        .subcommand(
            clap::SubCommand::with_name(DASHBOARD_COMMAND)
                .about("Show totals, spending by category, the monthly trend and recent transactions")
                .arg(
                    clap::Arg::with_name(TREND_MONTHS_ARG)
                        .long(TREND_MONTHS_ARG)
                        .value_name("COUNT")
                        .help("How many months of the trend to show")
                        .takes_value(true)
                        .default_value(DEFAULT_TREND_MONTHS)
                        .validator(validate_number::<u32>),
                )
                .arg(
                    clap::Arg::with_name(RECENT_ARG)
                        .long(RECENT_ARG)
                        .value_name("COUNT")
                        .help("How many recent transactions to show")
                        .takes_value(true)
                        .default_value(DEFAULT_RECENT_LIMIT)
                        .validator(validate_number::<usize>),
                ),
        )
        .subcommand(
            clap::SubCommand::with_name(BUDGETS_COMMAND)
                .about("Show every budget with its spending progress"),
        )
        .subcommand(
            clap::SubCommand::with_name(ADD_BUDGET_COMMAND)
                .about("Create a budget for a category and month")
                .arg(category_id_arg())
                .arg(amount_arg("Budget limit"))
                .arg(
                    clap::Arg::with_name(MONTH_ARG)
                        .long(MONTH_ARG)
                        .value_name("1-12")
                        .takes_value(true)
                        .required(true)
                        .validator(validate_number::<u32>),
                )
                .arg(
                    clap::Arg::with_name(YEAR_ARG)
                        .long(YEAR_ARG)
                        .value_name("YYYY")
                        .takes_value(true)
                        .required(true)
                        .validator(validate_number::<i32>),
                ),
        )
        .subcommand(
            clap::SubCommand::with_name(DELETE_BUDGET_COMMAND)
                .about("Delete a budget")
                .arg(id_arg("Budget id")),
        )
        .subcommand(
            clap::SubCommand::with_name(CATEGORIES_COMMAND)
                .about("List categories by kind"),
        )
        .subcommand(
            clap::SubCommand::with_name(ADD_CATEGORY_COMMAND)
                .about("Create a category")
                .arg(
                    clap::Arg::with_name(NAME_ARG)
                        .long(NAME_ARG)
                        .value_name("NAME")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    clap::Arg::with_name(KIND_ARG)
                        .long(KIND_ARG)
                        .value_name("KIND")
                        .takes_value(true)
                        .required(true)
                        .possible_values(&POSSIBLE_CATEGORY_KINDS),
                )
                .arg(
                    clap::Arg::with_name(COLOR_ARG)
                        .long(COLOR_ARG)
                        .value_name("#RRGGBB")
                        .takes_value(true)
                        .default_value(DEFAULT_CATEGORY_COLOR)
                        .validator(|value| {
                            if CATEGORY_COLOR_REGEX.is_match(&value) {
                                Ok(())
                            } else {
                                Err(format!("Invalid color (expected #RRGGBB): {}", value))
                            }
                        }),
                )
                .arg(
                    clap::Arg::with_name(ICON_ARG)
                        .long(ICON_ARG)
                        .value_name("NAME")
                        .takes_value(true),
                ),
        )
        .subcommand(
            clap::SubCommand::with_name(DELETE_CATEGORY_COMMAND)
                .about("Delete a category (fails when transactions still reference it)")
                .arg(id_arg("Category id")),
        )
        .subcommand(
            clap::SubCommand::with_name(TRANSACTIONS_COMMAND)
                .about("List transactions, most recent first")
                .arg(
                    clap::Arg::with_name(LIMIT_ARG)
                        .long(LIMIT_ARG)
                        .value_name("COUNT")
                        .help("Show at most this many transactions")
                        .takes_value(true)
                        .validator(validate_number::<usize>),
                ),
        )
        .subcommand(
            clap::SubCommand::with_name(ADD_TRANSACTION_COMMAND)
                .about("Record a transaction")
                .arg(category_id_arg())
                .arg(amount_arg("Transaction amount"))
                .arg(
                    clap::Arg::with_name(DATE_ARG)
                        .long(DATE_ARG)
                        .value_name("YYYY-MM-DD")
                        .takes_value(true)
                        .required(true)
                        .validator(|value| {
                            parse_iso_date(&value)
                                .map(|_| ())
                                .map_err(|err| err.to_string())
                        }),
                )
                .arg(
                    clap::Arg::with_name(DESCRIPTION_ARG)
                        .long(DESCRIPTION_ARG)
                        .value_name("TEXT")
                        .takes_value(true),
                )
                .arg(
                    clap::Arg::with_name(PAYMENT_METHOD_ARG)
                        .long(PAYMENT_METHOD_ARG)
                        .value_name("METHOD")
                        .takes_value(true)
                        .default_value("cash")
                        .possible_values(&POSSIBLE_PAYMENT_METHODS),
                ),
        )
        .get_matches()
}

fn category_id_arg() -> clap::Arg<'static, 'static> {
    clap::Arg::with_name(CATEGORY_ARG)
        .long(CATEGORY_ARG)
        .value_name("ID")
        .help("Category id")
        .takes_value(true)
        .required(true)
        .validator(validate_number::<i64>)
}

fn amount_arg(help: &'static str) -> clap::Arg<'static, 'static> {
    clap::Arg::with_name(AMOUNT_ARG)
        .long(AMOUNT_ARG)
        .value_name("AMOUNT")
        .help(help)
        .takes_value(true)
        .required(true)
        .validator(|value| {
            value
                .parse::<Decimal>()
                .map(|_| ())
                .map_err(|err| err.to_string())
        })
}

fn id_arg(help: &'static str) -> clap::Arg<'static, 'static> {
    clap::Arg::with_name(ID_ARG)
        .long(ID_ARG)
        .value_name("ID")
        .help(help)
        .takes_value(true)
        .required(true)
        .validator(validate_number::<i64>)
}

fn validate_number<T: std::str::FromStr>(value: String) -> std::result::Result<(), String>
where
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map(|_| ()).map_err(|err| err.to_string())
}

fn run_clap_matches(matches: clap::ArgMatches) -> Result<()> {
    let api_url = matches
        .value_of(API_URL_ARG)
        .expect("CLAP matches should have API_URL_ARG")
        .to_string();
    let session_file = PathBuf::from(
        matches
            .value_of(SESSION_FILE_ARG)
            .expect("CLAP matches should have SESSION_FILE_ARG"),
    );
    match matches.subcommand() {
        (LOGIN_COMMAND, Some(login_matches)) => run_login(&api_url, &session_file, login_matches),
        (LOGOUT_COMMAND, _) => run_logout(&session_file),
        (DASHBOARD_COMMAND, Some(dashboard_matches)) => {
            let trend_months = clap::value_t!(dashboard_matches.value_of(TREND_MONTHS_ARG), u32)
                .expect("CLAP matches should have valid TREND_MONTHS_ARG");
            let recent_limit = clap::value_t!(dashboard_matches.value_of(RECENT_ARG), usize)
                .expect("CLAP matches should have valid RECENT_ARG");
            let client = authenticated_client(&api_url, &session_file)?;
            DashboardReport::run(&client, trend_months, recent_limit)
        }
        (BUDGETS_COMMAND, _) => {
            BudgetStatusReport::run(&authenticated_client(&api_url, &session_file)?)
        }
        (ADD_BUDGET_COMMAND, Some(sub_matches)) => {
            run_add_budget(&authenticated_client(&api_url, &session_file)?, sub_matches)
        }
        (DELETE_BUDGET_COMMAND, Some(sub_matches)) => {
            run_delete_budget(&authenticated_client(&api_url, &session_file)?, sub_matches)
        }
        (CATEGORIES_COMMAND, _) => {
            run_list_categories(&authenticated_client(&api_url, &session_file)?)
        }
        (ADD_CATEGORY_COMMAND, Some(sub_matches)) => run_add_category(
            &authenticated_client(&api_url, &session_file)?,
            sub_matches,
        ),
        (DELETE_CATEGORY_COMMAND, Some(sub_matches)) => run_delete_category(
            &authenticated_client(&api_url, &session_file)?,
            sub_matches,
        ),
        (TRANSACTIONS_COMMAND, Some(sub_matches)) => run_list_transactions(
            &authenticated_client(&api_url, &session_file)?,
            sub_matches,
        ),
        (ADD_TRANSACTION_COMMAND, Some(sub_matches)) => run_add_transaction(
            &authenticated_client(&api_url, &session_file)?,
            sub_matches,
        ),
        _ => unreachable!("clap should have required a subcommand"),
    }
}

fn authenticated_client(api_url: &str, session_file: &Path) -> Result<FinanceApiClient> {
    FinanceApiClient::new(api_url, &Session::load(session_file)?)
}

fn run_login(api_url: &str, session_file: &Path, matches: &clap::ArgMatches) -> Result<()> {
    let username = matches
        .value_of(USERNAME_ARG)
        .expect("CLAP matches should have USERNAME_ARG");
    let password = matches
        .value_of(PASSWORD_ARG)
        .expect("CLAP matches should have PASSWORD_ARG");
    let client = FinanceApiClient::anonymous(api_url)?;
    println!("Logging in to {}...", api_url);
    let tokens = client.login(username, password)?;
    Session::new(tokens.access).save(session_file)?;
    println!("Logged in as {}.", username);
    Ok(())
}

fn run_logout(session_file: &Path) -> Result<()> {
    Session::clear(session_file)?;
    println!("Logged out.");
    Ok(())
}

fn run_list_categories(client: &FinanceApiClient) -> Result<()> {
    println!("Loading categories...");
    let categories = client.list_categories()?;
    if categories.is_empty() {
        println!("No categories yet; create one with the `add-category` subcommand.");
        return Ok(());
    }
    for (kind, heading) in &[
        (CategoryKind::Income, "Income categories:"),
        (CategoryKind::Expense, "Expense categories:"),
    ] {
        let of_kind: Vec<&Category> = categories
            .iter()
            .filter(|category| category.kind == *kind)
            .collect();
        if of_kind.is_empty() {
            continue;
        }
        println!();
        println!("{}", heading);
        for category in of_kind {
            println!(
                "  [{}] {:<20} {}  {}",
                category.id,
                category.name,
                category.color,
                category.icon.as_deref().unwrap_or("")
            );
        }
    }
    Ok(())
}

fn run_add_category(client: &FinanceApiClient, matches: &clap::ArgMatches) -> Result<()> {
    let kind = CategoryKind::from_str(
        matches
            .value_of(KIND_ARG)
            .expect("CLAP matches should have KIND_ARG"),
    )
    .expect("CLAP matches should have valid KIND_ARG");
    let category = client.create_category(&NewCategory {
        name: matches
            .value_of(NAME_ARG)
            .expect("CLAP matches should have NAME_ARG")
            .to_string(),
        kind,
        color: matches
            .value_of(COLOR_ARG)
            .expect("CLAP matches should have COLOR_ARG")
            .to_string(),
        icon: matches.value_of(ICON_ARG).map(str::to_string),
    })?;
    println!(
        "Created {} category [{}] {}.",
        category.kind, category.id, category.name
    );
    Ok(())
}

fn run_delete_category(client: &FinanceApiClient, matches: &clap::ArgMatches) -> Result<()> {
    let id = clap::value_t!(matches.value_of(ID_ARG), i64)
        .expect("CLAP matches should have valid ID_ARG");
    client.delete_category(CategoryId(id))?;
    println!("Deleted category {}.", id);
    Ok(())
}

fn run_list_transactions(client: &FinanceApiClient, matches: &clap::ArgMatches) -> Result<()> {
    let limit = if matches.is_present(LIMIT_ARG) {
        Some(
            clap::value_t!(matches.value_of(LIMIT_ARG), usize)
                .expect("CLAP matches should have valid LIMIT_ARG"),
        )
    } else {
        None
    };
    let snapshot = Snapshot::load(client)?;
    let joined = snapshot.joined()?;
    let formatter = AmountFormatter::new(snapshot.user.currency);
    println!();
    if joined.is_empty() {
        println!("No transactions yet; record one with the `add-transaction` subcommand.");
        return Ok(());
    }
    let mut records: Vec<&JoinedTransaction> = joined.iter().collect();
    records.sort_by(|a, b| b.date.cmp(&a.date));
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    print_transaction_lines(records, &formatter);
    Ok(())
}

fn run_add_transaction(client: &FinanceApiClient, matches: &clap::ArgMatches) -> Result<()> {
    let amount = Money::from_decimal(
        clap::value_t!(matches.value_of(AMOUNT_ARG), Decimal)
            .expect("CLAP matches should have valid AMOUNT_ARG"),
    );
    ensure!(!amount.is_negative(), "Amount may not be negative");
    let payment_method = PaymentMethod::from_str(
        matches
            .value_of(PAYMENT_METHOD_ARG)
            .expect("CLAP matches should have PAYMENT_METHOD_ARG"),
    )
    .expect("CLAP matches should have valid PAYMENT_METHOD_ARG");
    let transaction = client.create_transaction(&NewTransaction {
        category: CategoryId(
            clap::value_t!(matches.value_of(CATEGORY_ARG), i64)
                .expect("CLAP matches should have valid CATEGORY_ARG"),
        ),
        amount,
        description: matches
            .value_of(DESCRIPTION_ARG)
            .unwrap_or("")
            .to_string(),
        date: matches
            .value_of(DATE_ARG)
            .expect("CLAP matches should have DATE_ARG")
            .to_string(),
        payment_method,
    })?;
    println!(
        "Recorded transaction [{}] on {}.",
        transaction.id, transaction.date
    );
    Ok(())
}

fn run_add_budget(client: &FinanceApiClient, matches: &clap::ArgMatches) -> Result<()> {
    let amount = Money::from_decimal(
        clap::value_t!(matches.value_of(AMOUNT_ARG), Decimal)
            .expect("CLAP matches should have valid AMOUNT_ARG"),
    );
    ensure!(!amount.is_negative(), "Amount may not be negative");
    let month = clap::value_t!(matches.value_of(MONTH_ARG), u32)
        .expect("CLAP matches should have valid MONTH_ARG");
    let year = clap::value_t!(matches.value_of(YEAR_ARG), i32)
        .expect("CLAP matches should have valid YEAR_ARG");
    ensure!(
        (1000..=9999).contains(&year),
        format!("Year must be a four-digit year, got {}", year)
    );
    let period = MonthPeriod::new(month, year)?;
    let budget = client.create_budget(&NewBudget {
        category: CategoryId(
            clap::value_t!(matches.value_of(CATEGORY_ARG), i64)
                .expect("CLAP matches should have valid CATEGORY_ARG"),
        ),
        amount,
        month: period.month(),
        year: period.year(),
    })?;
    println!(
        "Created budget [{}] for {} {}.",
        budget.id,
        period.name(),
        period.year()
    );
    Ok(())
}

fn run_delete_budget(client: &FinanceApiClient, matches: &clap::ArgMatches) -> Result<()> {
    let id = clap::value_t!(matches.value_of(ID_ARG), i64)
        .expect("CLAP matches should have valid ID_ARG");
    client.delete_budget(BudgetId(id))?;
    println!("Deleted budget {}.", id);
    Ok(())
}

fn default_env<V: AsRef<OsStr>>(var_name: &str, default_value: V) {
    if let Err(env::VarError::NotPresent) = env::var(var_name) {
        env::set_var(var_name, default_value);
    }
}
