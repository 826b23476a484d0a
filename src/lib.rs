#![warn(clippy::all)]

#[macro_use]
extern crate error_chain;

mod aggregate;
mod amount_formatter;
mod budget_status;
mod cli;
mod constants;
mod dashboard;
mod finance_client;
mod models;
mod session;
mod snapshot;
mod types;
mod utilities;

mod errors {
    error_chain! {
        errors {
            AuthenticationRequired {
                description("authentication required")
                display("Not logged in (run the `login` subcommand first)")
            }
            Validation(detail: String) {
                description("validation failed")
                display("Validation failed: {}", detail)
            }
            Integrity(detail: String) {
                description("integrity constraint violated")
                display("{}", detail)
            }
        }
    }
}

pub use cli::run;
