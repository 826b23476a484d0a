#![warn(clippy::all)]

use std::process::exit;

fn main() {
    if let Err(error) = finsight::run() {
        eprintln!("Error: {}", error);
        for cause in error.iter().skip(1) {
            eprintln!("  Caused by: {}", cause);
        }
        exit(1);
    }
}
