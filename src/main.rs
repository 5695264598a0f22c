//! sheetgrid CLI - browse a published spreadsheet from the terminal

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::process::ExitCode;

fn main() -> ExitCode {
    sheetgrid::cli::run()
}
