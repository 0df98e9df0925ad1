//! `conform schema`.

use conform_analysis::reporters::schema_json;
use conform_core::constants::EXIT_PASS;

use crate::error::CliError;

pub fn run() -> Result<i32, CliError> {
    println!("{}", schema_json()?);
    Ok(EXIT_PASS)
}
