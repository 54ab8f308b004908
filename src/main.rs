use std::env;
use std::fs;

use color_eyre::eyre::{eyre, Result, WrapErr};
use log::*;
use micro::processor::parse::Parser;
use micro::registers::RegisterBank;
use simple_logger::SimpleLogger;

/// The registers available to every program
const REGISTERS: &[&str] = &["A", "B", "C", "D"];

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap(); // logging

    let arg = env::args()
        .nth(1)
        .ok_or_else(|| eyre!("usage: micro FILEPATH=<program>"))?;
    let path = arg.strip_prefix("FILEPATH=").unwrap_or(&arg);

    let source = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read program `{}`", path))?;

    let mut bank = RegisterBank::new();
    for name in REGISTERS {
        bank.add(name);
    }

    let instructions = Parser::new(&source, &bank)
        .parse()
        .map_err(|errors| eyre!("program contains {} invalid line(s)", errors.len()))?;

    for instruction in &instructions {
        instruction.execute(&mut bank);
    }

    for name in bank.names() {
        if let Some(register) = bank.get(name) {
            info!("{} = {}", name, register.value);
        }
    }

    Ok(())
}
