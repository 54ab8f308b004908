use color_eyre::eyre::{eyre, Result};
use log::*;
use micro::processor::parse::Parser;
use micro::registers::RegisterBank;
use simple_logger::SimpleLogger;

/// A small program against registers A and B
const PROGRAM: &str = r#"
    # reference scenario
    SET A 10
    INR A
    MOV A B
    ADD B 5
"#;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new().init().unwrap(); // logging

    let mut bank = RegisterBank::new();
    bank.add("A");
    bank.add("B");

    let instructions = Parser::new(PROGRAM, &bank)
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
