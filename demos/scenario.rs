use color_eyre::eyre::Result;
use log::*;
use micro::processor::Instruction;
use micro::registers::RegisterBank;
use simple_logger::SimpleLogger;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new().init().unwrap(); // logging

    let mut bank = RegisterBank::new();
    bank.add("A");
    bank.add("B");

    let program = [
        Instruction::set("A", 10, &bank),
        Instruction::inr("A", &bank),
        Instruction::mov("A", "B", &bank),
        Instruction::add("B", 5, &bank),
    ];

    for instruction in &program {
        instruction.execute(&mut bank);
    }

    for name in bank.names() {
        if let Some(register) = bank.get(name) {
            info!("{} = {}", name, register.value);
        }
    }

    Ok(())
}
