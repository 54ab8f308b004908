use crate::registers::{Register, RegisterBank, RegisterRef, Value};
use log::*;

pub mod parse;

macro_rules! opcodes {
    ( $( $( #[doc = $doc:expr] )+ $name:ident , )+ ) => {
        /// Defines the instruction mnemonics.
        /// All instructions operate on named registers, without memory
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Opcode {
            $(
                $( #[doc = $doc] )+
                $name ,
            )+
        }

        impl Opcode {
            pub const ALL: &'static [Self] = &[
                $( Self::$name , )+
            ];

            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name) , )+
                }
            }
        }

        impl ::std::fmt::Display for Opcode {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $( Self::$name => f.write_str(stringify!($name)) , )+
                }
            }
        }
    }
}

opcodes! {
    /// Store an immediate into a register
    /// @param register The target register
    /// @param value The value to store
    SET,
    /// Add an immediate to a register
    /// @param register The target register
    /// @param value The value to add
    ADD,
    /// Add the second register into the first
    ADR,
    /// Increment a register by one
    INR,
    /// Decrement a register by one
    DCR,
    /// Copy the first register into the second
    MOV,
    /// Reset every register in the bank to zero
    RST,
}

impl Opcode {
    /// Resolves a mnemonic to its opcode. Matching is case-sensitive
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|opcode| opcode.name() == mnemonic)
    }
}

/// A fully constructed, ready-to-run operation.
///
/// Register operands are resolved against the bank when the instruction is
/// built, not when it runs. A name that fails to resolve leaves a hole in the
/// instruction; executing such an instruction touches nothing. Executing the
/// same instruction twice is well-defined and re-applies its effect to the
/// current register state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `SET register value`
    Set {
        register: Option<RegisterRef>,
        value: Value,
    },
    /// `ADD register value`
    Add {
        register: Option<RegisterRef>,
        value: Value,
    },
    /// `ADR augend addend`
    Adr {
        augend: Option<RegisterRef>,
        addend: Option<RegisterRef>,
    },
    /// `INR register`
    Inr { register: Option<RegisterRef> },
    /// `DCR register`
    Dcr { register: Option<RegisterRef> },
    /// `MOV src dest`
    Mov {
        src: Option<RegisterRef>,
        dest: Option<RegisterRef>,
    },
    /// `RST`
    Rst,
}

/// Reads the current value behind a resolved reference, if both the reference
/// and the register still exist
fn read(register: &Option<RegisterRef>, bank: &RegisterBank) -> Option<Value> {
    bank.get(register.as_ref()?.name()).map(|cell| cell.value)
}

/// Dereferences a resolved reference for writing
fn write<'b>(
    register: &Option<RegisterRef>,
    bank: &'b mut RegisterBank,
) -> Option<&'b mut Register> {
    bank.get_mut(register.as_ref()?.name())
}

impl Instruction {
    /// Builds `SET register value`
    pub fn set(register: &str, value: Value, bank: &RegisterBank) -> Self {
        Self::Set {
            register: bank.resolve(register),
            value,
        }
    }

    /// Builds `ADD register value`
    pub fn add(register: &str, value: Value, bank: &RegisterBank) -> Self {
        Self::Add {
            register: bank.resolve(register),
            value,
        }
    }

    /// Builds `ADR augend addend`
    pub fn adr(augend: &str, addend: &str, bank: &RegisterBank) -> Self {
        Self::Adr {
            augend: bank.resolve(augend),
            addend: bank.resolve(addend),
        }
    }

    /// Builds `INR register`
    pub fn inr(register: &str, bank: &RegisterBank) -> Self {
        Self::Inr {
            register: bank.resolve(register),
        }
    }

    /// Builds `DCR register`
    pub fn dcr(register: &str, bank: &RegisterBank) -> Self {
        Self::Dcr {
            register: bank.resolve(register),
        }
    }

    /// Builds `MOV src dest`
    pub fn mov(src: &str, dest: &str, bank: &RegisterBank) -> Self {
        Self::Mov {
            src: bank.resolve(src),
            dest: bank.resolve(dest),
        }
    }

    /// Builds `RST`
    pub fn rst() -> Self {
        Self::Rst
    }

    /// The opcode this instruction was built for
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Set { .. } => Opcode::SET,
            Self::Add { .. } => Opcode::ADD,
            Self::Adr { .. } => Opcode::ADR,
            Self::Inr { .. } => Opcode::INR,
            Self::Dcr { .. } => Opcode::DCR,
            Self::Mov { .. } => Opcode::MOV,
            Self::Rst => Opcode::RST,
        }
    }

    /// Applies the instruction to `bank`.
    ///
    /// Never fails: an instruction with an unresolved register operand, or
    /// whose register was removed after construction, does nothing.
    pub fn execute(&self, bank: &mut RegisterBank) {
        match self {
            Self::Set { register, value } => {
                if let Some(cell) = write(register, bank) {
                    cell.value = *value;

                    debug!("SET {}", value);
                }
            }
            Self::Add { register, value } => {
                if let Some(cell) = write(register, bank) {
                    let result = cell.value.wrapping_add(*value);

                    debug!("ADD {} {}: {}", cell.value, value, result);
                    cell.value = result;
                }
            }
            Self::Adr { augend, addend } => {
                // read the addend first so `ADR r r` doubles r
                if let Some(operand) = read(addend, bank) {
                    if let Some(cell) = write(augend, bank) {
                        let result = cell.value.wrapping_add(operand);

                        debug!("ADR {} {}: {}", cell.value, operand, result);
                        cell.value = result;
                    }
                }
            }
            Self::Inr { register } => {
                if let Some(cell) = write(register, bank) {
                    cell.value = cell.value.wrapping_add(1);

                    debug!("INR: {}", cell.value);
                }
            }
            Self::Dcr { register } => {
                if let Some(cell) = write(register, bank) {
                    cell.value = cell.value.wrapping_sub(1);

                    debug!("DCR: {}", cell.value);
                }
            }
            Self::Mov { src, dest } => {
                // src is read at execution time, not at construction time
                if let Some(value) = read(src, bank) {
                    if let Some(cell) = write(dest, bank) {
                        cell.value = value;

                        debug!("MOV {}", value);
                    }
                }
            }
            Self::Rst => {
                bank.reset_all();

                debug!("RST");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;

    fn bank() -> RegisterBank {
        let mut bank = RegisterBank::new();
        bank.add("A");
        bank.add("B");
        bank
    }

    #[test]
    fn test_set() -> Result<()> {
        let mut bank = bank();

        Instruction::set("A", 42, &bank).execute(&mut bank);

        assert_eq!(bank.get("A").unwrap().value, 42);

        Ok(())
    }

    #[test]
    fn test_inr_dcr_idempotent() -> Result<()> {
        let mut bank = bank();
        Instruction::set("A", 7, &bank).execute(&mut bank);

        Instruction::inr("A", &bank).execute(&mut bank);
        Instruction::dcr("A", &bank).execute(&mut bank);

        assert_eq!(bank.get("A").unwrap().value, 7);

        Ok(())
    }

    #[test]
    fn test_add_additivity() -> Result<()> {
        let mut twice = bank();
        Instruction::add("A", 3, &twice).execute(&mut twice);
        Instruction::add("A", 4, &twice).execute(&mut twice);

        let mut once = bank();
        Instruction::add("A", 7, &once).execute(&mut once);

        assert_eq!(twice, once);

        Ok(())
    }

    #[test]
    fn test_mov_copies_at_execution() -> Result<()> {
        let mut bank = bank();
        Instruction::set("A", 11, &bank).execute(&mut bank);

        Instruction::mov("A", "B", &bank).execute(&mut bank);
        assert_eq!(bank.get("B").unwrap().value, 11);

        // a later mutation of the source does not touch the destination
        Instruction::set("A", 99, &bank).execute(&mut bank);
        assert_eq!(bank.get("B").unwrap().value, 11);

        Ok(())
    }

    #[test]
    fn test_adr_self_add() -> Result<()> {
        let mut bank = bank();
        Instruction::set("A", 5, &bank).execute(&mut bank);

        Instruction::adr("A", "A", &bank).execute(&mut bank);

        assert_eq!(bank.get("A").unwrap().value, 10);

        Ok(())
    }

    #[test]
    fn test_rst() -> Result<()> {
        let mut bank = bank();
        Instruction::set("A", 3, &bank).execute(&mut bank);
        Instruction::set("B", 4, &bank).execute(&mut bank);

        Instruction::rst().execute(&mut bank);

        assert_eq!(bank.names(), vec!["A", "B"]);
        assert_eq!(bank.get("A").unwrap().value, 0);
        assert_eq!(bank.get("B").unwrap().value, 0);

        Ok(())
    }

    #[test]
    fn test_unresolved_register_is_noop() -> Result<()> {
        let mut bank = bank();
        let before = bank.clone();

        Instruction::set("Z", 42, &bank).execute(&mut bank);
        Instruction::adr("A", "Z", &bank).execute(&mut bank);
        Instruction::mov("Z", "B", &bank).execute(&mut bank);

        assert_eq!(bank, before);

        Ok(())
    }

    #[test]
    fn test_removed_after_build_is_noop() -> Result<()> {
        let mut bank = bank();
        let instruction = Instruction::inr("A", &bank);

        bank.remove("A");
        instruction.execute(&mut bank);

        assert_eq!(bank.get("A"), None);
        assert_eq!(bank.get("B").unwrap().value, 0);

        Ok(())
    }

    #[test]
    fn test_reexecution_reapplies() -> Result<()> {
        let mut bank = bank();
        let instruction = Instruction::add("A", 2, &bank);

        instruction.execute(&mut bank);
        instruction.execute(&mut bank);

        assert_eq!(bank.get("A").unwrap().value, 4);

        Ok(())
    }

    #[test]
    fn test_wrapping_overflow() -> Result<()> {
        let mut bank = bank();
        Instruction::set("A", Value::MAX, &bank).execute(&mut bank);

        Instruction::inr("A", &bank).execute(&mut bank);

        assert_eq!(bank.get("A").unwrap().value, Value::MIN);

        Ok(())
    }

    #[test]
    fn test_reference_scenario() -> Result<()> {
        let mut bank = bank();

        Instruction::set("A", 10, &bank).execute(&mut bank);
        assert_eq!(bank.get("A").unwrap().value, 10);

        Instruction::inr("A", &bank).execute(&mut bank);
        assert_eq!(bank.get("A").unwrap().value, 11);

        Instruction::mov("A", "B", &bank).execute(&mut bank);
        assert_eq!(bank.get("B").unwrap().value, 11);

        Instruction::add("B", 5, &bank).execute(&mut bank);
        assert_eq!(bank.get("B").unwrap().value, 16);

        Ok(())
    }

    #[test]
    fn test_opcode_mnemonics() -> Result<()> {
        assert_eq!(Opcode::from_mnemonic("SET"), Some(Opcode::SET));
        assert_eq!(Opcode::from_mnemonic("set"), None);
        assert_eq!(Opcode::from_mnemonic("NOP"), None);
        assert_eq!(Opcode::ALL.len(), 7);
        assert_eq!(Opcode::MOV.to_string(), "MOV");

        Ok(())
    }
}
