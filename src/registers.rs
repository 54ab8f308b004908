use std::collections::HashMap;

use log::*;

/// Width of a single register cell
pub type Value = i64; // machine word, wrapping on overflow

/// A named mutable storage cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Register {
    /// The current content of the cell
    pub value: Value,
}

/// Handle to a register inside a [`RegisterBank`].
///
/// Produced by [`RegisterBank::resolve`] when the named register exists, and
/// dereferenced again at execution time. A register removed in between simply
/// fails the second lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegisterRef(String);

impl RegisterRef {
    /// The name this handle was resolved from
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Owns every register of a simulation run, keyed by case-sensitive name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterBank {
    registers: HashMap<String, Register>,
}

impl RegisterBank {
    /// Creates an empty bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a register with value 0 under `name`.
    /// Re-adding an existing name replaces it with a fresh zeroed register.
    pub fn add(&mut self, name: &str) {
        self.registers.insert(name.to_owned(), Register::default());
    }

    /// Removes the register under `name` if present; unknown names are ignored
    pub fn remove(&mut self, name: &str) {
        self.registers.remove(name);
    }

    /// Looks up a register by name
    pub fn get(&self, name: &str) -> Option<&Register> {
        self.registers.get(name)
    }

    /// Looks up a register by name for mutation
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Register> {
        self.registers.get_mut(name)
    }

    /// Resolves `name` into a handle usable at execution time.
    ///
    /// Returns `None` when no register of that name exists; instructions built
    /// from such a handle execute as no-ops.
    pub fn resolve(&self, name: &str) -> Option<RegisterRef> {
        if self.registers.contains_key(name) {
            Some(RegisterRef(name.to_owned()))
        } else {
            warn!("Unknown register `{}`", name);
            None
        }
    }

    /// Sets every present register back to 0 without removing any
    pub fn reset_all(&mut self) {
        for register in self.registers.values_mut() {
            register.value = 0;
        }
    }

    /// All register names, sorted for stable output
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.registers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn test_add_starts_at_zero() -> Result<()> {
        let mut bank = RegisterBank::new();
        bank.add("A");
        assert_eq!(bank.get("A"), Some(&Register { value: 0 }));

        Ok(())
    }

    #[test]
    fn test_re_add_resets() -> Result<()> {
        let mut bank = RegisterBank::new();
        bank.add("A");
        bank.get_mut("A").unwrap().value = 42;
        bank.add("A");
        assert_eq!(bank.get("A").unwrap().value, 0);

        Ok(())
    }

    #[test]
    fn test_remove_absent_is_noop() -> Result<()> {
        let mut bank = RegisterBank::new();
        bank.add("A");
        bank.remove("B");
        assert_eq!(bank.names(), vec!["A"]);

        Ok(())
    }

    #[test]
    fn test_get_absent() -> Result<()> {
        let bank = RegisterBank::new();
        assert_eq!(bank.get("A"), None);

        Ok(())
    }

    #[test]
    fn test_resolve() -> Result<()> {
        let mut bank = RegisterBank::new();
        bank.add("A");
        assert_eq!(bank.resolve("A").unwrap().name(), "A");
        assert_eq!(bank.resolve("Z"), None);
        // case-sensitive
        assert_eq!(bank.resolve("a"), None);

        Ok(())
    }

    #[test]
    fn test_reset_all_keeps_registers() -> Result<()> {
        let mut bank = RegisterBank::new();
        bank.add("A");
        bank.add("B");
        bank.get_mut("A").unwrap().value = 3;
        bank.get_mut("B").unwrap().value = 4;

        bank.reset_all();

        assert_eq!(bank.names(), vec!["A", "B"]);
        assert_eq!(bank.get("A").unwrap().value, 0);
        assert_eq!(bank.get("B").unwrap().value, 0);

        Ok(())
    }
}
