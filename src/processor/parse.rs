//! SET A 10
//! INR A
//! MOV A B
//! ADD B 5

use std::borrow::Cow;
use std::error;
use std::str::SplitWhitespace;
use std::{fmt, str::Lines};

use crate::processor::{Instruction, Opcode};
use crate::registers::{RegisterBank, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    InvalidInstruction,
    MissingOperand,
    TrailingOperand,
    InvalidImmediate,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::InvalidInstruction => f.write_str("failed to resolve instruction"),
            ParseErrorKind::MissingOperand => f.write_str("missing operand"),
            ParseErrorKind::TrailingOperand => f.write_str("unexpected trailing operand"),
            ParseErrorKind::InvalidImmediate => f.write_str("invalid immediate value"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    context: Option<Cow<'static, str>>,
    line_nr: usize,
}

impl ParseError {
    fn new<C, S>(kind: ParseErrorKind, context: C, line_nr: usize) -> Self
    where
        C: Into<Option<S>>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            kind,
            context: context.into().map(|inner| inner.into()),
            line_nr,
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(
                f,
                "error [ln: {}]: {} - {}",
                self.line_nr, self.kind, context
            )
        } else {
            write!(f, "error [ln: {}]: {}", self.line_nr, self.kind)
        }
    }
}

impl error::Error for ParseError {}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Parses line-oriented program text into ready-to-run instructions.
///
/// Register operands are resolved against `bank` while parsing, so parsing is
/// also the build phase: the returned instructions only need to be executed in
/// order.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lines: Lines<'a>,
    line_nr: usize,
    bank: &'a RegisterBank,
    instructions: Vec<Instruction>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for `data` which resolves register names against
    /// `bank`.
    pub fn new(data: &'a str, bank: &'a RegisterBank) -> Self {
        Self {
            lines: data.lines(),
            line_nr: 0,
            bank,
            instructions: Vec::new(),
        }
    }

    /// Consumes `self` and tries to parse the whole source into
    /// instructions.
    ///
    /// # Errors
    ///
    /// All errors which may occur are collected and returned at the end. Any
    /// error means the program must not run.
    pub fn parse(mut self) -> Result<Vec<Instruction>, Vec<ParseError>> {
        let mut errors = Vec::new();

        while let Some(res) = self.parse_next_line() {
            if let Err(err) = res {
                log::error!("{}", err);
                errors.push(err);
            }
        }

        if errors.is_empty() {
            Ok(self.instructions)
        } else {
            Err(errors)
        }
    }

    /// Tries to parse the next line. Each instruction should be located on
    /// it's own line.
    fn parse_next_line(&mut self) -> Option<Result<()>> {
        let line = self.lines.next()?.trim();
        self.line_nr += 1;

        if line.is_empty() || line.starts_with('#') {
            // Comment or empty line; skip
            Some(Ok(()))
        } else {
            // Line is an instruction.
            Some(self.parse_instruction(line))
        }
    }

    /// Tries to parse a line as an instruction invocation and builds it
    /// against the bank.
    ///
    /// # Examples
    ///
    /// - `SET A 10`
    /// - `RST`
    fn parse_instruction(&mut self, line: &str) -> Result<()> {
        let mut tokens = line.split_whitespace();

        let mnemonic = match tokens.next() {
            Some(token) => token,
            None => return Ok(()),
        };

        let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::InvalidInstruction,
                format!("no instruction matching `{}` was found", mnemonic),
                self.line_nr,
            )
        })?;

        log::debug!("[{}] Found instruction {}", self.line_nr, opcode);

        let instruction = match opcode {
            Opcode::SET => {
                let register = self.operand(&mut tokens, opcode)?;
                let value = self.immediate(&mut tokens, opcode)?;
                Instruction::set(register, value, self.bank)
            }
            Opcode::ADD => {
                let register = self.operand(&mut tokens, opcode)?;
                let value = self.immediate(&mut tokens, opcode)?;
                Instruction::add(register, value, self.bank)
            }
            Opcode::ADR => {
                let augend = self.operand(&mut tokens, opcode)?;
                let addend = self.operand(&mut tokens, opcode)?;
                Instruction::adr(augend, addend, self.bank)
            }
            Opcode::INR => Instruction::inr(self.operand(&mut tokens, opcode)?, self.bank),
            Opcode::DCR => Instruction::dcr(self.operand(&mut tokens, opcode)?, self.bank),
            Opcode::MOV => {
                let src = self.operand(&mut tokens, opcode)?;
                let dest = self.operand(&mut tokens, opcode)?;
                Instruction::mov(src, dest, self.bank)
            }
            Opcode::RST => Instruction::rst(),
        };

        self.finish_line(&mut tokens, opcode)?;
        self.instructions.push(instruction);

        Ok(())
    }

    /// Takes the next operand token of the line.
    fn operand<'t>(&self, tokens: &mut SplitWhitespace<'t>, opcode: Opcode) -> Result<&'t str> {
        tokens.next().ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::MissingOperand,
                format!("{} expects another operand", opcode),
                self.line_nr,
            )
        })
    }

    /// Takes the next operand token and parses it as an immediate integer.
    fn immediate(&self, tokens: &mut SplitWhitespace<'_>, opcode: Opcode) -> Result<Value> {
        let token = self.operand(tokens, opcode)?;

        token.parse().map_err(|_| {
            ParseError::new(
                ParseErrorKind::InvalidImmediate,
                format!("`{}` is not an integer", token),
                self.line_nr,
            )
        })
    }

    /// Asserts that the line holds no further tokens.
    fn finish_line(&self, tokens: &mut SplitWhitespace<'_>, opcode: Opcode) -> Result<()> {
        match tokens.next() {
            Some(extra) => Err(ParseError::new(
                ParseErrorKind::TrailingOperand,
                format!("{} does not take `{}`", opcode, extra),
                self.line_nr,
            )),
            None => Ok(()),
        }
    }
}
