//! Station console commands, one per input line.

use core::str::FromStr;

use thiserror::Error;

use scanstock_inventory::{DraftField, InventoryTable};

pub const HELP: &str = "\
commands:
  scan <barcode>        reconcile a scanned barcode
  existing              use the found record
  new                   add a new record instead
  set <field> <value>   edit a draft field (name, price, qty, size, color, grade, notes, ...)
  + [n] / - [n]         change the quantity by n (default 1)
  save                  save the current edit or draft
  create                save the current draft as a new record without scanning
  cancel                abandon the current edit or draft
  show                  print the session as JSON
  table <name>          switch table (new, used, generic)
  help                  print this message
  quit                  exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan(String),
    UseExisting,
    AddNew,
    Set(DraftField, String),
    Adjust(i64),
    Save,
    Create,
    Cancel,
    Show,
    Table(InventoryTable),
    Help,
    Quit,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("{0}")]
    Invalid(String),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(rest) = line.strip_prefix('+') {
        return amount(rest).map(|n| Some(Command::Adjust(n)));
    }
    if let Some(rest) = line.strip_prefix('-') {
        return amount(rest).map(|n| Some(Command::Adjust(-n)));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "scan" | "s" => Command::Scan(required("scan", rest)?.to_string()),
        "existing" | "use" => Command::UseExisting,
        "new" | "add" => Command::AddNew,
        "set" => {
            let (field, value) = match required("set", rest)?.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            let field = DraftField::from_str(field).map_err(|e| ParseError::Invalid(e.to_string()))?;
            Command::Set(field, value.to_string())
        }
        "save" => Command::Save,
        "create" => Command::Create,
        "cancel" => Command::Cancel,
        "show" => Command::Show,
        "table" => {
            let table = InventoryTable::from_str(required("table", rest)?)
                .map_err(|e| ParseError::Invalid(e.to_string()))?;
            Command::Table(table)
        }
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn required<'a>(command: &'static str, rest: &'a str) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

fn amount(rest: &str) -> Result<i64, ParseError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Ok(1);
    }
    rest.parse::<u32>()
        .map(i64::from)
        .map_err(|_| ParseError::InvalidAmount(rest.to_string()))
}
