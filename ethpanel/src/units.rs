//! Ether amounts.
//!
//! Amounts are held in wei as `U256`. User-facing amounts are decimal ether strings.
use std::fmt;

use ethers::utils::{format_ether, parse_ether};

pub use ethers::types::U256;

/// Number of decimals of one ether.
pub const ETHER_DECIMALS: usize = 18;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    InvalidCharacter(char),
    TooPrecise,
    Invalid(String),
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Amount is empty"),
            Self::InvalidCharacter(c) => write!(f, "Invalid character '{}' in amount", c),
            Self::TooPrecise => write!(f, "Amount has more than {} decimals", ETHER_DECIMALS),
            Self::Invalid(e) => write!(f, "Not a decimal amount: {}", e),
        }
    }
}

impl std::error::Error for ParseAmountError {}

/// Parses a decimal ether amount, e.g. `"1.5"` or `".25"`, into wei.
///
/// Only digits and a single decimal point are accepted: no sign, no exponent, no digit
/// separator. Amounts with more decimals than one wei are rejected instead of truncated.
pub fn parse_ether_amount(s: &str) -> Result<U256, ParseAmountError> {
    let s = s.trim();
    if s.is_empty() || s == "." {
        return Err(ParseAmountError::Empty);
    }
    if let Some(c) = s.chars().find(|c| !c.is_ascii_digit() && *c != '.') {
        return Err(ParseAmountError::InvalidCharacter(c));
    }
    let amount = match s.split_once('.') {
        Some((_, decimals)) if decimals.contains('.') => {
            return Err(ParseAmountError::InvalidCharacter('.'));
        }
        Some((_, decimals)) if decimals.len() > ETHER_DECIMALS => {
            return Err(ParseAmountError::TooPrecise);
        }
        // ".25" and "2." are written "0.25" and "2.0".
        Some((int, decimals)) => format!(
            "{}.{}",
            if int.is_empty() { "0" } else { int },
            if decimals.is_empty() { "0" } else { decimals }
        ),
        None => s.to_string(),
    };
    parse_ether(amount).map_err(|e| ParseAmountError::Invalid(e.to_string()))
}

/// Shortest decimal ether representation of an amount in wei, e.g. `1.5` or `0`.
pub fn format_ether_amount(wei: U256) -> String {
    let ether = format_ether(wei);
    match ether.split_once('.') {
        Some((int, decimals)) => {
            let decimals = decimals.trim_end_matches('0');
            if decimals.is_empty() {
                int.to_string()
            } else {
                format!("{}.{}", int, decimals)
            }
        }
        None => ether,
    }
}
