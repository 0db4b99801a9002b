//! Ticker symbol normalisation.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TickerError {
    #[error("ticker symbol is empty")]
    Empty,

    #[error("ticker symbol {symbol:?} contains invalid character {ch:?}")]
    InvalidCharacter { symbol: String, ch: char },
}

/// Trims and upper-cases a free-text ticker (e.g. `" bbca.jk "` -> `"BBCA.JK"`).
///
/// Accepts ASCII alphanumerics plus the punctuation used by exchange-suffixed,
/// index and currency symbols (`.`, `-`, `^`, `=`).
pub fn normalize_ticker(input: &str) -> Result<String, TickerError> {
    let symbol = input.trim().to_ascii_uppercase();
    if symbol.is_empty() {
        return Err(TickerError::Empty);
    }

    if let Some(ch) = symbol
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
    {
        return Err(TickerError::InvalidCharacter { symbol, ch });
    }

    Ok(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_and_trims() {
        assert_eq!(normalize_ticker("  aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_ticker("bbca.jk").unwrap(), "BBCA.JK");
        assert_eq!(normalize_ticker("^gspc").unwrap(), "^GSPC");
        assert_eq!(normalize_ticker("brk-b").unwrap(), "BRK-B");
    }

    #[test]
    fn rejects_blank_and_garbage() {
        assert_eq!(normalize_ticker("   "), Err(TickerError::Empty));
        assert!(matches!(
            normalize_ticker("AA PL"),
            Err(TickerError::InvalidCharacter { ch: ' ', .. })
        ));
        assert!(normalize_ticker("AAPL/").is_err());
    }
}
