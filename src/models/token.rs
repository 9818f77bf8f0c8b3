use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of tracked assets. Anything else is rejected at the API
/// boundary, never at match time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Token {
    Eth,
    Matic,
}

impl Token {
    pub const ALL: [Token; 2] = [Token::Eth, Token::Matic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Token::Eth => "ETH",
            Token::Matic => "MATIC",
        }
    }

    /// Mainnet ERC-20 contract used to quote the token in USD.
    pub fn contract_address(&self) -> &'static str {
        match self {
            // WETH stands in for native ETH on the quote API
            Token::Eth => "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            Token::Matic => "0x7d1afa7b718fb893db30a3abc0cfc608aacfebb0",
        }
    }

    pub fn parse(s: &str) -> Option<Token> {
        match s.trim().to_uppercase().as_str() {
            "ETH" => Some(Token::Eth),
            "MATIC" => Some(Token::Matic),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
