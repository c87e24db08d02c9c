use serde::{Deserialize, Serialize};

/// A watch-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: Option<i64>,
    pub symbol: String,
    pub name: String,
    pub exchange: String,
}

impl Stock {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, exchange: impl Into<String>) -> Self {
        Self {
            id: None,
            symbol: symbol.into(),
            name: name.into(),
            exchange: exchange.into(),
        }
    }
}

impl std::fmt::Display for Stock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})[{}]", self.name, self.symbol, self.exchange)
    }
}
