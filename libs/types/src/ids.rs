//! Venue-assigned identifier types
//!
//! Row identifiers are opaque strings minted by the venue; they are unique
//! within their table and within the database that hosts the account
//! (e.g. "MINIDEMO" or "U100D1" scoping). The terminal never generates them.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create from a venue-assigned identifier string
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id! {
    /// Unique identifier of a quoted instrument (Offers / Summary row key)
    OfferId
}

string_id! {
    /// Unique identifier of a trading account
    AccountId
}

string_id! {
    /// Unique identifier of an order
    OrderId
}

string_id! {
    /// Unique identifier of an open or closed position
    ///
    /// Closed positions keep the TradeID of the position they were closed
    /// from, so the key is shared between the Trades and ClosedTrades tables.
    TradeId
}

string_id! {
    /// Unique identifier of a venue message
    MessageId
}

string_id! {
    /// Identifier of the client request that produced an order
    RequestId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_construction() {
        let id = OfferId::new("EUR/USD");
        assert_eq!(id.as_str(), "EUR/USD");
        assert_eq!(id.to_string(), "EUR/USD");
    }

    #[test]
    fn test_id_equality() {
        assert_eq!(TradeId::new("38947"), TradeId::from("38947"));
        assert_ne!(TradeId::new("38947"), TradeId::new("38948"));
    }

    #[test]
    fn test_id_serialization_is_transparent() {
        let id = AccountId::new("U100D1-001");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"U100D1-001\"");

        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
