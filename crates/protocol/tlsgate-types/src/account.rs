//! Authorized account proxies.

use serde::{Deserialize, Serialize};
use tlsgate_crypto::Address;

/// Numeric gateway identifier assigned by the manager.
pub type GatewayId = u64;

/// An account proxy allowed to use a gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AuthorizedAccount {
    /// Account proxy address
    pub account: Address,
    /// Gateway the account is bound to
    pub gateway: Address,
    /// Whether the account may submit and receive callbacks
    pub enabled: bool,
}

impl AuthorizedAccount {
    /// Create an enabled account bound to `gateway`.
    pub fn new(account: Address, gateway: Address) -> Self {
        Self {
            account,
            gateway,
            enabled: true,
        }
    }

    /// Whether this account may act on `gateway`.
    pub fn allows(&self, gateway: &Address) -> bool {
        self.enabled && self.gateway == *gateway
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows() {
        let gateway = Address([1u8; 20]);
        let other = Address([2u8; 20]);
        let mut account = AuthorizedAccount::new(Address([9u8; 20]), gateway);

        assert!(account.allows(&gateway));
        assert!(!account.allows(&other));

        account.enabled = false;
        assert!(!account.allows(&gateway));
    }
}
