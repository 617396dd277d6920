//! Read-only wallet shell.
//!
//! The game only shows which account is connected and what it holds. Nothing
//! here signs, sends, or otherwise touches funds; the provider does all the
//! talking to the chain.

use std::collections::VecDeque;

use tracing::{info, warn};

use crate::error::WalletError;

const WEI_PER_DISPLAY_UNIT: u128 = 100_000_000_000_000;
const DISPLAY_UNITS_PER_ETHER: u128 = 10_000;
const FALLBACK_BALANCE: &str = "0";
const REFERRAL_CODE_LEN: usize = 8;

/// External wallet provider, e.g. a browser extension bridge.
pub trait WalletProvider {
    /// Whether a provider is installed at all. Probed once at startup.
    fn is_available(&self) -> bool;

    /// Requests account access. `Ok(None)` means the provider exposed no accounts.
    fn connect(&mut self) -> Result<Option<String>, WalletError>;

    /// Latest balance of `address` as a `0x`-prefixed hex wei quantity.
    fn balance_wei(&self, address: &str) -> Result<String, WalletError>;

    /// Drains the most recent account-switch notification, if any.
    fn poll_accounts_changed(&mut self) -> Option<Vec<String>>;
}

/// Stand-in used when no provider is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProvider;

impl WalletProvider for NoProvider {
    fn is_available(&self) -> bool {
        false
    }

    fn connect(&mut self) -> Result<Option<String>, WalletError> {
        Err(WalletError::Unavailable)
    }

    fn balance_wei(&self, _address: &str) -> Result<String, WalletError> {
        Err(WalletError::Unavailable)
    }

    fn poll_accounts_changed(&mut self) -> Option<Vec<String>> {
        None
    }
}

/// Provider with a fixed account and balance, configured up front.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    address: Option<String>,
    balance_hex: String,
    account_changes: VecDeque<Vec<String>>,
}

impl StaticProvider {
    #[must_use]
    pub fn new(address: Option<String>, balance_hex: impl Into<String>) -> Self {
        Self {
            address,
            balance_hex: balance_hex.into(),
            account_changes: VecDeque::new(),
        }
    }

    /// Queues an account-switch notification for the next poll.
    pub fn push_accounts_change(&mut self, accounts: Vec<String>) {
        self.account_changes.push_back(accounts);
    }
}

impl WalletProvider for StaticProvider {
    fn is_available(&self) -> bool {
        true
    }

    fn connect(&mut self) -> Result<Option<String>, WalletError> {
        Ok(self.address.clone())
    }

    fn balance_wei(&self, _address: &str) -> Result<String, WalletError> {
        Ok(self.balance_hex.clone())
    }

    fn poll_accounts_changed(&mut self) -> Option<Vec<String>> {
        self.account_changes.pop_front()
    }
}

/// What the UI shows about the wallet.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum WalletStatus {
    /// No provider installed; the UI shows an install prompt.
    Unavailable,
    Disconnected,
    Connected { address: String, balance: String },
}

/// Account changes reported by the provider after connecting.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum WalletEvent {
    AccountChanged(String),
    Disconnected,
}

/// Connection state on top of a provider.
pub struct WalletSession {
    provider: Box<dyn WalletProvider>,
    status: WalletStatus,
}

impl WalletSession {
    /// Probes the provider once and starts disconnected (or unavailable).
    #[must_use]
    pub fn new(provider: Box<dyn WalletProvider>) -> Self {
        let status = if provider.is_available() {
            WalletStatus::Disconnected
        } else {
            WalletStatus::Unavailable
        };

        Self { provider, status }
    }

    #[must_use]
    pub fn status(&self) -> &WalletStatus {
        &self.status
    }

    #[must_use]
    pub fn address(&self) -> Option<&str> {
        match &self.status {
            WalletStatus::Connected { address, .. } => Some(address),
            _ => None,
        }
    }

    /// Single connect attempt; on failure the session stays disconnected.
    pub fn connect(&mut self) -> Result<&WalletStatus, WalletError> {
        if self.status == WalletStatus::Unavailable {
            return Err(WalletError::Unavailable);
        }

        let Some(address) = self.provider.connect()? else {
            return Err(WalletError::Rejected);
        };

        info!(address = %short_address(&address), "wallet connected");
        let balance = self.fetch_balance(&address);
        self.status = WalletStatus::Connected { address, balance };
        Ok(&self.status)
    }

    pub fn disconnect(&mut self) {
        if matches!(self.status, WalletStatus::Connected { .. }) {
            info!("wallet disconnected");
            self.status = WalletStatus::Disconnected;
        }
    }

    /// Checks the provider for an account switch and applies it.
    pub fn poll(&mut self) -> Option<WalletEvent> {
        let accounts = self.provider.poll_accounts_changed()?;
        self.handle_accounts_changed(&accounts)
    }

    /// Applies an account list reported by the provider.
    ///
    /// An empty list disconnects; a different first account replaces the
    /// current one and refreshes its balance. Ignored while not connected.
    pub fn handle_accounts_changed(&mut self, accounts: &[String]) -> Option<WalletEvent> {
        let current = self.address()?.to_owned();

        let Some(next) = accounts.first() else {
            info!("wallet disconnected by provider");
            self.status = WalletStatus::Disconnected;
            return Some(WalletEvent::Disconnected);
        };

        if *next == current {
            return None;
        }

        info!(address = %short_address(next), "wallet account changed");
        let balance = self.fetch_balance(next);
        self.status = WalletStatus::Connected {
            address: next.clone(),
            balance,
        };
        Some(WalletEvent::AccountChanged(next.clone()))
    }

    fn fetch_balance(&self, address: &str) -> String {
        match self
            .provider
            .balance_wei(address)
            .and_then(|hex| format_ether(&hex))
        {
            Ok(balance) => balance,
            Err(error) => {
                warn!(%error, "failed to read wallet balance");
                FALLBACK_BALANCE.to_owned()
            }
        }
    }
}

/// Converts a `0x`-prefixed hex wei quantity to ether with four decimals.
pub fn format_ether(hex_wei: &str) -> Result<String, WalletError> {
    let digits = hex_wei
        .strip_prefix("0x")
        .or_else(|| hex_wei.strip_prefix("0X"))
        .unwrap_or(hex_wei);

    let wei = u128::from_str_radix(digits, 16)
        .map_err(|_| WalletError::InvalidBalance(hex_wei.to_owned()))?;

    let units = wei.saturating_add(WEI_PER_DISPLAY_UNIT / 2) / WEI_PER_DISPLAY_UNIT;
    Ok(format!(
        "{}.{:04}",
        units / DISPLAY_UNITS_PER_ETHER,
        units % DISPLAY_UNITS_PER_ETHER
    ))
}

/// Shortens an address to `0x1234...abcd`.
#[must_use]
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_owned();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Shareable link carrying the first characters of the address as a code.
#[must_use]
pub fn referral_link(origin: &str, address: &str) -> String {
    let code: String = address.chars().take(REFERRAL_CODE_LEN).collect();
    format!("{origin}?ref={code}")
}

#[cfg(test)]
mod tests {
    use super::{
        format_ether, referral_link, short_address, NoProvider, StaticProvider, WalletEvent,
        WalletSession, WalletStatus,
    };
    use crate::error::WalletError;

    const ADDRESS: &str = "0x52908400098527886e0f7030069857d2e4169ee7";
    const OTHER: &str = "0x8617e340b3d01fa5f11f306f4090fd50e238070d";

    #[test]
    fn ether_is_rounded_to_four_decimals() {
        assert_eq!(format_ether("0x0").as_deref(), Ok("0.0000"));
        assert_eq!(format_ether("0xde0b6b3a7640000").as_deref(), Ok("1.0000"));
        // 1.23456 ether
        assert_eq!(format_ether("0x112209c76de80000").as_deref(), Ok("1.2346"));
    }

    #[test]
    fn unreadable_balance_is_an_error() {
        assert_eq!(
            format_ether("0xnope"),
            Err(WalletError::InvalidBalance("0xnope".to_owned()))
        );
        assert!(format_ether("0x").is_err());
    }

    #[test]
    fn addresses_are_shortened() {
        assert_eq!(short_address(ADDRESS), "0x5290...9ee7");
        assert_eq!(short_address("0x1234"), "0x1234");
    }

    #[test]
    fn referral_link_uses_address_prefix() {
        assert_eq!(
            referral_link("https://snake.example", ADDRESS),
            "https://snake.example?ref=0x529084"
        );
    }

    #[test]
    fn missing_provider_is_unavailable() {
        let mut session = WalletSession::new(Box::new(NoProvider));

        assert_eq!(session.status(), &WalletStatus::Unavailable);
        assert_eq!(session.connect().err(), Some(WalletError::Unavailable));
        assert_eq!(session.status(), &WalletStatus::Unavailable);
    }

    #[test]
    fn connect_reads_address_and_balance() {
        let provider = StaticProvider::new(Some(ADDRESS.to_owned()), "0xde0b6b3a7640000");
        let mut session = WalletSession::new(Box::new(provider));
        assert_eq!(session.status(), &WalletStatus::Disconnected);

        session.connect().expect("static provider connects");

        assert_eq!(
            session.status(),
            &WalletStatus::Connected {
                address: ADDRESS.to_owned(),
                balance: "1.0000".to_owned(),
            }
        );
    }

    #[test]
    fn empty_account_list_leaves_session_disconnected() {
        let mut session = WalletSession::new(Box::new(StaticProvider::new(None, "0x0")));

        assert_eq!(session.connect().err(), Some(WalletError::Rejected));
        assert_eq!(session.status(), &WalletStatus::Disconnected);
    }

    #[test]
    fn bad_balance_falls_back_to_zero() {
        let provider = StaticProvider::new(Some(ADDRESS.to_owned()), "garbage");
        let mut session = WalletSession::new(Box::new(provider));

        session.connect().expect("static provider connects");

        assert!(matches!(
            session.status(),
            WalletStatus::Connected { balance, .. } if balance == "0"
        ));
    }

    #[test]
    fn account_switch_and_disconnect_are_applied() {
        let mut provider = StaticProvider::new(Some(ADDRESS.to_owned()), "0x0");
        provider.push_accounts_change(vec![ADDRESS.to_owned()]);
        provider.push_accounts_change(vec![OTHER.to_owned()]);
        provider.push_accounts_change(Vec::new());
        let mut session = WalletSession::new(Box::new(provider));
        session.connect().expect("static provider connects");

        assert_eq!(session.poll(), None);
        assert_eq!(
            session.poll(),
            Some(WalletEvent::AccountChanged(OTHER.to_owned()))
        );
        assert_eq!(session.address(), Some(OTHER));
        assert_eq!(session.poll(), Some(WalletEvent::Disconnected));
        assert_eq!(session.status(), &WalletStatus::Disconnected);
        assert_eq!(session.poll(), None);
    }

    #[test]
    fn account_changes_are_ignored_while_disconnected() {
        let mut session =
            WalletSession::new(Box::new(StaticProvider::new(Some(ADDRESS.to_owned()), "0x0")));

        assert_eq!(session.handle_accounts_changed(&[OTHER.to_owned()]), None);
        assert_eq!(session.status(), &WalletStatus::Disconnected);
    }
}
