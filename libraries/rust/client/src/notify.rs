use std::sync::{Arc, Mutex};

use solana_sdk::pubkey::Pubkey;

use crate::{action::ActionKind, config::ClientConfig, error::ActionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the user about the progress of an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,

    /// Where the user can see more details, usually a block explorer
    pub link: Option<String>,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Receives notifications as an action progresses
pub trait NotificationSink {
    fn push(&self, notification: Notification);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn push(&self, notification: Notification) {
        (**self).push(notification)
    }
}

/// Keeps every notification in memory, for a ui to display
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.entries.lock().unwrap().clone()
    }

    /// Remove and return all notifications received so far
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock().unwrap())
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }
}

impl NotificationSink for NotificationLog {
    fn push(&self, notification: Notification) {
        self.entries.lock().unwrap().push(notification);
    }
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn push(&self, notification: Notification) {
        let link = notification.link.as_deref().unwrap_or_default();

        match notification.severity {
            Severity::Info | Severity::Success => log::info!("{} {link}", notification.message),
            Severity::Warning => log::warn!("{} {link}", notification.message),
            Severity::Error => log::error!("{} {link}", notification.message),
        }
    }
}

/// Explain an error with the user's holdings, using the configured asset
/// names where available
pub fn describe_holdings_error(
    config: &ClientConfig,
    kind: ActionKind,
    quantity: u64,
    error: &ActionError,
) -> Option<String> {
    let contracts = if quantity == 1 {
        "1 contract".to_owned()
    } else {
        format!("{quantity} contracts")
    };
    let goal = match kind {
        ActionKind::Mint => format!("mint {contracts}"),
        ActionKind::Close => format!("close {contracts}"),
    };

    match error {
        ActionError::MissingAccount { mint } => Some(format!(
            "You must have one or more {} accounts in your wallet to {goal}",
            symbol(config, mint)
        )),
        ActionError::MissingFunds { mint, required, .. } => {
            let symbol = symbol(config, mint);
            let amount = config
                .asset(mint)
                .map(|asset| asset.ui_amount(*required))
                .unwrap_or_else(|| required.to_string());

            Some(format!(
                "You must have at least {amount} {symbol} in your {symbol} account to {goal}"
            ))
        }
        _ => None,
    }
}

fn symbol(config: &ClientConfig, mint: &Pubkey) -> String {
    match config.asset(mint) {
        Some(asset) => asset.symbol.clone(),
        None => truncate(mint),
    }
}

fn truncate(key: &Pubkey) -> String {
    let key = key.to_string();
    format!("{}...{}", &key[..4], &key[key.len() - 4..])
}
