//! Presentation state.
//!
//! The deposit and service flows never touch display state directly. They
//! emit [`PresentationEvent`]s over a channel and a [`Dashboard`] owned by the
//! caller applies them, last write wins.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::deposit::builder::lamports_to_sol;
use crate::service::types::ServiceStatusSnapshot;
use crate::types::{short_identity, Identity, FEE_WALLET};

/// Maximum number of log lines rendered.
pub const MAX_DISPLAY_LOGS: usize = 50;

/// The only observable effects of the client core.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    /// Wallet balance in lamports
    BalanceUpdated(u64),
    StatusUpdated(String),
    LogsUpdated(Vec<String>),
    CountersUpdated(ServiceStatusSnapshot),
}

pub type EventSender = mpsc::Sender<PresentationEvent>;
pub type EventReceiver = mpsc::Receiver<PresentationEvent>;

pub fn event_channel(capacity: usize) -> (EventSender, EventReceiver) {
    mpsc::channel(capacity)
}

/// Cloneable emitter shared by the flows.
#[derive(Debug, Clone)]
pub struct Presenter {
    sender: EventSender,
}

impl Presenter {
    pub fn new(sender: EventSender) -> Self {
        Self { sender }
    }

    /// Queue an event without waiting. A full channel drops the event, the
    /// flows never block on a slow or absent listener.
    pub fn emit(&self, event: PresentationEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                debug!("Presentation channel full, dropping event: {:?}", event);
            }
            Err(TrySendError::Closed(event)) => {
                warn!("Presentation listener gone, dropping event: {:?}", event);
            }
        }
    }

    pub fn balance(&self, lamports: u64) {
        self.emit(PresentationEvent::BalanceUpdated(lamports));
    }

    pub fn status(&self, text: impl Into<String>) {
        self.emit(PresentationEvent::StatusUpdated(text.into()));
    }

    pub fn logs(&self, lines: Vec<String>) {
        self.emit(PresentationEvent::LogsUpdated(lines));
    }

    pub fn counters(&self, snapshot: ServiceStatusSnapshot) {
        self.emit(PresentationEvent::CountersUpdated(snapshot));
    }
}

/// Display cache of the latest known values.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub identity: Option<Identity>,
    pub balance_lamports: u64,
    pub status: String,
    pub logs: Vec<String>,
    pub counters: ServiceStatusSnapshot,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Dashboard {
    pub fn new(identity: Option<Identity>) -> Self {
        Self {
            identity,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, event: PresentationEvent) {
        debug!("Applying presentation event: {:?}", event);
        match event {
            PresentationEvent::BalanceUpdated(lamports) => self.balance_lamports = lamports,
            PresentationEvent::StatusUpdated(text) => self.status = text,
            PresentationEvent::LogsUpdated(lines) => self.logs = lines,
            PresentationEvent::CountersUpdated(snapshot) => self.counters = snapshot,
        }
        self.updated_at = Some(Utc::now());
    }

    /// Apply every event currently queued without waiting for more.
    pub fn drain(&mut self, receiver: &mut EventReceiver) -> usize {
        let mut applied = 0;
        while let Ok(event) = receiver.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Apply events until every sender is dropped.
    pub async fn run(mut self, mut receiver: EventReceiver) -> Self {
        while let Some(event) = receiver.recv().await {
            self.apply(event);
        }
        self
    }

    /// Text rendering of the dashboard.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();

        match &self.identity {
            Some(identity) => lines.push(format!("Connected: {}", short_identity(identity))),
            None => lines.push("Wallet not connected".to_string()),
        }
        lines.push(format!(
            "Balance: {:.4} SOL",
            round_for_display(lamports_to_sol(self.balance_lamports), 4)
        ));
        lines.push(format!("Status: {}", self.status));

        let fee_wallet = match &self.counters.fee_wallet {
            Some(wallet) => format!("{}...", wallet.chars().take(8).collect::<String>()),
            None => short_identity(&FEE_WALLET),
        };
        lines.push(format!(
            "Successful Buys: {} | Total Fees Sent: {:.6} SOL (to {})",
            self.counters.successful_buys,
            round_for_display(self.counters.total_fees_sent, 6),
            fee_wallet
        ));

        lines.push("Recent Logs".to_string());
        lines.extend(
            self.logs
                .iter()
                .take(MAX_DISPLAY_LOGS)
                .map(|line| format!("  {}", line)),
        );
        lines
    }
}

fn round_for_display(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_last_write_wins() {
        let mut dashboard = Dashboard::default();
        assert!(dashboard.updated_at.is_none());

        dashboard.apply(PresentationEvent::BalanceUpdated(1_000_000_000));
        dashboard.apply(PresentationEvent::BalanceUpdated(500_000_000));
        dashboard.apply(PresentationEvent::StatusUpdated("first".into()));
        dashboard.apply(PresentationEvent::StatusUpdated("second".into()));

        assert_eq!(dashboard.balance_lamports, 500_000_000);
        assert_eq!(dashboard.status, "second");
        assert!(dashboard.updated_at.is_some());
    }

    #[test]
    fn test_render() {
        let mut dashboard = Dashboard::new(Some(FEE_WALLET));
        dashboard.apply(PresentationEvent::BalanceUpdated(1_234_560_000));
        dashboard.apply(PresentationEvent::CountersUpdated(ServiceStatusSnapshot {
            successful_buys: 3,
            total_fees_sent: Decimal::new(15, 4),
            fee_wallet: None,
        }));
        dashboard.apply(PresentationEvent::LogsUpdated(vec!["Dust bot logs...".into()]));

        let rendered = dashboard.render();
        assert_eq!(rendered[0], "Connected: 9tzPdS72...");
        assert_eq!(rendered[1], "Balance: 1.2346 SOL");
        assert_eq!(
            rendered[3],
            "Successful Buys: 3 | Total Fees Sent: 0.001500 SOL (to 9tzPdS72...)"
        );
        assert_eq!(rendered.last().unwrap(), "  Dust bot logs...");
    }

    #[test]
    fn test_render_caps_logs() {
        let mut dashboard = Dashboard::default();
        let lines = (0..120).map(|i| format!("line {}", i)).collect();
        dashboard.apply(PresentationEvent::LogsUpdated(lines));

        let rendered = dashboard.render();
        let log_lines = rendered.iter().filter(|l| l.starts_with("  line")).count();
        assert_eq!(log_lines, MAX_DISPLAY_LOGS);
        assert_eq!(dashboard.logs.len(), 120);
    }

    #[tokio::test]
    async fn test_presenter_feeds_dashboard() {
        let (sender, receiver) = event_channel(10);
        let presenter = Presenter::new(sender);

        presenter.balance(42);
        presenter.status("ready");
        drop(presenter);

        let dashboard = Dashboard::default().run(receiver).await;
        assert_eq!(dashboard.balance_lamports, 42);
        assert_eq!(dashboard.status, "ready");
    }

    #[test]
    fn test_full_channel_drops_instead_of_blocking() {
        let (sender, mut receiver) = event_channel(1);
        let presenter = Presenter::new(sender);

        presenter.status("kept");
        presenter.status("dropped");
        presenter.balance(7);

        let mut dashboard = Dashboard::default();
        assert_eq!(dashboard.drain(&mut receiver), 1);
        assert_eq!(dashboard.status, "kept");

        presenter.status("after drain");
        dashboard.drain(&mut receiver);
        assert_eq!(dashboard.status, "after drain");
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (sender, receiver) = event_channel(4);
        drop(receiver);
        Presenter::new(sender).status("nobody listening");
    }
}
