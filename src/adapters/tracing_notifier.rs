//! Notification sink that writes events to the `tracing` log.

use tracing::info;

use crate::domain::error::LedgerError;
use crate::domain::events::LedgerEvent;
use crate::ports::notification_port::NotificationPort;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationPort for TracingNotifier {
    fn emit(&self, event: &LedgerEvent) -> Result<(), LedgerError> {
        info!(target: "assetledger::events", event = event.name(), detail = ?event);
        Ok(())
    }
}
