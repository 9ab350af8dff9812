//! Notification sink port. Delivery is best effort.

use crate::domain::error::LedgerError;
use crate::domain::events::LedgerEvent;

pub trait NotificationPort: Send + Sync {
    fn emit(&self, event: &LedgerEvent) -> Result<(), LedgerError>;
}
