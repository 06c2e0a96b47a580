// Standing alert flags
//
// Re-evaluated after every change to the conversation. Flags only ever get
// raised here; they are lowered by explicit user action or a reset.

use serde::Serialize;

use crate::crisis::RiskLevel;
use crate::store::Message;

/// How many trailing messages the monitor looks at
pub const ALERT_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlertState {
    /// Suggest talking to a professional
    pub psychologist_alert: bool,
    /// Emergency contacts are on screen
    pub emergency_contacts: bool,
}

impl AlertState {
    /// Raise flags for risky user messages among `recent`
    ///
    /// Critical risk (or a message needing immediate help) raises both
    /// flags; high risk raises the psychologist alert only.
    pub fn observe(&mut self, recent: &[Message]) {
        let window = &recent[recent.len().saturating_sub(ALERT_WINDOW)..];
        let users = || window.iter().filter(|m| m.is_user());

        let critical = users()
            .any(|m| m.risk_level == Some(RiskLevel::Critical) || m.needs_immediate_help());
        let high = users().any(|m| m.risk_level == Some(RiskLevel::High));

        if critical {
            if !self.emergency_contacts || !self.psychologist_alert {
                tracing::info!("Critical risk in recent messages, raising emergency alerts");
            }
            self.emergency_contacts = true;
            self.psychologist_alert = true;
        } else if high {
            self.psychologist_alert = true;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn any(&self) -> bool {
        self.psychologist_alert || self.emergency_contacts
    }
}
