//=========================================================================
// Error/Exit Reporting
//=========================================================================
//
// Notification channel towards the presentation collaborator.
//
// The core never blocks on the user: it only enqueues `Error` or `Exit`.
// Whoever owns the receiver decides how to present the message and when
// to terminate the process.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::warn;

//=== Notification ========================================================

/// Signals consumed by the presentation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Fatal condition; present `message`, then terminate.
    Error(String),

    /// Engine requested termination; exit without prompting.
    Exit,
}

//=== Reporter ============================================================

/// Sending half of the notification channel.
#[derive(Debug, Clone)]
pub struct Reporter {
    sender: Sender<Notification>,
}

impl Reporter {
    /// Creates a reporter together with the receiver the presenter polls.
    pub fn channel() -> (Self, Receiver<Notification>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    pub fn new(sender: Sender<Notification>) -> Self {
        Self { sender }
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(Notification::Error(message.into()));
    }

    pub fn exit(&self) {
        self.send(Notification::Exit);
    }

    fn send(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            warn!(target: "lifecycle", "Notification receiver disconnected, dropping signal");
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_carries_message() {
        let (reporter, rx) = Reporter::channel();
        reporter.error("Unable to restore");
        assert_eq!(rx.try_recv(), Ok(Notification::Error("Unable to restore".into())));
    }

    #[test]
    fn exit_is_delivered_in_order() {
        let (reporter, rx) = Reporter::channel();
        reporter.error("first");
        reporter.exit();

        assert_eq!(rx.try_recv(), Ok(Notification::Error("first".into())));
        assert_eq!(rx.try_recv(), Ok(Notification::Exit));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn disconnected_receiver_does_not_panic() {
        let (reporter, rx) = Reporter::channel();
        drop(rx);
        reporter.exit();
    }
}
