use tokio::sync::oneshot;

use crate::models::payment::{CheckoutCompletion, CheckoutOptions};

/// Outcome of one checkout widget session: exactly one completion callback,
/// or the user dismissed the widget.
#[derive(Debug, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Completed(CheckoutCompletion),
    Dismissed,
}

/// The widget host's side of a session. Deliver exactly one completion, or
/// drop the handle (the widget's close event) to signal dismissal.
pub struct CheckoutHandle {
    sender: oneshot::Sender<CheckoutCompletion>,
}

impl CheckoutHandle {
    pub fn complete(self, completion: CheckoutCompletion) {
        // The orchestrator may already have gone away; nothing to do then.
        let _ = self.sender.send(completion);
    }

    pub fn dismiss(self) {}
}

/// The orchestrator's side: a cancellable await on the widget's single
/// callback. A dropped handle resolves to `Dismissed`, so the await can
/// never dangle in `AwaitingGateway`.
pub struct CheckoutSession {
    receiver: oneshot::Receiver<CheckoutCompletion>,
}

impl CheckoutSession {
    pub fn channel() -> (CheckoutHandle, CheckoutSession) {
        let (sender, receiver) = oneshot::channel();
        (CheckoutHandle { sender }, CheckoutSession { receiver })
    }

    pub async fn outcome(self) -> CheckoutOutcome {
        match self.receiver.await {
            Ok(completion) => CheckoutOutcome::Completed(completion),
            Err(_) => CheckoutOutcome::Dismissed,
        }
    }
}

/// Boundary to the external checkout widget. An implementation opens the
/// widget with the given options and wires its completion callback and
/// close event to the returned session.
pub trait CheckoutGateway: Send + Sync {
    fn open(&self, options: CheckoutOptions) -> CheckoutSession;
}
