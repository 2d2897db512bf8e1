//! The background context as a task.
//!
//! Popup requests arrive as envelopes carrying a oneshot reply; host events
//! arrive on their own channel. Each popup request runs in its own task so a
//! long injection retry never delays picker events on their way to the popup.

use std::sync::Arc;

use stylescope_protocols::{DeliveryError, Message, Response};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::host::{HostEvent, TabHost};
use crate::messenger::Messenger;

/// A popup request awaiting its reply.
pub struct Envelope {
    pub message: Message,
    pub reply: oneshot::Sender<Response>,
}

/// Sending side of the background context, held by the popup.
#[derive(Clone)]
pub struct BackgroundHandle {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl BackgroundHandle {
    /// Send a request and await the reply.
    pub async fn request(&self, message: Message) -> Result<Response, DeliveryError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { message, reply })
            .map_err(|_| DeliveryError::NoReceiver)?;
        rx.await.map_err(|_| DeliveryError::PortClosed)
    }
}

/// Start the background loop. It ends once both channels are closed.
pub fn spawn<H>(
    messenger: Arc<Messenger<H>>,
    mut host_events: mpsc::UnboundedReceiver<HostEvent>,
) -> (BackgroundHandle, JoinHandle<()>)
where
    H: TabHost + ?Sized + 'static,
{
    let (tx, mut requests) = mpsc::unbounded_channel::<Envelope>();

    let task = tokio::spawn(async move {
        info!("Background context started");
        loop {
            tokio::select! {
                Some(envelope) = requests.recv() => {
                    let messenger = messenger.clone();
                    tokio::spawn(async move {
                        let kind = envelope.message.kind();
                        let response = messenger.handle_popup(&envelope.message).await;
                        if envelope.reply.send(response).is_err() {
                            debug!(kind, "Requester went away before the reply");
                        }
                    });
                }
                Some(event) = host_events.recv() => {
                    messenger.handle_host_event(event);
                }
                else => break,
            }
        }
        info!("Background context stopped");
    });

    (BackgroundHandle { tx }, task)
}
