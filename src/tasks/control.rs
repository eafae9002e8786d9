//! Control Channel Task
//!
//! Background task that drains control commands from an mpsc channel and
//! dispatches them to the engine. The size query carries a oneshot reply
//! sender for request/response correlation; all other commands are
//! fire-and-forget.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::{CacheSizeReply, ControlMessage, Engine};
use crate::fetch::Fetch;

// == Control Request ==
/// One control command in flight, with its optional reply channel.
#[derive(Debug)]
pub struct ControlRequest {
    /// The command to dispatch
    pub message: ControlMessage,
    /// Reply sender, expected only for `GET_CACHE_SIZE`
    pub reply: Option<oneshot::Sender<CacheSizeReply>>,
}

impl ControlRequest {
    /// A fire-and-forget request.
    pub fn fire_and_forget(message: ControlMessage) -> Self {
        Self {
            message,
            reply: None,
        }
    }

    /// A request expecting a reply on the returned receiver.
    pub fn with_reply(message: ControlMessage) -> (Self, oneshot::Receiver<CacheSizeReply>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                message,
                reply: Some(tx),
            },
            rx,
        )
    }
}

/// Spawns the control-channel loop.
///
/// Runs until the sending side of the channel is dropped. The returned
/// handle can be used to abort the task during shutdown.
pub fn spawn_control_task<F: Fetch>(
    engine: Engine<F>,
    mut receiver: mpsc::Receiver<ControlRequest>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("control channel task started");

        while let Some(request) = receiver.recv().await {
            let reply = engine.handle_message(request.message).await;
            if let (Some(sender), Some(reply)) = (request.reply, reply) {
                if sender.send(reply).is_err() {
                    debug!("control reply receiver dropped");
                }
            }
        }

        info!("control channel closed");
    })
}
