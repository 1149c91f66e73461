//! Protocol types shared between a host application and the overlay service.
//!
//! The control channel is a method name plus a msgpack request payload
//! ([`rpc::MethodCall`]). Messages flowing the other way (broadcasts the host
//! should observe) are [`MsgToHost`] values on an unbounded channel.
use serde::{Deserialize, Serialize};

pub mod rpc;

pub use rpc::{
    ACCESSIBILITY_EVENT_ACTION, BlurReq, ClickThroughReq, MethodCall, MethodError, MethodReply,
    MoveReq, OverlayMethod, Position, RESTART_REQUIRED_ACTION, ResizeReq, ShowReq, StartPosition,
    UpdateFlagReq,
};

/// Host-side channel and payload codec.
pub mod ipc {
    use super::MsgToHost;

    /// Tokio unbounded sender for host messages.
    pub type HostTx = tokio::sync::mpsc::UnboundedSender<MsgToHost>;
    /// Tokio unbounded receiver for host messages.
    pub type HostRx = tokio::sync::mpsc::UnboundedReceiver<MsgToHost>;

    /// Create a standard unbounded host channel (sender, receiver).
    pub fn host_channel() -> (HostTx, HostRx) {
        tokio::sync::mpsc::unbounded_channel::<MsgToHost>()
    }

    /// Msgpack encoding for request payloads and host messages.
    pub mod codec;
}

/// Messages sent from the service to the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MsgToHost {
    /// The render engine could not be reused and the host must re-provision
    /// it before the overlay can attach again.
    RestartRequired,
    /// A cached accessibility event payload was relayed.
    AccessibilityEvent {
        /// Opaque event payload, forwarded verbatim.
        payload: String,
    },
}

impl MsgToHost {
    /// Broadcast action name for this message.
    pub fn action(&self) -> &'static str {
        match self {
            Self::RestartRequired => RESTART_REQUIRED_ACTION,
            Self::AccessibilityEvent { .. } => ACCESSIBILITY_EVENT_ACTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_channel_delivers_in_order() {
        let (tx, mut rx) = ipc::host_channel();
        tx.send(MsgToHost::RestartRequired).unwrap();
        tx.send(MsgToHost::AccessibilityEvent {
            payload: "{}".into(),
        })
        .unwrap();
        assert_eq!(rx.try_recv().unwrap(), MsgToHost::RestartRequired);
        assert_eq!(
            rx.try_recv().unwrap().action(),
            ACCESSIBILITY_EVENT_ACTION
        );
    }
}
