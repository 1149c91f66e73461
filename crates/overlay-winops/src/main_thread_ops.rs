use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::{
    error::{Error, Result},
    geom::Point,
};

/// Operations that must run on the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainOp {
    /// Apply one snap animation step. Dropped unless `generation` is still
    /// the animator's current generation.
    SnapStep {
        generation: u64,
        to: Point,
        /// Final step of this animation.
        done: bool,
    },
}

/// Cloneable producer side of the UI-thread op queue.
#[derive(Debug, Clone)]
pub struct MainOpSender {
    tx: Sender<MainOp>,
}

impl MainOpSender {
    /// Enqueue `op` for the UI thread.
    pub fn post(&self, op: MainOp) -> Result<()> {
        tracing::trace!(?op, "MainOps: enqueue");
        self.tx.send(op).map_err(|_| Error::QueueClosed)
    }
}

/// Create the UI-thread op queue.
pub fn main_op_channel() -> (MainOpSender, Receiver<MainOp>) {
    let (tx, rx) = unbounded();
    (MainOpSender { tx }, rx)
}
