use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

use config::Settings;
use crossbeam_channel::{Receiver, Sender, bounded, select, unbounded};
use overlay_engine::PointerEvent;
use overlay_protocol::{
    MethodCall, MethodError, MethodReply,
    ipc::{HostRx, host_channel},
};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, trace, warn};

use crate::{
    error::{Error, Result},
    platform::Platform,
    service::OverlayService,
};

/// How long runtime shutdown waits for in-flight snap ticks.
const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

type CallResult = std::result::Result<MethodReply, MethodError>;

/// Work delivered to the UI thread.
enum Command {
    Call(MethodCall, Sender<CallResult>),
    Pointer(PointerEvent, Sender<bool>),
    BootCompleted(Sender<std::result::Result<bool, MethodError>>),
    AccessibilityEvent,
    Shutdown,
}

/// Cloneable handle for talking to a running [`Server`].
///
/// Every request blocks until the UI thread has handled it. Once the server
/// has shut down, calls fail with `SHUTTING_DOWN` and pointer events are
/// reported as not consumed.
#[derive(Clone)]
pub struct ServerHandle {
    tx: Sender<Command>,
}

impl ServerHandle {
    /// Run one control-channel call.
    pub fn call(&self, call: MethodCall) -> CallResult {
        let (reply_tx, reply_rx) = bounded(1);
        if self.tx.send(Command::Call(call, reply_tx)).is_err() {
            return Err(Error::ShuttingDown.to_method_error());
        }
        reply_rx
            .recv()
            .unwrap_or_else(|_| Err(Error::ShuttingDown.to_method_error()))
    }

    /// Deliver a pointer event from the overlay content.
    pub fn pointer(&self, event: PointerEvent) -> bool {
        let (reply_tx, reply_rx) = bounded(1);
        if self.tx.send(Command::Pointer(event, reply_tx)).is_err() {
            return false;
        }
        reply_rx.recv().unwrap_or(false)
    }

    /// Signal that the device finished booting.
    pub fn boot_completed(&self) -> std::result::Result<bool, MethodError> {
        let (reply_tx, reply_rx) = bounded(1);
        if self.tx.send(Command::BootCompleted(reply_tx)).is_err() {
            return Err(Error::ShuttingDown.to_method_error());
        }
        reply_rx
            .recv()
            .unwrap_or_else(|_| Err(Error::ShuttingDown.to_method_error()))
    }

    /// Signal that a new accessibility event payload was cached.
    pub fn accessibility_event(&self) {
        if self.tx.send(Command::AccessibilityEvent).is_err() {
            debug!("accessibility event after shutdown dropped");
        }
    }
}

/// The overlay service running on its own UI thread.
///
/// The UI thread is the only thread that mutates window attributes. It
/// serves control calls and pointer events, and applies snap steps that the
/// animation runtime queues for it.
pub struct Server {
    handle: ServerHandle,
    thread: Option<JoinHandle<()>>,
}

impl Server {
    /// Start the service. Returns the server and the receiver for messages
    /// the host should observe.
    pub fn spawn(platform: Platform, settings: Settings) -> Result<(Self, HostRx)> {
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("overlay-snap")
            .enable_time()
            .build()?;
        let (host_tx, host_rx) = host_channel();
        let service = OverlayService::new(platform, settings, host_tx, rt.handle().clone());
        let (tx, rx) = unbounded();
        let thread = thread::Builder::new()
            .name("overlay-ui".into())
            .spawn(move || run_ui(service, &rx, rt))?;
        info!("overlay server started");
        Ok((
            Self {
                handle: ServerHandle { tx },
                thread: Some(thread),
            },
            host_rx,
        ))
    }

    pub fn handle(&self) -> ServerHandle {
        self.handle.clone()
    }

    /// Stop the overlay and join the UI thread.
    pub fn shutdown(mut self) {
        self.stop_thread();
    }

    fn stop_thread(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        if self.handle.tx.send(Command::Shutdown).is_err() {
            trace!("UI thread already gone");
        }
        if thread.join().is_err() {
            warn!("overlay UI thread panicked");
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.stop_thread();
    }
}

fn run_ui(service: OverlayService, rx: &Receiver<Command>, rt: Runtime) {
    debug!("UI thread running");
    let main_ops = service.engine().main_ops_receiver().clone();
    loop {
        select! {
            recv(rx) -> cmd => match cmd {
                Ok(Command::Shutdown) | Err(_) => break,
                Ok(cmd) => handle_command(&service, cmd),
            },
            recv(main_ops) -> op => {
                if let Ok(op) = op {
                    service.engine().apply_main_op(op);
                }
            }
        }
    }
    service.shutdown();
    drop(service);
    rt.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
    debug!("UI thread exited");
}

fn handle_command(service: &OverlayService, cmd: Command) {
    match cmd {
        Command::Call(call, reply) => {
            if reply.send(service.dispatch(&call)).is_err() {
                trace!(method = %call.method, "caller went away");
            }
        }
        Command::Pointer(event, reply) => {
            if reply.send(service.handle_pointer(event)).is_err() {
                trace!("pointer caller went away");
            }
        }
        Command::BootCompleted(reply) => {
            let r = service
                .on_boot_completed()
                .map_err(|e| e.to_method_error());
            if reply.send(r).is_err() {
                trace!("boot caller went away");
            }
        }
        Command::AccessibilityEvent => service.on_accessibility_event(),
        Command::Shutdown => {}
    }
}
