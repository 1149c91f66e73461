//! Post-release snap animation.
//!
//! [`SnapTask`] is the pure easing model. [`SnapAnimator`] drives it on a
//! tokio interval and hands each step to the UI thread as a
//! [`MainOp::SnapStep`]; it never touches the window itself.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
        mpsc::{Receiver, channel},
    },
    thread,
    time::{Duration, Instant},
};

use config::SnapPolicy;
use overlay_winops::{MainOp, MainOpSender, Point};
use parking_lot::Mutex;
use tokio::{
    runtime::Handle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Upper bound on how long `cancel_sync` waits for the tick task to exit.
const STOP_WAIT_TIMEOUT_MS: u64 = 50;
/// Poll interval used when waiting for the tick task to finish.
const STOP_POLL_INTERVAL_MS: u64 = 2;

/// One release-to-convergence animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapTask {
    pub dest: Point,
    /// Per-axis distance under which the animation has converged.
    pub converge_px: i32,
}

impl SnapTask {
    /// Compute the destination for `policy`.
    ///
    /// `current` is the window offset at release, `release_y` the recorded
    /// release Y, `overlay_width` the laid-out width and `screen_width` the
    /// display width, all in px.
    pub fn new(
        policy: SnapPolicy,
        current: Point,
        release_y: i32,
        overlay_width: i32,
        screen_width: i32,
        converge_px: i32,
    ) -> Self {
        let dest = match policy {
            SnapPolicy::Auto => {
                let x = if current.x.saturating_add(overlay_width / 2) <= screen_width / 2 {
                    0
                } else {
                    screen_width.saturating_sub(overlay_width)
                };
                Point { x, y: release_y }
            }
            SnapPolicy::Left => Point { x: 0, y: release_y },
            SnapPolicy::Right => Point {
                x: screen_width.saturating_sub(overlay_width),
                y: release_y,
            },
            SnapPolicy::None => current,
        };
        Self { dest, converge_px }
    }

    /// Move one third of the remaining distance toward the destination.
    pub fn step(&self, p: Point) -> Point {
        Point {
            x: ease(p.x, self.dest.x),
            y: ease(p.y, self.dest.y),
        }
    }

    pub fn converged(&self, p: Point) -> bool {
        let near = |v: i32, d: i32| (i64::from(v) - i64::from(d)).abs() < i64::from(self.converge_px);
        near(p.x, self.dest.x) && near(p.y, self.dest.y)
    }
}

/// One easing step on a single axis, computed wide so positions anywhere in
/// `i32` range cannot overflow. The result always lies between `from` and `to`.
fn ease(from: i32, to: i32) -> i32 {
    let (from, to) = (i64::from(from), i64::from(to));
    let next = 2 * (from - to) / 3 + to;
    i32::try_from(next).unwrap_or(if next < 0 { i32::MIN } else { i32::MAX })
}

struct SnapEntry {
    token: CancellationToken,
    handle: tokio::task::JoinHandle<()>,
    done_rx: Receiver<()>,
}

/// Runs at most one [`SnapTask`] at a time.
///
/// Every start and cancel advances the generation counter. Steps carry the
/// generation they were computed for, and the UI thread drops any step whose
/// generation is no longer current.
#[derive(Clone)]
pub struct SnapAnimator {
    rt: Handle,
    ops: MainOpSender,
    interval: Duration,
    generation: Arc<AtomicU64>,
    entry: Arc<Mutex<Option<SnapEntry>>>,
}

impl SnapAnimator {
    pub fn new(rt: Handle, ops: MainOpSender, interval: Duration) -> Self {
        Self {
            rt,
            ops,
            interval,
            generation: Arc::new(AtomicU64::new(0)),
            entry: Arc::new(Mutex::new(None)),
        }
    }

    /// Whether steps for `generation` may still be applied.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Whether a tick task is running.
    pub fn is_active(&self) -> bool {
        self.entry
            .lock()
            .as_ref()
            .is_some_and(|e| !e.handle.is_finished())
    }

    /// Cancel any running animation, then start `task` from `from`. Returns
    /// the generation of the new animation.
    pub fn start(&self, task: SnapTask, from: Point) -> u64 {
        let mut entry = self.entry.lock();
        if let Some(old) = entry.take() {
            old.token.cancel();
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let token = CancellationToken::new();
        let cancel = token.clone();
        let ops = self.ops.clone();
        let interval = self.interval;
        let (done_tx, done_rx) = channel::<()>();

        let fut = async move {
            trace!(generation, dest = ?task.dest, "snap_start");
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut pos = from;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        trace!(generation, "snap_cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        pos = task.step(pos);
                        let done = task.converged(pos);
                        let step = MainOp::SnapStep { generation, to: pos, done };
                        if ops.post(step).is_err() {
                            debug!(generation, "snap: op queue closed");
                            break;
                        }
                        if done {
                            trace!(generation, ?pos, "snap_converged");
                            break;
                        }
                    }
                }
            }
            let _ = done_tx.send(());
        };

        let handle = self.rt.spawn(fut);
        *entry = Some(SnapEntry {
            token,
            handle,
            done_rx,
        });
        generation
    }

    /// Cancel the running animation, if any. Safe to call repeatedly and
    /// from any thread; steps already queued become stale.
    pub fn cancel(&self) {
        let mut entry = self.entry.lock();
        if let Some(old) = entry.take() {
            old.token.cancel();
            trace!("snap_stop");
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Cancel and wait briefly for the tick task to exit (blocking).
    pub fn cancel_sync(&self) {
        let old = self.entry.lock().take();
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(old) = old {
            old.token.cancel();
            let deadline = Duration::from_millis(STOP_WAIT_TIMEOUT_MS);
            let _ = old.done_rx.recv_timeout(deadline);
            let start = Instant::now();
            while !old.handle.is_finished() && start.elapsed() < deadline {
                thread::sleep(Duration::from_millis(STOP_POLL_INTERVAL_MS));
            }
            trace!("snap_stop_sync");
        }
    }

    /// Forget the finished animation for `generation`.
    pub fn finish(&self, generation: u64) {
        if self.is_current(generation) {
            self.entry.lock().take();
        }
    }
}

#[cfg(test)]
mod tests {
    use overlay_winops::main_op_channel;

    use super::*;

    fn task(policy: SnapPolicy, x: i32) -> SnapTask {
        SnapTask::new(policy, Point { x, y: 300 }, 300, 200, 1080, 2)
    }

    #[test]
    fn destinations() {
        assert_eq!(task(SnapPolicy::Left, 500).dest, Point { x: 0, y: 300 });
        assert_eq!(task(SnapPolicy::Right, 500).dest, Point { x: 880, y: 300 });
        // center 540 is exactly mid-screen: snaps left
        assert_eq!(task(SnapPolicy::Auto, 440).dest.x, 0);
        assert_eq!(task(SnapPolicy::Auto, 441).dest.x, 880);
        let none = task(SnapPolicy::None, 123);
        assert_eq!(none.dest, Point { x: 123, y: 300 });
        assert!(none.converged(Point { x: 123, y: 300 }));
    }

    #[test]
    fn auto_keeps_release_y() {
        let t = SnapTask::new(SnapPolicy::Auto, Point { x: 10, y: 40 }, 77, 200, 1080, 2);
        assert_eq!(t.dest, Point { x: 0, y: 77 });
    }

    #[test]
    fn steps_at_the_ends_of_i32_do_not_overflow() {
        let t = task(SnapPolicy::Right, 0);
        let p = t.step(Point { x: i32::MAX, y: i32::MIN });
        assert!(p.x < i32::MAX && p.x > t.dest.x);
        assert!(p.y > i32::MIN && p.y < t.dest.y);
        assert!(!t.converged(Point { x: i32::MIN, y: 300 }));
        let far = SnapTask::new(SnapPolicy::Auto, Point { x: i32::MAX, y: 0 }, 0, 200, 1080, 2);
        assert_eq!(far.dest.x, 880);
    }

    #[test]
    fn step_removes_a_third() {
        let t = task(SnapPolicy::Right, 0);
        let p = t.step(Point { x: -1, y: 300 });
        // 2*(-1-880)/3 + 880 = -587 + 880
        assert_eq!(p, Point { x: 293, y: 300 });
        let mut p = Point { x: 0, y: 300 };
        let mut n = 0;
        while !t.converged(p) {
            let next = t.step(p);
            assert!((next.x - t.dest.x).abs() < (p.x - t.dest.x).abs());
            p = next;
            n += 1;
            assert!(n < 40);
        }
    }

    #[test]
    fn start_supersedes_and_cancel_is_idempotent() {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .build()
            .unwrap();
        let (tx, rx) = main_op_channel();
        let anim = SnapAnimator::new(rt.handle().clone(), tx, Duration::from_millis(5));
        let g1 = anim.start(task(SnapPolicy::Right, 0), Point { x: 0, y: 300 });
        let g2 = anim.start(task(SnapPolicy::Left, 500), Point { x: 500, y: 300 });
        assert!(g2 > g1);
        assert!(!anim.is_current(g1));
        assert!(anim.is_current(g2));

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut last = None;
        while Instant::now() < deadline {
            if let Ok(MainOp::SnapStep { generation, to, done }) =
                rx.recv_timeout(Duration::from_millis(50))
            {
                if generation == g2 {
                    last = Some(to);
                    if done {
                        break;
                    }
                }
            }
        }
        let last = last.unwrap();
        assert!(last.x.abs() < 2);

        anim.cancel();
        anim.cancel();
        anim.cancel_sync();
        assert!(!anim.is_current(g2));
        assert!(!anim.is_active());
    }
}
