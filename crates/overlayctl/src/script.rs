//! Script steps and the runner that plays them against a server.

use std::{io::Write, thread, time::Duration};

use overlay_engine::PointerEvent;
use overlay_protocol::{
    BlurReq, ClickThroughReq, MethodCall, MethodError, MethodReply, MoveReq, MsgToHost,
    OverlayMethod, ResizeReq, ShowReq, UpdateFlagReq, ipc::HostRx,
};
use overlay_server::ServerHandle;
use ron::{Options, extensions::Extensions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// One scripted action.
///
/// Scripts are a RON list, e.g.
/// `[Show(width: Some(200), height: Some(100), enableDrag: true), Down(x: 10, y: 10), Close]`.
/// Implicit `Some` is enabled, so `width: 200` works too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum Step {
    Show(ShowReq),
    Close,
    Move { x: i32, y: i32 },
    Resize {
        width: i32,
        height: i32,
        #[serde(default)]
        drag: bool,
    },
    UpdateFlag(String),
    ClickThrough(bool),
    Blur(i32),
    Position,
    Active,
    Down { x: f32, y: f32 },
    Drag { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Cancel { x: f32, y: f32 },
    /// Pause; the value is a humantime duration such as `"300ms"`.
    Sleep(String),
}

impl Step {
    /// Short lowercase name used in output lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Show(_) => "show",
            Self::Close => "close",
            Self::Move { .. } => "move",
            Self::Resize { .. } => "resize",
            Self::UpdateFlag(_) => "updateFlag",
            Self::ClickThrough(_) => "clickThrough",
            Self::Blur(_) => "blur",
            Self::Position => "position",
            Self::Active => "active",
            Self::Down { .. } => "down",
            Self::Drag { .. } => "drag",
            Self::Up { .. } => "up",
            Self::Cancel { .. } => "cancel",
            Self::Sleep(_) => "sleep",
        }
    }
}

/// Parse a script.
pub fn parse(text: &str) -> Result<Vec<Step>> {
    let opts = Options::default().with_default_extension(
        Extensions::IMPLICIT_SOME | Extensions::UNWRAP_VARIANT_NEWTYPES,
    );
    Ok(opts.from_str(text)?)
}

/// The built-in demo: a 200x100 dp overlay at the top left, dragged a little,
/// released, and snapped to the right edge before closing.
pub fn demo() -> Vec<Step> {
    vec![
        Step::Show(ShowReq {
            width: Some(200),
            height: Some(100),
            alignment: Some("topLeft".into()),
            enable_drag: true,
            position_gravity: Some("right".into()),
            ..ShowReq::default()
        }),
        Step::Active,
        Step::Down { x: 100.0, y: 100.0 },
        Step::Drag { x: 140.0, y: 160.0 },
        Step::Position,
        Step::Up { x: 140.0, y: 160.0 },
        Step::Sleep("500ms".into()),
        Step::Position,
        Step::Close,
        Step::Active,
    ]
}

/// Result of one step as printed.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Ok(MethodReply),
    Err(MethodError),
    Consumed(bool),
    Slept(u64),
}

/// One JSON output line.
#[derive(Debug, Serialize)]
struct Line<'a> {
    step: usize,
    op: &'a str,
    #[serde(flatten)]
    outcome: &'a Outcome,
}

/// Execute one step.
pub fn execute(handle: &ServerHandle, index: usize, step: &Step) -> Result<Outcome> {
    let reply = |call: MethodCall| match handle.call(call) {
        Ok(r) => Outcome::Ok(r),
        Err(e) => Outcome::Err(e),
    };
    let outcome = match step {
        Step::Show(req) => reply(MethodCall::new(OverlayMethod::Show, req)?),
        Step::Close => reply(MethodCall::bare(OverlayMethod::Close)),
        Step::Move { x, y } => reply(MethodCall::new(
            OverlayMethod::Move,
            &MoveReq { x: *x, y: *y },
        )?),
        Step::Resize {
            width,
            height,
            drag,
        } => reply(MethodCall::new(
            OverlayMethod::Resize,
            &ResizeReq {
                width: *width,
                height: *height,
                enable_drag: *drag,
            },
        )?),
        Step::UpdateFlag(flag) => reply(MethodCall::new(
            OverlayMethod::UpdateFlag,
            &UpdateFlagReq { flag: flag.clone() },
        )?),
        Step::ClickThrough(enable) => reply(MethodCall::new(
            OverlayMethod::SetClickThrough,
            &ClickThroughReq { enable: *enable },
        )?),
        Step::Blur(radius) => reply(MethodCall::new(
            OverlayMethod::SetBlur,
            &BlurReq {
                blur_radius: *radius,
            },
        )?),
        Step::Position => reply(MethodCall::bare(OverlayMethod::GetPosition)),
        Step::Active => reply(MethodCall::bare(OverlayMethod::IsActive)),
        Step::Down { x, y } => Outcome::Consumed(handle.pointer(PointerEvent::Down { x: *x, y: *y })),
        Step::Drag { x, y } => Outcome::Consumed(handle.pointer(PointerEvent::Move { x: *x, y: *y })),
        Step::Up { x, y } => Outcome::Consumed(handle.pointer(PointerEvent::Up { x: *x, y: *y })),
        Step::Cancel { x, y } => {
            Outcome::Consumed(handle.pointer(PointerEvent::Cancel { x: *x, y: *y }))
        }
        Step::Sleep(raw) => {
            let d: Duration = humantime::parse_duration(raw).map_err(|source| Error::Duration {
                step: index,
                raw: raw.clone(),
                source,
            })?;
            thread::sleep(d);
            Outcome::Slept(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        }
    };
    debug!(step = index, op = step.name(), ?outcome, "step done");
    Ok(outcome)
}

/// Play `steps` in order, writing one JSON line per step and one per host
/// message observed along the way. Returns the number of failed calls.
pub fn run<W: Write>(
    handle: &ServerHandle,
    host_rx: &mut HostRx,
    steps: &[Step],
    out: &mut W,
) -> Result<usize> {
    let mut failures = 0;
    for (i, step) in steps.iter().enumerate() {
        let index = i + 1;
        let outcome = execute(handle, index, step)?;
        if matches!(outcome, Outcome::Err(_)) {
            failures += 1;
        }
        let line = Line {
            step: index,
            op: step.name(),
            outcome: &outcome,
        };
        serde_json::to_writer(&mut *out, &line)?;
        writeln!(out)?;
        drain_host(host_rx, out)?;
    }
    Ok(failures)
}

/// Host message output line.
#[derive(Debug, Serialize)]
struct HostLine<'a> {
    host: &'a MsgToHost,
    action: &'static str,
}

fn drain_host<W: Write>(host_rx: &mut HostRx, out: &mut W) -> Result<()> {
    while let Ok(msg) = host_rx.try_recv() {
        let line = HostLine {
            host: &msg,
            action: msg.action(),
        };
        serde_json::to_writer(&mut *out, &line)?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compact_script() {
        let steps = parse(
            r#"[
                Show(width: 200, height: 100, alignment: "topLeft", enableDrag: true),
                Move(x: 10, y: 20),
                Resize(width: -1, height: 300),
                UpdateFlag("clickThrough"),
                ClickThrough(false),
                Blur(8),
                Down(x: 1.0, y: 2.0),
                Sleep("20ms"),
                Position,
                Close,
            ]"#,
        )
        .unwrap();
        assert_eq!(steps.len(), 10);
        match &steps[0] {
            Step::Show(req) => {
                assert_eq!(req.width, Some(200));
                assert_eq!(req.alignment.as_deref(), Some("topLeft"));
                assert!(req.enable_drag);
                assert_eq!(req.flag, None);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            steps[2],
            Step::Resize {
                width: -1,
                height: 300,
                drag: false
            }
        );
        assert_eq!(steps[9], Step::Close);
    }

    #[test]
    fn rejects_unknown_steps() {
        assert!(matches!(parse("[Explode]"), Err(Error::Script(_))));
    }

    #[test]
    fn outcome_lines_are_flat_json() {
        let outcome = Outcome::Ok(MethodReply::Bool(true));
        let line = Line {
            step: 3,
            op: "active",
            outcome: &outcome,
        };
        assert_eq!(
            serde_json::to_string(&line).unwrap(),
            r#"{"step":3,"op":"active","ok":{"kind":"bool","value":true}}"#
        );
    }

    #[test]
    fn demo_snaps_right_and_closes() {
        use config::Settings;
        use overlay_server::{Server, headless::HeadlessPlatform};
        use overlay_winops::DisplayMetrics;

        let hp = HeadlessPlatform::new(Some(DisplayMetrics {
            width_px: 1080,
            height_px: 1920,
            density: 1.0,
            status_bar_px: 25,
        }));
        let settings = Settings {
            snap_interval_ms: 5,
            ..Settings::default()
        };
        let (server, mut host_rx) = Server::spawn(hp.platform(), settings).unwrap();
        let mut out = Vec::new();
        let failures = run(&server.handle(), &mut host_rx, &demo(), &mut out).unwrap();
        server.shutdown();
        assert_eq!(failures, 0);

        let lines: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), demo().len());
        assert_eq!(lines[1]["ok"]["value"], true);
        // Settled against the right edge: 1080 - 200.
        let x = lines[7]["ok"]["value"]["x"].as_f64().unwrap();
        assert!((x - 880.0).abs() < 2.0, "x = {x}");
        assert_eq!(lines[9]["ok"]["value"], false);
    }
}
