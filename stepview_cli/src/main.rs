//! Stepview headless inspector CLI
//!
//! Load a recorded trace and inspect playback structure and per-collision
//! diagnostics without a render surface.

use clap::Parser;
use std::path::PathBuf;
use stepview_core::{contact_kinematics, loader, CollisionIndex, Frame, Trace};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Inspect a recorded physics trace
#[derive(Parser, Debug)]
#[command(name = "stepview")]
#[command(about = "Inspect recorded physics traces", long_about = None)]
struct Args {
    /// Trace file (plain JSON5 or the embedded base64 encoding)
    file: PathBuf,

    /// Print one frame's state and collision diagnostics
    #[arg(short, long)]
    frame: Option<usize>,

    /// List every collision frame position
    #[arg(short, long)]
    collisions: bool,

    /// JSON output for tooling
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn frame_summary(trace: &Trace, pos: usize, frame: &Frame) -> serde_json::Value {
    let collisions: Vec<serde_json::Value> = frame
        .collisions
        .iter()
        .map(|collision| {
            let k = contact_kinematics(&frame.ball, collision);
            serde_json::json!({
                "depth": collision.manifold.depth,
                "contact": [k.start.x, k.start.y],
                "contact_end": [k.end.x, k.end.y],
                "relative_velocity": [k.relative_velocity.x, k.relative_velocity.y],
                "relative_speed_sq": k.relative_speed_sq,
                "collider": collision.body.shape_label,
                "capsule": k.capsule.map(|c| {
                    serde_json::json!({
                        "point": [c.point.x, c.point.y],
                        "t": c.t,
                        "radius": c.radius,
                        "point_velocity": [c.point_velocity.x, c.point_velocity.y],
                    })
                }),
            })
        })
        .collect();

    serde_json::json!({
        "position": pos,
        "label": frame.label,
        "tick": frame.tick_index,
        "substep": frame.substep_index,
        "ball": {
            "pos": [frame.ball.position.x, frame.ball.position.y],
            "vel": [frame.ball.velocity.x, frame.ball.velocity.y],
            "ang_vel": frame.ball.angular_velocity,
        },
        "collisions": collisions,
        "total_frames": trace.len(),
    })
}

fn print_frame(pos: usize, frame: &Frame) {
    info!("frame {} | {}", pos, frame.label);
    info!(
        "  tick {} substep {} | ball pos ({:.3}, {:.3}) vel ({:.3}, {:.3}) ang_vel {:.3}",
        frame.tick_index,
        frame.substep_index,
        frame.ball.position.x,
        frame.ball.position.y,
        frame.ball.velocity.x,
        frame.ball.velocity.y,
        frame.ball.angular_velocity,
    );

    for (i, collision) in frame.collisions.iter().enumerate() {
        let k = contact_kinematics(&frame.ball, collision);
        info!(
            "  collision {} vs {} | depth {:.4} | contact ({:.3}, {:.3})",
            i,
            collision.body.shape_label,
            collision.manifold.depth,
            k.start.x,
            k.start.y,
        );
        info!(
            "    rel vel ({:.4}, {:.4}) | rel speed² {:.4}",
            k.relative_velocity.x, k.relative_velocity.y, k.relative_speed_sq,
        );
        if let Some(capsule) = k.capsule {
            info!(
                "    capsule contact at ({:.3}, {:.3}) t={:.3} r={:.3} vel ({:.4}, {:.4})",
                capsule.point.x,
                capsule.point.y,
                capsule.t,
                capsule.radius,
                capsule.point_velocity.x,
                capsule.point_velocity.y,
            );
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let payload = match std::fs::read_to_string(&args.file) {
        Ok(payload) => payload,
        Err(e) => {
            error!("cannot read {}: {}", args.file.display(), e);
            std::process::exit(1);
        }
    };

    let trace = match loader::load_trace(&payload) {
        Ok(trace) => trace,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let index = CollisionIndex::build(&trace.frames);

    if let Some(pos) = args.frame {
        let Some(frame) = trace.frames.get(pos) else {
            error!("frame {} out of range (trace has {})", pos, trace.len());
            std::process::exit(1);
        };

        if args.json {
            let summary = frame_summary(&trace, pos, frame);
            println!("{}", serde_json::to_string_pretty(&summary).unwrap());
        } else {
            print_frame(pos, frame);
        }
        return;
    }

    let last_tick = trace.frames.last().map(|f| f.tick_index).unwrap_or(0);

    if args.json {
        let summary = serde_json::json!({
            "frames": trace.len(),
            "ticks": last_tick,
            "static_bodies": trace.static_bodies.len(),
            "collision_frames": index.len(),
            "collision_positions": if args.collisions {
                Some(index.positions())
            } else {
                None
            },
        });
        println!("{}", serde_json::to_string_pretty(&summary).unwrap());
        return;
    }

    info!("{} frames across {} ticks", trace.len(), last_tick);
    info!(
        "{} static bodies | {} frames with collisions",
        trace.static_bodies.len(),
        index.len()
    );

    if args.collisions {
        for &pos in index.positions() {
            let frame = &trace.frames[pos];
            let depth: f64 = frame.collisions.iter().map(|c| c.manifold.depth).sum();
            info!(
                "  frame {:>6} | tick {}.{} | {} contact(s) | depth sum {:.4}",
                pos,
                frame.tick_index,
                frame.substep_index,
                frame.collisions.len(),
                depth,
            );
        }
    } else if let Some(first) = index.first() {
        info!("first collision at frame {}", first);
    }
}
