//! Tri-Hunt headless runner
//!
//! Plays a run with the autopilot at a fixed frame step and reports how it
//! went. Handy for checking a tuning sheet without a renderer.
//!
//! Usage:
//!   cargo run --release -- --seed 7 --seconds 90
//!   RUST_LOG=info cargo run -- --second-stage --tuning balance.json

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use tri_hunt::consts::TARGET_FRAME_MS;
    use tri_hunt::sim::{FrameView, GamePhase, GameState, TickInput, tick};
    use tri_hunt::{Bounds, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "tri-hunt")]
    #[command(about = "Run a Tri-Hunt encounter headless with the autopilot")]
    struct Args {
        /// Run seed
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// JSON tuning sheet; missing fields keep their defaults
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Simulated seconds before giving up
        #[arg(long, default_value_t = 120.0)]
        seconds: f64,

        /// Elapsed time fed to each tick, in ms
        #[arg(long, default_value_t = TARGET_FRAME_MS)]
        step_ms: f64,

        /// Start at the decoy stage
        #[arg(long)]
        second_stage: bool,

        /// Arena width
        #[arg(long, default_value_t = 1280.0)]
        width: f32,

        /// Arena height
        #[arg(long, default_value_t = 720.0)]
        height: f32,

        /// Print the final frame snapshot as JSON
        #[arg(long)]
        dump_frame: bool,
    }

    fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read tuning sheet {}", path.display()))?;
        Tuning::from_json(&json).with_context(|| format!("invalid tuning sheet {}", path.display()))
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        if args.step_ms <= 0.0 {
            bail!("--step-ms must be positive");
        }
        let tuning = load_tuning(args.tuning.as_ref())?;
        let bounds = Bounds::new(args.width, args.height);

        let mut state = if args.second_stage {
            GameState::at_second_stage(args.seed, tuning, bounds)
        } else {
            GameState::new(args.seed, tuning, bounds)
        };
        log::info!("Tri-Hunt (headless) seed {} for {:.0}s", args.seed, args.seconds);

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let limit_ms = args.seconds * 1000.0;
        let mut simulated = 0.0;
        while simulated < limit_ms && !state.phase.is_over() {
            tick(&mut state, &input, args.step_ms);
            simulated += args.step_ms;
        }

        let outcome = match state.phase {
            GamePhase::Won => "won",
            GamePhase::Lost => "lost",
            _ => "timed out",
        };
        println!("=== RUN RESULT ===");
        println!("  Seed:     {}", state.seed);
        println!("  Outcome:  {}", outcome);
        println!("  Phase:    {:?}", state.phase);
        println!("  Ticks:    {}", state.ticks);
        println!("  Clock:    {:.1}s", state.clock_ms / 1000.0);
        if let Some(manager) = &state.encounter {
            println!("  Decoys:   {}", manager.decoys().len());
        }

        if args.dump_frame {
            let frame = FrameView::capture(&state);
            println!(
                "{}",
                serde_json::to_string_pretty(&frame).context("failed to serialize frame")?
            );
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation library is the wasm surface; there is no runner there
}
