/// Headless simulator entry point for native builds
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    let args = sim::Args::parse();
    if let Err(e) = sim::run(args) {
        eprintln!("Simulation error: {}", e);
        std::process::exit(1);
    }
}

// The library is driven by the host on WASM; there is no simulator there
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod sim {
    use std::path::PathBuf;

    use clap::Parser;
    use dynback::{AmbientEngine, Clock, EngineConfig, ManualClock, RecordingSink, WorldContext};

    /// Drive the background color engine through a scripted session.
    #[derive(Debug, Parser)]
    #[command(name = "dynback-sim", version, about)]
    pub struct Args {
        /// Config file (defaults to the user config, then built-in defaults)
        #[arg(long)]
        pub config: Option<PathBuf>,

        /// Number of frames to simulate
        #[arg(long, default_value_t = 600)]
        pub frames: u32,

        /// Wall-clock duration of one frame
        #[arg(long, default_value_t = 16)]
        pub frame_ms: u64,

        /// Turn of the day the session starts at
        #[arg(long, default_value_t = 325)]
        pub start_turn: u32,

        /// Frames per in-game turn (0 freezes the clock of the day)
        #[arg(long, default_value_t = 1)]
        pub frames_per_turn: u32,

        /// Starting depth (defaults to ground level)
        #[arg(long)]
        pub depth: Option<i32>,

        /// Descend one level every N frames
        #[arg(long)]
        pub descend_every: Option<u32>,

        /// Play outside the tracked world
        #[arg(long)]
        pub thin_world: bool,

        /// Switch colors instantly instead of crossfading
        #[arg(long)]
        pub no_smooth: bool,

        /// Print the day table and exit
        #[arg(long)]
        pub print_table: bool,
    }

    fn load_config(args: &Args) -> Result<EngineConfig, dynback::ConfigError> {
        match &args.config {
            Some(path) => EngineConfig::load(path),
            None => Ok(EngineConfig::load_from_default_path().unwrap_or_default()),
        }
    }

    fn world_at(args: &Args, config: &EngineConfig, frame: u32) -> WorldContext {
        let turns = match args.frames_per_turn {
            0 => 0,
            n => frame / n,
        };
        let turn = (args.start_turn + turns) % config.turns_per_day;
        let levels = args.descend_every.filter(|&n| n > 0).map_or(0, |n| frame / n);
        let depth = args.depth.unwrap_or(config.ground_level_depth) + levels as i32;
        WorldContext::new(depth, !args.thin_world, turn as i32)
    }

    pub fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
        let config = load_config(&args)?;

        env_logger::Builder::new()
            .filter_level(config.log_level.to_level_filter())
            .parse_default_env()
            .init();

        let controller = config.build_controller()?;

        if args.print_table {
            let table = controller.table();
            println!("{} turns per day", table.turns_per_day());
            for segment in table.segments() {
                println!(
                    "{:>10}  turn {:>5}  {}",
                    segment.name(),
                    segment.anchor(),
                    segment.color()
                );
            }
            return Ok(());
        }

        let mut engine = AmbientEngine::new(
            controller,
            ManualClock::new(),
            world_at(&args, &config, 0),
            RecordingSink::new(),
        );
        engine.set_smooth_transitions(config.smooth_transitions && !args.no_smooth);

        log::info!(
            "Simulating {} frames of {}ms starting at turn {}",
            args.frames,
            args.frame_ms,
            args.start_turn
        );

        let mut seen = 0;
        for frame in 0..args.frames {
            if frame > 0 {
                engine.clock().advance(args.frame_ms);
            }
            *engine.world_mut() = world_at(&args, &config, frame);
            let ctx = engine.on_tick()?;

            for push in &engine.sink().pushes()[seen..] {
                if push.is_final {
                    println!(
                        "frame {:>6}  {:>8}ms  depth {:>3}  turn {:>5}  {}",
                        frame,
                        engine.clock().now_millis(),
                        ctx.depth,
                        ctx.turn,
                        push.color
                    );
                }
            }
            seen = engine.sink().len();
        }

        engine.on_game_end();
        println!(
            "game over: background reset to {}",
            engine.controller().last_committed()
        );
        Ok(())
    }
}
