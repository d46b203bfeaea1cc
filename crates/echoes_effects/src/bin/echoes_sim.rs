//! # ECHOES Headless Simulator
//!
//! Runs every configured layer against a recording canvas, drives it with a
//! scripted pointer path, clicks and scrolling, then prints per-layer
//! statistics. Useful for tuning profiles and tiers without a browser.
//!
//! ```text
//! echoes_sim [--profiles FILE] [--frames N] [--tier full|balanced|low] [--log LEVEL]
//! ```

use std::process::ExitCode;
use std::rc::Rc;

use tracing::Level;

use echoes_effects::{
    Effect, EffectResult, ManualFrameHost, PerformanceTier, ProfileConfig, RecordingCanvas,
    Viewport,
};
use echoes_input::{InputHub, SharedInput};

/// Spacing of simulated display callbacks (60 Hz).
const CALLBACK_MS: f64 = 1_000.0 / 60.0;

/// Simulated window.
const VIEWPORT: Viewport = Viewport::new(1920.0, 1080.0, 2.0);

/// Default run length (10 s at 60 Hz).
const DEFAULT_FRAMES: u32 = 600;

struct Options {
    profiles: Option<String>,
    frames: u32,
    tier: Option<PerformanceTier>,
    level: Level,
}

fn print_usage() {
    println!("Usage: echoes_sim [options]");
    println!();
    println!("Options:");
    println!("  --profiles <file>   Profile TOML (default: every preset)");
    println!("  --frames <n>        Display callbacks to simulate (default: {DEFAULT_FRAMES})");
    println!("  --tier <tier>       full | balanced | low (overrides the file)");
    println!("  --log <level>       trace | debug | info | warn | error (default: info)");
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        profiles: None,
        frames: DEFAULT_FRAMES,
        tier: None,
        level: Level::INFO,
    };

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{flag} needs a value"))
        };
        match flag.as_str() {
            "--profiles" => options.profiles = Some(value()?),
            "--frames" => {
                let raw = value()?;
                options.frames = raw
                    .parse()
                    .map_err(|_| format!("--frames expects a number, got `{raw}`"))?;
            }
            "--tier" => {
                let raw = value()?;
                options.tier = Some(PerformanceTier::parse(&raw).map_err(|e| e.to_string())?);
            }
            "--log" => {
                options.level = match value()?.to_ascii_lowercase().as_str() {
                    "trace" => Level::TRACE,
                    "debug" => Level::DEBUG,
                    "info" => Level::INFO,
                    "warn" => Level::WARN,
                    "error" => Level::ERROR,
                    other => return Err(format!("unknown log level `{other}`")),
                };
            }
            other => return Err(format!("unknown option `{other}`")),
        }
    }
    Ok(options)
}

/// Pointer sweeps for the first 60% of the run, then the page goes quiet.
fn script_input(hub: &mut InputHub, frame: u32, now_ms: f64) {
    let active = frame % 500 < 300;
    if !active {
        return;
    }

    let t = now_ms as f32;
    let x = 960.0 + (t * 0.002).cos() * 600.0;
    let y = 540.0 + (t * 0.003).sin() * 300.0;
    hub.pointer_moved(x, y, now_ms);

    if frame % 45 == 0 {
        hub.clicked(x, y, now_ms);
    }
    if frame % 20 == 0 {
        hub.scrolled(frame as f32 * 15.0, now_ms);
    }
}

fn load_config(options: &Options) -> EffectResult<ProfileConfig> {
    let mut config = match &options.profiles {
        Some(path) => ProfileConfig::from_toml_file(path)?,
        None => ProfileConfig::all_presets(PerformanceTier::default()),
    };
    if let Some(tier) = options.tier {
        config.tier = tier;
    }
    Ok(config)
}

fn run(options: &Options) -> EffectResult<()> {
    let config = load_config(options)?;
    let profiles = config.resolve()?;
    let elapsed_ms = f64::from(options.frames) * CALLBACK_MS;

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         ECHOES HEADLESS SIMULATOR                                ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!(
        "viewport {}x{} @ {}x, tier {:?}, {} callbacks ({:.1} s)",
        VIEWPORT.width,
        VIEWPORT.height,
        VIEWPORT.device_pixel_ratio,
        config.tier,
        options.frames,
        elapsed_ms / 1_000.0
    );
    println!();
    println!(
        "{:<16} {:>7} {:>6} {:>7} {:>6} {:>8} {:>7} {:>6} {:>9} {:>9}",
        "layer", "records", "ticks", "dropped", "fps", "spawned", "pruned", "draws", "worst_us", "commands"
    );

    for (index, profile) in profiles.into_iter().enumerate() {
        let hub: SharedInput = InputHub::new(profile.idle.timeout_ms, 0.0).shared();
        let name = profile.name.clone();
        let mut effect = Effect::new(
            profile,
            Some(RecordingCanvas::new()),
            Rc::clone(&hub),
            index as u64 + 1,
        );
        let mut host = ManualFrameHost::new();

        effect.resize(VIEWPORT);
        effect.start(&mut host);

        let mut commands = 0usize;
        for frame in 0..options.frames {
            let now = f64::from(frame) * CALLBACK_MS;
            script_input(&mut hub.borrow_mut(), frame, now);
            effect.on_frame(now, &mut host);
            if let Some(canvas) = effect.canvas_mut() {
                commands += canvas.take_commands().len();
            }
        }

        let stats = effect.stats();
        println!(
            "{:<16} {:>7} {:>6} {:>7} {:>6.1} {:>8} {:>7} {:>6} {:>9} {:>9}",
            name,
            stats.records,
            stats.ticks,
            stats.dropped_frames,
            stats.effective_fps(elapsed_ms),
            stats.spawned_total,
            stats.pruned_total,
            stats.last_draw.draw_calls,
            stats.worst_tick_us,
            commands
        );
        effect.teardown(&mut host);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}");
            print_usage();
            return ExitCode::from(2);
        }
    };

    if let Err(err) = tracing_subscriber::fmt()
        .with_max_level(options.level)
        .with_target(false)
        .try_init()
    {
        eprintln!("warning: logging disabled: {err}");
    }

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "simulation failed");
            ExitCode::FAILURE
        }
    }
}
