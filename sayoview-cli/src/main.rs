use clap::Parser;
use sayoview_lib::{Acquisition, Pacer, SayoScreen, ScreenViewer};
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::info;

/// Stream the SayoDevice onboard screen and report the achieved frame rate.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Consumer FPS limit (0 = device default rate)
    #[arg(short, long, default_value = "60")]
    fps: u32,

    /// How long to stream, in seconds
    #[arg(short, long, default_value = "10")]
    duration: u64,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    let screen = SayoScreen::open()?;
    println!("Connected to SayoDevice screen interface");

    let shutdown = Arc::new(AtomicBool::new(false));
    let (frames, handle) = Acquisition::new(screen).spawn(shutdown.clone());

    let mut viewer = ScreenViewer::new(frames);
    let pacer = Pacer::new(args.fps);
    let end = Instant::now() + Duration::from_secs(args.duration);

    let mut decoded_frames = 0u64;
    let mut last_report = Instant::now();
    while Instant::now() < end {
        if viewer.poll().is_some() {
            decoded_frames += 1;
        }
        if last_report.elapsed() >= Duration::from_secs(1) {
            println!("display: {} FPS, {} frames decoded", viewer.fps(), decoded_frames);
            last_report = Instant::now();
        }
        pacer.pause();
    }

    info!("shutting down acquisition loop");
    shutdown.store(true, Ordering::Relaxed);
    handle.join().map_err(|_| "acquisition thread panicked")?;

    println!("Done: {decoded_frames} frames decoded in {} s", args.duration);
    Ok(())
}
