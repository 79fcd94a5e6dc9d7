use clap::Parser;
use eframe::egui;
use sayoview_lib::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use sayoview_lib::{Acquisition, Pacer, SayoScreen, ScreenViewer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use tracing::{error, info};

/// Live viewer for the SayoDevice onboard screen.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Display FPS limit (0 = device default rate)
    #[arg(short, long, default_value = "60")]
    fps: u32,

    /// Integer scale factor for the 160x80 panel
    #[arg(short, long, default_value = "4")]
    scale: u32,
}

struct ViewerApp {
    viewer: ScreenViewer,
    pacer: Pacer,
    scale: f32,
    texture: Option<egui::TextureHandle>,
    shutdown: Arc<AtomicBool>,
    acquisition: Option<JoinHandle<()>>,
}

impl ViewerApp {
    fn new(
        viewer: ScreenViewer,
        pacer: Pacer,
        scale: u32,
        shutdown: Arc<AtomicBool>,
        acquisition: JoinHandle<()>,
    ) -> Self {
        Self {
            viewer,
            pacer,
            scale: scale as f32,
            texture: None,
            shutdown,
            acquisition: Some(acquisition),
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(decoded) = self.viewer.poll() {
            let image = egui::ColorImage::from_rgb([decoded.width(), decoded.height()], decoded.rgb());
            match &mut self.texture {
                Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
                None => {
                    self.texture = Some(ctx.load_texture("screen", image, egui::TextureOptions::NEAREST));
                }
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            match &self.texture {
                Some(texture) => {
                    let size = egui::vec2(
                        SCREEN_WIDTH as f32 * self.scale,
                        SCREEN_HEIGHT as f32 * self.scale,
                    );
                    ui.image((texture.id(), size));
                }
                None => {
                    ui.label("Waiting for the first frame...");
                }
            }
            ui.label(format!("FPS: {}", self.viewer.fps()));
        });

        // Paced repaints instead of a free-running loop
        ctx.request_repaint_after(self.pacer.interval());
    }
}

impl Drop for ViewerApp {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.acquisition.take() {
            if handle.join().is_err() {
                error!("acquisition thread panicked");
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let screen = SayoScreen::open()?;
    info!("starting SayoDevice screen viewer");

    let shutdown = Arc::new(AtomicBool::new(false));
    let (frames, handle) = Acquisition::new(screen).spawn(shutdown.clone());
    let app = ViewerApp::new(
        ScreenViewer::new(frames),
        Pacer::new(args.fps),
        args.scale.max(1),
        shutdown,
        handle,
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                (SCREEN_WIDTH as u32 * args.scale.max(1)) as f32,
                (SCREEN_HEIGHT as u32 * args.scale.max(1)) as f32 + 24.0,
            ])
            .with_title("SayoDevice Screen Viewer"),
        ..Default::default()
    };

    eframe::run_native("SayoDevice Screen Viewer", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}
