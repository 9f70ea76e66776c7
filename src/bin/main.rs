use std::time::{Duration, Instant};

use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use dust_field::{EdgeMode, FieldConfig, ParticleField, ResizeMode, Scene};
use eframe::egui;
use log::info;

const SIM_RATE: f32 = 60.0;
const MAX_STEPS_PER_FRAME: u32 = 5;
const RESIZE_DEBOUNCE: Duration = Duration::from_millis(200);
const INITIAL_WIDTH: f32 = 1280.0;
const INITIAL_HEIGHT: f32 = 720.0;
const BACKDROP: egui::Color32 = egui::Color32::from_rgb(15, 26, 46);

#[derive(Parser, Debug)]
#[command(name = "dust-field", about = "Ambient particle field in a window")]
struct Args {
    /// Upper bound on the particle count
    #[arg(long)]
    cap: Option<usize>,

    /// Surface area, in square pixels, allotted to one particle
    #[arg(long)]
    area_per_particle: Option<f32>,

    /// Policy for particles crossing a surface edge
    #[arg(long, value_enum)]
    edge: Option<Edge>,

    /// Policy for restoring density after a viewport resize
    #[arg(long, value_enum)]
    resize: Option<Resize>,

    /// Disable the connective lines between nearby particles
    #[arg(long)]
    no_links: bool,

    /// Distance, in pixels, under which two particles are linked
    #[arg(long)]
    link_distance: Option<f32>,

    /// Constant upward bias added to the spawn velocity
    #[arg(long)]
    drift: Option<f32>,

    /// Start from the rising-ember preset instead of the default field
    #[arg(long)]
    ember: bool,

    /// Seed the field for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Edge {
    Wrap,
    Respawn,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Resize {
    Retain,
    Rebuild,
}

impl From<Edge> for EdgeMode {
    fn from(edge: Edge) -> Self {
        match edge {
            Edge::Wrap => EdgeMode::Wrap,
            Edge::Respawn => EdgeMode::Respawn,
        }
    }
}

impl From<Resize> for ResizeMode {
    fn from(resize: Resize) -> Self {
        match resize {
            Resize::Retain => ResizeMode::Retain,
            Resize::Rebuild => ResizeMode::Rebuild,
        }
    }
}

impl Args {
    // Flags override the chosen preset only when given on the command line.
    fn field_config(&self) -> FieldConfig {
        let mut config = if self.ember {
            FieldConfig::ember()
        } else {
            FieldConfig::default()
        };
        if let Some(cap) = self.cap {
            config.max_particles = cap;
        }
        if let Some(area) = self.area_per_particle {
            config.area_per_particle = area;
        }
        if let Some(edge) = self.edge {
            config.edge = edge.into();
        }
        if let Some(resize) = self.resize {
            config.resize = resize.into();
        }
        if let Some(drift) = self.drift {
            config.upward_drift = drift;
        }
        if self.no_links {
            config.links = None;
        } else if let Some(distance) = self.link_distance {
            config
                .links
                .get_or_insert_with(Default::default)
                .max_distance = distance;
        }
        config
    }
}

struct FieldApp {
    field: ParticleField,
    last_frame: Instant,
    accumulated: Duration,
    pending_resize: Option<(egui::Vec2, Instant)>,
    paused: bool,
    frame_time: f32,
}

impl FieldApp {
    fn new(config: FieldConfig, seed: Option<u64>) -> Self {
        let field = match seed {
            Some(seed) => ParticleField::with_seed(config, INITIAL_WIDTH, INITIAL_HEIGHT, seed),
            None => ParticleField::new(config, INITIAL_WIDTH, INITIAL_HEIGHT),
        };
        Self {
            field,
            last_frame: Instant::now(),
            accumulated: Duration::ZERO,
            pending_resize: None,
            paused: false,
            frame_time: 0.0,
        }
    }

    // Viewport changes are coalesced: the field only sees dimensions that
    // have held still for the debounce window, always between frames.
    fn queue_resize(&mut self, size: egui::Vec2, now: Instant) {
        let bounds = self.field.bounds();
        if (size.x - bounds.x).abs() < 0.5 && (size.y - bounds.y).abs() < 0.5 {
            self.pending_resize = None;
            return;
        }
        match self.pending_resize {
            Some((pending, since)) if (pending - size).length() < 0.5 => {
                if now.duration_since(since) >= RESIZE_DEBOUNCE {
                    self.field.resize(size.x, size.y);
                    self.pending_resize = None;
                }
            }
            _ => self.pending_resize = Some((size, now)),
        }
    }
}

impl eframe::App for FieldApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_time = frame_time.as_secs_f32();

        // Window focus stands in for page visibility: an unfocused window
        // schedules no ticks until focus returns.
        let focused = ctx.input(|i| i.raw.has_focus);
        let running = focused && !self.paused;
        let resumed = running && !self.field.is_visible();
        if running != self.field.is_visible() {
            self.field.set_visible(running);
            self.accumulated = Duration::ZERO;
        }

        // The gap spent suspended is not simulation time; a resume frame
        // starts from an empty accumulator.
        if running && !resumed {
            self.accumulated += frame_time;
        }
        let step = Duration::from_secs_f32(1.0 / SIM_RATE);
        let mut steps = 0;
        while self.accumulated >= step && steps < MAX_STEPS_PER_FRAME {
            self.field.advance(1.0);
            self.accumulated -= step;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME {
            // A stalled frame drains here rather than replaying the backlog.
            self.accumulated = Duration::ZERO;
        }

        egui::SidePanel::left("control_panel").show(ctx, |ui| {
            ui.label(format!("Frame Time: {:.2}ms", self.frame_time * 1000.0));
            ui.label(format!("Particles: {}", self.field.len()));
            ui.label(format!(
                "State: {}",
                if self.field.is_visible() {
                    "running"
                } else {
                    "suspended"
                }
            ));
            ui.checkbox(&mut self.paused, "Pause");
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKDROP))
            .show(ctx, |ui| {
                let (rect, _response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
                self.queue_resize(rect.size(), now);
                paint_scene(&ui.painter_at(rect), rect.min, &self.field.scene());
            });

        if running || self.pending_resize.is_some() {
            ctx.request_repaint();
        }
    }
}

fn paint_scene(painter: &egui::Painter, origin: egui::Pos2, scene: &Scene) {
    for dot in &scene.dots {
        painter.circle_filled(
            origin + egui::vec2(dot.center.x, dot.center.y),
            dot.radius,
            tint(dot.color, dot.opacity),
        );
    }
    for link in &scene.links {
        painter.line_segment(
            [
                origin + egui::vec2(link.from.x, link.from.y),
                origin + egui::vec2(link.to.x, link.to.y),
            ],
            egui::Stroke::new(link.width, tint(link.color, link.opacity)),
        );
    }
}

fn tint([r, g, b]: [u8; 3], opacity: f32) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(r, g, b, (opacity.clamp(0.0, 1.0) * 255.0) as u8)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.field_config();
    let seed = args.seed;
    info!("starting field: {config:?}");

    eframe::run_native(
        "Dust Field",
        eframe::NativeOptions {
            initial_window_size: Some(egui::vec2(INITIAL_WIDTH, INITIAL_HEIGHT)),
            ..Default::default()
        },
        Box::new(move |_cc| Box::new(FieldApp::new(config, seed))),
    )
    .map_err(|err| anyhow!("window setup failed: {err}"))
}
