use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use spritecap::{
    AngleSpec, AnimationClip, CapturePlan, CaptureSettings, CellSize, ClipPlayer, DirectorySink,
    FrameRGBA, HeadlessDevice, NoopHost, OrbitRing, RenderContext, RenderedFrame,
    SpriteSheetArtifact, TracingProgress, Viewport,
    atlas::naming::sheet_base_name,
    capture::{
        cancel::CancelToken,
        orchestrator::{CaptureEnv, CaptureOrchestrator, OrchestratorOptions},
    },
    plan::viewpoint::{CURRENT_VIEW_LABEL, plan_angles},
    scene::camera::PreviewRig,
};

#[derive(Parser, Debug)]
#[command(name = "spritecap", version)]
struct Cli {
    /// Log at debug level.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a directory of PNG frames into a sprite sheet.
    Compose(ComposeArgs),
    /// Capture a sprite sheet per angle with the headless renderer.
    Capture(CaptureArgs),
    /// Print the camera placements a run would use, as JSON.
    Plan(PlanArgs),
    /// Print the content bounds of one PNG frame, as JSON.
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct SheetArgs {
    /// Capture settings JSON; flags below override individual fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Atlas grid width in cells.
    #[arg(long)]
    columns: Option<u32>,

    /// Cell width in pixels.
    #[arg(long)]
    cell_width: Option<u32>,

    /// Cell height in pixels.
    #[arg(long)]
    cell_height: Option<u32>,

    /// Crop frames to their content and centre them.
    #[arg(long, default_value_t = false)]
    optimize: bool,
}

impl SheetArgs {
    fn settings(&self) -> anyhow::Result<CaptureSettings> {
        let mut s = match &self.config {
            Some(path) => CaptureSettings::load(path)?,
            None => CaptureSettings::default(),
        };
        if let Some(v) = self.columns {
            s.columns = v;
        }
        if let Some(v) = self.cell_width {
            s.cell_width = v;
        }
        if let Some(v) = self.cell_height {
            s.cell_height = v;
        }
        s.optimize |= self.optimize;
        Ok(s.sanitized())
    }
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Directory of `*.png` frames, composed in file-name order.
    #[arg(long)]
    frames: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Animation name used for file names and metadata.
    #[arg(long)]
    animation: Option<String>,

    /// Angle label appended to the file base.
    #[arg(long)]
    angle: Option<String>,

    #[command(flatten)]
    sheet: SheetArgs,
}

#[derive(Parser, Debug)]
struct CaptureArgs {
    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Name of the proxy animation clip.
    #[arg(long, default_value = "Walk")]
    animation: String,

    /// Clip duration in seconds.
    #[arg(long, default_value_t = 1.0)]
    duration: f64,

    /// Frames sampled per angle.
    #[arg(long)]
    frame_count: Option<u32>,

    /// Capture the 8-angle ring.
    #[arg(long, default_value_t = false)]
    isometric: bool,

    /// Capture only the current preview view.
    #[arg(long, default_value_t = false, conflicts_with = "isometric")]
    current_view: bool,

    /// Per-frame render wait limit in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[command(flatten)]
    sheet: SheetArgs,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Plan the 8-angle ring.
    #[arg(long, default_value_t = false)]
    isometric: bool,

    /// Preview zoom factor.
    #[arg(long, default_value_t = spritecap::scene::camera::DEFAULT_ZOOM)]
    zoom: f64,

    /// Horizontal pan offset.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pan_x: f64,

    /// Vertical pan offset.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pan_y: f64,
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Input PNG frame.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Capture(args) => cmd_capture(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Analyze(args) => cmd_analyze(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_frame(path: &Path) -> anyhow::Result<FrameRGBA> {
    let img = image::open(path).with_context(|| format!("read frame '{}'", path.display()))?;
    Ok(FrameRGBA::from_image(img.to_rgba8()))
}

fn png_frames(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("read frames dir '{}'", dir.display()))?
    {
        let path = entry?.path();
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let paths = png_frames(&args.frames)?;
    anyhow::ensure!(
        !paths.is_empty(),
        "no png frames in '{}'",
        args.frames.display()
    );
    let frames = paths
        .iter()
        .zip(0u32..)
        .map(|(path, index)| {
            Ok(RenderedFrame {
                index,
                image: load_frame(path)?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let settings = args.sheet.settings()?;
    let label = args
        .angle
        .clone()
        .unwrap_or_else(|| CURRENT_VIEW_LABEL.to_string());
    let plan = CapturePlan::new(
        frames.len() as u32,
        settings.columns,
        CellSize::new(settings.cell_width, settings.cell_height)?,
        settings.optimize,
        vec![AngleSpec {
            degrees: None,
            label: label.clone(),
        }],
    )?;

    let animation = args.animation.unwrap_or_else(|| {
        args.frames
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let sheet = spritecap::compose(&frames, &plan)?;
    let base = sheet_base_name(&animation, &label, args.angle.is_some());
    let artifact =
        SpriteSheetArtifact::new(base, &label, &animation, &plan, sheet, chrono::Utc::now())?;

    let mut sink = DirectorySink::new(&args.out);
    spritecap::persist_artifact(&mut sink, &artifact)?;
    eprintln!("wrote {}", args.out.join(artifact.image_file_name()).display());
    Ok(())
}

fn cmd_capture(args: CaptureArgs) -> anyhow::Result<()> {
    let mut settings = args.sheet.settings()?;
    if let Some(v) = args.frame_count {
        settings.frame_count = v;
    }
    settings.isometric |= args.isometric;
    let settings = settings.sanitized();

    let mut plan = CapturePlan::from_settings(&settings)?;
    if args.current_view {
        plan = plan.with_angles(vec![AngleSpec::current_view()])?;
    }

    let mut opts = OrchestratorOptions::default();
    if let Some(ms) = args.timeout_ms {
        opts.sampler.wait_timeout = Some(std::time::Duration::from_millis(ms));
    }
    let orchestrator = CaptureOrchestrator::new(opts);

    let mut player = ClipPlayer::new(vec![AnimationClip::new(&args.animation, args.duration)]);
    let device = HeadlessDevice::new(Viewport::new(800, 600)).with_probe(player.probe());
    let mut ctx = RenderContext::new(device, PreviewRig::default());
    let mut host = NoopHost;
    let mut progress = TracingProgress;
    let mut sink = DirectorySink::new(&args.out);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build async runtime")?;
    let report = runtime.block_on(async {
        let mut env = CaptureEnv {
            driver: &mut player,
            ctx: &mut ctx,
            host: &mut host,
            progress: &mut progress,
            sink: Some(&mut sink),
            cancel: CancelToken::new(),
        };
        orchestrator.run_capture(&plan, &mut env).await
    })?;

    for artifact in &report.artifacts {
        eprintln!("wrote {}", args.out.join(artifact.image_file_name()).display());
    }
    anyhow::ensure!(
        report.failures.is_empty(),
        "{} angle(s) failed",
        report.failures.len()
    );
    Ok(())
}

#[derive(serde::Serialize)]
struct PlannedView {
    label: String,
    degrees: Option<f64>,
    position: [f64; 3],
    look_at: [f64; 3],
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let rig = PreviewRig {
        zoom: args.zoom,
        pan: spritecap::foundation::core::DVec2::new(args.pan_x, args.pan_y),
        ..PreviewRig::default()
    };
    let camera = rig.preview_pose();
    let ring = OrbitRing::from_camera(camera.position, rig.pivot());

    let views: Vec<PlannedView> = plan_angles(args.isometric)
        .into_iter()
        .map(|angle| {
            let (position, look_at) = match angle.degrees {
                Some(deg) => {
                    let p = ring.placement(deg);
                    (p.position, p.look_at)
                }
                None => (camera.position, camera.look_at),
            };
            PlannedView {
                label: angle.label,
                degrees: angle.degrees,
                position: position.to_array(),
                look_at: look_at.to_array(),
            }
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&views)?);
    Ok(())
}

fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let frame = load_frame(&args.in_path)?;
    let fallback = CellSize::new(frame.width.max(1), frame.height.max(1))?;
    let analysis = spritecap::analyze(&frame, fallback);
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
