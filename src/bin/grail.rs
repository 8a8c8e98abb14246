use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "grail", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the composition as a PNG.
    Frame(FrameArgs),
    /// Render one output window, corner-pin applied, as a PNG.
    Output(OutputArgs),
    /// Render the operator preview as a PNG.
    Preview(PreviewArgs),
    /// Render a bare test card as a PNG.
    Testcard(TestcardArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Session JSON whose recall table is restored first.
    #[arg(long)]
    session: Option<PathBuf>,

    /// JSON array of control messages applied after the session.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Directory of fonts for the text overlay (falls back to GRAIL_FONT_DIR).
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Base directory for relative layer sources (defaults to the script's directory).
    #[arg(long)]
    media_root: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct OutputArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output index in the session (0-based).
    #[arg(long, default_value_t = 0)]
    index: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Preview widget width.
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Preview widget height.
    #[arg(long, default_value_t = 360)]
    height: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct TestcardArgs {
    /// Card width.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Card height.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Directory of fonts for the label (falls back to GRAIL_FONT_DIR).
    #[arg(long)]
    fonts: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Output(args) => cmd_output(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Testcard(args) => cmd_testcard(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_session(path: Option<&Path>) -> anyhow::Result<grail::Session> {
    match path {
        Some(path) => Ok(grail::Session::load(path)?),
        None => Ok(grail::Session::default()),
    }
}

/// Restore the session, play the script, and composite one frame.
fn render_scene(args: &SceneArgs, session: &grail::Session) -> anyhow::Result<grail::Frame> {
    let mut controller = grail::Controller::default();
    let restored = session.restore(&mut controller);
    tracing::debug!(applied = restored.applied, rejected = restored.rejected, "session restored");

    if let Some(script) = &args.script {
        let tx = controller.sender();
        for msg in grail::load_script(script)? {
            tx.send(msg).context("queue script message")?;
        }
        let stats = controller.pump();
        if stats.rejected > 0 {
            eprintln!("{} script message(s) rejected", stats.rejected);
        }
    }

    let root = args
        .media_root
        .clone()
        .or_else(|| args.script.as_deref().and_then(Path::parent).map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    let mut frames = grail::StillImageProvider::with_root(root);
    let mut renderer = grail::CpuRenderer::new(grail::FontBook::discover(args.fonts.as_deref()));
    Ok(renderer.render(controller.scene(), &mut frames)?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let session = load_session(args.scene.session.as_deref())?;
    let frame = render_scene(&args.scene, &session)?;
    write_png(&args.out, &frame)
}

fn cmd_output(args: OutputArgs) -> anyhow::Result<()> {
    let path = args
        .scene
        .session
        .as_deref()
        .context("`grail output` needs --session")?;
    let session = grail::Session::load(path)?;
    let outputs = session.outputs()?;
    let target = outputs
        .get(args.index)
        .with_context(|| format!("session has no output {}", args.index))?;

    let frame = render_scene(&args.scene, &session)?;
    let Some(out) = target.render(&frame)? else {
        anyhow::bail!("output '{}' is disabled", target.name());
    };
    write_png(&args.out, &out)
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let session = load_session(args.scene.session.as_deref())?;
    let frame = render_scene(&args.scene, &session)?;
    let view = grail::PreviewView::new(args.width, args.height);
    write_png(&args.out, &view.render(&frame)?)
}

fn cmd_testcard(args: TestcardArgs) -> anyhow::Result<()> {
    let card = grail::TestCard::new(args.width, args.height);
    let mut fonts = grail::FontBook::discover(args.fonts.as_deref());
    let frame = grail::render_test_card(&card, &mut fonts)?;
    write_png(&args.out, &frame)
}

fn write_png(path: &Path, frame: &grail::Frame) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let straight = frame.to_straight();
    image::save_buffer_with_format(
        path,
        &straight.data,
        straight.width,
        straight.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;

    eprintln!("wrote {}", path.display());
    Ok(())
}
