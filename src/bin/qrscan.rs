use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use qr_reader::logging::init_logging;
use qr_reader::sim::Script;
use qr_reader::{OverlayMask, PreviewTransform, Rect, ScanConfig, Size, VideoGravity};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "qrscan", version, about = "QR scan session tools")]
struct Cli {
    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Errors only
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a scripted scan session and print what it did
    Simulate {
        #[arg(long)]
        script: PathBuf,
        #[arg(long, env = "QR_SCAN_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Render the dimmed overlay for a guide layout to a PNG
    Overlay {
        /// View size, WxH
        #[arg(long, value_parser = parse_size)]
        view: Size,
        /// Guide rectangle, X,Y,W,H
        #[arg(long, value_parser = parse_rect)]
        guide: Rect,
        #[arg(long)]
        out: PathBuf,
        /// Output scale relative to the view size
        #[arg(long, default_value_t = 1.0)]
        scale: f32,
        #[arg(long, env = "QR_SCAN_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Map a normalized recognizer rectangle into view coordinates
    Convert {
        /// View size, WxH
        #[arg(long, value_parser = parse_size)]
        view: Size,
        /// Sensor frame size, WxH
        #[arg(long, value_parser = parse_size)]
        frame: Size,
        /// Normalized rectangle, X,Y,W,H
        #[arg(long, value_parser = parse_rect)]
        rect: Rect,
        #[arg(long, value_enum, default_value_t = Gravity::Fill)]
        gravity: Gravity,
        /// Clockwise quarter turns from sensor to display
        #[arg(long, default_value_t = 0)]
        rotation: u8,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Gravity {
    Fill,
    Fit,
    Stretch,
}

impl From<Gravity> for VideoGravity {
    fn from(g: Gravity) -> Self {
        match g {
            Gravity::Fill => VideoGravity::ResizeAspectFill,
            Gravity::Fit => VideoGravity::ResizeAspect,
            Gravity::Stretch => VideoGravity::Resize,
        }
    }
}

fn parse_floats(s: &str, sep: char, n: usize) -> Result<Vec<f32>, String> {
    let vals: Vec<f32> = s
        .split(sep)
        .map(|tok| tok.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("{s:?}: {e}"))?;
    if vals.len() != n {
        return Err(format!("{s:?}: expected {n} values separated by '{sep}'"));
    }
    Ok(vals)
}

fn parse_size(s: &str) -> Result<Size, String> {
    let v = parse_floats(s, 'x', 2)?;
    Ok(Size::new(v[0], v[1]))
}

fn parse_rect(s: &str) -> Result<Rect, String> {
    let v = parse_floats(s, ',', 4)?;
    Ok(Rect::new(v[0], v[1], v[2], v[3]))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Simulate { script, config } => simulate_cmd(&script, config.as_deref()),
        Command::Overlay {
            view,
            guide,
            out,
            scale,
            config,
        } => overlay_cmd(view, guide, &out, scale, config.as_deref()),
        Command::Convert {
            view,
            frame,
            rect,
            gravity,
            rotation,
        } => convert_cmd(view, frame, rect, gravity.into(), rotation),
    }
}

fn simulate_cmd(script_path: &Path, config: Option<&Path>) -> Result<()> {
    let config = ScanConfig::load(config).context("loading scan config")?;
    let text = std::fs::read_to_string(script_path)
        .with_context(|| format!("reading {}", script_path.display()))?;
    let script = Script::from_toml_str(&text)
        .with_context(|| format!("parsing {}", script_path.display()))?;

    println!("Script: {} ({} steps)", script_path.display(), script.steps.len());
    for (i, outcome) in script.run(config).iter().enumerate() {
        println!("[{i}] {:?}", outcome.step);
        for effect in &outcome.effects {
            println!("    {effect}");
        }
        if let Some(err) = &outcome.error {
            println!("    error: {err}");
        }
    }
    Ok(())
}

fn overlay_cmd(
    view: Size,
    guide: Rect,
    out: &Path,
    scale: f32,
    config: Option<&Path>,
) -> Result<()> {
    let config = ScanConfig::load(config).context("loading scan config")?;
    if view.is_degenerate() || guide.is_empty() {
        bail!("view and guide must have a positive area");
    }
    if !(scale.is_finite() && scale > 0.0) {
        bail!("scale must be positive");
    }
    let mask = OverlayMask::new(
        Rect::from_size(view),
        guide,
        config.corner_radius,
        config.overlay_opacity,
    );
    let width = (view.width * scale).round().max(1.0) as u32;
    let height = (view.height * scale).round().max(1.0) as u32;
    let img = mask.render(width, height);
    img.save(out)
        .with_context(|| format!("writing {}", out.display()))?;
    println!(
        "Overlay {}x{} (guide {:?}, radius {:.1}, opacity {:.2}) -> {}",
        width,
        height,
        guide,
        mask.corner_radius(),
        mask.opacity(),
        out.display()
    );
    Ok(())
}

fn convert_cmd(
    view: Size,
    frame: Size,
    rect: Rect,
    gravity: VideoGravity,
    rotation: u8,
) -> Result<()> {
    let Some(transform) = PreviewTransform::new(view, frame, gravity, rotation) else {
        bail!("view and frame sizes must be positive");
    };
    let r = transform.to_view(&rect);
    println!(
        "View rect: x={:.2} y={:.2} w={:.2} h={:.2}",
        r.min_x(),
        r.min_y(),
        r.width(),
        r.height()
    );
    Ok(())
}
