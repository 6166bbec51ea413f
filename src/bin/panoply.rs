use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "panoply", version)]
struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate a scene, then print a summary.
    Inspect(InspectArgs),
    /// Walk the timeline from the first to the last step and print panel layouts.
    Steps(StepsArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct StepsArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Device width in pixels, used when the scene has no viewport.
    #[arg(long, default_value_t = 1024.0)]
    width: f64,

    /// Device height in pixels, used when the scene has no viewport.
    #[arg(long, default_value_t = 768.0)]
    height: f64,

    /// Interpolated samples per step transition.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    substeps: u32,

    /// Emit one JSON frame per line instead of the text table.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Steps(args) => cmd_steps(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scene(path: &Path) -> anyhow::Result<panoply::Scene> {
    let scene = panoply::Scene::from_path(path)
        .with_context(|| format!("load scene '{}'", path.display()))?;
    scene
        .validate()
        .with_context(|| format!("validate scene '{}'", path.display()))?;
    tracing::info!(path = %path.display(), steps = scene.clock().step_count(), "scene loaded");
    Ok(scene)
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.in_path)?;
    let mut out = std::io::stdout().lock();

    writeln!(out, "steps: {}", scene.clock().step_count())?;
    writeln!(out, "mode: {:?}", scene.mode())?;
    for panel in scene.panels() {
        let home = panel.options().home_position;
        writeln!(
            out,
            "panel {}: {} frames, {} cameras, home ({}, {}, {})",
            panel.name(),
            panel.frames().library().len(),
            panel.cameras().library().len(),
            home.x,
            home.y,
            home.z
        )?;
    }
    for art in scene.artworks() {
        writeln!(
            out,
            "artwork {}: {} states, {:?}",
            art.name(),
            art.states().library().len(),
            art.options().position_type
        )?;
    }
    for caption in scene.captions() {
        writeln!(
            out,
            "caption {}: {} states, panel {}",
            caption.name(),
            caption.states().library().len(),
            caption.panel().unwrap_or("-")
        )?;
    }
    for instrument in scene.instruments() {
        writeln!(
            out,
            "instrument {}: clip {}",
            instrument.name(),
            instrument.options().clip.as_deref().unwrap_or("-")
        )?;
    }
    writeln!(out, "triggers: {}", scene.triggers().triggers().len())?;
    Ok(())
}

fn cmd_steps(args: StepsArgs) -> anyhow::Result<()> {
    let mut scene = load_scene(&args.in_path)?;
    if scene.viewport().is_none() {
        let viewport = panoply::Viewport::new(args.width, args.height);
        viewport.validate().context("device size")?;
        scene.set_viewport(Some(viewport));
    }

    let mut out = std::io::stdout().lock();
    let n = f64::from(args.substeps);
    let dt = 1.0 / (f64::from(args.substeps) * 30.0);

    scene.navigate(panoply::Navigation::First);
    let last = scene.clock().step_count() - 1;
    for step in 0..=last {
        if step > 0 {
            let (_, fired) = scene
                .navigate(panoply::Navigation::Next)
                .context("timeline ended early")?;
            for t in fired {
                tracing::info!(step, object = %t.target, trigger = %t.trigger_name, "trigger");
            }
        }
        let samples = if step == 0 { 1 } else { args.substeps };
        for k in 1..=samples {
            if step > 0 {
                scene.scrub_to(step as f64 - 1.0 + f64::from(k) / n);
            }
            let frame = scene.tick(panoply::InputAxes::default(), dt);
            if args.json {
                serde_json::to_writer(&mut out, &frame).context("serialize frame")?;
                writeln!(out)?;
            } else {
                write_frame(&mut out, &scene, &frame)?;
            }
        }
    }
    Ok(())
}

fn write_frame(
    out: &mut impl std::io::Write,
    scene: &panoply::Scene,
    frame: &panoply::SceneFrame,
) -> anyhow::Result<()> {
    writeln!(out, "step {} ({:.3})", frame.target_step, frame.interpolated_step)?;
    for (panel, output) in scene.panels().iter().zip(&frame.panels) {
        let r = output.frame_rect;
        let fov = output
            .camera
            .map_or_else(|| "-".to_owned(), |pose| format!("{:.2}", pose.field_of_view));
        writeln!(
            out,
            "  {}: rect ({:.1}, {:.1}, {:.1}, {:.1}) camera {} fov {}",
            panel.name(),
            r.x0,
            r.y0,
            r.width(),
            r.height(),
            if output.camera_enabled { "on" } else { "off" },
            fov
        )?;
    }
    for (caption, output) in scene.captions().iter().zip(&frame.captions) {
        if let Some(c) = output {
            writeln!(
                out,
                "  caption {}: ({:.0}, {:.0}) {:?}",
                caption.name(),
                c.layout.x,
                c.layout.y,
                c.text
            )?;
        }
    }
    Ok(())
}
