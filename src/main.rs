//! Sketchbook CLI - render generative sketches as raw video frames, stills
//! or SVG posters.

use anyhow::{Context, Result};
use clap::{Args, Parser, ValueEnum};
use sketchbook::config::{RunOverrides, SketchbookConfig};
use sketchbook::nn::{self, ModelKind, Shape};
use sketchbook::sketches::poster::Poster;
use sketchbook::sketches::SketchKind;
use sketchbook::{seed, stream, FrameSettings};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "sketchbook")]
#[command(about = "Render generative sketches as raw ARGB32 frames, stills or SVG")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "sketchbook.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List the available sketches
    List,

    /// Stream every frame of a sketch as raw ARGB32
    Render {
        #[command(flatten)]
        frame: FrameArgs,

        /// Write frames to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a single frame to PNG
    Still {
        #[command(flatten)]
        frame: FrameArgs,

        /// Frame index to capture
        #[arg(short, long, default_value = "0")]
        index: u64,

        /// Output PNG path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate the pendulum poster as SVG
    Poster {
        /// Width and height in pixels
        #[arg(long, default_value = "2048")]
        size: u32,

        /// Seed for generation
        #[arg(short = 'S', long)]
        seed: Option<u64>,

        /// Output file path; stdout when absent
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report how many parameters a model needs
    Params {
        /// Network to trace
        #[arg(short, long, value_enum, default_value = "dense")]
        model: ModelArg,

        /// Width of the input row
        #[arg(long, default_value = "6")]
        dim: usize,

        /// Number of blocks
        #[arg(long, default_value = "2")]
        depth: usize,

        /// Seed for the dumped vector
        #[arg(short = 'S', long, default_value = "0")]
        seed: u64,

        /// Print the initialised parameters as JSON
        #[arg(long)]
        dump: bool,
    },
}

/// Options shared by everything that draws raster frames.
#[derive(Args)]
struct FrameArgs {
    /// Sketch to draw (see `list`)
    sketch: SketchKind,

    /// Width of the output
    #[arg(long)]
    width: Option<u32>,

    /// Height of the output
    #[arg(long)]
    height: Option<u32>,

    /// Frames per second
    #[arg(long)]
    framerate: Option<u32>,

    /// Duration in seconds
    #[arg(long)]
    length: Option<u32>,

    /// Seed for generation
    #[arg(short = 'S', long)]
    seed: Option<u64>,

    /// Source image for sketches that sample one
    #[arg(long)]
    image: Option<PathBuf>,

    /// Network for sketches that accept a choice
    #[arg(short, long, value_enum)]
    model: Option<ModelArg>,

    /// Number of network blocks
    #[arg(long)]
    depth: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum, Debug)]
enum ModelArg {
    /// Stacked full layers
    Dense,
    /// Residual full layers
    Resnet,
    /// Attention plus SoLU blocks
    Transformer,
}

impl ModelArg {
    fn to_kind(self) -> ModelKind {
        match self {
            ModelArg::Dense => ModelKind::Dense,
            ModelArg::Resnet => ModelKind::ResNet,
            ModelArg::Transformer => ModelKind::Transformer,
        }
    }
}

/// A sketch ready to draw, with its settings resolved.
struct Prepared {
    kind: SketchKind,
    seed: u64,
    settings: FrameSettings,
    sketch: Box<dyn sketchbook::Sketch>,
}

impl FrameArgs {
    fn overrides(&self) -> RunOverrides {
        RunOverrides {
            width: self.width,
            height: self.height,
            framerate: self.framerate,
            length: self.length,
            seed: self.seed,
            image: self.image.clone(),
            model: self.model.map(ModelArg::to_kind),
            depth: self.depth,
        }
    }
}

/// Resolve flags over config over sketch defaults, then build the sketch.
fn prepare(frame: FrameArgs, config: &SketchbookConfig) -> Result<Prepared> {
    let kind = frame.sketch;
    let flags = frame.overrides();
    let seed = pick_seed(config.seed(&flags));
    let settings = config.frame_settings(kind.defaults(), &flags);
    let ctx = config.resolve_context(seed, &flags);

    let sketch = kind
        .build(&ctx)
        .with_context(|| format!("building sketch {}", kind.name()))?;
    Ok(Prepared {
        kind,
        seed,
        settings,
        sketch,
    })
}

fn pick_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random();
            info!(seed, "no seed given, picked one");
            seed
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sketchbook=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = SketchbookConfig::load(&cli.config)?;

    match cli.command {
        Commands::List => {
            for kind in SketchKind::all() {
                let d = kind.defaults();
                println!(
                    "{:<10} {}x{} @ {} fps, {} s  {}",
                    kind.name(),
                    d.width,
                    d.height,
                    d.framerate,
                    d.length,
                    kind.description()
                );
            }
            println!("{:<10} SVG, see `sketchbook poster`", "poster");
        }

        Commands::Render { frame, output } => {
            let mut prepared = prepare(frame, &config)?;
            info!(
                sketch = prepared.kind.name(),
                seed = prepared.seed,
                "starting render"
            );

            let frames = match output {
                Some(path) => {
                    ensure_parent(&path)?;
                    let file = fs::File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    let mut sink = BufWriter::new(file);
                    let frames =
                        stream::render(prepared.sketch.as_mut(), &prepared.settings, &mut sink)?;
                    info!(path = %path.display(), "frames saved");
                    frames
                }
                None => {
                    let stdout = io::stdout();
                    let mut sink = BufWriter::new(stdout.lock());
                    stream::render(prepared.sketch.as_mut(), &prepared.settings, &mut sink)?
                }
            };

            let s = prepared.settings;
            info!(
                "encode with: ffmpeg -f rawvideo -pix_fmt bgra -s {}x{} -r {} -i - out.mp4 ({} frames)",
                s.width, s.height, s.framerate, frames
            );
        }

        Commands::Still {
            frame,
            index,
            output,
        } => {
            let mut prepared = prepare(frame, &config)?;
            let image = stream::render_still(prepared.sketch.as_mut(), &prepared.settings, index)?;

            let path = output.unwrap_or_else(|| {
                config.output.directory.join(format!(
                    "{}_{}_{:04}.png",
                    prepared.kind.name(),
                    prepared.seed,
                    index
                ))
            });
            ensure_parent(&path)?;
            image
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Saved to {}", path.display());
        }

        Commands::Poster { size, seed, output } => {
            let seed = pick_seed(seed.or(config.seed));
            let poster = Poster {
                size,
                ..Poster::new(seed)
            };
            info!(size, seed, "generating poster");
            let document = poster.generate()?;

            match output {
                Some(path) => {
                    ensure_parent(&path)?;
                    fs::write(&path, &document)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), "poster saved");
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(document.as_bytes())?;
                    stdout.flush()?;
                }
            }
        }

        Commands::Params {
            model,
            dim,
            depth,
            seed,
            dump,
        } => {
            let network = model.to_kind().build(depth);
            let source = Shape::new(1, dim);
            if dump {
                let params = nn::init(network.as_ref(), source, &mut seed::rng(seed, "params"))?;
                println!("{}", serde_json::to_string_pretty(&params)?);
            } else {
                let count = nn::param_count(network.as_ref(), source)?;
                println!("{} (dim {}, depth {}): {} parameters", network.name(), dim, depth, count);
            }
        }
    }

    Ok(())
}
