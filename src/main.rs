use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palcut::models::{AppConfig, ConfigOverrides, DitherSetting};
use palcut::services::{palette_lines, HistogramSummary, QuantizePipeline};

#[derive(Parser)]
#[command(name = "palcut")]
#[command(about = "Reduce PNG images to indexed palettes")]
struct Cli {
    /// YAML config file (defaults to $PALCUT_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output from every stage
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quantize a PNG into an indexed PNG
    Quantize {
        /// Input PNG file
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        palette: PaletteArgs,

        /// Error diffusion: none, least, medium or most
        #[arg(long)]
        dither: Option<DitherSetting>,

        /// Skip the oxipng post-pass
        #[arg(long)]
        no_recompress: bool,
    },
    /// Print the color frequency table of a PNG
    Histogram {
        /// Input PNG file
        input: PathBuf,

        /// Print `{"distinct": .., "total": ..}` instead of the table
        #[arg(long)]
        json: bool,
    },
    /// Print the palette `quantize` would use, one slot per line
    Palette {
        /// Input PNG file
        input: PathBuf,

        #[command(flatten)]
        palette: PaletteArgs,
    },
}

#[derive(Args)]
struct PaletteArgs {
    /// Maximum number of palette colors (2-256)
    #[arg(short, long)]
    colors: Option<usize>,

    /// Reserve palette slot 0 for transparent pixels
    #[arg(long)]
    transparent: bool,

    /// Keep colors in canonical RGB order
    #[arg(long)]
    no_optimize_order: bool,
}

impl PaletteArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            max_colors: self.colors,
            transparent: self.transparent.then_some(true),
            optimize_order: self.no_optimize_order.then_some(false),
            ..Default::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Quantize {
            input,
            output,
            palette,
            dither,
            no_recompress,
        } => {
            let overrides = ConfigOverrides {
                dither,
                recompress: no_recompress.then_some(false),
                ..palette.overrides()
            };
            let pipeline = QuantizePipeline::new(config.with_overrides(&overrides)?);
            let report = pipeline.quantize_file(&input, &output)?;
            println!(
                "Wrote {} ({}x{}, {} colors, {} bytes)",
                output.display(),
                report.width,
                report.height,
                report.palette_slots,
                report.size_bytes
            );
        }
        Commands::Histogram { input, json } => {
            let pipeline = QuantizePipeline::new(config);
            let table = pipeline.histogram_file(&input)?;
            if json {
                println!("{}", serde_json::to_string(&HistogramSummary::from(&table))?);
            } else {
                println!("{table}");
            }
        }
        Commands::Palette { input, palette } => {
            let pipeline = QuantizePipeline::new(config.with_overrides(&palette.overrides())?);
            let palette = pipeline.palette_file(&input)?;
            for line in palette_lines(&palette) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "palcut=debug,indexed_color=debug"
    } else {
        "palcut=info,indexed_color=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}
