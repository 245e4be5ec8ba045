use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use slime_mold_core::{GrowthVariant, Scenario, SimConfig, World};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    Simple,
    Health,
}

impl From<VariantArg> for GrowthVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Simple => GrowthVariant::Simple,
            VariantArg::Health => GrowthVariant::Health,
        }
    }
}

/// Run the slime mold simulation headless and print a JSON run summary.
#[derive(Parser, Debug)]
#[command(name = "slime-mold", version)]
struct Args {
    /// JSON file with a (partial) SimConfig.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON file with a Scenario; defaults to the classic two-food layout.
    #[arg(long)]
    scenario: Option<PathBuf>,
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 500)]
    steps: usize,
    #[arg(long, default_value_t = 50)]
    sample_every: usize,
    /// Write the summary here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config: SimConfig = match &args.config {
        Some(path) => read_json(path)?,
        None => SimConfig::default(),
    };
    if let Some(variant) = args.variant {
        config.variant = variant.into();
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let scenario: Scenario = match &args.scenario {
        Some(path) => read_json(path)?,
        None => Scenario::classic(config.width, config.height),
    };

    let mut world = World::try_new(config, scenario).context("initializing world")?;
    let start = Instant::now();
    let summary = world
        .try_run_experiment(args.steps, args.sample_every)
        .context("running experiment")?;
    info!(
        steps = summary.steps,
        mold = summary.final_mold_count,
        grown = summary.total_grown,
        died = summary.total_died,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "run complete"
    );

    let json = serde_json::to_string_pretty(&summary)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{json}"),
    }
    Ok(())
}
