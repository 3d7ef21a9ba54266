use anyhow::{Context, Result};
use clap::Parser;
use noisy_dataset::NoiseModel;
use noisy_dataset::pipeline::{self, DatasetParams};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "noisy_dataset",
    about = "Write noisy copies of an image dataset, one folder per noise configuration."
)]
struct Cli {
    /// Input root holding one sub-folder per image category
    #[arg(value_name = "INPUT", default_value = pipeline::DEFAULT_INPUT_ROOT)]
    input: PathBuf,

    /// Output root (created if missing)
    #[arg(value_name = "OUTPUT", default_value = pipeline::DEFAULT_OUTPUT_ROOT)]
    output: PathBuf,

    /// Noise configuration as `mode[:key=value,...]`, e.g. `gaussian:mean=0,var=0.01`
    /// or `s&p:amount=0.05`. Repeatable; replaces the built-in presets.
    #[arg(long = "noise", value_name = "SPEC")]
    noise: Vec<NoiseModel>,

    /// Seed for the noise generator
    #[arg(long)]
    seed: Option<u64>,

    /// Print the configured noise folder names and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut params = DatasetParams {
        input_root: cli.input,
        output_root: cli.output,
        seed: cli.seed,
        ..Default::default()
    };
    if !cli.noise.is_empty() {
        params.models = cli.noise;
    }

    if cli.list {
        for model in &params.models {
            println!("{}\t{model}", model.canonical_name());
        }
        return Ok(());
    }

    let report = pipeline::run(&params).with_context(|| {
        format!(
            "generating noisy dataset from {} into {}",
            params.input_root.display(),
            params.output_root.display()
        )
    })?;
    log::info!(
        "Done: {} folders, {} images written",
        report.folders,
        report.images_written
    );
    Ok(())
}
