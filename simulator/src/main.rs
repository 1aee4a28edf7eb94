use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline chi-squared coadd workflow driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 4)]
    num_images: usize,
    #[arg(long, default_value_t = 150)]
    width: usize,
    #[arg(long, default_value_t = 150)]
    height: usize,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Write the run summary as JSON
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.num_images, args.width, args.height, args.seed)
    };

    let runner = Runner::new(config);
    let result = runner.execute()?;

    println!(
        "Noise coadd -> exposures {}, histogram bins {}, residual mean {:.3e}, residual std dev {:.4}",
        result.exposures_added,
        result.hist_y.len(),
        result.residual_mean,
        result.residual_std_dev
    );

    if let Some(path) = args.output {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let report = serde_json::to_string_pretty(&result).context("serializing run summary")?;
        fs::write(&path, report)
            .with_context(|| format!("writing run summary {}", path.display()))?;
    }

    Ok(())
}
