//! Summarize command: explain a single file.

use anyhow::Result;
use clap::Args;

use super::utils::{gateway, print_json, RepoArgs};
use crate::domain::Config;
use crate::pipeline::Pipeline;

#[derive(Args)]
pub struct SummarizeArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Path of the file, relative to the repository root
    #[arg(value_name = "PATH")]
    pub path: String,
}

pub fn run(args: SummarizeArgs, config: &Config) -> Result<()> {
    let gateway = gateway(config)?;
    let target = args.repo.target(config);
    let summary = Pipeline::from_config(config).summarize_file(&target, &args.path, &gateway)?;

    if args.repo.json {
        return print_json(&summary);
    }
    println!("# {}\n", summary.file_path);
    println!("{}", summary.summary.trim_end());
    Ok(())
}
