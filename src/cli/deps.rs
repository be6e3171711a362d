//! Deps command: detected dependencies and an explanation of the stack.

use anyhow::Result;
use clap::Args;

use super::utils::{gateway, print_json, RepoArgs};
use crate::domain::Config;
use crate::pipeline::Pipeline;

#[derive(Args)]
pub struct DepsArgs {
    #[command(flatten)]
    pub repo: RepoArgs,
}

pub fn run(args: DepsArgs, config: &Config) -> Result<()> {
    let gateway = gateway(config)?;
    let target = args.repo.target(config);
    let report = Pipeline::from_config(config).analyze_dependencies(&target, &gateway)?;

    if args.repo.json {
        return print_json(&report);
    }
    if report.dependencies.is_empty() {
        println!("{}", report.explanation);
        return Ok(());
    }
    println!("Detected dependencies:");
    for (ecosystem, value) in &report.dependencies {
        match value.as_object() {
            Some(map) => println!("  {}: {} entries", ecosystem, map.len()),
            None => println!("  {}: {}", ecosystem, value.as_str().unwrap_or_default()),
        }
    }
    println!("\n{}", report.explanation.trim_end());
    Ok(())
}
