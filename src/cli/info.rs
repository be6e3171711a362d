//! Info command: repository summary plus structure.

use anyhow::Result;
use clap::Args;

use super::utils::{gateway, print_json, RepoArgs};
use crate::domain::Config;
use crate::fetch::derive_repo_name;
use crate::pipeline::Pipeline;
use crate::render::render_tree;

const TREE_DEPTH: usize = 4;

#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub repo: RepoArgs,
}

pub fn run(args: InfoArgs, config: &Config) -> Result<()> {
    let gateway = gateway(config)?;
    let target = args.repo.target(config);
    let info = Pipeline::from_config(config).describe(&target, &gateway)?;

    if args.repo.json {
        return print_json(&info);
    }
    let name = derive_repo_name(&info.repo_url)?;
    println!("Repository: {} ({})", info.repo_url, info.branch);
    println!("Files: {}", info.structure.len());
    println!("\n{}\n", info.summary.trim_end());
    println!("{}", render_tree(&name, &info.structure, TREE_DEPTH));
    Ok(())
}
