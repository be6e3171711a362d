//! Context command: print the bundle that would be sent with a question.

use anyhow::Result;
use clap::Args;

use super::utils::{print_json, RepoArgs};
use crate::domain::Config;
use crate::pipeline::Pipeline;

#[derive(Args)]
pub struct ContextArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// File to include first (repeatable)
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<String>,

    /// Question the context is being assembled for (logged only)
    #[arg(short, long, value_name = "TEXT")]
    pub query: Option<String>,
}

pub fn run(args: ContextArgs, config: &Config) -> Result<()> {
    let target = args.repo.target(config);
    let bundle = Pipeline::from_config(config).assemble_context(
        &target,
        &args.files,
        args.query.as_deref(),
    )?;

    if args.repo.json {
        return print_json(&bundle);
    }
    print!("{}", bundle.text);
    if bundle.truncated {
        eprintln!("note: context reached the {} character ceiling", config.context.max_total_chars);
    }
    Ok(())
}
