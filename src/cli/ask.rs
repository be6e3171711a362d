//! Ask command: answer a question about a repository.

use anyhow::Result;
use clap::Args;

use super::utils::{gateway, print_json, RepoArgs};
use crate::domain::Config;
use crate::pipeline::Pipeline;

#[derive(Args)]
pub struct AskArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// The question to answer
    #[arg(value_name = "QUESTION")]
    pub question: String,

    /// File to include in the context first (repeatable)
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<String>,
}

pub fn run(args: AskArgs, config: &Config) -> Result<()> {
    let question = args.question.trim();
    if question.is_empty() {
        anyhow::bail!("Question must not be empty");
    }
    let gateway = gateway(config)?;
    let target = args.repo.target(config);
    let answer = Pipeline::from_config(config).query(&target, question, &args.files, &gateway)?;

    if args.repo.json {
        return print_json(&answer);
    }
    println!("{}", answer.response.trim_end());
    Ok(())
}
