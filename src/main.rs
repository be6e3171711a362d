//! repo-ask: ask questions about remote Git repositories

use repo_ask::PipelineError;
use std::process::ExitCode;

fn main() -> ExitCode {
    match repo_ask::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<PipelineError>() {
            Some(pipeline_err) => {
                eprintln!("Error: {pipeline_err}");
                ExitCode::from(pipeline_err.exit_code())
            }
            None => {
                eprintln!("Error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}
