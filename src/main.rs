use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> anyhow::Result<ExitCode> {
    obs_populate::logging::init("info").context("init logging")?;

    let cli = obs_populate::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    let config = cli.config.load().context("load config")?;

    match cli.command {
        obs_populate::cli::Command::Run(args) => {
            let pipeline = obs_populate::pipeline::Pipeline::from_config(config);
            let request = obs_populate::pipeline::CreateObsRequest {
                source_lang: args.source_lang,
                destination_lang: args.destination_lang,
            };
            let today = args
                .date
                .unwrap_or_else(|| chrono::Local::now().date_naive());

            let outcome = pipeline.run(&request, today).context("run")?;
            let show_diagnostics = pipeline.config().is_dev_host(args.server_name.as_deref());
            println!("{}", obs_populate::messages::render(&outcome, show_diagnostics));

            if outcome.is_failure() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
