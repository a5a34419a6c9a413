mod app;
mod cli;
mod config;
mod effects;
mod render;
mod session;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use ghostwriter_core::Action;
use ghostwriter_logging::{gw_error, gw_info};

use crate::app::{App, AppError};
use crate::cli::{Cli, Command};
use crate::config::{AppConfig, Overrides};
use crate::session::{
    ActionSession, GenerateSession, MetricsSession, Session, ShowSession, WatchSession,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            gw_error!("{}", err);
            eprintln!("ghostwriter: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(Overrides {
        base_url: cli.base_url,
        log_level: cli.log_level,
        log_file: cli.log_file,
    });
    let level = config.log_level()?;
    ghostwriter_logging::initialize(config.log.destination.into(), level, &config.log_path());

    let mut session: Box<dyn Session> = match cli.command {
        Command::Config => {
            println!("{}", config.to_ron()?);
            return Ok(());
        }
        Command::Watch(args) => Box::new(WatchSession::new(
            args.list.into(),
            args.page,
            args.page_size,
            args.filters,
            args.refreshes,
        )),
        Command::Metrics { refreshes } => Box::new(MetricsSession::new(refreshes)),
        Command::Show { id } => Box::new(ShowSession::new(id)),
        Command::Crawler { verb, id } => Box::new(ActionSession::new(verb.into(), id)),
        Command::Reprocess { id } => Box::new(ActionSession::new(Action::Reprocess, id)),
        Command::Generate(args) => Box::new(GenerateSession::new(args.into_form())),
    };

    gw_info!("Using backend {}", config.api.base_url);
    let app = App::new(&config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    app.run(session.as_mut(), &mut out)
}
