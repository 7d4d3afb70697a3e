use std::{env, path::PathBuf, process::ExitCode, sync::Arc};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tally_frontend::{
    error::{AppError, SaveError},
    model::region::RegionStatistics,
    service::{AuthProvider, Services, SessionToken},
    session::Session,
    settings::{Settings, StorageSettings},
};
use thiserror::Error;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Application error")]
    App(#[from] AppError),
    #[error("Initialization error")]
    Initialization,
}

#[tokio::main]
async fn main() -> ExitCode {
    let logpath = match get_logging_path() {
        Ok(it) => it,
        Err(_) => return ExitCode::FAILURE,
    };

    let logfile = tracing_appender::rolling::daily(logpath, "log");
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(logfile)
        .init();

    debug!("starting application");

    let args = cli().get_matches();
    let mut settings = Settings::default();
    map_args_to_settings(&args, &mut settings);

    let result = match args.get_one::<String>("region") {
        Some(region) => run_once(settings, region, args.get_flag("save")).await,
        None => tally_frontend::run(settings).await.map_err(Error::from),
    };

    match result {
        Ok(()) => {
            debug!("closing application");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("closing application with error: {:?}", err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn cli() -> Command {
    Command::new("tally")
        .about("tally - look up and keep track of per state case statistics")
        .args([
            // NOTE: arguments
            Arg::new("region")
                .action(ArgAction::Set)
                .help("state to look up once and print instead of starting the tui"),
            // NOTE: options
            Arg::new("save")
                .long("save")
                .action(ArgAction::SetTrue)
                .requires("region")
                .help("save the looked up state to your account (needs a token)"),
            Arg::new("lookup-url")
                .long("lookup-url")
                .action(ArgAction::Set)
                .help("base url of the statistics lookup service"),
            Arg::new("persist-url")
                .long("persist-url")
                .action(ArgAction::Set)
                .help("graphql endpoint used to save states"),
            Arg::new("token")
                .long("token")
                .action(ArgAction::Set)
                .help("session token, defaults to the TALLY_TOKEN environment variable"),
            Arg::new("cache-file")
                .long("cache-file")
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf))
                .conflicts_with("no-cache")
                .help("file to keep acknowledged states in"),
            Arg::new("no-cache")
                .long("no-cache")
                .action(ArgAction::SetTrue)
                .help("keep acknowledged states in memory only"),
            Arg::new("reset")
                .long("reset")
                .action(ArgAction::SetTrue)
                .help("forget all acknowledged states before starting"),
        ])
}

fn map_args_to_settings(args: &ArgMatches, settings: &mut Settings) {
    if let Some(url) = args.get_one::<String>("lookup-url") {
        settings.lookup_url = url.to_owned();
    }

    if let Some(url) = args.get_one::<String>("persist-url") {
        settings.persist_url = url.to_owned();
    }

    settings.token = args
        .get_one::<String>("token")
        .cloned()
        .or_else(|| env::var("TALLY_TOKEN").ok());

    settings.storage = if args.get_flag("no-cache") {
        StorageSettings::Memory
    } else if let Some(path) = args.get_one::<PathBuf>("cache-file") {
        StorageSettings::File(path.to_path_buf())
    } else {
        StorageSettings::Cache
    };

    settings.reset_acknowledged = args.get_flag("reset");
}

async fn run_once(settings: Settings, region: &str, save: bool) -> Result<(), Error> {
    let services = Services::from_settings(&settings)?;
    let auth: Arc<dyn AuthProvider> = Arc::new(SessionToken::new(settings.token.clone()));

    let mut session = Session::start(
        services,
        auth,
        Some(Box::new(|err: &AppError| eprintln!("error: {}", err))),
    );

    if settings.reset_acknowledged {
        session.reset_acknowledged();
    }

    if let Ok(record) = session.submit_search(region).await {
        print_record(&record);

        if save {
            match session.submit_save().await {
                Ok(()) => println!("saved {}", record.region_id),
                Err(SaveError::NotAuthenticated) => {
                    eprintln!("not saved: pass --token or set TALLY_TOKEN to save")
                }
                Err(err) => debug!("save skipped: {}", err),
            }
        }
    }

    let view = session.finish();
    println!("{} acknowledged", view.acknowledged().len());

    Ok(())
}

fn print_record(record: &RegionStatistics) {
    println!("{} ({})", record.region_name, record.region_id);
    println!("  confirmed    {} (+{})", record.confirmed_total, record.new_confirmed);
    println!("  deaths       {} (+{})", record.deaths_total, record.new_deaths);
    println!("  last update  {}", record.last_updated);
}

fn get_logging_path() -> Result<PathBuf, Error> {
    match dirs::cache_dir() {
        Some(cache_dir) => Ok(cache_dir.join("tally").join("logs")),
        None => Err(Error::Initialization),
    }
}
