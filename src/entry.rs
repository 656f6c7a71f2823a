use std::path::Path;
use std::sync::Arc;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::TrafficArgs;
use crate::engine::{RunTermination, TrafficGenerator};
use crate::error::AppResult;
use crate::probe::build_probe;
use crate::shutdown_handlers::{interrupt_channel, setup_signal_interrupt_handler};
use crate::stats::StatsAggregator;
use crate::targets::TargetList;

/// Exit code when a second interrupt aborts the run.
const FORCED_EXIT_CODE: i32 = 1;

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;
    apply_config(&mut args, &matches)?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match runtime.block_on(run_async(&args)) {
        Ok(RunTermination::Forced) => std::process::exit(FORCED_EXIT_CODE),
        Ok(RunTermination::Completed | RunTermination::Cancelled) => Ok(()),
        Err(err) => {
            tracing::error!("{}", err);
            Err(err)
        }
    }
}

fn parse_args() -> AppResult<(TrafficArgs, ArgMatches)> {
    let matches = TrafficArgs::command().get_matches();
    let args = TrafficArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

fn apply_config(args: &mut TrafficArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(args, matches, &config)?;
    }
    Ok(())
}

async fn run_async(args: &TrafficArgs) -> AppResult<RunTermination> {
    let settings = args.run_settings();
    let targets = TargetList::load(Path::new(&args.url_source))?;
    let probe = build_probe(&settings)?;
    let stats = Arc::new(StatsAggregator::new(settings.traffic_type)?);

    tracing::info!(
        "Generating {} traffic: {} clients x {} requests over {} targets (seed {})",
        settings.traffic_type.as_str(),
        settings.clients,
        settings.requests,
        targets.count(),
        settings.seed
    );

    let (interrupt_tx, interrupt_rx) = interrupt_channel();
    let signal_handle = setup_signal_interrupt_handler(interrupt_tx);
    let mut generator = TrafficGenerator::new(settings, targets, probe, stats);
    let termination = generator.generate(interrupt_rx).await;
    signal_handle.abort();
    let termination = termination?;

    if termination != RunTermination::Forced {
        println!();
        print!("{}", generator.stats().report());
    }
    Ok(termination)
}
