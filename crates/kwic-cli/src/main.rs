mod cli;
mod commands;

use tracing_subscriber::EnvFilter;

use cli::{DumpParams, ExecParams, PackParams, TraceParams, build_cli};

fn main() {
    init_logging();
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        Some(("exec", m)) => {
            let params = ExecParams::from_matches(m);
            commands::exec::run(params.into());
        }
        Some(("trace", m)) => {
            let params = TraceParams::from_matches(m);
            commands::trace::run(params.into());
        }
        Some(("pack", m)) => {
            let params = PackParams::from_matches(m);
            commands::pack::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}

/// Log to stderr, filtered by `KWIC_LOG` (default: warnings only).
fn init_logging() {
    let filter = EnvFilter::try_from_env("KWIC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
