mod cli;
mod diagnostics;
mod logging;
mod output;

use clap::Parser;
use tracing::{error, info, warn};

use softlimit::{DriverSession, LimitWorkflow};

use crate::cli::Cli;
use crate::diagnostics::FileDiagnostics;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.debug);
    std::process::exit(run(cli).await);
}

async fn run(cli: Cli) -> i32 {
    let config = cli.run_config();

    // Without a session there is no outcome to report; log the failure and
    // exit non-zero with stdout left empty.
    let session = match DriverSession::open(&config).await {
        Ok(session) => session,
        Err(err) => {
            error!(target: "softlimit", error = %err, "driver session could not be started");
            return 1;
        }
    };

    let sink = FileDiagnostics::new(&cli.artifacts_dir);
    let outcome = LimitWorkflow::new(&config, &sink).run(&session).await;

    // The workflow returns a value on every path, so the session is closed
    // exactly once no matter how the run terminated.
    if let Err(err) = session.close().await {
        warn!(target: "softlimit", error = %err, "driver session close failed");
    }

    output::print_outcome(&outcome, cli.debug);
    info!(
        target: "softlimit",
        status = ?outcome.status,
        desired_limit = outcome.desired_limit,
        "run complete"
    );
    outcome.exit_code()
}
