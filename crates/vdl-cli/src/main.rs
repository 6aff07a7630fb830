use vdl_core::logging;

mod cli;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, logging to stderr: {:#}", err);
    }

    match cli::run_from_args().await {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(err) => {
            eprintln!("vdl error: {:#}", err);
            std::process::exit(1);
        }
    }
}
