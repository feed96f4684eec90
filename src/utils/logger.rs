use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset. Dependencies stay at `warn`.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,deal_check=debug"
    } else {
        "warn,deal_check=info"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Compact logs on stderr; stdout carries the result. Colours only when
/// stderr is a terminal.
pub fn init_cli_logger(verbose: bool) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(verbose)
        .compact()
        .try_init();

    if let Err(e) = result {
        eprintln!("⚠️ Logger already initialized: {}", e);
    }
}

/// One JSON object per line for CloudWatch, which stamps its own time.
pub fn init_lambda_logger() {
    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter(false))
        .with_target(false)
        .without_time()
        .json()
        .with_current_span(false)
        .try_init();

    if let Err(e) = result {
        eprintln!("Logger already initialized: {}", e);
    }
}
