use std::io;

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Diagnostics go to stderr; stdout carries the hand log.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    init_tracing();
    let mut out = io::stdout();
    let mut err = io::stderr();
    let code = rentpoker_cli::run(std::env::args(), &mut out, &mut err);
    std::process::exit(code);
}
