use log::LevelFilter;
use std::io::Write;

/// Initialize console logging.
///
/// The default level is `Info`, raised to `Debug` by `--verbose`; setting
/// `RUST_LOG` overrides both:
/// - `RUST_LOG=error` - Only errors
/// - `RUST_LOG=warn` - Warnings and errors (degraded git calls surface here)
/// - `RUST_LOG=debug` - Full analysis tracing
/// - `RUST_LOG=off` - Silence diagnostics entirely
///
/// Log lines go to stderr so the report printed on stdout stays clean for
/// piping. Colored console output is switched off when stdout is not a
/// terminal.
pub fn init(verbose: bool) {
    let fallback = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(fallback);

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{:5}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .try_init()
        .ok(); // Ignore error if logger is already initialized

    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }
}
