use tracing_subscriber::EnvFilter;

/// Workspace crates whose events are shown by default.
const CRATE_TARGETS: &[&str] = &[
    "drought",
    "drought_assemble",
    "drought_calendar",
    "drought_grid",
    "drought_indices",
    "drought_io",
    "drought_standardize",
];

/// Level for a `-v` count: warn, then info, debug, trace.
fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Default filter directive for every workspace crate at `level`.
fn default_directives(level: &str) -> String {
    CRATE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` replaces the verbosity-derived filter when set. Event targets
/// are printed from `-vv` on.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level_for(verbosity))));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .init();
}
