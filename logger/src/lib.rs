use env_logger::Builder;
use log::Level;
use log::LevelFilter;
use std::io::Write;

fn level_char(level: Level) -> char {
    match level {
        Level::Error => 'E',
        Level::Warn => 'W',
        Level::Info => 'I',
        Level::Debug => 'D',
        Level::Trace => 'T',
    }
}

/// Sets up logging to stderr.
///
/// Defaults to the `Info` level, `RUST_LOG` overrides it. Calling it more
/// than once has no effect.
pub fn init() {
    let mut builder = Builder::new();
    builder.filter(None, LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.format(|f, record| {
        writeln!(
            f,
            "{} {}: {}",
            level_char(record.level()),
            record.target(),
            record.args()
        )
    });
    let _ = builder.try_init();
}
