use std::{
    fs::File,
    io::{self, IsTerminal},
    path::PathBuf,
    sync::Mutex,
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    Layer, // for .boxed() on the optional layers
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

const DEFAULT_FILTER: &str = "info";

/// `2019-10-27T08:00:00.000+01:00  INFO checkout_core::session message k=v`
struct LocalFmt;

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let stamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");

        if writer.has_ansi_escapes() {
            let color = match *meta.level() {
                Level::ERROR => "1;31",
                Level::WARN => "1;33",
                Level::INFO => "1;32",
                Level::DEBUG => "1;34",
                Level::TRACE => "1;35",
            };
            write!(
                writer,
                "\x1b[2m{stamp}\x1b[0m \x1b[{color}m{:>5}\x1b[0m \x1b[36m{}\x1b[0m ",
                meta.level(),
                meta.target()
            )?;
        } else {
            write!(writer, "{stamp} {:>5} {} ", meta.level(), meta.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Logging settings taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Filter directive; RUST_LOG, then `info`, when unset.
    pub level: Option<String>,
    /// No output on stderr; a log file still receives everything.
    pub quiet: bool,
    /// Appended to, never truncated.
    pub file: Option<PathBuf>,
}

impl LogOptions {
    fn filter(&self) -> Result<EnvFilter> {
        match &self.level {
            Some(directive) => EnvFilter::try_new(directive)
                .with_context(|| format!("invalid log level '{directive}'")),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
        }
    }

    fn open_file(&self) -> Result<Option<File>> {
        self.file
            .as_ref()
            .map(|path| {
                File::options()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("cannot open log file '{}'", path.display()))
            })
            .transpose()
    }

    /// Installs the global subscriber. Call once at startup.
    ///
    /// Console output goes to stderr so command output on stdout stays
    /// clean, colored when attached to a terminal. Calling it again keeps
    /// the subscriber that is already installed.
    pub fn init(&self) -> Result<()> {
        let filter = self.filter()?;

        let console = (!self.quiet).then(|| {
            tracing_subscriber::fmt::layer()
                .event_format(LocalFmt)
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal())
                .boxed()
        });
        let file = self.open_file()?.map(|file| {
            tracing_subscriber::fmt::layer()
                .event_format(LocalFmt)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .boxed()
        });

        // Err only means a subscriber is already installed.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .with(file)
            .try_init();
        Ok(())
    }
}
