use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use checkout_cli::app;
use checkout_cli::config::CheckoutConfig;
use checkout_cli::logging::LogOptions;
use checkout_cli::report::{self, Quote};
use checkout_cli::scenario::{LoggingRouter, Scenario, ScriptedDialog, run_scenario};
use checkout_cli::utils::{parse_date, parse_services, slot_line};
use checkout_core::calculations::{
    compute_subtotal, compute_total, compute_total_from_text, parse_price, service_fees_total,
};
use checkout_core::formatter;
use checkout_core::models::{AppointmentSlot, CartSnapshot};
use checkout_data::CartLoader;
use rust_decimal::Decimal;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Checkout wizard for the shopping cart.
///
/// Lists delivery slots, prices orders and runs scripted checkouts.
#[derive(Debug, Parser)]
#[command(name = "checkout", version, about, long_about = None)]
struct Cli {
    /// Configuration file.
    #[arg(long, global = true, default_value = "checkout.toml")]
    config: PathBuf,

    /// Slot catalog CSV; overrides the configuration.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Text bundle TOML; overrides the configuration.
    #[arg(long, global = true)]
    texts: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `checkout_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// No log output on stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the delivery slots of the catalog.
    Slots {
        /// Only slots on this day (YYYY-MM-DD).
        #[arg(long)]
        date: Option<String>,

        /// Hide slots that cannot be booked.
        #[arg(long, default_value_t = false)]
        available: bool,
    },

    /// Price an order.
    Quote {
        /// Cart CSV (product_id,price,quantity).
        #[arg(long, conflicts_with = "subtotal")]
        cart: Option<PathBuf>,

        /// Subtotal as displayed, e.g. `1,000.00`.
        #[arg(long)]
        subtotal: Option<String>,

        /// Index of the delivery slot, as listed by `slots`.
        #[arg(long)]
        slot: Option<usize>,

        /// Add-on service; may be repeated.
        #[arg(long = "service")]
        services: Vec<String>,
    },

    /// Run a scripted checkout.
    Run {
        /// Scenario TOML file.
        scenario: PathBuf,
    },

    /// Show the label of a product status code.
    Status {
        code: String,

        /// Append " By" to the label.
        #[arg(long, default_value_t = false)]
        by: bool,
    },
}

// ─── commands ────────────────────────────────────────────────────────────────

fn list_slots(
    cli: &Cli,
    config: &CheckoutConfig,
    date: Option<&str>,
    available: bool,
) -> Result<()> {
    let catalog = app::load_catalog(config, cli.catalog.as_deref())?;
    let date = date
        .map(|d| parse_date(d).with_context(|| format!("Invalid date: {d}")))
        .transpose()?;

    println!("Calendar opens on {}", catalog.start_date());
    for (index, slot) in catalog.slots().iter().enumerate() {
        if available && !slot.is_available() {
            continue;
        }
        if date.is_some_and(|d| slot.start.date() != d) {
            continue;
        }
        println!("{}", slot_line(index, slot));
    }
    Ok(())
}

fn quote(
    cli: &Cli,
    config: &CheckoutConfig,
    cart: Option<&Path>,
    subtotal: Option<&str>,
    slot: Option<usize>,
    services: &[String],
) -> Result<()> {
    let catalog = app::load_catalog(config, cli.catalog.as_deref())?;
    let selection = parse_services(services)?;
    let slot: Option<&AppointmentSlot> = match slot {
        Some(index) => Some(
            catalog
                .get(index)
                .with_context(|| format!("No slot #{index}; the catalog has {}", catalog.len()))?,
        ),
        None => None,
    };
    let extras = service_fees_total(&selection, &config.fees);

    let quote = match subtotal {
        // Figures as shown to the customer go through the text path.
        Some(text) => {
            let Some(slot) = slot else {
                bail!("--subtotal needs --slot");
            };
            let total = compute_total_from_text(text, &slot.label, &selection, &config.fees);
            Quote {
                subtotal: parse_price(text).unwrap_or_default(),
                slot_fee: slot.offer.fee().unwrap_or_default(),
                services: extras,
                total,
            }
        }
        None => {
            let cart = match cart {
                Some(path) => CartLoader::load_from_file(path)
                    .with_context(|| format!("Failed to load cart: {}", path.display()))?,
                None => CartSnapshot::new(),
            };
            let subtotal = compute_subtotal(&cart);
            let slot_fee = slot.and_then(|s| s.offer.fee()).unwrap_or(Decimal::ZERO);
            Quote {
                subtotal,
                slot_fee,
                services: extras,
                total: compute_total(subtotal, slot_fee, &selection, &config.fees),
            }
        }
    };
    print!("{}", report::render_quote(&quote));
    Ok(())
}

fn run(
    cli: &Cli,
    config: &CheckoutConfig,
    path: &Path,
) -> Result<()> {
    let scenario = Scenario::load(path)
        .with_context(|| format!("Failed to load scenario: {}", path.display()))?;
    let cart = scenario.cart_snapshot()?;
    let catalog = app::load_catalog(config, cli.catalog.as_deref())?;
    let texts = app::load_texts(config, cli.texts.as_deref())?;
    let mut session = app::build_session(config, cart, catalog, texts, Box::new(LoggingRouter));
    let mut dialog = ScriptedDialog::new(&scenario.answers);

    let outcome = run_scenario(&scenario, &mut session, &mut dialog)?;
    if let Some(stop) = &outcome.stop {
        bail!("{}", report::render_stop(stop));
    }
    if let Some(summary) = &outcome.summary {
        print!("{}", report::render_summary(summary));
    }
    match outcome.route {
        Some(route) => println!("Navigated to {route}"),
        None => debug!("scenario stayed on the summary"),
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    LogOptions {
        level: cli.log_level.clone(),
        quiet: cli.quiet,
        file: cli.log_file.clone(),
    }
    .init()?;

    let config = CheckoutConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    info!(config = %cli.config.display(), "starting checkout");

    match &cli.command {
        Command::Slots { date, available } => {
            list_slots(&cli, &config, date.as_deref(), *available)
        }
        Command::Quote {
            cart,
            subtotal,
            slot,
            services,
        } => quote(
            &cli,
            &config,
            cart.as_deref(),
            subtotal.as_deref(),
            *slot,
            services,
        ),
        Command::Run { scenario } => run(&cli, &config, scenario),
        Command::Status { code, by } => {
            let texts = app::load_texts(&config, cli.texts.as_deref())?;
            let label = if *by {
                formatter::status_text_by(code, &texts)
            } else {
                formatter::status_text(code, &texts)
            };
            println!("{label} ({:?})", formatter::status_state(code));
            Ok(())
        }
    }
}
