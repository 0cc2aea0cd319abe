//! Rental Wheels CLI
//!
//! Drives the order store, pricing and checkout core from the command line.

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use jiff::{
    Zoned,
    civil::{Date, Time},
};
use rusty_money::iso::Currency;
use rental_wheels::{
    booking::{BookingRequest, place_booking},
    cart::{Cart, render_lines},
    checkout::{PaymentOutcome, ScriptedGateway, checkout},
    identity::{DocumentKind, PhoneNumber, UserProfile, VerificationCode},
    logging::{LoggingConfig, init_subscriber},
    orders::{OrderId, OrderStore, SqliteOrderStore},
    pricing::RentalConfig,
    settings::{Settings, parse_currency},
    vehicles::VehicleClass,
};

#[derive(Debug, Parser)]
#[command(name = "rental-wheels", about = "Rental Wheels storefront core", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct StoreArgs {
    /// YAML settings file
    #[arg(long, global = true, env = "RENTAL_WHEELS_CONFIG")]
    config: Option<PathBuf>,

    /// Order database path; overrides the settings file
    #[arg(long, global = true, env = "RENTAL_WHEELS_DB")]
    database: Option<PathBuf>,

    /// ISO currency code; overrides the settings file
    #[arg(long, global = true)]
    currency: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Price a configuration without saving it
    Quote(DurationArgs),

    /// Validate a booking and add it to the cart
    Add(AddArgs),

    /// Show the cart and its total
    Cart,

    /// Remove a line from the cart
    Remove {
        /// Cart line id
        id: OrderId,
    },

    /// Pay for the cart
    Checkout(CheckoutArgs),

    /// Show placed orders
    History,

    /// Check the shape of a mobile number and one-time code
    Register(RegisterArgs),
}

#[derive(Debug, Args)]
struct DurationArgs {
    /// Vehicle class
    #[arg(long, value_enum)]
    vehicle: Option<VehicleClass>,

    /// Rented hours (0-11)
    #[arg(long, default_value_t = 0)]
    hours: u32,

    /// Rented days (0-10)
    #[arg(long, default_value_t = 0)]
    days: u32,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[command(flatten)]
    duration: DurationArgs,

    /// Identification document kind
    #[arg(long, value_enum, default_value_t = DocumentKind::Passport)]
    document_kind: DocumentKind,

    /// Identification document number
    #[arg(long, default_value = "")]
    document: String,

    /// Pickup date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<Date>,

    /// Pickup time (HH:MM); defaults to now
    #[arg(long)]
    time: Option<Time>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutcomeArg {
    Success,
    Error,
    Cancelled,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    /// Verified email of the payer; defaults to the settings file
    #[arg(long)]
    email: Option<String>,

    /// Outcome the payment gateway reports
    #[arg(long, value_enum, default_value_t = OutcomeArg::Success)]
    outcome: OutcomeArg,
}

#[derive(Debug, Args)]
struct RegisterArgs {
    /// Mobile number
    #[arg(long)]
    phone: String,

    /// One-time code received by SMS
    #[arg(long)]
    code: Option<String>,

    /// Display name; completes the profile together with --email
    #[arg(long, requires = "email")]
    name: Option<String>,

    /// Contact email; completes the profile together with --name
    #[arg(long, requires = "name")]
    email: Option<String>,
}

/// Resolved store settings shared by every command.
#[derive(Debug)]
struct Storefront {
    database: PathBuf,
    currency: &'static Currency,
    owner_email: Option<String>,
}

impl Storefront {
    fn resolve(args: &StoreArgs) -> Result<Self> {
        let settings = match &args.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };

        let currency = match &args.currency {
            Some(code) => parse_currency(code)?,
            None => settings.currency()?,
        };

        Ok(Self {
            database: args.database.clone().unwrap_or(settings.database),
            currency,
            owner_email: settings.owner_email,
        })
    }

    fn open(&self) -> Result<SqliteOrderStore> {
        SqliteOrderStore::open(&self.database)
            .with_context(|| format!("opening order store {}", self.database.display()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_subscriber(&cli.logging)?;

    let storefront = Storefront::resolve(&cli.store)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Quote(args) => quote(&mut out, &storefront, &args),
        Commands::Add(args) => add(&mut out, &storefront, args),
        Commands::Cart => {
            let store = storefront.open()?;

            Cart::load(&store, storefront.currency)?.write_to(&mut out)?;

            Ok(())
        }
        Commands::Remove { id } => remove(&mut out, &storefront, id),
        Commands::Checkout(args) => pay(&mut out, &storefront, args),
        Commands::History => history(&mut out, &storefront),
        Commands::Register(args) => register(&mut out, &args),
    }
}

fn quote(out: &mut impl Write, storefront: &Storefront, args: &DurationArgs) -> Result<()> {
    let config = RentalConfig::new(args.vehicle, args.hours, args.days);

    writeln!(out, "Hourly charge: {}", config.hourly_charge())?;
    writeln!(out, "Daily charge:  {}", config.daily_charge())?;
    writeln!(out, "Total:         {}", config.to_money(storefront.currency)?)?;

    Ok(())
}

fn add(out: &mut impl Write, storefront: &Storefront, args: AddArgs) -> Result<()> {
    let now = Zoned::now();

    let time = match args.time {
        Some(time) => time,
        None => Time::new(now.hour(), now.minute(), 0, 0)?,
    };

    let request = BookingRequest {
        document_kind: args.document_kind,
        document_number: args.document,
        config: RentalConfig::new(
            args.duration.vehicle,
            args.duration.hours,
            args.duration.days,
        ),
        date: args.date.unwrap_or_else(|| now.date()),
        time,
    };

    let mut store = storefront.open()?;
    let id = place_booking(&mut store, &request)?;

    writeln!(out, "Added line {id} to the cart")?;

    Ok(())
}

fn remove(out: &mut impl Write, storefront: &Storefront, id: OrderId) -> Result<()> {
    let mut store = storefront.open()?;

    if Cart::remove(&mut store, id)? {
        writeln!(out, "Removed line {id}")?;
    } else {
        writeln!(out, "Line {id} is not in the cart")?;
    }

    Ok(())
}

fn pay(out: &mut impl Write, storefront: &Storefront, args: CheckoutArgs) -> Result<()> {
    let Some(email) = args.email.or_else(|| storefront.owner_email.clone()) else {
        bail!("no payer email: pass --email or set owner_email in the settings file");
    };

    let mut gateway = ScriptedGateway::new(match args.outcome {
        OutcomeArg::Success => PaymentOutcome::Success {
            reference: "scripted".to_string(),
        },
        OutcomeArg::Error => PaymentOutcome::Error {
            message: "payment declined".to_string(),
        },
        OutcomeArg::Cancelled => PaymentOutcome::Cancelled,
    });

    let mut store = storefront.open()?;
    let receipt = checkout(&mut store, &mut gateway, &email, storefront.currency)?;

    writeln!(out, "{} ({})", receipt.outcome, receipt.amount)?;

    for id in &receipt.placed {
        writeln!(out, "Placed order {id}")?;
    }

    Ok(())
}

fn history(out: &mut impl Write, storefront: &Storefront) -> Result<()> {
    let placed = storefront.open()?.list_placed()?;

    if placed.is_empty() {
        writeln!(out, "No placed orders")?;
    } else {
        writeln!(out, "{}", render_lines(&placed, storefront.currency)?)?;
    }

    Ok(())
}

fn register(out: &mut impl Write, args: &RegisterArgs) -> Result<()> {
    let phone = PhoneNumber::parse(&args.phone)?;

    if let Some(code) = args.code.as_deref() {
        VerificationCode::parse(code)?;
    }

    match (args.name.as_deref(), args.email.as_deref()) {
        (Some(name), Some(email)) => {
            let profile = UserProfile::new(name, email, phone.as_str())?;

            writeln!(
                out,
                "Welcome aboard, {} <{}> ({})",
                profile.name(),
                profile.email(),
                profile.mobile().to_msisdn()
            )?;
        }
        _ => writeln!(out, "{} accepted ({})", phone.as_str(), phone.to_msisdn())?,
    }

    Ok(())
}
