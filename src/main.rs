use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rust_decimal::Decimal;
use tabled::{Table, builder::Builder};

use cuota_fija::{
    Amortization, CurrencyFormatter, CurrencyProfile, LoanConfig, LoanError, LoanSession,
    LocaleFormatter, export_file_name,
};

/// Fixed-payment loan amortization schedules
#[derive(Parser)]
#[command(
    name = "cuota",
    version,
    about = "Fixed-payment loan amortization schedules",
    long_about = "Computes the fixed periodic payment and the period-by-period \
                  amortization schedule of a loan, with amounts parsed and \
                  formatted per currency."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML file with rates, currency limits and offered currencies
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a schedule
    Calc(CalcArgs),
    /// List offered terms, rates and currency limits
    Terms,
}

#[derive(Args)]
#[command(allow_hyphen_values = true)]
struct CalcArgs {
    /// Amount borrowed, as typed (e.g. "12,000.00" or "1.234,56 MXN")
    #[arg(long)]
    amount: String,

    /// Number of periods; must be one of the offered terms
    #[arg(long, default_value_t = 12)]
    term: u32,

    /// Currency code; defaults to the first configured currency
    #[arg(long)]
    currency: Option<String>,

    /// Output format
    #[arg(long, default_value = "table")]
    output: OutputFormat,

    /// Also write the schedule as CSV (a directory gets the default file name)
    #[arg(long)]
    csv_file: Option<PathBuf>,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

fn main() {
    let cli = Cli::parse();

    let result = load_config(cli.config.as_ref()).and_then(|config| match cli.command {
        Commands::Calc(args) => run_calc(config, args),
        Commands::Terms => {
            print_terms(&config);
            Ok(())
        }
    });

    if let Err(e) = result {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<LoanConfig> {
    match path {
        Some(path) => LoanConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load configuration '{}'", path.display())),
        None => Ok(LoanConfig::reference()),
    }
}

fn run_calc(config: LoanConfig, args: CalcArgs) -> anyhow::Result<()> {
    let mut session = LoanSession::new(config, LocaleFormatter)?;
    if let Some(currency) = &args.currency {
        session.select_currency(currency)?;
    }

    let result = match session.calculate(&args.amount, args.term) {
        Ok(result) => result.clone(),
        Err(LoanError::Amount(reason)) => {
            eprintln!("{}: {}", "invalid amount".red().bold(), reason);
            process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    match args.output {
        OutputFormat::Table => print_table(&session, &result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Csv => {
            session.export_csv(io::stdout().lock())?;
        }
    }

    if let Some(path) = args.csv_file {
        let path = if path.is_dir() {
            path.join(export_file_name(&result.currency))
        } else {
            path
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create '{}'", path.display()))?;
        session.export_csv(file)?;
        eprintln!("{} {}", "wrote".green(), path.display());
    }

    Ok(())
}

fn print_table(session: &LoanSession<LocaleFormatter>, result: &Amortization) {
    let profile = session.profile();
    let money = |value| LocaleFormatter.format_in(value, profile);

    let mut summary = Builder::default();
    summary.push_record(["Principal", &money(result.summary.principal)]);
    summary.push_record(["Total interest", &money(result.summary.total_interest)]);
    summary.push_record(["Total repaid", &money(result.summary.total_repaid)]);
    summary.push_record([
        "Periodic payment",
        &session.payment_description().unwrap_or_default(),
    ]);
    println!("{}", Table::from(summary));

    let mut schedule = Builder::default();
    schedule.push_record([
        "Period",
        "Opening balance",
        "Payment",
        "Interest",
        "Principal",
        "Closing balance",
    ]);
    for record in &result.schedule {
        schedule.push_record([
            record.period.to_string(),
            money(record.opening_balance),
            money(record.payment),
            money(record.interest),
            money(record.principal),
            money(record.closing_balance),
        ]);
    }
    println!("\n{}", session.caption().bold());
    println!("{}", Table::from(schedule));
}

fn print_terms(config: &LoanConfig) {
    let mut terms = Builder::default();
    terms.push_record(["Term (periods)", "Periodic rate"]);
    for (term, rate) in config.rates.iter() {
        let percent = (rate * Decimal::ONE_HUNDRED).normalize();
        terms.push_record([term.to_string(), format!("{percent}%")]);
    }
    println!("{}", Table::from(terms));

    let mut currencies = Builder::default();
    currencies.push_record(["Currency", "Locale", "Minimum", "Maximum"]);
    for CurrencyProfile { locale, currency } in &config.currencies {
        let bounds = config.limits.bounds_for(currency);
        currencies.push_record([
            currency.clone(),
            locale.clone(),
            LocaleFormatter.format(bounds.min, locale, currency),
            LocaleFormatter.format(bounds.max, locale, currency),
        ]);
    }
    println!("\n{}", Table::from(currencies));
}
