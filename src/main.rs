//! Loan Cover CLI
//!
//! Command-line interface for amortization schedules and loan insurance quotes.
//! Rates are entered in percent.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use loan_cover::assumptions::loader::{resolve_table_path, MORTALITY_TABLE_ENV};
use loan_cover::assumptions::load_mortality_table;
use loan_cover::export::{write_detail_csv, write_schedule_csv};
use loan_cover::{AmortizationSchedule, LoanParameters, QuoteEngine, QuoteRequest};

/// Loan amortization and death cover pricing
#[derive(Parser)]
#[command(name = "loan_cover", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the amortization schedule of a loan
    Schedule(ScheduleArgs),
    /// Price the death cover on a loan's outstanding balance
    Quote(QuoteArgs),
    /// Level premiums for several insured ages and technical rates
    Grid(GridArgs),
}

#[derive(Args)]
struct LoanArgs {
    /// Amount borrowed
    #[arg(long, default_value_t = 200_000.0)]
    principal: f64,

    /// Loan term in years
    #[arg(long, default_value_t = 20)]
    years: u32,

    /// Annual loan rate in percent
    #[arg(long, default_value_t = 3.5)]
    rate: f64,
}

impl LoanArgs {
    fn parameters(&self) -> LoanParameters {
        LoanParameters::new(self.principal, self.years, self.rate / 100.0)
    }
}

#[derive(Args)]
struct ScheduleArgs {
    #[command(flatten)]
    loan: LoanArgs,

    /// Write the full schedule to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Include a month-0 row holding the initial principal
    #[arg(long)]
    opening_row: bool,

    /// Number of rows printed to the console
    #[arg(long, default_value_t = 24)]
    show: usize,
}

#[derive(Args)]
struct QuoteArgs {
    #[command(flatten)]
    loan: LoanArgs,

    /// Age of the insured at inception
    #[arg(long, default_value_t = 50)]
    age: u32,

    /// Technical rate in percent (defaults to the loan rate)
    #[arg(long)]
    technical_rate: Option<f64>,

    /// Mortality table CSV
    #[arg(long, env = MORTALITY_TABLE_ENV)]
    table: Option<PathBuf>,

    /// Write the amortization schedule to this CSV file
    #[arg(long)]
    schedule_csv: Option<PathBuf>,

    /// Write the monthly single premium breakdown to this CSV file
    #[arg(long)]
    detail_csv: Option<PathBuf>,

    /// Print the quote summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GridArgs {
    #[command(flatten)]
    loan: LoanArgs,

    /// Insured ages
    #[arg(long, value_delimiter = ',', default_values_t = vec![30, 40, 50, 60])]
    ages: Vec<u32>,

    /// Technical rates in percent
    #[arg(long, value_delimiter = ',', default_values_t = vec![0.0, 1.0, 2.0, 3.5])]
    technical_rates: Vec<f64>,

    /// Mortality table CSV
    #[arg(long, env = MORTALITY_TABLE_ENV)]
    table: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Schedule(args) => run_schedule(args),
        Commands::Quote(args) => run_quote(args),
        Commands::Grid(args) => run_grid(args),
    }
}

fn load_engine(table: Option<&PathBuf>) -> Result<QuoteEngine> {
    let path = resolve_table_path(table.map(|p| p.as_path()));
    let table = load_mortality_table(&path)?;
    Ok(QuoteEngine::new(table))
}

fn print_schedule_summary(schedule: &AmortizationSchedule) {
    let loan = &schedule.loan;
    println!("Loan: {:.2} over {} years at {:.2}%", loan.principal, loan.term_years, loan.annual_rate * 100.0);
    println!("  Monthly payment: {:.2}", schedule.payment);
    println!("  Months: {}", schedule.month_count());
    println!("  Total interest: {:.2}", schedule.total_interest);
    println!("  Total cost of credit: {:.2}", schedule.total_cost);
}

fn run_schedule(args: ScheduleArgs) -> Result<()> {
    let schedule = AmortizationSchedule::compute(&args.loan.parameters())?;
    print_schedule_summary(&schedule);

    println!();
    println!("{:>5} {:>12} {:>12} {:>12} {:>14} {:>8}",
        "Month", "Payment", "Interest", "Principal", "Balance", "Int%");
    println!("{}", "-".repeat(68));

    let rows = if args.opening_row {
        schedule.rows_with_opening()
    } else {
        schedule.rows.clone()
    };
    for row in rows.iter().take(args.show) {
        println!("{:>5} {:>12.2} {:>12.2} {:>12.2} {:>14.2} {:>8.2}",
            row.month, row.payment, row.interest, row.principal, row.balance, row.interest_share_pct());
    }
    if rows.len() > args.show {
        println!("... ({} more months)", rows.len() - args.show);
    }

    if let Some(path) = args.csv {
        let file = File::create(&path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        write_schedule_csv(file, &schedule, args.opening_row)?;
        println!("\nSchedule written to: {}", path.display());
    }

    Ok(())
}

fn run_quote(args: QuoteArgs) -> Result<()> {
    let engine = load_engine(args.table.as_ref())?;

    let loan = args.loan.parameters();
    let technical_rate = args.technical_rate.map(|r| r / 100.0).unwrap_or(loan.annual_rate);
    let quote = engine.quote(&QuoteRequest::new(loan, args.age, technical_rate))?;
    let summary = quote.summary();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_schedule_summary(&quote.schedule);
        println!();
        println!("Death cover (benefit = balance at end of month of death)");
        println!("  Insured age: {}", summary.insured_age);
        println!("  Technical rate: {:.2}%", summary.technical_rate * 100.0);
        println!("  Probability of death within term: {:.6}", summary.term_death_probability);
        println!("  Single premium: {:.2}", summary.single_premium);
        println!("  PV of 1/month (annuity-due): {:.6}", summary.annuity_due_pv);
        if quote.premium.is_degenerate() {
            println!("  Level monthly premium: undefined (annuity value is zero)");
        } else {
            println!("  Level monthly premium: {:.2}", summary.level_monthly_premium);
        }
    }

    if let Some(path) = args.schedule_csv {
        let file = File::create(&path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        write_schedule_csv(file, &quote.schedule, false)?;
        eprintln!("Schedule written to: {}", path.display());
    }

    if let Some(path) = args.detail_csv {
        let file = File::create(&path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        write_detail_csv(file, &quote.detail)?;
        eprintln!("Monthly detail written to: {}", path.display());
    }

    Ok(())
}

fn run_grid(args: GridArgs) -> Result<()> {
    let engine = load_engine(args.table.as_ref())?;

    let loan = args.loan.parameters();
    let rates: Vec<f64> = args.technical_rates.iter().map(|r| r / 100.0).collect();
    let grid = engine.premium_grid(loan, &args.ages, &rates);

    println!("{:>4} {:>8} {:>14} {:>12} {:>12}", "Age", "Tech%", "SinglePrem", "AnnuityPV", "Monthly");
    println!("{}", "-".repeat(54));

    for (idx, result) in grid.iter().enumerate() {
        let age = args.ages[idx / rates.len()];
        let rate = rates[idx % rates.len()];
        match result {
            Ok(s) => println!("{:>4} {:>8.2} {:>14.2} {:>12.6} {:>12.2}",
                age, rate * 100.0, s.single_premium, s.annuity_due_pv, s.level_monthly_premium),
            Err(e) => println!("{:>4} {:>8.2}  {}", age, rate * 100.0, e),
        }
    }

    Ok(())
}
