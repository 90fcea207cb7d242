use std::collections::BTreeMap;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use poultry_ledger::{
    config,
    errors::ServiceError,
    forms::{
        BatchEditForm, BatchForm, CalculatorForm, ExpenseForm, FeedingForm, Form, MedicationForm,
        SalesEditForm, SalesForm,
    },
    i18n::{Locale, Localized},
    metrics,
    models::Notification,
    reports::{Report, ReportType, TimeRange},
    services::calculator::CalculatorResult,
    validation::FieldErrors,
    AppState,
};
use serde::Serialize;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::load_config().context("failed to load application config")?;
    config::init_tracing(config.log_level(), config.log_json);

    // nothing persists between runs, so start from the sample farm
    config.seed_sample_data = !cli.empty;
    let locale = cli.lang.unwrap_or(config.default_locale);
    let state = AppState::in_memory(config)
        .await
        .context("failed to build application state")?;
    let out = Output {
        json: cli.json,
        locale,
    };

    let outcome = match cli.command {
        Commands::Calculate(args) => handle_calculate(&state, &out, args),
        Commands::Validate(args) => handle_validate(&state, &out, args).await,
        Commands::Report(args) => handle_report(&state, &out, args).await,
        Commands::Notifications(command) => handle_notifications(&state, &out, command).await,
    };

    if let Err(err) = &outcome {
        if let Some(service_error) = err.downcast_ref::<ServiceError>() {
            if out.json {
                print_json(&service_error.to_response(out.locale))?;
            }
        }
    }
    if cli.metrics {
        eprintln!("{}", metrics::export_text()?);
    }
    outcome
}

#[derive(Parser)]
#[command(
    name = "poultry-cli",
    about = "Poultry farm calculator, validators and reports",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[arg(long, global = true, value_parser = parse_locale, help = "Display language: en or ar")]
    lang: Option<Locale>,
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Start without the sample farm records"
    )]
    empty: bool,
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Dump Prometheus counters to stderr when done"
    )]
    metrics: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cost and profit projection for one production cycle
    Calculate(CalculateArgs),
    /// Run a form validator over field=value pairs
    Validate(ValidateArgs),
    /// Financial, inventory or performance report
    Report(ReportArgs),
    #[command(subcommand)]
    Notifications(NotificationCommands),
}

#[derive(Args)]
struct CalculateArgs {
    #[arg(long, help = "Number of chicks placed")]
    initial_bird_count: Option<String>,
    #[arg(long, help = "Price of one chick")]
    bird_cost: Option<String>,
    #[arg(long, help = "Total feed cost")]
    feed_cost: Option<String>,
    #[arg(long, help = "Total medication cost")]
    medication_cost: Option<String>,
    #[arg(long, help = "Total utilities cost")]
    utilities_cost: Option<String>,
    #[arg(long, help = "Total labor cost")]
    labor_cost: Option<String>,
    #[arg(long, help = "Other costs")]
    other_costs: Option<String>,
    #[arg(long, help = "Expected mortality, percent")]
    expected_mortality: Option<String>,
    #[arg(long, help = "Expected weight per bird at sale, kg")]
    expected_weight: Option<String>,
    #[arg(long, help = "Expected price per kg")]
    expected_price_per_kg: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Entity {
    Inventory,
    InventoryEdit,
    Feeding,
    Medication,
    Sales,
    SalesEdit,
    Expense,
    Calculator,
}

#[derive(Args)]
struct ValidateArgs {
    #[arg(value_enum)]
    entity: Entity,
    #[arg(
        long = "field",
        short = 'f',
        value_parser = parse_pair,
        help = "Form field as name=value; repeat for each field"
    )]
    fields: Vec<(String, String)>,
}

#[derive(Args)]
struct ReportArgs {
    #[arg(value_parser = parse_report_type, help = "financial, inventory or performance")]
    report_type: ReportType,
    #[arg(
        long,
        default_value = "month",
        value_parser = parse_time_range,
        help = "week, month, quarter, year or all"
    )]
    range: TimeRange,
    #[arg(long, value_parser = parse_date, help = "Reference date (YYYY-MM-DD); defaults to today")]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum NotificationCommands {
    /// List notifications, newest first
    List,
    /// Mark one notification read
    Read { id: i64 },
    /// Mark every notification read
    ReadAll,
    /// Delete one notification
    Delete { id: i64 },
    /// Open a notification: mark it read and print its target
    Open { id: i64 },
    /// Raise reminders for vaccines due soon
    Remind {
        #[arg(long, value_parser = parse_date, help = "Reference date (YYYY-MM-DD)")]
        today: Option<NaiveDate>,
    },
}

struct Output {
    json: bool,
    locale: Locale,
}

impl Output {
    fn errors(&self, errors: &FieldErrors) -> Result<()> {
        let localized = errors.localized(self.locale);
        if self.json {
            print_json(&localized)
        } else {
            for (field, message) in localized {
                println!("{field}: {message}");
            }
            Ok(())
        }
    }
}

fn handle_calculate(state: &AppState, out: &Output, args: CalculateArgs) -> Result<()> {
    let mut form = CalculatorForm::default();
    let overrides = [
        (&mut form.initial_bird_count, args.initial_bird_count),
        (&mut form.bird_cost, args.bird_cost),
        (&mut form.feed_cost, args.feed_cost),
        (&mut form.medication_cost, args.medication_cost),
        (&mut form.utilities_cost, args.utilities_cost),
        (&mut form.labor_cost, args.labor_cost),
        (&mut form.other_costs, args.other_costs),
        (&mut form.expected_mortality, args.expected_mortality),
        (&mut form.expected_weight, args.expected_weight),
        (&mut form.expected_price_per_kg, args.expected_price_per_kg),
    ];
    for (slot, value) in overrides {
        if let Some(value) = value {
            *slot = value;
        }
    }

    let input = match form.parse(&()) {
        Ok(input) => input,
        Err(errors) => {
            out.errors(&errors)?;
            bail!("{} field(s) invalid", errors.len())
        }
    };
    let result = state.services.calculator.calculate(&input)?;
    if out.json {
        return print_json(&result);
    }
    render_calculation(&result, out.locale, &state.config.currency);
    Ok(())
}

fn render_calculation(result: &CalculatorResult, locale: Locale, currency: &str) {
    let rows: [(&str, &str, String); 7] = [
        ("Total cost", "إجمالي التكاليف", result.total_cost.round_dp(2).to_string()),
        ("Expected birds", "العدد المتوقع للطيور", result.expected_bird_count.round_dp(0).to_string()),
        ("Cost per bird", "التكلفة لكل طائر", result.cost_per_bird.display(locale, 2)),
        ("Expected revenue", "الإيرادات المتوقعة", result.expected_revenue.round_dp(2).to_string()),
        ("Expected profit", "الربح المتوقع", result.expected_profit.round_dp(2).to_string()),
        ("Profit margin %", "هامش الربح %", result.profit_margin.display(locale, 2)),
        ("Break-even price/kg", "سعر التعادل/كجم", result.break_even_price_per_kg.display(locale, 2)),
    ];
    for (en, ar, value) in rows {
        let label = if locale == Locale::En { en } else { ar };
        println!("{label}: {value}");
    }
    println!("({currency})");
}

async fn handle_validate(state: &AppState, out: &Output, args: ValidateArgs) -> Result<()> {
    let pairs = args.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()));
    let errors = match args.entity {
        Entity::Inventory => BatchForm::from_pairs(pairs)?.validate(&()),
        Entity::InventoryEdit => BatchEditForm::from_pairs(pairs)?.validate(&()),
        Entity::Feeding => FeedingForm::from_pairs(pairs)?.validate(&()),
        Entity::Medication => MedicationForm::from_pairs(pairs)?.validate(&()),
        Entity::Sales => {
            let batches = state.services.inventory.lookups().await?;
            debug!(batches = batches.len(), "validating sale against active batches");
            SalesForm::from_pairs(pairs)?.validate(&batches)
        }
        Entity::SalesEdit => SalesEditForm::from_pairs(pairs)?.validate(&()),
        Entity::Expense => ExpenseForm::from_pairs(pairs)?.validate(&()),
        Entity::Calculator => CalculatorForm::from_pairs(pairs)?.validate(&()),
    };

    if errors.is_empty() {
        if out.json {
            print_json(&BTreeMap::<String, String>::new())?;
        } else {
            println!("{}", if out.locale == Locale::En { "valid" } else { "صالح" });
        }
        return Ok(());
    }
    out.errors(&errors)?;
    bail!("{} field(s) invalid", errors.len())
}

async fn handle_report(state: &AppState, out: &Output, args: ReportArgs) -> Result<()> {
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());
    let report = state
        .services
        .reports
        .build(args.report_type, args.range, today)
        .await?;
    if out.json {
        return print_json(&report);
    }

    let locale = out.locale;
    println!(
        "{} - {} ({today})",
        args.report_type.localize(locale),
        args.range.localize(locale)
    );
    match report {
        Report::Financial(r) => {
            println!("revenue: {}", r.total_revenue.round_dp(2));
            println!("expenses: {}", r.total_expenses.round_dp(2));
            println!("net profit: {}", r.net_profit.round_dp(2));
            println!("margin %: {}", r.profit_margin.round_dp(2));
            for slice in &r.expenses_by_type {
                println!("  {}: {}", slice.category.localize(locale), slice.value);
            }
        }
        Report::Inventory(r) => {
            println!("batches: {}", r.fleet.batch_count);
            println!("current birds: {}", r.fleet.total_current);
            println!("reduction: {}", r.fleet.total_reduction);
            println!("mortality %: {}", r.fleet.mortality_rate.round_dp(1));
            for row in &r.fleet.batches {
                println!(
                    "  {} [{}] {}/{} ({}%)",
                    row.batch_id,
                    row.status.localize(locale),
                    row.current_count,
                    row.initial_count,
                    row.mortality_rate.round_dp(1)
                );
            }
        }
        Report::Performance(r) => {
            println!("birds sold: {}", r.birds_sold);
            println!("avg weight/bird: {}", r.average_weight_per_bird.round_dp(2));
            println!("avg revenue/bird: {}", r.average_revenue_per_bird.round_dp(2));
            println!("feed cost/bird: {}", r.feed_cost_per_bird.round_dp(2));
            println!("profit/bird: {}", r.profit_per_bird.round_dp(2));
        }
    }
    Ok(())
}

async fn handle_notifications(
    state: &AppState,
    out: &Output,
    command: NotificationCommands,
) -> Result<()> {
    let service = &state.services.notifications;
    match command {
        NotificationCommands::List => {
            let notifications = service.list().await?;
            if out.json {
                return print_json(&notifications);
            }
            println!("unread: {}", service.unread_count().await?);
            notifications
                .iter()
                .for_each(|n| render_notification(n, out.locale));
        }
        NotificationCommands::Read { id } => {
            let notification = service.mark_read(id).await?;
            print_or(out, &notification, || render_notification(&notification, out.locale))?;
        }
        NotificationCommands::ReadAll => {
            let changed = service.mark_all_read().await?;
            print_or(out, &changed, || println!("marked {changed} read"))?;
        }
        NotificationCommands::Delete { id } => {
            let removed = service.delete(id).await?;
            print_or(out, &removed, || println!("deleted {}", removed.id))?;
        }
        NotificationCommands::Open { id } => {
            let route = service.open(id).await?;
            print_or(out, &route, || {
                println!("{}", route.as_deref().unwrap_or("-"))
            })?;
        }
        NotificationCommands::Remind { today } => {
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            let created = state.remind_vaccinations(today, Utc::now()).await?;
            print_or(out, &created, || {
                created
                    .iter()
                    .for_each(|n| render_notification(n, out.locale))
            })?;
        }
    }
    Ok(())
}

fn render_notification(n: &Notification, locale: Locale) {
    let marker = if n.read { ' ' } else { '*' };
    println!(
        "{marker} #{} [{}] {} - {} ({})",
        n.id,
        n.kind.localize(locale),
        n.title,
        n.message,
        n.date.format("%Y-%m-%d %H:%M")
    );
}

fn print_or<T: Serialize>(out: &Output, value: &T, text: impl FnOnce()) -> Result<()> {
    if out.json {
        print_json(value)
    } else {
        text();
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| format!("invalid date '{raw}'"))
}

fn parse_locale(raw: &str) -> Result<Locale, String> {
    Locale::from_str(raw).map_err(|_| format!("unsupported language '{raw}'"))
}

fn parse_report_type(raw: &str) -> Result<ReportType, String> {
    ReportType::from_str(raw).map_err(|_| format!("unknown report '{raw}'"))
}

fn parse_time_range(raw: &str) -> Result<TimeRange, String> {
    TimeRange::from_str(raw).map_err(|_| format!("unknown time range '{raw}'"))
}
