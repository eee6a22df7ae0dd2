#![deny(warnings)]

//! Headless CLI for managing expansion entities and running projections.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use persistence::{EntityRepository, JsonFileRepository};
use plan_core::{
    validate_config, validate_cost_driver, validate_equipment, validate_product, CostDriver,
    EntityState, Equipment, FinancingMethod, HourlyRate, Product, ScenarioConfig,
    StatementPolicy,
};
use plan_econ::ScenarioReport;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "expansion-cli")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")"))]
#[command(about = "Manufacturing expansion financial projections", long_about = None)]
struct Cli {
    /// Saved entity state (JSON)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List saved equipment, products and cost drivers
    List,

    /// Add a piece of equipment
    AddEquipment {
        #[arg(long)]
        name: String,
        /// Purchase cost in USD
        #[arg(long)]
        cost: Decimal,
        /// Useful life in years
        #[arg(long, default_value_t = 10)]
        useful_life: u32,
        /// Max production capacity in units/year
        #[arg(long)]
        max_capacity: u64,
        #[arg(long, value_enum)]
        financing: Option<FinancingArg>,
    },

    /// Add a product line with a flat unit cost, per-unit or hourly cost drivers
    AddProduct {
        #[arg(long)]
        name: String,
        /// Units produced in the first year
        #[arg(long)]
        initial_units: u64,
        #[arg(long)]
        unit_price: Decimal,
        /// Flat unit cost; omit to use cost drivers
        #[arg(long)]
        unit_cost: Option<Decimal>,
        /// Annual growth as a fraction, e.g. 0.10
        #[arg(long)]
        growth_rate: Decimal,
        /// Use the cost driver stored under this key
        #[arg(long)]
        cost_driver: Option<String>,
        #[arg(long)]
        equipment_cost_per_unit: Option<Decimal>,
        #[arg(long)]
        machinist_cost_per_unit: Option<Decimal>,
        #[arg(long)]
        design_cost_per_unit: Option<Decimal>,
        #[arg(long)]
        supervision_cost_per_unit: Option<Decimal>,
        /// Equipment time per unit as NAME=COST_PER_HOUR:HOURS_PER_UNIT; repeatable
        #[arg(long = "equipment-rate", value_parser = parse_equipment_rate)]
        equipment_rates: Vec<(String, HourlyRate)>,
        /// Machinist labor as COST_PER_HOUR:HOURS_PER_UNIT
        #[arg(long, value_parser = parse_hourly_rate)]
        machinist_rate: Option<HourlyRate>,
        /// Design labor as COST_PER_HOUR:HOURS_PER_UNIT
        #[arg(long, value_parser = parse_hourly_rate)]
        design_rate: Option<HourlyRate>,
        /// Supervision as COST_PER_HOUR:HOURS_PER_UNIT
        #[arg(long, value_parser = parse_hourly_rate)]
        supervision_rate: Option<HourlyRate>,
    },

    /// Remove equipment by name
    RemoveEquipment { name: String },

    /// Remove a product line by name
    RemoveProduct { name: String },

    /// Project the saved entities and print statements, SWOT and score
    Project {
        /// Scenario parameters (YAML)
        #[arg(long)]
        scenario: Option<PathBuf>,
        #[arg(long)]
        years: Option<u32>,
        #[arg(long)]
        base_year: Option<i32>,
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
        /// Write the report as CSV
        #[arg(long)]
        export: Option<PathBuf>,
        /// Print the full report as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FinancingArg {
    Cash,
    ShortTermDebt,
    LongTermDebt,
    BuyoutLease,
    FmvLease,
}

impl From<FinancingArg> for FinancingMethod {
    fn from(f: FinancingArg) -> Self {
        match f {
            FinancingArg::Cash => FinancingMethod::Cash,
            FinancingArg::ShortTermDebt => FinancingMethod::ShortTermDebt,
            FinancingArg::LongTermDebt => FinancingMethod::LongTermDebt,
            FinancingArg::BuyoutLease => FinancingMethod::BuyoutLease,
            FinancingArg::FmvLease => FinancingMethod::FmvLease,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Ratio,
    EquipmentFinanced,
}

impl From<PolicyArg> for StatementPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Ratio => StatementPolicy::ratio(),
            PolicyArg::EquipmentFinanced => StatementPolicy::equipment_financed(),
        }
    }
}

fn per_unit_driver(
    equipment: Option<Decimal>,
    machinist: Option<Decimal>,
    design: Option<Decimal>,
    supervision: Option<Decimal>,
) -> Option<CostDriver> {
    if equipment.is_none() && machinist.is_none() && design.is_none() && supervision.is_none() {
        return None;
    }
    Some(CostDriver::PerUnit {
        equipment: equipment.unwrap_or_default(),
        machinist_labor: machinist.unwrap_or_default(),
        design_labor: design.unwrap_or_default(),
        supervision: supervision.unwrap_or_default(),
    })
}

fn parse_hourly_rate(s: &str) -> Result<HourlyRate, String> {
    let (cost, hours) = s
        .split_once(':')
        .ok_or_else(|| format!("expected COST_PER_HOUR:HOURS_PER_UNIT, got '{s}'"))?;
    let cost_per_hour = cost
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid cost per hour '{cost}': {e}"))?;
    let hours_per_unit = hours
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid hours per unit '{hours}': {e}"))?;
    Ok(HourlyRate {
        cost_per_hour,
        hours_per_unit,
    })
}

fn parse_equipment_rate(s: &str) -> Result<(String, HourlyRate), String> {
    let (name, rate) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=COST_PER_HOUR:HOURS_PER_UNIT, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing equipment name in '{s}'"));
    }
    Ok((name.to_string(), parse_hourly_rate(rate)?))
}

/// Hourly driver from the `--*-rate` flags. Every equipment name must refer
/// to saved equipment; unset labor rates contribute nothing.
fn hourly_driver(
    state: &EntityState,
    equipment_rates: Vec<(String, HourlyRate)>,
    machinist: Option<HourlyRate>,
    design: Option<HourlyRate>,
    supervision: Option<HourlyRate>,
) -> Result<Option<CostDriver>> {
    if equipment_rates.is_empty() && machinist.is_none() && design.is_none() && supervision.is_none()
    {
        return Ok(None);
    }
    let mut equipment = BTreeMap::new();
    for (name, rate) in equipment_rates {
        if !state.equipment.iter().any(|e| e.name == name) {
            bail!("no equipment named '{}'", name);
        }
        if equipment.insert(name.clone(), rate).is_some() {
            bail!("equipment '{}' given more than once", name);
        }
    }
    let none = HourlyRate {
        cost_per_hour: Decimal::ZERO,
        hours_per_unit: Decimal::ZERO,
    };
    Ok(Some(CostDriver::Hourly {
        equipment,
        machinist_labor: machinist.unwrap_or(none),
        design_labor: design.unwrap_or(none),
        supervision: supervision.unwrap_or(none),
    }))
}

fn print_state(repo: &JsonFileRepository) -> Result<()> {
    let state = repo.load()?;
    println!("Equipment ({})", state.equipment.len());
    for e in &state.equipment {
        let financing = e
            .financing
            .map(|f| format!(" | {:?}", f))
            .unwrap_or_default();
        println!(
            "  {} | cost: ${} | life: {}y | capacity: {}/y{}",
            e.name, e.cost, e.useful_life, e.max_capacity, financing
        );
    }
    println!("Products ({})", state.products.len());
    for p in &state.products {
        let cost = p
            .unit_cost
            .map(|c| format!("${}", c))
            .unwrap_or_else(|| format!("driver '{}'", p.driver_key()));
        println!(
            "  {} | units: {} | price: ${} | cost: {} | growth: {}",
            p.name, p.initial_units, p.unit_price, cost, p.growth_rate
        );
    }
    println!("Cost drivers ({})", state.cost_drivers.len());
    for (key, d) in &state.cost_drivers {
        println!("  {} | unit cost: ${}", key, d.unit_cost());
    }
    Ok(())
}

fn print_report(report: &ScenarioReport) {
    println!("Year | Revenue | Costs | Production | Utilization");
    for p in &report.series.points {
        println!(
            "{} | ${:.0} | ${:.0} | {:.1} | {:.2}%",
            p.year,
            p.revenue.round_dp(0),
            p.cost.round_dp(0),
            p.production.round_dp(1),
            p.utilization_pct.round_dp(2)
        );
    }
    println!("\nIncome | Gross Profit | OpEx | EBITDA | Depreciation | EBIT | Net Income");
    for r in &report.statements.income {
        println!(
            "{} | ${:.0} | ${:.0} | ${:.0} | ${:.0} | ${:.0} | ${:.0}",
            r.year,
            r.gross_profit.round_dp(0),
            r.operating_expenses.round_dp(0),
            r.ebitda.round_dp(0),
            r.depreciation.round_dp(0),
            r.ebit.round_dp(0),
            r.net_income.round_dp(0)
        );
    }
    println!("\nBalance | Assets | Liabilities | Equity");
    for r in &report.statements.balance_sheet {
        println!(
            "{} | ${:.0} | ${:.0} | ${:.0}",
            r.year,
            r.assets.round_dp(0),
            r.liabilities.round_dp(0),
            r.equity.round_dp(0)
        );
    }
    println!("\nCash flow | Operating | Investing | Financing");
    for r in &report.statements.cash_flow {
        println!(
            "{} | ${:.0} | ${:.0} | ${:.0}",
            r.year,
            r.operating.round_dp(0),
            r.investing.round_dp(0),
            r.financing.round_dp(0)
        );
    }
    let swot = &report.swot;
    for (label, findings) in [
        ("Strengths", &swot.strengths),
        ("Weaknesses", &swot.weaknesses),
        ("Opportunities", &swot.opportunities),
        ("Threats", &swot.threats),
    ] {
        println!("\n{}:", label);
        for f in findings {
            println!("  - {}", f);
        }
    }
    println!("\nBelievability score: {}/100", report.score);
}

fn main() -> Result<()> {
    // Logging setup; stdout is reserved for tables and JSON
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let path = cli
        .state
        .unwrap_or_else(|| PathBuf::from(persistence::default_state_path()));
    let repo = JsonFileRepository::new(&path);
    info!(state = %path.display(), "starting CLI");

    match cli.command {
        Commands::List => print_state(&repo)?,
        Commands::AddEquipment {
            name,
            cost,
            useful_life,
            max_capacity,
            financing,
        } => {
            let equipment = Equipment {
                name,
                cost,
                useful_life,
                max_capacity,
                financing: financing.map(Into::into),
            };
            validate_equipment(&equipment)?;
            let mut state = repo.load()?;
            println!("Equipment '{}' added", equipment.name);
            state.add_equipment(equipment);
            repo.save(&state)?;
        }
        Commands::AddProduct {
            name,
            initial_units,
            unit_price,
            unit_cost,
            growth_rate,
            cost_driver,
            equipment_cost_per_unit,
            machinist_cost_per_unit,
            design_cost_per_unit,
            supervision_cost_per_unit,
            equipment_rates,
            machinist_rate,
            design_rate,
            supervision_rate,
        } => {
            let product = Product {
                name,
                initial_units,
                unit_price,
                unit_cost,
                growth_rate,
                cost_driver,
            };
            validate_product(&product)?;
            let mut state = repo.load()?;
            let per_unit = per_unit_driver(
                equipment_cost_per_unit,
                machinist_cost_per_unit,
                design_cost_per_unit,
                supervision_cost_per_unit,
            );
            let hourly = hourly_driver(
                &state,
                equipment_rates,
                machinist_rate,
                design_rate,
                supervision_rate,
            )?;
            let driver = match (per_unit, hourly) {
                (Some(_), Some(_)) => {
                    bail!("per-unit cost flags and hourly rate flags cannot be combined")
                }
                (d, None) | (None, d) => d,
            };
            if let Some(d) = &driver {
                validate_cost_driver(product.driver_key(), d)?;
            }
            if product.unit_cost.is_none()
                && driver.is_none()
                && !state.cost_drivers.contains_key(product.driver_key())
            {
                bail!(
                    "product '{}' needs --unit-cost or cost drivers",
                    product.name
                );
            }
            println!("Product '{}' added", product.name);
            state.add_product(product, driver);
            repo.save(&state)?;
        }
        Commands::RemoveEquipment { name } => {
            let mut state = repo.load()?;
            if state.remove_equipment(&name).is_none() {
                bail!("no equipment named '{}'", name);
            }
            repo.save(&state)?;
            println!("Equipment '{}' removed", name);
        }
        Commands::RemoveProduct { name } => {
            let mut state = repo.load()?;
            if state.remove_product(&name).is_none() {
                bail!("no product named '{}'", name);
            }
            repo.save(&state)?;
            println!("Product '{}' removed", name);
        }
        Commands::Project {
            scenario,
            years,
            base_year,
            policy,
            export,
            json,
        } => {
            let mut config = match &scenario {
                Some(p) => persistence::load_scenario(p)
                    .with_context(|| format!("loading scenario {}", p.display()))?,
                None => ScenarioConfig::default(),
            };
            if let Some(y) = years {
                config.num_years = y;
            }
            if let Some(y) = base_year {
                config.base_year = y;
            }
            if let Some(p) = policy {
                config.policy = p.into();
            }
            validate_config(&config)?;

            let state = repo.load()?;
            let report = ScenarioReport::build(&state, &config);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            if let Some(out) = export {
                persistence::export_report(&out, &report)?;
                println!("Report written to {}", out.display());
            }
        }
    }

    Ok(())
}
