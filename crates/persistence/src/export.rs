//! Row-per-year CSV rendering of a scenario report.

use crate::PersistenceError;
use plan_econ::ScenarioReport;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

fn money(v: Decimal) -> String {
    format!("{:.2}", v.round_dp(2))
}

/// Write the report as CSV: the series, one revenue column per product, the
/// three statements and utilization, one row per projected year.
pub fn write_report<W: Write>(
    writer: W,
    report: &ScenarioReport,
) -> Result<(), PersistenceError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["Year".to_string(), "Revenue".into(), "Costs".into()];
    header.extend(
        report
            .series
            .product_revenue
            .iter()
            .map(|line| format!("{} Revenue", line.name)),
    );
    header.extend(
        [
            "Gross Profit",
            "Operating Expenses",
            "EBITDA",
            "Depreciation",
            "EBIT",
            "Net Income",
            "Assets",
            "Liabilities",
            "Equity",
            "Operating Cash Flow",
            "Investing Cash Flow",
            "Financing Cash Flow",
            "Equipment Utilization (%)",
        ]
        .map(String::from),
    );
    wtr.write_record(&header)?;

    let statements = &report.statements;
    let rows = report
        .series
        .points
        .iter()
        .zip(&statements.income)
        .zip(&statements.balance_sheet)
        .zip(&statements.cash_flow)
        .enumerate();
    for (i, (((point, inc), bs), cf)) in rows {
        let mut record = vec![point.year.to_string(), money(point.revenue), money(point.cost)];
        for line in &report.series.product_revenue {
            record.push(line.revenue.get(i).copied().map(money).unwrap_or_default());
        }
        record.extend(
            [
                inc.gross_profit,
                inc.operating_expenses,
                inc.ebitda,
                inc.depreciation,
                inc.ebit,
                inc.net_income,
                bs.assets,
                bs.liabilities,
                bs.equity,
                cf.operating,
                cf.investing,
                cf.financing,
                point.utilization_pct,
            ]
            .map(money),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Export the report to a CSV file, creating parent directories.
pub fn export_report<P: AsRef<Path>>(
    path: P,
    report: &ScenarioReport,
) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_report(File::create(path)?, report)?;
    info!(path = %path.display(), rows = report.series.len(), "exported report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_core::{EntityState, Equipment, Product, ScenarioConfig};

    fn report() -> ScenarioReport {
        let mut state = EntityState::default();
        state.add_equipment(Equipment {
            name: "CNC Mill".to_string(),
            cost: Decimal::new(500_000, 0),
            useful_life: 10,
            max_capacity: 10_000,
            financing: None,
        });
        state.add_product(
            Product {
                name: "Widget".to_string(),
                initial_units: 1000,
                unit_price: Decimal::new(100, 0),
                unit_cost: Some(Decimal::new(50, 0)),
                growth_rate: Decimal::new(10, 2),
                cost_driver: None,
            },
            None,
        );
        ScenarioReport::build(&state, &ScenarioConfig::default())
    }

    #[test]
    fn csv_has_header_and_one_row_per_year() {
        let mut buf = Vec::new();
        write_report(&mut buf, &report()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Year,Revenue,Costs,Widget Revenue,Gross Profit,"));
        assert!(lines[0].ends_with("Equipment Utilization (%)"));
        assert_eq!(
            lines[1],
            "2025,100000.00,50000.00,100000.00,50000.00,10000.00,40000.00,2500.00,37500.00,\
             28125.00,60000.00,30000.00,30000.00,32000.00,-8000.00,4000.00,10.00"
        );
        assert!(lines[5].starts_with("2029,146410.00,73205.00,"));
        assert!(lines[5].ends_with(",14.64"));
    }

    #[test]
    fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/report.csv");
        export_report(&path, &report()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 6);
    }
}
