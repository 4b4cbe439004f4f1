//! CSV report writer.

use crate::domain::error::LevholdError;
use crate::domain::report::{ReportRow, SimulationReport};
use crate::ports::config_port::DATE_FORMAT;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Renders the report into an in-memory CSV string.
    pub fn render(report: &SimulationReport) -> Result<String, LevholdError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_rows(&mut wtr, report)?;
        let bytes = wtr.into_inner().map_err(|e| LevholdError::Report {
            reason: format!("failed to flush CSV: {}", e),
        })?;
        String::from_utf8(bytes).map_err(|e| LevholdError::Report {
            reason: e.to_string(),
        })
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn row_record(row: &ReportRow) -> [String; 13] {
    [
        row.date.format(DATE_FORMAT).to_string(),
        row.adj_close.to_string(),
        row.signal.to_string(),
        optional(row.position_change),
        row.theta.to_string(),
        row.stock_hold.to_string(),
        row.cap_v.to_string(),
        row.pnl.to_string(),
        row.cumulative_pnl.to_string(),
        row.turnover_dollars.to_string(),
        row.turnover_units.to_string(),
        row.compounded_capital.to_string(),
        optional(row.capital_delta),
    ]
}

fn write_rows<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    report: &SimulationReport,
) -> Result<(), LevholdError> {
    let to_err = |e: csv::Error| LevholdError::Report {
        reason: format!("CSV write error: {}", e),
    };
    wtr.write_record(SimulationReport::COLUMNS).map_err(to_err)?;
    for row in &report.rows {
        wtr.write_record(row_record(row)).map_err(to_err)?;
    }
    wtr.flush()?;
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, report: &SimulationReport, output_path: &str) -> Result<(), LevholdError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| LevholdError::Report {
            reason: format!("failed to open {}: {}", output_path, e),
        })?;
        write_rows(&mut wtr, report)?;
        tracing::debug!(rows = report.len(), output_path, "report written");
        Ok(())
    }
}
