//! Report output port trait.

use crate::domain::error::LevholdError;
use crate::domain::report::SimulationReport;

/// Port for writing simulation reports.
pub trait ReportPort {
    fn write(&self, report: &SimulationReport, output_path: &str) -> Result<(), LevholdError>;
}
