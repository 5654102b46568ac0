use std::path::Path;

use crate::error::Result;
use crate::model::{CoverageData, CoverageModel};
use crate::parsers::cobertura::CoberturaParser;
use crate::parsers::Parser;

/// Read a Cobertura report from disk and parse it.
pub fn read_report(file_path: &Path) -> Result<CoverageData> {
    let content = std::fs::read(file_path)?;
    let data = CoberturaParser.parse(&content)?;
    if data.files.is_empty() {
        tracing::warn!("{} contains no source files", file_path.display());
    }
    Ok(data)
}

/// Read, parse and validate a report into a [`CoverageModel`].
pub fn load(file_path: &Path) -> Result<CoverageModel> {
    let data = read_report(file_path)?;
    let model = CoverageModel::new(data)?;
    tracing::debug!(
        path = %file_path.display(),
        files = model.files().len(),
        statements = model.statements(),
        "loaded coverage report"
    );
    Ok(model)
}
