use std::path::Path;

use quotemerge_models::PartLine;
use quotemerge_utils::{
    reconcile as reconcile_lists, validate_file_type, AppConfig, DateMode, PartListParser, PartListValidator,
    QuoteExtractor, QuoteResult, ReportRenderer, WorkbookLoader,
};
use tracing::info;

use crate::OutputFormat;

const PART_LIST_TYPES: &[&str] = &["csv", "json", "xlsx"];
const WORKBOOK_TYPES: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

pub fn reconcile(config: &AppConfig, bom: &Path, disti: &Path, format: OutputFormat) -> QuoteResult<String> {
    let bom = load_part_list(bom, &PartListValidator::for_demand())?;
    let disti = load_part_list(disti, &PartListValidator::for_supply())?;

    let result = reconcile_lists(&bom, &disti)?;
    if !result.is_clean() {
        info!("Reconciliation has flagged lines");
    }

    let renderer = ReportRenderer::new(&config.report);
    match format {
        OutputFormat::Table => Ok(renderer.render_table(&result.records)),
        OutputFormat::Json => renderer.render_json(&result.records),
    }
}

pub fn extract(
    config: &AppConfig,
    workbook: &Path,
    sheet: Option<String>,
    date_mode: Option<DateMode>,
) -> QuoteResult<String> {
    validate_file_type(&workbook.to_string_lossy(), WORKBOOK_TYPES)?;

    let mut loader = WorkbookLoader::new(date_mode.unwrap_or(config.extractor.date_mode));
    if let Some(sheet) = sheet {
        loader = loader.with_sheet(sheet);
    }
    let grid = loader.load_path(workbook)?;

    let document = QuoteExtractor::new(config.extractor.clone()).extract_document(&grid)?;
    info!(
        path = %workbook.display(),
        items = document.items.as_ref().map_or(0, Vec::len),
        "Extracted quote"
    );

    ReportRenderer::new(&config.report).render_json(&document)
}

fn load_part_list(path: &Path, validator: &PartListValidator) -> QuoteResult<Vec<PartLine>> {
    validate_file_type(&path.to_string_lossy(), PART_LIST_TYPES)?;

    let list = PartListParser::new().parse_file(path)?;
    validator.to_part_lines(&list)
}
