//! The `run` and `validate` subcommands: config-driven record linkage.

use std::path::{Path, PathBuf};

use waybill_linkage::engine::load_table;
use waybill_linkage::{LinkConfig, LinkInput, LinkResult, Table};

use crate::exit_codes::{EXIT_LINK_INVALID_CONFIG, EXIT_LINK_RUNTIME, EXIT_LINK_UNMATCHED};
use crate::CliError;

fn link_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

pub fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    report_file: Option<PathBuf>,
    strict: bool,
) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| link_err(EXIT_LINK_RUNTIME, format!("cannot read config: {e}")))?;

    let config = LinkConfig::from_toml(&config_str)
        .map_err(|e| link_err(EXIT_LINK_INVALID_CONFIG, e.to_string()))?;
    log::debug!("loaded config '{}' from {}", config.name, config_path.display());

    // Data files resolve relative to the config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let read_table = |label: &str, file: &str| -> Result<Table, CliError> {
        let path = base_dir.join(file);
        let csv_data = std::fs::read_to_string(&path).map_err(|e| {
            link_err(EXIT_LINK_RUNTIME, format!("cannot read {}: {e}", path.display()))
        })?;
        load_table(label, &csv_data).map_err(|e| link_err(EXIT_LINK_RUNTIME, e.to_string()))
    };

    let input = LinkInput {
        destination: read_table("destination", &config.destination.file)?,
        source: read_table("source", &config.source.file)?,
    };

    let result = waybill_linkage::run(&config, &input)
        .map_err(|e| link_err(EXIT_LINK_RUNTIME, e.to_string()))?;

    // Merged CSV: the flag wins over the config's [output] default.
    let csv_target =
        output_file.or_else(|| config.output.csv.as_ref().map(|f| base_dir.join(f)));
    if let Some(ref path) = csv_target {
        write_merged_csv(path, &result)?;
        eprintln!("wrote {}", path.display());
    }

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| link_err(EXIT_LINK_RUNTIME, format!("JSON serialization error: {e}")))?;

    let report_target =
        report_file.or_else(|| config.output.json.as_ref().map(|f| base_dir.join(f)));
    if let Some(ref path) = report_target {
        std::fs::write(path, &json_str)
            .map_err(|e| link_err(EXIT_LINK_RUNTIME, format!("cannot write report: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "linked {} rows — {} phone, {} address, {} product, {} fallback, {} unmatched",
        s.total_rows, s.phone_matched, s.address_matched, s.product_matched, s.fallback,
        s.unmatched,
    );
    if s.duplicate_destination_names > 0 || s.duplicate_source_names > 0 {
        eprintln!(
            "duplicate names: {} destination, {} source",
            s.duplicate_destination_names, s.duplicate_source_names,
        );
    }

    if strict && s.unmatched > 0 {
        return Err(link_err(
            EXIT_LINK_UNMATCHED,
            format!("{} destination rows unmatched", s.unmatched),
        )
        .with_hint("inspect unmatched rows with --json"));
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| link_err(EXIT_LINK_RUNTIME, format!("cannot read config: {e}")))?;

    match LinkConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: '{}' links {} against {}",
                config.name, config.destination.file, config.source.file,
            );
            Ok(())
        }
        Err(e) => Err(link_err(EXIT_LINK_INVALID_CONFIG, e.to_string())),
    }
}

fn write_merged_csv(path: &Path, result: &LinkResult) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        link_err(EXIT_LINK_RUNTIME, format!("cannot write {}: {e}", path.display()))
    })?;
    writer
        .write_record(&result.headers)
        .map_err(|e| link_err(EXIT_LINK_RUNTIME, e.to_string()))?;
    for row in &result.rows {
        writer
            .write_record(&row.values)
            .map_err(|e| link_err(EXIT_LINK_RUNTIME, e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| link_err(EXIT_LINK_RUNTIME, e.to_string()))?;
    Ok(())
}
