//! `lookey config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use lookey_core::config::LookeyConfig;
use lookey_locator::InMemoryCatalog;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

const SECTIONS: [&str; 5] = ["general", "detector", "cache", "locator", "catalog"];

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Load and validate the configuration, then check that the catalog it
/// points at parses.
///
/// # Errors
///
/// Returns `CliError::Config` if either check fails.
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = validate_report(config_path).await;
    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }
    Ok(())
}

async fn validate_report(config_path: &Path) -> ConfigValidationReport {
    let mut report = ConfigValidationReport {
        source: config_path.display().to_string(),
        valid: true,
        errors: Vec::new(),
        catalog: None,
    };

    let config = match LookeyConfig::load(config_path).await {
        Ok(config) => config,
        Err(e) => {
            report.valid = false;
            report.errors.push(e.to_string());
            return report;
        }
    };

    let catalog_path = Path::new(&config.catalog.path);
    if !catalog_path.exists() {
        report.catalog = Some(format!("{} (not found, enrichment disabled)", catalog_path.display()));
        return report;
    }

    match InMemoryCatalog::from_file(catalog_path).await {
        Ok(catalog) => {
            report.catalog = Some(format!(
                "{} ({} products, {} users)",
                catalog_path.display(),
                catalog.product_count(),
                catalog.user_count()
            ));
        }
        Err(e) => {
            report.valid = false;
            report.errors.push(e.to_string());
        }
    }
    report
}

/// Show the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Core` if loading fails or `CliError::Command` if the
/// section name is unknown.
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = LookeyConfig::load(config_path).await?;
    let report = build_show_report(&config, config_path, section)?;
    writer.render(&report)?;
    Ok(())
}

fn build_show_report(
    config: &LookeyConfig,
    config_path: &Path,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    let config_toml = match section.as_deref() {
        None => to_toml(config),
        Some("general") => to_toml(&config.general),
        Some("detector") => to_toml(&config.detector),
        Some("cache") => to_toml(&config.cache),
        Some("locator") => to_toml(&config.locator),
        Some("catalog") => to_toml(&config.catalog),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {other} (expected: {})",
                SECTIONS.join(", ")
            )));
        }
    };

    Ok(ConfigReport {
        source: config_path.display().to_string(),
        section,
        config_toml,
    })
}

fn to_toml<T: Serialize>(value: &T) -> String {
    toml::to_string_pretty(value).unwrap_or_else(|e| format!("(serialization error: {e})"))
}

/// Configuration display report.
///
/// The `config_toml` field is skipped during JSON serialization (only used for text rendering).
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{section}]");
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;
        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
    /// Catalog summary when the configuration itself loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;
        if let Some(ref catalog) = self.catalog {
            writeln!(w, "  Catalog: {catalog}")?;
        }

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(report: &impl Render) -> String {
        let mut buffer = Vec::new();
        report
            .render_text(&mut buffer)
            .expect("text rendering should succeed");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    #[test]
    fn show_full_config_contains_every_section() {
        let report =
            build_show_report(&LookeyConfig::default(), Path::new("lookey.toml"), None).unwrap();
        for section in SECTIONS {
            assert!(
                report.config_toml.contains(&format!("[{section}]")),
                "missing [{section}]"
            );
        }
    }

    #[test]
    fn show_single_section() {
        let report = build_show_report(
            &LookeyConfig::default(),
            Path::new("lookey.toml"),
            Some("cache".to_owned()),
        )
        .unwrap();
        assert!(report.config_toml.contains("ttl_secs = 600"));
        assert!(!report.config_toml.contains("base_url"));

        let output = render(&report);
        assert!(output.contains("[cache]"));
    }

    #[test]
    fn show_unknown_section_is_command_error() {
        let err = build_show_report(
            &LookeyConfig::default(),
            Path::new("lookey.toml"),
            Some("ebpf".to_owned()),
        )
        .err()
        .expect("unknown section should fail");
        assert!(matches!(err, CliError::Command(_)));
        assert!(err.to_string().contains("detector"));
    }

    #[test]
    fn config_report_json_skips_toml_body() {
        let report = ConfigReport {
            source: "lookey.toml".to_owned(),
            section: Some("detector".to_owned()),
            config_toml: "timeout_secs = 30".to_owned(),
        };
        let parsed = serde_json::to_value(&report).expect("serializable");
        assert_eq!(parsed["section"].as_str(), Some("detector"));
        assert!(parsed.get("config_toml").is_none());
    }

    #[tokio::test]
    async fn validate_report_missing_file() {
        let report = validate_report(Path::new("/nonexistent/lookey.toml")).await;
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert!(render(&report).contains("INVALID"));
    }

    #[tokio::test]
    async fn validate_report_with_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("catalog.toml");
        std::fs::write(
            &catalog_path,
            "[[products]]\nid = 1\nname = \"새우깡\"\n\n[[users]]\nid = 1\nallergies = [2]\n",
        )
        .unwrap();
        let config_path = dir.path().join("lookey.toml");
        std::fs::write(
            &config_path,
            format!("[catalog]\npath = \"{}\"\n", catalog_path.display()),
        )
        .unwrap();

        let report = validate_report(&config_path).await;
        assert!(report.valid, "errors: {:?}", report.errors);
        let catalog = report.catalog.expect("catalog summary");
        assert!(catalog.contains("1 products"));
        assert!(catalog.contains("1 users"));
    }

    #[tokio::test]
    async fn validate_report_broken_catalog_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("catalog.toml");
        std::fs::write(
            &catalog_path,
            "[[products]]\nid = 1\nname = \"a\"\n\n[[products]]\nid = 1\nname = \"b\"\n",
        )
        .unwrap();
        let config_path = dir.path().join("lookey.toml");
        std::fs::write(
            &config_path,
            format!("[catalog]\npath = \"{}\"\n", catalog_path.display()),
        )
        .unwrap();

        let report = validate_report(&config_path).await;
        assert!(!report.valid);
        assert!(report.errors[0].contains("duplicate product id"));
    }

    #[test]
    fn validation_report_valid_text() {
        let report = ConfigValidationReport {
            source: "lookey.toml".to_owned(),
            valid: true,
            errors: Vec::new(),
            catalog: Some("catalog.toml (4 products, 2 users)".to_owned()),
        };
        let output = render(&report);
        assert!(output.contains("VALID"));
        assert!(output.contains("4 products"));
        assert!(!output.contains("Error:"));
    }
}
