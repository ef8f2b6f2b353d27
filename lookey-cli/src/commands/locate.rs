//! `lookey locate` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use lookey_core::config::LookeyConfig;
use lookey_core::types::{LocateResult, UserId};

use crate::cli::LocateArgs;
use crate::commands::build_engine;
use crate::error::CliError;
use crate::images::{read_image, read_images};
use crate::output::{OutputWriter, Render};

/// Execute the `locate` command.
///
/// The scan cache lives in-process, so the shelf photos are ingested first
/// and the frame is resolved against that scan.
pub async fn execute(
    args: LocateArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = LookeyConfig::load(config_path).await?;
    let engine = build_engine(&config).await?;

    let shelf = read_images(&args.images).await?;
    let frame = read_image(&args.frame).await?;

    let scan = engine.ingest_shelf(args.user, &shelf).await?;
    info!(
        user_id = args.user,
        scan_id = %scan.scan_id,
        product = %args.product,
        "shelf ingested, locating product"
    );

    let result = engine.locate(args.user, &frame, &args.product).await?;
    let report = LocateReport {
        user_id: args.user,
        product: args.product,
        message: outcome_message(&result),
        result,
    };
    writer.render(&report)?;
    Ok(())
}

/// Human-readable outcome message for a locate result.
pub fn outcome_message(result: &LocateResult) -> &'static str {
    match result {
        LocateResult::Direction { .. } => "product direction resolved",
        LocateResult::SingleRecognized { .. } => "single product recognized",
    }
}

/// Locate outcome.
#[derive(Serialize)]
pub struct LocateReport {
    pub user_id: UserId,
    pub product: String,
    pub message: &'static str,
    pub result: LocateResult,
}

impl Render for LocateReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Locate: {} (user {})",
            self.product.bold(),
            self.user_id
        )?;
        writeln!(w, "  Result: {}", self.message.green().bold())?;

        match &self.result {
            LocateResult::Direction {
                target_name,
                direction,
            } => {
                writeln!(w, "  Target: {target_name}")?;
                writeln!(w, "  Direction: {}", direction.as_str().cyan().bold())?;
            }
            LocateResult::SingleRecognized {
                name,
                price,
                event,
                has_allergy_conflict,
            } => {
                writeln!(w, "  Product: {name}")?;
                match price {
                    Some(p) => writeln!(w, "  Price: {p}원")?,
                    None => writeln!(w, "  Price: N/A")?,
                }
                writeln!(w, "  Event: {}", event.as_deref().unwrap_or("none"))?;
                if *has_allergy_conflict {
                    writeln!(
                        w,
                        "  Allergy: {}",
                        "WARNING: contains an ingredient you are allergic to"
                            .red()
                            .bold()
                    )?;
                } else {
                    writeln!(w, "  Allergy: no conflict")?;
                }
            }
        }
        Ok(())
    }
}
