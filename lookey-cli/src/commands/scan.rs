//! `lookey scan` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use lookey_core::config::LookeyConfig;
use lookey_core::types::{ShelfItem, UserId};

use crate::cli::ScanArgs;
use crate::commands::build_engine;
use crate::error::CliError;
use crate::images::read_images;
use crate::output::{OutputWriter, Render};

/// Execute the `scan` command.
///
/// With shopping list items the shelf is matched against them; without any,
/// the detected shelf itself is listed.
pub async fn execute(
    args: ScanArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = LookeyConfig::load(config_path).await?;
    let engine = build_engine(&config).await?;
    let images = read_images(&args.images).await?;

    info!(user_id = args.user, images = images.len(), "starting shelf scan");

    if args.items.is_empty() {
        let scan = engine.ingest_shelf(args.user, &images).await?;
        let report = ShelfReport {
            user_id: args.user,
            scan_id: scan.scan_id.to_string(),
            images: images.len(),
            items: scan.items.clone(),
        };
        writer.render(&report)?;
        return Ok(());
    }

    let matched = engine
        .scan_shelf(args.user, &images, args.items.as_slice())
        .await?;
    let report = MatchReport {
        user_id: args.user,
        message: MATCH_MESSAGE,
        shopping_list: args.items,
        count: matched.count(),
        matched: matched.into_names(),
    };
    writer.render(&report)?;
    Ok(())
}

const MATCH_MESSAGE: &str = "shelf matched against shopping list";

/// Shopping list match result.
#[derive(Serialize)]
pub struct MatchReport {
    pub user_id: UserId,
    pub message: &'static str,
    pub shopping_list: Vec<String>,
    /// Shelf names that matched, in shelf order
    pub matched: Vec<String>,
    pub count: usize,
}

impl Render for MatchReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Shelf scan for user {}", self.user_id.to_string().bold())?;
        writeln!(w, "  Result: {}", self.message.green())?;
        writeln!(
            w,
            "  Matched: {} of {} shopping list item(s)",
            self.count,
            self.shopping_list.len()
        )?;
        writeln!(w)?;

        if self.matched.is_empty() {
            writeln!(w, "{}", "None of the listed items are on this shelf.".yellow())?;
        } else {
            for name in &self.matched {
                writeln!(w, "  - {name}")?;
            }
        }
        Ok(())
    }
}

/// Detected shelf listing, used when no shopping list is given.
#[derive(Serialize)]
pub struct ShelfReport {
    pub user_id: UserId,
    pub scan_id: String,
    pub images: usize,
    pub items: Vec<ShelfItem>,
}

impl Render for ShelfReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Shelf scan for user {}", self.user_id.to_string().bold())?;
        writeln!(w, "  Scan ID: {}", self.scan_id)?;
        writeln!(w, "  Images: {}", self.images)?;
        writeln!(w, "  Items detected: {}", self.items.len())?;
        writeln!(w)?;

        writeln!(
            w,
            "{:<30} {:>8} {:>8} {:>6} {:>6}",
            "Name", "X", "Y", "W", "H"
        )?;
        writeln!(w, "{}", "-".repeat(62))?;
        for item in &self.items {
            writeln!(
                w,
                "{:<30} {:>8} {:>8} {:>6} {:>6}",
                item.name, item.center_x, item.center_y, item.width, item.height
            )?;
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
    fn match_report_lists_matches_in_order() {
        let report = MatchReport {
            user_id: 7,
            message: MATCH_MESSAGE,
            shopping_list: vec!["콜라".to_owned(), "새우깡".to_owned(), "우유".to_owned()],
            matched: vec!["새우깡".to_owned(), "코카콜라 500ml".to_owned()],
            count: 2,
        };
        let output = render(&report);
        assert!(output.contains("shelf matched against shopping list"));
        assert!(output.contains("2 of 3"));
        let first = output.find("새우깡").expect("first match rendered");
        let second = output.find("코카콜라 500ml").expect("second match rendered");
        assert!(first < second, "shelf order preserved");
    }

    #[test]
    fn match_report_without_matches() {
        let report = MatchReport {
            user_id: 7,
            message: MATCH_MESSAGE,
            shopping_list: vec!["사이다".to_owned()],
            matched: Vec::new(),
            count: 0,
        };
        assert!(render(&report).contains("None of the listed items"));
    }

    #[test]
    fn match_report_json_fields() {
        let report = MatchReport {
            user_id: 1,
            message: MATCH_MESSAGE,
            shopping_list: vec!["cola".to_owned()],
            matched: vec!["Cola Zero".to_owned()],
            count: 1,
        };
        let parsed = serde_json::to_value(&report).expect("serializable");
        assert_eq!(parsed["count"].as_u64(), Some(1));
        assert_eq!(parsed["matched"][0].as_str(), Some("Cola Zero"));
        assert_eq!(parsed["message"].as_str(), Some(MATCH_MESSAGE));
    }

    #[test]
    fn shelf_report_renders_item_table() {
        let report = ShelfReport {
            user_id: 3,
            scan_id: "scan-1".to_owned(),
            images: 4,
            items: vec![
                ShelfItem::new("새우깡", 120, 340, 80, 110),
                ShelfItem::new("서울우유 1L", 410, 90, 60, 150),
            ],
        };
        let output = render(&report);
        assert!(output.contains("Items detected: 2"));
        assert!(output.contains("새우깡"));
        assert!(output.contains("340"));
        assert!(output.contains("서울우유 1L"));
    }
}
