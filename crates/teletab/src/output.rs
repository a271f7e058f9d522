use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use teletab_store::{IndicatorRow, StalenessScale};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct RowOutput<'a> {
    symbol: char,
    code: String,
    value: f64,
    age_seconds: f64,
    tier: &'a str,
}

#[derive(Serialize)]
struct SnapshotOutput<'a> {
    indicators: usize,
    rows: Vec<RowOutput<'a>>,
}

/// Render one snapshot to stdout. All presentation concerns live here;
/// the core never emits display bytes.
pub fn print_snapshot(rows: &[IndicatorRow], scale: &StalenessScale, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = SnapshotOutput {
                indicators: rows.len(),
                rows: rows
                    .iter()
                    .map(|row| RowOutput {
                        symbol: row.symbol,
                        code: format!("{:02X}", row.symbol as u32),
                        value: row.value,
                        age_seconds: row.age.as_secs_f64(),
                        tier: scale.classify(row.age),
                    })
                    .collect(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SYMBOL", "CODE", "VALUE", "AGE", "STATUS"]);
            for row in rows {
                table.add_row(vec![
                    row.symbol.to_string(),
                    format!("{:02X}", row.symbol as u32),
                    format!("{:.4}", row.value),
                    format!("{:.1}s", row.age.as_secs_f64()),
                    scale.classify(row.age).to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in rows {
                println!(
                    "symbol={} code={:02X} value={:.4} age={:.1}s status={}",
                    row.symbol,
                    row.symbol as u32,
                    row.value,
                    row.age.as_secs_f64(),
                    scale.classify(row.age)
                );
            }
        }
    }
}

/// Clear the terminal and home the cursor before a live refresh.
/// Only meaningful for terminal formats; JSON consumers get one snapshot
/// object per line instead.
pub fn clear_screen() {
    if std::io::stdout().is_terminal() {
        let mut out = std::io::stdout();
        let _ = out.write_all(b"\x1b[2J\x1b[1;1H");
        let _ = out.flush();
    }
}
