//! Transform CLI command implementation

use crate::config::AppConfig;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use periodica_core::{Column, FeatureFrame, RowIndex};
use periodica_features::{FeatureComputer, PeriodicSeasonalFeature};
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// Compute the periodic feature over a generated period index
#[derive(Debug, Args)]
pub struct TransformArgs {
    /// Phase-zero timestamp, e.g. 2020-01-01
    #[arg(long)]
    pub start_date: Option<String>,

    /// Period length, e.g. "30 days" or P1W
    #[arg(long)]
    pub period: Option<String>,

    /// Amplitude stored with the feature
    #[arg(long, allow_negative_numbers = true)]
    pub amplitude: Option<f64>,

    /// Name of the output column
    #[arg(long)]
    pub output_name: Option<String>,

    /// Index frequency alias (M, Q, W, D, ...)
    #[arg(long)]
    pub freq: Option<String>,

    /// First period of the index, e.g. 2020-01
    #[arg(long)]
    pub from: Option<String>,

    /// Number of periods in the index
    #[arg(long)]
    pub periods: Option<usize>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl TransformArgs {
    /// Apply command-line overrides on top of file configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(start_date) = &self.start_date {
            config.feature.start_date = start_date.clone();
        }
        if let Some(period) = &self.period {
            config.feature.period = period.clone();
        }
        if let Some(amplitude) = self.amplitude {
            config.feature.amplitude = amplitude;
        }
        if let Some(output_name) = &self.output_name {
            config.feature.output_name = output_name.clone();
        }
        if let Some(freq) = &self.freq {
            config.index.freq = freq.clone();
        }
        if let Some(from) = &self.from {
            config.index.start = from.clone();
        }
        if let Some(periods) = self.periods {
            config.index.periods = periods;
        }
    }

    pub fn run(&self, mut config: AppConfig) -> Result<()> {
        self.apply(&mut config);

        let index = config
            .index
            .build()
            .context("Invalid index configuration")?;
        let computer = PeriodicSeasonalFeature::from_config(&config.feature)
            .context("Invalid feature configuration")?;

        info!(
            feature = %computer.name(),
            output_name = %computer.output_name(),
            freq = %index.freq(),
            rows = index.len(),
            "Running transform"
        );

        let output = computer
            .transform(&FeatureFrame::from_index(index))
            .context("Transform failed")?;

        let stdout = std::io::stdout();
        match self.format {
            OutputFormat::Table => println!("{}", render_table(&output)),
            OutputFormat::Json => {
                let json = render_json(&output)?;
                println!("{}", json);
            }
            OutputFormat::Csv => write_csv(&output, stdout.lock())?,
        }

        Ok(())
    }
}

fn render_table(frame: &FeatureFrame) -> Table {
    let mut header = vec![Cell::new("period").add_attribute(Attribute::Bold)];
    header.extend(
        frame
            .column_names()
            .into_iter()
            .map(|name| Cell::new(name).add_attribute(Attribute::Bold)),
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for (row, label) in frame.index().labels().into_iter().enumerate() {
        let mut cells = vec![Cell::new(label)];
        cells.extend(
            frame
                .columns()
                .iter()
                .map(|column| Cell::new(format!("{:.6}", column.values[row]))),
        );
        table.add_row(cells);
    }

    table
}

fn render_json(frame: &FeatureFrame) -> Result<String> {
    #[derive(Serialize)]
    struct Output<'a> {
        freq: Option<String>,
        index: Vec<String>,
        columns: &'a [Column],
    }

    let freq = match frame.index() {
        RowIndex::Period(index) => Some(index.freq().to_string()),
        _ => None,
    };

    let output = Output {
        freq,
        index: frame.index().labels(),
        columns: frame.columns(),
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

fn write_csv<W: Write>(frame: &FeatureFrame, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["period"];
    header.extend(frame.column_names());
    wtr.write_record(&header)?;

    for (row, label) in frame.index().labels().into_iter().enumerate() {
        let mut record = vec![label];
        record.extend(
            frame
                .columns()
                .iter()
                .map(|column| column.values[row].to_string()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
