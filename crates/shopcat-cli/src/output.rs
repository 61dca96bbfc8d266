//! CSV and JSON serialization of exported rows.
//!
//! CSV rows are written as they arrive. JSON output is a single array, so
//! rows are buffered and serialized when the writer is finished.

use std::io::Write;

use clap::ValueEnum;
use shopcat_core::OutputRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Csv,
    Json,
}

const CSV_HEADER: [&str; 9] = [
    "Code",
    "Collection",
    "Category",
    "Name",
    "Variant Name",
    "Price",
    "In Stock",
    "URL",
    "Image URL",
];

const CSV_BODY_HEADER: &str = "Body";

fn csv_header(include_body: bool) -> Vec<&'static str> {
    let mut header = CSV_HEADER.to_vec();
    if include_body {
        header.push(CSV_BODY_HEADER);
    }
    header
}

pub(crate) enum RowWriter<W: Write> {
    Csv {
        writer: Box<csv::Writer<W>>,
        include_body: bool,
    },
    Json {
        out: W,
        rows: Vec<OutputRow>,
    },
}

impl<W: Write> RowWriter<W> {
    /// Creates a writer for `format`. For CSV the header row is written
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV header cannot be written.
    pub(crate) fn new(format: OutputFormat, out: W, include_body: bool) -> anyhow::Result<Self> {
        match format {
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(out);
                writer.write_record(csv_header(include_body))?;
                Ok(Self::Csv {
                    writer: Box::new(writer),
                    include_body,
                })
            }
            OutputFormat::Json => Ok(Self::Json {
                out,
                rows: Vec::new(),
            }),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the CSV record cannot be written.
    pub(crate) fn write_row(&mut self, row: &OutputRow) -> anyhow::Result<()> {
        match self {
            Self::Csv {
                writer,
                include_body,
            } => {
                let mut record = vec![
                    row.code.trim(),
                    row.collection.trim(),
                    row.category.trim(),
                    row.name.trim(),
                    row.variant_name.trim(),
                    row.price.trim(),
                    row.in_stock_label(),
                    row.url.trim(),
                    row.image_url.trim(),
                ];
                if *include_body {
                    record.push(row.body.trim());
                }
                writer.write_record(&record)?;
            }
            Self::Json { rows, .. } => rows.push(row.clone()),
        }
        Ok(())
    }

    /// Flushes buffered output and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or flushing fails.
    pub(crate) fn finish(self) -> anyhow::Result<W> {
        match self {
            Self::Csv { writer, .. } => writer
                .into_inner()
                .map_err(|e| anyhow::anyhow!("failed to flush CSV output: {}", e.error())),
            Self::Json { mut out, rows } => {
                serde_json::to_writer_pretty(&mut out, &rows)?;
                out.write_all(b"\n")?;
                out.flush()?;
                Ok(out)
            }
        }
    }
}
