//! Cross-section conversion service
//!
//! Reads a BOLSIG+ file, maps every process onto a CTML `<process>` element
//! and writes the serialized document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{CrossSectionParser, DataPoint, Process, ProcessDetail, XmlNode};
use crate::infrastructure::traits::FileSystem;

/// Output layout options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Document root tag
    pub root_tag: String,
    /// Tag of each process element
    pub process_tag: String,
    /// Emit the comment block of each process as an XML comment
    pub include_comments: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            root_tag: "ctml".into(),
            process_tag: "process".into(),
            include_comments: false,
        }
    }
}

impl From<&Settings> for ConversionOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            root_tag: settings.root_tag.clone(),
            process_tag: settings.process_tag.clone(),
            include_comments: settings.include_comments,
        }
    }
}

/// Result of a completed conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Number of processes written
    pub processes: usize,
    /// Total data rows over all processes
    pub rows: usize,
    /// Written file, None when rendered to a string only
    pub output: Option<PathBuf>,
}

impl ConversionSummary {
    fn new(processes: &[Process], output: Option<PathBuf>) -> Self {
        Self {
            processes: processes.len(),
            rows: processes.iter().map(|p| p.data.len()).sum(),
            output,
        }
    }
}

/// Service converting BOLSIG+ cross-section files to CTML.
pub struct ConversionService {
    fs: Arc<dyn FileSystem>,
    parser: CrossSectionParser,
    options: ConversionOptions,
}

impl ConversionService {
    /// Create a new conversion service.
    pub fn new(fs: Arc<dyn FileSystem>, options: ConversionOptions) -> Self {
        Self {
            fs,
            parser: CrossSectionParser::new(),
            options,
        }
    }

    /// Read and parse all processes of `input`.
    #[instrument(level = "debug", skip(self))]
    pub fn read_processes(&self, input: &Path) -> ApplicationResult<Vec<Process>> {
        if !self.fs.exists(input) {
            return Err(ApplicationError::InputNotFound(input.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(input)
            .with_path_context("read cross sections", input)?;
        let processes = self.parser.parse(&content)?;
        debug!("read_processes: {} processes from {}", processes.len(), input.display());
        Ok(processes)
    }

    /// Build the CTML tree for `processes`.
    ///
    /// Each process becomes an element with `id` (position) and `type`
    /// (keyword) attributes and `reactants`, `products`, `threshold` or
    /// `mass_ratio`, optional `weight_ratio`, and `data` children.
    pub fn build_document(&self, processes: &[Process]) -> XmlNode {
        let mut root = XmlNode::element(self.options.root_tag.as_str());
        for (index, process) in processes.iter().enumerate() {
            let element = root.add_child(self.options.process_tag.as_str(), "");
            element
                .set_attribute("id", index.to_string())
                .set_attribute("type", process.kind().as_str());

            if self.options.include_comments && !process.comment.is_empty() {
                element.add_comment(&process.comment);
            }
            element.add_child("reactants", &process.target);

            match &process.detail {
                ProcessDetail::Excitation {
                    product,
                    threshold,
                    weight_ratio,
                } => {
                    element.add_child("products", product);
                    element.add_child("threshold", *threshold);
                    if let Some(weight_ratio) = weight_ratio {
                        element.set_attribute("reversible", "yes");
                        element.add_child("weight_ratio", *weight_ratio);
                    }
                }
                // only excitation carries the reversible marker in the output
                ProcessDetail::Ionization {
                    product, threshold, ..
                } => {
                    element.add_child("products", product);
                    element.add_child("threshold", *threshold);
                }
                ProcessDetail::Attachment { product } => {
                    // no arrow: products repeats the target
                    element.add_child("products", product.as_ref().unwrap_or(&process.target));
                    element.add_child("threshold", 0.0);
                }
                ProcessDetail::MomentumTransfer { mass_ratio, .. } => {
                    element.add_child("products", &process.target);
                    element.add_child("mass_ratio", *mass_ratio);
                }
            }

            element.add_child("data", format_data_table(&process.data));
        }
        root
    }

    /// Serialize `processes` as a complete document.
    pub fn render(&self, processes: &[Process]) -> ApplicationResult<String> {
        Ok(self.build_document(processes).to_document()?)
    }

    /// Parse `input` and render it without writing anything.
    #[instrument(level = "debug", skip(self))]
    pub fn convert_to_string(&self, input: &Path) -> ApplicationResult<(String, ConversionSummary)> {
        let processes = self.read_processes(input)?;
        let document = self.render(&processes)?;
        Ok((document, ConversionSummary::new(&processes, None)))
    }

    /// Convert `input` into `output`. Nothing is written if parsing fails.
    #[instrument(level = "debug", skip(self))]
    pub fn convert(&self, input: &Path, output: &Path) -> ApplicationResult<ConversionSummary> {
        let processes = self.read_processes(input)?;
        let document = self.render(&processes)?;

        self.fs
            .ensure_parent(output)
            .with_path_context("create output directory", output)?;
        self.fs
            .write(output, &document)
            .with_path_context("write document", output)?;

        let summary = ConversionSummary::new(&processes, Some(output.to_path_buf()));
        info!(
            "converted {} processes ({} rows) to {}",
            summary.processes,
            summary.rows,
            output.display()
        );
        Ok(summary)
    }
}

/// C-style `%10.6E`: six decimals, signed exponent of at least two digits.
pub fn format_scientific(value: f64) -> String {
    let formatted = format!("{:.6E}", value);
    match formatted.split_once('E') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{:>10}", format!("{}E{}{:02}", mantissa, sign, exponent.abs()))
        }
        None => format!("{:>10}", formatted),
    }
}

/// Two columns per row, each number followed by a space, one row per line.
pub fn format_data_table(data: &[DataPoint]) -> String {
    let mut table = String::with_capacity(data.len() * 28);
    for point in data {
        table.push_str(&format_scientific(point.energy));
        table.push(' ');
        table.push_str(&format_scientific(point.value));
        table.push_str(" \n");
    }
    table
}
