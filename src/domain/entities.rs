//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

/// Keyword introducing a block in a BOLSIG+ cross-section file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessKind {
    Momentum,
    Elastic,
    Effective,
    Excitation,
    Ionization,
    Attachment,
}

impl ProcessKind {
    /// All recognized keywords, in the order BOLSIG+ documents them.
    pub const ALL: [ProcessKind; 6] = [
        ProcessKind::Momentum,
        ProcessKind::Elastic,
        ProcessKind::Effective,
        ProcessKind::Excitation,
        ProcessKind::Ionization,
        ProcessKind::Attachment,
    ];

    /// Exact, case-sensitive match of an already trimmed line.
    pub fn from_keyword(line: &str) -> Option<Self> {
        match line {
            "MOMENTUM" => Some(ProcessKind::Momentum),
            "ELASTIC" => Some(ProcessKind::Elastic),
            "EFFECTIVE" => Some(ProcessKind::Effective),
            "EXCITATION" => Some(ProcessKind::Excitation),
            "IONIZATION" => Some(ProcessKind::Ionization),
            "ATTACHMENT" => Some(ProcessKind::Attachment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessKind::Momentum => "MOMENTUM",
            ProcessKind::Elastic => "ELASTIC",
            ProcessKind::Effective => "EFFECTIVE",
            ProcessKind::Excitation => "EXCITATION",
            ProcessKind::Ionization => "IONIZATION",
            ProcessKind::Attachment => "ATTACHMENT",
        }
    }

    /// Whether the block carries an argument line after the target line.
    pub fn has_argument_line(&self) -> bool {
        !matches!(self, ProcessKind::Attachment)
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a string is not one of the six keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKeyword(pub String);

impl fmt::Display for UnknownKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown process keyword: {}", self.0)
    }
}

impl std::error::Error for UnknownKeyword {}

impl FromStr for ProcessKind {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProcessKind::from_keyword(s).ok_or_else(|| UnknownKeyword(s.to_string()))
    }
}

/// The momentum-transfer family shares one block layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumKind {
    Momentum,
    Elastic,
    Effective,
}

impl From<MomentumKind> for ProcessKind {
    fn from(kind: MomentumKind) -> Self {
        match kind {
            MomentumKind::Momentum => ProcessKind::Momentum,
            MomentumKind::Elastic => ProcessKind::Elastic,
            MomentumKind::Effective => ProcessKind::Effective,
        }
    }
}

/// One row of a cross-section table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    /// Electron energy (eV)
    pub energy: f64,
    /// Cross section (m²)
    pub value: f64,
}

impl DataPoint {
    pub fn new(energy: f64, value: f64) -> Self {
        Self { energy, value }
    }
}

impl From<(f64, f64)> for DataPoint {
    fn from((energy, value): (f64, f64)) -> Self {
        Self::new(energy, value)
    }
}

/// Kind-specific fields of a process.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessDetail {
    /// MOMENTUM, ELASTIC and EFFECTIVE blocks
    MomentumTransfer { kind: MomentumKind, mass_ratio: f64 },
    /// EXCITATION blocks; `weight_ratio` is set only for `<->` processes
    Excitation {
        product: String,
        threshold: f64,
        weight_ratio: Option<f64>,
    },
    /// IONIZATION blocks; `weight_ratio` is set only for `<->` processes
    Ionization {
        product: String,
        threshold: f64,
        weight_ratio: Option<f64>,
    },
    /// ATTACHMENT blocks; `product` is set only when the target line has an arrow
    Attachment { product: Option<String> },
}

/// One collision process read from a single keyword block.
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    /// Species or state the electron collides with
    pub target: String,
    /// Free text between the header lines and the data table
    pub comment: String,
    /// Cross-section table in file order
    pub data: Vec<DataPoint>,
    pub detail: ProcessDetail,
}

impl Process {
    pub fn kind(&self) -> ProcessKind {
        match &self.detail {
            ProcessDetail::MomentumTransfer { kind, .. } => (*kind).into(),
            ProcessDetail::Excitation { .. } => ProcessKind::Excitation,
            ProcessDetail::Ionization { .. } => ProcessKind::Ionization,
            ProcessDetail::Attachment { .. } => ProcessKind::Attachment,
        }
    }

    pub fn product(&self) -> Option<&str> {
        match &self.detail {
            ProcessDetail::Excitation { product, .. } | ProcessDetail::Ionization { product, .. } => {
                Some(product.as_str())
            }
            ProcessDetail::Attachment { product } => product.as_deref(),
            ProcessDetail::MomentumTransfer { .. } => None,
        }
    }

    /// Energy threshold; attachment is always 0.0.
    pub fn threshold(&self) -> Option<f64> {
        match &self.detail {
            ProcessDetail::Excitation { threshold, .. }
            | ProcessDetail::Ionization { threshold, .. } => Some(*threshold),
            ProcessDetail::Attachment { .. } => Some(0.0),
            ProcessDetail::MomentumTransfer { .. } => None,
        }
    }

    pub fn mass_ratio(&self) -> Option<f64> {
        match &self.detail {
            ProcessDetail::MomentumTransfer { mass_ratio, .. } => Some(*mass_ratio),
            _ => None,
        }
    }

    pub fn weight_ratio(&self) -> Option<f64> {
        match &self.detail {
            ProcessDetail::Excitation { weight_ratio, .. }
            | ProcessDetail::Ionization { weight_ratio, .. } => *weight_ratio,
            _ => None,
        }
    }

    /// Reversible excitation or ionization (`<->` in the target line).
    pub fn is_reversible(&self) -> bool {
        self.weight_ratio().is_some()
    }
}
