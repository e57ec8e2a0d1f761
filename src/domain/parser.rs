//! BOLSIG+ cross-section file parser.
//!
//! The input is scanned line by line for one of the six keyword headers
//! (`MOMENTUM`, `ELASTIC`, `EFFECTIVE`, `EXCITATION`, `IONIZATION`,
//! `ATTACHMENT`). Every other line outside a block is ignored. A header
//! starts a block:
//!
//! ```text
//! EXCITATION                 <- keyword, alone on its line
//! N2 -> N2(rot)              <- target line
//! 0.02                       <- argument line (absent for ATTACHMENT)
//! free text comment          <- comment lines ...
//! -----                      <- ... up to a separator (5+ dashes)
//! 0.0 1.0                    <- energy / cross-section rows ...
//! 1.0 0.5
//! -----                      <- ... up to the next separator
//! ```
//!
//! A missing target or argument line aborts the parse. A missing separator
//! after the comment or data section is tolerated: the section then runs to
//! the end of the input.

use regex::Regex;
use tracing::{debug, info, instrument};

use crate::domain::entities::{DataPoint, MomentumKind, Process, ProcessDetail, ProcessKind};
use crate::domain::error::{DomainError, DomainResult};

/// Line-numbered cursor over the input. Line numbers are 1-based.
struct LineCursor<'a> {
    lines: std::str::Lines<'a>,
    consumed: usize,
}

impl<'a> LineCursor<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines(),
            consumed: 0,
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let line = self.lines.next()?;
        self.consumed += 1;
        Some((self.consumed, line))
    }

    /// Next line, trimmed; end of input is fatal here.
    fn expect_line(&mut self, expected: &'static str) -> DomainResult<(usize, &'a str)> {
        self.next_line()
            .map(|(number, line)| (number, line.trim()))
            .ok_or(DomainError::UnexpectedEndOfInput {
                line: self.consumed + 1,
                expected,
            })
    }
}

/// Raw content of one block before kind-specific interpretation.
struct Block<'a> {
    target: (usize, &'a str),
    argument: Option<(usize, &'a str)>,
    comment: String,
    data: Vec<DataPoint>,
}

/// Keyword-dispatch parser for BOLSIG+ cross-section files.
pub struct CrossSectionParser {
    separator_regex: Regex,
    arrow_regex: Regex,
}

impl Default for CrossSectionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CrossSectionParser {
    pub fn new() -> Self {
        Self {
            separator_regex: Regex::new(r"^-{5,}$").expect("separator pattern is valid"),
            arrow_regex: Regex::new(r"<?->").expect("arrow pattern is valid"),
        }
    }

    /// Parse a complete cross-section file.
    ///
    /// Returns one [`Process`] per keyword header, in file order. The first
    /// malformed block aborts the whole parse.
    #[instrument(level = "debug", skip_all)]
    pub fn parse(&self, content: &str) -> DomainResult<Vec<Process>> {
        let mut cursor = LineCursor::new(content);
        let mut processes = Vec::new();

        while let Some((number, line)) = cursor.next_line() {
            let Some(kind) = ProcessKind::from_keyword(line.trim()) else {
                continue;
            };
            debug!("line {}: new process of type '{}'", number, kind);
            let process = self.read_process(kind, &mut cursor)?;
            processes.push(process);
        }

        info!("Parsing complete. {} processes read.", processes.len());
        Ok(processes)
    }

    /// Separator test on an untrimmed line: five or more dashes and nothing else.
    pub fn is_separator(&self, line: &str) -> bool {
        self.separator_regex.is_match(line.trim())
    }

    /// Split a target line on `->` / `<->`, trimming each side.
    pub fn split_arrow<'a>(&self, target: &'a str) -> Vec<&'a str> {
        self.arrow_regex.split(target).map(str::trim).collect()
    }

    fn read_process(&self, kind: ProcessKind, cursor: &mut LineCursor<'_>) -> DomainResult<Process> {
        let block = self.read_block(cursor, kind.has_argument_line())?;
        match kind {
            ProcessKind::Momentum => self.read_momentum(block, MomentumKind::Momentum),
            ProcessKind::Elastic => self.read_momentum(block, MomentumKind::Elastic),
            ProcessKind::Effective => self.read_momentum(block, MomentumKind::Effective),
            ProcessKind::Excitation | ProcessKind::Ionization => self.read_excitation(block, kind),
            ProcessKind::Attachment => Ok(self.read_attachment(block)),
        }
    }

    fn read_block<'a>(&self, cursor: &mut LineCursor<'a>, has_argument: bool) -> DomainResult<Block<'a>> {
        let target = cursor.expect_line("target line")?;
        let argument = if has_argument {
            Some(cursor.expect_line("argument line")?)
        } else {
            None
        };

        let comment = self
            .read_until_separator(cursor)
            .into_iter()
            .map(|(_, line)| line)
            .collect::<Vec<_>>()
            .join("\n");

        debug!("line {}: read process '{}'", target.0, target.1);
        let data = self
            .read_until_separator(cursor)
            .into_iter()
            .filter_map(|(number, line)| {
                // `#` starts a comment running to the end of the line
                let line = line.split('#').next().unwrap_or_default().trim();
                (!line.is_empty()).then(|| parse_data_row(number, line))
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Block {
            target,
            argument,
            comment,
            data,
        })
    }

    /// Trimmed lines up to (not including) the next separator or end of input.
    fn read_until_separator<'a>(&self, cursor: &mut LineCursor<'a>) -> Vec<(usize, &'a str)> {
        let mut lines = Vec::new();
        while let Some((number, line)) = cursor.next_line() {
            if self.is_separator(line) {
                break;
            }
            lines.push((number, line.trim()));
        }
        lines
    }

    fn read_momentum(&self, block: Block<'_>, kind: MomentumKind) -> DomainResult<Process> {
        let mass_ratio = argument_value(&block, 0)?;
        Ok(Process {
            target: block.target.1.to_string(),
            comment: block.comment,
            data: block.data,
            detail: ProcessDetail::MomentumTransfer { kind, mass_ratio },
        })
    }

    fn read_excitation(&self, block: Block<'_>, kind: ProcessKind) -> DomainResult<Process> {
        let (number, line) = block.target;
        let sides = self.split_arrow(line);
        let [lhs, rhs] = sides.as_slice() else {
            return Err(DomainError::MalformedTarget {
                line: number,
                content: line.to_string(),
            });
        };
        let (target, product) = (lhs.to_string(), rhs.to_string());

        let threshold = argument_value(&block, 0)?;
        let reversible = line.split_whitespace().any(|token| token == "<->");
        let weight_ratio = if reversible {
            Some(argument_value(&block, 1)?)
        } else {
            None
        };
        let detail = if kind == ProcessKind::Ionization {
            ProcessDetail::Ionization {
                product,
                threshold,
                weight_ratio,
            }
        } else {
            ProcessDetail::Excitation {
                product,
                threshold,
                weight_ratio,
            }
        };

        Ok(Process {
            target,
            comment: block.comment,
            data: block.data,
            detail,
        })
    }

    fn read_attachment(&self, block: Block<'_>) -> Process {
        let line = block.target.1;
        let (target, product) = match self.split_arrow(line).as_slice() {
            [lhs, rhs] => (lhs.to_string(), Some(rhs.to_string())),
            _ => (line.to_string(), None),
        };
        Process {
            target,
            comment: block.comment,
            data: block.data,
            detail: ProcessDetail::Attachment { product },
        }
    }
}

/// Parse one file with a fresh [`CrossSectionParser`].
pub fn parse(content: &str) -> DomainResult<Vec<Process>> {
    CrossSectionParser::new().parse(content)
}

/// `index`-th whitespace token of the argument line as a finite float.
fn argument_value(block: &Block<'_>, index: usize) -> DomainResult<f64> {
    let Some((number, line)) = block.argument else {
        return Err(DomainError::UnexpectedEndOfInput {
            line: block.target.0 + 1,
            expected: "argument line",
        });
    };
    let malformed = |reason: String| DomainError::MalformedArgument {
        line: number,
        content: line.to_string(),
        reason,
    };

    let token = line
        .split_whitespace()
        .nth(index)
        .ok_or_else(|| malformed(format!("missing value #{}", index + 1)))?;
    parse_finite(token).map_err(malformed)
}

fn parse_data_row(number: usize, line: &str) -> DomainResult<DataPoint> {
    let malformed = |reason: String| DomainError::MalformedNumericTable {
        line: number,
        content: line.to_string(),
        reason,
    };

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [energy, value] = tokens.as_slice() else {
        return Err(malformed(format!("expected 2 columns, found {}", tokens.len())));
    };
    let energy = parse_finite(energy).map_err(malformed)?;
    let value = parse_finite(value).map_err(malformed)?;
    Ok(DataPoint::new(energy, value))
}

fn parse_finite(token: &str) -> Result<f64, String> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(format!("non-finite number '{}'", token)),
        Err(_) => Err(format!("invalid number '{}'", token)),
    }
}
