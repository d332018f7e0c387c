//! Run-time ABI report.
//!
//! Runs the value-level deduction over a grid of element kinds and lane
//! counts and renders the result as a table. Used by the `simdabi` binary to
//! show what the generated table looks like on the build target, or what it
//! would look like on another feature set.

use std::fmt;

use tracing::{debug, info_span, warn};

use crate::error::AbiError;
use crate::simd::deduce::{deduce_abi, AbiConfig, AbiTag};
use crate::simd::element::ElementKind;

/// Lane counts reported when none are given.
pub const DEFAULT_LANES: [usize; 10] = [1, 2, 3, 4, 7, 8, 16, 32, 63, 64];

/// One `(kind, lanes)` deduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub kind: ElementKind,
    pub lanes: usize,
    pub result: Result<AbiTag, AbiError>,
}

/// Deductions for a grid of element kinds and lane counts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbiReport {
    pub config: AbiConfig,
    pub rows: Vec<ReportRow>,
}

impl AbiReport {
    /// Deduces every pair of `kinds` and `lanes`, kinds outermost.
    pub fn build(config: AbiConfig, kinds: &[ElementKind], lanes: &[usize]) -> Self {
        let _span = info_span!("abi_report", features = %config.features).entered();

        let rows = kinds
            .iter()
            .flat_map(|&kind| lanes.iter().map(move |&lanes| (kind, lanes)))
            .map(|(kind, lanes)| {
                let result = deduce_abi(kind, lanes, &config);
                match &result {
                    Ok(tag) => debug!(%kind, lanes, abi = %tag, "deduced"),
                    Err(error) => warn!(%kind, lanes, %error, "rejected"),
                }
                ReportRow {
                    kind,
                    lanes,
                    result,
                }
            })
            .collect();

        Self { config, rows }
    }

    /// Report for the build target over every vectorizable kind.
    pub fn for_build(lanes: &[usize]) -> Self {
        Self::build(AbiConfig::BUILD, &ElementKind::ALL, lanes)
    }

    /// Rows whose deduction failed.
    pub fn errors(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|row| row.result.is_err())
    }
}

impl fmt::Display for AbiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "features: {} (zero-width {})",
            self.config.features,
            if self.config.zero_width { "on" } else { "off" }
        )?;
        writeln!(
            f,
            "{:<6} {:>5} {:>8} {:>6} {:>6}  abi",
            "type", "lanes", "capacity", "bytes", "mask"
        )?;
        for row in &self.rows {
            match &row.result {
                Ok(tag) => writeln!(
                    f,
                    "{:<6} {:>5} {:>8} {:>6} {:>6}  {tag}",
                    row.kind.name(),
                    row.lanes,
                    tag.capacity(),
                    tag.storage_bytes(row.kind),
                    tag.mask_bytes(row.kind),
                )?,
                Err(error) => writeln!(
                    f,
                    "{:<6} {:>5} {:>8} {:>6} {:>6}  error: {error}",
                    row.kind.name(),
                    row.lanes,
                    "-",
                    "-",
                    "-",
                )?,
            }
        }
        Ok(())
    }
}
