use std::{
    fmt::{self, Write},
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use common::config::PlotSettings;
use eyre::{Result, bail};
use fio::LatencySample;
use itertools::Itertools;

/// The two curves drawn on the latency plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesSlot {
    Randread,
    Randwrite,
}

impl SeriesSlot {
    pub fn label(&self) -> &'static str {
        match self {
            SeriesSlot::Randread => "randread",
            SeriesSlot::Randwrite => "randwrite",
        }
    }
}

impl fmt::Display for SeriesSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Samples in queue-depth order, one per depth
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatencySeries(Vec<LatencySample>);

impl LatencySeries {
    pub fn push(&mut self, sample: LatencySample) {
        self.0.push(sample);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn samples(&self) -> &[LatencySample] {
        &self.0
    }
}

impl From<Vec<LatencySample>> for LatencySeries {
    fn from(samples: Vec<LatencySample>) -> Self {
        Self(samples)
    }
}

/// Everything needed to draw latency against queue depth
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    io_depths: Vec<NonZeroU32>,
    randread: LatencySeries,
    randwrite: LatencySeries,
    output: PathBuf,
}

impl PlotSpec {
    /// Both series must hold exactly one sample per depth
    pub fn new(
        io_depths: Vec<NonZeroU32>,
        randread: LatencySeries,
        randwrite: LatencySeries,
        output: impl Into<PathBuf>,
    ) -> Result<Self> {
        for (slot, series) in [
            (SeriesSlot::Randread, &randread),
            (SeriesSlot::Randwrite, &randwrite),
        ] {
            if series.len() != io_depths.len() {
                bail!(
                    "{slot} series has {} samples for {} io depths",
                    series.len(),
                    io_depths.len()
                );
            }
        }
        Ok(Self {
            io_depths,
            randread,
            randwrite,
            output: output.into(),
        })
    }

    pub fn io_depths(&self) -> &[NonZeroU32] {
        &self.io_depths
    }

    pub fn series(&self, slot: SeriesSlot) -> &LatencySeries {
        match slot {
            SeriesSlot::Randread => &self.randread,
            SeriesSlot::Randwrite => &self.randwrite,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Renders a self-contained gnuplot script drawing both series as lines,
    /// with the data inlined after the `plot` command.
    pub fn build_script(&self, style: &PlotSettings) -> String {
        let slots = [SeriesSlot::Randread, SeriesSlot::Randwrite];
        let mut script = String::new();
        _ = writeln!(
            script,
            "set terminal pngcairo size {},{} enhanced font '{}'",
            style.width,
            style.height,
            quote(&style.font)
        );
        _ = writeln!(
            script,
            "set output '{}'",
            quote(&self.output.display().to_string())
        );
        script.push_str("set title \"Latency vs I/O Depth\"\n");
        script.push_str("set xlabel \"I/O Depth\"\n");
        script.push_str("set ylabel \"Latency (ns)\"\n");
        script.push_str("set grid\n");
        _ = writeln!(
            script,
            "plot {}",
            slots
                .iter()
                .map(|slot| format!("'-' with lines title '{}'", slot.label()))
                .join(", ")
        );

        for slot in slots {
            for (depth, sample) in self.io_depths.iter().zip(self.series(slot).samples()) {
                _ = writeln!(script, "{depth} {sample}");
            }
            script.push_str("e\n");
        }
        script
    }
}

/// Escapes a value for a single-quoted gnuplot string
fn quote(value: &str) -> String {
    value.replace('\'', "''")
}
