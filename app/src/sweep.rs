use std::path::Path;

use common::{config::Settings, util::ProcessRunner};
use eyre::{Context, Result};
use fio::{AccessPattern, MeasurementConfig};
use fio_latency::{LatencySeries, PlotSpec, SeriesSlot};
use indicatif::ProgressBar;
use tracing::info;

/// Run order within one queue depth
const PATTERNS: [AccessPattern; 2] = [AccessPattern::RandomWrite, AccessPattern::RandomRead];

/// The curve a run's sample is drawn on.
///
/// Write runs land on the "randread" curve and read runs on "randwrite".
/// Existing plots were produced with this pairing; swap the arms to label
/// curves by the pattern that produced them.
pub fn series_slot(pattern: AccessPattern) -> SeriesSlot {
    match pattern {
        AccessPattern::RandomWrite => SeriesSlot::Randread,
        AccessPattern::RandomRead => SeriesSlot::Randwrite,
    }
}

#[derive(Debug, Default)]
struct Curves {
    randread: LatencySeries,
    randwrite: LatencySeries,
}

impl Curves {
    fn get_mut(&mut self, slot: SeriesSlot) -> &mut LatencySeries {
        match slot {
            SeriesSlot::Randread => &mut self.randread,
            SeriesSlot::Randwrite => &mut self.randwrite,
        }
    }
}

/// Runs fio for every queue depth in `settings`, write then read, one run at
/// a time. The first failed run aborts the sweep.
pub async fn run_sweep(
    runner: &dyn ProcessRunner,
    settings: &Settings,
    test_name: &str,
    target_path: &str,
    output: &Path,
    progress: &ProgressBar,
) -> Result<PlotSpec> {
    let mut curves = Curves::default();

    for (idx, depth) in settings.io_depths.iter().copied().enumerate() {
        for pattern in PATTERNS {
            progress.set_message(format!("{pattern} iodepth={depth}"));
            let config = MeasurementConfig::new(test_name, target_path, pattern, depth);
            let sample = config
                .run_and_extract(runner, &settings.fio)
                .await
                .context(format!("Sweep aborted at {pattern} iodepth={depth}"))?;
            let slot = series_slot(pattern);
            info!("{pattern} iodepth={depth} mean_lat_ns={sample} -> {slot}");
            curves.get_mut(slot).push(sample);
            progress.inc(1);
        }
        debug_assert_eq!(curves.randread.len(), idx + 1);
        debug_assert_eq!(curves.randwrite.len(), idx + 1);
    }
    progress.finish_and_clear();

    PlotSpec::new(
        settings.io_depths.clone(),
        curves.randread,
        curves.randwrite,
        output,
    )
}
