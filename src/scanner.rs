//! Scanner module - walks the tree and fans assets out to probe workers

use chrono::Local;
use std::sync::mpsc;
use std::time::Instant;
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::dispatch::{media_types, process_asset};
use crate::error::{ScanError, ScanErrorKind};
use crate::models::{AssetReport, ScanReport};
use crate::probe::VideoProbe;

/// Directory and entry counts gathered by the walk
#[derive(Debug, Default)]
struct WalkStats {
    total_dirs: u64,
    total_files: u64,
}

/// Scan `config.root`, probing every recognized asset.
///
/// The walk runs depth-first in file-name order inside a pool of
/// `effective_threads()` workers, which probe assets as they are found.
/// This returns only after every dispatched asset has been classified. A walk
/// error aborts the scan; assets already dispatched still finish first.
pub fn scan(config: &ScanConfig, video_probe: &dyn VideoProbe) -> Result<ScanReport, ScanError> {
    let start = Instant::now();
    let started_at = Local::now();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.effective_threads())
        .thread_name(|i| format!("probe-{}", i))
        .build()
        .map_err(|e| ScanError::new(ScanErrorKind::ThreadPool, None, e.to_string()))?;

    log::debug!(
        "Scanning {} with {} workers ({} video probe)",
        config.root.display(),
        pool.current_num_threads(),
        video_probe.name()
    );

    let (tx, rx) = mpsc::channel::<AssetReport>();

    // Scope exit is the join barrier
    let walked = pool.scope(|scope| -> Result<WalkStats, ScanError> {
        let mut stats = WalkStats::default();
        let walker = WalkDir::new(&config.root)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            let is_dir = entry.file_type().is_dir();
            if is_dir {
                stats.total_dirs += 1;
            } else {
                stats.total_files += 1;
            }

            for media_type in media_types(entry.path(), is_dir) {
                let tx = tx.clone();
                let path = entry.path().to_path_buf();
                scope.spawn(move |_| {
                    let report = process_asset(&path, media_type, video_probe);
                    // Receiver outlives the scope
                    let _ = tx.send(report);
                });
            }
        }
        Ok(stats)
    });
    drop(tx);

    let assets: Vec<AssetReport> = rx.into_iter().collect();
    let stats = walked?;

    Ok(ScanReport {
        root: config.root.clone(),
        started_at,
        total_dirs: stats.total_dirs,
        total_files: stats.total_files,
        assets,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
