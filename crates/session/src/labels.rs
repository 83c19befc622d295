use pathscope_core_types::{PathCounters, SnapshotModel};
use serde::Serialize;

/// Text of every aggregate readout, derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateLabels {
    pub original_kb: String,
    pub compressed_kb: String,
    pub compression_ratio: String,
    pub run: String,
    pub status: String,
    pub average_rtt: String,
    pub total_rtt: String,
    pub throughput: String,
    pub loss_rate: String,
    pub path_a: PathLabel,
    pub path_b: PathLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathLabel {
    pub text: String,
    /// Success rate in percent, for progress bars.
    pub success_percent: f64,
}

impl PathLabel {
    fn from_counters(counters: &PathCounters) -> Self {
        let rate = counters.success_rate().unwrap_or(0.0);
        Self {
            text: format!(
                "{}/{} packets ({:.1}%)",
                counters.success, counters.packets, rate
            ),
            success_percent: rate,
        }
    }
}

impl AggregateLabels {
    pub fn from_snapshot(snapshot: &SnapshotModel) -> Self {
        let compression = &snapshot.compression;
        let transmission = &snapshot.transmission;
        let performance = &snapshot.performance;
        Self {
            original_kb: kilobytes(compression.original_size),
            compressed_kb: kilobytes(compression.compressed_size),
            compression_ratio: format!("{:.1}%", compression.ratio_percent),
            run: format!("{}/{}", transmission.current_run, transmission.total_runs),
            status: transmission.status.as_str().to_string(),
            average_rtt: format!("{:.2} ms", performance.average_rtt),
            total_rtt: format!("{:.2} ms", performance.total_rtt),
            throughput: format!("{:.2} KB/s", performance.average_throughput),
            loss_rate: format!("{:.1}%", performance.average_packet_loss_rate),
            path_a: PathLabel::from_counters(&snapshot.paths.a),
            path_b: PathLabel::from_counters(&snapshot.paths.b),
        }
    }
}

fn kilobytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_readouts() {
        let snapshot = SnapshotModel::from_json(json!({
            "compression": {"original_size": 2048, "compressed_size": 512, "ratio": 75.0},
            "transmission": {"current_run": 2, "total_runs": 5, "status": "running"},
            "performance": {
                "total_rtt": 12.345, "average_rtt": 6.1,
                "average_throughput": 100.0, "average_packet_loss_rate": 2.25
            },
            "paths": {"path1": {"packets": 8, "success": 6}, "path2": {"packets": 0, "success": 0}}
        }))
        .unwrap();
        let labels = AggregateLabels::from_snapshot(&snapshot);
        assert_eq!(labels.original_kb, "2.00");
        assert_eq!(labels.compressed_kb, "0.50");
        assert_eq!(labels.compression_ratio, "75.0%");
        assert_eq!(labels.run, "2/5");
        assert_eq!(labels.average_rtt, "6.10 ms");
        assert_eq!(labels.throughput, "100.00 KB/s");
        assert_eq!(labels.path_a.text, "6/8 packets (75.0%)");
        assert_eq!(labels.path_b.text, "0/0 packets (0.0%)");
        assert_eq!(labels.path_b.success_percent, 0.0);
    }
}
