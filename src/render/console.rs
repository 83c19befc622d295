use std::io::{self, Write};

use pathscope_chart::{point_labels, ChartOp, LaneProjection};
use pathscope_core_types::Lane;
use pathscope_session::{AggregateLabels, RenderOp, RenderSink, SinkError};
use pathscope_timeline::{TimelineEntry, TimelineOp};

use super::OutputFormat;

/// Writes render operations to a terminal or any other writer.
pub struct ConsoleSink<W: Write + Send> {
    out: W,
    format: OutputFormat,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_op(&mut self, op: &RenderOp) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, op)?;
                writeln!(self.out)
            }
            OutputFormat::Human => self.write_human(op),
        }
    }

    fn write_human(&mut self, op: &RenderOp) -> io::Result<()> {
        match op {
            RenderOp::Timeline(TimelineOp::Append { entry }) => {
                writeln!(self.out, "+ {}", describe_entry(entry))
            }
            RenderOp::Timeline(TimelineOp::Remove { lane, key }) => {
                writeln!(self.out, "- {:<6} {}", lane.title(), key)
            }
            RenderOp::Timeline(TimelineOp::Placeholder { visible: true }) => {
                writeln!(self.out, "  (no packets yet)")
            }
            RenderOp::Timeline(TimelineOp::Placeholder { visible: false }) => Ok(()),
            RenderOp::Chart(ChartOp::Construct { id, data }) => {
                writeln!(self.out, "~ {id} created  {}", summarize(data))
            }
            RenderOp::Chart(ChartOp::Patch { id, data }) => {
                writeln!(self.out, "~ {id} updated  {}", summarize(data))
            }
            RenderOp::Chart(ChartOp::Redraw { .. }) => Ok(()),
            RenderOp::Chart(ChartOp::Destroy { id }) => writeln!(self.out, "~ {id} closed"),
            RenderOp::Labels(labels) => self.write_labels(labels),
        }
    }

    fn write_labels(&mut self, labels: &AggregateLabels) -> io::Result<()> {
        writeln!(
            self.out,
            "= status {} | run {} | compression {} KB -> {} KB ({})",
            labels.status,
            labels.run,
            labels.original_kb,
            labels.compressed_kb,
            labels.compression_ratio
        )?;
        writeln!(
            self.out,
            "= rtt avg {} total {} | throughput {} | loss {}",
            labels.average_rtt, labels.total_rtt, labels.throughput, labels.loss_rate
        )?;
        writeln!(
            self.out,
            "= path A {} | path B {}",
            labels.path_a.text, labels.path_b.text
        )
    }
}

impl<W: Write + Send> RenderSink for ConsoleSink<W> {
    fn apply(&mut self, ops: &[RenderOp]) -> Result<(), SinkError> {
        for op in ops {
            self.write_op(op).map_err(|err| SinkError(err.to_string()))?;
        }
        self.out.flush().map_err(|err| SinkError(err.to_string()))
    }
}

fn describe_entry(entry: &TimelineEntry) -> String {
    let record = &entry.record;
    let size = record
        .size
        .map(|bytes| format!("{:.2}KB", bytes as f64 / 1024.0))
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "{:<6} {:<6} @{:>8.1}px  {:<6} {}",
        entry.lane.title(),
        entry.label,
        entry.offset_px,
        record.status.as_str(),
        size
    )
}

// Per-lane counts, then every point label in lane order.
fn summarize(data: &LaneProjection) -> String {
    let counts = Lane::ALL
        .iter()
        .map(|lane| format!("{}={}", lane.tag(), data.lane(*lane).len()))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{counts}  [{}]", point_labels(data).join(" "))
}
