use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Measured fields carried by a sample record
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Process CPU usage in percent
    CpuUsage,

    /// Resident memory in megabytes
    MemoryUsageMb,

    /// Cumulative count of messages sent
    MessagesSentCount,

    /// Cumulative count of messages received
    MessagesReceivedCount,

    /// Messages sent per second over the sampling window
    MessageSentThroughput,

    /// Messages received per second over the sampling window
    MessageReceivedThroughput,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::CpuUsage,
        Metric::MemoryUsageMb,
        Metric::MessagesSentCount,
        Metric::MessagesReceivedCount,
        Metric::MessageSentThroughput,
        Metric::MessageReceivedThroughput,
    ];

    /// The resource metrics every chart mode needs
    pub const RESOURCES: [Metric; 2] = [Metric::CpuUsage, Metric::MemoryUsageMb];

    /// The per-window message rates
    pub const THROUGHPUT: [Metric; 2] = [
        Metric::MessageSentThroughput,
        Metric::MessageReceivedThroughput,
    ];

    /// Field name as written in the sample files
    pub const fn field_name(&self) -> &'static str {
        match self {
            Metric::CpuUsage => "cpu_usage",
            Metric::MemoryUsageMb => "memory_usage_mb",
            Metric::MessagesSentCount => "messages_sent_count",
            Metric::MessagesReceivedCount => "messages_received_count",
            Metric::MessageSentThroughput => "message_sent_throughput",
            Metric::MessageReceivedThroughput => "message_received_throughput",
        }
    }

    /// Human-readable name used in chart titles and legends
    pub const fn label(&self) -> &'static str {
        match self {
            Metric::CpuUsage => "CPU Usage",
            Metric::MemoryUsageMb => "Memory Usage",
            Metric::MessagesSentCount => "Messages Sent",
            Metric::MessagesReceivedCount => "Messages Received",
            Metric::MessageSentThroughput => "Sent Throughput",
            Metric::MessageReceivedThroughput => "Received Throughput",
        }
    }

    pub const fn unit(&self) -> &'static str {
        match self {
            Metric::CpuUsage => "%",
            Metric::MemoryUsageMb => "MB",
            Metric::MessagesSentCount | Metric::MessagesReceivedCount => "msgs",
            Metric::MessageSentThroughput | Metric::MessageReceivedThroughput => "msg/s",
        }
    }

    /// Axis caption, e.g. "CPU Usage (%)"
    pub fn axis_label(&self) -> String {
        format!("{} ({})", self.label(), self.unit())
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.field_name() == s.trim())
            .ok_or_else(|| format!("Unknown metric: {}", s))
    }
}

/// Mean and maximum of a metric over one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanMax {
    pub mean: f64,
    pub max: f64,
}

/// Arithmetic mean and maximum of `values`
///
/// Returns `None` for an empty slice; callers decide what an empty input
/// means instead of receiving a fabricated zero.
pub fn mean_max(values: &[f64]) -> Option<MeanMax> {
    if values.is_empty() {
        return None;
    }

    let sum: f64 = values.iter().sum();
    let mean = sum / values.len() as f64;
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    Some(MeanMax { mean, max })
}
