//! 📊 progress.rs: "Are we there yet?" asked by every load run, forever.
//!
//! 🚀 This module answers the age-old question: "how hard are we hitting the stream?"
//! With cold hard numbers, a progress bar, and a table so comfy it has lumbar support.
//!
//! ⚠️  Warning: Watching this progress bar will not make the shards go faster.
//! Neither will resharding mid-run. We've tried. AWS billing says no.
//!
//! 🦆 The duck has nothing to do with this module. It's just vibing.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::NOTHING};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::reporter::LoadSnapshot;

// -- 📏 one mebibyte. not a megabyte. the stream service bills in these, so do we.
const MIB: f64 = 1024.0 * 1024.0;

/// 🔢 Formats a number with commas for the 3 people in the audience who like readability.
/// "1000000 records" → "1,000,000 records". You're welcome, eyes.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// ⏱️ Formats a Duration into MM:SS or HH:MM:SS.
/// If it shows HH:MM:SS, that is a soak test, and you should probably call your mom.
fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

fn format_latency(duration: Duration) -> String {
    format!("{:.1} ms", duration.as_secs_f64() * 1_000.0)
}

/// 📡 Throughput at one moment. A speedometer for records.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rates {
    records_per_sec: f64,
    mib_per_sec: f64,
}

/// 📊 The brains behind the live display. Tracks totals, rates, and your sanity.
///
/// Uses a sliding 5-second window for rates so one slow batch doesn't scare you.
pub(crate) struct LoadProgress {
    /// 🏷️ which stream is taking the beating
    stream_name: String,
    /// 🎯 records the run plans to send, when that is known up front
    planned_records: Option<u64>,
    latest: LoadSnapshot,
    progress_bar: ProgressBar,
    /// 🔄 sliding window of (timestamp, records, bytes)
    rate_samples: VecDeque<(Instant, u64, u64)>,
    start_time: Instant,
}

impl std::fmt::Debug for LoadProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // -- 🎭 custom Debug impl because ProgressBar is a diva and doesn't derive Debug
        f.debug_struct("LoadProgress")
            .field("stream_name", &self.stream_name)
            .field("planned_records", &self.planned_records)
            .field("latest", &self.latest)
            .finish()
    }
}

impl LoadProgress {
    pub(crate) fn new(stream_name: String, planned_records: Option<u64>) -> Self {
        // -- 🎨 cyan because it's classy, blue because it's calm
        let progress_bar = ProgressBar::new(planned_records.unwrap_or(0));
        match ProgressStyle::default_bar().template("{msg}\n| [{bar:40.cyan/blue}]") {
            Ok(style) => progress_bar.set_style(style.progress_chars("=>-")),
            Err(err) => warn!("🎨 progress template rejected, keeping the default look: {}", err),
        }

        let start_time = Instant::now();
        let mut rate_samples = VecDeque::new();
        rate_samples.push_back((start_time, 0u64, 0u64));

        Self {
            stream_name,
            planned_records,
            latest: LoadSnapshot::default(),
            progress_bar,
            rate_samples,
            start_time,
        }
    }

    /// 🔄 Feed the display a fresh snapshot. Totals are absolute, not deltas.
    pub(crate) fn update(&mut self, snapshot: LoadSnapshot) {
        self.latest = snapshot;
        let rates = self.calculate_rates(Instant::now());
        self.render(rates);
        self.progress_bar.set_position(self.latest.records);
    }

    /// ✅ Ring the bell. We made it. (Or the clock ran out. Same energy.)
    pub(crate) fn finish(&self) {
        self.progress_bar.finish();
    }

    /// 📈 Rates over the last 5 seconds.
    fn calculate_rates(&mut self, now: Instant) -> Rates {
        let window = Duration::from_secs(5);
        while let Some(&(timestamp, _, _)) = self.rate_samples.front() {
            if now.duration_since(timestamp) > window {
                self.rate_samples.pop_front();
            } else {
                break;
            }
        }
        self.rate_samples.push_back((now, self.latest.records, self.latest.bytes));

        if let Some(&(oldest_time, oldest_records, oldest_bytes)) = self.rate_samples.front() {
            let elapsed = now.duration_since(oldest_time).as_secs_f64();
            if elapsed > 0.0 {
                let records_delta = self.latest.records.saturating_sub(oldest_records);
                let bytes_delta = self.latest.bytes.saturating_sub(oldest_bytes);
                return Rates {
                    records_per_sec: records_delta as f64 / elapsed,
                    mib_per_sec: (bytes_delta as f64 / elapsed) / MIB,
                };
            }
        }

        // -- 💤 not enough elapsed time yet: zeros, and composure
        Rates {
            records_per_sec: 0.0,
            mib_per_sec: 0.0,
        }
    }

    /// 🎨 Live view, hung off the progress bar as its message:
    /// ```text
    /// stream: <name>
    ///   <records/s>   <total records>
    ///   <MiB/s>       <ok / failed / cancelled>
    ///   <p50>         <p99>
    ///   <elapsed>     <percent done>
    /// | [=====>----------]
    /// ```
    fn render(&self, rates: Rates) {
        let snapshot = &self.latest;
        let percent = match self.planned_records {
            Some(planned) if planned > 0 => format!("{:.2}%", snapshot.records as f64 / planned as f64 * 100.0),
            _ => "--".to_string(),
        };

        let mut table = Table::new();
        table.load_preset(NOTHING);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.add_row(vec![
            Cell::new(format!("{} Records/s", format_number(rates.records_per_sec as u64)))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{} Records", format_number(snapshot.records))).set_alignment(CellAlignment::Right),
        ]);
        table.add_row(vec![
            Cell::new(format!("{:.2} MiB/s", rates.mib_per_sec)).set_alignment(CellAlignment::Right),
            Cell::new(format!(
                "{} ok / {} failed / {} cancelled",
                format_number(snapshot.succeeded),
                format_number(snapshot.failed),
                format_number(snapshot.cancelled)
            ))
            .set_alignment(CellAlignment::Right),
        ]);
        table.add_row(vec![
            Cell::new(format!("p50 {}", format_latency(snapshot.p50))).set_alignment(CellAlignment::Right),
            Cell::new(format!("p99 {}", format_latency(snapshot.p99))).set_alignment(CellAlignment::Right),
        ]);
        table.add_row(vec![
            Cell::new(format!("{} elapsed", format_duration(self.start_time.elapsed())))
                .set_alignment(CellAlignment::Right),
            Cell::new(percent).set_alignment(CellAlignment::Right),
        ]);

        self.progress_bar
            .set_message(format!("stream: {}\n{}", self.stream_name, table));
    }
}

/// 🧾 The end-of-run table. Printed once, screenshotted forever.
pub(crate) fn summary_table(snapshot: &LoadSnapshot, elapsed: Duration) -> Table {
    let secs = elapsed.as_secs_f64();
    let per_sec = |n: u64| if secs > 0.0 { n as f64 / secs } else { 0.0 };

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["metric", "value"]);
    let rows: Vec<(&str, String)> = vec![
        ("submissions", format_number(snapshot.submissions)),
        ("raised errors", format_number(snapshot.errors)),
        ("records", format_number(snapshot.records)),
        ("succeeded", format_number(snapshot.succeeded)),
        ("failed", format_number(snapshot.failed)),
        ("cancelled", format_number(snapshot.cancelled)),
        ("attempts", format_number(snapshot.attempts)),
        ("records/s", format!("{:.1}", per_sec(snapshot.records))),
        ("MiB/s", format!("{:.2}", per_sec(snapshot.bytes) / MIB)),
        ("latency p50", format_latency(snapshot.p50)),
        ("latency p95", format_latency(snapshot.p95)),
        ("latency p99", format_latency(snapshot.p99)),
        ("latency max", format_latency(snapshot.max)),
        ("elapsed", format_duration(elapsed)),
    ];
    for (metric, value) in rows {
        table.add_row(vec![Cell::new(metric), Cell::new(value).set_alignment(CellAlignment::Right)]);
    }
    table
}
