use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for pipeline orchestration events.
///
/// Decouples use cases from specific output mechanisms (stdout, log crate)
/// so each caller can observe pipeline behavior without changing the
/// orchestration code.
pub trait PipelineLogger {
    /// Report chunk-level recognition progress.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named pipeline stage took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. audio seconds, segment count).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable milestone.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
///
/// Used by library callers and by tests where logger output is irrelevant.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI-oriented logger that forwards milestones to the `log` crate, tracks
/// stage timings and metrics, and reports a summary when the run ends.
///
/// Progress output is throttled to every `throttle_chunks` chunks.
pub struct StdoutPipelineLogger {
    throttle_chunks: usize,
    timings: HashMap<String, f64>,
    metrics: HashMap<String, f64>,
    start_time: Instant,
    total_chunks: usize,
    messages: Vec<String>,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_chunks: usize) -> Self {
        Self {
            throttle_chunks: throttle_chunks.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            total_chunks: 0,
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Pipeline summary ({} chunks, {:.1}s total):",
            self.total_chunks,
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.iter().collect();
        stages.sort_by(|a, b| a.0.cmp(b.0));
        for (stage, total_ms) in stages {
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!("  {stage:12}: {total_ms:8.0}ms  ({pct:4.1}%)"));
        }

        let mut metrics: Vec<_> = self.metrics.iter().collect();
        metrics.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in metrics {
            lines.push(format!("  {name}: {value:.1}"));
        }

        if let (Some(audio_secs), Some(transcribe_ms)) =
            (self.metrics.get("audio_secs"), self.timings.get("transcribe"))
        {
            if *transcribe_ms > 0.0 {
                let factor = audio_secs / (transcribe_ms / 1000.0);
                lines.push(format!("  Speed: {factor:.1}x realtime"));
            }
        }

        Some(lines.join("\n"))
    }

    /// Returns the accumulated time for a given stage.
    pub fn timing_for(&self, stage: &str) -> Option<f64> {
        self.timings.get(stage).copied()
    }

    /// Returns the latest value recorded for a metric.
    pub fn metric_for(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(25)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_chunks = total;
        if total > 0 && (current % self.throttle_chunks == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Transcribing: {current}/{total} chunks ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        *self.timings.entry(stage.to_string()).or_default() += duration_ms;
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.insert(name.to_string(), value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- NullPipelineLogger tests ---

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.timing("convert", 5.0);
        logger.metric("segments", 3.0);
        logger.info("hello");
        logger.summary();
    }

    // --- StdoutPipelineLogger tests ---

    #[test]
    fn test_timing_accumulates_per_stage() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.timing("convert", 20.0);
        logger.timing("convert", 30.0);
        logger.timing("transcribe", 5.0);

        assert_eq!(logger.timing_for("convert"), Some(50.0));
        assert_eq!(logger.timing_for("transcribe"), Some(5.0));
        assert_eq!(logger.timing_for("cleanup"), None);
    }

    #[test]
    fn test_metric_keeps_latest_value() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.metric("segments", 3.0);
        logger.metric("segments", 4.0);
        assert_eq!(logger.metric_for("segments"), Some(4.0));
    }

    #[test]
    fn test_summary_includes_stages_and_metrics() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.progress(12, 12);
        logger.timing("convert", 20.0);
        logger.timing("transcribe", 30.0);
        logger.metric("segments", 2.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Pipeline summary (12 chunks"));
        assert!(summary.contains("convert"));
        assert!(summary.contains("transcribe"));
        assert!(summary.contains("segments: 2.0"));
    }

    #[test]
    fn test_summary_includes_realtime_factor() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.metric("audio_secs", 10.0);
        logger.timing("transcribe", 2000.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("5.0x realtime"), "got: {summary}");
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = StdoutPipelineLogger::new(10);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_total() {
        let mut logger = StdoutPipelineLogger::new(10);
        for i in 1..=20 {
            logger.progress(i, 20);
        }
        assert_eq!(logger.total_chunks, 20);
    }

    #[test]
    fn test_info_stores_messages() {
        let mut logger = StdoutPipelineLogger::new(10);
        logger.info("Conversion completed.");
        assert_eq!(logger.messages, vec!["Conversion completed.".to_string()]);
    }

    #[test]
    fn test_default_throttle() {
        let logger = StdoutPipelineLogger::default();
        assert_eq!(logger.throttle_chunks, 25);
    }
}
