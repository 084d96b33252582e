use std::fmt::Write;
use std::time::Duration;

use lumen_pipeline::ClassificationReport;

fn millis(value: Duration) -> f64 {
    value.as_secs_f64() * 1_000.0
}

/// Plain-text rendering: latencies, ranked predictions, summary.
pub fn text(report: &ClassificationReport) -> String {
    let mut out = String::new();
    for (idx, latency) in report.latencies.iter().enumerate() {
        let _ = writeln!(out, "Run {}: {:.3} ms", idx + 1, millis(*latency));
    }
    let _ = writeln!(out, "Top {} Predictions:", report.predictions.len());
    for prediction in &report.labeled {
        match &prediction.label {
            Some(label) => {
                let _ = writeln!(
                    out,
                    "Class Index: {}, Score: {}, Label: {}",
                    prediction.index, prediction.score, label
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "Class Index: {}, Score: {}",
                    prediction.index, prediction.score
                );
            }
        }
    }
    let stats = &report.stats;
    let _ = writeln!(
        out,
        "Latency over {} runs: min {:.3} ms, max {:.3} ms, mean {:.3} ms, median {:.3} ms",
        report.latencies.len(),
        millis(stats.min),
        millis(stats.max),
        millis(stats.mean),
        millis(stats.median)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{LabeledPrediction, Prediction, PredictionList};
    use lumen_pipeline::LatencyStats;

    fn report(labels: [Option<&str>; 2]) -> ClassificationReport {
        let latencies = vec![Duration::from_millis(2), Duration::from_millis(4)];
        let predictions =
            PredictionList::from_ranked(vec![Prediction::new(7, 0.75), Prediction::new(2, 0.25)]);
        let labeled = predictions
            .iter()
            .zip(labels)
            .map(|(p, label)| LabeledPrediction {
                index: p.index,
                score: p.score,
                label: label.map(str::to_string),
            })
            .collect();
        ClassificationReport {
            input_name: "input".into(),
            output_name: "logits".into(),
            stats: LatencyStats::from_samples(&latencies).unwrap(),
            latencies,
            predictions,
            labeled,
        }
    }

    #[test]
    fn prints_predictions_in_rank_order() {
        let rendered = text(&report([None, None]));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Run 1: 2.000 ms");
        assert_eq!(lines[2], "Top 2 Predictions:");
        assert_eq!(lines[3], "Class Index: 7, Score: 0.75");
        assert_eq!(lines[4], "Class Index: 2, Score: 0.25");
        assert!(lines[5].contains("mean 3.000 ms"));
    }

    #[test]
    fn appends_labels_when_known() {
        let rendered = text(&report([Some("tabby"), None]));
        assert!(rendered.contains("Class Index: 7, Score: 0.75, Label: tabby\n"));
        assert!(rendered.contains("Class Index: 2, Score: 0.25\n"));
    }
}
