use colored::{ColoredString, Colorize};

use crate::client::ImageLocationResolver;
use crate::i18n::{self, Language};
use crate::session::ResultSet;
use crate::state::SearchMetrics;

const FILENAME_W: usize = 32;

fn score_color(score: f64) -> ColoredString {
    let text = format!("{:.3}", score);
    if score >= 0.4 {
        text.green()
    } else if score >= 0.25 {
        text.yellow()
    } else {
        text.normal()
    }
}

fn truncate(name: &str) -> String {
    if name.chars().count() <= FILENAME_W {
        return name.to_string();
    }
    let head: String = name.chars().take(FILENAME_W - 1).collect();
    format!("{}\u{2026}", head)
}

pub fn render_metrics(metrics: &SearchMetrics, locale: Language) -> String {
    format!(
        "{}\n  {}: {}  {}: {}  {}: {}  {}: {}",
        i18n::ts(locale, "metrics_title").bold(),
        i18n::ts(locale, "metrics_time"),
        metrics.timing_label(),
        i18n::ts(locale, "metrics_top1"),
        metrics.top1_label(),
        i18n::ts(locale, "metrics_avg"),
        metrics.average_label(),
        i18n::ts(locale, "metrics_count"),
        metrics.count,
    )
}

/// Metrics, enhanced queries (when asked for and returned), then one row per
/// result in backend order.
pub fn render(set: &ResultSet, images: &ImageLocationResolver, locale: Language) -> String {
    let response = &set.response;
    let mut out = render_metrics(&response.metrics(), locale);
    out.push('\n');

    if set.request.use_enhancement {
        if let Some(line) = response.enhanced_line() {
            out.push_str(&format!(
                "{}: {}\n",
                i18n::ts(locale, "enhanced_title").bold(),
                line.italic()
            ));
        }
    }

    if response.results.is_empty() {
        return out.trim_end().to_string();
    }

    out.push_str(&format!(
        "\n{}\n",
        i18n::t(locale, "results_top", &[("count", &response.results.len().to_string())]).bold()
    ));
    out.push_str(&format!(
        "  {:>4}  {:<w$}  {:>8}  {:>10}  {:>7}\n",
        i18n::ts(locale, "results_rank").dimmed(),
        i18n::ts(locale, "results_filename").dimmed(),
        i18n::ts(locale, "results_score").dimmed(),
        i18n::ts(locale, "results_confidence").dimmed(),
        i18n::ts(locale, "results_matches").dimmed(),
        w = FILENAME_W,
    ));
    for result in &response.results {
        out.push_str(&format!(
            "  {:>4}  {:<w$}  {:>8}  {:>10}  {:>7}\n",
            format!("#{}", result.rank).cyan(),
            truncate(&result.filename),
            score_color(result.similarity_score),
            result.confidence_percentage,
            result.num_query_matches,
            w = FILENAME_W,
        ));
        out.push_str(&format!("        {}\n", images.resolve(result).dimmed()));
    }
    out.trim_end().to_string()
}
