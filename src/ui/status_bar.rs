use colored::Colorize;

use crate::i18n::{self, Language};
use crate::state::{group_thousands, HealthStatus};

fn row(out: &mut String, label: String, value: Option<String>) {
    if let Some(value) = value {
        out.push_str(&format!("  {:<22} {}\n", label, value));
    }
}

/// System status panel. Fields the service did not report are left out.
pub fn render(health: &HealthStatus, api_base: &str, locale: Language) -> String {
    let mut out = format!("{}\n", i18n::ts(locale, "status_title").bold());

    if !health.is_operational() {
        out.push_str(&format!("  {}\n", i18n::ts(locale, "status_unreachable").red()));
        out.push_str(&format!(
            "  {}",
            i18n::t(locale, "status_unreachable_hint", &[("base", api_base)]).dimmed()
        ));
        return out;
    }

    out.push_str(&format!("  {}\n", i18n::ts(locale, "status_operational").green()));
    row(&mut out, i18n::ts(locale, "status_model"), health.model.clone());
    row(
        &mut out,
        i18n::ts(locale, "status_embedding_dim"),
        health.embedding_dim.map(|d| d.to_string()),
    );
    row(
        &mut out,
        i18n::ts(locale, "status_vectors"),
        health.vectors_indexed.map(group_thousands),
    );
    row(
        &mut out,
        i18n::ts(locale, "status_total_images"),
        health.total_images.map(group_thousands),
    );
    row(&mut out, i18n::ts(locale, "status_index_type"), health.index_type.clone());
    row(
        &mut out,
        i18n::ts(locale, "status_device"),
        health.device.as_ref().map(|d| d.to_uppercase()),
    );
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operational_panel() {
        colored::control::set_override(false);
        let health = HealthStatus {
            status: Some("healthy".into()),
            model: Some("ViT-B/32".into()),
            embedding_dim: Some(512),
            vectors_indexed: Some(25000),
            total_images: Some(1234567),
            index_type: Some("IndexFlatIP".into()),
            device: Some("cuda".into()),
        };
        let text = render(&health, "http://localhost:8000", Language::En);
        assert!(text.contains("System operational"));
        assert!(text.contains("25,000"));
        assert!(text.contains("1,234,567"));
        assert!(text.contains("CUDA"));
        assert!(!text.contains("Cannot connect"));
    }

    #[test]
    fn test_partial_panel_skips_missing_fields() {
        colored::control::set_override(false);
        let health = HealthStatus {
            model: Some("m".into()),
            ..Default::default()
        };
        let text = render(&health, "http://x", Language::En);
        assert!(text.contains("Model"));
        assert!(!text.contains("Device"));
    }

    #[test]
    fn test_unreachable_panel() {
        colored::control::set_override(false);
        let text = render(&HealthStatus::default(), "http://gpu-box:8000", Language::En);
        assert!(text.contains("Cannot connect to API"));
        assert!(text.contains("http://gpu-box:8000"));
    }
}
