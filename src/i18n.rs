#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    En,
    Tr,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "tr" => Language::Tr,
            _ => Language::En,
        }
    }
}

fn get_string(lang: Language, key: &str) -> &'static str {
    match lang {
        Language::En => en(key),
        Language::Tr => {
            let val = tr(key);
            if val.is_empty() { en(key) } else { val }
        }
    }
}

pub fn t(lang: Language, key: &str, vars: &[(&str, &str)]) -> String {
    let mut s = get_string(lang, key).to_string();
    for (k, v) in vars {
        s = s.replace(&format!("{{{{{}}}}}", k), v);
    }
    s
}

pub fn ts(lang: Language, key: &str) -> String {
    get_string(lang, key).to_string()
}

fn en(key: &str) -> &'static str {
    match key {
        "notify_connection_title" => "Connection Error",
        "notify_connection_message" => "Failed to connect to API",
        "notify_empty_query_title" => "Empty Query",
        "notify_empty_query_message" => "Please enter a search query",
        "notify_no_results_title" => "No Results",
        "notify_no_results_message" => "Try lowering the threshold or adjusting your query",
        "notify_search_error_title" => "Search Error",
        "notify_search_error_message" => "Failed to execute search",
        "notify_reloaded_title" => "Index Reloaded",
        "notify_reloaded_message" => "Completed in {{seconds}}s",
        "notify_reloaded_message_untimed" => "Reload completed",
        "notify_reload_error_title" => "Reload Error",
        "notify_reload_error_message" => "Failed to reload index",
        "params_title" => "Search Parameters",
        "params_query" => "Query",
        "params_enhancement" => "Query Enhancement",
        "params_top_k" => "Top K Results",
        "params_threshold" => "Score Threshold",
        "results_top" => "Top {{count}} Results",
        "results_empty" => "Enter a query and search to begin visual retrieval",
        "results_rank" => "Rank",
        "results_filename" => "Filename",
        "results_score" => "Similarity Score",
        "results_confidence" => "Confidence",
        "results_matches" => "Matches",
        "metrics_title" => "Search Metrics",
        "metrics_time" => "Search Time (ms)",
        "metrics_top1" => "Top-1 Score",
        "metrics_avg" => "Avg Score",
        "metrics_count" => "Results Count",
        "enhanced_title" => "Enhanced Queries",
        "status_title" => "System Status",
        "status_model" => "Model",
        "status_embedding_dim" => "Embedding Dimension",
        "status_vectors" => "Vectors Indexed",
        "status_total_images" => "Total Images",
        "status_index_type" => "Index Type",
        "status_device" => "Device",
        "status_operational" => "System operational",
        "status_unreachable" => "Cannot connect to API",
        "status_unreachable_hint" => "Please check if the API server is running at {{base}}",
        "status_searching" => "Searching...",
        "status_reloading" => "Reloading...",
        "status_busy_search" => "A search is already running",
        "status_busy_reload" => "A reload is already running",
        "status_exported" => "Saved {{path}}",
        "status_nothing_to_export" => "No results to export",
        "status_opening" => "Opening {{url}}",
        "status_unknown_rank" => "No result with rank {{rank}}",
        "status_unknown_command" => "Unknown command: {{command}} (type 'help')",
        "status_goodbye" => "Goodbye!",
        "status_invalid_value" => "Invalid value for {{command}}: {{value}}",
        "status_failed" => "{{action}} failed: {{error}}",
        "repl_banner" => "Visual image search client connected to {{base}}",
        "repl_help_title" => "Commands",
        _ => "???",
    }
}

fn tr(key: &str) -> &'static str {
    match key {
        "notify_connection_title" => "Baglanti Hatasi",
        "notify_connection_message" => "API'ye baglanilamadi",
        "notify_empty_query_title" => "Bos Sorgu",
        "notify_empty_query_message" => "Lutfen bir arama sorgusu girin",
        "notify_no_results_title" => "Sonuc Yok",
        "notify_no_results_message" => "Esik degerini dusurmeyi veya sorguyu degistirmeyi deneyin",
        "notify_search_error_title" => "Arama Hatasi",
        "notify_search_error_message" => "Arama calistirilamadi",
        "notify_reloaded_title" => "Index Yeniden Yuklendi",
        "notify_reloaded_message" => "{{seconds}}s icinde tamamlandi",
        "notify_reloaded_message_untimed" => "Yeniden yukleme tamamlandi",
        "notify_reload_error_title" => "Yeniden Yukleme Hatasi",
        "notify_reload_error_message" => "Index yeniden yuklenemedi",
        "params_title" => "Arama Parametreleri",
        "params_query" => "Sorgu",
        "params_enhancement" => "Sorgu Zenginlestirme",
        "params_top_k" => "En Iyi K Sonuc",
        "params_threshold" => "Skor Esigi",
        "results_top" => "En Iyi {{count}} Sonuc",
        "results_empty" => "Gorsel aramaya baslamak icin bir sorgu girin",
        "results_rank" => "Sira",
        "results_filename" => "Dosya",
        "results_score" => "Benzerlik Skoru",
        "results_confidence" => "Guven",
        "results_matches" => "Eslesme",
        "metrics_title" => "Arama Metrikleri",
        "metrics_time" => "Arama Suresi (ms)",
        "metrics_top1" => "En Iyi Skor",
        "metrics_avg" => "Ortalama Skor",
        "metrics_count" => "Sonuc Sayisi",
        "enhanced_title" => "Zenginlestirilmis Sorgular",
        "status_title" => "Sistem Durumu",
        "status_model" => "Model",
        "status_embedding_dim" => "Embedding Boyutu",
        "status_vectors" => "Indexlenen Vektorler",
        "status_total_images" => "Toplam Gorsel",
        "status_index_type" => "Index Turu",
        "status_device" => "Cihaz",
        "status_operational" => "Sistem calisiyor",
        "status_unreachable" => "API'ye baglanilamiyor",
        "status_unreachable_hint" => "API sunucusunun {{base}} adresinde calistigini kontrol edin",
        "status_searching" => "Araniyor...",
        "status_reloading" => "Yeniden yukleniyor...",
        "status_busy_search" => "Zaten bir arama calisiyor",
        "status_busy_reload" => "Zaten bir yeniden yukleme calisiyor",
        "status_exported" => "{{path}} kaydedildi",
        "status_nothing_to_export" => "Disa aktarilacak sonuc yok",
        "status_opening" => "{{url}} aciliyor",
        "status_unknown_rank" => "{{rank}} sirasinda sonuc yok",
        "status_unknown_command" => "Bilinmeyen komut: {{command}} ('help' yazin)",
        "status_goodbye" => "Gule gule!",
        "status_invalid_value" => "{{command}} icin gecersiz deger: {{value}}",
        "status_failed" => "{{action}} basarisiz: {{error}}",
        "repl_banner" => "{{base}} adresine bagli gorsel arama istemcisi",
        "repl_help_title" => "Komutlar",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitution() {
        let msg = t(Language::En, "notify_reloaded_message", &[("seconds", "4.20")]);
        assert_eq!(msg, "Completed in 4.20s");
    }

    #[test]
    fn test_turkish_falls_back_to_english() {
        assert_eq!(ts(Language::Tr, "status_model"), "Model");
        assert_eq!(ts(Language::Tr, "notify_search_error_title"), "Arama Hatasi");
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(ts(Language::Tr, "does_not_exist"), "???");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("tr"), Language::Tr);
        assert_eq!(Language::from_code("de"), Language::En);
        assert_eq!(Language::Tr.code(), "tr");
    }
}
