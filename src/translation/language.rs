//! Fixed language-code tables used by the translation orchestrator.

/// Collapse regional variants to the base code the translation API accepts.
///
/// Unknown codes pass through lowercased; the remote service is the authority
/// on what it supports.
pub(crate) fn normalize_language_code(code: &str) -> String {
    let lowered = code.trim().to_lowercase();
    match lowered.as_str() {
        "zh-cn" | "zh-tw" | "zh-hans" | "zh-hant" => "zh".to_string(),
        "pt-br" | "pt-pt" => "pt".to_string(),
        "es-419" | "es-mx" => "es".to_string(),
        "fr-ca" => "fr".to_string(),
        _ => lowered,
    }
}

/// Human-readable name for a canonical code, falling back to the raw code.
pub(crate) fn language_name(code: &str) -> String {
    let name = match code {
        "ar" => "Arabic",
        "de" => "German",
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "ht" => "Haitian Creole",
        "ja" => "Japanese",
        "ko" => "Korean",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "vi" => "Vietnamese",
        "zh" => "Chinese",
        other => return other.to_string(),
    };
    name.to_string()
}
