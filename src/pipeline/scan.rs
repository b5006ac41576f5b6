//! Text scanning: personal names and the INE keyword in OCR output.
//!
//! Names are the single word-character token that follows a `Nombre:` label
//! (label matched case-insensitively, token case preserved). The INE check is
//! a plain, case-sensitive substring test.

use once_cell::sync::Lazy;
use regex::Regex;

/// Literal that marks an INE voter credential.
pub const INE_KEYWORD: &str = "INSTITUTO NACIONAL ELECTORAL";

/// Content of the `_INE_detected.txt` marker file.
pub const INE_DETECTED_MESSAGE: &str = "INE (Credencial para Votar) detectada en esta imagen.\n";

static RE_NOMBRE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bNombre:\s*(\w+)").unwrap());

/// Every name captured in `text`, in match order.
pub fn extract_names(text: &str) -> Vec<&str> {
    RE_NOMBRE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Line written to the names file for one captured name.
pub fn format_name_line(name: &str) -> String {
    format!("Nombre: {name}\n")
}

/// Case-sensitive check for [`INE_KEYWORD`].
pub fn contains_ine_keyword(text: &str) -> bool {
    text.contains(INE_KEYWORD)
}
