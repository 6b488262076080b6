//! 가져온 텍스트의 HTML/스크립트 제거.

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>")
        .expect("script block pattern is valid")
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

static JS_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)javascript\s*:").expect("scheme pattern is valid"));

/// 자유 텍스트 필드에서 스크립트 블록, HTML 태그, `javascript:` 스킴을 제거합니다.
pub fn sanitize_text(value: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(value, "");
    let without_tags = TAG.replace_all(&without_scripts, "");
    let cleaned = JS_SCHEME.replace_all(&without_tags, "");
    cleaned.trim().to_string()
}
