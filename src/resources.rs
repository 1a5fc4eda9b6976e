//! User-facing strings and zero-shot candidate labels.
//!
//! Every string the pipeline shows a human, or hands to the zero-shot
//! endpoint as a candidate label, lives here rather than inline in the
//! classifiers that use it — the classifiers are language-agnostic logic,
//! this module is the language.

/// Candidate label meaning "profane, abusive, demeaning speech", passed to
/// the zero-shot endpoint by the toxicity classifier.
pub const TOXIC_LABEL: &str = "شتائم وكلام بذيء ومهين";

/// Candidate label meaning "respectful criticism and ordinary speech".
pub const CIVIL_LABEL: &str = "نقد محترم وكلام عادي";

/// Generic "customer service / hygiene / staff" relevancy label, always a
/// candidate alongside the shop's category label.
pub const GENERIC_SERVICE_LABEL: &str = "خدمة عملاء وتعامل عام ونظافة";

/// "Unrelated to either" relevancy label.
pub const UNRELATED_LABEL: &str = "سياق آخر غير مرتبط";

/// Default `shop_type` bucket when the webhook omits it.
pub const DEFAULT_SHOP_TYPE: &str = "عام";

/// Built-in `shop_type` → relevancy candidate-label lookup table (§4.6).
/// Overridable wholesale via `SHOP_CATEGORY_LABELS_FILE`.
pub const DEFAULT_CATEGORY_LABELS: &[(&str, &str)] = &[
    ("مطعم", "طعام ومطاعم ووجبات"),
    ("مقهى", "مقاهي ومشروبات"),
    ("محل ملابس", "ملابس وأزياء"),
    ("صيدلية", "أدوية وصحة وصيدليات"),
    ("سوبر ماركت", "بقالة ومواد غذائية"),
    ("متجر إلكترونيات", "أجهزة إلكترونية وتقنية"),
    ("مكتبة", "كتب وقرطاسية"),
    ("محل تجميل", "تجميل وعناية شخصية"),
    ("صالة رياضية", "رياضة ولياقة بدنية"),
    ("مدرسة", "تعليم ومدارس"),
    ("مستشفى", "طب وعيادات ومستشفيات"),
    ("محطة وقود", "وقود ومحطات بنزين"),
    ("متجر أجهزة", "أجهزة منزلية"),
    ("محل ألعاب", "ألعاب أطفال"),
    ("مكتب سياحي", "سياحة وسفر"),
    ("محل هدايا", "هدايا ومناسبات"),
    ("مغسلة ملابس", "غسيل وتنظيف ملابس"),
    ("متجر هواتف", "هواتف واتصالات"),
    ("محل أثاث", "أثاث منزلي"),
    (DEFAULT_SHOP_TYPE, GENERIC_SERVICE_LABEL),
];

/// Looks up the relevancy candidate label for a `shop_type`, falling back
/// to the generic-service label for unrecognized categories.
pub fn category_label(shop_type: &str, overrides: Option<&[(String, String)]>) -> String {
    if let Some(overrides) = overrides
        && let Some((_, label)) = overrides.iter().find(|(k, _)| k == shop_type)
    {
        return label.clone();
    }

    DEFAULT_CATEGORY_LABELS
        .iter()
        .find(|(k, _)| *k == shop_type)
        .map(|(_, v)| v.to_string())
        .unwrap_or_else(|| GENERIC_SERVICE_LABEL.to_string())
}

/// Fixed five-valued enrichment category set (C7).
pub const ENRICHMENT_CATEGORIES: &[&str] =
    &["complaint", "criticism", "praise", "suggestion", "inquiry"];

/// Canned thank-you used as `suggested_reply` on the stars-only/short-text
/// enrichment skip path.
pub const CANNED_THANK_YOU_REPLY: &str = "شكراً جزيلاً لك على تقييمك القيم، نقدر وقتك معنا.";

/// Canned praise summary for the stars-only skip path.
pub const CANNED_PRAISE_SUMMARY: &str = "تقييم إيجابي بدون تعليق نصي";

/// Canned complaint summary for the stars-only skip path.
pub const CANNED_COMPLAINT_SUMMARY: &str = "تقييم سلبي بدون تعليق نصي";

/// Canned neutral summary for the stars-only skip path.
pub const CANNED_NEUTRAL_SUMMARY: &str = "تقييم بدون تعليق نصي";

/// Canned fallback strings used when the chat-completion call fails after
/// the adapter's retry budget is exhausted.
pub const CANNED_FALLBACK_SUMMARY: &str = "ملخص غير متاح حالياً";

pub const CANNED_FALLBACK_REPLY: &str =
    "شكراً لتقييمك، سنأخذ ملاحظاتك بعين الاعتبار لتحسين خدماتنا.";

/// Loads a `{"shop_type": "label", ...}` JSON file as a category-override
/// table, consulted by [`category_label`] ahead of the built-in table.
pub fn load_category_overrides(
    path: &str,
) -> Result<Vec<(String, String)>, std::io::Error> {
    let contents = std::fs::read_to_string(path)?;
    let map: std::collections::HashMap<String, String> = serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(map.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_category_resolves_to_its_label() {
        assert_eq!(category_label("مطعم", None), "طعام ومطاعم ووجبات");
    }

    #[test]
    fn unknown_category_falls_back_to_generic() {
        assert_eq!(category_label("غير معروف", None), GENERIC_SERVICE_LABEL);
    }

    #[test]
    fn override_table_takes_precedence() {
        let overrides = vec![("مطعم".to_string(), "custom".to_string())];
        assert_eq!(category_label("مطعم", Some(&overrides)), "custom");
    }
}
