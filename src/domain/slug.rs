//! Deterministic URL slug derivation.
//!
//! Titles arrive in Turkish, so a fixed fold table maps the six dotted and
//! cedilla letters onto plain ASCII before the generic lowering pass. The
//! generator never decides validity: an empty or unrepresentable title simply
//! yields an empty slug, and the editing workflow rejects it there.

/// Derive a lowercase, ASCII-only, hyphen-separated slug from display text.
///
/// Every run of characters outside `[a-z0-9]` collapses to a single hyphen;
/// leading and trailing hyphens are stripped. The function is idempotent on
/// its own output.
pub fn derive_slug(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());

    for ch in input.chars() {
        if let Some(folded) = fold_turkish(ch) {
            slug.push(folded);
            continue;
        }

        for lower in ch.to_lowercase() {
            if lower.is_ascii_alphanumeric() {
                slug.push(lower);
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// Whether a manually edited slug is already in canonical form.
pub fn is_canonical_slug(value: &str) -> bool {
    !value.is_empty() && derive_slug(value) == value
}

fn fold_turkish(ch: char) -> Option<char> {
    match ch {
        'ğ' | 'Ğ' => Some('g'),
        'ü' | 'Ü' => Some('u'),
        'ş' | 'Ş' => Some('s'),
        'ı' | 'İ' => Some('i'),
        'ö' | 'Ö' => Some('o'),
        'ç' | 'Ç' => Some('c'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_slug_shape(slug: &str) {
        assert!(!slug.starts_with('-'), "leading hyphen in `{slug}`");
        assert!(!slug.ends_with('-'), "trailing hyphen in `{slug}`");
        assert!(!slug.contains("--"), "hyphen run in `{slug}`");
        assert!(
            slug.chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-'),
            "non-slug character in `{slug}`"
        );
    }

    #[test]
    fn folds_turkish_letters() {
        assert_eq!(
            derive_slug("Kapadokya'nın Büyülü Peri Bacaları"),
            "kapadokya-nin-buyulu-peri-bacalari"
        );
        assert_eq!(derive_slug("Çeşme Sokağı"), "cesme-sokagi");
        assert_eq!(derive_slug("İstanbul Boğazı"), "istanbul-bogazi");
    }

    #[test]
    fn output_shape_holds_for_assorted_titles() {
        let titles = [
            "Hello, World!",
            "  leading and trailing  ",
            "multiple --- separators___here",
            "Ölüdeniz'de Yamaç Paraşütü",
            "100% Doğal",
            "-already-hyphenated-",
            "⛰️ emoji only ⛰️",
            "ÜPPER ÇASE",
        ];
        for title in titles {
            assert_slug_shape(&derive_slug(title));
        }
    }

    #[test]
    fn idempotent_on_slug_form() {
        let titles = ["Nemrut Dağı", "Salda Gölü Gezisi", "kıyı-2024"];
        for title in titles {
            let once = derive_slug(title);
            assert_eq!(derive_slug(&once), once);
        }
    }

    #[test]
    fn empty_and_unrepresentable_inputs_yield_empty() {
        assert_eq!(derive_slug(""), "");
        assert_eq!(derive_slug("!!!"), "");
        assert_eq!(derive_slug("⛰️⛰️"), "");
    }

    #[test]
    fn digits_survive() {
        assert_eq!(derive_slug("Top 10 Rotalar 2024"), "top-10-rotalar-2024");
    }

    #[test]
    fn canonical_check() {
        assert!(is_canonical_slug("nemrut-dagi"));
        assert!(!is_canonical_slug(""));
        assert!(!is_canonical_slug("Nemrut-Dagi"));
        assert!(!is_canonical_slug("nemrut--dagi"));
        assert!(!is_canonical_slug("-nemrut"));
    }
}
