//! Derived presentation values for stored content.
//!
//! Reading time counts words; the excerpt fallback counts characters. The
//! two deliberately use different units and stay separate functions.

pub const WORDS_PER_MINUTE: usize = 200;
pub const EXCERPT_FALLBACK_CHARS: usize = 160;

/// Estimated reading time in whole minutes, never less than one.
pub fn reading_time_minutes(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// The stored excerpt, or a character-prefix of the content when the excerpt
/// is blank. Truncation respects character boundaries and appends an
/// ellipsis only when something was cut.
pub fn excerpt_or_fallback(excerpt: &str, content: &str) -> String {
    let trimmed = excerpt.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    let prefix: String = content.chars().take(EXCERPT_FALLBACK_CHARS).collect();
    if content.chars().count() > EXCERPT_FALLBACK_CHARS {
        format!("{}…", prefix.trim_end())
    } else {
        prefix.trim_end().to_string()
    }
}
