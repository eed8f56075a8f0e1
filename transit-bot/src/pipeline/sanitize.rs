//! Rider input clean-up, applied before classification.

use std::sync::LazyLock;

use regex::Regex;

static TABS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\t+").unwrap());

/// Pictographs, skin tones, and the joiners, selectors, keycaps, regional
/// indicators and tags that glue emoji sequences together.
static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\p{Extended_Pictographic}\p{Emoji_Modifier}\x{FE00}-\x{FE0F}\x{200D}\x{20E3}\x{1F1E6}-\x{1F1FF}\x{E0020}-\x{E007F}]",
    )
    .unwrap()
});

/// Reduce raw channel text to something the classifiers can read.
///
/// Keeps only the first line, turns each run of tabs into one space, drops
/// emoji and trims the result.
pub fn sanitize(raw: &str) -> String {
    let first_line = raw.lines().next().unwrap_or("");
    let without_emoji = EMOJI.replace_all(first_line, "");
    TABS.replace_all(&without_emoji, " ").trim().to_string()
}
