//! Text-level normalization: price strings, Vietnamese slugs and CSS hex colors.
//!
//! Every function here is total and pure. Malformed input degrades to an
//! empty or zero value instead of an error.

use std::sync::LazyLock;

use regex::Regex;
use shopdata_core::Money;

const CURRENCY_GLYPH: &str = "₫";

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[0-9A-Fa-f]{6}").expect("valid hex color regex"));

static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug separator regex"));

/// Parses a storefront price string such as `"1.234.567₫"` into [`Money`].
///
/// Both `,` and `.` are treated as thousands separators, never as a decimal
/// point, so fractional amounts are not represented. `numeric` is the first
/// run of ASCII digits left after removing the currency glyph and separators,
/// or `0` when there is none (or it does not fit in a `u64`).
///
/// Blank input yields `Money::default()` (empty value and currency).
#[must_use]
pub fn parse_price(raw: &str) -> Money {
    if raw.trim().is_empty() {
        return Money::default();
    }

    let cleaned: String = raw
        .replace(CURRENCY_GLYPH, "")
        .chars()
        .filter(|c| *c != ',' && *c != '.')
        .collect();

    let numeric = first_digit_run(&cleaned).map_or(0, |digits| {
        digits.parse::<u64>().unwrap_or_else(|_| {
            tracing::debug!(raw, "price digit run overflows u64; using 0");
            0
        })
    });

    Money {
        value: raw.to_owned(),
        currency: CURRENCY_GLYPH.to_owned(),
        numeric,
    }
}

/// Returns the first contiguous run of ASCII digits in `s`.
fn first_digit_run(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..len])
}

/// Builds a URL slug from free text, folding Vietnamese diacritics to ASCII.
///
/// `"Điện Thoại Thông Minh!"` becomes `"dien-thoai-thong-minh"`: the text is
/// lowercased, accented vowels and `đ` are folded to their base letter, every
/// run of characters outside `[a-z0-9]` becomes one hyphen, and leading or
/// trailing hyphens are removed.
#[must_use]
pub fn slugify(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !is_combining_mark(*c))
        .map(fold_vietnamese)
        .collect();

    NON_SLUG_RE
        .replace_all(&folded, "-")
        .trim_matches('-')
        .to_owned()
}

/// Returns the first `#RRGGBB` token in a CSS style string, or `""`.
///
/// The original case of the hex digits is preserved.
#[must_use]
pub fn extract_hex_color(style: &str) -> String {
    HEX_COLOR_RE
        .find(style)
        .map(|m| m.as_str().to_owned())
        .unwrap_or_default()
}

/// Combining diacritical marks left over from decomposed (NFD) input.
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Maps a lowercase Vietnamese letter to its unaccented ASCII base letter.
/// Characters outside the table are returned unchanged.
fn fold_vietnamese(c: char) -> char {
    match c {
        'á' | 'à' | 'ạ' | 'ả' | 'ã' | 'ă' | 'ắ' | 'ằ' | 'ặ' | 'ẳ' | 'ẵ' | 'â' | 'ấ' | 'ầ'
        | 'ậ' | 'ẩ' | 'ẫ' => 'a',
        'é' | 'è' | 'ẹ' | 'ẻ' | 'ẽ' | 'ê' | 'ế' | 'ề' | 'ệ' | 'ể' | 'ễ' => 'e',
        'í' | 'ì' | 'ị' | 'ỉ' | 'ĩ' => 'i',
        'ó' | 'ò' | 'ọ' | 'ỏ' | 'õ' | 'ô' | 'ố' | 'ồ' | 'ộ' | 'ổ' | 'ỗ' | 'ơ' | 'ớ' | 'ờ'
        | 'ợ' | 'ở' | 'ỡ' => 'o',
        'ú' | 'ù' | 'ụ' | 'ủ' | 'ũ' | 'ư' | 'ứ' | 'ừ' | 'ự' | 'ử' | 'ữ' => 'u',
        'ý' | 'ỳ' | 'ỵ' | 'ỷ' | 'ỹ' => 'y',
        'đ' => 'd',
        other => other,
    }
}
