use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a legacy formatting sequence introduced by `&` or `§`: a single
/// code character, or `#rrggbb` for hex colors.
static LEGACY_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new("(?i)[&§](?:#[0-9a-f]{6}|[0-9a-fk-or])").unwrap());

fn is_valid_hex(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCode {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    Obfuscated,
    Bold,
    Strikethrough,
    Underline,
    Italic,
    Reset,
}

impl ColorCode {
    pub fn parse(code: char) -> Option<ColorCode> {
        Some(match code.to_ascii_lowercase() {
            '0' => ColorCode::Black,
            '1' => ColorCode::DarkBlue,
            '2' => ColorCode::DarkGreen,
            '3' => ColorCode::DarkAqua,
            '4' => ColorCode::DarkRed,
            '5' => ColorCode::DarkPurple,
            '6' => ColorCode::Gold,
            '7' => ColorCode::Gray,
            '8' => ColorCode::DarkGray,
            '9' => ColorCode::Blue,
            'a' => ColorCode::Green,
            'b' => ColorCode::Aqua,
            'c' => ColorCode::Red,
            'd' => ColorCode::LightPurple,
            'e' => ColorCode::Yellow,
            'f' => ColorCode::White,
            'k' => ColorCode::Obfuscated,
            'l' => ColorCode::Bold,
            'm' => ColorCode::Strikethrough,
            'n' => ColorCode::Underline,
            'o' => ColorCode::Italic,
            'r' => ColorCode::Reset,
            _ => return None,
        })
    }

    pub fn is_formatting(self) -> bool {
        use ColorCode::*;
        matches!(
            self,
            Obfuscated | Bold | Strikethrough | Underline | Italic | Reset
        )
    }
}

/// Removes every legacy formatting sequence from `text`.
///
/// Marker characters that are not followed by a valid code are kept, so
/// `"Tom & Jerry"` survives unchanged.
pub fn strip_formatting(text: &str) -> String {
    LEGACY_CODE_REGEX.replace_all(text, "").into_owned()
}

/// Returns true if `text` contains at least one formatting sequence.
pub fn has_formatting(text: &str) -> bool {
    LEGACY_CODE_REGEX.is_match(text)
}

/// The key nicknames are compared by: formatting stripped, the configured
/// nickname prefix removed, lower-cased.
pub fn normalize_nickname(nickname: &str, prefix: &str) -> String {
    let plain = strip_formatting(nickname);
    let plain = plain.trim();
    let plain = if prefix.is_empty() {
        plain
    } else {
        plain.strip_prefix(prefix).unwrap_or(plain)
    };
    plain.to_lowercase()
}

/// Translates `&` codes into `§` codes, the form clients render.
pub fn translate_alternate_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '&' {
            match chars.peek() {
                Some(&code) if ColorCode::parse(code).is_some() => {
                    out.push('§');
                    continue;
                }
                Some('#') => {
                    let hex: String = chars.clone().skip(1).take(6).collect();
                    if hex.len() == 6 && hex.chars().all(is_valid_hex) {
                        out.push('§');
                        continue;
                    }
                }
                _ => {}
            }
        }
        out.push(c);
    }
    out
}
