//! Literal decoding: string escapes and numeric forms.

/// Strip one pair of matching quotes and decode escapes.
pub fn unquote(raw: &str) -> String {
    let inner = ['"', '\'', '`']
        .into_iter()
        .find_map(|q| raw.strip_prefix(q).and_then(|s| s.strip_suffix(q)))
        .unwrap_or(raw);
    unescape(inner)
}

/// Decode backslash escapes. Malformed escapes keep their letter.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let mut chars = rest[pos + 1..].chars();
        let Some(esc) = chars.next() else {
            out.push('\\');
            return out;
        };
        rest = chars.as_str();
        match esc {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // Line continuations
            '\r' => rest = rest.strip_prefix('\n').unwrap_or(rest),
            '\n' | '\u{2028}' | '\u{2029}' => {}
            'x' => match hex_prefix(rest, 2) {
                Some(code) => {
                    push_code(&mut out, code);
                    rest = &rest[2..];
                }
                None => out.push('x'),
            },
            'u' => match unicode_escape(rest) {
                Some((code, used)) => {
                    push_code(&mut out, code);
                    rest = &rest[used..];
                }
                None => out.push('u'),
            },
            other => out.push(other),
        }
    }
    out.push_str(rest);
    out
}

fn hex_prefix(s: &str, n: usize) -> Option<u32> {
    let digits = s.get(..n)?;
    if digits.chars().all(|c| c.is_ascii_hexdigit()) {
        u32::from_str_radix(digits, 16).ok()
    } else {
        None
    }
}

/// Code point and bytes consumed for the text after `\u`. A high surrogate
/// followed by an escaped low surrogate is combined.
fn unicode_escape(s: &str) -> Option<(u32, usize)> {
    let (code, used) = if let Some(braced) = s.strip_prefix('{') {
        let close = braced.find('}')?;
        let digits = &braced[..close];
        if digits.is_empty() || digits.len() > 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        (u32::from_str_radix(digits, 16).ok()?, close + 2)
    } else {
        (hex_prefix(s, 4)?, 4)
    };

    if (0xD800..0xDC00).contains(&code) {
        let low = s[used..]
            .strip_prefix("\\u")
            .and_then(|tail| hex_prefix(tail, 4))
            .filter(|low| (0xDC00..0xE000).contains(low));
        if let Some(low) = low {
            return Some((0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00), used + 6));
        }
    }
    Some((code, used))
}

fn push_code(out: &mut String, code: u32) {
    out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
}

/// Numeric value of a numeric literal token.
///
/// Handles `_` separators, the BigInt `n` suffix, `0x`/`0o`/`0b` prefixes and
/// legacy leading-zero octal. Returns `None` for values that are not finite.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != '_').collect();
    let digits = cleaned.strip_suffix('n').unwrap_or(&cleaned).to_ascii_lowercase();

    if let Some(hex) = digits.strip_prefix("0x") {
        return parse_radix(hex, 16);
    }
    if let Some(oct) = digits.strip_prefix("0o") {
        return parse_radix(oct, 8);
    }
    if let Some(bin) = digits.strip_prefix("0b") {
        return parse_radix(bin, 2);
    }
    if digits.len() > 1
        && digits.starts_with('0')
        && digits.bytes().all(|b| (b'0'..=b'7').contains(&b))
    {
        return parse_radix(&digits[1..], 8);
    }
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    let mut value = 0f64;
    for c in digits.chars() {
        value = value * f64::from(radix) + f64::from(c.to_digit(radix)?);
    }
    Some(value).filter(|v| v.is_finite())
}
