//! Text normalization helpers shared by records, weighting, and reports.

use crate::constants::store::PARTNER_ID_DIGITS;
use crate::constants::weighting::MIN_TOKEN_CHARS;
use crate::types::PartnerId;

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_inline_whitespace<T: AsRef<str>>(text: T) -> String {
    let mut normalized = String::new();
    let mut seen_space = false;
    for ch in text.as_ref().chars() {
        if ch.is_whitespace() {
            if !seen_space {
                normalized.push(' ');
                seen_space = true;
            }
        } else {
            normalized.push(ch);
            seen_space = false;
        }
    }
    normalized.trim().to_string()
}

/// Collapse country-code and punctuation variants of one phone number.
///
/// Phone-style addresses (digits plus `+ - ( ) .` and spaces) keep their last
/// `PARTNER_ID_DIGITS` digits. Anything else (email handles, short codes with
/// letters) is kept whole, lowercased.
pub fn normalize_partner_id(address: &str) -> PartnerId {
    let address = address.trim();
    let phone_like = address.chars().any(|ch| ch.is_ascii_digit())
        && address
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-' | '(' | ')' | '.' | ' '));
    if !phone_like {
        return address.to_lowercase();
    }
    let digits: Vec<char> = address.chars().filter(|ch| ch.is_ascii_digit()).collect();
    let start = digits.len().saturating_sub(PARTNER_ID_DIGITS);
    digits[start..].iter().collect()
}

/// Lowercased word tokens of at least `MIN_TOKEN_CHARS` word characters.
///
/// Word characters are alphanumerics and `_`; everything else separates tokens.
pub fn word_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;
    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            current.extend(ch.to_lowercase());
            current_chars += 1;
        } else {
            flush_token(&mut tokens, &mut current, &mut current_chars);
        }
    }
    flush_token(&mut tokens, &mut current, &mut current_chars);
    tokens
}

fn flush_token(tokens: &mut Vec<String>, current: &mut String, current_chars: &mut usize) {
    if *current_chars >= MIN_TOKEN_CHARS {
        tokens.push(std::mem::take(current));
    } else {
        current.clear();
    }
    *current_chars = 0;
}
