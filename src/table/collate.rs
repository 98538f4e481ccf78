//! Locale-style string collation for table sorting.
//!
//! Strings are compared in three passes, the way a default locale collator does:
//! base letters first (case and accents ignored), then accents, then case with
//! lowercase ahead of uppercase. Digits are compared as characters, so `"10"`
//! sorts before `"2"`.

use std::cmp::Ordering;

pub fn compare(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(base_letter)
        .cmp(b.chars().map(base_letter))
        .then_with(|| a.chars().map(accent_weight).cmp(b.chars().map(accent_weight)))
        .then_with(|| a.chars().map(case_weight).cmp(b.chars().map(case_weight)))
        .then_with(|| a.cmp(b))
}

fn base_letter(c: char) -> char {
    let stripped = strip_accent(c);
    stripped.to_lowercase().next().unwrap_or(stripped)
}

fn accent_weight(c: char) -> u8 {
    u8::from(strip_accent(c) != c)
}

fn case_weight(c: char) -> u8 {
    u8::from(c.is_uppercase())
}

fn strip_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ç' => 'c',
        'Ç' => 'C',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        other => other,
    }
}
