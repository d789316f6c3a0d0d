//! Reduction of free text to the SEPA Latin character set.

/// Characters every SEPA bank must accept.
fn is_sepa_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || " /-?:().,'+".contains(c)
}

fn replacement(c: char) -> Option<&'static str> {
    Some(match c {
        'ä' => "ae",
        'ö' => "oe",
        'ü' => "ue",
        'Ä' => "Ae",
        'Ö' => "Oe",
        'Ü' => "Ue",
        'ß' => "ss",
        '&' => "+",
        '*' | '$' | '%' => ".",
        '_' | '–' | '—' => "-",
        'á' | 'à' | 'â' | 'ã' | 'å' => "a",
        'Á' | 'À' | 'Â' | 'Ã' | 'Å' => "A",
        'é' | 'è' | 'ê' | 'ë' => "e",
        'É' | 'È' | 'Ê' | 'Ë' => "E",
        'í' | 'ì' | 'î' | 'ï' => "i",
        'Í' | 'Ì' | 'Î' | 'Ï' => "I",
        'ó' | 'ò' | 'ô' | 'õ' | 'ø' => "o",
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ø' => "O",
        'ú' | 'ù' | 'û' => "u",
        'Ú' | 'Ù' | 'Û' => "U",
        'ç' => "c",
        'Ç' => "C",
        'ñ' => "n",
        'Ñ' => "N",
        'ý' | 'ÿ' => "y",
        'Ý' => "Y",
        'æ' => "ae",
        'Æ' => "Ae",
        'œ' => "oe",
        'Œ' => "Oe",
        _ => return None,
    })
}

/// Map text into the SEPA character set: umlauts become digraphs, accents
/// are dropped, `&` becomes `+`, anything else outside the set is removed.
/// Surrounding whitespace is trimmed.
pub fn sepa_clean(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if is_sepa_char(c) {
            out.push(c);
        } else if let Some(r) = replacement(c) {
            out.push_str(r);
        } else if c.is_whitespace() {
            out.push(' ');
        }
    }
    out.trim().to_string()
}

/// Characters allowed in a mandate identifier (no spaces).
pub fn is_valid_mandate_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c != ' ' && is_sepa_char(c))
}
