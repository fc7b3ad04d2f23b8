//! Common validation and text normalisation utilities.

use validator::ValidationError;

/// Normalises a login identifier before lookup.
///
/// Email-shaped logins are kept as typed. Anything else is treated as a
/// document number and loses its `.` and `-` separators, so `123.456.789-09`
/// and `12345678909` resolve to the same account.
pub fn normalize_login(login: &str) -> String {
    let login = login.trim();
    if login.contains('@') {
        login.to_string()
    } else {
        strip_document_separators(login)
    }
}

/// Removes `.` and `-` from a document number.
pub fn strip_document_separators(document: &str) -> String {
    document.chars().filter(|c| *c != '.' && *c != '-').collect()
}

/// Capitalises the first letter of every whitespace-separated word and
/// lowercases the rest. Runs of whitespace collapse to a single space.
pub fn capitalize_words(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replaces accented Latin letters with their unaccented base letter.
///
/// Passwords typed on different keyboards compare equal after folding.
pub fn fold_accents(input: &str) -> String {
    input.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        other => other,
    }
}

/// Returns true when the value is an absolute http(s) URL rather than inline data.
pub fn is_http_url(value: &str) -> bool {
    let value = value.trim_start();
    value.starts_with("http://") || value.starts_with("https://")
}

/// Validates that a string is not empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates a network port number.
pub fn validate_port(port: i32) -> Result<(), ValidationError> {
    if (1..=65535).contains(&port) {
        Ok(())
    } else {
        let mut err = ValidationError::new("port_range");
        err.message = Some("Port must be between 1 and 65535".into());
        Err(err)
    }
}
