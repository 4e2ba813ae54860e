/// Values read as missing, the same set pandas treats as NA by default.
const NULL_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// 1) Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// 2) True if an already-cleaned cell means "no value".
pub fn is_null_token(cleaned: &str) -> bool {
    NULL_TOKENS.contains(&cleaned)
}

/// 3) Clean a cell and map null tokens to `None`.
pub fn clean_cell(raw: &str) -> Option<String> {
    let c = clean_str(raw);
    if is_null_token(&c) {
        None
    } else {
        Some(c)
    }
}

/// 4) Coerce a cell to a number; anything unparseable is `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let c = clean_cell(raw)?;
    c.parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_str_trims_and_unquotes() {
        assert_eq!(clean_str("  Bikes "), "Bikes");
        assert_eq!(clean_str("\" Road Bikes \""), "Road Bikes");
        assert_eq!(clean_str("\""), "\"");
    }

    #[test]
    fn test_clean_cell_null_tokens() {
        assert_eq!(clean_cell("N/A"), None);
        assert_eq!(clean_cell("  "), None);
        assert_eq!(clean_cell("null"), None);
        assert_eq!(clean_cell("Internet"), Some("Internet".to_string()));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1234.5"), Some(1234.5));
        assert_eq!(parse_number(" 7 "), Some(7.0));
        assert_eq!(parse_number("N/A"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("$1,200"), None);
    }
}
