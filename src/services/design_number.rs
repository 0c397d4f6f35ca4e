/// Design number contract: 2-4 uppercase letters, a dash, 3-4 digits.
/// Example: `SAR-101`, `LEHG-2041`.
///
/// Generation is a pure function of the upload filename and category so it
/// can be tested independently of the upload path.

/// Validate a customer-facing design number against the fixed pattern.
pub fn is_valid(candidate: &str) -> bool {
    let Some((prefix, digits)) = candidate.split_once('-') else {
        return false;
    };

    (2..=4).contains(&prefix.len())
        && prefix.chars().all(|c| c.is_ascii_uppercase())
        && (3..=4).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
}

/// Derive a design number from an upload filename and category.
///
/// Prefix: the first letters of the category, uppercased, truncated to 3.
/// Digits: the first run of digits in the filename, truncated to 4 and
/// zero-padded to 3. Returns None when either part cannot be derived;
/// the caller then falls back to a generated suffix.
pub fn generate(filename: &str, category: &str) -> Option<String> {
    let prefix: String = category
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect::<String>()
        .to_ascii_uppercase();
    if prefix.len() < 2 {
        return None;
    }

    let digits: String = filename
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .take(4)
        .collect();
    if digits.is_empty() {
        return None;
    }

    let candidate = format!("{}-{:0>3}", prefix, digits);
    is_valid(&candidate).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_pattern() {
        assert!(is_valid("SAR-101"));
        assert!(is_valid("LEHG-2041"));
        assert!(!is_valid("S-101"));
        assert!(!is_valid("SAREE-101"));
        assert!(!is_valid("SAR-12"));
        assert!(!is_valid("SAR-12345"));
        assert!(!is_valid("sar-101"));
        assert!(!is_valid("SAR101"));
        assert!(!is_valid("SAR-1a1"));
        assert!(!is_valid(""));
    }

    #[test]
    fn generates_from_filename_and_category() {
        assert_eq!(
            generate("IMG_2041_final.jpg", "lehenga"),
            Some("LEH-2041".to_string())
        );
        assert_eq!(generate("design7.png", "sarees"), Some("SAR-007".to_string()));
        // 5+ digit runs are truncated to the pattern's maximum
        assert_eq!(
            generate("photo-123456.jpg", "sarees"),
            Some("SAR-1234".to_string())
        );
    }

    #[test]
    fn generation_fails_without_digits_or_category_letters() {
        assert_eq!(generate("cover.jpg", "sarees"), None);
        assert_eq!(generate("IMG_101.jpg", "7"), None);
    }
}
