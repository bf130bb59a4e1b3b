/// The key used to compare loosely formatted names: lower case, letters only.
///
/// Digits, spaces and punctuation are all dropped, so that `U.S. Senate`,
/// `US SENATE` and `ussenate` compare equal.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// Cleans up a county label read from a tabular source: trimmed, upper case.
pub fn normalize_county_label(county: &str) -> String {
    county.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn senate_spellings() {
        let key = normalize_name("U.S. Senate");
        assert_eq!(key, "ussenate");
        assert_eq!(normalize_name("ussenate"), key);
        assert_eq!(normalize_name("US SENATE"), key);
    }

    #[test]
    fn digits_and_accents_are_dropped() {
        assert_eq!(normalize_name("District 12 - Judge"), "districtjudge");
        assert_eq!(normalize_name("Doña Ana"), "doaana");
        assert_eq!(normalize_name("2020"), "");
    }

    #[test]
    fn county_labels() {
        assert_eq!(normalize_county_label("  Le Flore "), "LE FLORE");
    }
}
