use once_cell::sync::Lazy;
use std::collections::HashMap;

/// County name (uppercase, exact) -> two-letter county code.
pub type CountyCodes = HashMap<&'static str, &'static str>;

const ARIZONA_COUNTIES: [(&str, &str); 15] = [
    ("YUMA", "YU"),
    ("MARICOPA", "MC"),
    ("SANTA CRUZ", "SC"),
    ("GILA", "GI"),
    ("PIMA", "PM"),
    ("PINAL", "PN"),
    ("APACHE", "AP"),
    ("GRAHAM", "GM"),
    ("LA PAZ", "LP"),
    ("MOHAVE", "MO"),
    ("NAVAJO", "NA"),
    ("COCHISE", "CH"),
    ("YAVAPAI", "YA"),
    ("COCONINO", "CN"),
    ("GREENLEE", "GN"),
];

/// The fixed county code table, built on first use and never mutated.
pub static COUNTY_CODES: Lazy<CountyCodes> = Lazy::new(|| ARIZONA_COUNTIES.into_iter().collect());

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_has_fifteen_unique_entries() {
        assert_eq!(COUNTY_CODES.len(), ARIZONA_COUNTIES.len());
        assert_eq!(COUNTY_CODES.len(), 15);

        let codes: HashSet<&str> = COUNTY_CODES.values().copied().collect();
        assert_eq!(codes.len(), 15, "county codes must not collide");
    }

    #[test]
    fn test_keys_are_uppercase_and_codes_two_letters() {
        for (name, code) in COUNTY_CODES.iter() {
            assert_eq!(*name, name.to_uppercase());
            assert_eq!(code.len(), 2);
            assert!(code.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(COUNTY_CODES.get("SANTA CRUZ"), Some(&"SC"));
        assert_eq!(COUNTY_CODES.get("Santa Cruz"), None);
        assert_eq!(COUNTY_CODES.get(" SANTA CRUZ"), None);
    }
}
