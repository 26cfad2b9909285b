//! Derivations from upstream names and labels: slugs, country codes,
//! season years, lenient integers.

/// Lowercase slug: alphanumerics kept, every other run collapsed to `-`.
/// An empty result becomes `fallback`.
#[must_use]
pub fn slugify(name: &str, fallback: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_dash = false;
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            out.push(ch);
            prev_dash = false;
        } else if !prev_dash {
            out.push('-');
            prev_dash = true;
        }
    }
    let slug = out.trim_matches('-');
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug.to_string()
    }
}

/// Map an upstream country name to ISO 3166-1 alpha-2. Home nations map to
/// `GB`; regions and unknown names map to `None` so they fit `CHAR(2)`.
#[must_use]
pub fn country_iso2(country: Option<&str>) -> Option<&'static str> {
    let c = country?.trim().to_lowercase();
    let code = match c.as_str() {
        "england" | "scotland" | "wales" | "northern ireland" | "united kingdom" => "GB",
        "ireland" => "IE",
        "france" => "FR",
        "italy" => "IT",
        "spain" => "ES",
        "portugal" => "PT",
        "romania" => "RO",
        "argentina" => "AR",
        "japan" => "JP",
        "australia" => "AU",
        "new zealand" => "NZ",
        "south africa" => "ZA",
        "united states" | "usa" => "US",
        "canada" => "CA",
        "fiji" => "FJ",
        "samoa" => "WS",
        "tonga" => "TO",
        "georgia" => "GE",
        _ => return None,
    };
    Some(code)
}

/// Year of a season label such as `2025-2026` or `2019`, read from its first
/// four characters.
#[must_use]
pub fn season_year(label: &str) -> Option<i32> {
    label.trim().get(..4)?.parse().ok()
}

/// Lenient integer: empty, `null`, and non-numeric values are `None`.
#[must_use]
pub fn parse_int(raw: Option<&str>) -> Option<i32> {
    let s = raw?.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("null") {
        return None;
    }
    s.parse().ok()
}

/// Trimmed, non-empty value.
#[must_use]
pub fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(slugify("United Rugby Championship", "league"), "united-rugby-championship");
        assert_eq!(slugify("  Six Nations -- U20s! ", "league"), "six-nations-u20s");
        assert_eq!(slugify("Spanish División de Honor", "league"), "spanish-división-de-honor");
    }

    #[test]
    fn empty_slug_uses_fallback() {
        assert_eq!(slugify("***", "league"), "league");
        assert_eq!(slugify("", "team"), "team");
    }

    #[test]
    fn iso2_mapping() {
        assert_eq!(country_iso2(Some("Wales")), Some("GB"));
        assert_eq!(country_iso2(Some(" new zealand ")), Some("NZ"));
        assert_eq!(country_iso2(Some("Worldwide")), None);
        assert_eq!(country_iso2(Some("Atlantis")), None);
        assert_eq!(country_iso2(None), None);
    }

    #[test]
    fn season_year_from_label() {
        assert_eq!(season_year("2025-2026"), Some(2025));
        assert_eq!(season_year("2019"), Some(2019));
        assert_eq!(season_year("19"), None);
        assert_eq!(season_year("Season 2019"), None);
    }

    #[test]
    fn lenient_integers() {
        assert_eq!(parse_int(Some("24")), Some(24));
        assert_eq!(parse_int(Some(" 7 ")), Some(7));
        assert_eq!(parse_int(Some("")), None);
        assert_eq!(parse_int(Some("null")), None);
        assert_eq!(parse_int(Some("n/a")), None);
        assert_eq!(parse_int(None), None);
    }
}
