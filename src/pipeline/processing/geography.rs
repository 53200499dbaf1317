use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Static lowercase name -> ISO-3166 alpha-2 table covering common full
/// names, common abbreviations, and several historical/alternate spellings.
const COUNTRY_TABLE: &[(&str, &str)] = &[
    ("albania", "AL"),
    ("algeria", "DZ"),
    ("argentina", "AR"),
    ("armenia", "AM"),
    ("australia", "AU"),
    ("azerbaijan", "AZ"),
    ("bahamas", "BS"),
    ("bangladesh", "BD"),
    ("barbados", "BB"),
    ("belarus", "BY"),
    ("belgium", "BE"),
    ("belize", "BZ"),
    ("benin", "BJ"),
    ("bhutan", "BT"),
    ("bolivia", "BO"),
    ("bosnia and herzegovina", "BA"),
    ("botswana", "BW"),
    ("brazil", "BR"),
    ("british indian ocean territory (chagos archipelago)", "IO"),
    ("british indian ocean territory", "IO"),
    ("brunei darussalam", "BN"),
    ("bulgaria", "BG"),
    ("burundi", "BI"),
    ("cameroon", "CM"),
    ("cape verde", "CV"),
    ("cayman islands", "KY"),
    ("central african republic", "CF"),
    ("chad", "TD"),
    ("christmas island", "CX"),
    ("colombia", "CO"),
    ("comoros", "KM"),
    ("congo", "CG"),
    ("costa rica", "CR"),
    ("croatia", "HR"),
    ("cyprus", "CY"),
    ("dominica", "DM"),
    ("dominican republic", "DO"),
    ("ecuador", "EC"),
    ("egypt", "EG"),
    ("el salvador", "SV"),
    ("eritrea", "ER"),
    ("estonia", "EE"),
    ("ethiopia", "ET"),
    ("faroe islands", "FO"),
    ("fiji", "FJ"),
    ("finland", "FI"),
    ("france", "FR"),
    ("french guiana", "GF"),
    ("french polynesia", "PF"),
    ("gabon", "GA"),
    ("gibraltar", "GI"),
    ("greenland", "GL"),
    ("grenada", "GD"),
    ("guadeloupe", "GP"),
    ("guatemala", "GT"),
    ("guinea", "GN"),
    ("guyana", "GY"),
    ("haiti", "HT"),
    ("holy see (vatican city state)", "VA"),
    ("holy see", "VA"),
    ("vatican city", "VA"),
    ("honduras", "HN"),
    ("india", "IN"),
    ("ireland", "IE"),
    ("isle of man", "IM"),
    ("italy", "IT"),
    ("jamaica", "JM"),
    ("japan", "JP"),
    ("jersey", "JE"),
    ("jordan", "JO"),
    ("korea", "KR"),
    ("kuwait", "KW"),
    ("kyrgyz republic", "KG"),
    ("kyrgyzstan", "KG"),
    ("lao people's democratic republic", "LA"),
    ("laos", "LA"),
    ("lebanon", "LB"),
    ("lesotho", "LS"),
    ("libyan arab jamahiriya", "LY"),
    ("libya", "LY"),
    ("luxembourg", "LU"),
    ("madagascar", "MG"),
    ("malawi", "MW"),
    ("marshall islands", "MH"),
    ("martinique", "MQ"),
    ("mauritius", "MU"),
    ("mexico", "MX"),
    ("monaco", "MC"),
    ("mongolia", "MN"),
    ("montserrat", "MS"),
    ("myanmar", "MM"),
    ("namibia", "NA"),
    ("niger", "NE"),
    ("nigeria", "NG"),
    ("northern mariana islands", "MP"),
    ("norway", "NO"),
    ("oman", "OM"),
    ("pakistan", "PK"),
    ("panama", "PA"),
    ("philippines", "PH"),
    ("portugal", "PT"),
    ("puerto rico", "PR"),
    ("reunion", "RE"),
    ("r\u{e9}union", "RE"),
    ("romania", "RO"),
    ("russian federation", "RU"),
    ("russia", "RU"),
    ("rwanda", "RW"),
    ("saint barthelemy", "BL"),
    ("saint barth\u{e9}lemy", "BL"),
    ("saint helena", "SH"),
    ("saint kitts and nevis", "KN"),
    ("saint pierre and miquelon", "PM"),
    ("samoa", "WS"),
    ("san marino", "SM"),
    ("sao tome and principe", "ST"),
    ("s\u{e3}o tom\u{e9} and pr\u{ed}ncipe", "ST"),
    ("saudi arabia", "SA"),
    ("senegal", "SN"),
    ("seychelles", "SC"),
    ("singapore", "SG"),
    ("slovakia (slovak republic)", "SK"),
    ("slovakia", "SK"),
    ("slovenia", "SI"),
    ("somalia", "SO"),
    ("svalbard & jan mayen islands", "SJ"),
    ("svalbard and jan mayen islands", "SJ"),
    ("swaziland", "SZ"),
    ("eswatini", "SZ"),
    ("sweden", "SE"),
    ("switzerland", "CH"),
    ("syrian arab republic", "SY"),
    ("syria", "SY"),
    ("taiwan", "TW"),
    ("tanzania", "TZ"),
    ("timor-leste", "TL"),
    ("east timor", "TL"),
    ("togo", "TG"),
    ("tokelau", "TK"),
    ("turkey", "TR"),
    ("tuvalu", "TV"),
    ("uganda", "UG"),
    ("united arab emirates", "AE"),
    ("uae", "AE"),
    ("united states minor outlying islands", "UM"),
    ("united states of america", "US"),
    ("united states", "US"),
    ("usa", "US"),
    ("us", "US"),
    ("united kingdom", "GB"),
    ("uk", "GB"),
    ("great britain", "GB"),
    ("vanuatu", "VU"),
    ("venezuela", "VE"),
    ("vietnam", "VN"),
    ("yemen", "YE"),
    ("zambia", "ZM"),
    ("zimbabwe", "ZW"),
];

static COUNTRY_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| COUNTRY_TABLE.iter().copied().collect());

/// Outcome of normalizing a free-text country value. At most one of the two
/// fields is set: a resolved ISO code, or the raw value that failed to map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountryNormalization {
    pub code: Option<String>,
    pub unmapped: Option<String>,
}

/// Map a raw country value to an ISO-3166 alpha-2 code. Already-ISO two
/// letter values pass through upper-cased; everything else goes through the
/// static table, once verbatim and once with non-alphabetic characters
/// stripped (punctuation/diacritic noise).
pub fn normalize_country(value: Option<&str>) -> CountryNormalization {
    let Some(value) = value else {
        return CountryNormalization::default();
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return CountryNormalization::default();
    }

    if trimmed.chars().count() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return CountryNormalization {
            code: Some(trimmed.to_uppercase()),
            unmapped: None,
        };
    }

    let lowered = trimmed.to_lowercase();
    if let Some(code) = COUNTRY_MAP.get(lowered.as_str()) {
        return CountryNormalization {
            code: Some((*code).to_string()),
            unmapped: None,
        };
    }

    let cleaned: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if let Some(code) = COUNTRY_MAP.get(cleaned.as_str()) {
        return CountryNormalization {
            code: Some((*code).to_string()),
            unmapped: None,
        };
    }

    CountryNormalization {
        code: None,
        unmapped: Some(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_codes_pass_through_uppercased() {
        assert_eq!(normalize_country(Some("us")).code.as_deref(), Some("US"));
        assert_eq!(normalize_country(Some("DE")).code.as_deref(), Some("DE"));
    }

    #[test]
    fn test_full_names_map_to_codes() {
        assert_eq!(
            normalize_country(Some("United States of America")).code.as_deref(),
            Some("US")
        );
        assert_eq!(normalize_country(Some("UK")).code.as_deref(), Some("GB"));
    }

    #[test]
    fn test_cleaning_pass_handles_punctuation() {
        let result = normalize_country(Some("United States!"));
        assert_eq!(result.code.as_deref(), Some("US"));
        assert_eq!(result.unmapped, None);
    }

    #[test]
    fn test_unknown_values_return_unmapped_raw() {
        let result = normalize_country(Some("Atlantis"));
        assert_eq!(result.code, None);
        assert_eq!(result.unmapped.as_deref(), Some("Atlantis"));
    }

    #[test]
    fn test_empty_and_absent_values_are_silent() {
        assert_eq!(normalize_country(None), CountryNormalization::default());
        assert_eq!(normalize_country(Some("   ")), CountryNormalization::default());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let first = normalize_country(Some("United Kingdom")).code.unwrap();
        let again = normalize_country(Some(&first)).code.unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_case_and_punctuation_variants_agree() {
        let plain = normalize_country(Some("usa")).code;
        let shouty = normalize_country(Some("USA")).code;
        let dotted = normalize_country(Some("U.S.A.")).code;
        assert_eq!(plain.as_deref(), Some("US"));
        assert_eq!(plain, shouty);
        assert_eq!(plain, dotted);
    }
}
