//! Country and dial-code reference lists
//!
//! `value` is the ISO 3166-1 alpha-2 code and names the flag image;
//! `dial_code` is the calling code, digits only.

use crate::constants::FLAG_IMAGE_DIR;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CountryOption {
    pub label: &'static str,
    pub dial_code: &'static str,
    pub value: &'static str,
}

const fn country(label: &'static str, dial_code: &'static str, value: &'static str) -> CountryOption {
    CountryOption { label, dial_code, value }
}

pub const COUNTRY_LIST: &[CountryOption] = &[
    country("Afghanistan", "93", "AF"),
    country("Åland Islands", "358", "AX"),
    country("Albania", "355", "AL"),
    country("Algeria", "213", "DZ"),
    country("American Samoa", "1", "AS"),
    country("Andorra", "376", "AD"),
    country("Angola", "244", "AO"),
    country("Anguilla", "1", "AI"),
    country("Antarctica", "672", "AQ"),
    country("Antigua and Barbuda", "1", "AG"),
    country("Argentina", "54", "AR"),
    country("Armenia", "374", "AM"),
    country("Aruba", "297", "AW"),
    country("Australia", "61", "AU"),
    country("Austria", "43", "AT"),
    country("Azerbaijan", "994", "AZ"),
    country("Bahamas", "1", "BS"),
    country("Bahrain", "973", "BH"),
    country("Bangladesh", "880", "BD"),
    country("Barbados", "1", "BB"),
    country("Belarus", "375", "BY"),
    country("Belgium", "32", "BE"),
    country("Belize", "501", "BZ"),
    country("Benin", "229", "BJ"),
    country("Bermuda", "1", "BM"),
    country("Bhutan", "975", "BT"),
    country("Bolivia", "591", "BO"),
    country("Bonaire, Sint Eustatius and Saba", "599", "BQ"),
    country("Bosnia and Herzegovina", "387", "BA"),
    country("Botswana", "267", "BW"),
    country("Bouvet Island", "47", "BV"),
    country("Brazil", "55", "BR"),
    country("British Indian Ocean Territory", "246", "IO"),
    country("Brunei Darussalam", "673", "BN"),
    country("Bulgaria", "359", "BG"),
    country("Burkina Faso", "226", "BF"),
    country("Burundi", "257", "BI"),
    country("Cambodia", "855", "KH"),
    country("Cameroon", "237", "CM"),
    country("Canada", "1", "CA"),
    country("Cape Verde", "238", "CV"),
    country("Cayman Islands", "1", "KY"),
    country("Central African Republic", "236", "CF"),
    country("Chad", "235", "TD"),
    country("Chile", "56", "CL"),
    country("China", "86", "CN"),
    country("Christmas Island", "61", "CX"),
    country("Cocos (Keeling) Islands", "61", "CC"),
    country("Colombia", "57", "CO"),
    country("Comoros", "269", "KM"),
    country("Congo", "242", "CG"),
    country("Congo, Democratic Republic of the", "243", "CD"),
    country("Cook Islands", "682", "CK"),
    country("Costa Rica", "506", "CR"),
    country("Côte d'Ivoire", "225", "CI"),
    country("Croatia", "385", "HR"),
    country("Cuba", "53", "CU"),
    country("Curaçao", "599", "CW"),
    country("Cyprus", "357", "CY"),
    country("Czechia", "420", "CZ"),
    country("Denmark", "45", "DK"),
    country("Djibouti", "253", "DJ"),
    country("Dominica", "1", "DM"),
    country("Dominican Republic", "1", "DO"),
    country("Ecuador", "593", "EC"),
    country("Egypt", "20", "EG"),
    country("El Salvador", "503", "SV"),
    country("Equatorial Guinea", "240", "GQ"),
    country("Eritrea", "291", "ER"),
    country("Estonia", "372", "EE"),
    country("Eswatini", "268", "SZ"),
    country("Ethiopia", "251", "ET"),
    country("Falkland Islands (Malvinas)", "500", "FK"),
    country("Faroe Islands", "298", "FO"),
    country("Fiji", "679", "FJ"),
    country("Finland", "358", "FI"),
    country("France", "33", "FR"),
    country("French Guiana", "594", "GF"),
    country("French Polynesia", "689", "PF"),
    country("French Southern Territories", "262", "TF"),
    country("Gabon", "241", "GA"),
    country("Gambia", "220", "GM"),
    country("Georgia", "995", "GE"),
    country("Germany", "49", "DE"),
    country("Ghana", "233", "GH"),
    country("Gibraltar", "350", "GI"),
    country("Greece", "30", "GR"),
    country("Greenland", "299", "GL"),
    country("Grenada", "1", "GD"),
    country("Guadeloupe", "590", "GP"),
    country("Guam", "1", "GU"),
    country("Guatemala", "502", "GT"),
    country("Guernsey", "44", "GG"),
    country("Guinea", "224", "GN"),
    country("Guinea-Bissau", "245", "GW"),
    country("Guyana", "592", "GY"),
    country("Haiti", "509", "HT"),
    country("Heard Island and McDonald Islands", "672", "HM"),
    country("Holy See", "39", "VA"),
    country("Honduras", "504", "HN"),
    country("Hong Kong", "852", "HK"),
    country("Hungary", "36", "HU"),
    country("Iceland", "354", "IS"),
    country("India", "91", "IN"),
    country("Indonesia", "62", "ID"),
    country("Iran", "98", "IR"),
    country("Iraq", "964", "IQ"),
    country("Ireland", "353", "IE"),
    country("Isle of Man", "44", "IM"),
    country("Israel", "972", "IL"),
    country("Italy", "39", "IT"),
    country("Jamaica", "1", "JM"),
    country("Japan", "81", "JP"),
    country("Jersey", "44", "JE"),
    country("Jordan", "962", "JO"),
    country("Kazakhstan", "7", "KZ"),
    country("Kenya", "254", "KE"),
    country("Kiribati", "686", "KI"),
    country("Kuwait", "965", "KW"),
    country("Kyrgyzstan", "996", "KG"),
    country("Laos", "856", "LA"),
    country("Latvia", "371", "LV"),
    country("Lebanon", "961", "LB"),
    country("Lesotho", "266", "LS"),
    country("Liberia", "231", "LR"),
    country("Libya", "218", "LY"),
    country("Liechtenstein", "423", "LI"),
    country("Lithuania", "370", "LT"),
    country("Luxembourg", "352", "LU"),
    country("Macao", "853", "MO"),
    country("Madagascar", "261", "MG"),
    country("Malawi", "265", "MW"),
    country("Malaysia", "60", "MY"),
    country("Maldives", "960", "MV"),
    country("Mali", "223", "ML"),
    country("Malta", "356", "MT"),
    country("Marshall Islands", "692", "MH"),
    country("Martinique", "596", "MQ"),
    country("Mauritania", "222", "MR"),
    country("Mauritius", "230", "MU"),
    country("Mayotte", "262", "YT"),
    country("Mexico", "52", "MX"),
    country("Micronesia", "691", "FM"),
    country("Moldova", "373", "MD"),
    country("Monaco", "377", "MC"),
    country("Mongolia", "976", "MN"),
    country("Montenegro", "382", "ME"),
    country("Montserrat", "1", "MS"),
    country("Morocco", "212", "MA"),
    country("Mozambique", "258", "MZ"),
    country("Myanmar", "95", "MM"),
    country("Namibia", "264", "NA"),
    country("Nauru", "674", "NR"),
    country("Nepal", "977", "NP"),
    country("Netherlands", "31", "NL"),
    country("New Caledonia", "687", "NC"),
    country("New Zealand", "64", "NZ"),
    country("Nicaragua", "505", "NI"),
    country("Niger", "227", "NE"),
    country("Nigeria", "234", "NG"),
    country("Niue", "683", "NU"),
    country("Norfolk Island", "672", "NF"),
    country("North Korea", "850", "KP"),
    country("North Macedonia", "389", "MK"),
    country("Northern Mariana Islands", "1", "MP"),
    country("Norway", "47", "NO"),
    country("Oman", "968", "OM"),
    country("Pakistan", "92", "PK"),
    country("Palau", "680", "PW"),
    country("Palestine", "970", "PS"),
    country("Panama", "507", "PA"),
    country("Papua New Guinea", "675", "PG"),
    country("Paraguay", "595", "PY"),
    country("Peru", "51", "PE"),
    country("Philippines", "63", "PH"),
    country("Pitcairn", "64", "PN"),
    country("Poland", "48", "PL"),
    country("Portugal", "351", "PT"),
    country("Puerto Rico", "1", "PR"),
    country("Qatar", "974", "QA"),
    country("Réunion", "262", "RE"),
    country("Romania", "40", "RO"),
    country("Russia", "7", "RU"),
    country("Rwanda", "250", "RW"),
    country("Saint Barthélemy", "590", "BL"),
    country("Saint Helena, Ascension and Tristan da Cunha", "290", "SH"),
    country("Saint Kitts and Nevis", "1", "KN"),
    country("Saint Lucia", "1", "LC"),
    country("Saint Martin (French part)", "590", "MF"),
    country("Saint Pierre and Miquelon", "508", "PM"),
    country("Saint Vincent and the Grenadines", "1", "VC"),
    country("Samoa", "685", "WS"),
    country("San Marino", "378", "SM"),
    country("Sao Tome and Principe", "239", "ST"),
    country("Saudi Arabia", "966", "SA"),
    country("Senegal", "221", "SN"),
    country("Serbia", "381", "RS"),
    country("Seychelles", "248", "SC"),
    country("Sierra Leone", "232", "SL"),
    country("Singapore", "65", "SG"),
    country("Sint Maarten (Dutch part)", "1", "SX"),
    country("Slovakia", "421", "SK"),
    country("Slovenia", "386", "SI"),
    country("Solomon Islands", "677", "SB"),
    country("Somalia", "252", "SO"),
    country("South Africa", "27", "ZA"),
    country("South Georgia and the South Sandwich Islands", "500", "GS"),
    country("South Korea", "82", "KR"),
    country("South Sudan", "211", "SS"),
    country("Spain", "34", "ES"),
    country("Sri Lanka", "94", "LK"),
    country("Sudan", "249", "SD"),
    country("Suriname", "597", "SR"),
    country("Svalbard and Jan Mayen", "47", "SJ"),
    country("Sweden", "46", "SE"),
    country("Switzerland", "41", "CH"),
    country("Syria", "963", "SY"),
    country("Taiwan", "886", "TW"),
    country("Tajikistan", "992", "TJ"),
    country("Tanzania", "255", "TZ"),
    country("Thailand", "66", "TH"),
    country("Timor-Leste", "670", "TL"),
    country("Togo", "228", "TG"),
    country("Tokelau", "690", "TK"),
    country("Tonga", "676", "TO"),
    country("Trinidad and Tobago", "1", "TT"),
    country("Tunisia", "216", "TN"),
    country("Turkey", "90", "TR"),
    country("Turkmenistan", "993", "TM"),
    country("Turks and Caicos Islands", "1", "TC"),
    country("Tuvalu", "688", "TV"),
    country("Uganda", "256", "UG"),
    country("Ukraine", "380", "UA"),
    country("United Arab Emirates", "971", "AE"),
    country("United Kingdom", "44", "GB"),
    country("United States", "1", "US"),
    country("United States Minor Outlying Islands", "1", "UM"),
    country("Uruguay", "598", "UY"),
    country("Uzbekistan", "998", "UZ"),
    country("Vanuatu", "678", "VU"),
    country("Venezuela", "58", "VE"),
    country("Vietnam", "84", "VN"),
    country("Virgin Islands (British)", "1", "VG"),
    country("Virgin Islands (U.S.)", "1", "VI"),
    country("Wallis and Futuna", "681", "WF"),
    country("Western Sahara", "212", "EH"),
    country("Yemen", "967", "YE"),
    country("Zambia", "260", "ZM"),
    country("Zimbabwe", "263", "ZW"),
];

/// Which selector an option is rendered in
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectVariant {
    Country,
    Phone,
}

impl SelectVariant {
    /// Text shown for an option in this selector
    pub fn display(&self, option: &CountryOption) -> &'static str {
        match self {
            SelectVariant::Country => option.label,
            SelectVariant::Phone => option.dial_code,
        }
    }

    /// Form value stored when an option is picked
    pub fn stored_value(&self, option: &CountryOption) -> &'static str {
        match self {
            SelectVariant::Country => option.value,
            SelectVariant::Phone => option.dial_code,
        }
    }

    /// Options offered, in display order
    pub fn options(&self) -> Vec<CountryOption> {
        match self {
            SelectVariant::Country => COUNTRY_LIST.to_vec(),
            SelectVariant::Phone => dial_code_list(),
        }
    }

    /// Position of the option currently holding `stored`
    pub fn position_of(&self, stored: &str) -> Option<usize> {
        self.options()
            .iter()
            .position(|o| self.stored_value(o) == stored)
    }
}

/// Main country for dial codes several countries share
const PRIMARY_REGIONS: &[(&str, &str)] = &[
    ("1", "US"),
    ("7", "RU"),
    ("39", "IT"),
    ("44", "GB"),
    ("47", "NO"),
    ("61", "AU"),
    ("64", "NZ"),
    ("212", "MA"),
    ("262", "RE"),
    ("358", "FI"),
    ("500", "FK"),
    ("590", "GP"),
    ("599", "CW"),
    ("672", "NF"),
];

/// Country list relabelled by dial code, one entry per distinct code
///
/// Each code keeps the position of its first country and is represented
/// by [`find_dial_code`].
pub fn dial_code_list() -> Vec<CountryOption> {
    let mut seen: Vec<&str> = Vec::new();
    COUNTRY_LIST
        .iter()
        .filter(|c| {
            if seen.contains(&c.dial_code) {
                false
            } else {
                seen.push(c.dial_code);
                true
            }
        })
        .filter_map(|c| find_dial_code(c.dial_code))
        .map(|c| CountryOption {
            label: c.dial_code,
            ..*c
        })
        .collect()
}

pub fn find_country(value: &str) -> Option<&'static CountryOption> {
    COUNTRY_LIST.iter().find(|c| c.value == value)
}

/// Country representing a dial code
pub fn find_dial_code(dial_code: &str) -> Option<&'static CountryOption> {
    let primary = PRIMARY_REGIONS
        .iter()
        .find(|(code, _)| *code == dial_code)
        .and_then(|(_, value)| find_country(value));
    primary.or_else(|| COUNTRY_LIST.iter().find(|c| c.dial_code == dial_code))
}

pub fn is_country(value: &str) -> bool {
    find_country(value).is_some()
}

pub fn is_dial_code(dial_code: &str) -> bool {
    find_dial_code(dial_code).is_some()
}

pub fn flag_path(value: &str) -> String {
    format!("{}/{}.png", FLAG_IMAGE_DIR, value)
}

/// Collapsed state of a selector: the selected value and its flag
#[derive(Clone, Debug, PartialEq)]
pub struct SelectControl {
    pub display: String,
    pub flag: Option<String>,
}

impl SelectControl {
    pub fn for_value(variant: SelectVariant, stored: &str) -> SelectControl {
        let selected = match variant {
            SelectVariant::Country => find_country(stored),
            SelectVariant::Phone => find_dial_code(stored),
        };
        match selected {
            Some(option) => SelectControl {
                display: variant.display(option).to_string(),
                flag: Some(flag_path(option.value)),
            },
            None => SelectControl {
                display: stored.to_string(),
                flag: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dial_code_control_shows_code_and_flag() {
        let control = SelectControl::for_value(SelectVariant::Phone, "1");
        assert_eq!(control.display, "1");
        let option = find_dial_code("1").unwrap();
        assert_eq!(control.flag, Some(format!("/img/countries/{}.png", option.value)));
    }

    #[test]
    fn test_country_control_shows_label() {
        let control = SelectControl::for_value(SelectVariant::Country, "PT");
        assert_eq!(control.display, "Portugal");
        assert_eq!(control.flag.as_deref(), Some("/img/countries/PT.png"));
    }

    #[test]
    fn test_unknown_value_has_no_flag() {
        let control = SelectControl::for_value(SelectVariant::Country, "ZZ");
        assert_eq!(control.display, "ZZ");
        assert!(control.flag.is_none());
    }

    #[test]
    fn test_dial_code_list_is_deduplicated() {
        let list = dial_code_list();
        assert_eq!(list.iter().filter(|o| o.dial_code == "1").count(), 1);
        assert!(list.iter().all(|o| o.label == o.dial_code));
    }

    #[test]
    fn test_membership() {
        assert!(is_country("BR"));
        assert!(!is_country("Brazil"));
        assert!(is_dial_code("55"));
        assert!(!is_dial_code("+55"));
        assert!(is_country("NG"));
        assert!(is_dial_code("234"));
        assert!(is_country("RU"));
        assert!(is_dial_code("7"));
    }

    #[test]
    fn test_list_has_unique_codes() {
        let mut values: Vec<&str> = COUNTRY_LIST.iter().map(|c| c.value).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), COUNTRY_LIST.len());
        assert!(COUNTRY_LIST.len() >= 249);
        assert!(COUNTRY_LIST
            .iter()
            .all(|c| c.value.len() == 2 && c.dial_code.chars().all(|ch| ch.is_ascii_digit())));
    }

    #[test]
    fn test_shared_dial_code_uses_main_country() {
        assert_eq!(find_dial_code("1").unwrap().value, "US");
        assert_eq!(find_dial_code("7").unwrap().value, "RU");
        assert_eq!(find_dial_code("44").unwrap().value, "GB");
        assert_eq!(find_dial_code("234").unwrap().value, "NG");

        let list = dial_code_list();
        let one = list.iter().find(|o| o.dial_code == "1").unwrap();
        assert_eq!(one.value, "US");
    }
}
