//! Client-side rules for the profile form
//!
//! Every field carries an ordered rule list; the first failing rule names
//! the message shown beside the input.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::countries;
use crate::models::{ProfileField, ProfileRecord};

/// Allowed avatar image extensions
const AVATAR_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

pub const AVATAR_TYPE_MESSAGE: &str = "Please upload a .jpeg or .png file!";

#[derive(Clone, Copy, Debug, PartialEq)]
enum Rule {
    Required(&'static str),
    Email(&'static str),
    OneOfCountries(&'static str),
    OneOfDialCodes(&'static str),
}

impl Rule {
    fn check(&self, value: &str) -> Result<(), &'static str> {
        let ok = match self {
            Rule::Required(_) => !value.is_empty(),
            Rule::Email(_) => is_email(value),
            Rule::OneOfCountries(_) => countries::is_country(value),
            Rule::OneOfDialCodes(_) => countries::is_dial_code(value),
        };
        if ok {
            Ok(())
        } else {
            Err(self.message())
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Rule::Required(m) | Rule::Email(m) | Rule::OneOfCountries(m) | Rule::OneOfDialCodes(m) => *m,
        }
    }
}

fn rules_for(field: ProfileField) -> &'static [Rule] {
    match field {
        ProfileField::FirstName => &[Rule::Required("First name required")],
        ProfileField::LastName => &[Rule::Required("Last name required")],
        ProfileField::Email => &[
            Rule::Required("Email required"),
            Rule::Email("Invalid email"),
        ],
        ProfileField::DialCode => &[Rule::OneOfDialCodes("Please select your country code")],
        ProfileField::PhoneNumber => &[Rule::Required("Please input your mobile number")],
        ProfileField::Country => &[Rule::OneOfCountries("Please select a country")],
        ProfileField::Address => &[Rule::Required("Address required")],
        ProfileField::Postcode => &[Rule::Required("Postcode required")],
        ProfileField::City => &[Rule::Required("City required")],
        ProfileField::Img => &[],
    }
}

/// Validity of one field
#[derive(Clone, Debug, PartialEq)]
pub struct FieldState {
    pub valid: bool,
    pub message: Option<&'static str>,
}

/// Per-field outcome of validating a candidate record
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ValidationReport {
    fields: HashMap<ProfileField, FieldState>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(|s| s.valid)
    }

    pub fn field(&self, field: ProfileField) -> Option<&FieldState> {
        self.fields.get(&field)
    }

    pub fn is_field_valid(&self, field: ProfileField) -> bool {
        self.fields.get(&field).map(|s| s.valid).unwrap_or(true)
    }

    pub fn message(&self, field: ProfileField) -> Option<&'static str> {
        self.fields.get(&field).and_then(|s| s.message)
    }

    /// First invalid field in display order
    pub fn first_invalid(&self) -> Option<ProfileField> {
        ProfileField::ALL
            .iter()
            .copied()
            .find(|f| !self.is_field_valid(*f))
    }
}

pub fn validate_field(field: ProfileField, value: &str) -> FieldState {
    let failure = rules_for(field)
        .iter()
        .find_map(|rule| rule.check(value).err());
    FieldState {
        valid: failure.is_none(),
        message: failure,
    }
}

pub fn validate_profile(record: &ProfileRecord) -> ValidationReport {
    let fields = ProfileField::ALL
        .iter()
        .map(|f| (*f, validate_field(*f, record.get(*f))))
        .collect();
    ValidationReport { fields }
}

/// Email shape check: `local@label.label.tld`, case-insensitive
pub fn is_email(value: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL.get_or_init(|| {
        Regex::new(r"(?i)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$").unwrap()
    });
    !value.starts_with('.') && !value.contains("..") && re.is_match(value)
}

/// Check an avatar path picked for upload
pub fn check_avatar_path(path: &str) -> Result<(), &'static str> {
    let ext = std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if AVATAR_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(AVATAR_TYPE_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_record() -> ProfileRecord {
        ProfileRecord {
            first_name: "Ana".into(),
            last_name: "Souza".into(),
            email: "ana.souza@example.com".into(),
            dial_code: "55".into(),
            phone_number: "11987654321".into(),
            img: String::new(),
            country: "BR".into(),
            address: "Rua das Flores, 100".into(),
            postcode: "01000-000".into(),
            city: "São Paulo".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_record_passes() {
        let report = validate_profile(&valid_record());
        assert!(report.is_valid());
        assert_eq!(report.first_invalid(), None);
    }

    #[test]
    fn test_each_missing_required_field_is_flagged() {
        for field in ProfileField::ALL {
            if field == ProfileField::Img {
                continue;
            }
            let mut record = valid_record();
            record.get_mut(field).clear();
            let report = validate_profile(&record);
            assert!(!report.is_valid(), "{:?} should invalidate the form", field);
            assert!(!report.is_field_valid(field));
            assert!(report.message(field).is_some());
            assert_eq!(report.first_invalid(), Some(field));
        }
    }

    #[test]
    fn test_bad_email_is_invalid() {
        let mut record = valid_record();
        record.email = "not-an-email".into();
        let report = validate_profile(&record);
        assert_eq!(report.message(ProfileField::Email), Some("Invalid email"));
        assert!(!report.is_valid());
    }

    #[test]
    fn test_empty_email_reports_required_first() {
        assert_eq!(
            validate_field(ProfileField::Email, "").message,
            Some("Email required")
        );
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_email("a@b.co"));
        assert!(is_email("First.Last+tag@sub.example.org"));
        assert!(!is_email("a@b"));
        assert!(!is_email(".a@b.com"));
        assert!(!is_email("a..b@c.com"));
        assert!(!is_email("a.@b.com"));
        assert!(!is_email("a b@c.com"));
        assert!(!is_email("a@-b.com"));
    }

    #[test]
    fn test_reference_list_membership() {
        let mut record = valid_record();
        record.country = "Atlantis".into();
        record.dial_code = "+55".into();
        let report = validate_profile(&record);
        assert_eq!(report.message(ProfileField::Country), Some("Please select a country"));
        assert_eq!(
            report.message(ProfileField::DialCode),
            Some("Please select your country code")
        );
        assert_eq!(report.first_invalid(), Some(ProfileField::DialCode));
    }

    #[test]
    fn test_records_from_any_listed_country_pass() {
        for (country, dial_code) in [("NG", "234"), ("RU", "7"), ("KZ", "7"), ("AX", "358")] {
            let mut record = valid_record();
            record.country = country.into();
            record.dial_code = dial_code.into();
            assert!(validate_profile(&record).is_valid(), "{} should validate", country);
        }
    }

    #[test]
    fn test_avatar_is_optional() {
        let mut record = valid_record();
        record.img.clear();
        assert!(validate_profile(&record).is_field_valid(ProfileField::Img));
    }

    #[test]
    fn test_avatar_extension_check() {
        assert!(check_avatar_path("/tmp/me.PNG").is_ok());
        assert!(check_avatar_path("me.jpeg").is_ok());
        assert_eq!(check_avatar_path("me.gif"), Err(AVATAR_TYPE_MESSAGE));
        assert_eq!(check_avatar_path("noext"), Err(AVATAR_TYPE_MESSAGE));
    }
}
