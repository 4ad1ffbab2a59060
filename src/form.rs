//! Profile form binding: draft edits, live validation and submit gating

use crate::models::{ProfileField, ProfileRecord};
use crate::validation::{self, ValidationReport};

/// Result of asking the form to submit
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// A save is already in flight
    Busy,
    /// Rules failed; focus moved to this field
    Invalid(ProfileField),
    /// Merged record ready for the save operation
    Ready(ProfileRecord),
}

#[derive(Clone, Debug, Default)]
pub struct ProfileForm {
    saved: Option<ProfileRecord>,
    draft: ProfileRecord,
    report: ValidationReport,
    pub focused: ProfileField,
    submit_attempted: bool,
    submitting: bool,
}

impl ProfileForm {
    pub fn new() -> Self {
        let mut form = ProfileForm::default();
        form.revalidate();
        form
    }

    /// Load a freshly fetched record as both cache and draft
    pub fn reset(&mut self, record: ProfileRecord) {
        self.draft = record.clone();
        self.saved = Some(record);
        self.submit_attempted = false;
        self.revalidate();
    }

    /// Throw away edits and go back to the cached record
    pub fn reset_to_saved(&mut self) {
        if let Some(saved) = self.saved.clone() {
            self.reset(saved);
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.saved.is_some()
    }

    pub fn saved(&self) -> Option<&ProfileRecord> {
        self.saved.as_ref()
    }

    pub fn draft(&self) -> &ProfileRecord {
        &self.draft
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn is_busy(&self) -> bool {
        self.submitting
    }

    pub fn value(&self, field: ProfileField) -> &str {
        self.draft.get(field)
    }

    /// Whether `c` may be typed into `field`
    pub fn accepts(field: ProfileField, c: char) -> bool {
        match field {
            ProfileField::PhoneNumber => c.is_ascii_digit(),
            ProfileField::DialCode | ProfileField::Country => false,
            _ => !c.is_control(),
        }
    }

    /// Apply an edit to one field and re-run validation
    pub fn edit<F>(&mut self, field: ProfileField, f: F)
    where
        F: FnOnce(&mut String),
    {
        f(self.draft.get_mut(field));
        self.revalidate();
    }

    pub fn set_value(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        self.edit(field, |s| *s = value);
    }

    /// Set the avatar from a picked image path
    pub fn set_avatar(&mut self, path: &str) -> Result<(), &'static str> {
        validation::check_avatar_path(path)?;
        self.set_value(ProfileField::Img, path);
        Ok(())
    }

    pub fn remove_avatar(&mut self) {
        self.set_value(ProfileField::Img, "");
    }

    /// Message shown beside `field`, once a submit has been attempted
    pub fn visible_message(&self, field: ProfileField) -> Option<&'static str> {
        if self.submit_attempted {
            self.report.message(field)
        } else {
            None
        }
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        if self.submitting {
            return SubmitOutcome::Busy;
        }
        self.submit_attempted = true;
        if let Some(field) = self.report.first_invalid() {
            self.focused = field;
            return SubmitOutcome::Invalid(field);
        }

        self.submitting = true;
        let merged = match &self.saved {
            Some(saved) => saved.merged_with(&self.draft),
            None => self.draft.clone(),
        };
        SubmitOutcome::Ready(merged)
    }

    /// The save resolved: cache the merged record
    pub fn finish_submit(&mut self, saved: ProfileRecord) {
        self.submitting = false;
        self.saved = Some(saved);
    }

    /// The save rejected: keep the cache and the draft as they are
    pub fn fail_submit(&mut self) {
        self.submitting = false;
    }

    fn revalidate(&mut self) {
        self.report = validation::validate_profile(&self.draft);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn fetched() -> ProfileRecord {
        let mut record = ProfileRecord {
            first_name: "Ana".into(),
            last_name: "Souza".into(),
            email: "ana@example.com".into(),
            dial_code: "55".into(),
            phone_number: "11987654321".into(),
            img: "/img/avatars/ana.png".into(),
            country: "BR".into(),
            address: "Rua das Flores, 100".into(),
            postcode: "01000-000".into(),
            city: "São Paulo".into(),
            ..Default::default()
        };
        record.extra.insert("id".into(), Value::from("user-1"));
        record
    }

    #[test]
    fn test_new_form_is_invalid() {
        let form = ProfileForm::new();
        assert!(!form.report().is_valid());
        assert!(!form.is_loaded());
    }

    #[test]
    fn test_submit_merges_edits_over_previous() {
        let mut form = ProfileForm::new();
        form.reset(fetched());
        form.set_value(ProfileField::City, "Lisboa");
        form.set_value(ProfileField::Country, "PT");
        form.set_value(ProfileField::DialCode, "351");

        let merged = match form.submit() {
            SubmitOutcome::Ready(record) => record,
            other => panic!("unexpected outcome {:?}", other),
        };

        let mut expected = fetched();
        expected.city = "Lisboa".into();
        expected.country = "PT".into();
        expected.dial_code = "351".into();
        assert_eq!(merged, expected);
        assert!(form.is_busy());

        form.finish_submit(merged.clone());
        assert!(!form.is_busy());
        assert_eq!(form.saved(), Some(&merged));
    }

    #[test]
    fn test_second_submit_while_busy_is_noop() {
        let mut form = ProfileForm::new();
        form.reset(fetched());
        assert!(matches!(form.submit(), SubmitOutcome::Ready(_)));
        assert_eq!(form.submit(), SubmitOutcome::Busy);
        form.fail_submit();
        assert!(matches!(form.submit(), SubmitOutcome::Ready(_)));
    }

    #[test]
    fn test_invalid_submit_focuses_first_bad_field() {
        let mut form = ProfileForm::new();
        form.reset(fetched());
        assert_eq!(form.visible_message(ProfileField::Email), None);

        form.set_value(ProfileField::Email, "not-an-email");
        form.set_value(ProfileField::Postcode, "");
        assert_eq!(form.submit(), SubmitOutcome::Invalid(ProfileField::Email));
        assert_eq!(form.focused, ProfileField::Email);
        assert!(!form.is_busy());
        assert_eq!(form.visible_message(ProfileField::Email), Some("Invalid email"));
        assert_eq!(form.visible_message(ProfileField::Postcode), Some("Postcode required"));
    }

    #[test]
    fn test_edits_revalidate_immediately() {
        let mut form = ProfileForm::new();
        form.reset(fetched());
        form.edit(ProfileField::FirstName, |s| s.clear());
        assert!(!form.report().is_field_valid(ProfileField::FirstName));
        form.edit(ProfileField::FirstName, |s| s.push('B'));
        assert!(form.report().is_valid());
    }

    #[test]
    fn test_failed_save_keeps_cache() {
        let mut form = ProfileForm::new();
        form.reset(fetched());
        form.set_value(ProfileField::City, "Porto");
        let _ = form.submit();
        form.fail_submit();
        assert_eq!(form.saved().map(|r| r.city.as_str()), Some("São Paulo"));
        assert_eq!(form.value(ProfileField::City), "Porto");
    }

    #[test]
    fn test_avatar_upload_and_remove() {
        let mut form = ProfileForm::new();
        form.reset(fetched());
        assert!(form.set_avatar("me.gif").is_err());
        assert_eq!(form.value(ProfileField::Img), "/img/avatars/ana.png");
        assert!(form.set_avatar("/home/ana/me.jpg").is_ok());
        assert_eq!(form.value(ProfileField::Img), "/home/ana/me.jpg");
        form.remove_avatar();
        assert_eq!(form.value(ProfileField::Img), "");
        assert!(form.report().is_valid());
    }

    #[test]
    fn test_phone_accepts_digits_only() {
        assert!(ProfileForm::accepts(ProfileField::PhoneNumber, '7'));
        assert!(!ProfileForm::accepts(ProfileField::PhoneNumber, 'a'));
        assert!(!ProfileForm::accepts(ProfileField::Country, 'a'));
        assert!(ProfileForm::accepts(ProfileField::City, 'ã'));
    }
}
