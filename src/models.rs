use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HTTP method used by a service wrapper
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
        }
    }
}

/// Fields of the profile form, in display order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Img,
    #[default]
    FirstName,
    LastName,
    Email,
    DialCode,
    PhoneNumber,
    Country,
    Address,
    City,
    Postcode,
}

impl ProfileField {
    pub const ALL: [ProfileField; 10] = [
        ProfileField::Img,
        ProfileField::FirstName,
        ProfileField::LastName,
        ProfileField::Email,
        ProfileField::DialCode,
        ProfileField::PhoneNumber,
        ProfileField::Country,
        ProfileField::Address,
        ProfileField::City,
        ProfileField::Postcode,
    ];

    /// JSON key used by the account API
    pub fn key(&self) -> &'static str {
        match self {
            ProfileField::Img => "img",
            ProfileField::FirstName => "firstName",
            ProfileField::LastName => "lastName",
            ProfileField::Email => "email",
            ProfileField::DialCode => "dialCode",
            ProfileField::PhoneNumber => "phoneNumber",
            ProfileField::Country => "country",
            ProfileField::Address => "address",
            ProfileField::City => "city",
            ProfileField::Postcode => "postcode",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Img => "Avatar",
            ProfileField::FirstName => "First name",
            ProfileField::LastName => "Last name",
            ProfileField::Email => "E-mail",
            ProfileField::DialCode => "Dial code",
            ProfileField::PhoneNumber => "Mobile number",
            ProfileField::Country => "Country",
            ProfileField::Address => "Address",
            ProfileField::City => "City",
            ProfileField::Postcode => "Postcode",
        }
    }

    pub fn next(&self) -> ProfileField {
        let idx = self.index();
        ProfileField::ALL[(idx + 1) % ProfileField::ALL.len()]
    }

    pub fn prev(&self) -> ProfileField {
        let idx = self.index();
        ProfileField::ALL[(idx + ProfileField::ALL.len() - 1) % ProfileField::ALL.len()]
    }

    /// Fields chosen from a reference list instead of typed
    pub fn is_select(&self) -> bool {
        matches!(self, ProfileField::DialCode | ProfileField::Country)
    }

    fn index(&self) -> usize {
        ProfileField::ALL
            .iter()
            .position(|f| f == self)
            .unwrap_or(0)
    }
}

/// The flat user profile served by `/settings/profile/`
///
/// Missing keys deserialize to empty strings; unknown keys are kept in
/// `extra` so a wholesale re-submit never drops server data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub dial_code: String,
    pub phone_number: String,
    pub img: String,
    pub country: String,
    pub address: String,
    pub postcode: String,
    pub city: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProfileRecord {
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Img => &self.img,
            ProfileField::FirstName => &self.first_name,
            ProfileField::LastName => &self.last_name,
            ProfileField::Email => &self.email,
            ProfileField::DialCode => &self.dial_code,
            ProfileField::PhoneNumber => &self.phone_number,
            ProfileField::Country => &self.country,
            ProfileField::Address => &self.address,
            ProfileField::City => &self.city,
            ProfileField::Postcode => &self.postcode,
        }
    }

    pub fn get_mut(&mut self, field: ProfileField) -> &mut String {
        match field {
            ProfileField::Img => &mut self.img,
            ProfileField::FirstName => &mut self.first_name,
            ProfileField::LastName => &mut self.last_name,
            ProfileField::Email => &mut self.email,
            ProfileField::DialCode => &mut self.dial_code,
            ProfileField::PhoneNumber => &mut self.phone_number,
            ProfileField::Country => &mut self.country,
            ProfileField::Address => &mut self.address,
            ProfileField::City => &mut self.city,
            ProfileField::Postcode => &mut self.postcode,
        }
    }

    /// Edited fields over `self`; keys only the server knows survive
    pub fn merged_with(&self, edited: &ProfileRecord) -> ProfileRecord {
        let mut merged = self.clone();
        for field in ProfileField::ALL {
            *merged.get_mut(field) = edited.get(field).to_string();
        }
        for (key, value) in &edited.extra {
            merged.extra.insert(key.clone(), value.clone());
        }
        merged
    }
}

/// The signed-in identity, as returned by sign-in and `/userauth/userinfo`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionUser {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub authority: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionUser {
    /// Overlay the non-empty values of `other` onto `self`
    pub fn refresh_from(&mut self, other: SessionUser) {
        if other.user_id.is_some() {
            self.user_id = other.user_id;
        }
        if other.user_name.is_some() {
            self.user_name = other.user_name;
        }
        if other.email.is_some() {
            self.email = other.email;
        }
        if other.avatar.is_some() {
            self.avatar = other.avatar;
        }
        if !other.authority.is_empty() {
            self.authority = other.authority;
        }
        self.extra.extend(other.extra);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignInCredential {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpCredential {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForgotPassword {
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResetPassword {
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignInResponse {
    pub token: String,
    pub user: SessionUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_missing_keys_default_to_empty() {
        let record: ProfileRecord =
            serde_json::from_str(r#"{"firstName":"Ana","id":"42"}"#).unwrap();
        assert_eq!(record.first_name, "Ana");
        assert_eq!(record.city, "");
        assert_eq!(record.extra.get("id"), Some(&Value::String("42".into())));
    }

    #[test]
    fn test_profile_serializes_camel_case_and_extra() {
        let mut record = ProfileRecord {
            phone_number: "912345678".into(),
            ..Default::default()
        };
        record.extra.insert("id".into(), Value::from(7));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["phoneNumber"], "912345678");
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn test_merge_keeps_previous_extra_keys() {
        let mut previous = ProfileRecord {
            first_name: "Old".into(),
            ..Default::default()
        };
        previous.extra.insert("id".into(), Value::from("u-1"));
        let edited = ProfileRecord {
            first_name: "New".into(),
            city: "Lisboa".into(),
            ..Default::default()
        };

        let merged = previous.merged_with(&edited);
        assert_eq!(merged.first_name, "New");
        assert_eq!(merged.city, "Lisboa");
        assert_eq!(merged.extra.get("id"), Some(&Value::from("u-1")));
    }

    #[test]
    fn test_field_cycle_wraps() {
        assert_eq!(ProfileField::Postcode.next(), ProfileField::Img);
        assert_eq!(ProfileField::Img.prev(), ProfileField::Postcode);
    }

    #[test]
    fn test_session_user_refresh_keeps_known_values() {
        let mut user = SessionUser {
            user_name: Some("ana".into()),
            email: Some("ana@example.com".into()),
            ..Default::default()
        };
        user.refresh_from(SessionUser {
            avatar: Some("/img/avatars/ana.png".into()),
            ..Default::default()
        });
        assert_eq!(user.user_name.as_deref(), Some("ana"));
        assert_eq!(user.avatar.as_deref(), Some("/img/avatars/ana.png"));
    }
}
