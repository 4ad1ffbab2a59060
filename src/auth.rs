//! Authentication screens: sign in, sign up, forgot and reset password

use crate::messages::NetworkCommand;
use crate::models::{ForgotPassword, ResetPassword, SignInCredential, SignUpCredential};
use crate::validation::is_email;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AuthScreen {
    SignIn,
    SignUp,
    ForgotPassword,
    ResetPassword,
}

impl AuthScreen {
    pub fn title(&self) -> &'static str {
        match self {
            AuthScreen::SignIn => "Welcome back!",
            AuthScreen::SignUp => "Sign up",
            AuthScreen::ForgotPassword => "Forgot password",
            AuthScreen::ResetPassword => "Set new password",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            AuthScreen::SignIn => "Please enter your credentials to sign in!",
            AuthScreen::SignUp => "And let's get started with your account",
            AuthScreen::ForgotPassword => "Enter your email and we'll send you a reset link",
            AuthScreen::ResetPassword => "Your new password must be different from the previous one",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self {
            AuthScreen::SignIn => "Sign in",
            AuthScreen::SignUp => "Sign up",
            AuthScreen::ForgotPassword => "Send email",
            AuthScreen::ResetPassword => "Submit",
        }
    }

    /// Other auth screens reachable from this one, with their key
    pub fn links(&self) -> &'static [(char, &'static str, AuthScreen)] {
        match self {
            AuthScreen::SignIn => &[
                ('f', "Forgot password?", AuthScreen::ForgotPassword),
                ('u', "New here? Sign up", AuthScreen::SignUp),
                ('r', "Have a reset code? Reset password", AuthScreen::ResetPassword),
            ],
            AuthScreen::SignUp => &[('b', "Already have an account? Sign in", AuthScreen::SignIn)],
            AuthScreen::ForgotPassword | AuthScreen::ResetPassword => {
                &[('b', "Back to sign in", AuthScreen::SignIn)]
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AuthFieldKind {
    UserName,
    Email,
    Password,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthField {
    pub kind: AuthFieldKind,
    pub value: String,
}

impl AuthField {
    fn new(kind: AuthFieldKind) -> Self {
        AuthField {
            kind,
            value: String::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self.kind {
            AuthFieldKind::UserName => "User name",
            AuthFieldKind::Email => "Email",
            AuthFieldKind::Password => "Password",
        }
    }

    pub fn is_masked(&self) -> bool {
        self.kind == AuthFieldKind::Password
    }

    /// Value as drawn on screen
    pub fn display(&self) -> String {
        if self.is_masked() {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    fn check(&self) -> Result<(), &'static str> {
        match self.kind {
            AuthFieldKind::UserName if self.value.trim().is_empty() => Err("Please enter your user name"),
            AuthFieldKind::Email if self.value.is_empty() => Err("Please enter your email"),
            AuthFieldKind::Email if !is_email(&self.value) => Err("Invalid email"),
            AuthFieldKind::Password if self.value.is_empty() => Err("Please enter your password"),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthForm {
    pub screen: AuthScreen,
    pub fields: Vec<AuthField>,
    pub focused: usize,
    pub error: Option<(usize, &'static str)>,
    submitting: bool,
}

impl AuthForm {
    pub fn new(screen: AuthScreen) -> Self {
        use AuthFieldKind::*;
        let kinds: &[AuthFieldKind] = match screen {
            AuthScreen::SignIn => &[Email, Password],
            AuthScreen::SignUp => &[UserName, Email, Password],
            AuthScreen::ForgotPassword => &[Email],
            AuthScreen::ResetPassword => &[Password],
        };
        AuthForm {
            screen,
            fields: kinds.iter().copied().map(AuthField::new).collect(),
            focused: 0,
            error: None,
            submitting: false,
        }
    }

    /// Sign-in form with a remembered email already filled in
    pub fn sign_in(remembered_email: Option<&str>) -> Self {
        let mut form = AuthForm::new(AuthScreen::SignIn);
        if let Some(email) = remembered_email {
            form.fields[0].value = email.to_string();
            form.focused = 1;
        }
        form
    }

    pub fn is_busy(&self) -> bool {
        self.submitting
    }

    pub fn value(&self, kind: AuthFieldKind) -> &str {
        self.fields
            .iter()
            .find(|f| f.kind == kind)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub fn focused_value(&self) -> &str {
        self.fields
            .get(self.focused)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub fn focused_value_mut(&mut self) -> Option<&mut String> {
        self.error = None;
        self.fields.get_mut(self.focused).map(|f| &mut f.value)
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = self.focused.checked_sub(1).unwrap_or(self.fields.len() - 1);
        }
    }

    /// Validate and build the request; `None` when busy or invalid
    pub fn submit(&mut self, id: u64) -> Option<NetworkCommand> {
        if self.submitting {
            return None;
        }
        if let Some((idx, message)) = self
            .fields
            .iter()
            .enumerate()
            .find_map(|(i, f)| f.check().err().map(|m| (i, m)))
        {
            self.focused = idx;
            self.error = Some((idx, message));
            return None;
        }

        self.error = None;
        self.submitting = true;
        Some(self.command(id))
    }

    pub fn finish(&mut self) {
        self.submitting = false;
    }

    fn command(&self, id: u64) -> NetworkCommand {
        let email = self.value(AuthFieldKind::Email).to_string();
        let password = self.value(AuthFieldKind::Password).to_string();
        match self.screen {
            AuthScreen::SignIn => NetworkCommand::SignIn {
                id,
                credential: SignInCredential { email, password },
            },
            AuthScreen::SignUp => NetworkCommand::SignUp {
                id,
                credential: SignUpCredential {
                    user_name: self.value(AuthFieldKind::UserName).trim().to_string(),
                    email,
                    password,
                },
            },
            AuthScreen::ForgotPassword => NetworkCommand::ForgotPassword {
                id,
                payload: ForgotPassword { email },
            },
            AuthScreen::ResetPassword => NetworkCommand::ResetPassword {
                id,
                payload: ResetPassword { password },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(form: &mut AuthForm, values: &[&str]) {
        for (field, value) in form.fields.iter_mut().zip(values) {
            field.value = value.to_string();
        }
    }

    #[test]
    fn test_sign_in_builds_credentials() {
        let mut form = AuthForm::new(AuthScreen::SignIn);
        fill(&mut form, &["ana@example.com", "s3cret"]);
        match form.submit(7) {
            Some(NetworkCommand::SignIn { id, credential }) => {
                assert_eq!(id, 7);
                assert_eq!(credential.email, "ana@example.com");
                assert_eq!(credential.password, "s3cret");
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(form.is_busy());
        assert!(form.submit(8).is_none());
        form.finish();
        assert!(form.submit(9).is_some());
    }

    #[test]
    fn test_missing_password_focuses_field() {
        let mut form = AuthForm::new(AuthScreen::SignIn);
        fill(&mut form, &["ana@example.com", ""]);
        assert!(form.submit(1).is_none());
        assert_eq!(form.focused, 1);
        assert_eq!(form.error, Some((1, "Please enter your password")));
        assert!(!form.is_busy());
    }

    #[test]
    fn test_sign_up_rejects_bad_email() {
        let mut form = AuthForm::new(AuthScreen::SignUp);
        fill(&mut form, &["ana", "ana-at-example", "pw"]);
        assert!(form.submit(1).is_none());
        assert_eq!(form.error, Some((1, "Invalid email")));
    }

    #[test]
    fn test_sign_up_builds_registration() {
        let mut form = AuthForm::new(AuthScreen::SignUp);
        fill(&mut form, &[" ana ", "ana@example.com", "pw"]);
        match form.submit(2) {
            Some(NetworkCommand::SignUp { credential, .. }) => {
                assert_eq!(credential.user_name, "ana");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_remembered_email_prefills() {
        let form = AuthForm::sign_in(Some("ana@example.com"));
        assert_eq!(form.value(AuthFieldKind::Email), "ana@example.com");
        assert_eq!(form.focused, 1);
    }

    #[test]
    fn test_password_is_masked() {
        let mut form = AuthForm::new(AuthScreen::ResetPassword);
        fill(&mut form, &["abc"]);
        assert_eq!(form.fields[0].display(), "***");
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = AuthForm::new(AuthScreen::SignUp);
        form.prev_field();
        assert_eq!(form.focused, 2);
        form.next_field();
        assert_eq!(form.focused, 0);
    }
}
