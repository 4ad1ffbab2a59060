//! Network messages - communication between App and Network layers

use crate::models::{
    ForgotPassword, ProfileRecord, ResetPassword, SessionUser, SignInCredential, SignInResponse,
    SignUpCredential,
};

/// Remote operations, named for logs and alerts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    SignIn,
    SignOut,
    SignUp,
    ForgotPassword,
    ResetPassword,
    UserInfo,
    FetchProfile,
    SaveProfile,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::SignIn => "sign in",
            Operation::SignOut => "sign out",
            Operation::SignUp => "sign up",
            Operation::ForgotPassword => "forgot password",
            Operation::ResetPassword => "reset password",
            Operation::UserInfo => "user info",
            Operation::FetchProfile => "fetch profile",
            Operation::SaveProfile => "save profile",
        }
    }
}

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    SignIn {
        id: u64,
        credential: SignInCredential,
    },
    SignUp {
        id: u64,
        credential: SignUpCredential,
    },
    ForgotPassword {
        id: u64,
        payload: ForgotPassword,
    },
    ResetPassword {
        id: u64,
        payload: ResetPassword,
    },
    SignOut {
        id: u64,
        token: Option<String>,
    },
    FetchUserInfo {
        id: u64,
        token: Option<String>,
    },
    FetchProfile {
        id: u64,
        token: Option<String>,
    },
    /// Save the merged profile (simulated latency, no remote call)
    SaveProfile {
        id: u64,
        record: ProfileRecord,
    },

    /// Shutdown the network actor
    Shutdown,
}

impl NetworkCommand {
    pub fn id(&self) -> Option<u64> {
        match self {
            NetworkCommand::SignIn { id, .. }
            | NetworkCommand::SignUp { id, .. }
            | NetworkCommand::ForgotPassword { id, .. }
            | NetworkCommand::ResetPassword { id, .. }
            | NetworkCommand::SignOut { id, .. }
            | NetworkCommand::FetchUserInfo { id, .. }
            | NetworkCommand::FetchProfile { id, .. }
            | NetworkCommand::SaveProfile { id, .. } => Some(*id),
            NetworkCommand::Shutdown => None,
        }
    }
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    SignedIn {
        id: u64,
        response: SignInResponse,
    },
    /// A call whose payload the client does not use succeeded
    Completed {
        id: u64,
        operation: Operation,
    },
    UserInfo {
        id: u64,
        user: SessionUser,
    },
    Profile {
        id: u64,
        record: ProfileRecord,
    },
    ProfileSaved {
        id: u64,
        record: ProfileRecord,
    },
    Error {
        id: u64,
        operation: Operation,
        status: Option<u16>,
        message: String,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::SignedIn { id, .. } => *id,
            NetworkResponse::Completed { id, .. } => *id,
            NetworkResponse::UserInfo { id, .. } => *id,
            NetworkResponse::Profile { id, .. } => *id,
            NetworkResponse::ProfileSaved { id, .. } => *id,
            NetworkResponse::Error { id, .. } => *id,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, NetworkResponse::Error { status: Some(401), .. })
    }
}
