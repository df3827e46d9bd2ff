use std::fmt;
use std::str::FromStr;

use super::{DomainError, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Company,
    Student,
}

/// Operations gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    SubmitEvaluation,
    PostChallenge,
    ManageCompanyProfile,
    ViewChallengeResponses,
    SubmitResponse,
    ViewOwnResponses,
    ViewPlatformStats,
    ListUsers,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Company, Role::Student];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Company => "company",
            Role::Student => "student",
        }
    }

    pub fn allows(self, capability: Capability) -> bool {
        match capability {
            Capability::SubmitEvaluation
            | Capability::PostChallenge
            | Capability::ManageCompanyProfile
            | Capability::ViewChallengeResponses => self == Role::Company,
            Capability::SubmitResponse | Capability::ViewOwnResponses => self == Role::Student,
            Capability::ViewPlatformStats | Capability::ListUsers => self == Role::Admin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "company" => Ok(Role::Company),
            "student" => Ok(Role::Student),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// An authenticated identity, as established by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.role.allows(capability)
    }
}
