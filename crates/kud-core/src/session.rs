//! # Session & Route Gate
//!
//! Who is logged in, and which screens they may open.
//!
//! ## Gate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request /api/admin/...  or  /api/user/...                              │
//! │       │                                                                 │
//! │       ├── no session           → RedirectToLogin   ("/login")           │
//! │       ├── role ≠ route group   → RedirectToHome    (own dashboard)      │
//! │       └── role = route group   → Granted                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Accounts are the two fixed credential pairs in [`CREDENTIALS`]; there
//! is no password store.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::forms::LoginForm;
use crate::money::Money;
use crate::types::Profile;

/// Where unauthenticated requests are sent.
pub const LOGIN_PATH: &str = "/login";

// =============================================================================
// Role
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    /// Label shown under the name in the portal header.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Member => "Anggota",
        }
    }

    /// Dashboard a user of this role lands on.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Member => "/user/dashboard",
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// Loan and savings figures shown on the member dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MemberSummary {
    pub nik: String,
    pub loan_amount: Money,
    pub savings_amount: Money,
}

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Present for members only.
    pub member: Option<MemberSummary>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// NIK of a member session.
    pub fn nik(&self) -> Option<&str> {
        self.member.as_ref().map(|m| m.nik.as_str())
    }

    /// Saving the profile renames the session to "first last".
    ///
    /// The login email stays; it keys the stored profile.
    pub fn apply_profile(&mut self, profile: &Profile) {
        self.name = profile.display_name();
    }
}

// =============================================================================
// Credentials
// =============================================================================

/// A fixed login and the session it opens.
#[derive(Debug, Clone, Copy)]
pub struct Credential {
    pub email: &'static str,
    pub password: &'static str,
    pub name: &'static str,
    pub role: Role,
    pub member: Option<FixedMember>,
}

/// Member figures attached to a fixed member login.
#[derive(Debug, Clone, Copy)]
pub struct FixedMember {
    pub nik: &'static str,
    pub loan_amount: Money,
    pub savings_amount: Money,
}

impl Credential {
    pub fn session(&self) -> Session {
        Session {
            name: self.name.to_string(),
            email: self.email.to_string(),
            role: self.role,
            member: self.member.map(|m| MemberSummary {
                nik: m.nik.to_string(),
                loan_amount: m.loan_amount,
                savings_amount: m.savings_amount,
            }),
        }
    }
}

/// The only two accounts.
pub const CREDENTIALS: [Credential; 2] = [
    Credential {
        email: "admin@example.com",
        password: "admin123",
        name: "Saepul",
        role: Role::Admin,
        member: None,
    },
    Credential {
        email: "user@example.com",
        password: "password123",
        name: "Maemunah",
        role: Role::Member,
        member: Some(FixedMember {
            nik: "3214876512345679",
            loan_amount: Money::from_rupiah(2_000_000),
            savings_amount: Money::from_rupiah(400_000),
        }),
    },
];

/// Checks a login form against the fixed credentials.
///
/// Field problems come back as [`CoreError::InvalidForm`]; a well-formed
/// but unknown pair as [`CoreError::InvalidCredentials`].
///
/// ## Example
/// ```rust
/// use kud_core::forms::LoginForm;
/// use kud_core::session::{authenticate, Role};
///
/// let form = LoginForm {
///     email: "admin@example.com".to_string(),
///     password: "admin123".to_string(),
///     remember_password: true,
/// };
/// let session = authenticate(&form).unwrap();
/// assert_eq!(session.role, Role::Admin);
/// assert_eq!(session.name, "Saepul");
/// ```
pub fn authenticate(form: &LoginForm) -> CoreResult<Session> {
    form.validate()?;
    let email = form.email.trim();
    CREDENTIALS
        .iter()
        .find(|c| c.email == email && c.password == form.password)
        .map(Credential::session)
        .ok_or(CoreError::InvalidCredentials)
}

// =============================================================================
// Route Gate
// =============================================================================

/// The two protected areas of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGroup {
    Admin,
    Member,
}

impl RouteGroup {
    /// Group of a request path, if it is protected.
    pub fn of_path(path: &str) -> Option<Self> {
        let path = path.strip_prefix("/api").unwrap_or(path);
        if path == "/admin" || path.starts_with("/admin/") {
            Some(RouteGroup::Admin)
        } else if path == "/user" || path.starts_with("/user/") {
            Some(RouteGroup::Member)
        } else {
            None
        }
    }

    pub fn required_role(&self) -> Role {
        match self {
            RouteGroup::Admin => Role::Admin,
            RouteGroup::Member => Role::Member,
        }
    }
}

/// Outcome of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    RedirectToLogin,
    /// Logged in, wrong area: send the user to their own dashboard.
    RedirectToHome(Role),
}

impl Access {
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            Access::Granted => None,
            Access::RedirectToLogin => Some(LOGIN_PATH),
            Access::RedirectToHome(role) => Some(role.home_path()),
        }
    }
}

pub fn gate(session: Option<&Session>, group: RouteGroup) -> Access {
    match session {
        None => Access::RedirectToLogin,
        Some(s) if s.role == group.required_role() => Access::Granted,
        Some(s) => Access::RedirectToHome(s.role),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn login(email: &str, password: &str) -> CoreResult<Session> {
        authenticate(&LoginForm {
            email: email.to_string(),
            password: password.to_string(),
            remember_password: true,
        })
    }

    #[test]
    fn test_member_login() {
        let session = login("user@example.com", "password123").unwrap();
        assert_eq!(session.role, Role::Member);
        assert_eq!(session.name, "Maemunah");
        let member = session.member.unwrap();
        assert_eq!(member.loan_amount, Money::from_rupiah(2_000_000));
        assert_eq!(member.savings_amount, Money::from_rupiah(400_000));
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let err = login("admin@example.com", "password123").unwrap_err();
        assert!(matches!(err, CoreError::InvalidCredentials));
        assert_eq!(err.to_string(), "invalid email or password");
    }

    #[test]
    fn test_missing_fields_are_form_errors() {
        let err = authenticate(&LoginForm::default()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidForm(_)));
    }

    #[test]
    fn test_gate() {
        let admin = CREDENTIALS[0].session();
        let member = CREDENTIALS[1].session();

        assert_eq!(gate(None, RouteGroup::Admin), Access::RedirectToLogin);
        assert_eq!(gate(Some(&admin), RouteGroup::Admin), Access::Granted);
        assert_eq!(gate(Some(&member), RouteGroup::Member), Access::Granted);
        assert_eq!(
            gate(Some(&member), RouteGroup::Admin),
            Access::RedirectToHome(Role::Member)
        );
        assert_eq!(
            gate(Some(&admin), RouteGroup::Member).redirect_path(),
            Some("/admin/dashboard")
        );
        assert_eq!(Access::RedirectToLogin.redirect_path(), Some("/login"));
    }

    #[test]
    fn test_route_group_of_path() {
        assert_eq!(RouteGroup::of_path("/api/admin/members"), Some(RouteGroup::Admin));
        assert_eq!(RouteGroup::of_path("/admin"), Some(RouteGroup::Admin));
        assert_eq!(RouteGroup::of_path("/user/dashboard"), Some(RouteGroup::Member));
        assert_eq!(RouteGroup::of_path("/administrator"), None);
        assert_eq!(RouteGroup::of_path("/login"), None);
    }

    #[test]
    fn test_apply_profile_renames_session() {
        let mut session = CREDENTIALS[0].session();
        let profile = Profile::from_display_name("Kevin Fleming", "kevin@example.com");
        session.apply_profile(&profile);
        assert_eq!(session.name, "Kevin Fleming");
        assert_eq!(session.email, "admin@example.com");
    }
}
