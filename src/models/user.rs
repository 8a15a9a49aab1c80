// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identity-provider subject (also used as document ID)
    pub id: String,
    pub display_name: String,
    pub email: String,
    /// Profile picture URL
    pub photo_url: Option<String>,
    /// Gate for non-admin users, toggled by the administrator
    pub has_access: bool,
    pub is_admin: bool,
    /// When the user first signed in (RFC 3339)
    pub created_at: String,
    /// Most recent sign-in (RFC 3339)
    pub last_login_at: String,
}

/// Identity asserted by a verified sign-in token.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub subject: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl User {
    /// Record a sign-in, creating the user on first contact.
    ///
    /// New users start with `has_access == is_admin`. Existing users keep
    /// their access flag; profile fields and the admin flag are refreshed.
    pub fn sign_in(existing: Option<User>, sign_in: SignIn, is_admin: bool, now: &str) -> User {
        let display_name = sign_in
            .display_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| sign_in.email.clone());

        match existing {
            Some(mut user) => {
                user.display_name = display_name;
                user.email = sign_in.email;
                user.photo_url = sign_in.photo_url;
                user.is_admin = is_admin;
                if is_admin {
                    user.has_access = true;
                }
                user.last_login_at = now.to_string();
                user
            }
            None => User {
                id: sign_in.subject,
                display_name,
                email: sign_in.email,
                photo_url: sign_in.photo_url,
                has_access: is_admin,
                is_admin,
                created_at: now.to_string(),
                last_login_at: now.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_in(name: Option<&str>) -> SignIn {
        SignIn {
            subject: "uid-1".to_string(),
            email: "rider@example.com".to_string(),
            display_name: name.map(String::from),
            photo_url: None,
        }
    }

    #[test]
    fn test_first_sign_in_grants_access_only_to_admin() {
        let user = User::sign_in(None, sign_in(Some("Rider")), false, "t0");
        assert!(!user.has_access);
        assert_eq!(user.created_at, "t0");

        let admin = User::sign_in(None, sign_in(Some("Boss")), true, "t0");
        assert!(admin.has_access);
        assert!(admin.is_admin);
    }

    #[test]
    fn test_repeat_sign_in_keeps_access_flag() {
        let mut user = User::sign_in(None, sign_in(None), false, "t0");
        user.has_access = true;
        let again = User::sign_in(Some(user), sign_in(Some("Rider")), false, "t1");
        assert!(again.has_access);
        assert_eq!(again.created_at, "t0");
        assert_eq!(again.last_login_at, "t1");
        assert_eq!(again.display_name, "Rider");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = User::sign_in(None, sign_in(Some("  ")), false, "t0");
        assert_eq!(user.display_name, "rider@example.com");
    }
}
