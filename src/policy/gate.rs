use serde::Serialize;

use super::{classify, Section};
use crate::auth::{Claims, Identity, Role, TokenError, TokenService};

/// Why a protected request was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// No usable session: missing, malformed, badly signed or expired token.
    Unauthenticated(TokenError),
    /// The account exists but is disabled (`authorized = false`).
    Blocked,
    /// The session role is not allow-listed for the section.
    WrongRole(Role),
}

impl Denial {
    pub fn reason(&self) -> String {
        match self {
            Denial::Unauthenticated(e) => e.to_string(),
            Denial::Blocked => "account is disabled".to_string(),
            Denial::WrongRole(role) => format!("role '{}' may not access this resource", role),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Public,
    Admit {
        section: Section,
        identity: Identity,
        claims: Claims,
    },
    Deny {
        section: Section,
        denial: Denial,
    },
}

/// Flat view of an outcome for logs and the CLI.
#[derive(Debug, Serialize)]
pub struct OutcomeReport {
    pub outcome: &'static str,
    pub section: Option<Section>,
    pub identity: Option<Identity>,
    pub reason: Option<String>,
}

impl GateOutcome {
    pub fn report(&self) -> OutcomeReport {
        match self {
            GateOutcome::Public => OutcomeReport {
                outcome: "public",
                section: None,
                identity: None,
                reason: None,
            },
            GateOutcome::Admit { section, identity, .. } => OutcomeReport {
                outcome: "admit",
                section: Some(*section),
                identity: Some(identity.clone()),
                reason: None,
            },
            GateOutcome::Deny { section, denial } => OutcomeReport {
                outcome: match denial {
                    Denial::Unauthenticated(_) => "unauthenticated",
                    Denial::Blocked => "blocked",
                    Denial::WrongRole(_) => "forbidden",
                },
                section: Some(*section),
                identity: None,
                reason: Some(denial.reason()),
            },
        }
    }
}

/// Decide whether a request for `path` carrying `token` may proceed.
///
/// Checks run in a fixed order: section lookup, token presence, signature
/// and expiry, the `authorized` flag, then the role allow-list.
pub fn evaluate(path: &str, token: Option<&str>, tokens: &TokenService, now: i64) -> GateOutcome {
    let Some(section) = classify(path) else {
        return GateOutcome::Public;
    };

    let deny = |denial| GateOutcome::Deny { section, denial };

    let token = match token.map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => return deny(Denial::Unauthenticated(TokenError::Missing)),
    };

    let claims = match tokens.verify(token, now) {
        Ok(claims) => claims,
        Err(e) => return deny(Denial::Unauthenticated(e)),
    };

    if !claims.authorized {
        return deny(Denial::Blocked);
    }

    if !section.allows(claims.role) {
        return deny(Denial::WrongRole(claims.role));
    }

    GateOutcome::Admit {
        section,
        identity: Identity::from(&claims),
        claims,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Subject;

    const NOW: i64 = 1_700_000_000;

    fn tokens() -> TokenService {
        TokenService::new("gate-secret", 1).unwrap()
    }

    fn token_for(role: Role, authorized: bool, issued_at: i64) -> String {
        let subject = Subject {
            id: 42,
            email: "user@example.com".to_string(),
            role,
            condominium_id: Some(5),
            authorized,
        };
        tokens().issue(&subject, issued_at).unwrap().token
    }

    #[test]
    fn public_paths_skip_token_checks() {
        assert_eq!(evaluate("/login", None, &tokens(), NOW), GateOutcome::Public);
        assert_eq!(evaluate("/login", Some("junk"), &tokens(), NOW), GateOutcome::Public);
    }

    #[test]
    fn missing_token_is_unauthenticated() {
        let outcome = evaluate("/home", None, &tokens(), NOW);
        assert_eq!(
            outcome,
            GateOutcome::Deny {
                section: Section::Home,
                denial: Denial::Unauthenticated(TokenError::Missing)
            }
        );
        assert_eq!(evaluate("/home", Some(""), &tokens(), NOW), outcome);
    }

    #[test]
    fn expired_admin_token_on_home() {
        // Issued two hours ago with a one hour lifetime.
        let token = token_for(Role::Admin, true, NOW - 7200);
        assert_eq!(
            evaluate("/home", Some(&token), &tokens(), NOW),
            GateOutcome::Deny {
                section: Section::Home,
                denial: Denial::Unauthenticated(TokenError::Expired)
            }
        );
    }

    #[test]
    fn blocked_account_wins_over_role() {
        for role in Role::ALL {
            let token = token_for(role, false, NOW);
            for path in ["/home", "/owner", "/supplier/invoices", "/profile", "/api/users"] {
                let outcome = evaluate(path, Some(&token), &tokens(), NOW);
                assert!(
                    matches!(outcome, GateOutcome::Deny { denial: Denial::Blocked, .. }),
                    "{role} {path}: {outcome:?}"
                );
            }
        }
    }

    #[test]
    fn wrong_role_is_denied() {
        let token = token_for(Role::Owner, true, NOW);
        assert_eq!(
            evaluate("/admin/budgets", Some(&token), &tokens(), NOW),
            GateOutcome::Deny {
                section: Section::AdminPortal,
                denial: Denial::WrongRole(Role::Owner)
            }
        );
    }

    #[test]
    fn admin_round_trip() {
        let token = token_for(Role::Admin, true, NOW);

        match evaluate("/home", Some(&token), &tokens(), NOW + 60) {
            GateOutcome::Admit { section, identity, .. } => {
                assert_eq!(section, Section::Home);
                assert_eq!(identity.user_id, 42);
                assert_eq!(identity.role, Role::Admin);
                assert_eq!(identity.condominium_id, Some(5));
            }
            other => panic!("expected admit, got {other:?}"),
        }

        assert!(matches!(
            evaluate("/owner/receipts", Some(&token), &tokens(), NOW + 60),
            GateOutcome::Deny { denial: Denial::WrongRole(Role::Admin), .. }
        ));
    }

    #[test]
    fn report_flattens_outcome() {
        let report = evaluate("/superadmin", None, &tokens(), NOW).report();
        assert_eq!(report.outcome, "unauthenticated");
        assert_eq!(report.section, Some(Section::Superadmin));
        assert_eq!(report.reason.as_deref(), Some("missing session token"));
    }
}
