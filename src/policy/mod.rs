//! Static role allow-list keyed by path prefix.
//!
//! Every protected path belongs to exactly one [`Section`]. Paths that match
//! no section are public and bypass the gate.

pub mod gate;
pub mod path;

pub use gate::{evaluate, Denial, GateOutcome};
pub use path::{normalize_path, PathError};

use serde::Serialize;

use crate::auth::Role;

/// How a denial is rendered for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Browser pages: denials redirect.
    Page,
    /// JSON API routes: denials are error envelopes.
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Home,
    AdminPortal,
    OwnerPortal,
    SupplierPortal,
    Superadmin,
    Profile,
    Account,
    UserAdmin,
    CondominiumApi,
    CommunityApi,
    SupplierApi,
}

/// Protected path prefixes. Prefixes never overlap.
const PREFIXES: &[(&str, Section)] = &[
    ("/home", Section::Home),
    ("/admin", Section::AdminPortal),
    ("/owner", Section::OwnerPortal),
    ("/supplier", Section::SupplierPortal),
    ("/superadmin", Section::Superadmin),
    ("/profile", Section::Profile),
    ("/api/auth/whoami", Section::Account),
    ("/api/auth/refresh", Section::Account),
    ("/api/users", Section::UserAdmin),
    ("/api/condominiums", Section::CondominiumApi),
    ("/api/owners", Section::CommunityApi),
    ("/api/properties", Section::CommunityApi),
    ("/api/receipts", Section::CommunityApi),
    ("/api/payments", Section::CommunityApi),
    ("/api/expenses", Section::CommunityApi),
    ("/api/reserve-funds", Section::CommunityApi),
    ("/api/suppliers", Section::SupplierApi),
    ("/api/budgets", Section::SupplierApi),
    ("/api/invoices", Section::SupplierApi),
];

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Home
            | Section::AdminPortal
            | Section::OwnerPortal
            | Section::SupplierPortal
            | Section::Superadmin
            | Section::Profile => SectionKind::Page,
            Section::Account
            | Section::UserAdmin
            | Section::CondominiumApi
            | Section::CommunityApi
            | Section::SupplierApi => SectionKind::Api,
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        use Role::*;
        match (self, role) {
            (Section::Home, Admin | Superadmin) => true,
            (Section::Home, Owner | Supplier) => false,
            (Section::AdminPortal, Admin | Superadmin) => true,
            (Section::AdminPortal, Owner | Supplier) => false,
            (Section::OwnerPortal, Owner) => true,
            (Section::OwnerPortal, Admin | Supplier | Superadmin) => false,
            (Section::SupplierPortal, Supplier) => true,
            (Section::SupplierPortal, Admin | Owner | Superadmin) => false,
            (Section::Superadmin, Superadmin) => true,
            (Section::Superadmin, Admin | Owner | Supplier) => false,
            (Section::Profile, Admin | Owner | Supplier | Superadmin) => true,
            (Section::Account, Admin | Owner | Supplier | Superadmin) => true,
            (Section::UserAdmin, Admin | Superadmin) => true,
            (Section::UserAdmin, Owner | Supplier) => false,
            (Section::CondominiumApi, Admin | Superadmin) => true,
            (Section::CondominiumApi, Owner | Supplier) => false,
            // Row scoping by condominium and owner happens upstream
            (Section::CommunityApi, Admin | Superadmin | Owner) => true,
            (Section::CommunityApi, Supplier) => false,
            (Section::SupplierApi, Admin | Superadmin | Supplier) => true,
            (Section::SupplierApi, Owner) => false,
        }
    }

    pub fn allowed_roles(&self) -> Vec<Role> {
        Role::ALL.into_iter().filter(|role| self.allows(*role)).collect()
    }
}

/// Map a request path to its protected section, if any.
///
/// Query strings and trailing slashes are ignored, and prefixes only match
/// on segment boundaries. Callers pass paths already canonicalized by
/// [`normalize_path`].
pub fn classify(path: &str) -> Option<Section> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    let path = if trimmed.is_empty() { "/" } else { trimmed };

    PREFIXES
        .iter()
        .find(|(prefix, _)| matches_prefix(path, prefix))
        .map(|(_, section)| *section)
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
