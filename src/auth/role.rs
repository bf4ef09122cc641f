use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Account role carried in session claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Owner,
    Supplier,
    Superadmin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Owner, Role::Supplier, Role::Superadmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Owner => "owner",
            Role::Supplier => "supplier",
            Role::Superadmin => "superadmin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Legacy portal names are still present in older tokens and rows
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "owner" | "copropietario" => Ok(Role::Owner),
            "supplier" | "proveedor" => Ok(Role::Supplier),
            "superadmin" => Ok(Role::Superadmin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_legacy_names() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("copropietario".parse::<Role>(), Ok(Role::Owner));
        assert_eq!("Proveedor".parse::<Role>(), Ok(Role::Supplier));
        assert_eq!(" SUPERADMIN ".parse::<Role>(), Ok(Role::Superadmin));
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn serializes_canonical_name() {
        let json = serde_json::to_string(&Role::Owner).unwrap();
        assert_eq!(json, "\"owner\"");
        let back: Role = serde_json::from_str("\"proveedor\"").unwrap();
        assert_eq!(back, Role::Supplier);
    }

    #[test]
    fn rejects_unknown_role_on_deserialize() {
        let err = serde_json::from_str::<Role>("\"guest\"").unwrap_err();
        assert!(err.to_string().contains("unknown role"));
    }
}
