use std::fmt;

const GUEST: &str = "guest";

/// Whose visited set is being read or written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Guest,
    User(String),
}

impl Identity {
    /// A named user, or `None` for a blank name.
    #[must_use]
    pub fn user(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some(Self::User(name.to_owned()))
        }
    }

    #[must_use]
    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }

    /// Store key of this identity's visited list: `visited_<name>`, or
    /// `visited_guest`.
    #[must_use]
    pub fn visited_key(&self) -> String {
        format!("visited_{self}")
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guest => f.write_str(GUEST),
            Self::User(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visited_keys_are_scoped_by_identity() {
        assert_eq!(Identity::Guest.visited_key(), "visited_guest");
        assert_eq!(
            Identity::user("  ana ").unwrap().visited_key(),
            "visited_ana"
        );
    }

    #[test]
    fn blank_user_name_is_rejected() {
        assert!(Identity::user("").is_none());
        assert!(Identity::user(" \t").is_none());
    }
}
