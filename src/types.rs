/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Content types managed by the platform.
/// The path slug doubles as the table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    People,
    Projects,
    Topics,
    News,
    Organizations,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::People,
        EntityKind::Projects,
        EntityKind::Topics,
        EntityKind::News,
        EntityKind::Organizations,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            EntityKind::People => "people",
            EntityKind::Projects => "projects",
            EntityKind::Topics => "topics",
            EntityKind::News => "news",
            EntityKind::Organizations => "organizations",
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.slug()
    }

    /// Singular label for messages: "Person not found".
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::People => "Person",
            EntityKind::Projects => "Project",
            EntityKind::Topics => "Topic",
            EntityKind::News => "News item",
            EntityKind::Organizations => "Organization",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            EntityKind::People => "People",
            EntityKind::Projects => "Projects",
            EntityKind::Topics => "Topics",
            EntityKind::News => "News",
            EntityKind::Organizations => "Organizations",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| format!("Unknown entity type '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.slug().parse::<EntityKind>(), Ok(kind));
        }
        assert!("users".parse::<EntityKind>().is_err());
    }

    #[test]
    fn index_matches_position() {
        for (i, kind) in EntityKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
