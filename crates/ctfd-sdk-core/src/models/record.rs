use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The collections of the cache document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Users,
    Teams,
    Challenges,
    Flags,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Users,
        EntityKind::Teams,
        EntityKind::Challenges,
        EntityKind::Flags,
    ];

    /// Key of this collection in the persisted document
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Users => "users",
            EntityKind::Teams => "teams",
            EntityKind::Challenges => "challenges",
            EntityKind::Flags => "flags",
        }
    }

    /// REST collection path for this kind, e.g. `/users`
    pub fn api_path(&self) -> String {
        format!("/{}", self.as_str())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRecord {
    pub id: i64,
}

/// A cached user. `team_id` stays `null` until the user is assigned to a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    #[serde(default)]
    pub team_id: Option<i64>,
}

impl UserRecord {
    pub fn new(id: i64) -> Self {
        Self { id, team_id: None }
    }
}

/// The whole persisted name → id mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDocument {
    #[serde(default)]
    pub users: BTreeMap<String, UserRecord>,
    #[serde(default)]
    pub teams: BTreeMap<String, IdRecord>,
    #[serde(default)]
    pub challenges: BTreeMap<String, IdRecord>,
    #[serde(default)]
    pub flags: BTreeMap<String, IdRecord>,
}

impl CacheDocument {
    fn collection(&self, kind: EntityKind) -> Option<&BTreeMap<String, IdRecord>> {
        match kind {
            EntityKind::Users => None,
            EntityKind::Teams => Some(&self.teams),
            EntityKind::Challenges => Some(&self.challenges),
            EntityKind::Flags => Some(&self.flags),
        }
    }

    fn collection_mut(&mut self, kind: EntityKind) -> Option<&mut BTreeMap<String, IdRecord>> {
        match kind {
            EntityKind::Users => None,
            EntityKind::Teams => Some(&mut self.teams),
            EntityKind::Challenges => Some(&mut self.challenges),
            EntityKind::Flags => Some(&mut self.flags),
        }
    }

    pub fn contains(&self, kind: EntityKind, name: &str) -> bool {
        match self.collection(kind) {
            Some(entries) => entries.contains_key(name),
            None => self.users.contains_key(name),
        }
    }

    /// Identifier record for `name`; for users only the id is returned.
    pub fn get(&self, kind: EntityKind, name: &str) -> Option<IdRecord> {
        match self.collection(kind) {
            Some(entries) => entries.get(name).copied(),
            None => self.users.get(name).map(|u| IdRecord { id: u.id }),
        }
    }

    /// Insert a freshly created entity. New users start without a team.
    pub fn insert(&mut self, kind: EntityKind, name: &str, id: i64) {
        match self.collection_mut(kind) {
            Some(entries) => {
                entries.insert(name.to_string(), IdRecord { id });
            }
            None => {
                self.users.insert(name.to_string(), UserRecord::new(id));
            }
        }
    }

    /// Returns `true` if an entry was removed.
    pub fn remove(&mut self, kind: EntityKind, name: &str) -> bool {
        match self.collection_mut(kind) {
            Some(entries) => entries.remove(name).is_some(),
            None => self.users.remove(name).is_some(),
        }
    }

    /// Remove a team and reset `team_id` of every cached user in it.
    /// Returns `false` if the team was not cached.
    pub fn remove_team(&mut self, name: &str) -> bool {
        let Some(team) = self.teams.remove(name) else {
            return false;
        };
        for user in self.users.values_mut() {
            if user.team_id == Some(team.id) {
                user.team_id = None;
            }
        }
        true
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        match self.collection(kind) {
            Some(entries) => entries.len(),
            None => self.users.len(),
        }
    }

    /// Names in `kind`, in stable (sorted) order
    pub fn names(&self, kind: EntityKind) -> Vec<String> {
        match self.collection(kind) {
            Some(entries) => entries.keys().cloned().collect(),
            None => self.users.keys().cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|&kind| self.len(kind) == 0)
    }
}
