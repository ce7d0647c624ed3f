//! Name-based entity operations over the CTFd API.
//!
//! Each operation checks the local store first (duplicate names and unknown
//! names fail without touching the network), then calls CTFd, then writes the
//! outcome back to the store. A remote failure leaves the store untouched.

use tracing::info;

use crate::api::ApiClient;
use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{
    EntityKind, FlagOptions, FlagPayload, FlagUpdatePayload, MemberPayload, NewChallenge,
    TeamPayload, UserPayload, UserRole,
};

pub struct CtfdApi {
    client: ApiClient,
    storage: CacheStore,
}

impl CtfdApi {
    pub fn new(config: &Config) -> Result<Self> {
        let client = ApiClient::new(&config.admin_token, &config.host, config.timeout)?;
        Ok(Self::from_parts(client, CacheStore::new(&config.storage_path)))
    }

    pub fn from_parts(client: ApiClient, storage: CacheStore) -> Self {
        Self { client, storage }
    }

    pub fn storage(&self) -> &CacheStore {
        &self.storage
    }

    /// Fails on a known name, and on an unreadable store, before any request is sent.
    fn ensure_absent(&self, kind: EntityKind, name: &str) -> Result<()> {
        if self.storage.load()?.contains(kind, name) {
            info!(kind = %kind, name = name, "Already registered in CTFd");
            return Err(Error::Duplicate {
                kind,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// POST `body` to the kind's collection and record the returned id under `name`.
    async fn create<B>(&self, kind: EntityKind, name: &str, body: &B) -> Result<i64>
    where
        B: serde::Serialize,
    {
        let response = self.client.post(&kind.api_path(), body).await?;
        let id = ApiClient::created_id(response).await?;
        self.storage.record(kind, name, id)?;
        Ok(id)
    }

    /// DELETE the entity remotely, then forget it locally.
    async fn delete(&self, kind: EntityKind, name: &str) -> Result<()> {
        let record = self.storage.get(kind, name)?;
        self.client
            .delete(&format!("{}/{}", kind.api_path(), record.id))
            .await?;
        match kind {
            EntityKind::Teams => self.storage.remove_team(name),
            _ => self.storage.remove(kind, name),
        }
    }

    // ===== Users =====

    pub async fn create_user(&self, name: &str, role: UserRole) -> Result<i64> {
        self.ensure_absent(EntityKind::Users, name)?;
        let id = self
            .create(EntityKind::Users, name, &UserPayload::new(name, role))
            .await?;
        info!(user = name, id = id, "User registered in CTFd");
        Ok(id)
    }

    pub async fn delete_user(&self, name: &str) -> Result<()> {
        self.delete(EntityKind::Users, name).await
    }

    // ===== Teams =====

    pub async fn create_team(&self, name: &str) -> Result<i64> {
        self.ensure_absent(EntityKind::Teams, name)?;
        let id = self
            .create(EntityKind::Teams, name, &TeamPayload::new(name))
            .await?;
        info!(team = name, id = id, "Team registered in CTFd");
        Ok(id)
    }

    /// Delete a team. Cached members of the team are left without a team.
    pub async fn delete_team(&self, name: &str) -> Result<()> {
        self.delete(EntityKind::Teams, name).await
    }

    // ===== Team membership =====

    /// Take a user out of their current team. Users without a team are left alone.
    pub async fn remove_user_from_team(&self, user_name: &str) -> Result<()> {
        let user = self.storage.get_user(user_name)?;
        let Some(team_id) = user.team_id else {
            info!(user = user_name, "User not assigned to any team");
            return Ok(());
        };

        self.client
            .delete_with(
                &format!("/teams/{}/members", team_id),
                &MemberPayload { user_id: user.id },
            )
            .await?;
        self.storage.set_team(user_name, None)
    }

    /// Make `user_name` a member of `team_name`, leaving any previous team first.
    pub async fn assign_user_to_team(&self, user_name: &str, team_name: &str) -> Result<()> {
        let user = self.storage.get_user(user_name)?;
        let team = self.storage.get(EntityKind::Teams, team_name)?;

        if user.team_id == Some(team.id) {
            info!(user = user_name, team = team_name, "User already assigned to team");
            return Ok(());
        }
        if user.team_id.is_some() {
            self.remove_user_from_team(user_name).await?;
        }

        self.client
            .post(
                &format!("/teams/{}/members", team.id),
                &MemberPayload { user_id: user.id },
            )
            .await?;
        self.storage.set_team(user_name, Some(team.id))?;
        info!(user = user_name, team = team_name, "User assigned to team");
        Ok(())
    }

    // ===== Challenges =====

    pub async fn create_challenge(&self, challenge: NewChallenge) -> Result<i64> {
        self.ensure_absent(EntityKind::Challenges, &challenge.name)?;
        self.create(EntityKind::Challenges, &challenge.name, &challenge)
            .await
    }

    pub async fn delete_challenge(&self, name: &str) -> Result<()> {
        self.delete(EntityKind::Challenges, name).await
    }

    // ===== Flags =====

    /// Attach a flag to a cached challenge. `flag_name` is the local handle for
    /// later updates; CTFd itself never sees it.
    pub async fn create_flag(
        &self,
        challenge_name: &str,
        flag_name: &str,
        content: &str,
        options: &FlagOptions,
    ) -> Result<i64> {
        let challenge = self.storage.get(EntityKind::Challenges, challenge_name)?;
        self.ensure_absent(EntityKind::Flags, flag_name)?;
        self.create(
            EntityKind::Flags,
            flag_name,
            &FlagPayload::new(challenge.id, content, options),
        )
        .await
    }

    pub async fn update_flag(
        &self,
        name: &str,
        content: &str,
        options: &FlagOptions,
    ) -> Result<()> {
        let flag = self.storage.get(EntityKind::Flags, name)?;
        self.client
            .patch(
                &format!("/flags/{}", flag.id),
                &FlagUpdatePayload::new(flag.id, content, options),
            )
            .await?;
        Ok(())
    }

    pub async fn delete_flag(&self, name: &str) -> Result<()> {
        self.delete(EntityKind::Flags, name).await
    }

    // ===== Bulk =====

    /// Delete every cached entity: users, then teams, then flags, then
    /// challenges. Stops at the first failure.
    pub async fn clear(&self) -> Result<()> {
        let document = self.storage.load()?;
        for kind in [
            EntityKind::Users,
            EntityKind::Teams,
            EntityKind::Flags,
            EntityKind::Challenges,
        ] {
            for name in document.names(kind) {
                self.delete(kind, &name).await?;
            }
        }
        Ok(())
    }
}
