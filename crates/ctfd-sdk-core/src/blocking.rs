//! Blocking wrapper around `CtfdApi`.
//!
//! Each method drives the corresponding async operation to completion on a
//! private current-thread runtime, so both conventions share one
//! implementation. Do not use this from inside an async runtime.

use tokio::runtime::{Builder, Runtime};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::ctfd::CtfdApi;
use crate::error::{Error, Result};
use crate::models::{FlagOptions, NewChallenge, UserRole};

pub struct BlockingCtfdApi {
    inner: CtfdApi,
    runtime: Runtime,
}

impl BlockingCtfdApi {
    pub fn new(config: &Config) -> Result<Self> {
        Self::from_async(CtfdApi::new(config)?)
    }

    pub fn from_async(inner: CtfdApi) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;
        Ok(Self { inner, runtime })
    }

    pub fn storage(&self) -> &CacheStore {
        self.inner.storage()
    }

    pub fn create_user(&self, name: &str, role: UserRole) -> Result<i64> {
        self.runtime.block_on(self.inner.create_user(name, role))
    }

    pub fn delete_user(&self, name: &str) -> Result<()> {
        self.runtime.block_on(self.inner.delete_user(name))
    }

    pub fn create_team(&self, name: &str) -> Result<i64> {
        self.runtime.block_on(self.inner.create_team(name))
    }

    pub fn delete_team(&self, name: &str) -> Result<()> {
        self.runtime.block_on(self.inner.delete_team(name))
    }

    pub fn remove_user_from_team(&self, user_name: &str) -> Result<()> {
        self.runtime.block_on(self.inner.remove_user_from_team(user_name))
    }

    pub fn assign_user_to_team(&self, user_name: &str, team_name: &str) -> Result<()> {
        self.runtime
            .block_on(self.inner.assign_user_to_team(user_name, team_name))
    }

    pub fn create_challenge(&self, challenge: NewChallenge) -> Result<i64> {
        self.runtime.block_on(self.inner.create_challenge(challenge))
    }

    pub fn delete_challenge(&self, name: &str) -> Result<()> {
        self.runtime.block_on(self.inner.delete_challenge(name))
    }

    pub fn create_flag(
        &self,
        challenge_name: &str,
        flag_name: &str,
        content: &str,
        options: &FlagOptions,
    ) -> Result<i64> {
        self.runtime.block_on(
            self.inner
                .create_flag(challenge_name, flag_name, content, options),
        )
    }

    pub fn update_flag(&self, name: &str, content: &str, options: &FlagOptions) -> Result<()> {
        self.runtime
            .block_on(self.inner.update_flag(name, content, options))
    }

    pub fn delete_flag(&self, name: &str) -> Result<()> {
        self.runtime.block_on(self.inner.delete_flag(name))
    }

    pub fn clear(&self) -> Result<()> {
        self.runtime.block_on(self.inner.clear())
    }
}
