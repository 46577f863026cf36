//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use larder_cache::{Cache, FileStore, SessionId};
use larder_commerce::catalog::Catalog;
use larder_commerce::checkout::CheckoutAssembler;
use larder_commerce::identity::{CacheRepository, IdentityLedger, OwnerKey};
use larder_commerce::pricing::PricingEngine;
use larder_commerce::{GuestToken, UserId};
use serde::{Deserialize, Serialize};

use crate::config::{LarderConfig, CONFIG_NAMES};
use crate::output::Output;

/// Key the session state is kept under in the store.
const SESSION_KEY: &str = "session:state";

/// Ledger over the file-backed store.
pub type Ledger = IdentityLedger<CacheRepository<FileStore>>;

/// Who is using the CLI: a guest token, generated once, and the logged-in
/// user if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub guest_token: SessionId,
    #[serde(default)]
    pub user: Option<UserId>,
}

impl SessionState {
    fn fresh() -> Self {
        Self {
            guest_token: SessionId::generate(),
            user: None,
        }
    }

    /// Owner of the active cart.
    pub fn owner(&self) -> OwnerKey {
        match &self.user {
            Some(user) => OwnerKey::Authenticated(user.clone()),
            None => OwnerKey::Anonymous(GuestToken::new(self.guest_token.as_str())),
        }
    }
}

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: LarderConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Directory relative paths in the config resolve against.
    pub root: PathBuf,
    /// Config file in use, if one was found.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let found = if let Some(path) = config_path {
            Some((PathBuf::from(path), LarderConfig::load(path)?))
        } else {
            // Try to find config in current directory or parent directories
            Self::find_config(&cwd)
        };

        let (config_path, config) = match found {
            Some((path, config)) => (Some(path), config),
            None => (None, LarderConfig::default()),
        };
        let root = config_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());

        tracing::debug!(root = %root.display(), config = ?config_path, "context loaded");
        Ok(Self {
            config,
            output,
            cwd,
            root,
            config_path,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(PathBuf, LarderConfig)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = LarderConfig::load(config_path.to_str()?) {
                        return Some((config_path, config));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the config root.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.root.join(path)
        }
    }

    /// Get the outbox directory, creating it if needed.
    pub fn outbox_dir(&self) -> Result<PathBuf> {
        let outbox = self.resolve_path(&self.config.checkout.outbox);
        std::fs::create_dir_all(&outbox)
            .with_context(|| format!("Failed to create outbox: {}", outbox.display()))?;
        Ok(outbox)
    }

    fn file_store(&self) -> Result<FileStore> {
        let dir = self.resolve_path(&self.config.store.dir);
        FileStore::open(&dir).with_context(|| format!("Failed to open store: {}", dir.display()))
    }

    /// Read and ingest the configured catalog.
    pub fn catalog(&self) -> Result<Catalog> {
        let path = self.resolve_path(&self.config.catalog.path);
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        Catalog::from_json(&json, self.config.currency()?)
            .with_context(|| format!("Failed to ingest catalog: {}", path.display()))
    }

    pub fn engine(&self) -> Result<PricingEngine> {
        Ok(PricingEngine::new(self.config.currency()?))
    }

    pub fn assembler(&self) -> Result<CheckoutAssembler> {
        Ok(CheckoutAssembler::new(self.config.shipping_fee()?))
    }

    /// Load the session state, creating a guest token on first use.
    pub fn session(&self) -> Result<SessionState> {
        let cache = Cache::new(self.file_store()?);
        if let Some(state) = cache.get::<SessionState>(SESSION_KEY)? {
            return Ok(state);
        }
        let state = SessionState::fresh();
        cache.set(SESSION_KEY, &state)?;
        tracing::debug!(token = %state.guest_token, "guest session created");
        Ok(state)
    }

    pub fn save_session(&self, state: &SessionState) -> Result<()> {
        Cache::new(self.file_store()?).set(SESSION_KEY, state)?;
        Ok(())
    }

    /// Open the active owner's cart.
    pub fn open_ledger(&self, session: &SessionState) -> Result<Ledger> {
        let repo = CacheRepository::new(self.file_store()?);
        Ok(IdentityLedger::open(repo, session.owner(), self.engine()?)?)
    }
}
