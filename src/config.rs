//! Process-wide configuration.
//!
//! [`Settings`] holds the user-tunable knobs read from the environment (and an
//! optional `.env` file). [`RuntimeConfig`] adds what is discovered about the
//! host at startup and is passed, read-only, to the dispatcher and every action.

use crate::actions::{Action, Registry};
use crate::error::{AppError, Result};
use crate::system;
use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const ENV_DESTRUCTIVE: &str = "ARCH_MAINT_DESTRUCTIVE";
pub const ENV_CONFIRM_DEFAULT: &str = "ARCH_MAINT_CONFIRM_DEFAULT";
pub const ENV_ELEVATION: &str = "ARCH_MAINT_ELEVATION";
pub const ENV_JOURNAL_RETENTION: &str = "ARCH_MAINT_JOURNAL_RETENTION";
pub const ENV_MIRROR_COUNT: &str = "ARCH_MAINT_MIRROR_COUNT";
pub const ENV_MIRRORLIST: &str = "ARCH_MAINT_MIRRORLIST";
pub const ENV_CACHE_KEEP: &str = "ARCH_MAINT_CACHE_KEEP";
pub const ENV_LOG_DIR: &str = "ARCH_MAINT_LOG_DIR";

/// AUR helper preferred for system upgrades when installed.
pub const AUR_HELPER: &str = "yay";

/// User-tunable settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Ids that require confirmation; `None` keeps each action's built-in flag.
    pub destructive: Option<BTreeSet<u8>>,
    /// Answer assumed when the confirmation reply is empty.
    pub confirm_default: bool,
    pub elevation_helper: String,
    pub journal_retention: String,
    pub mirror_count: u32,
    pub mirrorlist: PathBuf,
    pub cache_keep: u32,
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            destructive: None,
            confirm_default: false,
            elevation_helper: "sudo".to_string(),
            journal_retention: "2weeks".to_string(),
            mirror_count: 20,
            mirrorlist: PathBuf::from("/etc/pacman.d/mirrorlist"),
            cache_keep: 3,
            log_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from the process environment, honoring a `.env` file.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(ENV_DESTRUCTIVE) {
            settings.destructive = Some(parse_id_list(&raw)?);
        }
        if let Some(raw) = lookup(ENV_CONFIRM_DEFAULT) {
            settings.confirm_default = parse_yes_no(ENV_CONFIRM_DEFAULT, &raw)?;
        }
        if let Some(raw) = non_empty(lookup(ENV_ELEVATION)) {
            settings.elevation_helper = raw;
        }
        if let Some(raw) = non_empty(lookup(ENV_JOURNAL_RETENTION)) {
            settings.journal_retention = raw;
        }
        if let Some(raw) = lookup(ENV_MIRROR_COUNT) {
            settings.mirror_count = parse_count(ENV_MIRROR_COUNT, &raw)?;
        }
        if let Some(raw) = non_empty(lookup(ENV_MIRRORLIST)) {
            settings.mirrorlist = PathBuf::from(raw);
        }
        if let Some(raw) = lookup(ENV_CACHE_KEEP) {
            settings.cache_keep = parse_count(ENV_CACHE_KEEP, &raw)?;
        }
        settings.log_dir = non_empty(lookup(ENV_LOG_DIR)).map(PathBuf::from);

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_id_list(raw: &str) -> Result<BTreeSet<u8>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u8>().map_err(|_| {
                AppError::FatalStartup(format!(
                    "{} contains '{}', which is not a menu id",
                    ENV_DESTRUCTIVE, part
                ))
            })
        })
        .collect()
}

fn parse_yes_no(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" | "" => Ok(false),
        other => Err(AppError::FatalStartup(format!(
            "{} must be yes or no, got '{}'",
            key, other
        ))),
    }
}

fn parse_count(key: &str, raw: &str) -> Result<u32> {
    raw.trim().parse::<u32>().map_err(|_| {
        AppError::FatalStartup(format!(
            "{} must be a non-negative number, got '{}'",
            key,
            raw.trim()
        ))
    })
}

/// Immutable configuration computed once at process start.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// The process already runs as root, so no elevation wrapper is used.
    pub elevated: bool,
    pub elevation_helper: String,
    /// Tools that were not found on `PATH` during the startup probe.
    pub missing_tools: BTreeSet<String>,
    pub destructive: BTreeSet<u8>,
    pub confirm_default: bool,
    pub journal_retention: String,
    pub mirror_count: u32,
    pub mirrorlist: PathBuf,
    pub cache_keep: u32,
    /// Generic per-user cache directory, `None` when it cannot be resolved.
    pub user_cache_dir: Option<PathBuf>,
    /// Steam HTTP and library cache directories.
    pub steam_cache_dirs: Vec<PathBuf>,
}

impl RuntimeConfig {
    /// Probe the host (tools on `PATH`, effective uid, cache locations) and combine with `settings`.
    pub fn detect(settings: Settings, registry: &Registry) -> Result<Self> {
        let elevated = system::is_elevated();
        let probed = probe_list(registry, &settings.elevation_helper);
        let missing = system::missing_tools(probed.iter().map(String::as_str));

        let mut config = Self::from_parts(settings, registry, elevated, missing)?;
        config.user_cache_dir = dirs::cache_dir();
        config.steam_cache_dirs = dirs::data_dir()
            .map(|data| {
                let appcache = data.join("Steam").join("appcache");
                vec![appcache.join("httpcache"), appcache.join("librarycache")]
            })
            .unwrap_or_default();

        info!(
            "Runtime configuration ready (elevated: {}, missing tools: {:?})",
            config.elevated, config.missing_tools
        );
        Ok(config)
    }

    /// Assemble a configuration from already-known host facts.
    pub fn from_parts(
        settings: Settings,
        registry: &Registry,
        elevated: bool,
        missing_tools: BTreeSet<String>,
    ) -> Result<Self> {
        let destructive = match settings.destructive {
            Some(ids) => {
                if let Some(unknown) = ids.iter().find(|id| registry.lookup(**id).is_err()) {
                    return Err(AppError::FatalStartup(format!(
                        "{} names unknown menu id {}",
                        ENV_DESTRUCTIVE, unknown
                    )));
                }
                ids
            },
            None => registry
                .all()
                .iter()
                .filter(|action| action.destructive)
                .map(|action| action.id)
                .collect(),
        };

        Ok(Self {
            elevated,
            elevation_helper: settings.elevation_helper,
            missing_tools,
            destructive,
            confirm_default: settings.confirm_default,
            journal_retention: settings.journal_retention,
            mirror_count: settings.mirror_count,
            mirrorlist: settings.mirrorlist,
            cache_keep: settings.cache_keep,
            user_cache_dir: None,
            steam_cache_dirs: Vec::new(),
        })
    }

    pub fn tool_available(&self, tool: &str) -> bool {
        !self.missing_tools.contains(tool)
    }

    pub fn is_destructive(&self, action: &Action) -> bool {
        self.destructive.contains(&action.id)
    }

    /// Tools `action` needs that are absent, including the elevation helper for privileged actions.
    pub fn missing_for(&self, action: &Action) -> Vec<String> {
        let mut missing: Vec<String> = action
            .required_tools
            .iter()
            .filter(|tool| !self.tool_available(tool))
            .map(|tool| tool.to_string())
            .collect();

        if action.privileged && !self.elevated && !self.tool_available(&self.elevation_helper) {
            missing.push(self.elevation_helper.clone());
        }
        missing
    }

    /// One-line warning listing every missing tool, if any.
    ///
    /// The AUR helper is reported apart from the rest since upgrades fall back to pacman.
    pub fn missing_tools_warning(&self) -> Option<String> {
        if self.missing_tools.is_empty() {
            return None;
        }
        warn!("Missing tools: {:?}", self.missing_tools);
        let (optional, required): (Vec<&str>, Vec<&str>) = self
            .missing_tools
            .iter()
            .map(String::as_str)
            .partition(|tool| *tool == AUR_HELPER);

        let mut parts = Vec::new();
        if !required.is_empty() {
            parts.push(format!(
                "Warning: not installed: {} (dependent actions will be skipped)",
                required.join(", ")
            ));
        }
        if !optional.is_empty() {
            parts.push(format!(
                "Note: {} is not installed, system upgrades use pacman",
                optional.join(", ")
            ));
        }
        Some(parts.join("; "))
    }
}

#[cfg(test)]
impl RuntimeConfig {
    /// Non-root configuration with every tool installed and default settings.
    pub fn for_tests() -> Self {
        let registry = Registry::new();
        let mut config =
            Self::from_parts(Settings::default(), &registry, false, BTreeSet::new())
                .expect("default settings are valid");
        config.user_cache_dir = Some(PathBuf::from("/nonexistent/arch-maintenance/cache"));
        config
    }

    pub fn with_missing(mut self, tools: &[&str]) -> Self {
        self.missing_tools = tools.iter().map(|t| t.to_string()).collect();
        self
    }
}

/// Every external program the actions may call, deduplicated.
fn probe_list(registry: &Registry, elevation_helper: &str) -> BTreeSet<String> {
    let mut tools: BTreeSet<String> = registry
        .all()
        .iter()
        .flat_map(|action| action.required_tools.iter())
        .map(|tool| tool.to_string())
        .collect();
    tools.insert(AUR_HELPER.to_string());
    tools.insert(elevation_helper.to_string());
    tools
}
