//! The maintenance actions themselves.
//!
//! Each body builds the command lines for one operation, runs them through
//! the [`ActionContext`] and maps exit codes onto success, an informational
//! [`Notice`] or an error.

use super::context::{failure, ActionContext};
use super::registry::Action;
use crate::config::AUR_HELPER;
use crate::error::{AppError, Result};
use crate::models::Notice;
use crate::system::Invocation;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// `fwupdmgr` exit code meaning "nothing to do".
const FWUPD_NOTHING_TO_DO: i32 = 2;

/// Menu order. Ids are part of the user interface and must not be renumbered.
pub static CATALOGUE: &[Action] = &[
    Action {
        id: 1,
        label: "Update system packages",
        required_tools: &["pacman"],
        destructive: false,
        privileged: true,
        run: update_system,
    },
    Action {
        id: 2,
        label: "Update Flatpak applications",
        required_tools: &["flatpak"],
        destructive: false,
        privileged: false,
        run: update_flatpak,
    },
    Action {
        id: 3,
        label: "Refresh pacman mirror list",
        required_tools: &["reflector"],
        destructive: false,
        privileged: true,
        run: refresh_mirrors,
    },
    Action {
        id: 4,
        label: "Update device firmware",
        required_tools: &["fwupdmgr"],
        destructive: true,
        privileged: false,
        run: update_firmware,
    },
    Action {
        id: 5,
        label: "Clean pacman package cache",
        required_tools: &["paccache", "pacman"],
        destructive: false,
        privileged: true,
        run: clean_package_cache,
    },
    Action {
        id: 6,
        label: "Clean up Flatpak (unused runtimes, repair)",
        required_tools: &["flatpak"],
        destructive: false,
        privileged: true,
        run: clean_flatpak,
    },
    Action {
        id: 7,
        label: "Remove orphaned packages",
        required_tools: &["pacman"],
        destructive: true,
        privileged: true,
        run: remove_orphans,
    },
    Action {
        id: 8,
        label: "Vacuum systemd journal",
        required_tools: &["journalctl"],
        destructive: false,
        privileged: true,
        run: vacuum_journal,
    },
    Action {
        id: 9,
        label: "Clear user cache directory",
        required_tools: &[],
        destructive: false,
        privileged: false,
        run: clear_user_cache,
    },
    Action {
        id: 10,
        label: "Clear Steam HTTP/library caches",
        required_tools: &[],
        destructive: false,
        privileged: false,
        run: clear_steam_cache,
    },
];

/// Order for the full run: mirrors before the upgrade that downloads from
/// them, orphans once upgrades are done, caches last.
pub static CURATED_ORDER: &[u8] = &[3, 1, 2, 4, 7, 5, 6, 8, 9, 10];

fn update_system(ctx: &mut ActionContext<'_>) -> Result<Option<Notice>> {
    let mut args = vec!["-Syu"];
    if ctx.unattended() {
        args.push("--noconfirm");
    }

    // The AUR helper elevates on its own and refuses to run as root.
    let invocation = if !ctx.config.elevated && ctx.config.tool_available(AUR_HELPER) {
        Invocation::new(AUR_HELPER, args)
    } else {
        ctx.privileged(Invocation::new("pacman", args))
    };

    ctx.expect_success(&invocation)?;
    Ok(None)
}

fn update_flatpak(ctx: &mut ActionContext<'_>) -> Result<Option<Notice>> {
    let mut args = vec!["update"];
    if ctx.unattended() {
        args.push("-y");
    }
    ctx.expect_success(&Invocation::new("flatpak", args))?;
    Ok(None)
}

fn refresh_mirrors(ctx: &mut ActionContext<'_>) -> Result<Option<Notice>> {
    let invocation = ctx.privileged(Invocation::new(
        "reflector",
        [
            "--latest".to_string(),
            ctx.config.mirror_count.to_string(),
            "--protocol".to_string(),
            "https".to_string(),
            "--sort".to_string(),
            "rate".to_string(),
            "--save".to_string(),
            ctx.config.mirrorlist.display().to_string(),
        ],
    ));
    ctx.expect_success(&invocation)?;
    Ok(None)
}

fn update_firmware(ctx: &mut ActionContext<'_>) -> Result<Option<Notice>> {
    let refresh = Invocation::new("fwupdmgr", ["refresh", "--force"]);
    let refreshed = ctx.run(&refresh)?;
    if !refreshed.success() && refreshed.code != Some(FWUPD_NOTHING_TO_DO) {
        return Err(failure(&refresh, &refreshed));
    }

    let check = Invocation::new("fwupdmgr", ["get-updates"]);
    let available = ctx.run(&check)?;
    if available.code == Some(FWUPD_NOTHING_TO_DO) {
        info!("Firmware is up to date");
        return Ok(Some(Notice::NoUpdatesAvailable));
    }
    if !available.success() {
        return Err(failure(&check, &available));
    }

    ctx.expect_success(&Invocation::new("fwupdmgr", ["update", "-y"]))?;
    Ok(None)
}

fn clean_package_cache(ctx: &mut ActionContext<'_>) -> Result<Option<Notice>> {
    let keep = format!("-rk{}", ctx.config.cache_keep);
    let steps = [
        ctx.privileged(Invocation::new("paccache", [keep])),
        ctx.privileged(Invocation::new("pacman", ["-Sc", "--noconfirm"])),
    ];
    ctx.run_independent(&steps)?;
    Ok(None)
}

fn clean_flatpak(ctx: &mut ActionContext<'_>) -> Result<Option<Notice>> {
    let steps = [
        Invocation::new("flatpak", ["uninstall", "--unused", "-y"]),
        ctx.privileged(Invocation::new("flatpak", ["repair"])),
    ];
    ctx.run_independent(&steps)?;
    Ok(None)
}

fn remove_orphans(ctx: &mut ActionContext<'_>) -> Result<Option<Notice>> {
    let query = Invocation::new("pacman", ["-Qtdq"]).captured();
    let found = ctx.run(&query)?;

    let orphans: Vec<String> = found
        .stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    // pacman exits 1 when the query matches nothing.
    if orphans.is_empty() && matches!(found.code, Some(0) | Some(1)) {
        return Ok(Some(Notice::NoOrphans));
    }
    if !found.success() {
        return Err(failure(&query, &found));
    }

    info!("Removing {} orphaned packages: {}", orphans.len(), orphans.join(" "));
    let mut args = vec!["-Rns".to_string(), "--noconfirm".to_string()];
    args.extend(orphans);
    let removal = ctx.privileged(Invocation::new("pacman", args));
    ctx.expect_success(&removal)?;
    Ok(None)
}

fn vacuum_journal(ctx: &mut ActionContext<'_>) -> Result<Option<Notice>> {
    let retention = format!("--vacuum-time={}", ctx.config.journal_retention);
    let invocation = ctx.privileged(Invocation::new("journalctl", [retention]));
    ctx.expect_success(&invocation)?;
    Ok(None)
}

fn clear_user_cache(ctx: &mut ActionContext<'_>) -> Result<Option<Notice>> {
    let dir = ctx.config.user_cache_dir.as_deref().ok_or_else(|| AppError::ActionFailure {
        command: "remove user cache".to_string(),
        status: "could not resolve the user cache directory".to_string(),
    })?;
    remove_tree(dir)?;
    Ok(None)
}

fn clear_steam_cache(ctx: &mut ActionContext<'_>) -> Result<Option<Notice>> {
    let mut first_failure = None;
    for dir in &ctx.config.steam_cache_dirs {
        if let Err(err) = remove_tree(dir) {
            warn!("Could not remove {}: {}", dir.display(), err);
            first_failure.get_or_insert(err);
        }
    }
    first_failure.map_or(Ok(None), Err)
}

/// Recursively delete `dir`. A directory that does not exist is not an error.
fn remove_tree(dir: &Path) -> Result<()> {
    if !dir.exists() {
        debug!("{} does not exist, nothing to remove", dir.display());
        return Ok(());
    }
    info!("Removing {}", dir.display());
    fs::remove_dir_all(dir)?;
    Ok(())
}
