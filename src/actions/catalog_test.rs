use super::{ActionContext, Mode, Registry};
use crate::config::RuntimeConfig;
use crate::error::{AppError, Result};
use crate::models::Notice;
use crate::system::{InvocationResult, RecordingRunner};
use std::fs;
use tempfile::TempDir;

// Run the registered action `id` against a recording runner.
fn run_action(
    id: u8,
    config: &RuntimeConfig,
    mode: Mode,
    runner: &mut RecordingRunner,
) -> Result<Option<Notice>> {
    let registry = Registry::new();
    let action = registry.lookup(id).unwrap();
    let mut ctx = ActionContext::new(config, mode, runner);
    (action.run)(&mut ctx)
}

#[test]
fn test_update_prefers_aur_helper_without_elevation() {
    let config = RuntimeConfig::for_tests();
    let mut runner = RecordingRunner::new();

    let result = run_action(1, &config, Mode::Interactive, &mut runner);

    assert!(matches!(result, Ok(None)));
    assert_eq!(runner.command_lines(), vec!["yay -Syu"]);
}

#[test]
fn test_update_falls_back_to_elevated_pacman() {
    let config = RuntimeConfig::for_tests().with_missing(&["yay"]);
    let mut runner = RecordingRunner::new();

    run_action(1, &config, Mode::Unattended, &mut runner).unwrap();

    assert_eq!(runner.command_lines(), vec!["sudo pacman -Syu --noconfirm"]);
}

#[test]
fn test_update_as_root_has_no_wrapper() {
    let mut config = RuntimeConfig::for_tests().with_missing(&["yay"]);
    config.elevated = true;
    let mut runner = RecordingRunner::new();

    run_action(1, &config, Mode::Interactive, &mut runner).unwrap();

    assert_eq!(runner.command_lines(), vec!["pacman -Syu"]);
}

#[test]
fn test_update_as_root_skips_aur_helper() {
    let mut config = RuntimeConfig::for_tests();
    config.elevated = true;
    let mut runner = RecordingRunner::new();

    run_action(1, &config, Mode::Unattended, &mut runner).unwrap();

    assert_eq!(runner.command_lines(), vec!["pacman -Syu --noconfirm"]);
}

#[test]
fn test_update_failure_names_the_command() {
    let config = RuntimeConfig::for_tests();
    let mut runner = RecordingRunner::new().respond("yay -Syu", InvocationResult::exited(1));

    let err = run_action(1, &config, Mode::Interactive, &mut runner).unwrap_err();

    match err {
        AppError::ActionFailure { command, status } => {
            assert_eq!(command, "yay -Syu");
            assert_eq!(status, "exited with code 1");
        },
        other => panic!("Expected ActionFailure, got {:?}", other),
    }
}

#[test]
fn test_flatpak_update_assumes_yes_only_when_unattended() {
    let config = RuntimeConfig::for_tests();

    let mut interactive = RecordingRunner::new();
    run_action(2, &config, Mode::Interactive, &mut interactive).unwrap();
    assert_eq!(interactive.command_lines(), vec!["flatpak update"]);

    let mut unattended = RecordingRunner::new();
    run_action(2, &config, Mode::Unattended, &mut unattended).unwrap();
    assert_eq!(unattended.command_lines(), vec!["flatpak update -y"]);
}

#[test]
fn test_mirror_refresh_uses_configured_values() {
    let mut config = RuntimeConfig::for_tests();
    config.mirror_count = 7;
    config.mirrorlist = "/tmp/mirrorlist".into();
    let mut runner = RecordingRunner::new();

    run_action(3, &config, Mode::Interactive, &mut runner).unwrap();

    assert_eq!(
        runner.command_lines(),
        vec!["sudo reflector --latest 7 --protocol https --sort rate --save /tmp/mirrorlist"]
    );
}

#[test]
fn test_firmware_full_update() {
    let config = RuntimeConfig::for_tests();
    let mut runner = RecordingRunner::new();

    run_action(4, &config, Mode::Interactive, &mut runner).unwrap();

    assert_eq!(
        runner.command_lines(),
        vec![
            "fwupdmgr refresh --force",
            "fwupdmgr get-updates",
            "fwupdmgr update -y"
        ]
    );
}

#[test]
fn test_firmware_without_updates_is_a_notice() {
    let config = RuntimeConfig::for_tests();
    let mut runner = RecordingRunner::new()
        .respond("fwupdmgr refresh --force", InvocationResult::exited(2))
        .respond("fwupdmgr get-updates", InvocationResult::exited(2));

    let result = run_action(4, &config, Mode::Interactive, &mut runner).unwrap();

    assert_eq!(result, Some(Notice::NoUpdatesAvailable));
    assert_eq!(runner.calls.len(), 2);
}

#[test]
fn test_firmware_refresh_failure_stops_dependent_steps() {
    let config = RuntimeConfig::for_tests();
    let mut runner =
        RecordingRunner::new().respond("fwupdmgr refresh --force", InvocationResult::exited(1));

    let result = run_action(4, &config, Mode::Interactive, &mut runner);

    assert!(matches!(result, Err(AppError::ActionFailure { .. })));
    assert_eq!(runner.command_lines(), vec!["fwupdmgr refresh --force"]);
}

#[test]
fn test_package_cache_steps_are_independent() {
    let config = RuntimeConfig::for_tests();
    let mut runner = RecordingRunner::new().respond("paccache -rk3", InvocationResult::exited(1));

    let result = run_action(5, &config, Mode::Interactive, &mut runner);

    assert!(matches!(
        result,
        Err(AppError::ActionFailure { ref command, .. }) if command == "sudo paccache -rk3"
    ));
    assert_eq!(
        runner.command_lines(),
        vec!["sudo paccache -rk3", "sudo pacman -Sc --noconfirm"]
    );
}

#[test]
fn test_flatpak_cleanup_repairs_elevated() {
    let config = RuntimeConfig::for_tests();
    let mut runner = RecordingRunner::new();

    run_action(6, &config, Mode::Interactive, &mut runner).unwrap();

    assert_eq!(
        runner.command_lines(),
        vec!["flatpak uninstall --unused -y", "sudo flatpak repair"]
    );
}

#[test]
fn test_no_orphans_skips_removal() {
    let config = RuntimeConfig::for_tests();
    let mut runner = RecordingRunner::new().respond("pacman -Qtdq", InvocationResult::exited(1));

    let result = run_action(7, &config, Mode::Interactive, &mut runner).unwrap();

    assert_eq!(result, Some(Notice::NoOrphans));
    assert_eq!(Notice::NoOrphans.to_string(), "No orphaned packages to remove.");
    assert_eq!(runner.command_lines(), vec!["pacman -Qtdq"]);
}

#[test]
fn test_orphans_are_removed_with_exactly_the_queried_list() {
    let config = RuntimeConfig::for_tests();
    let mut runner = RecordingRunner::new().respond(
        "pacman -Qtdq",
        InvocationResult::with_stdout(0, "libfoo\npython-bar\n\n"),
    );

    let result = run_action(7, &config, Mode::Interactive, &mut runner).unwrap();

    assert_eq!(result, None);
    assert_eq!(
        runner.command_lines(),
        vec![
            "pacman -Qtdq",
            "sudo pacman -Rns --noconfirm libfoo python-bar"
        ]
    );
}

#[test]
fn test_orphan_query_error_is_a_failure() {
    let config = RuntimeConfig::for_tests();
    let mut runner = RecordingRunner::new().respond("pacman -Qtdq", InvocationResult::exited(3));

    let result = run_action(7, &config, Mode::Interactive, &mut runner);

    assert!(matches!(result, Err(AppError::ActionFailure { .. })));
    assert_eq!(runner.calls.len(), 1);
}

#[test]
fn test_journal_vacuum_uses_retention() {
    let mut config = RuntimeConfig::for_tests();
    config.journal_retention = "10d".to_string();
    let mut runner = RecordingRunner::new();

    run_action(8, &config, Mode::Interactive, &mut runner).unwrap();

    assert_eq!(
        runner.command_lines(),
        vec!["sudo journalctl --vacuum-time=10d"]
    );
}

#[test]
fn test_user_cache_is_deleted() {
    let home = TempDir::new().unwrap();
    let cache = home.path().join(".cache");
    fs::create_dir_all(cache.join("thumbnails/large")).unwrap();
    fs::write(cache.join("thumbnails/large/a.png"), b"png").unwrap();

    let mut config = RuntimeConfig::for_tests();
    config.user_cache_dir = Some(cache.clone());
    let mut runner = RecordingRunner::new();

    run_action(9, &config, Mode::Interactive, &mut runner).unwrap();

    assert!(!cache.exists());
    assert!(runner.calls.is_empty());
}

#[test]
fn test_missing_cache_directories_are_not_failures() {
    let home = TempDir::new().unwrap();
    let mut config = RuntimeConfig::for_tests();
    config.user_cache_dir = Some(home.path().join("absent"));
    config.steam_cache_dirs = vec![home.path().join("httpcache"), home.path().join("librarycache")];
    let mut runner = RecordingRunner::new();

    assert!(run_action(9, &config, Mode::Interactive, &mut runner).is_ok());
    assert!(run_action(10, &config, Mode::Interactive, &mut runner).is_ok());
}

#[test]
fn test_steam_caches_are_deleted() {
    let data = TempDir::new().unwrap();
    let appcache = data.path().join("Steam/appcache");
    let http = appcache.join("httpcache");
    let library = appcache.join("librarycache");
    fs::create_dir_all(http.join("ab")).unwrap();
    fs::create_dir_all(&library).unwrap();
    fs::write(library.join("440_header.jpg"), b"jpg").unwrap();

    let mut config = RuntimeConfig::for_tests();
    config.steam_cache_dirs = vec![http.clone(), library.clone()];
    let mut runner = RecordingRunner::new();

    run_action(10, &config, Mode::Unattended, &mut runner).unwrap();

    assert!(!http.exists());
    assert!(!library.exists());
    assert!(appcache.exists());
}

#[test]
fn test_interrupted_step_is_fatal() {
    let config = RuntimeConfig::for_tests();
    let mut runner = RecordingRunner::new().respond("paccache -rk3", InvocationResult::killed(2));

    let err = run_action(5, &config, Mode::Unattended, &mut runner).unwrap_err();

    assert!(err.is_fatal());
    // The independent second step is not attempted after an interrupt.
    assert_eq!(runner.calls.len(), 1);
}

#[test]
fn test_unspawnable_program_is_not_fatal() {
    let mut config = RuntimeConfig::for_tests();
    config.elevated = true;
    let mut runner = RecordingRunner::new().unspawnable("journalctl");

    let err = run_action(8, &config, Mode::Interactive, &mut runner).unwrap_err();

    assert!(matches!(err, AppError::Io(_)));
    assert!(!err.is_fatal());
}
