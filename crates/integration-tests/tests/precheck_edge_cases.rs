//! Precheck Edge Case Tests
//!
//! Folder permission task against real and mocked hosts

use ghostctl_core::application::doctor::install_folder_permissions::TASK_TITLE;
use ghostctl_core::application::{run_checks, DoctorCheck, InstallFolderPermissions};
use ghostctl_core::domain::{Instance, Platform, TaskContext};
use ghostctl_core::error::AppError;
use ghostctl_core::port::directory_checker::mocks::MockDirectoryChecker;
use ghostctl_core::port::system_probe::mocks::MockSystemProbe;
use ghostctl_core::port::SystemProbe;
use ghostctl_infra_system::SystemProbeImpl;
use std::sync::Arc;

/// Read-only working directory: configuration error naming the exact path
#[tokio::test]
async fn test_read_only_dir_names_path() {
    let checker = Arc::new(MockDirectoryChecker::new());
    let task = InstallFolderPermissions::new(
        Arc::new(MockSystemProbe::linux("/srv/sites/my blog").read_only()),
        checker.clone(),
    );

    let err = task
        .run(&TaskContext::new(Platform::from_os("linux")))
        .await
        .unwrap_err();

    match &err {
        AppError::Configuration { message, task, .. } => {
            assert!(message.starts_with("The directory /srv/sites/my blog is not writable"));
            assert_eq!(task.as_deref(), Some(TASK_TITLE));
        }
        other => panic!("expected configuration error, got {:?}", other),
    }
    assert_eq!(checker.call_count(), 0);
}

/// Every non-targeted combination skips the ancestor walk
#[tokio::test]
async fn test_ancestor_check_skipped() {
    let linux = Platform::from_os("linux");
    let contexts = vec![
        TaskContext::new(Platform::from_os("macos")),
        TaskContext::new(Platform::from_os("windows")),
        TaskContext {
            local: true,
            ..TaskContext::new(linux)
        },
        TaskContext {
            instance: Some(Instance::new("blog", "/var/www/blog").with_process_name("local")),
            ..TaskContext::new(linux)
        },
        TaskContext {
            setup_linux_user: Some(false),
            ..TaskContext::new(linux)
        },
    ];

    for ctx in contexts {
        let checker = Arc::new(MockDirectoryChecker::new());
        let task = InstallFolderPermissions::new(
            Arc::new(MockSystemProbe::new(ctx.platform, "/var/www/blog")),
            checker.clone(),
        );

        task.run(&ctx).await.unwrap();
        assert_eq!(checker.call_count(), 0, "ancestor check ran for {:?}", ctx);
    }
}

/// Real probe on the test's own working directory
#[tokio::test]
async fn test_real_probe_writable_cwd() {
    let system = Arc::new(SystemProbeImpl::default());
    let cwd = system.current_dir().unwrap();
    if system.check_access(&cwd).is_err() {
        return;
    }

    let checker = Arc::new(MockDirectoryChecker::new());
    let task = InstallFolderPermissions::new(system, checker.clone());
    let checks: Vec<&dyn DoctorCheck> = vec![&task];

    let linux = TaskContext::new(Platform::from_os("linux"));
    let ran = run_checks(&checks, "update", &linux).await.unwrap();

    assert_eq!(ran, 1);
    assert_eq!(checker.call_count(), 1);
    assert_eq!(checker.calls()[0].dir, cwd);
}
