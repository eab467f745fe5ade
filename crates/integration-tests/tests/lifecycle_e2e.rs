//! Lifecycle End-to-End Tests
//!
//! Provider selection -> systemd process manager -> supervisor commands -> readiness

use ghostctl_core::application::select_provider;
use ghostctl_core::domain::Instance;
use ghostctl_core::error::AppError;
use ghostctl_core::port::command_runner::mocks::{MockCommandRunner, MockResponse};
use ghostctl_core::port::readiness::mocks::MockReadinessProbe;
use ghostctl_core::port::system_probe::mocks::MockSystemProbe;
use ghostctl_core::port::ProcessManagerProvider;
use ghostctl_infra_system::{PortPollingReadiness, SystemdConfig, SystemdProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

const UNIT_FILE: &str = "/lib/systemd/system/ghost_blog.service";

fn set_up_system() -> Arc<MockSystemProbe> {
    Arc::new(
        MockSystemProbe::linux("/var/www/blog")
            .with_marker(1001)
            .with_path(UNIT_FILE),
    )
}

/// Scenario: instance "blog" on a systemd host
#[tokio::test]
async fn test_start_blog_instance() {
    let runner = Arc::new(MockCommandRunner::new().with_tool("systemctl"));
    let readiness = Arc::new(MockReadinessProbe::new_ready());
    let providers: Vec<Arc<dyn ProcessManagerProvider>> = vec![Arc::new(SystemdProvider::new(
        runner.clone(),
        set_up_system(),
        readiness.clone(),
        SystemdConfig::default(),
    ))];

    let provider = select_provider(&providers, None).await.unwrap();
    assert_eq!(provider.name(), "systemd");

    let pm = provider.create(Instance::new("blog", "/var/www/blog"));
    pm.start().await.unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].sudo);
    assert_eq!(calls[0].command, "systemctl start ghost_blog");

    let waits = readiness.seen();
    assert_eq!(waits.len(), 1);
    assert_eq!(waits[0].log_suggestion, "journalctl -u ghost_blog -n 50");
}

/// Host without systemctl: no provider is selected
#[tokio::test]
async fn test_no_supervisor_on_host() {
    let providers: Vec<Arc<dyn ProcessManagerProvider>> = vec![Arc::new(SystemdProvider::new(
        Arc::new(MockCommandRunner::new()),
        set_up_system(),
        Arc::new(MockReadinessProbe::new_ready()),
        SystemdConfig::default(),
    ))];

    let err = select_provider(&providers, None).await.err().unwrap();
    assert!(matches!(err, AppError::Configuration { .. }));
}

/// Start with a real port poller: the instance comes up on a local port
#[tokio::test]
async fn test_start_waits_for_open_port() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let runner = Arc::new(MockCommandRunner::new().with_tool("systemctl"));
    let provider = SystemdProvider::new(
        runner.clone(),
        set_up_system(),
        Arc::new(PortPollingReadiness::new(
            "127.0.0.1",
            port,
            Duration::from_secs(2),
            Duration::from_millis(50),
        )),
        SystemdConfig::default(),
    );

    let pm = provider.create(Instance::new("blog", "/var/www/blog"));
    pm.restart().await.unwrap();

    assert_eq!(runner.calls()[0].command, "systemctl restart ghost_blog");
}

/// Start with a real port poller: nothing listens, error carries the log hint
#[tokio::test]
async fn test_start_times_out_with_log_suggestion() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let provider = SystemdProvider::new(
        Arc::new(MockCommandRunner::new()),
        set_up_system(),
        Arc::new(PortPollingReadiness::new(
            "127.0.0.1",
            port,
            Duration::from_millis(200),
            Duration::from_millis(50),
        )),
        SystemdConfig::default(),
    );

    let err = provider
        .create(Instance::new("blog", "/var/www/blog"))
        .start()
        .await
        .unwrap_err();

    match err {
        AppError::Process(text) => assert!(text.contains("journalctl -u ghost_blog -n 50")),
        other => panic!("expected process error, got {:?}", other),
    }
}

/// Status queries map supervisor wording onto booleans
#[tokio::test]
async fn test_status_of_stopped_disabled_instance() {
    let runner = Arc::new(MockCommandRunner::new());
    runner.respond(
        "systemctl is-active ghost_blog",
        MockResponse::fail_stdout("inactive"),
    );
    runner.respond(
        "systemctl is-enabled ghost_blog",
        MockResponse::fail_stdout("disabled"),
    );

    let provider = SystemdProvider::new(
        runner.clone(),
        set_up_system(),
        Arc::new(MockReadinessProbe::new_ready()),
        SystemdConfig::default(),
    );
    let pm = provider.create(Instance::new("blog", "/var/www/blog"));

    assert!(!pm.is_running().await.unwrap());
    assert!(!pm.is_enabled().await.unwrap());

    pm.enable().await.unwrap();
    pm.stop().await.unwrap();

    let commands: Vec<String> = runner.calls().into_iter().map(|c| c.command).collect();
    assert_eq!(
        commands,
        vec![
            "systemctl is-active ghost_blog",
            "systemctl is-enabled ghost_blog",
            "systemctl enable ghost_blog --quiet",
            "systemctl stop ghost_blog",
        ]
    );
}

/// Readiness notification from inside the managed process
#[tokio::test(start_paused = true)]
async fn test_success_keeps_process_alive_after_notify() {
    let runner = Arc::new(MockCommandRunner::new());
    let provider = SystemdProvider::new(
        runner.clone(),
        set_up_system(),
        Arc::new(MockReadinessProbe::new_ready()),
        SystemdConfig {
            notify_delay: Duration::from_secs(10),
            ..Default::default()
        },
    );
    let pm = provider.create(Instance::new("blog", "/var/www/blog"));

    let started = tokio::time::Instant::now();
    pm.success(31337).await.unwrap();

    assert!(started.elapsed() >= Duration::from_secs(10));
    assert_eq!(runner.calls()[0].command, "systemd-notify --ready --pid=31337");
}
