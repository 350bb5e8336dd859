//! End-to-end runs of the trafficctl binary.
//!
//! Each run gets its own config home, cache dir, and daemon socket path through the environment.

use serde_json::{json, Value};
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use trafficctl::cli::terminal::TerminalWidth;
use trafficctl::cli::RunContext;
use trafficctl::config::CliConfig;

struct Sandbox {
    _temp: TempDir,
    config_home: PathBuf,
    cache_dir: PathBuf,
    socket: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config_home = temp.path().join("config");
        let cache_dir = temp.path().join("cache");
        fs::create_dir_all(&config_home).unwrap();
        fs::create_dir_all(&cache_dir).unwrap();
        let socket = temp.path().join("daemon.sock");
        Self {
            _temp: temp,
            config_home,
            cache_dir,
            socket,
        }
    }

    fn run(&self, args: &[&str], columns: Option<&str>) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_trafficctl"));
        cmd.args(args)
            .env("XDG_CONFIG_HOME", &self.config_home)
            .env("TRAFFICCTL__DAEMON__SOCKET_PATH", &self.socket)
            .env("TRAFFICCTL__CACHE__DIR", &self.cache_dir)
            .env_remove("TRAFFICCTL_LOG")
            .env_remove("TRAFFICCTL_LOG_FORMAT")
            .env_remove("TRAFFICCTL_LOG_OUTPUT")
            .env_remove("KUBECONFIG");
        match columns {
            Some(columns) => cmd.env("COLUMNS", columns),
            None => cmd.env_remove("COLUMNS"),
        };
        cmd.output().unwrap()
    }
}

/// Answer daemon calls until the forceful disconnect, returning every request received.
fn serve_daemon(listener: UnixListener, identity: Value) -> Vec<Value> {
    let mut requests = Vec::new();
    for stream in listener.incoming() {
        let mut reader = BufReader::new(stream.unwrap());
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap() == 0 {
            // Connection probe
            continue;
        }
        let request: Value = serde_json::from_str(&line).unwrap();
        let reply = match request["method"].as_str() {
            Some("status") => json!({ "status": identity }),
            Some("helm") => json!({ "helm": {} }),
            Some("disconnect") => json!("disconnected"),
            other => panic!("unexpected method {:?}", other),
        };
        writeln!(reader.get_mut(), "{}", reply).unwrap();
        let done = request == json!({ "method": "disconnect", "force": true });
        requests.push(request);
        if done {
            break;
        }
    }
    requests
}

fn expected_help(socket: &Path, path: &[&str], width: TerminalWidth) -> String {
    let mut config = CliConfig::default();
    config.daemon.socket_path = socket.to_path_buf();
    let path: Vec<String> = path.iter().map(|s| s.to_string()).collect();
    RunContext::with_config(config)
        .help_text(&path, width, false)
        .unwrap()
}

#[test]
fn test_help_honors_columns() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["helm", "install", "--help"], Some("60"));
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        expected_help(&sandbox.socket, &["helm", "install"], TerminalWidth::Columns(60))
    );
}

#[test]
fn test_help_without_terminal_is_unbounded() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["help"], None);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, expected_help(&sandbox.socket, &[], TerminalWidth::Unbounded));
    assert!(stdout.contains("list may be incomplete because the User Daemon isn't running"));
}

#[test]
fn test_unknown_help_topic_fails() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["help", "nope"], None);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown help topic \"nope\""));
}

#[test]
fn test_lifecycle_command_requires_daemon() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["helm", "uninstall"], None);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("user daemon is not running"));
}

#[test]
fn test_uninstall_against_socket_daemon() {
    let sandbox = Sandbox::new();
    fs::write(
        sandbox.cache_dir.join("ingresses.json"),
        r#"{"https://k8s/dev": {"l5_host": "tm"}, "https://k8s/prod": {"l5_host": "tm"}}"#,
    )
    .unwrap();
    fs::write(sandbox.cache_dir.join("tokens.json"), "{}").unwrap();

    let listener = UnixListener::bind(&sandbox.socket).unwrap();
    let server = std::thread::spawn(move || {
        serve_daemon(
            listener,
            json!({ "cluster_server": "https://k8s", "cluster_context": "dev" }),
        )
    });

    let output = sandbox.run(&["helm", "uninstall", "--context", "dev"], None);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "\nTraffic Manager uninstalled successfully\n"
    );

    let requests = server.join().unwrap();
    let methods: Vec<&str> = requests
        .iter()
        .filter_map(|r| r["method"].as_str())
        .collect();
    assert_eq!(methods, vec!["disconnect", "status", "helm", "disconnect"]);
    assert_eq!(requests[2]["request"]["type"], json!("UNINSTALL"));
    assert_eq!(
        requests[2]["request"]["connect_request"]["kube_flags"]["context"],
        json!("dev")
    );

    let ingresses: Value =
        serde_json::from_str(&fs::read_to_string(sandbox.cache_dir.join("ingresses.json")).unwrap())
            .unwrap();
    assert_eq!(ingresses, json!({ "https://k8s/prod": { "l5_host": "tm" } }));
    assert!(!sandbox.cache_dir.join("tokens.json").exists());
}
