use std::io::Write;
use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tempfile::{NamedTempFile, TempDir};
use tokio::time::{sleep, timeout};

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Create a minimal valid config
fn minimal_config(port: u16, scratch_dir: &Path) -> String {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = {}

[scratch]
dir = '{}'

[provider]
ytdlp_path = "/nonexistent/yt-dlp"

[converter]
ffmpeg_path = "/nonexistent/ffmpeg"
"#,
        port,
        scratch_dir.display()
    )
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

fn command() -> tokio::process::Command {
    let mut command = tokio::process::Command::new(env!("CARGO_BIN_EXE_fastmusic"));
    command
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true);
    command
}

/// Wait for server to be ready
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_health_endpoint() {
    let port = get_available_port();
    let scratch = TempDir::new().unwrap();
    let scratch_dir = scratch.path().join("downloads");
    let config = write_config(&minimal_config(port, &scratch_dir));

    // Missing external tools only produce warnings at startup
    let mut server = command()
        .env("FASTMUSIC_CONFIG", config.path())
        .spawn()
        .expect("Failed to spawn server");

    assert!(
        wait_for_server(port, 100).await,
        "Server did not start in time"
    );

    let client = Client::new();
    let response = client
        .get(format!("http://127.0.0.1:{}/health", port))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["status"], "healthy");

    // Scratch directory is created on startup
    assert!(scratch_dir.is_dir());

    server.kill().await.ok();
}

#[tokio::test]
async fn test_env_only_configuration() {
    let port = get_available_port();
    let scratch = TempDir::new().unwrap();

    let mut server = command()
        .env("FASTMUSIC_CONFIG", "/nonexistent/config.toml")
        .env("FASTMUSIC_SERVER__HOST", "127.0.0.1")
        .env("FASTMUSIC_SERVER__PORT", port.to_string())
        .env("FASTMUSIC_SCRATCH__DIR", scratch.path())
        .env("FASTMUSIC_PROVIDER__YTDLP_PATH", "/nonexistent/yt-dlp")
        .env("FASTMUSIC_CONVERTER__FFMPEG_PATH", "/nonexistent/ffmpeg")
        .spawn()
        .expect("Failed to spawn server");

    assert!(
        wait_for_server(port, 100).await,
        "Server did not start in time"
    );

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/", port))
        .send()
        .await
        .expect("Failed to send request");
    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["message"], "FastMusic API is running");

    server.kill().await.ok();
}

#[tokio::test]
async fn test_invalid_config_exits_with_error() {
    let config = write_config("[server]\nport = 0\n");

    let result = timeout(
        Duration::from_secs(5),
        command().env("FASTMUSIC_CONFIG", config.path()).output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}

#[tokio::test]
async fn test_unparseable_config_exits_with_error() {
    let config = write_config("[server\nport = ");

    let result = timeout(
        Duration::from_secs(5),
        command().env("FASTMUSIC_CONFIG", config.path()).output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}
