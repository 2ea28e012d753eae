#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// A `deputy` command with a clean environment, pointed at `base_url`.
#[allow(dead_code)]
pub fn deputy_cmd(base_url: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("deputy"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env_remove("DEPUTY_OUTPUT");
    cmd.env("DEPUTY_BASE_URL", base_url);
    cmd.env("DEPUTY_TOKEN", "test-token");
    cmd.env("DEPUTY_TIMEOUT", "5");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Mount a JSON body on `GET {route}`.
#[allow(dead_code)]
pub async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a failure status on `GET {route}`.
#[allow(dead_code)]
pub async fn mount_status(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub fn employees() -> serde_json::Value {
    serde_json::json!([
        {"Id": 1, "DisplayName": "Ada Lovelace", "Active": true, "StartDate": "2020-01-06"},
        {"Id": 2, "DisplayName": "Grace Hopper", "Active": true},
        {"Id": 3, "DisplayName": "Alan Turing", "Active": false},
        {"Id": 4, "FirstName": "Edsger", "LastName": "Dijkstra", "Active": true}
    ])
}

/// Parse stdout as one JSON document.
#[allow(dead_code)]
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

/// Parse stderr as one JSON error document.
#[allow(dead_code)]
pub fn stderr_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stderr).expect("stderr should be JSON")
}
