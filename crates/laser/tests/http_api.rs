//! Drives the laser API through a real listener, the way client software would.

use std::sync::Arc;
use std::time::Duration;

use laser::api::{laser_routes, LaserApiState};
use laser::{SharedLaser, VirtualLaser};
use serde_json::Value;
use server::{HttpServer, Server, ServerConfig, ServerExt};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct Running {
    base: String,
    token: CancellationToken,
    handle: JoinHandle<server::Result<()>>,
}

impl Running {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn stop(self) {
        self.token.cancel();
        let result = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
        assert!(matches!(result, Ok(Ok(Ok(())))));
    }
}

async fn start() -> Running {
    let laser = SharedLaser::new(VirtualLaser::new());
    let router = laser_routes(Arc::new(LaserApiState::new(laser)));
    let server = HttpServer::new(ServerConfig::ephemeral(), router);
    let observer = server.clone();
    let (handle, token) = server.spawn();

    for _ in 0..100 {
        if let Some(addr) = observer.address() {
            return Running {
                base: format!("http://{addr}"),
                token,
                handle,
            };
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("laser server did not start");
}

#[tokio::test]
async fn test_client_session() {
    let running = start().await;
    let client = reqwest::Client::new();

    let state: Value = client
        .get(running.url("/v1/Basic/ActualStateName"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(state, "StateOperational");

    let response = client
        .put(running.url("/v1/Basic/TargetAttenuatorPercentage"))
        .body("\"75.5\"")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let target: Value = client
        .get(running.url("/v1/Basic/TargetAttenuatorPercentage"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(target, "75.5");

    let response = client
        .post(running.url("/v1/Basic/EnableOutput"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let basic: Value = client
        .get(running.url("/v1/Basic"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(basic["ActualStateName"], "StateEmissionOn");
    assert!(basic["ActualOutputPower"].as_f64().unwrap() > 0.0);

    let response = client
        .post(running.url("/v1/Basic/TurnOn"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
    let error: Value = response.json().await.unwrap();
    assert_eq!(
        error["error"]["message"],
        "Cannot turn on laser in state StateEmissionOn"
    );

    running.stop().await;
}

#[tokio::test]
async fn test_health_over_the_wire() {
    let running = start().await;

    let health: Value = reqwest::get(running.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
    assert!(health["timestamp"].is_string());

    running.stop().await;
}
