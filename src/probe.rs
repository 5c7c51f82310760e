//! Health probes for individual modules.
//!
//! A probe answers one question, "is this dependency up right now?", and never
//! returns an error: any failure along the way becomes `false`.

use crate::http_client::HttpClient;
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

#[async_trait]
pub trait Probe: Send + Sync {
    async fn check(&self) -> bool;
}

/// Healthy iff a GET to `url` answers with exactly HTTP 200 within `timeout`.
pub struct HttpProbe {
    url: String,
    timeout: Duration,
    http_client: Arc<dyn HttpClient>,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, timeout: Duration, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            url: url.into(),
            timeout,
            http_client,
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn check(&self) -> bool {
        match self.http_client.get(&self.url, self.timeout).await {
            Ok(response) if response.status_code() == 200 => true,
            Ok(response) => {
                debug!(url = %self.url, status = response.status_code(), "HTTP probe got non-200 status");
                false
            }
            Err(e) => {
                debug!(url = %self.url, error = %e, "HTTP probe request failed");
                false
            }
        }
    }
}

/// Healthy iff the readiness command exits with status 0 within `timeout`.
pub struct ProcessProbe {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessProbe {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }
}

#[async_trait]
impl Probe for ProcessProbe {
    async fn check(&self) -> bool {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(e) => {
                debug!(program = %self.program, error = %e, "failed to spawn readiness command");
                return false;
            }
        };

        match timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => {
                if !status.success() {
                    debug!(program = %self.program, %status, "readiness command failed");
                }
                status.success()
            }
            Ok(Err(e)) => {
                debug!(program = %self.program, error = %e, "failed to wait for readiness command");
                false
            }
            Err(_) => {
                debug!(program = %self.program, timeout = ?self.timeout, "readiness command timed out");
                // kill_on_drop reaps it once `child` goes out of scope
                false
            }
        }
    }
}

/// Probe with a fixed answer. Handy for tests and for disabling a module.
pub struct StaticProbe(pub bool);

#[async_trait]
impl Probe for StaticProbe {
    async fn check(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::MockHttpClient;

    fn http_probe(client: MockHttpClient, url: &str) -> HttpProbe {
        HttpProbe::new(url, Duration::from_secs(5), Arc::new(client))
    }

    #[tokio::test]
    async fn test_http_probe_healthy_on_200() {
        let client = MockHttpClient::new().with_response("http://frontend/health", 200);
        assert!(http_probe(client, "http://frontend/health").check().await);
    }

    #[tokio::test]
    async fn test_http_probe_unhealthy_on_non_200() {
        let client = MockHttpClient::new().with_response("http://frontend/health", 503);
        assert!(!http_probe(client, "http://frontend/health").check().await);

        let client = MockHttpClient::new().with_response("http://gateway/health", 204);
        assert!(!http_probe(client, "http://gateway/health").check().await);
    }

    #[tokio::test]
    async fn test_http_probe_unhealthy_on_connection_refused() {
        let client = MockHttpClient::new().with_connection_refused("http://gateway/health");
        assert!(!http_probe(client, "http://gateway/health").check().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_http_probe_uses_its_own_timeout() {
        let client: Arc<dyn HttpClient> = Arc::new(
            MockHttpClient::new()
                .with_response("http://gateway/health", 200)
                .with_delay(Duration::from_millis(1500)),
        );

        let patient = HttpProbe::new("http://gateway/health", Duration::from_secs(5), client.clone());
        let impatient = HttpProbe::new("http://gateway/health", Duration::from_millis(500), client);

        assert!(patient.check().await);
        assert!(!impatient.check().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_probe_exit_codes() {
        let ok = ProcessProbe::new("true", vec![], Duration::from_secs(5));
        let failing = ProcessProbe::new("false", vec![], Duration::from_secs(5));

        assert!(ok.check().await);
        assert!(!failing.check().await);
    }

    #[tokio::test]
    async fn test_process_probe_missing_command() {
        let probe = ProcessProbe::new(
            "definitely-not-a-real-readiness-binary",
            vec!["-h".to_string(), "localhost".to_string()],
            Duration::from_secs(1),
        );

        assert!(!probe.check().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_probe_times_out() {
        let probe = ProcessProbe::new("sleep", vec!["5".to_string()], Duration::from_millis(100));

        let started = std::time::Instant::now();
        assert!(!probe.check().await);
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
