use async_trait::async_trait;
use availability_checker::{CheckConfig, CheckEngine, OutputSink, Prober, Renderer, Service};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answers from a fixed table and counts calls per URL.
#[derive(Default)]
struct ScriptedProber {
    statuses: HashMap<String, String>,
    calls: Mutex<HashMap<String, usize>>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedProber {
    fn new(statuses: &[(&str, &str)]) -> Self {
        Self {
            statuses: statuses
                .iter()
                .map(|(url, status)| (url.to_string(), status.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn calls_for(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, url: &str) -> String {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.statuses
            .get(url)
            .cloned()
            .unwrap_or_else(|| "No such host".to_string())
    }
}

async fn run(
    config: CheckConfig,
    prober: Arc<ScriptedProber>,
    services: &mut [Service],
) -> (availability_checker::CheckReport, String) {
    let engine = CheckEngine::with_prober(config, prober).unwrap();
    let sink = OutputSink::spawn(Vec::new(), Renderer::plain());
    let report = engine.run(services, sink.sender()).await;
    let output = String::from_utf8(sink.finish().await.unwrap()).unwrap();
    (report, output)
}

fn service(name: &str, sites: &[&str]) -> Service {
    Service::new(name, sites.iter().map(|s| s.to_string()).collect())
}

#[tokio::test]
async fn test_service_with_failing_site_is_unavailable() {
    let prober = Arc::new(ScriptedProber::new(&[
        ("http://good.test", "200 OK"),
        ("http://bad.test", "500 Internal Server Error"),
    ]));
    let mut services = vec![service("A", &["http://good.test", "http://bad.test"])];

    let (report, output) = run(CheckConfig::default(), prober, &mut services).await;

    assert!(!services[0].is_available);
    assert_eq!(report.unavailable().collect::<Vec<_>>(), vec!["A"]);
    assert!(output.contains("\t URL: http://good.test 200 OK\n"));
    assert!(output.contains("\t URL: http://bad.test 500 Internal Server Error\n"));
    assert!(output.ends_with("\t Unavailable\n"));
}

#[tokio::test]
async fn test_shared_url_is_probed_once_across_services() {
    let prober = Arc::new(ScriptedProber::new(&[
        ("http://shared.test", "200 OK"),
        ("http://one.test", "200 OK"),
        ("http://two.test", "200 OK"),
    ]));
    let mut services = vec![
        service("first", &["http://shared.test", "http://one.test"]),
        service("second", &["shared.test", "http://two.test"]),
        service("third", &["http://shared.test"]),
    ];

    let (report, _) = run(CheckConfig::default(), Arc::clone(&prober), &mut services).await;

    assert_eq!(prober.calls_for("http://shared.test"), 1);
    assert_eq!(prober.total_calls(), 3);
    assert!(report.all_available());
}

#[tokio::test]
async fn test_duplicate_sites_in_one_service_probe_once() {
    let prober = Arc::new(
        ScriptedProber::new(&[("http://dup.test", "200 OK")]).with_delay(Duration::from_millis(50)),
    );
    let mut services = vec![service(
        "dups",
        &["http://dup.test", "http://dup.test", "dup.test", "*.dup.test"],
    )];

    run(CheckConfig::default(), Arc::clone(&prober), &mut services).await;

    assert_eq!(prober.calls_for("http://dup.test"), 1);
    assert!(services[0].is_available);
}

#[tokio::test]
async fn test_retry_budget_spent_on_failing_url() {
    let prober = Arc::new(ScriptedProber::new(&[("http://down.test", "503 Service Unavailable")]));
    let mut services = vec![
        service("a", &["http://down.test"]),
        service("b", &["http://down.test"]),
    ];

    let config = CheckConfig::default().with_max_retries(2);
    run(config, Arc::clone(&prober), &mut services).await;

    assert_eq!(prober.calls_for("http://down.test"), 3);
    assert!(!services[0].is_available);
    assert!(!services[1].is_available);
}

#[tokio::test]
async fn test_wildcard_site_probes_bare_domain() {
    let prober = Arc::new(ScriptedProber::new(&[("http://example.test", "200 OK")]));
    let mut services = vec![service("wild", &["*.example.test"])];

    let (_, output) = run(CheckConfig::default(), Arc::clone(&prober), &mut services).await;

    assert_eq!(prober.calls_for("http://example.test"), 1);
    assert!(services[0].is_available);
    assert!(output.contains("\t URL: *.example.test 200 OK\n"));
    assert!(output.contains("WARNING: Wildcards unsupported, reporting for example.test"));
}

#[tokio::test]
async fn test_empty_service_is_available() {
    let prober = Arc::new(ScriptedProber::default());
    let mut services = vec![service("nothing", &[])];

    let (report, output) = run(CheckConfig::default(), Arc::clone(&prober), &mut services).await;

    assert!(report.all_available());
    assert_eq!(prober.total_calls(), 0);
    assert_eq!(output, "Service: nothing\n\t Available\n");
}

#[tokio::test]
async fn test_service_blocks_are_not_interleaved() {
    let prober = Arc::new(
        ScriptedProber::new(&[
            ("http://a1.test", "200 OK"),
            ("http://a2.test", "200 OK"),
            ("http://b1.test", "404 Not Found"),
            ("http://b2.test", "200 OK"),
        ])
        .with_delay(Duration::from_millis(10)),
    );
    let mut services = vec![
        service("alpha", &["http://a1.test", "http://a2.test"]),
        service("beta", &["http://b1.test", "http://b2.test"]),
    ];

    let (report, output) = run(CheckConfig::default(), prober, &mut services).await;
    let lines: Vec<_> = output.lines().collect();

    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "Service: alpha");
    assert!(lines[1].contains("http://a"));
    assert!(lines[2].contains("http://a"));
    assert_eq!(lines[3], "\t Available");
    assert_eq!(lines[4], "Service: beta");
    assert!(lines[5].contains("http://b"));
    assert!(lines[6].contains("http://b"));
    assert_eq!(lines[7], "\t Unavailable");

    assert_eq!(report.available().collect::<Vec<_>>(), vec!["alpha"]);
    assert_eq!(report.unavailable().collect::<Vec<_>>(), vec!["beta"]);
}

#[tokio::test]
async fn test_quiet_mode_only_reports_failures() {
    let prober = Arc::new(ScriptedProber::new(&[
        ("http://good.test", "200 OK"),
        ("http://bad.test", "500 Internal Server Error"),
    ]));
    let mut services = vec![service("A", &["http://good.test", "http://bad.test"])];

    let (_, output) = run(CheckConfig::default().with_quiet(true), prober, &mut services).await;

    assert!(!output.contains("good.test"));
    assert!(output.contains("\t URL: http://bad.test 500 Internal Server Error\n"));
}

#[tokio::test]
async fn test_concurrent_probes_are_bounded() {
    let sites: Vec<String> = (0..12).map(|i| format!("http://site{}.test", i)).collect();
    let statuses: Vec<(&str, &str)> = sites.iter().map(|s| (s.as_str(), "200 OK")).collect();
    let prober = Arc::new(ScriptedProber::new(&statuses).with_delay(Duration::from_millis(30)));
    let mut services = vec![Service::new("wide", sites.clone())];

    let config = CheckConfig::default().with_max_concurrent_probes(3);
    run(config, Arc::clone(&prober), &mut services).await;

    assert_eq!(prober.total_calls(), 12);
    assert!(prober.peak_in_flight.load(Ordering::SeqCst) <= 3);
    assert!(services[0].is_available);
}

#[tokio::test]
async fn test_end_to_end_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/good"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/bad"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let good = format!("{}/good", mock_server.uri());
    let bad = format!("{}/bad", mock_server.uri());
    let mut services = vec![
        Service::new("A", vec![good.clone(), bad.clone()]),
        Service::new("B", vec![good.clone()]),
    ];

    let config = CheckConfig::default()
        .with_timeout(Duration::from_secs(5))
        .with_max_retries(1);
    let engine = CheckEngine::new(config).unwrap();
    let sink = OutputSink::spawn(Vec::new(), Renderer::plain());
    let report = engine.run(&mut services, sink.sender()).await;
    let output = String::from_utf8(sink.finish().await.unwrap()).unwrap();

    assert_eq!(report.available().collect::<Vec<_>>(), vec!["B"]);
    assert_eq!(report.unavailable().collect::<Vec<_>>(), vec!["A"]);
    assert!(output.contains(&format!("\t URL: {} 500 Internal Server Error\n", bad)));
    assert_eq!(engine.cache().len().await, 2);
}
