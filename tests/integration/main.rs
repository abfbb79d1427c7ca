//! Integration tests for offcache

mod agent_tests {
    use async_trait::async_trait;
    use offcache::agent::{
        AgentConfig, Event, EventOutcome, FetchOutcome, NotificationClick, OfflineAgent,
        ResponseSource, SyncOutcome, DEFAULT_GENERATION,
    };
    use offcache::cache::CachedEntry;
    use offcache::fetch::{Method, Request, Response, ResponseType, Scope};
    use offcache::host::{
        CacheStorage, ClientInfo, Clients, DataSync, DiskCacheStorage, Host, MemoryCacheStorage,
        Network, Notification, Registration,
    };
    use offcache::{OffcacheError, OffcacheResult};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tokio::sync::oneshot;
    use uuid::Uuid;

    const SCOPE: &str = "http://localhost:8080/";

    /// Answers 200 for everything unless told otherwise
    #[derive(Default)]
    struct StubNetwork {
        calls: AtomicUsize,
        offline: AtomicBool,
        failing: Mutex<Vec<String>>,
        statuses: Mutex<HashMap<String, u16>>,
        opaque: Mutex<Vec<String>>,
    }

    impl StubNetwork {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn go_offline(&self) {
            self.offline.store(true, Ordering::SeqCst);
        }

        fn fail(&self, url: &str) {
            self.failing.lock().unwrap().push(url.to_string());
        }

        fn respond_with(&self, url: &str, status: u16) {
            self.statuses.lock().unwrap().insert(url.to_string(), status);
        }

        fn make_opaque(&self, url: &str) {
            self.opaque.lock().unwrap().push(url.to_string());
        }
    }

    #[async_trait]
    impl Network for StubNetwork {
        async fn fetch(&self, request: &Request) -> OffcacheResult<Response> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let url = request.url();

            if self.offline.load(Ordering::SeqCst)
                || self.failing.lock().unwrap().iter().any(|u| u == url)
            {
                return Err(OffcacheError::network(url, "connection refused"));
            }

            let status = self.statuses.lock().unwrap().get(url).copied().unwrap_or(200);
            let response_type = if self.opaque.lock().unwrap().iter().any(|u| u == url) {
                ResponseType::Opaque
            } else if url.starts_with(SCOPE) {
                ResponseType::Basic
            } else {
                ResponseType::Cors
            };

            Ok(Response::new(url, status, response_type)
                .with_header("Content-Type", "text/html")
                .with_body(format!("body of {}", url)))
        }
    }

    #[derive(Default)]
    struct RecordingClients {
        open: Mutex<Vec<ClientInfo>>,
        posted: Mutex<Vec<(Uuid, serde_json::Value)>>,
        focused: Mutex<Vec<Uuid>>,
        opened: Mutex<Vec<String>>,
        claims: AtomicUsize,
    }

    impl RecordingClients {
        fn with_windows(urls: &[&str]) -> Self {
            let open = urls
                .iter()
                .map(|url| ClientInfo {
                    id: Uuid::new_v4(),
                    url: url.to_string(),
                    focused: false,
                })
                .collect();
            Self {
                open: Mutex::new(open),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl Clients for RecordingClients {
        async fn match_all(&self) -> OffcacheResult<Vec<ClientInfo>> {
            Ok(self.open.lock().unwrap().clone())
        }

        async fn claim(&self) -> OffcacheResult<()> {
            self.claims.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn post_message(
            &self,
            client: &ClientInfo,
            message: serde_json::Value,
        ) -> OffcacheResult<()> {
            self.posted.lock().unwrap().push((client.id, message));
            Ok(())
        }

        async fn focus(&self, client: &ClientInfo) -> OffcacheResult<()> {
            self.focused.lock().unwrap().push(client.id);
            Ok(())
        }

        async fn open_window(&self, url: &str) -> OffcacheResult<ClientInfo> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(ClientInfo {
                id: Uuid::new_v4(),
                url: url.to_string(),
                focused: true,
            })
        }
    }

    #[derive(Default)]
    struct RecordingRegistration {
        skip_waiting: AtomicUsize,
        shown: Mutex<Vec<Notification>>,
        closed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Registration for RecordingRegistration {
        async fn skip_waiting(&self) -> OffcacheResult<()> {
            self.skip_waiting.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn show_notification(&self, notification: Notification) -> OffcacheResult<()> {
            self.shown.lock().unwrap().push(notification);
            Ok(())
        }

        async fn close_notification(&self, tag: &str) -> OffcacheResult<()> {
            self.closed.lock().unwrap().push(tag.to_string());
            Ok(())
        }
    }

    struct StaticDataSync {
        fail: bool,
    }

    #[async_trait]
    impl DataSync for StaticDataSync {
        async fn reconcile(&self, _tag: &str) -> OffcacheResult<()> {
            if self.fail {
                Err(OffcacheError::Sync("backend unreachable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    struct Harness {
        agent: OfflineAgent,
        caches: Arc<dyn CacheStorage>,
        network: Arc<StubNetwork>,
        clients: Arc<RecordingClients>,
        registration: Arc<RecordingRegistration>,
    }

    struct HarnessBuilder {
        caches: Arc<dyn CacheStorage>,
        network: Arc<StubNetwork>,
        windows: Vec<&'static str>,
        sync_fails: bool,
        generation: &'static str,
    }

    impl HarnessBuilder {
        fn new() -> Self {
            Self {
                caches: Arc::new(MemoryCacheStorage::new()),
                network: Arc::new(StubNetwork::default()),
                windows: vec![SCOPE],
                sync_fails: false,
                generation: DEFAULT_GENERATION,
            }
        }

        fn caches(mut self, caches: Arc<dyn CacheStorage>) -> Self {
            self.caches = caches;
            self
        }

        fn network(mut self, network: Arc<StubNetwork>) -> Self {
            self.network = network;
            self
        }

        fn windows(mut self, windows: &[&'static str]) -> Self {
            self.windows = windows.to_vec();
            self
        }

        fn sync_fails(mut self) -> Self {
            self.sync_fails = true;
            self
        }

        fn generation(mut self, generation: &'static str) -> Self {
            self.generation = generation;
            self
        }

        fn build(self) -> Harness {
            let scope = Scope::parse(SCOPE).unwrap();
            let clients = Arc::new(RecordingClients::with_windows(&self.windows));
            let registration = Arc::new(RecordingRegistration::default());
            let host = Host {
                caches: Arc::clone(&self.caches),
                network: self.network.clone(),
                clients: clients.clone(),
                registration: registration.clone(),
                data_sync: Arc::new(StaticDataSync {
                    fail: self.sync_fails,
                }),
            };

            Harness {
                agent: OfflineAgent::new(AgentConfig::new(self.generation, scope), host),
                caches: self.caches,
                network: self.network,
                clients,
                registration,
            }
        }
    }

    fn harness() -> Harness {
        HarnessBuilder::new().build()
    }

    async fn fetch(agent: &OfflineAgent, request: Request) -> OffcacheResult<FetchOutcome> {
        match agent.handle(Event::Fetch(request)).await? {
            EventOutcome::Fetched(outcome) => Ok(outcome),
            other => panic!("expected Fetched, got {:?}", other),
        }
    }

    async fn install(agent: &OfflineAgent) -> OffcacheResult<offcache::agent::InstallReport> {
        match agent.handle(Event::Install).await? {
            EventOutcome::Installed(report) => Ok(report),
            other => panic!("expected Installed, got {:?}", other),
        }
    }

    fn key(url: &str) -> offcache::fetch::RequestKey {
        Scope::parse(SCOPE).unwrap().key_for(url).unwrap()
    }

    #[tokio::test]
    async fn install_caches_whole_manifest() {
        let h = harness();

        let report = install(&h.agent).await.unwrap();

        assert_eq!(report.generation, "earnings-tracker-v2");
        assert_eq!(report.local_cached.len(), 5);
        assert_eq!(report.remote_cached.len(), 6);
        assert!(report.remote_failed.is_empty());
        assert_eq!(h.caches.entries(DEFAULT_GENERATION).await.unwrap().len(), 11);
        assert_eq!(h.registration.skip_waiting.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn install_fails_when_a_local_entry_fails() {
        let h = harness();
        h.network.fail("http://localhost:8080/manifest.json");

        let err = install(&h.agent).await.unwrap_err();

        assert!(matches!(err, OffcacheError::PrecacheFailed { .. }));
        assert!(h.caches.entries(DEFAULT_GENERATION).await.unwrap().is_empty());
        assert_eq!(h.registration.skip_waiting.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn install_fails_on_local_error_status() {
        let h = harness();
        h.network
            .respond_with("http://localhost:8080/android-chrome-512x512.png", 404);

        let err = install(&h.agent).await.unwrap_err();

        assert!(err.to_string().contains("HTTP 404"));
        assert!(h.caches.entries(DEFAULT_GENERATION).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn install_tolerates_remote_failures() {
        let h = harness();
        h.network.fail("https://cdn.tailwindcss.com/");
        h.network.respond_with(
            "https://unpkg.com/@babel/standalone/babel.min.js",
            503,
        );

        let report = install(&h.agent).await.unwrap();

        assert_eq!(report.local_cached.len(), 5);
        assert_eq!(report.remote_cached.len(), 4);
        assert_eq!(report.remote_failed.len(), 2);
        assert_eq!(h.caches.entries(DEFAULT_GENERATION).await.unwrap().len(), 9);
        assert!(h
            .caches
            .lookup(DEFAULT_GENERATION, &key("https://cdn.tailwindcss.com"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn activate_with_no_stale_generations() {
        let h = harness();
        h.caches.open(DEFAULT_GENERATION).await.unwrap();

        let report = match h.agent.handle(Event::Activate).await.unwrap() {
            EventOutcome::Activated(report) => report,
            other => panic!("expected Activated, got {:?}", other),
        };

        assert!(report.deleted.is_empty());
        assert_eq!(h.caches.keys().await.unwrap(), vec![DEFAULT_GENERATION]);
        assert_eq!(h.clients.claims.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn activate_deletes_every_stale_generation() {
        let h = harness();
        for name in ["earnings-tracker-v1", DEFAULT_GENERATION, "scratch"] {
            h.caches.open(name).await.unwrap();
        }

        let report = match h.agent.handle(Event::Activate).await.unwrap() {
            EventOutcome::Activated(report) => report,
            other => panic!("expected Activated, got {:?}", other),
        };

        let mut deleted = report.deleted.clone();
        deleted.sort();
        assert_eq!(deleted, vec!["earnings-tracker-v1", "scratch"]);
        assert_eq!(h.caches.keys().await.unwrap(), vec![DEFAULT_GENERATION]);
        assert_eq!(h.clients.claims.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn upgrade_keeps_only_new_generation() {
        let caches: Arc<dyn CacheStorage> = Arc::new(MemoryCacheStorage::new());
        let v2 = HarnessBuilder::new().caches(Arc::clone(&caches)).build();
        install(&v2.agent).await.unwrap();

        let v3 = HarnessBuilder::new()
            .caches(Arc::clone(&caches))
            .generation("earnings-tracker-v3")
            .build();
        install(&v3.agent).await.unwrap();
        v3.agent.handle(Event::Activate).await.unwrap();

        assert_eq!(caches.keys().await.unwrap(), vec!["earnings-tracker-v3"]);
    }

    #[tokio::test]
    async fn cached_request_skips_network() {
        let h = harness();
        install(&h.agent).await.unwrap();
        let calls = h.network.calls();

        let outcome = fetch(&h.agent, Request::get("./index.html")).await.unwrap();

        assert_eq!(outcome.source(), Some(ResponseSource::Cache));
        assert_eq!(h.network.calls(), calls);
        let body = outcome.into_response().unwrap().text();
        assert_eq!(body, "body of http://localhost:8080/index.html");
    }

    #[tokio::test]
    async fn non_get_passes_through() {
        let h = harness();

        let outcome = fetch(&h.agent, Request::new(Method::Post, "./api/earnings"))
            .await
            .unwrap();

        assert!(outcome.is_passthrough());
        assert_eq!(h.network.calls(), 0);
        assert!(h.caches.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn extension_urls_pass_through() {
        let h = harness();

        let outcome = fetch(&h.agent, Request::get("chrome-extension://abcdef/content.js"))
            .await
            .unwrap();

        assert!(outcome.is_passthrough());
        assert_eq!(h.network.calls(), 0);
    }

    #[tokio::test]
    async fn network_response_stored_for_next_request() {
        let h = harness();

        let first = fetch(&h.agent, Request::get("./reports/2024.json"))
            .await
            .unwrap();
        assert_eq!(first.source(), Some(ResponseSource::Network));
        assert_eq!(h.network.calls(), 1);

        h.network.go_offline();
        let second = fetch(&h.agent, Request::get("./reports/2024.json"))
            .await
            .unwrap();

        assert_eq!(second.source(), Some(ResponseSource::Cache));
        assert_eq!(h.network.calls(), 1);
    }

    #[tokio::test]
    async fn fragment_does_not_split_cache_entries() {
        let h = harness();
        fetch(&h.agent, Request::get("./help.html")).await.unwrap();

        let outcome = fetch(&h.agent, Request::get("./help.html#faq")).await.unwrap();

        assert_eq!(outcome.source(), Some(ResponseSource::Cache));
    }

    #[tokio::test]
    async fn error_status_not_stored() {
        let h = harness();
        h.network.respond_with("http://localhost:8080/gone", 404);

        let outcome = fetch(&h.agent, Request::get("./gone")).await.unwrap();
        let response = outcome.into_response().unwrap();

        assert_eq!(response.status(), 404);
        assert!(h
            .caches
            .lookup(DEFAULT_GENERATION, &key("./gone"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn opaque_and_cors_responses_not_stored() {
        let h = harness();
        h.network.make_opaque("https://fonts.example.com/inter.woff2");

        let opaque = fetch(&h.agent, Request::get("https://fonts.example.com/inter.woff2"))
            .await
            .unwrap();
        let cors = fetch(&h.agent, Request::get("https://api.example.com/rates"))
            .await
            .unwrap();

        assert_eq!(
            opaque.into_response().unwrap().response_type(),
            ResponseType::Opaque
        );
        assert_eq!(cors.into_response().unwrap().response_type(), ResponseType::Cors);
        assert!(h.caches.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn offline_navigation_serves_shell() {
        let h = harness();
        install(&h.agent).await.unwrap();
        h.network.go_offline();

        let outcome = fetch(&h.agent, Request::navigate("./missing-page"))
            .await
            .unwrap();

        assert_eq!(outcome.source(), Some(ResponseSource::ShellFallback));
        let response = outcome.into_response().unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.text(), "body of http://localhost:8080/index.html");
    }

    #[tokio::test]
    async fn offline_subresource_fails() {
        let h = harness();
        install(&h.agent).await.unwrap();
        h.network.go_offline();

        let err = fetch(&h.agent, Request::get("./missing.js")).await.unwrap_err();

        assert!(err.is_network());
    }

    #[tokio::test]
    async fn offline_navigation_without_shell_fails() {
        let h = harness();
        h.network.go_offline();

        let err = fetch(&h.agent, Request::navigate("./missing-page"))
            .await
            .unwrap_err();

        assert!(err.is_network());
    }

    #[tokio::test]
    async fn get_version_replies_on_port() {
        let h = harness();
        let (reply, rx) = oneshot::channel();

        h.agent
            .handle(Event::Message {
                data: serde_json::json!({"type": "GET_VERSION"}),
                reply: Some(reply),
            })
            .await
            .unwrap();

        assert_eq!(
            rx.await.unwrap(),
            serde_json::json!({"version": "earnings-tracker-v2"})
        );
    }

    #[tokio::test]
    async fn get_version_without_port_fails() {
        let h = harness();

        let err = h
            .agent
            .handle(Event::Message {
                data: serde_json::json!({"type": "GET_VERSION"}),
                reply: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, OffcacheError::MissingReplyPort));
    }

    #[tokio::test]
    async fn skip_waiting_message() {
        let h = harness();

        h.agent
            .handle(Event::Message {
                data: serde_json::json!({"type": "SKIP_WAITING"}),
                reply: None,
            })
            .await
            .unwrap();

        assert_eq!(h.registration.skip_waiting.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_message_ignored() {
        let h = harness();
        let (reply, mut rx) = oneshot::channel();

        h.agent
            .handle(Event::Message {
                data: serde_json::json!({"type": "REFRESH", "payload": 1}),
                reply: Some(reply),
            })
            .await
            .unwrap();

        assert!(rx.try_recv().is_err());
        assert_eq!(h.registration.skip_waiting.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn push_shows_notification() {
        let h = harness();
        let payload = br#"{"title":"Milestone","body":"You hit $1000","data":{"total":1000}}"#;

        h.agent
            .handle(Event::Push {
                data: Some(payload.to_vec()),
            })
            .await
            .unwrap();

        let shown = h.registration.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "Milestone");
        assert_eq!(shown[0].body, "You hit $1000");
        assert_eq!(shown[0].tag, "earnings-tracker");
        assert_eq!(shown[0].data["total"], 1000);
        let actions: Vec<&str> = shown[0].actions.iter().map(|a| a.action.as_str()).collect();
        assert_eq!(actions, vec!["view", "dismiss"]);
    }

    #[tokio::test]
    async fn push_without_payload_shows_nothing() {
        let h = harness();

        h.agent.handle(Event::Push { data: None }).await.unwrap();

        assert!(h.registration.shown.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn push_with_malformed_payload_fails() {
        let h = harness();

        let err = h
            .agent
            .handle(Event::Push {
                data: Some(b"not json".to_vec()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, OffcacheError::PushPayload(_)));
        assert!(h.registration.shown.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sync_broadcasts_to_every_client() {
        let h = HarnessBuilder::new()
            .windows(&[SCOPE, "http://localhost:8080/settings"])
            .build();

        let outcome = h
            .agent
            .handle(Event::Sync {
                tag: "earnings-sync".to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            EventOutcome::Synced(SyncOutcome::Synced { notified: 2 })
        ));
        let posted = h.clients.posted.lock().unwrap();
        assert_eq!(posted.len(), 2);
        for (_, message) in posted.iter() {
            assert_eq!(message["type"], "EARNINGS_SYNCED");
            assert!(message["timestamp"].as_str().unwrap().ends_with('Z'));
        }
    }

    #[tokio::test]
    async fn sync_ignores_unknown_tag() {
        let h = harness();

        let outcome = h
            .agent
            .handle(Event::Sync {
                tag: "photos-sync".to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(outcome, EventOutcome::Synced(SyncOutcome::Ignored)));
        assert!(h.clients.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sync_failure_is_reported_not_raised() {
        let h = HarnessBuilder::new().sync_fails().build();

        let outcome = h
            .agent
            .handle(Event::Sync {
                tag: "earnings-sync".to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            EventOutcome::Synced(SyncOutcome::Failed { .. })
        ));
        assert!(h.clients.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn view_click_focuses_open_app() {
        let h = harness();

        h.agent
            .handle(Event::NotificationClick(NotificationClick::new(
                "earnings-tracker",
                Some("view".to_string()),
            )))
            .await
            .unwrap();

        assert_eq!(*h.registration.closed.lock().unwrap(), vec!["earnings-tracker"]);
        assert_eq!(h.clients.focused.lock().unwrap().len(), 1);
        assert!(h.clients.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn view_click_opens_app_when_not_open() {
        let h = HarnessBuilder::new()
            .windows(&["http://localhost:8080/settings"])
            .build();

        h.agent
            .handle(Event::NotificationClick(NotificationClick::new(
                "earnings-tracker",
                Some("view".to_string()),
            )))
            .await
            .unwrap();

        assert!(h.clients.focused.lock().unwrap().is_empty());
        assert_eq!(*h.clients.opened.lock().unwrap(), vec![SCOPE]);
    }

    #[tokio::test]
    async fn dismiss_click_only_closes() {
        let h = harness();

        for action in [Some("dismiss".to_string()), None] {
            h.agent
                .handle(Event::NotificationClick(NotificationClick::new(
                    "earnings-tracker",
                    action,
                )))
                .await
                .unwrap();
        }

        assert_eq!(h.registration.closed.lock().unwrap().len(), 2);
        assert!(h.clients.focused.lock().unwrap().is_empty());
        assert!(h.clients.opened.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn disk_cache_survives_restart() {
        let temp = TempDir::new().unwrap();
        let network = Arc::new(StubNetwork::default());

        let first = HarnessBuilder::new()
            .caches(Arc::new(DiskCacheStorage::new(temp.path())))
            .network(Arc::clone(&network))
            .build();
        install(&first.agent).await.unwrap();
        drop(first);

        network.go_offline();
        let second = HarnessBuilder::new()
            .caches(Arc::new(DiskCacheStorage::new(temp.path())))
            .network(Arc::clone(&network))
            .build();

        let outcome = fetch(&second.agent, Request::navigate("./")).await.unwrap();
        assert_eq!(outcome.source(), Some(ResponseSource::Cache));

        let entry = second
            .caches
            .lookup(DEFAULT_GENERATION, &key("./manifest.json"))
            .await
            .unwrap()
            .map(CachedEntry::into_response)
            .unwrap();
        assert_eq!(entry.header("content-type"), Some("text/html"));
    }
}

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    /// Command isolated from the user's config and state
    fn offcache(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("offcache");
        cmd.env_remove("OFFCACHE_CONFIG")
            .env_remove("OFFCACHE_STATE_DIR")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(temp.path().join("config.toml"))
            .arg("--state-dir")
            .arg(temp.path().join("state"));
        cmd
    }

    /// Config pointing at a local port nothing listens on
    fn write_unreachable_config(dir: &Path) {
        std::fs::write(
            dir.join("config.toml"),
            "[cache]\nscope = \"http://127.0.0.1:9/\"\n\n[manifest]\nentries = [\"./\", \"./index.html\"]\n",
        )
        .unwrap();
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("install").and(predicate::str::contains("fetch")));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("offcache"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]").and(predicate::str::contains(
                "earnings-tracker-v2",
            )));
    }

    #[test]
    fn config_set_persists() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["config", "set", "cache.generation", "earnings-tracker-v3"])
            .assert()
            .success();

        offcache(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("earnings-tracker-v3"));
    }

    #[test]
    fn config_set_unknown_key() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["config", "set", "cache.size", "10"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("cache.generation"))
            .stderr(predicate::function(|err: &str| {
                err.matches("Unknown config key").count() == 1
            }));
    }

    #[test]
    fn list_empty() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache generations"));
    }

    #[test]
    fn list_empty_json() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn message_get_version() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["message", "get-version"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"{"version":"earnings-tracker-v2"}"#));
    }

    #[test]
    fn message_unknown_is_ignored() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["message", "--json", r#"{"type":"REFRESH"}"#])
            .assert()
            .success()
            .stdout(predicate::str::contains("Message delivered"));
    }

    #[test]
    fn push_shows_notification() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["push", "--payload", r#"{"title":"Milestone","body":"You hit $1000"}"#])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("Milestone")
                    .and(predicate::str::contains("You hit $1000"))
                    .and(predicate::str::contains("View Earnings")),
            );
    }

    #[test]
    fn push_malformed_payload() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["push", "--payload", "milestone!"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid push payload"));
    }

    #[test]
    fn sync_broadcasts() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .arg("sync")
            .assert()
            .success()
            .stdout(predicate::str::contains("EARNINGS_SYNCED"));
    }

    #[test]
    fn sync_unknown_tag() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["sync", "--tag", "photos-sync"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ignored"));
    }

    #[test]
    fn click_view_focuses_app() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["click", "--action", "view"])
            .assert()
            .success()
            .stdout(predicate::str::contains("focus http://localhost:8080/"));
    }

    #[test]
    fn fetch_post_passes_through() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["fetch", "-X", "POST", "./api/earnings"])
            .assert()
            .success()
            .stderr(predicate::str::contains("passthrough"));
    }

    #[test]
    fn fetch_extension_passes_through() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["fetch", "chrome-extension://abcdef/content.js"])
            .assert()
            .success()
            .stderr(predicate::str::contains("passthrough"));
    }

    #[test]
    fn fetch_unreachable_fails() {
        let temp = TempDir::new().unwrap();
        write_unreachable_config(temp.path());
        offcache(&temp)
            .args(["fetch", "./report.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Network fetch failed"));
    }

    #[test]
    fn install_unreachable_fails() {
        let temp = TempDir::new().unwrap();
        write_unreachable_config(temp.path());
        offcache(&temp)
            .arg("install")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Pre-cache failed"));

        let audit = std::fs::read_to_string(temp.path().join("state").join("audit.log")).unwrap();
        assert!(audit.contains("install.failed"));
    }

    #[test]
    fn clear_without_generations() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache generations"));
    }

    #[test]
    fn completions_bash() {
        let temp = TempDir::new().unwrap();
        offcache(&temp)
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("offcache"));
    }
}
