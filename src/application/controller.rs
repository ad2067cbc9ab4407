//! The view controller: a state machine over the four dashboard views,
//! driving every fetch through the caching gateway.

use crate::application::services::cache_service::{Params, normalize_params};
use crate::application::services::gateway_service::{ApiGateway, CallOutcome};
use crate::application::services::session::{Session, validate_credential};
use crate::domain::action::Action;
use crate::domain::entities::{Link, LinkPage, ShortDomain, StatsPayload};
use crate::domain::navigation::{Crumb, NavigationState, View};
use crate::domain::period::{Period, Preset};
use crate::error::AppError;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Notifications pushed to the presentation layer whenever something it
/// renders may have changed. Consumers re-read controller state; the event
/// only says what kind of thing moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    View(View),
    Data,
    Loading(bool),
    Error,
}

/// Finite state machine over `{ApiKeyEntry, DomainList, DomainDetail,
/// LinkDetail}`, owning the selected identifiers and all fetched entities.
///
/// Single-task by design: methods take `&mut self` and the only concurrency
/// is paired fetches awaited together. A superseded in-flight fetch is not
/// cancelled; its late result still lands in the cache (idempotent
/// overwrite) and, if the view identity is unchanged, on screen.
pub struct ViewController {
    gateway: Arc<ApiGateway>,
    session: Session,
    nav: NavigationState,

    domains: Vec<ShortDomain>,
    domain_stats: Option<StatsPayload>,
    link_page: Option<LinkPage>,
    link_stats: Option<StatsPayload>,
    link_info: Option<Link>,

    notifier: Option<mpsc::UnboundedSender<StateChange>>,
}

impl ViewController {
    pub fn new(gateway: Arc<ApiGateway>, session: Session) -> Self {
        Self {
            gateway,
            session,
            nav: NavigationState::default(),
            domains: Vec::new(),
            domain_stats: None,
            link_page: None,
            link_stats: None,
            link_info: None,
            notifier: None,
        }
    }

    /// Attaches a state-change listener for the presentation layer.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StateChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.notifier = Some(tx);
        rx
    }

    /// Restores the persisted session and lands on the right view: the
    /// domain list when a credential survives, credential entry otherwise.
    pub async fn init(&mut self) {
        self.session.restore().await;
        if self.session.is_authenticated() {
            self.load_domains(false).await;
        } else {
            self.switch_to(View::ApiKeyEntry);
        }
    }

    // ─── Accessors for the presentation layer ────────────────────────────────

    pub fn view(&self) -> View {
        self.nav.view
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn domains(&self) -> &[ShortDomain] {
        &self.domains
    }

    pub fn domain_stats(&self) -> Option<&StatsPayload> {
        self.domain_stats.as_ref()
    }

    pub fn link_page(&self) -> Option<&LinkPage> {
        self.link_page.as_ref()
    }

    pub fn link_stats(&self) -> Option<&StatsPayload> {
        self.link_stats.as_ref()
    }

    pub fn link_info(&self) -> Option<&Link> {
        self.link_info.as_ref()
    }

    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        self.nav.breadcrumbs(self.session.is_authenticated())
    }

    // ─── Transitions ─────────────────────────────────────────────────────────

    /// Validates and stores the credential, then loads the domain list with
    /// a forced refresh.
    ///
    /// # Errors
    ///
    /// Returns (and banners) [`AppError::Validation`] when the key fails
    /// the prefix check; the view stays on credential entry.
    pub async fn submit_credential(&mut self, raw: &str) -> Result<(), AppError> {
        self.session.clear_error();

        let credential = match validate_credential(raw) {
            Ok(credential) => credential,
            Err(e) => {
                self.session.set_error(e.user_message());
                self.notify(StateChange::Error);
                return Err(e);
            }
        };

        self.session.set_credential(credential).await;
        self.load_domains(true).await;
        Ok(())
    }

    /// Navigates to the domain list and fetches it.
    pub async fn load_domains(&mut self, force_refresh: bool) {
        if !self.session.is_authenticated() {
            self.switch_to(View::ApiKeyEntry);
            return;
        }
        self.switch_to(View::DomainList);

        match self.fetch(Action::ListDomains, Params::new(), force_refresh).await {
            Ok(outcome) => {
                match parse_domains(&outcome.payload) {
                    Some(domains) => self.domains = domains,
                    None => self
                        .session
                        .set_error("Unexpected domain listing shape from upstream."),
                }
                self.notify(StateChange::Data);
            }
            Err(e) => self.handle_error(e),
        }
    }

    /// Selects a domain and concurrently fetches its stats and the first
    /// page of its links. The two halves render or fail independently.
    pub async fn select_domain(&mut self, id: &str, hostname: &str) {
        self.nav.select_domain(id, hostname);
        self.domain_stats = None;
        self.link_page = None;
        self.switch_to(View::DomainDetail);

        self.load_domain_detail(false).await;
    }

    /// Selects a link and concurrently fetches its stats and metadata.
    pub async fn select_link(&mut self, id: &str) {
        self.nav.select_link(id);
        self.link_stats = None;
        self.link_info = None;
        self.switch_to(View::LinkDetail);

        self.load_link_detail(false).await;
    }

    /// Fetches the next page of the selected domain's links, replacing only
    /// the link list. Valid only from `DomainDetail`; stats are untouched.
    pub async fn request_next_page(&mut self, cursor: &str) {
        if self.nav.view != View::DomainDetail {
            return;
        }
        let Some(domain_id) = self.nav.domain.as_ref().map(|d| d.id.clone()) else {
            return;
        };
        self.session.clear_error();

        let params = normalize_params(&[
            ("domainId", Some(domain_id)),
            ("pageToken", Some(cursor.to_string())),
        ]);
        match self.fetch(Action::ListDomainLinks, params, false).await {
            Ok(outcome) => {
                self.apply_link_page(&outcome);
                self.notify(StateChange::Data);
            }
            Err(e) => self.handle_error(e),
        }
    }

    /// Logs out: clears credential, cache, and session state wholesale and
    /// returns to credential entry.
    pub async fn go_home(&mut self) {
        if let Err(e) = self.gateway.cache().clear_all().await {
            // The in-memory teardown still proceeds; stale durable entries
            // are overwritten on next use.
            self.session.set_error(e.user_message());
        }
        self.teardown_session();
    }

    /// Re-issues the current view's fetches, bypassing the cache.
    pub async fn refresh(&mut self) {
        if !self.session.is_authenticated() {
            self.switch_to(View::ApiKeyEntry);
            return;
        }
        self.session.clear_error();

        match self.nav.view {
            View::ApiKeyEntry => self.switch_to(View::ApiKeyEntry),
            View::DomainList => self.load_domains(true).await,
            View::DomainDetail => self.load_domain_detail(true).await,
            View::LinkDetail => self.load_link_detail(true).await,
        }
    }

    /// Follows a breadcrumb jump.
    pub async fn jump(&mut self, target: View) {
        match target {
            View::ApiKeyEntry => self.go_home().await,
            View::DomainList => self.load_domains(false).await,
            View::DomainDetail => {
                if self.nav.domain.is_some() {
                    self.nav.link = None;
                    self.switch_to(View::DomainDetail);
                    self.load_domain_detail(false).await;
                }
            }
            // Never a jump target; the link crumb is terminal.
            View::LinkDetail => {}
        }
    }

    // ─── Period filter ───────────────────────────────────────────────────────

    pub fn period(&self) -> Period {
        self.session.period()
    }

    /// Activates a preset and refreshes the active detail view. Cached
    /// results for that preset may still be served.
    pub async fn set_period_preset(&mut self, preset: Preset) {
        self.session.set_period_preset(preset).await;
        self.refresh_active_detail().await;
    }

    /// Validates and applies a custom date range. Fired only on explicit
    /// confirmation, never per keystroke.
    ///
    /// # Errors
    ///
    /// Returns (and banners) [`AppError::Validation`] when either date is
    /// missing or the range is reversed; no fetch is attempted.
    pub async fn apply_custom_period(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(), AppError> {
        self.session.clear_error();

        let period = match Period::custom(start, end) {
            Ok(period) => period,
            Err(e) => {
                self.session.set_error(e.user_message());
                self.notify(StateChange::Error);
                return Err(e);
            }
        };

        self.session.set_custom_period(period).await;
        self.refresh_active_detail().await;
        Ok(())
    }

    async fn refresh_active_detail(&mut self) {
        match self.nav.view {
            View::DomainDetail => self.load_domain_detail(false).await,
            View::LinkDetail => self.load_link_detail(false).await,
            _ => {}
        }
    }

    // ─── Fetch plumbing ──────────────────────────────────────────────────────

    async fn load_domain_detail(&mut self, force_refresh: bool) {
        let Some(domain_id) = self.nav.domain.as_ref().map(|d| d.id.clone()) else {
            return;
        };
        self.session.clear_error();

        let stats_params = self.with_period(&[("domainId", Some(domain_id.clone()))]);
        let links_params = normalize_params(&[("domainId", Some(domain_id))]);

        let credential = self.session.credential().map(String::from);
        let gateway = self.gateway.clone();

        self.begin_ops(2);
        let (stats_res, links_res) = tokio::join!(
            gateway.call(
                credential.as_deref(),
                Action::GetDomainStats,
                &stats_params,
                force_refresh,
            ),
            gateway.call(
                credential.as_deref(),
                Action::ListDomainLinks,
                &links_params,
                force_refresh,
            ),
        );
        self.end_ops(2);

        match stats_res {
            Ok(outcome) => {
                self.note_outcome(&outcome);
                match serde_json::from_value(outcome.payload) {
                    Ok(stats) => self.domain_stats = Some(stats),
                    Err(e) => self
                        .session
                        .set_error(format!("Unreadable domain stats: {e}")),
                }
            }
            Err(e) => self.handle_error(e),
        }

        match links_res {
            // A 401 on the stats half already tore the session down; the
            // other half's data must not outlive it.
            Ok(outcome) if self.session.is_authenticated() => self.apply_link_page(&outcome),
            Ok(_) => {}
            Err(e) => self.handle_error(e),
        }

        self.notify(StateChange::Data);
    }

    async fn load_link_detail(&mut self, force_refresh: bool) {
        let Some(link_id) = self.nav.link.as_ref().map(|l| l.id.clone()) else {
            return;
        };
        self.session.clear_error();

        let stats_params = self.with_period(&[("linkId", Some(link_id.clone()))]);
        let info_params = normalize_params(&[("linkId", Some(link_id))]);

        let credential = self.session.credential().map(String::from);
        let gateway = self.gateway.clone();

        self.begin_ops(2);
        let (stats_res, info_res) = tokio::join!(
            gateway.call(
                credential.as_deref(),
                Action::GetLinkStats,
                &stats_params,
                force_refresh,
            ),
            gateway.call(
                credential.as_deref(),
                Action::GetLinkInfo,
                &info_params,
                force_refresh,
            ),
        );
        self.end_ops(2);

        match info_res {
            Ok(outcome) => {
                self.note_outcome(&outcome);
                match serde_json::from_value::<Link>(outcome.payload) {
                    Ok(link) => {
                        if let Some(selected) = self.nav.link.as_mut() {
                            selected.display_path = link.display_path();
                        }
                        self.link_info = Some(link);
                    }
                    Err(e) => self.session.set_error(format!("Unreadable link info: {e}")),
                }
            }
            // Metadata failure still lets stats render; the breadcrumb
            // keeps its id fallback.
            Err(e) => self.handle_error(e),
        }

        match stats_res {
            Ok(outcome) if self.session.is_authenticated() => {
                self.note_outcome(&outcome);
                match serde_json::from_value(outcome.payload) {
                    Ok(stats) => self.link_stats = Some(stats),
                    Err(e) => self.session.set_error(format!("Unreadable link stats: {e}")),
                }
            }
            Ok(_) => {}
            Err(e) => self.handle_error(e),
        }

        self.notify(StateChange::Data);
    }

    /// Single-shot fetch with loading-counter bookkeeping.
    async fn fetch(
        &mut self,
        action: Action,
        params: Params,
        force_refresh: bool,
    ) -> Result<CallOutcome, AppError> {
        self.session.clear_error();
        let credential = self.session.credential().map(String::from);
        let gateway = self.gateway.clone();

        self.begin_ops(1);
        let result = gateway
            .call(credential.as_deref(), action, &params, force_refresh)
            .await;
        self.end_ops(1);

        if let Ok(outcome) = &result {
            self.note_outcome(outcome);
        }
        result
    }

    /// Appends the active period's fields for stats-scoped actions.
    fn with_period(&self, pairs: &[(&str, Option<String>)]) -> Params {
        let mut params = normalize_params(pairs);
        for (k, v) in self.session.period().query_params() {
            params.push((k.to_string(), v));
        }
        params
    }

    fn apply_link_page(&mut self, outcome: &CallOutcome) {
        match serde_json::from_value(outcome.payload.clone()) {
            Ok(page) => {
                self.note_outcome(outcome);
                self.link_page = Some(page);
            }
            Err(e) => self.session.set_error(format!("Unreadable link list: {e}")),
        }
    }

    /// Updates the "last retrieved" display — only meaningful while an
    /// authenticated view is visible.
    fn note_outcome(&mut self, outcome: &CallOutcome) {
        if self.nav.view != View::ApiKeyEntry {
            self.session.note_retrieved(outcome.retrieved_at);
        }
    }

    fn handle_error(&mut self, error: AppError) {
        if error.is_auth_failure() {
            debug!("Auth failure; tearing down session");
            self.teardown_session();
            self.session
                .set_error("Invalid API key or insufficient permissions. Please check your key.");
            self.notify(StateChange::Error);
            return;
        }

        self.session.set_error(error.user_message());
        self.notify(StateChange::Error);
    }

    /// Drops all in-memory identity, selections, and fetched data, landing
    /// on credential entry. Durable state is cleared by the caller (either
    /// the gateway on 401/403 or `go_home`).
    fn teardown_session(&mut self) {
        self.session.clear_in_memory();
        self.nav.reset();
        self.domains.clear();
        self.domain_stats = None;
        self.link_page = None;
        self.link_stats = None;
        self.link_info = None;
        self.notify(StateChange::View(View::ApiKeyEntry));
    }

    fn switch_to(&mut self, view: View) {
        self.session.clear_error();
        self.nav.view = view;
        self.notify(StateChange::View(view));
    }

    fn begin_ops(&mut self, n: u32) {
        for _ in 0..n {
            self.session.begin_op();
        }
        self.notify(StateChange::Loading(true));
    }

    fn end_ops(&mut self, n: u32) {
        for _ in 0..n {
            self.session.end_op();
        }
        if !self.session.is_loading() {
            self.notify(StateChange::Loading(false));
        }
    }

    fn notify(&self, change: StateChange) {
        if let Some(tx) = &self.notifier {
            let _ = tx.send(change);
        }
    }
}

/// The domains listing arrives either as a bare array or wrapped in a
/// `{"domains": [...]}` object, depending on upstream version.
fn parse_domains(payload: &Value) -> Option<Vec<ShortDomain>> {
    if payload.is_array() {
        return serde_json::from_value(payload.clone()).ok();
    }
    payload
        .get("domains")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::cache_service::ResponseCache;
    use crate::infrastructure::http::{MockGatewayTransport, TransportResponse};
    use crate::infrastructure::storage::MemoryStore;

    fn ok(body: &str) -> Result<TransportResponse, AppError> {
        Ok(TransportResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn status(code: u16, body: &str) -> Result<TransportResponse, AppError> {
        Ok(TransportResponse {
            status: code,
            body: body.to_string(),
        })
    }

    fn action_of(params: &[(String, String)]) -> &str {
        params
            .iter()
            .find(|(k, _)| k == "action")
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn controller_with(
        transport: MockGatewayTransport,
    ) -> (ViewController, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(ApiGateway::new(
            Arc::new(transport),
            ResponseCache::new(store.clone()),
        ));
        let session = Session::new(store.clone());
        (ViewController::new(gateway, session), store)
    }

    async fn authenticated_controller(
        transport: MockGatewayTransport,
    ) -> (ViewController, Arc<MemoryStore>) {
        let (mut controller, store) = controller_with(transport);
        controller
            .session
            .set_credential("sk_test".to_string())
            .await;
        (controller, store)
    }

    const DOMAIN_STATS: &str = r#"{"clicks": 100, "humanClicks": 80}"#;
    const ONE_LINK_PAGE: &str =
        r#"{"links":[{"id":"l1","path":"promo"}],"nextPageToken":null,"count":1}"#;

    // ─── Credential gate ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_init_without_credential_lands_on_key_entry() {
        let mut transport = MockGatewayTransport::new();
        transport.expect_get().times(0);
        let (mut controller, _) = controller_with(transport);

        controller.init().await;

        assert_eq!(controller.view(), View::ApiKeyEntry);
    }

    #[tokio::test]
    async fn test_bad_credential_format_stays_on_key_entry() {
        let mut transport = MockGatewayTransport::new();
        transport.expect_get().times(0);
        let (mut controller, _) = controller_with(transport);
        controller.init().await;

        let result = controller.submit_credential("not-a-key").await;

        assert!(result.is_err());
        assert_eq!(controller.view(), View::ApiKeyEntry);
        assert!(controller.session().last_error().unwrap().contains("sk_"));
    }

    #[tokio::test]
    async fn test_refresh_without_credential_routes_to_key_entry() {
        let mut transport = MockGatewayTransport::new();
        transport.expect_get().times(0);
        let (mut controller, _) = controller_with(transport);
        controller.init().await;

        controller.refresh().await;

        assert_eq!(controller.view(), View::ApiKeyEntry);
    }

    #[tokio::test]
    async fn test_submit_credential_forces_domain_refresh() {
        let mut transport = MockGatewayTransport::new();
        transport
            .expect_get()
            .times(1)
            .withf(|params, credential| {
                credential == "sk_test" && action_of(params) == "list-domains"
            })
            .returning(|_, _| ok(r#"[{"id":"dom_1","hostname":"example.com"}]"#));
        let (mut controller, _) = controller_with(transport);
        controller.init().await;

        controller.submit_credential(" sk_test ").await.unwrap();

        assert_eq!(controller.view(), View::DomainList);
        assert_eq!(controller.domains().len(), 1);
        assert_eq!(controller.domains()[0].hostname, "example.com");
    }

    // ─── Domain detail scenario ──────────────────────────────────────────────

    #[tokio::test]
    async fn test_select_domain_scenario() {
        let mut transport = MockGatewayTransport::new();
        transport
            .expect_get()
            .withf(|params, _| {
                action_of(params) == "get-domain-stats"
                    && param(params, "domainId") == Some("dom_1")
                    && param(params, "period") == Some("last30")
            })
            .times(1)
            .returning(|_, _| ok(DOMAIN_STATS));
        transport
            .expect_get()
            .withf(|params, _| {
                action_of(params) == "list-domain-links"
                    && param(params, "domainId") == Some("dom_1")
            })
            .times(1)
            .returning(|_, _| ok(ONE_LINK_PAGE));
        let (mut controller, _) = authenticated_controller(transport).await;

        controller.select_domain("dom_1", "example.com").await;

        assert_eq!(controller.view(), View::DomainDetail);
        assert_eq!(controller.domain_stats().unwrap().total_clicks, 100);
        assert_eq!(controller.domain_stats().unwrap().human_clicks, 80);

        let page = controller.link_page().unwrap();
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].id, "l1");
        assert_eq!(page.links[0].display_path(), "/promo");
        assert!(!page.has_more());

        assert!(!controller.session().is_loading());
        assert!(controller.session().last_error().is_none());
    }

    #[tokio::test]
    async fn test_partial_failure_still_renders_other_half() {
        let mut transport = MockGatewayTransport::new();
        transport
            .expect_get()
            .withf(|params, _| action_of(params) == "get-domain-stats")
            .times(1)
            .returning(|_, _| status(500, r#"{"error":"stats exploded"}"#));
        transport
            .expect_get()
            .withf(|params, _| action_of(params) == "list-domain-links")
            .times(1)
            .returning(|_, _| ok(ONE_LINK_PAGE));
        let (mut controller, _) = authenticated_controller(transport).await;

        controller.select_domain("dom_1", "example.com").await;

        assert_eq!(controller.view(), View::DomainDetail);
        assert!(controller.domain_stats().is_none());
        assert_eq!(controller.link_page().unwrap().links.len(), 1);
        assert!(controller.session().last_error().unwrap().contains("stats exploded"));
    }

    // ─── Pagination ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_next_page_replaces_links_only() {
        let mut transport = MockGatewayTransport::new();
        transport
            .expect_get()
            .withf(|params, _| action_of(params) == "get-domain-stats")
            .times(1)
            .returning(|_, _| ok(DOMAIN_STATS));
        transport
            .expect_get()
            .withf(|params, _| {
                action_of(params) == "list-domain-links" && param(params, "pageToken").is_none()
            })
            .times(1)
            .returning(|_, _| {
                ok(r#"{"links":[{"id":"l1","path":"one"}],"nextPageToken":"tok_2","count":3}"#)
            });
        transport
            .expect_get()
            .withf(|params, _| {
                action_of(params) == "list-domain-links"
                    && param(params, "pageToken") == Some("tok_2")
            })
            .times(1)
            .returning(|_, _| {
                ok(r#"{"links":[{"id":"l2","path":"two"}],"nextPageToken":null,"count":3}"#)
            });
        let (mut controller, _) = authenticated_controller(transport).await;

        controller.select_domain("dom_1", "example.com").await;
        assert!(controller.link_page().unwrap().has_more());

        let cursor = controller
            .link_page()
            .unwrap()
            .next_page_token
            .clone()
            .unwrap();
        controller.request_next_page(&cursor).await;

        let page = controller.link_page().unwrap();
        assert_eq!(page.links[0].id, "l2");
        assert!(!page.has_more());
        // Stats survived the page flip.
        assert_eq!(controller.domain_stats().unwrap().total_clicks, 100);
    }

    #[tokio::test]
    async fn test_next_page_ignored_outside_domain_detail() {
        let mut transport = MockGatewayTransport::new();
        transport.expect_get().times(0);
        let (mut controller, _) = authenticated_controller(transport).await;

        controller.request_next_page("tok").await;
    }

    // ─── Auth failure teardown ───────────────────────────────────────────────

    #[tokio::test]
    async fn test_simulated_401_tears_down_everything() {
        let mut transport = MockGatewayTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_, _| status(401, r#"{"error":"Unauthorized"}"#));
        let (mut controller, store) = authenticated_controller(transport).await;

        controller.load_domains(true).await;

        assert_eq!(controller.view(), View::ApiKeyEntry);
        assert!(!controller.session().is_authenticated());
        assert!(store.is_empty());
        assert!(controller.session().last_error().unwrap().contains("Invalid API key"));
    }

    // ─── Link detail ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_select_link_upgrades_breadcrumb_path() {
        let mut transport = MockGatewayTransport::new();
        transport
            .expect_get()
            .withf(|params, _| action_of(params) == "get-link-stats")
            .times(1)
            .returning(|_, _| ok(r#"{"totalClicks": 42, "humanClicks": 40}"#));
        transport
            .expect_get()
            .withf(|params, _| {
                action_of(params) == "get-link-info" && param(params, "linkId") == Some("l1")
            })
            .times(1)
            .returning(|_, _| {
                ok(r#"{"id":"l1","path":"promo","shortURL":"https://s.io/promo","originalURL":"https://example.com/landing"}"#)
            });
        let (mut controller, _) = authenticated_controller(transport).await;
        controller.nav.select_domain("dom_1", "example.com");

        controller.select_link("l1").await;

        assert_eq!(controller.view(), View::LinkDetail);
        assert_eq!(controller.link_stats().unwrap().total_clicks, 42);
        assert_eq!(
            controller.link_info().unwrap().original_url.as_deref(),
            Some("https://example.com/landing")
        );

        let crumbs = controller.breadcrumbs();
        assert_eq!(crumbs.last().unwrap().label(), "/promo");
    }

    #[tokio::test]
    async fn test_link_info_failure_keeps_stats() {
        let mut transport = MockGatewayTransport::new();
        transport
            .expect_get()
            .withf(|params, _| action_of(params) == "get-link-stats")
            .times(1)
            .returning(|_, _| ok(r#"{"totalClicks": 7}"#));
        transport
            .expect_get()
            .withf(|params, _| action_of(params) == "get-link-info")
            .times(1)
            .returning(|_, _| status(404, r#"{"error":"Link not found"}"#));
        let (mut controller, _) = authenticated_controller(transport).await;
        controller.nav.select_domain("dom_1", "example.com");

        controller.select_link("l1").await;

        assert_eq!(controller.link_stats().unwrap().total_clicks, 7);
        assert!(controller.link_info().is_none());
        // Breadcrumb falls back to the identifier.
        assert_eq!(controller.breadcrumbs().last().unwrap().label(), "ID: l1");
    }

    // ─── Period filter ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_preset_change_refetches_with_new_period() {
        let mut transport = MockGatewayTransport::new();
        transport
            .expect_get()
            .withf(|params, _| {
                action_of(params) == "get-domain-stats"
                    && param(params, "period") == Some("last30")
            })
            .times(1)
            .returning(|_, _| ok(DOMAIN_STATS));
        transport
            .expect_get()
            .withf(|params, _| {
                action_of(params) == "get-domain-stats" && param(params, "period") == Some("last7")
            })
            .times(1)
            .returning(|_, _| ok(r#"{"clicks": 10, "humanClicks": 9}"#));
        transport
            .expect_get()
            .withf(|params, _| action_of(params) == "list-domain-links")
            .times(1)
            .returning(|_, _| ok(ONE_LINK_PAGE));
        let (mut controller, _) = authenticated_controller(transport).await;

        controller.select_domain("dom_1", "example.com").await;
        controller.set_period_preset(Preset::Last7).await;

        assert_eq!(controller.domain_stats().unwrap().total_clicks, 10);
        assert_eq!(controller.period(), Period::Preset(Preset::Last7));
    }

    #[tokio::test]
    async fn test_reversed_custom_range_rejected_without_fetch() {
        let mut transport = MockGatewayTransport::new();
        transport.expect_get().times(0);
        let (mut controller, _) = authenticated_controller(transport).await;

        let result = controller
            .apply_custom_period(
                Some("2026-02-01".parse().unwrap()),
                Some("2026-01-01".parse().unwrap()),
            )
            .await;

        assert!(result.is_err());
        assert!(controller.session().last_error().is_some());
        // The active period is unchanged.
        assert_eq!(controller.period(), Period::default());
    }

    #[tokio::test]
    async fn test_missing_custom_date_rejected_without_fetch() {
        let mut transport = MockGatewayTransport::new();
        transport.expect_get().times(0);
        let (mut controller, _) = authenticated_controller(transport).await;

        let result = controller
            .apply_custom_period(Some("2026-01-01".parse().unwrap()), None)
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_custom_period_params_reach_the_wire() {
        let mut transport = MockGatewayTransport::new();
        transport
            .expect_get()
            .withf(|params, _| action_of(params) == "list-domain-links")
            .times(1)
            .returning(|_, _| ok(ONE_LINK_PAGE));
        transport
            .expect_get()
            .withf(|params, _| {
                action_of(params) == "get-domain-stats"
                    && param(params, "period") == Some("custom")
                    && param(params, "startDate") == Some("2026-01-01")
                    && param(params, "endDate") == Some("2026-01-31")
            })
            .times(1)
            .returning(|_, _| ok(DOMAIN_STATS));
        let (mut controller, _) = authenticated_controller(transport).await;
        controller.nav.select_domain("dom_1", "example.com");
        controller.nav.view = View::DomainDetail;

        controller
            .apply_custom_period(
                Some("2026-01-01".parse().unwrap()),
                Some("2026-01-31".parse().unwrap()),
            )
            .await
            .unwrap();
    }

    // ─── Reset and notifications ─────────────────────────────────────────────

    #[tokio::test]
    async fn test_go_home_clears_store_and_state() {
        let mut transport = MockGatewayTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_, _| ok(r#"[{"id":"dom_1","hostname":"example.com"}]"#));
        let (mut controller, store) = authenticated_controller(transport).await;
        controller.load_domains(false).await;
        assert!(!controller.domains().is_empty());

        controller.go_home().await;

        assert_eq!(controller.view(), View::ApiKeyEntry);
        assert!(controller.domains().is_empty());
        assert!(!controller.session().is_authenticated());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_state_changes_are_emitted() {
        let mut transport = MockGatewayTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_, _| ok("[]"));
        let (mut controller, _) = authenticated_controller(transport).await;
        let mut rx = controller.subscribe();

        controller.load_domains(false).await;

        let mut seen = Vec::new();
        while let Ok(change) = rx.try_recv() {
            seen.push(change);
        }
        assert!(seen.contains(&StateChange::View(View::DomainList)));
        assert!(seen.contains(&StateChange::Loading(true)));
        assert!(seen.contains(&StateChange::Loading(false)));
        assert!(seen.contains(&StateChange::Data));
    }
}
