//! The feed controller: search, load-more, render, view switching.
//!
//! Fetches run as spawned tasks that report back through the controller's
//! event channel; state only changes when [`PostFeedController::handle_event`]
//! processes the result. Each result carries the [`PageTicket`] it was
//! issued with, and results from a search that has since been replaced are
//! dropped.

use tokio::sync::mpsc;

use crate::api::{FeedClient, FetchError, PostPage, ScrapeRequest, SearchParams};
use crate::config::Config;
use crate::render::{render_page, RenderLimits, Renderer};

use super::cache::PostCache;
use super::pagination::{ErrorPolicy, PageTicket, PaginationState};
use super::trigger::{Intersection, ScrollTrigger, TargetKind, TriggerTarget};
use super::view::{FeedView, RenderedPost};
use super::ViewMode;

/// Shown when the first page of a search comes back empty.
pub const NO_POSTS_NOTICE: &str = "No posts found. Try different search terms!";

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Events processed by the controller.
#[derive(Debug)]
pub enum FeedEvent {
    /// The scroll trigger's target became visible.
    TriggerFired,
    /// A page fetch finished.
    PageLoaded {
        ticket: PageTicket,
        result: Result<PostPage, FetchError>,
    },
}

/// Result of applying a finished page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Posts were appended. `added` excludes duplicates already on screen.
    Appended { added: usize, has_more: bool },
    /// The server returned no posts; pagination is over.
    Exhausted,
    /// The fetch failed; `message` is what the error banner shows.
    Failed { message: String },
    /// The response belonged to a replaced search and was discarded.
    Stale,
}

/// Tunables for a controller, usually derived from [`Config`].
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub per_page: u32,
    pub limits: RenderLimits,
    pub on_error: ErrorPolicy,
    pub target: TargetKind,
    pub trigger_threshold: f64,
    pub trigger_debounce: std::time::Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for FeedSettings {
    fn from(config: &Config) -> Self {
        Self {
            per_page: config.per_page,
            limits: RenderLimits {
                title: config.title_limit,
                grid_body: config.grid_body_limit,
                list_body: config.list_body_limit,
            },
            on_error: config.on_error,
            target: config.trigger_target,
            trigger_threshold: config.trigger_threshold,
            trigger_debounce: std::time::Duration::from_millis(config.trigger_debounce_ms),
        }
    }
}

/// Drives one post feed.
pub struct PostFeedController {
    client: FeedClient,
    settings: FeedSettings,
    renderer: Renderer,
    search: SearchParams,
    state: PaginationState,
    cache: PostCache,
    view: FeedView,
    trigger: ScrollTrigger,
    event_tx: mpsc::Sender<FeedEvent>,
    event_rx: mpsc::Receiver<FeedEvent>,
}

impl PostFeedController {
    pub fn new(client: FeedClient, settings: FeedSettings, mode: ViewMode) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let mut trigger = ScrollTrigger::new(settings.trigger_threshold, settings.trigger_debounce);
        trigger.subscribe(event_tx.clone());

        Self {
            client,
            renderer: Renderer::new(settings.limits),
            settings,
            search: SearchParams::default(),
            state: PaginationState::new(),
            cache: PostCache::new(),
            view: FeedView::new(mode),
            trigger,
            event_tx,
            event_rx,
        }
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    pub fn view(&self) -> &FeedView {
        &self.view
    }

    pub fn cache(&self) -> &PostCache {
        &self.cache
    }

    pub fn trigger(&self) -> &ScrollTrigger {
        &self.trigger
    }

    /// Starts a new search and requests its first page.
    ///
    /// Clears the container, the post cache, and any banner. A fetch still
    /// running for the previous search is left to finish; its result is
    /// discarded as stale.
    pub fn search(&mut self, params: SearchParams) -> bool {
        let generation = self.state.reset();
        tracing::info!(
            query = %params.query,
            subreddit = %params.subreddit,
            generation,
            "Starting search"
        );

        self.search = params;
        self.cache.clear();
        self.view.clear();
        self.view.set_loading(false);
        self.trigger.disconnect();
        self.load_more()
    }

    /// Requests the next page. No-op while a page is loading or once the
    /// feed is exhausted. Returns true if a request was issued.
    pub fn load_more(&mut self) -> bool {
        let Some(ticket) = self.state.begin() else {
            tracing::debug!(
                loading = self.state.is_loading(),
                has_more = self.state.has_more(),
                "Load-more ignored"
            );
            return false;
        };

        self.view.set_loading(true);
        let request = self.search.page(ticket.page, self.settings.per_page);
        let client = self.client.clone();
        let tx = self.event_tx.clone();

        tracing::debug!(page = ticket.page, generation = ticket.generation, "Loading page");
        tokio::spawn(async move {
            let result = client.fetch_page(&request).await;
            if tx.send(FeedEvent::PageLoaded { ticket, result }).await.is_err() {
                tracing::debug!(page = ticket.page, "Feed dropped before page arrived");
            }
        });
        true
    }

    /// Asks for the next page again, clearing the error banner if a
    /// request went out.
    ///
    /// Only has an effect when pagination is still open, i.e. under
    /// [`ErrorPolicy::Retain`] or before any failure. Otherwise the banner
    /// stays up.
    pub fn retry(&mut self) -> bool {
        if !self.load_more() {
            return false;
        }
        self.view.clear_error();
        true
    }

    /// Forwards intersection reports to the scroll trigger.
    pub fn report_visibility(&mut self, entries: &[Intersection]) -> bool {
        self.trigger.report(entries)
    }

    /// Waits for the next event. The controller keeps a sender alive, so
    /// this only returns `None` if the channel is closed externally.
    pub async fn next_event(&mut self) -> Option<FeedEvent> {
        self.event_rx.recv().await
    }

    pub fn handle_event(&mut self, event: FeedEvent) -> Option<LoadOutcome> {
        match event {
            FeedEvent::TriggerFired => {
                self.load_more();
                None
            }
            FeedEvent::PageLoaded { ticket, result } => Some(self.apply_page(ticket, result)),
        }
    }

    /// Processes events until no page is in flight.
    ///
    /// Returns the outcome of the last page applied, or `None` if nothing
    /// was loading.
    pub async fn settle(&mut self) -> Option<LoadOutcome> {
        let mut last = None;
        while self.state.is_loading() {
            let Some(event) = self.next_event().await else {
                break;
            };
            if let Some(outcome) = self.handle_event(event) {
                last = Some(outcome);
            }
        }
        last
    }

    /// Switches layout and re-renders every displayed post from the cache.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        tracing::debug!(from = %self.view.mode(), to = %mode, posts = self.cache.len(), "Switching view mode");
        self.view.set_mode(mode);

        let items: Vec<RenderedPost> = self
            .cache
            .iter()
            .map(|post| RenderedPost {
                id: post.id.clone(),
                markup: self.renderer.render_post(post, mode),
            })
            .collect();
        self.view.replace_all(items);

        // Replaced cards are new elements; watch them again
        if self.state.has_more() && !self.state.is_loading() && !self.cache.is_empty() {
            self.rearm();
        }
    }

    /// Asks the backend to scrape fresh posts, then searches with `params`.
    ///
    /// If the scrape fails the feed is left untouched.
    pub async fn scrape_and_refresh(
        &mut self,
        request: &ScrapeRequest,
        params: SearchParams,
    ) -> Result<bool, FetchError> {
        self.client.scrape(request).await?;
        Ok(self.search(params))
    }

    /// Renders the whole page, including the container and banners.
    pub fn render_html(&self) -> String {
        render_page(&self.view, &self.search, self.state.has_more()).into_string()
    }

    fn apply_page(&mut self, ticket: PageTicket, result: Result<PostPage, FetchError>) -> LoadOutcome {
        if self.state.is_stale(ticket) {
            tracing::debug!(
                page = ticket.page,
                ticket_generation = ticket.generation,
                current_generation = self.state.generation(),
                "Discarding stale page"
            );
            return LoadOutcome::Stale;
        }

        self.view.set_loading(false);
        let first_page = ticket.page == 1;

        match result {
            Ok(page) if !page.posts.is_empty() => {
                let mode = self.view.mode();
                let mut rendered = Vec::with_capacity(page.posts.len());
                for post in page.posts {
                    let markup = self.renderer.render_post(&post, mode);
                    let id = post.id.clone();
                    if self.cache.insert(post) {
                        rendered.push(RenderedPost { id, markup });
                    } else {
                        tracing::debug!(id = %id, "Skipping duplicate post");
                    }
                }

                let added = rendered.len();
                self.view.append(rendered);
                let has_more = self.state.finish_page(page.total_pages);
                tracing::info!(
                    page = ticket.page,
                    added,
                    total = self.cache.len(),
                    has_more,
                    "Rendered page"
                );

                if has_more {
                    self.rearm();
                } else {
                    self.trigger.disconnect();
                }
                LoadOutcome::Appended { added, has_more }
            }
            Ok(_) => {
                self.state.finish_empty();
                self.trigger.disconnect();
                if first_page && self.cache.is_empty() {
                    self.view.set_notice(NO_POSTS_NOTICE);
                }
                tracing::info!(page = ticket.page, "No more posts");
                LoadOutcome::Exhausted
            }
            Err(e) => {
                let prefix = if first_page {
                    "Error performing search"
                } else {
                    "Error loading posts"
                };
                let message = format!("{}: {}", prefix, e);
                tracing::warn!(page = ticket.page, error = %e, "Page load failed");

                self.state.finish_failed(self.settings.on_error);
                self.view.show_error(message.clone());
                if self.state.has_more() {
                    self.rearm();
                } else {
                    self.trigger.disconnect();
                }
                LoadOutcome::Failed { message }
            }
        }
    }

    fn rearm(&mut self) {
        let target = match (self.settings.target, self.view.last_item_id()) {
            (TargetKind::LastItem, Some(id)) => TriggerTarget::LastItem(id.to_string()),
            _ => TriggerTarget::Sentinel,
        };
        self.trigger.observe(target);
    }
}
