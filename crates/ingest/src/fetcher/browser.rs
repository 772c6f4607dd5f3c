use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::{FetchStrategy, FetchedPage, PageFetcher, USER_AGENT};
use crate::error::ScrapeError;

const WINDOW: (u32, u32) = (1920, 1080);
const POLL_INTERVAL: Duration = Duration::from_millis(500);
const NETWORK_IDLE_CAP: Duration = Duration::from_secs(30);

const HIDE_WEBDRIVER: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

#[derive(Clone, Debug)]
pub struct BrowserOptions {
    pub headless: bool,
    /// How long to wait for `ready_selector` after each load.
    pub ready_timeout: Duration,
    /// Selector group whose presence means the roster has rendered.
    pub ready_selector: String,
}

struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

/// Fetches through one Chromium tab that lives until [`PageFetcher::shutdown`].
///
/// Dropping the fetcher without calling `shutdown` still kills the browser
/// process, since `Browser` terminates its child on drop.
pub struct RenderedFetcher {
    session: Mutex<Option<BrowserSession>>,
    options: BrowserOptions,
}

impl RenderedFetcher {
    pub async fn launch(options: BrowserOptions) -> Result<Self, ScrapeError> {
        let mut builder = BrowserConfig::builder()
            .window_size(WINDOW.0, WINDOW.1)
            .viewport(Viewport {
                width: WINDOW.0,
                height: WINDOW.1,
                device_scale_factor: None,
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            })
            .no_sandbox()
            .arg("--disable-blink-features=AutomationControlled");
        if !options.headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| ScrapeError::Config(format!("invalid browser config: {}", e)))?;

        tracing::info!(headless = options.headless, "launching browser");
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScrapeError::load(format!("failed to launch browser: {}", e)))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "browser handler error");
                }
            }
        });

        let page = match open_tab(&browser).await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler_task.abort();
                return Err(e);
            }
        };

        Ok(Self {
            session: Mutex::new(Some(BrowserSession {
                browser,
                page,
                handler_task,
            })),
            options,
        })
    }

    async fn load(&self, url: &str, reload: bool) -> Result<FetchedPage, ScrapeError> {
        let guard = self.session.lock().await;
        let session = guard
            .as_ref()
            .ok_or_else(|| ScrapeError::load("browser session already closed"))?;
        let page = &session.page;

        let navigated = if reload {
            page.reload().await
        } else {
            page.goto(url).await
        };
        navigated.map_err(|e| ScrapeError::load(format!("navigation failed: {}", e)))?;

        wait_for_network_idle(page, self.options.ready_timeout.min(NETWORK_IDLE_CAP)).await;

        if !wait_for_selector(page, &self.options.ready_selector, self.options.ready_timeout).await
        {
            tracing::warn!(
                timeout_secs = self.options.ready_timeout.as_secs(),
                "member cards did not appear before timeout"
            );
        }

        let html = page
            .content()
            .await
            .map_err(|e| ScrapeError::load(format!("failed to read page content: {}", e)))?;

        tracing::info!(bytes = html.len(), "captured rendered page");
        Ok(FetchedPage {
            url: url.to_string(),
            html,
        })
    }
}

async fn open_tab(browser: &Browser) -> Result<Page, ScrapeError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| ScrapeError::load(format!("failed to open tab: {}", e)))?;

    page.set_user_agent(SetUserAgentOverrideParams::new(USER_AGENT))
        .await
        .map_err(|e| ScrapeError::load(format!("failed to set user agent: {}", e)))?;

    page.execute(AddScriptToEvaluateOnNewDocumentParams::new(HIDE_WEBDRIVER))
        .await
        .map_err(|e| ScrapeError::load(format!("failed to install init script: {}", e)))?;

    Ok(page)
}

/// Wait until the page stops requesting resources for one second.
///
/// Bounded by `timeout`; gives up quietly since the selector wait follows.
async fn wait_for_network_idle(page: &Page, timeout: Duration) {
    let js = format!(
        r#"(async () => {{
            const timeoutMs = {timeout_ms};
            const idleMs = 1000;
            const interval = 250;
            const start = Date.now();
            let last = performance.getEntriesByType('resource').length;
            let stable = 0;
            while (Date.now() - start < timeoutMs) {{
                await new Promise(r => setTimeout(r, interval));
                const now = performance.getEntriesByType('resource').length;
                if (document.readyState === 'complete' && now === last) {{
                    stable += interval;
                    if (stable >= idleMs) {{
                        return {{ ok: true, waitedMs: Date.now() - start }};
                    }}
                }} else {{
                    stable = 0;
                }}
                last = now;
            }}
            return {{ ok: false, waitedMs: Date.now() - start }};
        }})()"#,
        timeout_ms = timeout.as_millis()
    );

    match page.evaluate(js).await {
        Ok(result) => {
            let info = result
                .into_value::<serde_json::Value>()
                .unwrap_or_default();
            let ok = info.get("ok").and_then(|v| v.as_bool()).unwrap_or(false);
            let waited_ms = info.get("waitedMs").and_then(|v| v.as_u64()).unwrap_or(0);
            if ok {
                tracing::debug!(waited_ms, "network idle");
            } else {
                tracing::debug!(waited_ms, "network still busy, continuing");
            }
        }
        Err(e) => tracing::debug!(error = %e, "network idle check failed"),
    }
}

async fn wait_for_selector(page: &Page, selector: &str, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if page.find_element(selector).await.is_ok() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[async_trait]
impl PageFetcher for RenderedFetcher {
    fn strategy(&self) -> FetchStrategy {
        FetchStrategy::Rendered
    }

    async fn fetch(&self, url: &str) -> Result<FetchedPage, ScrapeError> {
        tracing::info!(url, "opening roster page in browser");
        self.load(url, false).await
    }

    async fn reload(&self, url: &str) -> Result<FetchedPage, ScrapeError> {
        tracing::info!(url, "reloading roster page in browser");
        self.load(url, true).await
    }

    async fn shutdown(&self) {
        let Some(mut session) = self.session.lock().await.take() else {
            return;
        };

        tracing::info!("closing browser");
        if let Err(e) = session.browser.close().await {
            tracing::warn!(error = %e, "browser did not close cleanly");
        }
        let _ = session.browser.wait().await;
        session.handler_task.abort();
    }
}
