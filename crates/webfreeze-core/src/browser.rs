//! Browser session and request interception over the Chrome DevTools
//! Protocol.
//!
//! The session pumps `Fetch.requestPaused` events into the [`Interceptor`]
//! and issues exactly one completion command per request: continue, fulfill
//! from the mirror, or fail. CDP command failures are logged, never fatal.

use crate::intercept::{Decision, Interceptor, SubresourceRequest};
use crate::resource::ResourceKind;
use anyhow::{anyhow, Context, Result};
use base64::Engine;
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams, EventRequestPaused, FailRequestParams,
    FulfillRequestParams, HeaderEntry, RequestPattern, RequestStage,
};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, Headers, ResourceType};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A launched browser with one page and the background CDP handler task.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch a browser and open a blank page.
    pub async fn launch(headless: bool) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if !headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(|e| anyhow!(e))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch browser")?;

        let handler_task = tokio::spawn(async move {
            while let Some(message) = handler.next().await {
                if message.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to open page")?;

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// Enable Fetch-domain interception and route every paused request
    /// through `interceptor` on a blocking thread.
    pub async fn install_interceptor(&self, interceptor: Arc<Interceptor>) -> Result<JoinHandle<()>> {
        let mut events = self
            .page
            .event_listener::<EventRequestPaused>()
            .await
            .context("failed to listen for paused requests")?;

        let enable = EnableParams::builder()
            .pattern(
                RequestPattern::builder()
                    .url_pattern("*")
                    .request_stage(RequestStage::Request)
                    .build(),
            )
            .build();
        self.page
            .execute(enable)
            .await
            .context("failed to enable request interception")?;

        let page = self.page.clone();
        Ok(tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let page = page.clone();
                let interceptor = Arc::clone(&interceptor);
                tokio::spawn(async move {
                    if let Err(e) = resolve_paused_request(&page, interceptor, &event).await {
                        tracing::warn!("request interception failed: {:#}", e);
                    }
                });
            }
        }))
    }

    /// Navigate to `url` and wait for the page to settle, bounded by
    /// `timeout`. Failure here is fatal to the run.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        let nav = tokio::time::timeout(timeout, async {
            self.page.goto(url).await?.wait_for_navigation().await?;
            anyhow::Ok(())
        });
        match nav.await {
            Ok(result) => result.with_context(|| format!("navigation to {url} failed")),
            Err(_) => Err(anyhow!("navigation to {url} timed out")),
        }
    }

    /// Rendered markup of the current page.
    pub async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .context("failed to read page content")
    }

    /// Close the browser and stop the handler task.
    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .context("failed to close browser")?;
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("browser process wait failed: {}", e);
        }
        let _ = self.handler_task.await;
        Ok(())
    }
}

/// Map one paused request to a decision and issue its completion command.
async fn resolve_paused_request(
    page: &Page,
    interceptor: Arc<Interceptor>,
    event: &EventRequestPaused,
) -> Result<()> {
    let request = SubresourceRequest {
        url: event.request.url.clone(),
        kind: resource_kind(&event.resource_type),
        content_type: header_value(&event.request.headers, "content-type"),
    };

    let decision = tokio::task::spawn_blocking(move || interceptor.handle(&request))
        .await
        .context("interceptor task failed")?;

    match decision {
        Decision::Continue => {
            page.execute(ContinueRequestParams::new(event.request_id.clone()))
                .await
                .context("Fetch.continueRequest failed")?;
        }
        Decision::Fulfill {
            status,
            content_type,
            body,
        } => {
            let mut params = FulfillRequestParams::new(event.request_id.clone(), status as i64);
            params.body = Some(
                base64::engine::general_purpose::STANDARD
                    .encode(&body)
                    .into(),
            );
            if let Some(value) = content_type {
                params.response_headers = Some(vec![HeaderEntry {
                    name: "content-type".to_string(),
                    value,
                }]);
            }
            page.execute(params)
                .await
                .context("Fetch.fulfillRequest failed")?;
        }
        Decision::Abort => {
            page.execute(FailRequestParams::new(
                event.request_id.clone(),
                ErrorReason::Failed,
            ))
            .await
            .context("Fetch.failRequest failed")?;
        }
    }
    Ok(())
}

fn resource_kind(cdp: &ResourceType) -> ResourceKind {
    match cdp {
        ResourceType::Document => ResourceKind::Document,
        ResourceType::Stylesheet => ResourceKind::Stylesheet,
        ResourceType::Script => ResourceKind::Script,
        ResourceType::Image => ResourceKind::Image,
        ResourceType::Font => ResourceKind::Font,
        ResourceType::Media => ResourceKind::Media,
        ResourceType::Xhr => ResourceKind::Xhr,
        ResourceType::Fetch => ResourceKind::Fetch,
        _ => ResourceKind::Other,
    }
}

/// Case-insensitive lookup in a CDP header map.
fn header_value(headers: &Headers, name: &str) -> Option<String> {
    let map = serde_json::to_value(headers).ok()?;
    map.as_object()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, value)| value.as_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_kind_maps_cacheable_types() {
        assert_eq!(resource_kind(&ResourceType::Stylesheet), ResourceKind::Stylesheet);
        assert_eq!(resource_kind(&ResourceType::Script), ResourceKind::Script);
        assert_eq!(resource_kind(&ResourceType::Image), ResourceKind::Image);
    }

    #[test]
    fn resource_kind_folds_unhandled_types() {
        assert_eq!(resource_kind(&ResourceType::Ping), ResourceKind::Other);
        assert_eq!(resource_kind(&ResourceType::Manifest), ResourceKind::Other);
        assert_eq!(resource_kind(&ResourceType::WebSocket), ResourceKind::Other);
    }

    #[test]
    fn header_value_is_case_insensitive() {
        let headers = Headers::new(serde_json::json!({
            "Content-Type": "text/css",
            "Accept": "*/*",
        }));
        assert_eq!(
            header_value(&headers, "content-type").as_deref(),
            Some("text/css")
        );
        assert!(header_value(&headers, "etag").is_none());
    }
}
