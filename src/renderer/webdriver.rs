//! WebDriver-protocol renderer
//!
//! A thin HTTP client onto a remote WebDriver endpoint (chromedriver or a
//! hosted equivalent). Only the handful of commands the extractor needs
//! are implemented; everything returns through the `Renderer` trait.

use crate::renderer::{ElementHandle, Renderer, RendererError, RendererResult};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

/// W3C element identifier key in WebDriver responses
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Poll interval for `wait_for`
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Renderer backed by a remote WebDriver session
pub struct WebDriverRenderer {
    client: Client,
    base_url: String,
    session_id: String,
}

impl WebDriverRenderer {
    /// Creates a new headless session against a WebDriver endpoint
    ///
    /// # Arguments
    ///
    /// * `endpoint` - WebDriver server URL (e.g. "http://localhost:9515")
    ///
    /// # Returns
    ///
    /// * `Ok(WebDriverRenderer)` - Session created
    /// * `Err(RendererError::SessionSetup)` - Endpoint unreachable or refused
    pub async fn connect(endpoint: &str) -> RendererResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| RendererError::SessionSetup(e.to_string()))?;

        let base_url = endpoint.trim_end_matches('/').to_string();
        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "goog:chromeOptions": {
                        "args": [
                            "--headless=new",
                            "--no-sandbox",
                            "--disable-dev-shm-usage",
                            "--window-size=1920,1600",
                        ]
                    }
                }
            }
        });

        let response = client
            .post(format!("{}/session", base_url))
            .json(&capabilities)
            .send()
            .await
            .map_err(|e| RendererError::SessionSetup(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| RendererError::SessionSetup(e.to_string()))?;

        let session_id = body["value"]["sessionId"]
            .as_str()
            .ok_or_else(|| {
                RendererError::SessionSetup(format!("no session id in response: {}", body))
            })?
            .to_string();

        Ok(Self {
            client,
            base_url,
            session_id,
        })
    }

    /// Issues one WebDriver command and unwraps its `value` field
    async fn command(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        selector_context: Option<&str>,
    ) -> RendererResult<Value> {
        let url = format!("{}/session/{}{}", self.base_url, self.session_id, path);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RendererError::Command(e.to_string()))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| RendererError::Command(e.to_string()))?;

        if status == StatusCode::NOT_FOUND
            && payload["value"]["error"].as_str() == Some("no such element")
        {
            return Err(RendererError::ElementNotFound {
                selector: selector_context.unwrap_or("<unknown>").to_string(),
            });
        }
        if !status.is_success() {
            let message = payload["value"]["message"].as_str().unwrap_or("").to_string();
            return Err(RendererError::Command(format!("HTTP {}: {}", status, message)));
        }

        Ok(payload["value"].clone())
    }

    fn element_ref(element: &ElementHandle) -> Value {
        json!({ ELEMENT_KEY: element.0 })
    }

    fn parse_element(value: &Value, selector: &str) -> RendererResult<ElementHandle> {
        value[ELEMENT_KEY]
            .as_str()
            .map(|id| ElementHandle(id.to_string()))
            .ok_or_else(|| RendererError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    fn parse_elements(value: &Value) -> Vec<ElementHandle> {
        value
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry[ELEMENT_KEY].as_str())
                    .map(|id| ElementHandle(id.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    async fn load(&mut self, url: &str) -> RendererResult<()> {
        self.command(Method::POST, "/url", Some(json!({ "url": url })), None)
            .await?;
        Ok(())
    }

    async fn find(&mut self, selector: &str) -> RendererResult<ElementHandle> {
        let value = self
            .command(
                Method::POST,
                "/element",
                Some(json!({ "using": "css selector", "value": selector })),
                Some(selector),
            )
            .await?;
        Self::parse_element(&value, selector)
    }

    async fn find_all(&mut self, selector: &str) -> RendererResult<Vec<ElementHandle>> {
        let value = self
            .command(
                Method::POST,
                "/elements",
                Some(json!({ "using": "css selector", "value": selector })),
                Some(selector),
            )
            .await?;
        Ok(Self::parse_elements(&value))
    }

    async fn find_in(
        &mut self,
        parent: &ElementHandle,
        selector: &str,
    ) -> RendererResult<ElementHandle> {
        let path = format!("/element/{}/element", parent.0);
        let value = self
            .command(
                Method::POST,
                &path,
                Some(json!({ "using": "css selector", "value": selector })),
                Some(selector),
            )
            .await?;
        Self::parse_element(&value, selector)
    }

    async fn find_all_in(
        &mut self,
        parent: &ElementHandle,
        selector: &str,
    ) -> RendererResult<Vec<ElementHandle>> {
        let path = format!("/element/{}/elements", parent.0);
        let value = self
            .command(
                Method::POST,
                &path,
                Some(json!({ "using": "css selector", "value": selector })),
                Some(selector),
            )
            .await?;
        Ok(Self::parse_elements(&value))
    }

    async fn click(&mut self, element: &ElementHandle) -> RendererResult<()> {
        // Script-dispatched click; the native click command fails whenever
        // an overlay intersects the element
        self.command(
            Method::POST,
            "/execute/sync",
            Some(json!({
                "script": "arguments[0].click();",
                "args": [Self::element_ref(element)],
            })),
            None,
        )
        .await?;
        Ok(())
    }

    async fn text(&mut self, element: &ElementHandle) -> RendererResult<String> {
        let path = format!("/element/{}/text", element.0);
        let value = self.command(Method::GET, &path, None, None).await?;
        Ok(value.as_str().unwrap_or("").to_string())
    }

    async fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> RendererResult<Option<String>> {
        let path = format!("/element/{}/attribute/{}", element.0, name);
        let value = self.command(Method::GET, &path, None, None).await?;
        Ok(value.as_str().map(String::from))
    }

    async fn execute_script(&mut self, script: &str) -> RendererResult<Value> {
        self.command(
            Method::POST,
            "/execute/sync",
            Some(json!({ "script": script, "args": [] })),
            None,
        )
        .await
    }

    async fn cookies(&mut self) -> RendererResult<Vec<(String, String)>> {
        let value = self.command(Method::GET, "/cookie", None, None).await?;
        let cookies = value
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|cookie| {
                        let name = cookie["name"].as_str()?;
                        let value = cookie["value"].as_str()?;
                        Some((name.to_string(), value.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(cookies)
    }

    async fn user_agent(&mut self) -> RendererResult<String> {
        let value = self.execute_script("return navigator.userAgent;").await?;
        Ok(value.as_str().unwrap_or("").to_string())
    }

    async fn wait_for(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> RendererResult<ElementHandle> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match self.find(selector).await {
                Ok(element) => return Ok(element),
                Err(RendererError::ElementNotFound { .. }) => {
                    if tokio::time::Instant::now() >= deadline {
                        return Err(RendererError::WaitTimeout {
                            selector: selector.to_string(),
                            seconds: timeout.as_secs(),
                        });
                    }
                    tokio::time::sleep(WAIT_POLL_INTERVAL).await;
                }
                Err(other) => return Err(other),
            }
        }
    }

    async fn quit(&mut self) -> RendererResult<()> {
        let url = format!("{}/session/{}", self.base_url, self.session_id);
        self.client
            .delete(url)
            .send()
            .await
            .map_err(|e| RendererError::Command(e.to_string()))?;
        Ok(())
    }
}
