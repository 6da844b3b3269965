//! Renderer capability
//!
//! Extraction drives a live rendering engine but never talks to one
//! directly: everything goes through the narrow `Renderer` trait so the
//! state machine can run against a scripted double in tests. The one
//! production implementation speaks the W3C WebDriver protocol over HTTP.

mod webdriver;

pub use webdriver::WebDriverRenderer;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Opaque handle to a rendered element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle(pub String);

/// Errors surfaced by renderer operations
#[derive(Debug, Error)]
pub enum RendererError {
    /// No element matched the selector
    #[error("element not found: {selector}")]
    ElementNotFound { selector: String },

    /// The rendering session could not be created; nothing downstream is
    /// possible, so this aborts the run
    #[error("renderer session could not be created: {0}")]
    SessionSetup(String),

    /// Any other command failure (stale element, transport fault, ...)
    #[error("renderer command failed: {0}")]
    Command(String),

    #[error("timed out after {seconds}s waiting for {selector}")]
    WaitTimeout { selector: String, seconds: u64 },
}

/// Result type for renderer operations
pub type RendererResult<T> = Result<T, RendererError>;

/// Capability interface onto a live rendering engine
///
/// Methods take `&mut self`: extraction owns exclusive access to one
/// session, and navigation state (current page, open modal) is not
/// shareable.
#[async_trait]
pub trait Renderer: Send {
    /// Navigates the session to a URL and waits for the document to load
    async fn load(&mut self, url: &str) -> RendererResult<()>;

    /// Finds the first element matching a CSS selector
    async fn find(&mut self, selector: &str) -> RendererResult<ElementHandle>;

    /// Finds all elements matching a CSS selector, in document order
    async fn find_all(&mut self, selector: &str) -> RendererResult<Vec<ElementHandle>>;

    /// Finds the first matching descendant of `parent`
    async fn find_in(
        &mut self,
        parent: &ElementHandle,
        selector: &str,
    ) -> RendererResult<ElementHandle>;

    /// Finds all matching descendants of `parent`, in document order
    async fn find_all_in(
        &mut self,
        parent: &ElementHandle,
        selector: &str,
    ) -> RendererResult<Vec<ElementHandle>>;

    /// Clicks an element via script dispatch
    ///
    /// Script dispatch (not a native click) tolerates the overlays the
    /// listing likes to float over its rows.
    async fn click(&mut self, element: &ElementHandle) -> RendererResult<()>;

    /// Returns the element's rendered text
    async fn text(&mut self, element: &ElementHandle) -> RendererResult<String>;

    /// Returns an attribute value, or None when the attribute is absent
    async fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> RendererResult<Option<String>>;

    /// Executes a script in the page and returns its JSON result
    async fn execute_script(&mut self, script: &str) -> RendererResult<serde_json::Value>;

    /// Returns the session's cookies as name/value pairs
    async fn cookies(&mut self) -> RendererResult<Vec<(String, String)>>;

    /// Returns the user agent the session reports to pages
    async fn user_agent(&mut self) -> RendererResult<String>;

    /// Polls for a selector until it matches or the timeout elapses
    async fn wait_for(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> RendererResult<ElementHandle>;

    /// Ends the rendering session
    async fn quit(&mut self) -> RendererResult<()>;
}
