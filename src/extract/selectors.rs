//! Selectors for the trending listing
//!
//! The listing's DOM uses generated class names, so elements are anchored
//! on the stable `jsname`/`jscontroller`/`aria` attributes instead. All
//! selectors are CSS and resolved by the Renderer.

/// Body of the listing table; its disappearance terminates extraction
pub const TREND_TABLE_BODY: &str = "table[role='grid'] tbody[jsname='cC57zf']";

/// One trend row within the table body
pub const TREND_ROW: &str = "tr";

/// Positionally-addressed cells within a row
pub const ROW_CELL: &str = "td";

/// Control that opens the rows-per-page menu
pub const PAGE_SIZE_BUTTON: &str = "div[jsname='DRv89'] span[jscontroller='QjUiqc']";

/// The rows-per-page menu itself
pub const PAGE_SIZE_MENU: &str = "ul[aria-label='Rows per page']";

/// Options inside the rows-per-page menu
pub const PAGE_SIZE_OPTION: &str = "li";

/// Label of the largest supported page size
pub const MAX_PAGE_SIZE_LABEL: &str = "50";

/// Detail panel opened by activating a row
pub const MODAL: &str = "div[jsname='dUjKgb']";

/// Canonical trend title inside the detail panel
pub const MODAL_TITLE: &str = "span[role='heading']";

/// Close control of the detail panel (its first button)
pub const MODAL_CLOSE: &str = "button";

/// Explore deep-links inside the detail panel; the last one is canonical
pub const EXPLORE_LINK: &str = "a[aria-label='Explore']";

/// "Show more queries" control, present only when queries overflow
pub const QUERY_EXPAND: &str = "span[jsaction='click:KoToPc']";

/// Query label spans within the expanded query list
pub const QUERY_ITEM: &str = "div[jscontroller='LkRRw'] button span:nth-of-type(4)";

/// Article anchors within the detail panel
pub const ARTICLE_LINK: &str = "div[jsaction*='vx9mmb'] a";

/// Article thumbnail within an article anchor
pub const ARTICLE_IMAGE: &str = "img";

/// Article title block within an article anchor
pub const ARTICLE_TITLE: &str = "div:nth-of-type(2) div:nth-of-type(1)";

/// Article "time ● source" block within an article anchor
pub const ARTICLE_SOURCE_TIME: &str = "div:nth-of-type(2) div:nth-of-type(2)";

/// Next-page control; absent or disabled on the last page
pub const NEXT_PAGE: &str = "button[jsname='ViaHrd'][aria-label='Go to next page']";
