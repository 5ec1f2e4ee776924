//! Request/response messaging between the control surface and the content
//! context that owns a [`serverfind_matcher::Highlighter`].

pub mod content;
pub mod protocol;
pub mod tabs;
pub mod target;

pub use content::ContentEndpoint;
pub use protocol::{decode_request, Request, Response, ALLOWED_KINDS};
pub use tabs::{LocalTabs, PageBuilder, PageLoadState, TabEvent, TabHost, TabId, TabInfo};
pub use target::is_target_url;
