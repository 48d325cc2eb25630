//! Preview surface, rendering, and sync scrolling
//!
//! The preview draws the parsed document natively; the printable page is a
//! separate HTML rendering built from a template. Scroll positions are
//! shared with the editor through [`ScrollCoordinator`].

pub mod renderer;
pub mod sync_scroll;
pub mod template;
mod widget;

pub use sync_scroll::{ScrollCoordinator, ScrollGeometry, SurfaceSync};
pub use template::{render_page, PageOptions};
pub use widget::PreviewPane;
