pub mod cache;
pub mod registry;
pub mod service;

pub use cache::{Template, TemplateCache};
pub use registry::JobRegistry;
pub use service::{JobReady, TemplateService};
