pub mod renderer;
pub mod ribbon_service;
pub mod session_store;
pub mod template_service;

pub use renderer::RenderService;
pub use ribbon_service::{RibbonService, RibbonTables, SubmitOutcome, SubmitStatus};
pub use session_store::{InMemorySessionStore, SessionHandle, SessionStore};
pub use template_service::TemplateService;
