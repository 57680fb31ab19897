pub mod config;
pub mod export_format;
pub mod lens_document;
pub mod session;

pub use config::{AppConfig, LayoutConfig};
pub use export_format::ExportFormat;
pub use lens_document::LensDocument;
pub use session::{Ribbon, Session, SessionId};
