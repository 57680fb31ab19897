pub mod export;
pub mod extract;
pub mod headers;
pub mod ribbon;
pub mod sessions;
pub mod tables;

pub use export::{__path_export_session, __path_session_svg};
pub use export::{export_session, session_svg, RIBBON_STATUS_HEADER};
pub use ribbon::{__path_compute_ribbon, __path_export_ribbon};
pub use ribbon::{compute_ribbon, export_ribbon};
pub use sessions::{
    __path_add_lens, __path_create_session, __path_delete_session, __path_get_session,
    __path_remove_lens, __path_set_crop_factor, __path_submit, __path_trigger_focus,
    __path_update_lens,
};
pub use sessions::{
    add_lens, create_session, delete_session, get_session, remove_lens, set_crop_factor, submit,
    trigger_focus, update_lens, AddLensRequest, AddedLensResponse, CropFactorRequest,
    SessionResponse,
};
pub use tables::{get_tables, TablesResponse, __path_get_tables};
