//! Host-facing page models, mutation events, and the propagation service

mod events;
mod model;
mod service;

pub use events::PageEvent;
pub use model::{EmbedFrame, FormField, FormModel, PageModel};
pub use service::{PropagationHandle, PropagationService};
