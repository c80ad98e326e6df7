//! Stylist onboarding lifecycle: records, stage projection, and the admin
//! review queue.

pub mod confirm;
pub mod flow;
pub mod local_page;
pub mod model;
pub mod queue;
pub mod state;

pub use confirm::{ConfirmedTransition, PendingTransition, Transition};
pub use flow::{FlowStage, StylistAction, actions_for, flow_stage};
pub use local_page::{LocalPage, LocalPager};
pub use model::{
    InviteCreated, InvitePreview, InviteStatus, PaginationMetadata, SortOrder, StylistPage,
    StylistQuery, StylistRecord, StylistStatus,
};
pub use queue::{DirectoryPage, QueueRow, RequestStatus, ReviewQueue, ThunkOutcome};
pub use state::{Operation, StylistEvent, StylistState, reduce};
