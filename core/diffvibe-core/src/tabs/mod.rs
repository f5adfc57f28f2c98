//! Open comparison tabs and the state machine that manages them.

mod store;
mod types;

pub use store::{SubscriptionId, TabEvent, TabStore};
pub use types::{
    file_name, CompareMode, DirectoryState, DirectoryStatePatch, FileStatus, HomeState,
    HomeStatePatch, ScanResult, StatusFilter, Tab, TabKind, HOME_TAB_ID,
};
