mod background;
mod explorer;
mod observer;

pub use background::BackgroundLoads;
pub use explorer::{DistrictExplorer, ExplorerState, StagedTransition};
pub use observer::{SubscriptionId, ViewUpdate};
