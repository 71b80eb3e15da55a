use std::{fmt, sync::Arc};

use tracing::debug;

use crate::{district::{DistrictGeometry, DistrictType}, geom::Extent};

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// One committed explorer transition. Geometry and extent always arrive together.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewUpdate {
    pub district_type: DistrictType,
    pub geometry: Arc<DistrictGeometry>,
    pub extent: Extent,
    pub focus: Option<String>,
}

type Callback = Box<dyn FnMut(&ViewUpdate) + Send>;

#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

impl Subscribers {
    pub(crate) fn subscribe(&mut self, callback: impl FnMut(&ViewUpdate) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(sub, _)| *sub != id);
        self.callbacks.len() != before
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.callbacks.len() }

    /// Deliver `update` to every subscriber, in subscription order.
    pub(crate) fn publish(&mut self, update: &ViewUpdate) {
        debug!(
            district_type = %update.district_type,
            focus = update.focus.as_deref().unwrap_or("-"),
            subscribers = self.len(),
            "publishing view update"
        );
        for (_, callback) in &mut self.callbacks {
            callback(update);
        }
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers").field("count", &self.len()).finish()
    }
}
