use std::{collections::HashMap, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    district::{DistrictGeometry, DistrictGeometryLoader, DistrictRef, DistrictType},
    error::Result,
    explorer::{observer::Subscribers, SubscriptionId, ViewUpdate},
    geom::{Extent, ViewExtentPolicy},
};

/// Everything the view shows for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerState {
    district_type: DistrictType,
    geometry: Arc<DistrictGeometry>,
    extent: Extent,
    focus: Option<String>,
}

impl ExplorerState {
    #[inline] pub fn district_type(&self) -> DistrictType { self.district_type }

    #[inline] pub fn geometry(&self) -> &Arc<DistrictGeometry> { &self.geometry }

    #[inline] pub fn extent(&self) -> &Extent { &self.extent }

    #[inline] pub fn focus(&self) -> Option<&str> { self.focus.as_deref() }

    fn to_update(&self) -> ViewUpdate {
        ViewUpdate {
            district_type: self.district_type,
            geometry: Arc::clone(&self.geometry),
            extent: self.extent,
            focus: self.focus.clone(),
        }
    }
}

/// A fully loaded selection that has not been applied yet.
///
/// Built without touching the explorer, so it can be prepared on another thread and
/// applied later with `DistrictExplorer::commit`.
#[derive(Debug, Clone)]
pub struct StagedTransition {
    state: ExplorerState,
}

impl StagedTransition {
    /// Load (unless `cached`) and frame the geometry for `district_type`.
    pub fn prepare(
        loader: &dyn DistrictGeometryLoader,
        policy: &ViewExtentPolicy,
        district_type: DistrictType,
        cached: Option<Arc<DistrictGeometry>>,
    ) -> Result<Self> {
        let geometry = match cached {
            Some(geometry) => geometry,
            None => Arc::new(loader.load(district_type)?),
        };
        let extent = policy.compute_extent(district_type, Some(&geometry))?;
        Ok(Self { state: ExplorerState { district_type, geometry, extent, focus: None } })
    }

    #[inline] pub fn district_type(&self) -> DistrictType { self.state.district_type }
}

/// Reactive view model for the district selector.
///
/// Holds the selected district type with its geometry and extent, and publishes one
/// `ViewUpdate` to every subscriber for each committed change. A failed transition
/// leaves the state exactly as it was.
pub struct DistrictExplorer {
    loader: Arc<dyn DistrictGeometryLoader>,
    policy: ViewExtentPolicy,
    cache: HashMap<DistrictType, Arc<DistrictGeometry>>,
    state: ExplorerState,
    subscribers: Subscribers,
}

impl DistrictExplorer {
    /// Build the explorer and load the initial district type.
    pub fn new(
        loader: Arc<dyn DistrictGeometryLoader>,
        policy: ViewExtentPolicy,
        initial: DistrictType,
    ) -> Result<Self> {
        let staged = StagedTransition::prepare(loader.as_ref(), &policy, initial, None)?;
        let geometry = Arc::clone(&staged.state.geometry);
        info!(district_type = %initial, districts = geometry.len(), "explorer ready");

        Ok(Self {
            loader,
            policy,
            cache: HashMap::from([(initial, geometry)]),
            state: staged.state,
            subscribers: Subscribers::default(),
        })
    }

    #[inline] pub fn state(&self) -> &ExplorerState { &self.state }

    #[inline] pub fn district_type(&self) -> DistrictType { self.state.district_type }

    #[inline] pub fn geometry(&self) -> &Arc<DistrictGeometry> { &self.state.geometry }

    #[inline] pub fn extent(&self) -> &Extent { &self.state.extent }

    #[inline] pub fn focus(&self) -> Option<&str> { self.state.focus() }

    #[inline] pub fn policy(&self) -> &ViewExtentPolicy { &self.policy }

    #[inline] pub fn loader(&self) -> &Arc<dyn DistrictGeometryLoader> { &self.loader }

    /// Geometry already loaded for `district_type`, if any.
    #[inline]
    pub fn cached(&self, district_type: DistrictType) -> Option<Arc<DistrictGeometry>> {
        self.cache.get(&district_type).cloned()
    }

    /// The current state as an update, e.g. to draw a subscriber's first frame.
    #[inline] pub fn snapshot(&self) -> ViewUpdate { self.state.to_update() }

    pub fn subscribe(&mut self, callback: impl FnMut(&ViewUpdate) + Send + 'static) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Switch to `district_type`. Returns `Ok(false)` without loading or notifying when it
    /// is already selected. On error nothing changes.
    pub fn select_district_type(&mut self, district_type: DistrictType) -> Result<bool> {
        if district_type == self.state.district_type {
            debug!(%district_type, "district type already selected");
            return Ok(false);
        }
        let staged = self.stage(district_type).inspect_err(|e| {
            warn!(%district_type, error = %e, "district type change failed; keeping current view");
        })?;
        Ok(self.commit(staged))
    }

    /// Prepare a transition to `district_type` without applying it.
    pub fn stage(&self, district_type: DistrictType) -> Result<StagedTransition> {
        StagedTransition::prepare(self.loader.as_ref(), &self.policy, district_type, self.cached(district_type))
    }

    /// Apply a prepared transition and notify subscribers.
    ///
    /// Returns false (and publishes nothing) if the staged type is already selected.
    pub fn commit(&mut self, staged: StagedTransition) -> bool {
        if staged.state.district_type == self.state.district_type {
            return false;
        }
        self.cache.entry(staged.state.district_type).or_insert_with(|| Arc::clone(&staged.state.geometry));
        self.state = staged.state;
        info!(
            district_type = %self.state.district_type,
            districts = self.state.geometry.len(),
            "district type selected"
        );
        self.publish();
        true
    }

    /// Zoom to one district of the current geometry and highlight it.
    ///
    /// The focus is recorded as the district's own key (`TX-047`), which names it
    /// unambiguously even when the number repeats in other states.
    pub fn focus_district(&mut self, wanted: &DistrictRef) -> Result<()> {
        let extent = self.policy.district_extent(&self.state.geometry, wanted)?;
        let focus = self.state.geometry.locate(wanted)?.key().unwrap_or_else(|| wanted.to_string());
        if self.state.focus.as_deref() == Some(focus.as_str()) && self.state.extent == extent {
            return Ok(());
        }
        info!(district_type = %self.state.district_type, district = %focus, "focusing district");
        self.state.extent = extent;
        self.state.focus = Some(focus);
        self.publish();
        Ok(())
    }

    /// Drop any focus and return to the extent the policy gives the current type.
    pub fn reset_extent(&mut self) -> Result<()> {
        let extent = self.policy.compute_extent(self.state.district_type, Some(&self.state.geometry))?;
        if self.state.focus.is_none() && self.state.extent == extent {
            return Ok(());
        }
        self.state.extent = extent;
        self.state.focus = None;
        self.publish();
        Ok(())
    }

    fn publish(&mut self) {
        let update = self.state.to_update();
        self.subscribers.publish(&update);
    }
}

impl std::fmt::Debug for DistrictExplorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistrictExplorer")
            .field("state", &self.state)
            .field("cached", &self.cache.keys().collect::<Vec<_>>())
            .field("subscribers", &self.subscribers)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        path::PathBuf,
        sync::{atomic::{AtomicUsize, Ordering}, Mutex},
    };

    use geo::LineString;

    use super::*;
    use crate::{district::DistrictShape, error::Error};

    /// Loader serving fixed squares per type; types listed in `missing` fail like absent files.
    pub(crate) struct MockLoader {
        pub(crate) loads: AtomicUsize,
        pub(crate) missing: Mutex<Vec<DistrictType>>,
    }

    impl MockLoader {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self { loads: AtomicUsize::new(0), missing: Mutex::new(vec![]) })
        }

        pub(crate) fn loads(&self) -> usize { self.loads.load(Ordering::SeqCst) }
    }

    pub(crate) fn square(id: &str, x0: f64, y0: f64, size: f64) -> DistrictShape {
        DistrictShape::new(Some(id.into()), vec![LineString::from(vec![
            (x0, y0), (x0, y0 + size), (x0 + size, y0 + size), (x0 + size, y0), (x0, y0),
        ])])
    }

    impl DistrictGeometryLoader for MockLoader {
        fn load(&self, district_type: DistrictType) -> Result<DistrictGeometry> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.missing.lock().unwrap().contains(&district_type) {
                return Err(Error::FileNotFound(PathBuf::from(format!("data/{district_type}.shp"))));
            }
            let offset = district_type as usize as f64 * 100.0;
            Ok(DistrictGeometry::new(district_type, vec![
                square("01", offset, 0.0, 10.0),
                square("02", offset + 10.0, 0.0, 10.0),
            ]))
        }
    }

    /// Serves the same geometry for every type.
    struct FixedLoader(DistrictGeometry);

    impl DistrictGeometryLoader for FixedLoader {
        fn load(&self, district_type: DistrictType) -> Result<DistrictGeometry> {
            Ok(DistrictGeometry::new(district_type, self.0.districts().to_vec()))
        }
    }

    fn district(text: &str) -> DistrictRef { text.parse().unwrap() }

    fn explorer(loader: &Arc<MockLoader>) -> DistrictExplorer {
        DistrictExplorer::new(loader.clone(), ViewExtentPolicy::default(), DistrictType::UsHouse).unwrap()
    }

    fn recorder(explorer: &mut DistrictExplorer) -> Arc<Mutex<Vec<ViewUpdate>>> {
        let updates = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&updates);
        explorer.subscribe(move |update| sink.lock().unwrap().push(update.clone()));
        updates
    }

    #[test]
    fn initial_state_is_nationwide() {
        let loader = MockLoader::new();
        let explorer = explorer(&loader);

        assert_eq!(loader.loads(), 1);
        assert_eq!(explorer.district_type(), DistrictType::UsHouse);
        assert_eq!(*explorer.extent(), crate::geom::CONTINENTAL_US);
        assert_eq!(explorer.focus(), None);
    }

    #[test]
    fn selecting_same_type_twice_loads_and_notifies_once() {
        let loader = MockLoader::new();
        let mut explorer = explorer(&loader);
        let updates = recorder(&mut explorer);

        assert!(explorer.select_district_type(DistrictType::StateHouse).unwrap());
        assert!(!explorer.select_district_type(DistrictType::StateHouse).unwrap());

        assert_eq!(loader.loads(), 2);
        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].district_type, DistrictType::StateHouse);
        assert_eq!(updates[0].geometry.district_type(), DistrictType::StateHouse);
        assert_eq!(updates[0].extent.x_range(), (100.0, 120.0));
        assert_eq!(updates[0].extent.y_range(), (0.0, 10.0));
    }

    #[test]
    fn failed_load_leaves_state_untouched() {
        let loader = MockLoader::new();
        let mut explorer = explorer(&loader);
        explorer.select_district_type(DistrictType::StateHouse).unwrap();
        let updates = recorder(&mut explorer);
        loader.missing.lock().unwrap().push(DistrictType::StateSenate);

        let before = explorer.state().clone();
        let result = explorer.select_district_type(DistrictType::StateSenate);

        assert!(matches!(result, Err(Error::FileNotFound(_))));
        assert_eq!(*explorer.state(), before);
        assert!(updates.lock().unwrap().is_empty());
    }

    #[test]
    fn cached_geometry_is_reused() {
        let loader = MockLoader::new();
        let mut explorer = explorer(&loader);

        explorer.select_district_type(DistrictType::StateHouse).unwrap();
        explorer.select_district_type(DistrictType::UsHouse).unwrap();
        explorer.select_district_type(DistrictType::StateHouse).unwrap();

        assert_eq!(loader.loads(), 2);
        assert_eq!(explorer.district_type(), DistrictType::StateHouse);
    }

    #[test]
    fn focus_and_reset_publish_extent_changes() {
        let loader = MockLoader::new();
        let mut explorer = explorer(&loader);
        explorer.select_district_type(DistrictType::StateHouse).unwrap();
        let updates = recorder(&mut explorer);

        explorer.focus_district(&district("2")).unwrap();
        assert_eq!(explorer.focus(), Some("02"));
        assert_eq!(explorer.extent().x_range(), (110.0, 120.0));

        // Focusing the same district again changes nothing
        explorer.focus_district(&district("02")).unwrap();

        let before = explorer.state().clone();
        assert!(matches!(explorer.focus_district(&district("99")), Err(Error::DistrictNotFound { .. })));
        assert_eq!(*explorer.state(), before);

        explorer.reset_extent().unwrap();
        assert_eq!(explorer.focus(), None);
        assert_eq!(explorer.extent().x_range(), (100.0, 120.0));

        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].focus.as_deref(), Some("02"));
        assert_eq!(updates[1].focus, None);
    }

    #[test]
    fn switching_type_clears_focus() {
        let loader = MockLoader::new();
        let mut explorer = explorer(&loader);
        explorer.focus_district(&district("01")).unwrap();
        assert_eq!(explorer.focus(), Some("01"));

        explorer.select_district_type(DistrictType::StateSenate).unwrap();
        assert_eq!(explorer.focus(), None);
    }

    #[test]
    fn repeated_numbers_focus_the_named_state() {
        let loader = Arc::new(FixedLoader(DistrictGeometry::new(DistrictType::UsHouse, vec![
            square("10", 0.0, 0.0, 10.0).with_state(Some("06".into())),
            square("10", 50.0, 0.0, 10.0).with_state(Some("48".into())),
        ])));
        let mut explorer = DistrictExplorer::new(loader, ViewExtentPolicy::default(), DistrictType::UsHouse).unwrap();
        let before = explorer.state().clone();

        assert!(matches!(explorer.focus_district(&district("10")), Err(Error::AmbiguousDistrict { .. })));
        assert_eq!(*explorer.state(), before);

        explorer.focus_district(&district("TX-10")).unwrap();
        assert_eq!(explorer.focus(), Some("TX-10"));
        assert_eq!(explorer.extent().x_range(), (50.0, 60.0));

        explorer.focus_district(&district("06-10")).unwrap();
        assert_eq!(explorer.focus(), Some("CA-10"));
        assert_eq!(explorer.extent().x_range(), (0.0, 10.0));
    }

    #[test]
    fn unsubscribed_observers_are_not_notified() {
        let loader = MockLoader::new();
        let mut explorer = explorer(&loader);
        let count = Arc::new(AtomicUsize::new(0));
        let id = {
            let count = Arc::clone(&count);
            explorer.subscribe(move |_| { count.fetch_add(1, Ordering::SeqCst); })
        };

        explorer.select_district_type(DistrictType::StateHouse).unwrap();
        assert!(explorer.unsubscribe(id));
        explorer.select_district_type(DistrictType::StateSenate).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
