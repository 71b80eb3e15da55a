use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread,
};

use tracing::{debug, warn};

use crate::{
    district::{DistrictGeometryLoader, DistrictType},
    error::{Error, Result},
    explorer::{DistrictExplorer, StagedTransition},
    geom::ViewExtentPolicy,
};

struct Completed {
    generation: u64,
    district_type: DistrictType,
    result: Result<StagedTransition>,
}

/// Runs district loads on worker threads so the event loop stays responsive.
///
/// Only the most recent request is ever applied: a result whose request has been
/// superseded is dropped when it arrives, even if it finished first.
pub struct BackgroundLoads {
    loader: Arc<dyn DistrictGeometryLoader>,
    policy: ViewExtentPolicy,
    latest: Arc<AtomicU64>,
    pending: bool,
    tx: Sender<Completed>,
    rx: Receiver<Completed>,
}

impl BackgroundLoads {
    pub fn new(explorer: &DistrictExplorer) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            loader: Arc::clone(explorer.loader()),
            policy: explorer.policy().clone(),
            latest: Arc::new(AtomicU64::new(0)),
            pending: false,
            tx,
            rx,
        }
    }

    /// True while the newest request has not been applied yet.
    #[inline] pub fn is_pending(&self) -> bool { self.pending }

    /// Start loading `district_type`, superseding any request still in flight.
    /// Returns the request's generation number.
    pub fn request(&mut self, explorer: &DistrictExplorer, district_type: DistrictType) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.pending = true;

        let loader = Arc::clone(&self.loader);
        let policy = self.policy.clone();
        let cached = explorer.cached(district_type);
        let latest = Arc::clone(&self.latest);
        let tx = self.tx.clone();

        debug!(%district_type, generation, "background load requested");
        thread::spawn(move || {
            // Skip the work entirely if a newer request arrived before we started.
            if latest.load(Ordering::SeqCst) != generation {
                return;
            }
            let result = StagedTransition::prepare(loader.as_ref(), &policy, district_type, cached);
            // The receiver may be gone if the session ended; nothing to report then.
            let _ = tx.send(Completed { generation, district_type, result });
        });
        generation
    }

    /// Apply the newest completed request, if it has arrived. Stale results are discarded.
    ///
    /// Returns `Ok(true)` if the explorer changed.
    pub fn apply_ready(&mut self, explorer: &mut DistrictExplorer) -> Result<bool> {
        let mut changed = false;
        while let Ok(completed) = self.rx.try_recv() {
            changed |= self.apply(explorer, completed)?;
        }
        Ok(changed)
    }

    /// Block until the newest request completes, then apply it.
    pub fn wait(&mut self, explorer: &mut DistrictExplorer) -> Result<bool> {
        let mut changed = false;
        while self.pending {
            let completed = self.rx.recv()
                .map_err(|_| Error::Io(std::io::Error::other("background loader disconnected")))?;
            changed |= self.apply(explorer, completed)?;
        }
        Ok(changed)
    }

    fn apply(&mut self, explorer: &mut DistrictExplorer, completed: Completed) -> Result<bool> {
        let Completed { generation, district_type, result } = completed;
        if generation != self.latest.load(Ordering::SeqCst) {
            debug!(%district_type, generation, "discarding superseded load");
            return Ok(false);
        }
        self.pending = false;
        match result {
            Ok(staged) => Ok(explorer.commit(staged)),
            Err(e) => {
                warn!(%district_type, error = %e, "background load failed; keeping current view");
                Err(e)
            }
        }
    }
}
