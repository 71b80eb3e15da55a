use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{
    common::PendingWrite,
    config::DistrictStyle,
    error::Result,
    explorer::ViewUpdate,
    view::{CompositeView, DistrictLayer},
};

/// Redraws the composite view into an SVG file whenever the explorer publishes.
#[derive(Debug, Clone)]
pub struct ViewRenderer {
    view: CompositeView,
    style: DistrictStyle,
    output: PathBuf,
    width: u32,
    height: u32,
}

impl ViewRenderer {
    /// `view` holds the static layers; the district layer comes from each update.
    pub fn new(view: CompositeView, style: DistrictStyle, output: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self { view, style, output: output.into(), width, height }
    }

    #[inline] pub fn output(&self) -> &Path { &self.output }

    /// The full view for `update`, with its districts on top.
    pub fn compose(&self, update: &ViewUpdate) -> CompositeView {
        self.view.with_districts(DistrictLayer::new(
            update.geometry.clone(),
            update.focus.clone(),
            self.style.clone(),
        ))
    }

    /// Write the SVG for `update`, replacing the output file atomically.
    pub fn render(&self, update: &ViewUpdate) -> Result<()> {
        let file = PendingWrite::open(&self.output)?;
        let file = self.compose(update).render_svg(file, &update.extent, self.width, self.height)?;
        file.finalize()?;
        info!(
            path = %self.output.display(),
            district_type = %update.district_type,
            focus = update.focus.as_deref().unwrap_or("-"),
            "view rendered"
        );
        Ok(())
    }

    /// Callback for `DistrictExplorer::subscribe`. Failures are logged; the previous file stays.
    pub fn into_subscriber(self) -> impl FnMut(&ViewUpdate) + Send + 'static {
        move |update| {
            if let Err(e) = self.render(update) {
                warn!(path = %self.output.display(), error = %e, "failed to render view");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use geo::LineString;

    use super::*;
    use crate::{
        census::ColorKey,
        district::{DistrictGeometry, DistrictShape, DistrictType},
        geom::Extent,
        view::{Layer, LegendOverlay},
    };

    fn update(focus: Option<&str>) -> ViewUpdate {
        let geometry = DistrictGeometry::new(DistrictType::StateSenate, vec![
            DistrictShape::new(Some("14".into()), vec![LineString::from(vec![(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (0.0, 0.0)])]),
        ]);
        ViewUpdate {
            district_type: DistrictType::StateSenate,
            geometry: Arc::new(geometry),
            extent: Extent::new((0.0, 4.0), (0.0, 4.0)).unwrap(),
            focus: focus.map(str::to_string),
        }
    }

    #[test]
    fn subscriber_rewrites_output_on_every_update() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out/view.svg");
        let view = CompositeView::compose([Layer::Legend(LegendOverlay::new(Arc::new(ColorKey::default())))]).unwrap();
        let mut subscriber = ViewRenderer::new(view, DistrictStyle::default(), &output, 200, 200).into_subscriber();

        subscriber(&update(None));
        let first = fs::read_to_string(&output).unwrap();
        assert!(first.contains(r#"data-type="state_senate""#));
        assert!(first.contains(r#"class="dist" data-district="14""#));

        subscriber(&update(Some("14")));
        let second = fs::read_to_string(&output).unwrap();
        assert!(second.contains(r#"class="focus" data-district="14""#));
        assert!(!second.contains(r#"class="dist""#));

        // No temp files left behind
        assert_eq!(fs::read_dir(output.parent().unwrap()).unwrap().count(), 1);
    }
}
