//! Arcs from the selected country to the home countries linked to it

use dv_core::CountryId;
use dv_data::Record;
use geo_types::Coord;

use super::RebuildView;
use crate::aggregate::{linkage_counts, FilterScope};
use crate::DashboardContext;

#[derive(Debug, Clone, PartialEq)]
pub struct LinkArc {
    pub home: CountryId,
    pub from: Coord<f64>,
    pub to: Coord<f64>,
    /// Number of records linking the two countries
    pub weight: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkArcsScene {
    pub origin: Option<CountryId>,
    pub arcs: Vec<LinkArc>,
    pub max_weight: u32,
}

/// Rebuild-mode arc overlay for the map
#[derive(Debug, Default)]
pub struct LinkArcsView {
    scene: LinkArcsScene,
    generation: u64,
}

impl LinkArcsView {
    pub fn scene(&self) -> &LinkArcsScene {
        &self.scene
    }
}

impl<R: Record> RebuildView<R> for LinkArcsView {
    fn name(&self) -> &'static str {
        "Links"
    }

    fn rebuild(&mut self, ctx: &DashboardContext<R>) {
        self.generation += 1;
        self.scene = LinkArcsScene::default();

        let Some(origin) = ctx.selection_state().country else {
            return;
        };
        let Some(from) = ctx.geometry.centroid(origin) else {
            tracing::debug!("Selected country {} has no valid centroid, no arcs", origin);
            return;
        };

        let records = ctx.filtered(FilterScope::Both);
        let arcs: Vec<LinkArc> = linkage_counts(&records)
            .into_iter()
            .filter(|((target, home), _)| *target == origin && home != target)
            .filter_map(|((_, home), weight)| {
                ctx.geometry.centroid(home).map(|to| LinkArc { home, from, to, weight })
            })
            .collect();

        self.scene = LinkArcsScene {
            origin: Some(origin),
            max_weight: arcs.iter().map(|a| a.weight).max().unwrap_or(0),
            arcs,
        };
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures::{CA, US};
    use crate::test_support::context;
    use dv_core::SelectionTarget;

    #[test]
    fn test_no_selection_no_arcs() {
        let ctx = context();
        let mut view = LinkArcsView::default();
        view.rebuild(&ctx);
        assert!(view.scene().arcs.is_empty());
        assert_eq!(RebuildView::<dv_data::SalaryRecord>::generation(&view), 1);
    }

    #[test]
    fn test_arcs_skip_self_links() {
        let ctx = context();
        ctx.selection.select(SelectionTarget::Country(US));

        let mut view = LinkArcsView::default();
        view.rebuild(&ctx);

        let scene = view.scene();
        assert_eq!(scene.origin, Some(US));
        assert_eq!(scene.arcs.len(), 1);
        assert_eq!(scene.arcs[0].home, CA);
        assert_eq!(scene.arcs[0].from, ctx.geometry.centroid(US).unwrap());
        assert_eq!(scene.max_weight, 1);
    }
}
