//! Most frequent categories

use dv_data::Record;

use super::RebuildView;
use crate::aggregate::{top_categories, CategoryCount, FilterScope};
use crate::DashboardContext;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBarScene {
    pub bars: Vec<CategoryCount>,
}

#[derive(Debug, Default)]
pub struct CategoryBarView {
    scene: CategoryBarScene,
    generation: u64,
}

impl CategoryBarView {
    pub fn scene(&self) -> &CategoryBarScene {
        &self.scene
    }
}

impl<R: Record> RebuildView<R> for CategoryBarView {
    fn name(&self) -> &'static str {
        "Categories"
    }

    fn rebuild(&mut self, ctx: &DashboardContext<R>) {
        self.generation += 1;
        let records = ctx.filtered(FilterScope::Both);
        self.scene = CategoryBarScene {
            bars: top_categories(&records, ctx.settings.bar_chart_top_k),
        };
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}
