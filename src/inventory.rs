use std::collections::{BTreeMap, HashMap};

use crate::i18n::Translator;
use crate::palette::{Catalog, Paint};

/// Default stack size of placeable blocks.
pub const DEFAULT_STACK_SIZE: usize = 64;

/// Cell count per painted shade.
///
/// Never mutated on its own: the canvas updates it as cells change, so the
/// counts always describe the final grid state rather than paint events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    counts: HashMap<Paint, usize>,
    total: usize,
}

/// One display line of the block list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventoryRow {
    pub paint: Paint,
    pub name: String,
    pub count: usize,
    /// Full stacks needed.
    pub stacks: usize,
    /// Loose blocks on top of the full stacks.
    pub remainder: usize,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, paint: Paint) {
        *self.counts.entry(paint).or_insert(0) += 1;
        self.total += 1;
    }

    pub(crate) fn remove(&mut self, paint: Paint) {
        if let Some(count) = self.counts.get_mut(&paint) {
            *count -= 1;
            self.total -= 1;
            if *count == 0 {
                self.counts.remove(&paint);
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.counts.clear();
        self.total = 0;
    }

    pub fn get(&self, paint: Paint) -> usize {
        self.counts.get(&paint).copied().unwrap_or(0)
    }

    /// Sum of all counts; equals the number of painted cells.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Paint, usize)> + '_ {
        self.counts.iter().map(|(p, c)| (*p, *c))
    }

    /// Counts keyed by display name. Shades whose names coincide are merged.
    pub fn by_name(&self, catalog: &Catalog, translator: &dyn Translator) -> BTreeMap<String, usize> {
        let mut out = BTreeMap::new();
        for (paint, count) in self.iter() {
            if let Some(entry) = catalog.get(paint.entry) {
                let name = translator.shade_name(entry.representative_name(), paint.variant);
                *out.entry(name).or_insert(0) += count;
            }
        }
        out
    }

    /// Block list rows, most used first.
    pub fn rows(&self, catalog: &Catalog, translator: &dyn Translator, stack_size: usize) -> Vec<InventoryRow> {
        let stack_size = stack_size.max(1);
        let mut rows: Vec<InventoryRow> = self
            .iter()
            .filter_map(|(paint, count)| {
                let entry = catalog.get(paint.entry)?;
                Some(InventoryRow {
                    paint,
                    name: translator.shade_name(entry.representative_name(), paint.variant),
                    count,
                    stacks: count / stack_size,
                    remainder: count % stack_size,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        rows
    }
}
