use crate::document::BacklinkEntry;

/// Move a selection index by `delta`, clamped to `0..count`.
///
/// With an empty list the index stays at 0.
pub fn move_selection(index: usize, delta: isize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let last = count - 1;
    let moved = if delta.is_negative() {
        index.saturating_sub(delta.unsigned_abs())
    } else {
        index.saturating_add(delta as usize)
    };
    moved.min(last)
}

/// The entry at `index`, if any.
pub fn activate(entries: &[BacklinkEntry], index: usize) -> Option<&BacklinkEntry> {
    entries.get(index)
}

/// A resolved backlink list with an explicit selection cursor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BacklinkList {
    entries: Vec<BacklinkEntry>,
    selected: usize,
}

impl BacklinkList {
    /// New list with the first entry selected.
    pub fn new(entries: Vec<BacklinkEntry>) -> Self {
        Self {
            entries,
            selected: 0,
        }
    }

    pub fn entries(&self) -> &[BacklinkEntry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn select_next(&mut self) -> usize {
        self.selected = move_selection(self.selected, 1, self.entries.len());
        self.selected
    }

    pub fn select_previous(&mut self) -> usize {
        self.selected = move_selection(self.selected, -1, self.entries.len());
        self.selected
    }

    /// Select `index` directly; out-of-range indices clamp to the last entry.
    pub fn select(&mut self, index: usize) -> usize {
        self.selected = index.min(self.entries.len().saturating_sub(1));
        self.selected
    }

    /// The currently selected entry.
    pub fn activate(&self) -> Option<&BacklinkEntry> {
        activate(&self.entries, self.selected)
    }

    /// `basename -> header` labels in list order.
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(BacklinkEntry::label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn entries(names: &[&str]) -> Vec<BacklinkEntry> {
        names
            .iter()
            .map(|n| BacklinkEntry {
                source: Document::from_path(&format!("{n}.md")),
                header: None,
            })
            .collect()
    }

    #[test]
    fn move_selection_clamps_both_ends() {
        assert_eq!(move_selection(0, -1, 3), 0);
        assert_eq!(move_selection(2, 1, 3), 2);
        assert_eq!(move_selection(1, 1, 3), 2);
        assert_eq!(move_selection(1, -1, 3), 0);
        assert_eq!(move_selection(0, 10, 3), 2);
    }

    #[test]
    fn move_selection_on_empty_list() {
        assert_eq!(move_selection(0, 1, 0), 0);
        assert_eq!(move_selection(5, -1, 0), 0);
    }

    #[test]
    fn activate_out_of_range_is_none() {
        let list = entries(&["A", "B"]);
        assert_eq!(activate(&list, 1).unwrap().source.basename, "B");
        assert!(activate(&list, 2).is_none());
        assert!(activate(&[], 0).is_none());
    }

    #[test]
    fn list_walks_with_arrow_semantics() {
        let mut list = BacklinkList::new(entries(&["A", "B", "C"]));
        assert_eq!(list.selected(), 0);
        assert_eq!(list.select_next(), 1);
        assert_eq!(list.select_next(), 2);
        assert_eq!(list.select_next(), 2);
        assert_eq!(list.select_previous(), 1);
        assert_eq!(list.activate().unwrap().source.basename, "B");
    }

    #[test]
    fn select_clamps_to_last_entry() {
        let mut list = BacklinkList::new(entries(&["A", "B"]));
        assert_eq!(list.select(7), 1);
    }

    #[test]
    fn labels_follow_entries() {
        let mut items = entries(&["A"]);
        items[0].header = Some("Intro".into());
        let list = BacklinkList::new(items);
        assert_eq!(list.labels(), vec!["A -> Intro"]);
    }
}
