use crate::listing::{visible_indices, SortKey};
use crate::models::BoatRecord;

/// View state for the record list: the live search term, the sort key, and
/// which of the visible records is highlighted. The records themselves stay
/// in the book; `visible` holds indexes into it and is rebuilt after every
/// change.
pub(crate) struct RecordListScreen {
    pub(crate) search: String,
    pub(crate) sort: SortKey,
    pub(crate) visible: Vec<usize>,
    pub(crate) selected: usize,
}

impl RecordListScreen {
    pub(crate) fn new(sort: SortKey, boats: &[BoatRecord]) -> Self {
        let mut screen = Self {
            search: String::new(),
            sort,
            visible: Vec::new(),
            selected: 0,
        };
        screen.refresh(boats, None);
        screen
    }

    /// Recompute the visible rows. When `focus_id` is visible it becomes the
    /// selection; otherwise the selection is clamped.
    pub(crate) fn refresh(&mut self, boats: &[BoatRecord], focus_id: Option<&str>) {
        self.visible = visible_indices(boats, &self.search, self.sort);

        if let Some(id) = focus_id {
            if let Some(pos) = self.visible.iter().position(|idx| boats[*idx].id == id) {
                self.selected = pos;
                return;
            }
        }
        self.ensure_in_bounds();
    }

    pub(crate) fn set_search(&mut self, term: String, boats: &[BoatRecord]) {
        let focus = self.current_boat(boats).map(|boat| boat.id.clone());
        self.search = term;
        self.refresh(boats, focus.as_deref());
    }

    pub(crate) fn cycle_sort(&mut self, boats: &[BoatRecord]) -> SortKey {
        let focus = self.current_boat(boats).map(|boat| boat.id.clone());
        self.sort = self.sort.next();
        self.refresh(boats, focus.as_deref());
        self.sort
    }

    pub(crate) fn current_boat<'a>(&self, boats: &'a [BoatRecord]) -> Option<&'a BoatRecord> {
        self.visible
            .get(self.selected)
            .and_then(|idx| boats.get(*idx))
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.visible.is_empty() {
            return;
        }
        let len = self.visible.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
    }

    pub(crate) fn has_search(&self) -> bool {
        !self.search.is_empty()
    }

    fn ensure_in_bounds(&mut self) {
        if self.visible.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.visible.len() {
            self.selected = self.visible.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoatField;
    use pretty_assertions::assert_eq;

    fn boats() -> Vec<BoatRecord> {
        let mut second = BoatRecord::seed();
        second.id = "1756700000000".to_string();
        second.details.set(BoatField::OwnerName, "Maria Santos");
        second.details.set(BoatField::BoatName, "Stella Maris");
        second.created_at = "9/1/2025".to_string();
        vec![BoatRecord::seed(), second]
    }

    #[test]
    fn refresh_keeps_focus_on_the_requested_record() {
        let boats = boats();
        let mut screen = RecordListScreen::new(SortKey::Date, &boats);
        assert_eq!(screen.visible, vec![1, 0]);

        screen.refresh(&boats, Some("1"));
        assert_eq!(screen.selected, 1);
        assert_eq!(screen.current_boat(&boats).unwrap().id, "1");
    }

    #[test]
    fn search_narrows_and_clamps_selection() {
        let boats = boats();
        let mut screen = RecordListScreen::new(SortKey::Date, &boats);
        screen.select_last();
        screen.set_search("stella".to_string(), &boats);
        assert_eq!(screen.visible, vec![1]);
        assert_eq!(screen.selected, 0);
        assert!(screen.has_search());

        screen.set_search("nobody".to_string(), &boats);
        assert!(screen.visible.is_empty());
        assert!(screen.current_boat(&boats).is_none());
    }

    #[test]
    fn cycling_sort_follows_the_selected_record() {
        let boats = boats();
        let mut screen = RecordListScreen::new(SortKey::Date, &boats);
        assert_eq!(screen.current_boat(&boats).unwrap().id, "1756700000000");

        assert_eq!(screen.cycle_sort(&boats), SortKey::Owner);
        assert_eq!(screen.visible, vec![0, 1]);
        assert_eq!(screen.current_boat(&boats).unwrap().id, "1756700000000");
    }

    #[test]
    fn whitespace_term_counts_as_an_active_search() {
        let boats = boats();
        let mut screen = RecordListScreen::new(SortKey::Date, &boats);
        screen.set_search("  ".to_string(), &boats);
        assert!(screen.has_search());
        assert!(screen.visible.is_empty());
    }

    #[test]
    fn selection_is_clamped_to_the_list() {
        let boats = boats();
        let mut screen = RecordListScreen::new(SortKey::Date, &boats);
        screen.move_selection(10);
        assert_eq!(screen.selected, 1);
        screen.move_selection(-10);
        assert_eq!(screen.selected, 0);
    }
}
