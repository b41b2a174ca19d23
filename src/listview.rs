use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::error::PortalError;
use crate::records::Attachment;
use crate::store::RecordStore;

/// Category filter sentinel that matches every record.
pub const ALL_CATEGORIES: &str = "all";

/// Capabilities a record type needs to be listed, filtered, sorted and edited
/// by a [`ListViewController`].
pub trait ListRecord: Clone {
    const KIND: &'static str;
    /// When false the view keeps insertion order.
    const DATE_SORTED: bool;

    type Draft;
    type Patch;

    fn id(&self) -> &str;
    fn category(&self) -> &str;
    /// Text fields the search query is matched against.
    fn search_fields(&self) -> Vec<&str>;
    fn date(&self) -> Option<&str> {
        None
    }

    fn from_draft(id: String, draft: Self::Draft) -> Result<Self, PortalError>;
    fn apply_patch(&mut self, patch: Self::Patch) -> Result<(), PortalError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Blank or "all" (any case) selects everything.
    pub fn parse(raw: &str) -> Self {
        let t = raw.trim();
        if t.is_empty() || t.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Self::All
        } else {
            Self::Only(t.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => c == category,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Only(c) => c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "ascending")]
    Asc,
    #[serde(alias = "descending")]
    Desc,
}

/// Create-form state of a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FormState {
    #[default]
    Closed,
    Open { attachments: Vec<Attachment> },
}

impl FormState {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn attachments(&self) -> &[Attachment] {
        match self {
            Self::Closed => &[],
            Self::Open { attachments } => attachments,
        }
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses the ISO-like timestamps used by record dates. Date-only values are
/// anchored at midnight; RFC 3339 offsets are folded to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let t = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Undated records sort after dated ones in either direction.
fn compare_dates(
    a: Option<NaiveDateTime>,
    b: Option<NaiveDateTime>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.cmp(&b),
            SortDirection::Desc => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Owns one page's records plus its filter, search, sort and form state.
#[derive(Debug, Clone)]
pub struct ListViewController<R: ListRecord> {
    records: Vec<R>,
    category: CategoryFilter,
    search: String,
    direction: SortDirection,
    form: FormState,
}

impl<R: ListRecord> ListViewController<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records,
            category: CategoryFilter::All,
            search: String::new(),
            direction: SortDirection::Desc,
            form: FormState::Closed,
        }
    }

    /// Seeds a fresh controller from the store.
    pub fn mount<S: RecordStore<R> + ?Sized>(store: &S) -> Result<Self, PortalError> {
        let records = store.list()?;
        tracing::debug!(kind = R::KIND, count = records.len(), "view mounted");
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn category_filter(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.category = filter;
    }

    pub fn search_query(&self) -> &str {
        &self.search
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.direction
    }

    pub fn set_sort_direction(&mut self, direction: SortDirection) {
        self.direction = direction;
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// The filtered, ordered records to display. Recomputed on every call.
    pub fn derive_view(&self) -> Vec<&R> {
        let needle = self.search.to_lowercase();
        let mut view: Vec<&R> = self
            .records
            .iter()
            .filter(|r| self.category.matches(r.category()))
            .filter(|r| {
                needle.is_empty()
                    || r
                        .search_fields()
                        .iter()
                        .any(|f| f.to_lowercase().contains(&needle))
            })
            .collect();

        if R::DATE_SORTED {
            // sort_by is stable, so equal dates keep insertion order.
            let direction = self.direction;
            view.sort_by(|a, b| {
                compare_dates(
                    a.date().and_then(parse_timestamp),
                    b.date().and_then(parse_timestamp),
                    direction,
                )
            });
        }
        view
    }

    pub fn open_form(&mut self) {
        if !self.form.is_open() {
            self.form = FormState::Open {
                attachments: Vec::new(),
            };
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = FormState::Closed;
    }

    /// Selects a file in the open form. Re-selecting a name replaces it.
    pub fn attach(&mut self, attachment: Attachment) -> Result<(), PortalError> {
        attachment.validate()?;
        let FormState::Open { attachments } = &mut self.form else {
            return Err(PortalError::validation("form", "create form is not open"));
        };
        match attachments.iter_mut().find(|a| a.name == attachment.name) {
            Some(existing) => *existing = attachment,
            None => attachments.push(attachment),
        }
        Ok(())
    }

    pub fn detach(&mut self, name: &str) -> bool {
        let FormState::Open { attachments } = &mut self.form else {
            return false;
        };
        let before = attachments.len();
        attachments.retain(|a| a.name != name);
        attachments.len() != before
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.records.iter().any(|r| r.id() == id) {
                return id;
            }
        }
    }

    /// Validates the draft, stores the new record and closes the form. The
    /// form is left untouched when anything fails.
    pub fn create<S: RecordStore<R> + ?Sized>(
        &mut self,
        store: &mut S,
        draft: R::Draft,
    ) -> Result<R, PortalError> {
        let record = R::from_draft(self.fresh_id(), draft)?;
        let stored = store.create(record)?;
        self.records.push(stored.clone());
        self.form = FormState::Closed;
        tracing::info!(kind = R::KIND, id = stored.id(), "record created");
        Ok(stored)
    }

    pub fn update<S: RecordStore<R> + ?Sized>(
        &mut self,
        store: &mut S,
        id: &str,
        patch: R::Patch,
    ) -> Result<R, PortalError> {
        let updated = store.update(id, patch)?;
        if let Some(slot) = self.records.iter_mut().find(|r| r.id() == id) {
            *slot = updated.clone();
        }
        tracing::info!(kind = R::KIND, id, "record updated");
        Ok(updated)
    }

    /// Removes the record from the store and the view. An id that is not
    /// present is a no-op and yields `None`.
    pub fn delete<S: RecordStore<R> + ?Sized>(
        &mut self,
        store: &mut S,
        id: &str,
    ) -> Result<Option<R>, PortalError> {
        match store.delete(id) {
            Ok(()) | Err(PortalError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }
        let removed = self.remove_local(id);
        if removed.is_some() {
            tracing::info!(kind = R::KIND, id, "record deleted");
        }
        Ok(removed)
    }

    /// Drops the record from this view only.
    pub fn remove_local(&mut self, id: &str) -> Option<R> {
        let pos = self.records.iter().position(|r| r.id() == id)?;
        Some(self.records.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        title: String,
        category: String,
        date: String,
    }

    struct ItemDraft {
        title: String,
        category: String,
    }

    impl ListRecord for Item {
        const KIND: &'static str = "item";
        const DATE_SORTED: bool = true;

        type Draft = ItemDraft;
        type Patch = String;

        fn id(&self) -> &str {
            &self.id
        }

        fn category(&self) -> &str {
            &self.category
        }

        fn search_fields(&self) -> Vec<&str> {
            vec![self.title.as_str()]
        }

        fn date(&self) -> Option<&str> {
            Some(&self.date)
        }

        fn from_draft(id: String, draft: ItemDraft) -> Result<Self, PortalError> {
            crate::error::require_text("title", &draft.title)?;
            Ok(Self {
                id,
                title: draft.title,
                category: draft.category,
                date: "2024-06-01".into(),
            })
        }

        fn apply_patch(&mut self, patch: String) -> Result<(), PortalError> {
            self.title = patch;
            Ok(())
        }
    }

    #[derive(Default)]
    struct VecStore {
        items: Vec<Item>,
        offline: bool,
    }

    impl RecordStore<Item> for VecStore {
        fn list(&self) -> Result<Vec<Item>, PortalError> {
            Ok(self.items.clone())
        }

        fn create(&mut self, record: Item) -> Result<Item, PortalError> {
            if self.offline {
                return Err(PortalError::Transport("offline".into()));
            }
            self.items.push(record.clone());
            Ok(record)
        }

        fn update(&mut self, id: &str, patch: String) -> Result<Item, PortalError> {
            let item = self
                .items
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or_else(|| PortalError::not_found("item", id))?;
            item.apply_patch(patch)?;
            Ok(item.clone())
        }

        fn delete(&mut self, id: &str) -> Result<(), PortalError> {
            if self.offline {
                return Err(PortalError::Transport("offline".into()));
            }
            let before = self.items.len();
            self.items.retain(|i| i.id != id);
            if self.items.len() == before {
                return Err(PortalError::not_found("item", id));
            }
            Ok(())
        }
    }

    fn item(id: &str, title: &str, category: &str, date: &str) -> Item {
        Item {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            date: date.into(),
        }
    }

    fn ids(view: &[&Item]) -> Vec<String> {
        view.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn sorts_by_date_in_both_directions() {
        let mut c = ListViewController::new(vec![
            item("1", "a", "x", "2024-01-01"),
            item("2", "b", "x", "2024-03-01"),
        ]);
        assert_eq!(c.sort_direction(), SortDirection::Desc);
        assert_eq!(ids(&c.derive_view()), vec!["2", "1"]);
        c.set_sort_direction(SortDirection::Asc);
        assert_eq!(ids(&c.derive_view()), vec!["1", "2"]);
    }

    #[test]
    fn equal_dates_keep_insertion_order() {
        let mut c = ListViewController::new(vec![
            item("a", "", "x", "2024-02-01"),
            item("b", "", "x", "2024-01-01"),
            item("c", "", "x", "2024-02-01"),
            item("d", "", "x", "2024-02-01T00:00:00"),
        ]);
        assert_eq!(ids(&c.derive_view()), vec!["a", "c", "d", "b"]);
        c.set_sort_direction(SortDirection::Asc);
        assert_eq!(ids(&c.derive_view()), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn undated_records_sort_last() {
        let mut c = ListViewController::new(vec![
            item("u", "", "x", "someday"),
            item("1", "", "x", "2024-01-01"),
            item("2", "", "x", "2024-03-01"),
        ]);
        assert_eq!(ids(&c.derive_view()), vec!["2", "1", "u"]);
        c.set_sort_direction(SortDirection::Asc);
        assert_eq!(ids(&c.derive_view()), vec!["1", "2", "u"]);
    }

    #[test]
    fn filter_is_category_and_case_insensitive_search() {
        let mut c = ListViewController::new(vec![
            item("1", "Week 1 Notes", "Lecture Notes", "2024-01-01"),
            item("2", "Essay brief", "Assignments", "2024-01-02"),
            item("3", "Lab NOTES", "Assignments", "2024-01-03"),
        ]);
        c.set_category_filter(CategoryFilter::parse("Assignments"));
        assert_eq!(ids(&c.derive_view()), vec!["3", "2"]);

        c.set_search_query("notes");
        assert_eq!(ids(&c.derive_view()), vec!["3"]);

        c.set_category_filter(CategoryFilter::parse("ALL"));
        assert_eq!(ids(&c.derive_view()), vec!["3", "1"]);

        c.set_search_query("");
        assert_eq!(c.derive_view().len(), 3);
    }

    #[test]
    fn search_whitespace_is_part_of_the_query() {
        let mut c = ListViewController::new(vec![
            item("1", "Week 1 Notes", "x", "2024-01-01"),
            item("2", "Week 10 Notes", "x", "2024-01-02"),
            item("3", "Syllabus", "x", "2024-01-03"),
        ]);
        c.set_search_query("Week 1 ");
        assert_eq!(ids(&c.derive_view()), vec!["1"]);

        c.set_search_query(" ");
        assert_eq!(ids(&c.derive_view()), vec!["2", "1"]);
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let mut store = VecStore {
            items: vec![item("1", "a", "x", "2024-01-01")],
            ..Default::default()
        };
        let mut c = ListViewController::mount(&store).expect("mount");
        let removed = c.delete(&mut store, "nope").expect("no error");
        assert!(removed.is_none());
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut store = VecStore {
            items: vec![
                item("1", "a", "x", "2024-01-01"),
                item("2", "b", "x", "2024-01-02"),
            ],
            ..Default::default()
        };
        let mut c = ListViewController::mount(&store).expect("mount");
        let removed = c.delete(&mut store, "1").expect("delete");
        assert_eq!(removed.map(|r| r.id), Some("1".to_string()));
        assert_eq!(ids(&c.derive_view()), vec!["2"]);
        assert_eq!(store.items.len(), 1);
    }

    #[test]
    fn failed_delete_keeps_collection() {
        let mut store = VecStore {
            items: vec![item("1", "a", "x", "2024-01-01")],
            offline: true,
        };
        let mut c = ListViewController::mount(&store).expect("mount");
        let e = c.delete(&mut store, "1").unwrap_err();
        assert!(matches!(e, PortalError::Transport(_)));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn create_assigns_unique_ids_and_closes_form() {
        let mut store = VecStore::default();
        let mut c = ListViewController::mount(&store).expect("mount");
        c.open_form();
        let a = c
            .create(
                &mut store,
                ItemDraft {
                    title: "one".into(),
                    category: "x".into(),
                },
            )
            .expect("create");
        let b = c
            .create(
                &mut store,
                ItemDraft {
                    title: "two".into(),
                    category: "x".into(),
                },
            )
            .expect("create");
        assert_ne!(a.id, b.id);
        assert_eq!(c.len(), 2);
        assert_eq!(c.form(), &FormState::Closed);
    }

    #[test]
    fn invalid_or_failed_create_keeps_form_open() {
        let mut store = VecStore::default();
        let mut c = ListViewController::mount(&store).expect("mount");
        c.open_form();
        let e = c
            .create(
                &mut store,
                ItemDraft {
                    title: " ".into(),
                    category: "x".into(),
                },
            )
            .unwrap_err();
        assert!(matches!(e, PortalError::Validation { field: "title", .. }));
        assert!(c.form().is_open());

        store.offline = true;
        let e = c
            .create(
                &mut store,
                ItemDraft {
                    title: "ok".into(),
                    category: "x".into(),
                },
            )
            .unwrap_err();
        assert!(matches!(e, PortalError::Transport(_)));
        assert!(c.form().is_open());
        assert_eq!(c.len(), 0);
    }

    #[test]
    fn update_replaces_local_copy() {
        let mut store = VecStore {
            items: vec![item("1", "old", "x", "2024-01-01")],
            ..Default::default()
        };
        let mut c = ListViewController::mount(&store).expect("mount");
        c.update(&mut store, "1", "new".into()).expect("update");
        assert_eq!(c.records()[0].title, "new");

        let e = c.update(&mut store, "2", "x".into()).unwrap_err();
        assert!(matches!(e, PortalError::NotFound { .. }));
    }

    #[test]
    fn attachments_need_open_form() {
        let mut c: ListViewController<Item> = ListViewController::new(vec![]);
        let file = Attachment {
            name: "slides.pdf".into(),
            size_bytes: 1024,
            mime_type: None,
        };
        assert!(c.attach(file.clone()).is_err());

        c.open_form();
        c.attach(file.clone()).expect("attach");
        c.attach(Attachment {
            size_bytes: 2048,
            ..file
        })
        .expect("reattach");
        assert_eq!(c.form().attachments().len(), 1);
        assert_eq!(c.form().attachments()[0].size_bytes, 2048);

        assert!(c.detach("slides.pdf"));
        assert!(!c.detach("slides.pdf"));
        c.cancel_form();
        assert!(!c.form().is_open());
    }

    #[test]
    fn parses_iso_like_timestamps() {
        assert!(parse_timestamp("2024-01-01").is_some());
        assert!(parse_timestamp("2024-01-01T09:30").is_some());
        assert!(parse_timestamp("2024-01-01T09:30:00Z").is_some());
        assert!(parse_timestamp("2024-01-01 09:30:00").is_some());
        assert!(parse_timestamp("Jan 1").is_none());
    }
}
