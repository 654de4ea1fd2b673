use std::cmp::Ordering;

use shared::types::{Task, TaskStatus};

// ---------------------------------------------------------------------------
// Query inputs
// ---------------------------------------------------------------------------

/// Column to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Description,
    Status,
    Progress,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Status filter.  `Only` keeps exact wire-string matches, so a legacy
/// status observed in the data (e.g. `"In Progress"`) can be selected
/// verbatim the way the admin dropdown offers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(TaskStatus),
}

/// One complete set of view inputs.
#[derive(Debug, Clone)]
pub struct TaskQuery {
    pub search: String,
    pub status: StatusFilter,
    pub sort_field: SortField,
    pub direction: SortDirection,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl TaskQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            sort_field: SortField::Title,
            direction: SortDirection::Ascending,
            page: 1,
            page_size,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived view
// ---------------------------------------------------------------------------

/// A filtered/sorted/paginated projection of the base list.  Never stored —
/// recomputed from the full base list on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskView {
    pub items: Vec<Task>,
    pub total_pages: usize,
    pub current_page: usize,
    /// Matching rows before pagination, for "Showing x of y" footers.
    pub total_matching: usize,
}

/// Compute the derived view.
///
/// Pure function; identical inputs yield identical output.  Order of
/// operations: (1) status filter, (2) case-insensitive substring search
/// over title OR description, (3) stable sort, (4) 1-based page slice.
/// The requested page is clamped into `1..=total_pages`.
pub fn apply_view(tasks: &[Task], query: &TaskQuery) -> TaskView {
    let needle = query.search.to_lowercase();

    let mut matching: Vec<&Task> = tasks
        .iter()
        .filter(|task| match &query.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => task.status == *status,
        })
        .filter(|task| {
            needle.is_empty()
                || task.title.to_lowercase().contains(&needle)
                || task.description.to_lowercase().contains(&needle)
        })
        .collect();

    // sort_by is stable: equal keys keep their base-list order, in both
    // directions (reversing an Equal is still Equal).
    matching.sort_by(|a, b| {
        let ordering = compare(a, b, query.sort_field);
        match query.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    let total_matching = matching.len();
    let page_size = query.page_size.max(1);
    let total_pages = total_matching.div_ceil(page_size);
    let current_page = query.page.clamp(1, total_pages.max(1));
    let start = (current_page - 1) * page_size;

    TaskView {
        items: matching
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect(),
        total_pages,
        current_page,
        total_matching,
    }
}

/// Field comparator.  `Progress` compares numerically; every string field
/// compares lexicographically, with absent timestamps sorting first.
fn compare(a: &Task, b: &Task, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Title => a.title.cmp(&b.title),
        SortField::Description => a.description.cmp(&b.description),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        SortField::Progress => a.progress.cmp(&b.progress),
        SortField::CreatedAt => a
            .created_at
            .as_deref()
            .unwrap_or("")
            .cmp(b.created_at.as_deref().unwrap_or("")),
    }
}

// ---------------------------------------------------------------------------
// Live query state
// ---------------------------------------------------------------------------

/// Live filter/sort/page state behind a task table.
///
/// Every change to a filter or sort criterion snaps the page back to 1;
/// only explicit page navigation keeps the other inputs untouched.
#[derive(Debug, Clone)]
pub struct QueryState {
    query: TaskQuery,
}

impl QueryState {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: TaskQuery::new(page_size),
        }
    }

    pub fn query(&self) -> &TaskQuery {
        &self.query
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.query.search = term.into();
        self.query.page = 1;
    }

    pub fn set_status(&mut self, filter: StatusFilter) {
        self.query.status = filter;
        self.query.page = 1;
    }

    /// Column-header click semantics: selecting the active column toggles
    /// the direction, a new column starts ascending.
    pub fn sort_by(&mut self, field: SortField) {
        if self.query.sort_field == field {
            self.query.direction = match self.query.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.query.sort_field = field;
            self.query.direction = SortDirection::Ascending;
        }
        self.query.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.page = page.max(1);
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.query.page = (self.query.page + 1).min(total_pages.max(1));
    }

    pub fn previous_page(&mut self) {
        self.query.page = self.query.page.saturating_sub(1).max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str, status: TaskStatus, progress: u8) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("{title} description"),
            status,
            progress,
            task_image: None,
            username: None,
            created_at: None,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("1", "Write report", TaskStatus::Pending, 10),
            task("2", "Review PR", TaskStatus::InProgress, 40),
            task("3", "Deploy", TaskStatus::Completed, 100),
            task("4", "write tests", TaskStatus::Pending, 5),
        ]
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let mut query = TaskQuery::new(10);
        query.search = "WRITE".to_string();
        let view = apply_view(&sample(), &query);
        assert_eq!(view.total_matching, 2);

        // Matches description only.
        query.search = "review pr desc".to_string();
        let view = apply_view(&sample(), &query);
        assert_eq!(view.total_matching, 1);
        assert_eq!(view.items[0].id, "2");
    }

    #[test]
    fn status_filter_applies_before_search() {
        let mut query = TaskQuery::new(10);
        query.status = StatusFilter::Only(TaskStatus::Pending);
        query.search = "write".to_string();
        let view = apply_view(&sample(), &query);
        assert_eq!(view.total_matching, 2);
    }

    #[test]
    fn progress_sorts_numerically_not_lexicographically() {
        let tasks = vec![
            task("a", "A", TaskStatus::Pending, 9),
            task("b", "B", TaskStatus::Pending, 100),
            task("c", "C", TaskStatus::Pending, 10),
        ];
        let mut query = TaskQuery::new(10);
        query.sort_field = SortField::Progress;
        let view = apply_view(&tasks, &query);
        let order: Vec<&str> = view.items.iter().map(|t| t.id.as_str()).collect();
        // Lexicographic ordering of "9"/"10"/"100" would put "a" last.
        assert_eq!(order, ["a", "c", "b"]);
    }

    #[test]
    fn out_of_range_pages_clamp() {
        let query = TaskQuery {
            page: 99,
            page_size: 3,
            ..TaskQuery::new(3)
        };
        let view = apply_view(&sample(), &query);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.current_page, 2);
        assert_eq!(view.items.len(), 1);
    }

    #[test]
    fn empty_base_list_yields_an_empty_first_page() {
        let view = apply_view(&[], &TaskQuery::new(5));
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.current_page, 1);
        assert!(view.items.is_empty());
    }

    #[test]
    fn criteria_changes_reset_the_page() {
        let mut state = QueryState::new(5);
        state.set_page(3);
        state.set_search("x");
        assert_eq!(state.query().page, 1);

        state.set_page(3);
        state.set_status(StatusFilter::Only(TaskStatus::Completed));
        assert_eq!(state.query().page, 1);

        state.set_page(3);
        state.sort_by(SortField::Progress);
        assert_eq!(state.query().page, 1);
    }

    #[test]
    fn sort_by_toggles_direction_on_the_active_column() {
        let mut state = QueryState::new(5);
        state.sort_by(SortField::Status);
        assert_eq!(state.query().direction, SortDirection::Ascending);
        state.sort_by(SortField::Status);
        assert_eq!(state.query().direction, SortDirection::Descending);
        state.sort_by(SortField::Title);
        assert_eq!(state.query().direction, SortDirection::Ascending);
    }

    #[test]
    fn page_navigation_clamps_at_both_ends() {
        let mut state = QueryState::new(5);
        state.previous_page();
        assert_eq!(state.query().page, 1);
        state.next_page(3);
        state.next_page(3);
        state.next_page(3);
        assert_eq!(state.query().page, 3);
    }
}
