//! Filtering and sorting over a snapshot of todos. Nothing here touches a store.

use crate::models::Todo;
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    /// Unknown values mean `All`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "active" => StatusFilter::Active,
            "completed" => StatusFilter::Completed,
            _ => StatusFilter::All,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Title,
    CreatedAt,
    Priority,
    DueDate,
}

impl SortField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "title" => Some(SortField::Title),
            "createdAt" | "created_at" => Some(SortField::CreatedAt),
            "priority" => Some(SortField::Priority),
            "dueDate" | "due_date" => Some(SortField::DueDate),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Only the literal "desc" selects descending.
    pub fn parse(raw: &str) -> Self {
        if raw == "desc" {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TodoQuery {
    pub status: StatusFilter,
    pub sort_by: Option<SortField>,
    pub order: SortOrder,
}

impl TodoQuery {
    pub fn from_params<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = TodoQuery::default();
        for (key, value) in pairs {
            match key {
                "status" => query.status = StatusFilter::parse(value),
                "sortBy" => query.sort_by = SortField::parse(value),
                "order" => query.order = SortOrder::parse(value),
                _ => {}
            }
        }
        query
    }
}

pub fn filter_by_status(todos: Vec<Todo>, status: StatusFilter) -> Vec<Todo> {
    match status {
        StatusFilter::All => todos,
        StatusFilter::Active => todos.into_iter().filter(|t| !t.completed).collect(),
        StatusFilter::Completed => todos.into_iter().filter(|t| t.completed).collect(),
    }
}

/// Primary key: decomposed, accents stripped, case folded.
fn base_letters(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Collator-style title order: base letters first, then accents
/// (unaccented first), then case (lowercase first).
fn compare_titles(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(&base_letters(b))
        .then_with(|| {
            let fold = |s: &str| s.nfd().flat_map(char::to_lowercase).collect::<String>();
            fold(a).cmp(&fold(b))
        })
        .then_with(|| b.cmp(a))
}

/// Stable sort. Todos without a due date go last whatever the order.
pub fn sort(mut todos: Vec<Todo>, field: SortField, order: SortOrder) -> Vec<Todo> {
    todos.sort_by(|a, b| match field {
        SortField::Title => order.apply(compare_titles(&a.title, &b.title)),
        SortField::CreatedAt => order.apply(a.created_at.cmp(&b.created_at)),
        SortField::Priority => order.apply(a.priority.weight().cmp(&b.priority.weight())),
        SortField::DueDate => match (a.due_date, b.due_date) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => order.apply(x.cmp(&y)),
        },
    });
    todos
}

/// Filter, then sort.
pub fn apply(todos: Vec<Todo>, query: &TodoQuery) -> Vec<Todo> {
    let filtered = filter_by_status(todos, query.status);
    match query.sort_by {
        Some(field) => sort(filtered, field, query.order),
        None => filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewTodo, Priority};
    use chrono::{Duration, TimeZone, Utc};

    fn todo(id: &str, title: &str) -> Todo {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        NewTodo::new(title).into_todo(id.to_string(), base)
    }

    fn ids(todos: &[Todo]) -> Vec<&str> {
        todos.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn status_filter() {
        let mut done = todo("2", "b");
        done.completed = true;
        let todos = vec![todo("1", "a"), done];

        assert_eq!(ids(&filter_by_status(todos.clone(), StatusFilter::All)), ["1", "2"]);
        assert_eq!(ids(&filter_by_status(todos.clone(), StatusFilter::Active)), ["1"]);
        assert_eq!(ids(&filter_by_status(todos, StatusFilter::Completed)), ["2"]);
    }

    #[test]
    fn priority_desc_is_stable() {
        let priorities = [Priority::Medium, Priority::High, Priority::Low, Priority::High];
        let todos: Vec<Todo> = priorities
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut t = todo(&i.to_string(), "t");
                t.priority = *p;
                t
            })
            .collect();

        let sorted = sort(todos, SortField::Priority, SortOrder::Desc);
        assert_eq!(ids(&sorted), ["1", "3", "0", "2"]);
        let got: Vec<Priority> = sorted.iter().map(|t| t.priority).collect();
        assert_eq!(got, [Priority::High, Priority::High, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn missing_due_dates_sort_last_in_both_orders() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let mut early = todo("early", "a");
        early.due_date = Some(base);
        let mut late = todo("late", "b");
        late.due_date = Some(base + Duration::days(3));
        let none_a = todo("none-a", "c");
        let none_b = todo("none-b", "d");
        let todos = vec![none_a, late, none_b, early];

        let asc = sort(todos.clone(), SortField::DueDate, SortOrder::Asc);
        assert_eq!(ids(&asc), ["early", "late", "none-a", "none-b"]);

        let desc = sort(todos, SortField::DueDate, SortOrder::Desc);
        assert_eq!(ids(&desc), ["late", "early", "none-a", "none-b"]);
    }

    #[test]
    fn title_ignores_case() {
        let todos = vec![todo("1", "banana"), todo("2", "Apple"), todo("3", "cherry")];
        assert_eq!(ids(&sort(todos.clone(), SortField::Title, SortOrder::Asc)), ["2", "1", "3"]);
        assert_eq!(ids(&sort(todos, SortField::Title, SortOrder::Desc)), ["3", "1", "2"]);
    }

    #[test]
    fn accented_titles_sort_with_their_base_letter() {
        let todos = vec![todo("z", "zebra"), todo("e", "Éclair"), todo("a", "apple")];
        assert_eq!(ids(&sort(todos, SortField::Title, SortOrder::Asc)), ["a", "e", "z"]);

        let todos = vec![todo("2", "résumé"), todo("3", "rope"), todo("1", "resume")];
        assert_eq!(ids(&sort(todos, SortField::Title, SortOrder::Asc)), ["1", "2", "3"]);
    }

    #[test]
    fn created_at_chronological() {
        let mut a = todo("a", "x");
        let mut b = todo("b", "x");
        a.created_at = a.created_at + Duration::hours(2);
        b.created_at = b.created_at + Duration::hours(1);
        assert_eq!(ids(&sort(vec![a.clone(), b.clone()], SortField::CreatedAt, SortOrder::Asc)), ["b", "a"]);
        assert_eq!(ids(&sort(vec![a, b], SortField::CreatedAt, SortOrder::Desc)), ["a", "b"]);
    }

    #[test]
    fn params_parse_leniently() {
        let q = TodoQuery::from_params([("status", "completed"), ("sortBy", "due_date"), ("order", "DESC")]);
        assert_eq!(q.status, StatusFilter::Completed);
        assert_eq!(q.sort_by, Some(SortField::DueDate));
        assert_eq!(q.order, SortOrder::Asc);

        let q = TodoQuery::from_params([("status", "bogus"), ("sortBy", "colour")]);
        assert_eq!(q, TodoQuery::default());
    }

    #[test]
    fn apply_filters_before_sorting() {
        let mut done = todo("done", "a");
        done.completed = true;
        done.priority = Priority::High;
        let todos = vec![todo("open", "b"), done];
        let query = TodoQuery {
            status: StatusFilter::Active,
            sort_by: Some(SortField::Priority),
            order: SortOrder::Desc,
        };
        assert_eq!(ids(&apply(todos, &query)), ["open"]);
    }
}
