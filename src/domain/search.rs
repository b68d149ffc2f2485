//! Priority-stratified search over a collection.
//!
//! Each given criterion (title, author, year) selects the records whose
//! field matches exactly. Matches are then sorted into seven categories,
//! from "all criteria" down to "one criterion", and every record lands in
//! the highest category it qualifies for. A record that satisfies more
//! criteria is therefore never listed among looser matches.

use std::collections::BTreeSet;
use std::fmt;

use super::record::{Record, RecordId};

/// Search criteria. `None` means "do not filter on this field".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    /// `Some(0)` is a real criterion, distinct from `None`
    pub year: Option<i32>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// True when no criterion was given
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.year.is_none()
    }

    fn has(&self, field: SearchField) -> bool {
        match field {
            SearchField::Title => self.title.is_some(),
            SearchField::Author => self.author.is_some(),
            SearchField::Year => self.year.is_some(),
        }
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(title) = &self.title {
            parts.push(format!("title '{}'", title));
        }
        if let Some(author) = &self.author {
            parts.push(format!("author '{}'", author));
        }
        if let Some(year) = self.year {
            parts.push(format!("year {}", year));
        }
        if parts.is_empty() {
            write!(f, "no criteria")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// A searchable record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Year,
}

/// Match categories, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchCategory {
    Full,
    TitleAuthor,
    TitleYear,
    AuthorYear,
    TitleOnly,
    AuthorOnly,
    YearOnly,
}

impl MatchCategory {
    /// Every category in evaluation order
    pub const ALL: [MatchCategory; 7] = [
        MatchCategory::Full,
        MatchCategory::TitleAuthor,
        MatchCategory::TitleYear,
        MatchCategory::AuthorYear,
        MatchCategory::TitleOnly,
        MatchCategory::AuthorOnly,
        MatchCategory::YearOnly,
    ];

    /// Fields that must all be given for this category to apply
    pub fn fields(self) -> &'static [SearchField] {
        use SearchField::*;
        match self {
            MatchCategory::Full => &[Title, Author, Year],
            MatchCategory::TitleAuthor => &[Title, Author],
            MatchCategory::TitleYear => &[Title, Year],
            MatchCategory::AuthorYear => &[Author, Year],
            MatchCategory::TitleOnly => &[Title],
            MatchCategory::AuthorOnly => &[Author],
            MatchCategory::YearOnly => &[Year],
        }
    }

    /// Whether the query supplies every field this category needs
    pub fn applies_to(self, query: &SearchQuery) -> bool {
        self.fields().iter().all(|f| query.has(*f))
    }

    /// Heading used when reporting matches
    pub fn heading(self) -> &'static str {
        match self {
            MatchCategory::Full => "Full match",
            MatchCategory::TitleAuthor => "Title and author match",
            MatchCategory::TitleYear => "Title and year match",
            MatchCategory::AuthorYear => "Author and year match",
            MatchCategory::TitleOnly => "Title match",
            MatchCategory::AuthorOnly => "Author match",
            MatchCategory::YearOnly => "Year match",
        }
    }

    /// Notice used when the category is empty
    pub fn empty_notice(self) -> &'static str {
        match self {
            MatchCategory::Full => "No full matches",
            MatchCategory::TitleAuthor => "No title and author matches",
            MatchCategory::TitleYear => "No title and year matches",
            MatchCategory::AuthorYear => "No author and year matches",
            MatchCategory::TitleOnly => "No title matches",
            MatchCategory::AuthorOnly => "No author matches",
            MatchCategory::YearOnly => "No year matches",
        }
    }
}

/// Records placed in one category
#[derive(Debug, Clone)]
pub struct CategoryMatches<'a> {
    pub category: MatchCategory,
    pub records: Vec<&'a Record>,
}

/// One line of a search report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportEntry<'r, 'a> {
    /// A category with at least one record
    Matches(MatchCategory, &'r [&'a Record]),

    /// An empty category reported before anything was found
    NoMatches(MatchCategory),
}

/// Outcome of a search: one group per applicable category, in priority order
#[derive(Debug, Clone)]
pub struct SearchResults<'a> {
    groups: Vec<CategoryMatches<'a>>,
}

impl<'a> SearchResults<'a> {
    pub(crate) fn collect(records: &'a [Record], query: &SearchQuery) -> Self {
        let title = query
            .title
            .as_deref()
            .map(|title| ids_where(records, |r| r.title() == title));
        let author = query
            .author
            .as_deref()
            .map(|author| ids_where(records, |r| r.author() == author));
        let year = query.year.map(|year| ids_where(records, |r| r.year() == year));

        let mut placed: BTreeSet<RecordId> = BTreeSet::new();
        let mut groups = Vec::new();

        for category in MatchCategory::ALL {
            let sets: Option<Vec<&BTreeSet<RecordId>>> = category
                .fields()
                .iter()
                .map(|field| match field {
                    SearchField::Title => title.as_ref(),
                    SearchField::Author => author.as_ref(),
                    SearchField::Year => year.as_ref(),
                })
                .collect();
            let Some(sets) = sets else {
                continue;
            };

            let ids: BTreeSet<RecordId> = sets[0]
                .iter()
                .filter(|id| sets[1..].iter().all(|s| s.contains(*id)))
                .filter(|id| !placed.contains(*id))
                .copied()
                .collect();
            placed.extend(ids.iter().copied());

            groups.push(CategoryMatches {
                category,
                records: records.iter().filter(|r| ids.contains(&r.id())).collect(),
            });
        }

        Self { groups }
    }

    /// Applicable categories in priority order, including empty ones
    pub fn groups(&self) -> &[CategoryMatches<'a>] {
        &self.groups
    }

    /// Records placed in `category`, or `None` if it did not apply
    pub fn category(&self, category: MatchCategory) -> Option<&[&'a Record]> {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.records.as_slice())
    }

    /// Total number of matched records
    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// What to show the user.
    ///
    /// Empty categories produce a notice only when nothing matched at all;
    /// otherwise just the non-empty categories are reported.
    pub fn report(&self) -> Vec<ReportEntry<'_, 'a>> {
        let found = !self.is_empty();

        self.groups
            .iter()
            .filter_map(|group| {
                if !group.records.is_empty() {
                    Some(ReportEntry::Matches(group.category, &group.records))
                } else if !found {
                    Some(ReportEntry::NoMatches(group.category))
                } else {
                    None
                }
            })
            .collect()
    }
}

fn ids_where<F>(records: &[Record], predicate: F) -> BTreeSet<RecordId>
where
    F: Fn(&Record) -> bool,
{
    records
        .iter()
        .filter(|r| predicate(r))
        .map(Record::id)
        .collect()
}
