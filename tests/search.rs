//! Search Integration Tests
//!
//! Tests for category placement, exclusivity and id allocation.

use libris::domain::{Collection, MatchCategory, Record, RecordId, ReportEntry, SearchQuery};

fn ids(records: Option<&[&Record]>) -> Vec<RecordId> {
    records.unwrap_or_default().iter().map(|r| r.id()).collect()
}

fn abc_collection() -> Collection {
    let mut collection = Collection::new("shelf");
    collection
        .load(vec![
            Record::new(1, "T1", "X", 1), // A
            Record::new(2, "T1", "Y", 1), // B
            Record::new(3, "T1", "X", 2), // C
        ])
        .unwrap();
    collection
}

#[test]
fn test_stratified_placement() {
    let collection = abc_collection();
    let query = SearchQuery::new().with_title("T1").with_author("X").with_year(1);
    let results = collection.search(&query);

    assert_eq!(ids(results.category(MatchCategory::Full)), vec![1]);
    assert_eq!(ids(results.category(MatchCategory::TitleAuthor)), vec![3]);
    assert_eq!(ids(results.category(MatchCategory::TitleYear)), vec![2]);
    assert!(ids(results.category(MatchCategory::AuthorYear)).is_empty());
    assert!(ids(results.category(MatchCategory::TitleOnly)).is_empty());
    assert!(ids(results.category(MatchCategory::AuthorOnly)).is_empty());
    assert!(ids(results.category(MatchCategory::YearOnly)).is_empty());
    assert_eq!(results.total(), 3);
}

#[test]
fn test_every_record_appears_once() {
    let mut collection = Collection::new("shelf");
    for (title, author, year) in [
        ("T1", "X", 1),
        ("T1", "X", 2),
        ("T1", "Y", 1),
        ("T2", "X", 1),
        ("T2", "Y", 2),
        ("T1", "Y", 3),
        ("T3", "X", 3),
        ("T3", "Z", 1),
    ] {
        collection.add(title, author, year);
    }

    let query = SearchQuery::new().with_title("T1").with_author("X").with_year(1);
    let results = collection.search(&query);

    let mut seen: Vec<RecordId> = results
        .groups()
        .iter()
        .flat_map(|g| g.records.iter().map(|r| r.id()))
        .collect();
    let total = seen.len();
    seen.sort_unstable();
    seen.dedup();

    assert_eq!(seen.len(), total, "a record was reported twice");
    // T2/Y/2 matches nothing
    assert!(!seen.contains(&5));
    assert_eq!(total, 7);
}

#[test]
fn test_categories_follow_priority_order() {
    let collection = abc_collection();
    let query = SearchQuery::new().with_title("T1").with_author("X").with_year(1);
    let results = collection.search(&query);

    let order: Vec<MatchCategory> = results.groups().iter().map(|g| g.category).collect();
    assert_eq!(order, MatchCategory::ALL.to_vec());
}

#[test]
fn test_two_criteria_skip_unrelated_categories() {
    let collection = abc_collection();
    let query = SearchQuery::new().with_author("X").with_year(2);
    let results = collection.search(&query);

    assert!(results.category(MatchCategory::Full).is_none());
    assert!(results.category(MatchCategory::TitleAuthor).is_none());
    assert_eq!(ids(results.category(MatchCategory::AuthorYear)), vec![3]);
    assert_eq!(ids(results.category(MatchCategory::AuthorOnly)), vec![1]);
    assert!(ids(results.category(MatchCategory::YearOnly)).is_empty());
}

#[test]
fn test_no_notices_once_anything_matched() {
    let mut collection = Collection::new("shelf");
    collection.add("T1", "X", 2);

    let query = SearchQuery::new().with_title("T1").with_author("X").with_year(1);
    let results = collection.search(&query);
    let report = results.report();

    assert!(report
        .iter()
        .all(|entry| !matches!(entry, ReportEntry::NoMatches(_))));
    assert!(matches!(
        report.as_slice(),
        [ReportEntry::Matches(MatchCategory::TitleAuthor, records)] if records.len() == 1
    ));
}

#[test]
fn test_every_notice_when_nothing_matched() {
    let collection = abc_collection();
    let query = SearchQuery::new().with_title("T9").with_year(9);
    let results = collection.search(&query);

    assert_eq!(
        results.report(),
        vec![
            ReportEntry::NoMatches(MatchCategory::TitleYear),
            ReportEntry::NoMatches(MatchCategory::TitleOnly),
            ReportEntry::NoMatches(MatchCategory::YearOnly),
        ]
    );
}

#[test]
fn test_matches_keep_collection_order() {
    let mut collection = Collection::new("shelf");
    collection
        .load(vec![
            Record::new(5, "Emma", "Jane Austen", 1815),
            Record::new(2, "Persuasion", "Jane Austen", 1817),
            Record::new(9, "Sanditon", "Jane Austen", 1817),
        ])
        .unwrap();

    let results = collection.search(&SearchQuery::new().with_author("Jane Austen"));
    assert_eq!(ids(results.category(MatchCategory::AuthorOnly)), vec![5, 2, 9]);
}

#[test]
fn test_ids_stay_unique_across_add_and_delete() {
    let mut collection = Collection::new("shelf");
    let mut expected_next = Vec::new();

    for round in 0..5 {
        for i in 0..4 {
            collection.add(format!("Book {round}-{i}"), "Author", 2000 + i);
        }
        // Drop every other record, starting with the lowest id
        let mut live: Vec<RecordId> = collection.records().iter().map(|r| r.id()).collect();
        live.sort_unstable();
        for id in live.into_iter().step_by(2) {
            collection.delete(id).unwrap();
        }
        expected_next.push(collection.next_id());

        let mut ids: Vec<RecordId> = collection.records().iter().map(|r| r.id()).collect();
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);
        assert!(!ids.contains(&0));
    }

    // The lowest id is always freed, so it is always the next one handed out
    assert!(expected_next.iter().all(|id| *id == 1));
}

#[test]
fn test_reuse_after_deleting_smallest() {
    let mut collection = Collection::new("shelf");
    collection.add("A", "X", 1);
    collection.add("B", "X", 2);
    collection.add("C", "X", 3);

    collection.delete(1).unwrap();
    assert_eq!(collection.add("D", "X", 4).id(), 1);
    assert_eq!(collection.add("E", "X", 5).id(), 4);
}
