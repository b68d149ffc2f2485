//! Text output shared by the menu and the one-shot commands.

use std::io::{self, Write};

use crate::domain::{Collection, ReportEntry, SearchQuery};

/// Print every record of a collection
pub fn write_records<W: Write>(out: &mut W, collection: &Collection) -> io::Result<()> {
    if collection.is_empty() {
        return writeln!(out, "[INFO] Collection '{}' has no records", collection.name());
    }

    writeln!(out, "[INFO] Collection '{}' holds the following records:", collection.name())?;
    for record in collection.records() {
        writeln!(out, "{}", record)?;
    }
    Ok(())
}

/// Print numbered collections
pub fn write_collections<W: Write>(out: &mut W, collections: &[Collection]) -> io::Result<()> {
    if collections.is_empty() {
        return writeln!(out, "[INFO] There are no collections");
    }

    writeln!(out, "[INFO] Collections:")?;
    for (number, collection) in collections.iter().enumerate() {
        writeln!(out, "{:>5} {}", number + 1, collection)?;
    }
    Ok(())
}

/// Run a search and print its stratified report
pub fn write_search<W: Write>(out: &mut W, collection: &Collection, query: &SearchQuery) -> io::Result<()> {
    writeln!(out, "[INFO] Searching by {}:", query)?;

    let results = collection.search(query);
    for entry in results.report() {
        match entry {
            ReportEntry::Matches(category, records) => {
                writeln!(out, "{}:", category.heading())?;
                for record in records {
                    writeln!(out, "{}", record)?;
                }
            }
            ReportEntry::NoMatches(category) => writeln!(out, "{}", category.empty_notice())?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_search_report_text() {
        let mut collection = Collection::new("shelf");
        collection.add("T1", "X", 1);
        collection.add("T1", "Y", 1);

        let query = SearchQuery::new().with_title("T1").with_author("X");
        let text = render(|out| write_search(out, &collection, &query));

        assert_eq!(
            text,
            "[INFO] Searching by title 'T1', author 'X':\n\
             Title and author match:\n    1: 'T1' by X, 1: available\n\
             Title match:\n    2: 'T1' by Y, 1: available\n"
        );
    }

    #[test]
    fn test_empty_listing() {
        let text = render(|out| write_records(out, &Collection::new("attic")));
        assert_eq!(text, "[INFO] Collection 'attic' has no records\n");
    }

    #[test]
    fn test_collection_numbering() {
        let collections = vec![Collection::new("a"), Collection::new("b")];
        let text = render(|out| write_collections(out, &collections));
        assert!(text.contains("    1 Collection 'a' holding 0 records"));
        assert!(text.contains("    2 Collection 'b'"));
    }
}
