//! StoryGraph export to Goodreads import.

use crate::mapping::{
    check_date_format, ColumnMapping, IsbnKind, RowRule, SchemaMapping, StatusVocabulary,
    ValueTranslation,
};
use crate::utils::{ConvertConfig, Result};

pub const SHELF_COLUMN: &str = "Exclusive Shelf";
pub const STATUS_SOURCE: &str = "Read Status";

pub const GOODREADS_COLUMNS: [&str; 24] = [
    "Book Id",
    "Title",
    "Author",
    "Author l-f",
    "Additional Authors",
    "ISBN",
    "ISBN13",
    "My Rating",
    "Average Rating",
    "Publisher",
    "Binding",
    "Number of Pages",
    "Year Published",
    "Original Publication Year",
    "Date Read",
    "Date Added",
    "Bookshelves",
    "Bookshelves with positions",
    "Exclusive Shelf",
    "My Review",
    "Spoiler",
    "Private Notes",
    "Read Count",
    "Owned Copies",
];

pub fn shelf_vocabulary() -> StatusVocabulary {
    StatusVocabulary::new([
        ("read", "read"),
        ("currently-reading", "currently-reading"),
        ("to-read", "to-read"),
        ("to-read-pile", "to-read"),
        ("dnf", "abandoned"),
        ("did-not-finish", "abandoned"),
    ])
}

pub fn storygraph_to_goodreads(config: &ConvertConfig) -> Result<SchemaMapping> {
    check_date_format(&config.date_format)?;
    let date = || ValueTranslation::Date {
        output_format: config.date_format.clone(),
    };
    let date_added = config
        .default_date_added
        .clone()
        .unwrap_or_else(|| chrono::Local::now().format(&config.date_format).to_string());
    let empty_isbn = "=\"\"";

    let columns = vec![
        ColumnMapping::constant("Book Id", ""),
        ColumnMapping::same("Title"),
        ColumnMapping::renamed("Authors", "Author"),
        ColumnMapping::renamed("Authors", "Author l-f")
            .with_translation(ValueTranslation::AuthorLastFirst),
        ColumnMapping::constant("Additional Authors", ""),
        ColumnMapping::renamed("ISBN/UID", "ISBN")
            .with_default(empty_isbn)
            .with_translation(ValueTranslation::Isbn(IsbnKind::Isbn10)),
        ColumnMapping::renamed("ISBN/UID", "ISBN13")
            .with_default(empty_isbn)
            .with_translation(ValueTranslation::Isbn(IsbnKind::Isbn13)),
        ColumnMapping::renamed("Star Rating", "My Rating")
            .with_default("0")
            .with_translation(ValueTranslation::Rating),
        ColumnMapping::constant("Average Rating", ""),
        ColumnMapping::constant("Publisher", ""),
        ColumnMapping::renamed("Format", "Binding").with_default(""),
        ColumnMapping::constant("Number of Pages", ""),
        ColumnMapping::constant("Year Published", ""),
        ColumnMapping::constant("Original Publication Year", ""),
        ColumnMapping::renamed("Last Date Read", "Date Read")
            .with_default("")
            .with_translation(date()),
        ColumnMapping::renamed("Date Added", "Date Added")
            .with_default(date_added)
            .with_translation(date()),
        ColumnMapping::renamed(STATUS_SOURCE, "Bookshelves")
            .with_default("to-read")
            .with_translation(ValueTranslation::Status(shelf_vocabulary())),
        ColumnMapping::renamed(STATUS_SOURCE, "Bookshelves with positions")
            .with_default("to-read (#1)")
            .with_translation(ValueTranslation::ShelfPosition(shelf_vocabulary())),
        ColumnMapping::renamed(STATUS_SOURCE, SHELF_COLUMN)
            .with_default("to-read")
            .with_translation(ValueTranslation::Status(shelf_vocabulary())),
        ColumnMapping::renamed("Review", "My Review").with_default(""),
        ColumnMapping::constant("Spoiler", ""),
        ColumnMapping::constant("Private Notes", ""),
        ColumnMapping::renamed("Read Count", "Read Count")
            .with_default("0")
            .with_translation(ValueTranslation::Count),
        ColumnMapping::renamed("Owned?", "Owned Copies")
            .with_default("0")
            .with_translation(ValueTranslation::Flag),
    ];

    SchemaMapping::new(columns)?.with_rule(RowRule::ClearUnless {
        target: "Date Read".to_string(),
        column: SHELF_COLUMN.to_string(),
        equals: "read".to_string(),
    })
}
