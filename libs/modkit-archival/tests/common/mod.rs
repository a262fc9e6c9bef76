#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

use std::sync::Arc;

use modkit_archival::{
    ArchivalConfig, BuiltSchema, FieldDef, FieldScope, FieldSource, InMemoryCatalog, ObjectType,
    OmitArchivedStrategy, SchemaBuilder, TableId, ValueCategory,
};

pub const POSTS: TableId = TableId(100);
pub const COMMENTS: TableId = TableId(101);
pub const AUTHORS: TableId = TableId(102);
pub const EVENTS: TableId = TableId(103);
pub const NOTES: TableId = TableId(104);

/// `posts` and `comments` carry a boolean `is_archived`; `events` uses a nullable
/// `archived_at` timestamp; `authors` has no marker; `notes` has a marker but no namespace.
#[must_use]
pub fn catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::new();
    catalog
        .add_table(POSTS, Some("app"), "posts")
        .add_column(POSTS, "id", ValueCategory::NullableMarker)
        .add_column(POSTS, "is_archived", ValueCategory::Boolean)
        .add_table(COMMENTS, Some("app"), "comments")
        .add_column(COMMENTS, "id", ValueCategory::NullableMarker)
        .add_column(COMMENTS, "post_id", ValueCategory::NullableMarker)
        .add_column(COMMENTS, "is_archived", ValueCategory::Boolean)
        .add_column(COMMENTS, "archived_at", ValueCategory::NullableMarker)
        .add_table(AUTHORS, Some("app"), "authors")
        .add_column(AUTHORS, "id", ValueCategory::NullableMarker)
        .add_table(EVENTS, Some("app"), "events")
        .add_column(EVENTS, "archived_at", ValueCategory::NullableMarker)
        .add_column(EVENTS, "post_id", ValueCategory::NullableMarker)
        .add_table(NOTES, None, "notes")
        .add_column(NOTES, "is_archived", ValueCategory::Boolean);
    catalog
}

#[must_use]
pub fn object_types() -> Vec<ObjectType> {
    vec![
        ObjectType::new("Query")
            .with_field(FieldDef::new("allPosts", FieldScope::connection(POSTS)))
            .with_field(FieldDef::new("allComments", FieldScope::connection(COMMENTS)))
            .with_field(FieldDef::new("allAuthors", FieldScope::connection(AUTHORS)))
            .with_field(FieldDef::new("allEvents", FieldScope::connection(EVENTS)))
            .with_field(FieldDef::new("allNotes", FieldScope::connection(NOTES)))
            .with_field(FieldDef::new(
                "searchPosts",
                FieldScope {
                    is_connection: true,
                    source: Some(FieldSource::Function("search_posts".to_owned())),
                    ..FieldScope::default()
                },
            ))
            .with_field(FieldDef::new(
                "post",
                FieldScope {
                    source: Some(FieldSource::Table(POSTS)),
                    ..FieldScope::default()
                },
            )),
        ObjectType::new("Post")
            .with_field(FieldDef::new(
                "commentsByPostId",
                FieldScope::backward_relation(COMMENTS, POSTS),
            ))
            .with_field(FieldDef::new(
                "eventsByPostId",
                FieldScope::backward_relation(EVENTS, POSTS),
            )),
        ObjectType::new("Author").with_field(FieldDef::new(
            "postsByAuthorId",
            FieldScope::backward_relation(POSTS, AUTHORS),
        )),
        ObjectType::new("Event").with_field(FieldDef::new(
            "commentsByEventPostId",
            FieldScope::backward_relation(COMMENTS, EVENTS),
        )),
    ]
}

#[must_use]
pub fn builder(config: ArchivalConfig) -> SchemaBuilder {
    SchemaBuilder::new(Arc::new(catalog())).with_strategy(OmitArchivedStrategy::new(config))
}

#[must_use]
pub fn build() -> BuiltSchema {
    builder(ArchivalConfig::default())
        .build(object_types())
        .unwrap()
}
