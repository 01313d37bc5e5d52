//! The standard object-type catalog.
//!
//! Every type carries the base [`object`] rules except the standalone
//! helper types (`media_link`, `mood`, `address`, `position`, `links`),
//! which only describe the members they list. Types without a dedicated
//! schema (`note`, `person`, ...) use the base schema through the registry
//! fallback.

use streams_canonical::{is_absolute_iri, is_language_tag, is_mime_type, is_verb};

use crate::rule::PropertyRule;
use crate::schema::{MissingCheck, Schema};

/// Object types with a shorthand constructor, including those served by the base schema.
pub const OBJECT_TYPES: &[&str] = &[
    "activity",
    "address",
    "alert",
    "application",
    "article",
    "audio",
    "badge",
    "binary",
    "bookmark",
    "collection",
    "comment",
    "device",
    "event",
    "file",
    "game",
    "group",
    "image",
    "issue",
    "job",
    "link",
    "links",
    "media_link",
    "mood",
    "note",
    "offer",
    "organization",
    "page",
    "permission",
    "person",
    "place",
    "position",
    "process",
    "product",
    "question",
    "review",
    "role",
    "service",
    "task",
    "team",
    "video",
];

/// Relations with a fixed meaning inside a `links` object.
pub const LINK_RELATIONS: &[&str] = &[
    "alternate",
    "canonical",
    "current",
    "first",
    "last",
    "next",
    "prev",
    "previous",
    "self",
];

/// Vocabulary extension members carried by every object.
const VOCABULARIES: &[(&str, Option<&str>)] = &[
    ("dc", None),
    ("geojson", None),
    ("ld", None),
    ("odata", None),
    ("opengraph", None),
    ("schema_org", None),
    ("open_social", Some("openSocial")),
];

/// The schemas registered by [`SchemaRegistry::standard`](crate::SchemaRegistry::standard).
pub fn standard_schemas() -> Vec<(&'static str, Schema)> {
    vec![
        ("activity", activity()),
        ("address", address()),
        ("audio", audio_video()),
        ("binary", binary()),
        ("bookmark", bookmark()),
        ("collection", collection()),
        ("event", event()),
        ("file", file()),
        ("group", role_group()),
        ("image", image()),
        ("issue", issue()),
        ("link", link()),
        ("links", links()),
        ("media_link", media_link()),
        ("mood", mood()),
        ("permission", permission()),
        ("place", place()),
        ("position", position()),
        ("product", image()),
        ("question", question()),
        ("role", role_group()),
        ("task", task()),
        ("video", audio_video()),
    ]
}

fn extend(base: &Schema, extension: Schema) -> Schema {
    Schema::compose([base, &extension])
}

/// Base schema shared by every object.
pub fn object() -> Schema {
    let schema = Schema::new()
        .with_rule(PropertyRule::string("content"))
        .with_rule(PropertyRule::string("display_name").with_alias("displayName"))
        .with_rule(PropertyRule::string("object_type").with_alias("objectType"))
        .with_rule(PropertyRule::string("summary"))
        .with_rule(PropertyRule::string("aka").with_alias("alias"))
        .with_rule(PropertyRule::date_time("updated"))
        .with_rule(PropertyRule::date_time("published"))
        .with_rule(PropertyRule::date_time("start_time").with_alias("startTime"))
        .with_rule(PropertyRule::date_time("end_time").with_alias("endTime"))
        .with_rule(PropertyRule::object_of("links", "links"))
        .with_rule(PropertyRule::object("author"))
        .with_rule(PropertyRule::object_of("img", "media_link").with_alias("image"))
        .with_rule(PropertyRule::object("source"))
        .with_rule(PropertyRule::object_of("location", "place"))
        .with_rule(PropertyRule::object_of("mood", "mood"))
        .with_rule(PropertyRule::bounded_float("rating", 0.0, 5.0))
        .with_rule(PropertyRule::absolute_iri("id"))
        .with_rule(PropertyRule::iri("url"))
        .with_rule(PropertyRule::object_array("attachments"))
        .with_rule(PropertyRule::object_array("in_reply_to").with_alias("inReplyTo"))
        .with_rule(PropertyRule::object_array("tags"))
        .with_rule(
            PropertyRule::string_array_matching("downstream_duplicates", is_absolute_iri)
                .with_alias("downstreamDuplicates"),
        )
        .with_rule(
            PropertyRule::string_array_matching("upstream_duplicates", is_absolute_iri)
                .with_alias("upstreamDuplicates"),
        );
    VOCABULARIES.iter().fold(schema, |schema, (name, alias)| {
        let rule = PropertyRule::object(*name);
        schema.with_rule(match alias {
            Some(alias) => rule.with_alias(*alias),
            None => rule,
        })
    })
}

/// Activities: an actor doing `verb` to an object.
pub fn activity() -> Schema {
    extend(
        &object(),
        Schema::new()
            .with_rule(PropertyRule::string_matching("verb", is_verb))
            .with_rule(PropertyRule::string("content"))
            .with_rule(PropertyRule::string("title"))
            .with_rule(PropertyRule::object_of("icon", "media_link"))
            .with_rule(PropertyRule::object("generator"))
            .with_rule(PropertyRule::object("actor"))
            .with_rule(PropertyRule::object("target"))
            .with_rule(PropertyRule::object("obj").with_alias("object"))
            .with_rule(PropertyRule::object("provider"))
            .with_rule(PropertyRule::object("context"))
            .with_rule(PropertyRule::object("result"))
            .with_rule(PropertyRule::object_array("to"))
            .with_rule(PropertyRule::object_array("cc"))
            .with_rule(PropertyRule::object_array("bto"))
            .with_rule(PropertyRule::object_array("bcc"))
            .with_rule(PropertyRule::bounded_float("priority", 0.0, 1.0)),
    )
}

/// Tasks are activities with scheduling and dependencies.
pub fn task() -> Schema {
    extend(
        &activity(),
        Schema::new()
            .with_rule(PropertyRule::date_time("by"))
            .with_rule(PropertyRule::object_array_of("prerequisites", "task"))
            .with_rule(PropertyRule::object_array_of("required", "task"))
            .with_rule(PropertyRule::object_array_of("supersedes", "task")),
    )
}

/// Link to media, sized and timed.
pub fn media_link() -> Schema {
    Schema::new()
        .with_rule(PropertyRule::absolute_iri("url"))
        .with_rule(PropertyRule::non_negative_int("duration"))
        .with_rule(PropertyRule::non_negative_int("width"))
        .with_rule(PropertyRule::non_negative_int("height"))
}

/// A mood with a name and an image.
pub fn mood() -> Schema {
    Schema::new()
        .with_rule(PropertyRule::string("display_name").with_alias("displayName"))
        .with_rule(PropertyRule::object_of("img", "media_link").with_alias("image"))
}

/// Postal address.
pub fn address() -> Schema {
    Schema::new()
        .with_rule(PropertyRule::string("formatted"))
        .with_rule(PropertyRule::string("street_address").with_alias("streetAddress"))
        .with_rule(PropertyRule::string("locality"))
        .with_rule(PropertyRule::string("region"))
        .with_rule(PropertyRule::string("postal_code").with_alias("postalCode"))
        .with_rule(PropertyRule::string("country"))
}

/// Geographic position.
pub fn position() -> Schema {
    Schema::new()
        .with_rule(PropertyRule::numeric("altitude"))
        .with_rule(PropertyRule::bounded_float("longitude", -180.0, 180.0))
        .with_rule(PropertyRule::bounded_float("latitude", -90.0, 90.0))
}

/// A place, optionally positioned and addressed.
pub fn place() -> Schema {
    extend(
        &object(),
        Schema::new()
            .with_rule(PropertyRule::object_of("position", "position"))
            .with_rule(PropertyRule::object_of("address", "address")),
    )
}

/// Paged collection of items.
pub fn collection() -> Schema {
    extend(
        &object(),
        Schema::new()
            .with_rule(PropertyRule::date_time("items_after").with_alias("itemsAfter"))
            .with_rule(PropertyRule::date_time("items_before").with_alias("itemsBefore"))
            .with_rule(PropertyRule::non_negative_int("items_per_page").with_alias("itemsPerPage"))
            .with_rule(PropertyRule::non_negative_int("start_index").with_alias("startIndex"))
            .with_rule(PropertyRule::non_negative_int("total_items").with_alias("totalItems"))
            .with_rule(PropertyRule::object_array("items"))
            .with_rule(PropertyRule::string_array("object_types").with_alias("objectTypes")),
    )
}

/// Audio and video objects.
pub fn audio_video() -> Schema {
    extend(
        &object(),
        Schema::new()
            .with_rule(PropertyRule::string("embed_code").with_alias("embedCode"))
            .with_rule(PropertyRule::object_of("stream", "media_link")),
    )
}

/// A file reference.
pub fn file() -> Schema {
    extend(
        &object(),
        Schema::new()
            .with_rule(PropertyRule::string_matching("mime_type", is_mime_type).with_alias("mimeType"))
            .with_rule(PropertyRule::string("md5"))
            .with_rule(PropertyRule::absolute_iri("file_url").with_alias("fileUrl")),
    )
}

/// A file carried inline.
pub fn binary() -> Schema {
    extend(
        &file(),
        Schema::new()
            .with_rule(PropertyRule::string("compression"))
            .with_rule(PropertyRule::string("data"))
            .with_rule(PropertyRule::non_negative_int("length")),
    )
}

/// Event with RSVP collections.
pub fn event() -> Schema {
    extend(
        &object(),
        Schema::new()
            .with_rule(PropertyRule::object_of("attended_by", "collection").with_alias("attendedBy"))
            .with_rule(PropertyRule::object_of("attending", "collection"))
            .with_rule(PropertyRule::object_of("invited", "collection"))
            .with_rule(
                PropertyRule::object_of("maybe_attending", "collection")
                    .with_alias("maybeAttending"),
            )
            .with_rule(
                PropertyRule::object_of("not_attended_by", "collection")
                    .with_alias("notAttendedBy"),
            )
            .with_rule(
                PropertyRule::object_of("not_attending", "collection").with_alias("notAttending"),
            ),
    )
}

/// Issue reports classified by type IRIs.
pub fn issue() -> Schema {
    extend(
        &object(),
        Schema::new().with_rule(PropertyRule::string_array_matching("types", is_absolute_iri)),
    )
}

/// Permission over a scope.
pub fn permission() -> Schema {
    extend(
        &object(),
        Schema::new()
            .with_rule(PropertyRule::object("scope"))
            .with_rule(PropertyRule::string_array("actions")),
    )
}

/// Roles and groups with a member collection.
pub fn role_group() -> Schema {
    extend(
        &object(),
        Schema::new().with_rule(PropertyRule::object_of("members", "collection")),
    )
}

/// Images and products.
pub fn image() -> Schema {
    extend(
        &object(),
        Schema::new()
            .with_rule(PropertyRule::object_of("full_image", "media_link").with_alias("fullImage")),
    )
}

/// A bookmark pointing at a target.
pub fn bookmark() -> Schema {
    extend(
        &object(),
        Schema::new().with_rule(PropertyRule::absolute_iri("target_url").with_alias("targetUrl")),
    )
}

/// A question with answer options.
pub fn question() -> Schema {
    extend(
        &object(),
        Schema::new().with_rule(PropertyRule::object_array("options")),
    )
}

/// A typed link.
pub fn link() -> Schema {
    extend(
        &object(),
        Schema::new()
            .with_rule(PropertyRule::absolute_iri("href"))
            .with_rule(PropertyRule::string("title"))
            .with_rule(PropertyRule::string_matching("hreflang", is_language_tag))
            .with_rule(PropertyRule::string_matching("type", is_mime_type)),
    )
}

/// Relation name -> link objects.
pub fn links() -> Schema {
    LINK_RELATIONS
        .iter()
        .fold(Schema::new(), |schema, rel| {
            schema.with_rule(PropertyRule::object_array_of(*rel, "link"))
        })
        .with_missing_check(MissingCheck::Objects(Some("link".to_string())))
}
