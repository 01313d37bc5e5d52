use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;
use streams_canonical::{from_text, hours};
use streams_core::{Document, DocumentError, Factory, Mode, Value};
use streams_schemas::{PropertyRule, Schema, SchemaRegistry};

fn factory() -> Factory {
    Factory::standard()
}

fn jane(factory: &Factory) -> Document {
    factory
        .person(|person| {
            person.set("display_name", "Jane")?;
            Ok(())
        })
        .unwrap()
}

#[test]
fn activity_serializes_in_assignment_order() {
    let factory = factory();
    let person = jane(&factory);
    let note = factory
        .note(|note| {
            note.set("content", "hello")?;
            Ok(())
        })
        .unwrap();
    let mut activity = factory.document("activity");
    activity
        .set("verb", "post")
        .unwrap()
        .set("actor", person)
        .unwrap()
        .set("object", note)
        .unwrap();
    let activity = activity.finish();

    assert_eq!(
        activity.to_text(false).unwrap(),
        r#"{"objectType":"activity","verb":"post","actor":{"objectType":"person","displayName":"Jane"},"object":{"objectType":"note","content":"hello"}}"#
    );
    assert_eq!(activity.get("obj"), activity.get("object"));
}

#[test]
fn aliases_never_leak_assignment_names() {
    let factory = factory();
    let text = jane(&factory).to_text(false).unwrap();
    assert!(text.contains("displayName"));
    assert!(!text.contains("display_name"));
}

#[test]
fn shorthands_omit_or_include_the_object_type() {
    let factory = factory();
    let activity = factory.activity(|a| a.set("verb", "share").map(drop)).unwrap();
    assert!(!activity.values().contains_key("objectType"));
    assert_eq!(activity.object_type(), Some("activity"));

    let video = factory.video(|_| Ok(())).unwrap();
    assert_eq!(video.values().get("objectType"), Some(&json!("video")));

    let untyped = factory.object(|o| o.set("content", "x").map(drop)).unwrap();
    assert_eq!(untyped.object_type(), None);
    assert_eq!(untyped.values().len(), 1);
}

#[test]
fn arrays_merge_across_assignments() {
    let factory = factory();
    let a = factory.image(|_| Ok(())).unwrap();
    let b = factory.video(|_| Ok(())).unwrap();
    let note = factory
        .note(|note| {
            note.set("attachments", vec![a.clone()])?;
            note.set("attachments", vec![b.clone()])?;
            Ok(())
        })
        .unwrap();
    assert_eq!(
        note.get("attachments"),
        Some(&json!([{"objectType": "image"}, {"objectType": "video"}]))
    );
}

#[test]
fn rating_out_of_range_is_rejected() {
    let factory = factory();
    let err = factory
        .review(|review| {
            review.set("rating", 7.5)?;
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(
        err,
        DocumentError::ValidationFailed { ref object_type, ref property, .. }
            if object_type == "review" && property == "rating"
    ));
}

#[test]
fn unknown_types_accept_unruled_properties() {
    let factory = factory();
    let doc = factory
        .build("recipe", |recipe| {
            recipe.set("servings", 4)?.set("spicy", true)?;
            Ok(())
        })
        .unwrap();
    assert_eq!(doc.get("servings"), Some(&json!(4)));
    assert_eq!(doc.get("spicy"), Some(&json!(true)));
}

#[test]
fn links_require_link_objects() {
    let factory = factory();
    let links = factory
        .links(|links| {
            links.link("next", |l| l.set("href", "http://example.org/2").map(drop))?;
            links.link("related", |l| l.set("href", "http://example.org/r").map(drop))?;
            Ok(())
        })
        .unwrap();
    assert_eq!(
        links.values(),
        &from_text(r#"{"next":[{"href":"http://example.org/2"}],"related":{"href":"http://example.org/r"}}"#)
            .unwrap()
    );

    let err = factory
        .links(|links| links.set("related", "http://example.org/r").map(drop))
        .unwrap_err();
    assert!(matches!(err, DocumentError::InvalidType { .. }));

    let note = factory
        .note(|note| {
            note.set("links", links.clone())?;
            Ok(())
        })
        .unwrap();
    assert!(note.contains("links"));
}

#[test]
fn finished_documents_are_terminal() {
    let factory = factory();
    let mut builder = factory.document("note");
    builder.set("content", "before").unwrap();
    let finished = builder.finish();
    assert!(builder.is_finished());
    assert!(matches!(
        builder.set("content", "after"),
        Err(DocumentError::ImmutableDocument { .. })
    ));
    assert!(matches!(
        builder.lenient(),
        Err(DocumentError::ImmutableDocument { .. })
    ));
    assert_eq!(finished.get("content"), Some(&json!("before")));
    assert_eq!(builder.build(), finished);
}

#[test]
fn text_round_trips_to_equal_values() {
    let factory = factory();
    let doc = factory
        .event(|event| {
            event.set("display_name", "Launch")?;
            event.set("start_time", "2012-06-01T18:00:00-04:00")?;
            event.set("tags", vec![jane(&factory)])?;
            event.embed("attending", |c| c.set("total_items", 3).map(drop))?;
            Ok(())
        })
        .unwrap();
    assert_eq!(doc.get("startTime"), Some(&json!("2012-06-01T22:00:00Z")));
    for pretty in [false, true] {
        let text = doc.to_text(pretty).unwrap();
        assert_eq!(&from_text(&text).unwrap(), doc.values());
        assert_eq!(factory.from_text(&text, None).unwrap(), doc);
    }
}

#[test]
fn copies_replay_values_except_omitted() {
    let factory = factory();
    let original = factory
        .note(|note| {
            note.set("content", "hello")?
                .set("display_name", "greeting")?
                .set("summary", "short")?;
            Ok(())
        })
        .unwrap();
    let mut copy = factory.copy_from(&original, &["displayName", "summary"]).unwrap();
    copy.set("content", "hello again").unwrap();
    let copy = copy.build();
    assert_eq!(
        copy.to_text(false).unwrap(),
        r#"{"objectType":"note","content":"hello again"}"#
    );
    assert_eq!(original.get("content"), Some(&json!("hello")));

    let same = factory.copy_from(&original, &[]).unwrap().build();
    assert_eq!(same, original);
}

fn copied_text(factory: &Factory, source: &Document) -> String {
    factory.copy_from(source, &[]).unwrap().build().to_text(false).unwrap()
}

#[test]
fn copies_keep_the_object_type_member_as_stored() {
    let factory = factory();
    let untyped = factory
        .object(|o| o.set("content", "x")?.set("object_type", "note").map(drop))
        .unwrap();
    let retagged = factory
        .note(|note| note.set("object_type", "person").map(drop))
        .unwrap();
    let late = factory
        .activity(|a| a.set("verb", "post")?.set("objectType", "activity").map(drop))
        .unwrap();
    assert_eq!(retagged.to_text(false).unwrap(), r#"{"objectType":"person"}"#);
    assert_eq!(late.to_text(false).unwrap(), r#"{"verb":"post","objectType":"activity"}"#);

    for source in [&untyped, &retagged, &late] {
        assert_eq!(copied_text(&factory, source), source.to_text(false).unwrap());
    }
    let copy = factory.copy_from(&retagged, &["object_type"]).unwrap().build();
    assert!(copy.values().is_empty());
    assert_eq!(copy.object_type(), Some("note"));
}

#[test]
fn copies_keep_arrays_and_nested_objects() {
    let factory = factory();
    let a = factory.image(|_| Ok(())).unwrap();
    let b = factory.video(|_| Ok(())).unwrap();
    let note = factory
        .note(|note| {
            note.set("attachments", vec![a, b])?;
            note.embed("location", |place| {
                place.set("display_name", "Paris")?;
                place.embed("position", |p| p.set("latitude", 48.85).map(drop))?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let copy = factory.copy_from(&note, &[]).unwrap().build();
    assert_eq!(copy.get("attachments").and_then(|v| v.as_array()).map(Vec::len), Some(2));
    assert_eq!(copy, note);
    assert_eq!(copied_text(&factory, &note), note.to_text(false).unwrap());

    let mut extended = factory.copy_from(&note, &[]).unwrap();
    extended.set("attachments", json!({"objectType": "audio"})).unwrap();
    assert_eq!(
        extended.get("attachments").and_then(|v| v.as_array()).map(Vec::len),
        Some(3)
    );
}

#[test]
fn lenient_sources_copy_leniently() {
    let factory = factory().with_mode(Mode::lenient());
    let place = factory
        .place(|place| {
            place.set("published", "last tuesday")?;
            place.set("rating", 11)?;
            place.set("position", json!({"latitude": 500}))?;
            Ok(())
        })
        .unwrap();
    let strict = Factory::standard();
    let copy = strict.copy_from(&place, &[]).unwrap();
    assert!(!copy.mode().strict);
    assert_eq!(copy.build(), place);

    let strict_source = strict
        .place(|place| place.set("display_name", "Paris").map(drop))
        .unwrap();
    let mut copy = strict.copy_from(&strict_source, &[]).unwrap();
    assert!(copy.set("rating", 11).is_err());
}

#[test]
fn typed_properties_reject_untyped_mappings_until_replayed() {
    let factory = factory();
    let err = factory
        .note(|note| note.set("location", json!({"displayName": "not a place"})).map(drop))
        .unwrap_err();
    assert!(matches!(err, DocumentError::InvalidType { ref property, .. } if property == "location"));
    let err = factory
        .activity(|a| a.set("icon", json!({"content": "anything", "rating": 3})).map(drop))
        .unwrap_err();
    assert!(matches!(err, DocumentError::InvalidType { ref property, .. } if property == "icon"));

    let text = r#"{"objectType":"note","location":{"displayName":"Paris"},"icon":{"url":"http://example.org/i.png"}}"#;
    let doc = factory.from_text(text, None).unwrap();
    assert_eq!(doc.to_text(false).unwrap(), text);
    assert!(factory
        .from_text(r#"{"location":{"objectType":"person"}}"#, Some("note"))
        .is_err());
}

#[test]
fn lenient_factories_skip_checks() {
    let factory = factory().with_mode(Mode::lenient());
    let doc = factory
        .place(|place| {
            place.set("published", "last tuesday")?;
            place.set("rating", 11)?;
            Ok(())
        })
        .unwrap();
    assert_eq!(doc.get("published"), Some(&json!("last tuesday")));
    assert!(!doc.mode().strict);
}

#[test]
fn pretty_documents_render_indented() {
    let factory = factory();
    let doc = factory
        .note(|note| {
            note.pretty()?.set("content", "hi")?;
            Ok(())
        })
        .unwrap();
    assert!(doc.to_string().contains("\n  \"content\": \"hi\""));
    assert!(!doc.to_text(false).unwrap().contains('\n'));
}

#[test]
fn builders_keep_the_schema_they_were_opened_with() {
    let registry = Arc::new(SchemaRegistry::standard());
    let factory = Factory::new(Arc::clone(&registry));
    let mut before = factory.document("activity");

    registry.register(
        "activity",
        Schema::compose([
            registry.base().as_ref(),
            &Schema::new().with_rule(PropertyRule::string_matching("verb", |v| v == "like")),
        ]),
    );

    before.set("verb", "post").unwrap();
    let mut after = factory.document("activity");
    assert!(matches!(
        after.set("verb", "post"),
        Err(DocumentError::ValidationFailed { .. })
    ));
    after.set("verb", "like").unwrap();
}

#[test]
fn timestamps_and_durations() {
    let factory = factory();
    let start = streams_canonical::parse_timestamp("2012-01-01T00:00:00Z").unwrap();
    let doc = factory
        .event(|event| {
            event.set("start_time", start)?;
            event.set("end_time", start + hours(2).unwrap())?;
            Ok(())
        })
        .unwrap();
    assert_eq!(doc.get("endTime"), Some(&json!("2012-01-01T02:00:00Z")));
}

#[test]
fn non_finite_numbers_clear_the_property() {
    let factory = factory();
    let doc = factory
        .position(|position| {
            position.set("altitude", 12.0)?;
            position.set("altitude", f64::NAN)?;
            Ok(())
        })
        .unwrap();
    assert!(!doc.contains("altitude"));
}

#[test]
fn documents_convert_to_typed_values() {
    let factory = factory();
    let person = jane(&factory);
    match Value::from(&person) {
        Value::Object(object) => assert_eq!(object.object_type(), Some("person")),
        other => panic!("expected object, got {}", other.kind()),
    }
    assert_eq!(serde_json::to_value(&person).unwrap(), json!({"objectType": "person", "displayName": "Jane"}));
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn documents_and_registries_cross_threads() {
    assert_send_sync::<Document>();
    assert_send_sync::<streams_core::DocumentBuilder>();
    assert_send_sync::<SchemaRegistry>();

    let registry = Arc::new(SchemaRegistry::standard());
    let writer = {
        let registry = Arc::clone(&registry);
        std::thread::spawn(move || {
            for i in 0..50 {
                let verb = if i % 2 == 0 { "like" } else { "post" };
                registry.register(
                    "activity",
                    Schema::compose([
                        registry.base().as_ref(),
                        &Schema::new()
                            .with_rule(PropertyRule::string_matching("verb", move |v| v == verb)),
                    ]),
                );
                assert!(registry.lookup(Some("activity")).rule("verb").is_some());
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let factory = Factory::new(Arc::clone(&registry));
            std::thread::spawn(move || {
                (0..50)
                    .map(|_| -> Result<Document, DocumentError> {
                        let mut activity = factory.document("activity");
                        if activity.set("verb", "like").is_err() {
                            activity.set("verb", "post")?;
                        }
                        Ok(activity.build())
                    })
                    .collect::<Result<Vec<Document>, DocumentError>>()
            })
        })
        .collect();
    writer.join().unwrap();
    for reader in readers {
        let documents = reader.join().unwrap().unwrap();
        assert_eq!(documents.len(), 50);
        assert!(documents.iter().all(|d| d.contains("verb")));
    }
}

proptest! {
    #[test]
    fn string_assignments_are_idempotent(s in "\\PC{0,24}") {
        let factory = Factory::standard();
        let once = factory.note(|n| n.set("content", s.as_str()).map(drop)).unwrap();
        let stored = once.get("content").cloned().unwrap_or(serde_json::Value::Null);
        let twice = factory.note(|n| n.set("content", stored.clone()).map(drop)).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn compact_text_round_trips(content in "\\PC{0,24}", half_stars in 0u8..=10, width in 0u32..4096) {
        let factory = Factory::standard();
        let doc = factory.image(|image| {
            image.set("content", content.as_str())?.set("rating", f64::from(half_stars) / 2.0)?;
            image.embed("full_image", |m| m.set("width", width).map(drop))?;
            Ok(())
        }).unwrap();
        let text = doc.to_text(false).unwrap();
        prop_assert_eq!(&from_text(&text).unwrap(), doc.values());
    }
}
