use std::sync::Arc;

use chrono::{DateTime, Utc};
use streams_canonical::{from_text, Members, OBJECT_TYPE_KEY};
use streams_schemas::{PropertyRule, SchemaRegistry};
use tracing::debug;

use crate::builder::DocumentBuilder;
use crate::document::Document;
use crate::errors::DocumentError;
use crate::mode::Mode;

macro_rules! shorthands {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("Builds a `", stringify!($name), "` document.")]
            pub fn $name(
                &self,
                block: impl FnOnce(&mut DocumentBuilder) -> Result<(), DocumentError>,
            ) -> Result<Document, DocumentError> {
                self.build(stringify!($name), block)
            }
        )*
    };
}

/// Entry point for building documents against a shared registry.
///
/// Every builder a factory opens starts with the factory's [`Mode`].
#[derive(Debug, Clone)]
pub struct Factory {
    registry: Arc<SchemaRegistry>,
    mode: Mode,
}

impl Factory {
    /// Creates a factory over `registry` with the default mode.
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            mode: Mode::default(),
        }
    }

    /// Creates a factory over a fresh standard registry.
    pub fn standard() -> Self {
        Self::new(Arc::new(SchemaRegistry::standard()))
    }

    /// Replaces the mode given to new builders.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// The shared registry.
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Mode given to new builders.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Opens a builder for `object_type` with an `objectType` member.
    pub fn document(&self, object_type: &str) -> DocumentBuilder {
        self.open(Some(object_type), true)
    }

    /// Opens a builder for `object_type` without an `objectType` member.
    pub fn untagged(&self, object_type: &str) -> DocumentBuilder {
        self.open(Some(object_type), false)
    }

    /// Runs `block` against a tagged builder and finishes it.
    pub fn build(
        &self,
        object_type: &str,
        block: impl FnOnce(&mut DocumentBuilder) -> Result<(), DocumentError>,
    ) -> Result<Document, DocumentError> {
        let mut builder = self.document(object_type);
        block(&mut builder)?;
        Ok(builder.build())
    }

    /// Builds a document with no object type against the base schema.
    pub fn object(
        &self,
        block: impl FnOnce(&mut DocumentBuilder) -> Result<(), DocumentError>,
    ) -> Result<Document, DocumentError> {
        self.run(self.open(None, false), block)
    }

    /// Builds an `activity` document without an `objectType` member.
    pub fn activity(
        &self,
        block: impl FnOnce(&mut DocumentBuilder) -> Result<(), DocumentError>,
    ) -> Result<Document, DocumentError> {
        self.run(self.untagged("activity"), block)
    }

    /// Builds a `collection` document without an `objectType` member.
    pub fn collection(
        &self,
        block: impl FnOnce(&mut DocumentBuilder) -> Result<(), DocumentError>,
    ) -> Result<Document, DocumentError> {
        self.run(self.untagged("collection"), block)
    }

    /// Builds a `media_link` document without an `objectType` member.
    pub fn media_link(
        &self,
        block: impl FnOnce(&mut DocumentBuilder) -> Result<(), DocumentError>,
    ) -> Result<Document, DocumentError> {
        self.run(self.untagged("media_link"), block)
    }

    /// Builds a `links` document: relation name -> link objects.
    pub fn links(
        &self,
        block: impl FnOnce(&mut DocumentBuilder) -> Result<(), DocumentError>,
    ) -> Result<Document, DocumentError> {
        self.run(self.untagged("links"), block)
    }

    shorthands!(
        address,
        alert,
        application,
        article,
        audio,
        badge,
        binary,
        bookmark,
        comment,
        device,
        event,
        file,
        game,
        group,
        image,
        issue,
        job,
        link,
        mood,
        note,
        offer,
        organization,
        page,
        permission,
        person,
        place,
        position,
        process,
        product,
        question,
        review,
        role,
        service,
        task,
        team,
        video,
    );

    /// Opens a builder re-populated from `source`, leaving out `omit`.
    ///
    /// Every stored pair, `objectType` included, is replayed in source order
    /// through [`DocumentBuilder::replay`], so an unmodified copy renders
    /// exactly like the source. The builder uses the schema registered for
    /// the source's object type now, not the one the source was built with,
    /// and the source's mode. Omitted names match either assignment or wire
    /// names.
    pub fn copy_from(
        &self,
        source: &Document,
        omit: &[&str],
    ) -> Result<DocumentBuilder, DocumentError> {
        let mut builder = DocumentBuilder::new(
            Arc::clone(&self.registry),
            source.object_type(),
            false,
            source.mode(),
        );
        let skipped = |key: &str| {
            omit.iter().any(|name| {
                *name == key
                    || builder
                        .schema()
                        .rule(name)
                        .map(PropertyRule::wire_name)
                        .is_some_and(|wire| wire == key)
            })
        };
        let replay: Vec<(String, serde_json::Value)> = source
            .values()
            .iter()
            .filter(|(key, _)| !skipped(key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        for (key, value) in replay {
            builder.replay(&key, value)?;
        }
        debug!(
            object_type = source.object_type().unwrap_or("object"),
            omitted = omit.len(),
            "document copied"
        );
        Ok(builder)
    }

    /// Parses JSON text and replays it through a builder.
    ///
    /// The object type is `object_type` when given, otherwise the text's
    /// `objectType` member. Members are replayed in text order through
    /// [`DocumentBuilder::replay`], so the `objectType` member is kept, in
    /// place, only when the text carries one.
    pub fn from_text(
        &self,
        text: &str,
        object_type: Option<&str>,
    ) -> Result<Document, DocumentError> {
        let members = from_text(text)?;
        self.from_members(members, object_type)
    }

    /// Replays a parsed mapping through a builder; see [`Factory::from_text`].
    pub fn from_members(
        &self,
        members: Members,
        object_type: Option<&str>,
    ) -> Result<Document, DocumentError> {
        let recorded = members.get(OBJECT_TYPE_KEY).and_then(|v| v.as_str());
        let object_type = object_type.or(recorded).map(str::to_string);
        let mut builder = self.open(object_type.as_deref(), false);
        for (key, value) in members {
            builder.replay(&key, value)?;
        }
        Ok(builder.build())
    }

    /// Current instant, for timestamp properties.
    pub fn now(&self) -> DateTime<Utc> {
        streams_canonical::now()
    }

    fn open(&self, object_type: Option<&str>, tagged: bool) -> DocumentBuilder {
        DocumentBuilder::new(Arc::clone(&self.registry), object_type, tagged, self.mode)
    }

    fn run(
        &self,
        mut builder: DocumentBuilder,
        block: impl FnOnce(&mut DocumentBuilder) -> Result<(), DocumentError>,
    ) -> Result<Document, DocumentError> {
        block(&mut builder)?;
        Ok(builder.build())
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::standard()
    }
}
