//! # Model Schemas
//!
//! A [`Schema`] describes one model type: its ordered properties, the identifier
//! field and the default sort applied when a request carries no `sort` parameter.
//!
//! Schemas are built once at startup with [`SchemaBuilder`] and are read-only
//! afterwards, so they can be shared between requests without synchronisation.
//!
//! ```rust,ignore
//! use elepy::schema::{PropertyType, Schema};
//! use elepy::filtering::SortOption;
//!
//! let schema = Schema::builder("resources")
//!     .property("id", PropertyType::Number, |p| p.sortable())
//!     .property("unique", PropertyType::String, |p| p.searchable().sortable())
//!     .property("numberMax40", PropertyType::Number, |p| p.pretty_name("Number Max 40"))
//!     .id_field("id")
//!     .default_sort("id", SortOption::Ascending)
//!     .build()?;
//! ```

use serde::Serialize;

use crate::errors::SchemaError;
use crate::filtering::SortOption;

/// Semantic type of a property, used to decide which filter operators apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Date,
    Enum,
    Collection,
}

impl PropertyType {
    /// Types whose stored value is text-like and can be matched by free-text search.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::String | Self::Enum)
    }
}

/// A single property descriptor. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    name: String,
    pretty_name: String,
    property_type: PropertyType,
    searchable: bool,
    sortable: bool,
    hidden: bool,
}

impl Property {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable name used in error messages.
    #[must_use]
    pub fn pretty_name(&self) -> &str {
        &self.pretty_name
    }

    #[must_use]
    pub const fn property_type(&self) -> PropertyType {
        self.property_type
    }

    #[must_use]
    pub const fn is_searchable(&self) -> bool {
        self.searchable && !self.hidden
    }

    #[must_use]
    pub const fn is_sortable(&self) -> bool {
        self.sortable && !self.hidden
    }

    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }
}

/// Builder handed to the closure of [`SchemaBuilder::property`].
#[derive(Debug)]
pub struct PropertyBuilder {
    property: Property,
}

impl PropertyBuilder {
    fn new(name: &str, property_type: PropertyType) -> Self {
        Self {
            property: Property {
                name: name.to_string(),
                pretty_name: name.to_string(),
                property_type,
                searchable: false,
                sortable: false,
                hidden: false,
            },
        }
    }

    #[must_use]
    pub fn pretty_name(mut self, pretty_name: impl Into<String>) -> Self {
        self.property.pretty_name = pretty_name.into();
        self
    }

    #[must_use]
    pub const fn searchable(mut self) -> Self {
        self.property.searchable = true;
        self
    }

    #[must_use]
    pub const fn sortable(mut self) -> Self {
        self.property.sortable = true;
        self
    }

    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.property.hidden = true;
        self
    }
}

/// Descriptor of one model type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    name: String,
    properties: Vec<Property>,
    id_field: String,
    default_sort_field: String,
    default_sort_direction: SortOption,
}

impl Schema {
    /// Start building a schema for the model exposed under `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            properties: Vec::new(),
            id_field: None,
            default_sort: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Look up a property by its exact name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    #[must_use]
    pub fn default_sort_field(&self) -> &str {
        &self.default_sort_field
    }

    #[must_use]
    pub const fn default_sort_direction(&self) -> SortOption {
        self.default_sort_direction
    }

    /// Properties that take part in free-text search.
    pub fn searchable_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.is_searchable())
    }
}

#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    properties: Vec<Property>,
    id_field: Option<String>,
    default_sort: Option<(String, SortOption)>,
}

impl SchemaBuilder {
    /// Append a property. Declaration order is preserved.
    #[must_use]
    pub fn property(
        mut self,
        name: &str,
        property_type: PropertyType,
        configure: impl FnOnce(PropertyBuilder) -> PropertyBuilder,
    ) -> Self {
        let built = configure(PropertyBuilder::new(name, property_type)).property;
        self.properties.retain(|p| p.name != built.name);
        self.properties.push(built);
        self
    }

    #[must_use]
    pub fn id_field(mut self, field: impl Into<String>) -> Self {
        self.id_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn default_sort(mut self, field: impl Into<String>, direction: SortOption) -> Self {
        self.default_sort = Some((field.into(), direction));
        self
    }

    /// Finish the schema.
    ///
    /// The identifier falls back to `id`, and the default sort falls back to the
    /// identifier in ascending order.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownIdField`] when the identifier is not a declared property,
    /// [`SchemaError::UnsortableDefaultSort`] when the default sort field is not a
    /// sortable property.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let id_field = self.id_field.unwrap_or_else(|| "id".to_string());
        let (default_sort_field, default_sort_direction) = self
            .default_sort
            .unwrap_or_else(|| (id_field.clone(), SortOption::Ascending));

        let declared = |field: &str| self.properties.iter().find(|p| p.name == field);
        if declared(&id_field).is_none() {
            return Err(SchemaError::UnknownIdField {
                schema: self.name,
                field: id_field,
            });
        }
        if !declared(&default_sort_field).is_some_and(Property::is_sortable) {
            return Err(SchemaError::UnsortableDefaultSort {
                schema: self.name,
                field: default_sort_field,
            });
        }

        Ok(Schema {
            name: self.name,
            properties: self.properties,
            id_field,
            default_sort_field,
            default_sort_direction,
        })
    }
}

/// Implemented by model types that register a static schema at startup.
pub trait Model {
    fn schema() -> Schema;
}
