use crate::docs::PropertyType;
use crate::parse::schema::{Schema, SchemaType};

/// Map a primitive schema type and format to its documented property type.
pub fn map_type(schema_type: &SchemaType, format: Option<&str>) -> PropertyType {
    match schema_type {
        SchemaType::Integer | SchemaType::Number => PropertyType::Number,
        SchemaType::Boolean => PropertyType::Boolean,
        SchemaType::String => match format {
            Some("date" | "date-time") => PropertyType::Date,
            _ => PropertyType::String,
        },
        SchemaType::Array => PropertyType::Array,
        SchemaType::Object => PropertyType::Object,
        SchemaType::Null | SchemaType::File | SchemaType::Unknown => PropertyType::Any,
    }
}

/// Property type of a resolved schema. Schemas without `type` are typed by
/// shape: properties or `allOf` imply an object, `items` implies an array.
pub fn schema_property_type(schema: &Schema) -> PropertyType {
    match schema.primary_type() {
        Some(t) => map_type(t, schema.format.as_deref()),
        None if !schema.properties.is_empty() || !schema.all_of.is_empty() => {
            PropertyType::Object
        }
        None if schema.items.is_some() => PropertyType::Array,
        None => PropertyType::Any,
    }
}
