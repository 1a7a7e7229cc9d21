use schemars::{JsonSchema, schema_for};
use serde_json::{Map, Value};

/// Generates the input schema for a tool from its input type.
///
/// The result is a JSON schema object with `type`, `properties` and
/// `required` (fields that are not `Option` and have no default). Meta keys
/// like `$schema` and `title` are removed, and nullable property types are
/// reduced to their non-null type, since the model never needs to send
/// explicit nulls.
pub fn input_schema<T: JsonSchema>() -> Value {
    let mut schema = schema_for!(T).to_value();
    let Some(object) = schema.as_object_mut() else {
        return schema;
    };

    object.remove("$schema");
    object.remove("title");
    object.insert("type".to_owned(), Value::String("object".to_owned()));
    if !object.contains_key("properties") {
        object.insert("properties".to_owned(), Value::Object(Map::new()));
    }

    if let Some(Value::Object(properties)) = object.get_mut("properties") {
        for property in properties.values_mut() {
            strip_null_type(property);
        }
    }
    schema
}

fn strip_null_type(property: &mut Value) {
    let Some(Value::Array(types)) = property.get_mut("type") else {
        return;
    };
    types.retain(|ty| ty != "null");
    if types.len() == 1 {
        let ty = types.remove(0);
        property["type"] = ty;
    }
}
