/// A value stored in the session's durable key-value store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyValue {
    Int(i32),
    IntArray(Vec<i32>),
    Text(String),
}

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Int(_) => "Int",
            PropertyValue::IntArray(_) => "IntArray",
            PropertyValue::Text(_) => "Text",
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            PropertyValue::IntArray(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            _ => None,
        }
    }
}
