//! Array/object builder contract used by `EventStream::read_array` and
//! `EventStream::read_object`.
//!
//! These are the out-of-Core collaborators a caller supplies when they want
//! a materialized value tree instead of driving the raw event loop
//! themselves. The default implementations build a [`crate::value::Value`].

use alloc::string::String;

use crate::error::SyntaxError;
use crate::origin::Origin;

/// Accumulates array elements as they are parsed.
pub trait ArrayBuilder {
    /// The materialized array type.
    type Array;
    /// The element type previously produced by value dispatch.
    type Value;

    /// Called once, with the origin of the opening `[`.
    fn start(origin: Origin) -> Self;

    /// # Errors
    /// May reject a value (e.g. a builder enforcing a schema).
    fn add_value(&mut self, value: Self::Value) -> Result<(), SyntaxError>;

    fn add_null_value(&mut self) -> Result<(), SyntaxError>;

    fn done(self) -> Self::Array;
}

/// Accumulates object fields as they are parsed.
pub trait ObjectBuilder {
    type Object;
    type Value;

    fn start(origin: Origin) -> Self;

    /// # Errors
    /// As [`ArrayBuilder::add_value`].
    fn set_field(&mut self, name: String, value: Self::Value) -> Result<(), SyntaxError>;

    fn set_field_to_null(&mut self, name: String) -> Result<(), SyntaxError>;

    fn done(self) -> Self::Object;
}

use crate::value::{Array, Map, Value};

/// Default [`ArrayBuilder`] producing [`Array`].
#[derive(Debug, Default)]
pub struct ValueArrayBuilder(Array);

impl ArrayBuilder for ValueArrayBuilder {
    type Array = Array;
    type Value = Value;

    fn start(_origin: Origin) -> Self {
        Self(Array::new())
    }

    fn add_value(&mut self, value: Value) -> Result<(), SyntaxError> {
        self.0.push(value);
        Ok(())
    }

    fn add_null_value(&mut self) -> Result<(), SyntaxError> {
        self.0.push(Value::Null);
        Ok(())
    }

    fn done(self) -> Array {
        self.0
    }
}

/// Default [`ObjectBuilder`] producing [`Map`].
#[derive(Debug, Default)]
pub struct ValueObjectBuilder(Map);

impl ObjectBuilder for ValueObjectBuilder {
    type Object = Map;
    type Value = Value;

    fn start(_origin: Origin) -> Self {
        Self(Map::new())
    }

    fn set_field(&mut self, name: String, value: Value) -> Result<(), SyntaxError> {
        self.0.insert(name, value);
        Ok(())
    }

    fn set_field_to_null(&mut self, name: String) -> Result<(), SyntaxError> {
        self.0.insert(name, Value::Null);
        Ok(())
    }

    fn done(self) -> Map {
        self.0
    }
}
