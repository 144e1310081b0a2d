//! A materialized JSON value tree, produced by the default array/object
//! builders when a caller drives `read_array`/`read_object` instead of the
//! raw event loop.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

pub type Map = BTreeMap<String, Value>;
pub type Array = Vec<Value>;

/// A JSON value as defined by [RFC 8259](https://datatracker.ietf.org/doc/html/rfc8259).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Array),
    Object(Map),
}
