// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.
#![allow(clippy::as_conversions)]

pub mod datetime;
pub mod extract;
pub mod message_value;

use core::cell::RefCell;
use core::fmt::{self, Write};
use core::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::number::format_double;

pub use datetime::UnixTime;
pub use message_value::{MessageValue, WireType};

/// Runtime type of an object, as reported by `istype()` and used by the
/// type-aware comparison modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Null,
    Boolean,
    Integer,
    Double,
    String,
    Bytes,
    Protobuf,
    DateTime,
    MessageValue,
    List,
    Dict,
}

impl ObjectType {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectType::Null => "null",
            ObjectType::Boolean => "boolean",
            ObjectType::Integer => "integer",
            ObjectType::Double => "double",
            ObjectType::String => "string",
            ObjectType::Bytes => "bytes",
            ObjectType::Protobuf => "protobuf",
            ObjectType::DateTime => "datetime",
            ObjectType::MessageValue => "message_value",
            ObjectType::List => "list",
            ObjectType::Dict => "dict",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "null" => ObjectType::Null,
            "boolean" => ObjectType::Boolean,
            "integer" => ObjectType::Integer,
            "double" => ObjectType::Double,
            "string" => ObjectType::String,
            "bytes" => ObjectType::Bytes,
            "protobuf" => ObjectType::Protobuf,
            "datetime" => ObjectType::DateTime,
            "message_value" => ObjectType::MessageValue,
            "list" => ObjectType::List,
            "dict" => ObjectType::Dict,
            _ => return None,
        })
    }

    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            ObjectType::String | ObjectType::Bytes | ObjectType::Protobuf
        )
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Leaf values. Buffers are atomically counted so that the same scalar can
/// live both in a mutable graph and in a frozen one.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(Arc<str>),
    Bytes(Arc<[u8]>),
    Protobuf(Arc<[u8]>),
    DateTime(UnixTime),
    MessageValue(MessageValue),
}

impl Scalar {
    pub fn type_of(&self) -> ObjectType {
        match self {
            Scalar::Null => ObjectType::Null,
            Scalar::Boolean(_) => ObjectType::Boolean,
            Scalar::Integer(_) => ObjectType::Integer,
            Scalar::Double(_) => ObjectType::Double,
            Scalar::String(_) => ObjectType::String,
            Scalar::Bytes(_) => ObjectType::Bytes,
            Scalar::Protobuf(_) => ObjectType::Protobuf,
            Scalar::DateTime(_) => ObjectType::DateTime,
            Scalar::MessageValue(_) => ObjectType::MessageValue,
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Scalar::Null => false,
            Scalar::Boolean(b) => *b,
            Scalar::Integer(i) => *i != 0,
            Scalar::Double(d) => *d != 0.0,
            Scalar::String(s) => !s.is_empty(),
            Scalar::Bytes(b) | Scalar::Protobuf(b) => !b.is_empty(),
            Scalar::DateTime(_) => true,
            Scalar::MessageValue(mv) => mv.truthy(),
        }
    }

    pub fn repr(&self) -> String {
        match self {
            Scalar::Null => "null".to_string(),
            Scalar::Boolean(b) => b.to_string(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Double(d) => format_double(*d),
            Scalar::String(s) => s.to_string(),
            Scalar::Bytes(b) | Scalar::Protobuf(b) => hex(b),
            Scalar::DateTime(ut) => ut.repr(),
            Scalar::MessageValue(mv) => mv.repr(),
        }
    }

    pub fn str(&self) -> String {
        match self {
            Scalar::Bytes(b) | Scalar::Protobuf(b) => String::from_utf8_lossy(b).into_owned(),
            Scalar::DateTime(ut) => ut.format_seconds(),
            Scalar::MessageValue(mv) => mv.str(),
            _ => self.repr(),
        }
    }

    pub fn marshal(&self) -> (Vec<u8>, WireType) {
        match self {
            Scalar::Null => (Vec::new(), WireType::Null),
            Scalar::Boolean(b) => (b.to_string().into_bytes(), WireType::Boolean),
            Scalar::Integer(i) => (i.to_string().into_bytes(), WireType::Integer),
            Scalar::Double(d) => (format_double(*d).into_bytes(), WireType::Double),
            Scalar::String(s) => (s.as_bytes().to_vec(), WireType::String),
            Scalar::Bytes(b) => (b.to_vec(), WireType::Bytes),
            Scalar::Protobuf(b) => (b.to_vec(), WireType::Protobuf),
            Scalar::DateTime(ut) => (ut.marshal().into_bytes(), WireType::DateTime),
            Scalar::MessageValue(mv) => (mv.repr_bytes().to_vec(), mv.wire_type()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Scalar::Null => Value::Null,
            Scalar::Boolean(b) => Value::Bool(*b),
            Scalar::Integer(i) => Value::from(*i),
            Scalar::Double(d) => serde_json::Number::from_f64(*d)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Scalar::String(s) => Value::String(s.to_string()),
            Scalar::Bytes(b) | Scalar::Protobuf(b) => Value::String(hex(b)),
            Scalar::DateTime(ut) => Value::String(ut.format_seconds()),
            Scalar::MessageValue(mv) => match mv.unmarshal() {
                Some(object) => object.to_json(),
                None => Value::String(String::from_utf8_lossy(mv.repr_bytes()).into_owned()),
            },
        }
    }

    /// The `+` operator between two leaves. `None` means the pairing is not
    /// supported.
    pub fn add(&self, rhs: &Scalar) -> Option<Scalar> {
        Some(match (self, rhs) {
            (Scalar::Integer(l), Scalar::Integer(r)) => Scalar::Integer(l.checked_add(*r)?),
            (Scalar::Integer(l), Scalar::Double(r)) => Scalar::Double(*l as f64 + r),
            (Scalar::Double(l), Scalar::Integer(r)) => Scalar::Double(l + *r as f64),
            (Scalar::Double(l), Scalar::Double(r)) => Scalar::Double(l + r),
            (Scalar::String(l), Scalar::String(r)) => {
                let mut s = String::with_capacity(l.len() + r.len());
                s.push_str(l);
                s.push_str(r);
                Scalar::String(Arc::from(s))
            }
            (Scalar::Bytes(l), Scalar::Bytes(r)) => Scalar::Bytes(concat(l, r)),
            (Scalar::Protobuf(l), Scalar::Protobuf(r)) => Scalar::Protobuf(concat(l, r)),
            // Integers are microseconds, doubles are seconds.
            (Scalar::DateTime(ut), Scalar::Integer(usec)) => {
                Scalar::DateTime(ut.add_duration(*usec)?)
            }
            (Scalar::DateTime(ut), Scalar::Double(sec)) => {
                let usec = sec * datetime::USEC_PER_SEC as f64;
                if !usec.is_finite() {
                    return None;
                }
                Scalar::DateTime(ut.add_duration(usec as i64)?)
            }
            _ => return None,
        })
    }
}

fn concat(l: &[u8], r: &[u8]) -> Arc<[u8]> {
    let mut v = Vec::with_capacity(l.len() + r.len());
    v.extend_from_slice(l);
    v.extend_from_slice(r);
    Arc::from(v)
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        // Writing into a String cannot fail.
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Key of a dict. Keys compare by type and marshalled value, so `1` and
/// `"1"` are different keys.
#[derive(Clone, Debug)]
pub struct DictKey(Scalar);

impl DictKey {
    pub fn new(scalar: Scalar) -> Self {
        match &scalar {
            Scalar::MessageValue(mv) => match mv.unmarshal().and_then(|o| o.scalar()) {
                Some(typed) => DictKey(typed),
                None => DictKey(scalar),
            },
            _ => DictKey(scalar),
        }
    }

    pub fn scalar(&self) -> &Scalar {
        &self.0
    }

    pub fn str(&self) -> String {
        self.0.str()
    }
}

impl PartialEq for DictKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.type_of() == other.0.type_of() && self.0.marshal().0 == other.0.marshal().0
    }
}

impl Eq for DictKey {}

impl Hash for DictKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.type_of().hash(state);
        self.0.marshal().0.hash(state);
    }
}

impl From<&str> for DictKey {
    fn from(s: &str) -> Self {
        DictKey(Scalar::String(Arc::from(s)))
    }
}

impl From<i64> for DictKey {
    fn from(i: i64) -> Self {
        DictKey(Scalar::Integer(i))
    }
}

pub type List = Rc<RefCell<Vec<Object>>>;
pub type Dict = Rc<RefCell<IndexMap<DictKey, Object>>>;

/// A live object. Containers are shared and mutable within one thread;
/// crossing threads requires freezing through an `Environment`.
#[derive(Clone, Debug)]
pub enum Object {
    Scalar(Scalar),
    List(List),
    Dict(Dict),
    Ref(Rc<RefCell<Object>>),
    Frozen(FrozenObject),
}

/// Immutable, thread-shareable form of an object graph.
#[derive(Clone)]
pub struct FrozenObject(Arc<Frozen>);

#[derive(Debug)]
pub enum Frozen {
    Scalar(Scalar),
    List(Vec<FrozenObject>),
    Dict(IndexMap<DictKey, FrozenObject>),
}

impl FrozenObject {
    pub(crate) fn new(value: Frozen) -> Self {
        FrozenObject(Arc::new(value))
    }

    pub fn value(&self) -> &Frozen {
        &self.0
    }

    pub fn scalar(&self) -> Option<&Scalar> {
        match self.value() {
            Frozen::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn list(&self) -> Option<&[FrozenObject]> {
        match self.value() {
            Frozen::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn dict(&self) -> Option<&IndexMap<DictKey, FrozenObject>> {
        match self.value() {
            Frozen::Dict(items) => Some(items),
            _ => None,
        }
    }

    pub fn type_of(&self) -> ObjectType {
        match self.value() {
            Frozen::Scalar(s) => s.type_of(),
            Frozen::List(_) => ObjectType::List,
            Frozen::Dict(_) => ObjectType::Dict,
        }
    }

    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    pub fn ptr_eq(&self, other: &FrozenObject) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn to_object(&self) -> Object {
        Object::Frozen(self.clone())
    }

    /// Drop this handle. When it was the last one the node is torn down,
    /// which drops its own handles to nested nodes and buffers.
    pub(crate) fn release(self) -> bool {
        Arc::try_unwrap(self.0).is_ok()
    }

    pub fn truthy(&self) -> bool {
        self.to_object().truthy()
    }

    pub fn repr(&self) -> String {
        self.to_object().repr()
    }
}

impl fmt::Debug for FrozenObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frozen({:?})", self.value())
    }
}

impl Object {
    pub fn null() -> Self {
        Object::Scalar(Scalar::Null)
    }

    pub fn bytes(b: impl Into<Arc<[u8]>>) -> Self {
        Object::Scalar(Scalar::Bytes(b.into()))
    }

    pub fn protobuf(b: impl Into<Arc<[u8]>>) -> Self {
        Object::Scalar(Scalar::Protobuf(b.into()))
    }

    /// Datetime objects. The epoch is served from the process-wide cache
    /// when it is initialized.
    pub fn datetime(ut: UnixTime) -> Self {
        if ut == UnixTime::EPOCH {
            if let Some(cached) = datetime::cached_epoch() {
                return Object::Frozen(cached);
            }
        }
        Object::Scalar(Scalar::DateTime(ut))
    }

    pub fn message_value(repr: impl Into<Arc<[u8]>>, wire_type: WireType) -> Self {
        Object::Scalar(Scalar::MessageValue(MessageValue::new(repr, wire_type)))
    }

    pub fn new_list() -> Self {
        Object::List(Rc::new(RefCell::new(Vec::new())))
    }

    pub fn list_from(items: Vec<Object>) -> Self {
        Object::List(Rc::new(RefCell::new(items)))
    }

    pub fn new_dict() -> Self {
        Object::Dict(Rc::new(RefCell::new(IndexMap::new())))
    }

    pub fn new_ref(referent: Object) -> Self {
        Object::Ref(Rc::new(RefCell::new(referent)))
    }

    pub fn from_json(json: &serde_json::Value) -> Self {
        use serde_json::Value;
        match json {
            Value::Null => Object::null(),
            Value::Bool(b) => Object::from(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Object::from(i),
                None => Object::from(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Object::from(s.as_str()),
            Value::Array(items) => Object::list_from(items.iter().map(Object::from_json).collect()),
            Value::Object(fields) => {
                let dict = Object::new_dict();
                for (k, v) in fields {
                    dict.set_key(DictKey::from(k.as_str()), Object::from_json(v));
                }
                dict
            }
        }
    }

    pub fn type_of(&self) -> ObjectType {
        match self {
            Object::Scalar(s) => s.type_of(),
            Object::List(_) => ObjectType::List,
            Object::Dict(_) => ObjectType::Dict,
            Object::Ref(r) => r.borrow().type_of(),
            Object::Frozen(f) => f.type_of(),
        }
    }

    pub fn is_type(&self, t: ObjectType) -> bool {
        self.type_of() == t
    }

    pub fn is_frozen(&self) -> bool {
        match self {
            Object::Frozen(_) => true,
            Object::Ref(r) => r.borrow().is_frozen(),
            _ => false,
        }
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, Object::Ref(_))
    }

    /// Strong count of the shared allocation backing this handle. Inline
    /// scalars are always uniquely owned.
    pub fn ref_count(&self) -> usize {
        match self {
            Object::Scalar(_) => 1,
            Object::List(l) => Rc::strong_count(l),
            Object::Dict(d) => Rc::strong_count(d),
            Object::Ref(r) => Rc::strong_count(r),
            Object::Frozen(f) => f.ref_count(),
        }
    }

    pub fn scalar(&self) -> Option<Scalar> {
        match self {
            Object::Scalar(s) => Some(s.clone()),
            Object::Frozen(f) => f.scalar().cloned(),
            Object::Ref(r) => r.borrow().scalar(),
            Object::List(_) | Object::Dict(_) => None,
        }
    }

    /// Follow `Ref` indirections down to the referent.
    pub fn unwrap_ref(&self) -> Object {
        match self {
            Object::Ref(r) => r.borrow().unwrap_ref(),
            _ => self.clone(),
        }
    }

    /// The referent with message values decoded to their typed form. A
    /// message value that does not decode is returned as is.
    pub fn typed(&self) -> Object {
        let object = self.unwrap_ref();
        match object.scalar() {
            Some(Scalar::MessageValue(mv)) => mv.unmarshal().unwrap_or(object),
            _ => object,
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Object::Scalar(s) => s.truthy(),
            Object::List(l) => !l.borrow().is_empty(),
            Object::Dict(d) => !d.borrow().is_empty(),
            Object::Ref(r) => r.borrow().truthy(),
            Object::Frozen(f) => match f.value() {
                Frozen::Scalar(s) => s.truthy(),
                Frozen::List(items) => !items.is_empty(),
                Frozen::Dict(items) => !items.is_empty(),
            },
        }
    }

    pub fn repr(&self) -> String {
        match self.scalar() {
            Some(s) => s.repr(),
            None => self.to_json().to_string(),
        }
    }

    pub fn str(&self) -> String {
        match self.scalar() {
            Some(s) => s.str(),
            None => self.repr(),
        }
    }

    pub fn marshal(&self) -> (Vec<u8>, WireType) {
        match self.scalar() {
            Some(s) => s.marshal(),
            None => {
                let wire_type = match self.type_of() {
                    ObjectType::List => WireType::List,
                    _ => WireType::Json,
                };
                (self.to_json().to_string().into_bytes(), wire_type)
            }
        }
    }

    /// JSON form of the object. A live container reached again through
    /// itself renders as `null`, the same way freezing cuts the cycle.
    pub fn to_json(&self) -> serde_json::Value {
        self.to_json_within(&mut Vec::new())
    }

    fn to_json_within(&self, parents: &mut Vec<*const ()>) -> serde_json::Value {
        use serde_json::{Map, Value};
        if let Some(s) = self.scalar() {
            return s.to_json();
        }
        let ptr = self.container_ptr();
        if let Some(ptr) = ptr {
            if parents.contains(&ptr) {
                return Value::Null;
            }
            parents.push(ptr);
        }
        let value = match self.list_items() {
            Some(items) => Value::Array(items.iter().map(|i| i.to_json_within(parents)).collect()),
            None => {
                let mut map = Map::new();
                for (k, v) in self.dict_items().unwrap_or_default() {
                    map.insert(k.str(), v.to_json_within(parents));
                }
                Value::Object(map)
            }
        };
        if ptr.is_some() {
            parents.pop();
        }
        value
    }

    /// Identity of the live container behind `self`, if any.
    pub(crate) fn container_ptr(&self) -> Option<*const ()> {
        match self {
            Object::List(l) => Some(Rc::as_ptr(l).cast()),
            Object::Dict(d) => Some(Rc::as_ptr(d).cast()),
            Object::Ref(r) => r.borrow().container_ptr(),
            Object::Scalar(_) | Object::Frozen(_) => None,
        }
    }

    pub fn len(&self) -> Option<usize> {
        match self.typed().scalar() {
            Some(Scalar::String(s)) => Some(s.len()),
            Some(Scalar::Bytes(b) | Scalar::Protobuf(b)) => Some(b.len()),
            Some(_) => None,
            None => match self.list_items() {
                Some(items) => Some(items.len()),
                None => self.dict_items().map(|items| items.len()),
            },
        }
    }

    /// The `+` operator. `None` means "operation not supported".
    pub fn add(&self, rhs: &Object) -> Option<Object> {
        let (lhs, rhs) = (self.typed(), rhs.typed());
        if let (Some(l), Some(r)) = (lhs.scalar(), rhs.scalar()) {
            return l.add(&r).map(Object::Scalar);
        }
        if let (Some(mut l), Some(r)) = (lhs.list_items(), rhs.list_items()) {
            l.extend(r);
            return Some(Object::list_from(l));
        }
        if let (Some(l), Some(r)) = (lhs.dict_items(), rhs.dict_items()) {
            let merged = Object::new_dict();
            for (k, v) in l.into_iter().chain(r) {
                merged.set_key(k, v);
            }
            return Some(merged);
        }
        None
    }

    /// Snapshot of the elements of a live or frozen list.
    pub fn list_items(&self) -> Option<Vec<Object>> {
        match self {
            Object::List(l) => Some(l.borrow().clone()),
            Object::Frozen(f) => f
                .list()
                .map(|items| items.iter().map(FrozenObject::to_object).collect()),
            Object::Ref(r) => r.borrow().list_items(),
            Object::Scalar(_) | Object::Dict(_) => None,
        }
    }

    /// Snapshot of the entries of a live or frozen dict.
    pub fn dict_items(&self) -> Option<Vec<(DictKey, Object)>> {
        match self {
            Object::Dict(d) => Some(
                d.borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
            Object::Frozen(f) => f.dict().map(|items| {
                items
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_object()))
                    .collect()
            }),
            Object::Ref(r) => r.borrow().dict_items(),
            Object::Scalar(_) | Object::List(_) => None,
        }
    }

    /// Append to a live list. Returns false for frozen or non-list objects.
    pub fn push(&self, item: Object) -> bool {
        match self {
            Object::List(l) => {
                l.borrow_mut().push(item);
                true
            }
            Object::Ref(r) => r.borrow().push(item),
            _ => false,
        }
    }

    pub fn get_index(&self, index: usize) -> Option<Object> {
        match self {
            Object::List(l) => l.borrow().get(index).cloned(),
            Object::Frozen(f) => f.list()?.get(index).map(FrozenObject::to_object),
            Object::Ref(r) => r.borrow().get_index(index),
            _ => None,
        }
    }

    /// Replace an existing element of a live list. Returns false for frozen
    /// or non-list objects and out of range indices.
    pub fn set_index(&self, index: usize, item: Object) -> bool {
        match self {
            Object::List(l) => match l.borrow_mut().get_mut(index) {
                Some(slot) => {
                    *slot = item;
                    true
                }
                None => false,
            },
            Object::Ref(r) => r.borrow().set_index(index, item),
            _ => false,
        }
    }

    pub fn unset_index(&self, index: usize) -> bool {
        match self {
            Object::List(l) => {
                let mut items = l.borrow_mut();
                if index < items.len() {
                    items.remove(index);
                    true
                } else {
                    false
                }
            }
            Object::Ref(r) => r.borrow().unset_index(index),
            _ => false,
        }
    }

    /// Insert or replace a key of a live dict. Returns false for frozen or
    /// non-dict objects.
    pub fn set_key(&self, key: DictKey, value: Object) -> bool {
        match self {
            Object::Dict(d) => {
                d.borrow_mut().insert(key, value);
                true
            }
            Object::Ref(r) => r.borrow().set_key(key, value),
            _ => false,
        }
    }

    pub fn get_key(&self, key: &DictKey) -> Option<Object> {
        match self {
            Object::Dict(d) => d.borrow().get(key).cloned(),
            Object::Frozen(f) => f.dict()?.get(key).map(FrozenObject::to_object),
            Object::Ref(r) => r.borrow().get_key(key),
            _ => None,
        }
    }

    pub fn unset_key(&self, key: &DictKey) -> bool {
        match self {
            Object::Dict(d) => d.borrow_mut().shift_remove(key).is_some(),
            Object::Ref(r) => r.borrow().unset_key(key),
            _ => false,
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.type_of() == other.type_of() && self.marshal() == other.marshal()
    }
}

impl From<Scalar> for Object {
    fn from(s: Scalar) -> Self {
        Object::Scalar(s)
    }
}

impl From<bool> for Object {
    fn from(b: bool) -> Self {
        Object::Scalar(Scalar::Boolean(b))
    }
}

impl From<i64> for Object {
    fn from(i: i64) -> Self {
        Object::Scalar(Scalar::Integer(i))
    }
}

impl From<f64> for Object {
    fn from(d: f64) -> Self {
        Object::Scalar(Scalar::Double(d))
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        Object::Scalar(Scalar::String(Arc::from(s)))
    }
}

impl From<String> for Object {
    fn from(s: String) -> Self {
        Object::Scalar(Scalar::String(Arc::from(s)))
    }
}

impl From<UnixTime> for Object {
    fn from(ut: UnixTime) -> Self {
        Object::datetime(ut)
    }
}

impl From<FrozenObject> for Object {
    fn from(f: FrozenObject) -> Self {
        Object::Frozen(f)
    }
}
