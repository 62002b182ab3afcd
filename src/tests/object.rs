// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::object::datetime::parse_isodate;
use crate::object::{DictKey, Object, ObjectType, Scalar, UnixTime, WireType};

use anyhow::Result;

fn mv(repr: &str, wire_type: WireType) -> Object {
    Object::message_value(repr.as_bytes(), wire_type)
}

#[test]
fn truthiness() {
    assert!(!Object::null().truthy());
    assert!(!Object::from(0i64).truthy());
    assert!(Object::from(-1i64).truthy());
    assert!(!Object::from(0.0).truthy());
    assert!(!Object::from("").truthy());
    assert!(Object::from("x").truthy());
    assert!(!Object::new_list().truthy());
    assert!(Object::datetime(UnixTime::EPOCH).truthy());

    assert!(mv("true", WireType::Boolean).truthy());
    assert!(!mv("0", WireType::Integer).truthy());
    assert!(mv("0.5", WireType::Double).truthy());
    assert!(!mv("", WireType::Null).truthy());
}

#[test]
fn message_values_decode_lazily() -> Result<()> {
    let value = mv("42", WireType::Integer);
    assert_eq!(value.type_of(), ObjectType::MessageValue);
    assert_eq!(value.typed().type_of(), ObjectType::Integer);
    assert_eq!(value.extract_integer(), Some(42));

    let json = mv(r#"{"a": [1, 2]}"#, WireType::Json);
    let typed = json.typed();
    assert_eq!(typed.type_of(), ObjectType::Dict);
    let a = typed.get_key(&DictKey::from("a")).expect("key a");
    assert_eq!(a.len(), Some(2));

    let list = mv(r#"a,"b,c",d"#, WireType::List).typed();
    let items = list.list_items().expect("list");
    assert_eq!(items.len(), 3);
    assert_eq!(items[1].str(), "b,c");

    // Payloads that do not match their wire type stay message values.
    let broken = mv("forty-two", WireType::Integer);
    assert_eq!(broken.typed().type_of(), ObjectType::MessageValue);
    Ok(())
}

#[test]
fn datetime_round_trip() -> Result<()> {
    let ut = UnixTime::new(1701350398, 123000, Some(3600));
    assert_eq!(ut.marshal(), "1701350398.123000+01:00");
    assert_eq!(ut.repr(), "2023-11-30T14:19:58.123+01:00");
    assert_eq!(UnixTime::parse_marshalled(&ut.marshal()), Some(ut));

    let west = UnixTime::new(0, 0, Some(-3 * 3600));
    assert!(west.marshal().ends_with("-03:00"));
    assert_eq!(UnixTime::parse_marshalled(&west.marshal()), Some(west));
    Ok(())
}

#[test]
fn datetime_from_usec() {
    let ut = UnixTime::from_usec(1710762325395194);
    assert_eq!(ut.sec, 1710762325);
    assert_eq!(ut.usec, 395194);
    assert_eq!(ut.to_usec(), 1710762325395194);

    let before_epoch = UnixTime::from_usec(-1);
    assert_eq!(before_epoch.sec, -1);
    assert_eq!(before_epoch.usec, 999999);
}

#[test]
fn isodate_parsing() {
    let ut = parse_isodate("2024-03-18T12:34:00Z").expect("valid isodate");
    assert_eq!(ut.sec, 1710765240);
    assert_eq!(ut.gmtoff, Some(0));

    let ut = parse_isodate("2024-03-18T13:34:00.250+01:00").expect("valid isodate");
    assert_eq!(ut.sec, 1710765240);
    assert_eq!(ut.usec, 250000);
    assert_eq!(ut.gmtoff, Some(3600));

    assert!(parse_isodate("2024-03-18 12:34:00").is_none());
    assert!(parse_isodate("2024-03-18T12:34:00Z trailing").is_none());
}

#[test]
fn addition() {
    let sum = Object::from(1i64).add(&Object::from(2i64)).expect("int + int");
    assert_eq!(sum.extract_integer(), Some(3));

    let sum = Object::from(1i64).add(&Object::from(0.5)).expect("int + double");
    assert_eq!(sum.extract_double(), Some(1.5));

    let s = Object::from("foo").add(&Object::from("bar")).expect("concat");
    assert_eq!(s.str(), "foobar");

    let later = Object::datetime(UnixTime::from_usec(0))
        .add(&Object::from(1_500_000i64))
        .expect("datetime + usec");
    assert_eq!(later.extract_datetime().map(|ut| ut.to_usec()), Some(1_500_000));

    let later = Object::datetime(UnixTime::from_usec(0))
        .add(&Object::from(2.0))
        .expect("datetime + seconds");
    assert_eq!(later.extract_datetime().map(|ut| ut.sec), Some(2));

    assert!(Object::from(i64::MAX).add(&Object::from(1i64)).is_none());
    assert!(Object::from("foo").add(&Object::from(1i64)).is_none());

    let lists = Object::list_from(vec![Object::from(1i64)])
        .add(&Object::list_from(vec![Object::from(2i64)]))
        .expect("list + list");
    assert_eq!(lists.len(), Some(2));
}

#[test]
fn dict_keys_are_typed() {
    let dict = Object::new_dict();
    assert!(dict.set_key(DictKey::from(1i64), Object::from("int")));
    assert!(dict.set_key(DictKey::from("1"), Object::from("string")));
    assert_eq!(dict.len(), Some(2));

    // A message value key is decoded before lookup.
    let key = DictKey::new(Scalar::MessageValue(crate::object::MessageValue::new(
        &b"1"[..],
        WireType::Integer,
    )));
    assert_eq!(dict.get_key(&key).map(|v| v.str()), Some("int".to_string()));

    assert!(dict.unset_key(&DictKey::from(1i64)));
    assert_eq!(dict.len(), Some(1));
}

#[test]
fn references_are_transparent() {
    let list = Object::new_list();
    let r = Object::new_ref(list.clone());
    assert!(r.push(Object::from(1i64)));
    assert_eq!(list.len(), Some(1));
    assert_eq!(r.type_of(), ObjectType::List);
    assert!(r.is_ref());
    assert!(!r.unwrap_ref().is_ref());
}

#[test]
fn json_rendering() {
    let dict = Object::new_dict();
    dict.set_key(DictKey::from("n"), Object::from(1i64));
    dict.set_key(DictKey::from("l"), Object::list_from(vec![Object::from(true)]));
    assert_eq!(dict.repr(), r#"{"n":1,"l":[true]}"#);
    assert_eq!(Object::bytes(&b"\x01\xff"[..]).repr(), "01ff");
}

#[test]
fn cyclic_containers_render_as_null() {
    let list = Object::list_from(vec![Object::from(1i64)]);
    assert!(list.push(list.clone()));
    assert_eq!(list.repr(), "[1,null]");
    assert_eq!(list.marshal(), (b"[1,null]".to_vec(), WireType::List));

    let dict = Object::new_dict();
    dict.set_key(DictKey::from("self"), Object::new_ref(dict.clone()));
    dict.set_key(DictKey::from("l"), list.clone());
    assert_eq!(dict.repr(), r#"{"self":null,"l":[1,null]}"#);

    // A container shared by two siblings is not a cycle.
    let shared = Object::list_from(vec![Object::from(true)]);
    let pair = Object::list_from(vec![shared.clone(), shared]);
    assert_eq!(pair.repr(), "[[true],[true]]");

    if let Object::List(items) = &list {
        items.borrow_mut().clear();
    }
    if let Object::Dict(entries) = &dict {
        entries.borrow_mut().clear();
    }
}
