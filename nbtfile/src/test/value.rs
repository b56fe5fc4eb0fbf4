use crate::error::ErrorKind;
use crate::{Compound, List, Tag, Value};

#[test]
fn integer_ranges() {
    assert_eq!(Value::integer(Tag::Byte, 127).unwrap(), Value::Byte(127));
    assert_eq!(Value::integer(Tag::Byte, -128).unwrap(), Value::Byte(-128));
    assert_eq!(
        Value::integer(Tag::Byte, 128).unwrap_err().kind(),
        &ErrorKind::OutOfRange
    );
    assert_eq!(
        Value::integer(Tag::Short, -32769).unwrap_err().kind(),
        &ErrorKind::OutOfRange
    );
    assert_eq!(
        Value::integer(Tag::Int, i32::MAX as i64).unwrap(),
        Value::Int(i32::MAX)
    );
    assert!(Value::integer(Tag::Int, i32::MAX as i64 + 1).is_err());
    assert_eq!(
        Value::integer(Tag::Long, i64::MIN).unwrap(),
        Value::Long(i64::MIN)
    );
    assert!(Value::integer(Tag::String, 1).is_err());
}

#[test]
fn kinds_are_distinct() {
    assert_ne!(Value::Byte(5), Value::Int(5));
    assert_ne!(Value::Float(1.0), Value::Double(1.0));
    assert_eq!(Value::Byte(5).tag(), Tag::Byte);
    assert_eq!(Value::Int(5).tag(), Tag::Int);
}

#[test]
fn numeric_comparisons() {
    assert_eq!(Value::Byte(5), 5i8);
    assert_eq!(Value::Short(5), 5i64);
    assert_eq!(5i32, Value::Long(5));
    assert_eq!(Value::Float(0.5), 0.5f64);
    assert_ne!(Value::Int(5), 5.0f64);
    assert_ne!(Value::from("5"), 5i32);
}

#[test]
fn string_comparisons() {
    let v = Value::from("hello");
    assert_eq!(v, "hello");
    assert_eq!(v, String::from("hello"));
    assert_ne!(v, "world");
    assert_eq!(v.as_str(), Some("hello"));
}

#[test]
fn accessors() {
    assert_eq!(Value::Short(-3).as_i64(), Some(-3));
    assert_eq!(Value::Double(2.5).as_f64(), Some(2.5));
    assert_eq!(Value::Int(1).as_f64(), None);
    assert_eq!(Value::from(vec![1u8, 2]).as_bytes(), Some(&[1u8, 2][..]));
    assert!(Value::Compound(Compound::new()).as_compound().is_some());
    assert!(Value::List(List::new(Tag::End)).as_list().is_some());
    assert!(Value::Int(1).as_list().is_none());
}

#[test]
fn list_checks_element_kind() {
    let mut list = List::new(Tag::Short);
    list.push(Value::Short(1)).unwrap();
    list.push(2i16).unwrap();

    let err = list.push(3i32).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::TypeMismatch);
    assert_eq!(list.len(), 2);
    assert_eq!(list.get(1), Some(&Value::Short(2)));
}

#[test]
fn list_of_end_takes_nothing() {
    let mut list = List::new(Tag::End);
    assert!(list.push(1i8).is_err());
    assert!(list.is_empty());
}

#[test]
fn list_from_values() {
    let list = List::from_values(Tag::Int, vec![Value::Int(1), Value::Int(2)]).unwrap();
    assert_eq!(list.element_tag(), Tag::Int);
    assert_eq!(list.to_vec(), vec![Value::Int(1), Value::Int(2)]);

    let err = List::from_values(Tag::Int, vec![Value::Int(1), Value::Long(2)]).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::TypeMismatch);
}

#[test]
fn list_iterates_in_order() {
    let list = List::from_values(Tag::Byte, (0..5i8).map(Value::from)).unwrap();
    let got: Vec<i64> = list.iter().filter_map(Value::as_i64).collect();
    assert_eq!(got, vec![0, 1, 2, 3, 4]);

    let owned: Vec<Value> = list.into_iter().collect();
    assert_eq!(owned.len(), 5);
}

#[test]
fn compound_keeps_insertion_order() {
    let mut c = Compound::new();
    c.insert("zebra", 1i32);
    c.insert("apple", 2i32);
    c.insert("mango", 3i32);

    assert_eq!(c.keys().collect::<Vec<_>>(), vec!["zebra", "apple", "mango"]);
}

#[test]
fn compound_replace_keeps_position() {
    let mut c = Compound::new();
    c.insert("a", 1i32);
    c.insert("b", 2i32);

    let old = c.insert("a", "now a string");
    assert_eq!(old, Some(Value::Int(1)));
    assert_eq!(c.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(c["a"], "now a string");
}

#[test]
fn compound_remove_keeps_order() {
    let mut c: Compound = vec![("a", 1i8), ("b", 2), ("c", 3)].into_iter().collect();

    assert_eq!(c.remove("b"), Some(Value::Byte(2)));
    assert_eq!(c.remove("b"), None);
    assert_eq!(c.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    assert_eq!(c.len(), 2);
    assert!(!c.contains_key("b"));
}

#[test]
fn compound_nested_mutation() {
    let mut root = Compound::new();
    root.insert("inner", Compound::new());

    root.get_mut("inner")
        .and_then(Value::as_compound_mut)
        .unwrap()
        .insert("x", 1i64);

    let inner = root["inner"].as_compound().unwrap();
    assert_eq!(inner["x"], 1i64);
}

#[test]
fn compound_equality_ignores_order() {
    let a: Compound = vec![("x", 1i32), ("y", 2)].into_iter().collect();
    let b: Compound = vec![("y", 2i32), ("x", 1)].into_iter().collect();
    assert_eq!(a, b);
}

#[test]
#[should_panic]
fn compound_index_missing_key() {
    let c = Compound::new();
    let _ = &c["missing"];
}
