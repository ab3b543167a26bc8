//! End-to-end parsing of hand-assembled class files through the public API.

use classgraph::jvm::{class::ClassAccessFlags, Class, Error};

fn u16_be(v: u16) -> [u8; 2] {
    v.to_be_bytes()
}

fn u32_be(v: u32) -> [u8; 4] {
    v.to_be_bytes()
}

fn utf8_entry(s: &str) -> Vec<u8> {
    let mut out = vec![1u8]; // UTF8 tag
    out.extend_from_slice(&u16_be(s.len() as u16));
    out.extend_from_slice(s.as_bytes());
    out
}

fn class_entry(name_index: u16) -> Vec<u8> {
    let mut out = vec![7u8]; // CLASS tag
    out.extend_from_slice(&u16_be(name_index));
    out
}

fn integer_entry(v: i32) -> Vec<u8> {
    let mut out = vec![3u8]; // INTEGER tag
    out.extend_from_slice(&u32_be(v as u32));
    out
}

/// Builds the minimal pool every test here shares: `#1 Utf8("Foo")`,
/// `#2 Class -> #1` (this_class), `#3 Utf8("java/lang/Object")`,
/// `#4 Class -> #3` (super_class).
fn base_pool_entries() -> Vec<u8> {
    let mut pool = Vec::new();
    pool.extend(utf8_entry("Foo"));
    pool.extend(class_entry(1));
    pool.extend(utf8_entry("java/lang/Object"));
    pool.extend(class_entry(3));
    pool
}

#[test]
fn minimum_empty_class_parses() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&[0xCA, 0xFE, 0xBA, 0xBE]); // magic
    bytes.extend_from_slice(&u16_be(0)); // minor_version
    bytes.extend_from_slice(&u16_be(52)); // major_version
    bytes.extend_from_slice(&u16_be(5)); // constant_pool_count (4 entries + slot 0)
    bytes.extend(base_pool_entries());
    bytes.extend_from_slice(&u16_be(0x0021)); // access_flags: PUBLIC | SUPER
    bytes.extend_from_slice(&u16_be(2)); // this_class
    bytes.extend_from_slice(&u16_be(4)); // super_class
    bytes.extend_from_slice(&u16_be(0)); // interfaces_count
    bytes.extend_from_slice(&u16_be(0)); // fields_count
    bytes.extend_from_slice(&u16_be(0)); // methods_count
    bytes.extend_from_slice(&u16_be(0)); // attributes_count

    let class = Class::from_bytes(&bytes).expect("a minimal class file should parse");
    assert_eq!(
        class.access_flags,
        ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER
    );
    assert_eq!(class.this_class.binary_name, "Foo");
    assert_eq!(
        class.super_class.as_ref().map(|c| c.binary_name.as_str()),
        Some("java.lang.Object")
    );
    assert!(class.fields.is_empty());
    assert!(class.methods.is_empty());
}

#[test]
fn bad_magic_is_rejected() {
    let bytes = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    assert!(matches!(
        Class::from_bytes(&bytes),
        Err(Error::BadMagic { found: 0 })
    ));
}

#[test]
fn constant_value_attribute_length_mismatch_is_rejected() {
    let mut pool = base_pool_entries();
    pool.extend(utf8_entry("x")); // #5 field name
    pool.extend(utf8_entry("I")); // #6 field descriptor
    pool.extend(utf8_entry("ConstantValue")); // #7 attribute name
    pool.extend(integer_entry(42)); // #8 constant value

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&[0xCA, 0xFE, 0xBA, 0xBE]);
    bytes.extend_from_slice(&u16_be(0));
    bytes.extend_from_slice(&u16_be(52));
    bytes.extend_from_slice(&u16_be(9)); // constant_pool_count
    bytes.extend(pool);
    bytes.extend_from_slice(&u16_be(0x0021)); // access_flags
    bytes.extend_from_slice(&u16_be(2)); // this_class
    bytes.extend_from_slice(&u16_be(4)); // super_class
    bytes.extend_from_slice(&u16_be(0)); // interfaces_count
    bytes.extend_from_slice(&u16_be(1)); // fields_count

    // field_info
    bytes.extend_from_slice(&u16_be(0x0008)); // access_flags: STATIC
    bytes.extend_from_slice(&u16_be(5)); // name_index -> "x"
    bytes.extend_from_slice(&u16_be(6)); // descriptor_index -> "I"
    bytes.extend_from_slice(&u16_be(1)); // attributes_count

    // ConstantValue attribute with a declared length one byte too long
    bytes.extend_from_slice(&u16_be(7)); // name_index -> "ConstantValue"
    bytes.extend_from_slice(&u32_be(3)); // declared length (should be 2)
    bytes.extend_from_slice(&u16_be(8)); // constantvalue_index -> #8
    bytes.push(0x00); // trailing byte the ConstantValue decoder never consumes

    bytes.extend_from_slice(&u16_be(0)); // methods_count
    bytes.extend_from_slice(&u16_be(0)); // attributes_count

    assert!(matches!(
        Class::from_bytes(&bytes),
        Err(Error::AttributeLengthMismatch { .. })
    ));
}
