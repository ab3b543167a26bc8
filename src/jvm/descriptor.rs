//! The descriptor mini-language: compact strings JVM class files use to
//! encode field types and method signatures (e.g. `I`, `Ljava/lang/String;`,
//! `[[I`, `(IJ)V`).

use std::{fmt::Display, str::FromStr};

use itertools::Itertools;

use super::parsing::Error;

/// One of the eight JVM primitive types, or `void`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum PrimitiveType {
    /// `boolean`
    Boolean,
    /// `char`
    Char,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `byte`
    Byte,
    /// `short`
    Short,
    /// `int`
    Int,
    /// `long`
    Long,
}

impl TryFrom<char> for PrimitiveType {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'Z' => Ok(Self::Boolean),
            'C' => Ok(Self::Char),
            'F' => Ok(Self::Float),
            'D' => Ok(Self::Double),
            'B' => Ok(Self::Byte),
            'S' => Ok(Self::Short),
            'I' => Ok(Self::Int),
            'J' => Ok(Self::Long),
            _ => Err(()),
        }
    }
}

impl Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::Float => "float",
            Self::Double => "double",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
        };
        f.write_str(name)
    }
}

impl PrimitiveType {
    /// The single-character wire tag for this type (`Z`, `C`, `F`, ...).
    fn descriptor_tag(self) -> &'static str {
        match self {
            Self::Boolean => "Z",
            Self::Char => "C",
            Self::Float => "F",
            Self::Double => "D",
            Self::Byte => "B",
            Self::Short => "S",
            Self::Int => "I",
            Self::Long => "J",
        }
    }
}

/// The type of a field, local variable, or array element: a primitive, a
/// class, or an array of either.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A primitive type.
    Base(PrimitiveType),
    /// A class or interface type, by binary name (`.`-separated).
    Object(String),
    /// An array of the given element type.
    Array(Box<FieldType>),
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base(p) => write!(f, "{p}"),
            Self::Object(name) => f.write_str(name),
            Self::Array(elem) => write!(f, "{elem}[]"),
        }
    }
}

impl FieldType {
    /// Re-encodes this type as the wire-format descriptor string a class
    /// file would store for it, e.g. `Ljava/lang/String;` or `[I`.
    #[must_use]
    pub fn descriptor(&self) -> String {
        match self {
            Self::Base(p) => p.descriptor_tag().to_owned(),
            Self::Object(name) => format!("L{};", name.replace('.', "/")),
            Self::Array(elem) => format!("[{}", elem.descriptor()),
        }
    }
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let descriptor = parse_field_type(&mut chars)?;
        if chars.next().is_some() {
            return Err(malformed(s));
        }
        Ok(descriptor)
    }
}

fn malformed(s: &str) -> Error {
    Error::MalformedDescriptor {
        descriptor: s.to_owned(),
    }
}

fn parse_field_type(chars: &mut std::str::Chars<'_>) -> Result<FieldType, Error> {
    let original = chars.as_str();
    match chars.next() {
        Some('[') => Ok(FieldType::Array(Box::new(parse_field_type(chars)?))),
        Some('L') => {
            let name: String = chars.take_while_ref(|&c| c != ';').collect();
            match chars.next() {
                Some(';') => Ok(FieldType::Object(name.replace('/', "."))),
                _ => Err(malformed(original)),
            }
        }
        Some(c) => PrimitiveType::try_from(c)
            .map(FieldType::Base)
            .map_err(|()| malformed(original)),
        None => Err(malformed(original)),
    }
}

/// The return type of a method: `void`, or some [`FieldType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    /// `void`.
    Void,
    /// A value of the given type.
    Some(FieldType),
}

impl Display for ReturnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Void => f.write_str("void"),
            Self::Some(t) => write!(f, "{t}"),
        }
    }
}

impl ReturnType {
    /// Re-encodes this return type as its wire-format descriptor fragment,
    /// e.g. `V` or `Ljava/lang/String;`.
    #[must_use]
    pub fn descriptor(&self) -> String {
        match self {
            Self::Void => "V".to_owned(),
            Self::Some(t) => t.descriptor(),
        }
    }
}

/// A method's parameter and return types, e.g. `(Ljava/lang/String;[I)Z`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    /// The types of the method's parameters, in order.
    pub parameters_types: Vec<FieldType>,
    /// The method's return type.
    pub return_type: ReturnType,
}

impl FromStr for MethodDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if chars.next() != Some('(') {
            return Err(malformed(s));
        }
        let mut parameters_types = Vec::new();
        loop {
            match chars.as_str().chars().next() {
                Some(')') => {
                    chars.next();
                    break;
                }
                Some(_) => parameters_types.push(parse_field_type(&mut chars)?),
                None => return Err(malformed(s)),
            }
        }
        let return_type = match chars.as_str() {
            "V" => ReturnType::Void,
            rest => ReturnType::Some(parse_field_type(&mut rest.chars())?),
        };
        Ok(MethodDescriptor {
            parameters_types,
            return_type,
        })
    }
}

impl Display for MethodDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for param in &self.parameters_types {
            write!(f, "{param}")?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}

impl MethodDescriptor {
    /// Re-encodes this signature as the wire-format descriptor string a
    /// class file would store for it, e.g. `(Ljava/lang/String;[I)Z`.
    #[must_use]
    pub fn descriptor(&self) -> String {
        format!(
            "({}){}",
            self.parameters_types.iter().map(FieldType::descriptor).join(""),
            self.return_type.descriptor()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_primitive() {
        assert_eq!("I".parse::<FieldType>().unwrap(), FieldType::Base(PrimitiveType::Int));
    }

    #[test]
    fn parses_object_type() {
        assert_eq!(
            "Ljava/lang/String;".parse::<FieldType>().unwrap(),
            FieldType::Object("java.lang.String".to_owned())
        );
    }

    #[test]
    fn parses_nested_array() {
        assert_eq!(
            "[[I".parse::<FieldType>().unwrap(),
            FieldType::Array(Box::new(FieldType::Array(Box::new(FieldType::Base(
                PrimitiveType::Int
            )))))
        );
    }

    #[test]
    fn rejects_unrecognized_char() {
        assert!("Q".parse::<FieldType>().is_err());
    }

    #[test]
    fn rejects_truncated_class_descriptor() {
        assert!("Ljava/lang/String".parse::<FieldType>().is_err());
    }

    #[test]
    fn parses_method_descriptor() {
        let descriptor: MethodDescriptor = "(Ljava/lang/String;[I)Z".parse().unwrap();
        assert_eq!(
            descriptor.parameters_types,
            vec![
                FieldType::Object("java.lang.String".to_owned()),
                FieldType::Array(Box::new(FieldType::Base(PrimitiveType::Int))),
            ]
        );
        assert_eq!(
            descriptor.return_type,
            ReturnType::Some(FieldType::Base(PrimitiveType::Boolean))
        );
    }

    #[test]
    fn parses_no_arg_void_method() {
        let descriptor: MethodDescriptor = "()V".parse().unwrap();
        assert!(descriptor.parameters_types.is_empty());
        assert_eq!(descriptor.return_type, ReturnType::Void);
    }

    proptest::proptest! {
        #[test]
        fn primitive_round_trips(c in "[ZCFDBSIJ]") {
            let ty: FieldType = c.parse().unwrap();
            let rendered_tag = match ty {
                FieldType::Base(PrimitiveType::Boolean) => "Z",
                FieldType::Base(PrimitiveType::Char) => "C",
                FieldType::Base(PrimitiveType::Float) => "F",
                FieldType::Base(PrimitiveType::Double) => "D",
                FieldType::Base(PrimitiveType::Byte) => "B",
                FieldType::Base(PrimitiveType::Short) => "S",
                FieldType::Base(PrimitiveType::Int) => "I",
                FieldType::Base(PrimitiveType::Long) => "J",
                FieldType::Object(_) | FieldType::Array(_) => unreachable!(),
            };
            proptest::prop_assert_eq!(rendered_tag, c);
        }
    }

    mod proptest_support {
        use super::{FieldType, PrimitiveType, ReturnType};
        use proptest::prelude::*;

        /// A binary name made of simple dot-separated identifiers, avoiding
        /// the descriptor metacharacters (`;`, `[`, `/`) that would make the
        /// generated name ambiguous with the syntax surrounding it.
        pub(crate) fn arb_binary_name() -> impl Strategy<Value = String> {
            proptest::collection::vec("[a-zA-Z_][a-zA-Z0-9_]{0,8}", 1..4)
                .prop_map(|parts| parts.join("."))
        }

        pub(crate) fn arb_field_type() -> impl Strategy<Value = FieldType> {
            let leaf = prop_oneof![
                any::<PrimitiveType>().prop_map(FieldType::Base),
                arb_binary_name().prop_map(FieldType::Object),
            ];
            leaf.prop_recursive(4, 8, 2, |inner| {
                inner.prop_map(|elem| FieldType::Array(Box::new(elem)))
            })
        }

        pub(crate) fn arb_return_type() -> impl Strategy<Value = ReturnType> {
            prop_oneof![
                Just(ReturnType::Void),
                arb_field_type().prop_map(ReturnType::Some),
            ]
        }
    }
    use proptest_support::{arb_field_type, arb_return_type};

    proptest::proptest! {
        #[test]
        fn field_type_descriptor_round_trips(ty in arb_field_type()) {
            let parsed: FieldType = ty.descriptor().parse().unwrap();
            proptest::prop_assert_eq!(parsed, ty);
        }

        #[test]
        fn method_descriptor_round_trips(
            parameters_types in proptest::collection::vec(arb_field_type(), 0..4),
            return_type in arb_return_type(),
        ) {
            let descriptor = MethodDescriptor { parameters_types, return_type };
            let parsed: MethodDescriptor = descriptor.descriptor().parse().unwrap();
            proptest::prop_assert_eq!(parsed, descriptor);
        }
    }
}
