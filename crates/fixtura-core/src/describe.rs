use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap, HashSet, LinkedList, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, Mutex, RwLock};
use std::time::SystemTime;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::shape::{ArrayLen, FloatKind, IntKind, Shape, TemporalKind, UnsupportedReason};

/// Compile-time description of a generatable type.
///
/// Implemented here for std and chrono types; user records and enums use
/// [`describe_record!`](crate::describe_record), [`describe_enum!`](crate::describe_enum)
/// and [`describe_opaque!`](crate::describe_opaque).
pub trait Describe {
    fn shape() -> Shape;
}

macro_rules! describe_as {
    ($shape:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn shape() -> Shape {
                    $shape
                }
            }
        )+
    };
}

describe_as!(Shape::Text => String, Box<str>, Cow<'_, str>);
describe_as!(Shape::Bool => bool);
describe_as!(Shape::Char => char);
describe_as!(Shape::Int(IntKind::I8) => i8);
describe_as!(Shape::Int(IntKind::I16) => i16);
describe_as!(Shape::Int(IntKind::I32) => i32);
describe_as!(Shape::Int(IntKind::I64) => i64);
describe_as!(Shape::Int(IntKind::Isize) => isize);
describe_as!(Shape::Int(IntKind::U8) => u8);
describe_as!(Shape::Int(IntKind::U16) => u16);
describe_as!(Shape::Int(IntKind::U32) => u32);
describe_as!(Shape::Int(IntKind::U64) => u64);
describe_as!(Shape::Int(IntKind::Usize) => usize);
describe_as!(Shape::Float(FloatKind::F32) => f32);
describe_as!(Shape::Float(FloatKind::F64) => f64);
describe_as!(Shape::Temporal(TemporalKind::SystemTime) => SystemTime);
describe_as!(Shape::Temporal(TemporalKind::Instant) => DateTime<Utc>);
describe_as!(Shape::Temporal(TemporalKind::NaiveDateTime) => NaiveDateTime);
describe_as!(Shape::Temporal(TemporalKind::NaiveDate) => NaiveDate);

impl<T: Describe> Describe for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(Box::new(T::shape()))
    }
}

impl<T: Describe> Describe for Box<T> {
    fn shape() -> Shape {
        T::shape()
    }
}

impl<T: Describe> Describe for Rc<T> {
    fn shape() -> Shape {
        T::shape()
    }
}

impl<T: Describe> Describe for Arc<T> {
    fn shape() -> Shape {
        T::shape()
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn shape() -> Shape {
        Shape::List(Box::new(T::shape()))
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn shape() -> Shape {
        Shape::List(Box::new(T::shape()))
    }
}

impl<T: Describe> Describe for LinkedList<T> {
    fn shape() -> Shape {
        Shape::List(Box::new(T::shape()))
    }
}

impl<T: Describe> Describe for Box<[T]> {
    fn shape() -> Shape {
        let element = T::shape();
        match element.scalar_kind() {
            Some(element) => Shape::Array {
                element,
                len: ArrayLen::Configured,
            },
            None => Shape::List(Box::new(element)),
        }
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn shape() -> Shape {
        let element = T::shape();
        match element.scalar_kind() {
            Some(element) => Shape::Array {
                element,
                len: ArrayLen::Fixed(N),
            },
            None => Shape::Unsupported {
                container: format!("[{}; {N}]", element.type_name()),
                reason: UnsupportedReason::AmbiguousGenericArgument(
                    "fixed-size arrays only hold primitive elements".to_string(),
                ),
            },
        }
    }
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn shape() -> Shape {
        Shape::Set(Box::new(T::shape()))
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn shape() -> Shape {
        Shape::Set(Box::new(T::shape()))
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::Map(Box::new(K::shape()), Box::new(V::shape()))
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::Map(Box::new(K::shape()), Box::new(V::shape()))
    }
}

fn unsupported(container: &str) -> Shape {
    Shape::Unsupported {
        container: container.to_string(),
        reason: UnsupportedReason::ContainerKind,
    }
}

impl<T> Describe for Cell<T> {
    fn shape() -> Shape {
        unsupported("Cell")
    }
}

impl<T> Describe for RefCell<T> {
    fn shape() -> Shape {
        unsupported("RefCell")
    }
}

impl<T> Describe for Mutex<T> {
    fn shape() -> Shape {
        unsupported("Mutex")
    }
}

impl<T> Describe for RwLock<T> {
    fn shape() -> Shape {
        unsupported("RwLock")
    }
}

impl<T> Describe for BinaryHeap<T> {
    fn shape() -> Shape {
        unsupported("BinaryHeap")
    }
}

impl<T, E> Describe for Result<T, E> {
    fn shape() -> Shape {
        unsupported("Result")
    }
}

/// Implements [`Describe`] for a struct deserializable with serde.
///
/// Fields are listed in declaration order. Use `field as "name": Type` when
/// serde renames the field, so generated paths and JSON keys agree.
///
/// ```
/// use fixtura_core::{describe_record, Describe, Shape};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct Order {
///     order_id: i64,
///     tags: Vec<String>,
/// }
///
/// describe_record!(Order {
///     order_id as "orderId": i64,
///     tags: Vec<String>,
/// });
///
/// assert!(matches!(Order::shape(), Shape::Record(record) if record.fields.len() == 2));
/// ```
#[macro_export]
macro_rules! describe_record {
    ($ty:ty { $( $field:ident $(as $rename:literal)? : $fty:ty ),* $(,)? }) => {
        impl $crate::Describe for $ty {
            fn shape() -> $crate::Shape {
                $crate::Shape::Record(
                    $crate::RecordShape::new(
                        stringify!($ty),
                        vec![
                            $( $crate::FieldShape::of::<$fty>($crate::__field_name!($field $(, $rename)?)) ),*
                        ],
                    )
                    .with_check(|value| {
                        <$ty as $crate::__private::serde::Deserialize>::deserialize(value).map(|_| ())
                    }),
                )
            }
        }
    };
}

/// Implements [`Describe`] for a unit-variant enum; the first variant is generated.
#[macro_export]
macro_rules! describe_enum {
    ($ty:ty { $( $variant:ident $(as $rename:literal)? ),* $(,)? }) => {
        impl $crate::Describe for $ty {
            fn shape() -> $crate::Shape {
                let variants: ::std::vec::Vec<&str> =
                    vec![ $( $crate::__field_name!($variant $(, $rename)?) ),* ];
                $crate::Shape::Enum($crate::EnumShape::new(stringify!($ty), variants))
            }
        }
    };
}

/// Implements [`Describe`] for a type that has no canonical constructor.
///
/// Generating such a field fails unless an override covers its path.
#[macro_export]
macro_rules! describe_opaque {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Describe for $ty {
                fn shape() -> $crate::Shape {
                    $crate::Shape::Opaque(stringify!($ty).to_string())
                }
            }
        )+
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $rename:literal) => {
        $rename
    };
}
