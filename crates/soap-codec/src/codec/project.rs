//! Element tree onto a declared record.
//!
//! The projector walks the record's descriptor table. For every field that is
//! not excluded it looks up the child named by the field's wire name, reads it
//! with the strict or lenient getter of the field's kind and stores the result.
//!
//! Under the strict policy a missing child is an error; under the lenient
//! policy the field is reset to its default. Nested records, sequences and
//! maps cannot be projected.

use tracing::{debug, trace};

use crate::error::{DecodeError, ProjectError};
use crate::limits::MAX_DEPTH;
use crate::model::{Element, FieldKind, FieldSpec, FloatWidth, IntWidth, Native, Record, WireType};

/// Options for [`project_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectOptions {
    /// Require exact wire types and the presence of every field.
    pub strict: bool,
    /// UTC offset, in minutes, for lenient timestamps written without one.
    pub local_offset_min: i16,
    /// Maximum depth of the projected tree.
    pub max_depth: usize,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self {
            strict: false,
            local_offset_min: 0,
            max_depth: MAX_DEPTH,
        }
    }
}

impl ProjectOptions {
    /// Creates lenient options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates strict options.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Sets the offset used for lenient timestamps without one.
    pub fn with_local_offset(mut self, offset_min: i16) -> Self {
        self.local_offset_min = offset_min;
        self
    }
}

/// Projects `element` onto `record` under the strict or lenient policy.
///
/// Fields are filled in declaration order; on error, fields before the failing
/// one keep their projected values.
pub fn project<R: Record>(element: &Element, record: &mut R, strict: bool) -> Result<(), ProjectError> {
    let options = ProjectOptions {
        strict,
        ..ProjectOptions::default()
    };
    project_with(element, record, &options)
}

/// Projects `element` onto `record` with explicit options.
pub fn project_with<R: Record>(
    element: &Element,
    record: &mut R,
    options: &ProjectOptions,
) -> Result<(), ProjectError> {
    if element.depth() > options.max_depth {
        return Err(ProjectError::NotAContainer {
            name: element.name.clone(),
            source: DecodeError::DepthExceedsLimit {
                max: options.max_depth,
            },
        });
    }

    check_container(element)?;

    let schema = R::schema();
    for spec in &schema.fields {
        if spec.directive.excluded {
            continue;
        }
        let wire_name = spec.wire_name();
        let child = element.field(wire_name).map_err(|source| ProjectError::Field {
            field: wire_name.to_string(),
            source,
        })?;

        let Some(child) = child else {
            if options.strict {
                return Err(ProjectError::MissingField {
                    field: wire_name.to_string(),
                });
            }
            record.reset(spec.ident);
            debug!(record = schema.name, field = wire_name, "field missing, reset to default");
            continue;
        };

        if !spec.kind.is_projectable() {
            return Err(ProjectError::UnsupportedFieldType {
                field: wire_name.to_string(),
                kind: spec.kind.name(),
            });
        }

        // Optional fields take a nil child as absent under both policies.
        if child.nil && record.assign(spec.ident, Native::Null) {
            trace!(record = schema.name, field = wire_name, "projected nil");
            continue;
        }

        let value = read_field(child, spec, options).map_err(|source| ProjectError::Field {
            field: wire_name.to_string(),
            source,
        })?;
        if !record.assign(spec.ident, value) {
            return Err(ProjectError::UnsupportedFieldType {
                field: wire_name.to_string(),
                kind: spec.kind.name(),
            });
        }
        trace!(record = schema.name, field = wire_name, "projected field");
    }
    Ok(())
}

/// Fails unless `element` is a non-nil Struct or Map.
fn check_container(element: &Element) -> Result<(), ProjectError> {
    let source = if element.nil {
        DecodeError::NilContainer {
            name: element.name.clone(),
        }
    } else if matches!(element.wire(), Some(WireType::Struct | WireType::Map)) {
        return Ok(());
    } else {
        DecodeError::TypeMismatch {
            actual: element.local_type().to_string(),
            expected: "Struct or Map",
        }
    };
    Err(ProjectError::NotAContainer {
        name: element.name.clone(),
        source,
    })
}

/// Reads one child with the getter that matches the field's kind.
fn read_field(
    child: &Element,
    spec: &FieldSpec,
    options: &ProjectOptions,
) -> Result<Native<'static>, DecodeError> {
    let strict = options.strict;
    let native = match spec.kind {
        FieldKind::String => {
            let text = if strict { child.string()? } else { child.as_string()? };
            Native::from(text.to_string())
        }
        FieldKind::Bool => Native::Bool(if strict { child.boolean()? } else { child.as_bool()? }),
        FieldKind::Int(width) => {
            let v = if strict { child.int(width)? } else { child.as_int(width)? };
            narrow_int(v, width)
        }
        FieldKind::Uint(width) => {
            let v = if strict { child.uint(width)? } else { child.as_uint(width)? };
            narrow_uint(v, width)
        }
        FieldKind::Float(width) => {
            let v = if strict { child.float(width)? } else { child.as_float(width)? };
            match width {
                FloatWidth::W32 => Native::F32(v as f32),
                FloatWidth::W64 => Native::F64(v),
            }
        }
        FieldKind::Timestamp => Native::Timestamp(if strict {
            child.timestamp()?
        } else {
            child.as_timestamp_in(options.local_offset_min)?
        }),
        FieldKind::Record | FieldKind::Sequence | FieldKind::Map => Native::Null,
    };
    Ok(native)
}

fn narrow_int(v: i64, width: IntWidth) -> Native<'static> {
    match width {
        IntWidth::W8 => Native::I8(v as i8),
        IntWidth::W16 => Native::I16(v as i16),
        IntWidth::W32 => Native::I32(v as i32),
        IntWidth::W64 => Native::I64(v),
    }
}

fn narrow_uint(v: u64, width: IntWidth) -> Native<'static> {
    match width {
        IntWidth::W8 => Native::U8(v as u8),
        IntWidth::W16 => Native::U16(v as u16),
        IntWidth::W32 => Native::U32(v as u32),
        IntWidth::W64 => Native::U64(v),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::codec::encode_record;
    use crate::model::RecordSchema;
    use crate::soap_record;
    use crate::util::Timestamp;

    soap_record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Pair {
            a: String => "A",
            b: i32 => "B,omitempty",
        }
    }

    soap_record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Count {
            n: i32 => "N",
        }
    }

    soap_record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Everything {
            s: String => "S",
            flag: bool => "Flag",
            i8v: i8,
            u16v: u16,
            i64v: i64,
            f32v: f32,
            f64v: f64,
            when: Timestamp => "When",
            maybe: Option<u32> => "Maybe",
            secret: String => "-",
            token: String => "Token,in",
        }
    }

    soap_record! {
        #[derive(Debug, Default)]
        struct WithList {
            tags: Vec<String> => "Tags",
        }
    }

    soap_record! {
        #[derive(Debug, Default)]
        struct WithMap {
            index: BTreeMap<String, i64> => "Index",
        }
    }

    soap_record! {
        #[derive(Debug, Default)]
        struct WithNested {
            inner: Pair => "Inner",
        }
    }

    fn record(children: Vec<Element>) -> Element {
        Element::compound("r", WireType::Struct, children)
    }

    #[test]
    fn test_omitted_field_lenient_vs_strict() {
        let encoded = encode_record("Pair", &Pair { a: "x".into(), b: 0 }).unwrap();
        assert_eq!(encoded.children.len(), 1);

        let mut lenient = Pair { a: String::new(), b: 9 };
        project(&encoded, &mut lenient, false).unwrap();
        assert_eq!(lenient, Pair { a: "x".into(), b: 0 });

        let mut strict = Pair::default();
        let err = project(&encoded, &mut strict, true).unwrap_err();
        assert_eq!(err, ProjectError::MissingField { field: "B".into() });
        // Fields before the failure were already filled.
        assert_eq!(strict.a, "x");
    }

    #[test]
    fn test_strict_width_mismatch() {
        let e = record(vec![Element::scalar("N", WireType::Long, "42")]);
        let mut out = Count::default();
        let err = project(&e, &mut out, true).unwrap_err();
        assert_eq!(err.field(), Some("N"));
        let ProjectError::Field { source, .. } = &err else {
            panic!("expected field error");
        };
        assert_eq!(
            *source,
            DecodeError::TypeMismatch {
                actual: "long".into(),
                expected: "int"
            }
        );

        project(&e, &mut out, false).unwrap();
        assert_eq!(out.n, 42);

        let big = record(vec![Element::scalar("N", WireType::Long, "3000000000")]);
        let err = project(&big, &mut out, false).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Field {
                source: DecodeError::BadValue { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_round_trip_strict() {
        let original = Everything {
            s: "hello".into(),
            flag: true,
            i8v: -5,
            u16v: 65000,
            i64v: i64::MAX,
            f32v: 0.1,
            f64v: -1.0 / 3.0,
            when: Timestamp::new(1_700_000_000, 123_456_789, -300).unwrap(),
            maybe: Some(4),
            secret: "kept out".into(),
            token: "kept out".into(),
        };
        let e = encode_record("Everything", &original).unwrap();
        let names: Vec<&str> = e.children.iter().map(|c| c.name.as_str()).collect();
        assert!(!names.contains(&"-"));
        assert!(!names.contains(&"Token"));

        // Token is decode-only: supply it by hand.
        let e = e.with_child(Element::scalar("Token", WireType::String, "t"));
        let mut back = Everything::default();
        project(&e, &mut back, true).unwrap();
        assert_eq!(
            back,
            Everything {
                secret: String::new(),
                token: "t".into(),
                ..original
            }
        );
    }

    #[test]
    fn test_nil_option_projects_to_none() {
        let e = record(vec![
            Element::scalar("S", WireType::String, ""),
            Element::scalar("Flag", WireType::Boolean, "false"),
            Element::nil("Maybe"),
        ]);
        let mut out = Everything {
            maybe: Some(1),
            ..Everything::default()
        };
        project(&e, &mut out, false).unwrap();
        assert_eq!(out.maybe, None);
    }

    #[test]
    fn test_nil_scalar_policies() {
        let e = record(vec![Element::nil("N")]);
        let mut out = Count { n: 5 };
        project(&e, &mut out, false).unwrap();
        assert_eq!(out.n, 0);

        let err = project(&e, &mut out, true).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Field {
                source: DecodeError::TypeMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_lenient_coercions() {
        let e = record(vec![
            Element::new("S").with_text("text"),
            Element::scalar("Flag", WireType::String, "T"),
            Element::scalar("i8v", WireType::Long, "-12"),
            Element::scalar("u16v", WireType::String, " 80 "),
            Element::scalar("f32v", WireType::String, "2.5"),
            Element::scalar("When", WireType::String, "2024-01-02 03:04"),
        ]);
        let options = ProjectOptions::new().with_local_offset(120);
        let mut out = Everything::default();
        project_with(&e, &mut out, &options).unwrap();
        assert_eq!(out.s, "text");
        assert!(out.flag);
        assert_eq!(out.i8v, -12);
        assert_eq!(out.u16v, 80);
        assert_eq!(out.f32v, 2.5);
        assert_eq!(out.when.format_soap(), "2024-01-02T03:04:00.000000000+02:00");
        assert_eq!(out.i64v, 0);
    }

    #[test]
    fn test_unsupported_field_kinds() {
        let e = record(vec![Element::compound("Tags", WireType::Array, vec![])]);
        let err = project(&e, &mut WithList::default(), false).unwrap_err();
        assert_eq!(
            err,
            ProjectError::UnsupportedFieldType {
                field: "Tags".into(),
                kind: "sequence"
            }
        );
        assert!(err.is_contract_violation());

        let e = record(vec![Element::compound("Index", WireType::Map, vec![])]);
        assert!(project(&e, &mut WithMap::default(), true).is_err());

        let e = record(vec![Element::compound("Inner", WireType::Struct, vec![])]);
        let err = project(&e, &mut WithNested::default(), false).unwrap_err();
        assert!(err.to_string().contains("record"));
    }

    #[test]
    fn test_missing_unsupported_field_is_reset_leniently() {
        let mut out = WithList {
            tags: vec!["a".into()],
        };
        project(&record(vec![]), &mut out, false).unwrap();
        assert!(out.tags.is_empty());
    }

    #[test]
    fn test_requires_container() {
        let scalar = Element::scalar("r", WireType::Int, "1");
        let err = project(&scalar, &mut Count::default(), false).unwrap_err();
        assert!(matches!(err, ProjectError::NotAContainer { .. }));
        assert_eq!(err.field(), None);

        let nil = Element::nil("r").with_type("SOAP-ENC:Struct");
        let err = project(&nil, &mut Count::default(), false).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::NotAContainer {
                source: DecodeError::NilContainer { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_map_entry_names_field() {
        let broken = Element::map_entry(
            Element::scalar("key", WireType::String, "N"),
            Element::scalar("extra", WireType::Int, "3"),
        );
        let map = Element::compound("r", WireType::Map, vec![broken]);
        let err = project(&map, &mut Count::default(), false).unwrap_err();
        assert_eq!(err.field(), Some("N"));
        assert!(matches!(
            err,
            ProjectError::Field {
                source: DecodeError::MapItemWithoutValue,
                ..
            }
        ));

        let good = Element::map_entry(
            Element::scalar("key", WireType::String, "N"),
            Element::scalar("value", WireType::Int, "3"),
        );
        let map = Element::compound("r", WireType::Map, vec![good]);
        let mut out = Count::default();
        project(&map, &mut out, true).unwrap();
        assert_eq!(out.n, 3);
    }

    /// Declares an `i32` field but accepts nothing.
    #[derive(Default)]
    struct Refusing;

    impl Record for Refusing {
        fn schema() -> &'static RecordSchema {
            static SCHEMA: std::sync::OnceLock<RecordSchema> = std::sync::OnceLock::new();
            SCHEMA.get_or_init(|| {
                RecordSchema::new(
                    "Refusing",
                    vec![FieldSpec::new("n", "N", FieldKind::Int(IntWidth::W32))],
                )
            })
        }

        fn field_values(&self) -> Vec<Native<'_>> {
            vec![Native::I32(0)]
        }

        fn assign(&mut self, _ident: &str, _value: Native<'_>) -> bool {
            false
        }

        fn reset(&mut self, _ident: &str) -> bool {
            true
        }
    }

    #[test]
    fn test_rejected_assignment_is_reported() {
        let e = record(vec![Element::scalar("N", WireType::Int, "1")]);
        let err = project(&e, &mut Refusing, true).unwrap_err();
        assert_eq!(
            err,
            ProjectError::UnsupportedFieldType {
                field: "N".into(),
                kind: "i32"
            }
        );
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_depth_limit() {
        let deep = record(vec![Element::compound(
            "x",
            WireType::Struct,
            vec![Element::scalar("y", WireType::Int, "1")],
        )]);
        let options = ProjectOptions {
            max_depth: 2,
            ..ProjectOptions::default()
        };
        let err = project_with(&deep, &mut Count::default(), &options).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::NotAContainer {
                source: DecodeError::DepthExceedsLimit { max: 2 },
                ..
            }
        ));
    }
}
