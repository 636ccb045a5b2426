use prism_ast::{Builtin, Constant, ObjectKind, TyKind, is_const, strip_qualifiers};
use prism_parse::{TypeEnv, parse_declarations, parse_operand, parse_type};

#[test]
fn templated_objects_and_qualifiers_parse() {
    let env = TypeEnv::new();
    let tex = parse_type("Texture2D<float4>", &env).expect("texture should parse");
    match &*tex {
        TyKind::Object { kind, elem } => {
            assert_eq!(*kind, ObjectKind::Texture2D);
            assert_eq!(elem.as_ref().map(|e| e.to_string()), Some("float4".to_string()));
        }
        other => panic!("unexpected type {other:?}"),
    }

    let ms = parse_type("Texture2DMS<float4, 8>", &env).expect("sample count accepted");
    assert_eq!(ms.to_string(), "Texture2DMS<float4>");

    let c = parse_type("const float3&", &env).expect("qualified type should parse");
    assert!(is_const(&c));
    assert_eq!(strip_qualifiers(&c).to_string(), "float3");
}

#[test]
fn long_form_vector_matrix_and_arrays() {
    let env = TypeEnv::new();
    let v = parse_type("vector<int, 3>", &env).unwrap();
    assert_eq!(v.to_string(), "int3");
    let m = parse_type("matrix<min16float, 2, 2>", &env).unwrap();
    assert_eq!(m.to_string(), "min16float2x2");
    let a = parse_type("float2[4][3]", &env).unwrap();
    match &*a {
        TyKind::Array { elem, len } => {
            assert_eq!(*len, Some(4));
            assert_eq!(elem.to_string(), "float2[3]");
        }
        other => panic!("unexpected type {other:?}"),
    }
    assert_eq!(parse_type("uint[]", &env).unwrap().to_string(), "uint[]");
}

#[test]
fn dependent_types_use_dollar_prefix() {
    let env = TypeEnv::new();
    let t = parse_type("$T", &env).unwrap();
    assert_eq!(*t, TyKind::TemplateParam("T".into()));
}

#[test]
fn struct_declarations_with_bases_and_enums() {
    let mut env = TypeEnv::new();
    parse_declarations(
        r#"
        struct Base { float a; int2 b; };
        struct Derived : Base { float4 c; uint d[2]; };
        enum Mode { A, B };
        enum class Scoped;
        "#,
        &mut env,
    )
    .expect("declarations should parse");

    let derived = env.lookup_struct("Derived").unwrap();
    let base = env.lookup_struct("Base").unwrap();
    assert!(derived.is_derived_from(base));
    assert_eq!(derived.fields[1].ty.to_string(), "uint[2]");
    assert!(!env.lookup_enum("Mode").unwrap().scoped);
    assert!(env.lookup_enum("Scoped").unwrap().scoped);

    let ty = parse_type("Derived", &env).unwrap();
    assert!(matches!(&*ty, TyKind::Struct(d) if d.name == "Derived"));
}

#[test]
fn unknown_base_struct_is_rejected() {
    let mut env = TypeEnv::new();
    let err = parse_declarations("struct S : Missing { float a; };", &mut env).unwrap_err();
    assert!(err.to_string().contains("unknown base struct"));
}

#[test]
fn operands_carry_literal_constants() {
    let env = TypeEnv::new();
    let i = parse_operand("-3", &env).unwrap();
    assert_eq!(*i.ty, TyKind::Builtin(Builtin::LiteralInt));
    assert_eq!(i.constant, Some(Constant::Int(-3)));

    let u = parse_operand("7u", &env).unwrap();
    assert_eq!(*u.ty, TyKind::Builtin(Builtin::Uint));

    let f = parse_operand("0.5", &env).unwrap();
    assert_eq!(f.constant, Some(Constant::Float(0.5)));

    let typed = parse_operand("int(40000)", &env).unwrap();
    assert_eq!(*typed.ty, TyKind::Builtin(Builtin::Int));
    assert_eq!(typed.constant, Some(Constant::Int(40000)));

    let plain = parse_operand("float2", &env).unwrap();
    assert_eq!(plain.constant, None);
}

#[test]
fn trailing_tokens_are_an_error() {
    let env = TypeEnv::new();
    let err = parse_type("float4 float", &env).unwrap_err();
    assert!(err.to_string().contains("unexpected"));
}
