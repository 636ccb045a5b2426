use prism_ast::{Operand, Ty};
use prism_core::intrinsics::{
    C, CatalogSource, ComponentRef, IntrinsicFlags, R, SlotSpec, TemplateRef, tables,
};
use prism_core::{
    BadArg, CallSite, ComponentStep, DimensionStep, ElementKind, Intrinsic, LangVersion, Remarks,
    Resolution, ResolveError, Session, SessionOptions, TableCatalog,
};
use prism_parse::{TypeEnv, parse_declarations, parse_operand, parse_type};

fn ty(src: &str) -> Ty {
    parse_type(src, &TypeEnv::new()).expect("type should parse")
}

fn args(srcs: &[&str]) -> Vec<Operand> {
    let env = TypeEnv::new();
    srcs.iter()
        .map(|s| parse_operand(s, &env).expect("operand should parse"))
        .collect()
}

fn resolve(session: &mut Session, name: &str, srcs: &[&str]) -> Result<Resolution, ResolveError> {
    let args = args(srcs);
    session.resolve(&CallSite::new(name, &args))
}

#[test]
fn mixed_float_and_int_arguments_share_a_float_component() {
    let mut session = Session::default();
    let r = resolve(&mut session, "max", &["float", "int"]).unwrap();
    assert_eq!(r.instance.ret, ty("float"));
    assert_eq!(r.instance.params, vec![ty("float"), ty("float")]);
    assert_eq!(r.conversions[1].into_param.component, ComponentStep::IntToFloat);
}

#[test]
fn literal_only_calls_fall_back_to_float() {
    let mut session = Session::default();
    let r = resolve(&mut session, "max", &["1", "2"]).unwrap();
    assert_eq!(r.instance.ret, ty("float"));
}

#[test]
fn float_only_intrinsics_reject_int_arguments() {
    let mut session = Session::default();
    let err = resolve(&mut session, "sin", &["int3"]).unwrap_err();
    assert_eq!(
        err,
        ResolveError::NoMatch {
            name: "sin".to_string(),
            bad_arg: Some(BadArg::Argument(0)),
        }
    );

    let r = resolve(&mut session, "sin", &["2"]).unwrap();
    assert_eq!(r.instance.ret, ty("float"));
}

#[test]
fn bool_arguments_do_not_blend_into_numeric_overloads() {
    let mut session = Session::default();
    let err = resolve(&mut session, "max", &["bool", "int"]).unwrap_err();
    assert!(matches!(err, ResolveError::NoMatch { .. }));
}

#[test]
fn min_precision_survives_mixing_with_int() {
    let mut session = Session::default();
    let r = resolve(&mut session, "max", &["min16float2", "int2"]).unwrap();
    assert_eq!(r.instance.ret, ty("min16float2"));
}

#[test]
fn double_only_intrinsics_reject_float_but_accept_literals() {
    let mut session = Session::default();
    let err = resolve(&mut session, "fma", &["float", "float", "float"]).unwrap_err();
    assert!(matches!(err, ResolveError::NoMatch { .. }));

    let r = resolve(&mut session, "fma", &["1.0", "double", "double"]).unwrap();
    assert_eq!(r.instance.ret, ty("double"));
}

#[test]
fn no_match_names_the_first_bad_argument() {
    let mut session = Session::default();
    let err = resolve(&mut session, "dot", &["float3", "Texture2D<float4>"]).unwrap_err();
    assert_eq!(
        err,
        ResolveError::NoMatch {
            name: "dot".to_string(),
            bad_arg: Some(BadArg::Argument(1)),
        }
    );
    assert!(err.to_string().contains("argument 2"));
}

#[test]
fn unknown_names_report_no_match_without_an_argument() {
    let mut session = Session::default();
    let err = resolve(&mut session, "frobnicate", &["float"]).unwrap_err();
    assert_eq!(
        err,
        ResolveError::NoMatch {
            name: "frobnicate".to_string(),
            bad_arg: None,
        }
    );
}

#[test]
fn mixed_scalar_product_is_ambiguous_across_equal_cost_shapes() {
    let mut session = Session::default();
    let err = resolve(&mut session, "mul", &["int", "float"]).unwrap_err();
    match err {
        ResolveError::Ambiguous { name, tied } => {
            assert_eq!(name, "mul");
            assert!(tied > 1 && tied <= 9, "tied = {tied}");
        }
        other => panic!("expected an ambiguity, got {other:?}"),
    }

    let r = resolve(&mut session, "mul", &["float", "float"]).unwrap();
    assert_eq!(r.instance.ret, ty("float"));
    assert_eq!(r.candidates_considered, 9);
}

#[test]
fn differently_templated_textures_do_not_convert() {
    let session = Session::default();
    let src = Operand::new(ty("Texture2D<float4>"));
    assert!(session.can_convert(&src, &ty("Texture2D<int>"), false).is_err());
    assert!(session.can_convert(&src, &ty("Texture2D<int>"), true).is_err());
    let seq = session.can_convert(&src, &ty("Texture2D<float4>"), false).unwrap();
    assert!(seq.remarks.contains(Remarks::IDENTICAL));
}

#[test]
fn matrix_vector_product_ties_the_inner_dimension() {
    let mut session = Session::default();
    let r = resolve(&mut session, "mul", &["float3x4", "float4"]).unwrap();
    assert_eq!(r.instance.ret, ty("float3"));
    assert_eq!(r.cost, 0);
}

#[test]
fn out_parameters_round_trip_through_references() {
    let mut session = Session::default();
    let r = resolve(&mut session, "sincos", &["float2", "float2", "float2"]).unwrap();
    assert_eq!(r.instance.ret, ty("void"));
    assert_eq!(r.instance.params[1].to_string(), "float2&");
    assert!(r.conversions[1].out_of_param.is_some());
    assert!(r.conversions[0].out_of_param.is_none());
}

#[test]
fn const_arguments_cannot_bind_out_parameters() {
    let mut session = Session::default();
    let err = resolve(&mut session, "sincos", &["float", "const float", "float"]).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::NoMatch {
            bad_arg: Some(BadArg::Argument(1)),
            ..
        }
    ));
}

#[test]
fn sampling_a_texture_returns_its_element() {
    let mut session = Session::default();
    let tex = ty("Texture2D<float3>");
    let args = args(&["SamplerState", "float2"]);
    let r = session.resolve(&CallSite::new("Sample", &args).on(&tex)).unwrap();
    assert_eq!(r.instance.ret, ty("float3"));
    assert!(matches!(r.signature.source, CatalogSource::Builtin("Texture2D")));
}

#[test]
fn templated_buffer_loads_follow_the_explicit_argument() {
    let mut session = Session::default();
    let buf = ty("ByteAddressBuffer");
    let explicit = ty("float4");
    let args = args(&["uint"]);
    let r = session
        .resolve(&CallSite::new("Load", &args).on(&buf).with_template(&explicit))
        .unwrap();
    assert_eq!(r.instance.ret, explicit);

    let r = session.resolve(&CallSite::new("Load", &args).on(&buf)).unwrap();
    assert_eq!(r.instance.ret, ty("uint"));
}

const SCALE: &[SlotSpec] = &[
    SlotSpec::new(
        "",
        TemplateRef::Slot(0),
        ComponentRef::Slot(0),
        &tables::SHAPE_ANY,
        &tables::COMP_FLOAT,
        R,
        C,
    ),
    SlotSpec::new(
        "x",
        TemplateRef::Slot(0),
        ComponentRef::Slot(0),
        &tables::SHAPE_ANY,
        &tables::COMP_FLOAT,
        R,
        C,
    ),
];

fn scale_catalog(name: &str) -> Box<TableCatalog> {
    Box::new(TableCatalog::new(name, "").with_entry(Intrinsic::new(
        "scale",
        900,
        IntrinsicFlags::READ_NONE,
        SCALE,
    )))
}

#[test]
fn registered_catalogs_extend_the_global_namespace() {
    let mut session = Session::default();
    session.register_catalog(scale_catalog("ext"));
    let r = resolve(&mut session, "scale", &["float3"]).unwrap();
    assert_eq!(r.instance.ret, ty("float3"));
    assert_eq!(r.instance.opcode, 900);
    assert_eq!(r.signature.source, CatalogSource::External(0));
}

#[test]
fn identical_overloads_from_two_catalogs_are_ambiguous() {
    let mut session = Session::default();
    session.register_catalog(scale_catalog("first"));
    session.register_catalog(scale_catalog("second"));
    let err = resolve(&mut session, "scale", &["float"]).unwrap_err();
    assert_eq!(
        err,
        ResolveError::Ambiguous {
            name: "scale".to_string(),
            tied: 2,
        }
    );
}

#[test]
fn instances_are_shared_across_equal_calls_only() {
    let mut session = Session::default();
    let a = resolve(&mut session, "abs", &["float2"]).unwrap();
    let b = resolve(&mut session, "abs", &["float2"]).unwrap();
    let c = resolve(&mut session, "abs", &["int2"]).unwrap();
    assert_eq!(a.instance.id, b.instance.id);
    assert_ne!(a.instance.id, c.instance.id);
    assert_eq!(session.cache().len(), 2);
    assert_eq!(session.cache().hits(), 1);
}

#[test]
fn one_by_one_matrix_splats_into_a_vector() {
    let session = Session::default();
    let seq = session
        .can_convert(&Operand::new(ty("float1x1")), &ty("float3"), false)
        .unwrap();
    assert_eq!(seq.dimension, DimensionStep::Splat);
    assert_eq!(seq.component, ComponentStep::Identity);
}

#[test]
fn vector_growth_needs_an_explicit_cast() {
    let session = Session::default();
    let src = Operand::new(ty("float2"));
    assert!(session.can_convert(&src, &ty("float4"), false).is_err());
    let seq = session.can_convert(&src, &ty("float4"), true).unwrap();
    assert_eq!(seq.dimension, DimensionStep::Extend);

    let seq = session
        .can_convert(&Operand::new(ty("float4")), &ty("float2"), false)
        .unwrap();
    assert_eq!(seq.dimension, DimensionStep::Truncate);
    assert!(seq.remarks.contains(Remarks::ELT_TRUNCATION));
}

#[test]
fn narrowing_flags_precision_loss_unless_the_constant_fits() {
    let session = Session::default();
    let seq = session
        .can_convert(&Operand::new(ty("double")), &ty("float"), false)
        .unwrap();
    assert_eq!(seq.component, ComponentStep::FloatingConversion);
    assert!(seq.remarks.contains(Remarks::PRECISION_LOSS));

    let fits = &args(&["int64_t(12)"])[0];
    let seq = session.can_convert(fits, &ty("int"), false).unwrap();
    assert!(!seq.remarks.contains(Remarks::PRECISION_LOSS));
}

#[test]
fn void_converts_only_to_void() {
    let session = Session::default();
    let void = Operand::new(ty("void"));
    assert!(session.can_convert(&void, &ty("void"), false).is_ok());
    assert!(session.can_convert(&void, &ty("float"), true).is_err());

    let value = Operand::new(ty("float"));
    assert!(session.can_convert(&value, &ty("void"), false).is_err());
    let seq = session.can_convert(&value, &ty("void"), true).unwrap();
    assert!(seq.remarks.contains(Remarks::TO_VOID));
}

#[test]
fn structs_convert_leafwise_and_to_their_bases() {
    let mut env = TypeEnv::new();
    parse_declarations(
        "struct Base { float a; int b; }; struct Derived : Base { float c; };",
        &mut env,
    )
    .unwrap();
    let base = parse_type("Base", &env).unwrap();
    let derived = parse_type("Derived", &env).unwrap();
    let session = Session::default();

    let seq = session
        .can_convert(&Operand::new(derived), &base, false)
        .unwrap();
    assert_eq!(seq.dimension, DimensionStep::DerivedToBase);

    assert!(session.can_convert(&Operand::new(base.clone()), &ty("float2"), false).is_err());
    let seq = session
        .can_convert(&Operand::new(base), &ty("float2"), true)
        .unwrap();
    assert_eq!(seq.dimension, DimensionStep::Flat);
}

#[test]
fn sixteen_bit_types_make_half_a_real_half() {
    let opts = SessionOptions {
        enable_16bit_types: true,
        ..SessionOptions::default()
    };
    let session = Session::new(opts);
    let half = session.classify(&ty("half"));
    assert_eq!(half.element, ElementKind::Float16);

    let session = Session::default();
    assert_eq!(
        session.classify(&ty("half")).element,
        ElementKind::Float32
    );
}

fn struct_env() -> TypeEnv {
    let mut env = TypeEnv::new();
    parse_declarations(
        "struct Light { float3 dir; float intensity; };
         struct Ray { float3 origin; float tmax; };
         struct Mixed { float3 dir; int count; };",
        &mut env,
    )
    .unwrap();
    env
}

fn versioned(lang_version: LangVersion) -> Session {
    Session::new(SessionOptions {
        lang_version,
        ..SessionOptions::default()
    })
}

#[test]
fn constant_buffers_unwrap_to_their_declared_struct() {
    let env = struct_env();
    let cb = parse_type("ConstantBuffer<Light>", &env).unwrap();
    let tb = parse_type("TextureBuffer<Light>", &env).unwrap();
    let light = parse_type("Light", &env).unwrap();
    let ray = parse_type("Ray", &env).unwrap();
    let session = Session::default();

    let seq = session.can_convert(&Operand::new(cb.clone()), &light, false).unwrap();
    assert_eq!(seq.dimension, DimensionStep::ResultUnwrap);
    assert_eq!(seq.component, ComponentStep::Identity);
    let seq = session.can_convert(&Operand::new(tb), &light, false).unwrap();
    assert_eq!(seq.dimension, DimensionStep::ResultUnwrap);

    assert!(session.can_convert(&Operand::new(cb.clone()), &ray, false).is_err());
    assert!(session.can_convert(&Operand::new(cb), &ray, true).is_err());
}

#[test]
fn implicit_struct_conversion_is_gated_on_2021() {
    let env = struct_env();
    let light = Operand::new(parse_type("Light", &env).unwrap());
    let ray = parse_type("Ray", &env).unwrap();

    let session = versioned(LangVersion::V2021);
    assert!(session.can_convert(&light, &ray, false).is_err());
    let seq = session.can_convert(&light, &ray, true).unwrap();
    assert_eq!(seq.dimension, DimensionStep::Flat);

    let session = versioned(LangVersion::V2018);
    let seq = session.can_convert(&light, &ray, false).unwrap();
    assert_eq!(seq.dimension, DimensionStep::Flat);
    assert_eq!(seq.component, ComponentStep::Identity);
}

#[test]
fn pre_2021_implicit_aggregates_need_identical_leaves() {
    let env = struct_env();
    let light = Operand::new(parse_type("Light", &env).unwrap());
    let mixed = parse_type("Mixed", &env).unwrap();
    let floats = parse_type("float[4]", &env).unwrap();
    let halves = parse_type("float2[2]", &env).unwrap();

    for version in [LangVersion::V2016, LangVersion::V2018] {
        let session = versioned(version);

        let seq = session.can_convert(&light, &floats, false).unwrap();
        assert_eq!(seq.dimension, DimensionStep::Flat);
        let seq = session
            .can_convert(&Operand::new(floats.clone()), &halves, false)
            .unwrap();
        assert_eq!(seq.dimension, DimensionStep::Flat);

        assert!(session.can_convert(&light, &mixed, false).is_err());
        assert!(session.can_convert(&light, &parse_type("float[3]", &env).unwrap(), false).is_err());

        let seq = session.can_convert(&light, &mixed, true).unwrap();
        assert_eq!(seq.component, ComponentStep::FloatToInt);
    }
}
