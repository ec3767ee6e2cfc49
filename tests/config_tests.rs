use std::cell::RefCell;
use std::rc::Rc;

use chart_scales::api::{CHART_SCALES_CONFIG_JSON_SCHEMA_V1, ChartScalesConfig};
use chart_scales::core::{LinearScale, StackLayout, StackingOrder, TransformableScale};
use chart_scales::error::ChartError;
use chart_scales::interaction::{PanZoomConstraints, PanZoomController};

fn sample_config() -> ChartScalesConfig {
    ChartScalesConfig::default()
        .with_scale_constraints(
            "price",
            PanZoomConstraints::default()
                .with_domain_extents(Some(1.0), Some(500.0))
                .with_domain_values(Some(0.0), None),
        )
        .with_stacking_order(StackingOrder::TopDown)
        .with_pad_proportion(0.1)
}

#[test]
fn config_json_roundtrip_works() {
    let config = sample_config();
    let json = config.to_json_pretty().expect("serialize");
    let restored = ChartScalesConfig::from_json_str(&json).expect("deserialize");
    assert_eq!(restored, config);
    assert!(json.contains("\"topdown\""));
}

#[test]
fn missing_fields_take_defaults() {
    let config = ChartScalesConfig::from_json_str("{}").expect("empty object is valid");
    assert_eq!(config, ChartScalesConfig::default());
    assert_eq!(config.pad_proportion, 0.05);
    assert!(config.snapping_domain_enabled);
    assert_eq!(config.stacking.order, StackingOrder::BottomUp);

    let partial = r#"{ "scales": { "x": { "max_domain_value": 10.0 } } }"#;
    let config = ChartScalesConfig::from_json_str(partial).expect("partial constraints");
    let x = config.constraints_for("x").expect("x constraints");
    assert_eq!(x.max_domain_value, Some(10.0));
    assert_eq!(x.min_domain_value, None);
}

#[test]
fn invalid_constraints_name_the_scale() {
    let json = r#"{ "scales": { "volume": { "max_domain_extent": -2.0 } } }"#;
    let err = ChartScalesConfig::from_json_str(json).expect_err("negative extent must fail");
    assert!(matches!(err, ChartError::InvalidConfiguration(_)));
    assert!(format!("{err}").contains("scale `volume`"));

    let err = ChartScalesConfig::default()
        .with_pad_proportion(f64::NAN)
        .validate()
        .expect_err("nan padding must fail");
    assert!(format!("{err}").contains("pad proportion"));
}

#[test]
fn unknown_stacking_order_is_reported_as_such() {
    let json = r#"{ "stacking": { "order": "sideways" } }"#;
    let err = ChartScalesConfig::from_json_str(json).expect_err("unknown order must fail");
    assert!(matches!(err, ChartError::UnsupportedStackingOrder(token) if token == "sideways"));

    let err = ChartScalesConfig::from_json_str("{ not json").expect_err("garbage must fail");
    assert!(matches!(err, ChartError::Serialization(_)));

    let json = r#"{ "schema_version": 1, "config": { "stacking": { "order": "diagonal" } } }"#;
    let err = ChartScalesConfig::from_json_compat_str(json).expect_err("unknown order must fail");
    assert!(matches!(err, ChartError::UnsupportedStackingOrder(token) if token == "diagonal"));

    // A token that merely resembles an error message is still just a token.
    let json = r#"{ "stacking": { "order": "unknown variant `bottomup`" } }"#;
    let err = ChartScalesConfig::from_json_str(json).expect_err("odd token must fail");
    assert!(
        matches!(err, ChartError::UnsupportedStackingOrder(token) if token == "unknown variant `bottomup`")
    );
}

#[test]
fn plain_serde_deserialization_checks_the_stacking_order() {
    let config: ChartScalesConfig =
        serde_json::from_str(r#"{ "stacking": { "order": "topdown" } }"#).expect("known order");
    assert_eq!(config.stacking.order, StackingOrder::TopDown);
    assert_eq!(config.pad_proportion, 0.05);

    let err = serde_json::from_str::<ChartScalesConfig>(r#"{ "stacking": { "order": "sideways" } }"#)
        .expect_err("unknown order must fail");
    assert!(err.to_string().contains("sideways"));
}

#[test]
fn compat_loader_accepts_bare_and_versioned_payloads() {
    let config = sample_config();

    let bare = config.to_json_pretty().expect("serialize bare");
    assert_eq!(
        ChartScalesConfig::from_json_compat_str(&bare).expect("bare payload"),
        config
    );

    let versioned = config.to_json_contract_v1_pretty().expect("serialize contract");
    assert!(versioned.contains(&format!(
        "\"schema_version\": {CHART_SCALES_CONFIG_JSON_SCHEMA_V1}"
    )));
    assert_eq!(
        ChartScalesConfig::from_json_compat_str(&versioned).expect("versioned payload"),
        config
    );
}

#[test]
fn compat_loader_rejects_unknown_schema_versions() {
    let json = r#"{ "schema_version": 99, "config": {} }"#;
    let err = ChartScalesConfig::from_json_compat_str(json).expect_err("future schema");
    assert!(format!("{err}").contains("unsupported config schema version: 99"));
}

#[test]
fn config_applies_to_scales_controllers_and_layouts() {
    let config = sample_config().with_snapping_domain_enabled(false);

    let mut scale = LinearScale::new().with_range(0.0, 100.0);
    config.apply_to_scale(&mut scale).expect("valid padding");
    assert_eq!(scale.pad_proportion(), 0.1);
    assert!(!scale.snapping_domain_enabled());

    let scale = Rc::new(RefCell::new(scale));
    let mut controller = PanZoomController::new();
    let id = controller.add_y_scale(scale.clone()).expect("register y scale");
    config
        .apply_to_controller(&mut controller, "price", id)
        .expect("valid constraints");
    assert_eq!(controller.max_domain_extent(id), Some(500.0));
    assert_eq!(controller.min_domain_value(id), Some(0.0));
    assert_eq!(scale.borrow().scale_id(), id);

    config
        .apply_to_controller(&mut controller, "unknown", id)
        .expect("unknown names are ignored");

    let mut layout: StackLayout<String> = StackLayout::default();
    config.apply_to_stack_layout(&mut layout);
    assert_eq!(layout.order(), StackingOrder::TopDown);
}
