use oldes_icon::config::{parse_css_color, FontSizeRange, RenderConfig, REFERENCE_SIZE};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_defaults_match_stock_icon() {
    let config = RenderConfig::default();

    assert_eq!(config.size, REFERENCE_SIZE);
    assert_eq!(config.top, [243, 112, 33, 255]);
    assert_eq!(config.bottom, [210, 81, 18, 255]);
    assert_eq!(config.border_color, [252, 231, 214, 255]);
    assert_eq!(config.border_width, 8);
    assert_eq!(config.border_radius, 96);
    assert_eq!(config.border_inset, 64);
    assert_eq!(config.text, "oldes");
    assert_eq!(config.fit_box(), 352);
    assert_eq!(config.baseline_offset, -6);
    assert_eq!(config.fallback_font_size, 120);
    assert!(config.validate().is_ok());
}

#[test]
fn test_font_size_candidates_descend() {
    let candidates = FontSizeRange::default().candidates();

    assert_eq!(candidates.first(), Some(&260));
    assert_eq!(candidates.last(), Some(&84));
    assert_eq!(candidates.len(), 45);
    assert!(candidates.windows(2).all(|pair| pair[0] - pair[1] == 4));
}

#[test]
fn test_zero_step_has_no_candidates() {
    let range = FontSizeRange {
        largest: 100,
        smallest: 10,
        step: 0,
    };
    assert!(range.candidates().is_empty());
}

#[test]
fn test_partial_json_keeps_defaults() {
    let config = RenderConfig::from_json_str(r#"{ "text": "hi", "top": [1, 2, 3, 255] }"#)
        .expect("Failed to parse config");

    assert_eq!(config.text, "hi");
    assert_eq!(config.top, [1, 2, 3, 255]);
    assert_eq!(config.bottom, RenderConfig::default().bottom);
    assert_eq!(config.font_sizes, FontSizeRange::default());
}

#[test]
fn test_partial_font_sizes_keep_defaults() {
    let config = RenderConfig::from_json_str(r#"{ "font_sizes": { "largest": 200 } }"#)
        .expect("Failed to parse config");

    assert_eq!(config.font_sizes.largest, 200);
    assert_eq!(config.font_sizes.smallest, FontSizeRange::default().smallest);
    assert_eq!(config.font_sizes.step, FontSizeRange::default().step);
    assert!(config.validate().is_ok());
}

#[test]
fn test_json_rejects_out_of_range_channels() {
    assert!(RenderConfig::from_json_str(r#"{ "top": [256, 0, 0, 255] }"#).is_err());
    assert!(RenderConfig::from_json_str("not json").is_err());
}

#[test]
fn test_json_file_round_trip() {
    let config = RenderConfig {
        size: 256,
        text: "file".to_string(),
        font_candidates: Vec::new(),
        ..RenderConfig::default()
    };

    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(serde_json::to_string_pretty(&config).unwrap().as_bytes())
        .expect("Failed to write config");

    let loaded = RenderConfig::from_json_file(file.path()).expect("Failed to load config");
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_json_file_is_an_error() {
    let err = RenderConfig::from_json_file(std::path::Path::new("/no/such/config.json"))
        .unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_scaling_to_default_size_is_identity() {
    let config = RenderConfig::default();
    assert_eq!(config.scaled_to(REFERENCE_SIZE), config);
}

#[test]
fn test_scaling_doubles_constants() {
    let config = RenderConfig::default().scaled_to(1024);

    assert_eq!(config.size, 1024);
    assert_eq!(config.border_inset, 128);
    assert_eq!(config.border_width, 16);
    assert_eq!(config.border_radius, 192);
    assert_eq!(config.fit_padding, 320);
    assert_eq!(config.baseline_offset, -12);
    assert_eq!(config.font_sizes.largest, 520);
    assert_eq!(config.font_sizes.smallest, 168);
    assert_eq!(config.font_sizes.step, 8);
    assert_eq!(config.fallback_font_size, 240);
    assert_eq!(config.top, RenderConfig::default().top);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_degenerate_configs() {
    let base = RenderConfig::default();

    assert!(RenderConfig { size: 1, ..base.clone() }.validate().is_err());
    assert!(RenderConfig {
        border_inset: 256,
        ..base.clone()
    }
    .validate()
    .is_err());
    assert!(RenderConfig {
        font_sizes: FontSizeRange {
            largest: 10,
            smallest: 20,
            step: 1
        },
        ..base.clone()
    }
    .validate()
    .is_err());
    assert!(RenderConfig {
        fallback_font_size: 0,
        ..base
    }
    .validate()
    .is_err());
}

#[test]
fn test_parse_css_color() {
    assert_eq!(parse_css_color("#fff").unwrap(), [255, 255, 255, 255]);
    assert_eq!(parse_css_color("#000000").unwrap(), [0, 0, 0, 255]);
    assert_eq!(parse_css_color("#ff0000").unwrap()[0], 255);
    assert!(parse_css_color("not-a-color").is_err());
}
