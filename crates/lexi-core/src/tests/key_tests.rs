use lexi_types::RequestParams;

use crate::key::{ENTRY_PREFIX, define_request, derive_key, normalize};

#[test]
fn test_equivalent_params_share_a_key() {
    let a = RequestParams::new("  Ephemeral ", 25).with_tone("FORMAL");
    let b = RequestParams::new("ephemeral", 25).with_tone("formal");
    assert_eq!(derive_key(&a), derive_key(&b));
}

#[test]
fn test_absent_fields_match_their_defaults() {
    let bare = RequestParams::new("serene", 10);
    let explicit = RequestParams::new("serene", 10)
        .with_tone("neutral")
        .with_context("None")
        .with_lang("AUTO");
    assert_eq!(derive_key(&bare), derive_key(&explicit));

    let blank = RequestParams::new("serene", 10).with_tone("   ");
    assert_eq!(derive_key(&bare), derive_key(&blank));
}

#[test]
fn test_any_differing_field_changes_the_key() {
    let base = RequestParams::new("serene", 10);
    let variants = [
        RequestParams::new("serenity", 10),
        RequestParams::new("serene", 11),
        base.clone().with_tone("playful"),
        base.clone().with_context("music"),
        base.clone().with_lang("fr"),
    ];

    for variant in &variants {
        assert_ne!(derive_key(&base), derive_key(variant), "{variant:?}");
    }
}

#[test]
fn test_missing_length_defaults_to_zero() {
    let params = RequestParams {
        word: "serene".to_string(),
        length: None,
        ..RequestParams::default()
    };
    assert_eq!(normalize(&params).length, 0);
    assert_eq!(derive_key(&params), derive_key(&RequestParams::new("serene", 0)));
}

#[test]
fn test_key_is_stable_and_sorted() {
    let params = RequestParams::new("Ephemeral", 25).with_tone("formal");
    let first = derive_key(&params);
    assert_eq!(first, derive_key(&params));
    assert_eq!(
        first.as_str(),
        r#"{"context":"none","lang":"auto","length":25,"tone":"formal","word":"ephemeral"}"#
    );
    assert!(first.storage_key().starts_with(ENTRY_PREFIX));
}

#[test]
fn test_field_values_cannot_collide_across_fields() {
    // Separator characters inside values must not forge another request
    let a = RequestParams::new("a", 1).with_tone("b,context:c");
    let b = RequestParams::new("a", 1).with_tone("b").with_context("c");
    assert_ne!(derive_key(&a), derive_key(&b));
}

#[test]
fn test_define_request_omits_absent_fields() {
    let params = RequestParams::new(" Ephemeral ", 25)
        .with_tone("Formal")
        .with_context("  ");
    let request = define_request(&params);

    assert_eq!(request.word, "ephemeral");
    assert_eq!(request.length, 25);
    assert_eq!(request.tone.as_deref(), Some("formal"));
    assert_eq!(request.context, None);
    assert_eq!(request.lang, None);
}
