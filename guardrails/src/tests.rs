use assistant_core::prompt::ProductCatalog;

use crate::guards::format::normalize_reply;
use crate::types::{GuardrailSettings, DEFAULT_REFUSAL_MESSAGE};
use crate::GuardrailPipeline;

fn pipeline() -> GuardrailPipeline {
    GuardrailPipeline::new(GuardrailSettings::default(), ProductCatalog::default())
}

#[test]
fn on_topic_reply_passes_through() {
    let question = "How do I configure MetaDefender?";
    let reply = "## Answer\nOpen the MetaDefender Core console and edit the workflow.";

    let verdict = pipeline().apply(question, reply);
    assert!(!verdict.scope_flag);
    assert_eq!(verdict.reply, reply);
}

#[test]
fn off_topic_reply_is_replaced_with_refusal() {
    let question = "What's the weather today?";
    let reply = "It is sunny with a light breeze.";

    let verdict = pipeline().apply(question, reply);
    assert!(verdict.scope_flag);
    assert_eq!(verdict.reply, DEFAULT_REFUSAL_MESSAGE);
}

#[test]
fn scope_check_is_idempotent() {
    let question = "What's the weather today?";
    let first = pipeline().apply(question, "It is sunny with a light breeze.");
    let second = pipeline().apply(question, &first.reply);

    assert_eq!(first, second);
}

#[test]
fn in_scope_output_is_stable_across_reruns() {
    let question = "How do I configure MetaDefender?";
    let first = pipeline().apply(question, "Edit the MetaDefender workflow settings.");
    let second = pipeline().apply(question, &first.reply);

    assert_eq!(first, second);
}

#[test]
fn question_scope_rescues_a_generic_reply() {
    // The reply itself names no product; the originating question does.
    let question = "Where does MetaDefender Kiosk store its logs?";
    let reply = "The log directory is configurable under Settings.";

    let verdict = pipeline().apply(question, reply);
    assert!(!verdict.scope_flag);
    assert_eq!(verdict.reply, reply);
}

#[test]
fn disabled_scope_check_passes_everything() {
    let settings = GuardrailSettings {
        scope_enabled: false,
        ..Default::default()
    };
    let pipeline = GuardrailPipeline::new(settings, ProductCatalog::default());

    let verdict = pipeline.apply("What's the weather today?", "It is sunny.");
    assert!(!verdict.scope_flag);
    assert_eq!(verdict.reply, "It is sunny.");
}

#[test]
fn formatting_strips_escapes_and_control_chars() {
    let raw = "\x1b[31m## Answer\x1b[0m\nUse the ICAP server.\x07";
    let verdict = pipeline().apply("Set up MetaDefender ICAP", raw);

    assert_eq!(verdict.reply, "## Answer\nUse the ICAP server.");
    assert!(!verdict.scope_flag);
}

#[test]
fn formatting_strips_active_markup() {
    let raw = "Configure OESIS here.<script>alert(1)</script>";
    let cleaned = normalize_reply(raw);
    assert_eq!(cleaned, "Configure OESIS here.alert(1)");
}

#[test]
fn disabled_formatting_keeps_reply_verbatim() {
    let settings = GuardrailSettings {
        format_enabled: false,
        ..Default::default()
    };
    let pipeline = GuardrailPipeline::new(settings, ProductCatalog::default());

    let raw = "  Use the Kiosk admin page.  ";
    let verdict = pipeline.apply("MetaDefender Kiosk question", raw);
    assert_eq!(verdict.reply, raw);
}

#[test]
fn custom_refusal_message_is_used() {
    let settings = GuardrailSettings {
        refusal_message: "Out of scope.".to_string(),
        ..Default::default()
    };
    let pipeline = GuardrailPipeline::new(settings, ProductCatalog::default());

    let verdict = pipeline.apply("What's the weather today?", "Sunny.");
    assert!(verdict.scope_flag);
    assert_eq!(verdict.reply, "Out of scope.");
}
