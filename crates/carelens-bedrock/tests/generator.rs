use aws_sdk_bedrockruntime::types::{ContentBlock, ConversationRole, Message};
use carelens_bedrock::generator::response_text;
use carelens_bedrock::{BedrockError, BedrockGenerator, InferenceParams};
use carelens_core::error::GenerationError;

fn message(blocks: Vec<ContentBlock>) -> Message {
    let mut builder = Message::builder().role(ConversationRole::Assistant);
    for block in blocks {
        builder = builder.content(block);
    }
    builder.build().unwrap()
}

#[test]
fn text_blocks_are_joined_in_order() {
    let msg = message(vec![
        ContentBlock::Text("Drink water ".into()),
        ContentBlock::Text("and rest.".into()),
    ]);
    assert_eq!(response_text(&msg), "Drink water and rest.");
}

#[test]
fn message_without_text_is_empty() {
    let msg = Message::builder()
        .role(ConversationRole::Assistant)
        .set_content(Some(vec![]))
        .build()
        .unwrap();
    assert_eq!(response_text(&msg), "");
}

#[test]
fn default_sampling_settings() {
    let params = InferenceParams::default();
    assert_eq!(params.max_tokens, 512);
    assert!((params.temperature - 0.7).abs() < f32::EPSILON);
    assert!((params.top_p - 0.9).abs() < f32::EPSILON);
}

#[test]
fn errors_map_onto_generation_failures() {
    assert!(matches!(
        GenerationError::from(BedrockError::Unavailable("throttled".into())),
        GenerationError::Unavailable(_)
    ));
    assert!(matches!(
        GenerationError::from(BedrockError::EmptyResponse),
        GenerationError::EmptyOutput(_)
    ));
    assert!(matches!(
        GenerationError::from(BedrockError::Invocation("denied".into())),
        GenerationError::Invocation(_)
    ));
}

#[test]
fn generator_keeps_model_id() {
    let config = aws_config::SdkConfig::builder()
        .behavior_version(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new("us-east-1"))
        .build();
    let generator = BedrockGenerator::new(&config, "us.amazon.nova-lite-v1:0");
    assert_eq!(generator.model_id(), "us.amazon.nova-lite-v1:0");
}
