mod common;

use canvascore::{RegistryError, ResponseKind, ToolDescriptor};
use canvasruntime::{ToolRegistry, ALL_CATEGORIES};
use common::test_registry;

#[test]
fn test_lookup_known_tool() {
    let registry = test_registry();

    let tool = registry.lookup("image").unwrap();

    assert_eq!(tool.endpoint, "/api/generate-image");
    assert_eq!(tool.response_kind, ResponseKind::Image);
}

#[test]
fn test_lookup_unknown_tool_fails() {
    let registry = test_registry();

    assert_eq!(
        registry.lookup("teleporter"),
        Err(RegistryError::UnknownTool("teleporter".to_string()))
    );
}

#[test]
fn test_all_category_keeps_registration_order() {
    let registry = test_registry();

    let ids: Vec<&str> = registry
        .list_by_category(ALL_CATEGORIES)
        .iter()
        .map(|t| t.id.as_str())
        .collect();

    assert_eq!(
        ids,
        vec!["summarizer", "bug-fixer", "humanizer", "image", "tts-gen", "vision-api"]
    );
}

#[test]
fn test_category_filter_is_exact_and_ordered() {
    let registry = test_registry();

    let content: Vec<&str> = registry
        .list_by_category("Content")
        .iter()
        .map(|t| t.id.as_str())
        .collect();

    assert_eq!(content, vec!["summarizer", "humanizer"]);
    assert!(registry.list_by_category("content").is_empty(), "Match is case-sensitive");
    assert!(registry.list_by_category("Data").is_empty());
}

#[test]
fn test_categories_start_with_all() {
    let registry = test_registry();

    assert_eq!(
        registry.categories(),
        vec!["All", "Content", "Development", "Creative"]
    );
}

#[test]
fn test_duplicate_registration_rejected() {
    let mut registry = ToolRegistry::new();
    registry
        .register(ToolDescriptor::new("summarizer", "/api/summarize", ResponseKind::Text))
        .unwrap();

    let result =
        registry.register(ToolDescriptor::new("summarizer", "/api/other", ResponseKind::Text));

    assert_eq!(result, Err(RegistryError::DuplicateTool("summarizer".to_string())));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.lookup("summarizer").unwrap().endpoint, "/api/summarize");
}
