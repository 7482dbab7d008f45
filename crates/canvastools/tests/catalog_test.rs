use canvascore::{RegistryError, ResponseKind, ToolDescriptor};
use canvasruntime::{ToolRegistry, ALL_CATEGORIES};
use canvastools::{builtin_registry, builtin_tools, register_all};
use std::collections::HashSet;

#[test]
fn test_builtin_ids_are_unique() {
    let tools = builtin_tools();
    let ids: HashSet<&str> = tools.iter().map(|t| t.id.as_str()).collect();

    assert_eq!(tools.len(), 14);
    assert_eq!(ids.len(), tools.len());
}

#[test]
fn test_response_kinds() {
    let registry = builtin_registry().unwrap();

    let kind = |id: &str| registry.lookup(id).unwrap().response_kind;

    assert_eq!(kind("image"), ResponseKind::Image);
    assert_eq!(kind("tts-gen"), ResponseKind::Audio);
    assert_eq!(kind("vision-api"), ResponseKind::Static);
    assert_eq!(kind("summarizer"), ResponseKind::Text);

    let binary: Vec<&str> = registry
        .iter()
        .filter(|t| t.response_kind.is_binary())
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(binary, vec!["image", "tts-gen"]);
}

#[test]
fn test_every_endpoint_is_under_api() {
    for tool in builtin_tools() {
        assert!(tool.endpoint.starts_with("/api/"), "{} -> {}", tool.id, tool.endpoint);
        assert!(!tool.placeholder.is_empty(), "{} needs a placeholder", tool.id);
    }
}

#[test]
fn test_palette_categories() {
    let registry = builtin_registry().unwrap();

    assert_eq!(
        registry.categories(),
        vec!["All", "Content", "Development", "Data", "Creative", "Business", "Career"]
    );
    assert_eq!(registry.list_by_category(ALL_CATEGORIES).len(), registry.len());

    let development: Vec<&str> = registry
        .list_by_category("Development")
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(development, vec!["bug-fixer", "regex-gen"]);
}

#[test]
fn test_vision_notice() {
    let registry = builtin_registry().unwrap();

    assert_eq!(
        registry.lookup("vision-api").unwrap().static_notice(),
        "System Notice: Module architecture for Vision API is currently being initialized."
    );
}

#[test]
fn test_register_all_rejects_existing_ids() {
    let mut registry = ToolRegistry::new();
    registry
        .register(ToolDescriptor::new("summarizer", "/api/custom", ResponseKind::Text))
        .unwrap();

    let result = register_all(&mut registry);

    assert_eq!(result, Err(RegistryError::DuplicateTool("summarizer".to_string())));
    assert_eq!(registry.lookup("summarizer").unwrap().endpoint, "/api/custom");
}
