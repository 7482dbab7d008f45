use canvascore::{RegistryError, ResponseKind, ToolDescriptor};
use canvasruntime::ToolRegistry;

fn text_tool(id: &str, endpoint: &str) -> ToolDescriptor {
    ToolDescriptor::new(id, endpoint, ResponseKind::Text)
}

/// Every tool the canvas ships with, in palette order
pub fn builtin_tools() -> Vec<ToolDescriptor> {
    vec![
        text_tool("summarizer", "/api/summarize")
            .with_name("AI Summarizer")
            .with_description("Transform long articles into concise gists.")
            .with_category("Content")
            .with_placeholder("Paste your long text here..."),
        text_tool("bug-fixer", "/api/debug")
            .with_name("AI Code Debugger")
            .with_description("Paste your code and let AI find and fix bugs.")
            .with_category("Development")
            .with_placeholder("// Paste your buggy code here..."),
        text_tool("humanizer", "/api/humanize")
            .with_name("Content Humanizer")
            .with_description("Make AI text sound authentically human.")
            .with_category("Content")
            .with_placeholder("Paste AI-generated text here..."),
        text_tool("sql-gen", "/api/sql-generate")
            .with_name("Smart SQL Generator")
            .with_description("Natural language to optimized SQL queries.")
            .with_category("Data")
            .with_placeholder(
                "Describe the query you need (e.g., \"Find top 10 customers by revenue last month\")...",
            ),
        ToolDescriptor::new("image", "/api/generate-image", ResponseKind::Image)
            .with_name("AI Image Gen")
            .with_description("Generate stunning AI images from text prompts.")
            .with_category("Creative")
            .with_placeholder("Describe the image you want to create in vivid detail..."),
        text_tool("email-gen", "/api/email-gen")
            .with_name("Email Composer")
            .with_description("Draft highly effective professional emails instantly.")
            .with_category("Business")
            .with_placeholder("Who is this email for and what should it say?"),
        text_tool("regex-gen", "/api/regex-gen")
            .with_name("Regex Builder")
            .with_description("Translate natural language to complex Regex patterns.")
            .with_category("Development")
            .with_placeholder("Describe the pattern (e.g., Match all valid Gmail addresses)..."),
        text_tool("cover-letter", "/api/cover-letter")
            .with_name("Cover Letter Pro")
            .with_description("Create winning cover letters tailored to your dream job.")
            .with_category("Career")
            .with_placeholder("Paste the job description and your key skills here..."),
        text_tool("grammar-fix", "/api/grammar-fix")
            .with_name("Grammar Coach")
            .with_description("Fix typos, grammar, and elevate your writing style.")
            .with_category("Content")
            .with_placeholder("Paste your draft text here to make it sound professional..."),
        text_tool("business-validator", "/api/business-validator")
            .with_name("Idea Validator")
            .with_description("Analyze your startup idea with pros, cons & audience.")
            .with_category("Business")
            .with_placeholder("Describe your business or app idea in detail..."),
        text_tool("youtube-summarizer", "/api/youtube-summarizer")
            .with_name("YouTube Summarizer")
            .with_description("Get instant intelligence and summaries from long YouTube videos.")
            .with_category("Content")
            .with_placeholder("Paste YouTube URL here..."),
        text_tool("webpage-summarizer", "/api/webpage-summarizer")
            .with_name("Webpage Summarizer")
            .with_description("TL;DR for any article or website link.")
            .with_category("Content")
            .with_placeholder("Paste Website URL here..."),
        ToolDescriptor::new("tts-gen", "/api/tts", ResponseKind::Audio)
            .with_name("AI Voice Generator")
            .with_description("Convert any text into natural human speech.")
            .with_category("Creative")
            .with_placeholder("Enter text to synthesize into speech..."),
        ToolDescriptor::new("vision-api", "/api/vision", ResponseKind::Static)
            .with_name("Vision Analytics")
            .with_description("Understand and analyze any image context (Coming Soon).")
            .with_category("Creative")
            .with_placeholder("Image analysis context or questions...")
            .with_notice(
                "System Notice: Module architecture for Vision API is currently being initialized.",
            ),
    ]
}

/// Register all built-in tools with a registry
pub fn register_all(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    for tool in builtin_tools() {
        registry.register(tool)?;
    }
    Ok(())
}

/// A fresh registry holding only the built-in tools
pub fn builtin_registry() -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    register_all(&mut registry)?;
    Ok(registry)
}
