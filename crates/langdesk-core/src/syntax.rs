/// Editor language id for a file, chosen by extension.
///
/// Unknown extensions map to `plaintext`. Template files (`.tpl`) are
/// highlighted as HTML.
pub fn syntax_language(path: &str) -> &'static str {
    let name = langdesk_store::file_name(path);
    let Some((_, ext)) = name.rsplit_once('.') else {
        return "plaintext";
    };
    match ext.to_ascii_lowercase().as_str() {
        "js" => "javascript",
        "ts" => "typescript",
        "html" | "tpl" => "html",
        "css" => "css",
        "scss" | "sass" => "scss",
        "json" => "json",
        "md" => "markdown",
        "py" => "python",
        "java" => "java",
        "cpp" => "cpp",
        "c" => "c",
        "cs" => "csharp",
        "go" => "go",
        "rs" => "rust",
        "php" => "php",
        "rb" => "ruby",
        "sql" => "sql",
        "xml" => "xml",
        "yaml" | "yml" => "yaml",
        "sh" | "bash" => "shell",
        _ => "plaintext",
    }
}
