use regex::Regex;
use std::collections::HashSet;

/// A candidate type name extracted from a raw signature.
///
/// `exists_guess` is a syntactic plausibility check only; callers that need a
/// ground-truth answer must verify the name against the catalog index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    pub name: String,
    pub exists_guess: bool,
}

/// Heuristic extractor for type-name tokens in member signatures.
///
/// This is not a parser. It works on raw text, filters language keywords and
/// built-ins, tries to skip the signature's own method name, and suppresses
/// tokens that look like method-name fragments. Misclassification in either
/// direction is an accepted precision/recall tradeoff.
pub struct ReferenceExtractor {
    token_pattern: Regex,
    method_decl_pattern: Regex,
    keywords: HashSet<&'static str>,
    builtins: HashSet<&'static str>,
}

/// Substrings that usually indicate a method-name fragment rather than a
/// type name (KillAndDestroy, GetValue, IsValid, ...).
const METHOD_FRAGMENTS: [&str; 5] = ["And", "Or", "Is", "Get", "Set"];

/// How far back to look for a `new`/`typeof` rescue before a suppressed token.
const RESCUE_WINDOW: usize = 20;

const CSHARP_KEYWORDS: [&str; 77] = [
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char",
    "checked", "class", "const", "continue", "decimal", "default", "delegate",
    "do", "double", "else", "enum", "event", "explicit", "extern", "false",
    "finally", "fixed", "float", "for", "foreach", "goto", "if", "implicit",
    "in", "int", "interface", "internal", "is", "lock", "long", "namespace",
    "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte",
    "sealed", "short", "sizeof", "stackalloc", "static", "string", "struct",
    "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile",
    "while",
];

/// Built-in/primitive type names, compared case-insensitively so the CLR
/// aliases (String, Int32 spelled as "string"/"int" here) are caught too.
const BUILTIN_TYPES: [&str; 18] = [
    "bool", "byte", "sbyte", "char", "decimal", "double", "float", "int",
    "uint", "nint", "nuint", "long", "ulong", "object", "short", "ushort",
    "string", "void",
];

impl ReferenceExtractor {
    pub fn new() -> Self {
        // Uppercase-led identifier with an optional generic-argument suffix.
        let token_pattern = Regex::new(r"[A-Z][A-Za-z0-9_]*(?:<[^<>]*>)?")
            .expect("invalid token pattern");

        // Access-modifier-prefixed `ret Name(` sequence; capture group 1 is
        // the method name being declared.
        let method_decl_pattern = Regex::new(
            r"(?:public|private|protected|internal)\s+(?:(?:static|virtual|override|abstract|sealed|async|new|extern)\s+)*[A-Za-z_][A-Za-z0-9_]*(?:<[^<>]*>)?(?:\[\])?\??\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(",
        )
        .expect("invalid method declaration pattern");

        Self {
            token_pattern,
            method_decl_pattern,
            keywords: CSHARP_KEYWORDS.iter().copied().collect(),
            builtins: BUILTIN_TYPES.iter().copied().collect(),
        }
    }

    /// Extract plausible type references from `text`. Pure; order of results
    /// is unspecified beyond first-seen (set semantics, deduplicated by
    /// cleaned name).
    pub fn extract(&self, text: &str) -> Vec<TypeReference> {
        let own_method = self
            .method_decl_pattern
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        let mut seen = HashSet::new();
        let mut references = Vec::new();

        for token in self.token_pattern.find_iter(text) {
            let cleaned = strip_generic_suffix(token.as_str());

            if self.keywords.contains(cleaned) {
                continue;
            }
            if self.builtins.contains(cleaned.to_lowercase().as_str()) {
                continue;
            }
            if own_method.as_deref() == Some(cleaned) {
                continue;
            }
            if looks_like_method_fragment(cleaned)
                && !rescued_by_context(text, token.start())
            {
                continue;
            }
            if !seen.insert(cleaned.to_string()) {
                continue;
            }

            references.push(TypeReference {
                exists_guess: plausible_type_shape(cleaned),
                name: cleaned.to_string(),
            });
        }

        references
    }
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_generic_suffix(token: &str) -> &str {
    match token.find('<') {
        Some(idx) => &token[..idx],
        None => token,
    }
}

fn looks_like_method_fragment(name: &str) -> bool {
    METHOD_FRAGMENTS.iter().any(|fragment| name.contains(fragment))
}

/// A suppressed token survives when the preceding window reads like a
/// constructor call or a type check (`new Name`, `typeof Name`).
fn rescued_by_context(text: &str, token_start: usize) -> bool {
    let window_start = token_start.saturating_sub(RESCUE_WINDOW);
    // Back off to a char boundary in case the window lands mid-codepoint.
    let window_start = (0..=window_start)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    let window = text[window_start..token_start].trim_end();
    window.ends_with("new") || window.ends_with("typeof") || window.ends_with("typeof(")
}

/// Shape check when no index is available: capitalized identifier longer
/// than two characters.
fn plausible_type_shape(name: &str) -> bool {
    name.len() > 2 && name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}
