use crate::catalog::records::{MemberKind, MemberRecord, TypeRecord};

/// Composite `Type.Member` identity used across the override and annotation
/// maps. Member names never contain the separator; type names are assumed
/// not to either (flagged in tests rather than enforced).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberKey {
    pub type_name: String,
    pub member_name: String,
}

impl MemberKey {
    pub fn new(type_name: &str, member_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            member_name: member_name.to_string(),
        }
    }

    /// Canonical split: the last `.` separates type from member.
    pub fn parse(key: &str) -> Option<Self> {
        let (type_name, member_name) = key.rsplit_once('.')?;
        if type_name.is_empty() || member_name.is_empty() {
            return None;
        }
        Some(Self::new(type_name, member_name))
    }
}

impl std::fmt::Display for MemberKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.type_name, self.member_name)
    }
}

/// Placeholder when a parameter's type token cannot be parsed.
const UNPARSEABLE_PARAM: &str = "object";

/// Derives the dotted keys the comment payload is indexed by:
/// `Prefix.Namespace.TypeName[.MemberName[(T1, T2, ...)]]`.
#[derive(Debug, Clone)]
pub struct KeyScheme {
    prefix: String,
    default_namespace: String,
}

impl KeyScheme {
    pub fn new(prefix: impl Into<String>, default_namespace: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            default_namespace: default_namespace.into(),
        }
    }

    pub fn comment_key(&self, record: &TypeRecord) -> String {
        format!(
            "{}.{}.{}",
            self.prefix,
            self.namespace_of(record),
            record.name
        )
    }

    pub fn member_comment_key(&self, record: &TypeRecord, member: &MemberRecord) -> String {
        let mut key = self.comment_key(record);
        key.push('.');
        key.push_str(&member.name);

        if matches!(member.kind, MemberKind::Method | MemberKind::Constructor) {
            let params = parameter_types(&member.signature);
            if !params.is_empty() {
                key.push('(');
                key.push_str(&params.join(", "));
                key.push(')');
            }
        }
        key
    }

    /// Namespace is the second backslash segment of the extracted file path
    /// when one exists.
    fn namespace_of<'a>(&'a self, record: &'a TypeRecord) -> &'a str {
        let mut segments = record.file.split('\\');
        segments.next();
        match segments.next() {
            Some(segment) if !segment.is_empty() => segment,
            _ => &self.default_namespace,
        }
    }
}

impl Default for KeyScheme {
    fn default() -> Self {
        Self::new("Assembly-CSharp.Version", "Global")
    }
}

/// Extracts the parameter *types* from a signature's parenthesized argument
/// list: defaults stripped, each argument reduced to the leading identifier
/// of its first token.
pub fn parameter_types(signature: &str) -> Vec<String> {
    let Some(open) = signature.find('(') else {
        return Vec::new();
    };
    let Some(close) = signature.rfind(')') else {
        return Vec::new();
    };
    if close <= open + 1 {
        return Vec::new();
    }

    split_top_level(&signature[open + 1..close])
        .into_iter()
        .filter(|arg| !arg.trim().is_empty())
        .map(|arg| {
            let without_default = arg.split('=').next().unwrap_or("").trim();
            without_default
                .split_whitespace()
                .next()
                .map(leading_identifier)
                .filter(|ident| !ident.is_empty())
                .unwrap_or_else(|| UNPARSEABLE_PARAM.to_string())
        })
        .collect()
}

/// Splits on commas that are not nested inside `<>` or `()`.
fn split_top_level(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (idx, ch) in args.char_indices() {
        match ch {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&args[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&args[start..]);
    parts
}

fn leading_identifier(token: &str) -> String {
    token
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}
