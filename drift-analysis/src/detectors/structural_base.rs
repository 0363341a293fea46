//! Structural detection base — path globs, naming conventions, and
//! file classification shared by `detection_method = structural` detectors.

use std::path::Path;

use glob::Pattern;

/// Match a path against a glob supporting `*`, `**`, `?`, `[..]`, and `{a,b}`.
///
/// Brace alternation is expanded before delegating to `glob::Pattern`, which
/// handles the rest of the syntax.
pub fn glob_match(pattern: &str, path: &str) -> bool {
    expand_braces(pattern).iter().any(|p| {
        if Pattern::new(p).map(|g| g.matches(path)).unwrap_or(false) {
            return true;
        }
        // `a/**/b` also matches the zero-directory form `a/b`.
        p.contains("/**/")
            && Pattern::new(&p.replace("/**/", "/"))
                .map(|g| g.matches(path))
                .unwrap_or(false)
    })
}

/// Expand one level of `{a,b}` alternation recursively.
fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };
    let mut depth = 0usize;
    let mut close = None;
    for (i, c) in pattern[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            _ => {}
        }
    }
    let Some(close) = close else {
        return vec![pattern.to_string()];
    };
    let prefix = &pattern[..open];
    let body = &pattern[open + 1..close];
    let suffix = &pattern[close + 1..];

    let mut alternatives = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                alternatives.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    alternatives.push(&body[start..]);

    alternatives
        .into_iter()
        .flat_map(|alt| expand_braces(&format!("{prefix}{alt}{suffix}")))
        .collect()
}

/// The six naming conventions the structural base recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingConvention {
    Pascal,
    Camel,
    Kebab,
    Snake,
    ScreamingSnake,
    Flat,
}

impl NamingConvention {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pascal => "PascalCase",
            Self::Camel => "camelCase",
            Self::Kebab => "kebab-case",
            Self::Snake => "snake_case",
            Self::ScreamingSnake => "SCREAMING_SNAKE_CASE",
            Self::Flat => "flatcase",
        }
    }

    /// Detect the convention of an identifier, or None for mixed forms.
    pub fn detect(ident: &str) -> Option<Self> {
        if ident.is_empty() {
            return None;
        }
        let has_upper = ident.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = ident.chars().any(|c| c.is_ascii_lowercase());
        let has_dash = ident.contains('-');
        let has_underscore = ident.contains('_');

        if has_dash && !has_underscore && !has_upper {
            return Some(Self::Kebab);
        }
        if has_underscore && !has_dash {
            if !has_lower {
                return Some(Self::ScreamingSnake);
            }
            if !has_upper {
                return Some(Self::Snake);
            }
            return None;
        }
        if has_dash || has_underscore {
            return None;
        }
        match (has_upper, has_lower) {
            (true, true) => {
                if ident.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                    Some(Self::Pascal)
                } else {
                    Some(Self::Camel)
                }
            }
            (false, true) => Some(Self::Flat),
            (true, false) => Some(Self::ScreamingSnake),
            (false, false) => Some(Self::Flat),
        }
    }

    /// Split an identifier into lowercase words regardless of its convention.
    fn words(ident: &str) -> Vec<String> {
        let mut words = Vec::new();
        for chunk in ident.split(['-', '_']) {
            if chunk.is_empty() {
                continue;
            }
            let mut current = String::new();
            let mut prev_lower = false;
            for c in chunk.chars() {
                if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
                    words.push(current.to_ascii_lowercase());
                    current = String::new();
                }
                prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
                current.push(c);
            }
            if !current.is_empty() {
                words.push(current.to_ascii_lowercase());
            }
        }
        words
    }

    /// Convert an identifier to this convention.
    pub fn convert(&self, ident: &str) -> String {
        let words = Self::words(ident);
        if words.is_empty() {
            return String::new();
        }
        match self {
            Self::Pascal => words.iter().map(|w| capitalize(w)).collect(),
            Self::Camel => {
                let mut out = words[0].clone();
                for w in &words[1..] {
                    out.push_str(&capitalize(w));
                }
                out
            }
            Self::Kebab => words.join("-"),
            Self::Snake => words.join("_"),
            Self::ScreamingSnake => words
                .iter()
                .map(|w| w.to_ascii_uppercase())
                .collect::<Vec<_>>()
                .join("_"),
            Self::Flat => words.concat(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Test-file predicate: `.test.`/`.spec.` infixes, `_test` suffixes, and
/// `tests/`/`__tests__/` directories.
pub fn is_test_file(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.contains(".test.")
        || lower.contains(".spec.")
        || lower.contains("_test.")
        || lower.contains("/__tests__/")
        || lower.contains("/tests/")
        || lower.starts_with("tests/")
        || lower.ends_with("_spec.rb")
}

/// Type-definition files (`.d.ts`, `types.*`, `*.types.*`).
pub fn is_type_def_file(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".d.ts")
        || file_stem(&lower) == "types"
        || lower.contains(".types.")
}

/// Barrel/index files.
pub fn is_index_file(path: &str) -> bool {
    matches!(
        file_stem(&path.to_ascii_lowercase()).as_ref(),
        "index" | "mod" | "__init__"
    )
}

/// Configuration files by stem or extension.
pub fn is_config_file(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    let stem = file_stem(&lower);
    lower.ends_with(".toml")
        || lower.ends_with(".yaml")
        || lower.ends_with(".yml")
        || lower.ends_with(".ini")
        || stem.ends_with("config")
        || stem.ends_with(".config")
        || stem == "settings"
}

fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Longest common directory prefix of a set of paths.
pub fn common_base_path(paths: &[String]) -> String {
    let Some(first) = paths.first() else {
        return String::new();
    };
    let mut common: Vec<&str> = first.split('/').collect();
    common.pop(); // drop the file name
    for path in &paths[1..] {
        let parts: Vec<&str> = path.split('/').collect();
        let mut keep = 0;
        for (a, b) in common.iter().zip(parts.iter()) {
            if a == b {
                keep += 1;
            } else {
                break;
            }
        }
        common.truncate(keep);
        if common.is_empty() {
            break;
        }
    }
    common.join("/")
}

/// Files in the same directory as `target`, excluding `target` itself.
pub fn sibling_files<'a>(target: &str, candidates: &'a [String]) -> Vec<&'a String> {
    let dir = Path::new(target).parent().map(|p| p.to_string_lossy().to_string());
    candidates
        .iter()
        .filter(|c| {
            c.as_str() != target
                && Path::new(c.as_str())
                    .parent()
                    .map(|p| p.to_string_lossy().to_string())
                    == dir
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_supports_braces_and_globstar() {
        assert!(glob_match("src/**/*.{ts,tsx}", "src/a/b/c.tsx"));
        assert!(glob_match("src/**/*.{ts,tsx}", "src/x.ts"));
        assert!(!glob_match("src/**/*.{ts,tsx}", "lib/x.ts"));
        assert!(glob_match("file?.rs", "file1.rs"));
        assert!(glob_match("[ab]*.go", "a_main.go"));
    }

    #[test]
    fn convention_detection() {
        assert_eq!(NamingConvention::detect("UserService"), Some(NamingConvention::Pascal));
        assert_eq!(NamingConvention::detect("userService"), Some(NamingConvention::Camel));
        assert_eq!(NamingConvention::detect("user-service"), Some(NamingConvention::Kebab));
        assert_eq!(NamingConvention::detect("user_service"), Some(NamingConvention::Snake));
        assert_eq!(NamingConvention::detect("USER_SERVICE"), Some(NamingConvention::ScreamingSnake));
        assert_eq!(NamingConvention::detect("userservice"), Some(NamingConvention::Flat));
        assert_eq!(NamingConvention::detect("user-Service_x"), None);
    }

    #[test]
    fn convention_conversion() {
        assert_eq!(NamingConvention::Snake.convert("UserService"), "user_service");
        assert_eq!(NamingConvention::Pascal.convert("user-service"), "UserService");
        assert_eq!(NamingConvention::Camel.convert("USER_SERVICE"), "userService");
        assert_eq!(NamingConvention::Kebab.convert("userService"), "user-service");
        assert_eq!(NamingConvention::ScreamingSnake.convert("userService"), "USER_SERVICE");
        assert_eq!(NamingConvention::Flat.convert("user-service"), "userservice");
    }

    #[test]
    fn file_classification() {
        assert!(is_test_file("src/auth.test.ts"));
        assert!(is_test_file("pkg/io/file_test.go"));
        assert!(is_test_file("src/__tests__/auth.ts"));
        assert!(!is_test_file("src/auth.ts"));
        assert!(is_type_def_file("src/global.d.ts"));
        assert!(is_index_file("src/utils/index.ts"));
        assert!(is_index_file("src/utils/mod.rs"));
        assert!(is_config_file("jest.config.js"));
        assert!(is_config_file("settings.yaml"));
    }

    #[test]
    fn base_path_and_siblings() {
        let paths = vec![
            "src/auth/login.ts".to_string(),
            "src/auth/logout.ts".to_string(),
            "src/auth/session/token.ts".to_string(),
        ];
        assert_eq!(common_base_path(&paths), "src/auth");
        let sibs = sibling_files("src/auth/login.ts", &paths);
        assert_eq!(sibs, vec![&paths[1]]);
    }
}
