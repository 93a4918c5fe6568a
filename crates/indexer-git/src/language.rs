//! Language detection from file names

use std::path::Path;

/// Guesses the language of a file from its name
///
/// Returns `None` when nothing matches; callers index such files as "Text".
pub fn detect_language(path: &str) -> Option<&'static str> {
    let path = Path::new(path);
    let file_name = path.file_name()?.to_string_lossy();

    let by_name = match file_name.as_ref() {
        "Dockerfile" => Some("Dockerfile"),
        "Makefile" | "GNUmakefile" => Some("Makefile"),
        "Gemfile" | "Rakefile" | "Guardfile" | "Vagrantfile" => Some("Ruby"),
        "CMakeLists.txt" => Some("CMake"),
        _ => None,
    };
    if by_name.is_some() {
        return by_name;
    }

    let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
    let language = match ext.as_str() {
        "rs" => "Rust",
        "rb" | "rake" | "gemspec" | "ru" => "Ruby",
        "erb" => "HTML+ERB",
        "haml" => "Haml",
        "py" | "pyw" => "Python",
        "js" | "mjs" | "cjs" => "JavaScript",
        "jsx" => "JavaScript",
        "ts" | "tsx" => "TypeScript",
        "coffee" => "CoffeeScript",
        "go" => "Go",
        "java" => "Java",
        "kt" | "kts" => "Kotlin",
        "scala" => "Scala",
        "c" => "C",
        "h" => "C",
        "cc" | "cpp" | "cxx" | "hpp" | "hh" => "C++",
        "cs" => "C#",
        "m" => "Objective-C",
        "swift" => "Swift",
        "php" => "PHP",
        "pl" | "pm" => "Perl",
        "lua" => "Lua",
        "r" => "R",
        "ex" | "exs" => "Elixir",
        "erl" | "hrl" => "Erlang",
        "hs" => "Haskell",
        "clj" | "cljs" => "Clojure",
        "sh" | "bash" | "zsh" => "Shell",
        "sql" => "SQL",
        "html" | "htm" => "HTML",
        "css" => "CSS",
        "scss" => "SCSS",
        "less" => "Less",
        "json" => "JSON",
        "yml" | "yaml" => "YAML",
        "toml" => "TOML",
        "xml" => "XML",
        "md" | "markdown" => "Markdown",
        "rst" => "reStructuredText",
        "nix" => "Nix",
        "proto" => "Protocol Buffer",
        "vue" => "Vue",
        "txt" => "Text",
        _ => return None,
    };
    Some(language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_extension() {
        assert_eq!(detect_language("app/models/user.rb"), Some("Ruby"));
        assert_eq!(detect_language("src/main.RS"), Some("Rust"));
        assert_eq!(detect_language("README.md"), Some("Markdown"));
    }

    #[test]
    fn test_by_file_name() {
        assert_eq!(detect_language("Gemfile"), Some("Ruby"));
        assert_eq!(detect_language("docker/Dockerfile"), Some("Dockerfile"));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(detect_language("data.bin"), None);
        assert_eq!(detect_language("LICENSE"), None);
    }
}
