//! Sanitizer rule data
//!
//! Every keyword list, threshold and pattern the sanitizer uses lives here as
//! plain data. The built-in set can be replaced field by field from a JSON
//! file (`SANITIZER_RULES_PATH`); omitted fields keep their defaults, while a
//! `languages` entry present in the file replaces the whole built-in map.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    config::ConfigError,
    constants::{
        DEFAULT_MAX_FUNCTION_DEFINITIONS, DEFAULT_MIN_BASE64_RUN, DEFAULT_MIN_HEX_ESCAPE_RUN,
        DEFAULT_SANITIZER_MAX_CODE_LENGTH, DEFAULT_SANITIZER_MAX_INPUT_LENGTH,
    },
    models::Language,
};

/// Complete sanitizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerRules {
    /// Maximum code length in characters
    pub max_code_length: usize,
    /// Maximum stdin length in characters
    pub max_input_length: usize,
    pub min_base64_run: usize,
    pub min_hex_escape_run: usize,
    pub max_function_definitions: usize,
    /// Regex whose matches are removed before keyword scanning
    pub import_pattern: String,
    /// Case-insensitive substrings rejected for every language (and in stdin)
    pub global_keywords: Vec<String>,
    /// Case-insensitive regexes for obvious infinite loops
    pub infinite_loop_patterns: Vec<String>,
    pub languages: HashMap<Language, LanguageRules>,
}

/// Rules applied to one language only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageRules {
    /// Case-insensitive substrings reported as dangerous operations
    pub keywords: Vec<String>,
    /// Regexes, each match counts as one function definition
    pub function_markers: Vec<String>,
    pub extra_checks: Vec<ExtraCheck>,
}

/// A language-specific check beyond the keyword list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraCheck {
    pub kind: ExtraCheckKind,
    /// Case-insensitive substrings
    #[serde(default)]
    pub tokens: Vec<String>,
    /// Case-insensitive regexes
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Which failure an extra check reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraCheckKind {
    DangerousOperation,
    IntrospectionAttack,
    PrototypePollution,
    InlineAssembly,
    ResourceAbuse,
}

impl SanitizerRules {
    /// Load rules from a JSON file, falling back to defaults for omitted fields
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {}", path.display(), e)))
    }

    /// Rules for `language`, or an empty set when none are configured
    pub fn for_language(&self, language: Language) -> LanguageRules {
        self.languages.get(&language).cloned().unwrap_or_default()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn java_rules() -> LanguageRules {
    LanguageRules {
        keywords: strings(&[
            "Runtime.getRuntime()",
            "ProcessBuilder",
            "System.exit",
            "System.set",
            "FileInputStream",
            "FileOutputStream",
            "FileReader",
            "FileWriter",
            "RandomAccessFile",
            "java.io.File",
            "java.nio.file",
            "java.lang.Runtime",
            "java.lang.Process",
            "java.net.Socket",
            "java.net.ServerSocket",
            "java.net.URL",
            "new Socket(",
            "new ServerSocket(",
            "Thread.sleep",
            "ClassLoader",
        ]),
        function_markers: strings(&[
            r"\b(?:public|private|protected|static)\b[^;={}()]*\([^)]*\)\s*(?:throws[^{;]*)?\{",
        ]),
        extra_checks: vec![
            ExtraCheck {
                kind: ExtraCheckKind::DangerousOperation,
                tokens: strings(&[
                    "setAccessible(",
                    "getDeclaredField",
                    "getDeclaredMethod",
                    "getDeclaredConstructor",
                    "Class.forName",
                    "java.lang.reflect",
                    "MethodHandles.lookup",
                    "sun.misc.Unsafe",
                ]),
                patterns: Vec::new(),
            },
            ExtraCheck {
                kind: ExtraCheckKind::ResourceAbuse,
                tokens: Vec::new(),
                patterns: strings(&[
                    r"new\s+\w+\s*\[\s*\d{7,}\s*\]",
                    r"new\s+\w+\s*\[\s*(?:Integer|Long)\.MAX_VALUE\s*\]",
                    r"new\s+\w+\s*\[\s*\d{4,}\s*\]\s*\[\s*\d{4,}\s*\]",
                ]),
            },
        ],
    }
}

fn python_rules() -> LanguageRules {
    LanguageRules {
        keywords: strings(&[
            "os.system",
            "os.popen",
            "os.exec",
            "os.spawn",
            "os.fork",
            "os.kill",
            "os.remove",
            "from os import",
            "subprocess",
            "__import__",
            "importlib",
            "eval(",
            "exec(",
            "compile(",
            "open(",
            "file(",
            "socket",
            "shutil",
            "ctypes",
        ]),
        function_markers: strings(&[r"(?m)^\s*(?:async\s+)?def\s+\w+", r"\blambda\b"]),
        extra_checks: vec![ExtraCheck {
            kind: ExtraCheckKind::IntrospectionAttack,
            tokens: strings(&[
                "__class__",
                "__subclasses__",
                "__globals__",
                "__builtins__",
                "__bases__",
                "__mro__",
                "__dict__",
                "__code__",
                "__closure__",
                "__getattribute__",
            ]),
            patterns: Vec::new(),
        }],
    }
}

fn c_family_rules() -> LanguageRules {
    LanguageRules {
        keywords: strings(&[
            "system(",
            "execl(",
            "execlp(",
            "execv(",
            "execvp(",
            "execve(",
            "fork(",
            "popen(",
            "fopen(",
            "freopen(",
            "fstream",
            "socket(",
            "connect(",
            "dlopen(",
            "ptrace(",
            "<unistd.h>",
            "<sys/socket.h>",
        ]),
        function_markers: strings(&[
            r"(?m)^[\t ]*[A-Za-z_][\w:<>\*&\t ]*[\t ]\**[A-Za-z_]\w*\s*\([^;{}]*\)\s*(?:const\s*)?\{",
        ]),
        extra_checks: vec![ExtraCheck {
            kind: ExtraCheckKind::InlineAssembly,
            tokens: strings(&["__asm__", "__asm", "asm(", "asm (", "asm volatile"]),
            patterns: Vec::new(),
        }],
    }
}

fn javascript_rules() -> LanguageRules {
    LanguageRules {
        keywords: strings(&[
            "require('child_process')",
            "require(\"child_process\")",
            "child_process",
            "require('fs')",
            "require(\"fs\")",
            "require('net')",
            "require(\"net\")",
            "require('http')",
            "require(\"http\")",
            "process.",
            "new Function(",
            "setTimeout(",
            "setInterval(",
            "eval(",
            "exec(",
            "fetch(",
            "XMLHttpRequest",
        ]),
        function_markers: strings(&[r"\bfunction\b", r"=>"]),
        extra_checks: vec![ExtraCheck {
            kind: ExtraCheckKind::PrototypePollution,
            tokens: strings(&[
                "__proto__",
                "constructor.prototype",
                "constructor[",
                "Object.setPrototypeOf",
                "Reflect.setPrototypeOf",
                "prototype[",
            ]),
            patterns: Vec::new(),
        }],
    }
}

fn go_rules() -> LanguageRules {
    LanguageRules {
        keywords: strings(&[
            "os/exec",
            "exec.Command",
            "syscall",
            "os.Open",
            "os.Create",
            "os.Remove",
            "os.ReadFile",
            "os.WriteFile",
            "ioutil.ReadFile",
            "ioutil.WriteFile",
            "net.Dial",
            "net.Listen",
            "http.Get(",
            "http.Post(",
            "unsafe.",
            "plugin.Open",
        ]),
        function_markers: strings(&[r"\bfunc\b"]),
        extra_checks: Vec::new(),
    }
}

impl Default for SanitizerRules {
    fn default() -> Self {
        let mut languages = HashMap::new();
        languages.insert(Language::Java, java_rules());
        languages.insert(Language::Python, python_rules());
        languages.insert(Language::Cpp, c_family_rules());
        languages.insert(Language::C, c_family_rules());
        languages.insert(Language::JavaScript, javascript_rules());
        languages.insert(Language::Go, go_rules());

        Self {
            max_code_length: DEFAULT_SANITIZER_MAX_CODE_LENGTH,
            max_input_length: DEFAULT_SANITIZER_MAX_INPUT_LENGTH,
            min_base64_run: DEFAULT_MIN_BASE64_RUN,
            min_hex_escape_run: DEFAULT_MIN_HEX_ESCAPE_RUN,
            max_function_definitions: DEFAULT_MAX_FUNCTION_DEFINITIONS,
            import_pattern: r"(?m)^[ \t]*import[ \t]+.*$".to_string(),
            global_keywords: strings(&[
                "Runtime.getRuntime()",
                "ProcessBuilder",
                "exec(",
                "eval(",
                "cmd.exe",
                "/bin/sh",
                "bash",
                "powershell",
                "/etc/passwd",
                "/proc/self",
            ]),
            infinite_loop_patterns: strings(&[
                r"while\s*\(\s*true\s*\)",
                r"while\s*\(\s*1\s*\)",
                r"for\s*\(\s*;\s*;\s*\)",
                r"while\s+(?:true|1)\s*:",
            ]),
            languages,
        }
    }
}
