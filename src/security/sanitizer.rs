//! Pattern-based screening of submitted source
//!
//! This is advisory static analysis, not a sandbox: keyword and regex checks
//! can be both too strict and too lenient. The checks run in a fixed order and
//! the first failure wins:
//!
//! 1. blank or oversized code
//! 2. base64 / hex-escape encoded payloads
//! 3. too many function definitions
//! 4. import lines are stripped (the stripped text is what gets scanned)
//! 5. language and global dangerous-keyword lists
//! 6. language-specific extra checks
//! 7. obvious infinite loops

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use regex::{Regex, RegexBuilder};

use crate::{
    error::ExecutionError,
    models::Language,
    security::rules::{ExtraCheckKind, SanitizerRules},
};

/// Lenient decoder: any padding, trailing bits allowed
const BASE64_PROBE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// A case-insensitive substring and the spelling to report
struct Keyword {
    display: String,
    lowered: String,
}

impl Keyword {
    fn new(raw: &str) -> Self {
        Self {
            display: raw.to_string(),
            lowered: raw.to_lowercase(),
        }
    }
}

struct CompiledExtraCheck {
    kind: ExtraCheckKind,
    tokens: Vec<Keyword>,
    patterns: Vec<Regex>,
}

struct CompiledLanguageRules {
    keywords: Vec<Keyword>,
    function_markers: Vec<Regex>,
    extra_checks: Vec<CompiledExtraCheck>,
}

/// Compiled form of [`SanitizerRules`]
pub struct CodeSanitizer {
    max_code_length: usize,
    max_input_length: usize,
    max_function_definitions: usize,
    base64_run: Regex,
    hex_escape_run: Regex,
    import_line: Regex,
    global_keywords: Vec<Keyword>,
    infinite_loops: Vec<Regex>,
    languages: Vec<(Language, CompiledLanguageRules)>,
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

impl CodeSanitizer {
    /// Compile a rule set; fails on the first invalid regex
    pub fn new(rules: &SanitizerRules) -> Result<Self, regex::Error> {
        let languages = Language::ALL
            .iter()
            .map(|&language| -> Result<(Language, CompiledLanguageRules), regex::Error> {
                let lang = rules.for_language(language);
                let compiled = CompiledLanguageRules {
                    keywords: lang.keywords.iter().map(|k| Keyword::new(k)).collect(),
                    function_markers: lang
                        .function_markers
                        .iter()
                        .map(|p| Regex::new(p))
                        .collect::<Result<_, _>>()?,
                    extra_checks: lang
                        .extra_checks
                        .iter()
                        .map(|check| -> Result<CompiledExtraCheck, regex::Error> {
                            Ok(CompiledExtraCheck {
                                kind: check.kind,
                                tokens: check.tokens.iter().map(|t| Keyword::new(t)).collect(),
                                patterns: check
                                    .patterns
                                    .iter()
                                    .map(|p| case_insensitive(p))
                                    .collect::<Result<_, _>>()?,
                            })
                        })
                        .collect::<Result<_, _>>()?,
                };
                Ok((language, compiled))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            max_code_length: rules.max_code_length,
            max_input_length: rules.max_input_length,
            max_function_definitions: rules.max_function_definitions,
            base64_run: Regex::new(&format!(
                r"[A-Za-z0-9+/]{{{},}}={{0,2}}",
                rules.min_base64_run.max(1)
            ))?,
            hex_escape_run: Regex::new(&format!(
                r"(?:\\x[0-9a-fA-F]{{2}}|\\u[0-9a-fA-F]{{4}}){{{},}}",
                rules.min_hex_escape_run.max(1)
            ))?,
            import_line: Regex::new(&rules.import_pattern)?,
            global_keywords: rules.global_keywords.iter().map(|k| Keyword::new(k)).collect(),
            infinite_loops: rules
                .infinite_loop_patterns
                .iter()
                .map(|p| case_insensitive(p))
                .collect::<Result<_, _>>()?,
            languages,
        })
    }

    /// Resolve a language key against the allow-list
    pub fn validate_language(&self, language: &str) -> Result<Language, ExecutionError> {
        language
            .parse::<Language>()
            .map_err(|_| ExecutionError::unsupported_language(language, Language::supported_list()))
    }

    /// Length ceiling plus the global keyword scan, applied to stdin
    pub fn validate_input(&self, input: Option<&str>) -> Result<(), ExecutionError> {
        let Some(input) = input else {
            return Ok(());
        };

        if input.chars().count() > self.max_input_length {
            return Err(ExecutionError::PayloadTooLarge(format!(
                "Input too large. Maximum {} characters allowed",
                self.max_input_length
            )));
        }

        let lowered = input.to_lowercase();
        if let Some(keyword) = find_keyword(&lowered, &self.global_keywords) {
            return Err(ExecutionError::DangerousOperation(keyword.display.clone()));
        }

        Ok(())
    }

    /// Non-failing probe running exactly the checks of [`Self::sanitize_code`]
    pub fn is_code_safe(&self, code: &str, language: Language) -> bool {
        self.sanitize_code(code, language).is_ok()
    }

    /// Run every check and return the import-stripped code
    pub fn sanitize_code(&self, code: &str, language: Language) -> Result<String, ExecutionError> {
        if code.trim().is_empty() {
            return Err(ExecutionError::EmptyCode);
        }
        if code.chars().count() > self.max_code_length {
            return Err(ExecutionError::PayloadTooLarge(format!(
                "Code exceeds maximum length of {} characters",
                self.max_code_length
            )));
        }

        self.check_obfuscation(code)?;

        let rules = self.rules_for(language);
        self.check_complexity(code, rules)?;

        let stripped = self.import_line.replace_all(code, "").into_owned();
        let lowered = stripped.to_lowercase();

        if let Some(keyword) = find_keyword(&lowered, &rules.keywords)
            .or_else(|| find_keyword(&lowered, &self.global_keywords))
        {
            return Err(ExecutionError::DangerousOperation(keyword.display.clone()));
        }

        for check in &rules.extra_checks {
            check_extra(check, &stripped, &lowered)?;
        }

        if self.infinite_loops.iter().any(|re| re.is_match(&stripped)) {
            return Err(ExecutionError::InfiniteLoopSuspected);
        }

        Ok(stripped)
    }

    fn rules_for(&self, language: Language) -> &CompiledLanguageRules {
        self.languages
            .iter()
            .find(|(l, _)| *l == language)
            .map(|(_, rules)| rules)
            .unwrap_or(&EMPTY_RULES)
    }

    fn check_obfuscation(&self, code: &str) -> Result<(), ExecutionError> {
        for run in self.base64_run.find_iter(code) {
            if BASE64_PROBE.decode(run.as_str()).is_ok() {
                return Err(ExecutionError::ObfuscationDetected(format!(
                    "base64-like run of {} characters",
                    run.as_str().len()
                )));
            }
        }

        if let Some(run) = self.hex_escape_run.find(code) {
            return Err(ExecutionError::ObfuscationDetected(format!(
                "escape-sequence run of {} characters",
                run.as_str().len()
            )));
        }

        Ok(())
    }

    fn check_complexity(
        &self,
        code: &str,
        rules: &CompiledLanguageRules,
    ) -> Result<(), ExecutionError> {
        let count: usize = rules
            .function_markers
            .iter()
            .map(|re| re.find_iter(code).count())
            .sum();

        if count > self.max_function_definitions {
            return Err(ExecutionError::ComplexityLimitExceeded {
                count,
                max: self.max_function_definitions,
            });
        }
        Ok(())
    }
}

static EMPTY_RULES: CompiledLanguageRules = CompiledLanguageRules {
    keywords: Vec::new(),
    function_markers: Vec::new(),
    extra_checks: Vec::new(),
};

fn find_keyword<'a>(lowered: &str, keywords: &'a [Keyword]) -> Option<&'a Keyword> {
    keywords.iter().find(|k| lowered.contains(&k.lowered))
}

fn check_extra(
    check: &CompiledExtraCheck,
    stripped: &str,
    lowered: &str,
) -> Result<(), ExecutionError> {
    let hit = find_keyword(lowered, &check.tokens)
        .map(|k| k.display.clone())
        .or_else(|| {
            check
                .patterns
                .iter()
                .find_map(|re| re.find(stripped).map(|m| m.as_str().to_string()))
        });

    let Some(hit) = hit else {
        return Ok(());
    };

    Err(match check.kind {
        ExtraCheckKind::DangerousOperation => ExecutionError::DangerousOperation(hit),
        ExtraCheckKind::IntrospectionAttack => ExecutionError::IntrospectionAttack(hit),
        ExtraCheckKind::PrototypePollution => ExecutionError::PrototypePollution(hit),
        ExtraCheckKind::InlineAssembly => ExecutionError::InlineAssemblyDisallowed(hit),
        ExtraCheckKind::ResourceAbuse => ExecutionError::ResourceAbusePattern(hit),
    })
}
