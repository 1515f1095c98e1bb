//! `moduleNameMapper`: ordered regex rewrites applied before resolution.

use crate::error::{Error, Result};
use regex_lite::Regex;
use std::borrow::Cow;

/// One `regex -> moduleName` rule.
#[derive(Debug, Clone)]
pub struct MappingRule {
    regex: Regex,
    module_name: String,
}

impl MappingRule {
    /// Compile a rule, validating the pattern and every `$N` reference in
    /// the template against the pattern's capture groups.
    pub fn new(pattern: &str, module_name: impl Into<String>) -> Result<Self> {
        let module_name = module_name.into();
        let regex = Regex::new(pattern).map_err(|e| Error::InvalidMapping {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let groups = regex.captures_len();
        for index in back_references(&module_name) {
            if index >= groups {
                return Err(Error::InvalidMapping {
                    pattern: pattern.to_string(),
                    reason: format!(
                        "template {module_name:?} references group ${index} but the pattern has {} group(s)",
                        groups - 1
                    ),
                });
            }
        }

        Ok(Self { regex, module_name })
    }

    /// Source text of the pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Replacement template.
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Rewrite `specifier` if this rule matches it.
    #[must_use]
    pub fn apply(&self, specifier: &str) -> Option<String> {
        let caps = self.regex.captures(specifier)?;
        let mut out = String::with_capacity(self.module_name.len());
        let mut rest = self.module_name.as_str();

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            let digits = after.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                out.push('$');
                rest = after;
                continue;
            }
            if let Ok(index) = after[..digits].parse::<usize>() {
                if let Some(m) = caps.get(index) {
                    out.push_str(m.as_str());
                }
            }
            rest = &after[digits..];
        }
        out.push_str(rest);

        Some(out)
    }
}

/// Indices of `$N` references in a template.
fn back_references(template: &str) -> Vec<usize> {
    let mut refs = Vec::new();
    let mut rest = template;
    while let Some(pos) = rest.find('$') {
        let after = &rest[pos + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        if let Ok(index) = after[..digits].parse::<usize>() {
            refs.push(index);
        }
        rest = &after[digits..];
    }
    refs
}

/// Result of a successful mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedName {
    /// Rewritten specifier.
    pub name: String,
    /// Pattern of the rule that matched.
    pub pattern: String,
}

/// Ordered rule list. The first matching rule wins.
#[derive(Debug, Clone, Default)]
pub struct NameMapper {
    rules: Vec<MappingRule>,
}

impl NameMapper {
    #[must_use]
    pub fn new(rules: Vec<MappingRule>) -> Self {
        Self { rules }
    }

    /// Compile `(pattern, template)` pairs in order.
    pub fn from_pairs<I, P, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, T)>,
        P: AsRef<str>,
        T: Into<String>,
    {
        let rules = pairs
            .into_iter()
            .map(|(pattern, template)| MappingRule::new(pattern.as_ref(), template))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    /// The rewrite produced by the first matching rule, if any.
    #[must_use]
    pub fn find(&self, specifier: &str) -> Option<MappedName> {
        self.rules.iter().find_map(|rule| {
            rule.apply(specifier).map(|name| MappedName {
                name,
                pattern: rule.pattern().to_string(),
            })
        })
    }

    /// `specifier` rewritten by the first matching rule, or unchanged.
    #[must_use]
    pub fn apply<'a>(&self, specifier: &'a str) -> Cow<'a, str> {
        match self.find(specifier) {
            Some(mapped) => Cow::Owned(mapped.name),
            None => Cow::Borrowed(specifier),
        }
    }
}
