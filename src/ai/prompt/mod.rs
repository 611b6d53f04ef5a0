//! Prompt Builder System
//!
//! Standardized prompt construction for digest jobs.
//!
//! ## Design Principles
//!
//! 1. **Role Definition**: Clear AI role for each task
//! 2. **Structured Objectives**: Numbered goals
//! 3. **Untrusted Blocks**: External text is sanitized, wrapped in
//!    `<LABEL_START>` / `<LABEL_END>` markers and followed by a security notice
//! 4. **Output Rules**: Explicit constraints on the answer format

use super::sanitize::{security_reminder, wrap_untrusted_content};

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Role definition with expertise area
    Role { expertise: String, task: String },
    /// Numbered objectives
    Objectives(Vec<String>),
    /// Raw text section
    Text(String),
    /// Attacker-influenceable text (RSS bodies, scraped pages, comments)
    Untrusted { label: String, content: String },
    /// Output format restrictions
    OutputRules(Vec<String>),
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role definition section
    pub fn role(mut self, expertise: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            expertise: expertise.to_string(),
            task: task.to_string(),
        });
        self
    }

    /// Add objectives section
    pub fn objectives(mut self, objectives: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.into_iter().map(String::from).collect(),
        ));
        self
    }

    /// Add text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text(content.to_string()));
        self
    }

    /// Add external content; sanitized and delimited at build time
    pub fn untrusted(mut self, label: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Untrusted {
            label: label.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Add output rules section
    pub fn output_rules(mut self, rules: Vec<&str>) -> Self {
        self.sections.push(PromptSection::OutputRules(
            rules.into_iter().map(String::from).collect(),
        ));
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { expertise, task } => {
                    prompt.push_str("<ROLE>\n");
                    prompt.push_str(&format!(
                        "You are an expert {} specializing in {}.\n",
                        expertise, task
                    ));
                    prompt.push_str("</ROLE>\n\n");
                }
                PromptSection::Objectives(objectives) => {
                    prompt.push_str("<OBJECTIVES>\n");
                    for (i, obj) in objectives.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, obj));
                    }
                    prompt.push_str("</OBJECTIVES>\n\n");
                }
                PromptSection::Text(content) => {
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Untrusted { label, content } => {
                    prompt.push_str(&wrap_untrusted_content(&content, &label));
                    prompt.push_str("\n\n");
                    prompt.push_str(&security_reminder(&label));
                    prompt.push_str("\n\n");
                }
                PromptSection::OutputRules(rules) => {
                    prompt.push_str("<OUTPUT>\n");
                    for rule in rules {
                        prompt.push_str(&format!("- {}\n", rule));
                    }
                    prompt.push_str("</OUTPUT>\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

/// Preset prompt templates
pub struct PromptTemplates;

impl PromptTemplates {
    /// Cheap 1-10 relevance scoring call for a cybersecurity channel.
    /// `source` names the kind of item ("news article", "podcast episode").
    pub fn relevance(title: &str, excerpt: &str, source: &str) -> PromptBuilder {
        let mut item = format!("Title: {}", title);
        if !excerpt.trim().is_empty() {
            item.push_str("\n\nExcerpt: ");
            item.push_str(excerpt);
        }

        PromptBuilder::new()
            .role(
                "cybersecurity editor",
                &format!("triaging {} items for a security-focused Telegram channel", source),
            )
            .objectives(vec![
                "Judge how useful this item is to security practitioners",
                "Favor vulnerabilities, incidents, threat intelligence and defensive techniques",
                "Penalize marketing, off-topic or low-information content",
            ])
            .untrusted("ITEM", &item)
            .output_rules(vec![
                "Answer with a single integer from 1 (irrelevant) to 10 (must read)",
                "Do NOT add words, punctuation or explanation",
            ])
    }
}
