use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::json_repair::{try_repair_json, FALLBACK_SKILL, LEVELS};
use crate::errors::StructuredOutputError;
use crate::types::StructuredOutput;

/// skill -> difficulty level -> ordered questions. Key order follows the
/// model's output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank(IndexMap<String, IndexMap<String, Vec<String>>>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

pub type AnswerSheet = IndexMap<String, IndexMap<String, Vec<QaPair>>>;

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fallback(raw: &str) -> Self {
        let mut levels = IndexMap::new();
        for (i, level) in LEVELS.iter().enumerate() {
            let questions = if i == LEVELS.len() - 1 {
                vec![raw.to_string()]
            } else {
                Vec::new()
            };
            levels.insert(level.to_string(), questions);
        }

        let mut skills = IndexMap::new();
        skills.insert(FALLBACK_SKILL.to_string(), levels);
        Self(skills)
    }

    pub fn insert(&mut self, skill: impl Into<String>, level: impl Into<String>, questions: Vec<String>) {
        self.0
            .entry(skill.into())
            .or_default()
            .insert(level.into(), questions);
    }

    /// Coerces a parsed JSON mapping into the bank shape. String levels become
    /// one-element lists, null levels become empty lists, and non-string list
    /// items are kept in their JSON text form.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, StructuredOutputError> {
        if map.is_empty() {
            return Err(StructuredOutputError::Malformed(
                "mapping contains no skills".to_string(),
            ));
        }

        let mut bank = IndexMap::with_capacity(map.len());
        for (skill, levels) in map {
            let levels = levels.as_object().ok_or_else(|| {
                StructuredOutputError::Malformed(format!(
                    "skill '{skill}' does not map to difficulty levels"
                ))
            })?;

            let mut by_level = IndexMap::with_capacity(levels.len());
            for (level, questions) in levels {
                let questions = match questions {
                    Value::Array(items) => items.iter().map(question_text).collect(),
                    Value::String(single) => vec![single.clone()],
                    Value::Null => Vec::new(),
                    other => {
                        return Err(StructuredOutputError::Malformed(format!(
                            "level '{level}' of skill '{skill}' holds {other} instead of questions"
                        )))
                    }
                };
                by_level.insert(level.clone(), questions);
            }
            bank.insert(skill.clone(), by_level);
        }

        Ok(Self(bank))
    }

    /// Repairs and coerces raw model text. Never fails: anything that cannot
    /// be coerced ends up in the fallback bucket with `parse_error` set.
    pub fn from_model_text(raw: &str) -> StructuredOutput {
        let coerced = try_repair_json(raw)
            .ok_or_else(|| StructuredOutputError::Malformed("no JSON object found".to_string()))
            .and_then(|map| Self::from_map(&map));

        match coerced {
            Ok(questions) => StructuredOutput {
                questions,
                parse_error: false,
            },
            Err(err) => {
                log::warn!("Falling back to raw question bucket: {}", err);
                StructuredOutput {
                    questions: Self::fallback(raw),
                    parse_error: true,
                }
            }
        }
    }

    pub fn skills(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn levels(&self, skill: &str) -> Option<&IndexMap<String, Vec<String>>> {
        self.0.get(skill)
    }

    pub fn questions(&self, skill: &str, level: &str) -> Option<&[String]> {
        self.0
            .get(skill)
            .and_then(|levels| levels.get(level))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn question_count(&self) -> usize {
        self.0
            .values()
            .flat_map(|levels| levels.values())
            .map(Vec::len)
            .sum()
    }

    pub fn pair_answers(&self, answers: &QuestionBank) -> AnswerSheet {
        self.0
            .iter()
            .map(|(skill, levels)| {
                let paired = levels
                    .iter()
                    .map(|(level, questions)| {
                        let given = answers.questions(skill, level).unwrap_or(&[]);
                        let pairs = questions
                            .iter()
                            .enumerate()
                            .map(|(i, question)| QaPair {
                                question: question.clone(),
                                answer: given.get(i).cloned().unwrap_or_default(),
                            })
                            .collect();
                        (level.clone(), pairs)
                    })
                    .collect();
                (skill.clone(), paired)
            })
            .collect()
    }

    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        for (skill, levels) in &self.0 {
            out.push_str(&format!("### {}\n", skill));
            for (level, questions) in levels {
                if questions.is_empty() {
                    continue;
                }
                out.push_str(&format!("**{}**\n", level));
                for (i, question) in questions.iter().enumerate() {
                    out.push_str(&format!("{}. {}\n", i + 1, question));
                }
            }
            out.push('\n');
        }
        out.trim_end().to_string()
    }
}

fn question_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
