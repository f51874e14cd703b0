//! Idea Development - 构思阶段
//!
//! 追问 → 逐题作答 → 综合成新的构思，覆盖 Novel.idea

use std::collections::BTreeMap;
use std::sync::Arc;

use super::Completion;
use crate::application::error::ApplicationError;
use crate::application::ports::TextGeneratorPort;
use crate::application::prompts::{ANSWER_QUESTION, FOLLOW_UP_QUESTIONS, IDEA_SYNTHESIS};
use crate::domain::novel::Novel;

const STAGE: &str = "idea_development";

/// 构思阶段结果
#[derive(Debug, Clone, PartialEq)]
pub struct DevelopedIdea {
    /// 编号 -> 追问
    pub questions: BTreeMap<u32, String>,
    /// 编号 -> 回答
    pub answers: BTreeMap<u32, String>,
    /// 综合后的构思（已写入 Novel.idea）
    pub idea: String,
}

/// 构思阶段执行器
pub struct IdeaDevelopmentStage {
    completion: Completion,
}

impl IdeaDevelopmentStage {
    pub fn new(generator: Arc<dyn TextGeneratorPort>, temperature: f32) -> Self {
        Self {
            completion: Completion::new(generator, temperature),
        }
    }

    /// 执行构思阶段
    ///
    /// 所有调用成功后才修改 Novel；任一调用失败时 Novel 保持原样
    pub async fn run(&self, novel: &mut Novel) -> Result<DevelopedIdea, ApplicationError> {
        tracing::info!(title = %novel.title(), "Starting idea development");

        let prompt = FOLLOW_UP_QUESTIONS.render(&[("idea", novel.idea())]);
        let questions_text = self.completion.complete(STAGE, prompt).await?;
        let questions = parse_questions(&questions_text);
        tracing::info!(count = questions.len(), "Follow-up questions parsed");

        let mut answers = BTreeMap::new();
        for (id, question) in &questions {
            tracing::info!(question_id = id, question = %question, "Generating answer");
            let prompt =
                ANSWER_QUESTION.render(&[("idea", novel.idea()), ("question", question.as_str())]);
            let answer = self.completion.complete(STAGE, prompt).await?;
            answers.insert(*id, answer);
        }

        let transcript = questions
            .iter()
            .map(|(id, question)| {
                let answer = answers.get(id).map(String::as_str).unwrap_or_default();
                format!("Q{id}: {question}\nA{id}: {answer}")
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = IDEA_SYNTHESIS.render(&[("idea", novel.idea()), ("answers", transcript.as_str())]);
        let idea = self.completion.complete(STAGE, prompt).await?;

        novel.set_idea(idea.clone());
        tracing::info!(idea_len = idea.len(), "Idea development completed");

        Ok(DevelopedIdea {
            questions,
            answers,
            idea,
        })
    }
}

/// 解析编号追问
///
/// - 含冒号的行：冒号前为编号候选（去掉 `Q`、`.` 等修饰），能解析为整数则用作编号
/// - 编号候选不是整数、或行中没有冒号：整行作为问题，编号为当前最大编号 + 1
///   （最大编号已是 u32::MAX 时改用问题数 + 1）
/// - 空行以及冒号后为空的行被忽略
pub fn parse_questions(text: &str) -> BTreeMap<u32, String> {
    let mut questions = BTreeMap::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let numbered = line.split_once(':').and_then(|(candidate, question)| {
            parse_question_id(candidate).map(|id| (id, question.trim()))
        });

        match numbered {
            Some((_, "")) => continue,
            Some((id, question)) => {
                questions.insert(id, question.to_string());
            }
            None => {
                let next = questions
                    .keys()
                    .next_back()
                    .and_then(|last| last.checked_add(1))
                    .unwrap_or_else(|| (questions.len() as u32).saturating_add(1));
                questions.insert(next, line.to_string());
            }
        }
    }

    questions
}

fn parse_question_id(candidate: &str) -> Option<u32> {
    candidate
        .trim()
        .trim_matches(|c: char| matches!(c, '*' | '#' | '-') || c.is_whitespace())
        .trim_start_matches(['Q', 'q'])
        .trim_end_matches(['.', ')'])
        .trim()
        .parse()
        .ok()
}
