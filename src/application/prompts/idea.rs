//! 构思阶段模板

use super::PromptTemplate;

pub const FOLLOW_UP_QUESTIONS: PromptTemplate = PromptTemplate {
    name: "follow_up_questions",
    slots: &["idea"],
    text: "You are a creative writing assistant. Based on the initial novel idea below, \
generate 5-7 follow-up questions that would help develop it further. Cover setting, \
characters, conflict, themes, and plot structure.

Initial idea: {idea}

Write one question per line, numbered like \"Q1: ...\", \"Q2: ...\".
",
};

pub const ANSWER_QUESTION: PromptTemplate = PromptTemplate {
    name: "answer_question",
    slots: &["idea", "question"],
    text: "Based on the novel idea: '{idea}', please provide a detailed answer to this question: {question}",
};

pub const IDEA_SYNTHESIS: PromptTemplate = PromptTemplate {
    name: "idea_synthesis",
    slots: &["idea", "answers"],
    text: "You are a creative writing assistant. Develop the initial novel idea into a \
structured concept using the answers to the follow-up questions.

Initial idea: {idea}

Follow-up questions and answers:
{answers}

Your response should include:
1. A refined high-level concept (1-2 paragraphs)
2. The core themes and messages
3. The central conflict
4. The unique selling points of this story

This concept is the foundation for detailed planning of the novel.
",
};
