//! 章节规划 / 写作 / 审校模板

use super::PromptTemplate;

/// 审校结果中修订稿的起始标记
pub const REVISED_CONTENT_MARKER: &str = "Revised Content:";

pub const CHAPTER_PLAN: PromptTemplate = PromptTemplate {
    name: "chapter_plan",
    slots: &[
        "novel_title",
        "idea",
        "style_guide",
        "world_lore",
        "plot",
        "characters",
        "chapter_number",
    ],
    text: "You are a novel structure expert. Plan one chapter of the novel below.

Novel title: {novel_title}

Concept:
{idea}

Style guide:
{style_guide}

World lore:
{world_lore}

Plot:
{plot}

Characters:
{characters}

For chapter {chapter_number}, output a JSON object with exactly these fields:
- title: the chapter title
- summary: a brief overview of the chapter
- scenes: a list of scenes
- pov_character: the point-of-view character (use a name from the characters above)
- goals: a list of goals this chapter accomplishes
- conflicts: a list of conflicts introduced or developed
- resolutions: a list of resolutions or partial resolutions

The plan must fit the novel's overall structure and advance the plot.
Output only the JSON object, without explanations or additional text.
",
};

pub const CHAPTER_WRITING: PromptTemplate = PromptTemplate {
    name: "chapter_writing",
    slots: &[
        "novel_title",
        "chapter_number",
        "chapter_title",
        "chapter_plan",
        "style_guide",
        "world_lore",
        "plot",
        "characters",
    ],
    text: "You are a professional novelist. Write chapter {chapter_number} of \"{novel_title}\".

Chapter plan:
{chapter_plan}

Style guide:
{style_guide}

World lore:
{world_lore}

Plot:
{plot}

Characters:
{characters}

Follow the chapter plan. Match the style guide, stay consistent with the world lore, \
advance the plot, and portray every character consistently with their description. \
Use vivid description, dialogue that reveals personality, and sensory detail.

# Chapter {chapter_number}: {chapter_title}

Write the complete chapter text below.
",
};

pub const CHAPTER_REVIEW: PromptTemplate = PromptTemplate {
    name: "chapter_review",
    slots: &[
        "chapter_content",
        "chapter_plan",
        "style_guide",
        "world_lore",
        "plot",
        "characters",
    ],
    text: "You are a professional editor. Review and improve the chapter below.

Chapter content:
{chapter_content}

Chapter plan:
{chapter_plan}

Style guide:
{style_guide}

World lore:
{world_lore}

Plot:
{plot}

Characters:
{characters}

Check adherence to the chapter plan, style consistency, world-building, plot \
development, character portrayal, and prose quality.

Answer in this format:

# Chapter Review

## Strengths
## Areas for Improvement
## Specific Suggestions

Revised Content:
<the full revised chapter text, incorporating every suggestion>
",
};
