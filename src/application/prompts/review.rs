//! 终审模板

use super::PromptTemplate;

pub const FINAL_REVIEW: PromptTemplate = PromptTemplate {
    name: "final_review",
    slots: &[
        "novel_title",
        "novel_idea",
        "style_guide",
        "world_lore",
        "plot",
        "characters",
        "chapters",
    ],
    text: "You are a literary critic and editor. Conduct a final review of the complete novel below.

Title: {novel_title}

Concept:
{novel_idea}

Style guide:
{style_guide}

World lore:
{world_lore}

Plot:
{plot}

Characters:
{characters}

Novel content:
{chapters}

Write the review in Markdown:

# Final Novel Review: {novel_title}

## Overall Assessment
## Structure and Pacing
## Plot
## Characters
## World Building
## Style and Voice
## Themes
## Consistency
## Recommendations
## Conclusion
",
};
