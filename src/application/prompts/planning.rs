//! 规划阶段模板（风格指南 → 世界观 → 情节 → 角色）

use super::PromptTemplate;

pub const STYLE_GUIDE: PromptTemplate = PromptTemplate {
    name: "style_guide",
    slots: &["idea"],
    text: "You are an experienced novel editor. Create a style guide for the novel described below.

Idea: {idea}

The style guide must be a JSON object with exactly these fields:
- tone: the novel's tone (e.g. dark, humorous, suspenseful)
- language: the language style (e.g. concise, flowery, colloquial)
- narrative_style: the narrative approach (e.g. stream of consciousness, epistolary)
- pov: point of view (e.g. first-person, third-person limited)
- tense: tense (e.g. past, present)
- themes: a list of the main themes

Output only the JSON object, without explanations or additional text.
",
};

pub const WORLD_LORE: PromptTemplate = PromptTemplate {
    name: "world_lore",
    slots: &["idea", "style_guide"],
    text: "You are a world-building expert. Build the world of the novel described below.

Idea: {idea}

Style guide:
{style_guide}

The world lore must be a JSON object with exactly these fields:
- setting: where the story takes place
- history: the world's history and important events
- culture: the inhabitants' culture and social customs
- rules: how the world works (physical, magical, social)
- locations: an object mapping each important location name to its description

Output only the JSON object, without explanations or additional text.
",
};

pub const PLOT: PromptTemplate = PromptTemplate {
    name: "plot",
    slots: &["idea", "world_lore", "style_guide"],
    text: "You are a plot designer. Design the story framework for the novel described below.

Idea: {idea}

World lore:
{world_lore}

Style guide:
{style_guide}

The plot must be a JSON object with exactly these fields:
- main_plot: a brief overview of the main plot
- subplots: a list of brief subplot overviews
- arcs: a list of brief overviews of the main character arcs

Output only the JSON object, without explanations or additional text.
",
};

pub const CHARACTERS: PromptTemplate = PromptTemplate {
    name: "characters",
    slots: &["idea", "plot", "world_lore", "style_guide"],
    text: "You are a character designer. Create the cast of the novel described below.

Idea: {idea}

Plot:
{plot}

World lore:
{world_lore}

Style guide:
{style_guide}

Output a JSON object whose keys are character names and whose values are objects with \
exactly these fields:
- name: the character's name
- description: appearance and personality
- background: backstory
- motivation: what drives the character
- arc: how the character grows or changes
- relationships: an object mapping other character names to a description of the relationship

Output only the JSON object, without explanations or additional text.
",
};
