//! Console presentation of verb sections

use colored::{Color, Colorize};
use unicode_segmentation::UnicodeSegmentation;

use crate::conjugator::{Notice, Outcome};
use crate::models::VerbRecord;
use crate::view::{VerbSection, capitalize, display_gloss};

const TITLE: Color = Color::TrueColor { r: 185, g: 132, b: 219 };
const GLOSS: Color = Color::TrueColor { r: 226, g: 189, b: 107 };

pub const PLACEHOLDER: &str =
    "No verbs found or processed yet. Please enter text and submit to see results.";

const PRONOUN_LABELS: [&str; 6] = ["я", "ты", "он/она́/оно́", "мы", "вы", "они́"];
const PAST_LABELS: [&str; 4] = [
    "Masculine (я/ты/он)",
    "Feminine (я/ты/она́)",
    "Neuter (оно́)",
    "Plural (мы/вы/они́)",
];
const IMPERATIVE_LABELS: [&str; 2] = ["Singular (ты)", "Plural (вы)"];

const FORM_HEADER: &str = "Grammar Form";
const VALUE_HEADER: &str = "Conjugation";
const TABLE_GAP: &str = "    ";

pub struct ConsoleRenderer {
    use_colors: bool,
    collapsed: bool,
}

struct SmallTable {
    title: String,
    rows: Vec<(String, String)>,
}

impl SmallTable {
    fn new(title: &str, labels: &[&str], forms: &[&str]) -> Self {
        SmallTable {
            title: title.to_string(),
            rows: labels
                .iter()
                .zip(forms)
                .map(|(label, form)| (label.to_string(), form.to_string()))
                .collect(),
        }
    }

    // Title, header, rule, then one line per form; all plain text
    fn lines(&self) -> Vec<String> {
        let label_width = self
            .rows
            .iter()
            .map(|(label, _)| width(label))
            .chain(std::iter::once(width(FORM_HEADER)))
            .max()
            .unwrap_or(0);
        let value_width = self
            .rows
            .iter()
            .map(|(_, value)| width(value))
            .chain(std::iter::once(width(VALUE_HEADER)))
            .max()
            .unwrap_or(0);

        let mut lines = vec![
            self.title.clone(),
            format!("{} | {}", pad(FORM_HEADER, label_width), pad(VALUE_HEADER, value_width)),
            format!("{}-+-{}", "-".repeat(label_width), "-".repeat(value_width)),
        ];
        for (label, value) in &self.rows {
            lines.push(format!("{} | {}", pad(label, label_width), pad(value, value_width)));
        }
        lines
    }
}

impl ConsoleRenderer {
    pub fn new(use_colors: bool, collapsed: bool) -> Self {
        Self { use_colors, collapsed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn emphasize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn banner(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n\n", self.emphasize("Russian Verb Conjugator", TITLE)));
        output.push_str(
            "This application will help you extract the verbs from a text, conjugate them for you \
             and give you some examples!\n\n",
        );
        output.push_str(&format!(
            "{} In Russian, the imperfective aspect forms the present tense (ongoing or habitual action) \
             and a compound future tense (\"to be\" + infinitive). The perfective aspect has no present \
             tense: its present-looking forms are a simple future with a completed, one-time meaning.\n",
            self.bold("Note:")
        ));
        output
    }

    pub fn placeholder(&self) -> String {
        format!("{}\n", self.colorize(PLACEHOLDER, Color::Yellow))
    }

    /// Notices first, then the verbs or the placeholder.
    pub fn render_outcome(&self, outcome: &Outcome) -> String {
        let mut output = String::new();
        for notice in &outcome.notices {
            let line = match notice {
                Notice::Warning(message) => format!("⚠️  {}", self.colorize(message, Color::Yellow)),
                Notice::Error(message) => format!("❌ {}", self.colorize(message, Color::Red)),
            };
            output.push_str(&line);
            output.push('\n');
        }

        match &outcome.sections {
            Some(sections) => output.push_str(&self.render(sections)),
            None => output.push_str(&self.placeholder()),
        }
        output
    }

    pub fn render(&self, sections: &[VerbSection]) -> String {
        let mut output = format!(
            "\n{}\n",
            self.bold(&format!("There are {} verbs in the text!", sections.len()))
        );

        for section in sections {
            output.push('\n');
            output.push_str(&self.render_section(section));
        }
        output
    }

    pub fn render_section(&self, section: &VerbSection) -> String {
        let mut output = String::new();
        let marker = if self.collapsed { "▸" } else { "▾" };

        let summary = if self.use_colors {
            format!(
                "{} -- {} -- {}",
                capitalize(&section.primary.verb).bold(),
                capitalize(&display_gloss(&section.primary.meaning)),
                section.primary.aspect
            )
        } else {
            section.summary()
        };
        output.push_str(&format!("{} {}\n", marker, summary));

        if self.collapsed {
            return output;
        }

        let tabs = match &section.counterpart {
            Some(counterpart) => format!(
                "[{}] [{}]",
                capitalize(&section.primary.verb),
                capitalize(&counterpart.verb)
            ),
            None => format!("[{}]", capitalize(&section.primary.verb)),
        };
        output.push_str(&format!("  {}\n", self.colorize(&tabs, Color::BrightBlack)));

        output.push_str(&self.render_panel(&section.primary));
        if let Some(counterpart) = &section.counterpart {
            output.push_str(&format!("\n  {}\n", self.colorize(&"─".repeat(40), Color::BrightBlack)));
            output.push_str(&self.render_panel(counterpart));
        }
        output
    }

    /// Header, the three form tables side by side, then the examples.
    pub fn render_panel(&self, record: &VerbRecord) -> String {
        let mut output = String::new();
        let indent = "  ";

        output.push_str(&format!(
            "\n{}{}  [{}]  {}\n",
            indent,
            self.emphasize(&capitalize(&record.verb), TITLE),
            capitalize(&record.aspect.to_string()),
            self.bold(&record.level.to_string())
        ));
        output.push_str(&format!(
            "{}{}\n",
            indent,
            self.colorize(&capitalize(&display_gloss(&record.meaning)), GLOSS)
        ));
        output.push_str(&format!(
            "{}The verb's counterpart: {}\n\n",
            indent,
            self.colorize(&capitalize(&record.counterpart), TITLE)
        ));

        let tables = [
            SmallTable::new(
                record.aspect.conjugation_heading(),
                &PRONOUN_LABELS,
                &record.present_future.forms(),
            ),
            SmallTable::new("Past Tense", &PAST_LABELS, &record.past.forms()),
            SmallTable::new("Imperative", &IMPERATIVE_LABELS, &record.imperative.forms()),
        ];
        for line in self.side_by_side(&tables) {
            output.push_str(&format!("{}{}\n", indent, line.trim_end()));
        }

        output.push_str(&format!("\n{}{}\n", indent, self.bold("Examples")));
        for pair in &record.examples {
            output.push_str(&format!("{}{}\n", indent, self.colorize(&pair.russian, TITLE)));
            output.push_str(&format!("{}{}\n", indent, pair.english));
        }
        output
    }

    fn side_by_side(&self, tables: &[SmallTable]) -> Vec<String> {
        let columns: Vec<Vec<String>> = tables.iter().map(SmallTable::lines).collect();
        let widths: Vec<usize> = columns
            .iter()
            .map(|lines| lines.iter().map(|l| width(l)).max().unwrap_or(0))
            .collect();
        let height = columns.iter().map(Vec::len).max().unwrap_or(0);

        (0..height)
            .map(|row| {
                columns
                    .iter()
                    .zip(&widths)
                    .map(|(lines, &w)| {
                        let cell = pad(lines.get(row).map(String::as_str).unwrap_or(""), w);
                        // first line of every table is its title
                        if row == 0 { self.bold(&cell) } else { cell }
                    })
                    .collect::<Vec<_>>()
                    .join(TABLE_GAP)
            })
            .collect()
    }
}

// Stress marks are combining characters, so count graphemes rather than chars
fn width(text: &str) -> usize {
    text.graphemes(true).count()
}

fn pad(text: &str, target: usize) -> String {
    let fill = target.saturating_sub(width(text));
    format!("{}{}", text, " ".repeat(fill))
}
