//! Prompt construction for verb extraction

use crate::error::{ConjugatorError, Result};

/// Line the model must put between the primary and the counterpart arrays.
pub const SENTINEL: &str = "==========";

/// Keys every verb object must carry.
pub const REQUIRED_KEYS: [&str; 7] = [
    "verb",
    "meaning",
    "aspect",
    "counterpart",
    "form",
    "level",
    "examples",
];

const INSTRUCTIONS: &str = r#"Extract verbs out of the following text and turn them into their infinitive form, make sure to put stress marks on them. Then provide a list using all of those verbs in their infinitive form. Return the result as 2 JSON arrays of objects. Each object in the first JSON array must have the key 'verb' holding a verb extracted from the text, and the following keys: 'meaning' (in English infinitive form), 'aspect' (perfective or imperfective), 'counterpart' (the verb of the opposite aspect), 'form', 'level' (difficulty of that word using the CEFR A1 to C2 system), and 'examples'. The keys must be exactly the names provided, do not change them.

'form' must contain the objects 'present/future tense', 'past tense', and 'imperative'. 'present/future tense' must map the pronouns я, ты, он/она/оно, мы, вы, они to the inflected form for that pronoun (if the verb's aspect is imperfective, give the present tense conjugation; if the verb's aspect is perfective, give the future tense conjugation). 'past tense' must map gender and number (masc, fem, neu, and pl) to the inflected past tense form. 'imperative' must map sing and pl to the inflected imperative form.

'examples' must always contain 3 sentences, strictly as 2 lists of strings. The first list holds the Russian examples and the second list holds their English translations, in the same order. The examples have to show how to use the conjugated forms of that verb in a sentence, and together they must cover the present/future, past, and imperative forms.

The key 'verb' MUST NOT have duplicates. If a verb has more than one meaning, put the meanings together in 'meaning', for example "verb": "прийти́", "meaning": "to arrive, to come". Every single Russian word in the arrays must carry a stress mark, including writing 'е' as 'ё' where it applies, except words with only one vowel. There MUST NOT be any empty objects in the arrays.

The second JSON array follows exactly the same rules as the first, except that the 'counterpart' of each extracted verb is used as its 'verb'. Again, there MUST NOT be any empty objects in the array."#;

const FEW_SHOT: &str = r#"These are some examples for you so the format will always be consistent:
{
    "verb": "гляде́ть",
    "meaning": "to look",
    "aspect": "imperfective",
    "counterpart": "погляде́ть",
    "form": {
      "present/future tense": {
        "я": "гляжу́",
        "ты": "гляди́шь",
        "он/она/оно": "гляди́т",
        "мы": "гляди́м",
        "вы": "гляди́те",
        "они": "глядя́т"
      },
      "past tense": {
        "masc": "гляде́л",
        "fem": "гляде́ла",
        "neu": "гляде́ло",
        "pl": "гляде́ли"
      },
      "imperative": {
        "sing": "гляди́",
        "pl": "гляди́те"
      }
    },
    "level": "A2",
    "examples": [
      [
        "Я гляжу́ на него́.",
        "Ты гляде́л на карти́ну.",
        "Гляди́те, кака́я краси́вая заря́!"
      ],
      [
        "I am looking at him.",
        "You were looking at the painting.",
        "Look, what a beautiful sunset!"
      ]
    ]
  },
  {
    "verb": "опроки́нуть",
    "meaning": "to overturn",
    "aspect": "perfective",
    "counterpart": "опроки́дывать",
    "form": {
      "present/future tense": {
        "я": "опроки́ну",
        "ты": "опроки́нешь",
        "он/она/оно": "опроки́нет",
        "мы": "опроки́нем",
        "вы": "опроки́нете",
        "они": "опроки́нут"
      },
      "past tense": {
        "masc": "опроки́нул",
        "fem": "опроки́нула",
        "neu": "опроки́нуло",
        "pl": "опроки́нули"
      },
      "imperative": {
        "sing": "опроки́нь",
        "pl": "опроки́ньте"
      }
    },
    "level": "B2",
    "examples": [
      [
        "Ве́тер опроки́нет ло́дку.",
        "Он опроки́нул стол.",
        "Не опроки́ньте ча́шку!"
      ],
      [
        "The wind will overturn the boat.",
        "He overturned the table.",
        "Don't overturn the cup!"
      ]
    ]
  }"#;

/// Builds the extraction prompt for `text`. Same text, same prompt.
pub fn build_prompt(text: &str) -> String {
    format!(
        "{}\n\n{}\n\nAlways separate the 2 JSON arrays with \"{}\"\n\nThis is the text that you have to work with:\n\"\n{}\n\"\n",
        INSTRUCTIONS, FEW_SHOT, SENTINEL, text
    )
}

/// Trims `text` and checks it against the character limit.
pub fn validate_input(text: &str, max_chars: usize) -> Result<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ConjugatorError::InvalidInput("the text is empty".to_string()));
    }

    let length = text.chars().count();
    if max_chars > 0 && length > max_chars {
        return Err(ConjugatorError::InvalidInput(format!(
            "the text has {} characters, the limit is {}",
            length, max_chars
        )));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_text_sentinel_and_keys() {
        let prompt = build_prompt("Я работаю.");

        assert!(prompt.contains("Я работаю."));
        assert!(prompt.contains(SENTINEL));
        for key in REQUIRED_KEYS {
            assert!(prompt.contains(&format!("'{}'", key)), "missing key {}", key);
            assert!(prompt.contains(&format!("\"{}\"", key)), "missing JSON key {}", key);
        }
        for group in ["present/future tense", "past tense", "imperative"] {
            assert!(prompt.contains(&format!("\"{}\"", group)));
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(build_prompt("Он читал."), build_prompt("Он читал."));
        assert_ne!(build_prompt("Он читал."), build_prompt("Она читала."));
    }

    #[test]
    fn user_text_comes_last() {
        let prompt = build_prompt("Мы идём.");
        let text_at = prompt.find("Мы идём.").unwrap();
        assert!(text_at > prompt.find(SENTINEL).unwrap());
        assert!(text_at > prompt.find("опроки́нуть").unwrap());
    }

    #[test]
    fn input_limits() {
        assert_eq!(validate_input("  Я работаю.\n", 1500).unwrap(), "Я работаю.");
        assert!(validate_input("   \n", 1500).is_err());

        // Cyrillic counts per character, not per byte
        let text = "ж".repeat(1500);
        assert!(validate_input(&text, 1500).is_ok());
        assert!(validate_input(&format!("{}ж", text), 1500).is_err());
        assert!(validate_input(&text, 0).is_ok());
    }
}
